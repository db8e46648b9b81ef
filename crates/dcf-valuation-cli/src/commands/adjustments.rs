use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use dcf_valuation_core::adjustments::schedule::{
    lease_schedule_from_amounts, rnd_schedule_from_amounts,
};
use dcf_valuation_core::adjustments::{
    capitalize, capitalize_leases, compute_trapped_cash_value, CapitalizationOptions,
    ExpenseScheduleEntry, ZeroAmountPolicy,
};
use dcf_valuation_core::convertible::value_convertible_debt;
use dcf_valuation_core::with_metadata;

use super::read_request;

/// Arguments for the trapped cash adjustment
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TrappedCashArgs {
    /// Cash held abroad
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Domestic marginal tax rate (e.g. 0.25 for 25%)
    #[arg(long)]
    pub domestic_tax_rate: Option<Decimal>,

    /// Tax rate already paid abroad
    #[arg(long)]
    pub foreign_tax_rate: Option<Decimal>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TrappedCashRequest {
    amount: Decimal,
    domestic_tax_rate: Decimal,
    foreign_tax_rate: Decimal,
}

/// Arguments shared by the R&D and lease capitalizers
#[derive(Args)]
pub struct CapitalizeArgs {
    /// Expenses, current (or next) year first, comma separated
    #[arg(long, value_delimiter = ',')]
    pub amounts: Vec<Decimal>,

    /// Number of historical years to amortize (default: all)
    #[arg(long)]
    pub amortizable_life: Option<u32>,

    /// Count zero amounts as real periods instead of dropping them
    #[arg(long)]
    pub include_zeros: bool,

    /// Path to JSON/YAML input file with `schedule` and `options`
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CapitalizeRequest {
    schedule: Vec<ExpenseScheduleEntry>,
    #[serde(default)]
    options: CapitalizationOptions,
}

/// Arguments for lease capitalization
#[derive(Args)]
pub struct LeaseArgs {
    #[command(flatten)]
    pub schedule: CapitalizeArgs,

    /// Pre-tax cost of debt used to impute lease interest
    #[arg(long)]
    pub pre_tax_cost_of_debt: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LeaseRequest {
    schedule: Vec<ExpenseScheduleEntry>,
    #[serde(default)]
    options: CapitalizationOptions,
    pre_tax_cost_of_debt: Decimal,
}

/// Arguments for valuing convertible debt
#[derive(Args)]
pub struct ConvertibleArgs {
    /// Book value of the convertible
    #[arg(long)]
    pub book_value: Option<Decimal>,

    /// Annual coupon rate
    #[arg(long)]
    pub coupon_rate: Option<Decimal>,

    /// Whole years to maturity
    #[arg(long)]
    pub maturity: Option<u32>,

    /// Pre-tax market cost of debt
    #[arg(long)]
    pub market_cost_of_debt: Option<Decimal>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConvertibleRequest {
    book_value: Decimal,
    coupon_rate: Decimal,
    maturity_years: u32,
    market_cost_of_debt: Decimal,
}

pub fn run_trapped_cash(args: TrappedCashArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = match read_request::<TrappedCashRequest>(args.input.as_deref())? {
        Some(r) => r,
        None => TrappedCashRequest {
            amount: args
                .amount
                .ok_or("--amount is required (or provide --input)")?,
            domestic_tax_rate: args
                .domestic_tax_rate
                .ok_or("--domestic-tax-rate is required (or provide --input)")?,
            foreign_tax_rate: args
                .foreign_tax_rate
                .ok_or("--foreign-tax-rate is required (or provide --input)")?,
        },
    };

    let start = Instant::now();
    let value = compute_trapped_cash_value(
        request.amount,
        request.domestic_tax_rate,
        request.foreign_tax_rate,
    )?;
    let output = with_metadata(
        "Repatriation tax on trapped cash",
        &request,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        serde_json::json!({ "trapped_cash_value": value }),
    );
    Ok(serde_json::to_value(output)?)
}

fn capitalize_request(
    args: &CapitalizeArgs,
    schedule_from: fn(&[Option<Decimal>]) -> Vec<ExpenseScheduleEntry>,
) -> Result<CapitalizeRequest, Box<dyn std::error::Error>> {
    if args.amounts.is_empty() {
        return Err("--amounts is required (or provide --input)".into());
    }
    let amounts: Vec<Option<Decimal>> = args.amounts.iter().map(|a| Some(*a)).collect();
    Ok(CapitalizeRequest {
        schedule: schedule_from(&amounts),
        options: CapitalizationOptions {
            amortizable_life: args.amortizable_life,
            zero_amounts: if args.include_zeros {
                ZeroAmountPolicy::Include
            } else {
                ZeroAmountPolicy::TreatAsMissing
            },
        },
    })
}

pub fn run_capitalize(args: CapitalizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = match read_request::<CapitalizeRequest>(args.input.as_deref())? {
        Some(r) => r,
        None => capitalize_request(&args, rnd_schedule_from_amounts)?,
    };

    let start = Instant::now();
    let result = capitalize(&request.schedule, &request.options);
    let mut warnings = Vec::new();
    if result.is_empty() {
        warnings.push("Fewer than two usable periods; nothing capitalized".to_string());
    }
    let output = with_metadata(
        "Expense capitalization (straight-line amortization)",
        &request,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_lease(args: LeaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = match read_request::<LeaseRequest>(args.schedule.input.as_deref())? {
        Some(r) => r,
        None => {
            let base = capitalize_request(&args.schedule, lease_schedule_from_amounts)?;
            LeaseRequest {
                schedule: base.schedule,
                options: base.options,
                pre_tax_cost_of_debt: args
                    .pre_tax_cost_of_debt
                    .ok_or("--pre-tax-cost-of-debt is required (or provide --input)")?,
            }
        }
    };

    let start = Instant::now();
    let result = capitalize_leases(
        &request.schedule,
        &request.options,
        request.pre_tax_cost_of_debt,
    )?;
    let output = with_metadata(
        "Operating lease capitalization",
        &request,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_convertible(args: ConvertibleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = match read_request::<ConvertibleRequest>(args.input.as_deref())? {
        Some(r) => r,
        None => ConvertibleRequest {
            book_value: args
                .book_value
                .ok_or("--book-value is required (or provide --input)")?,
            coupon_rate: args
                .coupon_rate
                .ok_or("--coupon-rate is required (or provide --input)")?,
            maturity_years: args
                .maturity
                .ok_or("--maturity is required (or provide --input)")?,
            market_cost_of_debt: args
                .market_cost_of_debt
                .ok_or("--market-cost-of-debt is required (or provide --input)")?,
        },
    };

    let start = Instant::now();
    let result = value_convertible_debt(
        request.book_value,
        request.coupon_rate,
        request.maturity_years,
        request.market_cost_of_debt,
    )?;
    let output = with_metadata(
        "Convertible debt straight-bond component",
        &request,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}
