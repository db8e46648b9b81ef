use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use dcf_valuation_core::cost_of_debt::{
    resolve_cost_of_debt, CostOfDebtContext, CostOfDebtSelection, FirmSize, Rating,
};
use dcf_valuation_core::reference_data::{ReferenceData, ReferenceSpreads};
use dcf_valuation_core::with_metadata;

use super::{read_request, Context};

#[derive(Debug, Clone, ValueEnum)]
pub enum MethodArg {
    Direct,
    Rating,
    Synthetic,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FirmSizeArg {
    Large,
    Small,
}

impl From<FirmSizeArg> for FirmSize {
    fn from(size: FirmSizeArg) -> Self {
        match size {
            FirmSizeArg::Large => FirmSize::Large,
            FirmSizeArg::Small => FirmSize::Small,
        }
    }
}

/// Arguments for resolving the cost of debt
#[derive(Args)]
pub struct CostOfDebtArgs {
    /// How the pre-tax cost of debt is obtained
    #[arg(long, value_enum, default_value = "direct")]
    pub method: MethodArg,

    /// Pre-tax cost of debt (direct method)
    #[arg(long)]
    pub pre_tax_cost_of_debt: Option<Decimal>,

    /// Agency rating, e.g. Baa2 (rating method)
    #[arg(long)]
    pub rating: Option<String>,

    /// Coverage table to use (synthetic method)
    #[arg(long, value_enum, default_value = "large")]
    pub firm_size: FirmSizeArg,

    /// Risk-free rate (default: from reference data)
    #[arg(long)]
    pub risk_free_rate: Option<Decimal>,

    /// Marginal tax rate (default: from the country's reference data)
    #[arg(long)]
    pub marginal_tax_rate: Option<Decimal>,

    /// Operating income, for interest coverage
    #[arg(long)]
    pub ebit: Option<Decimal>,

    /// Interest expense, for interest coverage
    #[arg(long)]
    pub interest_expense: Option<Decimal>,

    /// Country of incorporation; adds its default spread
    #[arg(long)]
    pub country: Option<String>,

    /// Path to JSON/YAML input file with `selection` and `context`
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CostOfDebtRequest {
    selection: CostOfDebtSelection,
    context: CostOfDebtContext,
}

fn request_from_flags(
    args: &CostOfDebtArgs,
    reference: &dyn ReferenceData,
    warnings: &mut Vec<String>,
) -> Result<CostOfDebtRequest, Box<dyn std::error::Error>> {
    let selection = match args.method {
        MethodArg::Direct => CostOfDebtSelection::Direct {
            pre_tax_cost_of_debt: args
                .pre_tax_cost_of_debt
                .ok_or("--pre-tax-cost-of-debt is required for the direct method")?,
        },
        MethodArg::Rating => {
            let label = args
                .rating
                .as_deref()
                .ok_or("--rating is required for the rating method")?;
            CostOfDebtSelection::Rating {
                rating: label.parse::<Rating>()?,
            }
        }
        MethodArg::Synthetic => CostOfDebtSelection::Synthetic {
            firm_size: args.firm_size.into(),
        },
    };

    let country = match args.country.as_deref() {
        Some(name) => {
            let profile = reference.lookup_country(name);
            if profile.is_none() {
                warnings.push(format!(
                    "No reference data for country '{name}'; country spread taken as 0"
                ));
            }
            profile
        }
        None => None,
    };

    let risk_free_rate = args
        .risk_free_rate
        .or_else(|| reference.default_risk_free_rate())
        .unwrap_or(Decimal::ZERO);
    let marginal_tax_rate = args
        .marginal_tax_rate
        .or_else(|| country.as_ref().map(|c| c.marginal_tax_rate))
        .ok_or("--marginal-tax-rate is required (or give a known --country)")?;

    Ok(CostOfDebtRequest {
        selection,
        context: CostOfDebtContext {
            risk_free_rate,
            marginal_tax_rate,
            ebit: args.ebit.unwrap_or(Decimal::ZERO),
            interest_expense: args.interest_expense.unwrap_or(Decimal::ZERO),
            country_spread: country.map(|c| c.spread).unwrap_or(Decimal::ZERO),
        },
    })
}

pub fn run_cost_of_debt(
    args: CostOfDebtArgs,
    ctx: &Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let reference = ctx.reference()?;
    let mut warnings = Vec::new();
    let request = match read_request::<CostOfDebtRequest>(args.input.as_deref())? {
        Some(r) => r,
        None => request_from_flags(&args, &reference, &mut warnings)?,
    };

    let start = Instant::now();
    let result = resolve_cost_of_debt(
        &request.selection,
        &request.context,
        &ReferenceSpreads(&reference),
    )?;
    warnings.extend(result.warnings.iter().cloned());
    let output = with_metadata(
        "Pre-tax cost of debt by direct entry, agency rating or synthetic rating",
        &request,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}
