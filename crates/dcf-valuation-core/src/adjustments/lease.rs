use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DcfError;
use crate::time_value::round_money;
use crate::types::{Money, Rate};
use crate::DcfResult;

use super::capitalization::{capitalize, CapitalizationOptions, CapitalizationResult};
use super::schedule::ExpenseScheduleEntry;

/// The three lease adjustments shown on the financials step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaseAdjustment {
    /// Added to EBIT: lease expense net of depreciation on the leased asset.
    pub ebit_adjustment: Money,
    /// Added to interest expense: imputed interest on the lease debt.
    pub interest_expense_adjustment: Money,
    /// Added to book value of debt: the lease debt-equivalent.
    pub debt_adjustment: Money,
    pub capitalization: CapitalizationResult,
}

/// Capitalize operating leases and derive the EBIT, interest and debt adjustments.
pub fn capitalize_leases(
    schedule: &[ExpenseScheduleEntry],
    options: &CapitalizationOptions,
    pre_tax_cost_of_debt: Rate,
) -> DcfResult<LeaseAdjustment> {
    if pre_tax_cost_of_debt < Decimal::ZERO {
        return Err(DcfError::domain(
            "lease capitalization",
            "pre_tax_cost_of_debt",
            pre_tax_cost_of_debt,
            "cost of debt cannot be negative",
        ));
    }

    let capitalization = capitalize(schedule, options);
    let debt_adjustment = capitalization.unamortized_asset;

    Ok(LeaseAdjustment {
        ebit_adjustment: capitalization.adjusted_operating_income,
        interest_expense_adjustment: round_money(debt_adjustment * pre_tax_cost_of_debt),
        debt_adjustment,
        capitalization,
    })
}
