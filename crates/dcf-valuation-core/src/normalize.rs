use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adjustments::{CapitalizationResult, LeaseAdjustment};
use crate::convertible::ConvertibleDebtValue;
use crate::cost_of_debt::CostOfDebt;
use crate::input::ValuationInput;
use crate::time_value::{bond_value, round_money};
use crate::types::{Money, Rate};
use crate::DcfResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Latest outputs of the individual adjusters.
///
/// Values may be stale with respect to the module flags on the input; the
/// normalizer consults the flags, so a module that is switched off never
/// contributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentOutputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trapped_cash_value: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rnd: Option<CapitalizationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease: Option<LeaseAdjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_of_debt: Option<CostOfDebt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convertible: Option<ConvertibleDebtValue>,
}

impl AdjustmentOutputs {
    pub fn active_trapped_cash(&self, input: &ValuationInput) -> Option<Money> {
        self.trapped_cash_value.filter(|_| input.cash_is_trapped)
    }

    pub fn active_rnd(&self, input: &ValuationInput) -> Option<&CapitalizationResult> {
        self.rnd.as_ref().filter(|_| input.capitalize_rnd)
    }

    pub fn active_lease(&self, input: &ValuationInput) -> Option<&LeaseAdjustment> {
        self.lease.as_ref().filter(|_| input.capitalize_lease)
    }

    pub fn active_convertible(&self, input: &ValuationInput) -> Option<&ConvertibleDebtValue> {
        self.convertible
            .as_ref()
            .filter(|_| input.has_convertible_debt)
    }
}

/// Normalized balance-sheet figures feeding the valuation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFinancials {
    pub final_adjusted_ebit: Money,
    pub adjusted_cash: Money,
    pub adjusted_bv_of_debt: Money,
    pub market_value_of_debt: Money,
}

/// The four final fields, for recomputing one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalField {
    FinalAdjustedEbit,
    AdjustedCash,
    AdjustedBvOfDebt,
    MarketValueOfDebt,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// EBIT plus the R&D and lease operating-income adjustments.
pub fn final_adjusted_ebit(
    input: &ValuationInput,
    rnd: Option<&CapitalizationResult>,
    lease: Option<&LeaseAdjustment>,
) -> Money {
    let rnd_delta = rnd.map(|r| r.adjusted_operating_income).unwrap_or(Decimal::ZERO);
    let lease_delta = lease.map(|l| l.ebit_adjustment).unwrap_or(Decimal::ZERO);
    input.ebit_ttm + rnd_delta + lease_delta
}

/// Cash less the tax cost of repatriating trapped cash.
pub fn adjusted_cash(input: &ValuationInput, trapped_cash_value: Option<Money>) -> Money {
    input.cash_equivalent_ttm - trapped_cash_value.unwrap_or(Decimal::ZERO)
}

/// Book debt plus lease debt and the convertible's book value.
pub fn adjusted_bv_of_debt(
    input: &ValuationInput,
    lease: Option<&LeaseAdjustment>,
    convertible_book_value: Option<Money>,
) -> Money {
    input.bv_of_debt_ttm
        + lease.map(|l| l.debt_adjustment).unwrap_or(Decimal::ZERO)
        + convertible_book_value.unwrap_or(Decimal::ZERO)
}

/// Treat the adjusted book debt as a bond paying the (lease-adjusted) interest
/// expense until the average maturity, discounted at the after-tax cost of
/// debt.
///
/// Falls back to book value when maturity or cost of debt are not available.
pub fn market_value_of_debt(
    input: &ValuationInput,
    adjusted_bv_of_debt: Money,
    lease: Option<&LeaseAdjustment>,
    after_tax_cost_of_debt: Option<Rate>,
) -> DcfResult<Money> {
    let years = input.avg_maturity_of_debt.filter(|y| *y > Decimal::ZERO);
    let (years, rate) = match (years, after_tax_cost_of_debt) {
        (Some(y), Some(r)) => (y, r),
        _ => {
            log::debug!("market value of debt falls back to book value {adjusted_bv_of_debt}");
            return Ok(adjusted_bv_of_debt);
        }
    };

    let coupon = input.interest_expense_ttm
        + lease
            .map(|l| l.interest_expense_adjustment)
            .unwrap_or(Decimal::ZERO);
    let value = bond_value(coupon, adjusted_bv_of_debt, years, rate)?;
    Ok(round_money(value))
}

/// Compute all four fields in dependency order.
pub fn normalize(
    input: &ValuationInput,
    adjustments: &AdjustmentOutputs,
) -> DcfResult<NormalizedFinancials> {
    let rnd = adjustments.active_rnd(input);
    let lease = adjustments.active_lease(input);

    let final_adjusted_ebit = final_adjusted_ebit(input, rnd, lease);
    let adjusted_cash = adjusted_cash(input, adjustments.active_trapped_cash(input));
    let adjusted_bv_of_debt = adjusted_bv_of_debt(input, lease, input.convertible_book_value());
    let market_value_of_debt = market_value_of_debt(
        input,
        adjusted_bv_of_debt,
        lease,
        adjustments
            .cost_of_debt
            .as_ref()
            .map(|c| c.after_tax_cost_of_debt),
    )?;

    Ok(NormalizedFinancials {
        final_adjusted_ebit,
        adjusted_cash,
        adjusted_bv_of_debt,
        market_value_of_debt,
    })
}

/// Recompute a single final field without touching the others.
pub fn normalize_field(
    field: FinalField,
    input: &ValuationInput,
    adjustments: &AdjustmentOutputs,
) -> DcfResult<Money> {
    let lease = adjustments.active_lease(input);
    match field {
        FinalField::FinalAdjustedEbit => Ok(final_adjusted_ebit(
            input,
            adjustments.active_rnd(input),
            lease,
        )),
        FinalField::AdjustedCash => Ok(adjusted_cash(
            input,
            adjustments.active_trapped_cash(input),
        )),
        FinalField::AdjustedBvOfDebt => Ok(adjusted_bv_of_debt(
            input,
            lease,
            input.convertible_book_value(),
        )),
        FinalField::MarketValueOfDebt => {
            let bv = adjusted_bv_of_debt(input, lease, input.convertible_book_value());
            market_value_of_debt(
                input,
                bv,
                lease,
                adjustments
                    .cost_of_debt
                    .as_ref()
                    .map(|c| c.after_tax_cost_of_debt),
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
