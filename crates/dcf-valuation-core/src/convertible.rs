use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DcfError;
use crate::time_value::{level_bond_flows, present_value, round_money, MAX_BOND_MATURITY_YEARS};
use crate::types::{Money, Rate};
use crate::DcfResult;

const COMPUTATION: &str = "convertible debt";

/// Split of a convertible into its straight-debt and equity-like parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertibleDebtValue {
    pub book_value: Money,
    pub annual_coupon: Money,
    /// Present value of coupons and principal at the market cost of debt.
    pub straight_debt_value: Money,
    /// Book value not explained by the straight-debt component.
    pub equity_component: Money,
}

/// Value the straight-debt component of a convertible as a level-coupon bond.
///
/// The embedded conversion option is not priced; whatever the book value
/// carries above the bond value is reported as the equity component.
pub fn value_convertible_debt(
    book_value: Money,
    coupon_rate: Rate,
    maturity_years: u32,
    market_cost_of_debt: Rate,
) -> DcfResult<ConvertibleDebtValue> {
    if book_value < Decimal::ZERO {
        return Err(DcfError::domain(
            COMPUTATION,
            "book_value",
            book_value,
            "book value cannot be negative",
        ));
    }
    if coupon_rate < Decimal::ZERO {
        return Err(DcfError::domain(
            COMPUTATION,
            "coupon_rate",
            coupon_rate,
            "coupon rate cannot be negative",
        ));
    }
    if maturity_years > MAX_BOND_MATURITY_YEARS {
        return Err(DcfError::domain(
            COMPUTATION,
            "maturity_years",
            maturity_years,
            "maturity exceeds 100 years",
        ));
    }

    let annual_coupon = book_value.checked_mul(coupon_rate).ok_or_else(|| {
        DcfError::domain(COMPUTATION, "coupon_rate", coupon_rate, "annual coupon out of range")
    })?;

    // Due now: nothing left to discount.
    let straight = if maturity_years == 0 {
        book_value
    } else {
        let flows = level_bond_flows(annual_coupon, book_value, maturity_years);
        present_value(&flows, market_cost_of_debt)?
    };
    let straight_debt_value = round_money(straight);

    Ok(ConvertibleDebtValue {
        book_value,
        annual_coupon,
        straight_debt_value,
        equity_component: book_value - straight_debt_value,
    })
}
