use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;

use std::fmt::Display;

use crate::error::DcfError;
use crate::types::{Money, Rate, Years};
use crate::DcfResult;

/// Longest bond maturity the bond pricers accept.
pub const MAX_BOND_MATURITY_YEARS: u32 = 100;

fn out_of_range(computation: &str, field: &str, value: impl Display) -> DcfError {
    DcfError::domain(computation, field, value, "discount factor out of range")
}

/// Present value of a series of end-of-period cash flows.
///
/// The first element is discounted one full period: PV = Σ CF_i / (1+r)^i, i = 1..n.
pub fn present_value(cash_flows: &[Money], periodic_rate: Rate) -> DcfResult<Money> {
    if periodic_rate <= dec!(-1) {
        return Err(DcfError::domain(
            "present value",
            "periodic_rate",
            periodic_rate,
            "discount rate must be greater than -100%",
        ));
    }

    let one_plus_r = Decimal::ONE + periodic_rate;
    let mut discount = Decimal::ONE;
    let mut result = Decimal::ZERO;

    let overflow = || out_of_range("present value", "periodic_rate", periodic_rate);
    for cf in cash_flows {
        discount = discount.checked_mul(one_plus_r).ok_or_else(overflow)?;
        let pv = cf.checked_div(discount).ok_or_else(overflow)?;
        result = result.checked_add(pv).ok_or_else(overflow)?;
    }

    Ok(result)
}

/// Cash flows of a level-coupon bond: `periods` coupons, face repaid with the last one.
pub fn level_bond_flows(coupon: Money, face: Money, periods: u32) -> Vec<Money> {
    let mut flows = vec![coupon; periods as usize];
    if let Some(last) = flows.last_mut() {
        *last += face;
    }
    flows
}

/// Value of a level-coupon bond with a possibly fractional maturity.
///
/// PV = coupon * (1 - (1+r)^-n) / r + face / (1+r)^n. Agrees with
/// `present_value(level_bond_flows(..))` for whole years.
pub fn bond_value(coupon: Money, face: Money, years: Years, rate: Rate) -> DcfResult<Money> {
    if rate <= dec!(-1) {
        return Err(DcfError::domain(
            "bond value",
            "rate",
            rate,
            "discount rate must be greater than -100%",
        ));
    }
    if years < Decimal::ZERO {
        return Err(DcfError::domain(
            "bond value",
            "years",
            years,
            "maturity cannot be negative",
        ));
    }
    if years > Decimal::from(MAX_BOND_MATURITY_YEARS) {
        return Err(DcfError::domain(
            "bond value",
            "years",
            years,
            "maturity exceeds 100 years",
        ));
    }
    let overflow = || out_of_range("bond value", "rate", rate);
    if rate.is_zero() {
        return coupon
            .checked_mul(years)
            .and_then(|c| c.checked_add(face))
            .ok_or_else(overflow);
    }

    let growth = (Decimal::ONE + rate)
        .checked_powd(years)
        .filter(|g| !g.is_zero())
        .ok_or_else(overflow)?;
    let discount = Decimal::ONE.checked_div(growth).ok_or_else(overflow)?;
    let annuity_factor = (Decimal::ONE - discount)
        .checked_div(rate)
        .ok_or_else(overflow)?;
    coupon
        .checked_mul(annuity_factor)
        .and_then(|c| face.checked_mul(discount).and_then(|f| c.checked_add(f)))
        .ok_or_else(overflow)
}

/// Arithmetic mean; zero for an empty slice.
pub fn average(values: &[Money]) -> Money {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().sum::<Decimal>() / Decimal::from(values.len() as u64)
}

/// Round to cents, midpoint away from zero.
pub fn round_money(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_present_value_empty() {
        assert_eq!(present_value(&[], dec!(0.08)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_present_value_zero_rate_is_sum() {
        let cfs = vec![dec!(100), dec!(250.5), dec!(-40)];
        assert_eq!(present_value(&cfs, Decimal::ZERO).unwrap(), dec!(310.5));
    }

    #[test]
    fn test_present_value_discounts_first_flow() {
        let result = present_value(&[dec!(110)], dec!(0.10)).unwrap();
        assert_eq!(result, dec!(100));
    }

    #[test]
    fn test_present_value_rejects_minus_one() {
        assert!(present_value(&[dec!(1)], dec!(-1)).unwrap_err().is_domain());
        assert!(present_value(&[dec!(1)], dec!(-1.5)).is_err());
    }

    #[test]
    fn test_present_value_tiny_discount_factor_is_domain_error() {
        // 0.01^20 is below the smallest representable decimal
        let err = present_value(&[dec!(1); 20], dec!(-0.99)).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_present_value_huge_discount_factor_is_domain_error() {
        // 11^30 exceeds the decimal range
        let err = present_value(&[dec!(1); 30], dec!(10)).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_level_bond_flows() {
        let flows = level_bond_flows(dec!(50), dec!(1000), 3);
        assert_eq!(flows, vec![dec!(50), dec!(50), dec!(1050)]);
        assert!(level_bond_flows(dec!(50), dec!(1000), 0).is_empty());
    }

    #[test]
    fn test_bond_value_matches_discrete_flows() {
        let closed = bond_value(dec!(60), dec!(1000), dec!(7), dec!(0.045)).unwrap();
        let discrete =
            present_value(&level_bond_flows(dec!(60), dec!(1000), 7), dec!(0.045)).unwrap();
        assert!((closed - discrete).abs() < dec!(0.0001));
    }

    #[test]
    fn test_bond_value_at_par() {
        let v = bond_value(dec!(50), dec!(1000), dec!(5), dec!(0.05)).unwrap();
        assert!((v - dec!(1000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_bond_value_overflow_is_domain_error() {
        let err = bond_value(dec!(50), dec!(1000), dec!(100), dec!(1.5)).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_bond_value_rejects_long_maturity() {
        let err = bond_value(dec!(50), dec!(1000), dec!(101), dec!(0.05)).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(round_money(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round_money(dec!(2.344)), dec!(2.34));
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[dec!(400), dec!(300)]), dec!(350));
        assert_eq!(average(&[]), Decimal::ZERO);
    }
}
