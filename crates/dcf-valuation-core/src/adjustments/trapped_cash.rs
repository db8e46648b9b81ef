use rust_decimal::Decimal;

use crate::error::DcfError;
use crate::time_value::round_money;
use crate::types::{money_from_f64, Money, Rate};
use crate::DcfResult;

const COMPUTATION: &str = "trapped cash";

/// Tax cost of repatriating cash held abroad.
///
/// `amount * (domestic_tax_rate - foreign_tax_rate)`, rounded to cents. Both
/// rates are fractions. A negative value means repatriation is a tax benefit.
pub fn compute_trapped_cash_value(
    amount: Money,
    domestic_tax_rate: Rate,
    foreign_tax_rate: Rate,
) -> DcfResult<Money> {
    validate_tax_rate("domestic_tax_rate", domestic_tax_rate)?;
    validate_tax_rate("foreign_tax_rate", foreign_tax_rate)?;

    Ok(round_money(amount * (domestic_tax_rate - foreign_tax_rate)))
}

/// Same as [`compute_trapped_cash_value`] for amounts arriving as `f64`.
pub fn compute_trapped_cash_value_f64(
    amount: f64,
    domestic_tax_rate: Rate,
    foreign_tax_rate: Rate,
) -> DcfResult<Money> {
    let amount = money_from_f64(COMPUTATION, "amount", amount)?;
    compute_trapped_cash_value(amount, domestic_tax_rate, foreign_tax_rate)
}

fn validate_tax_rate(field: &str, rate: Rate) -> DcfResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(DcfError::domain(
            COMPUTATION,
            field,
            rate,
            "tax rate must be a fraction between 0 and 1",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trapped_cash_leakage() {
        let v = compute_trapped_cash_value(dec!(1000), dec!(0.30), dec!(0.10)).unwrap();
        assert_eq!(v, dec!(210.00));
    }

    #[test]
    fn test_trapped_cash_benefit_is_negative() {
        let v = compute_trapped_cash_value(dec!(1000), dec!(0.10), dec!(0.25)).unwrap();
        assert_eq!(v, dec!(-150));
    }

    #[test]
    fn test_trapped_cash_rounds_to_cents() {
        let v = compute_trapped_cash_value(dec!(333.333), dec!(0.21), dec!(0.125)).unwrap();
        // 333.333 * 0.085 = 28.333305
        assert_eq!(v, dec!(28.33));
    }

    #[test]
    fn test_trapped_cash_rejects_percentages() {
        let err = compute_trapped_cash_value(dec!(1000), dec!(30), dec!(0.10)).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_trapped_cash_non_finite_amount() {
        let err = compute_trapped_cash_value_f64(f64::NAN, dec!(0.3), dec!(0.1)).unwrap_err();
        assert!(err.is_domain());
        let ok = compute_trapped_cash_value_f64(1000.0, dec!(0.3), dec!(0.1)).unwrap();
        assert_eq!(ok, dec!(210));
    }
}
