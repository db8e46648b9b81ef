use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DcfError;
use crate::types::{Money, Rate};
use crate::DcfResult;

const WEIGHT_TOLERANCE: Decimal = dec!(0.01);

/// Inputs for a CAPM cost of equity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostOfEquityInput {
    pub risk_free_rate: Rate,
    /// Levered beta of equity
    pub beta: Decimal,
    pub equity_risk_premium: Rate,
    /// Country risk premium for emerging markets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_risk_premium: Option<Rate>,
}

/// Market-value weights of equity and debt in the capital structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalWeights {
    pub equity: Rate,
    pub debt: Rate,
}

impl CapitalWeights {
    /// Weights from the market value of equity and of debt.
    pub fn from_market_values(equity_value: Money, debt_value: Money) -> DcfResult<Self> {
        if equity_value < Decimal::ZERO || debt_value < Decimal::ZERO {
            return Err(DcfError::domain(
                "capital weights",
                "equity_value / debt_value",
                format!("{equity_value} / {debt_value}"),
                "market values cannot be negative",
            ));
        }
        let total = equity_value + debt_value;
        if total.is_zero() {
            return Err(DcfError::domain(
                "capital weights",
                "equity_value + debt_value",
                total,
                "total capital is zero",
            ));
        }
        Ok(CapitalWeights {
            equity: equity_value / total,
            debt: debt_value / total,
        })
    }
}

/// Ke = Rf + Beta * ERP (+ country risk premium)
pub fn cost_of_equity(input: &CostOfEquityInput) -> DcfResult<Rate> {
    if input.beta < Decimal::ZERO {
        return Err(DcfError::domain(
            "cost of equity",
            "beta",
            input.beta,
            "beta cannot be negative",
        ));
    }
    if input.equity_risk_premium < Decimal::ZERO {
        return Err(DcfError::domain(
            "cost of equity",
            "equity_risk_premium",
            input.equity_risk_premium,
            "equity risk premium cannot be negative",
        ));
    }
    let mut ke = input.risk_free_rate + input.beta * input.equity_risk_premium;
    if let Some(crp) = input.country_risk_premium {
        ke += crp;
    }
    Ok(ke)
}

/// WACC = Ke * We + Kd_at * Wd. Weights must sum to 1 within 0.01.
pub fn weighted_average_cost_of_capital(
    cost_of_equity: Rate,
    after_tax_cost_of_debt: Rate,
    weights: &CapitalWeights,
) -> DcfResult<Rate> {
    if weights.equity < Decimal::ZERO || weights.debt < Decimal::ZERO {
        return Err(DcfError::domain(
            "WACC",
            "capital_weights",
            format!("{} / {}", weights.equity, weights.debt),
            "capital structure weights cannot be negative",
        ));
    }
    let weight_sum = weights.equity + weights.debt;
    if (weight_sum - Decimal::ONE).abs() > WEIGHT_TOLERANCE {
        return Err(DcfError::domain(
            "WACC",
            "capital_weights",
            weight_sum,
            "capital structure weights must sum to 1.0",
        ));
    }
    Ok(cost_of_equity * weights.equity + after_tax_cost_of_debt * weights.debt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capm() {
        let ke = cost_of_equity(&CostOfEquityInput {
            risk_free_rate: dec!(0.042),
            beta: dec!(1.10),
            equity_risk_premium: dec!(0.055),
            country_risk_premium: None,
        })
        .unwrap();
        assert_eq!(ke, dec!(0.1025));
    }

    #[test]
    fn test_capm_with_country_premium() {
        let ke = cost_of_equity(&CostOfEquityInput {
            risk_free_rate: dec!(0.04),
            beta: dec!(1.0),
            equity_risk_premium: dec!(0.05),
            country_risk_premium: Some(dec!(0.02)),
        })
        .unwrap();
        assert_eq!(ke, dec!(0.11));
    }

    #[test]
    fn test_weights_from_market_values() {
        let w = CapitalWeights::from_market_values(dec!(7000), dec!(3000)).unwrap();
        assert_eq!(w.equity, dec!(0.7));
        assert_eq!(w.debt, dec!(0.3));
        assert!(CapitalWeights::from_market_values(Decimal::ZERO, Decimal::ZERO).is_err());
    }

    #[test]
    fn test_wacc() {
        let w = CapitalWeights {
            equity: dec!(0.70),
            debt: dec!(0.30),
        };
        let wacc = weighted_average_cost_of_capital(dec!(0.10), dec!(0.04), &w).unwrap();
        assert_eq!(wacc, dec!(0.082));
    }

    #[test]
    fn test_wacc_weights_must_sum_to_one() {
        let w = CapitalWeights {
            equity: dec!(0.60),
            debt: dec!(0.50),
        };
        let err = weighted_average_cost_of_capital(dec!(0.10), dec!(0.04), &w).unwrap_err();
        assert!(err.is_domain());
    }
}
