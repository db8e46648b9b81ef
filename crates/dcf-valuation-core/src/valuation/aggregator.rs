use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DcfError;
use crate::normalize::NormalizedFinancials;
use crate::types::{Money, Multiple, Rate};
use crate::DcfResult;

use super::cost_of_capital::{weighted_average_cost_of_capital, CapitalWeights};

const COMPUTATION: &str = "valuation";
const FORECAST_YEARS: u32 = 10;
const HIGH_GROWTH_YEARS: u32 = 5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Forecast drivers for the ten-year explicit period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastAssumptions {
    /// Revenue growth for years 1-5
    pub growth_5y: Rate,
    /// Revenue growth for years 6-10
    pub growth_10y: Rate,
    /// Operating margin reached by year 10
    pub target_margin: Rate,
    /// Revenue generated per unit of invested capital
    pub sales_to_capital: Multiple,
    /// Perpetual growth after year 10 (defaults to `growth_10y`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_growth_rate: Option<Rate>,
}

impl ForecastAssumptions {
    pub fn terminal_growth(&self) -> Rate {
        self.terminal_growth_rate.unwrap_or(self.growth_10y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateInput {
    pub normalized: NormalizedFinancials,
    /// Trailing revenue the forecast grows from
    pub base_revenue: Money,
    pub cost_of_equity: Rate,
    pub cost_of_debt_after_tax: Rate,
    pub capital_weights: CapitalWeights,
    pub forecast: ForecastAssumptions,
    /// Tax rate applied to positive operating income
    pub tax_rate: Rate,
    pub shares_outstanding: Decimal,
    pub current_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_holdings: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minority_interest: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastYear {
    pub year: u32,
    pub revenue_growth: Rate,
    pub revenue: Money,
    pub operating_margin: Rate,
    pub ebit: Money,
    pub nopat: Money,
    pub reinvestment: Money,
    pub fcff: Money,
    pub discount_factor: Rate,
    pub pv_fcff: Money,
}

/// Outcome of the valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub equity_value: Money,
    pub value_per_share: Money,
    pub current_price: Money,
    /// (value per share - price) / value per share
    pub implied_discount_pct: Rate,
    pub wacc: Rate,
    pub terminal_growth_rate: Rate,
    pub pv_of_fcff: Money,
    pub terminal_value: Money,
    pub pv_of_terminal: Money,
    /// PV(FCFF) + PV(terminal value)
    pub operating_assets_value: Money,
    /// PV of terminal value as a share of operating assets
    pub terminal_value_pct: Rate,
    pub projections: Vec<ForecastYear>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Ten-year FCFF valuation from normalized financials.
///
/// Revenue grows at `growth_5y` then `growth_10y`; margin moves linearly from
/// the base margin to `target_margin` by year 10; reinvestment is the change
/// in revenue over `sales_to_capital`. Cash flows and the terminal value are
/// discounted at WACC. Equity = operating assets - market value of debt +
/// adjusted cash + cross-holdings - minority interest.
pub fn aggregate(input: &AggregateInput) -> DcfResult<ValuationResult> {
    validate_aggregate_input(input)?;

    let wacc = weighted_average_cost_of_capital(
        input.cost_of_equity,
        input.cost_of_debt_after_tax,
        &input.capital_weights,
    )?;
    let g = input.forecast.terminal_growth();
    if wacc <= g {
        return Err(DcfError::domain(
            COMPUTATION,
            "wacc",
            wacc,
            format!("WACC must exceed the terminal growth rate ({g}) or the terminal value diverges"),
        ));
    }
    if wacc <= Decimal::NEGATIVE_ONE {
        return Err(DcfError::domain(
            COMPUTATION,
            "wacc",
            wacc,
            "discount rate must be greater than -100%",
        ));
    }

    let projections = build_projections(input, wacc)?;
    let pv_of_fcff = projections
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.pv_fcff))
        .ok_or_else(|| out_of_range("pv_of_fcff", wacc))?;
    let last = projections.last().ok_or_else(|| {
        DcfError::domain(COMPUTATION, "forecast_years", 0, "no projection years generated")
    })?;

    // --- Terminal value ---
    let terminal_revenue = mul(last.revenue, Decimal::ONE + g, "terminal_growth_rate")?;
    let terminal_ebit = mul(terminal_revenue, input.forecast.target_margin, "target_margin")?;
    let terminal_reinvestment = div(
        terminal_revenue - last.revenue,
        input.forecast.sales_to_capital,
        "sales_to_capital",
    )?;
    let terminal_fcff = sub(
        after_tax(terminal_ebit, input.tax_rate)?,
        terminal_reinvestment,
        "terminal_fcff",
    )?;
    let terminal_value = div(terminal_fcff, wacc - g, "wacc")?;
    let pv_of_terminal = mul(terminal_value, last.discount_factor, "wacc")?;

    let operating_assets_value = add(pv_of_fcff, pv_of_terminal, "operating_assets_value")?;
    let terminal_value_pct = if operating_assets_value.is_zero() {
        Decimal::ZERO
    } else {
        div(pv_of_terminal, operating_assets_value, "operating_assets_value")?
    };

    // --- Equity bridge ---
    let equity_value = [
        input.normalized.adjusted_cash,
        input.cross_holdings.unwrap_or(Decimal::ZERO),
    ]
    .into_iter()
    .try_fold(operating_assets_value, |acc, v| acc.checked_add(v))
    .and_then(|v| v.checked_sub(input.normalized.market_value_of_debt))
    .and_then(|v| v.checked_sub(input.minority_interest.unwrap_or(Decimal::ZERO)))
    .ok_or_else(|| out_of_range("equity_value", operating_assets_value))?;
    let value_per_share = div(equity_value, input.shares_outstanding, "shares_outstanding")?;

    if value_per_share.is_zero() {
        return Err(DcfError::domain(
            COMPUTATION,
            "value_per_share",
            value_per_share,
            "implied discount is undefined for a zero value per share",
        ));
    }
    let implied_discount_pct = div(
        sub(value_per_share, input.current_price, "current_price")?,
        value_per_share,
        "value_per_share",
    )?;

    log::debug!(
        "valuation: wacc {wacc}, operating assets {operating_assets_value}, value/share {value_per_share}"
    );

    Ok(ValuationResult {
        equity_value,
        value_per_share,
        current_price: input.current_price,
        implied_discount_pct,
        wacc,
        terminal_growth_rate: g,
        pv_of_fcff,
        terminal_value,
        pv_of_terminal,
        operating_assets_value,
        terminal_value_pct,
        projections,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_aggregate_input(input: &AggregateInput) -> DcfResult<()> {
    if input.shares_outstanding <= Decimal::ZERO {
        return Err(DcfError::domain(
            COMPUTATION,
            "shares_outstanding",
            input.shares_outstanding,
            "shares outstanding must be positive",
        ));
    }
    if input.base_revenue <= Decimal::ZERO {
        return Err(DcfError::domain(
            COMPUTATION,
            "base_revenue",
            input.base_revenue,
            "base revenue must be positive",
        ));
    }
    if input.forecast.sales_to_capital <= Decimal::ZERO {
        return Err(DcfError::domain(
            COMPUTATION,
            "sales_to_capital",
            input.forecast.sales_to_capital,
            "sales to capital ratio must be positive",
        ));
    }
    if input.tax_rate < Decimal::ZERO || input.tax_rate > Decimal::ONE {
        return Err(DcfError::domain(
            COMPUTATION,
            "tax_rate",
            input.tax_rate,
            "tax rate must be a fraction between 0 and 1",
        ));
    }
    Ok(())
}

fn out_of_range(field: &str, value: impl std::fmt::Display) -> DcfError {
    DcfError::domain(COMPUTATION, field, value, "result exceeds the representable range")
}

fn add(a: Decimal, b: Decimal, field: &str) -> DcfResult<Decimal> {
    a.checked_add(b).ok_or_else(|| out_of_range(field, b))
}

fn sub(a: Decimal, b: Decimal, field: &str) -> DcfResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| out_of_range(field, b))
}

fn mul(a: Decimal, b: Decimal, field: &str) -> DcfResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| out_of_range(field, b))
}

fn div(a: Decimal, b: Decimal, field: &str) -> DcfResult<Decimal> {
    a.checked_div(b).ok_or_else(|| out_of_range(field, b))
}

/// No tax is charged on operating losses.
fn after_tax(ebit: Money, tax_rate: Rate) -> DcfResult<Money> {
    if ebit > Decimal::ZERO {
        mul(ebit, Decimal::ONE - tax_rate, "tax_rate")
    } else {
        Ok(ebit)
    }
}

fn build_projections(input: &AggregateInput, wacc: Rate) -> DcfResult<Vec<ForecastYear>> {
    let forecast = &input.forecast;
    let base_margin = div(
        input.normalized.final_adjusted_ebit,
        input.base_revenue,
        "base_revenue",
    )?;
    let horizon = Decimal::from(FORECAST_YEARS);

    let mut projections = Vec::with_capacity(FORECAST_YEARS as usize);
    let mut prev_revenue = input.base_revenue;
    let mut compound = Decimal::ONE;

    for year in 1..=FORECAST_YEARS {
        let (growth, growth_field) = if year <= HIGH_GROWTH_YEARS {
            (forecast.growth_5y, "growth_5y")
        } else {
            (forecast.growth_10y, "growth_10y")
        };
        let revenue = mul(prev_revenue, Decimal::ONE + growth, growth_field)?;
        let operating_margin =
            base_margin + (forecast.target_margin - base_margin) * Decimal::from(year) / horizon;
        let ebit = mul(revenue, operating_margin, "target_margin")?;
        let nopat = after_tax(ebit, input.tax_rate)?;
        let reinvestment = div(
            sub(revenue, prev_revenue, growth_field)?,
            forecast.sales_to_capital,
            "sales_to_capital",
        )?;
        let fcff = sub(nopat, reinvestment, "reinvestment")?;

        // underflows to zero when 1 + WACC is tiny
        compound = mul(compound, Decimal::ONE + wacc, "wacc")?;
        let discount_factor = div(Decimal::ONE, compound, "wacc")?;
        let pv_fcff = mul(fcff, discount_factor, "wacc")?;

        projections.push(ForecastYear {
            year,
            revenue_growth: growth,
            revenue,
            operating_margin,
            ebit,
            nopat,
            reinvestment,
            fcff,
            discount_factor,
            pv_fcff,
        });

        prev_revenue = revenue;
    }

    Ok(projections)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> AggregateInput {
        AggregateInput {
            normalized: NormalizedFinancials {
                final_adjusted_ebit: dec!(1000),
                adjusted_cash: dec!(500),
                adjusted_bv_of_debt: dec!(2000),
                market_value_of_debt: dec!(1900),
            },
            base_revenue: dec!(10000),
            cost_of_equity: dec!(0.10),
            cost_of_debt_after_tax: dec!(0.04),
            capital_weights: CapitalWeights {
                equity: dec!(0.80),
                debt: dec!(0.20),
            },
            forecast: ForecastAssumptions {
                growth_5y: dec!(0.08),
                growth_10y: dec!(0.04),
                target_margin: dec!(0.15),
                sales_to_capital: dec!(2),
                terminal_growth_rate: Some(dec!(0.03)),
            },
            tax_rate: dec!(0.25),
            shares_outstanding: dec!(100),
            current_price: dec!(50),
            cross_holdings: None,
            minority_interest: None,
        }
    }

    #[test]
    fn test_projection_shape() {
        let r = aggregate(&sample_input()).unwrap();
        assert_eq!(r.projections.len(), 10);
        assert_eq!(r.wacc, dec!(0.088));

        let y1 = &r.projections[0];
        assert_eq!(y1.revenue, dec!(10800));
        // margin 10% -> 15% linearly: year 1 = 10.5%
        assert_eq!(y1.operating_margin, dec!(0.105));
        assert_eq!(y1.ebit, dec!(1134));
        assert_eq!(y1.nopat, dec!(850.5));
        assert_eq!(y1.reinvestment, dec!(400));
        assert_eq!(y1.fcff, dec!(450.5));

        assert_eq!(r.projections[5].revenue_growth, dec!(0.04));
        assert_eq!(r.projections[9].operating_margin, dec!(0.15));
    }

    #[test]
    fn test_equity_bridge() {
        let input = sample_input();
        let r = aggregate(&input).unwrap();
        assert_eq!(r.operating_assets_value, r.pv_of_fcff + r.pv_of_terminal);
        assert_eq!(r.equity_value, r.operating_assets_value - dec!(1900) + dec!(500));
        assert_eq!(r.value_per_share, r.equity_value / dec!(100));
        assert_eq!(
            r.implied_discount_pct,
            (r.value_per_share - dec!(50)) / r.value_per_share
        );
    }

    #[test]
    fn test_cross_holdings_and_minority_interest() {
        let base = aggregate(&sample_input()).unwrap();
        let mut input = sample_input();
        input.cross_holdings = Some(dec!(300));
        input.minority_interest = Some(dec!(100));
        let r = aggregate(&input).unwrap();
        assert_eq!(r.equity_value, base.equity_value + dec!(200));
    }

    #[test]
    fn test_wacc_not_above_terminal_growth() {
        let mut input = sample_input();
        input.forecast.terminal_growth_rate = Some(dec!(0.088));
        assert!(aggregate(&input).unwrap_err().is_domain());
        input.forecast.terminal_growth_rate = Some(dec!(0.12));
        assert!(aggregate(&input).unwrap_err().is_domain());
    }

    #[test]
    fn test_terminal_growth_defaults_to_growth_10y() {
        let mut input = sample_input();
        input.forecast.terminal_growth_rate = None;
        let r = aggregate(&input).unwrap();
        assert_eq!(r.terminal_growth_rate, dec!(0.04));
    }

    #[test]
    fn test_shares_must_be_positive() {
        let mut input = sample_input();
        input.shares_outstanding = Decimal::ZERO;
        assert!(aggregate(&input).unwrap_err().is_domain());
        input.shares_outstanding = dec!(-5);
        assert!(aggregate(&input).is_err());
    }

    #[test]
    fn test_operating_loss_not_taxed() {
        let mut input = sample_input();
        input.normalized.final_adjusted_ebit = dec!(-2000);
        input.forecast.target_margin = dec!(-0.20);
        let r = aggregate(&input).unwrap();
        let y1 = &r.projections[0];
        assert_eq!(y1.nopat, y1.ebit);
    }

    #[test]
    fn test_explosive_growth_is_domain_error() {
        let mut input = sample_input();
        input.forecast.growth_5y = dec!(100000000);
        assert!(aggregate(&input).unwrap_err().is_domain());
    }

    #[test]
    fn test_wacc_near_minus_one_is_domain_error() {
        let mut input = sample_input();
        input.capital_weights = CapitalWeights {
            equity: Decimal::ONE,
            debt: Decimal::ZERO,
        };
        input.cost_of_equity = dec!(-0.9999999999);
        input.forecast.terminal_growth_rate = Some(dec!(-0.99999999999));
        let err = aggregate(&input).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_idempotent() {
        let input = sample_input();
        assert_eq!(aggregate(&input).unwrap(), aggregate(&input).unwrap());
    }
}
