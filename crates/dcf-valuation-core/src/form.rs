//! The flat camelCase record the valuation form submits.
//!
//! Rates on the form are percentages as typed (5 = 5%); everything past
//! [`ValuationForm::into_input`] works in fractions.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::adjustments::schedule::{default_lease_schedule, default_rnd_schedule};
use crate::adjustments::ExpenseScheduleEntry;
use crate::cost_of_debt::{CostOfDebtMethod, CostOfDebtSelection, FirmSize, Rating};
use crate::error::DcfError;
use crate::input::ValuationInput;
use crate::normalize::{AdjustmentOutputs, NormalizedFinancials};
use crate::time_value::MAX_BOND_MATURITY_YEARS;
use crate::types::{fraction_to_pct, pct_to_fraction, Currency, Units};
use crate::DcfResult;

/// One row of the R&D or lease table as the form holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormExpenseRow {
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationForm {
    // -- General -------------------------------------------------------------
    pub ticker: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_market: Option<String>,
    pub industry: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub values_in: Units,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_free_rate: Option<Decimal>,
    /// Percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation: Option<Decimal>,
    /// Percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marginal_tax_rate: Option<Decimal>,

    // -- Financials ------------------------------------------------------------
    #[serde(rename = "revenueTTM", default, skip_serializing_if = "Option::is_none")]
    pub revenue_ttm: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_prev_year: Option<Decimal>,
    #[serde(rename = "ebitTTM", default, skip_serializing_if = "Option::is_none")]
    pub ebit_ttm: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebit_prev_year: Option<Decimal>,
    #[serde(rename = "interestExpenseTTM", default, skip_serializing_if = "Option::is_none")]
    pub interest_expense_ttm: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_expense_prev_year: Option<Decimal>,
    #[serde(rename = "cashEquivalentTTM", default, skip_serializing_if = "Option::is_none")]
    pub cash_equivalent_ttm: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_equivalent_prev_year: Option<Decimal>,
    #[serde(rename = "minorityInterestTTM", default, skip_serializing_if = "Option::is_none")]
    pub minority_interest_ttm: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minority_interest_prev_year: Option<Decimal>,
    #[serde(rename = "crossHoldingsTTM", default, skip_serializing_if = "Option::is_none")]
    pub cross_holdings_ttm: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_holdings_prev_year: Option<Decimal>,
    #[serde(rename = "bvOfEquityTTM", default, skip_serializing_if = "Option::is_none")]
    pub bv_of_equity_ttm: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bv_of_equity_prev_year: Option<Decimal>,
    #[serde(rename = "bvOfDebtTTM", default, skip_serializing_if = "Option::is_none")]
    pub bv_of_debt_ttm: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bv_of_debt_prev_year: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_maturity_of_debt: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares_outstanding: Option<Decimal>,
    /// "1" to "4"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_running_quarter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<Decimal>,

    // -- Trapped cash ------------------------------------------------------------
    #[serde(default)]
    pub cash_is_trapped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trapped_cash_amount: Option<Decimal>,
    /// Percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_country_tax_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trapped_cash_value: Option<Decimal>,

    // -- R&D -------------------------------------------------------------------------
    #[serde(rename = "capitalizeRandD", default)]
    pub capitalize_rnd: bool,
    #[serde(rename = "randdExpenses", default)]
    pub rnd_expenses: Vec<FormExpenseRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_ebit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unamortized_amount: Option<Decimal>,

    // -- Leases ----------------------------------------------------------------------
    #[serde(default)]
    pub capitalize_lease: bool,
    #[serde(default)]
    pub lease_expenses: Vec<FormExpenseRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ebit_adj_to_lease: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_expenses_adj_to_lease: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_adj_to_lease: Option<Decimal>,

    // -- Cost of debt ------------------------------------------------------------------
    #[serde(default = "default_method")]
    pub cost_of_debt_method: CostOfDebtMethod,
    /// Percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretax_cod_direct: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod_company_type: Option<FirmSize>,
    /// Percent, resolved pre-tax cost of debt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretax_cod_calculated: Option<Decimal>,
    /// Percent, resolved after-tax cost of debt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod_calculated: Option<Decimal>,

    // -- Convertible debt --------------------------------------------------------------
    #[serde(default)]
    pub has_convertible_debt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bv_conv_debt: Option<Decimal>,
    /// Percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_conv_debt: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conv_debt_maturity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv_conv_debt: Option<Decimal>,

    // -- Final fields ----------------------------------------------------------------------
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_adjusted_ebit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_cash: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_bv_of_debt: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_value_of_debt: Option<Decimal>,

    // -- Cost of capital and forecast (percent except beta and sales/capital) ----------------
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth5y: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth10y: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_margin: Option<Decimal>,
    #[serde(rename = "salesCapital", default, skip_serializing_if = "Option::is_none")]
    pub sales_to_capital: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_growth_rate: Option<Decimal>,
}

fn default_method() -> CostOfDebtMethod {
    CostOfDebtMethod::Direct
}

fn pct(value: Option<Decimal>) -> Option<Decimal> {
    value.map(pct_to_fraction)
}

fn to_pct(value: Option<Decimal>) -> Option<Decimal> {
    value.map(fraction_to_pct)
}

fn rows_to_schedule(
    rows: Vec<FormExpenseRow>,
    default: fn() -> Vec<ExpenseScheduleEntry>,
) -> Vec<ExpenseScheduleEntry> {
    if rows.is_empty() {
        return default();
    }
    rows.into_iter()
        .map(|r| ExpenseScheduleEntry::new(r.year, r.expense))
        .collect()
}

fn schedule_to_rows(schedule: &[ExpenseScheduleEntry]) -> Vec<FormExpenseRow> {
    schedule
        .iter()
        .map(|e| FormExpenseRow {
            year: e.period.clone(),
            expense: e.amount,
        })
        .collect()
}

fn parse_quarter(raw: &str) -> DcfResult<u8> {
    let trimmed = raw.trim();
    let digits = trimmed.trim_start_matches(&['Q', 'q'][..]);
    match digits.parse::<u8>() {
        Ok(q @ 1..=4) => Ok(q),
        _ => Err(DcfError::InvalidInput {
            field: "currentRunningQuarter".into(),
            reason: format!("'{trimmed}' is not a quarter between 1 and 4"),
        }),
    }
}

fn parse_maturity(raw: Decimal) -> DcfResult<u32> {
    if raw < Decimal::ZERO || !raw.fract().is_zero() {
        return Err(DcfError::InvalidInput {
            field: "convDebtMaturity".into(),
            reason: format!("{raw} is not a whole number of years"),
        });
    }
    raw.to_u32()
        .filter(|years| *years <= MAX_BOND_MATURITY_YEARS)
        .ok_or_else(|| DcfError::InvalidInput {
            field: "convDebtMaturity".into(),
            reason: format!("{raw} years is out of range"),
        })
}

impl ValuationForm {
    /// Convert to engine input: percentages become fractions, missing figures zero.
    pub fn into_input(self) -> DcfResult<ValuationInput> {
        let cost_of_debt = match self.cost_of_debt_method {
            CostOfDebtMethod::Direct => CostOfDebtSelection::Direct {
                pre_tax_cost_of_debt: pct(self.pretax_cod_direct).unwrap_or(Decimal::ZERO),
            },
            CostOfDebtMethod::Rating => {
                let label = self.cod_rating.as_deref().ok_or_else(|| DcfError::InvalidInput {
                    field: "codRating".into(),
                    reason: "a rating is required for the rating method".into(),
                })?;
                CostOfDebtSelection::Rating {
                    rating: Rating::from_str(label)?,
                }
            }
            CostOfDebtMethod::Synthetic => CostOfDebtSelection::Synthetic {
                firm_size: self.cod_company_type.unwrap_or_default(),
            },
        };

        let current_running_quarter = self
            .current_running_quarter
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .map(parse_quarter)
            .transpose()?;
        let conv_debt_maturity = self.conv_debt_maturity.map(parse_maturity).transpose()?;
        let zero = Decimal::ZERO;

        Ok(ValuationInput {
            ticker: self.ticker,
            country: self.country,
            primary_market: self.primary_market,
            industry: self.industry,
            currency: Currency::from(self.currency),
            values_in: self.values_in,
            description: self.description,
            risk_free_rate: pct(self.risk_free_rate).unwrap_or(zero),
            inflation: pct(self.inflation),
            marginal_tax_rate: pct(self.marginal_tax_rate).unwrap_or(zero),
            revenue_ttm: self.revenue_ttm.unwrap_or(zero),
            revenue_prev_year: self.revenue_prev_year.unwrap_or(zero),
            ebit_ttm: self.ebit_ttm.unwrap_or(zero),
            ebit_prev_year: self.ebit_prev_year.unwrap_or(zero),
            interest_expense_ttm: self.interest_expense_ttm.unwrap_or(zero),
            interest_expense_prev_year: self.interest_expense_prev_year.unwrap_or(zero),
            cash_equivalent_ttm: self.cash_equivalent_ttm.unwrap_or(zero),
            cash_equivalent_prev_year: self.cash_equivalent_prev_year.unwrap_or(zero),
            minority_interest_ttm: self.minority_interest_ttm.unwrap_or(zero),
            minority_interest_prev_year: self.minority_interest_prev_year.unwrap_or(zero),
            cross_holdings_ttm: self.cross_holdings_ttm.unwrap_or(zero),
            cross_holdings_prev_year: self.cross_holdings_prev_year.unwrap_or(zero),
            bv_of_equity_ttm: self.bv_of_equity_ttm.unwrap_or(zero),
            bv_of_equity_prev_year: self.bv_of_equity_prev_year.unwrap_or(zero),
            bv_of_debt_ttm: self.bv_of_debt_ttm.unwrap_or(zero),
            bv_of_debt_prev_year: self.bv_of_debt_prev_year.unwrap_or(zero),
            avg_maturity_of_debt: self.avg_maturity_of_debt,
            shares_outstanding: self.shares_outstanding,
            current_running_quarter,
            current_price: self.current_price,
            cash_is_trapped: self.cash_is_trapped,
            trapped_cash_amount: self.trapped_cash_amount,
            foreign_country_tax_rate: pct(self.foreign_country_tax_rate),
            capitalize_rnd: self.capitalize_rnd,
            rnd: rows_to_schedule(self.rnd_expenses, default_rnd_schedule),
            rnd_options: Default::default(),
            capitalize_lease: self.capitalize_lease,
            lease: rows_to_schedule(self.lease_expenses, default_lease_schedule),
            lease_options: Default::default(),
            cost_of_debt,
            has_convertible_debt: self.has_convertible_debt,
            bv_conv_debt: self.bv_conv_debt,
            interest_conv_debt: pct(self.interest_conv_debt),
            conv_debt_maturity,
            erp: pct(self.erp),
            beta: self.beta,
            tax_rate: pct(self.tax_rate),
            growth_5y: pct(self.growth5y),
            growth_10y: pct(self.growth10y),
            target_margin: pct(self.target_margin),
            sales_to_capital: self.sales_to_capital,
            terminal_growth_rate: pct(self.terminal_growth_rate),
        })
    }

    /// Fill the read-only output fields the form displays.
    pub fn with_outputs(
        mut self,
        adjustments: &AdjustmentOutputs,
        normalized: Option<&NormalizedFinancials>,
    ) -> Self {
        self.trapped_cash_value = adjustments.trapped_cash_value;
        if let Some(rnd) = &adjustments.rnd {
            self.adjusted_ebit = Some(rnd.adjusted_operating_income);
            self.unamortized_amount = Some(rnd.unamortized_asset);
        }
        if let Some(lease) = &adjustments.lease {
            self.ebit_adj_to_lease = Some(lease.ebit_adjustment);
            self.interest_expenses_adj_to_lease = Some(lease.interest_expense_adjustment);
            self.debt_adj_to_lease = Some(lease.debt_adjustment);
        }
        if let Some(cod) = &adjustments.cost_of_debt {
            self.pretax_cod_calculated = Some(fraction_to_pct(cod.pre_tax_cost_of_debt));
            self.cod_calculated = Some(fraction_to_pct(cod.after_tax_cost_of_debt));
        }
        self.pv_conv_debt = adjustments
            .convertible
            .as_ref()
            .map(|c| c.straight_debt_value);
        if let Some(n) = normalized {
            self.final_adjusted_ebit = Some(n.final_adjusted_ebit);
            self.adjusted_cash = Some(n.adjusted_cash);
            self.adjusted_bv_of_debt = Some(n.adjusted_bv_of_debt);
            self.market_value_of_debt = Some(n.market_value_of_debt);
        }
        self
    }
}

impl ValuationInput {
    /// The form record for this input, rates as percentages.
    pub fn to_form(&self) -> ValuationForm {
        let (cost_of_debt_method, pretax_cod_direct, cod_rating, cod_company_type) =
            match &self.cost_of_debt {
                CostOfDebtSelection::Direct {
                    pre_tax_cost_of_debt,
                } => (
                    CostOfDebtMethod::Direct,
                    Some(fraction_to_pct(*pre_tax_cost_of_debt)),
                    None,
                    None,
                ),
                CostOfDebtSelection::Rating { rating } => (
                    CostOfDebtMethod::Rating,
                    None,
                    Some(rating.to_string()),
                    None,
                ),
                CostOfDebtSelection::Synthetic { firm_size } => {
                    (CostOfDebtMethod::Synthetic, None, None, Some(*firm_size))
                }
            };

        ValuationForm {
            ticker: self.ticker.clone(),
            country: self.country.clone(),
            primary_market: self.primary_market.clone(),
            industry: self.industry.clone(),
            currency: self.currency.code().to_string(),
            values_in: self.values_in,
            description: self.description.clone(),
            risk_free_rate: Some(fraction_to_pct(self.risk_free_rate)),
            inflation: to_pct(self.inflation),
            marginal_tax_rate: Some(fraction_to_pct(self.marginal_tax_rate)),
            revenue_ttm: Some(self.revenue_ttm),
            revenue_prev_year: Some(self.revenue_prev_year),
            ebit_ttm: Some(self.ebit_ttm),
            ebit_prev_year: Some(self.ebit_prev_year),
            interest_expense_ttm: Some(self.interest_expense_ttm),
            interest_expense_prev_year: Some(self.interest_expense_prev_year),
            cash_equivalent_ttm: Some(self.cash_equivalent_ttm),
            cash_equivalent_prev_year: Some(self.cash_equivalent_prev_year),
            minority_interest_ttm: Some(self.minority_interest_ttm),
            minority_interest_prev_year: Some(self.minority_interest_prev_year),
            cross_holdings_ttm: Some(self.cross_holdings_ttm),
            cross_holdings_prev_year: Some(self.cross_holdings_prev_year),
            bv_of_equity_ttm: Some(self.bv_of_equity_ttm),
            bv_of_equity_prev_year: Some(self.bv_of_equity_prev_year),
            bv_of_debt_ttm: Some(self.bv_of_debt_ttm),
            bv_of_debt_prev_year: Some(self.bv_of_debt_prev_year),
            avg_maturity_of_debt: self.avg_maturity_of_debt,
            shares_outstanding: self.shares_outstanding,
            current_running_quarter: self.current_running_quarter.map(|q| q.to_string()),
            current_price: self.current_price,
            cash_is_trapped: self.cash_is_trapped,
            trapped_cash_amount: self.trapped_cash_amount,
            foreign_country_tax_rate: to_pct(self.foreign_country_tax_rate),
            trapped_cash_value: None,
            capitalize_rnd: self.capitalize_rnd,
            rnd_expenses: schedule_to_rows(&self.rnd),
            adjusted_ebit: None,
            unamortized_amount: None,
            capitalize_lease: self.capitalize_lease,
            lease_expenses: schedule_to_rows(&self.lease),
            ebit_adj_to_lease: None,
            interest_expenses_adj_to_lease: None,
            debt_adj_to_lease: None,
            cost_of_debt_method,
            pretax_cod_direct,
            cod_rating,
            cod_company_type,
            pretax_cod_calculated: None,
            cod_calculated: None,
            has_convertible_debt: self.has_convertible_debt,
            bv_conv_debt: self.bv_conv_debt,
            interest_conv_debt: to_pct(self.interest_conv_debt),
            conv_debt_maturity: self.conv_debt_maturity.map(Decimal::from),
            pv_conv_debt: None,
            final_adjusted_ebit: None,
            adjusted_cash: None,
            adjusted_bv_of_debt: None,
            market_value_of_debt: None,
            erp: to_pct(self.erp),
            beta: self.beta,
            tax_rate: to_pct(self.tax_rate),
            growth5y: to_pct(self.growth_5y),
            growth10y: to_pct(self.growth_10y),
            target_margin: to_pct(self.target_margin),
            sales_to_capital: self.sales_to_capital,
            terminal_growth_rate: to_pct(self.terminal_growth_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SUBMITTED: &str = r#"{
        "ticker": "Apple Inc. (AAPL)",
        "country": "United States",
        "industry": "Technology Hardware",
        "currency": "USD",
        "valuesIn": "Million",
        "riskFreeRate": 4.2,
        "marginalTaxRate": 25,
        "revenueTTM": 383285,
        "ebitTTM": 114301,
        "interestExpenseTTM": 3933,
        "cashEquivalentTTM": 61555,
        "currentRunningQuarter": "2",
        "cashIsTrapped": true,
        "trappedCashAmount": 1000,
        "foreignCountryTaxRate": 10,
        "capitalizeRandD": true,
        "randdExpenses": [
            { "year": "Current Year", "expense": 500 },
            { "year": "1 year(s) before", "expense": 400 }
        ],
        "costOfDebtMethod": "rating",
        "codRating": "Aa1",
        "growth5y": 8,
        "salesCapital": 1.5
    }"#;

    #[test]
    fn test_percent_fields_become_fractions() {
        let form: ValuationForm = serde_json::from_str(SUBMITTED).unwrap();
        let input = form.into_input().unwrap();
        assert_eq!(input.risk_free_rate, dec!(0.042));
        assert_eq!(input.marginal_tax_rate, dec!(0.25));
        assert_eq!(input.foreign_country_tax_rate, Some(dec!(0.10)));
        assert_eq!(input.growth_5y, Some(dec!(0.08)));
        assert_eq!(input.sales_to_capital, Some(dec!(1.5)));
        assert_eq!(input.ebit_ttm, dec!(114301));
        assert_eq!(input.current_running_quarter, Some(2));
        assert_eq!(input.rnd[1].amount, Some(dec!(400)));
        assert_eq!(input.lease.len(), 2);
        assert_eq!(
            input.cost_of_debt,
            CostOfDebtSelection::Rating { rating: Rating::Aa1 }
        );
    }

    #[test]
    fn test_back_to_form_restores_percentages() {
        let form: ValuationForm = serde_json::from_str(SUBMITTED).unwrap();
        let input = form.into_input().unwrap();
        let again = input.to_form();
        assert_eq!(again.risk_free_rate, Some(dec!(4.2)));
        assert_eq!(again.foreign_country_tax_rate, Some(dec!(10)));
        assert_eq!(again.cod_rating.as_deref(), Some("Aa1"));
        assert_eq!(again.into_input().unwrap(), input);
    }

    #[test]
    fn test_rating_method_needs_a_rating() {
        let mut form: ValuationForm = serde_json::from_str(SUBMITTED).unwrap();
        form.cod_rating = None;
        assert!(matches!(
            form.into_input().unwrap_err(),
            DcfError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_bad_quarter_and_maturity_rejected() {
        let mut form: ValuationForm = serde_json::from_str(SUBMITTED).unwrap();
        form.current_running_quarter = Some("5".into());
        assert!(form.clone().into_input().is_err());

        form.current_running_quarter = Some("Q3".into());
        form.conv_debt_maturity = Some(dec!(2.5));
        assert!(form.clone().into_input().is_err());

        form.conv_debt_maturity = Some(dec!(4294967295));
        assert!(form.clone().into_input().is_err());

        form.conv_debt_maturity = Some(dec!(7));
        assert_eq!(form.into_input().unwrap().conv_debt_maturity, Some(7));
    }

    #[test]
    fn test_kilo_units_label() {
        let mut form: ValuationForm = serde_json::from_str(SUBMITTED).unwrap();
        form.values_in = Units::Thousand;
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["valuesIn"], "Kilo");
        assert_eq!(json["revenueTTM"], "383285");
    }
}
