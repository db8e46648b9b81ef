use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adjustments::schedule::{default_lease_schedule, default_rnd_schedule};
use crate::adjustments::{CapitalizationOptions, ExpenseScheduleEntry};
use crate::cost_of_debt::CostOfDebtSelection;
use crate::types::{Currency, Money, Multiple, Rate, Units, Years};

/// Everything the user enters for one valuation. Rates are fractions.
///
/// Serializes as a flat record; the two expense tables are the `rnd` and
/// `lease` arrays. Missing financial figures read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInput {
    // -- Identity ----------------------------------------------------------
    /// Company label as picked, e.g. "Apple Inc. (AAPL)".
    pub ticker: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_market: Option<String>,
    pub industry: String,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub values_in: Units,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // -- Macro assumptions -------------------------------------------------
    #[serde(default)]
    pub risk_free_rate: Rate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation: Option<Rate>,
    #[serde(default)]
    pub marginal_tax_rate: Rate,

    // -- Financials: trailing twelve months and prior year ------------------
    #[serde(default)]
    pub revenue_ttm: Money,
    #[serde(default)]
    pub revenue_prev_year: Money,
    #[serde(default)]
    pub ebit_ttm: Money,
    #[serde(default)]
    pub ebit_prev_year: Money,
    #[serde(default)]
    pub interest_expense_ttm: Money,
    #[serde(default)]
    pub interest_expense_prev_year: Money,
    #[serde(default)]
    pub cash_equivalent_ttm: Money,
    #[serde(default)]
    pub cash_equivalent_prev_year: Money,
    #[serde(default)]
    pub minority_interest_ttm: Money,
    #[serde(default)]
    pub minority_interest_prev_year: Money,
    #[serde(default)]
    pub cross_holdings_ttm: Money,
    #[serde(default)]
    pub cross_holdings_prev_year: Money,
    #[serde(default)]
    pub bv_of_equity_ttm: Money,
    #[serde(default)]
    pub bv_of_equity_prev_year: Money,
    #[serde(default)]
    pub bv_of_debt_ttm: Money,
    #[serde(default)]
    pub bv_of_debt_prev_year: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_maturity_of_debt: Option<Years>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares_outstanding: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_running_quarter: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<Money>,

    // -- Trapped cash --------------------------------------------------------
    #[serde(default)]
    pub cash_is_trapped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trapped_cash_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_country_tax_rate: Option<Rate>,

    // -- R&D capitalization ------------------------------------------------------
    #[serde(default)]
    pub capitalize_rnd: bool,
    #[serde(default = "default_rnd_schedule")]
    pub rnd: Vec<ExpenseScheduleEntry>,
    #[serde(default)]
    pub rnd_options: CapitalizationOptions,

    // -- Lease capitalization ----------------------------------------------------
    #[serde(default)]
    pub capitalize_lease: bool,
    #[serde(default = "default_lease_schedule")]
    pub lease: Vec<ExpenseScheduleEntry>,
    #[serde(default)]
    pub lease_options: CapitalizationOptions,

    // -- Pre-tax cost of debt ------------------------------------------------------
    #[serde(flatten)]
    pub cost_of_debt: CostOfDebtSelection,

    // -- Convertible debt ----------------------------------------------------------
    #[serde(default)]
    pub has_convertible_debt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bv_conv_debt: Option<Money>,
    /// Coupon rate on the convertible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_conv_debt: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conv_debt_maturity: Option<u32>,

    // -- Cost of capital -------------------------------------------------------------
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<Decimal>,
    /// Effective tax rate applied to forecast operating income.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Rate>,

    // -- Forecast --------------------------------------------------------------------
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_5y: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_10y: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_margin: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_to_capital: Option<Multiple>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_growth_rate: Option<Rate>,
}

impl Default for ValuationInput {
    fn default() -> Self {
        Self {
            ticker: String::new(),
            country: String::new(),
            primary_market: None,
            industry: String::new(),
            currency: Currency::USD,
            values_in: Units::Million,
            description: None,
            risk_free_rate: Decimal::ZERO,
            inflation: None,
            marginal_tax_rate: Decimal::ZERO,
            revenue_ttm: Decimal::ZERO,
            revenue_prev_year: Decimal::ZERO,
            ebit_ttm: Decimal::ZERO,
            ebit_prev_year: Decimal::ZERO,
            interest_expense_ttm: Decimal::ZERO,
            interest_expense_prev_year: Decimal::ZERO,
            cash_equivalent_ttm: Decimal::ZERO,
            cash_equivalent_prev_year: Decimal::ZERO,
            minority_interest_ttm: Decimal::ZERO,
            minority_interest_prev_year: Decimal::ZERO,
            cross_holdings_ttm: Decimal::ZERO,
            cross_holdings_prev_year: Decimal::ZERO,
            bv_of_equity_ttm: Decimal::ZERO,
            bv_of_equity_prev_year: Decimal::ZERO,
            bv_of_debt_ttm: Decimal::ZERO,
            bv_of_debt_prev_year: Decimal::ZERO,
            avg_maturity_of_debt: None,
            shares_outstanding: None,
            current_running_quarter: Some(1),
            current_price: None,
            cash_is_trapped: false,
            trapped_cash_amount: None,
            foreign_country_tax_rate: None,
            capitalize_rnd: false,
            rnd: default_rnd_schedule(),
            rnd_options: CapitalizationOptions::default(),
            capitalize_lease: false,
            lease: default_lease_schedule(),
            lease_options: CapitalizationOptions::default(),
            cost_of_debt: CostOfDebtSelection::default(),
            has_convertible_debt: false,
            bv_conv_debt: None,
            interest_conv_debt: None,
            conv_debt_maturity: None,
            erp: None,
            beta: None,
            tax_rate: None,
            growth_5y: None,
            growth_10y: None,
            target_margin: None,
            sales_to_capital: None,
            terminal_growth_rate: None,
        }
    }
}

impl ValuationInput {
    /// Split a "Company Name (TICK)" label into name and symbol.
    pub fn company_and_symbol(&self) -> (String, String) {
        let label = self.ticker.trim();
        let symbol = label
            .find('(')
            .and_then(|open| {
                label[open + 1..]
                    .find(')')
                    .map(|close| label[open + 1..open + 1 + close].trim().to_string())
            })
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| label.to_string());
        let name = label.split('(').next().unwrap_or(label).trim().to_string();
        (name, symbol)
    }

    /// Convertible book value counted as debt, when the module is on.
    pub fn convertible_book_value(&self) -> Option<Money> {
        if self.has_convertible_debt {
            Some(self.bv_conv_debt.unwrap_or(Decimal::ZERO))
        } else {
            None
        }
    }
}
