use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DcfError;
use crate::types::{Money, Multiple, Rate};
use crate::DcfResult;

use super::rating::{Rating, RatingSpreadTable};
use super::synthetic::{synthetic_rating, FirmSize};

const COMPUTATION: &str = "cost of debt";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which way the pre-tax cost of debt is obtained. Only the chosen method's
/// fields exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum CostOfDebtSelection {
    /// User-entered pre-tax cost of debt.
    Direct { pre_tax_cost_of_debt: Rate },
    /// Agency rating; spread looked up from the rating table.
    Rating { rating: Rating },
    /// Rating inferred from interest coverage.
    Synthetic {
        #[serde(default)]
        firm_size: FirmSize,
    },
}

impl Default for CostOfDebtSelection {
    fn default() -> Self {
        CostOfDebtSelection::Direct {
            pre_tax_cost_of_debt: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostOfDebtMethod {
    Direct,
    Rating,
    Synthetic,
}

impl CostOfDebtSelection {
    pub fn method(&self) -> CostOfDebtMethod {
        match self {
            Self::Direct { .. } => CostOfDebtMethod::Direct,
            Self::Rating { .. } => CostOfDebtMethod::Rating,
            Self::Synthetic { .. } => CostOfDebtMethod::Synthetic,
        }
    }
}

/// Market and company figures the resolver reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostOfDebtContext {
    pub risk_free_rate: Rate,
    pub marginal_tax_rate: Rate,
    /// Only read by the synthetic method.
    pub ebit: Money,
    /// Only read by the synthetic method.
    pub interest_expense: Money,
    /// Country default spread added on top of the company spread.
    #[serde(default)]
    pub country_spread: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOfDebt {
    pub method: CostOfDebtMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_coverage: Option<Multiple>,
    /// Company default spread used (rating and synthetic methods).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<Rate>,
    pub pre_tax_cost_of_debt: Rate,
    pub after_tax_cost_of_debt: Rate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Resolve pre-tax and after-tax cost of debt for the selected method.
///
/// After-tax = pre-tax * (1 - marginal tax rate) for every method.
pub fn resolve_cost_of_debt(
    selection: &CostOfDebtSelection,
    context: &CostOfDebtContext,
    spreads: &dyn RatingSpreadTable,
) -> DcfResult<CostOfDebt> {
    validate_context(context)?;
    let mut warnings = Vec::new();

    let (pre_tax, rating, coverage, spread) = match selection {
        CostOfDebtSelection::Direct {
            pre_tax_cost_of_debt,
        } => {
            if *pre_tax_cost_of_debt < Decimal::ZERO {
                return Err(DcfError::domain(
                    COMPUTATION,
                    "pre_tax_cost_of_debt",
                    pre_tax_cost_of_debt,
                    "cost of debt cannot be negative",
                ));
            }
            (*pre_tax_cost_of_debt, None, None, None)
        }
        CostOfDebtSelection::Rating { rating } => {
            let spread = lookup_spread(*rating, spreads, &mut warnings);
            (
                context.risk_free_rate + context.country_spread + spread,
                Some(*rating),
                None,
                Some(spread),
            )
        }
        CostOfDebtSelection::Synthetic { firm_size } => {
            let synthetic = synthetic_rating(context.ebit, context.interest_expense, *firm_size)?;
            warnings.push(synthetic.rationale.clone());
            let spread = lookup_spread(synthetic.rating, spreads, &mut warnings);
            (
                context.risk_free_rate + context.country_spread + spread,
                Some(synthetic.rating),
                Some(synthetic.interest_coverage),
                Some(spread),
            )
        }
    };

    let after_tax = pre_tax * (Decimal::ONE - context.marginal_tax_rate);
    log::debug!(
        "cost of debt via {:?}: pre-tax {pre_tax}, after-tax {after_tax}",
        selection.method()
    );

    Ok(CostOfDebt {
        method: selection.method(),
        rating,
        interest_coverage: coverage,
        spread,
        pre_tax_cost_of_debt: pre_tax,
        after_tax_cost_of_debt: after_tax,
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_context(context: &CostOfDebtContext) -> DcfResult<()> {
    if context.marginal_tax_rate < Decimal::ZERO || context.marginal_tax_rate > Decimal::ONE {
        return Err(DcfError::domain(
            COMPUTATION,
            "marginal_tax_rate",
            context.marginal_tax_rate,
            "tax rate must be a fraction between 0 and 1",
        ));
    }
    Ok(())
}

/// A missing spread degrades to zero rather than failing the calculation.
fn lookup_spread(
    rating: Rating,
    spreads: &dyn RatingSpreadTable,
    warnings: &mut Vec<String>,
) -> Rate {
    match spreads.spread(rating) {
        Some(s) => s,
        None => {
            log::warn!("no default spread for rating {rating}; using 0");
            warnings.push(format!("No default spread for rating {rating}; spread taken as 0"));
            Decimal::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
