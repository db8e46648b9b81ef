use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::adjustments::{
    capitalize, capitalize_leases, compute_trapped_cash_value, CapitalizationResult,
    LeaseAdjustment,
};
use crate::convertible::{value_convertible_debt, ConvertibleDebtValue};
use crate::cost_of_debt::{resolve_cost_of_debt, CostOfDebt, CostOfDebtContext, CostOfDebtSelection};
use crate::error::DcfError;
use crate::input::ValuationInput;
use crate::normalize::{normalize, normalize_field, AdjustmentOutputs, FinalField, NormalizedFinancials};
use crate::reference_data::{ReferenceData, ReferenceSpreads};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::valuation::{
    aggregate, cost_of_equity, AggregateInput, CapitalWeights, CostOfEquityInput,
    ForecastAssumptions, ValuationResult,
};
use crate::DcfResult;

const TERMINAL_VALUE_WARNING_PCT: Decimal = dec!(0.75);

/// Everything a full run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationSummary {
    pub company: String,
    pub symbol: String,
    pub adjustments: AdjustmentOutputs,
    pub normalized: NormalizedFinancials,
    pub cost_of_equity: Rate,
    pub valuation: ValuationResult,
}

/// Final fields recomputed since the last invalidation.
#[derive(Debug, Clone, Default)]
struct FinalFieldValues {
    final_adjusted_ebit: Option<Money>,
    adjusted_cash: Option<Money>,
    adjusted_bv_of_debt: Option<Money>,
    market_value_of_debt: Option<Money>,
}

impl FinalFieldValues {
    fn slot(&mut self, field: FinalField) -> &mut Option<Money> {
        match field {
            FinalField::FinalAdjustedEbit => &mut self.final_adjusted_ebit,
            FinalField::AdjustedCash => &mut self.adjusted_cash,
            FinalField::AdjustedBvOfDebt => &mut self.adjusted_bv_of_debt,
            FinalField::MarketValueOfDebt => &mut self.market_value_of_debt,
        }
    }

    fn get(&self, field: FinalField) -> Option<Money> {
        match field {
            FinalField::FinalAdjustedEbit => self.final_adjusted_ebit,
            FinalField::AdjustedCash => self.adjusted_cash,
            FinalField::AdjustedBvOfDebt => self.adjusted_bv_of_debt,
            FinalField::MarketValueOfDebt => self.market_value_of_debt,
        }
    }

    /// All four, or `None` while any is stale.
    fn complete(&self) -> Option<NormalizedFinancials> {
        Some(NormalizedFinancials {
            final_adjusted_ebit: self.final_adjusted_ebit?,
            adjusted_cash: self.adjusted_cash?,
            adjusted_bv_of_debt: self.adjusted_bv_of_debt?,
            market_value_of_debt: self.market_value_of_debt?,
        })
    }
}

impl From<&NormalizedFinancials> for FinalFieldValues {
    fn from(n: &NormalizedFinancials) -> Self {
        FinalFieldValues {
            final_adjusted_ebit: Some(n.final_adjusted_ebit),
            adjusted_cash: Some(n.adjusted_cash),
            adjusted_bv_of_debt: Some(n.adjusted_bv_of_debt),
            market_value_of_debt: Some(n.market_value_of_debt),
        }
    }
}

/// One company's valuation being edited.
///
/// Owns the input and the latest outputs of each adjuster. Module toggles and
/// method changes drop the outputs they invalidate; recalculation is always
/// explicit.
pub struct ValuationSession<'r> {
    input: ValuationInput,
    adjustments: AdjustmentOutputs,
    final_fields: FinalFieldValues,
    normalized: Option<NormalizedFinancials>,
    result: Option<ValuationResult>,
    reference: &'r dyn ReferenceData,
}

impl<'r> ValuationSession<'r> {
    pub fn new(input: ValuationInput, reference: &'r dyn ReferenceData) -> Self {
        ValuationSession {
            input,
            adjustments: AdjustmentOutputs::default(),
            final_fields: FinalFieldValues::default(),
            normalized: None,
            result: None,
            reference,
        }
    }

    pub fn input(&self) -> &ValuationInput {
        &self.input
    }

    pub fn adjustments(&self) -> &AdjustmentOutputs {
        &self.adjustments
    }

    /// The final fields, once all four are current.
    pub fn normalized(&self) -> Option<&NormalizedFinancials> {
        self.normalized.as_ref()
    }

    /// One final field, if recomputed since the last invalidating change.
    pub fn final_field(&self, field: FinalField) -> Option<Money> {
        self.final_fields.get(field)
    }

    pub fn result(&self) -> Option<&ValuationResult> {
        self.result.as_ref()
    }

    pub fn into_parts(self) -> (ValuationInput, AdjustmentOutputs, Option<ValuationResult>) {
        (self.input, self.adjustments, self.result)
    }

    /// Edit raw input fields. The cost of debt, the outputs priced off it,
    /// the final fields and the valuation are dropped.
    pub fn edit(&mut self, f: impl FnOnce(&mut ValuationInput)) {
        f(&mut self.input);
        self.adjustments.cost_of_debt = None;
        self.adjustments.lease = None;
        self.adjustments.convertible = None;
        self.invalidate_final();
    }

    // -----------------------------------------------------------------------
    // Toggles
    // -----------------------------------------------------------------------

    pub fn set_cash_trapped(&mut self, on: bool) {
        self.input.cash_is_trapped = on;
        if !on {
            self.adjustments.trapped_cash_value = None;
        }
        self.invalidate_final();
    }

    pub fn set_capitalize_rnd(&mut self, on: bool) {
        self.input.capitalize_rnd = on;
        if !on {
            self.adjustments.rnd = None;
        }
        self.invalidate_final();
    }

    pub fn set_capitalize_lease(&mut self, on: bool) {
        self.input.capitalize_lease = on;
        if !on {
            self.adjustments.lease = None;
        }
        self.invalidate_final();
    }

    pub fn set_has_convertible_debt(&mut self, on: bool) {
        self.input.has_convertible_debt = on;
        if !on {
            self.adjustments.convertible = None;
        }
        self.invalidate_final();
    }

    /// Switch the cost-of-debt method. Lease interest and the convertible
    /// valuation are priced off the cost of debt and are dropped with it.
    pub fn select_cost_of_debt_method(&mut self, selection: CostOfDebtSelection) {
        self.input.cost_of_debt = selection;
        self.adjustments.cost_of_debt = None;
        self.adjustments.lease = None;
        self.adjustments.convertible = None;
        self.invalidate_final();
    }

    // -----------------------------------------------------------------------
    // Recalculation
    // -----------------------------------------------------------------------

    /// Tax cost of trapped cash at the domestic marginal rate. `None` when the
    /// module is off.
    pub fn recalculate_trapped_cash(&mut self) -> DcfResult<Option<Money>> {
        if !self.input.cash_is_trapped {
            self.adjustments.trapped_cash_value = None;
            return Ok(None);
        }
        let value = compute_trapped_cash_value(
            self.input.trapped_cash_amount.unwrap_or(Decimal::ZERO),
            self.input.marginal_tax_rate,
            self.input.foreign_country_tax_rate.unwrap_or(Decimal::ZERO),
        )?;
        log::debug!("trapped cash value recalculated: {value}");
        self.adjustments.trapped_cash_value = Some(value);
        self.invalidate_final();
        Ok(Some(value))
    }

    pub fn recalculate_rnd(&mut self) -> Option<CapitalizationResult> {
        if !self.input.capitalize_rnd {
            self.adjustments.rnd = None;
            return None;
        }
        let result = capitalize(&self.input.rnd, &self.input.rnd_options);
        self.adjustments.rnd = Some(result.clone());
        self.invalidate_final();
        Some(result)
    }

    /// Needs the pre-tax cost of debt; resolves it first when not yet known.
    pub fn recalculate_lease(&mut self) -> DcfResult<Option<LeaseAdjustment>> {
        if !self.input.capitalize_lease {
            self.adjustments.lease = None;
            return Ok(None);
        }
        let pre_tax = self.current_cost_of_debt()?.pre_tax_cost_of_debt;
        let adjustment = capitalize_leases(&self.input.lease, &self.input.lease_options, pre_tax)?;
        self.adjustments.lease = Some(adjustment.clone());
        self.invalidate_final();
        Ok(Some(adjustment))
    }

    pub fn recalculate_cost_of_debt(&mut self) -> DcfResult<CostOfDebt> {
        let country_spread = match self.reference.lookup_country(&self.input.country) {
            Some(profile) => profile.spread,
            None => Decimal::ZERO,
        };
        let context = CostOfDebtContext {
            risk_free_rate: self.risk_free_rate(),
            marginal_tax_rate: self.input.marginal_tax_rate,
            ebit: self.input.ebit_ttm,
            interest_expense: self.input.interest_expense_ttm,
            country_spread,
        };
        let spreads = ReferenceSpreads(self.reference);
        let resolved = resolve_cost_of_debt(&self.input.cost_of_debt, &context, &spreads)?;
        self.adjustments.cost_of_debt = Some(resolved.clone());
        self.invalidate_final();
        Ok(resolved)
    }

    /// Straight-debt value of the convertible at the pre-tax cost of debt.
    pub fn recalculate_convertible_debt(&mut self) -> DcfResult<Option<ConvertibleDebtValue>> {
        if !self.input.has_convertible_debt {
            self.adjustments.convertible = None;
            return Ok(None);
        }
        let market_rate = self.current_cost_of_debt()?.pre_tax_cost_of_debt;
        let value = value_convertible_debt(
            self.input.bv_conv_debt.unwrap_or(Decimal::ZERO),
            self.input.interest_conv_debt.unwrap_or(Decimal::ZERO),
            self.input.conv_debt_maturity.unwrap_or(0),
            market_rate,
        )?;
        self.adjustments.convertible = Some(value.clone());
        self.invalidate_final();
        Ok(Some(value))
    }

    /// All four final fields from the current adjuster outputs.
    pub fn recalculate_final_fields(&mut self) -> DcfResult<NormalizedFinancials> {
        let normalized = normalize(&self.input, &self.adjustments)?;
        log::debug!("final fields recalculated: {normalized:?}");
        self.final_fields = FinalFieldValues::from(&normalized);
        self.normalized = Some(normalized.clone());
        self.result = None;
        Ok(normalized)
    }

    /// Recompute one final field, leaving the others as they were. The
    /// normalized set only becomes available once all four are current.
    pub fn recalculate_final_field(&mut self, field: FinalField) -> DcfResult<Money> {
        let value = normalize_field(field, &self.input, &self.adjustments)?;
        *self.final_fields.slot(field) = Some(value);
        self.normalized = self.final_fields.complete();
        self.result = None;
        Ok(value)
    }

    /// Run every enabled adjuster, then the final fields.
    pub fn recalculate_all(&mut self) -> DcfResult<NormalizedFinancials> {
        self.recalculate_cost_of_debt()?;
        self.recalculate_trapped_cash()?;
        self.recalculate_rnd();
        self.recalculate_lease()?;
        self.recalculate_convertible_debt()?;
        self.recalculate_final_fields()
    }

    /// Value the equity from the normalized financials.
    pub fn valuation(&mut self) -> DcfResult<ValuationResult> {
        // resolved first: the market value of debt is discounted at it
        let after_tax_cost_of_debt = self.current_cost_of_debt()?.after_tax_cost_of_debt;
        let normalized = match self.normalized.clone() {
            Some(n) => n,
            None => self.recalculate_final_fields()?,
        };
        let cost_of_equity = self.cost_of_equity()?;

        let input = &self.input;
        let shares = required("shares_outstanding", input.shares_outstanding)?;
        if shares <= Decimal::ZERO {
            return Err(DcfError::domain(
                "valuation",
                "shares_outstanding",
                shares,
                "shares outstanding must be positive",
            ));
        }
        let price = required("current_price", input.current_price)?;
        let market_cap = shares.checked_mul(price).ok_or_else(|| {
            DcfError::domain("valuation", "current_price", price, "market capitalization out of range")
        })?;
        let capital_weights =
            CapitalWeights::from_market_values(market_cap, normalized.market_value_of_debt)?;

        let aggregate_input = AggregateInput {
            normalized,
            base_revenue: input.revenue_ttm,
            cost_of_equity,
            cost_of_debt_after_tax: after_tax_cost_of_debt,
            capital_weights,
            forecast: ForecastAssumptions {
                growth_5y: required("growth_5y", input.growth_5y)?,
                growth_10y: required("growth_10y", input.growth_10y)?,
                target_margin: required("target_margin", input.target_margin)?,
                sales_to_capital: required("sales_to_capital", input.sales_to_capital)?,
                terminal_growth_rate: input.terminal_growth_rate,
            },
            tax_rate: input.tax_rate.unwrap_or(input.marginal_tax_rate),
            shares_outstanding: shares,
            current_price: price,
            cross_holdings: Some(input.cross_holdings_ttm),
            minority_interest: Some(input.minority_interest_ttm),
        };

        let result = aggregate(&aggregate_input)?;
        self.result = Some(result.clone());
        Ok(result)
    }

    pub fn cost_of_equity(&self) -> DcfResult<Rate> {
        cost_of_equity(&CostOfEquityInput {
            risk_free_rate: self.risk_free_rate(),
            beta: required("beta", self.input.beta)?,
            equity_risk_premium: required("erp", self.input.erp)?,
            country_risk_premium: None,
        })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn invalidate_final(&mut self) {
        self.final_fields = FinalFieldValues::default();
        self.normalized = None;
        self.result = None;
    }

    fn current_cost_of_debt(&mut self) -> DcfResult<CostOfDebt> {
        match self.adjustments.cost_of_debt.clone() {
            Some(c) => Ok(c),
            None => self.recalculate_cost_of_debt(),
        }
    }

    /// The input's rate, or the reference default when none was entered.
    fn risk_free_rate(&self) -> Rate {
        if !self.input.risk_free_rate.is_zero() {
            return self.input.risk_free_rate;
        }
        self.reference
            .default_risk_free_rate()
            .unwrap_or(Decimal::ZERO)
    }
}

fn required<T>(field: &str, value: Option<T>) -> DcfResult<T> {
    value.ok_or_else(|| DcfError::InvalidInput {
        field: field.to_string(),
        reason: "required for valuation".into(),
    })
}

/// Run every adjuster, normalize and value in one go.
pub fn run_valuation(
    input: ValuationInput,
    reference: &dyn ReferenceData,
) -> DcfResult<ComputationOutput<ValuationSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if !input.country.trim().is_empty() && reference.lookup_country(&input.country).is_none() {
        warnings.push(format!(
            "No reference data for country '{}'; country spread taken as 0",
            input.country
        ));
    }

    let assumptions = input.clone();
    let mut session = ValuationSession::new(input, reference);
    let normalized = session.recalculate_all()?;
    let valuation = session.valuation()?;
    let cost_of_equity = session.cost_of_equity()?;

    if let Some(cod) = &session.adjustments().cost_of_debt {
        for w in &cod.warnings {
            warnings.push(format!("[Cost of debt] {w}"));
        }
    }
    if valuation.terminal_value_pct > TERMINAL_VALUE_WARNING_PCT {
        warnings.push(format!(
            "Terminal value represents {:.1}% of operating assets",
            valuation.terminal_value_pct * Decimal::ONE_HUNDRED
        ));
    }
    if valuation.equity_value < Decimal::ZERO {
        warnings.push("Equity value is negative: debt exceeds the value of operating assets".into());
    }

    let (company, symbol) = session.input().company_and_symbol();
    let summary = ValuationSummary {
        company,
        symbol,
        adjustments: session.adjustments().clone(),
        normalized,
        cost_of_equity,
        valuation,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Adjusted 10-year FCFF DCF",
        &assumptions,
        warnings,
        elapsed,
        summary,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjustments::schedule::rnd_schedule_from_amounts;
    use crate::cost_of_debt::{FirmSize, Rating};
    use crate::reference_data::StaticReferenceData;

    fn base_input() -> ValuationInput {
        ValuationInput {
            ticker: "Acme Corp (ACME)".into(),
            country: "United States".into(),
            industry: "Software".into(),
            risk_free_rate: dec!(0.04),
            marginal_tax_rate: dec!(0.25),
            revenue_ttm: dec!(10000),
            ebit_ttm: dec!(1000),
            interest_expense_ttm: dec!(100),
            cash_equivalent_ttm: dec!(500),
            bv_of_debt_ttm: dec!(2000),
            shares_outstanding: Some(dec!(100)),
            current_price: Some(dec!(50)),
            cost_of_debt: CostOfDebtSelection::Direct {
                pre_tax_cost_of_debt: dec!(0.06),
            },
            erp: Some(dec!(0.05)),
            beta: Some(dec!(1.2)),
            growth_5y: Some(dec!(0.08)),
            growth_10y: Some(dec!(0.04)),
            target_margin: Some(dec!(0.15)),
            sales_to_capital: Some(dec!(2)),
            terminal_growth_rate: Some(dec!(0.03)),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_modules_end_to_end() {
        let reference = StaticReferenceData::builtin();
        let mut session = ValuationSession::new(base_input(), &reference);
        let n = session.recalculate_all().unwrap();
        assert_eq!(n.final_adjusted_ebit, dec!(1000));
        assert_eq!(n.adjusted_cash, dec!(500));
        assert_eq!(n.adjusted_bv_of_debt, dec!(2000));
        // no maturity entered: book value
        assert_eq!(n.market_value_of_debt, dec!(2000));
    }

    #[test]
    fn test_toggle_off_resets_contribution() {
        let reference = StaticReferenceData::builtin();
        let mut input = base_input();
        input.cash_is_trapped = true;
        input.trapped_cash_amount = Some(dec!(1000));
        input.foreign_country_tax_rate = Some(dec!(0.10));
        let mut session = ValuationSession::new(input, &reference);

        assert_eq!(session.recalculate_trapped_cash().unwrap(), Some(dec!(150.00)));
        assert_eq!(session.recalculate_final_fields().unwrap().adjusted_cash, dec!(350));

        session.set_cash_trapped(false);
        assert!(session.adjustments().trapped_cash_value.is_none());
        assert!(session.normalized().is_none());
        assert_eq!(session.recalculate_final_fields().unwrap().adjusted_cash, dec!(500));
    }

    #[test]
    fn test_rnd_feeds_final_ebit() {
        let reference = StaticReferenceData::builtin();
        let mut session = ValuationSession::new(base_input(), &reference);
        session.edit(|i| {
            i.rnd = rnd_schedule_from_amounts(&[Some(dec!(500)), Some(dec!(400)), Some(dec!(300))])
        });
        assert!(session.recalculate_rnd().is_none());

        session.set_capitalize_rnd(true);
        let rnd = session.recalculate_rnd().unwrap();
        assert_eq!(rnd.adjusted_operating_income, dec!(150));
        assert_eq!(
            session
                .recalculate_final_field(FinalField::FinalAdjustedEbit)
                .unwrap(),
            dec!(1150)
        );
    }

    #[test]
    fn test_single_final_field_then_valuation_matches_full_run() {
        let reference = StaticReferenceData::builtin();
        let full = run_valuation(base_input(), &reference).unwrap();

        let mut session = ValuationSession::new(base_input(), &reference);
        session
            .recalculate_final_field(FinalField::FinalAdjustedEbit)
            .unwrap();
        assert!(session.normalized().is_none());
        assert_eq!(session.final_field(FinalField::FinalAdjustedEbit), Some(dec!(1000)));
        assert_eq!(session.final_field(FinalField::AdjustedCash), None);

        let result = session.valuation().unwrap();
        assert_eq!(result.value_per_share, full.result.valuation.value_per_share);
        assert_eq!(session.normalized().unwrap().adjusted_cash, dec!(500));
        assert_eq!(session.normalized().unwrap().adjusted_bv_of_debt, dec!(2000));
    }

    #[test]
    fn test_all_single_fields_complete_the_set() {
        let reference = StaticReferenceData::builtin();
        let mut session = ValuationSession::new(base_input(), &reference);
        for field in [
            FinalField::FinalAdjustedEbit,
            FinalField::AdjustedCash,
            FinalField::AdjustedBvOfDebt,
        ] {
            session.recalculate_final_field(field).unwrap();
            assert!(session.normalized().is_none());
        }
        session
            .recalculate_final_field(FinalField::MarketValueOfDebt)
            .unwrap();
        let expected = ValuationSession::new(base_input(), &reference)
            .recalculate_final_fields()
            .unwrap();
        assert_eq!(session.normalized(), Some(&expected));
    }

    #[test]
    fn test_edit_drops_cost_of_debt_and_dependents() {
        let reference = StaticReferenceData::builtin();
        let mut input = base_input();
        input.capitalize_lease = true;
        input.lease[0].amount = Some(dec!(500));
        input.lease[1].amount = Some(dec!(400));
        let mut session = ValuationSession::new(input, &reference);
        session.recalculate_all().unwrap();
        assert_eq!(
            session.adjustments().cost_of_debt.as_ref().unwrap().pre_tax_cost_of_debt,
            dec!(0.06)
        );

        session.edit(|i| {
            i.cost_of_debt = CostOfDebtSelection::Direct {
                pre_tax_cost_of_debt: dec!(0.08),
            }
        });
        assert!(session.adjustments().cost_of_debt.is_none());
        assert!(session.adjustments().lease.is_none());
        assert!(session.adjustments().convertible.is_none());

        session.recalculate_all().unwrap();
        let adj = session.adjustments();
        assert_eq!(adj.cost_of_debt.as_ref().unwrap().pre_tax_cost_of_debt, dec!(0.08));
        assert_eq!(adj.lease.as_ref().unwrap().interest_expense_adjustment, dec!(40));
    }

    #[test]
    fn test_method_change_drops_cost_dependent_outputs() {
        let reference = StaticReferenceData::builtin();
        let mut input = base_input();
        input.capitalize_lease = true;
        input.lease[0].amount = Some(dec!(500));
        input.lease[1].amount = Some(dec!(400));
        let mut session = ValuationSession::new(input, &reference);

        let lease = session.recalculate_lease().unwrap().unwrap();
        // 500 of lease debt at the 6% direct cost of debt
        assert_eq!(lease.debt_adjustment, dec!(500));
        assert_eq!(lease.interest_expense_adjustment, dec!(30));

        session.select_cost_of_debt_method(CostOfDebtSelection::Rating {
            rating: Rating::Baa2,
        });
        assert!(session.adjustments().cost_of_debt.is_none());
        assert!(session.adjustments().lease.is_none());

        let cod = session.recalculate_cost_of_debt().unwrap();
        assert_eq!(cod.pre_tax_cost_of_debt, dec!(0.04) + dec!(0.0147));
    }

    #[test]
    fn test_synthetic_uses_country_spread() {
        let reference = StaticReferenceData::builtin();
        let mut input = base_input();
        input.country = "India".into();
        input.cost_of_debt = CostOfDebtSelection::Synthetic {
            firm_size: FirmSize::Large,
        };
        let mut session = ValuationSession::new(input, &reference);
        let cod = session.recalculate_cost_of_debt().unwrap();
        assert_eq!(cod.interest_coverage, Some(dec!(10)));
        let spread = cod.spread.unwrap();
        assert_eq!(cod.pre_tax_cost_of_debt, dec!(0.04) + dec!(0.0218) + spread);
    }

    #[test]
    fn test_valuation_requires_shares() {
        let reference = StaticReferenceData::builtin();
        let mut input = base_input();
        input.shares_outstanding = None;
        let mut session = ValuationSession::new(input, &reference);
        let err = session.valuation().unwrap_err();
        assert!(matches!(err, DcfError::InvalidInput { .. }));
    }

    #[test]
    fn test_valuation_rejects_negative_shares() {
        let reference = StaticReferenceData::builtin();
        let mut input = base_input();
        input.shares_outstanding = Some(dec!(-10));
        let mut session = ValuationSession::new(input, &reference);
        match session.valuation().unwrap_err() {
            DcfError::Domain { field, .. } => assert_eq!(field, "shares_outstanding"),
            other => panic!("expected a domain error, got {other:?}"),
        }
    }

    #[test]
    fn test_run_valuation_envelope() {
        let reference = StaticReferenceData::builtin();
        let out = run_valuation(base_input(), &reference).unwrap();
        assert_eq!(out.result.symbol, "ACME");
        assert_eq!(out.result.cost_of_equity, dec!(0.10));
        assert!(out.result.valuation.value_per_share > Decimal::ZERO);
        assert_eq!(out.result.valuation.projections.len(), 10);
    }

    #[test]
    fn test_unknown_country_warns() {
        let reference = StaticReferenceData::builtin();
        let mut input = base_input();
        input.country = "Atlantis".into();
        let out = run_valuation(input, &reference).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("Atlantis")));
    }
}
