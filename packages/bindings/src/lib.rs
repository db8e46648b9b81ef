use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dcf_valuation_core::adjustments::{capitalize, CapitalizationOptions, ExpenseScheduleEntry};
use dcf_valuation_core::cost_of_debt::{CostOfDebtContext, CostOfDebtSelection};
use dcf_valuation_core::form::ValuationForm;
use dcf_valuation_core::input::ValuationInput;
use dcf_valuation_core::reference_data::{ReferenceSpreads, StaticReferenceData};
use dcf_valuation_core::session::ValuationSession;
use dcf_valuation_core::valuation::AggregateInput;
use dcf_valuation_core::money_from_f64;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn to_json(value: &impl Serialize) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

/// Reference data passed as JSON, or the built-in table.
fn reference(reference_json: Option<String>) -> NapiResult<StaticReferenceData> {
    match reference_json {
        Some(json) => StaticReferenceData::from_json(&json).map_err(to_napi_error),
        None => Ok(StaticReferenceData::builtin()),
    }
}

// ---------------------------------------------------------------------------
// Adjusters
// ---------------------------------------------------------------------------

/// Trapped cash value as a decimal string. Rates are fractions.
#[napi]
pub fn trapped_cash_value(
    amount: f64,
    domestic_tax_rate: f64,
    foreign_tax_rate: f64,
) -> NapiResult<String> {
    let rate = |field: &str, value: f64| {
        money_from_f64("trapped cash", field, value).map_err(to_napi_error)
    };
    let domestic = rate("domestic_tax_rate", domestic_tax_rate)?;
    let foreign = rate("foreign_tax_rate", foreign_tax_rate)?;
    let value = dcf_valuation_core::adjustments::trapped_cash::compute_trapped_cash_value_f64(
        amount, domestic, foreign,
    )
    .map_err(to_napi_error)?;
    Ok(value.to_string())
}

#[derive(Deserialize)]
struct ScheduleRequest {
    schedule: Vec<ExpenseScheduleEntry>,
    #[serde(default)]
    options: CapitalizationOptions,
    #[serde(default)]
    pre_tax_cost_of_debt: Option<Decimal>,
}

#[napi]
pub fn capitalize_expenses(input_json: String) -> NapiResult<String> {
    let request: ScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    to_json(&capitalize(&request.schedule, &request.options))
}

#[napi]
pub fn capitalize_leases(input_json: String) -> NapiResult<String> {
    let request: ScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rate = request
        .pre_tax_cost_of_debt
        .ok_or_else(|| to_napi_error("pre_tax_cost_of_debt is required"))?;
    let output = dcf_valuation_core::adjustments::capitalize_leases(
        &request.schedule,
        &request.options,
        rate,
    )
    .map_err(to_napi_error)?;
    to_json(&output)
}

#[derive(Deserialize)]
struct CostOfDebtRequest {
    selection: CostOfDebtSelection,
    context: CostOfDebtContext,
}

#[napi]
pub fn resolve_cost_of_debt(
    input_json: String,
    reference_json: Option<String>,
) -> NapiResult<String> {
    let request: CostOfDebtRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let reference = reference(reference_json)?;
    let output = dcf_valuation_core::cost_of_debt::resolve_cost_of_debt(
        &request.selection,
        &request.context,
        &ReferenceSpreads(&reference),
    )
    .map_err(to_napi_error)?;
    to_json(&output)
}

#[derive(Deserialize)]
struct ConvertibleRequest {
    book_value: Decimal,
    coupon_rate: Decimal,
    maturity_years: u32,
    market_cost_of_debt: Decimal,
}

#[napi]
pub fn value_convertible_debt(input_json: String) -> NapiResult<String> {
    let r: ConvertibleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = dcf_valuation_core::convertible::value_convertible_debt(
        r.book_value,
        r.coupon_rate,
        r.maturity_years,
        r.market_cost_of_debt,
    )
    .map_err(to_napi_error)?;
    to_json(&output)
}

// ---------------------------------------------------------------------------
// Normalization and valuation
// ---------------------------------------------------------------------------

/// Run every adjuster on a form record and return it with its output fields filled.
#[napi]
pub fn normalize_financials(
    form_json: String,
    reference_json: Option<String>,
) -> NapiResult<String> {
    let form: ValuationForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let input = form.into_input().map_err(to_napi_error)?;
    let reference = reference(reference_json)?;

    let mut session = ValuationSession::new(input, &reference);
    let normalized = session.recalculate_all().map_err(to_napi_error)?;
    let filled = session
        .input()
        .to_form()
        .with_outputs(session.adjustments(), Some(&normalized));
    to_json(&filled)
}

#[napi]
pub fn aggregate_valuation(input_json: String) -> NapiResult<String> {
    let input: AggregateInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = dcf_valuation_core::valuation::aggregate(&input).map_err(to_napi_error)?;
    to_json(&output)
}

/// Full run from engine input (fractions, snake_case).
#[napi]
pub fn run_valuation(input_json: String, reference_json: Option<String>) -> NapiResult<String> {
    let input: ValuationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let reference = reference(reference_json)?;
    let output =
        dcf_valuation_core::session::run_valuation(input, &reference).map_err(to_napi_error)?;
    to_json(&output)
}

/// Full run from the web form record (camelCase, rates in percent).
#[napi]
pub fn run_valuation_form(
    form_json: String,
    reference_json: Option<String>,
) -> NapiResult<String> {
    let form: ValuationForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let input = form.into_input().map_err(to_napi_error)?;
    let reference = reference(reference_json)?;
    let output =
        dcf_valuation_core::session::run_valuation(input, &reference).map_err(to_napi_error)?;
    to_json(&output)
}
