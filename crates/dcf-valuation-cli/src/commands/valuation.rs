use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use dcf_valuation_core::form::ValuationForm;
use dcf_valuation_core::input::ValuationInput;
use dcf_valuation_core::normalize::{AdjustmentOutputs, NormalizedFinancials};
use dcf_valuation_core::session::{run_valuation, ValuationSession};
use dcf_valuation_core::with_metadata;

use super::{read_request, Context};

/// Where a company's valuation input comes from
#[derive(Args)]
pub struct ValuationInputArgs {
    /// Path to JSON/YAML valuation input (or pipe JSON on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Input is the web form record (camelCase, rates in percent)
    #[arg(long)]
    pub form: bool,
}

impl ValuationInputArgs {
    pub fn load(&self) -> Result<ValuationInput, Box<dyn std::error::Error>> {
        let missing = "--input is required (or pipe JSON on stdin)";
        if self.form {
            let form = read_request::<ValuationForm>(self.input.as_deref())?.ok_or(missing)?;
            Ok(form.into_input()?)
        } else {
            Ok(read_request::<ValuationInput>(self.input.as_deref())?.ok_or(missing)?)
        }
    }
}

/// Arguments for normalizing financials
#[derive(Args)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub source: ValuationInputArgs,

    /// Print the filled-in form record instead of the adjustment breakdown
    #[arg(long)]
    pub as_form: bool,
}

/// Arguments for a full valuation run
#[derive(Args)]
pub struct ValueArgs {
    #[command(flatten)]
    pub source: ValuationInputArgs,
}

#[derive(Serialize)]
struct NormalizeOutput<'a> {
    adjustments: &'a AdjustmentOutputs,
    normalized: &'a NormalizedFinancials,
}

pub fn run_normalize(args: NormalizeArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.source.load()?;
    let reference = ctx.reference()?;

    let start = Instant::now();
    let mut session = ValuationSession::new(input, &reference);
    let normalized = session.recalculate_all()?;

    if args.as_form {
        let form = session
            .input()
            .to_form()
            .with_outputs(session.adjustments(), Some(&normalized));
        return Ok(serde_json::to_value(form)?);
    }

    let mut warnings = Vec::new();
    if let Some(cod) = &session.adjustments().cost_of_debt {
        warnings.extend(cod.warnings.iter().map(|w| format!("[Cost of debt] {w}")));
    }
    let output = with_metadata(
        "Normalized financials after trapped cash, R&D, lease and convertible adjustments",
        session.input(),
        warnings,
        start.elapsed().as_micros() as u64,
        NormalizeOutput {
            adjustments: session.adjustments(),
            normalized: &normalized,
        },
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_value(args: ValueArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.source.load()?;
    let reference = ctx.reference()?;
    let output = run_valuation(input, &reference)?;
    log::debug!(
        "valued {} in {}us",
        output.result.symbol,
        output.metadata.computation_time_us
    );
    Ok(serde_json::to_value(output)?)
}
