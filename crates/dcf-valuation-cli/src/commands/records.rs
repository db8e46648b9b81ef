use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use uuid::Uuid;

use dcf_valuation_core::persistence::{save_valuation, RecordStore, ValuationStatus};
use dcf_valuation_core::session::ValuationSession;
use dcf_valuation_core::with_metadata;

use super::valuation::ValuationInputArgs;
use super::Context;
use crate::store::JsonFileStore;

/// Arguments for saving a valuation
#[derive(Args)]
pub struct SaveArgs {
    #[command(flatten)]
    pub source: ValuationInputArgs,

    /// Replace the saved valuation with this id instead of adding one
    #[arg(long)]
    pub id: Option<Uuid>,

    /// Valuation date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for loading a saved valuation's input
#[derive(Args)]
pub struct LoadArgs {
    /// Id of the saved valuation
    #[arg(long)]
    pub id: Uuid,

    /// Print the web form record instead of the engine input
    #[arg(long)]
    pub as_form: bool,
}

/// One line of the watchlist.
#[derive(Serialize)]
struct RecordRow {
    id: Uuid,
    name: String,
    ticker: String,
    country: String,
    status: ValuationStatus,
    value_per_share: Decimal,
    current_price: Decimal,
    valuation_date: NaiveDate,
    expiry_date: NaiveDate,
}

pub fn run_save(args: SaveArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let input = args.source.load()?;
    let reference = ctx.reference()?;
    let mut store = JsonFileStore::open(&ctx.store)?;

    let mut session = ValuationSession::new(input, &reference);
    session.recalculate_all()?;
    let result = session.valuation()?;
    let (input, adjustments, _) = session.into_parts();

    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let record = save_valuation(&mut store, &ctx.user, args.id, input, adjustments, result, date)?;
    log::info!("saved valuation {} to {}", record.id, ctx.store);
    Ok(serde_json::to_value(record)?)
}

pub fn run_list(ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let store = JsonFileStore::open(&ctx.store)?;
    let rows: Vec<RecordRow> = store
        .list(&ctx.user)?
        .into_iter()
        .map(|r| RecordRow {
            id: r.id,
            name: r.name,
            ticker: r.ticker,
            country: r.country,
            status: r.status,
            value_per_share: r.value_per_share,
            current_price: r.current_price,
            valuation_date: r.valuation_date,
            expiry_date: r.expiry_date,
        })
        .collect();

    let output = with_metadata(
        "Saved valuations",
        &serde_json::json!({ "user": ctx.user, "store": ctx.store }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        rows,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_load(args: LoadArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let store = JsonFileStore::open(&ctx.store)?;
    let input = store.load_input(&ctx.user, args.id)?;
    if args.as_form {
        Ok(serde_json::to_value(input.to_form())?)
    } else {
        Ok(serde_json::to_value(input)?)
    }
}
