use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::DcfError;
use crate::input::ValuationInput;
use crate::normalize::AdjustmentOutputs;
use crate::types::Money;
use crate::valuation::ValuationResult;
use crate::DcfResult;

pub const VALUATION_METHOD: &str = "DCF";

/// Traffic-light verdict shown on the watchlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuationStatus {
    /// Value per share at or above the current price.
    Green,
    Red,
}

impl ValuationStatus {
    pub fn from_prices(value_per_share: Money, current_price: Money) -> Self {
        if value_per_share >= current_price {
            ValuationStatus::Green
        } else {
            ValuationStatus::Red
        }
    }
}

/// A saved valuation with its full input and result snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedValuation {
    pub id: Uuid,
    pub name: String,
    pub ticker: String,
    #[serde(default)]
    pub description: String,
    pub country: String,
    pub industry: String,
    pub method: String,
    pub valuation_date: NaiveDate,
    /// One year after the valuation date.
    pub expiry_date: NaiveDate,
    pub status: ValuationStatus,
    pub value_per_share: Money,
    pub current_price: Money,
    pub input: ValuationInput,
    #[serde(default)]
    pub adjustments: AdjustmentOutputs,
    pub result: ValuationResult,
}

impl PersistedValuation {
    /// Build the record for `id`. Name and ticker come from the
    /// "Company (TICK)" label.
    pub fn build(
        id: Uuid,
        input: ValuationInput,
        adjustments: AdjustmentOutputs,
        result: ValuationResult,
        valuation_date: NaiveDate,
    ) -> Self {
        let (name, ticker) = input.company_and_symbol();
        PersistedValuation {
            id,
            name,
            ticker,
            description: input.description.clone().unwrap_or_default(),
            country: input.country.clone(),
            industry: input.industry.clone(),
            method: VALUATION_METHOD.to_string(),
            valuation_date,
            expiry_date: expiry_for(valuation_date),
            status: ValuationStatus::from_prices(result.value_per_share, result.current_price),
            value_per_share: result.value_per_share,
            current_price: result.current_price,
            input,
            adjustments,
            result,
        }
    }
}

/// Valuation date plus one year; 29 February expires on 28 February.
pub fn expiry_for(valuation_date: NaiveDate) -> NaiveDate {
    valuation_date
        .checked_add_months(Months::new(12))
        .unwrap_or(NaiveDate::MAX)
}

// ---------------------------------------------------------------------------
// Record store
// ---------------------------------------------------------------------------

/// Per-user storage of saved valuations.
pub trait RecordStore {
    fn get(&self, user: &str, id: Uuid) -> DcfResult<Option<PersistedValuation>>;

    fn list(&self, user: &str) -> DcfResult<Vec<PersistedValuation>>;

    /// Insert, or fully replace the record with the same id.
    fn upsert(&mut self, user: &str, record: PersistedValuation) -> DcfResult<()>;

    fn load_input(&self, user: &str, id: Uuid) -> DcfResult<ValuationInput> {
        self.get(user, id)?
            .map(|r| r.input)
            .ok_or_else(|| DcfError::Store(format!("no valuation {id} for user '{user}'")))
    }
}

/// Store held in memory; also the document layout of file-backed stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryRecordStore {
    records: BTreeMap<String, Vec<PersistedValuation>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, user: &str, id: Uuid) -> DcfResult<Option<PersistedValuation>> {
        Ok(self
            .records
            .get(user)
            .and_then(|list| list.iter().find(|r| r.id == id))
            .cloned())
    }

    fn list(&self, user: &str) -> DcfResult<Vec<PersistedValuation>> {
        Ok(self.records.get(user).cloned().unwrap_or_default())
    }

    fn upsert(&mut self, user: &str, record: PersistedValuation) -> DcfResult<()> {
        if user.trim().is_empty() {
            return Err(DcfError::Store("user id is required".into()));
        }
        let list = self.records.entry(user.to_string()).or_default();
        match list.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                log::debug!("replacing valuation {} for {user}", record.id);
                *existing = record;
            }
            None => {
                log::debug!("adding valuation {} for {user}", record.id);
                list.push(record);
            }
        }
        Ok(())
    }
}

/// Save a valuation. With `existing` the stored record keeps its id and is
/// replaced; otherwise a new id is issued.
pub fn save_valuation(
    store: &mut dyn RecordStore,
    user: &str,
    existing: Option<Uuid>,
    input: ValuationInput,
    adjustments: AdjustmentOutputs,
    result: ValuationResult,
    valuation_date: NaiveDate,
) -> DcfResult<PersistedValuation> {
    let id = existing.unwrap_or_else(Uuid::new_v4);
    let record = PersistedValuation::build(id, input, adjustments, result, valuation_date);
    store.upsert(user, record.clone())?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn result(vps: Money, price: Money) -> ValuationResult {
        ValuationResult {
            equity_value: vps * dec!(100),
            value_per_share: vps,
            current_price: price,
            implied_discount_pct: (vps - price) / vps,
            wacc: dec!(0.08),
            terminal_growth_rate: dec!(0.03),
            pv_of_fcff: dec!(0),
            terminal_value: dec!(0),
            pv_of_terminal: dec!(0),
            operating_assets_value: dec!(0),
            terminal_value_pct: dec!(0),
            projections: vec![],
        }
    }

    fn input() -> ValuationInput {
        ValuationInput {
            ticker: "Apple Inc. (AAPL)".into(),
            country: "United States".into(),
            industry: "Technology Hardware".into(),
            ..Default::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_record_fields() {
        let r = PersistedValuation::build(
            Uuid::new_v4(),
            input(),
            AdjustmentOutputs::default(),
            result(dec!(175.20), dec!(169.30)),
            date(2024, 5, 17),
        );
        assert_eq!(r.name, "Apple Inc.");
        assert_eq!(r.ticker, "AAPL");
        assert_eq!(r.method, "DCF");
        assert_eq!(r.expiry_date, date(2025, 5, 17));
        assert_eq!(r.status, ValuationStatus::Green);

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "green");
        assert_eq!(json["valuation_date"], "2024-05-17");
    }

    #[test]
    fn test_status_red_below_price() {
        assert_eq!(
            ValuationStatus::from_prices(dec!(90), dec!(100)),
            ValuationStatus::Red
        );
        assert_eq!(
            ValuationStatus::from_prices(dec!(100), dec!(100)),
            ValuationStatus::Green
        );
    }

    #[test]
    fn test_leap_day_expiry() {
        assert_eq!(expiry_for(date(2024, 2, 29)), date(2025, 2, 28));
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut store = InMemoryRecordStore::new();
        let first = save_valuation(
            &mut store,
            "user-1",
            None,
            input(),
            AdjustmentOutputs::default(),
            result(dec!(120), dec!(100)),
            date(2024, 1, 2),
        )
        .unwrap();

        let second = save_valuation(
            &mut store,
            "user-1",
            Some(first.id),
            input(),
            AdjustmentOutputs::default(),
            result(dec!(80), dec!(100)),
            date(2024, 3, 4),
        )
        .unwrap();

        let list = store.list("user-1").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0], second);
        assert_eq!(list[0].status, ValuationStatus::Red);
        assert!(store.list("someone-else").unwrap().is_empty());
    }

    #[test]
    fn test_load_input_missing_is_store_error() {
        let store = InMemoryRecordStore::new();
        let err = store.load_input("user-1", Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DcfError::Store(_)));
    }
}
