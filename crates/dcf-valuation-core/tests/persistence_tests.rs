use chrono::NaiveDate;
use dcf_valuation_core::cost_of_debt::CostOfDebtSelection;
use dcf_valuation_core::input::ValuationInput;
use dcf_valuation_core::persistence::{
    save_valuation, InMemoryRecordStore, RecordStore, ValuationStatus,
};
use dcf_valuation_core::reference_data::StaticReferenceData;
use dcf_valuation_core::session::ValuationSession;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn company(price: rust_decimal::Decimal) -> ValuationInput {
    ValuationInput {
        ticker: "Northwind Traders (NWT)".into(),
        country: "United Kingdom".into(),
        industry: "Retail".into(),
        description: Some("Speciality food distributor".into()),
        risk_free_rate: dec!(0.04),
        marginal_tax_rate: dec!(0.25),
        revenue_ttm: dec!(5000),
        ebit_ttm: dec!(600),
        interest_expense_ttm: dec!(50),
        cash_equivalent_ttm: dec!(200),
        bv_of_debt_ttm: dec!(800),
        shares_outstanding: Some(dec!(200)),
        current_price: Some(price),
        cost_of_debt: CostOfDebtSelection::Direct {
            pre_tax_cost_of_debt: dec!(0.055),
        },
        erp: Some(dec!(0.05)),
        beta: Some(dec!(1.0)),
        growth_5y: Some(dec!(0.05)),
        growth_10y: Some(dec!(0.03)),
        target_margin: Some(dec!(0.12)),
        sales_to_capital: Some(dec!(2.5)),
        terminal_growth_rate: Some(dec!(0.02)),
        ..Default::default()
    }
}

fn save(
    store: &mut InMemoryRecordStore,
    existing: Option<uuid::Uuid>,
    input: ValuationInput,
    date: NaiveDate,
) -> dcf_valuation_core::persistence::PersistedValuation {
    let reference = StaticReferenceData::builtin();
    let mut session = ValuationSession::new(input, &reference);
    session.recalculate_all().unwrap();
    session.valuation().unwrap();
    let (input, adjustments, result) = session.into_parts();
    save_valuation(
        store,
        "analyst@example.com",
        existing,
        input,
        adjustments,
        result.unwrap(),
        date,
    )
    .unwrap()
}

// ===========================================================================
// Save / load
// ===========================================================================

#[test]
fn test_first_save_creates_record() {
    let mut store = InMemoryRecordStore::new();
    let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
    let record = save(&mut store, None, company(dec!(1)), date);

    assert_eq!(record.name, "Northwind Traders");
    assert_eq!(record.ticker, "NWT");
    assert_eq!(record.description, "Speciality food distributor");
    assert_eq!(record.method, "DCF");
    assert_eq!(record.expiry_date, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    // priced far below value
    assert_eq!(record.status, ValuationStatus::Green);

    let loaded = store
        .load_input("analyst@example.com", record.id)
        .unwrap();
    assert_eq!(loaded, company(dec!(1)));
}

#[test]
fn test_resave_replaces_whole_record() {
    let mut store = InMemoryRecordStore::new();
    let first = save(
        &mut store,
        None,
        company(dec!(1)),
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    );
    let second = save(
        &mut store,
        Some(first.id),
        company(dec!(10000)),
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
    );

    let all = store.list("analyst@example.com").unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, first.id);
    assert_eq!(all[0], second);
    assert_eq!(all[0].status, ValuationStatus::Red);
    assert_eq!(all[0].current_price, dec!(10000));
}

#[test]
fn test_store_document_round_trip() {
    let mut store = InMemoryRecordStore::new();
    save(
        &mut store,
        None,
        company(dec!(3)),
        NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
    );
    let json = serde_json::to_string_pretty(&store).unwrap();
    let back: InMemoryRecordStore = serde_json::from_str(&json).unwrap();
    assert_eq!(back, store);
}
