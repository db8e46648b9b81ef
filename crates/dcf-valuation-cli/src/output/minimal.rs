use serde_json::Value;

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 9] = [
    "value_per_share",
    "trapped_cash_value",
    "after_tax_cost_of_debt",
    "straight_debt_value",
    "debt_adjustment",
    "adjusted_operating_income",
    "final_adjusted_ebit",
    "market_value_of_debt",
    "equity_value",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known fields in the result object and one level of nested
/// objects below it, then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        if let Some(val) = find_priority(result_obj) {
            println!("{}", format_minimal(val));
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn find_priority(obj: &Value) -> Option<&Value> {
    let map = obj.as_object()?;
    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return Some(val);
        }
        // a run summary nests the answer one level down
        if let Some(val) = map
            .values()
            .filter_map(Value::as_object)
            .find_map(|inner| inner.get(key).filter(|v| !v.is_null()))
        {
            return Some(val);
        }
    }
    None
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
