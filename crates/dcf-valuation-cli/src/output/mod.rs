pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten nested objects into dotted keys ("valuation.value_per_share").
/// Arrays of objects are kept whole and returned separately.
pub fn flatten_object(
    map: &Map<String, Value>,
) -> (Vec<(String, Value)>, Vec<(String, Vec<Value>)>) {
    let mut fields = Vec::new();
    let mut tables = Vec::new();
    flatten_into("", map, &mut fields, &mut tables);
    (fields, tables)
}

fn flatten_into(
    prefix: &str,
    map: &Map<String, Value>,
    fields: &mut Vec<(String, Value)>,
    tables: &mut Vec<(String, Vec<Value>)>,
) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, fields, tables),
            Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                tables.push((name, items.clone()));
            }
            other => fields.push((name, other.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_summary() {
        let v = json!({
            "symbol": "ACME",
            "valuation": {
                "value_per_share": "61.25",
                "projections": [{ "year": 1 }, { "year": 2 }]
            },
            "warnings": []
        });
        let (fields, tables) = flatten_object(v.as_object().unwrap());
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["symbol", "valuation.value_per_share", "warnings"]);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].0, "valuation.projections");
        assert_eq!(tables[0].1.len(), 2);
    }
}
