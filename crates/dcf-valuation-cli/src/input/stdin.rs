use serde_json::Value;
use std::io::{self, Read};

/// Read a piped JSON or YAML document from stdin.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_document(&buffer)
}

fn parse_document(raw: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        let value: Value = serde_json::from_str(trimmed)
            .map_err(|e| format!("Failed to parse piped JSON: {e}"))?;
        return Ok(Some(value));
    }

    let value: Value = serde_yaml::from_str(trimmed)
        .map_err(|e| format!("Failed to parse piped YAML: {e}"))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_and_yaml_documents() {
        let from_json = parse_document(r#"{"amount": "1000"}"#).unwrap();
        let from_yaml = parse_document("amount: \"1000\"\n").unwrap();
        assert_eq!(from_json, Some(json!({ "amount": "1000" })));
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_blank_input_is_none() {
        assert_eq!(parse_document("  \n").unwrap(), None);
    }
}
