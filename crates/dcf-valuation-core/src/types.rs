use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DcfError;
use crate::DcfResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Multiples and ratios (e.g. 4.2x interest coverage)
pub type Multiple = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Reporting currency. Serialized as its plain ISO code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    GBP,
    #[default]
    USD,
    EUR,
    CHF,
    JPY,
    CAD,
    AUD,
    HKD,
    SGD,
    INR,
    Other(String),
}

impl Currency {
    pub fn code(&self) -> &str {
        match self {
            Self::GBP => "GBP",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::CHF => "CHF",
            Self::JPY => "JPY",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::HKD => "HKD",
            Self::SGD => "SGD",
            Self::INR => "INR",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "GBP" => Self::GBP,
            "USD" | "" => Self::USD,
            "EUR" => Self::EUR,
            "CHF" => Self::CHF,
            "JPY" => Self::JPY,
            "CAD" => Self::CAD,
            "AUD" => Self::AUD,
            "HKD" => Self::HKD,
            "SGD" => Self::SGD,
            "INR" => Self::INR,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Scale in which the financial figures were entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    Units,
    #[serde(rename = "Kilo", alias = "Thousand")]
    Thousand,
    #[default]
    Million,
    Billion,
    Trillion,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Convert a floating-point amount received at an API boundary into `Money`.
///
/// NaN and infinities have no decimal representation and are rejected.
pub fn money_from_f64(computation: &str, field: &str, value: f64) -> DcfResult<Money> {
    if !value.is_finite() {
        return Err(DcfError::domain(
            computation,
            field,
            value,
            "amount must be a finite number",
        ));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| DcfError::domain(computation, field, value, "amount is out of range"))
}

/// Convert a percentage as entered on the form (5 = 5%) into a fraction.
pub fn pct_to_fraction(pct: Decimal) -> Rate {
    pct / Decimal::ONE_HUNDRED
}

/// Convert a fraction back into the percentage shown on the form.
pub fn fraction_to_pct(rate: Rate) -> Decimal {
    rate * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_from_f64_rejects_nan() {
        let err = money_from_f64("trapped cash", "amount", f64::NAN).unwrap_err();
        assert!(err.is_domain());
        assert!(money_from_f64("trapped cash", "amount", f64::INFINITY).is_err());
    }

    #[test]
    fn test_money_from_f64_finite() {
        let m = money_from_f64("trapped cash", "amount", 1250.5).unwrap();
        assert_eq!(m, dec!(1250.5));
    }

    #[test]
    fn test_currency_round_trips_as_code() {
        let json = serde_json::to_string(&Currency::Other("BRL".into())).unwrap();
        assert_eq!(json, "\"BRL\"");
        let c: Currency = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(c, Currency::EUR);
    }

    #[test]
    fn test_pct_conversion() {
        assert_eq!(pct_to_fraction(dec!(25)), dec!(0.25));
        assert_eq!(fraction_to_pct(dec!(0.042)), dec!(4.2));
    }
}
