use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DcfError;
use crate::types::Rate;

/// Moody's-style 22-step rating scale, declared from the default tier up to Aaa.
///
/// `Ord` follows credit quality: `Rating::D2 < Rating::Aaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    D2,
    C,
    Ca,
    Caa3,
    Caa2,
    Caa1,
    B3,
    B2,
    B1,
    Ba3,
    Ba2,
    Ba1,
    Baa3,
    Baa2,
    Baa1,
    A3,
    A2,
    A1,
    Aa3,
    Aa2,
    Aa1,
    Aaa,
}

impl Rating {
    /// Every rating, worst first (the order the rating picker lists them).
    pub const ALL: [Rating; 22] = [
        Rating::D2,
        Rating::C,
        Rating::Ca,
        Rating::Caa3,
        Rating::Caa2,
        Rating::Caa1,
        Rating::B3,
        Rating::B2,
        Rating::B1,
        Rating::Ba3,
        Rating::Ba2,
        Rating::Ba1,
        Rating::Baa3,
        Rating::Baa2,
        Rating::Baa1,
        Rating::A3,
        Rating::A2,
        Rating::A1,
        Rating::Aa3,
        Rating::Aa2,
        Rating::Aa1,
        Rating::Aaa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::D2 => "D2",
            Self::C => "C",
            Self::Ca => "Ca",
            Self::Caa3 => "Caa3",
            Self::Caa2 => "Caa2",
            Self::Caa1 => "Caa1",
            Self::B3 => "B3",
            Self::B2 => "B2",
            Self::B1 => "B1",
            Self::Ba3 => "Ba3",
            Self::Ba2 => "Ba2",
            Self::Ba1 => "Ba1",
            Self::Baa3 => "Baa3",
            Self::Baa2 => "Baa2",
            Self::Baa1 => "Baa1",
            Self::A3 => "A3",
            Self::A2 => "A2",
            Self::A1 => "A1",
            Self::Aa3 => "Aa3",
            Self::Aa2 => "Aa2",
            Self::Aa1 => "Aa1",
            Self::Aaa => "Aaa",
        }
    }

    pub fn is_investment_grade(&self) -> bool {
        *self >= Rating::Baa3
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Rating {
    type Err = DcfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Rating::ALL
            .iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| DcfError::InvalidInput {
                field: "rating".into(),
                reason: format!("'{trimmed}' is not on the D2..Aaa rating scale"),
            })
    }
}

/// Source of default spreads over the risk-free rate, keyed by rating.
pub trait RatingSpreadTable {
    /// Spread for `rating`, or `None` when the table has no entry.
    fn spread(&self, rating: Rating) -> Option<Rate>;
}

/// Built-in spreads for large non-financial firms (fractions).
///
/// Non-decreasing from Aaa down to D2.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSpreadTable;

impl RatingSpreadTable for DefaultSpreadTable {
    fn spread(&self, rating: Rating) -> Option<Rate> {
        let s = match rating {
            Rating::Aaa => dec!(0.0059),
            Rating::Aa1 => dec!(0.0065),
            Rating::Aa2 => dec!(0.0070),
            Rating::Aa3 => dec!(0.0081),
            Rating::A1 => dec!(0.0092),
            Rating::A2 => dec!(0.0107),
            Rating::A3 => dec!(0.0121),
            Rating::Baa1 => dec!(0.0134),
            Rating::Baa2 => dec!(0.0147),
            Rating::Baa3 => dec!(0.0160),
            Rating::Ba1 => dec!(0.0174),
            Rating::Ba2 => dec!(0.0221),
            Rating::Ba3 => dec!(0.0248),
            Rating::B1 => dec!(0.0275),
            Rating::B2 => dec!(0.0333),
            Rating::B3 => dec!(0.0406),
            Rating::Caa1 => dec!(0.0500),
            Rating::Caa2 => dec!(0.0600),
            Rating::Caa3 => dec!(0.0694),
            Rating::Ca => dec!(0.1007),
            Rating::C => dec!(0.1400),
            Rating::D2 => dec!(0.1900),
        };
        Some(s)
    }
}
