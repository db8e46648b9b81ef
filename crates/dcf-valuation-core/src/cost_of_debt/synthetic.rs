use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DcfError;
use crate::types::{Money, Multiple};
use crate::DcfResult;

use super::rating::Rating;

/// Size class selecting the coverage breakpoint table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirmSize {
    #[default]
    #[serde(alias = "large-cap")]
    Large,
    #[serde(alias = "small-cap")]
    Small,
}

/// Lower coverage bound (inclusive) for each rating, best first.
/// Coverage below the last bound maps to D2.
const LARGE_CAP_BREAKPOINTS: [(Multiple, Rating); 14] = [
    (dec!(8.5), Rating::Aaa),
    (dec!(6.5), Rating::Aa2),
    (dec!(5.5), Rating::A1),
    (dec!(4.25), Rating::A2),
    (dec!(3.0), Rating::A3),
    (dec!(2.5), Rating::Baa2),
    (dec!(2.25), Rating::Ba1),
    (dec!(2.0), Rating::Ba2),
    (dec!(1.75), Rating::B1),
    (dec!(1.5), Rating::B2),
    (dec!(1.25), Rating::B3),
    (dec!(0.8), Rating::Caa3),
    (dec!(0.65), Rating::Ca),
    (dec!(0.2), Rating::C),
];

/// Smaller, riskier firms need more coverage for the same rating.
const SMALL_CAP_BREAKPOINTS: [(Multiple, Rating); 14] = [
    (dec!(12.5), Rating::Aaa),
    (dec!(9.5), Rating::Aa2),
    (dec!(7.5), Rating::A1),
    (dec!(6.0), Rating::A2),
    (dec!(4.5), Rating::A3),
    (dec!(4.0), Rating::Baa2),
    (dec!(3.5), Rating::Ba1),
    (dec!(3.0), Rating::Ba2),
    (dec!(2.5), Rating::B1),
    (dec!(2.0), Rating::B2),
    (dec!(1.5), Rating::B3),
    (dec!(1.25), Rating::Caa3),
    (dec!(0.8), Rating::Ca),
    (dec!(0.5), Rating::C),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticRating {
    pub interest_coverage: Multiple,
    pub rating: Rating,
    pub rationale: String,
}

/// Interest coverage (EBIT / interest expense).
pub fn interest_coverage(ebit: Money, interest_expense: Money) -> DcfResult<Multiple> {
    if interest_expense.is_zero() {
        return Err(DcfError::domain(
            "synthetic rating",
            "interest_expense",
            interest_expense,
            "interest coverage is undefined when interest expense is zero",
        ));
    }
    if interest_expense < Decimal::ZERO {
        return Err(DcfError::domain(
            "synthetic rating",
            "interest_expense",
            interest_expense,
            "interest expense must be positive",
        ));
    }
    Ok(ebit / interest_expense)
}

/// Map a coverage ratio to a rating through the size-specific breakpoint table.
pub fn rating_for_coverage(coverage: Multiple, size: FirmSize) -> Rating {
    let table: &[(Multiple, Rating)] = match size {
        FirmSize::Large => &LARGE_CAP_BREAKPOINTS,
        FirmSize::Small => &SMALL_CAP_BREAKPOINTS,
    };
    table
        .iter()
        .find(|(floor, _)| coverage >= *floor)
        .map(|(_, rating)| *rating)
        .unwrap_or(Rating::D2)
}

/// Derive a synthetic rating from EBIT and interest expense.
pub fn synthetic_rating(
    ebit: Money,
    interest_expense: Money,
    size: FirmSize,
) -> DcfResult<SyntheticRating> {
    let coverage = interest_coverage(ebit, interest_expense)?;
    let rating = rating_for_coverage(coverage, size);
    let size_label = match size {
        FirmSize::Large => "large-cap",
        FirmSize::Small => "small-cap",
    };
    Ok(SyntheticRating {
        interest_coverage: coverage,
        rating,
        rationale: format!(
            "Coverage {:.2}x on the {size_label} table => {rating}",
            coverage
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interest_expense_is_domain_error() {
        let err = synthetic_rating(dec!(1000), Decimal::ZERO, FirmSize::Large).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_large_cap_mapping() {
        assert_eq!(rating_for_coverage(dec!(10), FirmSize::Large), Rating::Aaa);
        assert_eq!(rating_for_coverage(dec!(8.5), FirmSize::Large), Rating::Aaa);
        assert_eq!(rating_for_coverage(dec!(5.0), FirmSize::Large), Rating::A2);
        assert_eq!(rating_for_coverage(dec!(1.0), FirmSize::Large), Rating::Caa3);
        assert_eq!(rating_for_coverage(dec!(0.1), FirmSize::Large), Rating::D2);
    }

    #[test]
    fn test_small_cap_needs_more_coverage() {
        assert_eq!(rating_for_coverage(dec!(10), FirmSize::Small), Rating::Aa2);
        assert_eq!(rating_for_coverage(dec!(5.0), FirmSize::Small), Rating::A3);
        for pair in [dec!(0.3), dec!(1.3), dec!(2.6), dec!(4.8), dec!(9.0)] {
            assert!(
                rating_for_coverage(pair, FirmSize::Small)
                    <= rating_for_coverage(pair, FirmSize::Large)
            );
        }
    }

    #[test]
    fn test_negative_ebit_defaults() {
        let r = synthetic_rating(dec!(-50), dec!(100), FirmSize::Large).unwrap();
        assert_eq!(r.interest_coverage, dec!(-0.5));
        assert_eq!(r.rating, Rating::D2);
    }

    #[test]
    fn test_tables_strictly_descending() {
        for table in [LARGE_CAP_BREAKPOINTS, SMALL_CAP_BREAKPOINTS] {
            assert!(table.windows(2).all(|w| w[0].0 > w[1].0 && w[0].1 > w[1].1));
        }
    }
}
