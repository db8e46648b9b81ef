use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::cost_of_debt::{DefaultSpreadTable, Rating, RatingSpreadTable};
use crate::types::{Currency, Rate};
use crate::DcfResult;

/// Country-level figures used to pre-fill and resolve a valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryProfile {
    pub currency: Currency,
    pub marginal_tax_rate: Rate,
    /// Country default spread over the mature-market risk-free rate.
    #[serde(default)]
    pub spread: Rate,
}

/// Market and country lookups the engine consults.
pub trait ReferenceData {
    fn lookup_country(&self, name: &str) -> Option<CountryProfile>;
    fn lookup_rating_spread(&self, rating: Rating) -> Option<Rate>;
    fn default_risk_free_rate(&self) -> Option<Rate>;
}

/// Adapts any [`ReferenceData`] to the spread table the cost-of-debt resolver reads.
pub struct ReferenceSpreads<'a>(pub &'a dyn ReferenceData);

impl RatingSpreadTable for ReferenceSpreads<'_> {
    fn spread(&self, rating: Rating) -> Option<Rate> {
        self.0.lookup_rating_spread(rating)
    }
}

/// Reference data loaded from a JSON or YAML document.
///
/// ```yaml
/// risk_free_rate: "0.042"
/// countries:
///   United States: { currency: USD, marginal_tax_rate: "0.25" }
/// rating_spreads:
///   Baa2: "0.0147"
/// ```
///
/// Ratings missing from `rating_spreads` fall back to [`DefaultSpreadTable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticReferenceData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_free_rate: Option<Rate>,
    #[serde(default)]
    pub countries: BTreeMap<String, CountryProfile>,
    /// Keyed by rating label ("Aaa", "Baa2", ...).
    #[serde(default)]
    pub rating_spreads: BTreeMap<String, Rate>,
}

impl StaticReferenceData {
    pub fn from_json(json: &str) -> DcfResult<Self> {
        let data: StaticReferenceData = serde_json::from_str(json)?;
        data.check_rating_labels()?;
        Ok(data)
    }

    /// A handful of common countries with statutory marginal tax rates.
    pub fn builtin() -> Self {
        let mut countries = BTreeMap::new();
        let mut add = |name: &str, currency: Currency, tax: Rate, spread: Rate| {
            countries.insert(
                name.to_string(),
                CountryProfile {
                    currency,
                    marginal_tax_rate: tax,
                    spread,
                },
            );
        };
        add("United States", Currency::USD, dec!(0.25), Decimal::ZERO);
        add("United Kingdom", Currency::GBP, dec!(0.25), dec!(0.0061));
        add("Germany", Currency::EUR, dec!(0.30), Decimal::ZERO);
        add("Switzerland", Currency::CHF, dec!(0.1970), Decimal::ZERO);
        add("Japan", Currency::JPY, dec!(0.3062), dec!(0.0081));
        add("Canada", Currency::CAD, dec!(0.265), Decimal::ZERO);
        add("Australia", Currency::AUD, dec!(0.30), Decimal::ZERO);
        add("Hong Kong", Currency::HKD, dec!(0.165), dec!(0.0070));
        add("Singapore", Currency::SGD, dec!(0.17), Decimal::ZERO);
        add("India", Currency::INR, dec!(0.2517), dec!(0.0218));

        StaticReferenceData {
            risk_free_rate: None,
            countries,
            rating_spreads: BTreeMap::new(),
        }
    }

    /// Reject documents whose spread keys are not ratings.
    pub fn check_rating_labels(&self) -> DcfResult<()> {
        for label in self.rating_spreads.keys() {
            Rating::from_str(label)?;
        }
        Ok(())
    }

    fn document_spread(&self, rating: Rating) -> Option<Rate> {
        self.rating_spreads
            .iter()
            .find(|(label, _)| label.trim().eq_ignore_ascii_case(rating.as_str()))
            .map(|(_, spread)| *spread)
    }
}

impl ReferenceData for StaticReferenceData {
    fn lookup_country(&self, name: &str) -> Option<CountryProfile> {
        let name = name.trim();
        let found = self
            .countries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, p)| p.clone());
        if found.is_none() && !name.is_empty() {
            log::warn!("no reference data for country '{name}'");
        }
        found
    }

    fn lookup_rating_spread(&self, rating: Rating) -> Option<Rate> {
        self.document_spread(rating).or_else(|| {
            if !self.rating_spreads.is_empty() {
                log::debug!("rating {rating} not in loaded spreads; using built-in table");
            }
            DefaultSpreadTable.spread(rating)
        })
    }

    fn default_risk_free_rate(&self) -> Option<Rate> {
        self.risk_free_rate
    }
}

impl RatingSpreadTable for StaticReferenceData {
    fn spread(&self, rating: Rating) -> Option<Rate> {
        self.lookup_rating_spread(rating)
    }
}
