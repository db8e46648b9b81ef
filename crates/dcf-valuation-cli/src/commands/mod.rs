pub mod adjustments;
pub mod cost_of_debt;
pub mod records;
pub mod valuation;

use serde::de::DeserializeOwned;
use std::error::Error;

use dcf_valuation_core::reference_data::StaticReferenceData;

use crate::input;

/// Options shared by every subcommand.
pub struct Context {
    pub reference_data: Option<String>,
    pub store: String,
    pub user: String,
}

impl Context {
    /// Reference data from `--reference-data`, else the built-in country table.
    pub fn reference(&self) -> Result<StaticReferenceData, Box<dyn Error>> {
        match &self.reference_data {
            Some(path) => {
                let data: StaticReferenceData = input::file::read_document(path)?;
                data.check_rating_labels()?;
                log::info!(
                    "reference data: {} countries, {} rating spreads",
                    data.countries.len(),
                    data.rating_spreads.len()
                );
                Ok(data)
            }
            None => Ok(StaticReferenceData::builtin()),
        }
    }
}

/// Typed request from `--input`, else from piped stdin. `None` means the
/// caller should build one from flags.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn Error>> {
    if let Some(path) = path {
        return Ok(Some(input::file::read_document(path)?));
    }
    match input::stdin::read_stdin()? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}
