use thiserror::Error;

#[derive(Debug, Error)]
pub enum DcfError {
    /// Mathematically invalid or undefined input to an engine formula.
    #[error("Domain error in {computation}: {field} = {value} ({reason})")]
    Domain {
        computation: String,
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DcfError {
    /// Shorthand for building a [`DcfError::Domain`].
    pub fn domain(
        computation: &str,
        field: &str,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        DcfError::Domain {
            computation: computation.to_string(),
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, DcfError::Domain { .. })
    }
}

impl From<serde_json::Error> for DcfError {
    fn from(e: serde_json::Error) -> Self {
        DcfError::SerializationError(e.to_string())
    }
}
