pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "adjustments")]
pub mod adjustments;

#[cfg(feature = "adjustments")]
pub mod cost_of_debt;

#[cfg(feature = "adjustments")]
pub mod convertible;

#[cfg(feature = "adjustments")]
pub mod input;

#[cfg(feature = "adjustments")]
pub mod normalize;

#[cfg(feature = "adjustments")]
pub mod form;

#[cfg(feature = "adjustments")]
pub mod reference_data;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "valuation")]
pub mod session;

#[cfg(feature = "persistence")]
pub mod persistence;

pub use error::DcfError;
pub use types::*;

/// Standard result type for all valuation engine operations
pub type DcfResult<T> = Result<T, DcfError>;
