//! Optional adjustments applied to reported financials before valuation.

pub mod capitalization;
pub mod lease;
pub mod schedule;
pub mod trapped_cash;

pub use capitalization::{capitalize, CapitalizationOptions, CapitalizationResult, ZeroAmountPolicy};
pub use lease::{capitalize_leases, LeaseAdjustment};
pub use schedule::ExpenseScheduleEntry;
pub use trapped_cash::compute_trapped_cash_value;
