//! Single-source-of-truth balance aggregation.
//!
//! Every balance in the system derives from one computation: sum the
//! lines of recognized POSTED journal entries. The cached per-account
//! balance column exists only as a degraded fallback, and any figure
//! served from it is flagged with its source.

pub mod aggregator;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::BalanceAggregator;
pub use types::{AccountBalanceView, BalanceSource, StatusFilter};
