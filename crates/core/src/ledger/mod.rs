//! Double-entry posting state machine.
//!
//! This module implements the core ledger functionality:
//! - Journal entry and line domain types
//! - Balance validation within a configurable tolerance
//! - The DRAFT → POSTED lifecycle (posted entries are immutable)
//! - Reversing-entry construction for corrections
//! - The source-recognition policy gating aggregation

pub mod error;
pub mod recognition;
pub mod reversal;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use recognition::RecognitionPolicy;
pub use reversal::ReversalService;
pub use service::LedgerService;
pub use types::{
    Account, AccountType, CreateEntryInput, EntryStatus, EntryTotals, JournalEntry, JournalLine,
    JournalLineInput, SourceType,
};
pub use validation::validate_entry;
