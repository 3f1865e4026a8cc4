//! Transactional in-process store for the Kasira ledger.
//!
//! All records live in a single `LedgerState` guarded by one
//! reader-writer lock. Taking the write lock serializes every mutation,
//! which makes multi-line journal commits atomic and gives per-account
//! posting a strict order; the read lock yields a consistent
//! point-in-time view for aggregation and reporting.

mod accounts;
mod balances;
mod documents;
mod journal;
mod reconcile;
mod snapshot;
mod state;
mod valuation;

pub use accounts::NewAccount;
pub use documents::{NewPurchase, NewSale};
pub use state::LedgerStore;
