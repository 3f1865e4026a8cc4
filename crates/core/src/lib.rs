//! Core business logic for Kasira.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here; the store crate applies them transactionally.
//!
//! # Modules
//!
//! - `ledger` - Double-entry posting state machine and validation
//! - `documents` - Source documents (sales, purchases, payments)
//! - `balance` - Single-source-of-truth balance aggregation
//! - `reports` - Stateless report formatters over aggregator output
//! - `reconcile` - Subsidiary-vs-GL discrepancy detection and healing plans
//! - `snapshot` - Immutable bank-statement snapshots and diffing
//! - `valuation` - Inventory costing (FIFO/LIFO/weighted average) and COGS

pub mod balance;
pub mod documents;
pub mod ledger;
pub mod reconcile;
pub mod reports;
pub mod snapshot;
pub mod valuation;
