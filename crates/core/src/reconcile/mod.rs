//! Balance synchronization checks and auto-healing plans.
//!
//! Cached account balances can drift from the journal-derived truth.
//! This module detects such discrepancies, classifies their cause, and
//! produces the corrective actions that realign the cache with the
//! single source of truth.

pub mod service;
pub mod types;

pub use service::ReconcileService;
pub use types::{
    AutoFixResult, BalanceDiscrepancy, CashRegister, CashRegisterTransaction, DiscrepancyCause,
    FixAction, HealthCheckOutcome, SyncCheckResult, SyncStatus, ValidationReport, ValidationRow,
};
