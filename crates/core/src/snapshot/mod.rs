//! Point-in-time statement snapshots and diffing.
//!
//! A snapshot freezes a register's transactions for a period. Once
//! locked it never changes; later states are compared against it to
//! produce a field-level diff, which a reviewer approves or rejects.
//! Every lifecycle action lands in the audit trail.

pub mod audit;
pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use audit::{AuditAction, AuditTrailEntry};
pub use engine::SnapshotEngine;
pub use error::SnapshotError;
pub use types::{
    DiffEntry, DiffSummary, FieldChange, Reconciliation, ReconciliationStatus, Snapshot,
    SnapshotLine, SnapshotStatus,
};
