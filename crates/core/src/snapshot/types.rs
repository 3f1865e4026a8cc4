//! Snapshot and reconciliation types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kasira_shared::types::{
    CashBankId, CashTransactionId, ReconciliationId, SnapshotId, UserId,
};

/// Snapshot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    /// Freshly generated; may be regenerated.
    Draft,
    /// Frozen; content is immutable and hash-sealed.
    Locked,
}

/// One transaction captured by a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLine {
    /// The captured transaction.
    pub transaction_id: CashTransactionId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Transaction description.
    pub description: String,
    /// Signed amount.
    pub amount: Decimal,
}

/// A frozen view of a register's transactions over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unique identifier.
    pub id: SnapshotId,
    /// The register captured.
    pub register_id: CashBankId,
    /// First day of the captured period.
    pub period_start: NaiveDate,
    /// Last day of the captured period.
    pub period_end: NaiveDate,
    /// Version number within (register, period); regenerating bumps it.
    pub version: u32,
    /// Lifecycle status.
    pub status: SnapshotStatus,
    /// Captured lines, ordered by transaction id.
    pub lines: Vec<SnapshotLine>,
    /// Sum of captured amounts.
    pub total: Decimal,
    /// SHA-256 digest of the captured content, hex-encoded.
    pub content_hash: String,
    /// The user who generated the snapshot.
    pub created_by: UserId,
    /// When the snapshot was generated.
    pub created_at: DateTime<Utc>,
    /// When the snapshot was locked.
    pub locked_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Returns true when the snapshot is frozen.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.status == SnapshotStatus::Locked
    }
}

/// A change to one field of a captured transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Field name ("date", "description", "amount").
    pub field: String,
    /// Value at snapshot time.
    pub before: String,
    /// Current value.
    pub after: String,
}

/// One difference between a snapshot and the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind")]
pub enum DiffEntry {
    /// Present in the snapshot, gone from the current state.
    Missing {
        /// The captured line that disappeared.
        line: SnapshotLine,
    },
    /// Absent from the snapshot, present in the current state.
    Added {
        /// The new line.
        line: SnapshotLine,
    },
    /// Present in both but with changed fields.
    Modified {
        /// The affected transaction.
        transaction_id: CashTransactionId,
        /// The changed fields.
        changes: Vec<FieldChange>,
    },
}

/// Counts per diff kind, plus the net amount drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Lines that disappeared.
    pub missing: usize,
    /// Lines that appeared.
    pub added: usize,
    /// Lines that changed.
    pub modified: usize,
    /// Lines present in both states with no reportable change.
    pub unchanged: usize,
    /// Net amount drift: current total minus snapshot total, over the
    /// reported differences.
    pub variance: Decimal,
}

impl DiffSummary {
    /// Total number of differences.
    #[must_use]
    pub fn total(&self) -> usize {
        self.missing + self.added + self.modified
    }

    /// Returns true when nothing changed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

/// Review status of a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationStatus {
    /// Awaiting review.
    Pending,
    /// Differences accepted by a reviewer.
    Approved,
    /// Differences rejected; the period needs rework.
    Rejected,
}

/// A reviewed comparison between a locked snapshot and a later state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Unique identifier.
    pub id: ReconciliationId,
    /// The locked snapshot compared against.
    pub snapshot_id: SnapshotId,
    /// The computed differences.
    pub diffs: Vec<DiffEntry>,
    /// Counts per diff kind.
    pub summary: DiffSummary,
    /// Net amount drift carried over from the summary.
    pub variance: Decimal,
    /// Review status.
    pub status: ReconciliationStatus,
    /// Reviewer's notes, set at approval or rejection.
    pub review_notes: Option<String>,
    /// The reviewing user.
    pub reviewed_by: Option<UserId>,
    /// When the review happened.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// When the comparison ran.
    pub created_at: DateTime<Utc>,
}
