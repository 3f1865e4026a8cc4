//! Snapshot and reconciliation errors.

use thiserror::Error;

use kasira_shared::error::AppError;
use kasira_shared::types::{ReconciliationId, SnapshotId};

/// Errors produced by the snapshot lifecycle.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot does not exist.
    #[error("snapshot {0} not found")]
    NotFound(SnapshotId),

    /// Operation requires a locked snapshot.
    #[error("snapshot {0} is not locked")]
    NotLocked(SnapshotId),

    /// Snapshot is already locked and cannot change.
    #[error("snapshot {0} is already locked")]
    AlreadyLocked(SnapshotId),

    /// The captured period is empty or inverted.
    #[error("invalid period: start {start} is after end {end}")]
    InvalidPeriod {
        /// Requested period start.
        start: chrono::NaiveDate,
        /// Requested period end.
        end: chrono::NaiveDate,
    },

    /// Reconciliation does not exist.
    #[error("reconciliation {0} not found")]
    ReconciliationNotFound(ReconciliationId),

    /// Reconciliation was already approved or rejected.
    #[error("reconciliation {0} has already been reviewed")]
    AlreadyReviewed(ReconciliationId),

    /// A review decision must carry notes.
    #[error("review notes are required")]
    MissingReviewNotes,
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::NotFound(_) | SnapshotError::ReconciliationNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            SnapshotError::NotLocked(_)
            | SnapshotError::AlreadyLocked(_)
            | SnapshotError::AlreadyReviewed(_) => AppError::StateConflict(err.to_string()),
            SnapshotError::InvalidPeriod { .. } | SnapshotError::MissingReviewNotes => {
                AppError::Validation(err.to_string())
            }
        }
    }
}
