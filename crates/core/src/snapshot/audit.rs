//! Audit trail for snapshot and healing operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kasira_shared::types::{AuditEntryId, UserId};

/// Auditable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A snapshot was generated.
    SnapshotGenerated,
    /// A snapshot was locked.
    SnapshotLocked,
    /// A diff against a locked snapshot was computed.
    DiffPerformed,
    /// A reconciliation was approved.
    ReconciliationApproved,
    /// A reconciliation was rejected.
    ReconciliationRejected,
    /// Cached balances were rewritten by the auto-fixer.
    BalancesAutoFixed,
    /// Missing cost-of-goods-sold entries were backfilled.
    CogsBackfilled,
}

/// One immutable audit trail record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTrailEntry {
    /// Unique identifier.
    pub id: AuditEntryId,
    /// What happened.
    pub action: AuditAction,
    /// Who did it (absent for scheduled jobs).
    pub actor: Option<UserId>,
    /// The affected object (snapshot, reconciliation, account).
    pub subject: Uuid,
    /// Free-form details (review notes, fix counts).
    pub details: Option<String>,
    /// When it happened.
    pub recorded_at: DateTime<Utc>,
}

impl AuditTrailEntry {
    /// Records a new audit entry now.
    #[must_use]
    pub fn record(
        action: AuditAction,
        actor: Option<UserId>,
        subject: Uuid,
        details: Option<String>,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            action,
            actor,
            subject,
            details,
            recorded_at: Utc::now(),
        }
    }
}
