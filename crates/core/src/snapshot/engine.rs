//! Snapshot construction, hashing, diffing, and review.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use super::error::SnapshotError;
use super::types::{
    DiffEntry, DiffSummary, FieldChange, Reconciliation, ReconciliationStatus, Snapshot,
    SnapshotLine, SnapshotStatus,
};
use kasira_shared::types::{
    CashBankId, CashTransactionId, ReconciliationId, SnapshotId, UserId,
};

/// Builds, seals, and compares snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotEngine;

impl SnapshotEngine {
    /// Creates a new engine instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Generates a draft snapshot from the given lines.
    ///
    /// Lines are sorted by transaction id so the content hash is
    /// independent of input order. `version` is the next version number
    /// for this (register, period).
    pub fn generate(
        &self,
        register_id: CashBankId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        mut lines: Vec<SnapshotLine>,
        version: u32,
        created_by: UserId,
    ) -> Result<Snapshot, SnapshotError> {
        if period_start > period_end {
            return Err(SnapshotError::InvalidPeriod {
                start: period_start,
                end: period_end,
            });
        }
        lines.sort_by_key(|l| l.transaction_id);
        let total: Decimal = lines.iter().map(|l| l.amount).sum();
        let content_hash = Self::content_hash(&lines);

        Ok(Snapshot {
            id: SnapshotId::new(),
            register_id,
            period_start,
            period_end,
            version,
            status: SnapshotStatus::Draft,
            lines,
            total,
            content_hash,
            created_by,
            created_at: Utc::now(),
            locked_at: None,
        })
    }

    /// Locks a draft snapshot, freezing its content.
    pub fn lock(&self, snapshot: &mut Snapshot) -> Result<(), SnapshotError> {
        if snapshot.is_locked() {
            return Err(SnapshotError::AlreadyLocked(snapshot.id));
        }
        snapshot.status = SnapshotStatus::Locked;
        snapshot.locked_at = Some(Utc::now());
        Ok(())
    }

    /// Verifies a snapshot's content against its sealed hash.
    #[must_use]
    pub fn verify(&self, snapshot: &Snapshot) -> bool {
        Self::content_hash(&snapshot.lines) == snapshot.content_hash
    }

    /// Diffs a locked snapshot against the current lines.
    ///
    /// Lines are matched by transaction id. Amounts that differ by no
    /// more than `tolerance` count as unchanged. Results are ordered:
    /// missing, then added, then modified, each by transaction id.
    pub fn diff(
        &self,
        snapshot: &Snapshot,
        current: &[SnapshotLine],
        tolerance: Decimal,
    ) -> Result<(Vec<DiffEntry>, DiffSummary), SnapshotError> {
        if !snapshot.is_locked() {
            return Err(SnapshotError::NotLocked(snapshot.id));
        }

        let frozen: BTreeMap<CashTransactionId, &SnapshotLine> = snapshot
            .lines
            .iter()
            .map(|l| (l.transaction_id, l))
            .collect();
        let live: BTreeMap<CashTransactionId, &SnapshotLine> =
            current.iter().map(|l| (l.transaction_id, l)).collect();

        let mut diffs = Vec::new();
        let mut summary = DiffSummary::default();

        for (id, line) in &frozen {
            if !live.contains_key(id) {
                summary.variance -= line.amount;
                diffs.push(DiffEntry::Missing {
                    line: (*line).clone(),
                });
                summary.missing += 1;
            }
        }
        for (id, line) in &live {
            if !frozen.contains_key(id) {
                summary.variance += line.amount;
                diffs.push(DiffEntry::Added {
                    line: (*line).clone(),
                });
                summary.added += 1;
            }
        }
        for (id, before) in &frozen {
            let Some(after) = live.get(id) else { continue };
            let changes = Self::field_changes(before, after, tolerance);
            if changes.is_empty() {
                summary.unchanged += 1;
            } else {
                if (after.amount - before.amount).abs() > tolerance {
                    summary.variance += after.amount - before.amount;
                }
                diffs.push(DiffEntry::Modified {
                    transaction_id: *id,
                    changes,
                });
                summary.modified += 1;
            }
        }

        Ok((diffs, summary))
    }

    /// Builds a pending reconciliation from a diff.
    #[must_use]
    pub fn build_reconciliation(
        &self,
        snapshot_id: SnapshotId,
        diffs: Vec<DiffEntry>,
        summary: DiffSummary,
    ) -> Reconciliation {
        Reconciliation {
            id: ReconciliationId::new(),
            snapshot_id,
            diffs,
            summary,
            variance: summary.variance,
            status: ReconciliationStatus::Pending,
            review_notes: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Approves a pending reconciliation. Notes are optional.
    pub fn approve(
        &self,
        reconciliation: &mut Reconciliation,
        reviewer: UserId,
        notes: &str,
    ) -> Result<(), SnapshotError> {
        self.review(reconciliation, reviewer, notes, ReconciliationStatus::Approved)
    }

    /// Rejects a pending reconciliation. A rejection must say why, so
    /// non-empty notes are required.
    pub fn reject(
        &self,
        reconciliation: &mut Reconciliation,
        reviewer: UserId,
        notes: &str,
    ) -> Result<(), SnapshotError> {
        self.review(reconciliation, reviewer, notes, ReconciliationStatus::Rejected)
    }

    fn review(
        &self,
        reconciliation: &mut Reconciliation,
        reviewer: UserId,
        notes: &str,
        decision: ReconciliationStatus,
    ) -> Result<(), SnapshotError> {
        if reconciliation.status != ReconciliationStatus::Pending {
            return Err(SnapshotError::AlreadyReviewed(reconciliation.id));
        }
        let notes = notes.trim();
        if decision == ReconciliationStatus::Rejected && notes.is_empty() {
            return Err(SnapshotError::MissingReviewNotes);
        }
        reconciliation.status = decision;
        reconciliation.review_notes = (!notes.is_empty()).then(|| notes.to_string());
        reconciliation.reviewed_by = Some(reviewer);
        reconciliation.reviewed_at = Some(Utc::now());
        Ok(())
    }

    fn field_changes(
        before: &SnapshotLine,
        after: &SnapshotLine,
        tolerance: Decimal,
    ) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        if before.date != after.date {
            changes.push(FieldChange {
                field: "date".to_string(),
                before: before.date.to_string(),
                after: after.date.to_string(),
            });
        }
        if before.description != after.description {
            changes.push(FieldChange {
                field: "description".to_string(),
                before: before.description.clone(),
                after: after.description.clone(),
            });
        }
        if (before.amount - after.amount).abs() > tolerance {
            changes.push(FieldChange {
                field: "amount".to_string(),
                before: before.amount.to_string(),
                after: after.amount.to_string(),
            });
        }
        changes
    }

    /// SHA-256 over the canonical line serialization, hex-encoded.
    fn content_hash(lines: &[SnapshotLine]) -> String {
        let mut hasher = Sha256::new();
        for line in lines {
            hasher.update(line.transaction_id.to_string().as_bytes());
            hasher.update(b"|");
            hasher.update(line.date.to_string().as_bytes());
            hasher.update(b"|");
            hasher.update(line.description.as_bytes());
            hasher.update(b"|");
            hasher.update(line.amount.to_string().as_bytes());
            hasher.update(b"\n");
        }
        let digest = hasher.finalize();
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            use std::fmt::Write as _;
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }
}
