//! Snapshot lifecycle and reconciliation review operations.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use kasira_core::snapshot::audit::{AuditAction, AuditTrailEntry};
use kasira_core::snapshot::engine::SnapshotEngine;
use kasira_core::snapshot::error::SnapshotError;
use kasira_core::snapshot::types::{Reconciliation, Snapshot, SnapshotLine};
use kasira_shared::error::{AppError, AppResult};
use kasira_shared::types::{CashBankId, ReconciliationId, SnapshotId, UserId};

use crate::state::LedgerState;
use crate::state::LedgerStore;

impl LedgerStore {
    /// Generates a draft snapshot of a register's transactions for a
    /// period.
    ///
    /// Regenerating for the same register and period produces a new
    /// snapshot with a bumped version; earlier versions are kept.
    pub fn generate_snapshot(
        &self,
        register_id: CashBankId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        actor: UserId,
    ) -> AppResult<Snapshot> {
        let mut state = self.state.write();
        if !state.registers.contains_key(&register_id) {
            return Err(AppError::NotFound(format!(
                "register {register_id} not found"
            )));
        }

        let lines = Self::capture_lines(&state, register_id, period_start, period_end);
        let version = state
            .snapshots
            .values()
            .filter(|s| {
                s.register_id == register_id
                    && s.period_start == period_start
                    && s.period_end == period_end
            })
            .map(|s| s.version)
            .max()
            .unwrap_or(0)
            + 1;

        let snapshot = SnapshotEngine::new().generate(
            register_id,
            period_start,
            period_end,
            lines,
            version,
            actor,
        )?;
        info!(snapshot_id = %snapshot.id, version, lines = snapshot.lines.len(), "snapshot generated");
        state.audit.push(AuditTrailEntry::record(
            AuditAction::SnapshotGenerated,
            Some(actor),
            snapshot.id.into_inner(),
            Some(format!("version {version}")),
        ));
        state.snapshots.insert(snapshot.id, snapshot.clone());
        Ok(snapshot)
    }

    /// Locks a snapshot, freezing its content permanently.
    pub fn lock_snapshot(&self, id: SnapshotId, actor: UserId) -> AppResult<Snapshot> {
        let mut state = self.state.write();
        let snapshot = state
            .snapshots
            .get_mut(&id)
            .ok_or(SnapshotError::NotFound(id))?;
        SnapshotEngine::new().lock(snapshot)?;
        let locked = snapshot.clone();
        info!(snapshot_id = %id, "snapshot locked");
        state.audit.push(AuditTrailEntry::record(
            AuditAction::SnapshotLocked,
            Some(actor),
            id.into_inner(),
            None,
        ));
        Ok(locked)
    }

    /// Fetches a snapshot by id.
    pub fn get_snapshot(&self, id: SnapshotId) -> AppResult<Snapshot> {
        let state = self.state.read();
        state
            .snapshots
            .get(&id)
            .cloned()
            .ok_or_else(|| SnapshotError::NotFound(id).into())
    }

    /// Diffs a locked snapshot against the register's current
    /// transactions and stores the result as a pending reconciliation.
    pub fn perform_reconciliation(
        &self,
        snapshot_id: SnapshotId,
        actor: UserId,
    ) -> AppResult<Reconciliation> {
        let mut state = self.state.write();
        let snapshot = state
            .snapshots
            .get(&snapshot_id)
            .ok_or(SnapshotError::NotFound(snapshot_id))?
            .clone();

        let current = Self::capture_lines(
            &state,
            snapshot.register_id,
            snapshot.period_start,
            snapshot.period_end,
        );
        let engine = SnapshotEngine::new();
        let (diffs, summary) = engine.diff(&snapshot, &current, self.config.tolerance)?;
        let reconciliation = engine.build_reconciliation(snapshot_id, diffs, summary);

        info!(
            reconciliation_id = %reconciliation.id,
            missing = summary.missing,
            added = summary.added,
            modified = summary.modified,
            "reconciliation performed"
        );
        state.audit.push(AuditTrailEntry::record(
            AuditAction::DiffPerformed,
            Some(actor),
            reconciliation.id.into_inner(),
            Some(format!("{} differences", summary.total())),
        ));
        state
            .reconciliations
            .insert(reconciliation.id, reconciliation.clone());
        Ok(reconciliation)
    }

    /// Approves a pending reconciliation; notes are optional.
    pub fn approve_reconciliation(
        &self,
        id: ReconciliationId,
        reviewer: UserId,
        notes: &str,
    ) -> AppResult<Reconciliation> {
        self.review(id, reviewer, notes, true)
    }

    /// Rejects a pending reconciliation; requires non-empty notes.
    pub fn reject_reconciliation(
        &self,
        id: ReconciliationId,
        reviewer: UserId,
        notes: &str,
    ) -> AppResult<Reconciliation> {
        self.review(id, reviewer, notes, false)
    }

    /// Fetches a reconciliation by id.
    pub fn get_reconciliation(&self, id: ReconciliationId) -> AppResult<Reconciliation> {
        let state = self.state.read();
        state
            .reconciliations
            .get(&id)
            .cloned()
            .ok_or_else(|| SnapshotError::ReconciliationNotFound(id).into())
    }

    /// The audit trail, oldest first.
    #[must_use]
    pub fn audit_trail(&self) -> Vec<AuditTrailEntry> {
        self.state.read().audit.clone()
    }

    /// The most recent audit entries for one subject, newest first.
    #[must_use]
    pub fn audit_trail_for(&self, subject: Uuid, limit: usize) -> Vec<AuditTrailEntry> {
        let state = self.state.read();
        state
            .audit
            .iter()
            .rev()
            .filter(|e| e.subject == subject)
            .take(limit)
            .cloned()
            .collect()
    }

    fn review(
        &self,
        id: ReconciliationId,
        reviewer: UserId,
        notes: &str,
        approve: bool,
    ) -> AppResult<Reconciliation> {
        let mut state = self.state.write();
        let reconciliation = state
            .reconciliations
            .get_mut(&id)
            .ok_or(SnapshotError::ReconciliationNotFound(id))?;

        let engine = SnapshotEngine::new();
        let action = if approve {
            engine.approve(reconciliation, reviewer, notes)?;
            AuditAction::ReconciliationApproved
        } else {
            engine.reject(reconciliation, reviewer, notes)?;
            AuditAction::ReconciliationRejected
        };
        let reviewed = reconciliation.clone();

        state.audit.push(AuditTrailEntry::record(
            action,
            Some(reviewer),
            id.into_inner(),
            reviewed.review_notes.clone(),
        ));
        Ok(reviewed)
    }

    fn capture_lines(
        state: &LedgerState,
        register_id: CashBankId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Vec<SnapshotLine> {
        state
            .register_txns
            .values()
            .filter(|t| {
                t.register_id == register_id && t.date >= period_start && t.date <= period_end
            })
            .map(|t| SnapshotLine {
                transaction_id: t.id,
                date: t.date,
                description: t.description.clone(),
                amount: t.amount,
            })
            .collect()
    }
}
