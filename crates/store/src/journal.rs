//! Journal entry lifecycle operations.
//!
//! All mutations run under the write lock, so an entry's lines and the
//! cached balance updates they imply commit as one unit.

use chrono::Utc;
use tracing::info;

use kasira_core::ledger::error::LedgerError;
use kasira_core::ledger::reversal::ReversalService;
use kasira_core::ledger::service::LedgerService;
use kasira_core::ledger::types::{
    CreateEntryInput, EntryStatus, EntryTotals, JournalEntry, JournalLine, SourceType,
};
use kasira_core::ledger::validation::validate_entry;
use kasira_shared::error::AppResult;
use kasira_shared::types::{JournalEntryId, JournalLineId, PaymentId, SaleId, UserId};

use crate::state::{LedgerState, LedgerStore};

impl LedgerStore {
    /// Validates and posts a journal entry in one step.
    pub fn post_entry(&self, input: CreateEntryInput) -> AppResult<JournalEntry> {
        let mut state = self.state.write();
        let totals = Self::validate(&state, &input, self.config.tolerance)?;

        let mut entry = Self::build_entry(input, totals);
        entry.status = EntryStatus::Posted;
        entry.posted_at = Some(Utc::now());

        Self::apply_to_cache(&mut state, &entry, false);
        info!(entry_id = %entry.id, debit = %entry.total_debit, "journal entry posted");
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    /// Validates and stores a draft entry. Drafts never touch balances.
    pub fn save_draft(&self, input: CreateEntryInput) -> AppResult<JournalEntry> {
        let mut state = self.state.write();
        let totals = Self::validate(&state, &input, self.config.tolerance)?;

        let entry = Self::build_entry(input, totals);
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    /// Posts a previously saved draft.
    ///
    /// Accounts are re-validated at posting time; a draft referencing a
    /// since-deleted account will not post.
    pub fn post_draft(&self, id: JournalEntryId) -> AppResult<JournalEntry> {
        let mut state = self.state.write();

        let entry = state
            .entries
            .get(&id)
            .ok_or(LedgerError::EntryNotFound(id))?
            .clone();
        LedgerService::new().validate_can_post(&entry)?;

        let input = CreateEntryInput {
            source_type: entry.source_type,
            source_id: entry.source_id,
            entry_date: entry.entry_date,
            description: entry.description.clone(),
            notes: entry.notes.clone(),
            lines: entry
                .lines
                .iter()
                .map(|l| kasira_core::ledger::types::JournalLineInput {
                    account_id: l.account_id,
                    debit: l.debit,
                    credit: l.credit,
                    description: l.description.clone(),
                })
                .collect(),
            created_by: entry.created_by,
        };
        Self::validate(&state, &input, self.config.tolerance)?;

        let mut posted = entry;
        posted.status = EntryStatus::Posted;
        posted.posted_at = Some(Utc::now());
        Self::apply_to_cache(&mut state, &posted, false);
        info!(entry_id = %id, "draft posted");
        state.entries.insert(id, posted.clone());
        Ok(posted)
    }

    /// Deletes a draft entry. Posted entries are immutable.
    pub fn delete_draft(&self, id: JournalEntryId) -> AppResult<()> {
        let mut state = self.state.write();
        let entry = state
            .entries
            .get(&id)
            .ok_or(LedgerError::EntryNotFound(id))?;
        LedgerService::new().validate_can_delete(entry)?;
        state.entries.remove(&id);
        Ok(())
    }

    /// Reverses a posted entry with a mirrored adjustment entry.
    ///
    /// The original and the reversal are linked both ways; reversing the
    /// same entry twice fails.
    pub fn reverse_entry(
        &self,
        id: JournalEntryId,
        actor: UserId,
        reason: &str,
    ) -> AppResult<JournalEntry> {
        let mut state = self.state.write();

        let original = state
            .entries
            .get(&id)
            .ok_or(LedgerError::EntryNotFound(id))?
            .clone();
        let input = ReversalService::new().build_reversing_entry(&original, actor, reason)?;
        let totals = Self::validate(&state, &input, self.config.tolerance)?;

        let mut reversal = Self::build_entry(input, totals);
        reversal.status = EntryStatus::Posted;
        reversal.posted_at = Some(Utc::now());
        reversal.reverses = Some(id);

        Self::apply_to_cache(&mut state, &reversal, false);
        if let Some(entry) = state.entries.get_mut(&id) {
            entry.reversed_by = Some(reversal.id);
        }
        info!(entry_id = %id, reversal_id = %reversal.id, "journal entry reversed");
        state.entries.insert(reversal.id, reversal.clone());
        Ok(reversal)
    }

    /// Fetches an entry by id.
    pub fn get_entry(&self, id: JournalEntryId) -> AppResult<JournalEntry> {
        let state = self.state.read();
        state
            .entries
            .get(&id)
            .cloned()
            .ok_or_else(|| LedgerError::EntryNotFound(id).into())
    }

    /// Lists all entries, ordered by id (creation order).
    #[must_use]
    pub fn list_entries(&self) -> Vec<JournalEntry> {
        let state = self.state.read();
        state.entries.values().cloned().collect()
    }

    pub(crate) fn validate(
        state: &LedgerState,
        input: &CreateEntryInput,
        tolerance: rust_decimal::Decimal,
    ) -> Result<EntryTotals, LedgerError> {
        // Document-backed entries must reference a document that exists.
        if let Some(source_id) = input.source_id {
            let exists = match input.source_type {
                SourceType::Sale => state.sales.contains_key(&SaleId::from_uuid(source_id)),
                SourceType::Purchase => state
                    .purchases
                    .contains_key(&kasira_shared::types::PurchaseId::from_uuid(source_id)),
                SourceType::Payment => {
                    state.payments.contains_key(&PaymentId::from_uuid(source_id))
                }
                SourceType::Manual | SourceType::Adjustment => true,
            };
            if !exists {
                return Err(LedgerError::SourceDocumentNotFound(source_id));
            }
        }

        validate_entry(input, tolerance, |id| {
            state.accounts.get(&id).filter(|a| a.is_live())
        })
    }

    pub(crate) fn build_entry(input: CreateEntryInput, totals: EntryTotals) -> JournalEntry {
        let id = JournalEntryId::new();
        let lines = input
            .lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| JournalLine {
                id: JournalLineId::new(),
                journal_id: id,
                account_id: line.account_id,
                line_number: u32::try_from(i + 1).unwrap_or(u32::MAX),
                debit: line.debit,
                credit: line.credit,
                description: line.description,
            })
            .collect();

        JournalEntry {
            id,
            source_type: input.source_type,
            source_id: input.source_id,
            entry_date: input.entry_date,
            description: input.description,
            notes: input.notes,
            status: EntryStatus::Draft,
            total_debit: totals.debit,
            total_credit: totals.credit,
            reverses: None,
            reversed_by: None,
            created_by: input.created_by,
            created_at: Utc::now(),
            posted_at: None,
            lines,
        }
    }

    /// Applies a posted entry's lines to the cached balance column.
    ///
    /// `undo` subtracts instead of adding. The cache is best-effort
    /// bookkeeping; the aggregator remains the source of truth.
    pub(crate) fn apply_to_cache(state: &mut LedgerState, entry: &JournalEntry, undo: bool) {
        for line in &entry.lines {
            if let Some(account) = state.accounts.get_mut(&line.account_id) {
                let change = line.balance_change(account.account_type);
                if undo {
                    account.balance -= change;
                } else {
                    account.balance += change;
                }
            }
        }
    }
}
