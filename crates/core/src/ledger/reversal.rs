//! Reversing-entry construction.
//!
//! Posted entries are never edited. A correction is expressed as a new
//! entry whose lines mirror the original with debit and credit swapped,
//! so the net effect on every account is zero.

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{CreateEntryInput, JournalEntry, JournalLineInput, SourceType};
use kasira_shared::types::UserId;

/// Builds reversing entries for posted journal entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReversalService;

impl ReversalService {
    /// Creates a new service instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the input for an entry that reverses `original`.
    ///
    /// The original must be posted and not already reversed. The
    /// reversing entry swaps each line's debit and credit and is tagged
    /// as an adjustment referencing the original entry.
    pub fn build_reversing_entry(
        &self,
        original: &JournalEntry,
        actor: UserId,
        reason: &str,
    ) -> Result<CreateEntryInput, LedgerError> {
        LedgerService::new().validate_can_reverse(original)?;

        let lines = original
            .lines
            .iter()
            .map(|line| JournalLineInput {
                account_id: line.account_id,
                debit: line.credit,
                credit: line.debit,
                description: line.description.clone(),
            })
            .collect();

        Ok(CreateEntryInput {
            source_type: SourceType::Adjustment,
            source_id: original.source_id,
            entry_date: original.entry_date,
            description: format!("Reversal of {}: {}", original.id, original.description),
            notes: Some(reason.to_string()),
            lines,
            created_by: actor,
        })
    }
}
