//! Journal entry lifecycle rules.

use super::error::LedgerError;
use super::types::{EntryStatus, JournalEntry};

/// Stateless lifecycle validator for journal entries.
///
/// Drafts may be edited, posted, or deleted. Posting is one-way: once an
/// entry is posted it can only be corrected with a reversing entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerService;

impl LedgerService {
    /// Creates a new service instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Checks that a draft can transition to posted.
    pub fn validate_can_post(&self, entry: &JournalEntry) -> Result<(), LedgerError> {
        if entry.status != EntryStatus::Draft {
            return Err(LedgerError::NotDraft(entry.id));
        }
        Ok(())
    }

    /// Checks that an entry can be deleted (drafts only).
    pub fn validate_can_delete(&self, entry: &JournalEntry) -> Result<(), LedgerError> {
        if entry.status.is_immutable() {
            return Err(LedgerError::CannotDeletePosted(entry.id));
        }
        Ok(())
    }

    /// Checks that an entry can be reversed: it must be posted and not
    /// already reversed.
    pub fn validate_can_reverse(&self, entry: &JournalEntry) -> Result<(), LedgerError> {
        if entry.status != EntryStatus::Posted {
            return Err(LedgerError::NotPosted(entry.id));
        }
        if entry.reversed_by.is_some() {
            return Err(LedgerError::AlreadyReversed(entry.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::SourceType;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use kasira_shared::types::{JournalEntryId, UserId};

    fn entry(status: EntryStatus) -> JournalEntry {
        JournalEntry {
            id: JournalEntryId::new(),
            source_type: SourceType::Manual,
            source_id: None,
            entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: "Test".to_string(),
            notes: None,
            status,
            total_debit: dec!(100),
            total_credit: dec!(100),
            reverses: None,
            reversed_by: None,
            created_by: UserId::new(),
            created_at: Utc::now(),
            posted_at: None,
            lines: vec![],
        }
    }

    #[test]
    fn test_draft_can_post() {
        let service = LedgerService::new();
        assert!(service.validate_can_post(&entry(EntryStatus::Draft)).is_ok());
    }

    #[test]
    fn test_posted_cannot_post_again() {
        let service = LedgerService::new();
        let result = service.validate_can_post(&entry(EntryStatus::Posted));
        assert!(matches!(result, Err(LedgerError::NotDraft(_))));
    }

    #[test]
    fn test_posted_cannot_delete() {
        let service = LedgerService::new();
        let result = service.validate_can_delete(&entry(EntryStatus::Posted));
        assert!(matches!(result, Err(LedgerError::CannotDeletePosted(_))));
    }

    #[test]
    fn test_draft_can_delete() {
        let service = LedgerService::new();
        assert!(service.validate_can_delete(&entry(EntryStatus::Draft)).is_ok());
    }

    #[test]
    fn test_only_posted_can_reverse() {
        let service = LedgerService::new();
        let result = service.validate_can_reverse(&entry(EntryStatus::Draft));
        assert!(matches!(result, Err(LedgerError::NotPosted(_))));
    }

    #[test]
    fn test_double_reversal_rejected() {
        let service = LedgerService::new();
        let mut posted = entry(EntryStatus::Posted);
        posted.reversed_by = Some(JournalEntryId::new());
        let result = service.validate_can_reverse(&posted);
        assert!(matches!(result, Err(LedgerError::AlreadyReversed(_))));
    }
}
