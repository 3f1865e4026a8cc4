//! Ledger domain errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use kasira_shared::error::AppError;
use kasira_shared::types::{AccountId, JournalEntryId};

/// Errors produced by ledger validation and lifecycle checks.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A journal entry must carry at least one line.
    #[error("journal entry has no lines")]
    EmptyEntry,

    /// A line carried a negative debit or credit.
    #[error("line {line} has a negative amount")]
    NegativeAmount {
        /// 1-based line number.
        line: usize,
    },

    /// A line carried neither a debit nor a credit.
    #[error("line {line} has zero debit and zero credit")]
    ZeroLine {
        /// 1-based line number.
        line: usize,
    },

    /// A line carried both a debit and a credit.
    #[error("line {line} has both a debit and a credit")]
    DebitAndCredit {
        /// 1-based line number.
        line: usize,
    },

    /// Debits and credits differ beyond the tolerance.
    #[error("entry is unbalanced: debit {debit}, credit {credit} (tolerance {tolerance})")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
        /// Allowed rounding tolerance.
        tolerance: Decimal,
    },

    /// Referenced account does not exist (or is soft-deleted).
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// Referenced account is inactive.
    #[error("account {0} ({1}) is inactive")]
    AccountInactive(AccountId, String),

    /// Referenced account is a grouping header.
    #[error("account {0} ({1}) is a header and cannot receive postings")]
    HeaderAccount(AccountId, String),

    /// Account code already in use by a live account.
    #[error("account code {0} already exists")]
    DuplicateAccountCode(String),

    /// Account still carries posted lines and cannot be removed.
    #[error("account {0} has journal activity and cannot be deleted")]
    AccountHasActivity(AccountId),

    /// Journal entry does not exist.
    #[error("journal entry {0} not found")]
    EntryNotFound(JournalEntryId),

    /// Operation requires a draft entry.
    #[error("journal entry {0} is not a draft")]
    NotDraft(JournalEntryId),

    /// Operation requires a posted entry.
    #[error("journal entry {0} is not posted")]
    NotPosted(JournalEntryId),

    /// Entry was already reversed once.
    #[error("journal entry {0} has already been reversed")]
    AlreadyReversed(JournalEntryId),

    /// Posted entries are immutable and cannot be deleted.
    #[error("journal entry {0} is posted and cannot be deleted")]
    CannotDeletePosted(JournalEntryId),

    /// Source document referenced by the entry does not exist.
    #[error("source document {0} not found")]
    SourceDocumentNotFound(Uuid),
}

impl LedgerError {
    /// Stable machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::ZeroLine { .. } => "ZERO_LINE",
            Self::DebitAndCredit { .. } => "DEBIT_AND_CREDIT",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(..) => "ACCOUNT_INACTIVE",
            Self::HeaderAccount(..) => "HEADER_ACCOUNT",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::AccountHasActivity(_) => "ACCOUNT_HAS_ACTIVITY",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::NotDraft(_) => "NOT_DRAFT",
            Self::NotPosted(_) => "NOT_POSTED",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::CannotDeletePosted(_) => "CANNOT_DELETE_POSTED",
            Self::SourceDocumentNotFound(_) => "SOURCE_DOCUMENT_NOT_FOUND",
        }
    }

    /// HTTP status a transport layer should map this error to.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::AccountNotFound(_) | Self::EntryNotFound(_) | Self::SourceDocumentNotFound(_) => {
                404
            }
            Self::NotDraft(_)
            | Self::NotPosted(_)
            | Self::AlreadyReversed(_)
            | Self::CannotDeletePosted(_)
            | Self::AccountHasActivity(_)
            | Self::DuplicateAccountCode(_) => 409,
            _ => 422,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound(_)
            | LedgerError::EntryNotFound(_)
            | LedgerError::SourceDocumentNotFound(_) => AppError::NotFound(err.to_string()),
            LedgerError::NotDraft(_)
            | LedgerError::NotPosted(_)
            | LedgerError::AlreadyReversed(_)
            | LedgerError::CannotDeletePosted(_)
            | LedgerError::AccountHasActivity(_)
            | LedgerError::DuplicateAccountCode(_) => AppError::StateConflict(err.to_string()),
            other => AppError::Validation(other.to_string()),
        }
    }
}
