//! Ledger domain types for journal entries and accounts.
//!
//! This module defines the canonical records of the double-entry ledger:
//! accounts, journal entries, and journal lines. Posted entries are the
//! single source of truth every balance and report is derived from.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kasira_shared::types::{AccountId, JournalEntryId, JournalLineId, UserId};

/// Account classification driving balance sign rules.
///
/// In double-entry bookkeeping:
/// - Asset/Expense accounts are debit-normal (net = debit - credit)
/// - Liability/Equity/Revenue accounts are credit-normal (net = credit - debit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account (debit-normal).
    Asset,
    /// Liability account (credit-normal).
    Liability,
    /// Equity account (credit-normal).
    Equity,
    /// Revenue account (credit-normal).
    Revenue,
    /// Expense account (debit-normal).
    Expense,
}

impl AccountType {
    /// Returns true for debit-normal account types.
    #[must_use]
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    /// Net balance for the given totals, signed by the account's normal side.
    #[must_use]
    pub fn net_balance(&self, debit: Decimal, credit: Decimal) -> Decimal {
        if self.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        }
    }

    /// Returns the string representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }

    /// Parses an account type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "revenue" => Some(Self::Revenue),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A chart-of-accounts entry.
///
/// Header accounts group children for presentation and never receive
/// postings. `balance` is a cache maintained at posting time; the
/// aggregator recomputes the authoritative value from posted lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Account code (unique among non-deleted accounts).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Reporting category (e.g. "cash_and_bank", "cost_of_goods_sold").
    pub category: Option<String>,
    /// Whether this is a grouping header.
    pub is_header: bool,
    /// Whether the account is active.
    pub is_active: bool,
    /// Cached balance, signed by the account's normal side.
    pub balance: Decimal,
    /// Soft-delete marker; deleted accounts are excluded from queries.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Returns true if this account may receive journal lines.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        !self.is_header && self.is_active && self.deleted_at.is_none()
    }

    /// Returns true if the account has not been soft-deleted.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// Business event that produced a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Sales invoice.
    Sale,
    /// Vendor purchase.
    Purchase,
    /// Incoming or outgoing payment.
    Payment,
    /// Manually keyed journal entry.
    Manual,
    /// Correction or adjustment entry.
    Adjustment,
}

impl SourceType {
    /// Returns the string representation of the source type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::Payment => "payment",
            Self::Manual => "manual",
            Self::Adjustment => "adjustment",
        }
    }

    /// Parses a source type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sale" => Some(Self::Sale),
            "purchase" => Some(Self::Purchase),
            "payment" => Some(Self::Payment),
            "manual" => Some(Self::Manual),
            "adjustment" => Some(Self::Adjustment),
            _ => None,
        }
    }
}

/// Journal entry lifecycle.
///
/// Draft entries may be edited or deleted and are never aggregated.
/// Posted entries are immutable; correction is by reversing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted and can be modified or deleted.
    Draft,
    /// Entry has been posted to the ledger (immutable).
    Posted,
    /// Entry was cancelled before posting (immutable).
    Cancelled,
}

impl EntryStatus {
    /// Returns true if the entry can be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Cancelled)
    }
}

/// Input for a single journal line.
///
/// Exactly one of `debit` and `credit` must be positive; the other must
/// be zero.
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (zero if credit).
    pub debit: Decimal,
    /// Credit amount (zero if debit).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

impl JournalLineInput {
    /// Convenience constructor for a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// Convenience constructor for a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }
}

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    /// The business event that produced this entry.
    pub source_type: SourceType,
    /// The source document, when one exists.
    pub source_id: Option<Uuid>,
    /// The accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Free-form notes; automated COGS entries are tagged "COGS" here.
    pub notes: Option<String>,
    /// The lines (must balance within tolerance).
    pub lines: Vec<JournalLineInput>,
    /// The user creating the entry.
    pub created_by: UserId,
}

/// A committed journal line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier.
    pub id: JournalLineId,
    /// The entry this line belongs to.
    pub journal_id: JournalEntryId,
    /// The account affected.
    pub account_id: AccountId,
    /// Position within the entry (1-based).
    pub line_number: u32,
    /// Debit amount (zero if credit).
    pub debit: Decimal,
    /// Credit amount (zero if debit).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
}

impl JournalLine {
    /// Signed balance change for the given account type.
    #[must_use]
    pub fn balance_change(&self, account_type: AccountType) -> Decimal {
        account_type.net_balance(self.debit, self.credit)
    }
}

/// A journal entry with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// The business event that produced this entry.
    pub source_type: SourceType,
    /// The source document, when one exists.
    pub source_id: Option<Uuid>,
    /// The accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// Sum of line debits.
    pub total_debit: Decimal,
    /// Sum of line credits.
    pub total_credit: Decimal,
    /// The entry this one reverses, if any.
    pub reverses: Option<JournalEntryId>,
    /// The entry that reversed this one, if any.
    pub reversed_by: Option<JournalEntryId>,
    /// The user who created the entry.
    pub created_by: UserId,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// The lines of this entry.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Returns true if this entry is counted by the aggregator.
    #[must_use]
    pub fn is_posted(&self) -> bool {
        self.status == EntryStatus::Posted
    }
}

/// Sum of debits and credits over an entry's lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
}

impl EntryTotals {
    /// Computes totals over a set of line inputs.
    #[must_use]
    pub fn of(lines: &[JournalLineInput]) -> Self {
        Self {
            debit: lines.iter().map(|l| l.debit).sum(),
            credit: lines.iter().map(|l| l.credit).sum(),
        }
    }

    /// Returns the debit minus credit difference.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true when debits equal credits within the tolerance.
    #[must_use]
    pub fn is_balanced_within(&self, tolerance: Decimal) -> bool {
        self.difference().abs() <= tolerance
    }
}
