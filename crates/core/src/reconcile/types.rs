//! Reconciliation and synchronization types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kasira_shared::types::{AccountId, CashBankId, CashTransactionId, DiscrepancyId};

/// Why a cached balance disagrees with the computed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscrepancyCause {
    /// A subsidiary register has no general-ledger account linked.
    MissingGlLink,
    /// The cached column drifted from the journal-derived balance.
    BalanceDrift,
    /// Journal lines reference an account that no longer exists.
    InvalidReference,
}

impl DiscrepancyCause {
    /// Human-readable remediation hint for this cause.
    #[must_use]
    pub fn remediation(&self) -> &'static str {
        match self {
            Self::MissingGlLink => "create and link a general-ledger account for the register",
            Self::BalanceDrift => "rewrite the cached balance from posted journal lines",
            Self::InvalidReference => "restore the missing account or reverse the orphaned entries",
        }
    }
}

/// A detected disagreement between a subsidiary figure and the
/// general-ledger one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceDiscrepancy {
    /// Unique identifier.
    pub id: DiscrepancyId,
    /// The affected general-ledger account, when one is involved.
    pub account_id: Option<AccountId>,
    /// The affected register, for register-side discrepancies.
    pub register_id: Option<CashBankId>,
    /// Account code.
    pub code: String,
    /// Account or register name.
    pub name: String,
    /// The subsidiary-side figure: the cached column for accounts, the
    /// transaction-derived balance for registers.
    pub subsidiary_balance: Decimal,
    /// The general-ledger figure computed from posted journal lines.
    pub gl_balance: Decimal,
    /// Subsidiary minus general ledger.
    pub difference: Decimal,
    /// Classified cause.
    pub cause: DiscrepancyCause,
    /// When the discrepancy was detected.
    pub detected_at: DateTime<Utc>,
}

impl BalanceDiscrepancy {
    /// Whether the auto-fixer can repair this discrepancy without
    /// operator intervention.
    ///
    /// Register drift is excluded: closing it requires posting the
    /// missing journal entries, never rewriting either side.
    #[must_use]
    pub fn is_auto_fixable(&self) -> bool {
        match self.cause {
            DiscrepancyCause::BalanceDrift => self.register_id.is_none(),
            DiscrepancyCause::MissingGlLink | DiscrepancyCause::InvalidReference => true,
        }
    }
}

/// Overall health grade of a synchronization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    /// Everything agrees.
    Ok,
    /// A handful of discrepancies; worth a look.
    Warning,
    /// Widespread disagreement; investigate before trusting reports.
    Error,
}

impl SyncStatus {
    /// Grades a check by how many subjects are out of sync.
    #[must_use]
    pub fn grade(unsynchronized: usize) -> Self {
        match unsynchronized {
            0 => Self::Ok,
            1..=3 => Self::Warning,
            _ => Self::Error,
        }
    }
}

/// Result of a synchronization check across accounts and registers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncCheckResult {
    /// Accounts and registers examined.
    pub total_checked: usize,
    /// Subjects that agreed with the ledger.
    pub synchronized: usize,
    /// Subjects with at least one discrepancy.
    pub unsynchronized: usize,
    /// Detected discrepancies (empty when in sync).
    pub discrepancies: Vec<BalanceDiscrepancy>,
    /// Overall grade.
    pub status: SyncStatus,
    /// The tolerance applied.
    pub tolerance: Decimal,
    /// When the check ran.
    pub checked_at: DateTime<Utc>,
}

impl SyncCheckResult {
    /// Assembles a result, deriving the counts and the grade.
    #[must_use]
    pub fn assemble(
        total_checked: usize,
        discrepancies: Vec<BalanceDiscrepancy>,
        tolerance: Decimal,
    ) -> Self {
        let unsynchronized = discrepancies.len();
        Self {
            total_checked,
            synchronized: total_checked.saturating_sub(unsynchronized),
            unsynchronized,
            status: SyncStatus::grade(unsynchronized),
            discrepancies,
            tolerance,
            checked_at: Utc::now(),
        }
    }

    /// Returns true when no discrepancy was found.
    #[must_use]
    pub fn is_synchronized(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// One corrective write planned by the auto-fixer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind")]
pub enum FixAction {
    /// Rewrite an account's cached balance from posted journal lines.
    RewriteCachedBalance {
        /// The corrected account.
        account_id: AccountId,
        /// Account code.
        code: String,
        /// Cached balance before the fix.
        before: Decimal,
        /// Balance written (the journal-derived value).
        after: Decimal,
    },
    /// Create a general-ledger account and link the register to it.
    CreateGlLink {
        /// The register to link.
        register_id: CashBankId,
        /// Register name, used to name the new account.
        register_name: String,
        /// Opening balance seeded from the register's transactions.
        opening_balance: Decimal,
    },
    /// Bring a soft-deleted or deactivated account back to life.
    RestoreAccount {
        /// The account referenced by orphaned lines.
        account_id: AccountId,
    },
}

/// Outcome of an auto-fix run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoFixResult {
    /// Corrections applied this run.
    pub fixed: Vec<FixAction>,
    /// Discrepancies the fixer could not repair automatically.
    pub skipped: Vec<BalanceDiscrepancy>,
    /// Accounts that were already consistent.
    pub already_consistent: usize,
    /// When the run completed.
    pub completed_at: DateTime<Utc>,
}

/// One account's row in the detailed validation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRow {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Balance read from the cached column.
    pub cached_balance: Decimal,
    /// Balance computed from posted journal lines.
    pub computed_balance: Decimal,
    /// Cached minus computed.
    pub difference: Decimal,
    /// Whether the account is within the tolerance.
    pub in_sync: bool,
}

/// Detailed per-account validation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// One row per live account.
    pub rows: Vec<ValidationRow>,
    /// Number of rows out of sync.
    pub out_of_sync: usize,
    /// Journal lines referencing accounts that no longer exist.
    pub orphaned_lines: usize,
    /// Debit-normal totals minus credit-normal totals over computed
    /// balances (zero when the accounting equation holds).
    pub equation_delta: Decimal,
    /// The tolerance applied.
    pub tolerance: Decimal,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Returns true when every row is in sync and the equation holds.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.out_of_sync == 0
            && self.orphaned_lines == 0
            && self.equation_delta.abs() <= self.tolerance
    }
}

/// Outcome of one scheduled health check cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckOutcome {
    /// The synchronization check result.
    pub check: SyncCheckResult,
    /// The auto-fix run, when fixing was enabled and needed.
    pub fixes: Option<AutoFixResult>,
}

/// A subsidiary cash or bank register.
///
/// Registers carry their own running balance and are reconciled against
/// their linked general-ledger account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashRegister {
    /// Unique identifier.
    pub id: CashBankId,
    /// Register name (e.g. "Main Operating Account").
    pub name: String,
    /// Bank account number, when applicable.
    pub account_number: Option<String>,
    /// The linked general-ledger account, if any.
    pub gl_account_id: Option<AccountId>,
    /// Running register balance.
    pub balance: Decimal,
    /// Whether the register is active.
    pub is_active: bool,
}

/// A movement on a subsidiary register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashRegisterTransaction {
    /// Unique identifier.
    pub id: CashTransactionId,
    /// The register moved.
    pub register_id: CashBankId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Signed amount (positive deposits, negative withdrawals).
    pub amount: Decimal,
    /// Description.
    pub description: String,
}
