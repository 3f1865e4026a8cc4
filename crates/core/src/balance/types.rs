//! Balance aggregation types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::types::{Account, AccountType};
use kasira_shared::types::AccountId;

/// Where a served balance figure came from.
///
/// Figures derived from posted journal lines are authoritative; figures
/// read from the cached accounts column are a degraded fallback and are
/// flagged so callers can tell the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceSource {
    /// Computed from recognized posted journal lines.
    PostedJournal,
    /// Read from the cached per-account balance column.
    AccountsTable,
}

/// Which entry statuses an aggregation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Posted entries only (the default for all reporting).
    Posted,
    /// All entries regardless of status (diagnostics only).
    All,
}

/// An account's aggregated balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalanceView {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Sum of debits over covered lines.
    pub total_debit: Decimal,
    /// Sum of credits over covered lines.
    pub total_credit: Decimal,
    /// Net balance, signed by the account's normal side.
    pub net_balance: Decimal,
    /// Where this figure came from.
    pub source: BalanceSource,
}

impl AccountBalanceView {
    /// Builds a degraded view from the cached account balance.
    #[must_use]
    pub fn from_cached(account: &Account) -> Self {
        Self {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            net_balance: account.balance,
            source: BalanceSource::AccountsTable,
        }
    }

    /// Returns true if this figure is authoritative.
    #[must_use]
    pub fn is_authoritative(&self) -> bool {
        self.source == BalanceSource::PostedJournal
    }
}
