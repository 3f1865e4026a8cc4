//! Chart-of-accounts operations.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use kasira_core::ledger::error::LedgerError;
use kasira_core::ledger::types::{Account, AccountType, EntryStatus};
use kasira_shared::error::{AppError, AppResult};
use kasira_shared::types::AccountId;

use crate::state::LedgerStore;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Account code (unique among live accounts).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Reporting category.
    pub category: Option<String>,
    /// Whether this is a grouping header.
    pub is_header: bool,
}

impl LedgerStore {
    /// Creates an account, rejecting duplicate codes among live
    /// accounts.
    pub fn create_account(&self, input: NewAccount) -> AppResult<Account> {
        let mut state = self.state.write();

        let duplicate = state
            .accounts
            .values()
            .any(|a| a.is_live() && a.code == input.code);
        if duplicate {
            return Err(LedgerError::DuplicateAccountCode(input.code).into());
        }

        let account = Account {
            id: AccountId::new(),
            code: input.code,
            name: input.name,
            account_type: input.account_type,
            category: input.category,
            is_header: input.is_header,
            is_active: true,
            balance: Decimal::ZERO,
            deleted_at: None,
        };
        info!(account_id = %account.id, code = %account.code, "account created");
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    /// Fetches a live account by id.
    pub fn get_account(&self, id: AccountId) -> AppResult<Account> {
        let state = self.state.read();
        state
            .accounts
            .get(&id)
            .filter(|a| a.is_live())
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound(id).into())
    }

    /// Finds a live account by code.
    pub fn find_account_by_code(&self, code: &str) -> Option<Account> {
        let state = self.state.read();
        state
            .accounts
            .values()
            .find(|a| a.is_live() && a.code == code)
            .cloned()
    }

    /// Lists all live accounts, ordered by code.
    #[must_use]
    pub fn list_accounts(&self) -> Vec<Account> {
        let state = self.state.read();
        let mut accounts: Vec<Account> = state
            .accounts
            .values()
            .filter(|a| a.is_live())
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }

    /// Soft-deletes an account.
    ///
    /// Accounts with posted journal activity cannot be deleted; reverse
    /// the activity first.
    pub fn delete_account(&self, id: AccountId) -> AppResult<()> {
        let mut state = self.state.write();

        let has_activity = state.entries.values().any(|e| {
            e.status == EntryStatus::Posted && e.lines.iter().any(|l| l.account_id == id)
        });
        if has_activity {
            return Err(LedgerError::AccountHasActivity(id).into());
        }

        let account = state
            .accounts
            .get_mut(&id)
            .filter(|a| a.is_live())
            .ok_or(LedgerError::AccountNotFound(id))?;
        account.deleted_at = Some(Utc::now());
        info!(account_id = %id, "account soft-deleted");
        Ok(())
    }

    /// Restores a soft-deleted account.
    ///
    /// Restoration fails if another live account has since taken the
    /// code.
    pub fn restore_account(&self, id: AccountId) -> AppResult<Account> {
        let mut state = self.state.write();

        let code = state
            .accounts
            .get(&id)
            .filter(|a| !a.is_live())
            .map(|a| a.code.clone())
            .ok_or_else(|| AppError::NotFound(format!("deleted account {id} not found")))?;

        let code_taken = state
            .accounts
            .values()
            .any(|a| a.is_live() && a.code == code);
        if code_taken {
            return Err(LedgerError::DuplicateAccountCode(code).into());
        }

        let account = state
            .accounts
            .get_mut(&id)
            .ok_or(LedgerError::AccountNotFound(id))?;
        account.deleted_at = None;
        info!(account_id = %id, "account restored");
        Ok(account.clone())
    }

    /// Marks an account inactive without deleting it.
    pub fn deactivate_account(&self, id: AccountId) -> AppResult<()> {
        let mut state = self.state.write();
        let account = state
            .accounts
            .get_mut(&id)
            .filter(|a| a.is_live())
            .ok_or(LedgerError::AccountNotFound(id))?;
        account.is_active = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasira_shared::config::CoreConfig;

    fn store() -> LedgerStore {
        LedgerStore::new(CoreConfig::default())
    }

    fn cash_input() -> NewAccount {
        NewAccount {
            code: "1101".to_string(),
            name: "Cash".to_string(),
            account_type: AccountType::Asset,
            category: Some("cash_and_bank".to_string()),
            is_header: false,
        }
    }

    #[test]
    fn test_create_and_fetch() {
        let store = store();
        let created = store.create_account(cash_input()).unwrap();
        let fetched = store.get_account(created.id).unwrap();
        assert_eq!(fetched.code, "1101");
        assert_eq!(fetched.balance, Decimal::ZERO);
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let store = store();
        store.create_account(cash_input()).unwrap();
        let err = store.create_account(cash_input()).unwrap_err();
        assert!(matches!(err, AppError::StateConflict(_)));
    }

    #[test]
    fn test_soft_delete_then_reuse_code() {
        let store = store();
        let account = store.create_account(cash_input()).unwrap();
        store.delete_account(account.id).unwrap();
        assert!(store.get_account(account.id).is_err());
        assert!(store.find_account_by_code("1101").is_none());

        // The code is free again.
        let second = store.create_account(cash_input()).unwrap();
        assert_ne!(second.id, account.id);
    }

    #[test]
    fn test_restore_conflicts_with_reused_code() {
        let store = store();
        let first = store.create_account(cash_input()).unwrap();
        store.delete_account(first.id).unwrap();
        store.create_account(cash_input()).unwrap();

        let err = store.restore_account(first.id).unwrap_err();
        assert!(matches!(err, AppError::StateConflict(_)));
    }

    #[test]
    fn test_restore_brings_account_back() {
        let store = store();
        let account = store.create_account(cash_input()).unwrap();
        store.delete_account(account.id).unwrap();
        let restored = store.restore_account(account.id).unwrap();
        assert!(restored.is_live());
        assert!(store.find_account_by_code("1101").is_some());
    }
}
