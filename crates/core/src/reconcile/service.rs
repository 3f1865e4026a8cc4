//! Discrepancy classification and fix planning.

use chrono::Utc;
use rust_decimal::Decimal;

use super::types::{BalanceDiscrepancy, CashRegister, DiscrepancyCause, FixAction};
use crate::balance::types::AccountBalanceView;
use crate::ledger::types::Account;
use kasira_shared::types::DiscrepancyId;

/// Pure classification logic for balance discrepancies.
///
/// The store runs the comparisons; this service decides whether a pair
/// of figures constitutes a discrepancy, what caused it, and what write
/// would repair it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileService;

impl ReconcileService {
    /// Creates a new service instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compares an account's cached balance against the computed view.
    ///
    /// Returns `None` when the two agree within `tolerance`.
    #[must_use]
    pub fn classify(
        &self,
        account: &Account,
        computed: &AccountBalanceView,
        tolerance: Decimal,
    ) -> Option<BalanceDiscrepancy> {
        let difference = account.balance - computed.net_balance;
        if difference.abs() <= tolerance {
            return None;
        }
        Some(BalanceDiscrepancy {
            id: DiscrepancyId::new(),
            account_id: Some(account.id),
            register_id: None,
            code: account.code.clone(),
            name: account.name.clone(),
            subsidiary_balance: account.balance,
            gl_balance: computed.net_balance,
            difference,
            cause: DiscrepancyCause::BalanceDrift,
            detected_at: Utc::now(),
        })
    }

    /// Compares a register's transaction-derived balance against its
    /// linked account's journal-derived one.
    ///
    /// Returns `None` when the two agree within `tolerance`.
    #[must_use]
    pub fn classify_register_drift(
        &self,
        register: &CashRegister,
        subsidiary_balance: Decimal,
        gl_balance: Decimal,
        tolerance: Decimal,
    ) -> Option<BalanceDiscrepancy> {
        let difference = subsidiary_balance - gl_balance;
        if difference.abs() <= tolerance {
            return None;
        }
        Some(BalanceDiscrepancy {
            id: DiscrepancyId::new(),
            account_id: register.gl_account_id,
            register_id: Some(register.id),
            code: register.account_number.clone().unwrap_or_default(),
            name: register.name.clone(),
            subsidiary_balance,
            gl_balance,
            difference,
            cause: DiscrepancyCause::BalanceDrift,
            detected_at: Utc::now(),
        })
    }

    /// Flags a register that has no general-ledger account linked.
    #[must_use]
    pub fn classify_unlinked_register(
        &self,
        register: &CashRegister,
        subsidiary_balance: Decimal,
    ) -> Option<BalanceDiscrepancy> {
        if !register.is_active || register.gl_account_id.is_some() {
            return None;
        }
        Some(BalanceDiscrepancy {
            id: DiscrepancyId::new(),
            account_id: None,
            register_id: Some(register.id),
            code: register.account_number.clone().unwrap_or_default(),
            name: register.name.clone(),
            subsidiary_balance,
            gl_balance: Decimal::ZERO,
            difference: subsidiary_balance,
            cause: DiscrepancyCause::MissingGlLink,
            detected_at: Utc::now(),
        })
    }

    /// Builds a discrepancy for journal lines referencing a missing
    /// account.
    #[must_use]
    pub fn classify_orphaned_lines(
        &self,
        account_id: kasira_shared::types::AccountId,
        orphaned_total: Decimal,
    ) -> BalanceDiscrepancy {
        BalanceDiscrepancy {
            id: DiscrepancyId::new(),
            account_id: Some(account_id),
            register_id: None,
            code: String::new(),
            name: "(missing account)".to_string(),
            subsidiary_balance: Decimal::ZERO,
            gl_balance: orphaned_total,
            difference: -orphaned_total,
            cause: DiscrepancyCause::InvalidReference,
            detected_at: Utc::now(),
        }
    }

    /// Plans the corrective write for an auto-fixable discrepancy.
    ///
    /// Cache drift moves the cache toward the journal-derived value,
    /// never the other way. Unlinked registers get an account created
    /// and linked; orphaned references get their account restored.
    /// Returns `None` for discrepancies that need an operator.
    #[must_use]
    pub fn plan_fix(&self, discrepancy: &BalanceDiscrepancy) -> Option<FixAction> {
        if !discrepancy.is_auto_fixable() {
            return None;
        }
        match discrepancy.cause {
            DiscrepancyCause::BalanceDrift => {
                Some(FixAction::RewriteCachedBalance {
                    account_id: discrepancy.account_id?,
                    code: discrepancy.code.clone(),
                    before: discrepancy.subsidiary_balance,
                    after: discrepancy.gl_balance,
                })
            }
            DiscrepancyCause::MissingGlLink => Some(FixAction::CreateGlLink {
                register_id: discrepancy.register_id?,
                register_name: discrepancy.name.clone(),
                opening_balance: discrepancy.subsidiary_balance,
            }),
            DiscrepancyCause::InvalidReference => Some(FixAction::RestoreAccount {
                account_id: discrepancy.account_id?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::types::BalanceSource;
    use crate::ledger::types::AccountType;
    use rust_decimal_macros::dec;
    use kasira_shared::types::{AccountId, CashBankId};

    fn account(balance: Decimal) -> Account {
        Account {
            id: AccountId::new(),
            code: "1101".to_string(),
            name: "Cash".to_string(),
            account_type: AccountType::Asset,
            category: None,
            is_header: false,
            is_active: true,
            balance,
            deleted_at: None,
        }
    }

    fn computed_view(account: &Account, net: Decimal) -> AccountBalanceView {
        AccountBalanceView {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            total_debit: net,
            total_credit: Decimal::ZERO,
            net_balance: net,
            source: BalanceSource::PostedJournal,
        }
    }

    fn register(gl_account_id: Option<AccountId>) -> CashRegister {
        CashRegister {
            id: CashBankId::new(),
            name: "Main".to_string(),
            account_number: Some("001".to_string()),
            gl_account_id,
            balance: Decimal::ZERO,
            is_active: true,
        }
    }

    #[test]
    fn test_agreement_within_tolerance_is_clean() {
        let acct = account(dec!(100.005));
        let view = computed_view(&acct, dec!(100.00));
        assert!(ReconcileService::new()
            .classify(&acct, &view, dec!(0.01))
            .is_none());
    }

    #[test]
    fn test_drift_detected_and_classified() {
        let acct = account(dec!(150));
        let view = computed_view(&acct, dec!(100));
        let disc = ReconcileService::new()
            .classify(&acct, &view, dec!(0.01))
            .unwrap();
        assert_eq!(disc.cause, DiscrepancyCause::BalanceDrift);
        assert_eq!(disc.subsidiary_balance, dec!(150));
        assert_eq!(disc.gl_balance, dec!(100));
        assert_eq!(disc.difference, dec!(50));
        assert!(disc.register_id.is_none());
    }

    #[test]
    fn test_fix_moves_cache_toward_journal() {
        let acct = account(dec!(150));
        let view = computed_view(&acct, dec!(100));
        let service = ReconcileService::new();
        let disc = service.classify(&acct, &view, dec!(0.01)).unwrap();
        let fix = service.plan_fix(&disc).unwrap();
        match fix {
            FixAction::RewriteCachedBalance { before, after, .. } => {
                assert_eq!(before, dec!(150));
                assert_eq!(after, dec!(100));
            }
            other => panic!("unexpected fix: {other:?}"),
        }
    }

    #[test]
    fn test_register_drift_flagged_but_not_auto_fixable() {
        let reg = register(Some(AccountId::new()));
        let service = ReconcileService::new();
        let disc = service
            .classify_register_drift(&reg, dec!(100000), Decimal::ZERO, dec!(0.01))
            .unwrap();
        assert_eq!(disc.cause, DiscrepancyCause::BalanceDrift);
        assert_eq!(disc.register_id, Some(reg.id));
        assert_eq!(disc.subsidiary_balance, dec!(100000));
        assert_eq!(disc.gl_balance, Decimal::ZERO);
        assert!(!disc.is_auto_fixable());
        assert!(service.plan_fix(&disc).is_none());
    }

    #[test]
    fn test_register_agreement_within_tolerance_is_clean() {
        let reg = register(Some(AccountId::new()));
        assert!(ReconcileService::new()
            .classify_register_drift(&reg, dec!(500.005), dec!(500), dec!(0.01))
            .is_none());
    }

    #[test]
    fn test_unlinked_register_gets_link_fix() {
        let mut reg = register(None);
        reg.name = "Petty Cash".to_string();
        let service = ReconcileService::new();
        let disc = service
            .classify_unlinked_register(&reg, dec!(500))
            .unwrap();
        assert_eq!(disc.cause, DiscrepancyCause::MissingGlLink);
        match service.plan_fix(&disc).unwrap() {
            FixAction::CreateGlLink {
                register_id,
                register_name,
                opening_balance,
            } => {
                assert_eq!(register_id, reg.id);
                assert_eq!(register_name, "Petty Cash");
                assert_eq!(opening_balance, dec!(500));
            }
            other => panic!("unexpected fix: {other:?}"),
        }
    }

    #[test]
    fn test_linked_register_not_flagged() {
        let reg = register(Some(AccountId::new()));
        assert!(ReconcileService::new()
            .classify_unlinked_register(&reg, dec!(500))
            .is_none());
    }

    #[test]
    fn test_orphaned_lines_get_restore_fix() {
        let account_id = AccountId::new();
        let service = ReconcileService::new();
        let disc = service.classify_orphaned_lines(account_id, dec!(42));
        assert_eq!(disc.cause, DiscrepancyCause::InvalidReference);
        assert!(matches!(
            service.plan_fix(&disc),
            Some(FixAction::RestoreAccount { account_id: id }) if id == account_id
        ));
    }

    #[test]
    fn test_check_result_grading() {
        use super::super::types::{SyncCheckResult, SyncStatus};

        let clean = SyncCheckResult::assemble(10, vec![], dec!(0.01));
        assert!(clean.is_synchronized());
        assert_eq!(clean.status, SyncStatus::Ok);
        assert_eq!(clean.synchronized, 10);

        let acct = account(dec!(150));
        let view = computed_view(&acct, dec!(100));
        let disc = ReconcileService::new()
            .classify(&acct, &view, dec!(0.01))
            .unwrap();

        let warning = SyncCheckResult::assemble(10, vec![disc.clone()], dec!(0.01));
        assert_eq!(warning.status, SyncStatus::Warning);
        assert_eq!(warning.unsynchronized, 1);
        assert_eq!(warning.synchronized, 9);

        let many = vec![disc.clone(), disc.clone(), disc.clone(), disc];
        let error = SyncCheckResult::assemble(10, many, dec!(0.01));
        assert_eq!(error.status, SyncStatus::Error);
    }
}
