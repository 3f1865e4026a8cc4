//! Balance synchronization checks and auto-healing.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use kasira_core::balance::types::AccountBalanceView;
use kasira_core::ledger::types::{Account, AccountType};
use kasira_core::reconcile::service::ReconcileService;
use kasira_core::reconcile::types::{
    AutoFixResult, BalanceDiscrepancy, CashRegister, CashRegisterTransaction, FixAction,
    HealthCheckOutcome, SyncCheckResult, ValidationReport, ValidationRow,
};
use kasira_core::snapshot::audit::{AuditAction, AuditTrailEntry};
use kasira_shared::error::{AppError, AppResult};
use kasira_shared::types::{AccountId, CashBankId, CashTransactionId};

use crate::state::{LedgerState, LedgerStore};

impl LedgerStore {
    /// Compares every cached balance against the journal-derived value
    /// and every register's transaction-derived balance against its
    /// linked account's.
    ///
    /// Also flags active registers without a general-ledger link and
    /// posted lines referencing accounts that no longer exist.
    #[must_use]
    pub fn check_balance_synchronization(&self) -> SyncCheckResult {
        let state = self.state.read();
        self.run_check(&state)
    }

    /// Repairs every auto-fixable discrepancy.
    ///
    /// Cache drift is healed by rewriting the cached balance from
    /// posted journal lines; unlinked registers get a general-ledger
    /// account created and linked; orphaned references get their
    /// account restored when the code is still free. Discrepancies are
    /// re-detected under the write lock, so a fix never acts on stale
    /// figures. Running this on a synchronized store changes nothing,
    /// and a second run right after a first finds nothing left to fix.
    pub fn auto_fix_discrepancies(&self) -> AppResult<AutoFixResult> {
        let mut state = self.state.write();
        let check = self.run_check(&state);

        let service = ReconcileService::new();
        let mut fixed: Vec<FixAction> = Vec::new();
        let mut skipped: Vec<BalanceDiscrepancy> = Vec::new();

        for discrepancy in check.discrepancies {
            let Some(fix) = service.plan_fix(&discrepancy) else {
                warn!(cause = ?discrepancy.cause, name = %discrepancy.name, "discrepancy needs operator attention");
                skipped.push(discrepancy);
                continue;
            };
            match fix {
                FixAction::RewriteCachedBalance {
                    account_id,
                    ref code,
                    before,
                    after,
                } => {
                    let account = state.accounts.get_mut(&account_id).ok_or_else(|| {
                        AppError::Integrity(format!("account {account_id} vanished during fix"))
                    })?;
                    account.balance = after;
                    info!(account_id = %account_id, code = %code, before = %before, after = %after, "cached balance healed");
                    fixed.push(fix);
                }
                FixAction::CreateGlLink {
                    register_id,
                    ref register_name,
                    opening_balance,
                } => {
                    let account_id =
                        Self::create_linked_account(&mut state, register_name, opening_balance);
                    let register = state.registers.get_mut(&register_id).ok_or_else(|| {
                        AppError::Integrity(format!("register {register_id} vanished during fix"))
                    })?;
                    register.gl_account_id = Some(account_id);
                    info!(register_id = %register_id, account_id = %account_id, "register linked to new account");
                    fixed.push(fix);
                }
                FixAction::RestoreAccount { account_id } => {
                    if Self::try_restore(&mut state, account_id) {
                        info!(account_id = %account_id, "orphaned account restored");
                        fixed.push(fix);
                    } else {
                        warn!(account_id = %account_id, "orphaned account cannot be restored");
                        skipped.push(discrepancy);
                    }
                }
            }
        }

        let result = AutoFixResult {
            already_consistent: check.synchronized,
            fixed,
            skipped,
            completed_at: Utc::now(),
        };
        if !result.fixed.is_empty() {
            state.audit.push(AuditTrailEntry::record(
                AuditAction::BalancesAutoFixed,
                None,
                uuid::Uuid::nil(),
                Some(format!("{} fixes applied", result.fixed.len())),
            ));
        }
        Ok(result)
    }

    /// One unattended health check cycle: check, then heal when
    /// configured to.
    pub fn scheduled_health_check(&self) -> AppResult<HealthCheckOutcome> {
        let check = self.check_balance_synchronization();
        if check.is_synchronized() || !self.config.health.auto_fix {
            return Ok(HealthCheckOutcome { check, fixes: None });
        }
        let fixes = self.auto_fix_discrepancies()?;
        Ok(HealthCheckOutcome {
            check,
            fixes: Some(fixes),
        })
    }

    /// Per-account validation report with integrity diagnostics.
    #[must_use]
    pub fn detailed_validation_report(&self) -> ValidationReport {
        let state = self.state.read();
        let views = self.views_of(&state, None);
        let computed: BTreeMap<AccountId, Decimal> =
            views.iter().map(|v| (v.account_id, v.net_balance)).collect();

        let tolerance = self.config.tolerance;
        let mut rows = Vec::new();
        for account in state.accounts.values().filter(|a| a.is_live()) {
            let computed_balance = computed.get(&account.id).copied().unwrap_or_default();
            let difference = account.balance - computed_balance;
            rows.push(ValidationRow {
                account_id: account.id,
                code: account.code.clone(),
                cached_balance: account.balance,
                computed_balance,
                difference,
                in_sync: difference.abs() <= tolerance,
            });
        }
        let out_of_sync = rows.iter().filter(|r| !r.in_sync).count();

        let orphaned_lines = state
            .entries
            .values()
            .filter(|e| e.is_posted())
            .flat_map(|e| e.lines.iter())
            .filter(|l| {
                state
                    .accounts
                    .get(&l.account_id)
                    .is_none_or(|a| !a.is_live())
            })
            .count();

        let debit_normal: Decimal = views
            .iter()
            .filter(|v| v.account_type.is_debit_normal())
            .map(|v| v.net_balance)
            .sum();
        let credit_normal: Decimal = views
            .iter()
            .filter(|v| !v.account_type.is_debit_normal())
            .map(|v| v.net_balance)
            .sum();

        ValidationReport {
            rows,
            out_of_sync,
            orphaned_lines,
            equation_delta: debit_normal - credit_normal,
            tolerance,
            generated_at: Utc::now(),
        }
    }

    /// Registers a subsidiary cash or bank register.
    pub fn create_register(
        &self,
        name: &str,
        account_number: Option<&str>,
        gl_account_id: Option<AccountId>,
    ) -> AppResult<CashRegister> {
        let mut state = self.state.write();
        if let Some(id) = gl_account_id {
            if !state.accounts.get(&id).is_some_and(|a| a.is_live()) {
                return Err(AppError::NotFound(format!("account {id} not found")));
            }
        }
        let register = CashRegister {
            id: CashBankId::new(),
            name: name.to_string(),
            account_number: account_number.map(str::to_string),
            gl_account_id,
            balance: Decimal::ZERO,
            is_active: true,
        };
        state.registers.insert(register.id, register.clone());
        Ok(register)
    }

    /// Fetches a register by id.
    pub fn get_register(&self, id: CashBankId) -> AppResult<CashRegister> {
        let state = self.state.read();
        state
            .registers
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("register {id} not found")))
    }

    /// Records a movement on a register, keeping its running balance.
    pub fn record_register_transaction(
        &self,
        register_id: CashBankId,
        date: chrono::NaiveDate,
        amount: Decimal,
        description: &str,
    ) -> AppResult<CashRegisterTransaction> {
        let mut state = self.state.write();
        let register = state
            .registers
            .get_mut(&register_id)
            .ok_or_else(|| AppError::NotFound(format!("register {register_id} not found")))?;
        register.balance += amount;

        let txn = CashRegisterTransaction {
            id: CashTransactionId::new(),
            register_id,
            date,
            amount,
            description: description.to_string(),
        };
        state.register_txns.insert(txn.id, txn.clone());
        Ok(txn)
    }

    fn run_check(&self, state: &LedgerState) -> SyncCheckResult {
        let views = self.views_of(state, None);
        let computed: BTreeMap<AccountId, &AccountBalanceView> =
            views.iter().map(|v| (v.account_id, v)).collect();

        let service = ReconcileService::new();
        let tolerance = self.config.tolerance;
        let mut discrepancies = Vec::new();
        let mut total_checked = 0usize;

        for account in state.accounts.values().filter(|a| a.is_live()) {
            total_checked += 1;
            let Some(view) = computed.get(&account.id) else {
                continue;
            };
            if let Some(d) = service.classify(account, view, tolerance) {
                discrepancies.push(d);
            }
        }

        for register in state.registers.values().filter(|r| r.is_active) {
            total_checked += 1;
            let subsidiary = Self::register_txn_balance(state, register.id);
            if let Some(d) = service.classify_unlinked_register(register, subsidiary) {
                discrepancies.push(d);
                continue;
            }
            let Some(gl_id) = register.gl_account_id else {
                continue;
            };
            // A link to a dead account compares against nothing.
            let gl_balance = computed
                .get(&gl_id)
                .map_or(Decimal::ZERO, |v| v.net_balance);
            if let Some(d) =
                service.classify_register_drift(register, subsidiary, gl_balance, tolerance)
            {
                discrepancies.push(d);
            }
        }

        // Posted lines pointing at deleted or unknown accounts.
        let mut orphaned: BTreeMap<AccountId, Decimal> = BTreeMap::new();
        for entry in state.entries.values().filter(|e| e.is_posted()) {
            for line in &entry.lines {
                if state
                    .accounts
                    .get(&line.account_id)
                    .is_none_or(|a| !a.is_live())
                {
                    *orphaned.entry(line.account_id).or_default() += line.debit - line.credit;
                }
            }
        }
        for (account_id, total) in orphaned {
            discrepancies.push(service.classify_orphaned_lines(account_id, total));
        }

        SyncCheckResult::assemble(total_checked, discrepancies, tolerance)
    }

    /// Sums a register's transactions; the spendable truth for the
    /// subsidiary side of the comparison.
    fn register_txn_balance(state: &LedgerState, register_id: CashBankId) -> Decimal {
        state
            .register_txns
            .values()
            .filter(|t| t.register_id == register_id)
            .map(|t| t.amount)
            .sum()
    }

    /// Creates a cash-and-bank account for a register, picking the
    /// first free code at or above 1102.
    fn create_linked_account(
        state: &mut LedgerState,
        register_name: &str,
        opening_balance: Decimal,
    ) -> AccountId {
        let mut code_number = 1102u32;
        loop {
            let candidate = code_number.to_string();
            if !state
                .accounts
                .values()
                .any(|a| a.is_live() && a.code == candidate)
            {
                break;
            }
            code_number += 1;
        }
        let account = Account {
            id: AccountId::new(),
            code: code_number.to_string(),
            name: register_name.to_string(),
            account_type: AccountType::Asset,
            category: Some(crate::balances::CASH_CATEGORY.to_string()),
            is_header: false,
            is_active: true,
            balance: opening_balance,
            deleted_at: None,
        };
        let id = account.id;
        state.accounts.insert(id, account);
        id
    }

    /// Restores a soft-deleted account if its code is still free.
    fn try_restore(state: &mut LedgerState, account_id: AccountId) -> bool {
        let Some(code) = state
            .accounts
            .get(&account_id)
            .filter(|a| !a.is_live())
            .map(|a| a.code.clone())
        else {
            return false;
        };
        let code_taken = state
            .accounts
            .values()
            .any(|a| a.id != account_id && a.is_live() && a.code == code);
        if code_taken {
            return false;
        }
        if let Some(account) = state.accounts.get_mut(&account_id) {
            account.deleted_at = None;
            account.is_active = true;
            true
        } else {
            false
        }
    }
}
