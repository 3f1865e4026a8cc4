//! Balance queries and report wrappers.
//!
//! Every figure here flows through the aggregator over posted,
//! recognized journal lines. Accounts with no postings at all fall
//! back to their cached balance, flagged with the degraded source so
//! callers can tell the two apart.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use kasira_core::balance::aggregator::BalanceAggregator;
use kasira_core::balance::types::{AccountBalanceView, StatusFilter};
use kasira_core::ledger::error::LedgerError;
use kasira_core::ledger::types::{Account, JournalEntry};
use kasira_core::reports::service::ReportService;
use kasira_core::reports::types::{
    BalanceSheet, CashFlowSummary, GeneralLedger, IncomeStatement, TrialBalance,
};
use kasira_shared::error::AppResult;
use kasira_shared::types::AccountId;

use crate::state::LedgerStore;

/// Category tag marking cash-and-bank accounts.
pub(crate) const CASH_CATEGORY: &str = "cash_and_bank";

impl LedgerStore {
    /// Computes every live account's balance from the journal.
    #[must_use]
    pub fn account_balances(&self) -> Vec<AccountBalanceView> {
        self.aggregate(None)
    }

    /// Computes balances as of a date, optionally including drafts.
    ///
    /// `StatusFilter::All` previews where balances land once pending
    /// drafts post; cancelled entries never count either way.
    #[must_use]
    pub fn account_balances_as_of(
        &self,
        as_of: NaiveDate,
        filter: StatusFilter,
    ) -> Vec<AccountBalanceView> {
        let state = self.state.read();
        self.views_filtered(&state, Some((NaiveDate::MIN, as_of)), filter)
    }

    /// Computes one account's balance from the journal.
    pub fn account_balance(&self, id: AccountId) -> AppResult<AccountBalanceView> {
        self.account_balances()
            .into_iter()
            .find(|v| v.account_id == id)
            .ok_or_else(|| LedgerError::AccountNotFound(id).into())
    }

    /// Reads every live account's cached balance.
    ///
    /// The views are flagged as coming from the accounts table; use
    /// [`LedgerStore::account_balances`] for authoritative figures.
    #[must_use]
    pub fn cached_balances(&self) -> Vec<AccountBalanceView> {
        let state = self.state.read();
        state
            .accounts
            .values()
            .filter(|a| a.is_live())
            .map(AccountBalanceView::from_cached)
            .collect()
    }

    /// Builds the trial balance over all activity.
    #[must_use]
    pub fn trial_balance(&self) -> TrialBalance {
        ReportService::new().trial_balance(&self.account_balances(), self.config.tolerance)
    }

    /// Builds the balance sheet over all activity.
    #[must_use]
    pub fn balance_sheet(&self) -> BalanceSheet {
        ReportService::new().balance_sheet(&self.account_balances(), self.config.tolerance)
    }

    /// Builds the income statement for a period.
    #[must_use]
    pub fn income_statement(&self, from: NaiveDate, to: NaiveDate) -> IncomeStatement {
        let views = self.aggregate(Some((from, to)));
        let cogs_code = self.config.accounts.cogs_code.clone();
        ReportService::new().income_statement(&views, |v| v.code == cogs_code)
    }

    /// Summarizes cash movement over the cash-and-bank accounts for a
    /// period.
    #[must_use]
    pub fn cash_flow_summary(&self, from: NaiveDate, to: NaiveDate) -> CashFlowSummary {
        let cash_accounts: Vec<AccountId> = {
            let state = self.state.read();
            state
                .accounts
                .values()
                .filter(|a| a.is_live() && a.category.as_deref() == Some(CASH_CATEGORY))
                .map(|a| a.id)
                .collect()
        };
        let views: Vec<AccountBalanceView> = self
            .aggregate(Some((from, to)))
            .into_iter()
            .filter(|v| cash_accounts.contains(&v.account_id))
            .collect();
        ReportService::new().cash_flow_summary(&views)
    }

    /// Builds an account's general ledger for a period, carrying in the
    /// opening balance from prior activity.
    pub fn general_ledger(
        &self,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<GeneralLedger> {
        let (account, prior, within) = {
            let state = self.state.read();
            let account = state
                .accounts
                .get(&account_id)
                .filter(|a| a.is_live())
                .cloned()
                .ok_or(LedgerError::AccountNotFound(account_id))?;

            let mut prior = Vec::new();
            let mut within = Vec::new();
            for entry in state.entries.values() {
                if !entry.is_posted() || !state.is_recognized(entry, &self.policy) {
                    continue;
                }
                if entry.lines.iter().all(|l| l.account_id != account_id) {
                    continue;
                }
                if entry.entry_date < from {
                    prior.push(entry.clone());
                } else if entry.entry_date <= to {
                    within.push(entry.clone());
                }
            }
            (account, prior, within)
        };

        let opening: Decimal = prior
            .iter()
            .flat_map(|e| e.lines.iter())
            .filter(|l| l.account_id == account_id)
            .map(|l| l.balance_change(account.account_type))
            .sum();

        Ok(ReportService::new().general_ledger(&account, &within, opening))
    }

    /// Aggregates balances, optionally restricted to an entry-date
    /// range.
    fn aggregate(&self, period: Option<(NaiveDate, NaiveDate)>) -> Vec<AccountBalanceView> {
        let state = self.state.read();
        self.views_of(&state, period)
    }

    /// Aggregation over an already-held state guard; used by healing
    /// paths that must recompute under the write lock.
    pub(crate) fn views_of(
        &self,
        state: &crate::state::LedgerState,
        period: Option<(NaiveDate, NaiveDate)>,
    ) -> Vec<AccountBalanceView> {
        self.views_filtered(state, period, StatusFilter::Posted)
    }

    fn views_filtered(
        &self,
        state: &crate::state::LedgerState,
        period: Option<(NaiveDate, NaiveDate)>,
        filter: StatusFilter,
    ) -> Vec<AccountBalanceView> {
        let accounts: Vec<Account> = state.accounts.values().cloned().collect();
        let entries: Vec<JournalEntry> = state
            .entries
            .values()
            .filter(|e| match period {
                Some((from, to)) => e.entry_date >= from && e.entry_date <= to,
                None => true,
            })
            .cloned()
            .collect();

        let views = BalanceAggregator::new().aggregate(&accounts, &entries, filter, |entry| {
            state.is_recognized(entry, &self.policy)
        });
        // Cached balances are lifetime figures; inside a date window they
        // would misstate the period, so windowed queries keep only
        // journal-backed views.
        match period {
            Some(_) => views.into_iter().filter(|v| v.is_authoritative()).collect(),
            None => views,
        }
    }
}
