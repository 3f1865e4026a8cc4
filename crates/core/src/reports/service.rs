//! Report construction over aggregated balances.

use rust_decimal::Decimal;

use super::types::{
    BalanceSheet, CashFlowSummary, GeneralLedger, GeneralLedgerRow, IncomeStatement, ReportLine,
    TrialBalance, TrialBalanceRow,
};
use crate::balance::types::AccountBalanceView;
use crate::ledger::types::{Account, AccountType, EntryStatus, JournalEntry};

/// Builds financial reports from aggregated balance views.
///
/// The service never touches storage; callers aggregate first and feed
/// the views in. Classification closures (which accounts count as COGS,
/// which as cash) are injected so the chart of accounts stays
/// configurable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportService;

impl ReportService {
    /// Creates a new service instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds a trial balance. Accounts with zero activity are skipped.
    #[must_use]
    pub fn trial_balance(&self, views: &[AccountBalanceView], tolerance: Decimal) -> TrialBalance {
        let mut rows: Vec<TrialBalanceRow> = views
            .iter()
            .filter(|v| v.total_debit != Decimal::ZERO || v.total_credit != Decimal::ZERO)
            .map(|v| {
                let net = v.total_debit - v.total_credit;
                let (debit, credit) = if net >= Decimal::ZERO {
                    (net, Decimal::ZERO)
                } else {
                    (Decimal::ZERO, -net)
                };
                TrialBalanceRow {
                    code: v.code.clone(),
                    name: v.name.clone(),
                    account_type: v.account_type,
                    debit,
                    credit,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();
        TrialBalance {
            rows,
            total_debit,
            total_credit,
            is_balanced: (total_debit - total_credit).abs() <= tolerance,
        }
    }

    /// Builds a balance sheet, folding current earnings into equity.
    #[must_use]
    pub fn balance_sheet(&self, views: &[AccountBalanceView], tolerance: Decimal) -> BalanceSheet {
        let section = |account_type: AccountType| -> Vec<ReportLine> {
            let mut lines: Vec<ReportLine> = views
                .iter()
                .filter(|v| v.account_type == account_type && v.net_balance != Decimal::ZERO)
                .map(|v| ReportLine {
                    code: v.code.clone(),
                    name: v.name.clone(),
                    amount: v.net_balance,
                })
                .collect();
            lines.sort_by(|a, b| a.code.cmp(&b.code));
            lines
        };

        let assets = section(AccountType::Asset);
        let liabilities = section(AccountType::Liability);
        let mut equity = section(AccountType::Equity);

        let revenue: Decimal = views
            .iter()
            .filter(|v| v.account_type == AccountType::Revenue)
            .map(|v| v.net_balance)
            .sum();
        let expenses: Decimal = views
            .iter()
            .filter(|v| v.account_type == AccountType::Expense)
            .map(|v| v.net_balance)
            .sum();
        let earnings = revenue - expenses;
        if earnings != Decimal::ZERO {
            equity.push(ReportLine {
                code: String::new(),
                name: "Current Earnings".to_string(),
                amount: earnings,
            });
        }

        let total_assets: Decimal = assets.iter().map(|l| l.amount).sum();
        let total_liabilities: Decimal = liabilities.iter().map(|l| l.amount).sum();
        let total_equity: Decimal = equity.iter().map(|l| l.amount).sum();

        BalanceSheet {
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            is_balanced: (total_assets - (total_liabilities + total_equity)).abs() <= tolerance,
        }
    }

    /// Builds an income statement over period views.
    ///
    /// `is_cogs` classifies expense accounts belonging to the
    /// cost-of-goods-sold section.
    #[must_use]
    pub fn income_statement<F>(
        &self,
        views: &[AccountBalanceView],
        mut is_cogs: F,
    ) -> IncomeStatement
    where
        F: FnMut(&AccountBalanceView) -> bool,
    {
        let mut revenue = Vec::new();
        let mut cogs = Vec::new();
        let mut expenses = Vec::new();

        for v in views {
            if v.net_balance == Decimal::ZERO {
                continue;
            }
            let line = ReportLine {
                code: v.code.clone(),
                name: v.name.clone(),
                amount: v.net_balance,
            };
            match v.account_type {
                AccountType::Revenue => revenue.push(line),
                AccountType::Expense => {
                    if is_cogs(v) {
                        cogs.push(line);
                    } else {
                        expenses.push(line);
                    }
                }
                _ => {}
            }
        }
        revenue.sort_by(|a, b| a.code.cmp(&b.code));
        cogs.sort_by(|a, b| a.code.cmp(&b.code));
        expenses.sort_by(|a, b| a.code.cmp(&b.code));

        let total_revenue: Decimal = revenue.iter().map(|l| l.amount).sum();
        let total_cogs: Decimal = cogs.iter().map(|l| l.amount).sum();
        let total_expenses: Decimal = expenses.iter().map(|l| l.amount).sum();
        let gross_profit = total_revenue - total_cogs;

        IncomeStatement {
            revenue,
            cost_of_goods_sold: cogs,
            expenses,
            total_revenue,
            total_cogs,
            gross_profit,
            total_expenses,
            net_income: gross_profit - total_expenses,
        }
    }

    /// Summarizes cash movement over views of cash-and-bank accounts.
    #[must_use]
    pub fn cash_flow_summary(&self, cash_views: &[AccountBalanceView]) -> CashFlowSummary {
        let inflow: Decimal = cash_views.iter().map(|v| v.total_debit).sum();
        let outflow: Decimal = cash_views.iter().map(|v| v.total_credit).sum();
        CashFlowSummary {
            inflow,
            outflow,
            net_change: inflow - outflow,
        }
    }

    /// Builds an account's general ledger with a running balance.
    ///
    /// `entries` must be the recognized posted entries; lines are taken
    /// in entry-date order. `opening_balance` is the signed balance
    /// carried in from before the period.
    #[must_use]
    pub fn general_ledger(
        &self,
        account: &Account,
        entries: &[JournalEntry],
        opening_balance: Decimal,
    ) -> GeneralLedger {
        let mut dated: Vec<&JournalEntry> = entries
            .iter()
            .filter(|e| e.status == EntryStatus::Posted)
            .collect();
        dated.sort_by_key(|e| (e.entry_date, e.id));

        let mut running = opening_balance;
        let mut rows = Vec::new();
        for entry in dated {
            for line in entry.lines.iter().filter(|l| l.account_id == account.id) {
                running += line.balance_change(account.account_type);
                rows.push(GeneralLedgerRow {
                    journal_id: entry.id,
                    date: entry.entry_date,
                    description: entry.description.clone(),
                    debit: line.debit,
                    credit: line.credit,
                    running_balance: running,
                });
            }
        }

        GeneralLedger {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            opening_balance,
            rows,
            closing_balance: running,
        }
    }
}
