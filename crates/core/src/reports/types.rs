//! Report output types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::types::AccountType;
use kasira_shared::types::{AccountId, JournalEntryId};

/// One account's row on the trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit column amount (zero when the net is a credit).
    pub debit: Decimal,
    /// Credit column amount (zero when the net is a debit).
    pub credit: Decimal,
}

/// Trial balance over all accounts with activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Report rows, ordered by account code.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of the debit column.
    pub total_debit: Decimal,
    /// Sum of the credit column.
    pub total_credit: Decimal,
    /// Whether the columns agree within the tolerance.
    pub is_balanced: bool,
}

/// A named amount on a report section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLine {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Line amount.
    pub amount: Decimal,
}

/// Balance sheet: assets against liabilities plus equity.
///
/// Current-period earnings are folded into the equity section so the
/// statement balances without a closing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Asset section lines.
    pub assets: Vec<ReportLine>,
    /// Liability section lines.
    pub liabilities: Vec<ReportLine>,
    /// Equity section lines (including current earnings).
    pub equity: Vec<ReportLine>,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity including current earnings.
    pub total_equity: Decimal,
    /// Whether assets equal liabilities plus equity within the tolerance.
    pub is_balanced: bool,
}

/// Income statement over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Revenue lines.
    pub revenue: Vec<ReportLine>,
    /// Cost-of-goods-sold lines.
    pub cost_of_goods_sold: Vec<ReportLine>,
    /// Operating expense lines.
    pub expenses: Vec<ReportLine>,
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Total cost of goods sold.
    pub total_cogs: Decimal,
    /// Revenue minus cost of goods sold.
    pub gross_profit: Decimal,
    /// Total operating expenses.
    pub total_expenses: Decimal,
    /// Gross profit minus operating expenses.
    pub net_income: Decimal,
}

/// Cash movement summary over the cash-and-bank accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowSummary {
    /// Total debits into cash accounts.
    pub inflow: Decimal,
    /// Total credits out of cash accounts.
    pub outflow: Decimal,
    /// Inflow minus outflow.
    pub net_change: Decimal,
}

/// One posted line on an account's general ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralLedgerRow {
    /// The entry the line belongs to.
    pub journal_id: JournalEntryId,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance after this line, signed by the account's normal
    /// side.
    pub running_balance: Decimal,
}

/// An account's general ledger over a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralLedger {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Balance carried in from before the period.
    pub opening_balance: Decimal,
    /// Lines within the period, in date order.
    pub rows: Vec<GeneralLedgerRow>,
    /// Balance after the last row.
    pub closing_balance: Decimal,
}
