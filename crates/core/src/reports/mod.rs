//! Financial reports derived from aggregated balances.
//!
//! Reports are stateless formatters: every figure comes from the
//! balance aggregator's output, never from cached columns, so the trial
//! balance, balance sheet, and income statement always agree with the
//! journal.

pub mod service;
pub mod types;

pub use service::ReportService;
pub use types::{
    BalanceSheet, CashFlowSummary, GeneralLedger, GeneralLedgerRow, IncomeStatement, ReportLine,
    TrialBalance, TrialBalanceRow,
};
