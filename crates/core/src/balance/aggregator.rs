//! The balance aggregation computation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::types::{AccountBalanceView, BalanceSource, StatusFilter};
use crate::ledger::types::{Account, EntryStatus, JournalEntry};
use kasira_shared::types::AccountId;

/// Running debit/credit totals for one account.
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    debit: Decimal,
    credit: Decimal,
}

/// Computes account balances from journal entries in a single pass.
///
/// The aggregator is pure: the caller supplies the accounts, the
/// entries, and a recognition predicate, and receives one view per live
/// account. Accounts with no journal lines at all fall back to their
/// cached balance, flagged as non-authoritative.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Creates a new aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Aggregates balances for all live accounts.
    ///
    /// `recognized` decides whether a given entry's source document
    /// qualifies it for aggregation; entries failing the predicate are
    /// skipped entirely.
    #[must_use]
    pub fn aggregate<F>(
        &self,
        accounts: &[Account],
        entries: &[JournalEntry],
        filter: StatusFilter,
        mut recognized: F,
    ) -> Vec<AccountBalanceView>
    where
        F: FnMut(&JournalEntry) -> bool,
    {
        let mut totals: BTreeMap<AccountId, Totals> = BTreeMap::new();

        for entry in entries {
            if filter == StatusFilter::Posted && entry.status != EntryStatus::Posted {
                continue;
            }
            if entry.status == EntryStatus::Cancelled {
                continue;
            }
            // Touching the slot marks the account as journal-backed even
            // when the entry fails recognition and contributes nothing.
            let counted = recognized(entry);
            for line in &entry.lines {
                let slot = totals.entry(line.account_id).or_default();
                if counted {
                    slot.debit += line.debit;
                    slot.credit += line.credit;
                }
            }
        }

        accounts
            .iter()
            .filter(|account| account.is_live())
            .map(|account| match totals.get(&account.id) {
                Some(t) => AccountBalanceView {
                    account_id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    account_type: account.account_type,
                    total_debit: t.debit,
                    total_credit: t.credit,
                    net_balance: account.account_type.net_balance(t.debit, t.credit),
                    source: BalanceSource::PostedJournal,
                },
                None => AccountBalanceView::from_cached(account),
            })
            .collect()
    }

    /// Aggregates the balance of a single account.
    #[must_use]
    pub fn aggregate_one<F>(
        &self,
        account: &Account,
        entries: &[JournalEntry],
        filter: StatusFilter,
        recognized: F,
    ) -> AccountBalanceView
    where
        F: FnMut(&JournalEntry) -> bool,
    {
        let views = self.aggregate(std::slice::from_ref(account), entries, filter, recognized);
        views
            .into_iter()
            .next()
            .unwrap_or_else(|| AccountBalanceView::from_cached(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{AccountType, JournalLine, SourceType};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use kasira_shared::types::{JournalEntryId, JournalLineId, UserId};

    fn account(code: &str, account_type: AccountType) -> Account {
        Account {
            id: AccountId::new(),
            code: code.to_string(),
            name: code.to_string(),
            account_type,
            category: None,
            is_header: false,
            is_active: true,
            balance: Decimal::ZERO,
            deleted_at: None,
        }
    }

    fn entry(
        status: EntryStatus,
        lines: Vec<(AccountId, Decimal, Decimal)>,
    ) -> JournalEntry {
        let id = JournalEntryId::new();
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, (account_id, debit, credit))| JournalLine {
                id: JournalLineId::new(),
                journal_id: id,
                account_id,
                line_number: u32::try_from(i + 1).unwrap(),
                debit,
                credit,
                description: None,
            })
            .collect();
        JournalEntry {
            id,
            source_type: SourceType::Manual,
            source_id: None,
            entry_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            description: "test".to_string(),
            notes: None,
            status,
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            reverses: None,
            reversed_by: None,
            created_by: UserId::new(),
            created_at: Utc::now(),
            posted_at: None,
            lines,
        }
    }

    #[test]
    fn test_posted_lines_summed() {
        let cash = account("1101", AccountType::Asset);
        let revenue = account("4101", AccountType::Revenue);
        let entries = vec![
            entry(
                EntryStatus::Posted,
                vec![
                    (cash.id, dec!(1000), Decimal::ZERO),
                    (revenue.id, Decimal::ZERO, dec!(1000)),
                ],
            ),
            entry(
                EntryStatus::Posted,
                vec![
                    (cash.id, dec!(250), Decimal::ZERO),
                    (revenue.id, Decimal::ZERO, dec!(250)),
                ],
            ),
        ];

        let views = BalanceAggregator::new().aggregate(
            &[cash.clone(), revenue.clone()],
            &entries,
            StatusFilter::Posted,
            |_| true,
        );

        let cash_view = views.iter().find(|v| v.account_id == cash.id).unwrap();
        assert_eq!(cash_view.total_debit, dec!(1250));
        assert_eq!(cash_view.net_balance, dec!(1250));
        assert_eq!(cash_view.source, BalanceSource::PostedJournal);

        let revenue_view = views.iter().find(|v| v.account_id == revenue.id).unwrap();
        assert_eq!(revenue_view.net_balance, dec!(1250));
    }

    #[test]
    fn test_drafts_excluded() {
        let cash = account("1101", AccountType::Asset);
        let entries = vec![entry(
            EntryStatus::Draft,
            vec![(cash.id, dec!(999), Decimal::ZERO)],
        )];

        let views = BalanceAggregator::new().aggregate(
            &[cash.clone()],
            &entries,
            StatusFilter::Posted,
            |_| true,
        );
        assert_eq!(views[0].net_balance, Decimal::ZERO);
    }

    #[test]
    fn test_unrecognized_entries_excluded() {
        let cash = account("1101", AccountType::Asset);
        let entries = vec![entry(
            EntryStatus::Posted,
            vec![(cash.id, dec!(500), Decimal::ZERO)],
        )];

        let views = BalanceAggregator::new().aggregate(
            &[cash.clone()],
            &entries,
            StatusFilter::Posted,
            |_| false,
        );
        // The account has postings, so it stays journal-backed at zero
        // rather than falling back to the cache.
        assert_eq!(views[0].net_balance, Decimal::ZERO);
        assert_eq!(views[0].source, BalanceSource::PostedJournal);
    }

    #[test]
    fn test_account_without_postings_falls_back_to_cache() {
        let mut idle = account("1999", AccountType::Asset);
        idle.balance = dec!(2500);
        let views =
            BalanceAggregator::new().aggregate(&[idle.clone()], &[], StatusFilter::Posted, |_| {
                true
            });
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].net_balance, dec!(2500));
        assert_eq!(views[0].source, BalanceSource::AccountsTable);
        assert!(!views[0].is_authoritative());
    }

    #[test]
    fn test_posted_activity_overrides_cache() {
        let mut cash = account("1101", AccountType::Asset);
        cash.balance = dec!(9999);
        let entries = vec![entry(
            EntryStatus::Posted,
            vec![(cash.id, dec!(100), Decimal::ZERO)],
        )];
        let views = BalanceAggregator::new().aggregate(
            &[cash.clone()],
            &entries,
            StatusFilter::Posted,
            |_| true,
        );
        assert_eq!(views[0].net_balance, dec!(100));
        assert_eq!(views[0].source, BalanceSource::PostedJournal);
    }

    #[test]
    fn test_deleted_account_excluded() {
        let mut gone = account("1500", AccountType::Asset);
        gone.deleted_at = Some(Utc::now());
        let views =
            BalanceAggregator::new().aggregate(&[gone], &[], StatusFilter::Posted, |_| true);
        assert!(views.is_empty());
    }

    #[test]
    fn test_credit_normal_sign() {
        let loan = account("2101", AccountType::Liability);
        let entries = vec![entry(
            EntryStatus::Posted,
            vec![(loan.id, Decimal::ZERO, dec!(300))],
        )];
        let views = BalanceAggregator::new().aggregate(
            &[loan.clone()],
            &entries,
            StatusFilter::Posted,
            |_| true,
        );
        assert_eq!(views[0].net_balance, dec!(300));
    }

    #[test]
    fn test_all_filter_includes_drafts() {
        let cash = account("1101", AccountType::Asset);
        let entries = vec![entry(
            EntryStatus::Draft,
            vec![(cash.id, dec!(100), Decimal::ZERO)],
        )];
        let views = BalanceAggregator::new().aggregate(
            &[cash.clone()],
            &entries,
            StatusFilter::All,
            |_| true,
        );
        assert_eq!(views[0].net_balance, dec!(100));
    }

    #[test]
    fn test_cached_fallback_flagged() {
        let mut cash = account("1101", AccountType::Asset);
        cash.balance = dec!(777);
        let view = AccountBalanceView::from_cached(&cash);
        assert_eq!(view.net_balance, dec!(777));
        assert_eq!(view.source, BalanceSource::AccountsTable);
        assert!(!view.is_authoritative());
    }
}
