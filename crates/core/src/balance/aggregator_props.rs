//! Property-based tests for balance aggregation.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use kasira_shared::types::{AccountId, JournalEntryId, JournalLineId, UserId};

use super::aggregator::BalanceAggregator;
use super::types::StatusFilter;
use crate::ledger::types::{
    Account, AccountType, EntryStatus, JournalEntry, JournalLine, SourceType,
};

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_account(account_type: AccountType) -> Account {
    Account {
        id: AccountId::new(),
        code: "x".to_string(),
        name: "x".to_string(),
        account_type,
        category: None,
        is_header: false,
        is_active: true,
        balance: Decimal::ZERO,
        deleted_at: None,
    }
}

fn posted_entry(lines: Vec<(AccountId, Decimal, Decimal)>) -> JournalEntry {
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
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        description: "prop".to_string(),
        notes: None,
        status: EntryStatus::Posted,
        total_debit: Decimal::ZERO,
        total_credit: Decimal::ZERO,
        reverses: None,
        reversed_by: None,
        created_by: UserId::new(),
        created_at: Utc::now(),
        posted_at: Some(Utc::now()),
        lines,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* set of balanced posted entries, total aggregated debits
    /// equal total aggregated credits.
    #[test]
    fn prop_aggregated_totals_balance(amounts in prop::collection::vec(positive_amount(), 1..20)) {
        let cash = make_account(AccountType::Asset);
        let revenue = make_account(AccountType::Revenue);
        let entries: Vec<JournalEntry> = amounts
            .iter()
            .map(|&a| {
                posted_entry(vec![
                    (cash.id, a, Decimal::ZERO),
                    (revenue.id, Decimal::ZERO, a),
                ])
            })
            .collect();

        let views = BalanceAggregator::new().aggregate(
            &[cash.clone(), revenue.clone()],
            &entries,
            StatusFilter::Posted,
            |_| true,
        );

        let total_debit: Decimal = views.iter().map(|v| v.total_debit).sum();
        let total_credit: Decimal = views.iter().map(|v| v.total_credit).sum();
        prop_assert_eq!(total_debit, total_credit);
    }

    /// *For any* balanced activity, debit-normal balances equal
    /// credit-normal balances (the accounting equation holds exactly).
    #[test]
    fn prop_accounting_equation_holds(amounts in prop::collection::vec(positive_amount(), 1..20)) {
        let cash = make_account(AccountType::Asset);
        let expense = make_account(AccountType::Expense);
        let revenue = make_account(AccountType::Revenue);
        let liability = make_account(AccountType::Liability);

        let mut entries = Vec::new();
        for (i, &a) in amounts.iter().enumerate() {
            if i % 2 == 0 {
                entries.push(posted_entry(vec![
                    (cash.id, a, Decimal::ZERO),
                    (revenue.id, Decimal::ZERO, a),
                ]));
            } else {
                entries.push(posted_entry(vec![
                    (expense.id, a, Decimal::ZERO),
                    (liability.id, Decimal::ZERO, a),
                ]));
            }
        }

        let accounts = vec![cash, expense, revenue, liability];
        let views = BalanceAggregator::new().aggregate(
            &accounts,
            &entries,
            StatusFilter::Posted,
            |_| true,
        );

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
        prop_assert_eq!(debit_normal, credit_normal);
    }

    /// *For any* activity, adding a draft entry never changes posted
    /// aggregation.
    #[test]
    fn prop_drafts_never_counted(amount in positive_amount(), draft_amount in positive_amount()) {
        let cash = make_account(AccountType::Asset);
        let revenue = make_account(AccountType::Revenue);

        let mut entries = vec![posted_entry(vec![
            (cash.id, amount, Decimal::ZERO),
            (revenue.id, Decimal::ZERO, amount),
        ])];
        let before = BalanceAggregator::new().aggregate(
            &[cash.clone(), revenue.clone()],
            &entries,
            StatusFilter::Posted,
            |_| true,
        );

        let mut draft = posted_entry(vec![
            (cash.id, draft_amount, Decimal::ZERO),
            (revenue.id, Decimal::ZERO, draft_amount),
        ]);
        draft.status = EntryStatus::Draft;
        entries.push(draft);

        let after = BalanceAggregator::new().aggregate(
            &[cash.clone(), revenue.clone()],
            &entries,
            StatusFilter::Posted,
            |_| true,
        );

        for (b, a) in before.iter().zip(after.iter()) {
            prop_assert_eq!(b.net_balance, a.net_balance);
        }
    }
}
