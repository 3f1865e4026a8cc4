//! Property-based tests for journal entry validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use kasira_shared::types::{AccountId, UserId};

use super::types::{Account, AccountType, CreateEntryInput, JournalLineInput, SourceType};
use super::validation::{validate_entry, validate_lines};
use super::error::LedgerError;

const TOLERANCE_CENTS: i64 = 1;

/// Strategy to generate a positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_account() -> Account {
    Account {
        id: AccountId::new(),
        code: "1101".to_string(),
        name: "Cash".to_string(),
        account_type: AccountType::Asset,
        category: None,
        is_header: false,
        is_active: true,
        balance: Decimal::ZERO,
        deleted_at: None,
    }
}

fn make_input(lines: Vec<JournalLineInput>) -> CreateEntryInput {
    CreateEntryInput {
        source_type: SourceType::Manual,
        source_id: None,
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        description: "prop".to_string(),
        notes: None,
        lines,
        created_by: UserId::new(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* pair of equal positive amounts, a one-debit one-credit
    /// entry validates and its totals match the amounts.
    #[test]
    fn prop_balanced_entry_accepted(amount in positive_amount()) {
        let debit_account = make_account();
        let credit_account = make_account();
        let input = make_input(vec![
            JournalLineInput::debit(debit_account.id, amount),
            JournalLineInput::credit(credit_account.id, amount),
        ]);
        let accounts = vec![debit_account, credit_account];

        let result = validate_entry(&input, Decimal::new(TOLERANCE_CENTS, 2), |id| {
            accounts.iter().find(|a| a.id == id)
        });
        prop_assert!(result.is_ok(), "balanced entry rejected: {:?}", result);
        let totals = result.unwrap();
        prop_assert_eq!(totals.debit, amount);
        prop_assert_eq!(totals.credit, amount);
    }

    /// *For any* two amounts differing by more than the tolerance, the
    /// entry is rejected as unbalanced.
    #[test]
    fn prop_unbalanced_entry_rejected(
        amount in positive_amount(),
        gap_cents in 2i64..10_000_000i64,
    ) {
        let debit_account = make_account();
        let credit_account = make_account();
        let gap = Decimal::new(gap_cents, 2);
        let input = make_input(vec![
            JournalLineInput::debit(debit_account.id, amount + gap),
            JournalLineInput::credit(credit_account.id, amount),
        ]);
        let accounts = vec![debit_account, credit_account];

        let result = validate_entry(&input, Decimal::new(TOLERANCE_CENTS, 2), |id| {
            accounts.iter().find(|a| a.id == id)
        });
        prop_assert!(
            matches!(result, Err(LedgerError::UnbalancedEntry { .. })),
            "unbalanced entry accepted: {:?}",
            result
        );
    }

    /// *For any* imbalance within the tolerance, the entry is accepted.
    #[test]
    fn prop_within_tolerance_accepted(amount in positive_amount()) {
        let debit_account = make_account();
        let credit_account = make_account();
        let epsilon = Decimal::new(TOLERANCE_CENTS, 2);
        let input = make_input(vec![
            JournalLineInput::debit(debit_account.id, amount + epsilon),
            JournalLineInput::credit(credit_account.id, amount),
        ]);
        let accounts = vec![debit_account, credit_account];

        let result = validate_entry(&input, epsilon, |id| {
            accounts.iter().find(|a| a.id == id)
        });
        prop_assert!(result.is_ok(), "within-tolerance entry rejected: {:?}", result);
    }

    /// *For any* entry containing a negative amount, validation rejects it.
    #[test]
    fn prop_negative_amount_rejected(
        amount in positive_amount(),
        neg_cents in 1i64..100_000_000i64,
    ) {
        let lines = vec![
            JournalLineInput::debit(AccountId::new(), amount),
            JournalLineInput::credit(AccountId::new(), Decimal::new(-neg_cents, 2)),
        ];
        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::NegativeAmount { line: 2 })),
            "negative amount accepted: {:?}",
            result
        );
    }

    /// *For any* entry containing a line with both sides set, validation
    /// rejects it.
    #[test]
    fn prop_two_sided_line_rejected(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        let lines = vec![JournalLineInput {
            account_id: AccountId::new(),
            debit,
            credit,
            description: None,
        }];
        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::DebitAndCredit { line: 1 })),
            "two-sided line accepted: {:?}",
            result
        );
    }

    /// *For any* multi-line entry where debits sum to the single credit,
    /// validation accepts it.
    #[test]
    fn prop_multi_line_balanced_accepted(
        amount1 in positive_amount(),
        amount2 in positive_amount(),
    ) {
        let a = make_account();
        let b = make_account();
        let c = make_account();
        let input = make_input(vec![
            JournalLineInput::debit(a.id, amount1),
            JournalLineInput::debit(b.id, amount2),
            JournalLineInput::credit(c.id, amount1 + amount2),
        ]);
        let accounts = vec![a, b, c];

        let result = validate_entry(&input, Decimal::new(TOLERANCE_CENTS, 2), |id| {
            accounts.iter().find(|a| a.id == id)
        });
        prop_assert!(result.is_ok(), "multi-line balanced entry rejected: {:?}", result);
    }
}
