//! Property-based tests for snapshot diffing.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use kasira_shared::types::{CashBankId, CashTransactionId, UserId};

use super::engine::SnapshotEngine;
use super::types::{DiffEntry, SnapshotLine};

fn amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_line(amount: Decimal) -> SnapshotLine {
    SnapshotLine {
        transaction_id: CashTransactionId::new(),
        date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        description: "txn".to_string(),
        amount,
    }
}

fn locked_snapshot(lines: Vec<SnapshotLine>) -> super::types::Snapshot {
    let engine = SnapshotEngine::new();
    let mut snapshot = engine
        .generate(
            CashBankId::new(),
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
            lines,
            1,
            UserId::new(),
        )
        .unwrap();
    engine.lock(&mut snapshot).unwrap();
    snapshot
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// *For any* set of lines, diffing a snapshot against its own
    /// content yields no differences.
    #[test]
    fn prop_self_diff_is_clean(amounts in prop::collection::vec(amount(), 0..30)) {
        let lines: Vec<SnapshotLine> = amounts.into_iter().map(make_line).collect();
        let snapshot = locked_snapshot(lines.clone());
        let (diffs, summary) = SnapshotEngine::new().diff(&snapshot, &lines, Decimal::ZERO).unwrap();
        prop_assert!(diffs.is_empty());
        prop_assert!(summary.is_clean());
    }

    /// *For any* split of lines into kept and removed, the diff reports
    /// exactly the removed lines as missing.
    #[test]
    fn prop_removed_lines_reported_missing(
        kept_amounts in prop::collection::vec(amount(), 0..15),
        removed_amounts in prop::collection::vec(amount(), 1..15),
    ) {
        let kept: Vec<SnapshotLine> = kept_amounts.into_iter().map(make_line).collect();
        let removed: Vec<SnapshotLine> = removed_amounts.into_iter().map(make_line).collect();

        let mut all = kept.clone();
        all.extend(removed.iter().cloned());
        let snapshot = locked_snapshot(all);

        let (diffs, summary) = SnapshotEngine::new().diff(&snapshot, &kept, Decimal::ZERO).unwrap();
        prop_assert_eq!(summary.missing, removed.len());
        prop_assert_eq!(summary.added, 0);
        prop_assert_eq!(summary.modified, 0);
        for diff in &diffs {
            prop_assert!(
                matches!(diff, DiffEntry::Missing { .. }),
                "expected DiffEntry::Missing, got {:?}",
                diff
            );
        }
    }

    /// *For any* permutation of the same lines, the content hash is
    /// identical.
    #[test]
    fn prop_hash_order_independent(amounts in prop::collection::vec(amount(), 1..20)) {
        let lines: Vec<SnapshotLine> = amounts.into_iter().map(make_line).collect();
        let mut shuffled = lines.clone();
        shuffled.reverse();

        let s1 = locked_snapshot(lines);
        let s2 = locked_snapshot(shuffled);
        prop_assert_eq!(s1.content_hash, s2.content_hash);
    }

    /// *For any* amount change on one line, the diff reports exactly one
    /// modified entry.
    #[test]
    fn prop_amount_change_reported_modified(
        base in amount(),
        delta_cents in 1i64..1_000_000i64,
    ) {
        let line = make_line(base);
        let snapshot = locked_snapshot(vec![line.clone()]);

        let mut changed = line;
        changed.amount += Decimal::new(delta_cents, 2);
        let (_, summary) = SnapshotEngine::new().diff(&snapshot, &[changed], Decimal::ZERO).unwrap();
        prop_assert_eq!(summary.modified, 1);
        prop_assert_eq!(summary.total(), 1);
    }
}
