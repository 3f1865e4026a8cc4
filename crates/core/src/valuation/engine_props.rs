//! Property-based tests for stock valuation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use kasira_shared::types::ProductId;

use super::engine::ValuationEngine;
use super::types::{StockMovement, ValuationMethod};

fn unit_cost() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn lot_strategy() -> impl Strategy<Value = (i64, Decimal)> {
    (1i64..100i64, unit_cost())
}

fn method_strategy() -> impl Strategy<Value = ValuationMethod> {
    prop_oneof![
        Just(ValuationMethod::Fifo),
        Just(ValuationMethod::Lifo),
        Just(ValuationMethod::WeightedAverage),
    ]
}

fn make_movements(product_id: ProductId, lots: &[(i64, Decimal)]) -> Vec<StockMovement> {
    lots.iter()
        .enumerate()
        .map(|(i, &(quantity, unit_cost))| StockMovement {
            product_id,
            date: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .checked_add_days(chrono::Days::new(u64::try_from(i).unwrap()))
                .unwrap(),
            quantity,
            unit_cost,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* method, valuing the full received quantity yields the
    /// total cost of all lots.
    #[test]
    fn prop_full_stock_values_to_total_cost(
        lots in prop::collection::vec(lot_strategy(), 1..10),
        method in method_strategy(),
    ) {
        let product_id = ProductId::new();
        let movements = make_movements(product_id, &lots);
        let total_qty: i64 = lots.iter().map(|(q, _)| q).sum();
        let total_cost: Decimal = lots
            .iter()
            .map(|&(q, c)| Decimal::from(q) * c)
            .sum();

        let result =
            ValuationEngine::new().value_stock(product_id, method, total_qty, &movements);
        // Weighted average divides before multiplying, so allow for
        // rounding in the last retained digits.
        let epsilon = Decimal::new(1, 6);
        prop_assert!((result.total_value - total_cost).abs() <= epsilon);
    }

    /// *For any* method, zero stock values to zero.
    #[test]
    fn prop_zero_stock_is_zero(
        lots in prop::collection::vec(lot_strategy(), 0..10),
        method in method_strategy(),
    ) {
        let product_id = ProductId::new();
        let movements = make_movements(product_id, &lots);
        let result = ValuationEngine::new().value_stock(product_id, method, 0, &movements);
        prop_assert_eq!(result.total_value, Decimal::ZERO);
    }

    /// *For any* method, the valuation never exceeds the total cost of
    /// all lots, even when stock exceeds the received quantity.
    #[test]
    fn prop_never_values_more_than_received(
        lots in prop::collection::vec(lot_strategy(), 1..10),
        stock in 0i64..2000i64,
        method in method_strategy(),
    ) {
        let product_id = ProductId::new();
        let movements = make_movements(product_id, &lots);
        let total_cost: Decimal = lots
            .iter()
            .map(|&(q, c)| Decimal::from(q) * c)
            .sum();

        let result = ValuationEngine::new().value_stock(product_id, method, stock, &movements);
        let epsilon = Decimal::new(1, 6);
        prop_assert!(result.total_value >= Decimal::ZERO);
        prop_assert!(result.total_value <= total_cost + epsilon);
    }

    /// *For any* single-lot history, all three methods agree.
    #[test]
    fn prop_single_lot_methods_agree(
        lot in lot_strategy(),
        stock in 0i64..200i64,
    ) {
        let product_id = ProductId::new();
        let movements = make_movements(product_id, &[lot]);
        let engine = ValuationEngine::new();
        let fifo = engine.value_stock(product_id, ValuationMethod::Fifo, stock, &movements);
        let lifo = engine.value_stock(product_id, ValuationMethod::Lifo, stock, &movements);
        let avg = engine.value_stock(
            product_id,
            ValuationMethod::WeightedAverage,
            stock,
            &movements,
        );
        prop_assert_eq!(fifo.total_value, lifo.total_value);
        prop_assert_eq!(fifo.total_value, avg.total_value);
    }
}
