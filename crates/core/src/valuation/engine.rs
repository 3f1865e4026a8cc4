//! Stock valuation under FIFO, LIFO, and weighted average.

use rust_decimal::Decimal;

use super::types::{StockMovement, ValuationMethod, ValuationResult};
use kasira_shared::types::ProductId;

/// Values stock on hand from incoming movements.
///
/// Movements are treated as lots. The engine never consumes more units
/// than the lots provide: when the recorded stock exceeds the received
/// quantity, only the covered units carry value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuationEngine;

impl ValuationEngine {
    /// Creates a new engine instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Values `stock` units of a product from its incoming movements.
    ///
    /// Movements for other products are ignored. Zero stock or no
    /// movements value to zero.
    #[must_use]
    pub fn value_stock(
        &self,
        product_id: ProductId,
        method: ValuationMethod,
        stock: i64,
        movements: &[StockMovement],
    ) -> ValuationResult {
        let mut lots: Vec<&StockMovement> = movements
            .iter()
            .filter(|m| m.product_id == product_id && m.quantity > 0)
            .collect();
        // Stable by receipt date; equal dates keep insertion order.
        lots.sort_by_key(|m| m.date);

        let total_value = if stock <= 0 || lots.is_empty() {
            Decimal::ZERO
        } else {
            match method {
                // Earliest lots cover the stock on hand first.
                ValuationMethod::Fifo => Self::take_lots(lots.iter().copied(), stock),
                // Latest lots cover the stock on hand first.
                ValuationMethod::Lifo => Self::take_lots(lots.iter().rev().copied(), stock),
                ValuationMethod::WeightedAverage => {
                    let total_qty: i64 = lots.iter().map(|m| m.quantity).sum();
                    let total_cost: Decimal = lots
                        .iter()
                        .map(|m| Decimal::from(m.quantity) * m.unit_cost)
                        .sum();
                    if total_qty == 0 {
                        Decimal::ZERO
                    } else {
                        let covered = stock.min(total_qty);
                        total_cost / Decimal::from(total_qty) * Decimal::from(covered)
                    }
                }
            }
        };

        let unit_cost = if stock > 0 && total_value != Decimal::ZERO {
            total_value / Decimal::from(stock)
        } else {
            Decimal::ZERO
        };

        ValuationResult {
            product_id,
            method,
            stock_quantity: stock.max(0),
            total_value,
            unit_cost,
        }
    }

    /// Unit cost the next consumed unit would carry under `method`.
    ///
    /// FIFO consumes the oldest lot next, LIFO the newest; weighted
    /// average uses the blended cost over all lots.
    #[must_use]
    pub fn consumption_unit_cost(
        &self,
        product_id: ProductId,
        method: ValuationMethod,
        movements: &[StockMovement],
    ) -> Decimal {
        let mut lots: Vec<&StockMovement> = movements
            .iter()
            .filter(|m| m.product_id == product_id && m.quantity > 0)
            .collect();
        lots.sort_by_key(|m| m.date);

        match method {
            ValuationMethod::Fifo => lots.first().map_or(Decimal::ZERO, |m| m.unit_cost),
            ValuationMethod::Lifo => lots.last().map_or(Decimal::ZERO, |m| m.unit_cost),
            ValuationMethod::WeightedAverage => {
                let total_qty: i64 = lots.iter().map(|m| m.quantity).sum();
                if total_qty == 0 {
                    return Decimal::ZERO;
                }
                let total_cost: Decimal = lots
                    .iter()
                    .map(|m| Decimal::from(m.quantity) * m.unit_cost)
                    .sum();
                total_cost / Decimal::from(total_qty)
            }
        }
    }

    /// Consumes lots in iteration order until `stock` units are covered.
    fn take_lots<'a, I>(lots: I, stock: i64) -> Decimal
    where
        I: Iterator<Item = &'a StockMovement>,
    {
        let mut remaining = stock;
        let mut value = Decimal::ZERO;
        for lot in lots {
            if remaining <= 0 {
                break;
            }
            let taken = remaining.min(lot.quantity);
            value += Decimal::from(taken) * lot.unit_cost;
            remaining -= taken;
        }
        value
    }
}
