//! Valuation types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kasira_shared::types::ProductId;

/// Inventory costing method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    /// First in, first out: stock on hand is covered by the earliest
    /// lots, and goods sold carry the oldest costs.
    Fifo,
    /// Last in, first out: stock on hand is covered by the latest
    /// lots, and goods sold carry the newest costs.
    Lifo,
    /// Weighted average cost over all incoming movements.
    WeightedAverage,
}

impl ValuationMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fifo => "fifo",
            Self::Lifo => "lifo",
            Self::WeightedAverage => "weighted_average",
        }
    }

    /// Parses a method from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fifo" => Some(Self::Fifo),
            "lifo" => Some(Self::Lifo),
            "weighted_average" | "average" => Some(Self::WeightedAverage),
            _ => None,
        }
    }
}

/// A sellable product with tracked stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,
    /// Stock-keeping unit code.
    pub sku: String,
    /// Product name.
    pub name: String,
    /// Default unit cost, used when no movement history covers the
    /// product.
    pub cost_price: Decimal,
    /// Units on hand.
    pub stock: i64,
    /// Whether the product is active.
    pub is_active: bool,
}

/// An incoming stock lot (a purchase receipt).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    /// The product received.
    pub product_id: ProductId,
    /// Receipt date.
    pub date: NaiveDate,
    /// Units received.
    pub quantity: i64,
    /// Cost per unit at receipt.
    pub unit_cost: Decimal,
}

/// The valued stock of one product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    /// The product valued.
    pub product_id: ProductId,
    /// The method applied.
    pub method: ValuationMethod,
    /// Units on hand at valuation time.
    pub stock_quantity: i64,
    /// Total value of the stock on hand.
    pub total_value: Decimal,
    /// Average cost per unit on hand (zero when no stock).
    pub unit_cost: Decimal,
}
