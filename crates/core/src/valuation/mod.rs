//! Inventory valuation and cost-of-goods-sold estimation.
//!
//! Stock on hand is valued from incoming movements under FIFO, LIFO, or
//! weighted average. The same cost basis feeds COGS estimation for
//! sales that were invoiced without a matching cost entry.

pub mod cogs;
pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use cogs::{CogsBackfillResult, CogsEstimate, CogsService};
pub use engine::ValuationEngine;
pub use error::ValuationError;
pub use types::{Product, StockMovement, ValuationMethod, ValuationResult};
