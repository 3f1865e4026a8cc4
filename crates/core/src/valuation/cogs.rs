//! Cost-of-goods-sold estimation and backfill entry construction.
//!
//! Recognized sales must carry a cost entry (debit COGS, credit
//! inventory) alongside their revenue entry. The backfill finds sales
//! missing one, estimates the cost from the product cost basis, and
//! builds the missing entry. Entries it creates are tagged in their
//! notes so a rerun skips them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::ValuationMethod;
use crate::documents::Sale;
use crate::ledger::types::{Account, CreateEntryInput, JournalLineInput, SourceType};
use kasira_shared::types::{ProductId, SaleId, UserId};

/// Marker written into the notes of generated cost entries.
pub const COGS_NOTES_TAG: &str = "COGS";

/// An estimated cost for one sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CogsEstimate {
    /// The sale estimated.
    pub sale_id: SaleId,
    /// Invoice number, for reporting.
    pub invoice_number: String,
    /// Estimated total cost.
    pub amount: Decimal,
    /// The sale's invoiced total.
    pub sale_total: Decimal,
    /// The costing method used.
    pub method: ValuationMethod,
}

impl CogsEstimate {
    /// Estimated cost as a percentage of the sale total.
    #[must_use]
    pub fn cost_percentage(&self) -> Decimal {
        if self.sale_total == Decimal::ZERO {
            Decimal::ZERO
        } else {
            self.amount / self.sale_total * Decimal::from(100)
        }
    }
}

/// Outcome of a backfill run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CogsBackfillResult {
    /// Sales examined.
    pub examined: usize,
    /// Entries that would be (dry run) or were (live) created.
    pub estimates: Vec<CogsEstimate>,
    /// Sales skipped because a cost entry already exists.
    pub skipped_existing: usize,
    /// Sales skipped because the estimated cost was zero.
    pub skipped_zero_cost: usize,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl CogsBackfillResult {
    /// Total estimated cost across all estimates.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.estimates.iter().map(|e| e.amount).sum()
    }
}

/// Builds COGS estimates and their journal entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct CogsService;

impl CogsService {
    /// Creates a new service instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Estimates the cost of a sale from its items.
    ///
    /// `unit_cost` resolves each product's cost basis under the chosen
    /// method; items whose product has no cost basis contribute zero.
    #[must_use]
    pub fn estimate_for_sale<F>(
        &self,
        sale: &Sale,
        method: ValuationMethod,
        mut unit_cost: F,
    ) -> CogsEstimate
    where
        F: FnMut(ProductId) -> Decimal,
    {
        let amount = sale
            .items
            .iter()
            .map(|item| Decimal::from(item.quantity) * unit_cost(item.product_id))
            .sum();
        CogsEstimate {
            sale_id: sale.id,
            invoice_number: sale.invoice_number.clone(),
            amount,
            sale_total: sale.total,
            method,
        }
    }

    /// Builds the journal entry for an estimate: debit the COGS account,
    /// credit the inventory account.
    #[must_use]
    pub fn build_cogs_entry(
        &self,
        sale: &Sale,
        estimate: &CogsEstimate,
        cogs_account: &Account,
        inventory_account: &Account,
        actor: UserId,
    ) -> CreateEntryInput {
        CreateEntryInput {
            source_type: SourceType::Sale,
            source_id: Some(sale.id.into_inner()),
            entry_date: sale.date,
            description: format!("Cost of goods sold for {}", sale.invoice_number),
            notes: Some(COGS_NOTES_TAG.to_string()),
            lines: vec![
                JournalLineInput::debit(cogs_account.id, estimate.amount),
                JournalLineInput::credit(inventory_account.id, estimate.amount),
            ],
            created_by: actor,
        }
    }

    /// Returns true if `entry_notes` marks an existing cost entry.
    #[must_use]
    pub fn is_cogs_entry(&self, entry_notes: Option<&str>) -> bool {
        entry_notes == Some(COGS_NOTES_TAG)
    }
}
