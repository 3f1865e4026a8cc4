//! Inventory valuation and COGS backfill operations.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use kasira_core::ledger::types::{Account, EntryStatus, SourceType};
use kasira_core::snapshot::audit::{AuditAction, AuditTrailEntry};
use kasira_core::valuation::cogs::{CogsBackfillResult, CogsService};
use kasira_core::valuation::engine::ValuationEngine;
use kasira_core::valuation::error::ValuationError;
use kasira_core::valuation::types::{ValuationMethod, ValuationResult};
use kasira_shared::error::AppResult;
use kasira_shared::types::{ProductId, SaleId, UserId};

use crate::state::{LedgerState, LedgerStore};

impl LedgerStore {
    /// Values a product's stock on hand under the given method.
    pub fn product_valuation(
        &self,
        product_id: ProductId,
        method: ValuationMethod,
    ) -> AppResult<ValuationResult> {
        let state = self.state.read();
        let product = state
            .products
            .get(&product_id)
            .ok_or(ValuationError::ProductNotFound(product_id))?;
        Ok(ValuationEngine::new().value_stock(
            product_id,
            method,
            product.stock,
            &state.movements,
        ))
    }

    /// Values every product's stock under the given method.
    #[must_use]
    pub fn inventory_valuation(&self, method: ValuationMethod) -> Vec<ValuationResult> {
        let state = self.state.read();
        let engine = ValuationEngine::new();
        state
            .products
            .values()
            .map(|p| engine.value_stock(p.id, method, p.stock, &state.movements))
            .collect()
    }

    /// Backfills missing cost-of-goods-sold entries for recognized
    /// sales.
    ///
    /// A sale needs a cost entry when its status recognizes it and no
    /// posted sale-sourced entry tagged as COGS references it. Dry runs
    /// report what a live run would create without writing anything.
    /// Live runs post the entries, so rerunning finds nothing to do.
    /// `period` restricts the scan to sales dated inside the range.
    pub fn backfill_cogs(
        &self,
        method: ValuationMethod,
        period: Option<(NaiveDate, NaiveDate)>,
        dry_run: bool,
        actor: UserId,
    ) -> AppResult<CogsBackfillResult> {
        let mut state = self.state.write();
        let service = CogsService::new();
        let engine = ValuationEngine::new();

        let candidates: Vec<SaleId> = state
            .sales
            .values()
            .filter(|s| self.policy.is_recognized(SourceType::Sale, Some(s.status)))
            .filter(|s| match period {
                Some((from, to)) => s.date >= from && s.date <= to,
                None => true,
            })
            .map(|s| s.id)
            .collect();

        let mut result = CogsBackfillResult {
            examined: candidates.len(),
            estimates: Vec::new(),
            skipped_existing: 0,
            skipped_zero_cost: 0,
            dry_run,
        };

        let accounts = if dry_run {
            None
        } else {
            Some(self.cost_accounts(&state)?)
        };

        for sale_id in candidates {
            let has_entry = state.entries.values().any(|e| {
                e.status == EntryStatus::Posted
                    && e.source_type == SourceType::Sale
                    && e.source_id == Some(sale_id.into_inner())
                    && service.is_cogs_entry(e.notes.as_deref())
            });
            if has_entry {
                result.skipped_existing += 1;
                continue;
            }

            let sale = state
                .sales
                .get(&sale_id)
                .ok_or(ValuationError::SaleNotFound(sale_id))?
                .clone();
            let estimate = service.estimate_for_sale(&sale, method, |product_id| {
                let movement_cost =
                    engine.consumption_unit_cost(product_id, method, &state.movements);
                if movement_cost > Decimal::ZERO {
                    movement_cost
                } else {
                    // No lots to derive from; fall back to the product's
                    // default cost price.
                    state
                        .products
                        .get(&product_id)
                        .map_or(Decimal::ZERO, |p| p.cost_price)
                }
            });
            if estimate.amount <= Decimal::ZERO {
                result.skipped_zero_cost += 1;
                continue;
            }

            if let Some((cogs_account, inventory_account)) = &accounts {
                let input = service.build_cogs_entry(
                    &sale,
                    &estimate,
                    cogs_account,
                    inventory_account,
                    actor,
                );
                let totals = Self::validate(&state, &input, self.config.tolerance)?;
                let mut entry = Self::build_entry(input, totals);
                entry.status = EntryStatus::Posted;
                entry.posted_at = Some(Utc::now());
                Self::apply_to_cache(&mut state, &entry, false);
                info!(sale_id = %sale_id, amount = %estimate.amount, "cogs entry backfilled");
                state.entries.insert(entry.id, entry);
            }

            result.estimates.push(estimate);
        }

        if !dry_run && !result.estimates.is_empty() {
            state.audit.push(AuditTrailEntry::record(
                AuditAction::CogsBackfilled,
                Some(actor),
                uuid::Uuid::nil(),
                Some(format!(
                    "{} entries totalling {}",
                    result.estimates.len(),
                    result.total_amount()
                )),
            ));
        }
        Ok(result)
    }

    /// Resolves the configured COGS and inventory accounts.
    fn cost_accounts(&self, state: &LedgerState) -> Result<(Account, Account), ValuationError> {
        let find = |code: &str| {
            state
                .accounts
                .values()
                .find(|a| a.is_live() && a.code == code)
                .cloned()
                .ok_or_else(|| ValuationError::MissingAccount(code.to_string()))
        };
        Ok((
            find(&self.config.accounts.cogs_code)?,
            find(&self.config.accounts.inventory_code)?,
        ))
    }
}
