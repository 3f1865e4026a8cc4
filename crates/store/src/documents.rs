//! Source document operations: products, sales, purchases, payments.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use kasira_core::documents::{DocumentItem, Payment, PaymentTarget, Purchase, Sale};
use kasira_core::ledger::recognition::DocumentStatus;
use kasira_core::valuation::error::ValuationError;
use kasira_core::valuation::types::{Product, StockMovement};
use kasira_shared::error::{AppError, AppResult};
use kasira_shared::types::{PaymentId, ProductId, PurchaseId, SaleId, UserId};

use crate::state::LedgerStore;

/// Input for creating a sale.
#[derive(Debug, Clone)]
pub struct NewSale {
    /// Invoice number.
    pub invoice_number: String,
    /// Invoice date.
    pub date: NaiveDate,
    /// Customer name.
    pub customer: String,
    /// Line items.
    pub items: Vec<DocumentItem>,
    /// Initial status.
    pub status: DocumentStatus,
    /// Creating user.
    pub created_by: UserId,
}

/// Input for creating a purchase.
#[derive(Debug, Clone)]
pub struct NewPurchase {
    /// Vendor reference.
    pub reference: String,
    /// Purchase date.
    pub date: NaiveDate,
    /// Vendor name.
    pub vendor: String,
    /// Line items.
    pub items: Vec<DocumentItem>,
    /// Initial status.
    pub status: DocumentStatus,
    /// Creating user.
    pub created_by: UserId,
}

impl LedgerStore {
    /// Registers a product with zero stock.
    ///
    /// `cost_price` is the default unit cost; stock receipts refine it
    /// with movement-derived costs.
    pub fn create_product(
        &self,
        sku: &str,
        name: &str,
        cost_price: Decimal,
    ) -> AppResult<Product> {
        let mut state = self.state.write();
        if cost_price < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "cost price {cost_price} must not be negative"
            )));
        }
        if state.products.values().any(|p| p.sku == sku) {
            return Err(AppError::StateConflict(format!(
                "product sku {sku} already exists"
            )));
        }
        let product = Product {
            id: ProductId::new(),
            sku: sku.to_string(),
            name: name.to_string(),
            cost_price,
            stock: 0,
            is_active: true,
        };
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    /// Fetches a product by id.
    pub fn get_product(&self, id: ProductId) -> AppResult<Product> {
        let state = self.state.read();
        state
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| ValuationError::ProductNotFound(id).into())
    }

    /// Records an incoming stock lot and bumps the product's stock.
    pub fn receive_stock(
        &self,
        product_id: ProductId,
        date: NaiveDate,
        quantity: i64,
        unit_cost: Decimal,
    ) -> AppResult<()> {
        if quantity <= 0 {
            return Err(AppError::Validation(
                "received quantity must be positive".to_string(),
            ));
        }
        if unit_cost < Decimal::ZERO {
            return Err(AppError::Validation(
                "unit cost cannot be negative".to_string(),
            ));
        }

        let mut state = self.state.write();
        let product = state
            .products
            .get_mut(&product_id)
            .ok_or(ValuationError::ProductNotFound(product_id))?;
        product.stock += quantity;
        state.movements.push(StockMovement {
            product_id,
            date,
            quantity,
            unit_cost,
        });
        Ok(())
    }

    /// Creates a sale, computing its total from the items and reducing
    /// product stock.
    pub fn create_sale(&self, input: NewSale) -> AppResult<Sale> {
        let mut state = self.state.write();

        for item in &input.items {
            if !state.products.contains_key(&item.product_id) {
                return Err(ValuationError::ProductNotFound(item.product_id).into());
            }
            if item.quantity <= 0 {
                return Err(AppError::Validation(
                    "sale item quantity must be positive".to_string(),
                ));
            }
        }

        let total: Decimal = input.items.iter().map(DocumentItem::subtotal).sum();
        for item in &input.items {
            if let Some(product) = state.products.get_mut(&item.product_id) {
                product.stock -= item.quantity;
                if product.stock < 0 {
                    warn!(product_id = %item.product_id, stock = product.stock, "stock went negative");
                }
            }
        }

        let sale = Sale {
            id: SaleId::new(),
            invoice_number: input.invoice_number,
            date: input.date,
            customer: input.customer,
            items: input.items,
            total,
            paid: Decimal::ZERO,
            status: input.status,
            created_by: input.created_by,
            created_at: Utc::now(),
        };
        info!(sale_id = %sale.id, invoice = %sale.invoice_number, total = %sale.total, "sale created");
        state.sales.insert(sale.id, sale.clone());
        Ok(sale)
    }

    /// Fetches a sale by id.
    pub fn get_sale(&self, id: SaleId) -> AppResult<Sale> {
        let state = self.state.read();
        state
            .sales
            .get(&id)
            .cloned()
            .ok_or_else(|| ValuationError::SaleNotFound(id).into())
    }

    /// Lists all sales.
    #[must_use]
    pub fn list_sales(&self) -> Vec<Sale> {
        self.state.read().sales.values().cloned().collect()
    }

    /// Moves a sale to a new status.
    pub fn set_sale_status(&self, id: SaleId, status: DocumentStatus) -> AppResult<()> {
        let mut state = self.state.write();
        let sale = state
            .sales
            .get_mut(&id)
            .ok_or(ValuationError::SaleNotFound(id))?;
        sale.status = status;
        Ok(())
    }

    /// Creates a purchase, computing its total from the items.
    pub fn create_purchase(&self, input: NewPurchase) -> AppResult<Purchase> {
        let mut state = self.state.write();
        let total: Decimal = input.items.iter().map(DocumentItem::subtotal).sum();
        let purchase = Purchase {
            id: PurchaseId::new(),
            reference: input.reference,
            date: input.date,
            vendor: input.vendor,
            items: input.items,
            total,
            paid: Decimal::ZERO,
            status: input.status,
            created_by: input.created_by,
            created_at: Utc::now(),
        };
        state.purchases.insert(purchase.id, purchase.clone());
        Ok(purchase)
    }

    /// Records a payment against a sale or purchase.
    ///
    /// Payments larger than the outstanding amount are rejected and
    /// leave the document untouched.
    pub fn record_payment(
        &self,
        target: PaymentTarget,
        date: NaiveDate,
        amount: Decimal,
        created_by: UserId,
    ) -> AppResult<Payment> {
        let mut state = self.state.write();

        match target {
            PaymentTarget::Sale(sale_id) => {
                let sale = state
                    .sales
                    .get_mut(&sale_id)
                    .ok_or(ValuationError::SaleNotFound(sale_id))?;
                sale.apply_payment(amount)?;
            }
            PaymentTarget::Purchase(purchase_id) => {
                let purchase = state.purchases.get_mut(&purchase_id).ok_or_else(|| {
                    AppError::NotFound(format!("purchase {purchase_id} not found"))
                })?;
                if amount <= Decimal::ZERO {
                    return Err(AppError::Validation(
                        "payment amount must be positive".to_string(),
                    ));
                }
                let outstanding = purchase.outstanding();
                if amount > outstanding {
                    return Err(AppError::InsufficientBalance {
                        requested: amount,
                        outstanding,
                    });
                }
                purchase.paid += amount;
                if purchase.outstanding() == Decimal::ZERO {
                    purchase.status = DocumentStatus::Paid;
                }
            }
        }

        let payment = Payment {
            id: PaymentId::new(),
            target,
            date,
            amount,
            status: DocumentStatus::Completed,
            created_by,
            created_at: Utc::now(),
        };
        info!(payment_id = %payment.id, amount = %amount, "payment recorded");
        state.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }
}
