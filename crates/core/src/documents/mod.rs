//! Source documents backing journal entries.
//!
//! Sales, purchases, and payments are the business documents that
//! journal entries reference through `source_id`. Their status feeds the
//! recognition policy; their amounts feed payment application and COGS
//! estimation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::recognition::DocumentStatus;
use kasira_shared::error::AppError;
use kasira_shared::types::{PaymentId, ProductId, PurchaseId, SaleId, UserId};

/// A line item on a sale or purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentItem {
    /// The product sold or purchased.
    pub product_id: ProductId,
    /// Quantity in units.
    pub quantity: i64,
    /// Price per unit.
    pub unit_price: Decimal,
}

impl DocumentItem {
    /// Line subtotal (quantity times unit price).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// A sales invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier.
    pub id: SaleId,
    /// Invoice number.
    pub invoice_number: String,
    /// Invoice date.
    pub date: NaiveDate,
    /// Customer name.
    pub customer: String,
    /// Line items.
    pub items: Vec<DocumentItem>,
    /// Invoice total.
    pub total: Decimal,
    /// Amount paid so far.
    pub paid: Decimal,
    /// Document status.
    pub status: DocumentStatus,
    /// User who created the document.
    pub created_by: UserId,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Amount still owed on the invoice.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        self.total - self.paid
    }

    /// Applies a payment, rejecting overpayment.
    ///
    /// When the payment settles the invoice exactly, the status advances
    /// to Paid.
    pub fn apply_payment(&mut self, amount: Decimal) -> Result<(), AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "payment amount must be positive".to_string(),
            ));
        }
        let outstanding = self.outstanding();
        if amount > outstanding {
            return Err(AppError::InsufficientBalance {
                requested: amount,
                outstanding,
            });
        }
        self.paid += amount;
        if self.outstanding() == Decimal::ZERO {
            self.status = DocumentStatus::Paid;
        }
        Ok(())
    }
}

/// A vendor purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    /// Unique identifier.
    pub id: PurchaseId,
    /// Vendor reference number.
    pub reference: String,
    /// Purchase date.
    pub date: NaiveDate,
    /// Vendor name.
    pub vendor: String,
    /// Line items.
    pub items: Vec<DocumentItem>,
    /// Purchase total.
    pub total: Decimal,
    /// Amount paid so far.
    pub paid: Decimal,
    /// Document status.
    pub status: DocumentStatus,
    /// User who created the document.
    pub created_by: UserId,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    /// Amount still owed to the vendor.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        self.total - self.paid
    }
}

/// Which document a payment settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum PaymentTarget {
    /// Payment received against a sale.
    Sale(SaleId),
    /// Payment issued against a purchase.
    Purchase(PurchaseId),
}

/// A payment document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// The document this payment settles.
    pub target: PaymentTarget,
    /// Payment date.
    pub date: NaiveDate,
    /// Payment amount.
    pub amount: Decimal,
    /// Document status.
    pub status: DocumentStatus,
    /// User who recorded the payment.
    pub created_by: UserId,
    /// When the payment was recorded.
    pub created_at: DateTime<Utc>,
}
