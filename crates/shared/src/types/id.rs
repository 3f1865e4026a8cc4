//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `SaleId` where an
//! `AccountId` is expected. IDs are UUID v7, so they sort by creation time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(
    AccountId,
    "Unique identifier for a chart of accounts entry."
);
typed_id!(JournalEntryId, "Unique identifier for a journal entry.");
typed_id!(JournalLineId, "Unique identifier for a journal line.");
typed_id!(CashBankId, "Unique identifier for a cash/bank subsidiary ledger.");
typed_id!(
    CashTransactionId,
    "Unique identifier for a cash/bank subsidiary transaction."
);
typed_id!(ProductId, "Unique identifier for a product.");
typed_id!(SaleId, "Unique identifier for a sale.");
typed_id!(PurchaseId, "Unique identifier for a purchase.");
typed_id!(PaymentId, "Unique identifier for a payment.");
typed_id!(SnapshotId, "Unique identifier for a reconciliation snapshot.");
typed_id!(
    ReconciliationId,
    "Unique identifier for a bank reconciliation."
);
typed_id!(
    DiscrepancyId,
    "Unique identifier for a detected balance discrepancy."
);
typed_id!(AuditEntryId, "Unique identifier for an audit trail entry.");
