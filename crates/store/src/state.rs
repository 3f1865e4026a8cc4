//! The store's shared state and construction.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use kasira_core::documents::{Payment, Purchase, Sale};
use kasira_core::ledger::recognition::{DocumentStatus, RecognitionPolicy};
use kasira_core::ledger::types::{Account, JournalEntry, SourceType};
use kasira_core::reconcile::types::{CashRegister, CashRegisterTransaction};
use kasira_core::snapshot::audit::AuditTrailEntry;
use kasira_core::snapshot::types::{Reconciliation, Snapshot};
use kasira_core::valuation::types::{Product, StockMovement};
use kasira_shared::config::CoreConfig;
use kasira_shared::types::{
    AccountId, CashBankId, CashTransactionId, JournalEntryId, PaymentId, ProductId,
    ReconciliationId, SaleId, SnapshotId,
};

/// Every record the store holds, guarded as one unit.
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    pub(crate) accounts: BTreeMap<AccountId, Account>,
    pub(crate) entries: BTreeMap<JournalEntryId, JournalEntry>,
    pub(crate) sales: BTreeMap<SaleId, Sale>,
    pub(crate) purchases: BTreeMap<kasira_shared::types::PurchaseId, Purchase>,
    pub(crate) payments: BTreeMap<PaymentId, Payment>,
    pub(crate) products: BTreeMap<ProductId, Product>,
    pub(crate) movements: Vec<StockMovement>,
    pub(crate) registers: BTreeMap<CashBankId, CashRegister>,
    pub(crate) register_txns: BTreeMap<CashTransactionId, CashRegisterTransaction>,
    pub(crate) snapshots: BTreeMap<SnapshotId, Snapshot>,
    pub(crate) reconciliations: BTreeMap<ReconciliationId, Reconciliation>,
    pub(crate) audit: Vec<AuditTrailEntry>,
}

impl LedgerState {
    /// Resolves the status of the document backing a journal entry.
    ///
    /// Returns `None` for document-backed entries whose document cannot
    /// be found; the recognition policy treats those as unrecognized.
    pub(crate) fn document_status(&self, entry: &JournalEntry) -> Option<DocumentStatus> {
        let source_id = entry.source_id?;
        match entry.source_type {
            SourceType::Sale => self
                .sales
                .get(&SaleId::from_uuid(source_id))
                .map(|s| s.status),
            SourceType::Purchase => self
                .purchases
                .get(&kasira_shared::types::PurchaseId::from_uuid(source_id))
                .map(|p| p.status),
            SourceType::Payment => self
                .payments
                .get(&PaymentId::from_uuid(source_id))
                .map(|p| p.status),
            SourceType::Manual | SourceType::Adjustment => None,
        }
    }

    /// Whether a journal entry counts toward balances under `policy`.
    pub(crate) fn is_recognized(&self, entry: &JournalEntry, policy: &RecognitionPolicy) -> bool {
        policy.is_recognized(entry.source_type, self.document_status(entry))
    }
}

/// The transactional store.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
#[derive(Debug)]
pub struct LedgerStore {
    pub(crate) state: RwLock<LedgerState>,
    pub(crate) config: CoreConfig,
    pub(crate) policy: RecognitionPolicy,
}

impl LedgerStore {
    /// Creates an empty store with the given configuration.
    #[must_use]
    pub fn new(config: CoreConfig) -> Self {
        Self::with_policy(config, RecognitionPolicy::default())
    }

    /// Creates an empty store with a custom recognition policy.
    #[must_use]
    pub fn with_policy(config: CoreConfig, policy: RecognitionPolicy) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            config,
            policy,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// The active recognition policy.
    #[must_use]
    pub fn policy(&self) -> &RecognitionPolicy {
        &self.policy
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}
