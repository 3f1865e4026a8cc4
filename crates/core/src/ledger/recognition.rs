//! Source-document recognition policy.
//!
//! Not every journal entry should count toward balances: an entry backed
//! by a cancelled invoice must not move the books. The policy maps each
//! source type to the set of document statuses that qualify.

use serde::{Deserialize, Serialize};

use super::types::SourceType;

/// Lifecycle status of a source document (sale, purchase, payment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Document is being drafted.
    Draft,
    /// Document has been confirmed but not yet invoiced.
    Confirmed,
    /// Document has been invoiced.
    Invoiced,
    /// Document has been fully paid.
    Paid,
    /// Payment has been approved.
    Approved,
    /// Payment has been completed.
    Completed,
    /// Document was cancelled.
    Cancelled,
}

/// Per-source-type recognition rules.
///
/// Manual and adjustment entries are always recognized; document-backed
/// entries are recognized only when their document's status is listed
/// for that source type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionPolicy {
    /// Statuses under which sales move the books.
    pub sale: Vec<DocumentStatus>,
    /// Statuses under which purchases move the books.
    pub purchase: Vec<DocumentStatus>,
    /// Statuses under which payments move the books.
    pub payment: Vec<DocumentStatus>,
}

impl Default for RecognitionPolicy {
    fn default() -> Self {
        Self {
            sale: vec![DocumentStatus::Invoiced, DocumentStatus::Paid],
            purchase: vec![DocumentStatus::Invoiced, DocumentStatus::Paid],
            payment: vec![DocumentStatus::Approved, DocumentStatus::Completed],
        }
    }
}

impl RecognitionPolicy {
    /// Returns true if an entry of `source_type` backed by a document in
    /// `status` should be aggregated.
    ///
    /// `status` is `None` when the source document cannot be found; a
    /// document-backed entry with a missing document is never recognized.
    #[must_use]
    pub fn is_recognized(&self, source_type: SourceType, status: Option<DocumentStatus>) -> bool {
        let allowed = match source_type {
            SourceType::Manual | SourceType::Adjustment => return true,
            SourceType::Sale => &self.sale,
            SourceType::Purchase => &self.purchase,
            SourceType::Payment => &self.payment,
        };
        match status {
            Some(status) => allowed.contains(&status),
            None => false,
        }
    }
}
