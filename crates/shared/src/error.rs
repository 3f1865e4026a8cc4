//! Application-wide error taxonomy.
//!
//! Module-specific errors (ledger, snapshot, reconcile, valuation) convert
//! into these variants at the store boundary so callers can separate bad
//! input from lifecycle conflicts and from system unavailability.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input: unbalanced entry, bad line, missing required notes.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not allowed in the current lifecycle state
    /// (double-lock, double-approve, reversing a non-posted entry).
    #[error("State conflict: {0}")]
    StateConflict(String),

    /// A payment exceeds the outstanding amount of its document.
    #[error("Insufficient balance: requested {requested}, outstanding {outstanding}")]
    InsufficientBalance {
        /// The amount the caller tried to apply.
        requested: Decimal,
        /// The outstanding amount available.
        outstanding: Decimal,
    },

    /// Aggregates fail to reconcile beyond the configured tolerance.
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Storage or infrastructure failure, distinct from bad input.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::StateConflict(_) => 409,
            Self::InsufficientBalance { .. } => 422,
            Self::Integrity(_) | Self::Storage(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::StateConflict(_) => "STATE_CONFLICT",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::Integrity(_) => "INTEGRITY_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true if the failure is a system problem rather than bad input.
    #[must_use]
    pub const fn is_system_failure(&self) -> bool {
        matches!(self, Self::Integrity(_) | Self::Storage(_))
    }
}
