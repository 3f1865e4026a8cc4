//! Valuation errors.

use thiserror::Error;

use kasira_shared::error::AppError;
use kasira_shared::types::{ProductId, SaleId};

/// Errors produced by valuation and COGS estimation.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// Product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Sale does not exist.
    #[error("sale {0} not found")]
    SaleNotFound(SaleId),

    /// A required cost account is missing from the chart.
    #[error("account with code {0} not found in the chart of accounts")]
    MissingAccount(String),
}

impl From<ValuationError> for AppError {
    fn from(err: ValuationError) -> Self {
        match err {
            ValuationError::ProductNotFound(_) | ValuationError::SaleNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            ValuationError::MissingAccount(_) => AppError::Integrity(err.to_string()),
        }
    }
}
