//! Store Errors
//!
//! Error types for ledger storage operations.

use crate::domain::DomainError;

/// Errors that can occur while reading or writing the ledger
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No client row with this id
    #[error("Client not found: {0}")]
    ClientNotFound(i32),

    /// Ledger rule rejected the operation under lock (insufficient funds, overflow)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Check if this error is an overdraft rejection
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, StoreError::Domain(DomainError::InsufficientFunds { .. }))
    }
}
