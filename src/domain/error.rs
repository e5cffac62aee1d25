//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::AmountError;

/// Domain-specific errors
///
/// These errors represent input rule violations and ledger invariant failures.
/// They are independent of the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Amount is zero or negative
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Operation code is not one of the recognized kinds
    #[error("Invalid operation: {0:?} (expected \"d\" or \"c\")")]
    InvalidOperation(String),

    /// Description length outside the accepted range
    #[error("Invalid description: length {length} outside 1..=10")]
    InvalidDescription { length: usize },

    /// Applying the operation would take the balance below the overdraft floor
    #[error("Insufficient funds: balance {balance}, limit {limit}, debit {amount}")]
    InsufficientFunds { balance: i64, limit: i64, amount: i64 },

    /// Balance arithmetic left the representable range
    #[error("Balance overflow")]
    BalanceOverflow,
}

impl DomainError {
    /// Create an insufficient funds error
    pub fn insufficient_funds(balance: i64, limit: i64, amount: i64) -> Self {
        Self::InsufficientFunds {
            balance,
            limit,
            amount,
        }
    }
}
