//! Command definitions
//!
//! Commands carry raw request input; validation turns them into domain values
//! before any storage access.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Description, DomainError, NewTransaction, Operation};
use crate::error::AppError;

/// Parse a client id path segment: a positive integer
///
/// Positive ids beyond the `i32` key range cannot name a stored client and
/// are reported as not found rather than as malformed.
pub fn parse_client_id(raw: &str) -> Result<i32, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => i32::try_from(id).map_err(|_| AppError::NotFound(id)),
        _ => Err(AppError::InvalidInput(format!("invalid client id: {:?}", raw))),
    }
}

/// Command to record a debit or credit against a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionCommand {
    pub amount: i64,
    /// Wire code, `"d"` or `"c"`
    pub operation: String,
    pub description: String,
}

impl TransactionCommand {
    pub fn new(amount: i64, operation: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            amount,
            operation: operation.into(),
            description: description.into(),
        }
    }

    /// Validate amount, then operation, then description.
    pub fn validate(self) -> Result<NewTransaction, DomainError> {
        let amount = Amount::new(self.amount)?;
        let operation: Operation = self.operation.parse()?;
        let description = Description::new(self.description)?;
        Ok(NewTransaction::new(amount, operation, description))
    }
}

/// Result of a successful transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub limit: i64,
    pub balance: i64,
}
