//! Transaction types
//!
//! `NewTransaction` is a validated write request; `TransactionRecord` is a
//! committed row as returned by the read path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Amount, DomainError, Operation};

/// Shortest accepted description, in characters
pub const DESCRIPTION_MIN_LEN: usize = 1;

/// Longest accepted description, in characters
pub const DESCRIPTION_MAX_LEN: usize = 10;

/// Free-text label attached to a transaction.
///
/// Length is counted in Unicode scalar values and stored as given: no trimming
/// and no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let length = value.chars().count();
        if !(DESCRIPTION_MIN_LEN..=DESCRIPTION_MAX_LEN).contains(&length) {
            return Err(DomainError::InvalidDescription { length });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Description {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Description::new(value)
    }
}

impl From<Description> for String {
    fn from(description: Description) -> Self {
        description.0
    }
}

/// A fully validated debit or credit, ready to be applied under lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: Amount,
    pub operation: Operation,
    pub description: Description,
}

impl NewTransaction {
    pub fn new(amount: Amount, operation: Operation, description: Description) -> Self {
        Self {
            amount,
            operation,
            description,
        }
    }

    /// Signed change this transaction makes to a balance
    pub fn signed_amount(&self) -> i64 {
        self.operation.signed(self.amount.value())
    }
}

/// A committed transaction row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub amount: i64,
    pub operation: Operation,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
