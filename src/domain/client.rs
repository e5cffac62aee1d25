//! Client account
//!
//! A client holds a balance and an immutable overdraft limit. The balance may
//! go negative, but never below `-limit`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DomainError, NewTransaction, Operation, TransactionRecord};

/// Number of transactions included in a statement
pub const STATEMENT_SIZE: i64 = 10;

/// Snapshot of a client row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAccount {
    pub id: i32,
    pub limit: i64,
    pub balance: i64,
}

impl ClientAccount {
    pub fn new(id: i32, limit: i64, balance: i64) -> Self {
        Self { id, limit, balance }
    }

    /// Lowest balance this client may reach
    pub fn floor(&self) -> i64 {
        -self.limit
    }

    /// Compute the balance after `transaction` without mutating anything.
    ///
    /// Must be called while the client row is locked; the result is only
    /// meaningful against the balance observed under that lock.
    pub fn apply(&self, transaction: &NewTransaction) -> Result<i64, DomainError> {
        let amount = transaction.amount.value();
        let new_balance = match transaction.operation {
            Operation::Debit => self.balance.checked_sub(amount),
            Operation::Credit => self.balance.checked_add(amount),
        }
        .ok_or(DomainError::BalanceOverflow)?;

        if new_balance < self.floor() {
            return Err(DomainError::insufficient_funds(self.balance, self.limit, amount));
        }

        Ok(new_balance)
    }

    /// Return a copy carrying `balance`
    pub fn with_balance(self, balance: i64) -> Self {
        Self { balance, ..self }
    }
}

/// Result of the read path: the client plus its most recent transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub client: ClientAccount,
    pub served_at: DateTime<Utc>,
    /// Newest first, at most `STATEMENT_SIZE` entries
    pub recent_transactions: Vec<TransactionRecord>,
}
