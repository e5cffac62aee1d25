//! Transaction Handler
//!
//! Write path: validates a debit/credit and applies it through the store's
//! atomic, row-locked update.

use crate::error::AppError;
use crate::store::{SharedStore, StoreError};

use super::{TransactionCommand, TransactionResult};

/// Handler for debit/credit requests
pub struct TransactionHandler {
    store: SharedStore,
}

impl TransactionHandler {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Execute the transaction command
    ///
    /// Input is validated before the store is touched; existence and the
    /// overdraft floor are checked by the store under the client lock.
    pub async fn execute(
        &self,
        client_id: i32,
        command: TransactionCommand,
    ) -> Result<TransactionResult, AppError> {
        let transaction = command.validate().map_err(|e| {
            tracing::debug!(client_id, error = %e, "Rejected malformed transaction");
            AppError::from(e)
        })?;

        match self.store.apply_transaction(client_id, &transaction).await {
            Ok(client) => {
                tracing::info!(
                    client_id,
                    operation = %transaction.operation,
                    amount = transaction.amount.value(),
                    balance = client.balance,
                    "Transaction accepted"
                );
                Ok(TransactionResult {
                    limit: client.limit,
                    balance: client.balance,
                })
            }
            Err(e @ StoreError::Domain(_)) => {
                tracing::warn!(client_id, error = %e, "Transaction refused");
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
