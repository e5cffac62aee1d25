//! Ledger Store module
//!
//! Storage capability injected into request handlers. All coordination between
//! concurrent writers is delegated to the store: writes to the same client are
//! serialized by an exclusive per-client lock, writes to different clients are
//! independent.

mod error;
mod memory;
mod postgres;

use std::sync::Arc;

use axum::async_trait;

use crate::domain::{ClientAccount, NewTransaction, TransactionRecord};

pub use error::StoreError;
pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// Shared handle passed to the router as state
pub type SharedStore = Arc<dyn LedgerStore>;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Load a client row.
    async fn get_client(&self, client_id: i32) -> Result<ClientAccount, StoreError>;

    /// Up to `limit` most recent transactions of a client, newest first.
    async fn list_recent_transactions(
        &self,
        client_id: i32,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Apply `transaction` in one atomic unit of work.
    ///
    /// Locks the client exclusively, checks existence and the overdraft floor,
    /// then records the transaction and updates the balance. On any error
    /// nothing is persisted. Returns the client with its committed balance.
    async fn apply_transaction(
        &self,
        client_id: i32,
        transaction: &NewTransaction,
    ) -> Result<ClientAccount, StoreError>;

    /// Client row plus recent transactions.
    ///
    /// The default reads them separately; stores that can should override it
    /// to read both from one consistent snapshot.
    async fn fetch_statement(
        &self,
        client_id: i32,
        limit: i64,
    ) -> Result<(ClientAccount, Vec<TransactionRecord>), StoreError> {
        let client = self.get_client(client_id).await?;
        let transactions = self.list_recent_transactions(client_id, limit).await?;
        Ok((client, transactions))
    }
}
