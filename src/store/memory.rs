//! In-memory Ledger Store
//!
//! Keeps each client behind its own async mutex, which plays the role of the
//! row lock: writers to one client queue on that mutex while other clients
//! stay available. Used by the test suites.

use std::collections::HashMap;
use std::sync::Arc;

use axum::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{ClientAccount, NewTransaction, TransactionRecord};

use super::{LedgerStore, StoreError};

#[derive(Debug)]
struct ClientLedger {
    account: ClientAccount,
    /// Oldest first
    transactions: Vec<TransactionRecord>,
}

/// Ledger store holding all state in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerStore {
    clients: Arc<RwLock<HashMap<i32, Arc<Mutex<ClientLedger>>>>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-provisioned with the five default clients of the reference seed
    pub async fn seeded() -> Self {
        let store = Self::new();
        for (id, limit) in [(1, 100_000), (2, 80_000), (3, 1_000_000), (4, 10_000_000), (5, 500_000)] {
            store.provision(ClientAccount::new(id, limit, 0)).await;
        }
        store
    }

    /// Add or replace a client
    pub async fn provision(&self, account: ClientAccount) {
        self.clients
            .write()
            .await
            .insert(account.id, Arc::new(Mutex::new(ClientLedger::new(account))));
    }

    async fn ledger(&self, client_id: i32) -> Result<Arc<Mutex<ClientLedger>>, StoreError> {
        self.clients
            .read()
            .await
            .get(&client_id)
            .cloned()
            .ok_or(StoreError::ClientNotFound(client_id))
    }
}

impl ClientLedger {
    fn new(account: ClientAccount) -> Self {
        Self {
            account,
            transactions: Vec::new(),
        }
    }

    fn recent(&self, limit: i64) -> Vec<TransactionRecord> {
        let limit = usize::try_from(limit).unwrap_or(0);
        self.transactions.iter().rev().take(limit).cloned().collect()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn get_client(&self, client_id: i32) -> Result<ClientAccount, StoreError> {
        let ledger = self.ledger(client_id).await?;
        let account = ledger.lock().await.account;
        Ok(account)
    }

    async fn list_recent_transactions(
        &self,
        client_id: i32,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let ledger = self.ledger(client_id).await?;
        let recent = ledger.lock().await.recent(limit);
        Ok(recent)
    }

    async fn apply_transaction(
        &self,
        client_id: i32,
        transaction: &NewTransaction,
    ) -> Result<ClientAccount, StoreError> {
        let ledger = self.ledger(client_id).await?;
        let mut ledger = ledger.lock().await;

        let new_balance = ledger.account.apply(transaction)?;

        ledger.transactions.push(TransactionRecord {
            amount: transaction.amount.value(),
            operation: transaction.operation,
            description: transaction.description.as_str().to_string(),
            created_at: Utc::now(),
        });
        ledger.account.balance = new_balance;

        Ok(ledger.account)
    }

    async fn fetch_statement(
        &self,
        client_id: i32,
        limit: i64,
    ) -> Result<(ClientAccount, Vec<TransactionRecord>), StoreError> {
        let ledger = self.ledger(client_id).await?;
        let ledger = ledger.lock().await;
        Ok((ledger.account, ledger.recent(limit)))
    }
}
