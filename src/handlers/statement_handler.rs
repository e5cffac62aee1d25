//! Statement Handler
//!
//! Read path: balance, limit and the most recent transactions of a client.

use chrono::Utc;

use crate::domain::{Statement, STATEMENT_SIZE};
use crate::error::AppError;
use crate::store::SharedStore;

/// Handler for statement queries
pub struct StatementHandler {
    store: SharedStore,
}

impl StatementHandler {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn execute(&self, client_id: i32) -> Result<Statement, AppError> {
        let (client, recent_transactions) =
            self.store.fetch_statement(client_id, STATEMENT_SIZE).await?;

        Ok(Statement {
            client,
            served_at: Utc::now(),
            recent_transactions,
        })
    }
}
