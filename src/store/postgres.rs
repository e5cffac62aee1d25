//! PostgreSQL Ledger Store
//!
//! Writes are serialized per client with `SELECT ... FOR UPDATE` inside a
//! transaction; reads of a statement run in one `REPEATABLE READ` snapshot.

use axum::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::{ClientAccount, NewTransaction, Operation, TransactionRecord};

use super::{LedgerStore, StoreError};

type TransactionRow = (i64, String, String, DateTime<Utc>);

/// Ledger store backed by the `clients` and `transactions` tables
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    /// Create a new PgLedgerStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn select_client<'e, E>(executor: E, client_id: i32) -> Result<ClientAccount, StoreError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let row: Option<(i64, i64)> =
            sqlx::query_as("SELECT account_limit, balance FROM clients WHERE id = $1")
                .bind(client_id)
                .fetch_optional(executor)
                .await?;

        let (limit, balance) = row.ok_or(StoreError::ClientNotFound(client_id))?;
        Ok(ClientAccount::new(client_id, limit, balance))
    }

    async fn select_recent<'e, E>(
        executor: E,
        client_id: i32,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, StoreError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT amount, operation, description, created_at
            FROM transactions
            WHERE client_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(client_id)
        .bind(limit)
        .fetch_all(executor)
        .await?;

        rows.into_iter().map(into_record).collect()
    }

    /// Lock the client row for the rest of `tx`
    async fn lock_client(
        tx: &mut Transaction<'_, Postgres>,
        client_id: i32,
    ) -> Result<Option<ClientAccount>, StoreError> {
        let row: Option<(i64, i64)> = sqlx::query_as(
            "SELECT account_limit, balance FROM clients WHERE id = $1 FOR UPDATE",
        )
        .bind(client_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(|(limit, balance)| ClientAccount::new(client_id, limit, balance)))
    }
}

fn into_record(
    (amount, operation, description, created_at): TransactionRow,
) -> Result<TransactionRecord, StoreError> {
    let operation: Operation = operation
        .parse()
        .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))?;

    Ok(TransactionRecord {
        amount,
        operation,
        description,
        created_at,
    })
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn get_client(&self, client_id: i32) -> Result<ClientAccount, StoreError> {
        Self::select_client(&self.pool, client_id).await
    }

    async fn list_recent_transactions(
        &self,
        client_id: i32,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        Self::select_recent(&self.pool, client_id, limit).await
    }

    async fn apply_transaction(
        &self,
        client_id: i32,
        transaction: &NewTransaction,
    ) -> Result<ClientAccount, StoreError> {
        let mut tx = self.pool.begin().await?;

        let client = match Self::lock_client(&mut tx, client_id).await? {
            Some(client) => client,
            None => {
                tx.rollback().await?;
                return Err(StoreError::ClientNotFound(client_id));
            }
        };

        let new_balance = match client.apply(transaction) {
            Ok(balance) => balance,
            Err(e) => {
                tx.rollback().await?;
                return Err(e.into());
            }
        };

        sqlx::query(
            r#"
            INSERT INTO transactions (client_id, amount, operation, description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(client_id)
        .bind(transaction.amount.value())
        .bind(transaction.operation.as_code())
        .bind(transaction.description.as_str())
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE clients SET balance = $2 WHERE id = $1")
            .bind(client_id)
            .bind(new_balance)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            client_id,
            operation = %transaction.operation,
            amount = transaction.amount.value(),
            balance = new_balance,
            "Transaction committed"
        );

        Ok(client.with_balance(new_balance))
    }

    async fn fetch_statement(
        &self,
        client_id: i32,
        limit: i64,
    ) -> Result<(ClientAccount, Vec<TransactionRecord>), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let client = Self::select_client(&mut *tx, client_id).await?;
        let transactions = Self::select_recent(&mut *tx, client_id, limit).await?;

        tx.commit().await?;

        Ok((client, transactions))
    }
}
