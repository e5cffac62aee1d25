//! Common test utilities

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tokio::sync::OnceCell;

const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

static SCHEMA_APPLIED: OnceCell<()> = OnceCell::const_new();

/// Setup test database - apply the schema once, then reset the given clients.
///
/// Tests in one binary run concurrently against the same database, so each
/// test owns a distinct range of client ids and only resets those rows.
/// Returns `None` when `DATABASE_URL` is not set.
pub async fn setup_test_db(clients: &[(i32, i64)]) -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    SCHEMA_APPLIED
        .get_or_init(|| async {
            pool.execute(SCHEMA).await.expect("Failed to apply schema");
        })
        .await;

    let mut tx = pool.begin().await.expect("Failed to begin transaction");

    for (id, limit) in clients {
        sqlx::query("DELETE FROM transactions WHERE client_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .expect("Failed to clean up transactions");

        sqlx::query(
            r#"
            INSERT INTO clients (id, account_limit, balance) VALUES ($1, $2, 0)
            ON CONFLICT (id) DO UPDATE SET account_limit = EXCLUDED.account_limit, balance = 0
            "#,
        )
        .bind(id)
        .bind(limit)
        .execute(&mut *tx)
        .await
        .expect("Failed to seed client");
    }

    tx.commit().await.expect("Failed to commit transaction");

    Some(pool)
}

/// Make every balance change of `client_id` fail inside the database.
///
/// A `BEFORE UPDATE` trigger raises once the balance would change, so a write
/// fails after its transaction row was inserted. Reseeding the client to the
/// same balance still succeeds.
#[allow(dead_code)]
pub async fn reject_balance_updates(pool: &PgPool, client_id: i32) {
    let ddl = format!(
        r#"
        CREATE OR REPLACE FUNCTION reject_balance_update_{id}() RETURNS trigger AS $$
        BEGIN
            RAISE EXCEPTION 'balance update rejected for client %', NEW.id;
        END;
        $$ LANGUAGE plpgsql;

        DROP TRIGGER IF EXISTS reject_balance_update_{id} ON clients;

        CREATE TRIGGER reject_balance_update_{id}
            BEFORE UPDATE ON clients
            FOR EACH ROW
            WHEN (NEW.id = {id} AND NEW.balance IS DISTINCT FROM OLD.balance)
            EXECUTE FUNCTION reject_balance_update_{id}();
        "#,
        id = client_id
    );

    pool.execute(ddl.as_str())
        .await
        .expect("Failed to install trigger");
}
