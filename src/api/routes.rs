//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Operation, Statement, TransactionRecord};
use crate::error::{AppError, AppResult};
use crate::handlers::{
    parse_client_id, StatementHandler, TransactionCommand, TransactionHandler,
};
use crate::store::SharedStore;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub amount: i64,
    pub operation: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub limit: i64,
    pub balance: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// When the statement was served
    pub date: String,
    pub limit: i64,
    pub total: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatementEntry {
    pub amount: i64,
    pub operation: Operation,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatementResponse {
    pub balance: BalanceSummary,
    pub last_transactions: Vec<StatementEntry>,
}

/// ISO-8601 UTC timestamp with nanosecond precision
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl From<TransactionRecord> for StatementEntry {
    fn from(record: TransactionRecord) -> Self {
        Self {
            amount: record.amount,
            operation: record.operation,
            description: record.description,
            created_at: format_timestamp(record.created_at),
        }
    }
}

impl From<Statement> for StatementResponse {
    fn from(statement: Statement) -> Self {
        Self {
            balance: BalanceSummary {
                date: format_timestamp(statement.served_at),
                limit: statement.client.limit,
                total: statement.client.balance,
            },
            last_transactions: statement
                .recent_transactions
                .into_iter()
                .map(StatementEntry::from)
                .collect(),
        }
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<SharedStore> {
    Router::new()
        .route("/clients/:id/statement", get(get_statement))
        .route("/clients/:id/transactions", post(create_transaction))
}

// =========================================================================
// GET /clients/:id/statement
// =========================================================================

/// Balance, limit and the ten most recent transactions
async fn get_statement(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<StatementResponse>> {
    let client_id = parse_client_id(&raw_id)?;

    let statement = StatementHandler::new(store).execute(client_id).await?;

    Ok(Json(statement.into()))
}

// =========================================================================
// POST /clients/:id/transactions
// =========================================================================

/// Record a debit or credit
async fn create_transaction(
    State(store): State<SharedStore>,
    Path(raw_id): Path<String>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> AppResult<Json<TransactionResponse>> {
    let client_id = parse_client_id(&raw_id)?;

    let Json(request) =
        payload.map_err(|rejection| AppError::UnprocessableInput(rejection.body_text()))?;

    let command = TransactionCommand::new(request.amount, request.operation, request.description);
    let result = TransactionHandler::new(store).execute(client_id, command).await?;

    Ok(Json(TransactionResponse {
        limit: result.limit,
        balance: result.balance,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use crate::domain::ClientAccount;
    use crate::store::{LedgerStore, MemoryLedgerStore};

    async fn app_with(accounts: &[ClientAccount]) -> (Router, MemoryLedgerStore) {
        let store = MemoryLedgerStore::new();
        for account in accounts {
            store.provision(*account).await;
        }
        let shared: SharedStore = Arc::new(store.clone());
        (create_router().with_state(shared), store)
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_overdraft_scenario() {
        let (app, _) = app_with(&[ClientAccount::new(1, 1000, 0)]).await;

        let body = json!({"amount": 500, "operation": "d", "description": "debit"}).to_string();
        let (status, json) = send(&app, post_json("/clients/1/transactions", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"limit": 1000, "balance": -500}));

        let body = json!({"amount": 600, "operation": "d", "description": "debit"}).to_string();
        let (status, json) = send(&app, post_json("/clients/1/transactions", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error_code"], "insufficient_funds");

        let (status, json) = send(&app, get_req("/clients/1/statement")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["balance"]["total"], -500);
        assert_eq!(json["balance"]["limit"], 1000);
        assert_eq!(json["last_transactions"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_statement_shape() {
        let (app, _) = app_with(&[ClientAccount::new(2, 800, 0)]).await;

        let body = json!({"amount": 10, "operation": "c", "description": "gift"}).to_string();
        send(&app, post_json("/clients/2/transactions", body)).await;

        let (status, json) = send(&app, get_req("/clients/2/statement")).await;
        assert_eq!(status, StatusCode::OK);

        let statement: StatementResponse = serde_json::from_value(json).unwrap();
        assert_eq!(statement.balance.total, 10);
        assert!(DateTime::parse_from_rfc3339(&statement.balance.date).is_ok());
        assert!(statement.balance.date.ends_with('Z'));

        let entry = &statement.last_transactions[0];
        assert_eq!(entry.amount, 10);
        assert_eq!(entry.operation, Operation::Credit);
        assert_eq!(entry.description, "gift");
        assert!(DateTime::parse_from_rfc3339(&entry.created_at).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_client_is_404() {
        let (app, _) = app_with(&[ClientAccount::new(1, 1000, 0)]).await;

        let (status, _) = send(&app, get_req("/clients/99999/statement")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let body = json!({"amount": 1, "operation": "c", "description": "x"}).to_string();
        let (status, _) = send(&app, post_json("/clients/99999/transactions", body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Positive ids past the key range name no client either
        let (status, json) = send(&app, get_req("/clients/3000000000/statement")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error_code"], "client_not_found");

        let body = json!({"amount": 1, "operation": "c", "description": "x"}).to_string();
        let (status, _) = send(&app, post_json("/clients/3000000000/transactions", body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_id_is_400() {
        let (app, _) = app_with(&[ClientAccount::new(1, 1000, 0)]).await;

        for uri in ["/clients/abc/statement", "/clients/0/statement", "/clients/-3/statement"] {
            let (status, json) = send(&app, get_req(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(json["error_code"], "invalid_input");
        }

        // Bad id wins over a bad body
        let (status, _) =
            send(&app, post_json("/clients/abc/transactions", "{".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_422_without_mutation() {
        let (app, store) = app_with(&[ClientAccount::new(1, 1000, 0)]).await;

        let bodies = [
            json!({"amount": 10, "operation": "x", "description": "bad op"}).to_string(),
            json!({"amount": 10, "operation": "D", "description": "bad op"}).to_string(),
            json!({"amount": 10, "operation": "c", "description": ""}).to_string(),
            json!({"amount": 10, "operation": "c", "description": "01234567890"}).to_string(),
            json!({"amount": 0, "operation": "c", "description": "zero"}).to_string(),
            json!({"amount": 1.5, "operation": "c", "description": "float"}).to_string(),
            json!({"amount": "10", "operation": "c", "description": "string"}).to_string(),
            json!({"amount": 10, "operation": "c"}).to_string(),
            json!({"amount": 10, "operation": "c", "description": null}).to_string(),
            "not json".to_string(),
        ];

        for body in bodies {
            let (status, _) = send(&app, post_json("/clients/1/transactions", body.clone())).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
        }

        assert_eq!(store.get_client(1).await.unwrap().balance, 0);
        assert!(store.list_recent_transactions(1, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_statement_returns_ten_newest() {
        let (app, _) = app_with(&[ClientAccount::new(1, 0, 0)]).await;

        for i in 1..=12 {
            let body = json!({"amount": i, "operation": "c", "description": format!("n{}", i)})
                .to_string();
            let (status, _) = send(&app, post_json("/clients/1/transactions", body)).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, json) = send(&app, get_req("/clients/1/statement")).await;
        let amounts: Vec<i64> = json["last_transactions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["amount"].as_i64().unwrap())
            .collect();
        assert_eq!(amounts, vec![12, 11, 10, 9, 8, 7, 6, 5, 4, 3]);
    }
}
