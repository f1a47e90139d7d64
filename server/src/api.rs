//! HTTP/JSON routes.
//!
//! ## Routes
//!
//! - `GET /fruits` → inventory snapshot, `fruit -> {count, price}`
//! - `GET /purchases` → purchase history, most recent first
//! - `POST /purchases` → `{items, totalPrice}`, one record per item, 201
//! - `GET /health` → liveness and ledger backend
//!
//! Every failure answers 500 with a fixed per-route message; the cause is
//! only logged.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fruitstand_common::inventory::InventorySnapshot;
use fruitstand_common::purchase::{PurchaseRecord, PurchaseRequest};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::error::StandError;
use crate::service::StandService;

// ─── API types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub ledger: String,
}

/// The route an error came from. Each maps to one client-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Inventory,
    History,
    Purchase,
}

impl Operation {
    pub fn message(self) -> &'static str {
        match self {
            Operation::Inventory => "Failed to retrieve inventory",
            Operation::History => "Failed to retrieve purchase history",
            Operation::Purchase => "Failed to save purchase",
        }
    }
}

#[derive(Debug)]
enum Cause {
    Stand(StandError),
    Body(JsonRejection),
}

#[derive(Debug)]
pub struct ApiError {
    operation: Operation,
    cause: Cause,
}

impl ApiError {
    fn stand(operation: Operation) -> impl FnOnce(StandError) -> Self {
        move |e| Self {
            operation,
            cause: Cause::Stand(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.cause {
            Cause::Stand(e) => error!(
                kind = e.kind(),
                committed = e.committed(),
                "{}: {}",
                self.operation.message(),
                e
            ),
            Cause::Body(e) => error!(kind = "bad_request", "{}: {}", self.operation.message(), e),
        }
        let body = ErrorResponse {
            error: self.operation.message().to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn inventory_handler(
    State(service): State<Arc<StandService>>,
) -> Result<Json<InventorySnapshot>, ApiError> {
    let snapshot = service
        .inventory()
        .await
        .map_err(ApiError::stand(Operation::Inventory))?;
    Ok(Json(snapshot))
}

async fn list_purchases_handler(
    State(service): State<Arc<StandService>>,
) -> Result<Json<Vec<PurchaseRecord>>, ApiError> {
    let records = service
        .purchases()
        .await
        .map_err(ApiError::stand(Operation::History))?;
    Ok(Json(records))
}

async fn create_purchases_handler(
    State(service): State<Arc<StandService>>,
    body: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<PurchaseRecord>>), ApiError> {
    let Json(request) = body.map_err(|e| ApiError {
        operation: Operation::Purchase,
        cause: Cause::Body(e),
    })?;
    let records = service
        .submit_purchase(request)
        .await
        .map_err(ApiError::stand(Operation::Purchase))?;
    Ok((StatusCode::CREATED, Json(records)))
}

async fn health_handler(State(service): State<Arc<StandService>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        ledger: service.ledger().backend().to_string(),
    })
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the application router with permissive CORS.
pub fn router(service: Arc<StandService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/fruits", get(inventory_handler))
        .route(
            "/purchases",
            get(list_purchases_handler).post(create_purchases_handler),
        )
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(service)
}

/// Serve the API on an already-bound listener until the server stops.
pub async fn serve(listener: TcpListener, service: Arc<StandService>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server is running on {}", addr);
    }
    axum::serve(listener, router(service)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_messages() {
        assert_eq!(
            Operation::Inventory.message(),
            "Failed to retrieve inventory"
        );
        assert_eq!(
            Operation::History.message(),
            "Failed to retrieve purchase history"
        );
        assert_eq!(Operation::Purchase.message(), "Failed to save purchase");
    }
}
