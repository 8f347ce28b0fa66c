use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::inventory_transaction::TransactionType;
use crate::errors::ServiceError;
use crate::services::inventory::RecordTransactionInput;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInventoryTransactionRequest {
    pub lot_id: Uuid,
    pub transaction_type: TransactionType,
    /// Positive magnitude for in/out; signed non-zero delta for adjust.
    pub quantity: Decimal,
    pub occurred_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub actor_id: Option<Uuid>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/transactions", post(record_transaction))
}

/// Record a manual stock movement against a lot
#[utoipa::path(
    post,
    path = "/api/v1/inventory/transactions",
    request_body = CreateInventoryTransactionRequest,
    responses(
        (status = 201, description = "Ledger entry recorded; lot balance updated"),
        (status = 404, description = "Lot not found"),
        (status = 409, description = "Lot inactive or insufficient stock"),
        (status = 422, description = "Invalid quantity")
    ),
    tag = "Inventory"
)]
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryTransactionRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = RecordTransactionInput {
        lot_id: payload.lot_id,
        transaction_type: payload.transaction_type,
        quantity: payload.quantity,
        occurred_at: payload.occurred_at,
        reason: payload.reason,
        created_by: payload.actor_id,
    };

    let entry = state.inventory.record_transaction(input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
