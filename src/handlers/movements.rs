use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::movement::MovementKind;
use crate::errors::ServiceError;
use crate::services::movements::CreateMovementInput;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMovementRequest {
    pub animal_id: Uuid,
    pub kind: MovementKind,
    pub origin_id: Option<Uuid>,
    pub destination_id: Option<Uuid>,
    /// Defaults to the current instant when omitted; the withdrawal guard
    /// for disposals is evaluated as of this time.
    pub moved_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub actor_id: Option<Uuid>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_movement))
}

/// Validate and execute an animal movement
#[utoipa::path(
    post,
    path = "/api/v1/movements",
    request_body = CreateMovementRequest,
    responses(
        (status = 201, description = "Movement executed; animal location/status updated"),
        (status = 404, description = "Animal or establishment not found"),
        (status = 409, description = "Animal not active, under meat withdrawal, or concurrently modified"),
        (status = 422, description = "Origin/destination shape or hierarchy violation")
    ),
    tag = "Movements"
)]
pub async fn create_movement(
    State(state): State<AppState>,
    Json(payload): Json<CreateMovementRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = CreateMovementInput {
        animal_id: payload.animal_id,
        kind: payload.kind,
        origin_id: payload.origin_id,
        destination_id: payload.destination_id,
        moved_at: payload.moved_at.unwrap_or_else(Utc::now),
        notes: payload.notes,
        created_by: payload.actor_id,
    };

    let created = state.movements.create_movement(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
