use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::administrations::{CreateAdministrationInput, UpdateAdministrationInput};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAdministrationRequest {
    pub treatment_id: Uuid,
    pub lot_id: Uuid,
    pub dose: Decimal,
    /// Defaults to the current instant when omitted.
    pub administered_at: Option<DateTime<Utc>>,
    pub route: Option<String>,
    pub notes: Option<String>,
    /// Caller-supplied actor for the audit trail.
    pub actor_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAdministrationRequest {
    pub dose: Option<Decimal>,
    pub administered_at: Option<DateTime<Utc>>,
    pub route: Option<String>,
    pub notes: Option<String>,
    pub actor_id: Option<Uuid>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_administration))
        .route("/:id", put(update_administration))
}

/// Record a drug application against a treatment, drawing the dose from a lot
#[utoipa::path(
    post,
    path = "/api/v1/administrations",
    request_body = CreateAdministrationRequest,
    responses(
        (status = 201, description = "Administration recorded; lot stock decremented"),
        (status = 404, description = "Lot or treatment not found"),
        (status = 409, description = "Lot expired or insufficient stock"),
        (status = 422, description = "Invalid dose")
    ),
    tag = "Administrations"
)]
pub async fn create_administration(
    State(state): State<AppState>,
    Json(payload): Json<CreateAdministrationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let input = CreateAdministrationInput {
        treatment_id: payload.treatment_id,
        lot_id: payload.lot_id,
        dose: payload.dose,
        administered_at: payload.administered_at.unwrap_or_else(Utc::now),
        route: payload.route,
        notes: payload.notes,
        created_by: payload.actor_id,
    };

    let created = state.administrations.create_administration(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Edit an administration; stock and the withdrawal window follow the change
#[utoipa::path(
    put,
    path = "/api/v1/administrations/{id}",
    request_body = UpdateAdministrationRequest,
    params(("id" = Uuid, Path, description = "Administration id")),
    responses(
        (status = 200, description = "Administration updated"),
        (status = 404, description = "Administration not found"),
        (status = 409, description = "Insufficient stock for the dose increase"),
        (status = 422, description = "Invalid dose")
    ),
    tag = "Administrations"
)]
pub async fn update_administration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAdministrationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let patch = UpdateAdministrationInput {
        dose: payload.dose,
        administered_at: payload.administered_at,
        route: payload.route,
        notes: payload.notes,
        updated_by: payload.actor_id,
    };

    let updated = state.administrations.update_administration(id, patch).await?;
    Ok(Json(updated))
}
