use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct WithdrawalQuery {
    /// Reference instant; defaults to the current time.
    pub at: Option<DateTime<Utc>>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/animals/:id/withdrawal", get(get_active_withdrawal))
}

/// Active withdrawal for an animal, recomputed from its administration history
#[utoipa::path(
    get,
    path = "/api/v1/animals/{id}/withdrawal",
    params(("id" = Uuid, Path, description = "Animal id"), WithdrawalQuery),
    responses(
        (status = 200, description = "Active withdrawal window", body = crate::services::withdrawal::ActiveWithdrawal),
        (status = 404, description = "Animal not found")
    ),
    tag = "Withdrawals"
)]
pub async fn get_active_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<WithdrawalQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let now = query.at.unwrap_or_else(Utc::now);
    let withdrawal = state.withdrawals.active_withdrawal(id, now).await?;
    Ok(Json(withdrawal))
}
