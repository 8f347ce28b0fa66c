use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Conflict")
    pub error: String,
    /// Machine-readable error code (e.g., "insufficient_stock")
    pub code: String,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The lot has been soft-deleted and accepts no further stock movements.
    #[error("Lot {lot_id} is inactive")]
    LotInactive { lot_id: Uuid },

    /// Consumption dated after the lot's expiry date.
    #[error("Lot {lot_id} expired on {expired_on}, administration dated {as_of}")]
    LotExpired {
        lot_id: Uuid,
        expired_on: NaiveDate,
        as_of: NaiveDate,
    },

    #[error("Insufficient stock in lot {lot_id}: available {available}, requested {requested}")]
    InsufficientStock {
        lot_id: Uuid,
        available: Decimal,
        requested: Decimal,
    },

    /// Movement requested for an animal already disposed of.
    #[error("Animal {animal_id} is not active (status: {status})")]
    AnimalNotActive { animal_id: Uuid, status: String },

    /// An origin was supplied for an animal that has no current location.
    #[error("Animal {animal_id} has no current location, but origin {supplied_origin} was supplied")]
    AnimalHasNoLocation {
        animal_id: Uuid,
        supplied_origin: Uuid,
    },

    /// The supplied origin disagrees with the animal's current location.
    #[error("Origin mismatch for animal {animal_id}: current location {current:?}, supplied {supplied:?}")]
    OriginMismatch {
        animal_id: Uuid,
        current: Option<Uuid>,
        supplied: Option<Uuid>,
    },

    #[error("Destination is not allowed for {kind} movements")]
    DestinationNotAllowed { kind: String },

    #[error("Origin and destination are the same establishment ({establishment_id})")]
    SameOriginDestination { establishment_id: Uuid },

    #[error("Origin ranch {origin_ranch} differs from destination ranch {destination_ranch}")]
    CrossRanchMovement {
        origin_ranch: Uuid,
        destination_ranch: Uuid,
    },

    /// Food-safety guard: disposal blocked while the meat window is open.
    #[error("Animal {animal_id} is under meat withdrawal until {until}, movement dated {as_of}")]
    ActiveMeatWithdrawal {
        animal_id: Uuid,
        until: DateTime<Utc>,
        as_of: DateTime<Utc>,
    },

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(Uuid),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Single source of truth for error-to-status mapping.
    ///
    /// 404 for missing entities, 422 for structurally invalid requests,
    /// 409 for domain-state conflicts the caller must correct (not retry),
    /// 500 for unexpected persistence failures.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_)
            | Self::AnimalHasNoLocation { .. }
            | Self::OriginMismatch { .. }
            | Self::DestinationNotAllowed { .. }
            | Self::SameOriginDestination { .. }
            | Self::CrossRanchMovement { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::LotInactive { .. }
            | Self::LotExpired { .. }
            | Self::InsufficientStock { .. }
            | Self::AnimalNotActive { .. }
            | Self::ActiveMeatWithdrawal { .. }
            | Self::ConcurrentModification(_) => StatusCode::CONFLICT,
            Self::DatabaseError(_) | Self::EventError(_) | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable code for callers that branch on failures.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DatabaseError(_) => "database_error",
            Self::NotFound(_) => "not_found",
            Self::ValidationError(_) => "validation_error",
            Self::LotInactive { .. } => "lot_inactive",
            Self::LotExpired { .. } => "lot_expired",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::AnimalNotActive { .. } => "animal_not_active",
            Self::AnimalHasNoLocation { .. } => "animal_has_no_location",
            Self::OriginMismatch { .. } => "origin_mismatch",
            Self::DestinationNotAllowed { .. } => "destination_not_allowed",
            Self::SameOriginDestination { .. } => "same_origin_destination",
            Self::CrossRanchMovement { .. } => "cross_ranch_movement",
            Self::ActiveMeatWithdrawal { .. } => "active_meat_withdrawal",
            Self::ConcurrentModification(_) => "concurrent_modification",
            Self::EventError(_) => "event_error",
            Self::InternalError(_) => "internal_error",
        }
    }

    /// Internal errors return generic messages to avoid leaking details;
    /// domain errors carry their full structured message.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::EventError(_) | Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            code: self.error_code().to_string(),
            message: self.response_message(),
            timestamp: Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_conflicts_map_to_409() {
        let err = ServiceError::InsufficientStock {
            lot_id: Uuid::new_v4(),
            available: Decimal::new(5, 0),
            requested: Decimal::new(10, 0),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "insufficient_stock");
    }

    #[test]
    fn structural_violations_map_to_422() {
        let err = ServiceError::CrossRanchMovement {
            origin_ranch: Uuid::new_v4(),
            destination_ranch: Uuid::new_v4(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = ServiceError::InternalError("connection pool exhausted".into());
        assert_eq!(err.response_message(), "Internal server error");
    }
}
