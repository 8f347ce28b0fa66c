use chrono::{DateTime, Duration, Utc};
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{administration, animal, treatment};
use crate::errors::ServiceError;

/// Meat/milk safety window derived from one administration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalWindow {
    pub meat_until: DateTime<Utc>,
    pub milk_until: DateTime<Utc>,
}

/// Computes the withdrawal window for a dose given the product's configured
/// durations. Pure calendar-day arithmetic on the administration instant;
/// no timezone shifting. Day counts are validated non-negative at the
/// product boundary, not here.
pub fn compute_withdrawal(
    administered_at: DateTime<Utc>,
    meat_days: i32,
    milk_days: i32,
) -> WithdrawalWindow {
    WithdrawalWindow {
        meat_until: administered_at + Duration::days(i64::from(meat_days)),
        milk_until: administered_at + Duration::days(i64::from(milk_days)),
    }
}

/// A window end-date blocks only while it lies strictly in the future.
pub fn is_withdrawal_active(until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    until.is_some_and(|u| u > now)
}

/// The single active withdrawal for an animal: the furthest meat and milk
/// end-dates across all of its administrations, `None` per field when no
/// administration still projects into the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ActiveWithdrawal {
    pub meat_until: Option<DateTime<Utc>>,
    pub milk_until: Option<DateTime<Utc>>,
}

impl ActiveWithdrawal {
    pub const NONE: ActiveWithdrawal = ActiveWithdrawal {
        meat_until: None,
        milk_until: None,
    };

    pub fn is_meat_active(&self, now: DateTime<Utc>) -> bool {
        is_withdrawal_active(self.meat_until, now)
    }

    pub fn is_milk_active(&self, now: DateTime<Utc>) -> bool {
        is_withdrawal_active(self.milk_until, now)
    }
}

/// Reduces the animal's full administration history to its active
/// withdrawal as of `now`.
///
/// Always recomputed from the source rows: an edited administration can
/// retroactively shrink or extend the window, so a cached "current
/// withdrawal" column would need invalidation logic this approach makes
/// unnecessary. Generic over the connection so the movement executor can
/// evaluate the guard inside its own transaction.
pub(crate) async fn active_withdrawal_on<C: ConnectionTrait>(
    conn: &C,
    animal_id: Uuid,
    now: DateTime<Utc>,
) -> Result<ActiveWithdrawal, ServiceError> {
    let treatment_ids: Vec<Uuid> = treatment::Entity::find()
        .filter(treatment::Column::AnimalId.eq(animal_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();

    if treatment_ids.is_empty() {
        return Ok(ActiveWithdrawal::NONE);
    }

    let rows = administration::Entity::find()
        .filter(administration::Column::TreatmentId.is_in(treatment_ids))
        .filter(
            Condition::any()
                .add(administration::Column::MeatWithdrawalUntil.gt(now))
                .add(administration::Column::MilkWithdrawalUntil.gt(now)),
        )
        .all(conn)
        .await?;

    let mut meat_until: Option<DateTime<Utc>> = None;
    let mut milk_until: Option<DateTime<Utc>> = None;
    for row in rows {
        if row.meat_withdrawal_until > now {
            meat_until = Some(meat_until.map_or(row.meat_withdrawal_until, |current| {
                current.max(row.meat_withdrawal_until)
            }));
        }
        if row.milk_withdrawal_until > now {
            milk_until = Some(milk_until.map_or(row.milk_withdrawal_until, |current| {
                current.max(row.milk_withdrawal_until)
            }));
        }
    }

    Ok(ActiveWithdrawal {
        meat_until,
        milk_until,
    })
}

/// Read-side service exposing the aggregator to HTTP callers.
#[derive(Clone)]
pub struct WithdrawalService {
    db: Arc<DatabaseConnection>,
}

impl WithdrawalService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn active_withdrawal(
        &self,
        animal_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<ActiveWithdrawal, ServiceError> {
        let db = self.db.as_ref();

        animal::Entity::find_by_id(animal_id)
            .filter(animal::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Animal {} not found", animal_id)))?;

        active_withdrawal_on(db, animal_id, now).await
    }
}
