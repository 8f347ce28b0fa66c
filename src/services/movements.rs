use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::{
    animal::{self, AnimalStatus},
    establishment,
    movement::{self, MovementKind},
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::withdrawal::active_withdrawal_on;

#[derive(Debug, Clone)]
pub struct CreateMovementInput {
    pub animal_id: Uuid,
    pub kind: MovementKind,
    pub origin_id: Option<Uuid>,
    pub destination_id: Option<Uuid>,
    pub moved_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Validates and executes animal movements.
///
/// Every request passes the full validation chain before anything is
/// written: animal existence and liveness, the origin/destination shape
/// rules for its kind, the hierarchy rules, and (for disposals) the
/// meat-withdrawal guard, always evaluated last so a structurally invalid
/// request never surfaces a withdrawal error. The history row and the
/// animal's new location/status commit together or not at all.
#[derive(Clone)]
pub struct MovementService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl MovementService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn create_movement(
        &self,
        input: CreateMovementInput,
    ) -> Result<movement::Model, ServiceError> {
        let db = self.db.as_ref();
        let created = db
            .transaction::<_, movement::Model, ServiceError>(move |txn| {
                Box::pin(async move { execute_movement(txn, input).await })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .emit(Event::MovementExecuted {
                movement_id: created.id,
                animal_id: created.animal_id,
                kind: created.kind.to_string(),
                origin_id: created.origin_id,
                destination_id: created.destination_id,
            })
            .await;

        Ok(created)
    }
}

async fn execute_movement<C: ConnectionTrait>(
    txn: &C,
    input: CreateMovementInput,
) -> Result<movement::Model, ServiceError> {
    let animal = animal::Entity::find_by_id(input.animal_id)
        .filter(animal::Column::DeletedAt.is_null())
        .one(txn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Animal {} not found", input.animal_id)))?;

    // A disposed animal is out of circulation. This also makes the second
    // of two serialized disposal requests fail instead of double-selling.
    if !animal.is_active() {
        return Err(ServiceError::AnimalNotActive {
            animal_id: animal.id,
            status: animal.status.to_string(),
        });
    }

    let origin = resolve_origin(txn, &animal, input.origin_id).await?;

    let (destination_id, new_location, new_status) = match input.kind {
        MovementKind::Internal => {
            let destination_id = input.destination_id.ok_or_else(|| {
                ServiceError::ValidationError(
                    "destination is required for internal movements".into(),
                )
            })?;
            let destination = load_establishment(txn, destination_id).await?;
            ensure_assignable(&destination)?;

            if let Some(origin) = &origin {
                if origin.id == destination.id {
                    return Err(ServiceError::SameOriginDestination {
                        establishment_id: origin.id,
                    });
                }
                match (origin.ranch_id, destination.ranch_id) {
                    (Some(origin_ranch), Some(destination_ranch)) => {
                        if origin_ranch != destination_ranch {
                            return Err(ServiceError::CrossRanchMovement {
                                origin_ranch,
                                destination_ranch,
                            });
                        }
                    }
                    // A leaf without a ranch reference is a broken tree.
                    _ => {
                        return Err(ServiceError::ValidationError(
                            "origin or destination is not attached to a ranch".into(),
                        ))
                    }
                }
            }

            (Some(destination.id), Some(destination.id), AnimalStatus::Active)
        }
        MovementKind::External => {
            if input.destination_id.is_some() {
                return Err(ServiceError::DestinationNotAllowed {
                    kind: input.kind.to_string(),
                });
            }
            (None, None, AnimalStatus::Active)
        }
        MovementKind::Sale | MovementKind::Slaughter => {
            if input.destination_id.is_some() {
                return Err(ServiceError::DestinationNotAllowed {
                    kind: input.kind.to_string(),
                });
            }

            // Withdrawal guard, evaluated inside this transaction and only
            // after every structural rule has passed.
            let withdrawal = active_withdrawal_on(txn, animal.id, input.moved_at).await?;
            if let Some(until) = withdrawal.meat_until.filter(|until| *until > input.moved_at) {
                return Err(ServiceError::ActiveMeatWithdrawal {
                    animal_id: animal.id,
                    until,
                    as_of: input.moved_at,
                });
            }

            let status = if input.kind == MovementKind::Sale {
                AnimalStatus::Sold
            } else {
                AnimalStatus::Slaughtered
            };
            (None, None, status)
        }
    };

    let now = Utc::now();
    let created = movement::ActiveModel {
        id: Set(Uuid::new_v4()),
        animal_id: Set(animal.id),
        origin_id: Set(origin.as_ref().map(|o| o.id)),
        destination_id: Set(destination_id),
        kind: Set(input.kind),
        moved_at: Set(input.moved_at),
        notes: Set(input.notes),
        created_by: Set(input.created_by),
        created_at: Set(now),
    }
    .insert(txn)
    .await?;

    // Project the new animal state under the optimistic version guard; a
    // concurrent transition rolls back the whole unit, history row included.
    let result = animal::Entity::update_many()
        .col_expr(animal::Column::EstablishmentId, Expr::value(new_location))
        .col_expr(animal::Column::Status, Expr::value(new_status))
        .col_expr(
            animal::Column::Version,
            Expr::col(animal::Column::Version).add(Expr::val(1)),
        )
        .col_expr(animal::Column::UpdatedAt, Expr::value(now))
        .filter(animal::Column::Id.eq(animal.id))
        .filter(animal::Column::Version.eq(animal.version))
        .exec(txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(ServiceError::ConcurrentModification(animal.id));
    }

    Ok(created)
}

/// Shared origin-shape rule: a located animal requires its exact current
/// location as origin; an unlocated animal forbids one.
async fn resolve_origin<C: ConnectionTrait>(
    txn: &C,
    animal: &animal::Model,
    supplied: Option<Uuid>,
) -> Result<Option<establishment::Model>, ServiceError> {
    match (animal.establishment_id, supplied) {
        (Some(current), Some(supplied_id)) => {
            if supplied_id != current {
                return Err(ServiceError::OriginMismatch {
                    animal_id: animal.id,
                    current: Some(current),
                    supplied: Some(supplied_id),
                });
            }
            let origin = load_establishment(txn, current).await?;
            ensure_assignable(&origin)?;
            Ok(Some(origin))
        }
        (Some(current), None) => Err(ServiceError::OriginMismatch {
            animal_id: animal.id,
            current: Some(current),
            supplied: None,
        }),
        (None, Some(supplied_id)) => Err(ServiceError::AnimalHasNoLocation {
            animal_id: animal.id,
            supplied_origin: supplied_id,
        }),
        (None, None) => Ok(None),
    }
}

async fn load_establishment<C: ConnectionTrait>(
    txn: &C,
    id: Uuid,
) -> Result<establishment::Model, ServiceError> {
    establishment::Entity::find_by_id(id)
        .one(txn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Establishment {} not found", id)))
}

/// Animals occupy leaves only; the ranch root is never assignable.
fn ensure_assignable(node: &establishment::Model) -> Result<(), ServiceError> {
    if node.is_ranch() {
        return Err(ServiceError::ValidationError(format!(
            "establishment {} is a ranch root and cannot hold animals",
            node.id
        )));
    }
    Ok(())
}
