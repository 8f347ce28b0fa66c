use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionError, TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::entities::{
    administration,
    inventory_transaction::TransactionType,
    product, treatment,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::inventory::{assert_not_expired, load_active_lot, post_stock_change};
use crate::services::withdrawal::compute_withdrawal;

#[derive(Debug, Clone)]
pub struct CreateAdministrationInput {
    pub treatment_id: Uuid,
    pub lot_id: Uuid,
    pub dose: Decimal,
    pub administered_at: DateTime<Utc>,
    pub route: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Patch for an existing administration. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAdministrationInput {
    pub dose: Option<Decimal>,
    pub administered_at: Option<DateTime<Utc>>,
    pub route: Option<String>,
    pub notes: Option<String>,
    pub updated_by: Option<Uuid>,
}

/// Records drug applications: validates lot and treatment state, derives
/// the withdrawal window, and depletes lot stock inside one transaction
/// per operation, so a failed precondition leaves no partial writes.
#[derive(Clone)]
pub struct AdministrationService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl AdministrationService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn create_administration(
        &self,
        input: CreateAdministrationInput,
    ) -> Result<administration::Model, ServiceError> {
        if input.dose <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "dose must be positive".into(),
            ));
        }

        let db = self.db.as_ref();
        let created = db
            .transaction::<_, administration::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    // Precondition chain; each failure is distinct and
                    // ordered: missing lot, expired lot, short stock,
                    // missing treatment.
                    let lot = load_active_lot(txn, input.lot_id).await?;

                    assert_not_expired(&lot, input.administered_at.date_naive())?;

                    if lot.available_quantity < input.dose {
                        return Err(ServiceError::InsufficientStock {
                            lot_id: lot.id,
                            available: lot.available_quantity,
                            requested: input.dose,
                        });
                    }

                    treatment::Entity::find_by_id(input.treatment_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Treatment {} not found",
                                input.treatment_id
                            ))
                        })?;

                    let product = product::Entity::find_by_id(lot.product_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Product {} not found", lot.product_id))
                        })?;

                    let window = compute_withdrawal(
                        input.administered_at,
                        product.meat_withdrawal_days,
                        product.milk_withdrawal_days,
                    );

                    let now = Utc::now();
                    let created = administration::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        treatment_id: Set(input.treatment_id),
                        lot_id: Set(lot.id),
                        dose: Set(input.dose),
                        route: Set(input.route),
                        administered_at: Set(input.administered_at),
                        meat_withdrawal_until: Set(window.meat_until),
                        milk_withdrawal_until: Set(window.milk_until),
                        notes: Set(input.notes),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    post_stock_change(
                        txn,
                        &lot,
                        -input.dose,
                        TransactionType::Out,
                        input.administered_at,
                        Some(created.id),
                        Some("dose administered".into()),
                        input.created_by,
                    )
                    .await?;

                    Ok(created)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .emit(Event::AdministrationRecorded {
                administration_id: created.id,
                treatment_id: created.treatment_id,
                lot_id: created.lot_id,
                dose: created.dose,
            })
            .await;

        Ok(created)
    }

    /// Edits an administration, keeping stock and the withdrawal window
    /// consistent with the change:
    ///
    /// - a dose change applies one `adjust` ledger entry for the signed
    ///   difference (never re-derived from scratch), re-validating stock
    ///   for increases;
    /// - a timestamp change recomputes the withdrawal window from the new
    ///   instant and overwrites the stored columns.
    ///
    /// Dose decreases replete stock without re-checking lot expiry: expiry
    /// blocks consumption, not returns.
    #[instrument(skip(self))]
    pub async fn update_administration(
        &self,
        id: Uuid,
        patch: UpdateAdministrationInput,
    ) -> Result<administration::Model, ServiceError> {
        if patch.dose.is_some_and(|dose| dose <= Decimal::ZERO) {
            return Err(ServiceError::ValidationError(
                "dose must be positive".into(),
            ));
        }

        let db = self.db.as_ref();
        let (updated, dose_delta, window_recomputed) = db
            .transaction::<_, (administration::Model, Decimal, bool), ServiceError>(move |txn| {
                Box::pin(async move {
                    let existing = administration::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Administration {} not found", id))
                        })?;

                    let new_dose = patch.dose.unwrap_or(existing.dose);
                    let dose_delta = new_dose - existing.dose;
                    let new_administered_at =
                        patch.administered_at.unwrap_or(existing.administered_at);
                    let window_recomputed = new_administered_at != existing.administered_at;

                    if dose_delta != Decimal::ZERO {
                        // Stock moves opposite to the dose: a larger dose
                        // consumes the difference, a smaller one returns it.
                        let lot = load_active_lot(txn, existing.lot_id).await?;
                        post_stock_change(
                            txn,
                            &lot,
                            -dose_delta,
                            TransactionType::Adjust,
                            Utc::now(),
                            Some(existing.id),
                            Some("dose adjusted".into()),
                            patch.updated_by,
                        )
                        .await?;
                    }

                    let mut active: administration::ActiveModel = existing.clone().into();

                    if window_recomputed {
                        let lot = load_active_lot(txn, existing.lot_id).await?;
                        let product = product::Entity::find_by_id(lot.product_id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| {
                                ServiceError::NotFound(format!(
                                    "Product {} not found",
                                    lot.product_id
                                ))
                            })?;

                        let window = compute_withdrawal(
                            new_administered_at,
                            product.meat_withdrawal_days,
                            product.milk_withdrawal_days,
                        );
                        active.administered_at = Set(new_administered_at);
                        active.meat_withdrawal_until = Set(window.meat_until);
                        active.milk_withdrawal_until = Set(window.milk_until);
                    }

                    if dose_delta != Decimal::ZERO {
                        active.dose = Set(new_dose);
                    }
                    if let Some(route) = patch.route {
                        active.route = Set(Some(route));
                    }
                    if let Some(notes) = patch.notes {
                        active.notes = Set(Some(notes));
                    }
                    active.updated_at = Set(Utc::now());

                    let updated = active.update(txn).await?;

                    Ok((updated, dose_delta, window_recomputed))
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .emit(Event::AdministrationUpdated {
                administration_id: updated.id,
                lot_id: updated.lot_id,
                dose_delta: (dose_delta != Decimal::ZERO).then_some(dose_delta),
                window_recomputed,
            })
            .await;

        Ok(updated)
    }
}
