mod common;

use assert_matches::assert_matches;
use chrono::Duration;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tokio::sync::mpsc;
use uuid::Uuid;

use common::{
    create_animal, create_lot, create_product, create_treatment, date, dec, setup_db, ts,
};
use ganado_api::entities::{administration, inventory_transaction, product_lot};
use ganado_api::errors::ServiceError;
use ganado_api::events::EventSender;
use ganado_api::services::administrations::{
    AdministrationService, CreateAdministrationInput, UpdateAdministrationInput,
};

fn service(db: &std::sync::Arc<sea_orm::DatabaseConnection>) -> AdministrationService {
    let (tx, rx) = mpsc::channel(64);
    // Keep the receiver alive for the lifetime of the test process; the
    // service only warns when the channel is gone.
    std::mem::forget(rx);
    AdministrationService::new(db.clone(), EventSender::new(tx))
}

fn create_input(treatment_id: Uuid, lot_id: Uuid, dose: Decimal) -> CreateAdministrationInput {
    CreateAdministrationInput {
        treatment_id,
        lot_id,
        dose,
        administered_at: ts("2025-03-01T09:00:00Z"),
        route: Some("subcutaneous".to_string()),
        notes: None,
        created_by: None,
    }
}

async fn lot_balance(db: &sea_orm::DatabaseConnection, lot_id: Uuid) -> Decimal {
    product_lot::Entity::find_by_id(lot_id)
        .one(db)
        .await
        .expect("Failed to query lot")
        .expect("Lot not found")
        .available_quantity
}

#[tokio::test]
async fn records_administration_with_window_and_stock_decrement() {
    let db = setup_db().await;
    let service = service(&db);

    let animal = create_animal(&db, None).await;
    let treatment = create_treatment(&db, animal.id).await;
    let product = create_product(&db, 28, 7).await;
    let lot = create_lot(&db, product.id, 200, None).await;

    let created = service
        .create_administration(create_input(treatment.id, lot.id, dec(10)))
        .await
        .expect("Failed to create administration");

    assert_eq!(created.dose, dec(10));
    assert_eq!(
        created.meat_withdrawal_until,
        ts("2025-03-01T09:00:00Z") + Duration::days(28)
    );
    assert_eq!(
        created.milk_withdrawal_until,
        ts("2025-03-01T09:00:00Z") + Duration::days(7)
    );

    assert_eq!(lot_balance(&db, lot.id).await, dec(190));

    // The out entry references the administration that caused it
    let entries = inventory_transaction::Entity::find()
        .filter(inventory_transaction::Column::LotId.eq(lot.id))
        .all(db.as_ref())
        .await
        .expect("Failed to query ledger");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].quantity, dec(-10));
    assert_eq!(entries[0].administration_id, Some(created.id));
}

#[tokio::test]
async fn over_dose_fails_atomically() {
    let db = setup_db().await;
    let service = service(&db);

    let animal = create_animal(&db, None).await;
    let treatment = create_treatment(&db, animal.id).await;
    let product = create_product(&db, 28, 7).await;
    let lot = create_lot(&db, product.id, 50, None).await;

    let err = service
        .create_administration(create_input(treatment.id, lot.id, dec(60)))
        .await
        .expect_err("Expected insufficient stock");
    assert_matches!(err, ServiceError::InsufficientStock { .. });

    // All-or-nothing: no administration row, no ledger row, balance intact
    assert_eq!(lot_balance(&db, lot.id).await, dec(50));
    let administrations = administration::Entity::find()
        .all(db.as_ref())
        .await
        .expect("Failed to query administrations");
    assert!(administrations.is_empty());
    let entries = inventory_transaction::Entity::find()
        .all(db.as_ref())
        .await
        .expect("Failed to query ledger");
    assert!(entries.is_empty());
}

#[tokio::test]
async fn expired_lot_blocks_consumption() {
    let db = setup_db().await;
    let service = service(&db);

    let animal = create_animal(&db, None).await;
    let treatment = create_treatment(&db, animal.id).await;
    let product = create_product(&db, 28, 7).await;
    let lot = create_lot(&db, product.id, 100, Some(date("2025-02-01"))).await;

    // administered_at 2025-03-01 is past the expiry date
    let err = service
        .create_administration(create_input(treatment.id, lot.id, dec(10)))
        .await
        .expect_err("Expected expired lot");
    assert_matches!(err, ServiceError::LotExpired { .. });
    assert_eq!(lot_balance(&db, lot.id).await, dec(100));
}

#[tokio::test]
async fn missing_treatment_leaves_no_partial_writes() {
    let db = setup_db().await;
    let service = service(&db);

    let product = create_product(&db, 28, 7).await;
    let lot = create_lot(&db, product.id, 100, None).await;

    let err = service
        .create_administration(create_input(Uuid::new_v4(), lot.id, dec(10)))
        .await
        .expect_err("Expected missing treatment");
    assert_matches!(err, ServiceError::NotFound(_));

    assert_eq!(lot_balance(&db, lot.id).await, dec(100));
    let entries = inventory_transaction::Entity::find()
        .all(db.as_ref())
        .await
        .expect("Failed to query ledger");
    assert!(entries.is_empty());
}

#[tokio::test]
async fn missing_lot_is_checked_before_everything_else() {
    let db = setup_db().await;
    let service = service(&db);

    let err = service
        .create_administration(create_input(Uuid::new_v4(), Uuid::new_v4(), dec(10)))
        .await
        .expect_err("Expected missing lot");
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn dose_edit_applies_the_difference_once() {
    let db = setup_db().await;
    let service = service(&db);

    let animal = create_animal(&db, None).await;
    let treatment = create_treatment(&db, animal.id).await;
    let product = create_product(&db, 28, 7).await;
    let lot = create_lot(&db, product.id, 200, None).await;

    let created = service
        .create_administration(create_input(treatment.id, lot.id, dec(10)))
        .await
        .expect("Failed to create administration");
    assert_eq!(lot_balance(&db, lot.id).await, dec(190));

    // 10 -> 15: one adjust entry of -5, not a recompute from 200
    let updated = service
        .update_administration(
            created.id,
            UpdateAdministrationInput {
                dose: Some(dec(15)),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update dose");
    assert_eq!(updated.dose, dec(15));
    assert_eq!(lot_balance(&db, lot.id).await, dec(185));

    // 15 -> 12: the decrease repletes exactly the difference
    service
        .update_administration(
            created.id,
            UpdateAdministrationInput {
                dose: Some(dec(12)),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to shrink dose");
    assert_eq!(lot_balance(&db, lot.id).await, dec(188));

    let adjustments = inventory_transaction::Entity::find()
        .filter(inventory_transaction::Column::AdministrationId.eq(created.id))
        .all(db.as_ref())
        .await
        .expect("Failed to query ledger");
    let mut deltas: Vec<Decimal> = adjustments.iter().map(|entry| entry.quantity).collect();
    deltas.sort();
    assert_eq!(deltas, vec![dec(-10), dec(-5), dec(3)]);
}

#[tokio::test]
async fn dose_increase_beyond_stock_is_rejected_unapplied() {
    let db = setup_db().await;
    let service = service(&db);

    let animal = create_animal(&db, None).await;
    let treatment = create_treatment(&db, animal.id).await;
    let product = create_product(&db, 28, 7).await;
    let lot = create_lot(&db, product.id, 20, None).await;

    let created = service
        .create_administration(create_input(treatment.id, lot.id, dec(10)))
        .await
        .expect("Failed to create administration");
    assert_eq!(lot_balance(&db, lot.id).await, dec(10));

    // 10 -> 25 needs 15 more, only 10 remain
    let err = service
        .update_administration(
            created.id,
            UpdateAdministrationInput {
                dose: Some(dec(25)),
                ..Default::default()
            },
        )
        .await
        .expect_err("Expected insufficient stock");
    assert_matches!(err, ServiceError::InsufficientStock { .. });

    assert_eq!(lot_balance(&db, lot.id).await, dec(10));
    let unchanged = administration::Entity::find_by_id(created.id)
        .one(db.as_ref())
        .await
        .expect("Failed to query administration")
        .expect("Administration not found");
    assert_eq!(unchanged.dose, dec(10));
}

#[tokio::test]
async fn timestamp_edit_recomputes_the_window() {
    let db = setup_db().await;
    let service = service(&db);

    let animal = create_animal(&db, None).await;
    let treatment = create_treatment(&db, animal.id).await;
    let product = create_product(&db, 28, 7).await;
    let lot = create_lot(&db, product.id, 100, None).await;

    let created = service
        .create_administration(create_input(treatment.id, lot.id, dec(10)))
        .await
        .expect("Failed to create administration");

    let updated = service
        .update_administration(
            created.id,
            UpdateAdministrationInput {
                administered_at: Some(ts("2025-04-10T12:00:00Z")),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to move the timestamp");

    assert_eq!(updated.administered_at, ts("2025-04-10T12:00:00Z"));
    assert_eq!(
        updated.meat_withdrawal_until,
        ts("2025-04-10T12:00:00Z") + Duration::days(28)
    );
    assert_eq!(
        updated.milk_withdrawal_until,
        ts("2025-04-10T12:00:00Z") + Duration::days(7)
    );
    // Dose untouched, so no extra ledger entries
    assert_eq!(updated.dose, dec(10));
    let entries = inventory_transaction::Entity::find()
        .filter(inventory_transaction::Column::LotId.eq(lot.id))
        .all(db.as_ref())
        .await
        .expect("Failed to query ledger");
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn dose_decrease_skips_the_expiry_check() {
    let db = setup_db().await;
    let service = service(&db);

    let animal = create_animal(&db, None).await;
    let treatment = create_treatment(&db, animal.id).await;
    let product = create_product(&db, 28, 7).await;
    // Valid at administration time, expired long before the edit below
    let lot = create_lot(&db, product.id, 100, Some(date("2025-04-01"))).await;

    let created = service
        .create_administration(create_input(treatment.id, lot.id, dec(10)))
        .await
        .expect("Failed to create administration");

    // Expiry blocks consumption, not returns
    let updated = service
        .update_administration(
            created.id,
            UpdateAdministrationInput {
                dose: Some(dec(4)),
                ..Default::default()
            },
        )
        .await
        .expect("Decrease must succeed on an expired lot");
    assert_eq!(updated.dose, dec(4));
    assert_eq!(lot_balance(&db, lot.id).await, dec(96));
}

#[tokio::test]
async fn rejects_non_positive_doses() {
    let db = setup_db().await;
    let service = service(&db);

    let err = service
        .create_administration(create_input(Uuid::new_v4(), Uuid::new_v4(), dec(0)))
        .await
        .expect_err("Expected validation failure");
    assert_matches!(err, ServiceError::ValidationError(_));
}
