#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use uuid::Uuid;

use ganado_api::entities::{
    animal::{self, AnimalStatus},
    establishment::{self, EstablishmentKind},
    product, product_lot, treatment,
};
use ganado_api::migrator::Migrator;

/// Fresh in-memory database with the full schema applied. A single pooled
/// connection keeps the sqlite memory database alive for the whole test.
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory sqlite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    Arc::new(db)
}

pub fn dec(value: i64) -> Decimal {
    Decimal::new(value * 10_000, 4)
}

pub fn ts(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid rfc3339 timestamp")
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid ISO date")
}

pub async fn create_ranch(db: &DatabaseConnection, name: &str) -> establishment::Model {
    let now = Utc::now();
    establishment::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        kind: Set(EstablishmentKind::Ranch),
        ranch_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create ranch")
}

pub async fn create_leaf(
    db: &DatabaseConnection,
    ranch_id: Uuid,
    kind: EstablishmentKind,
    name: &str,
) -> establishment::Model {
    let now = Utc::now();
    establishment::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        kind: Set(kind),
        ranch_id: Set(Some(ranch_id)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create establishment")
}

pub async fn create_pasture(
    db: &DatabaseConnection,
    ranch_id: Uuid,
    name: &str,
) -> establishment::Model {
    create_leaf(db, ranch_id, EstablishmentKind::Pasture, name).await
}

pub async fn create_pen(
    db: &DatabaseConnection,
    ranch_id: Uuid,
    name: &str,
) -> establishment::Model {
    create_leaf(db, ranch_id, EstablishmentKind::Pen, name).await
}

pub async fn create_animal(
    db: &DatabaseConnection,
    establishment_id: Option<Uuid>,
) -> animal::Model {
    let now = Utc::now();
    let id = Uuid::new_v4();
    animal::ActiveModel {
        id: Set(id),
        tag_number: Set(format!("TAG-{}", id)),
        name: Set(None),
        breed: Set(None),
        birth_date: Set(None),
        establishment_id: Set(establishment_id),
        status: Set(AnimalStatus::Active),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await
    .expect("Failed to create animal")
}

pub async fn create_product(
    db: &DatabaseConnection,
    meat_withdrawal_days: i32,
    milk_withdrawal_days: i32,
) -> product::Model {
    let now = Utc::now();
    product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Oxytetracycline 200".to_string()),
        description: Set(None),
        meat_withdrawal_days: Set(meat_withdrawal_days),
        milk_withdrawal_days: Set(milk_withdrawal_days),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create product")
}

pub async fn create_lot(
    db: &DatabaseConnection,
    product_id: Uuid,
    initial: i64,
    expires_at: Option<NaiveDate>,
) -> product_lot::Model {
    let now = Utc::now();
    let id = Uuid::new_v4();
    product_lot::ActiveModel {
        id: Set(id),
        product_id: Set(product_id),
        lot_number: Set(format!("LOT-{}", id)),
        initial_quantity: Set(dec(initial)),
        available_quantity: Set(dec(initial)),
        expires_at: Set(expires_at),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await
    .expect("Failed to create lot")
}

pub async fn create_treatment(db: &DatabaseConnection, animal_id: Uuid) -> treatment::Model {
    let now = Utc::now();
    treatment::ActiveModel {
        id: Set(Uuid::new_v4()),
        animal_id: Set(animal_id),
        description: Set(Some("respiratory infection".to_string())),
        started_at: Set(now),
        ended_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to create treatment")
}

/// Marks a lot soft-deleted, making it inactive for every stock movement.
pub async fn deactivate_lot(db: &DatabaseConnection, lot: product_lot::Model) {
    let mut active: product_lot::ActiveModel = lot.into();
    active.deleted_at = Set(Some(Utc::now()));
    active.update(db).await.expect("Failed to deactivate lot");
}
