use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single drug application: one dose drawn from one lot under one
/// treatment.
///
/// The two withdrawal columns are derived from `administered_at` and the
/// product's configured durations at creation time, and overwritten whenever
/// the timestamp is edited. They are never left stale; the aggregator reads
/// them directly instead of re-deriving per row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "administrations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub treatment_id: Uuid,
    pub lot_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub dose: rust_decimal::Decimal,
    pub route: Option<String>,
    pub administered_at: DateTime<Utc>,
    pub meat_withdrawal_until: DateTime<Utc>,
    pub milk_withdrawal_until: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::treatment::Entity",
        from = "Column::TreatmentId",
        to = "super::treatment::Column::Id"
    )]
    Treatment,
    #[sea_orm(
        belongs_to = "super::product_lot::Entity",
        from = "Column::LotId",
        to = "super::product_lot::Column::Id"
    )]
    ProductLot,
}

impl Related<super::treatment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Treatment.def()
    }
}

impl Related<super::product_lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
