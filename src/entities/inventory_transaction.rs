use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Direction of a ledger entry. `In` receives stock, `Out` consumes it,
/// `Adjust` corrects it in either direction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransactionType {
    #[sea_orm(string_value = "in")]
    In,
    #[sea_orm(string_value = "out")]
    Out,
    #[sea_orm(string_value = "adjust")]
    Adjust,
}

/// Append-only stock ledger. `quantity` is the signed delta as applied to
/// the lot balance, so the running sum per lot reconciles with
/// `available_quantity - initial_quantity` at all times.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub lot_id: Uuid,
    pub product_id: Uuid,
    pub transaction_type: TransactionType,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: rust_decimal::Decimal,
    pub occurred_at: DateTime<Utc>,
    /// Set when the entry was caused by recording or editing an
    /// administration.
    pub administration_id: Option<Uuid>,
    pub reason: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_lot::Entity",
        from = "Column::LotId",
        to = "super::product_lot::Column::Id"
    )]
    ProductLot,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product_lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLot.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
