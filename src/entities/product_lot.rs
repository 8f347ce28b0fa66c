use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A received batch of one product with its own expiry and remaining stock.
///
/// `available_quantity` is the only mutable column; every change to it is
/// paired with an append-only `inventory_transactions` row inside the same
/// transaction, so the ledger always reconciles with the balance.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_lots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub lot_number: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub initial_quantity: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub available_quantity: rust_decimal::Decimal,
    /// `None` means the lot never expires.
    pub expires_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(has_many = "super::administration::Entity")]
    Administrations,
    #[sea_orm(has_many = "super::inventory_transaction::Entity")]
    InventoryTransactions,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::administration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Administrations.def()
    }
}

impl Related<super::inventory_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_inactive(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Strictly-before comparison: a lot expiring today still accepts
    /// administrations dated today.
    pub fn is_expired_as_of(&self, as_of: NaiveDate) -> bool {
        self.expires_at.is_some_and(|expired_on| expired_on < as_of)
    }
}
