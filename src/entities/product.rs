use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Veterinary product catalog entry. The two withdrawal durations are
/// fixed per product and validated non-negative at the catalog boundary.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub meat_withdrawal_days: i32,
    pub milk_withdrawal_days: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_lot::Entity")]
    ProductLots,
}

impl Related<super::product_lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
