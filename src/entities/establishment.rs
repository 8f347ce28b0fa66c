use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Node kind in the two-level establishment tree. A ranch is the root;
/// pastures and pens are the leaves animals can occupy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EstablishmentKind {
    #[sea_orm(string_value = "ranch")]
    Ranch,
    #[sea_orm(string_value = "pasture")]
    Pasture,
    #[sea_orm(string_value = "pen")]
    Pen,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "establishments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub kind: EstablishmentKind,
    /// `None` for a ranch root; for a leaf, the id of its parent ranch.
    pub ranch_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::RanchId",
        to = "Column::Id"
    )]
    Ranch,
    #[sea_orm(has_many = "super::animal::Entity")]
    Animals,
}

impl Related<super::animal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Animals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_ranch(&self) -> bool {
        matches!(self.kind, EstablishmentKind::Ranch)
    }

    /// Leaves (pasture, pen) are the only nodes assignable to animals.
    pub fn is_leaf(&self) -> bool {
        !self.is_ranch()
    }
}
