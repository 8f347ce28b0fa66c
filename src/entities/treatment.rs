use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A course of veterinary care for one animal. Closed once `ended_at` is set.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "treatments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub animal_id: Uuid,
    pub description: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::animal::Entity",
        from = "Column::AnimalId",
        to = "super::animal::Column::Id"
    )]
    Animal,
    #[sea_orm(has_many = "super::administration::Entity")]
    Administrations,
}

impl Related<super::animal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Animal.def()
    }
}

impl Related<super::administration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Administrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_closed(&self) -> bool {
        self.ended_at.is_some()
    }
}
