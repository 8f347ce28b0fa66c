use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Disposal status of an animal. Anything other than `Active` means the
/// animal has permanently left circulation and carries no location.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnimalStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "sold")]
    Sold,
    #[sea_orm(string_value = "slaughtered")]
    Slaughtered,
    #[sea_orm(string_value = "deceased")]
    Deceased,
    #[sea_orm(string_value = "lost")]
    Lost,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "animals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tag_number: String,
    pub name: Option<String>,
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// Current location: a leaf establishment (pasture or pen), never a ranch
    /// root. `None` whenever the animal is off-establishment or disposed.
    pub establishment_id: Option<Uuid>,
    pub status: AnimalStatus,
    /// Optimistic-lock counter; bumped on every location/status transition.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::establishment::Entity",
        from = "Column::EstablishmentId",
        to = "super::establishment::Column::Id"
    )]
    Establishment,
    #[sea_orm(has_many = "super::treatment::Entity")]
    Treatments,
    #[sea_orm(has_many = "super::movement::Entity")]
    Movements,
}

impl Related<super::establishment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Establishment.def()
    }
}

impl Related<super::treatment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Treatments.def()
    }
}

impl Related<super::movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_active(&self) -> bool {
        matches!(self.status, AnimalStatus::Active)
    }
}
