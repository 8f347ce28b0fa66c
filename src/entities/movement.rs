use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

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
pub enum MovementKind {
    #[sea_orm(string_value = "internal")]
    Internal,
    #[sea_orm(string_value = "external")]
    External,
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "slaughter")]
    Slaughter,
}

impl MovementKind {
    /// Sale and slaughter permanently remove the animal from circulation
    /// and are gated by the meat-withdrawal guard.
    pub fn is_disposal(&self) -> bool {
        matches!(self, MovementKind::Sale | MovementKind::Slaughter)
    }
}

/// Append-only movement history. A row exists only for requests that passed
/// the full validation chain, and is written in the same transaction as the
/// resulting animal state.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub animal_id: Uuid,
    pub origin_id: Option<Uuid>,
    pub destination_id: Option<Uuid>,
    pub kind: MovementKind,
    pub moved_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::animal::Entity",
        from = "Column::AnimalId",
        to = "super::animal::Column::Id"
    )]
    Animal,
}

impl Related<super::animal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Animal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
