//! `SeaORM` entity for the institution_news table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A news entry published by an institution. The public front page shows
/// the most recent active entry.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "institution_news")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub institution_id: i64,

    pub title: String,
    pub content: String,
    pub image_url: Option<String>,

    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::institutions::Entity",
        from = "Column::InstitutionId",
        to = "super::institutions::Column::Id"
    )]
    Institutions,
}

impl Related<super::institutions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institutions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
