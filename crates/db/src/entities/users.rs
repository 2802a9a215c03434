//! `SeaORM` entity for the users table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An institution staff account. The same email may exist under different
/// institutions; (institution_id, email) is unique. The role column is
/// plain text validated against the closed role set at the application
/// layer.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub institution_id: i64,

    pub role: String,

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
