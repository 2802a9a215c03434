//! `SeaORM` entity for the butterfly_species_institution join table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enables a global species for one institution, with optional display
/// overrides. Unique per (species, institution); blocks deletion of the
/// species while it exists.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "butterfly_species_institution")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub butterfly_species_id: i64,
    pub institution_id: i64,

    pub common_name_override: Option<String>,
    pub fun_facts_override: Option<String>,
    pub habitat_override: Option<String>,
    pub host_plant_override: Option<String>,
    pub image_override: Option<String>,
    pub lifespan_override: Option<i32>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::butterfly_species::Entity",
        from = "Column::ButterflySpeciesId",
        to = "super::butterfly_species::Column::Id"
    )]
    ButterflySpecies,
    #[sea_orm(
        belongs_to = "super::institutions::Entity",
        from = "Column::InstitutionId",
        to = "super::institutions::Column::Id"
    )]
    Institutions,
}

impl Related<super::butterfly_species::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ButterflySpecies.def()
    }
}

impl Related<super::institutions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institutions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
