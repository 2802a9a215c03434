//! `SeaORM` entity for the butterfly_species table (global catalog).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One species in the shared master catalog. This is the only table with no
/// institution scoping; it cannot be deleted while tenant data references it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "butterfly_species")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub scientific_name: String,
    pub common_name: String,

    pub family: String,
    pub sub_family: String,

    pub lifespan_days: i32,

    pub range: Vec<String>,

    pub host_plant: Option<String>,
    pub habitat: Option<String>,
    pub fun_facts: Option<String>,

    pub img_wings_open: Option<String>,
    pub img_wings_closed: Option<String>,
    pub extra_img_1: Option<String>,
    pub extra_img_2: Option<String>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::butterfly_species_institution::Entity")]
    SpeciesLinks,
    #[sea_orm(has_many = "super::shipment_items::Entity")]
    ShipmentItems,
}

impl Related<super::butterfly_species_institution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpeciesLinks.def()
    }
}

impl Related<super::shipment_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShipmentItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
