//! `SeaORM` entity for the shipment_items table (line items).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One species within a shipment, with its transit quality counters. The
/// tenant column is denormalized here so the parent shipment and any
/// referencing release item can be checked against the same institution.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "shipment_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub institution_id: i64,

    pub shipment_id: i64,

    pub butterfly_species_id: i64,

    pub number_received: i32,

    pub emerged_in_transit: i32,
    pub damaged_in_transit: i32,
    pub diseased_in_transit: i32,
    pub parasite: i32,
    pub non_emergence: i32,
    pub poor_emergence: i32,

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
    #[sea_orm(
        belongs_to = "super::shipments::Entity",
        from = "Column::ShipmentId",
        to = "super::shipments::Column::Id"
    )]
    Shipments,
    #[sea_orm(
        belongs_to = "super::butterfly_species::Entity",
        from = "Column::ButterflySpeciesId",
        to = "super::butterfly_species::Column::Id"
    )]
    ButterflySpecies,
}

impl Related<super::institutions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institutions.def()
    }
}

impl Related<super::shipments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipments.def()
    }
}

impl Related<super::butterfly_species::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ButterflySpecies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
