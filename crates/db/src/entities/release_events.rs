//! `SeaORM` entity for the release_events table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A flight-house release against a shipment of the same institution.
/// `released_by` is a plain text snapshot, not a user reference, so the
/// audit trail survives staff account changes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "release_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub institution_id: i64,

    pub shipment_id: i64,

    pub release_date: DateTimeWithTimeZone,
    pub released_by: String,

    pub created_at: DateTimeWithTimeZone,
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
    #[sea_orm(has_many = "super::release_items::Entity")]
    ReleaseItems,
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

impl Related<super::release_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReleaseItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
