//! `SeaORM` entity for the release_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A quantity of one shipment line item released during a release event.
/// Both referenced rows must belong to the same institution as this row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "release_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub institution_id: i64,

    pub release_event_id: i64,
    pub shipment_item_id: i64,

    pub quantity: i32,

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
        belongs_to = "super::release_events::Entity",
        from = "Column::ReleaseEventId",
        to = "super::release_events::Column::Id"
    )]
    ReleaseEvents,
    #[sea_orm(
        belongs_to = "super::shipment_items::Entity",
        from = "Column::ShipmentItemId",
        to = "super::shipment_items::Column::Id"
    )]
    ShipmentItems,
}

impl Related<super::institutions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institutions.def()
    }
}

impl Related<super::release_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReleaseEvents.def()
    }
}

impl Related<super::shipment_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShipmentItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
