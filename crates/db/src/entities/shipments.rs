//! `SeaORM` entity for the shipments table (header).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A shipment header. The supplier is referenced by code in the USDA/Excel
/// format, and the code must resolve to a supplier of the SAME institution
/// (composite reference, not a plain foreign key).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "shipments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub institution_id: i64,

    pub supplier_code: String,

    pub shipment_date: DateTimeWithTimeZone,
    pub arrival_date: DateTimeWithTimeZone,

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
    #[sea_orm(has_many = "super::shipment_items::Entity")]
    ShipmentItems,
    #[sea_orm(has_many = "super::release_events::Entity")]
    ReleaseEvents,
}

impl Related<super::institutions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institutions.def()
    }
}

impl Related<super::shipment_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShipmentItems.def()
    }
}

impl Related<super::release_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReleaseEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
