//! `SeaORM` entity for the institutions table (multi-tenant root).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One butterfly house. All tenant-owned tables reference this row for data
/// isolation; deleting it removes everything the institution owns.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "institutions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub slug: String,

    pub name: String,
    pub street_address: String,
    pub extended_address: Option<String>,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub time_zone: Option<String>,
    pub country: String,

    pub phone_number: Option<String>,
    pub email_address: Option<String>,

    pub iabes_member: bool,
    pub theme_colors: Option<Vec<String>>,

    pub website_url: Option<String>,
    pub facility_image_url: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub social_links: Option<Json>,
    pub stats_active: bool,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::institution_news::Entity")]
    InstitutionNews,
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
    #[sea_orm(has_many = "super::suppliers::Entity")]
    Suppliers,
    #[sea_orm(has_many = "super::shipments::Entity")]
    Shipments,
    #[sea_orm(has_many = "super::butterfly_species_institution::Entity")]
    SpeciesLinks,
}

impl Related<super::institution_news::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstitutionNews.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl Related<super::shipments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipments.def()
    }
}

impl Related<super::butterfly_species_institution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SpeciesLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
