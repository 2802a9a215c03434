//! Shared helpers for repository integration tests.
//!
//! Tests run against the database named by `DATABASE_URL` (with migrations
//! applied, e.g. via the migrator binary) and skip silently when the
//! variable is unset so environments without PostgreSQL still pass.

// Not every test binary uses every helper.
#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use flutr_db::repositories::{
    CreateInstitutionInput, CreateSpeciesInput, CreateSupplierInput, InstitutionRepository,
    SpeciesRepository, SupplierRepository,
};

/// Connects to the test database, or returns `None` to skip the test.
pub async fn test_db() -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return None;
    };

    Some(
        Database::connect(&url)
            .await
            .expect("Failed to connect to database"),
    )
}

/// Creates an institution with a unique slug.
pub async fn create_institution(
    db: &DatabaseConnection,
    prefix: &str,
) -> flutr_db::entities::institutions::Model {
    let repo = InstitutionRepository::new(db.clone());
    repo.create(CreateInstitutionInput {
        slug: format!("{prefix}-{}", Uuid::new_v4()),
        name: format!("{prefix} Butterfly House"),
        street_address: "1 Conservatory Way".to_string(),
        extended_address: None,
        city: "Key West".to_string(),
        state_province: "FL".to_string(),
        postal_code: "33040".to_string(),
        time_zone: Some("America/New_York".to_string()),
        country: "USA".to_string(),
        phone_number: None,
        email_address: None,
        iabes_member: true,
        theme_colors: None,
        website_url: None,
        facility_image_url: None,
        logo_url: None,
        description: None,
        social_links: None,
    })
    .await
    .expect("Failed to create institution")
}

/// Creates a species with a unique scientific name.
pub async fn create_species(
    db: &DatabaseConnection,
) -> flutr_db::entities::butterfly_species::Model {
    let repo = SpeciesRepository::new(db.clone());
    repo.create(CreateSpeciesInput {
        scientific_name: format!("Morpho peleides {}", Uuid::new_v4()),
        common_name: "Blue Morpho".to_string(),
        family: "Nymphalidae".to_string(),
        sub_family: "Satyrinae".to_string(),
        lifespan_days: 21,
        range: vec!["Central America".to_string(), "South America".to_string()],
        host_plant: None,
        habitat: None,
        fun_facts: None,
        img_wings_open: None,
        img_wings_closed: None,
        extra_img_1: None,
        extra_img_2: None,
    })
    .await
    .expect("Failed to create species")
}

/// Creates a supplier with the given code under an institution.
pub async fn create_supplier(
    db: &DatabaseConnection,
    institution_id: i64,
    code: &str,
) -> flutr_db::entities::suppliers::Model {
    let repo = SupplierRepository::new(db.clone());
    repo.create(
        institution_id,
        CreateSupplierInput {
            name: format!("Supplier {code}"),
            code: code.to_string(),
            country: "Costa Rica".to_string(),
            website_url: None,
        },
    )
    .await
    .expect("Failed to create supplier")
}

/// Shorthand for a fixed-offset timestamp "now".
pub fn now() -> chrono::DateTime<chrono::FixedOffset> {
    chrono::Utc::now().into()
}
