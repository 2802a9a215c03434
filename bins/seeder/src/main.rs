//! Database seeder for Flutr development and testing.
//!
//! Seeds a demo institution with an admin account, a supplier, and a small
//! species sample for local development.
//!
//! Usage: cargo run --bin seeder

use sea_orm::DatabaseConnection;

use flutr_core::auth::hash_password;
use flutr_db::repositories::{
    CreateInstitutionInput, CreateSpeciesInput, CreateSupplierInput, CreateUserInput,
    InstitutionRepository, SpeciesLinkRepository, SpeciesOverrides, SpeciesRepository,
    SupplierRepository, UserRepository,
};
use flutr_shared::UserRole;

/// Slug of the demo institution (consistent across seed runs).
const DEMO_SLUG: &str = "demo-house";
/// Login email of the demo admin.
const DEMO_ADMIN_EMAIL: &str = "admin@flutr.dev";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = flutr_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo institution...");
    let institution_id = seed_institution(&db).await;

    println!("Seeding demo admin...");
    seed_admin(&db, institution_id).await;

    println!("Seeding supplier...");
    seed_supplier(&db, institution_id).await;

    println!("Seeding species sample...");
    seed_species(&db, institution_id).await;

    println!("Seeding complete!");
}

/// Seeds the demo institution, returning its id.
async fn seed_institution(db: &DatabaseConnection) -> i64 {
    let repo = InstitutionRepository::new(db.clone());

    if let Some(existing) = repo
        .find_by_slug(DEMO_SLUG)
        .await
        .expect("Failed to query institutions")
    {
        println!("  Demo institution already exists, skipping...");
        return existing.id;
    }

    let institution = repo
        .create(CreateInstitutionInput {
            slug: DEMO_SLUG.to_string(),
            name: "Demo Butterfly House".to_string(),
            street_address: "1 Conservatory Way".to_string(),
            extended_address: None,
            city: "Key West".to_string(),
            state_province: "FL".to_string(),
            postal_code: "33040".to_string(),
            time_zone: Some("America/New_York".to_string()),
            country: "USA".to_string(),
            phone_number: Some("+1-305-555-0134".to_string()),
            email_address: Some("hello@demo-house.example".to_string()),
            iabes_member: true,
            theme_colors: Some(vec!["#2a9d8f".to_string(), "#e9c46a".to_string()]),
            website_url: Some("https://demo-house.example".to_string()),
            facility_image_url: None,
            logo_url: None,
            description: Some("A demo butterfly house for local development.".to_string()),
            social_links: Some(serde_json::json!({
                "instagram": "https://instagram.com/demo-house"
            })),
        })
        .await
        .expect("Failed to create demo institution");

    institution.id
}

/// Seeds the demo admin account.
async fn seed_admin(db: &DatabaseConnection, institution_id: i64) {
    let repo = UserRepository::new(db.clone());

    if repo
        .find_by_email(DEMO_ADMIN_EMAIL)
        .await
        .expect("Failed to query users")
        .is_some()
    {
        println!("  Demo admin already exists, skipping...");
        return;
    }

    let password_hash = hash_password("flutr-dev-password").expect("Failed to hash password");

    repo.create(CreateUserInput {
        institution_id,
        name: "Demo Admin".to_string(),
        email: DEMO_ADMIN_EMAIL.to_string(),
        password_hash,
        role: UserRole::OrgAdmin,
    })
    .await
    .expect("Failed to create demo admin");
}

/// Seeds a supplier with the code used by historical import fixtures.
async fn seed_supplier(db: &DatabaseConnection, institution_id: i64) {
    let repo = SupplierRepository::new(db.clone());

    let existing = repo
        .list_for_institution(institution_id, true)
        .await
        .expect("Failed to query suppliers");
    if existing.iter().any(|s| s.code == "LPS") {
        println!("  Supplier already exists, skipping...");
        return;
    }

    repo.create(
        institution_id,
        CreateSupplierInput {
            name: "London Pupae Supplies".to_string(),
            code: "LPS".to_string(),
            country: "United Kingdom".to_string(),
            website_url: Some("https://londonpupae.example".to_string()),
        },
    )
    .await
    .expect("Failed to create supplier");
}

/// Seeds a handful of catalog species and enables them for the demo house.
async fn seed_species(db: &DatabaseConnection, institution_id: i64) {
    let species_repo = SpeciesRepository::new(db.clone());
    let link_repo = SpeciesLinkRepository::new(db.clone());

    let samples = [
        (
            "Morpho peleides",
            "Blue Morpho",
            "Nymphalidae",
            "Satyrinae",
            21,
            vec!["Central America", "South America"],
        ),
        (
            "Papilio machaon",
            "Old World Swallowtail",
            "Papilionidae",
            "Papilioninae",
            28,
            vec!["Europe", "Asia", "North America"],
        ),
        (
            "Danaus plexippus",
            "Monarch",
            "Nymphalidae",
            "Danainae",
            35,
            vec!["North America", "Central America"],
        ),
    ];

    for (scientific_name, common_name, family, sub_family, lifespan_days, range) in samples {
        let created = species_repo
            .create(CreateSpeciesInput {
                scientific_name: scientific_name.to_string(),
                common_name: common_name.to_string(),
                family: family.to_string(),
                sub_family: sub_family.to_string(),
                lifespan_days,
                range: range.into_iter().map(String::from).collect(),
                host_plant: None,
                habitat: None,
                fun_facts: None,
                img_wings_open: None,
                img_wings_closed: None,
                extra_img_1: None,
                extra_img_2: None,
            })
            .await;

        match created {
            Ok(species) => {
                link_repo
                    .enable(institution_id, species.id, SpeciesOverrides::default())
                    .await
                    .expect("Failed to enable species");
            }
            Err(flutr_db::repositories::SpeciesError::DuplicateScientificName(_)) => {
                println!("  Species {scientific_name} already exists, skipping...");
            }
            Err(e) => panic!("Failed to create species: {e}"),
        }
    }
}
