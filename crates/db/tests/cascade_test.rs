//! Integration tests for cascade deletion completeness.

mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use flutr_db::entities::{
    institution_news, institutions, release_events, release_items, shipment_items, shipments,
    suppliers, users,
};
use flutr_db::repositories::{
    AddReleaseItemInput, AddShipmentItemInput, CreateNewsInput, CreateReleaseEventInput,
    CreateShipmentInput, CreateUserInput, InstitutionRepository, NewsRepository,
    ReleaseRepository, ShipmentRepository, UserRepository,
};
use flutr_shared::UserRole;

#[tokio::test]
async fn test_institution_delete_leaves_zero_orphans() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "cascade").await;
    let species = common::create_species(&db).await;
    common::create_supplier(&db, inst.id, "LPS").await;

    // Build a full tenant tree: news, user, shipment with item, release
    // event with item.
    NewsRepository::new(db.clone())
        .create(
            inst.id,
            CreateNewsInput {
                title: "New arrivals".to_string(),
                content: "Fresh pupae this week".to_string(),
                image_url: None,
            },
        )
        .await
        .expect("Failed to create news");

    UserRepository::new(db.clone())
        .create(CreateUserInput {
            institution_id: inst.id,
            name: "Casey Reed".to_string(),
            email: format!("casey-{}@example.com", uuid::Uuid::new_v4()),
            password_hash: "$argon2id$test_hash".to_string(),
            role: UserRole::OrgAdmin,
        })
        .await
        .expect("Failed to create user");

    let shipments_repo = ShipmentRepository::new(db.clone());
    let shipment = shipments_repo
        .create(
            inst.id,
            CreateShipmentInput {
                supplier_code: "LPS".to_string(),
                shipment_date: common::now(),
                arrival_date: common::now(),
            },
        )
        .await
        .expect("Failed to create shipment");
    let item = shipments_repo
        .add_item(
            inst.id,
            AddShipmentItemInput {
                shipment_id: shipment.id,
                butterfly_species_id: species.id,
                number_received: 40,
                counts: flutr_core::transit::TransitCounts::default(),
            },
        )
        .await
        .expect("Failed to add item");

    let releases = ReleaseRepository::new(db.clone());
    let event = releases
        .create_event(
            inst.id,
            CreateReleaseEventInput {
                shipment_id: shipment.id,
                release_date: common::now(),
                released_by: "Casey Reed".to_string(),
            },
        )
        .await
        .expect("Failed to create release event");
    releases
        .add_item(
            inst.id,
            AddReleaseItemInput {
                release_event_id: event.id,
                shipment_item_id: item.id,
                quantity: 12,
            },
        )
        .await
        .expect("Failed to add release item");

    // Delete the tenant root.
    InstitutionRepository::new(db.clone())
        .delete(inst.id)
        .await
        .expect("Institution delete should cascade");

    // Every tenant-owned table must be empty for this institution.
    assert_eq!(count_owned::<institutions::Entity>(&db, institutions::Column::Id, inst.id).await, 0);
    for (label, count) in [
        (
            "news",
            count_owned::<institution_news::Entity>(
                &db,
                institution_news::Column::InstitutionId,
                inst.id,
            )
            .await,
        ),
        (
            "users",
            count_owned::<users::Entity>(&db, users::Column::InstitutionId, inst.id).await,
        ),
        (
            "suppliers",
            count_owned::<suppliers::Entity>(&db, suppliers::Column::InstitutionId, inst.id).await,
        ),
        (
            "shipments",
            count_owned::<shipments::Entity>(&db, shipments::Column::InstitutionId, inst.id).await,
        ),
        (
            "shipment_items",
            count_owned::<shipment_items::Entity>(
                &db,
                shipment_items::Column::InstitutionId,
                inst.id,
            )
            .await,
        ),
        (
            "release_events",
            count_owned::<release_events::Entity>(
                &db,
                release_events::Column::InstitutionId,
                inst.id,
            )
            .await,
        ),
        (
            "release_items",
            count_owned::<release_items::Entity>(
                &db,
                release_items::Column::InstitutionId,
                inst.id,
            )
            .await,
        ),
    ] {
        assert_eq!(count, 0, "orphans left in {label}");
    }
}

#[tokio::test]
async fn test_shipment_delete_cascades_items_and_events() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "cascade").await;
    let species = common::create_species(&db).await;
    common::create_supplier(&db, inst.id, "LPS").await;

    let shipments_repo = ShipmentRepository::new(db.clone());
    let shipment = shipments_repo
        .create(
            inst.id,
            CreateShipmentInput {
                supplier_code: "LPS".to_string(),
                shipment_date: common::now(),
                arrival_date: common::now(),
            },
        )
        .await
        .expect("Failed to create shipment");
    let item = shipments_repo
        .add_item(
            inst.id,
            AddShipmentItemInput {
                shipment_id: shipment.id,
                butterfly_species_id: species.id,
                number_received: 30,
                counts: flutr_core::transit::TransitCounts::default(),
            },
        )
        .await
        .expect("Failed to add item");

    let releases = ReleaseRepository::new(db.clone());
    let event = releases
        .create_event(
            inst.id,
            CreateReleaseEventInput {
                shipment_id: shipment.id,
                release_date: common::now(),
                released_by: "Casey Reed".to_string(),
            },
        )
        .await
        .expect("Failed to create release event");
    releases
        .add_item(
            inst.id,
            AddReleaseItemInput {
                release_event_id: event.id,
                shipment_item_id: item.id,
                quantity: 5,
            },
        )
        .await
        .expect("Failed to add release item");

    shipments_repo
        .delete(inst.id, shipment.id)
        .await
        .expect("Shipment delete should cascade its releases and items");

    assert_eq!(
        count_owned::<shipment_items::Entity>(&db, shipment_items::Column::ShipmentId, shipment.id)
            .await,
        0
    );
    assert_eq!(
        count_owned::<release_events::Entity>(&db, release_events::Column::ShipmentId, shipment.id)
            .await,
        0
    );
    assert_eq!(
        count_owned::<release_items::Entity>(&db, release_items::Column::ReleaseEventId, event.id)
            .await,
        0
    );
}

#[tokio::test]
async fn test_release_event_delete_cascades_items() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "cascade").await;
    let species = common::create_species(&db).await;
    common::create_supplier(&db, inst.id, "LPS").await;

    let shipments_repo = ShipmentRepository::new(db.clone());
    let shipment = shipments_repo
        .create(
            inst.id,
            CreateShipmentInput {
                supplier_code: "LPS".to_string(),
                shipment_date: common::now(),
                arrival_date: common::now(),
            },
        )
        .await
        .expect("Failed to create shipment");
    let item = shipments_repo
        .add_item(
            inst.id,
            AddShipmentItemInput {
                shipment_id: shipment.id,
                butterfly_species_id: species.id,
                number_received: 30,
                counts: flutr_core::transit::TransitCounts::default(),
            },
        )
        .await
        .expect("Failed to add item");

    let releases = ReleaseRepository::new(db.clone());
    let event = releases
        .create_event(
            inst.id,
            CreateReleaseEventInput {
                shipment_id: shipment.id,
                release_date: common::now(),
                released_by: "Casey Reed".to_string(),
            },
        )
        .await
        .expect("Failed to create release event");
    releases
        .add_item(
            inst.id,
            AddReleaseItemInput {
                release_event_id: event.id,
                shipment_item_id: item.id,
                quantity: 5,
            },
        )
        .await
        .expect("Failed to add release item");

    releases
        .delete_event(inst.id, event.id)
        .await
        .expect("Release event delete should cascade items");

    assert_eq!(
        count_owned::<release_items::Entity>(&db, release_items::Column::ReleaseEventId, event.id)
            .await,
        0
    );
    // The shipment item survives; only the release rows go.
    assert_eq!(
        count_owned::<shipment_items::Entity>(&db, shipment_items::Column::Id, item.id).await,
        1
    );
}

async fn count_owned<E>(
    db: &sea_orm::DatabaseConnection,
    column: impl ColumnTrait,
    id: i64,
) -> u64
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    E::find()
        .filter(column.eq(id))
        .count(db)
        .await
        .expect("count query failed")
}
