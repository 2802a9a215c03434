//! Integration tests for restrict-policy deletes.

mod common;

use sea_orm::EntityTrait;

use flutr_db::entities::butterfly_species;
use flutr_db::repositories::{
    AddReleaseItemInput, AddShipmentItemInput, CreateReleaseEventInput, CreateShipmentInput,
    ShipmentError, ShipmentRepository, ReleaseRepository, SpeciesError, SpeciesLinkRepository,
    SpeciesOverrides, SpeciesRepository, SupplierError, SupplierRepository,
};

#[tokio::test]
async fn test_species_delete_blocked_by_link() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "restrict").await;
    let species = common::create_species(&db).await;

    SpeciesLinkRepository::new(db.clone())
        .enable(inst.id, species.id, SpeciesOverrides::default())
        .await
        .expect("Failed to enable species");

    let repo = SpeciesRepository::new(db.clone());
    let err = repo
        .delete(species.id)
        .await
        .expect_err("Linked species must not be deletable");
    assert!(matches!(err, SpeciesError::InUse { .. }));

    // Blocked delete leaves the row untouched.
    let still_there = butterfly_species::Entity::find_by_id(species.id)
        .one(&db)
        .await
        .expect("query failed");
    assert!(still_there.is_some());
}

#[tokio::test]
async fn test_species_delete_blocked_by_shipment_item() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "restrict").await;
    let species = common::create_species(&db).await;
    common::create_supplier(&db, inst.id, "LPS").await;

    let shipments = ShipmentRepository::new(db.clone());
    let shipment = shipments
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
    shipments
        .add_item(
            inst.id,
            AddShipmentItemInput {
                shipment_id: shipment.id,
                butterfly_species_id: species.id,
                number_received: 20,
                counts: flutr_core::transit::TransitCounts::default(),
            },
        )
        .await
        .expect("Failed to add item");

    let err = SpeciesRepository::new(db.clone())
        .delete(species.id)
        .await
        .expect_err("Referenced species must not be deletable");
    assert!(matches!(err, SpeciesError::InUse { .. }));
}

#[tokio::test]
async fn test_unreferenced_species_delete_succeeds() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let species = common::create_species(&db).await;

    SpeciesRepository::new(db.clone())
        .delete(species.id)
        .await
        .expect("Unreferenced species should be deletable");

    let gone = butterfly_species::Entity::find_by_id(species.id)
        .one(&db)
        .await
        .expect("query failed");
    assert!(gone.is_none());
}

#[tokio::test]
async fn test_shipment_item_delete_blocked_by_release_item() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "restrict").await;
    let species = common::create_species(&db).await;
    common::create_supplier(&db, inst.id, "LPS").await;

    let shipments = ShipmentRepository::new(db.clone());
    let shipment = shipments
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
    let item = shipments
        .add_item(
            inst.id,
            AddShipmentItemInput {
                shipment_id: shipment.id,
                butterfly_species_id: species.id,
                number_received: 20,
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
                quantity: 8,
            },
        )
        .await
        .expect("Failed to add release item");

    let err = shipments
        .delete_item(inst.id, item.id)
        .await
        .expect_err("Released line item must not be deletable");
    assert!(matches!(err, ShipmentError::Released { .. }));
}

#[tokio::test]
async fn test_supplier_hard_delete_blocked_by_shipment() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "restrict").await;
    let supplier = common::create_supplier(&db, inst.id, "LPS").await;

    ShipmentRepository::new(db.clone())
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

    let suppliers = SupplierRepository::new(db.clone());
    let err = suppliers
        .delete(inst.id, supplier.id)
        .await
        .expect_err("Supplier with shipments must not be hard-deletable");
    assert!(matches!(err, SupplierError::CodeInUse { .. }));
}

#[tokio::test]
async fn test_supplier_code_rename_blocked_while_in_use() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "restrict").await;
    let supplier = common::create_supplier(&db, inst.id, "LPS").await;

    ShipmentRepository::new(db.clone())
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

    let suppliers = SupplierRepository::new(db.clone());
    let err = suppliers
        .update(
            inst.id,
            supplier.id,
            flutr_db::repositories::UpdateSupplierInput {
                code: Some("NEW".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect_err("Renaming a code in use must be rejected");
    assert!(matches!(err, SupplierError::CodeInUse { .. }));
}
