//! Integration tests for cross-table tenant checks.
//!
//! Covers the concrete scenario from the data model: institution A owns
//! supplier code "LPS"; institution B must not be able to reference it, and
//! release items must never cross tenants even when the referenced id
//! exists.

mod common;

use flutr_core::tenancy::TenancyError;
use flutr_db::repositories::{
    AddReleaseItemInput, AddShipmentItemInput, CreateReleaseEventInput, CreateShipmentInput,
    ReleaseError, ReleaseRepository, ShipmentError, ShipmentRepository, SupplierRepository,
};

#[tokio::test]
async fn test_shipment_accepts_same_tenant_supplier_code() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst_a = common::create_institution(&db, "tenancy-a").await;
    common::create_supplier(&db, inst_a.id, "LPS").await;

    let shipments = ShipmentRepository::new(db.clone());
    let shipment = shipments
        .create(
            inst_a.id,
            CreateShipmentInput {
                supplier_code: "LPS".to_string(),
                shipment_date: common::now(),
                arrival_date: common::now(),
            },
        )
        .await
        .expect("Same-tenant supplier code should be accepted");

    assert_eq!(shipment.institution_id, inst_a.id);
    assert_eq!(shipment.supplier_code, "LPS");
}

#[tokio::test]
async fn test_shipment_rejects_foreign_supplier_code() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst_a = common::create_institution(&db, "tenancy-a").await;
    let inst_b = common::create_institution(&db, "tenancy-b").await;
    common::create_supplier(&db, inst_a.id, "EBN").await;

    // Institution B has no supplier "EBN"; the code exists only under A.
    let shipments = ShipmentRepository::new(db.clone());
    let err = shipments
        .create(
            inst_b.id,
            CreateShipmentInput {
                supplier_code: "EBN".to_string(),
                shipment_date: common::now(),
                arrival_date: common::now(),
            },
        )
        .await
        .expect_err("Cross-tenant supplier code must be rejected");

    assert!(matches!(
        err,
        ShipmentError::Tenancy(TenancyError::TenantMismatch { .. })
    ));
}

#[tokio::test]
async fn test_shipment_rejects_unknown_supplier_code() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "tenancy").await;

    let shipments = ShipmentRepository::new(db.clone());
    let err = shipments
        .create(
            inst.id,
            CreateShipmentInput {
                supplier_code: "NO-SUCH-CODE".to_string(),
                shipment_date: common::now(),
                arrival_date: common::now(),
            },
        )
        .await
        .expect_err("Unknown supplier code must be rejected");

    assert!(matches!(
        err,
        ShipmentError::Tenancy(TenancyError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_inactive_supplier_code_still_validates() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "tenancy").await;
    let supplier = common::create_supplier(&db, inst.id, "KWB").await;

    // Inactive is not absent: soft-deleted suppliers stay referenceable.
    let suppliers = SupplierRepository::new(db.clone());
    suppliers
        .deactivate(inst.id, supplier.id)
        .await
        .expect("Failed to deactivate supplier");

    let shipments = ShipmentRepository::new(db.clone());
    shipments
        .create(
            inst.id,
            CreateShipmentInput {
                supplier_code: "KWB".to_string(),
                shipment_date: common::now(),
                arrival_date: common::now(),
            },
        )
        .await
        .expect("Inactive but tenant-matched code should validate");
}

#[tokio::test]
async fn test_release_item_rejects_cross_tenant_shipment_item() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst_a = common::create_institution(&db, "tenancy-a").await;
    let inst_b = common::create_institution(&db, "tenancy-b").await;
    let species = common::create_species(&db).await;

    common::create_supplier(&db, inst_a.id, "LPS").await;
    common::create_supplier(&db, inst_b.id, "LPS").await;

    let shipments = ShipmentRepository::new(db.clone());
    let releases = ReleaseRepository::new(db.clone());

    // Institution B's shipment item, numerically valid everywhere.
    let shipment_b = shipments
        .create(
            inst_b.id,
            CreateShipmentInput {
                supplier_code: "LPS".to_string(),
                shipment_date: common::now(),
                arrival_date: common::now(),
            },
        )
        .await
        .expect("Failed to create shipment");
    let item_b = shipments
        .add_item(
            inst_b.id,
            AddShipmentItemInput {
                shipment_id: shipment_b.id,
                butterfly_species_id: species.id,
                number_received: 50,
                counts: flutr_core::transit::TransitCounts::default(),
            },
        )
        .await
        .expect("Failed to add shipment item");

    // Institution A's release event against its own shipment.
    let shipment_a = shipments
        .create(
            inst_a.id,
            CreateShipmentInput {
                supplier_code: "LPS".to_string(),
                shipment_date: common::now(),
                arrival_date: common::now(),
            },
        )
        .await
        .expect("Failed to create shipment");
    let event_a = releases
        .create_event(
            inst_a.id,
            CreateReleaseEventInput {
                shipment_id: shipment_a.id,
                release_date: common::now(),
                released_by: "Dana Alvarez".to_string(),
            },
        )
        .await
        .expect("Failed to create release event");

    // A's release item pointing at B's shipment item must be rejected even
    // though the id exists.
    let err = releases
        .add_item(
            inst_a.id,
            AddReleaseItemInput {
                release_event_id: event_a.id,
                shipment_item_id: item_b.id,
                quantity: 10,
            },
        )
        .await
        .expect_err("Cross-tenant shipment item must be rejected");

    assert!(matches!(
        err,
        ReleaseError::Tenancy(TenancyError::TenantMismatch { .. })
    ));
}

#[tokio::test]
async fn test_release_event_rejects_cross_tenant_shipment() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst_a = common::create_institution(&db, "tenancy-a").await;
    let inst_b = common::create_institution(&db, "tenancy-b").await;
    common::create_supplier(&db, inst_a.id, "LPS").await;

    let shipments = ShipmentRepository::new(db.clone());
    let shipment_a = shipments
        .create(
            inst_a.id,
            CreateShipmentInput {
                supplier_code: "LPS".to_string(),
                shipment_date: common::now(),
                arrival_date: common::now(),
            },
        )
        .await
        .expect("Failed to create shipment");

    let releases = ReleaseRepository::new(db.clone());
    let err = releases
        .create_event(
            inst_b.id,
            CreateReleaseEventInput {
                shipment_id: shipment_a.id,
                release_date: common::now(),
                released_by: "Dana Alvarez".to_string(),
            },
        )
        .await
        .expect_err("Cross-tenant shipment reference must be rejected");

    assert!(matches!(
        err,
        ReleaseError::Tenancy(TenancyError::TenantMismatch { .. })
    ));
}

#[tokio::test]
async fn test_duplicate_species_per_shipment_rejected() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "tenancy").await;
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

    let input = AddShipmentItemInput {
        shipment_id: shipment.id,
        butterfly_species_id: species.id,
        number_received: 25,
        counts: flutr_core::transit::TransitCounts::default(),
    };

    shipments
        .add_item(inst.id, input.clone())
        .await
        .expect("First item should insert");

    let err = shipments
        .add_item(inst.id, input)
        .await
        .expect_err("unique_shipment_species must fire");

    assert!(matches!(err, ShipmentError::DuplicateSpecies { .. }));
}
