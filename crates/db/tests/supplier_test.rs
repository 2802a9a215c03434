//! Integration tests for supplier soft delete and tenant-scoped codes.

mod common;

use flutr_db::repositories::{
    CreateShipmentInput, CreateSupplierInput, ShipmentRepository, SupplierError,
    SupplierRepository,
};

#[tokio::test]
async fn test_deactivate_is_idempotent() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "suppliers").await;
    let supplier = common::create_supplier(&db, inst.id, "LPS").await;
    let repo = SupplierRepository::new(db.clone());

    let first = repo
        .deactivate(inst.id, supplier.id)
        .await
        .expect("First deactivate should succeed");
    assert!(!first.is_active);

    let second = repo
        .deactivate(inst.id, supplier.id)
        .await
        .expect("Second deactivate should succeed");
    assert!(!second.is_active);
    assert_eq!(first.updated_at, second.updated_at, "idempotent: no change");
}

#[tokio::test]
async fn test_deactivate_preserves_historical_shipments() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "suppliers").await;
    let supplier = common::create_supplier(&db, inst.id, "LPS").await;

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

    SupplierRepository::new(db.clone())
        .deactivate(inst.id, supplier.id)
        .await
        .expect("Failed to deactivate");

    let unchanged = shipments
        .find_scoped(inst.id, shipment.id)
        .await
        .expect("query failed")
        .expect("shipment should survive supplier deactivation");
    assert_eq!(unchanged.supplier_code, "LPS");
}

#[tokio::test]
async fn test_same_code_under_different_institutions_allowed() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst_a = common::create_institution(&db, "suppliers-a").await;
    let inst_b = common::create_institution(&db, "suppliers-b").await;

    common::create_supplier(&db, inst_a.id, "EBN").await;
    // Same human-assigned code under another tenant must not collide.
    common::create_supplier(&db, inst_b.id, "EBN").await;
}

#[tokio::test]
async fn test_duplicate_code_same_institution_rejected() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst = common::create_institution(&db, "suppliers").await;
    common::create_supplier(&db, inst.id, "LPS").await;

    let repo = SupplierRepository::new(db.clone());
    let err = repo
        .create(
            inst.id,
            CreateSupplierInput {
                name: "Second LPS".to_string(),
                code: "LPS".to_string(),
                country: "Costa Rica".to_string(),
                website_url: None,
            },
        )
        .await
        .expect_err("unique_supplier_per_institution must fire");
    assert!(matches!(err, SupplierError::DuplicateCode(_)));
}

#[tokio::test]
async fn test_cross_tenant_lookup_finds_nothing() {
    let Some(db) = common::test_db().await else {
        return;
    };

    let inst_a = common::create_institution(&db, "suppliers-a").await;
    let inst_b = common::create_institution(&db, "suppliers-b").await;
    let supplier = common::create_supplier(&db, inst_a.id, "LPS").await;

    let repo = SupplierRepository::new(db.clone());
    let found = repo
        .find_scoped(inst_b.id, supplier.id)
        .await
        .expect("query failed");
    assert!(found.is_none(), "tenant scoping must hide foreign rows");
}
