//! Procedural tenant-isolation enforcement.
//!
//! The schema already declares composite foreign keys for every
//! tenant-checked reference; this module runs the same checks inside the
//! writing transaction so violations surface as typed errors before the
//! write, and so delete policies produce clean outcomes instead of raw
//! constraint failures. The validation and the write must share one
//! transaction: a referenced row deleted between validation and write must
//! roll the whole operation back.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, TransactionTrait,
};
use thiserror::Error;
use tracing::info;

use flutr_core::tenancy::{DeleteDecision, ParentKind, TenancyError, check_owner, delete_decision};

use crate::entities::{
    butterfly_species, butterfly_species_institution, institution_news, institutions,
    release_events, release_items, shipment_items, shipments, suppliers, users,
};

/// Errors from tenancy checks and policy application.
#[derive(Debug, Error)]
pub enum TenancyCheckError {
    /// The reference was missing or crossed a tenant boundary.
    #[error(transparent)]
    Violation(#[from] TenancyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TenancyCheckError> for flutr_shared::AppError {
    fn from(err: TenancyCheckError) -> Self {
        match err {
            TenancyCheckError::Violation(v) => v.into(),
            TenancyCheckError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A cross-table reference to be validated against an owning institution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget<'a> {
    /// Supplier referenced by code (shipments store the USDA/Excel code).
    SupplierCode(&'a str),
    /// Shipment referenced by id.
    Shipment(i64),
    /// Release event referenced by id.
    ReleaseEvent(i64),
    /// Shipment line item referenced by id.
    ShipmentItem(i64),
}

/// Validates that a referenced row exists and belongs to `institution_id`.
///
/// Runs on the caller's connection, which must be the same transaction as
/// the subsequent write. A soft-deleted supplier still validates: inactive
/// is not absent.
///
/// # Errors
///
/// Returns `TenancyError::NotFound` when the reference resolves to nothing
/// anywhere, `TenancyError::TenantMismatch` when it resolves only to a row
/// of another institution.
pub async fn validate_reference<C: ConnectionTrait>(
    conn: &C,
    institution_id: i64,
    target: RefTarget<'_>,
) -> Result<(), TenancyCheckError> {
    match target {
        RefTarget::SupplierCode(code) => {
            let same_tenant = suppliers::Entity::find()
                .filter(suppliers::Column::InstitutionId.eq(institution_id))
                .filter(suppliers::Column::Code.eq(code))
                .one(conn)
                .await?;

            let owner = match same_tenant {
                Some(s) => Some(s.institution_id),
                // The code is only unique per tenant; any foreign row found
                // here proves the code exists but in another institution.
                None => suppliers::Entity::find()
                    .filter(suppliers::Column::Code.eq(code))
                    .one(conn)
                    .await?
                    .map(|s| s.institution_id),
            };

            check_owner("suppliers", code, institution_id, owner)?;
        }
        RefTarget::Shipment(id) => {
            let owner = shipments::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(|s| s.institution_id);
            check_owner("shipments", id, institution_id, owner)?;
        }
        RefTarget::ReleaseEvent(id) => {
            let owner = release_events::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(|e| e.institution_id);
            check_owner("release_events", id, institution_id, owner)?;
        }
        RefTarget::ShipmentItem(id) => {
            let owner = shipment_items::Entity::find_by_id(id)
                .one(conn)
                .await?
                .map(|i| i.institution_id);
            check_owner("shipment_items", id, institution_id, owner)?;
        }
    }

    Ok(())
}

/// Validates that a global species row exists.
///
/// Species are shared across tenants, so there is no owner to compare;
/// only existence is checked.
///
/// # Errors
///
/// Returns `TenancyError::NotFound` when the species does not exist.
pub async fn validate_species_exists<C: ConnectionTrait>(
    conn: &C,
    species_id: i64,
) -> Result<(), TenancyCheckError> {
    let exists = butterfly_species::Entity::find_by_id(species_id)
        .one(conn)
        .await?
        .is_some();

    if exists {
        Ok(())
    } else {
        Err(TenancyError::NotFound {
            table: "butterfly_species",
            reference: species_id.to_string(),
        }
        .into())
    }
}

/// A parent row targeted for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Tenant root; cascades everything the institution owns.
    Institution(i64),
    /// Shipment header; cascades items and release events.
    Shipment(i64),
    /// Release event; cascades its release items.
    ReleaseEvent(i64),
    /// Global catalog row; restricted while referenced.
    Species(i64),
    /// Supplier; restricted while its code is in use.
    Supplier(i64),
    /// Shipment line item; restricted while released against.
    ShipmentItem(i64),
}

impl DeleteTarget {
    const fn kind(self) -> ParentKind {
        match self {
            Self::Institution(_) => ParentKind::Institution,
            Self::Shipment(_) => ParentKind::Shipment,
            Self::ReleaseEvent(_) => ParentKind::ReleaseEvent,
            Self::Species(_) => ParentKind::Species,
            Self::Supplier(_) => ParentKind::Supplier,
            Self::ShipmentItem(_) => ParentKind::ShipmentItem,
        }
    }

    const fn id(self) -> i64 {
        match self {
            Self::Institution(id)
            | Self::Shipment(id)
            | Self::ReleaseEvent(id)
            | Self::Species(id)
            | Self::Supplier(id)
            | Self::ShipmentItem(id) => id,
        }
    }
}

/// Outcome of applying a delete policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The row (and, for cascade parents, its dependents) was deleted.
    Deleted,
    /// The delete was rejected; dependents still exist.
    Blocked {
        /// Table holding the blocking rows.
        dependents_in: &'static str,
        /// Number of blocking rows.
        dependents: u64,
    },
}

/// Applies the delete policy for a parent row as one atomic unit.
///
/// Cascade parents delete their dependents transitively, children before
/// parents, inside a single transaction. Restrict parents return
/// `DeleteOutcome::Blocked` without touching any row.
///
/// # Errors
///
/// Returns `TenancyError::NotFound` when the target row does not exist, or
/// a database error.
pub async fn apply_delete_policy(
    db: &DatabaseConnection,
    target: DeleteTarget,
) -> Result<DeleteOutcome, TenancyCheckError> {
    let txn = db.begin().await?;
    let outcome = match target {
        DeleteTarget::Institution(id) => delete_institution(&txn, id).await?,
        DeleteTarget::Shipment(id) => delete_shipment(&txn, id).await?,
        DeleteTarget::ReleaseEvent(id) => delete_release_event(&txn, id).await?,
        DeleteTarget::Species(id) => delete_species(&txn, id).await?,
        DeleteTarget::Supplier(id) => delete_supplier(&txn, id).await?,
        DeleteTarget::ShipmentItem(id) => delete_shipment_item(&txn, id).await?,
    };
    txn.commit().await?;

    match &outcome {
        DeleteOutcome::Deleted => {
            info!(table = target.kind().table(), id = target.id(), "deleted");
        }
        DeleteOutcome::Blocked {
            dependents_in,
            dependents,
        } => {
            info!(
                table = target.kind().table(),
                id = target.id(),
                dependents_in = *dependents_in,
                dependents = *dependents,
                "delete blocked"
            );
        }
    }

    Ok(outcome)
}

fn missing(kind: ParentKind, id: i64) -> TenancyCheckError {
    TenancyError::NotFound {
        table: kind.table(),
        reference: id.to_string(),
    }
    .into()
}

async fn delete_institution<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<DeleteOutcome, TenancyCheckError> {
    if institutions::Entity::find_by_id(id).one(conn).await?.is_none() {
        return Err(missing(ParentKind::Institution, id));
    }

    // Children before parents: leaf tables first, then their parents, so no
    // restrict constraint can fire mid-cascade.
    release_items::Entity::delete_many()
        .filter(release_items::Column::InstitutionId.eq(id))
        .exec(conn)
        .await?;
    release_events::Entity::delete_many()
        .filter(release_events::Column::InstitutionId.eq(id))
        .exec(conn)
        .await?;
    shipment_items::Entity::delete_many()
        .filter(shipment_items::Column::InstitutionId.eq(id))
        .exec(conn)
        .await?;
    shipments::Entity::delete_many()
        .filter(shipments::Column::InstitutionId.eq(id))
        .exec(conn)
        .await?;
    suppliers::Entity::delete_many()
        .filter(suppliers::Column::InstitutionId.eq(id))
        .exec(conn)
        .await?;
    butterfly_species_institution::Entity::delete_many()
        .filter(butterfly_species_institution::Column::InstitutionId.eq(id))
        .exec(conn)
        .await?;
    institution_news::Entity::delete_many()
        .filter(institution_news::Column::InstitutionId.eq(id))
        .exec(conn)
        .await?;
    users::Entity::delete_many()
        .filter(users::Column::InstitutionId.eq(id))
        .exec(conn)
        .await?;
    institutions::Entity::delete_by_id(id).exec(conn).await?;

    Ok(DeleteOutcome::Deleted)
}

async fn delete_shipment<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<DeleteOutcome, TenancyCheckError> {
    if shipments::Entity::find_by_id(id).one(conn).await?.is_none() {
        return Err(missing(ParentKind::Shipment, id));
    }

    let event_ids: Vec<i64> = release_events::Entity::find()
        .filter(release_events::Column::ShipmentId.eq(id))
        .all(conn)
        .await?
        .into_iter()
        .map(|e| e.id)
        .collect();

    let item_ids: Vec<i64> = shipment_items::Entity::find()
        .filter(shipment_items::Column::ShipmentId.eq(id))
        .all(conn)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();

    // Restrict check before anything is touched: a release item referencing
    // this shipment's line items from an event of ANOTHER shipment blocks
    // the whole delete. Items of this shipment's own events go down with
    // the events and do not block.
    if !item_ids.is_empty() {
        let mut foreign_refs = release_items::Entity::find()
            .filter(release_items::Column::ShipmentItemId.is_in(item_ids.clone()));
        if !event_ids.is_empty() {
            foreign_refs = foreign_refs
                .filter(release_items::Column::ReleaseEventId.is_not_in(event_ids.clone()));
        }
        let blocking = foreign_refs.count(conn).await?;

        if let DeleteDecision::Blocked { dependents } =
            delete_decision(ParentKind::ShipmentItem.delete_policy(), blocking)
        {
            return Ok(DeleteOutcome::Blocked {
                dependents_in: "release_items",
                dependents,
            });
        }
    }

    // Children before parents.
    if !event_ids.is_empty() {
        release_items::Entity::delete_many()
            .filter(release_items::Column::ReleaseEventId.is_in(event_ids.clone()))
            .exec(conn)
            .await?;
        release_events::Entity::delete_many()
            .filter(release_events::Column::Id.is_in(event_ids))
            .exec(conn)
            .await?;
    }
    if !item_ids.is_empty() {
        shipment_items::Entity::delete_many()
            .filter(shipment_items::Column::Id.is_in(item_ids))
            .exec(conn)
            .await?;
    }
    shipments::Entity::delete_by_id(id).exec(conn).await?;

    Ok(DeleteOutcome::Deleted)
}

async fn delete_release_event<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<DeleteOutcome, TenancyCheckError> {
    if release_events::Entity::find_by_id(id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(missing(ParentKind::ReleaseEvent, id));
    }

    release_items::Entity::delete_many()
        .filter(release_items::Column::ReleaseEventId.eq(id))
        .exec(conn)
        .await?;
    release_events::Entity::delete_by_id(id).exec(conn).await?;

    Ok(DeleteOutcome::Deleted)
}

async fn delete_species<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<DeleteOutcome, TenancyCheckError> {
    if butterfly_species::Entity::find_by_id(id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(missing(ParentKind::Species, id));
    }

    let links = butterfly_species_institution::Entity::find()
        .filter(butterfly_species_institution::Column::ButterflySpeciesId.eq(id))
        .count(conn)
        .await?;
    if let DeleteDecision::Blocked { dependents } =
        delete_decision(ParentKind::Species.delete_policy(), links)
    {
        return Ok(DeleteOutcome::Blocked {
            dependents_in: "butterfly_species_institution",
            dependents,
        });
    }

    let items = shipment_items::Entity::find()
        .filter(shipment_items::Column::ButterflySpeciesId.eq(id))
        .count(conn)
        .await?;
    if let DeleteDecision::Blocked { dependents } =
        delete_decision(ParentKind::Species.delete_policy(), items)
    {
        return Ok(DeleteOutcome::Blocked {
            dependents_in: "shipment_items",
            dependents,
        });
    }

    butterfly_species::Entity::delete_by_id(id).exec(conn).await?;

    Ok(DeleteOutcome::Deleted)
}

async fn delete_supplier<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<DeleteOutcome, TenancyCheckError> {
    let Some(supplier) = suppliers::Entity::find_by_id(id).one(conn).await? else {
        return Err(missing(ParentKind::Supplier, id));
    };

    let in_use = shipments::Entity::find()
        .filter(shipments::Column::InstitutionId.eq(supplier.institution_id))
        .filter(shipments::Column::SupplierCode.eq(supplier.code.as_str()))
        .count(conn)
        .await?;
    if let DeleteDecision::Blocked { dependents } =
        delete_decision(ParentKind::Supplier.delete_policy(), in_use)
    {
        return Ok(DeleteOutcome::Blocked {
            dependents_in: "shipments",
            dependents,
        });
    }

    suppliers::Entity::delete_by_id(id).exec(conn).await?;

    Ok(DeleteOutcome::Deleted)
}

async fn delete_shipment_item<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<DeleteOutcome, TenancyCheckError> {
    if shipment_items::Entity::find_by_id(id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(missing(ParentKind::ShipmentItem, id));
    }

    let releases = release_items::Entity::find()
        .filter(release_items::Column::ShipmentItemId.eq(id))
        .count(conn)
        .await?;
    if let DeleteDecision::Blocked { dependents } =
        delete_decision(ParentKind::ShipmentItem.delete_policy(), releases)
    {
        return Ok(DeleteOutcome::Blocked {
            dependents_in: "release_items",
            dependents,
        });
    }

    shipment_items::Entity::delete_by_id(id).exec(conn).await?;

    Ok(DeleteOutcome::Deleted)
}
