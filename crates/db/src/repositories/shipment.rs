//! Shipment repository for database operations.
//!
//! A shipment references its supplier by code, and the code must resolve to
//! a supplier of the same institution. Every insert that depends on such a
//! check runs the check and the write in one transaction so the referenced
//! row cannot disappear in between.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use flutr_core::tenancy::TenancyError;
use flutr_core::transit::{self, TransitCounts, TransitError};
use flutr_shared::types::PageRequest;

use crate::entities::{shipment_items, shipments};
use crate::tenancy::{self, DeleteOutcome, DeleteTarget, RefTarget, TenancyCheckError};

/// Error types for shipment operations.
#[derive(Debug, thiserror::Error)]
pub enum ShipmentError {
    /// A cross-table reference was missing or crossed a tenant boundary.
    #[error(transparent)]
    Tenancy(TenancyError),

    /// A transit counter or received count was invalid.
    #[error(transparent)]
    InvalidCounts(#[from] TransitError),

    /// The species already appears on this shipment.
    #[error("Species {species_id} is already on shipment {shipment_id}")]
    DuplicateSpecies {
        /// The shipment.
        shipment_id: i64,
        /// The duplicated species.
        species_id: i64,
    },

    /// Shipment not found under this institution.
    #[error("Shipment not found: {0}")]
    NotFound(i64),

    /// Shipment item not found under this institution.
    #[error("Shipment item not found: {0}")]
    ItemNotFound(i64),

    /// Release items still reference the line items.
    #[error("{dependents} release item(s) in {dependents_in} still reference this row")]
    Released {
        /// Table holding the blocking rows.
        dependents_in: &'static str,
        /// Number of blocking rows.
        dependents: u64,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ShipmentError> for flutr_shared::AppError {
    fn from(err: ShipmentError) -> Self {
        match err {
            ShipmentError::Tenancy(v) => v.into(),
            ShipmentError::InvalidCounts(v) => v.into(),
            ShipmentError::DuplicateSpecies { .. } => Self::ConstraintViolation(err.to_string()),
            ShipmentError::NotFound(_) | ShipmentError::ItemNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            ShipmentError::Released { .. } => Self::DeleteBlocked(err.to_string()),
            ShipmentError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<TenancyCheckError> for ShipmentError {
    fn from(err: TenancyCheckError) -> Self {
        match err {
            TenancyCheckError::Violation(v) => Self::Tenancy(v),
            TenancyCheckError::Database(e) => Self::Database(e),
        }
    }
}

/// Input for creating a shipment header.
#[derive(Debug, Clone)]
pub struct CreateShipmentInput {
    /// Supplier code in the USDA/Excel format; must exist for the SAME
    /// institution (inactive suppliers still qualify).
    pub supplier_code: String,
    /// Date the shipment left the supplier.
    pub shipment_date: chrono::DateTime<chrono::FixedOffset>,
    /// Date the shipment arrived.
    pub arrival_date: chrono::DateTime<chrono::FixedOffset>,
}

/// Input for adding a line item to a shipment.
#[derive(Debug, Clone)]
pub struct AddShipmentItemInput {
    /// Parent shipment; must belong to the same institution.
    pub shipment_id: i64,
    /// Global species id.
    pub butterfly_species_id: i64,
    /// Pupae received.
    pub number_received: i32,
    /// Transit quality counters.
    pub counts: TransitCounts,
}

/// Input for updating a line item's counters.
#[derive(Debug, Clone, Default)]
pub struct UpdateShipmentItemInput {
    /// Pupae received.
    pub number_received: Option<i32>,
    /// Transit quality counters (replaced wholesale when present).
    pub counts: Option<TransitCounts>,
}

/// Shipment repository, always scoped by institution.
#[derive(Debug, Clone)]
pub struct ShipmentRepository {
    db: DatabaseConnection,
}

impl ShipmentRepository {
    /// Creates a new shipment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a shipment header after validating the supplier code against
    /// the institution, inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns a tenancy error when the code is missing or belongs to
    /// another institution.
    pub async fn create(
        &self,
        institution_id: i64,
        input: CreateShipmentInput,
    ) -> Result<shipments::Model, ShipmentError> {
        let txn = self.db.begin().await?;

        tenancy::validate_reference(
            &txn,
            institution_id,
            RefTarget::SupplierCode(&input.supplier_code),
        )
        .await?;

        let now = chrono::Utc::now().into();
        let shipment = shipments::ActiveModel {
            id: NotSet,
            institution_id: Set(institution_id),
            supplier_code: Set(input.supplier_code),
            shipment_date: Set(input.shipment_date),
            arrival_date: Set(input.arrival_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let shipment = shipment.insert(&txn).await?;
        txn.commit().await?;

        info!(
            shipment_id = shipment.id,
            institution_id, "shipment created"
        );

        Ok(shipment)
    }

    /// Adds a line item after validating the parent shipment's tenant, the
    /// species' existence, and the counters, inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns a tenancy error for cross-tenant or missing references,
    /// `InvalidCounts` for negative counters, and `DuplicateSpecies` on the
    /// (shipment, species) uniqueness rule.
    pub async fn add_item(
        &self,
        institution_id: i64,
        input: AddShipmentItemInput,
    ) -> Result<shipment_items::Model, ShipmentError> {
        transit::validate_number_received(input.number_received)?;
        input.counts.validate()?;

        let txn = self.db.begin().await?;

        tenancy::validate_reference(&txn, institution_id, RefTarget::Shipment(input.shipment_id))
            .await?;
        tenancy::validate_species_exists(&txn, input.butterfly_species_id).await?;

        let taken = shipment_items::Entity::find()
            .filter(shipment_items::Column::ShipmentId.eq(input.shipment_id))
            .filter(shipment_items::Column::ButterflySpeciesId.eq(input.butterfly_species_id))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(ShipmentError::DuplicateSpecies {
                shipment_id: input.shipment_id,
                species_id: input.butterfly_species_id,
            });
        }

        let now = chrono::Utc::now().into();
        let item = shipment_items::ActiveModel {
            id: NotSet,
            institution_id: Set(institution_id),
            shipment_id: Set(input.shipment_id),
            butterfly_species_id: Set(input.butterfly_species_id),
            number_received: Set(input.number_received),
            emerged_in_transit: Set(input.counts.emerged_in_transit),
            damaged_in_transit: Set(input.counts.damaged_in_transit),
            diseased_in_transit: Set(input.counts.diseased_in_transit),
            parasite: Set(input.counts.parasite),
            non_emergence: Set(input.counts.non_emergence),
            poor_emergence: Set(input.counts.poor_emergence),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let item = item.insert(&txn).await?;
        txn.commit().await?;

        Ok(item)
    }

    /// Finds a shipment by id within an institution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_scoped(
        &self,
        institution_id: i64,
        id: i64,
    ) -> Result<Option<shipments::Model>, DbErr> {
        shipments::Entity::find_by_id(id)
            .filter(shipments::Column::InstitutionId.eq(institution_id))
            .one(&self.db)
            .await
    }

    /// Finds a shipment with its line items.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent under this institution.
    pub async fn get_with_items(
        &self,
        institution_id: i64,
        id: i64,
    ) -> Result<(shipments::Model, Vec<shipment_items::Model>), ShipmentError> {
        let Some(shipment) = self.find_scoped(institution_id, id).await? else {
            return Err(ShipmentError::NotFound(id));
        };

        let items = shipment_items::Entity::find()
            .filter(shipment_items::Column::ShipmentId.eq(id))
            .order_by_asc(shipment_items::Column::Id)
            .all(&self.db)
            .await?;

        Ok((shipment, items))
    }

    /// Lists shipments of an institution, newest arrival first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_institution(
        &self,
        institution_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<shipments::Model>, u64), DbErr> {
        let base =
            shipments::Entity::find().filter(shipments::Column::InstitutionId.eq(institution_id));

        let total = base.clone().count(&self.db).await?;
        let rows = base
            .order_by_desc(shipments::Column::ArrivalDate)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Updates a line item's received count and transit counters.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if absent under this institution and
    /// `InvalidCounts` for negative values.
    pub async fn update_item(
        &self,
        institution_id: i64,
        item_id: i64,
        input: UpdateShipmentItemInput,
    ) -> Result<shipment_items::Model, ShipmentError> {
        if let Some(number_received) = input.number_received {
            transit::validate_number_received(number_received)?;
        }
        if let Some(counts) = &input.counts {
            counts.validate()?;
        }

        let existing = shipment_items::Entity::find_by_id(item_id)
            .filter(shipment_items::Column::InstitutionId.eq(institution_id))
            .one(&self.db)
            .await?;
        let Some(existing) = existing else {
            return Err(ShipmentError::ItemNotFound(item_id));
        };

        let mut model: shipment_items::ActiveModel = existing.into();
        if let Some(number_received) = input.number_received {
            model.number_received = Set(number_received);
        }
        if let Some(counts) = input.counts {
            model.emerged_in_transit = Set(counts.emerged_in_transit);
            model.damaged_in_transit = Set(counts.damaged_in_transit);
            model.diseased_in_transit = Set(counts.diseased_in_transit);
            model.parasite = Set(counts.parasite);
            model.non_emergence = Set(counts.non_emergence);
            model.poor_emergence = Set(counts.poor_emergence);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes a shipment, cascading its items and release events.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent under this institution and `Released`
    /// when release items of other shipments still reference its line items.
    pub async fn delete(&self, institution_id: i64, id: i64) -> Result<(), ShipmentError> {
        if self.find_scoped(institution_id, id).await?.is_none() {
            return Err(ShipmentError::NotFound(id));
        }

        match tenancy::apply_delete_policy(&self.db, DeleteTarget::Shipment(id)).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::Blocked {
                dependents_in,
                dependents,
            } => Err(ShipmentError::Released {
                dependents_in,
                dependents,
            }),
        }
    }

    /// Deletes a line item, restricted while release items reference it.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if absent under this institution and
    /// `Released` when quantities have been committed against it.
    pub async fn delete_item(&self, institution_id: i64, item_id: i64) -> Result<(), ShipmentError> {
        let existing = shipment_items::Entity::find_by_id(item_id)
            .filter(shipment_items::Column::InstitutionId.eq(institution_id))
            .one(&self.db)
            .await?;
        if existing.is_none() {
            return Err(ShipmentError::ItemNotFound(item_id));
        }

        match tenancy::apply_delete_policy(&self.db, DeleteTarget::ShipmentItem(item_id)).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::Blocked {
                dependents_in,
                dependents,
            } => Err(ShipmentError::Released {
                dependents_in,
                dependents,
            }),
        }
    }
}
