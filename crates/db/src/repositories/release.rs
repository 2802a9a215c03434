//! Release repository for database operations.
//!
//! A release event records butterflies entering the flight house from one
//! shipment; its items commit quantities against that shipment's line
//! items. Every reference is tenant-checked inside the writing transaction.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use flutr_core::tenancy::TenancyError;
use flutr_core::transit::{self, TransitError};
use flutr_shared::types::PageRequest;

use crate::entities::{release_events, release_items};
use crate::tenancy::{self, DeleteTarget, RefTarget, TenancyCheckError};

/// Error types for release operations.
#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    /// A cross-table reference was missing or crossed a tenant boundary.
    #[error(transparent)]
    Tenancy(TenancyError),

    /// The quantity was zero or negative.
    #[error(transparent)]
    InvalidQuantity(#[from] TransitError),

    /// The shipment item already appears in this release event.
    #[error("Shipment item {shipment_item_id} is already in release event {release_event_id}")]
    DuplicateItem {
        /// The release event.
        release_event_id: i64,
        /// The duplicated shipment item.
        shipment_item_id: i64,
    },

    /// Release event not found under this institution.
    #[error("Release event not found: {0}")]
    NotFound(i64),

    /// Release item not found under this institution.
    #[error("Release item not found: {0}")]
    ItemNotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReleaseError> for flutr_shared::AppError {
    fn from(err: ReleaseError) -> Self {
        match err {
            ReleaseError::Tenancy(v) => v.into(),
            ReleaseError::InvalidQuantity(v) => v.into(),
            ReleaseError::DuplicateItem { .. } => Self::ConstraintViolation(err.to_string()),
            ReleaseError::NotFound(_) | ReleaseError::ItemNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            ReleaseError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<TenancyCheckError> for ReleaseError {
    fn from(err: TenancyCheckError) -> Self {
        match err {
            TenancyCheckError::Violation(v) => Self::Tenancy(v),
            TenancyCheckError::Database(e) => Self::Database(e),
        }
    }
}

/// Input for creating a release event.
#[derive(Debug, Clone)]
pub struct CreateReleaseEventInput {
    /// Shipment being released; must belong to the same institution.
    pub shipment_id: i64,
    /// Date of the release.
    pub release_date: chrono::DateTime<chrono::FixedOffset>,
    /// Name label of whoever performed the release. A plain snapshot, kept
    /// even if the named user later leaves.
    pub released_by: String,
}

/// Input for adding an item to a release event.
#[derive(Debug, Clone)]
pub struct AddReleaseItemInput {
    /// Parent release event; must belong to the same institution.
    pub release_event_id: i64,
    /// Shipment line item released against; must belong to the same
    /// institution.
    pub shipment_item_id: i64,
    /// Quantity released; strictly positive.
    pub quantity: i32,
}

/// Release repository, always scoped by institution.
#[derive(Debug, Clone)]
pub struct ReleaseRepository {
    db: DatabaseConnection,
}

impl ReleaseRepository {
    /// Creates a new release repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a release event after validating the shipment's tenant,
    /// inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns a tenancy error when the shipment is missing or belongs to
    /// another institution.
    pub async fn create_event(
        &self,
        institution_id: i64,
        input: CreateReleaseEventInput,
    ) -> Result<release_events::Model, ReleaseError> {
        let txn = self.db.begin().await?;

        tenancy::validate_reference(&txn, institution_id, RefTarget::Shipment(input.shipment_id))
            .await?;

        let event = release_events::ActiveModel {
            id: NotSet,
            institution_id: Set(institution_id),
            shipment_id: Set(input.shipment_id),
            release_date: Set(input.release_date),
            released_by: Set(input.released_by),
            created_at: Set(chrono::Utc::now().into()),
        };

        let event = event.insert(&txn).await?;
        txn.commit().await?;

        info!(
            release_event_id = event.id,
            institution_id, "release event created"
        );

        Ok(event)
    }

    /// Adds a release item after validating both references against the
    /// institution, inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns a tenancy error for cross-tenant or missing references,
    /// `InvalidQuantity` for non-positive quantities, and `DuplicateItem`
    /// on the (release event, shipment item) uniqueness rule.
    pub async fn add_item(
        &self,
        institution_id: i64,
        input: AddReleaseItemInput,
    ) -> Result<release_items::Model, ReleaseError> {
        transit::validate_release_quantity(input.quantity)?;

        let txn = self.db.begin().await?;

        tenancy::validate_reference(
            &txn,
            institution_id,
            RefTarget::ReleaseEvent(input.release_event_id),
        )
        .await?;
        tenancy::validate_reference(
            &txn,
            institution_id,
            RefTarget::ShipmentItem(input.shipment_item_id),
        )
        .await?;

        let taken = release_items::Entity::find()
            .filter(release_items::Column::ReleaseEventId.eq(input.release_event_id))
            .filter(release_items::Column::ShipmentItemId.eq(input.shipment_item_id))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(ReleaseError::DuplicateItem {
                release_event_id: input.release_event_id,
                shipment_item_id: input.shipment_item_id,
            });
        }

        let item = release_items::ActiveModel {
            id: NotSet,
            institution_id: Set(institution_id),
            release_event_id: Set(input.release_event_id),
            shipment_item_id: Set(input.shipment_item_id),
            quantity: Set(input.quantity),
            created_at: Set(chrono::Utc::now().into()),
        };

        let item = item.insert(&txn).await?;
        txn.commit().await?;

        Ok(item)
    }

    /// Finds a release event by id within an institution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_scoped(
        &self,
        institution_id: i64,
        id: i64,
    ) -> Result<Option<release_events::Model>, DbErr> {
        release_events::Entity::find_by_id(id)
            .filter(release_events::Column::InstitutionId.eq(institution_id))
            .one(&self.db)
            .await
    }

    /// Finds a release event with its items.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent under this institution.
    pub async fn get_with_items(
        &self,
        institution_id: i64,
        id: i64,
    ) -> Result<(release_events::Model, Vec<release_items::Model>), ReleaseError> {
        let Some(event) = self.find_scoped(institution_id, id).await? else {
            return Err(ReleaseError::NotFound(id));
        };

        let items = release_items::Entity::find()
            .filter(release_items::Column::ReleaseEventId.eq(id))
            .order_by_asc(release_items::Column::Id)
            .all(&self.db)
            .await?;

        Ok((event, items))
    }

    /// Lists release events of an institution, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_institution(
        &self,
        institution_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<release_events::Model>, u64), DbErr> {
        let base = release_events::Entity::find()
            .filter(release_events::Column::InstitutionId.eq(institution_id));

        let total = base.clone().count(&self.db).await?;
        let rows = base
            .order_by_desc(release_events::Column::ReleaseDate)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Lists release events for one shipment within an institution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_shipment(
        &self,
        institution_id: i64,
        shipment_id: i64,
    ) -> Result<Vec<release_events::Model>, DbErr> {
        release_events::Entity::find()
            .filter(release_events::Column::InstitutionId.eq(institution_id))
            .filter(release_events::Column::ShipmentId.eq(shipment_id))
            .order_by_desc(release_events::Column::ReleaseDate)
            .all(&self.db)
            .await
    }

    /// Deletes a release event, cascading its items.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent under this institution.
    pub async fn delete_event(&self, institution_id: i64, id: i64) -> Result<(), ReleaseError> {
        if self.find_scoped(institution_id, id).await?.is_none() {
            return Err(ReleaseError::NotFound(id));
        }

        tenancy::apply_delete_policy(&self.db, DeleteTarget::ReleaseEvent(id)).await?;
        Ok(())
    }

    /// Removes one item from a release event.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if absent under this institution.
    pub async fn remove_item(&self, institution_id: i64, item_id: i64) -> Result<(), ReleaseError> {
        let existing = release_items::Entity::find_by_id(item_id)
            .filter(release_items::Column::InstitutionId.eq(institution_id))
            .one(&self.db)
            .await?;
        if existing.is_none() {
            return Err(ReleaseError::ItemNotFound(item_id));
        }

        release_items::Entity::delete_by_id(item_id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
