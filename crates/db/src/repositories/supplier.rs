//! Supplier repository for database operations.
//!
//! Suppliers are tenant-scoped and soft-deletable: "delete" in the UI means
//! `is_active = false`. A supplier whose code appears on shipments can be
//! deactivated but never hard-deleted or renamed away.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{shipments, suppliers};
use crate::tenancy::{self, DeleteOutcome, DeleteTarget, TenancyCheckError};
use flutr_core::tenancy::TenancyError;

/// Error types for supplier operations.
#[derive(Debug, thiserror::Error)]
pub enum SupplierError {
    /// Code already taken within this institution.
    #[error("Supplier code '{0}' already exists for this institution")]
    DuplicateCode(String),

    /// Supplier not found under this institution.
    #[error("Supplier not found: {0}")]
    NotFound(i64),

    /// The supplier's code is referenced by shipments.
    #[error("Supplier code '{code}' is referenced by {shipments} shipment(s)")]
    CodeInUse {
        /// The referenced code.
        code: String,
        /// Number of referencing shipments.
        shipments: u64,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SupplierError> for flutr_shared::AppError {
    fn from(err: SupplierError) -> Self {
        match &err {
            SupplierError::DuplicateCode(_) => Self::ConstraintViolation(err.to_string()),
            SupplierError::NotFound(_) => Self::NotFound(err.to_string()),
            SupplierError::CodeInUse { .. } => Self::DeleteBlocked(err.to_string()),
            SupplierError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<TenancyCheckError> for SupplierError {
    fn from(err: TenancyCheckError) -> Self {
        match err {
            TenancyCheckError::Violation(TenancyError::NotFound { reference, .. }) => {
                Self::NotFound(reference.parse().unwrap_or_default())
            }
            TenancyCheckError::Violation(v) => Self::Database(DbErr::Custom(v.to_string())),
            TenancyCheckError::Database(e) => Self::Database(e),
        }
    }
}

/// Input for creating a supplier.
#[derive(Debug, Clone)]
pub struct CreateSupplierInput {
    /// Supplier display name.
    pub name: String,
    /// Abbreviation/code used on USDA and Excel imports (e.g. "LPS").
    pub code: String,
    /// Country of origin.
    pub country: String,
    /// Optional website URL.
    pub website_url: Option<String>,
}

/// Input for updating a supplier.
#[derive(Debug, Clone, Default)]
pub struct UpdateSupplierInput {
    /// Supplier display name.
    pub name: Option<String>,
    /// Abbreviation/code; renaming is rejected while shipments use it.
    pub code: Option<String>,
    /// Country of origin.
    pub country: Option<String>,
    /// Optional website URL (explicit null clears).
    pub website_url: Option<Option<String>>,
}

/// Supplier repository, always scoped by institution.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    db: DatabaseConnection,
}

impl SupplierRepository {
    /// Creates a new supplier repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a supplier by id within an institution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_scoped(
        &self,
        institution_id: i64,
        id: i64,
    ) -> Result<Option<suppliers::Model>, DbErr> {
        suppliers::Entity::find_by_id(id)
            .filter(suppliers::Column::InstitutionId.eq(institution_id))
            .one(&self.db)
            .await
    }

    /// Lists suppliers of an institution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_institution(
        &self,
        institution_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<suppliers::Model>, DbErr> {
        let mut query = suppliers::Entity::find()
            .filter(suppliers::Column::InstitutionId.eq(institution_id));

        if !include_inactive {
            query = query.filter(suppliers::Column::IsActive.eq(true));
        }

        query.order_by_asc(suppliers::Column::Code).all(&self.db).await
    }

    /// Creates a supplier under an institution.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCode` on the (institution, code) uniqueness rule.
    pub async fn create(
        &self,
        institution_id: i64,
        input: CreateSupplierInput,
    ) -> Result<suppliers::Model, SupplierError> {
        let taken = suppliers::Entity::find()
            .filter(suppliers::Column::InstitutionId.eq(institution_id))
            .filter(suppliers::Column::Code.eq(input.code.as_str()))
            .count(&self.db)
            .await?;
        if taken > 0 {
            return Err(SupplierError::DuplicateCode(input.code));
        }

        let now = chrono::Utc::now().into();
        let supplier = suppliers::ActiveModel {
            id: NotSet,
            institution_id: Set(institution_id),
            name: Set(input.name),
            code: Set(input.code),
            country: Set(input.country),
            website_url: Set(input.website_url),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(supplier.insert(&self.db).await?)
    }

    /// Updates a supplier within an institution.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent under this institution, `CodeInUse` when
    /// renaming a code that shipments reference, and `DuplicateCode` when
    /// the new code is taken.
    pub async fn update(
        &self,
        institution_id: i64,
        id: i64,
        input: UpdateSupplierInput,
    ) -> Result<suppliers::Model, SupplierError> {
        let Some(existing) = self.find_scoped(institution_id, id).await? else {
            return Err(SupplierError::NotFound(id));
        };

        if let Some(new_code) = &input.code {
            if *new_code != existing.code {
                let in_use = shipments::Entity::find()
                    .filter(shipments::Column::InstitutionId.eq(institution_id))
                    .filter(shipments::Column::SupplierCode.eq(existing.code.as_str()))
                    .count(&self.db)
                    .await?;
                if in_use > 0 {
                    return Err(SupplierError::CodeInUse {
                        code: existing.code,
                        shipments: in_use,
                    });
                }

                let taken = suppliers::Entity::find()
                    .filter(suppliers::Column::InstitutionId.eq(institution_id))
                    .filter(suppliers::Column::Code.eq(new_code.as_str()))
                    .count(&self.db)
                    .await?;
                if taken > 0 {
                    return Err(SupplierError::DuplicateCode(new_code.clone()));
                }
            }
        }

        let mut model: suppliers::ActiveModel = existing.into();
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(code) = input.code {
            model.code = Set(code);
        }
        if let Some(country) = input.country {
            model.country = Set(country);
        }
        if let Some(website_url) = input.website_url {
            model.website_url = Set(website_url);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deactivates a supplier (soft delete). Idempotent: deactivating an
    /// already-inactive supplier changes nothing, and historical shipments
    /// referencing the code are untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent under this institution.
    pub async fn deactivate(
        &self,
        institution_id: i64,
        id: i64,
    ) -> Result<suppliers::Model, SupplierError> {
        let Some(existing) = self.find_scoped(institution_id, id).await? else {
            return Err(SupplierError::NotFound(id));
        };

        if !existing.is_active {
            return Ok(existing);
        }

        let mut model: suppliers::ActiveModel = existing.into();
        model.is_active = Set(false);
        model.updated_at = Set(chrono::Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Hard-deletes a supplier, restricted while its code is in use.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent under this institution and `CodeInUse`
    /// when shipments still reference the code.
    pub async fn delete(&self, institution_id: i64, id: i64) -> Result<(), SupplierError> {
        let Some(existing) = self.find_scoped(institution_id, id).await? else {
            return Err(SupplierError::NotFound(id));
        };

        match tenancy::apply_delete_policy(&self.db, DeleteTarget::Supplier(id)).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::Blocked { dependents, .. } => Err(SupplierError::CodeInUse {
                code: existing.code,
                shipments: dependents,
            }),
        }
    }
}
