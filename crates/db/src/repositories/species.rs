//! Global species catalog repository.
//!
//! The catalog is shared reference data: readable by every tenant, mutable
//! only by catalog managers, and protected from deletion while any tenant
//! row references it.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use flutr_shared::types::PageRequest;

use crate::entities::butterfly_species;
use crate::tenancy::{self, DeleteOutcome, DeleteTarget, TenancyCheckError};
use flutr_core::tenancy::TenancyError;

/// Error types for species catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum SpeciesError {
    /// Scientific name already in the catalog.
    #[error("Species '{0}' already exists")]
    DuplicateScientificName(String),

    /// Species not found.
    #[error("Species not found: {0}")]
    NotFound(i64),

    /// Species is referenced by tenant data and cannot be deleted.
    #[error("Species is referenced by {dependents} row(s) in {dependents_in}")]
    InUse {
        /// Table holding the blocking rows.
        dependents_in: &'static str,
        /// Number of blocking rows.
        dependents: u64,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SpeciesError> for flutr_shared::AppError {
    fn from(err: SpeciesError) -> Self {
        match &err {
            SpeciesError::DuplicateScientificName(_) => Self::ConstraintViolation(err.to_string()),
            SpeciesError::NotFound(_) => Self::NotFound(err.to_string()),
            SpeciesError::InUse { .. } => Self::DeleteBlocked(err.to_string()),
            SpeciesError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<TenancyCheckError> for SpeciesError {
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

/// Input for adding a species to the catalog.
#[derive(Debug, Clone)]
pub struct CreateSpeciesInput {
    /// Scientific name, globally unique.
    pub scientific_name: String,
    /// Common name.
    pub common_name: String,
    /// Taxonomic family.
    pub family: String,
    /// Taxonomic sub-family.
    pub sub_family: String,
    /// Typical adult lifespan in days.
    pub lifespan_days: i32,
    /// Native range region tags.
    pub range: Vec<String>,
    /// Host plant description.
    pub host_plant: Option<String>,
    /// Habitat description.
    pub habitat: Option<String>,
    /// Fun facts for display.
    pub fun_facts: Option<String>,
    /// Image URL, wings open.
    pub img_wings_open: Option<String>,
    /// Image URL, wings closed.
    pub img_wings_closed: Option<String>,
    /// Extra image URL.
    pub extra_img_1: Option<String>,
    /// Extra image URL.
    pub extra_img_2: Option<String>,
}

/// Input for updating a catalog entry.
#[derive(Debug, Clone, Default)]
pub struct UpdateSpeciesInput {
    /// Common name.
    pub common_name: Option<String>,
    /// Taxonomic family.
    pub family: Option<String>,
    /// Taxonomic sub-family.
    pub sub_family: Option<String>,
    /// Typical adult lifespan in days.
    pub lifespan_days: Option<i32>,
    /// Native range region tags.
    pub range: Option<Vec<String>>,
    /// Host plant description (explicit null clears).
    pub host_plant: Option<Option<String>>,
    /// Habitat description.
    pub habitat: Option<Option<String>>,
    /// Fun facts for display.
    pub fun_facts: Option<Option<String>>,
    /// Image URL, wings open.
    pub img_wings_open: Option<Option<String>>,
    /// Image URL, wings closed.
    pub img_wings_closed: Option<Option<String>>,
    /// Extra image URL.
    pub extra_img_1: Option<Option<String>>,
    /// Extra image URL.
    pub extra_img_2: Option<Option<String>>,
}

/// Species catalog repository.
#[derive(Debug, Clone)]
pub struct SpeciesRepository {
    db: DatabaseConnection,
}

impl SpeciesRepository {
    /// Creates a new species repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a species by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<butterfly_species::Model>, DbErr> {
        butterfly_species::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists the catalog with pagination and an optional name search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        page: &PageRequest,
        search: Option<&str>,
    ) -> Result<(Vec<butterfly_species::Model>, u64), DbErr> {
        let mut query = butterfly_species::Entity::find();

        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(butterfly_species::Column::ScientificName.contains(term))
                    .add(butterfly_species::Column::CommonName.contains(term)),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_asc(butterfly_species::Column::ScientificName)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Adds a species to the global catalog.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateScientificName` if the name is already present.
    pub async fn create(
        &self,
        input: CreateSpeciesInput,
    ) -> Result<butterfly_species::Model, SpeciesError> {
        let taken = butterfly_species::Entity::find()
            .filter(butterfly_species::Column::ScientificName.eq(input.scientific_name.as_str()))
            .count(&self.db)
            .await?;
        if taken > 0 {
            return Err(SpeciesError::DuplicateScientificName(input.scientific_name));
        }

        let now = chrono::Utc::now().into();
        let species = butterfly_species::ActiveModel {
            id: NotSet,
            scientific_name: Set(input.scientific_name),
            common_name: Set(input.common_name),
            family: Set(input.family),
            sub_family: Set(input.sub_family),
            lifespan_days: Set(input.lifespan_days),
            range: Set(input.range),
            host_plant: Set(input.host_plant),
            habitat: Set(input.habitat),
            fun_facts: Set(input.fun_facts),
            img_wings_open: Set(input.img_wings_open),
            img_wings_closed: Set(input.img_wings_closed),
            extra_img_1: Set(input.extra_img_1),
            extra_img_2: Set(input.extra_img_2),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(species.insert(&self.db).await?)
    }

    /// Updates a catalog entry. The scientific name is immutable; it is the
    /// stable identifier tenant data hangs off.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the species does not exist.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateSpeciesInput,
    ) -> Result<butterfly_species::Model, SpeciesError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Err(SpeciesError::NotFound(id));
        };

        let mut model: butterfly_species::ActiveModel = existing.into();
        if let Some(common_name) = input.common_name {
            model.common_name = Set(common_name);
        }
        if let Some(family) = input.family {
            model.family = Set(family);
        }
        if let Some(sub_family) = input.sub_family {
            model.sub_family = Set(sub_family);
        }
        if let Some(lifespan_days) = input.lifespan_days {
            model.lifespan_days = Set(lifespan_days);
        }
        if let Some(range) = input.range {
            model.range = Set(range);
        }
        if let Some(host_plant) = input.host_plant {
            model.host_plant = Set(host_plant);
        }
        if let Some(habitat) = input.habitat {
            model.habitat = Set(habitat);
        }
        if let Some(fun_facts) = input.fun_facts {
            model.fun_facts = Set(fun_facts);
        }
        if let Some(img_wings_open) = input.img_wings_open {
            model.img_wings_open = Set(img_wings_open);
        }
        if let Some(img_wings_closed) = input.img_wings_closed {
            model.img_wings_closed = Set(img_wings_closed);
        }
        if let Some(extra_img_1) = input.extra_img_1 {
            model.extra_img_1 = Set(extra_img_1);
        }
        if let Some(extra_img_2) = input.extra_img_2 {
            model.extra_img_2 = Set(extra_img_2);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes a species, restricted while any tenant row references it.
    ///
    /// # Errors
    ///
    /// Returns `InUse` when blocked and `NotFound` when absent. On a
    /// blocked delete no row is touched.
    pub async fn delete(&self, id: i64) -> Result<(), SpeciesError> {
        match tenancy::apply_delete_policy(&self.db, DeleteTarget::Species(id)).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::Blocked {
                dependents_in,
                dependents,
            } => Err(SpeciesError::InUse {
                dependents_in,
                dependents,
            }),
        }
    }
}
