//! Per-institution species enablement repository.
//!
//! Links the global catalog to one institution with optional display
//! overrides. The link is what makes a species visible on the tenant's
//! public pages, and its existence blocks catalog deletion.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{butterfly_species, butterfly_species_institution};
use crate::tenancy::{self, TenancyCheckError};
use flutr_core::tenancy::TenancyError;

/// Error types for species link operations.
#[derive(Debug, thiserror::Error)]
pub enum SpeciesLinkError {
    /// The species is already enabled for this institution.
    #[error("Species {species_id} is already enabled for this institution")]
    AlreadyEnabled {
        /// The linked species.
        species_id: i64,
    },

    /// The global species does not exist.
    #[error("Species not found: {0}")]
    SpeciesNotFound(i64),

    /// The link does not exist under this institution.
    #[error("Species link not found: {0}")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SpeciesLinkError> for flutr_shared::AppError {
    fn from(err: SpeciesLinkError) -> Self {
        match &err {
            SpeciesLinkError::AlreadyEnabled { .. } => Self::ConstraintViolation(err.to_string()),
            SpeciesLinkError::SpeciesNotFound(_) | SpeciesLinkError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            SpeciesLinkError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<TenancyCheckError> for SpeciesLinkError {
    fn from(err: TenancyCheckError) -> Self {
        match err {
            TenancyCheckError::Violation(TenancyError::NotFound { reference, .. }) => {
                Self::SpeciesNotFound(reference.parse().unwrap_or_default())
            }
            TenancyCheckError::Violation(v) => Self::Database(DbErr::Custom(v.to_string())),
            TenancyCheckError::Database(e) => Self::Database(e),
        }
    }
}

/// Optional per-institution display overrides.
#[derive(Debug, Clone, Default)]
pub struct SpeciesOverrides {
    /// Common name override.
    pub common_name_override: Option<String>,
    /// Fun facts override.
    pub fun_facts_override: Option<String>,
    /// Habitat override.
    pub habitat_override: Option<String>,
    /// Host plant override.
    pub host_plant_override: Option<String>,
    /// Image override.
    pub image_override: Option<String>,
    /// Lifespan override in days.
    pub lifespan_override: Option<i32>,
}

/// Species link repository, always scoped by institution.
#[derive(Debug, Clone)]
pub struct SpeciesLinkRepository {
    db: DatabaseConnection,
}

impl SpeciesLinkRepository {
    /// Creates a new species link repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enables a species for an institution.
    ///
    /// The existence check and the insert share one transaction so the
    /// species cannot vanish between validation and write.
    ///
    /// # Errors
    ///
    /// Returns `SpeciesNotFound` if the species does not exist and
    /// `AlreadyEnabled` on the (species, institution) uniqueness rule.
    pub async fn enable(
        &self,
        institution_id: i64,
        species_id: i64,
        overrides: SpeciesOverrides,
    ) -> Result<butterfly_species_institution::Model, SpeciesLinkError> {
        let txn = self.db.begin().await?;

        tenancy::validate_species_exists(&txn, species_id).await?;

        let taken = butterfly_species_institution::Entity::find()
            .filter(butterfly_species_institution::Column::ButterflySpeciesId.eq(species_id))
            .filter(butterfly_species_institution::Column::InstitutionId.eq(institution_id))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(SpeciesLinkError::AlreadyEnabled { species_id });
        }

        let now = chrono::Utc::now().into();
        let link = butterfly_species_institution::ActiveModel {
            id: NotSet,
            butterfly_species_id: Set(species_id),
            institution_id: Set(institution_id),
            common_name_override: Set(overrides.common_name_override),
            fun_facts_override: Set(overrides.fun_facts_override),
            habitat_override: Set(overrides.habitat_override),
            host_plant_override: Set(overrides.host_plant_override),
            image_override: Set(overrides.image_override),
            lifespan_override: Set(overrides.lifespan_override),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let link = link.insert(&txn).await?;
        txn.commit().await?;

        Ok(link)
    }

    /// Lists enabled species for an institution, with the catalog rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_institution(
        &self,
        institution_id: i64,
    ) -> Result<
        Vec<(
            butterfly_species_institution::Model,
            Option<butterfly_species::Model>,
        )>,
        DbErr,
    > {
        butterfly_species_institution::Entity::find()
            .filter(butterfly_species_institution::Column::InstitutionId.eq(institution_id))
            .find_also_related(butterfly_species::Entity)
            .order_by_asc(butterfly_species_institution::Column::Id)
            .all(&self.db)
            .await
    }

    /// Updates the overrides on an existing link.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the link does not exist under this institution.
    pub async fn update_overrides(
        &self,
        institution_id: i64,
        link_id: i64,
        overrides: SpeciesOverrides,
    ) -> Result<butterfly_species_institution::Model, SpeciesLinkError> {
        let existing = butterfly_species_institution::Entity::find_by_id(link_id)
            .filter(butterfly_species_institution::Column::InstitutionId.eq(institution_id))
            .one(&self.db)
            .await?;
        let Some(existing) = existing else {
            return Err(SpeciesLinkError::NotFound(link_id));
        };

        let mut model: butterfly_species_institution::ActiveModel = existing.into();
        model.common_name_override = Set(overrides.common_name_override);
        model.fun_facts_override = Set(overrides.fun_facts_override);
        model.habitat_override = Set(overrides.habitat_override);
        model.host_plant_override = Set(overrides.host_plant_override);
        model.image_override = Set(overrides.image_override);
        model.lifespan_override = Set(overrides.lifespan_override);
        model.updated_at = Set(chrono::Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Disables a species for an institution by removing the link.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the link does not exist under this institution.
    pub async fn disable(&self, institution_id: i64, link_id: i64) -> Result<(), SpeciesLinkError> {
        let existing = butterfly_species_institution::Entity::find_by_id(link_id)
            .filter(butterfly_species_institution::Column::InstitutionId.eq(institution_id))
            .one(&self.db)
            .await?;
        if existing.is_none() {
            return Err(SpeciesLinkError::NotFound(link_id));
        }

        butterfly_species_institution::Entity::delete_by_id(link_id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
