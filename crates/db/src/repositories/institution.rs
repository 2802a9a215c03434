//! Institution repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use flutr_shared::types::PageRequest;

use crate::entities::institutions;
use crate::tenancy::{self, DeleteTarget, TenancyCheckError};
use flutr_core::tenancy::TenancyError;

/// Error types for institution operations.
#[derive(Debug, thiserror::Error)]
pub enum InstitutionError {
    /// Slug already taken.
    #[error("Institution slug '{0}' already exists")]
    DuplicateSlug(String),

    /// Contact email already taken by another institution.
    #[error("Institution email '{0}' already exists")]
    DuplicateEmail(String),

    /// Institution not found.
    #[error("Institution not found: {0}")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<InstitutionError> for flutr_shared::AppError {
    fn from(err: InstitutionError) -> Self {
        match &err {
            InstitutionError::DuplicateSlug(_) | InstitutionError::DuplicateEmail(_) => {
                Self::ConstraintViolation(err.to_string())
            }
            InstitutionError::NotFound(_) => Self::NotFound(err.to_string()),
            InstitutionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<TenancyCheckError> for InstitutionError {
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

/// Input for provisioning an institution.
#[derive(Debug, Clone)]
pub struct CreateInstitutionInput {
    /// URL-safe unique slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Street address.
    pub street_address: String,
    /// Additional address line.
    pub extended_address: Option<String>,
    /// City.
    pub city: String,
    /// State or province.
    pub state_province: String,
    /// Postal code.
    pub postal_code: String,
    /// IANA time zone.
    pub time_zone: Option<String>,
    /// Country.
    pub country: String,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Contact email (unique across institutions).
    pub email_address: Option<String>,
    /// IABES membership flag.
    pub iabes_member: bool,
    /// Theme colors for the public site.
    pub theme_colors: Option<Vec<String>>,
    /// Public website URL.
    pub website_url: Option<String>,
    /// Facility photo URL.
    pub facility_image_url: Option<String>,
    /// Logo URL.
    pub logo_url: Option<String>,
    /// Public description.
    pub description: Option<String>,
    /// Social media links.
    pub social_links: Option<serde_json::Value>,
}

/// Input for updating an institution.
#[derive(Debug, Clone, Default)]
pub struct UpdateInstitutionInput {
    /// Display name.
    pub name: Option<String>,
    /// Street address.
    pub street_address: Option<String>,
    /// Additional address line (explicit null clears).
    pub extended_address: Option<Option<String>>,
    /// City.
    pub city: Option<String>,
    /// State or province.
    pub state_province: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// IANA time zone.
    pub time_zone: Option<Option<String>>,
    /// Country.
    pub country: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<Option<String>>,
    /// IABES membership flag.
    pub iabes_member: Option<bool>,
    /// Theme colors.
    pub theme_colors: Option<Option<Vec<String>>>,
    /// Public website URL.
    pub website_url: Option<Option<String>>,
    /// Facility photo URL.
    pub facility_image_url: Option<Option<String>>,
    /// Logo URL.
    pub logo_url: Option<Option<String>>,
    /// Public description.
    pub description: Option<Option<String>>,
    /// Social media links.
    pub social_links: Option<Option<serde_json::Value>>,
    /// Whether public stats pages are shown.
    pub stats_active: Option<bool>,
}

/// Institution repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct InstitutionRepository {
    db: DatabaseConnection,
}

impl InstitutionRepository {
    /// Creates a new institution repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an institution by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<institutions::Model>, DbErr> {
        institutions::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an institution by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<institutions::Model>, DbErr> {
        institutions::Entity::find()
            .filter(institutions::Column::Slug.eq(slug))
            .one(&self.db)
            .await
    }

    /// Checks if a slug is already taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, DbErr> {
        let count = institutions::Entity::find()
            .filter(institutions::Column::Slug.eq(slug))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Lists institutions with pagination, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<institutions::Model>, u64), DbErr> {
        let total = institutions::Entity::find().count(&self.db).await?;
        let rows = institutions::Entity::find()
            .order_by_desc(institutions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Provisions a new institution.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSlug` or `DuplicateEmail` if the uniqueness
    /// constraints would fire.
    pub async fn create(
        &self,
        input: CreateInstitutionInput,
    ) -> Result<institutions::Model, InstitutionError> {
        if self.slug_exists(&input.slug).await? {
            return Err(InstitutionError::DuplicateSlug(input.slug));
        }

        if let Some(email) = &input.email_address {
            let taken = institutions::Entity::find()
                .filter(institutions::Column::EmailAddress.eq(email))
                .count(&self.db)
                .await?;
            if taken > 0 {
                return Err(InstitutionError::DuplicateEmail(email.clone()));
            }
        }

        let now = chrono::Utc::now().into();
        let institution = institutions::ActiveModel {
            id: NotSet,
            slug: Set(input.slug),
            name: Set(input.name),
            street_address: Set(input.street_address),
            extended_address: Set(input.extended_address),
            city: Set(input.city),
            state_province: Set(input.state_province),
            postal_code: Set(input.postal_code),
            time_zone: Set(input.time_zone),
            country: Set(input.country),
            phone_number: Set(input.phone_number),
            email_address: Set(input.email_address),
            iabes_member: Set(input.iabes_member),
            theme_colors: Set(input.theme_colors),
            website_url: Set(input.website_url),
            facility_image_url: Set(input.facility_image_url),
            logo_url: Set(input.logo_url),
            description: Set(input.description),
            social_links: Set(input.social_links),
            stats_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(institution.insert(&self.db).await?)
    }

    /// Updates an institution.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the institution does not exist.
    #[allow(clippy::too_many_lines)]
    pub async fn update(
        &self,
        id: i64,
        input: UpdateInstitutionInput,
    ) -> Result<institutions::Model, InstitutionError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Err(InstitutionError::NotFound(id));
        };

        let mut model: institutions::ActiveModel = existing.into();

        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(street_address) = input.street_address {
            model.street_address = Set(street_address);
        }
        if let Some(extended_address) = input.extended_address {
            model.extended_address = Set(extended_address);
        }
        if let Some(city) = input.city {
            model.city = Set(city);
        }
        if let Some(state_province) = input.state_province {
            model.state_province = Set(state_province);
        }
        if let Some(postal_code) = input.postal_code {
            model.postal_code = Set(postal_code);
        }
        if let Some(time_zone) = input.time_zone {
            model.time_zone = Set(time_zone);
        }
        if let Some(country) = input.country {
            model.country = Set(country);
        }
        if let Some(phone_number) = input.phone_number {
            model.phone_number = Set(phone_number);
        }
        if let Some(iabes_member) = input.iabes_member {
            model.iabes_member = Set(iabes_member);
        }
        if let Some(theme_colors) = input.theme_colors {
            model.theme_colors = Set(theme_colors);
        }
        if let Some(website_url) = input.website_url {
            model.website_url = Set(website_url);
        }
        if let Some(facility_image_url) = input.facility_image_url {
            model.facility_image_url = Set(facility_image_url);
        }
        if let Some(logo_url) = input.logo_url {
            model.logo_url = Set(logo_url);
        }
        if let Some(description) = input.description {
            model.description = Set(description);
        }
        if let Some(social_links) = input.social_links {
            model.social_links = Set(social_links);
        }
        if let Some(stats_active) = input.stats_active {
            model.stats_active = Set(stats_active);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes an institution, cascading every tenant-owned row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the institution does not exist.
    pub async fn delete(&self, id: i64) -> Result<(), InstitutionError> {
        // Cascade policy: never blocked, everything the tenant owns goes.
        tenancy::apply_delete_policy(&self.db, DeleteTarget::Institution(id)).await?;
        Ok(())
    }
}
