//! User repository for database operations.
//!
//! Login lookup is global by email on purpose: the institution is not known
//! at login time, so the email is resolved across all tenants and the
//! institution comes back with the row.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use flutr_shared::UserRole;

use crate::entities::{institutions, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email already registered under this institution.
    #[error("Email '{email}' already exists for this institution")]
    DuplicateEmail {
        /// The conflicting email.
        email: String,
    },

    /// The owning institution does not exist.
    #[error("Institution not found: {0}")]
    InstitutionNotFound(i64),

    /// User not found under this institution.
    #[error("User not found: {0}")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<UserError> for flutr_shared::AppError {
    fn from(err: UserError) -> Self {
        match &err {
            UserError::DuplicateEmail { .. } => Self::ConstraintViolation(err.to_string()),
            UserError::InstitutionNotFound(_) | UserError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            UserError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Owning institution.
    pub institution_id: i64,
    /// Display name.
    pub name: String,
    /// Login email; unique per institution, not globally.
    pub email: String,
    /// Opaque password hash (PHC string).
    pub password_hash: String,
    /// Application-layer role.
    pub role: UserRole,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email, across all institutions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new user under an institution.
    ///
    /// # Errors
    ///
    /// Returns `InstitutionNotFound` if the institution does not exist and
    /// `DuplicateEmail` if the (institution, email) pair is taken.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, UserError> {
        let institution = institutions::Entity::find_by_id(input.institution_id)
            .one(&self.db)
            .await?;
        if institution.is_none() {
            return Err(UserError::InstitutionNotFound(input.institution_id));
        }

        // unique_user_email_per_institution; the same email is legal under
        // a different institution.
        let taken = users::Entity::find()
            .filter(users::Column::InstitutionId.eq(input.institution_id))
            .filter(users::Column::Email.eq(input.email.as_str()))
            .count(&self.db)
            .await?;
        if taken > 0 {
            return Err(UserError::DuplicateEmail { email: input.email });
        }

        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: NotSet,
            name: Set(input.name),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            institution_id: Set(input.institution_id),
            role: Set(input.role.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Lists users of an institution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_institution(
        &self,
        institution_id: i64,
    ) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::InstitutionId.eq(institution_id))
            .order_by_asc(users::Column::Name)
            .all(&self.db)
            .await
    }

    /// Changes a user's role within an institution.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist under this institution.
    pub async fn update_role(
        &self,
        institution_id: i64,
        user_id: i64,
        role: UserRole,
    ) -> Result<users::Model, UserError> {
        let existing = users::Entity::find_by_id(user_id)
            .filter(users::Column::InstitutionId.eq(institution_id))
            .one(&self.db)
            .await?;
        let Some(existing) = existing else {
            return Err(UserError::NotFound(user_id));
        };

        let mut model: users::ActiveModel = existing.into();
        model.role = Set(role.as_str().to_string());
        model.updated_at = Set(chrono::Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes a user within an institution.
    ///
    /// Release audit labels are plain text snapshots, so past release
    /// events keep their "released by" name after the account goes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist under this institution.
    pub async fn delete(&self, institution_id: i64, user_id: i64) -> Result<(), UserError> {
        let existing = users::Entity::find_by_id(user_id)
            .filter(users::Column::InstitutionId.eq(institution_id))
            .one(&self.db)
            .await?;
        if existing.is_none() {
            return Err(UserError::NotFound(user_id));
        }

        users::Entity::delete_by_id(user_id).exec(&self.db).await?;
        Ok(())
    }
}
