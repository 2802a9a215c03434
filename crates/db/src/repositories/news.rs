//! Institution news repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use flutr_shared::types::PageRequest;

use crate::entities::institution_news;

/// Error types for news operations.
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    /// News entry not found under this institution.
    #[error("News entry not found: {0}")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<NewsError> for flutr_shared::AppError {
    fn from(err: NewsError) -> Self {
        match &err {
            NewsError::NotFound(_) => Self::NotFound(err.to_string()),
            NewsError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a news entry.
#[derive(Debug, Clone)]
pub struct CreateNewsInput {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Optional image URL.
    pub image_url: Option<String>,
}

/// Input for updating a news entry.
#[derive(Debug, Clone, Default)]
pub struct UpdateNewsInput {
    /// Headline.
    pub title: Option<String>,
    /// Body text.
    pub content: Option<String>,
    /// Optional image URL (explicit null clears).
    pub image_url: Option<Option<String>>,
    /// Whether the entry is shown.
    pub is_active: Option<bool>,
}

/// News repository for CRUD operations, always scoped by institution.
#[derive(Debug, Clone)]
pub struct NewsRepository {
    db: DatabaseConnection,
}

impl NewsRepository {
    /// Creates a new news repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a news entry for an institution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        institution_id: i64,
        input: CreateNewsInput,
    ) -> Result<institution_news::Model, NewsError> {
        let now = chrono::Utc::now().into();
        let entry = institution_news::ActiveModel {
            id: NotSet,
            institution_id: Set(institution_id),
            title: Set(input.title),
            content: Set(input.content),
            image_url: Set(input.image_url),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(entry.insert(&self.db).await?)
    }

    /// Finds a news entry by id within an institution.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_scoped(
        &self,
        institution_id: i64,
        id: i64,
    ) -> Result<Option<institution_news::Model>, DbErr> {
        institution_news::Entity::find_by_id(id)
            .filter(institution_news::Column::InstitutionId.eq(institution_id))
            .one(&self.db)
            .await
    }

    /// Lists news entries for an institution, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_institution(
        &self,
        institution_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<institution_news::Model>, u64), DbErr> {
        let base = institution_news::Entity::find()
            .filter(institution_news::Column::InstitutionId.eq(institution_id));

        let total = base.clone().count(&self.db).await?;
        let rows = base
            .order_by_desc(institution_news::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Returns the most recent active entry, for the public front page.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn latest_active(
        &self,
        institution_id: i64,
    ) -> Result<Option<institution_news::Model>, DbErr> {
        institution_news::Entity::find()
            .filter(institution_news::Column::InstitutionId.eq(institution_id))
            .filter(institution_news::Column::IsActive.eq(true))
            .order_by_desc(institution_news::Column::CreatedAt)
            .one(&self.db)
            .await
    }

    /// Updates a news entry within an institution.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist under this institution.
    pub async fn update(
        &self,
        institution_id: i64,
        id: i64,
        input: UpdateNewsInput,
    ) -> Result<institution_news::Model, NewsError> {
        let Some(existing) = self.find_scoped(institution_id, id).await? else {
            return Err(NewsError::NotFound(id));
        };

        let mut model: institution_news::ActiveModel = existing.into();
        if let Some(title) = input.title {
            model.title = Set(title);
        }
        if let Some(content) = input.content {
            model.content = Set(content);
        }
        if let Some(image_url) = input.image_url {
            model.image_url = Set(image_url);
        }
        if let Some(is_active) = input.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(chrono::Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes a news entry within an institution.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist under this institution.
    pub async fn delete(&self, institution_id: i64, id: i64) -> Result<(), NewsError> {
        let Some(existing) = self.find_scoped(institution_id, id).await? else {
            return Err(NewsError::NotFound(id));
        };

        institution_news::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
