//! Institution news routes, scoped to the session's institution.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};

use crate::middleware::AuthUser;
use crate::{AppState, routes::error_response};
use flutr_db::NewsRepository;
use flutr_db::repositories::{CreateNewsInput, UpdateNewsInput};
use flutr_shared::AppError;
use flutr_shared::types::{PageRequest, PageResponse};

/// Creates the news router (requires auth middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/news", get(list_news))
        .route("/news", post(create_news))
        .route("/news/latest", get(latest_news))
        .route("/news/{news_id}", patch(update_news))
        .route("/news/{news_id}", delete(delete_news))
}

/// Request body for creating a news entry.
#[derive(Debug, serde::Deserialize)]
pub struct CreateNewsRequest {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Optional image URL.
    pub image_url: Option<String>,
}

/// Request body for updating a news entry.
#[derive(Debug, Default, serde::Deserialize)]
pub struct UpdateNewsRequest {
    /// Headline.
    pub title: Option<String>,
    /// Body text.
    pub content: Option<String>,
    /// Optional image URL.
    pub image_url: Option<String>,
    /// Whether the entry is shown.
    pub is_active: Option<bool>,
}

/// GET /news - List the institution's news entries.
async fn list_news(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let repo = NewsRepository::new((*state.db).clone());
    match repo.list_for_institution(auth.institution_id(), &page).await {
        Ok((rows, total)) => {
            (StatusCode::OK, Json(PageResponse::new(rows, &page, total))).into_response()
        }
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// GET /news/latest - The most recent active entry.
async fn latest_news(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = NewsRepository::new((*state.db).clone());
    match repo.latest_active(auth.institution_id()).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// POST /news - Create a news entry under the session's institution.
async fn create_news(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateNewsRequest>,
) -> impl IntoResponse {
    let repo = NewsRepository::new((*state.db).clone());
    let result = repo
        .create(
            auth.institution_id(),
            CreateNewsInput {
                title: payload.title,
                content: payload.content,
                image_url: payload.image_url,
            },
        )
        .await;

    match result {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// PATCH `/news/{news_id}` - Update a news entry.
async fn update_news(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(news_id): Path<i64>,
    Json(payload): Json<UpdateNewsRequest>,
) -> impl IntoResponse {
    let repo = NewsRepository::new((*state.db).clone());
    let result = repo
        .update(
            auth.institution_id(),
            news_id,
            UpdateNewsInput {
                title: payload.title,
                content: payload.content,
                image_url: payload.image_url.map(Some),
                is_active: payload.is_active,
            },
        )
        .await;

    match result {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/news/{news_id}` - Delete a news entry.
async fn delete_news(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(news_id): Path<i64>,
) -> impl IntoResponse {
    let repo = NewsRepository::new((*state.db).clone());
    match repo.delete(auth.institution_id(), news_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e.into()),
    }
}
