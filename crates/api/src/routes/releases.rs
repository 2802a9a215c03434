//! Release event routes, scoped to the session's institution.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;

use crate::middleware::AuthUser;
use crate::{AppState, routes::error_response};
use flutr_db::ReleaseRepository;
use flutr_db::repositories::{AddReleaseItemInput, CreateReleaseEventInput};
use flutr_shared::AppError;
use flutr_shared::types::{PageRequest, PageResponse};

/// Creates the release router (requires auth middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/releases", get(list_releases))
        .route("/releases", post(create_release))
        .route("/releases/{release_id}", get(get_release))
        .route("/releases/{release_id}", delete(delete_release))
        .route("/releases/{release_id}/items", post(add_item))
        .route("/releases/items/{item_id}", delete(remove_item))
        .route("/shipments/{shipment_id}/releases", get(list_for_shipment))
}

/// Request body for creating a release event.
#[derive(Debug, serde::Deserialize)]
pub struct CreateReleaseRequest {
    /// Shipment being released.
    pub shipment_id: i64,
    /// Date of the release.
    pub release_date: chrono::DateTime<chrono::FixedOffset>,
    /// Name label of whoever performed the release; stored as a snapshot.
    pub released_by: String,
}

/// Request body for adding a release item.
#[derive(Debug, serde::Deserialize)]
pub struct AddReleaseItemRequest {
    /// Shipment line item released against.
    pub shipment_item_id: i64,
    /// Quantity released; strictly positive.
    pub quantity: i32,
}

/// GET /releases - List the institution's release events.
async fn list_releases(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let repo = ReleaseRepository::new((*state.db).clone());
    match repo.list_for_institution(auth.institution_id(), &page).await {
        Ok((rows, total)) => {
            (StatusCode::OK, Json(PageResponse::new(rows, &page, total))).into_response()
        }
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// GET `/shipments/{shipment_id}/releases` - Release events for a shipment.
async fn list_for_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(shipment_id): Path<i64>,
) -> impl IntoResponse {
    let repo = ReleaseRepository::new((*state.db).clone());
    match repo
        .list_for_shipment(auth.institution_id(), shipment_id)
        .await
    {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// POST /releases - Record a release event.
async fn create_release(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateReleaseRequest>,
) -> impl IntoResponse {
    let repo = ReleaseRepository::new((*state.db).clone());
    let result = repo
        .create_event(
            auth.institution_id(),
            CreateReleaseEventInput {
                shipment_id: payload.shipment_id,
                release_date: payload.release_date,
                released_by: payload.released_by,
            },
        )
        .await;

    match result {
        Ok(event) => (StatusCode::CREATED, Json(event)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// GET `/releases/{release_id}` - A release event with its items.
async fn get_release(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(release_id): Path<i64>,
) -> impl IntoResponse {
    let repo = ReleaseRepository::new((*state.db).clone());
    match repo.get_with_items(auth.institution_id(), release_id).await {
        Ok((event, items)) => (
            StatusCode::OK,
            Json(json!({ "release": event, "items": items })),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/releases/{release_id}/items` - Commit a quantity against a
/// shipment line item.
async fn add_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(release_id): Path<i64>,
    Json(payload): Json<AddReleaseItemRequest>,
) -> impl IntoResponse {
    let repo = ReleaseRepository::new((*state.db).clone());
    let result = repo
        .add_item(
            auth.institution_id(),
            AddReleaseItemInput {
                release_event_id: release_id,
                shipment_item_id: payload.shipment_item_id,
                quantity: payload.quantity,
            },
        )
        .await;

    match result {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/releases/{release_id}` - Delete a release event and its items.
async fn delete_release(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(release_id): Path<i64>,
) -> impl IntoResponse {
    let repo = ReleaseRepository::new((*state.db).clone());
    match repo.delete_event(auth.institution_id(), release_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/releases/items/{item_id}` - Remove one release item.
async fn remove_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(item_id): Path<i64>,
) -> impl IntoResponse {
    let repo = ReleaseRepository::new((*state.db).clone());
    match repo.remove_item(auth.institution_id(), item_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e.into()),
    }
}
