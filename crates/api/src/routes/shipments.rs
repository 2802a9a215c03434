//! Shipment routes, scoped to the session's institution.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde_json::json;

use crate::middleware::AuthUser;
use crate::{AppState, routes::error_response};
use flutr_core::transit::TransitCounts;
use flutr_db::ShipmentRepository;
use flutr_db::repositories::{
    AddShipmentItemInput, CreateShipmentInput, UpdateShipmentItemInput,
};
use flutr_shared::AppError;
use flutr_shared::types::{PageRequest, PageResponse};

/// Creates the shipment router (requires auth middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shipments", get(list_shipments))
        .route("/shipments", post(create_shipment))
        .route("/shipments/{shipment_id}", get(get_shipment))
        .route("/shipments/{shipment_id}", delete(delete_shipment))
        .route("/shipments/{shipment_id}/items", post(add_item))
        .route("/shipments/items/{item_id}", patch(update_item))
        .route("/shipments/items/{item_id}", delete(delete_item))
}

/// Request body for creating a shipment.
#[derive(Debug, serde::Deserialize)]
pub struct CreateShipmentRequest {
    /// Supplier code; must exist for the session's institution.
    pub supplier_code: String,
    /// Date the shipment left the supplier.
    pub shipment_date: chrono::DateTime<chrono::FixedOffset>,
    /// Date the shipment arrived.
    pub arrival_date: chrono::DateTime<chrono::FixedOffset>,
}

/// Request body for adding a line item.
#[derive(Debug, serde::Deserialize)]
pub struct AddItemRequest {
    /// Global species id.
    pub butterfly_species_id: i64,
    /// Pupae received.
    pub number_received: i32,
    /// Transit quality counters (each defaults to zero).
    #[serde(flatten)]
    pub counts: TransitCounts,
}

/// Request body for updating a line item.
#[derive(Debug, Default, serde::Deserialize)]
pub struct UpdateItemRequest {
    /// Pupae received.
    pub number_received: Option<i32>,
    /// Transit quality counters, replaced wholesale when present.
    pub counts: Option<TransitCounts>,
}

/// GET /shipments - List the institution's shipments.
async fn list_shipments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new((*state.db).clone());
    match repo.list_for_institution(auth.institution_id(), &page).await {
        Ok((rows, total)) => {
            (StatusCode::OK, Json(PageResponse::new(rows, &page, total))).into_response()
        }
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// POST /shipments - Record a shipment for the session's institution.
async fn create_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateShipmentRequest>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new((*state.db).clone());
    let result = repo
        .create(
            auth.institution_id(),
            CreateShipmentInput {
                supplier_code: payload.supplier_code,
                shipment_date: payload.shipment_date,
                arrival_date: payload.arrival_date,
            },
        )
        .await;

    match result {
        Ok(shipment) => (StatusCode::CREATED, Json(shipment)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// GET `/shipments/{shipment_id}` - A shipment with its line items.
async fn get_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(shipment_id): Path<i64>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new((*state.db).clone());
    match repo.get_with_items(auth.institution_id(), shipment_id).await {
        Ok((shipment, items)) => (
            StatusCode::OK,
            Json(json!({ "shipment": shipment, "items": items })),
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/shipments/{shipment_id}/items` - Add a line item.
async fn add_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(shipment_id): Path<i64>,
    Json(payload): Json<AddItemRequest>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new((*state.db).clone());
    let result = repo
        .add_item(
            auth.institution_id(),
            AddShipmentItemInput {
                shipment_id,
                butterfly_species_id: payload.butterfly_species_id,
                number_received: payload.number_received,
                counts: payload.counts,
            },
        )
        .await;

    match result {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// PATCH `/shipments/items/{item_id}` - Update a line item.
async fn update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(item_id): Path<i64>,
    Json(payload): Json<UpdateItemRequest>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new((*state.db).clone());
    let result = repo
        .update_item(
            auth.institution_id(),
            item_id,
            UpdateShipmentItemInput {
                number_received: payload.number_received,
                counts: payload.counts,
            },
        )
        .await;

    match result {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/shipments/{shipment_id}` - Delete a shipment and its dependents.
async fn delete_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(shipment_id): Path<i64>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new((*state.db).clone());
    match repo.delete(auth.institution_id(), shipment_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/shipments/items/{item_id}` - Delete a line item; rejected while
/// release quantities are committed against it.
async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(item_id): Path<i64>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new((*state.db).clone());
    match repo.delete_item(auth.institution_id(), item_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e.into()),
    }
}
