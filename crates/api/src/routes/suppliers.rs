//! Supplier routes, scoped to the session's institution.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};

use crate::middleware::AuthUser;
use crate::{AppState, routes::error_response};
use flutr_db::SupplierRepository;
use flutr_db::repositories::{CreateSupplierInput, UpdateSupplierInput};
use flutr_shared::AppError;

/// Creates the supplier router (requires auth middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers))
        .route("/suppliers", post(create_supplier))
        .route("/suppliers/{supplier_id}", get(get_supplier))
        .route("/suppliers/{supplier_id}", patch(update_supplier))
        .route("/suppliers/{supplier_id}/deactivate", post(deactivate_supplier))
        .route("/suppliers/{supplier_id}", delete(delete_supplier))
}

/// Query parameters for the supplier listing.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ListSuppliersQuery {
    /// Include soft-deleted suppliers.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request body for creating a supplier.
#[derive(Debug, serde::Deserialize)]
pub struct CreateSupplierRequest {
    /// Supplier display name.
    pub name: String,
    /// Abbreviation/code used on imports (e.g. "LPS").
    pub code: String,
    /// Country of origin.
    pub country: String,
    /// Optional website URL.
    pub website_url: Option<String>,
}

/// Request body for updating a supplier.
#[derive(Debug, Default, serde::Deserialize)]
pub struct UpdateSupplierRequest {
    /// Supplier display name.
    pub name: Option<String>,
    /// Abbreviation/code; rejected while shipments reference the old one.
    pub code: Option<String>,
    /// Country of origin.
    pub country: Option<String>,
    /// Optional website URL.
    pub website_url: Option<String>,
}

/// GET /suppliers - List the institution's suppliers.
async fn list_suppliers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListSuppliersQuery>,
) -> impl IntoResponse {
    let repo = SupplierRepository::new((*state.db).clone());
    match repo
        .list_for_institution(auth.institution_id(), query.include_inactive)
        .await
    {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// GET `/suppliers/{supplier_id}` - One supplier.
async fn get_supplier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<i64>,
) -> impl IntoResponse {
    let repo = SupplierRepository::new((*state.db).clone());
    match repo.find_scoped(auth.institution_id(), supplier_id).await {
        Ok(Some(supplier)) => (StatusCode::OK, Json(supplier)).into_response(),
        Ok(None) => error_response(AppError::NotFound(format!(
            "Supplier not found: {supplier_id}"
        ))),
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// POST /suppliers - Create a supplier under the session's institution.
async fn create_supplier(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSupplierRequest>,
) -> impl IntoResponse {
    let repo = SupplierRepository::new((*state.db).clone());
    let result = repo
        .create(
            auth.institution_id(),
            CreateSupplierInput {
                name: payload.name,
                code: payload.code,
                country: payload.country,
                website_url: payload.website_url,
            },
        )
        .await;

    match result {
        Ok(supplier) => (StatusCode::CREATED, Json(supplier)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// PATCH `/suppliers/{supplier_id}` - Update a supplier.
async fn update_supplier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<i64>,
    Json(payload): Json<UpdateSupplierRequest>,
) -> impl IntoResponse {
    let repo = SupplierRepository::new((*state.db).clone());
    let result = repo
        .update(
            auth.institution_id(),
            supplier_id,
            UpdateSupplierInput {
                name: payload.name,
                code: payload.code,
                country: payload.country,
                website_url: payload.website_url.map(Some),
            },
        )
        .await;

    match result {
        Ok(supplier) => (StatusCode::OK, Json(supplier)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST `/suppliers/{supplier_id}/deactivate` - Soft-delete a supplier.
///
/// Idempotent; historical shipments referencing the code are untouched.
async fn deactivate_supplier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<i64>,
) -> impl IntoResponse {
    let repo = SupplierRepository::new((*state.db).clone());
    match repo.deactivate(auth.institution_id(), supplier_id).await {
        Ok(supplier) => (StatusCode::OK, Json(supplier)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/suppliers/{supplier_id}` - Hard-delete a supplier; rejected
/// while shipments use its code.
async fn delete_supplier(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(supplier_id): Path<i64>,
) -> impl IntoResponse {
    let repo = SupplierRepository::new((*state.db).clone());
    match repo.delete(auth.institution_id(), supplier_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e.into()),
    }
}
