//! Global species catalog routes.
//!
//! The catalog is shared read-only reference data for institution staff;
//! mutation is reserved for platform operators.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use tracing::info;

use crate::middleware::AuthUser;
use crate::{AppState, routes::error_response};
use flutr_db::SpeciesRepository;
use flutr_db::repositories::{CreateSpeciesInput, UpdateSpeciesInput};
use flutr_shared::types::{PageRequest, PageResponse};
use flutr_shared::{AppError, UserRole};

/// Creates the species catalog router (requires auth middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/species", get(list_species))
        .route("/species", post(create_species))
        .route("/species/{species_id}", get(get_species))
        .route("/species/{species_id}", patch(update_species))
        .route("/species/{species_id}", delete(delete_species))
}

/// Query parameters for the catalog listing.
///
/// Pagination fields are spelled out because query strings do not support
/// flattened numeric fields.
#[derive(Debug, serde::Deserialize)]
pub struct ListSpeciesQuery {
    /// Optional name search (scientific or common).
    pub search: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl ListSpeciesQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Request body for adding a species to the catalog.
#[derive(Debug, serde::Deserialize)]
pub struct CreateSpeciesRequest {
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

/// Request body for updating a catalog entry.
#[derive(Debug, Default, serde::Deserialize)]
pub struct UpdateSpeciesRequest {
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
    /// Host plant description.
    pub host_plant: Option<String>,
    /// Habitat description.
    pub habitat: Option<String>,
    /// Fun facts for display.
    pub fun_facts: Option<String>,
}

/// GET /species - List or search the catalog.
async fn list_species(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListSpeciesQuery>,
) -> impl IntoResponse {
    let page = query.page_request();
    let repo = SpeciesRepository::new((*state.db).clone());
    match repo.list(&page, query.search.as_deref()).await {
        Ok((rows, total)) => {
            (StatusCode::OK, Json(PageResponse::new(rows, &page, total))).into_response()
        }
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// GET `/species/{species_id}` - One catalog entry.
async fn get_species(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(species_id): Path<i64>,
) -> impl IntoResponse {
    let repo = SpeciesRepository::new((*state.db).clone());
    match repo.find_by_id(species_id).await {
        Ok(Some(species)) => (StatusCode::OK, Json(species)).into_response(),
        Ok(None) => error_response(AppError::NotFound(format!(
            "Species not found: {species_id}"
        ))),
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// POST /species - Add a species to the catalog (platform operators only).
async fn create_species(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSpeciesRequest>,
) -> impl IntoResponse {
    if let Err(resp) = auth.require_role(UserRole::SuperAdmin) {
        return resp;
    }

    let repo = SpeciesRepository::new((*state.db).clone());
    let result = repo
        .create(CreateSpeciesInput {
            scientific_name: payload.scientific_name,
            common_name: payload.common_name,
            family: payload.family,
            sub_family: payload.sub_family,
            lifespan_days: payload.lifespan_days,
            range: payload.range,
            host_plant: payload.host_plant,
            habitat: payload.habitat,
            fun_facts: payload.fun_facts,
            img_wings_open: payload.img_wings_open,
            img_wings_closed: payload.img_wings_closed,
            extra_img_1: payload.extra_img_1,
            extra_img_2: payload.extra_img_2,
        })
        .await;

    match result {
        Ok(species) => {
            info!(species_id = species.id, scientific_name = %species.scientific_name, "Species added to catalog");
            (StatusCode::CREATED, Json(species)).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// PATCH `/species/{species_id}` - Update a catalog entry (platform
/// operators only).
async fn update_species(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(species_id): Path<i64>,
    Json(payload): Json<UpdateSpeciesRequest>,
) -> impl IntoResponse {
    if let Err(resp) = auth.require_role(UserRole::SuperAdmin) {
        return resp;
    }

    let repo = SpeciesRepository::new((*state.db).clone());
    let result = repo
        .update(
            species_id,
            UpdateSpeciesInput {
                common_name: payload.common_name,
                family: payload.family,
                sub_family: payload.sub_family,
                lifespan_days: payload.lifespan_days,
                range: payload.range,
                host_plant: payload.host_plant.map(Some),
                habitat: payload.habitat.map(Some),
                fun_facts: payload.fun_facts.map(Some),
                ..Default::default()
            },
        )
        .await;

    match result {
        Ok(species) => (StatusCode::OK, Json(species)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/species/{species_id}` - Remove a species from the catalog
/// (platform operators only). Restricted while any tenant data references
/// it.
async fn delete_species(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(species_id): Path<i64>,
) -> impl IntoResponse {
    if let Err(resp) = auth.require_role(UserRole::SuperAdmin) {
        return resp;
    }

    let repo = SpeciesRepository::new((*state.db).clone());
    match repo.delete(species_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e.into()),
    }
}
