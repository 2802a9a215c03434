//! Per-institution species enablement routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde_json::json;

use crate::middleware::AuthUser;
use crate::{AppState, routes::error_response};
use flutr_db::SpeciesLinkRepository;
use flutr_db::repositories::SpeciesOverrides;
use flutr_shared::AppError;

/// Creates the species link router (requires auth middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/species-links", get(list_links))
        .route("/species-links", post(enable_species))
        .route("/species-links/{link_id}", patch(update_overrides))
        .route("/species-links/{link_id}", delete(disable_species))
}

/// Request body for enabling a species.
#[derive(Debug, serde::Deserialize)]
pub struct EnableSpeciesRequest {
    /// Global species id to enable.
    pub species_id: i64,
    /// Optional overrides.
    #[serde(flatten)]
    pub overrides: OverridesPayload,
}

/// Override fields shared by enable and update payloads.
#[derive(Debug, Default, serde::Deserialize)]
pub struct OverridesPayload {
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

impl From<OverridesPayload> for SpeciesOverrides {
    fn from(payload: OverridesPayload) -> Self {
        Self {
            common_name_override: payload.common_name_override,
            fun_facts_override: payload.fun_facts_override,
            habitat_override: payload.habitat_override,
            host_plant_override: payload.host_plant_override,
            image_override: payload.image_override,
            lifespan_override: payload.lifespan_override,
        }
    }
}

/// GET /species-links - The institution's enabled species with catalog rows.
async fn list_links(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = SpeciesLinkRepository::new((*state.db).clone());
    match repo.list_for_institution(auth.institution_id()).await {
        Ok(rows) => {
            let body: Vec<_> = rows
                .into_iter()
                .map(|(link, species)| json!({ "link": link, "species": species }))
                .collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// POST /species-links - Enable a species for the session's institution.
async fn enable_species(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<EnableSpeciesRequest>,
) -> impl IntoResponse {
    let repo = SpeciesLinkRepository::new((*state.db).clone());
    let result = repo
        .enable(
            auth.institution_id(),
            payload.species_id,
            payload.overrides.into(),
        )
        .await;

    match result {
        Ok(link) => (StatusCode::CREATED, Json(link)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// PATCH `/species-links/{link_id}` - Replace the overrides on a link.
async fn update_overrides(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(link_id): Path<i64>,
    Json(payload): Json<OverridesPayload>,
) -> impl IntoResponse {
    let repo = SpeciesLinkRepository::new((*state.db).clone());
    let result = repo
        .update_overrides(auth.institution_id(), link_id, payload.into())
        .await;

    match result {
        Ok(link) => (StatusCode::OK, Json(link)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/species-links/{link_id}` - Disable a species for the
/// institution.
async fn disable_species(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(link_id): Path<i64>,
) -> impl IntoResponse {
    let repo = SpeciesLinkRepository::new((*state.db).clone());
    match repo.disable(auth.institution_id(), link_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e.into()),
    }
}
