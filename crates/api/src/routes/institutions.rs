//! Institution management routes.

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
use flutr_db::InstitutionRepository;
use flutr_db::repositories::{CreateInstitutionInput, UpdateInstitutionInput};
use flutr_shared::types::{PageRequest, PageResponse};
use flutr_shared::{AppError, UserRole};

/// Creates the institutions router (requires auth middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/institutions", get(list_institutions))
        .route("/institutions", post(create_institution))
        .route("/institutions/current", get(get_current_institution))
        .route("/institutions/current", patch(update_current_institution))
        .route("/institutions/{institution_id}", delete(delete_institution))
}

/// Request body for provisioning an institution.
#[derive(Debug, serde::Deserialize)]
pub struct CreateInstitutionRequest {
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
    /// Contact email.
    pub email_address: Option<String>,
    /// IABES membership flag.
    #[serde(default)]
    pub iabes_member: bool,
    /// Theme colors.
    pub theme_colors: Option<Vec<String>>,
    /// Website URL.
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

/// Request body for updating the current institution.
#[derive(Debug, Default, serde::Deserialize)]
pub struct UpdateInstitutionRequest {
    /// Display name.
    pub name: Option<String>,
    /// Street address.
    pub street_address: Option<String>,
    /// Additional address line.
    pub extended_address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or province.
    pub state_province: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// IABES membership flag.
    pub iabes_member: Option<bool>,
    /// Whether public stats pages are shown.
    pub stats_active: Option<bool>,
}

/// GET /institutions - List institutions (platform operators only).
async fn list_institutions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> impl IntoResponse {
    if let Err(resp) = auth.require_role(UserRole::SuperAdmin) {
        return resp;
    }

    let repo = InstitutionRepository::new((*state.db).clone());
    match repo.list(&page).await {
        Ok((rows, total)) => {
            (StatusCode::OK, Json(PageResponse::new(rows, &page, total))).into_response()
        }
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// POST /institutions - Provision a new institution (platform operators only).
async fn create_institution(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateInstitutionRequest>,
) -> impl IntoResponse {
    if let Err(resp) = auth.require_role(UserRole::SuperAdmin) {
        return resp;
    }

    let repo = InstitutionRepository::new((*state.db).clone());
    let result = repo
        .create(CreateInstitutionInput {
            slug: payload.slug,
            name: payload.name,
            street_address: payload.street_address,
            extended_address: payload.extended_address,
            city: payload.city,
            state_province: payload.state_province,
            postal_code: payload.postal_code,
            time_zone: payload.time_zone,
            country: payload.country,
            phone_number: payload.phone_number,
            email_address: payload.email_address,
            iabes_member: payload.iabes_member,
            theme_colors: payload.theme_colors,
            website_url: payload.website_url,
            facility_image_url: payload.facility_image_url,
            logo_url: payload.logo_url,
            description: payload.description,
            social_links: payload.social_links,
        })
        .await;

    match result {
        Ok(institution) => {
            info!(institution_id = institution.id, slug = %institution.slug, "Institution provisioned");
            (StatusCode::CREATED, Json(institution)).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// GET /institutions/current - The session's own institution.
async fn get_current_institution(
    State(state): State<AppState>,
    auth: AuthUser,
) -> impl IntoResponse {
    let repo = InstitutionRepository::new((*state.db).clone());
    match repo.find_by_id(auth.institution_id()).await {
        Ok(Some(institution)) => (StatusCode::OK, Json(institution)).into_response(),
        Ok(None) => error_response(AppError::NotFound(format!(
            "Institution not found: {}",
            auth.institution_id()
        ))),
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// PATCH /institutions/current - Update the session's own institution.
async fn update_current_institution(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateInstitutionRequest>,
) -> impl IntoResponse {
    if let Err(resp) = auth.require_role(UserRole::OrgAdmin) {
        return resp;
    }

    let repo = InstitutionRepository::new((*state.db).clone());
    let result = repo
        .update(
            auth.institution_id(),
            UpdateInstitutionInput {
                name: payload.name,
                street_address: payload.street_address,
                extended_address: payload.extended_address.map(Some),
                city: payload.city,
                state_province: payload.state_province,
                postal_code: payload.postal_code,
                country: payload.country,
                iabes_member: payload.iabes_member,
                stats_active: payload.stats_active,
                ..Default::default()
            },
        )
        .await;

    match result {
        Ok(institution) => (StatusCode::OK, Json(institution)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/institutions/{institution_id}` - Remove an institution and
/// everything it owns (platform operators only).
async fn delete_institution(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(institution_id): Path<i64>,
) -> impl IntoResponse {
    if let Err(resp) = auth.require_role(UserRole::SuperAdmin) {
        return resp;
    }

    let repo = InstitutionRepository::new((*state.db).clone());
    match repo.delete(institution_id).await {
        Ok(()) => {
            info!(institution_id, deleted_by = auth.user_id(), "Institution deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(e.into()),
    }
}
