//! Institution staff account routes, scoped to the session's institution.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use tracing::{error, info};

use crate::middleware::AuthUser;
use crate::{AppState, routes::error_response};
use flutr_core::auth::hash_password;
use flutr_db::UserRepository;
use flutr_db::repositories::CreateUserInput;
use flutr_shared::{AppError, UserRole};

/// Creates the staff account router (requires auth middleware).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/{user_id}/role", patch(update_role))
        .route("/users/{user_id}", delete(delete_user))
}

/// Request body for creating a staff account.
#[derive(Debug, serde::Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Login email; unique within the institution.
    pub email: String,
    /// Initial password, hashed before storage.
    pub password: String,
    /// Role to assign.
    pub role: UserRole,
}

/// Request body for changing a role.
#[derive(Debug, serde::Deserialize)]
pub struct UpdateRoleRequest {
    /// The new role.
    pub role: UserRole,
}

/// GET /users - List the institution's staff accounts.
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(resp) = auth.require_role(UserRole::OrgAdmin) {
        return resp;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.list_for_institution(auth.institution_id()).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => error_response(AppError::Database(e.to_string())),
    }
}

/// POST /users - Create a staff account under the session's institution.
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Err(resp) = auth.require_role(UserRole::OrgAdmin) {
        return resp;
    }

    if payload.password.is_empty() {
        return error_response(AppError::Validation(
            "password must not be empty".to_string(),
        ));
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return error_response(AppError::Internal(
                "An error occurred creating the account".to_string(),
            ));
        }
    };

    let repo = UserRepository::new((*state.db).clone());
    let result = repo
        .create(CreateUserInput {
            institution_id: auth.institution_id(),
            name: payload.name,
            email: payload.email,
            password_hash,
            role: payload.role,
        })
        .await;

    match result {
        Ok(user) => {
            info!(user_id = user.id, created_by = auth.user_id(), "Staff account created");
            (StatusCode::CREATED, Json(user)).into_response()
        }
        Err(e) => error_response(e.into()),
    }
}

/// PATCH `/users/{user_id}/role` - Change a staff account's role.
async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateRoleRequest>,
) -> impl IntoResponse {
    if let Err(resp) = auth.require_role(UserRole::OrgAdmin) {
        return resp;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo
        .update_role(auth.institution_id(), user_id, payload.role)
        .await
    {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// DELETE `/users/{user_id}` - Remove a staff account.
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    if let Err(resp) = auth.require_role(UserRole::OrgAdmin) {
        return resp;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.delete(auth.institution_id(), user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e.into()),
    }
}
