//! Authentication routes: login and the session view.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::{get, post}};
use serde_json::json;
use tracing::{error, info};

use crate::middleware::AuthUser;
use crate::{AppState, routes::error_response};
use flutr_core::auth::{Credentials, verify_password};
use flutr_db::UserRepository;
use flutr_shared::auth::{LoginResponse, SessionView, UserInfo, UserRole};
use flutr_shared::AppError;

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Creates the authenticated session routes.
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/auth/session", get(session))
}

/// POST /auth/login - Authenticate credentials and issue a session token.
///
/// The payload is loosely-typed external input; it goes through the strict
/// credential parse before anything else. A missing account and a wrong
/// password produce the identical response on purpose.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    let credentials = match Credentials::parse(&payload) {
        Ok(c) => c,
        Err(e) => return error_response(e.into()),
    };

    let user_repo = UserRepository::new((*state.db).clone());

    // Login is global by email; the institution comes back with the row.
    let user = match user_repo.find_by_email(&credentials.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!("Login attempt for unknown email");
            return error_response(AppError::AuthenticationFailed);
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return error_response(AppError::Database(e.to_string()));
        }
    };

    match verify_password(&credentials.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = user.id, "Failed login attempt - invalid password");
            return error_response(AppError::AuthenticationFailed);
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return error_response(AppError::Internal(
                "An error occurred during login".to_string(),
            ));
        }
    }

    let role: UserRole = match user.role.parse() {
        Ok(r) => r,
        Err(e) => {
            error!(user_id = user.id, error = %e, "User row carries an unknown role");
            return error_response(AppError::Internal(
                "An error occurred during login".to_string(),
            ));
        }
    };

    let access_token =
        match state
            .jwt_service
            .generate_session_token(user.id, user.institution_id, role)
        {
            Ok(t) => t,
            Err(e) => {
                error!(error = %e, "Failed to generate session token");
                return error_response(AppError::Internal(
                    "An error occurred during login".to_string(),
                ));
            }
        };

    info!(user_id = user.id, institution_id = user.institution_id, "User logged in");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
            role,
            institution_id: user.institution_id,
        },
        access_token,
        expires_in: state.jwt_service.session_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /auth/session - The server-side session view for this request.
///
/// Re-materialized from the token claims alone; no credential-store access.
async fn session(auth: AuthUser) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "session": SessionView::from_claims(auth.claims()) })),
    )
}
