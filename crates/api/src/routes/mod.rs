//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use flutr_shared::AppError;

pub mod auth;
pub mod health;
pub mod institutions;
pub mod news;
pub mod releases;
pub mod shipments;
pub mod species;
pub mod species_links;
pub mod suppliers;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::session_routes())
        .merge(institutions::routes())
        .merge(news::routes())
        .merge(species::routes())
        .merge(species_links::routes())
        .merge(suppliers::routes())
        .merge(shipments::routes())
        .merge(releases::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Renders an application error as a JSON response.
pub(crate) fn error_response(err: AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::NotFound("species 9".to_string()), StatusCode::NOT_FOUND)]
    #[case(
        AppError::TenantMismatch("shipment 3".to_string()),
        StatusCode::UNPROCESSABLE_ENTITY
    )]
    #[case(AppError::AuthenticationFailed, StatusCode::UNAUTHORIZED)]
    #[case(AppError::DeleteBlocked("supplier LPS".to_string()), StatusCode::CONFLICT)]
    #[case(AppError::Validation("empty email".to_string()), StatusCode::BAD_REQUEST)]
    fn test_error_response_status(#[case] err: AppError, #[case] expected: StatusCode) {
        let resp = error_response(err);
        assert_eq!(resp.status(), expected);
    }
}
