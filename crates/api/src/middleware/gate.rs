//! Route access gate middleware.
//!
//! Evaluates the configured path template once per inbound request.
//! Administrative paths without a session get a redirect to the login page;
//! everything else passes through untouched. The gate checks
//! presence-of-session only; tenant matching happens in handlers via
//! `AuthUser::require_tenant`.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::AppState;
use crate::middleware::auth::request_claims;
use flutr_core::gate::GateDecision;

/// Gate middleware applied ahead of routing.
pub async fn gate_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let claims = request_claims(&state, &request);
    let path = request.uri().path();

    match state.gate.decide(path, claims.as_ref()) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Redirect => {
            debug!(path, "gated path without session; redirecting to login");
            Redirect::to(state.gate.login_path()).into_response()
        }
    }
}
