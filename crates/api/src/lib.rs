//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware (claims re-materialized from the token)
//! - The route access gate middleware
//! - Request/response types

pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use flutr_core::gate::RouteGate;
use flutr_shared::JwtService;

/// Application state shared across handlers.
///
/// Built once at startup from the loaded configuration and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for session token operations.
    pub jwt_service: Arc<JwtService>,
    /// Route access gate.
    pub gate: Arc<RouteGate>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::gate::gate_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
