//! Request middleware: authentication and the route access gate.

pub mod auth;
pub mod gate;

pub use auth::{AuthUser, auth_middleware};
