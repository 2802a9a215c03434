//! Shared types, errors, and configuration for Flutr.
//!
//! This crate provides common types used across all other crates:
//! - Session claims and role definitions
//! - JWT signing and validation
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, SessionView, UserRole};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
