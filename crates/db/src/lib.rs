//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the ten Flutr tables
//! - Repository abstractions for data access
//! - The procedural tenant-isolation enforcer
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod tenancy;

pub use repositories::{
    InstitutionRepository, NewsRepository, ReleaseRepository, ShipmentRepository,
    SpeciesLinkRepository, SpeciesRepository, SupplierRepository, UserRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
