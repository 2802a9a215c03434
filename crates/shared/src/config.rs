//! Application configuration management.
//!
//! Configuration is constructed once at process start and passed by
//! reference into every component that needs it; nothing here is mutated at
//! runtime.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Route access gate configuration.
    #[serde(default)]
    pub gate: GateConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing session tokens.
    pub secret: String,
    /// Session token expiration in hours.
    #[serde(default = "default_session_expiry")]
    pub session_expires_hours: i64,
}

fn default_session_expiry() -> i64 {
    24
}

/// Route access gate configuration.
///
/// The matcher is configuration, not logic: exactly one path-template
/// pattern decides which request paths require an authenticated session.
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// Path template for administrative routes.
    #[serde(default = "default_admin_pattern")]
    pub admin_pattern: String,
    /// Where unauthenticated requests to gated paths are redirected.
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_admin_pattern() -> String {
    "/:institution/(admin)/:path*".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            admin_pattern: default_admin_pattern(),
            login_path: default_login_path(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FLUTR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_config_defaults() {
        let gate = GateConfig::default();
        assert_eq!(gate.admin_pattern, "/:institution/(admin)/:path*");
        assert_eq!(gate.login_path, "/login");
    }
}
