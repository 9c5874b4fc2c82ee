//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod booking;
pub mod catalog;
pub mod database;
pub mod lock;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::booking::BookingConfig;
pub use self::catalog::CatalogConfig;
pub use self::database::DatabaseConfig;
pub use self::lock::{LockBackend, LockConfig};
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Reservation database settings.
    pub database: DatabaseConfig,
    /// Seat lock store settings.
    #[serde(default)]
    pub lock: LockConfig,
    /// Seat catalog collaborator settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Booking window policy.
    #[serde(default)]
    pub booking: BookingConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default` with the `config/{env}` overlay and
    /// environment variables prefixed with `DESKBOOK__`
    /// (e.g. `DESKBOOK__LOCK__BACKEND=redis`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DESKBOOK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
