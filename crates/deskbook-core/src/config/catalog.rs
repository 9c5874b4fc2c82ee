//! Seat catalog collaborator configuration.

use serde::{Deserialize, Serialize};

/// Where the coworking catalog lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog service. Empty selects the static catalog.
    #[serde(default)]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Seats known to the static catalog (development only).
    #[serde(default)]
    pub static_seats: Vec<uuid::Uuid>,
}

impl CatalogConfig {
    /// Whether a remote catalog is configured.
    pub fn is_remote(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: default_timeout(),
            static_seats: Vec::new(),
        }
    }
}

fn default_timeout() -> u64 {
    3
}
