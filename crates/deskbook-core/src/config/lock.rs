//! Seat lock store configuration.

use serde::{Deserialize, Serialize};

/// Which backend holds seat locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockBackend {
    /// In-process store guarded by a Tokio mutex. Single node only.
    #[default]
    Memory,
    /// Redis with Lua scripts. Safe across nodes.
    Redis,
}

/// Seat lock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// Lock store backend.
    #[serde(default)]
    pub backend: LockBackend,
    /// Redis connection URL (used when `backend = "redis"`).
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Prefix prepended to every lock key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// TTL applied when the client does not ask for one.
    #[serde(default = "default_ttl")]
    pub default_ttl_seconds: u64,
    /// Upper bound on any requested TTL.
    #[serde(default = "default_max_ttl")]
    pub max_ttl_seconds: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            backend: LockBackend::default(),
            redis_url: default_redis_url(),
            key_prefix: default_key_prefix(),
            default_ttl_seconds: default_ttl(),
            max_ttl_seconds: default_max_ttl(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "deskbook".to_string()
}

fn default_ttl() -> u64 {
    300
}

fn default_max_ttl() -> u64 {
    1800
}
