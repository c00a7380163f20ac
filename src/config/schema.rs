//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! framework. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration for a framework application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// HTTP server configuration (bind address, timeouts).
    pub server: ServerConfig,

    /// Session cookie and lifetime settings.
    pub session: SessionConfig,

    /// File cache settings.
    pub cache: CacheConfig,

    /// Logging settings.
    pub log: LogConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session cookie name.
    pub name: String,

    /// Session lifetime in seconds; 0 means the session lives until the
    /// browser closes and never expires server-side.
    pub lifetime_secs: u64,

    /// Cookie path.
    pub cookie_path: String,

    /// Cookie domain; omitted when not set.
    pub cookie_domain: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "gantry_sid".to_string(),
            lifetime_secs: 0,
            cookie_path: "/".to_string(),
            cookie_domain: None,
        }
    }
}

/// File cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory cache entries are written to.
    pub directory: String,

    /// Default entry lifetime in seconds; 0 disables freshness checks.
    pub default_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: std::env::temp_dir().to_string_lossy().into_owned(),
            default_ttl_secs: 0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
