//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: Settings → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::Settings;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// One semantic problem in a settings tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every section, collecting all problems.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "server.bind_address".to_string(),
            message: format!("`{}` is not a valid socket address", settings.server.bind_address),
        });
    }

    if settings.server.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "server.request_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if settings.session.name.is_empty()
        || !settings
            .session
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        errors.push(ValidationError {
            field: "session.name".to_string(),
            message: "must be a non-empty cookie-safe token".to_string(),
        });
    }

    if settings.cache.directory.is_empty() {
        errors.push(ValidationError {
            field: "cache.directory".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&settings.log.level.as_str()) {
        errors.push(ValidationError {
            field: "log.level".to_string(),
            message: format!("`{}` is not one of {:?}", settings.log.level, LOG_LEVELS),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
