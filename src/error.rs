//! Framework error taxonomy.
//!
//! # Responsibilities
//! - Distinguish "no route matched" (a normal outcome) from configuration
//!   errors (deployment bugs)
//! - Carry handler-raised HTTP outcomes
//! - Map every error to an HTTP status code
//!
//! # Design Decisions
//! - `NotFound` is recoverable and logged at info level at most
//! - Unresolvable handlers, unknown actions and malformed patterns are
//!   configuration errors: 500-class, never retried
//! - The router never writes a response itself; callers translate errors

use axum::http::{Method, StatusCode};
use thiserror::Error;

/// Errors produced by routing and dispatch.
#[derive(Debug, Error)]
pub enum Error {
    /// No registered route matches the request. A normal outcome: the
    /// caller renders a 404-class response.
    #[error("no route matches {method} {path}")]
    NotFound { method: Method, path: String },

    /// The matched route names a handler that is not in the registry.
    #[error("handler `{name}` is not registered")]
    HandlerNotFound { name: String },

    /// The resolved handler does not expose the requested action.
    #[error("handler `{name}` does not expose action `{action}`")]
    UnknownAction { name: String, action: String },

    /// A route pattern produced a malformed regular expression. Stems from
    /// route-table misconfiguration, so it surfaces instead of being
    /// swallowed as a non-match.
    #[error("route pattern `{pattern}` is invalid: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An HTTP outcome raised by a handler or hook (e.g. a guard denying
    /// access). Carries the status the response should use.
    #[error("{message}")]
    App { status: StatusCode, message: String },
}

impl Error {
    /// Build a handler-raised outcome from a raw status code.
    ///
    /// Unknown codes collapse to 500 rather than panicking inside a
    /// handler.
    pub fn app(status: u16, message: impl Into<String>) -> Self {
        Error::App {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: message.into(),
        }
    }

    /// The HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::HandlerNotFound { .. } | Error::UnknownAction { .. } | Error::Pattern { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::App { status, .. } => *status,
        }
    }

    /// True for 500-class errors that should be logged at error severity.
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl From<crate::storage::StorageError> for Error {
    fn from(err: crate::storage::StorageError) -> Self {
        Error::app(500, err.to_string())
    }
}

impl From<crate::cache::CacheError> for Error {
    fn from(err: crate::cache::CacheError) -> Self {
        Error::app(500, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let nf = Error::NotFound {
            method: Method::GET,
            path: "/missing".into(),
        };
        assert_eq!(nf.status(), StatusCode::NOT_FOUND);
        assert!(!nf.is_server_error());

        let cfg = Error::HandlerNotFound {
            name: "Ghost".into(),
        };
        assert_eq!(cfg.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(cfg.is_server_error());
    }

    #[test]
    fn app_error_clamps_invalid_status() {
        assert_eq!(Error::app(42, "nope").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Error::app(403, "denied").status(), StatusCode::FORBIDDEN);
    }
}
