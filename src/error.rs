//! Error types for flowctl
//!
//! This module defines the error hierarchy for the whole client.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Request failures are split into classes that call for different
//! remedies: no credential ([`Error::Auth`]), could not reach the server
//! ([`Error::Network`], [`Error::Timeout`]) and server rejected the request
//! ([`Error::HttpStatus`]).

use serde_json::Value;
use thiserror::Error;

/// The main error type for flowctl
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // Request Errors
    // ============================================================================
    #[error("HTTP {status} {status_text} from {endpoint}")]
    HttpStatus {
        status: u16,
        status_text: String,
        endpoint: String,
        body: Option<Value>,
    },

    #[error("Network error calling {url}: {message}")]
    Network { message: String, url: String },

    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64, url: String },

    #[error("Invalid response ({status}) from {endpoint}: {message}")]
    InvalidResponse {
        status: u16,
        endpoint: String,
        message: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Caller Errors
    // ============================================================================
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: String, id: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Coarse classification used to pick a remedial action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable credential; re-authenticate
    Auth,
    /// Server could not be reached in time; retry later
    Unreachable,
    /// Server answered but rejected the request; fix the request
    Rejected,
    /// Failed before any request was made
    Local,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(
        status: u16,
        status_text: impl Into<String>,
        endpoint: impl Into<String>,
        body: Option<Value>,
    ) -> Self {
        Self::HttpStatus {
            status,
            status_text: status_text.into(),
            endpoint: endpoint.into(),
            body,
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            url: url.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } | Error::InvalidResponse { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Check if this error is retryable
    ///
    /// Only transport failures are; timeouts and HTTP errors are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Network { .. })
    }

    /// Classify this error for user-facing guidance
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Auth { .. } => ErrorKind::Auth,
            Error::Network { .. } | Error::Timeout { .. } => ErrorKind::Unreachable,
            Error::HttpStatus { .. } | Error::InvalidResponse { .. } | Error::NotFound { .. } => {
                ErrorKind::Rejected
            }
            _ => ErrorKind::Local,
        }
    }

    /// Suggest a next step for the user, when there is an obvious one
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Auth { .. } => Some("Set FLOWCTL_TOKEN or add a token to ~/.flowctl/credentials"),
            Error::Network { .. } => {
                Some("Could not reach the server; check your connection and api_url, then retry")
            }
            Error::Timeout { .. } => Some("The server is slow to respond; retry later or raise timeout_ms"),
            Error::NotFound { kind, .. } if kind == "project" => {
                Some("Run `flowctl projects list` to see available projects")
            }
            Error::HttpStatus { status, .. } => match status {
                401 | 403 => Some("Your token was rejected; re-authenticate and try again"),
                404 => Some("The resource does not exist; list resources to find a valid id"),
                400 | 409 | 422 => Some("The server rejected the payload; check the request body"),
                429 => Some("Too many requests; wait a moment and retry"),
                500..=599 => Some("The server failed to handle the request; retry later"),
                _ => None,
            },
            _ => None,
        }
    }

    /// Process exit code for this error class
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Auth => 2,
            ErrorKind::Unreachable => 3,
            ErrorKind::Rejected | ErrorKind::Local => 1,
        }
    }
}

/// Result type alias for flowctl
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("api_url");
        assert_eq!(err.to_string(), "Missing required config field: api_url");

        let err = Error::http_status(404, "Not Found", "/v1/projects/9", None);
        assert_eq!(err.to_string(), "HTTP 404 Not Found from /v1/projects/9");

        let err = Error::not_found("project", "42");
        assert_eq!(err.to_string(), "project '42' not found");
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::network("connection refused", "http://x").is_retryable());

        assert!(!Error::Timeout {
            timeout_ms: 1000,
            url: "http://x".to_string()
        }
        .is_retryable());
        assert!(!Error::http_status(500, "", "/", None).is_retryable());
        assert!(!Error::http_status(401, "", "/", None).is_retryable());
        assert!(!Error::auth("no token").is_retryable());
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        assert_eq!(Error::auth("x").kind(), ErrorKind::Auth);
        assert_eq!(Error::network("x", "u").kind(), ErrorKind::Unreachable);
        assert_eq!(
            Error::http_status(400, "Bad Request", "/", None).kind(),
            ErrorKind::Rejected
        );
        assert_eq!(Error::validation("x").kind(), ErrorKind::Local);
    }

    #[test_case(401, true ; "unauthorized")]
    #[test_case(404, true ; "not found")]
    #[test_case(422, true ; "unprocessable")]
    #[test_case(503, true ; "unavailable")]
    #[test_case(418, false ; "teapot")]
    fn test_http_hints(status: u16, has_hint: bool) {
        let err = Error::http_status(status, "", "/", None);
        assert_eq!(err.hint().is_some(), has_hint);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::auth("x").exit_code(), 2);
        assert_eq!(Error::network("x", "u").exit_code(), 3);
        assert_eq!(Error::http_status(404, "", "/", None).exit_code(), 1);
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
