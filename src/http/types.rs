//! Request and response types for the executor

use crate::types::{JsonValue, Method};
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-call options supplied by the caller
///
/// Unset fields fall back to the executor's configuration.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters; `null` values are skipped
    pub params: BTreeMap<String, JsonValue>,
    /// Extra headers, overriding the JSON defaults
    pub headers: BTreeMap<String, String>,
    /// Override the timeout for this call
    pub timeout: Option<Duration>,
    /// Do not send an `Authorization` header
    pub skip_auth: bool,
    /// Override the network retry budget for this call
    pub retries: Option<u32>,
    /// Override the delay between network retries
    pub retry_delay: Option<Duration>,
}

impl RequestOptions {
    /// Create a new set of options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send without credentials
    #[must_use]
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    /// Set the network retry budget
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Set the delay between network retries
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }
}

/// Fully resolved description of one attempt
///
/// A spec is never changed once built. The one-shot retry after a token
/// refresh is sent with a new spec from [`RequestSpec::after_auth_refresh`].
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: Option<JsonValue>,
    pub params: BTreeMap<String, JsonValue>,
    pub headers: BTreeMap<String, String>,
    pub timeout: Duration,
    pub skip_auth: bool,
    pub retries: u32,
    pub retry_delay: Duration,
    pub is_retry_attempt: bool,
}

impl RequestSpec {
    /// The request for the single resend that follows a 401
    #[must_use]
    pub fn after_auth_refresh(&self) -> Self {
        Self {
            is_retry_attempt: true,
            ..self.clone()
        }
    }

    /// Whether a 401 for this spec should trigger a token refresh
    pub fn may_refresh_auth(&self) -> bool {
        !self.skip_auth && !self.is_retry_attempt
    }
}

/// Classified result of one physical attempt
#[derive(Debug, Clone)]
pub enum Outcome {
    /// 2xx response
    Success { status: u16, body: Vec<u8> },
    /// Non-2xx response
    HttpError {
        status: u16,
        status_text: String,
        endpoint: String,
        body: Option<JsonValue>,
    },
    /// The transport failed before a response arrived
    NetworkError { message: String, url: String },
    /// The timeout elapsed first
    TimeoutError { timeout_ms: u64, url: String },
}

/// Something unusual about a successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseAnomaly {
    /// The body was a bare JSON string rather than an object or array
    StringBody,
}

/// A successful response with its parsed JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed body; `null` for an empty body
    pub data: JsonValue,
    /// Set when the body had an unexpected shape
    pub anomaly: Option<ResponseAnomaly>,
}
