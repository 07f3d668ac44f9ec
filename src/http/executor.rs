//! Request executor
//!
//! Turns one logical API call into one or more physical attempts:
//! - Builds the URL and headers, injecting the bearer token
//! - Enforces a wall-clock timeout per attempt (terminal, never retried)
//! - Resends once after a `401`, with a freshly loaded token
//! - Resends after transport failures, within the caller's retry budget
//! - Parses successful bodies as JSON

use super::transport::{ReqwestTransport, Transport, TransportErrorKind, TransportRequest};
use super::types::{ApiResponse, Outcome, RequestOptions, RequestSpec, ResponseAnomaly};
use crate::auth::AuthTokenProvider;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Method};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Configuration for the request executor
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Network retry budget (0 = no retries)
    pub retries: u32,
    /// Delay between network retries
    pub retry_delay: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            retries: 0,
            retry_delay: Duration::from_secs(1),
            default_headers: HashMap::new(),
            user_agent: format!("flowctl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ExecutorConfig {
    /// Create a new config builder
    pub fn builder() -> ExecutorConfigBuilder {
        ExecutorConfigBuilder::default()
    }
}

impl From<&Config> for ExecutorConfig {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.api_url.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            retries: config.retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            default_headers: HashMap::new(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Builder for executor config
#[derive(Default)]
pub struct ExecutorConfigBuilder {
    config: ExecutorConfig,
}

impl ExecutorConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the network retry budget and delay
    pub fn retries(mut self, retries: u32, delay: Duration) -> Self {
        self.config.retries = retries;
        self.config.retry_delay = delay;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ExecutorConfig {
        self.config
    }
}

/// Executes API requests with auth, timeout and retry policy
pub struct RequestExecutor {
    config: ExecutorConfig,
    transport: Arc<dyn Transport>,
    auth: AuthTokenProvider,
}

impl RequestExecutor {
    /// Create an executor that sends requests with reqwest
    pub fn new(config: ExecutorConfig, auth: AuthTokenProvider) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.user_agent, config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport), auth))
    }

    /// Create an executor over a custom transport
    pub fn with_transport(
        config: ExecutorConfig,
        transport: Arc<dyn Transport>,
        auth: AuthTokenProvider,
    ) -> Self {
        Self {
            config,
            transport,
            auth,
        }
    }

    /// The executor's configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// The token provider used for `Authorization` headers
    pub fn auth(&self) -> &AuthTokenProvider {
        &self.auth
    }

    /// Resolve caller options against the executor defaults
    pub fn spec(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
        options: &RequestOptions,
    ) -> RequestSpec {
        RequestSpec {
            method,
            path: path.to_string(),
            body,
            params: options.params.clone(),
            headers: options.headers.clone(),
            timeout: options.timeout.unwrap_or(self.config.timeout),
            skip_auth: options.skip_auth,
            retries: options.retries.unwrap_or(self.config.retries),
            retry_delay: options.retry_delay.unwrap_or(self.config.retry_delay),
            is_retry_attempt: false,
        }
    }

    /// Execute one logical request
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
        options: &RequestOptions,
    ) -> Result<ApiResponse> {
        self.execute_spec(self.spec(method, path, body, options))
            .await
    }

    /// Execute a resolved spec, retrying according to its policy
    pub async fn execute_spec(&self, spec: RequestSpec) -> Result<ApiResponse> {
        let url = self.build_url(&spec.path, &spec.params)?;
        let mut spec = spec;
        let mut network_retries = 0u32;

        loop {
            match self.attempt(&spec, &url, network_retries).await? {
                Outcome::Success { status, body } => {
                    return parse_success(status, &body, &spec.path);
                }

                Outcome::HttpError { status: 401, .. } if spec.may_refresh_auth() => {
                    warn!("Received 401 for {} {}, refreshing token", spec.method, url);
                    self.auth.invalidate().await;
                    spec = spec.after_auth_refresh();
                }

                Outcome::HttpError {
                    status,
                    status_text,
                    endpoint,
                    body,
                } => {
                    return Err(Error::HttpStatus {
                        status,
                        status_text,
                        endpoint,
                        body,
                    });
                }

                Outcome::NetworkError { message, url } => {
                    if network_retries >= spec.retries {
                        return Err(Error::Network { message, url });
                    }
                    network_retries += 1;
                    warn!(
                        "Network error ({message}), attempt {}/{}, retrying in {:?}",
                        network_retries,
                        spec.retries + 1,
                        spec.retry_delay
                    );
                    tokio::time::sleep(spec.retry_delay).await;
                }

                Outcome::TimeoutError { timeout_ms, url } => {
                    return Err(Error::Timeout { timeout_ms, url });
                }
            }
        }
    }

    /// Send one attempt and classify what came back
    ///
    /// Failing to obtain a token, or a request the transport refused to
    /// build, is returned as `Err`; nothing was sent in either case.
    async fn attempt(&self, spec: &RequestSpec, url: &Url, attempt: u32) -> Result<Outcome> {
        let request = TransportRequest {
            method: spec.method,
            url: url.clone(),
            headers: self.build_headers(spec).await?,
            body: spec.body.clone(),
        };

        let started = Instant::now();
        let result = tokio::time::timeout(spec.timeout, self.transport.send(request)).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let outcome = match result {
            Err(_elapsed) => Outcome::TimeoutError {
                timeout_ms: spec.timeout.as_millis() as u64,
                url: url.to_string(),
            },
            Ok(Err(e)) if e.kind == TransportErrorKind::Build => {
                debug!(method = %spec.method, url = %url, "Request not sent: {}", e.message);
                return Err(Error::validation(format!("invalid request: {}", e.message)));
            }
            Ok(Err(e)) if e.is_retryable() => Outcome::NetworkError {
                message: e.message,
                url: url.to_string(),
            },
            // The transport's own deadline (connection setup) fired first
            Ok(Err(_)) => Outcome::TimeoutError {
                timeout_ms: elapsed_ms,
                url: url.to_string(),
            },
            Ok(Ok(response)) if response.is_success() => Outcome::Success {
                status: response.status,
                body: response.body,
            },
            Ok(Ok(response)) => Outcome::HttpError {
                status: response.status,
                status_text: response.status_text,
                endpoint: spec.path.clone(),
                body: parse_error_body(&response.body),
            },
        };

        match &outcome {
            Outcome::Success { status, .. } | Outcome::HttpError { status, .. } => debug!(
                method = %spec.method,
                url = %url,
                attempt,
                elapsed_ms,
                status,
                "Request completed"
            ),
            Outcome::NetworkError { message, .. } => debug!(
                method = %spec.method,
                url = %url,
                attempt,
                elapsed_ms,
                "Request failed: {message}"
            ),
            Outcome::TimeoutError { .. } => debug!(
                method = %spec.method,
                url = %url,
                attempt,
                elapsed_ms,
                "Request timed out"
            ),
        }

        Ok(outcome)
    }

    /// JSON defaults, then default headers, then caller headers, then auth
    async fn build_headers(&self, spec: &RequestSpec) -> Result<BTreeMap<String, String>> {
        let mut headers = BTreeMap::from([
            ("content-type".to_string(), "application/json".to_string()),
            ("accept".to_string(), "application/json".to_string()),
        ]);

        for (key, value) in self.config.default_headers.iter().chain(&spec.headers) {
            headers.insert(key.to_lowercase(), value.clone());
        }

        if !spec.skip_auth {
            let token = self.auth.token().await?;
            headers.insert("authorization".to_string(), format!("Bearer {token}"));
        }

        Ok(headers)
    }

    /// Join base URL, path and query parameters
    pub fn build_url(&self, path: &str, params: &BTreeMap<String, JsonValue>) -> Result<Url> {
        let full = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            let base = self.config.base_url.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            format!("{base}/{path}")
        };

        let mut url = Url::parse(&full)?;
        let pairs: Vec<(&String, String)> = params
            .iter()
            .filter_map(|(k, v)| param_value(v).map(|v| (k, v)))
            .collect();
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, &value);
            }
        }

        Ok(url)
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

/// Stringify a query parameter; `null` means "omit"
fn param_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Array(items) => Some(
            items
                .iter()
                .filter_map(param_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

fn parse_success(status: u16, body: &[u8], endpoint: &str) -> Result<ApiResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ApiResponse {
            status,
            data: JsonValue::Null,
            anomaly: None,
        });
    }

    let data: JsonValue =
        serde_json::from_slice(body).map_err(|e| Error::InvalidResponse {
            status,
            endpoint: endpoint.to_string(),
            message: format!("body is not valid JSON: {e}"),
        })?;

    let anomaly = if data.is_string() {
        warn!(endpoint, status, "Response body is a bare JSON string");
        Some(ResponseAnomaly::StringBody)
    } else {
        None
    };

    Ok(ApiResponse {
        status,
        data,
        anomaly,
    })
}

fn parse_error_body(body: &[u8]) -> Option<JsonValue> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    serde_json::from_slice(body)
        .ok()
        .or_else(|| Some(JsonValue::String(String::from_utf8_lossy(body).trim().to_string())))
}
