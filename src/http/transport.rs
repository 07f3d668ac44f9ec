//! Transport seam
//!
//! The executor speaks to the network only through [`Transport`], so any
//! HTTP client (or a test double) can sit underneath it.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Method};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use std::error::Error as _;
use std::fmt;
use std::time::Duration;
use url::Url;

/// A request ready to go on the wire
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    /// Header names are lowercase
    pub headers: BTreeMap<String, String>,
    pub body: Option<JsonValue>,
}

/// A raw response from the wire
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Build a response with a JSON body
    pub fn json(status: u16, body: &JsonValue) -> Self {
        Self {
            status,
            status_text: status_text(status),
            headers: BTreeMap::from([("content-type".to_string(), "application/json".to_string())]),
            body: body.to_string().into_bytes(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why the transport failed to produce a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, reset or otherwise not established
    Connect,
    /// Host name could not be resolved
    Dns,
    /// The transport's own deadline elapsed
    Timeout,
    /// The request could not be built (bad header value, unencodable body);
    /// nothing was sent
    Build,
    /// Any other failure while sending or reading the response
    Request,
}

/// A typed transport failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a connection failure
    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    /// Whether the executor may resend after this failure
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            TransportErrorKind::Connect | TransportErrorKind::Dns | TransportErrorKind::Request
        )
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_builder() {
            TransportErrorKind::Build
        } else if e.is_timeout() {
            TransportErrorKind::Timeout
        } else if is_dns_error(&e) {
            TransportErrorKind::Dns
        } else if e.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Request
        };

        // reqwest's Display omits the cause; include the root of the chain
        let mut message = e.to_string();
        let mut source = e.source();
        while let Some(inner) = source {
            if inner.source().is_none() {
                message = format!("{message}: {inner}");
            }
            source = inner.source();
        }

        Self { kind, message }
    }
}

fn is_dns_error(e: &reqwest::Error) -> bool {
    let mut source = e.source();
    while let Some(inner) = source {
        let text = inner.to_string().to_lowercase();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return true;
        }
        source = inner.source();
    }
    false
}

/// Performs one HTTP exchange
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> std::result::Result<TransportResponse, TransportError>;
}

/// Upper bound on connection setup, whatever the request timeout
pub const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`Transport`] backed by a [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given user agent
    ///
    /// Connection setup is capped at `connect_timeout`, but never more
    /// than [`MAX_CONNECT_TIMEOUT`].
    pub fn new(user_agent: &str, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout.min(MAX_CONNECT_TIMEOUT))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> std::result::Result<TransportResponse, TransportError> {
        let mut req = self.client.request(request.method.into(), request.url);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

fn status_text(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or_default()
        .to_string()
}
