//! HTTP module
//!
//! Resilient execution of API requests.
//!
//! # Features
//!
//! - **Authentication**: bearer token injected from [`AuthTokenProvider`](crate::auth::AuthTokenProvider)
//! - **One-shot 401 recovery**: the token is reloaded and the request resent exactly once
//! - **Network retries**: bounded, opt-in resends after transport failures
//! - **Timeouts**: per-attempt wall-clock limit; a timeout is never retried
//! - **Pluggable transport**: reqwest by default, any [`Transport`] in tests

mod executor;
mod transport;
mod types;

pub use executor::{ExecutorConfig, ExecutorConfigBuilder, RequestExecutor};
pub use transport::{
    ReqwestTransport, Transport, TransportError, TransportErrorKind, TransportRequest,
    TransportResponse,
};
pub use types::{ApiResponse, Outcome, RequestOptions, RequestSpec, ResponseAnomaly};
