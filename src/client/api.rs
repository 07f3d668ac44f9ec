//! Executor plus token-efficiency transforms

use crate::auth::AuthTokenProvider;
use crate::config::Config;
use crate::error::Result;
use crate::http::{ExecutorConfig, RequestExecutor, RequestOptions};
use crate::transform::{self, TokenEfficiencyOptions};
use crate::types::{JsonValue, Method};
use std::sync::Arc;

/// Options for one API call
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Request-level options (params, headers, timeout, retries)
    pub request: RequestOptions,
    /// How to reduce the response body
    pub efficiency: TokenEfficiencyOptions,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.request = self.request.param(key, value);
        self
    }

    /// Replace the token efficiency options
    #[must_use]
    pub fn efficiency(mut self, efficiency: TokenEfficiencyOptions) -> Self {
        self.efficiency = efficiency;
        self
    }
}

impl From<TokenEfficiencyOptions> for CallOptions {
    fn from(efficiency: TokenEfficiencyOptions) -> Self {
        Self {
            efficiency,
            ..Self::default()
        }
    }
}

/// Shared handle to the API
#[derive(Debug, Clone)]
pub struct ApiClient {
    executor: Arc<RequestExecutor>,
}

impl ApiClient {
    /// Wrap an executor
    pub fn new(executor: RequestExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }

    /// Build a reqwest-backed client from configuration
    pub fn from_config(config: &Config, auth: AuthTokenProvider) -> Result<Self> {
        Ok(Self::new(RequestExecutor::new(
            ExecutorConfig::from(config),
            auth,
        )?))
    }

    /// The underlying executor
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Execute a request and apply token efficiency to the body
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
        options: &CallOptions,
    ) -> Result<JsonValue> {
        let response = self
            .executor
            .execute(method, path, body, &options.request)
            .await?;
        Ok(transform::apply(response.data, &options.efficiency))
    }

    pub async fn get(&self, path: &str, options: &CallOptions) -> Result<JsonValue> {
        self.call(Method::GET, path, None, options).await
    }

    pub async fn post(&self, path: &str, body: JsonValue, options: &CallOptions) -> Result<JsonValue> {
        self.call(Method::POST, path, Some(body), options).await
    }

    pub async fn put(&self, path: &str, body: JsonValue, options: &CallOptions) -> Result<JsonValue> {
        self.call(Method::PUT, path, Some(body), options).await
    }

    pub async fn patch(&self, path: &str, body: JsonValue, options: &CallOptions) -> Result<JsonValue> {
        self.call(Method::PATCH, path, Some(body), options).await
    }

    pub async fn delete(&self, path: &str, options: &CallOptions) -> Result<JsonValue> {
        self.call(Method::DELETE, path, None, options).await
    }
}
