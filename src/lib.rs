//! # flowctl
//!
//! Client library and CLI for the flowctl data-pipeline API.
//!
//! ## Features
//!
//! - **Request Executor**: Bearer auth, per-attempt timeouts, one token
//!   refresh after `401`, bounded retries on network failures
//! - **Token Sources**: Environment variable and credentials files, tried in order
//! - **TTL Cache**: Async key/value cache with lazy expiration, used for
//!   project lookups
//! - **Token Efficiency**: `count`, `fields` and `limit` reductions of
//!   response bodies
//! - **Resource Clients**: Projects, pipelines, connectors and automations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowctl::auth::{AuthTokenProvider, ChainTokenSource};
//! use flowctl::client::{ApiClient, CallOptions, PipelinesClient, ProjectsClient};
//! use flowctl::config::Config;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> flowctl::Result<()> {
//!     let config = Config::load(None)?;
//!     let auth = AuthTokenProvider::new(ChainTokenSource::default_chain(None, None));
//!     let api = ApiClient::from_config(&config, auth)?;
//!
//!     let projects = ProjectsClient::new(api.clone(), Duration::from_secs(300));
//!     let pipelines = PipelinesClient::new(api, projects);
//!
//!     // Numeric project ids are resolved through the cached project list
//!     let list = pipelines.list("42", &CallOptions::new()).await?;
//!     println!("{list}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  CLI (clap)  →  Runner                                       │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │  Resource clients: projects, pipelines, connectors, automations│
//! └──────────┬───────────────────┬───────────────────┬───────────┘
//!            │                   │                   │
//! ┌──────────┴──────┐ ┌──────────┴──────┐ ┌──────────┴──────────┐
//! │ ApiClient       │ │ TtlCache        │ │ transform::apply    │
//! │ RequestExecutor │ │ (project list)  │ │ count/fields/limit  │
//! └──────────┬──────┘ └─────────────────┘ └─────────────────────┘
//!            │
//! ┌──────────┴──────────────────────────────────────────────────┐
//! │ AuthTokenProvider ← TokenSource chain   Transport (reqwest)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// API token sources and caching provider
pub mod auth;

/// Request executor and transport
pub mod http;

/// Response body reductions
pub mod transform;

/// Async TTL cache
pub mod cache;

/// Resource clients
pub mod client;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

pub use client::{ApiClient, CallOptions};
pub use config::Config;
pub use transform::TokenEfficiencyOptions;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
