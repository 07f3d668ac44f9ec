//! Projects
//!
//! Projects have an internal id (`prj_...`) and a short numeric id that
//! users type. Numeric references are resolved against the project list,
//! which is cached for the configured TTL.

use super::api::{ApiClient, CallOptions};
use super::require_id;
use crate::cache::TtlCache;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Cache key holding the project list
pub const PROJECTS_CACHE_KEY: &str = "projects:list";

/// A project as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Internal id
    pub id: String,
    /// Short numeric id
    #[serde(default, alias = "numericId", alias = "numeric_id")]
    pub number: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Client for `/v1/projects`
#[derive(Debug, Clone)]
pub struct ProjectsClient {
    api: ApiClient,
    cache: TtlCache<Vec<Project>>,
}

impl ProjectsClient {
    /// Create a client whose project list is cached for `ttl`
    pub fn new(api: ApiClient, ttl: Duration) -> Self {
        Self {
            api,
            cache: TtlCache::new(ttl),
        }
    }

    /// The project-list cache
    pub fn cache(&self) -> &TtlCache<Vec<Project>> {
        &self.cache
    }

    /// List projects as raw JSON, reduced per `options`
    pub async fn list(&self, options: &CallOptions) -> Result<JsonValue> {
        self.api.get("/v1/projects", options).await
    }

    /// Fetch one project by internal or numeric id
    pub async fn get(&self, reference: &str, options: &CallOptions) -> Result<JsonValue> {
        let id = self.resolve_id(reference).await?;
        self.api.get(&format!("/v1/projects/{id}"), options).await
    }

    /// All projects, served from the cache while it is fresh
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let api = self.api.clone();
        self.cache
            .get(
                PROJECTS_CACHE_KEY,
                || async move {
                    let body = api.get("/v1/projects", &CallOptions::new()).await?;
                    parse_projects(body)
                },
                None,
            )
            .await
    }

    /// Map a user-supplied reference onto an internal project id
    ///
    /// Numeric references are looked up in the project list; anything
    /// else is taken to be an internal id already.
    pub async fn resolve_id(&self, reference: &str) -> Result<String> {
        let reference = require_id("project", reference)?;

        let Ok(number) = reference.parse::<u64>() else {
            return Ok(reference);
        };

        let projects = self.list_projects().await?;
        let project = projects
            .iter()
            .find(|p| p.number == Some(number))
            .ok_or_else(|| Error::not_found("project", reference))?;

        debug!(number, id = %project.id, "Resolved numeric project id");
        require_id("project", &project.id)
    }

    /// Drop the cached project list
    pub async fn invalidate_cache(&self) {
        self.cache.delete(PROJECTS_CACHE_KEY).await;
    }
}

/// Accept a bare array or an envelope (`{"projects": [..]}`, `{"data": [..]}`)
fn parse_projects(body: JsonValue) -> Result<Vec<Project>> {
    let items = match body {
        JsonValue::Object(mut object) => object
            .remove("projects")
            .or_else(|| object.remove("data"))
            .unwrap_or(JsonValue::Array(Vec::new())),
        other => other,
    };
    Ok(serde_json::from_value(items)?)
}
