//! Connectors

use super::api::{ApiClient, CallOptions};
use super::projects::ProjectsClient;
use super::require_id;
use crate::error::{Error, Result};
use crate::types::JsonValue;

/// Client for `/v1/projects/{project}/connectors`
#[derive(Debug, Clone)]
pub struct ConnectorsClient {
    api: ApiClient,
    projects: ProjectsClient,
}

impl ConnectorsClient {
    pub fn new(api: ApiClient, projects: ProjectsClient) -> Self {
        Self { api, projects }
    }

    async fn base(&self, project: &str) -> Result<String> {
        let project = self.projects.resolve_id(project).await?;
        Ok(format!("/v1/projects/{project}/connectors"))
    }

    pub async fn list(&self, project: &str, options: &CallOptions) -> Result<JsonValue> {
        let base = self.base(project).await?;
        self.api.get(&base, options).await
    }

    pub async fn get(&self, project: &str, id: &str, options: &CallOptions) -> Result<JsonValue> {
        let id = require_id("connector", id)?;
        let base = self.base(project).await?;
        self.api.get(&format!("{base}/{id}"), options).await
    }

    pub async fn create(
        &self,
        project: &str,
        definition: JsonValue,
        options: &CallOptions,
    ) -> Result<JsonValue> {
        let has_type = definition
            .get("type")
            .and_then(JsonValue::as_str)
            .is_some_and(|t| !t.trim().is_empty());
        if !has_type {
            return Err(Error::validation("a connector definition needs a \"type\""));
        }
        let base = self.base(project).await?;
        self.api.post(&base, definition, options).await
    }

    pub async fn delete(&self, project: &str, id: &str, options: &CallOptions) -> Result<JsonValue> {
        let id = require_id("connector", id)?;
        let base = self.base(project).await?;
        self.api.delete(&format!("{base}/{id}"), options).await
    }
}
