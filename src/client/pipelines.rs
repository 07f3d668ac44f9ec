//! Pipelines

use super::api::{ApiClient, CallOptions};
use super::projects::ProjectsClient;
use super::require_id;
use crate::error::{Error, Result};
use crate::types::JsonValue;

/// Client for `/v1/projects/{project}/pipelines`
#[derive(Debug, Clone)]
pub struct PipelinesClient {
    api: ApiClient,
    projects: ProjectsClient,
}

impl PipelinesClient {
    pub fn new(api: ApiClient, projects: ProjectsClient) -> Self {
        Self { api, projects }
    }

    async fn base(&self, project: &str) -> Result<String> {
        let project = self.projects.resolve_id(project).await?;
        Ok(format!("/v1/projects/{project}/pipelines"))
    }

    pub async fn list(&self, project: &str, options: &CallOptions) -> Result<JsonValue> {
        let base = self.base(project).await?;
        self.api.get(&base, options).await
    }

    pub async fn get(&self, project: &str, id: &str, options: &CallOptions) -> Result<JsonValue> {
        let id = require_id("pipeline", id)?;
        let base = self.base(project).await?;
        self.api.get(&format!("{base}/{id}"), options).await
    }

    /// Create a pipeline from a JSON definition
    pub async fn create(
        &self,
        project: &str,
        definition: JsonValue,
        options: &CallOptions,
    ) -> Result<JsonValue> {
        if !definition.is_object() {
            return Err(Error::validation("a pipeline definition must be a JSON object"));
        }
        let base = self.base(project).await?;
        self.api.post(&base, definition, options).await
    }

    /// Replace fields of an existing pipeline
    pub async fn update(
        &self,
        project: &str,
        id: &str,
        changes: JsonValue,
        options: &CallOptions,
    ) -> Result<JsonValue> {
        let id = require_id("pipeline", id)?;
        if !changes.is_object() {
            return Err(Error::validation("pipeline changes must be a JSON object"));
        }
        let base = self.base(project).await?;
        self.api.patch(&format!("{base}/{id}"), changes, options).await
    }

    pub async fn delete(&self, project: &str, id: &str, options: &CallOptions) -> Result<JsonValue> {
        let id = require_id("pipeline", id)?;
        let base = self.base(project).await?;
        self.api.delete(&format!("{base}/{id}"), options).await
    }

    /// Trigger a run
    pub async fn run(&self, project: &str, id: &str, options: &CallOptions) -> Result<JsonValue> {
        let id = require_id("pipeline", id)?;
        let base = self.base(project).await?;
        self.api
            .post(&format!("{base}/{id}/run"), JsonValue::Object(Default::default()), options)
            .await
    }
}
