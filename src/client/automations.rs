//! Automations
//!
//! Scheduled or event-triggered actions attached to a project.

use super::api::{ApiClient, CallOptions};
use super::projects::ProjectsClient;
use super::require_id;
use crate::error::{Error, Result};
use crate::types::JsonValue;

/// Client for `/v1/projects/{project}/automations`
#[derive(Debug, Clone)]
pub struct AutomationsClient {
    api: ApiClient,
    projects: ProjectsClient,
}

impl AutomationsClient {
    pub fn new(api: ApiClient, projects: ProjectsClient) -> Self {
        Self { api, projects }
    }

    async fn base(&self, project: &str) -> Result<String> {
        let project = self.projects.resolve_id(project).await?;
        Ok(format!("/v1/projects/{project}/automations"))
    }

    pub async fn list(&self, project: &str, options: &CallOptions) -> Result<JsonValue> {
        let base = self.base(project).await?;
        self.api.get(&base, options).await
    }

    pub async fn get(&self, project: &str, id: &str, options: &CallOptions) -> Result<JsonValue> {
        let id = require_id("automation", id)?;
        let base = self.base(project).await?;
        self.api.get(&format!("{base}/{id}"), options).await
    }

    pub async fn create(
        &self,
        project: &str,
        definition: JsonValue,
        options: &CallOptions,
    ) -> Result<JsonValue> {
        if !definition.is_object() {
            return Err(Error::validation("an automation definition must be a JSON object"));
        }
        let base = self.base(project).await?;
        self.api.post(&base, definition, options).await
    }

    pub async fn delete(&self, project: &str, id: &str, options: &CallOptions) -> Result<JsonValue> {
        let id = require_id("automation", id)?;
        let base = self.base(project).await?;
        self.api.delete(&format!("{base}/{id}"), options).await
    }

    pub async fn enable(&self, project: &str, id: &str, options: &CallOptions) -> Result<JsonValue> {
        self.set_enabled(project, id, true, options).await
    }

    pub async fn disable(&self, project: &str, id: &str, options: &CallOptions) -> Result<JsonValue> {
        self.set_enabled(project, id, false, options).await
    }

    async fn set_enabled(
        &self,
        project: &str,
        id: &str,
        enabled: bool,
        options: &CallOptions,
    ) -> Result<JsonValue> {
        let id = require_id("automation", id)?;
        let base = self.base(project).await?;
        let action = if enabled { "enable" } else { "disable" };
        self.api
            .post(&format!("{base}/{id}/{action}"), JsonValue::Object(Default::default()), options)
            .await
    }
}
