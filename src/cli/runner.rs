//! CLI runner - executes commands

use crate::auth::{AuthTokenProvider, ChainTokenSource};
use crate::cli::commands::{
    AutomationsCommand, Cli, Commands, ConfigCommand, ConnectorsCommand, OutputFormat,
    PipelinesCommand, ProjectsCommand,
};
use crate::client::{
    ApiClient, AutomationsClient, CallOptions, ConnectorsClient, PipelinesClient, ProjectsClient,
};
use crate::config::Config;
use crate::error::{Error, Result, ResultExt};
use crate::transform::TokenEfficiencyOptions;
use crate::types::JsonValue;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command and print its result
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let cwd = std::env::current_dir().ok();
        let home = std::env::var_os("HOME").map(PathBuf::from);
        let auth =
            AuthTokenProvider::new(ChainTokenSource::default_chain(cwd.as_deref(), home.as_deref()));

        let result = self.execute(&config, auth).await?;
        self.output_message(&result);
        Ok(())
    }

    /// Load configuration and apply command-line overrides
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.cli.config.as_deref())?;
        if let Some(retries) = self.cli.retries {
            config.retries = retries;
        }
        Ok(config)
    }

    /// Execute the command against the API and return the response body
    pub async fn execute(&self, config: &Config, auth: AuthTokenProvider) -> Result<JsonValue> {
        if let Commands::Config {
            action: ConfigCommand::Show,
        } = &self.cli.command
        {
            return Ok(serde_json::to_value(config)?);
        }

        let api = ApiClient::from_config(config, auth)?;
        let projects = ProjectsClient::new(api.clone(), Duration::from_secs(config.cache_ttl_secs));
        let options = CallOptions::from(self.efficiency());

        match &self.cli.command {
            Commands::Projects { action } => match action {
                ProjectsCommand::List => projects.list(&options).await,
                ProjectsCommand::Get(arg) => projects.get(&arg.id, &options).await,
            },

            Commands::Pipelines { action } => {
                let project = self.project(config)?;
                let pipelines = PipelinesClient::new(api, projects);
                match action {
                    PipelinesCommand::List => pipelines.list(project, &options).await,
                    PipelinesCommand::Get(arg) => pipelines.get(project, &arg.id, &options).await,
                    PipelinesCommand::Create(arg) => {
                        pipelines
                            .create(project, read_body(&arg.file)?, &options)
                            .await
                    }
                    PipelinesCommand::Update { id, file } => {
                        pipelines
                            .update(project, id, read_body(&file.file)?, &options)
                            .await
                    }
                    PipelinesCommand::Delete(arg) => {
                        pipelines.delete(project, &arg.id, &options).await
                    }
                    PipelinesCommand::Run(arg) => pipelines.run(project, &arg.id, &options).await,
                }
            }

            Commands::Connectors { action } => {
                let project = self.project(config)?;
                let connectors = ConnectorsClient::new(api, projects);
                match action {
                    ConnectorsCommand::List => connectors.list(project, &options).await,
                    ConnectorsCommand::Get(arg) => {
                        connectors.get(project, &arg.id, &options).await
                    }
                    ConnectorsCommand::Create(arg) => {
                        connectors
                            .create(project, read_body(&arg.file)?, &options)
                            .await
                    }
                    ConnectorsCommand::Delete(arg) => {
                        connectors.delete(project, &arg.id, &options).await
                    }
                }
            }

            Commands::Automations { action } => {
                let project = self.project(config)?;
                let automations = AutomationsClient::new(api, projects);
                match action {
                    AutomationsCommand::List => automations.list(project, &options).await,
                    AutomationsCommand::Get(arg) => {
                        automations.get(project, &arg.id, &options).await
                    }
                    AutomationsCommand::Create(arg) => {
                        automations
                            .create(project, read_body(&arg.file)?, &options)
                            .await
                    }
                    AutomationsCommand::Delete(arg) => {
                        automations.delete(project, &arg.id, &options).await
                    }
                    AutomationsCommand::Enable(arg) => {
                        automations.enable(project, &arg.id, &options).await
                    }
                    AutomationsCommand::Disable(arg) => {
                        automations.disable(project, &arg.id, &options).await
                    }
                }
            }

            Commands::Config { .. } => Ok(serde_json::to_value(config)?),
        }
    }

    /// Token efficiency options from the global flags
    fn efficiency(&self) -> TokenEfficiencyOptions {
        TokenEfficiencyOptions {
            count: self.cli.count,
            fields: self.cli.fields.clone(),
            limit: self.cli.limit,
        }
    }

    /// `--project`, falling back to the configured default
    fn project<'a>(&'a self, config: &'a Config) -> Result<&'a str> {
        let project = self
            .cli
            .project
            .as_deref()
            .or(config.default_project.as_deref())
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                Error::validation("no project given; pass --project or set default_project")
            })?;
        debug!(project, "Using project");
        Ok(project)
    }

    /// Output a result
    fn output_message(&self, msg: &JsonValue) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Read a request body file (JSON or YAML)
fn read_body(path: &Path) -> Result<JsonValue> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&contents).with_context(|| format!("Invalid body in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use tempfile::tempdir;

    fn runner(args: &[&str]) -> Runner {
        Runner::new(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_read_body_json_and_yaml() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("body.json");
        let yaml_path = dir.path().join("body.yaml");
        std::fs::write(&json_path, r#"{"name": "nightly"}"#).unwrap();
        std::fs::write(&yaml_path, "name: nightly\nsteps:\n  - extract\n").unwrap();

        assert_eq!(read_body(&json_path).unwrap(), json!({"name": "nightly"}));
        assert_eq!(
            read_body(&yaml_path).unwrap(),
            json!({"name": "nightly", "steps": ["extract"]})
        );
        assert!(read_body(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_project_falls_back_to_default() {
        let config = Config {
            default_project: Some("7".to_string()),
            ..Config::default()
        };

        let r = runner(&["flowctl", "pipelines", "list"]);
        assert_eq!(r.project(&config).unwrap(), "7");

        let r = runner(&["flowctl", "--project", "prj_x", "pipelines", "list"]);
        assert_eq!(r.project(&config).unwrap(), "prj_x");

        let r = runner(&["flowctl", "pipelines", "list"]);
        assert!(matches!(
            r.project(&Config::default()),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_efficiency_flags() {
        let r = runner(&["flowctl", "projects", "list", "--fields", "id,name", "--limit", "5"]);
        assert_eq!(
            r.efficiency(),
            TokenEfficiencyOptions::new().fields("id,name").limit(5)
        );
    }

    #[tokio::test]
    async fn test_config_show_has_no_token() {
        let config = Config::default();
        let r = runner(&["flowctl", "config", "show"]);
        let auth = AuthTokenProvider::new(crate::auth::StaticTokenSource::new("secret-token"));

        let shown = r.execute(&config, auth).await.unwrap();
        assert_eq!(shown["api_url"], config.api_url);
        assert!(!shown.to_string().contains("secret-token"));
    }
}
