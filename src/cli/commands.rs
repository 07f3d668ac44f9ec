//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// flowctl - command-line client for the flowctl API
#[derive(Parser, Debug)]
#[command(name = "flowctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Project id (internal or numeric); defaults to `default_project`
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only the number of results
    #[arg(long, global = true)]
    pub count: bool,

    /// Keep only these fields (comma-separated)
    #[arg(long, global = true)]
    pub fields: Option<String>,

    /// Keep at most this many results
    #[arg(long, global = true)]
    pub limit: Option<usize>,

    /// Network retry budget for this invocation
    #[arg(long, global = true)]
    pub retries: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with projects
    Projects {
        #[command(subcommand)]
        action: ProjectsCommand,
    },

    /// Work with pipelines
    Pipelines {
        #[command(subcommand)]
        action: PipelinesCommand,
    },

    /// Work with connectors
    Connectors {
        #[command(subcommand)]
        action: ConnectorsCommand,
    },

    /// Work with automations
    Automations {
        #[command(subcommand)]
        action: AutomationsCommand,
    },

    /// Inspect client configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

/// A resource id argument
#[derive(Args, Debug, Clone)]
pub struct IdArg {
    /// Resource id
    pub id: String,
}

/// A request body read from a file
#[derive(Args, Debug, Clone)]
pub struct FileArg {
    /// Request body (JSON or YAML)
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    /// List projects
    List,
    /// Show one project
    Get(IdArg),
}

#[derive(Subcommand, Debug)]
pub enum PipelinesCommand {
    /// List pipelines in the project
    List,
    /// Show one pipeline
    Get(IdArg),
    /// Create a pipeline
    Create(FileArg),
    /// Update a pipeline
    Update {
        /// Pipeline id
        id: String,
        #[command(flatten)]
        file: FileArg,
    },
    /// Delete a pipeline
    Delete(IdArg),
    /// Trigger a pipeline run
    Run(IdArg),
}

#[derive(Subcommand, Debug)]
pub enum ConnectorsCommand {
    /// List connectors in the project
    List,
    /// Show one connector
    Get(IdArg),
    /// Create a connector
    Create(FileArg),
    /// Delete a connector
    Delete(IdArg),
}

#[derive(Subcommand, Debug)]
pub enum AutomationsCommand {
    /// List automations in the project
    List,
    /// Show one automation
    Get(IdArg),
    /// Create an automation
    Create(FileArg),
    /// Delete an automation
    Delete(IdArg),
    /// Enable an automation
    Enable(IdArg),
    /// Disable an automation
    Disable(IdArg),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
