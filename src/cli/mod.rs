//! CLI module
//!
//! Command-line interface for the flowctl API.
//!
//! # Commands
//!
//! - `projects` - List and inspect projects
//! - `pipelines` - Manage and run pipelines
//! - `connectors` - Manage connectors
//! - `automations` - Manage automations
//! - `config show` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
