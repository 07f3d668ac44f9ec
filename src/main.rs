//! flowctl CLI
//!
//! Command-line interface for the flowctl API

use clap::Parser;
use flowctl::cli::{Cli, Runner};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let default_filter = if cli.verbose { "flowctl=debug" } else { "flowctl=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        if let Some(hint) = e.hint() {
            eprintln!("Hint: {hint}");
        }
        std::process::exit(e.exit_code());
    }
}
