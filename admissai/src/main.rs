//! AdmissAI command-line client.
//!
//! Logs go to stderr (filtered by `RUST_LOG`, default `admissai=warn`) so
//! stdout only carries command output.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use admissai::cli::{execute, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("admissai=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    execute(cli).await
}
