//! Runtime configuration.
//!
//! Resolution order for each setting: command-line flag, environment
//! variable, built-in default.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub const SERVER_ENV: &str = "ADMISSAI_SERVER";
pub const DATA_DIR_ENV: &str = "ADMISSAI_DATA_DIR";
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

/// Name of the per-user state directory under the platform data dir.
const APP_DIR: &str = "admissai";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL, without trailing slash.
    pub server_url: String,
    /// Where checklist completion is persisted.
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve from flags and the process environment.
    pub fn resolve(server: Option<String>, data_dir: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with(server, data_dir, |key| std::env::var(key).ok())
    }

    /// Resolve using `env` to look up environment variables.
    pub fn resolve_with(
        server: Option<String>,
        data_dir: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let non_empty = |v: String| (!v.trim().is_empty()).then_some(v);

        let server_url = server
            .and_then(non_empty)
            .or_else(|| env(SERVER_ENV).and_then(non_empty))
            .unwrap_or_else(|| DEFAULT_SERVER.to_string())
            .trim_end_matches('/')
            .to_string();

        let data_dir = match data_dir.or_else(|| env(DATA_DIR_ENV).and_then(non_empty).map(PathBuf::from)) {
            Some(dir) => dir,
            None => dirs::data_dir()
                .context("Could not determine a data directory; set ADMISSAI_DATA_DIR")?
                .join(APP_DIR),
        };

        Ok(Self {
            server_url,
            data_dir,
        })
    }
}
