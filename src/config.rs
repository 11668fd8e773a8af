use anyhow::{Context, Result};

/// Organization whose repositories are aggregated. The jobs are meant to run
/// from the org's profile repository, so this stays a build-time default.
const DEFAULT_ORG: &str = "kornukopia-ai";

/// Immutable run configuration, built once per job and passed into each
/// component at construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub org: String,
    pub token: String,
}

impl Config {
    /// Read the API token from GITHUB_TOKEN; the organization uses the
    /// built-in default.
    pub fn from_env() -> Result<Self> {
        let token =
            std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN environment variable not set")?;
        Ok(Self {
            org: DEFAULT_ORG.to_string(),
            token,
        })
    }
}
