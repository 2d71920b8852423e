//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API access and crawling behavior
    #[serde(default)]
    pub source: SourceConfig,

    /// Output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Report rendering settings
    #[serde(default)]
    pub render: RenderConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.token_env.trim().is_empty() {
            return Err(AppError::validation("source.token_env is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if !(1..=100).contains(&self.source.per_page) {
            return Err(AppError::validation(
                "source.per_page must be between 1 and 100",
            ));
        }
        if self.source.max_concurrent == 0 {
            return Err(AppError::validation("source.max_concurrent must be > 0"));
        }
        if self.render.commit_message_width == 0 {
            return Err(AppError::validation(
                "render.commit_message_width must be > 0",
            ));
        }
        url::Url::parse(&self.source.api_url)
            .map_err(|e| AppError::validation(format!("source.api_url is invalid: {e}")))?;
        Ok(())
    }

    /// Read the bearer token from the configured environment variable.
    pub fn token(&self) -> Result<String> {
        let token = std::env::var(&self.source.token_env).unwrap_or_default();
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::config(format!(
                "{} environment variable is required",
                self.source.token_env
            )));
        }
        Ok(token.to_string())
    }
}

/// Remote API and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the REST API
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Environment variable holding the bearer token
    #[serde(default = "defaults::token_env")]
    pub token_env: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Items requested per page for paginated endpoints
    #[serde(default = "defaults::per_page")]
    pub per_page: u32,

    /// Repositories processed at the same time
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::api_url(),
            token_env: defaults::token_env(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            per_page: defaults::per_page(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Filesystem locations used by the render phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory receiving the generated pages
    #[serde(default = "defaults::output_dir")]
    pub output_dir: PathBuf,

    /// Directory overriding the bundled templates
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
            template_dir: None,
        }
    }
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Maximum graphemes of a commit summary shown in tables
    #[serde(default = "defaults::commit_message_width")]
    pub commit_message_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            commit_message_width: defaults::commit_message_width(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn api_url() -> String {
        "https://api.github.com".into()
    }
    pub fn token_env() -> String {
        "GITHUB_TOKEN".into()
    }
    pub fn user_agent() -> String {
        concat!("unreleased/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn per_page() -> u32 {
        100
    }
    pub fn max_concurrent() -> usize {
        1
    }
    pub fn output_dir() -> PathBuf {
        PathBuf::from("output")
    }
    pub fn commit_message_width() -> usize {
        100
    }
}
