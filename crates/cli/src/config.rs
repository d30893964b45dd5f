//! Configuration for the CLI.
//!
//! Read from `~/.config/sqlchat/config.toml` when present. Every field is
//! optional; the model credential is never stored here and is asked for
//! on each start.

use agent::AgentConfig;
use anyhow::{Context, Result};
use database::{DEFAULT_TTL, Options};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Non-secret settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Model identifier.
    pub model: String,

    /// Chat completions endpoint.
    pub endpoint: String,

    /// Stream model output.
    pub stream: bool,

    /// Model calls allowed per question.
    pub max_iterations: usize,

    /// Row limit suggested to the model.
    pub top_k: usize,

    /// Hand malformed tool calls back to the model.
    pub handle_parsing_errors: bool,

    /// Sample rows shown with each table schema.
    pub sample_rows: usize,

    /// Longest text value returned from a query.
    pub max_string_length: usize,

    /// Seconds an open connection is reused.
    pub ttl_secs: u64,

    /// Bundled database file, next to the executable when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded: Option<PathBuf>,
}

impl Config {
    /// Default location of the configuration file.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("sqlchat")
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config at {}", path.display()))
    }

    /// Write to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory {}", parent.display())
            })?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        tracing::info!("configuration saved to {}", path.display());
        Ok(())
    }

    /// Agent settings.
    pub fn agent(&self) -> AgentConfig {
        AgentConfig {
            model: self.model.clone(),
            stream: self.stream,
            max_iterations: self.max_iterations,
            top_k: self.top_k,
            handle_parsing_errors: self.handle_parsing_errors,
        }
    }

    /// Connection settings.
    pub fn options(&self) -> Options {
        Options {
            sample_rows: self.sample_rows,
            max_string_length: self.max_string_length,
            ..Default::default()
        }
    }

    /// How long an open connection is reused.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// The bundled database file.
    pub fn embedded_path(&self) -> Result<PathBuf> {
        match &self.embedded {
            Some(path) => Ok(path.clone()),
            None => Ok(database::embedded_path()?),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let agent = AgentConfig::default();
        let options = Options::default();
        Self {
            model: agent.model,
            endpoint: groq::ENDPOINT.into(),
            stream: agent.stream,
            max_iterations: agent.max_iterations,
            top_k: agent.top_k,
            handle_parsing_errors: agent.handle_parsing_errors,
            sample_rows: options.sample_rows,
            max_string_length: options.max_string_length,
            ttl_secs: DEFAULT_TTL.as_secs(),
            embedded: None,
        }
    }
}
