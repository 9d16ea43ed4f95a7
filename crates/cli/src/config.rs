//! Configuration loading from tiller.toml.

use runtime::RuntimeConfig;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Invocation-loop settings.
    #[serde(default)]
    pub runtime: RuntimeSection,
}

/// Backend provider configuration.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Model to use.
    #[serde(default = "default_model")]
    pub model: String,

    /// Anthropic API key. Falls back to the ANTHROPIC_API_KEY environment
    /// variable when absent.
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: None,
        }
    }
}

/// Loop settings mirrored into [`RuntimeConfig`].
#[derive(Debug, Deserialize)]
pub struct RuntimeSection {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            max_steps: default_max_steps(),
            verbose: false,
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_steps() -> u32 {
    16
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve the API key from config or environment.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = &self.backend.api_key {
            return Ok(key.clone());
        }
        std::env::var("ANTHROPIC_API_KEY").map_err(|_| ConfigError::MissingApiKey)
    }

    /// Loop configuration for the runtime.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            max_retries: self.runtime.max_retries,
            max_steps: self.runtime.max_steps,
            verbose: self.runtime.verbose,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("no API key: set backend.api_key in tiller.toml or ANTHROPIC_API_KEY")]
    MissingApiKey,
}
