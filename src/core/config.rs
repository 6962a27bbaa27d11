//! Configuration management for Reagent
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/reagent/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{ReagentError, Result};

/// Default step budget for a single run
pub const DEFAULT_MAX_STEPS: usize = 5;

/// Marker the backend is asked to stop at before inventing its own observation
pub const OBSERVATION_STOP: &str = "Observation:";

/// Main configuration for Reagent
///
/// Every section and field is optional in the file; anything left out takes
/// its default, which in turn honours the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ollama configuration
    pub ollama: OllamaConfig,
    /// Model configuration
    pub model: ModelConfig,
    /// Agent loop configuration
    pub agent: AgentConfig,
    /// Streaming configuration
    pub streaming: StreamingConfig,
}

/// Ollama server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Host address (default: localhost)
    pub host: String,
    /// Port number (default: 11434)
    pub port: u16,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Generation model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name as known to the backend
    pub name: String,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Maximum tokens to generate per step
    pub num_predict: Option<u32>,
}

/// Agent loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum generate/classify cycles per run
    /// Default: 5
    pub max_steps: usize,
    /// Stop markers passed to the backend on every call
    pub stop_markers: Vec<String>,
    /// Per-tool time limit; unset means tools may run as long as they like
    pub tool_timeout_secs: Option<u64>,
    /// Whether to show debug output
    pub debug: bool,
}

impl AgentConfig {
    /// Tool time limit as a `Duration`
    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_secs.map(Duration::from_secs)
    }
}

/// Streaming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Whether to stream generated tokens as they arrive
    pub enabled: bool,
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| v == "true" || v == "1")
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("OLLAMA_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(11434),
            timeout_secs: 120,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: env::var("REAGENT_MODEL").unwrap_or_else(|_| "qwen3:8b".to_string()),
            temperature: Some(0.1),
            num_predict: None,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: env::var("REAGENT_MAX_STEPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_STEPS),
            stop_markers: vec![OBSERVATION_STOP.to_string()],
            tool_timeout_secs: None,
            debug: env_flag("REAGENT_DEBUG").unwrap_or(false),
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            enabled: env_flag("REAGENT_STREAMING").unwrap_or(false),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reagent")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    ///
    /// An unreadable or malformed file is reported and replaced by defaults.
    pub fn load() -> Self {
        Self::try_load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring config file: {}", e);
            Self::default()
        })
    }

    /// Load configuration, failing only when an existing file is unusable
    pub fn try_load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        if !Self::config_file().exists() {
            tracing::debug!("No config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from_file()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(ReagentError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| ReagentError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ReagentError::config(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| ReagentError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ReagentError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| ReagentError::config(format!("Failed to write config: {}", e)))?;

        Ok(config_path)
    }

    /// Get the full Ollama API URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        toml::to_string_pretty(&Config::default())
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}
