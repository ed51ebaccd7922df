//! Configuration loading and typed config structures for the Gridworld
//! simulation.
//!
//! The canonical configuration lives in `gridworld-config.yaml` at the
//! project root. Every field has a default, so an empty file is a valid
//! configuration. Scenario layouts are separate JSON files referenced by
//! `simulation.layout`.

use std::path::{Path, PathBuf};

use gridworld_agents::AgentConfig;
use gridworld_world::GridLayout;
use serde::Deserialize;

/// Environment variable that replaces `simulation.layout`.
pub const LAYOUT_ENV_VAR: &str = "GRIDWORLD_LAYOUT";

/// Errors that can occur when loading configuration or layouts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Failed to parse a JSON layout.
    #[error("failed to parse layout JSON: {source}")]
    Layout {
        /// The underlying JSON parse error.
        source: serde_json::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(source: serde_json::Error) -> Self {
        Self::Layout { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `gridworld-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Run length, scenario and seed.
    #[serde(default)]
    pub simulation: RunConfig,

    /// Defaults applied to every agent.
    #[serde(default)]
    pub agents: AgentConfig,

    /// Log output settings, consumed by the engine binary.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file.
    ///
    /// `GRIDWORLD_LAYOUT`, when set, overrides `simulation.layout`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.simulation.apply_env_overrides();
        Ok(config)
    }

    /// Read and parse the layout named by `simulation.layout`.
    pub fn load_layout(&self) -> Result<GridLayout, ConfigError> {
        load_layout(&self.simulation.layout)
    }
}

/// Read a JSON layout file.
pub fn load_layout(path: &Path) -> Result<GridLayout, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// The `simulation` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Turns to run before stopping (default: 100).
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Path to the JSON layout (default: `data/simple_collection.json`).
    #[serde(default = "default_layout")]
    pub layout: PathBuf,

    /// Base seed for agent tie-breaking. Agent `i` in layout order gets
    /// `seed + i`. `None` leaves every agent unseeded.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Override the layout path with `GRIDWORLD_LAYOUT` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(LAYOUT_ENV_VAR) {
            self.layout = PathBuf::from(val);
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            layout: default_layout(),
            seed: None,
        }
    }
}

/// The `logging` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset (default: `info`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_max_steps() -> u32 {
    100
}

fn default_layout() -> PathBuf {
    PathBuf::from("data/simple_collection.json")
}

fn default_log_level() -> String {
    String::from("info")
}
