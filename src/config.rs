//! Game configuration loaded from TOML.

use crate::search::SearchBudget;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Which provider resolves delegated turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// In-process alpha-beta search.
    Native,
    /// External engine subprocess.
    Subprocess,
}

/// Search provider settings.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider selection.
    #[serde(default = "default_kind")]
    kind: ProviderKind,

    /// Engine command line, required for `kind = "subprocess"`.
    #[serde(default)]
    command: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            command: Vec::new(),
        }
    }
}

fn default_kind() -> ProviderKind {
    ProviderKind::Native
}

fn default_budget_ms() -> u64 {
    3_000
}

fn default_initial_depth() -> u8 {
    5
}

fn default_max_depth() -> u8 {
    19
}

/// Game and search configuration.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Total wall-clock budget per delegated turn, in milliseconds.
    #[serde(default = "default_budget_ms")]
    budget_ms: u64,

    /// First search depth attempted.
    #[serde(default = "default_initial_depth")]
    initial_depth: u8,

    /// Deepest search depth attempted.
    #[serde(default = "default_max_depth")]
    max_depth: u8,

    /// Provider settings.
    #[serde(default)]
    provider: ProviderConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            budget_ms: default_budget_ms(),
            initial_depth: default_initial_depth(),
            max_depth: default_max_depth(),
            provider: ProviderConfig::default(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(
            budget_ms = config.budget_ms,
            initial_depth = config.initial_depth,
            max_depth = config.max_depth,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Checks that the settings describe a runnable game.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.budget_ms == 0 {
            return Err(ConfigError::new("budget_ms must be positive".to_string()));
        }
        if self.initial_depth == 0 {
            return Err(ConfigError::new(
                "initial_depth must be at least 1".to_string(),
            ));
        }
        if self.initial_depth > self.max_depth {
            return Err(ConfigError::new(format!(
                "initial_depth {} exceeds max_depth {}",
                self.initial_depth, self.max_depth
            )));
        }
        if self.provider.kind == ProviderKind::Subprocess && self.provider.command.is_empty() {
            return Err(ConfigError::new(
                "provider.command is required for the subprocess provider".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the per-turn search budget these settings describe.
    pub fn budget(&self) -> SearchBudget {
        SearchBudget::new(
            Duration::from_millis(self.budget_ms),
            self.initial_depth,
            self.max_depth,
        )
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        warn!(error_message = %message, "Config error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
