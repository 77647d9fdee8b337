//! Configuration loading, validation, and management for the Selene
//! context engine.
//!
//! Loads configuration from `~/.selene/context.toml` (or the path in
//! `SELENE_CONTEXT_CONFIG`). Every field has a default, so a missing file
//! or a partial file is valid. Validates all settings at load time.

use selene_core::UseCase;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SELENE_CONTEXT_CONFIG";

/// The root configuration structure.
///
/// Maps directly to `~/.selene/context.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Document chunking
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Query-time chunk retrieval
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Per-use-case token ceilings
    #[serde(default)]
    pub budgets: BudgetConfig,

    /// Conversation history compression
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Smallest chunk the merger aims for (the final chunk may be smaller)
    #[serde(default = "default_min_tokens")]
    pub min_tokens: usize,

    /// Hard ceiling per chunk
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Characters per estimated token
    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: usize,
}

fn default_min_tokens() -> usize {
    100
}
fn default_max_tokens() -> usize {
    256
}
fn default_chars_per_token() -> usize {
    4
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_tokens: default_min_tokens(),
            max_tokens: default_max_tokens(),
            chars_per_token: default_chars_per_token(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum chunks returned per query
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Candidates below this cosine similarity are discarded
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,

    /// Optional token ceiling on the summed chunk estimates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_budget: Option<usize>,
}

fn default_limit() -> usize {
    10
}
fn default_min_similarity() -> f32 {
    0.3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            min_similarity: default_min_similarity(),
            token_budget: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetConfig {
    #[serde(default = "default_briefing_budget")]
    pub briefing: usize,

    #[serde(default = "default_synthesis_budget")]
    pub synthesis: usize,

    #[serde(default = "default_deep_dive_budget")]
    pub deep_dive: usize,

    #[serde(default = "default_chat_budget")]
    pub chat: usize,
}

fn default_briefing_budget() -> usize {
    1500
}
fn default_synthesis_budget() -> usize {
    2000
}
fn default_deep_dive_budget() -> usize {
    3000
}
fn default_chat_budget() -> usize {
    3000
}

impl BudgetConfig {
    /// Token ceiling for a use-case.
    pub fn for_use_case(&self, use_case: UseCase) -> usize {
        match use_case {
            UseCase::Briefing => self.briefing,
            UseCase::Synthesis => self.synthesis,
            UseCase::DeepDive => self.deep_dive,
            UseCase::Chat => self.chat,
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            briefing: default_briefing_budget(),
            synthesis: default_synthesis_budget(),
            deep_dive: default_deep_dive_budget(),
            chat: default_chat_budget(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Turns (user + assistant pairs) always kept verbatim
    #[serde(default = "default_recent_turns")]
    pub recent_turns: usize,

    /// Token ceiling for the whole history block
    #[serde(default = "default_history_tokens")]
    pub max_tokens: usize,

    /// Older messages are cut to this many characters
    #[serde(default = "default_max_chars_per_message")]
    pub max_chars_per_message: usize,

    /// Label used for assistant turns
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
}

fn default_recent_turns() -> usize {
    4
}
fn default_history_tokens() -> usize {
    2000
}
fn default_max_chars_per_message() -> usize {
    100
}
fn default_assistant_name() -> String {
    "Selene".into()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            recent_turns: default_recent_turns(),
            max_tokens: default_history_tokens(),
            max_chars_per_message: default_max_chars_per_message(),
            assistant_name: default_assistant_name(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default location, honouring
    /// `SELENE_CONTEXT_CONFIG`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var(CONFIG_PATH_ENV) {
            Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => Self::config_dir().join("context.toml"),
        };
        Self::load_from(&path)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config = Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::ParseError { reason, .. } => ConfigError::ParseError {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        tracing::debug!(path = %path.display(), "Loaded context engine config");
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".selene")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let chunking = &self.chunking;
        if chunking.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "chunking.max_tokens must be > 0".into(),
            ));
        }
        if chunking.min_tokens > chunking.max_tokens {
            return Err(ConfigError::ValidationError(format!(
                "chunking.min_tokens ({}) must not exceed chunking.max_tokens ({})",
                chunking.min_tokens, chunking.max_tokens
            )));
        }
        if chunking.chars_per_token == 0 {
            return Err(ConfigError::ValidationError(
                "chunking.chars_per_token must be > 0".into(),
            ));
        }

        let min_sim = self.retrieval.min_similarity;
        if !(-1.0..=1.0).contains(&min_sim) {
            return Err(ConfigError::ValidationError(
                "retrieval.min_similarity must be between -1.0 and 1.0".into(),
            ));
        }

        for use_case in UseCase::ALL {
            if self.budgets.for_use_case(use_case) == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "budgets.{} must be > 0",
                    use_case.as_str().replace('-', "_")
                )));
            }
        }

        if self.history.max_chars_per_message < 4 {
            return Err(ConfigError::ValidationError(
                "history.max_chars_per_message must be at least 4".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for selene_core::Error {
    fn from(err: ConfigError) -> Self {
        selene_core::Error::Config {
            message: err.to_string(),
        }
    }
}
