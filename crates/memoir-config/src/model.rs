// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration shape.
//!
//! Every section is optional and fully defaulted; unknown keys are
//! rejected (`deny_unknown_fields`) so typos fail loudly at startup
//! instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level configuration, one section per concern.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoirConfig {
    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub anthropic: AnthropicConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub refinement: RefinementConfig,
}

/// The biographer's identity and logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Persona name woven into the system prompt.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "memoir".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram transport settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API token; the serve command refuses to start without one.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// User ids or usernames allowed to talk to the bot. Empty means
    /// open to anyone.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

/// Verdict source settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Falls back to `ANTHROPIC_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model that judges and edits the stories.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Generation cap per verdict.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Bound on one classification call; an expired wait counts as a
    /// verdict source failure.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

/// SQLite settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Database file; parent directories are created on open.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// WAL journal mode (on unless a network filesystem forces it off).
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("memoir").join("memoir.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("memoir.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Refinement loop settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RefinementConfig {
    /// Rounds of follow-up questions before an answer is accepted as-is.
    #[serde(default = "default_max_refinement_attempts")]
    pub max_refinement_attempts: u32,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            max_refinement_attempts: default_max_refinement_attempts(),
        }
    }
}

fn default_max_refinement_attempts() -> u32 {
    3
}
