// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde cannot express.
//!
//! All problems are collected before reporting, so an operator fixes a
//! broken config in one round trip instead of one error at a time.

use crate::diagnostic::ConfigError;
use crate::model::MemoirConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Check a deserialized config; `Err` carries every violation found.
pub fn validate_config(config: &MemoirConfig) -> Result<(), Vec<ConfigError>> {
    let problems = collect_problems(config);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems
            .into_iter()
            .map(|message| ConfigError::Validation { message })
            .collect())
    }
}

fn collect_problems(config: &MemoirConfig) -> Vec<String> {
    let mut problems = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        problems.push("storage.database_path must not be empty".to_string());
    }

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        problems.push(format!(
            "agent.log_level `{}` is not one of trace, debug, info, warn, error",
            config.agent.log_level
        ));
    }

    if config.refinement.max_refinement_attempts == 0 {
        problems.push(
            "refinement.max_refinement_attempts must be at least 1".to_string(),
        );
    }

    if config.anthropic.max_tokens == 0 {
        problems.push("anthropic.max_tokens must be at least 1".to_string());
    }

    if config.anthropic.request_timeout_secs == 0 {
        problems.push("anthropic.request_timeout_secs must be at least 1".to_string());
    }

    if config
        .telegram
        .bot_token
        .as_deref()
        .is_some_and(|token| token.trim().is_empty())
    {
        problems.push("telegram.bot_token must not be empty when set".to_string());
    }

    problems
}
