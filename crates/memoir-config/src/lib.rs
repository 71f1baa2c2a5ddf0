// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Memoir biography bot.
//!
//! TOML with `deny_unknown_fields`, layered over the XDG hierarchy with
//! `MEMOIR_*` environment overrides, then semantically validated. Errors
//! render as miette diagnostics, with typo suggestions for unknown keys.
//!
//! ```no_run
//! let config = memoir_config::load_and_validate().expect("config errors");
//! println!("agent: {}", config.agent.name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::MemoirConfig;

/// Load from the XDG hierarchy + env, then validate.
///
/// Deserialization failures come back as diagnostics (with suggestions);
/// a config that parses still has to pass the semantic checks in
/// [`validation`].
pub fn load_and_validate() -> Result<MemoirConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Same pipeline over a TOML string, for tests and embedding.
pub fn load_and_validate_str(toml_content: &str) -> Result<MemoirConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}
