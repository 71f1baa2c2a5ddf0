// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment layering: compiled defaults under the XDG file stack under
//! `MEMOIR_*` environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MemoirConfig;

/// Config section names, used to map env var prefixes onto TOML paths.
const SECTIONS: &[&str] = &["agent", "telegram", "anthropic", "storage", "refinement"];

/// Load from the standard locations. Later layers win:
/// defaults, `/etc/memoir/memoir.toml`, `~/.config/memoir/memoir.toml`,
/// `./memoir.toml`, then `MEMOIR_*` env vars.
pub fn load_config() -> Result<MemoirConfig, figment::Error> {
    defaults()
        .merge(Toml::file("/etc/memoir/memoir.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|dir| dir.join("memoir/memoir.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("memoir.toml"))
        .merge(env_provider())
        .extract()
}

/// A single TOML string over the defaults; no files, no env.
pub fn load_config_from_str(toml_content: &str) -> Result<MemoirConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

/// One explicit file over the defaults, still honoring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<MemoirConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

fn defaults() -> Figment {
    Figment::new().merge(Serialized::defaults(MemoirConfig::default()))
}

/// Env provider with an explicit section mapping.
///
/// `Env::split("_")` cannot work here: key names themselves contain
/// underscores, and `MEMOIR_TELEGRAM_BOT_TOKEN` has to land on
/// `telegram.bot_token`, not `telegram.bot.token`. Only the first
/// segment is a section, so only it becomes a dot.
fn env_provider() -> Env {
    Env::prefixed("MEMOIR_").map(|key| {
        let key = key.as_str();
        for section in SECTIONS {
            if let Some(rest) = key.strip_prefix(&format!("{section}_")) {
                return format!("{section}.{rest}").into();
            }
        }
        key.to_string().into()
    })
}
