// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config loading end to end: TOML, defaults, env overrides, diagnostics.

use figment::Jail;
use memoir_config::diagnostic::ConfigError;
use memoir_config::{load_and_validate_str, load_config_from_str};

#[test]
fn a_fully_specified_toml_round_trips() {
    let config = load_config_from_str(
        r#"
[agent]
name = "aurelia"
log_level = "trace"

[telegram]
bot_token = "9900:token"
allowed_users = ["@grandpajoe", "77001"]

[anthropic]
api_key = "sk-ant-test"
max_tokens = 4096
request_timeout_secs = 45

[storage]
database_path = "/var/lib/memoir/test.db"
wal_mode = false

[refinement]
max_refinement_attempts = 2
"#,
    )
    .expect("well-formed TOML");

    assert_eq!(config.agent.name, "aurelia");
    assert_eq!(config.agent.log_level, "trace");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("9900:token"));
    assert_eq!(config.telegram.allowed_users, ["@grandpajoe", "77001"]);
    assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-ant-test"));
    assert_eq!(config.anthropic.max_tokens, 4096);
    assert_eq!(config.anthropic.request_timeout_secs, 45);
    assert_eq!(config.storage.database_path, "/var/lib/memoir/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.refinement.max_refinement_attempts, 2);
}

#[test]
fn an_empty_toml_falls_back_to_defaults() {
    let config = load_config_from_str("").expect("empty TOML is fine");

    assert_eq!(config.agent.name, "memoir");
    assert_eq!(config.agent.log_level, "info");
    assert!(config.telegram.bot_token.is_none());
    assert!(config.telegram.allowed_users.is_empty());
    assert!(config.anthropic.api_key.is_none());
    assert_eq!(config.anthropic.max_tokens, 1024);
    assert_eq!(config.anthropic.api_version, "2023-06-01");
    assert_eq!(config.anthropic.request_timeout_secs, 60);
    assert!(config.storage.database_path.ends_with("memoir.db"));
    assert!(config.storage.wal_mode);
    assert_eq!(config.refinement.max_refinement_attempts, 3);
}

#[test]
fn unknown_keys_are_rejected_not_ignored() {
    let err = load_config_from_str("[agent]\nnaem = \"x\"\n")
        .expect_err("unknown key must not pass");
    let rendered = err.to_string();
    assert!(
        rendered.contains("unknown field") || rendered.contains("naem"),
        "got: {rendered}"
    );
}

#[test]
fn a_typo_earns_a_suggestion_through_the_diagnostic_bridge() {
    let errors =
        load_and_validate_str("[telegram]\nbot_tken = \"abc\"\n").expect_err("typo must fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion: Some(s), .. }
            if key == "bot_tken" && s == "bot_token"
    )));
}

#[test]
fn semantic_violations_surface_after_parsing() {
    let errors = load_and_validate_str(
        "[refinement]\nmax_refinement_attempts = 0\n\n[anthropic]\nrequest_timeout_secs = 0\n",
    )
    .expect_err("zero bounds must fail validation");
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("memoir.toml", "[agent]\nname = \"from-toml\"\n")?;
        jail.set_env("MEMOIR_AGENT_NAME", "from-env");

        let config = memoir_config::load_config().expect("config should load");
        assert_eq!(config.agent.name, "from-env");
        Ok(())
    });
}

#[test]
fn env_mapping_keeps_underscored_key_names_whole() {
    Jail::expect_with(|jail| {
        jail.set_env("MEMOIR_TELEGRAM_BOT_TOKEN", "42:XYZ");
        jail.set_env("MEMOIR_REFINEMENT_MAX_REFINEMENT_ATTEMPTS", "7");

        let config = memoir_config::load_config().expect("config should load");
        assert_eq!(config.telegram.bot_token.as_deref(), Some("42:XYZ"));
        assert_eq!(config.refinement.max_refinement_attempts, 7);
        Ok(())
    });
}
