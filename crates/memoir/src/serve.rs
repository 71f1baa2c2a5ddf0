// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `memoir serve` command implementation.
//!
//! Starts the bot with the Telegram channel adapter, the Anthropic verdict
//! source, and SQLite storage, then enters the agent loop. Supports
//! graceful shutdown via signal handlers.

use std::sync::Arc;

use memoir_agent::{shutdown, AgentLoop};
use memoir_anthropic::AnthropicVerdictSource;
use memoir_config::MemoirConfig;
use memoir_core::{MemoirError, StorageAdapter};
use memoir_storage::SqliteStorage;
use memoir_telegram::TelegramChannel;
use tracing::{error, info, warn};

/// Runs the `memoir serve` command.
pub async fn run_serve(config: MemoirConfig) -> Result<(), MemoirError> {
    init_tracing(&config.agent.log_level);

    info!("starting memoir serve");

    // Initialize storage (runs migrations).
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    if storage.count_questions().await? == 0 {
        warn!("no interview questions in the database -- run `memoir seed` first");
    }

    // Initialize the Anthropic verdict source.
    let verdicts = Arc::new(AnthropicVerdictSource::new(&config).map_err(|e| {
        error!(error = %e, "failed to initialize Anthropic verdict source");
        eprintln!(
            "error: Anthropic API key required. Set anthropic.api_key in memoir.toml or the ANTHROPIC_API_KEY environment variable."
        );
        e
    })?);

    // Initialize the Telegram channel.
    let channel = TelegramChannel::new(config.telegram.clone()).map_err(|e| {
        error!(error = %e, "failed to initialize Telegram channel");
        eprintln!(
            "error: Telegram bot token required. Set telegram.bot_token in memoir.toml or the MEMOIR_TELEGRAM_BOT_TOKEN environment variable."
        );
        e
    })?;

    // Install signal handlers and run until shutdown.
    let cancel = shutdown::install_signal_handler();
    let mut agent = AgentLoop::new(Box::new(channel), storage, verdicts, &config);
    agent.run(cancel).await
}

/// Initialize the tracing subscriber from config, honoring `RUST_LOG`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
