// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Memoir biography bot.
//!
//! Long polling via teloxide. Updates are screened in [`handler`] (DMs
//! only, allow-list, text only) and queued; the agent loop drains the
//! queue through [`ChannelAdapter::receive`]. Replies are plain text.

pub mod handler;

use std::sync::Arc;

use async_trait::async_trait;
use memoir_config::model::TelegramConfig;
use memoir_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, InboundMessage, MessageId, OutboundMessage,
};
use memoir_core::{ChannelAdapter, MemoirError, PluginAdapter};
use teloxide::prelude::*;
use teloxide::types::{ChatAction, ChatId, Recipient};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    queue_tx: mpsc::Sender<InboundMessage>,
    queue_rx: Mutex<mpsc::Receiver<InboundMessage>>,
    polling: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Fails when `telegram.bot_token` is missing or blank.
    pub fn new(config: TelegramConfig) -> Result<Self, MemoirError> {
        let token = config
            .bot_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                MemoirError::Config(
                    "telegram.bot_token is required for the Telegram adapter".into(),
                )
            })?;

        let (queue_tx, queue_rx) = mpsc::channel(100);
        Ok(Self {
            bot: Bot::new(token),
            config,
            queue_tx,
            queue_rx: Mutex::new(queue_rx),
            polling: None,
        })
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, MemoirError> {
        // getMe is the cheapest authenticated call the Bot API offers.
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("getMe failed: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), MemoirError> {
        // Dropping the adapter aborts the polling task; the agent loop has
        // already stopped draining receive() by the time this runs.
        debug!("telegram adapter shut down");
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_typing: true,
            max_message_length: Some(4096),
        }
    }

    async fn connect(&mut self) -> Result<(), MemoirError> {
        if self.polling.is_some() {
            return Ok(());
        }

        info!("starting Telegram long polling");
        let bot = self.bot.clone();
        let tx = self.queue_tx.clone();
        let allowed: Arc<[String]> = self.config.allowed_users.clone().into();

        self.polling = Some(tokio::spawn(async move {
            let screen = Update::filter_message().endpoint(move |msg: Message| {
                let tx = tx.clone();
                let allowed = allowed.clone();
                async move {
                    if let Some(inbound) = handler::screen_message(&msg, &allowed)
                        && tx.send(inbound).await.is_err()
                    {
                        warn!("inbound queue closed, dropping message");
                    }
                    respond(())
                }
            });

            Dispatcher::builder(bot, screen)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        }));

        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, MemoirError> {
        let chat_id = routing_chat_id(&msg)?;
        let sent = self
            .bot
            .send_message(Recipient::Id(chat_id), &msg.content)
            .await
            .map_err(|e| MemoirError::Channel {
                message: format!("sendMessage failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn receive(&self) -> Result<InboundMessage, MemoirError> {
        self.queue_rx
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| MemoirError::Channel {
                message: "Telegram inbound queue closed".into(),
                source: None,
            })
    }

    async fn send_typing(&self, chat_id: &str) -> Result<(), MemoirError> {
        let chat_id = chat_id.parse::<i64>().map(ChatId).map_err(|e| {
            MemoirError::Channel {
                message: format!("invalid chat_id: {e}"),
                source: None,
            }
        })?;
        self.bot
            .send_chat_action(chat_id, ChatAction::Typing)
            .await
            .map_err(|e| MemoirError::Channel {
                message: format!("sendChatAction failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

/// The chat id a reply goes to: the `chat_id` metadata field stashed by
/// the inbound screen, or the channel field when a caller addressed the
/// message directly.
fn routing_chat_id(msg: &OutboundMessage) -> Result<ChatId, MemoirError> {
    if let Some(metadata) = msg.metadata.as_deref()
        && let Ok(value) = serde_json::from_str::<serde_json::Value>(metadata)
        && let Some(raw) = value.get("chat_id").and_then(|v| v.as_str())
    {
        return raw.parse::<i64>().map(ChatId).map_err(|e| MemoirError::Channel {
            message: format!("invalid chat_id in metadata: {e}"),
            source: None,
        });
    }

    msg.channel
        .parse::<i64>()
        .map(ChatId)
        .map_err(|_| MemoirError::Channel {
            message: "outbound message has no routable chat id".into(),
            source: None,
        })
}
