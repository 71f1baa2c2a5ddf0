// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The agent loop and the refinement engine.
//!
//! [`AgentLoop`] drains the channel one message at a time: /start goes to
//! the bootstrap transition, free text to the turn engine, and whatever
//! comes back is sent as the reply. Consuming sequentially is what
//! serializes turns per user; the state commit underneath is
//! last-write-wins.

pub mod policy;
pub mod replies;
pub mod shutdown;
pub mod turn;

use std::sync::Arc;

use memoir_config::MemoirConfig;
use memoir_core::types::{InboundMessage, MessageContent, OutboundMessage};
use memoir_core::{ChannelAdapter, MemoirError, StorageAdapter, VerdictSource};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::replies::Reply;
use crate::turn::TurnEngine;

pub struct AgentLoop {
    channel: Box<dyn ChannelAdapter>,
    storage: Arc<dyn StorageAdapter>,
    engine: TurnEngine,
}

impl AgentLoop {
    pub fn new(
        channel: Box<dyn ChannelAdapter>,
        storage: Arc<dyn StorageAdapter>,
        verdicts: Arc<dyn VerdictSource>,
        config: &MemoirConfig,
    ) -> Self {
        let engine = TurnEngine::new(
            storage.clone(),
            verdicts,
            config.refinement.max_refinement_attempts,
        );
        info!(agent_name = config.agent.name.as_str(), "agent loop initialized");
        Self {
            channel,
            storage,
            engine,
        }
    }

    /// Connect the channel and drain it until cancellation (or until the
    /// channel itself closes), then flush storage.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), MemoirError> {
        self.channel.connect().await?;
        info!("agent loop running");

        loop {
            let inbound = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("shutdown requested, stopping message intake");
                    break;
                }
                received = self.channel.receive() => match received {
                    Ok(inbound) => inbound,
                    Err(e) => {
                        error!(error = %e, "channel receive failed");
                        // A closed queue never recovers; anything else is
                        // worth another receive attempt.
                        if e.to_string().contains("closed") {
                            break;
                        }
                        continue;
                    }
                },
            };

            if let Err(e) = self.dispatch(inbound).await {
                error!(error = %e, "inbound message handling failed");
            }
        }

        self.storage.close().await?;
        info!("agent loop stopped");
        Ok(())
    }

    /// One message, end to end. The engine already recovers its own
    /// failures (the user is forced idle at the current question); all
    /// that is left here is swapping the reply for an apology so no
    /// failure goes silent.
    async fn dispatch(&self, inbound: InboundMessage) -> Result<(), MemoirError> {
        debug!(
            sender_id = inbound.sender_id.as_str(),
            channel = inbound.channel.as_str(),
            "dispatching inbound message"
        );

        if self.channel.capabilities().supports_typing {
            let chat_id = chat_id_from_metadata(inbound.metadata.as_deref())
                .unwrap_or_else(|| inbound.sender_id.clone());
            if let Err(e) = self.channel.send_typing(&chat_id).await {
                debug!(error = %e, "typing indicator failed");
            }
        }

        let result = match &inbound.content {
            MessageContent::Command(cmd) if cmd == "start" => {
                self.engine
                    .begin_or_resume(&inbound.sender_id, inbound.sender_name.as_deref())
                    .await
            }
            MessageContent::Command(cmd) => {
                debug!(command = cmd.as_str(), "unknown command");
                Ok(replies::unknown_command())
            }
            MessageContent::Text(text) => self.engine.handle_text(&inbound.sender_id, text).await,
        };

        let reply = result.unwrap_or_else(|e| {
            error!(
                sender_id = inbound.sender_id.as_str(),
                error = %e,
                "turn failed, replying with apology"
            );
            replies::apology()
        });

        self.send_reply(&inbound, reply).await;
        Ok(())
    }

    /// Send each reply message back along the inbound routing metadata.
    async fn send_reply(&self, inbound: &InboundMessage, reply: Reply) {
        for content in reply.messages {
            let out = OutboundMessage {
                channel: inbound.channel.clone(),
                content,
                metadata: inbound.metadata.clone(),
            };
            if let Err(e) = self.channel.send(out).await {
                error!(error = %e, "reply delivery failed");
            }
        }
    }
}

/// The chat id stashed in the inbound metadata JSON, if any.
fn chat_id_from_metadata(metadata: Option<&str>) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(metadata?).ok()?;
    Some(value.get("chat_id")?.as_str()?.to_string())
}
