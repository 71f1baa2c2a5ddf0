// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory channel adapter for tests.
//!
//! Inbound messages are injected onto an unbounded queue; outbound
//! messages are captured for assertions. Clones share both sides, so a
//! test hands one clone to the agent loop and keeps another to drive it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use memoir_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, InboundMessage, MessageContent, MessageId,
    OutboundMessage,
};
use memoir_core::{ChannelAdapter, MemoirError, PluginAdapter};

#[derive(Clone)]
pub struct MockChannel {
    inbound_tx: mpsc::UnboundedSender<InboundMessage>,
    inbound_rx: Arc<Mutex<mpsc::UnboundedReceiver<InboundMessage>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl MockChannel {
    pub fn new() -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Self {
            inbound_tx,
            inbound_rx: Arc::new(Mutex::new(inbound_rx)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a message for the next `receive()` call.
    pub async fn inject_message(&self, msg: InboundMessage) {
        self.inbound_tx
            .send(msg)
            .expect("mock inbound queue closed");
    }

    /// Queue free text from the given sender.
    pub async fn inject_text(&self, sender_id: &str, text: &str) {
        self.inject_message(make_inbound(sender_id, MessageContent::Text(text.to_string())))
            .await;
    }

    /// Queue a /command from the given sender.
    pub async fn inject_command(&self, sender_id: &str, command: &str) {
        self.inject_message(make_inbound(
            sender_id,
            MessageContent::Command(command.to_string()),
        ))
        .await;
    }

    /// Everything passed to `send()` so far, in order.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an inbound message shaped the way a real channel adapter would.
pub fn make_inbound(sender_id: &str, content: MessageContent) -> InboundMessage {
    InboundMessage {
        id: format!("mock-{}", uuid::Uuid::new_v4()),
        channel: "mock".to_string(),
        sender_id: sender_id.to_string(),
        sender_name: Some("Test".to_string()),
        content,
        timestamp: chrono::Utc::now().to_rfc3339(),
        metadata: None,
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, MemoirError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MemoirError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_typing: false,
            max_message_length: None,
        }
    }

    async fn connect(&mut self) -> Result<(), MemoirError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, MemoirError> {
        self.sent.lock().await.push(msg);
        Ok(MessageId(format!("mock-msg-{}", uuid::Uuid::new_v4())))
    }

    async fn receive(&self) -> Result<InboundMessage, MemoirError> {
        // The adapter holds its own sender, so the queue never closes while
        // the mock is alive; recv() simply parks until an injection.
        self.inbound_rx
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| MemoirError::Channel {
                message: "mock inbound queue closed".into(),
                source: None,
            })
    }

    async fn send_typing(&self, _chat_id: &str) -> Result<(), MemoirError> {
        Ok(())
    }
}
