// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The messaging-platform boundary.

use async_trait::async_trait;

use crate::error::MemoirError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChannelCapabilities, InboundMessage, MessageId, OutboundMessage};

/// A bidirectional text channel to the storyteller (Telegram in
/// production, an in-memory mock in tests).
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    fn capabilities(&self) -> ChannelCapabilities;

    /// Start the connection (long polling, etc.). Idempotent.
    async fn connect(&mut self) -> Result<(), MemoirError>;

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, MemoirError>;

    /// Next inbound message; parks until one arrives.
    async fn receive(&self) -> Result<InboundMessage, MemoirError>;

    /// Typing indicator, where the platform has one.
    async fn send_typing(&self, chat_id: &str) -> Result<(), MemoirError>;
}
