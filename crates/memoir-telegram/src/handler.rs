// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Screening and conversion of raw Telegram updates.
//!
//! A message makes it to the agent loop only when it comes from a private
//! chat, from an allowed sender, and carries text. Everything else is
//! dropped here, before the channel queue.

use memoir_core::types::{InboundMessage, MessageContent};
use teloxide::prelude::*;
use teloxide::types::ChatKind;
use tracing::debug;

/// Run one Telegram message through the full screen: DM check, allow-list
/// check, content extraction. `None` means drop silently.
pub fn screen_message(msg: &Message, allowed_users: &[String]) -> Option<InboundMessage> {
    if !is_dm(msg) {
        debug!(chat_id = msg.chat.id.0, "dropping non-DM message");
        return None;
    }
    if !is_authorized(msg, allowed_users) {
        debug!(chat_id = msg.chat.id.0, "dropping message from unauthorized sender");
        return None;
    }
    let Some(content) = extract_content(msg) else {
        debug!(msg_id = msg.id.0, "dropping non-text message");
        return None;
    };
    Some(to_inbound_message(msg, content))
}

/// An entry in `allowed_users` may be a numeric user id or a username
/// (with or without the `@`). An empty list leaves the bot open to anyone,
/// which fits a family-facing interview bot. Senderless updates (channel
/// posts) never pass.
pub fn is_authorized(msg: &Message, allowed_users: &[String]) -> bool {
    let Some(user) = msg.from.as_ref() else {
        return false;
    };
    if allowed_users.is_empty() {
        return true;
    }

    let id = user.id.0.to_string();
    allowed_users.iter().any(|entry| {
        *entry == id
            || user.username.as_deref().is_some_and(|name| {
                name.eq_ignore_ascii_case(entry.strip_prefix('@').unwrap_or(entry))
            })
    })
}

/// Only private chats count; groups, supergroups, and channels do not.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Text starting with `/` becomes a [`MessageContent::Command`] (lowercased,
/// `@BotName` suffix stripped); any other text stays free text. Photos,
/// stickers, and voice notes yield `None`.
pub fn extract_content(msg: &Message) -> Option<MessageContent> {
    let text = msg.text()?;
    match parse_command(text) {
        Some(command) => Some(MessageContent::Command(command)),
        None => Some(MessageContent::Text(text.to_string())),
    }
}

fn parse_command(text: &str) -> Option<String> {
    let rest = text.strip_prefix('/')?;
    let word = rest.split_whitespace().next()?.split('@').next()?;
    if word.is_empty() {
        None
    } else {
        Some(word.to_lowercase())
    }
}

/// Lift a Telegram message into the channel-agnostic shape, stashing the
/// chat id in metadata so replies can be routed back.
pub fn to_inbound_message(msg: &Message, content: MessageContent) -> InboundMessage {
    let sender = msg.from.as_ref();
    InboundMessage {
        id: msg.id.0.to_string(),
        channel: "telegram".to_string(),
        sender_id: sender
            .map(|u| u.id.0.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        sender_name: sender.map(|u| u.first_name.clone()),
        content,
        timestamp: msg.date.to_rfc3339(),
        metadata: Some(
            serde_json::json!({"chat_id": msg.chat.id.0.to_string()}).to_string(),
        ),
    }
}
