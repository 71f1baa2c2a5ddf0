// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the Memoir workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a delivered channel message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`crate::traits::PluginAdapter`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Provider,
    Storage,
}

// --- Conversation state ---

/// Where a user is in the conversation lifecycle.
///
/// The draft and retry counter only exist while a question is open, so a
/// stale draft can never leak into an idle user by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationMode {
    /// Not expecting input; waiting for the user to open the next question.
    Idle,
    /// A question is open and an answer is being accumulated.
    Conversing {
        /// The in-progress merged answer. Empty at the start of a question.
        draft: String,
        /// Refinement rounds used on the current question.
        retry_count: u32,
    },
}

impl ConversationMode {
    /// A freshly opened question: empty draft, zero retries.
    pub fn opened() -> Self {
        Self::Conversing {
            draft: String::new(),
            retry_count: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// A single conversant and their position in the question sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Stable channel identity (the Telegram chat id for DM bots).
    pub chat_id: String,
    pub first_name: Option<String>,
    /// Order of the question currently open (while conversing) or next to
    /// open (while idle). Moves past the last seeded order once the
    /// sequence is exhausted.
    pub current_question: i64,
    pub mode: ConversationMode,
    pub created_at: String,
}

/// A seeded interview question. Immutable once inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique positive position in the interview sequence.
    pub order: i64,
    pub text: String,
    /// Advisory grouping (e.g. "childhood"); no behavioral effect.
    pub category: String,
}

/// A permanently stored accepted answer, tied to one user and one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRecord {
    pub id: i64,
    pub chat_id: String,
    pub question_order: i64,
    pub story: String,
    pub created_at: String,
}

/// A new story to persist as part of a turn commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStoryRecord {
    pub question_order: i64,
    pub story: String,
}

/// The full state patch for one conversation turn.
///
/// Storage adapters must apply the optional story insert and the state
/// update as a single transaction; a partially applied commit must not be
/// observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnCommit {
    pub current_question: i64,
    pub mode: ConversationMode,
    pub record: Option<NewStoryRecord>,
}

// --- Verdict ---

/// The intent the verdict source detected behind the user's latest message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum UserIntent {
    /// The user is adding information to the story.
    Refining,
    /// The user wants to stop or skip the current question.
    Stopping,
    /// The user is confused by the bot's question.
    Confused,
}

/// Structured classification of one refinement round.
///
/// This is the single contract shared by the verdict source and the turn
/// engine; it is transient and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// The combined (prior draft + new text) answer, edited into clean
    /// first-person prose.
    pub merged_text: String,
    /// One-sentence critique of the answer's depth. Advisory; not used by
    /// the policy.
    pub critique: String,
    /// Whether the merged answer is substantive enough to keep.
    pub is_complete: bool,
    /// A gentle follow-up question when the answer is incomplete.
    /// Absent whenever `is_complete` is true.
    #[serde(default)]
    pub follow_up_question: Option<String>,
    pub intent: UserIntent,
}

/// Follow-up used when the verdict source fails and the turn must re-ask.
pub const FALLBACK_FOLLOW_UP: &str =
    "I'm sorry, I lost my train of thought for a moment. Could you tell me that again?";

impl Verdict {
    /// The safe-failure verdict substituted when classification fails.
    ///
    /// Keeps the prior draft, stays incomplete, and never reports a
    /// stopping intent, so a failed call can never advance the question.
    pub fn fallback(previous_draft: &str) -> Self {
        Self {
            merged_text: previous_draft.to_string(),
            critique: "verdict source unavailable".to_string(),
            is_complete: false,
            follow_up_question: Some(FALLBACK_FOLLOW_UP.to_string()),
            intent: UserIntent::Refining,
        }
    }

    /// Enforce the field invariant: a complete verdict carries no follow-up.
    pub fn normalized(mut self) -> Self {
        if self.is_complete {
            self.follow_up_question = None;
        }
        self
    }
}

// --- Channel message shapes ---

/// Content extracted from an inbound channel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Free text.
    Text(String),
    /// A slash command, with the leading `/` and any bot suffix stripped.
    Command(String),
}

/// An inbound message received from a channel adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    pub channel: String,
    pub sender_id: String,
    pub sender_name: Option<String>,
    pub content: MessageContent,
    pub timestamp: String,
    /// Channel-specific routing data (JSON), e.g. the Telegram chat id.
    pub metadata: Option<String>,
}

/// An outbound message to be sent via a channel adapter.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub channel: String,
    pub content: String,
    /// Channel-specific routing data (JSON), mirrored from the inbound side.
    pub metadata: Option<String>,
}

/// Capabilities reported by a channel adapter.
#[derive(Debug, Clone)]
pub struct ChannelCapabilities {
    pub supports_typing: bool,
    pub max_message_length: Option<usize>,
}
