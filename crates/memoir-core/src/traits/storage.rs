// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::MemoirError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Question, StoryRecord, TurnCommit, UserRecord};

/// Adapter for storage and persistence backends.
///
/// Groups the three persistence concerns consumed by the turn engine on one
/// boundary: the per-user conversation state store, the read-only question
/// provider, and the story record sink.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection setup).
    async fn initialize(&self) -> Result<(), MemoirError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), MemoirError>;

    // --- User state operations ---

    async fn get_user(&self, chat_id: &str) -> Result<Option<UserRecord>, MemoirError>;

    /// Creates a new idle user positioned before the first question.
    async fn create_user(
        &self,
        chat_id: &str,
        first_name: Option<&str>,
    ) -> Result<UserRecord, MemoirError>;

    /// Applies one turn's state patch, and the story record when present,
    /// as a single transaction. Last write wins; a crash can never leave
    /// the state advanced without its record or vice versa.
    async fn commit_turn(&self, chat_id: &str, commit: &TurnCommit)
        -> Result<(), MemoirError>;

    // --- Question operations ---

    async fn question_by_order(&self, order: i64) -> Result<Option<Question>, MemoirError>;

    /// Returns the question with the smallest order strictly greater than
    /// `order`, or `None` when the sequence is exhausted.
    async fn next_question_after(&self, order: i64)
        -> Result<Option<Question>, MemoirError>;

    /// Inserts a question. Returns `false` when the order is already taken.
    async fn insert_question(&self, question: &Question) -> Result<bool, MemoirError>;

    async fn count_questions(&self) -> Result<i64, MemoirError>;

    // --- Story operations ---

    async fn stories_for_user(&self, chat_id: &str)
        -> Result<Vec<StoryRecord>, MemoirError>;
}
