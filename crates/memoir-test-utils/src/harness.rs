// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring real SQLite storage to the turn engine and mocks.
//!
//! The harness owns a tempdir-backed database, so every test gets an
//! isolated, migration-fresh store that is removed on drop.

use std::sync::Arc;

use memoir_agent::turn::TurnEngine;
use memoir_config::model::StorageConfig;
use memoir_core::types::{Question, StoryRecord, UserRecord};
use memoir_core::StorageAdapter;
use memoir_storage::SqliteStorage;

use crate::mock_verdict::MockVerdictSource;

/// Default retry budget used by harness-built engines.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// A fully wired turn engine over tempfile SQLite and a scripted verdict
/// source.
pub struct TestHarness {
    pub storage: Arc<SqliteStorage>,
    pub verdicts: MockVerdictSource,
    pub engine: TurnEngine,
    _dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a harness with no seeded questions.
    pub async fn new() -> Self {
        Self::with_questions(&[]).await
    }

    /// Create a harness with the given `(order, text)` questions seeded.
    pub async fn with_questions(questions: &[(i64, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let db_path = dir.path().join("memoir-test.db");

        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        }));
        storage.initialize().await.expect("storage initialize failed");

        for (order, text) in questions {
            storage
                .insert_question(&Question {
                    order: *order,
                    text: (*text).to_string(),
                    category: String::new(),
                })
                .await
                .expect("failed to seed question");
        }

        let verdicts = MockVerdictSource::new();
        let engine = TurnEngine::new(
            storage.clone(),
            Arc::new(verdicts.clone()),
            DEFAULT_MAX_ATTEMPTS,
        );

        Self {
            storage,
            verdicts,
            engine,
            _dir: dir,
        }
    }

    /// Fetch a user that is expected to exist.
    pub async fn user(&self, chat_id: &str) -> UserRecord {
        self.storage
            .get_user(chat_id)
            .await
            .expect("get_user failed")
            .expect("user not found")
    }

    /// Fetch a user's stories.
    pub async fn stories(&self, chat_id: &str) -> Vec<StoryRecord> {
        self.storage
            .stories_for_user(chat_id)
            .await
            .expect("stories_for_user failed")
    }
}
