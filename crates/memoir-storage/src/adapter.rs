// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The SQLite-backed [`StorageAdapter`].

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use memoir_config::model::StorageConfig;
use memoir_core::types::{Question, StoryRecord, TurnCommit, UserRecord};
use memoir_core::{
    AdapterType, HealthStatus, MemoirError, PluginAdapter, StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// Owns the [`Database`] handle and fans every trait call out to the
/// typed query modules. The connection is not opened until
/// [`StorageAdapter::initialize`] runs.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, MemoirError> {
        self.db.get().ok_or_else(|| MemoirError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MemoirError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MemoirError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), MemoirError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| MemoirError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), MemoirError> {
        self.db()?.close().await
    }

    // --- User state operations ---

    async fn get_user(&self, chat_id: &str) -> Result<Option<UserRecord>, MemoirError> {
        queries::users::get_user(self.db()?, chat_id).await
    }

    async fn create_user(
        &self,
        chat_id: &str,
        first_name: Option<&str>,
    ) -> Result<UserRecord, MemoirError> {
        queries::users::create_user(self.db()?, chat_id, first_name).await
    }

    async fn commit_turn(
        &self,
        chat_id: &str,
        commit: &TurnCommit,
    ) -> Result<(), MemoirError> {
        queries::users::commit_turn(self.db()?, chat_id, commit).await
    }

    // --- Question operations ---

    async fn question_by_order(&self, order: i64) -> Result<Option<Question>, MemoirError> {
        queries::questions::question_by_order(self.db()?, order).await
    }

    async fn next_question_after(
        &self,
        order: i64,
    ) -> Result<Option<Question>, MemoirError> {
        queries::questions::next_question_after(self.db()?, order).await
    }

    async fn insert_question(&self, question: &Question) -> Result<bool, MemoirError> {
        queries::questions::insert_question(self.db()?, question).await
    }

    async fn count_questions(&self) -> Result<i64, MemoirError> {
        queries::questions::count_questions(self.db()?).await
    }

    // --- Story operations ---

    async fn stories_for_user(
        &self,
        chat_id: &str,
    ) -> Result<Vec<StoryRecord>, MemoirError> {
        queries::stories::stories_for_user(self.db()?, chat_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoir_core::types::{ConversationMode, NewStoryRecord};
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    async fn initialized_storage(dir: &tempfile::TempDir, file: &str) -> SqliteStorage {
        let path = dir.path().join(file);
        let storage = SqliteStorage::new(make_config(path.to_str().unwrap()));
        storage.initialize().await.unwrap();
        storage
    }

    #[tokio::test]
    async fn adapter_identity() {
        let dir = tempdir().unwrap();
        let storage = initialized_storage(&dir, "identity.db").await;
        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_creates_the_file_and_refuses_to_run_twice() {
        let dir = tempdir().unwrap();
        let storage = initialized_storage(&dir, "init.db").await;
        assert!(dir.path().join("init.db").exists());
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_requires_an_open_database() {
        let dir = tempdir().unwrap();
        let closed = SqliteStorage::new(make_config(
            dir.path().join("never-opened.db").to_str().unwrap(),
        ));
        assert!(closed.health_check().await.is_err());

        let open = initialized_storage(&dir, "health.db").await;
        assert_eq!(open.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn full_interview_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let storage = initialized_storage(&dir, "lifecycle.db").await;

        // Seed two questions.
        for (order, text) in [(1, "What is your earliest memory?"), (2, "Your first job?")] {
            let inserted = storage
                .insert_question(&Question {
                    order,
                    text: text.into(),
                    category: String::new(),
                })
                .await
                .unwrap();
            assert!(inserted);
        }
        assert_eq!(storage.count_questions().await.unwrap(), 2);

        // Create a user and open question 1.
        let user = storage.create_user("chat-9", Some("Rui")).await.unwrap();
        assert_eq!(user.mode, ConversationMode::Idle);

        storage
            .commit_turn(
                "chat-9",
                &TurnCommit {
                    current_question: 1,
                    mode: ConversationMode::opened(),
                    record: None,
                },
            )
            .await
            .unwrap();

        // Accept an answer and advance to question 2.
        storage
            .commit_turn(
                "chat-9",
                &TurnCommit {
                    current_question: 2,
                    mode: ConversationMode::opened(),
                    record: Some(NewStoryRecord {
                        question_order: 1,
                        story: "A beach in winter.".into(),
                    }),
                },
            )
            .await
            .unwrap();

        let user = storage.get_user("chat-9").await.unwrap().unwrap();
        assert_eq!(user.current_question, 2);
        assert_eq!(user.mode, ConversationMode::opened());

        let stories = storage.stories_for_user("chat-9").await.unwrap();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].story, "A beach in winter.");

        // Sequencing.
        assert_eq!(
            storage.next_question_after(1).await.unwrap().unwrap().order,
            2
        );
        assert!(storage.next_question_after(2).await.unwrap().is_none());

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_checkpoints_without_error() {
        let dir = tempdir().unwrap();
        let storage = initialized_storage(&dir, "shutdown.db").await;
        storage.create_user("chat-1", None).await.unwrap();
        storage.shutdown().await.unwrap();
    }
}
