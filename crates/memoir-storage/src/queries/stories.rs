// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read operations for accepted story records.
//!
//! Stories are only ever written as part of a turn commit
//! (see [`crate::queries::users::commit_turn`]); there is no standalone
//! insert path.

use memoir_core::types::StoryRecord;
use memoir_core::MemoirError;
use rusqlite::params;

use crate::database::{map_tr_err, Database};

/// List a user's accepted stories in question order.
pub async fn stories_for_user(
    db: &Database,
    chat_id: &str,
) -> Result<Vec<StoryRecord>, MemoirError> {
    let chat_id = chat_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, chat_id, question_order, story, created_at
                 FROM stories WHERE chat_id = ?1 ORDER BY question_order ASC",
            )?;
            let rows = stmt.query_map(params![chat_id], |row| {
                Ok(StoryRecord {
                    id: row.get(0)?,
                    chat_id: row.get(1)?,
                    question_order: row.get(2)?,
                    story: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            let mut stories = Vec::new();
            for row in rows {
                stories.push(row?);
            }
            Ok(stories)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoir_core::types::{ConversationMode, NewStoryRecord, TurnCommit};
    use tempfile::tempdir;

    #[tokio::test]
    async fn stories_come_back_in_question_order() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        crate::queries::users::create_user(&db, "chat-1", None)
            .await
            .unwrap();

        for (order, story) in [(2, "second"), (1, "first")] {
            crate::queries::users::commit_turn(
                &db,
                "chat-1",
                &TurnCommit {
                    current_question: order + 1,
                    mode: ConversationMode::Idle,
                    record: Some(NewStoryRecord {
                        question_order: order,
                        story: story.into(),
                    }),
                },
            )
            .await
            .unwrap();
        }

        let stories = stories_for_user(&db, "chat-1").await.unwrap();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].question_order, 1);
        assert_eq!(stories[0].story, "first");
        assert_eq!(stories[1].question_order, 2);

        assert!(stories_for_user(&db, "chat-2").await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
