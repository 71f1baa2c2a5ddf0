// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User conversation state CRUD operations.
//!
//! The conversation mode is stored as a `state` tag plus nullable draft and
//! retry columns; decoding normalizes the idle form so a stale draft can
//! never surface on an idle user.

use memoir_core::types::{ConversationMode, TurnCommit, UserRecord};
use memoir_core::MemoirError;
use rusqlite::params;

use crate::database::{map_tr_err, Database};

const USER_COLUMNS: &str =
    "chat_id, first_name, state, draft, retry_count, current_question, created_at";

/// Create a new idle user positioned before the first question.
pub async fn create_user(
    db: &Database,
    chat_id: &str,
    first_name: Option<&str>,
) -> Result<UserRecord, MemoirError> {
    let chat_id = chat_id.to_string();
    let first_name = first_name.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (chat_id, first_name, created_at)
                 VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
                params![chat_id, first_name],
            )?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE chat_id = ?1"
            ))?;
            let user = stmt.query_row(params![chat_id], row_to_user)?;
            Ok(user)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a user by chat id.
pub async fn get_user(db: &Database, chat_id: &str) -> Result<Option<UserRecord>, MemoirError> {
    let chat_id = chat_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE chat_id = ?1"
            ))?;
            match stmt.query_row(params![chat_id], row_to_user) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Apply one turn's state patch and optional story record in a single
/// transaction.
///
/// The story insert uses `INSERT OR IGNORE` against the
/// `UNIQUE (chat_id, question_order)` constraint, so replaying the same
/// advance from a stale snapshot cannot create a duplicate record. The
/// state update is last-write-wins.
pub async fn commit_turn(
    db: &Database,
    chat_id: &str,
    commit: &TurnCommit,
) -> Result<(), MemoirError> {
    let chat_id = chat_id.to_string();
    let commit = commit.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            if let Some(ref record) = commit.record {
                tx.execute(
                    "INSERT OR IGNORE INTO stories (chat_id, question_order, story, created_at)
                     VALUES (?1, ?2, ?3, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
                    params![chat_id, record.question_order, record.story],
                )?;
            }

            let (state, draft, retry_count) = encode_mode(&commit.mode);
            tx.execute(
                "UPDATE users
                 SET state = ?1, draft = ?2, retry_count = ?3, current_question = ?4
                 WHERE chat_id = ?5",
                params![state, draft, retry_count, commit.current_question, chat_id],
            )?;

            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Decode a user row into a [`UserRecord`].
fn row_to_user(row: &rusqlite::Row<'_>) -> Result<UserRecord, rusqlite::Error> {
    let state: String = row.get(2)?;
    let draft: Option<String> = row.get(3)?;
    let retry_count: u32 = row.get(4)?;

    let mode = match state.as_str() {
        "idle" => ConversationMode::Idle,
        "conversing" => ConversationMode::Conversing {
            draft: draft.unwrap_or_default(),
            retry_count,
        },
        other => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown user state `{other}`").into(),
            ));
        }
    };

    Ok(UserRecord {
        chat_id: row.get(0)?,
        first_name: row.get(1)?,
        current_question: row.get(5)?,
        mode,
        created_at: row.get(6)?,
    })
}

/// Encode a [`ConversationMode`] into its column representation.
///
/// Idle always clears the draft and retry counter.
fn encode_mode(mode: &ConversationMode) -> (&'static str, Option<String>, u32) {
    match mode {
        ConversationMode::Idle => ("idle", None, 0),
        ConversationMode::Conversing { draft, retry_count } => {
            ("conversing", Some(draft.clone()), *retry_count)
        }
    }
}
