// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read and seed operations for the interview question sequence.

use memoir_core::types::Question;
use memoir_core::MemoirError;
use rusqlite::params;

use crate::database::{map_tr_err, Database};

/// Insert a question. Returns `false` when its order is already taken.
pub async fn insert_question(db: &Database, question: &Question) -> Result<bool, MemoirError> {
    let question = question.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO questions (\"order\", text, category)
                 VALUES (?1, ?2, ?3)",
                params![question.order, question.text, question.category],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a question by its order, or `None` when no such position exists.
pub async fn question_by_order(
    db: &Database,
    order: i64,
) -> Result<Option<Question>, MemoirError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT \"order\", text, category FROM questions WHERE \"order\" = ?1",
            )?;
            match stmt.query_row(params![order], row_to_question) {
                Ok(question) => Ok(Some(question)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Get the question with the smallest order strictly greater than `order`,
/// or `None` when the sequence is exhausted.
pub async fn next_question_after(
    db: &Database,
    order: i64,
) -> Result<Option<Question>, MemoirError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT \"order\", text, category FROM questions
                 WHERE \"order\" > ?1 ORDER BY \"order\" ASC LIMIT 1",
            )?;
            match stmt.query_row(params![order], row_to_question) {
                Ok(question) => Ok(Some(question)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Count all seeded questions.
pub async fn count_questions(db: &Database) -> Result<i64, MemoirError> {
    db.connection()
        .call(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}

fn row_to_question(row: &rusqlite::Row<'_>) -> Result<Question, rusqlite::Error> {
    Ok(Question {
        order: row.get(0)?,
        text: row.get(1)?,
        category: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn make_question(order: i64, text: &str) -> Question {
        Question {
            order,
            text: text.to_string(),
            category: "childhood".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_by_order() {
        let (db, _dir) = setup_db().await;

        assert!(insert_question(&db, &make_question(1, "What is your earliest memory?"))
            .await
            .unwrap());

        let question = question_by_order(&db, 1).await.unwrap().unwrap();
        assert_eq!(question.text, "What is your earliest memory?");
        assert_eq!(question.category, "childhood");

        assert!(question_by_order(&db, 2).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_order_is_skipped() {
        let (db, _dir) = setup_db().await;

        assert!(insert_question(&db, &make_question(1, "first")).await.unwrap());
        assert!(!insert_question(&db, &make_question(1, "second")).await.unwrap());

        let question = question_by_order(&db, 1).await.unwrap().unwrap();
        assert_eq!(question.text, "first");
        assert_eq!(count_questions(&db).await.unwrap(), 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn next_question_walks_sparse_orders() {
        let (db, _dir) = setup_db().await;

        // Orders need not be contiguous.
        insert_question(&db, &make_question(1, "q1")).await.unwrap();
        insert_question(&db, &make_question(3, "q3")).await.unwrap();
        insert_question(&db, &make_question(7, "q7")).await.unwrap();

        assert_eq!(next_question_after(&db, 0).await.unwrap().unwrap().order, 1);
        assert_eq!(next_question_after(&db, 1).await.unwrap().unwrap().order, 3);
        assert_eq!(next_question_after(&db, 3).await.unwrap().unwrap().order, 7);
        assert!(next_question_after(&db, 7).await.unwrap().is_none());

        db.close().await.unwrap();
    }
}
