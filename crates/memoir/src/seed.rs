// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `memoir seed` command implementation.
//!
//! Inserts the built-in interview question list, skipping any order that is
//! already present, and reports how many questions were added.

use std::sync::Arc;

use memoir_config::MemoirConfig;
use memoir_core::types::Question;
use memoir_core::{MemoirError, StorageAdapter};
use memoir_storage::SqliteStorage;

/// The built-in interview, in asking order: (category, text, order).
const DEFAULT_QUESTIONS: &[(&str, &str, i64)] = &[
    // Childhood
    ("childhood", "What is your earliest memory?", 1),
    (
        "childhood",
        "What were the house and the neighborhood where you grew up like?",
        2,
    ),
    (
        "childhood",
        "Who was your best friend as a child, and what did you do together?",
        3,
    ),
    (
        "childhood",
        "What was the biggest mischief you got up to as a child?",
        4,
    ),
    // Youth & career
    (
        "youth",
        "What were you like at school? What did you enjoy most?",
        5,
    ),
    (
        "career",
        "What was your first job? What was the experience like?",
        6,
    ),
    (
        "career",
        "How did you choose your profession? Was it a straight path?",
        7,
    ),
    (
        "youth",
        "What was the greatest adventure of your young years?",
        8,
    ),
    // Family
    ("family", "How did you meet your spouse or partner?", 9),
    (
        "family",
        "What is your favorite memory from when your children were small?",
        10,
    ),
    (
        "family",
        "Which family tradition matters most to you?",
        11,
    ),
    // Reflection
    (
        "reflection",
        "What is the greatest challenge you have overcome in your life?",
        12,
    ),
    ("reflection", "What are you most grateful for?", 13),
    (
        "reflection",
        "If you could give one piece of advice to your 20-year-old self, what would it be?",
        14,
    ),
    (
        "reflection",
        "What do you think was the most important invention of your lifetime?",
        15,
    ),
];

/// Runs the `memoir seed` command.
pub async fn run_seed(config: MemoirConfig) -> Result<(), MemoirError> {
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let added = seed_questions(storage.as_ref()).await?;

    if added > 0 {
        println!("Added {added} new questions.");
    } else {
        println!("No new questions to add. The database is already seeded.");
    }

    storage.close().await
}

/// Insert every built-in question whose order is not yet taken.
///
/// Returns the number of questions actually added.
pub async fn seed_questions(storage: &dyn StorageAdapter) -> Result<u32, MemoirError> {
    let mut added = 0;
    for (category, text, order) in DEFAULT_QUESTIONS {
        let inserted = storage
            .insert_question(&Question {
                order: *order,
                text: (*text).to_string(),
                category: (*category).to_string(),
            })
            .await?;
        if inserted {
            added += 1;
        }
    }
    Ok(added)
}
