// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Memoir biography bot.
//!
//! One WAL-mode connection behind `tokio-rusqlite`, embedded refinery
//! migrations, and typed query modules for users, questions, and
//! stories. [`SqliteStorage`] is the `StorageAdapter` the rest of the
//! workspace sees.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
