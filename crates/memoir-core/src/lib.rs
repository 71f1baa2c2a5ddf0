// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types and traits for the Memoir biography bot.
//!
//! Everything the other crates share lives here: the error type, the
//! domain model (users, questions, stories, verdicts), and the adapter
//! traits implemented by the channel, verdict source, and storage crates.
//! This crate does no I/O.

pub mod error;
pub mod traits;
pub mod types;

pub use error::MemoirError;
pub use types::{AdapterType, ConversationMode, HealthStatus, Question, UserIntent, Verdict};

pub use traits::{ChannelAdapter, PluginAdapter, StorageAdapter, VerdictSource};
