// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The workspace-wide error type.

use thiserror::Error;

/// Every fallible operation in the workspace surfaces one of these.
///
/// The turn engine recovers from `Provider` and `Timeout` locally (safe
/// fallback verdict); `Storage` failures abort the turn and force the user
/// back to a resumable idle state.
#[derive(Debug, Error)]
pub enum MemoirError {
    /// Bad or missing configuration, caught at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// SQLite failures: connection, query, migration, corrupt row.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel failures: polling, delivery, routing.
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Verdict source failures: API errors, malformed verdicts.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A bounded wait expired; treated like a provider failure by callers.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    #[error("internal error: {0}")]
    Internal(String),
}
