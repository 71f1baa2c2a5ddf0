// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The base trait shared by every adapter.

use async_trait::async_trait;

use crate::error::MemoirError;
use crate::types::{AdapterType, HealthStatus};

/// Identity, health, and lifecycle, common to the channel, verdict
/// source, and storage adapters.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Short name of this adapter instance ("telegram", "sqlite", ...).
    fn name(&self) -> &str;

    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// Current operational status, checked cheaply.
    async fn health_check(&self) -> Result<HealthStatus, MemoirError>;

    /// Release held resources; called once on the way down.
    async fn shutdown(&self) -> Result<(), MemoirError>;
}
