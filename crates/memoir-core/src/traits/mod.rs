// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for channel, verdict source, and storage
//! implementations.

pub mod adapter;
pub mod channel;
pub mod storage;
pub mod verdict;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use storage::StorageAdapter;
pub use verdict::VerdictSource;
