// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic test doubles for the Memoir workspace.
//!
//! [`MockChannel`] injects and captures channel traffic,
//! [`MockVerdictSource`] replays scripted verdicts (or failures), and
//! [`TestHarness`] wires both to a tempfile-backed SQLite store and a
//! real turn engine. No network, no LLM, CI-safe.

pub mod harness;
pub mod mock_channel;
pub mod mock_verdict;

pub use harness::TestHarness;
pub use mock_channel::MockChannel;
pub use mock_verdict::{complete_verdict, refining_verdict, stopping_verdict, MockVerdictSource};
