// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock verdict source for deterministic testing.
//!
//! `MockVerdictSource` implements `VerdictSource` with a FIFO of scripted
//! outcomes, enabling fast, CI-runnable tests without LLM calls. Failures
//! can be injected to exercise the fallback-verdict path.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use memoir_core::types::{AdapterType, HealthStatus, UserIntent, Verdict};
use memoir_core::{MemoirError, PluginAdapter, VerdictSource};

/// A scripted classification outcome.
enum MockOutcome {
    Verdict(Verdict),
    Failure,
}

/// A mock verdict source that returns pre-configured verdicts.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, the
/// source echoes the new text back as a complete verdict, which lets
/// straight-line tests run without scripting every turn.
#[derive(Clone)]
pub struct MockVerdictSource {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
}

impl MockVerdictSource {
    /// Create a new mock with an empty outcome queue.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Queue a verdict to be returned by the next `classify` call.
    pub async fn push_verdict(&self, verdict: Verdict) {
        self.outcomes.lock().await.push_back(MockOutcome::Verdict(verdict));
    }

    /// Queue a classification failure.
    pub async fn push_failure(&self) {
        self.outcomes.lock().await.push_back(MockOutcome::Failure);
    }
}

impl Default for MockVerdictSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockVerdictSource {
    fn name(&self) -> &str {
        "mock-verdicts"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MemoirError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MemoirError> {
        Ok(())
    }
}

#[async_trait]
impl VerdictSource for MockVerdictSource {
    async fn classify(
        &self,
        _previous_draft: &str,
        new_text: &str,
    ) -> Result<Verdict, MemoirError> {
        match self.outcomes.lock().await.pop_front() {
            Some(MockOutcome::Verdict(verdict)) => Ok(verdict),
            Some(MockOutcome::Failure) => Err(MemoirError::Provider {
                message: "mock verdict source failure".into(),
                source: None,
            }),
            None => Ok(complete_verdict(new_text)),
        }
    }
}

/// An incomplete verdict that keeps the loop refining.
pub fn refining_verdict(merged_text: &str, follow_up: &str) -> Verdict {
    Verdict {
        merged_text: merged_text.to_string(),
        critique: "needs more detail".to_string(),
        is_complete: false,
        follow_up_question: Some(follow_up.to_string()),
        intent: UserIntent::Refining,
    }
}

/// A complete verdict that accepts the merged story.
pub fn complete_verdict(merged_text: &str) -> Verdict {
    Verdict {
        merged_text: merged_text.to_string(),
        critique: "good depth".to_string(),
        is_complete: true,
        follow_up_question: None,
        intent: UserIntent::Refining,
    }
}

/// A verdict reporting that the user wants to stop this question.
pub fn stopping_verdict(merged_text: &str) -> Verdict {
    Verdict {
        merged_text: merged_text.to_string(),
        critique: "user wants to move on".to_string(),
        is_complete: false,
        follow_up_question: None,
        intent: UserIntent::Stopping,
    }
}
