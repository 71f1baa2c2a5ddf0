// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Verdict source trait: the LLM boundary that classifies one refinement round.

use async_trait::async_trait;

use crate::error::MemoirError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Verdict;

/// Classifies one round of the answer-refinement conversation.
///
/// Given the accumulated draft and the user's newest text, a verdict source
/// returns the merged, edited draft together with a completeness judgement,
/// an optional follow-up question, and the detected user intent.
///
/// Implementations fail with a provider error when the backing service is
/// unreachable, times out, or returns a malformed verdict; callers are
/// expected to substitute [`Verdict::fallback`] so a failed classification
/// can never advance the conversation.
#[async_trait]
pub trait VerdictSource: PluginAdapter {
    async fn classify(
        &self,
        previous_draft: &str,
        new_text: &str,
    ) -> Result<Verdict, MemoirError>;
}
