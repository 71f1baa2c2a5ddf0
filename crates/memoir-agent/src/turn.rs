// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-user turn engine: one message in, one policy decision, one
//! atomic state commit, one reply out.
//!
//! State is read before the verdict call and committed after it; nothing is
//! held locked across the call. All mutations for a turn (mode, draft,
//! retry counter, question position, and the story record when one is
//! accepted) go through a single [`StorageAdapter::commit_turn`].

use std::sync::Arc;

use memoir_core::types::{ConversationMode, NewStoryRecord, TurnCommit, UserRecord, Verdict};
use memoir_core::{MemoirError, StorageAdapter, VerdictSource};
use tracing::{debug, error, info, warn};

use crate::policy::{self, Decision};
use crate::replies::{self, Reply};

/// Drives the refinement loop for every user.
pub struct TurnEngine {
    storage: Arc<dyn StorageAdapter>,
    verdicts: Arc<dyn VerdictSource>,
    max_refinement_attempts: u32,
}

impl TurnEngine {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        verdicts: Arc<dyn VerdictSource>,
        max_refinement_attempts: u32,
    ) -> Self {
        Self {
            storage,
            verdicts,
            max_refinement_attempts,
        }
    }

    /// Handle free text from a known user.
    ///
    /// While idle the message is rejected with no state change. While
    /// conversing the verdict policy runs; if anything fails mid-turn the
    /// user is forced idle at the *current* (not advanced) question so a
    /// later /start can re-open it, and the error is surfaced to the
    /// caller.
    pub async fn handle_turn(&self, user: &UserRecord, text: &str) -> Result<Reply, MemoirError> {
        let ConversationMode::Conversing { draft, retry_count } = &user.mode else {
            debug!(chat_id = user.chat_id.as_str(), "text while idle rejected");
            return Ok(replies::not_expecting_input());
        };

        match self.run_turn(user, draft, *retry_count, text).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                warn!(
                    chat_id = user.chat_id.as_str(),
                    question = user.current_question,
                    error = %e,
                    "turn failed, forcing idle at current question"
                );
                let recover = TurnCommit {
                    current_question: user.current_question,
                    mode: ConversationMode::Idle,
                    record: None,
                };
                if let Err(recover_err) = self.storage.commit_turn(&user.chat_id, &recover).await
                {
                    error!(
                        chat_id = user.chat_id.as_str(),
                        error = %recover_err,
                        "failed to force idle after turn failure"
                    );
                }
                Err(e)
            }
        }
    }

    /// Handle free text addressed by chat id, for callers that have not
    /// loaded the user yet.
    pub async fn handle_text(&self, chat_id: &str, text: &str) -> Result<Reply, MemoirError> {
        match self.storage.get_user(chat_id).await? {
            None => Ok(replies::please_start()),
            Some(user) => self.handle_turn(&user, text).await,
        }
    }

    /// The /start transition: create the user if unknown, open the next
    /// unanswered question if idle, and leave an in-progress conversation
    /// untouched.
    pub async fn begin_or_resume(
        &self,
        chat_id: &str,
        first_name: Option<&str>,
    ) -> Result<Reply, MemoirError> {
        let (user, is_new) = match self.storage.get_user(chat_id).await? {
            Some(user) => (user, false),
            None => {
                info!(chat_id, "new user registered");
                (self.storage.create_user(chat_id, first_name).await?, true)
            }
        };

        if !user.mode.is_idle() {
            // /start mid-conversation must not reset the draft or counter.
            return Ok(replies::conversation_in_progress());
        }

        // The question at the resume point, or the next one past a gap in
        // the seeded orders.
        let question = self
            .storage
            .next_question_after(user.current_question - 1)
            .await?;

        match question {
            Some(question) => {
                self.storage
                    .commit_turn(
                        chat_id,
                        &TurnCommit {
                            current_question: question.order,
                            mode: ConversationMode::opened(),
                            record: None,
                        },
                    )
                    .await?;
                info!(chat_id, question = question.order, "question opened");
                let name = first_name.or(user.first_name.as_deref());
                Ok(replies::open_question(is_new, name, &question))
            }
            None => Ok(Reply::one(replies::all_questions_answered())),
        }
    }

    /// One conversing turn: classify, decide, commit, reply.
    async fn run_turn(
        &self,
        user: &UserRecord,
        draft: &str,
        retry_count: u32,
        text: &str,
    ) -> Result<Reply, MemoirError> {
        let verdict = match self.verdicts.classify(draft, text).await {
            Ok(verdict) => verdict.normalized(),
            Err(e) => {
                // The loop must never silently advance on a failed
                // classification; substitute the safe verdict and re-ask.
                warn!(
                    chat_id = user.chat_id.as_str(),
                    error = %e,
                    "classification failed, using fallback verdict"
                );
                Verdict::fallback(draft)
            }
        };

        match policy::decide(draft, retry_count, self.max_refinement_attempts, &verdict) {
            Decision::Refine { draft, follow_up } => {
                self.storage
                    .commit_turn(
                        &user.chat_id,
                        &TurnCommit {
                            current_question: user.current_question,
                            mode: ConversationMode::Conversing {
                                draft,
                                retry_count: retry_count + 1,
                            },
                            record: None,
                        },
                    )
                    .await?;
                debug!(
                    chat_id = user.chat_id.as_str(),
                    question = user.current_question,
                    retry = retry_count + 1,
                    "refining"
                );
                Ok(Reply::one(follow_up))
            }
            Decision::Advance { story, cause } => {
                let next = self
                    .storage
                    .next_question_after(user.current_question)
                    .await?;

                let record = story.clone().map(|story| NewStoryRecord {
                    question_order: user.current_question,
                    story,
                });

                let commit = match &next {
                    Some(question) => TurnCommit {
                        current_question: question.order,
                        mode: ConversationMode::opened(),
                        record,
                    },
                    // Sequence exhausted: rest one past the end so a later
                    // /start yields the completion message.
                    None => TurnCommit {
                        current_question: user.current_question + 1,
                        mode: ConversationMode::Idle,
                        record,
                    },
                };
                self.storage.commit_turn(&user.chat_id, &commit).await?;

                info!(
                    chat_id = user.chat_id.as_str(),
                    question = user.current_question,
                    cause = ?cause,
                    persisted = story.is_some(),
                    "question closed"
                );

                Ok(replies::advance(cause, story.as_deref(), next.as_ref()))
            }
        }
    }
}
