// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The refinement decision policy.
//!
//! A pure function from (draft, retry counter, verdict) to a decision, so
//! the precedence rules can be tested without storage or a live verdict
//! source. Precedence, first match wins:
//!
//! 1. the user asked to stop,
//! 2. the retry budget is exhausted,
//! 3. the verdict says the answer is complete,
//! 4. otherwise keep refining.

use memoir_core::types::{UserIntent, Verdict, FALLBACK_FOLLOW_UP};

/// Why an advancing decision fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceCause {
    /// The user asked to stop or skip the question.
    UserStopped,
    /// The refinement budget ran out; the answer is accepted as-is.
    BudgetExhausted,
    /// The verdict judged the answer substantive enough to keep.
    Complete,
}

/// The outcome of one refinement round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Accept the question and move to the next one. `story` is the text to
    /// persist; `None` means advance without creating a record.
    Advance {
        story: Option<String>,
        cause: AdvanceCause,
    },
    /// Stay on the same question with an updated draft and ask the follow-up.
    Refine { draft: String, follow_up: String },
}

/// Apply the policy to one verdict.
pub fn decide(draft: &str, retry_count: u32, max_attempts: u32, verdict: &Verdict) -> Decision {
    // 1. User-initiated stop: keep whatever the draft holds, not the merged
    //    text -- the "stop" message itself is not part of the story.
    if verdict.intent == UserIntent::Stopping {
        let story = (!draft.is_empty()).then(|| draft.to_string());
        return Decision::Advance {
            story,
            cause: AdvanceCause::UserStopped,
        };
    }

    // 2. Retry budget exhausted: force-accept regardless of completeness.
    if retry_count >= max_attempts {
        return Decision::Advance {
            story: Some(verdict.merged_text.clone()),
            cause: AdvanceCause::BudgetExhausted,
        };
    }

    // 3. The answer is good enough.
    if verdict.is_complete {
        return Decision::Advance {
            story: Some(verdict.merged_text.clone()),
            cause: AdvanceCause::Complete,
        };
    }

    // 4. Keep refining. A malformed verdict may be incomplete yet carry no
    //    follow-up; re-ask rather than send nothing.
    Decision::Refine {
        draft: verdict.merged_text.clone(),
        follow_up: verdict
            .follow_up_question
            .clone()
            .unwrap_or_else(|| FALLBACK_FOLLOW_UP.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(is_complete: bool, intent: UserIntent, follow_up: Option<&str>) -> Verdict {
        Verdict {
            merged_text: "merged story".to_string(),
            critique: "critique".to_string(),
            is_complete,
            follow_up_question: follow_up.map(|s| s.to_string()),
            intent,
        }
    }

    #[test]
    fn stopping_with_draft_persists_the_draft() {
        let v = verdict(false, UserIntent::Stopping, None);
        let decision = decide("the draft so far", 0, 3, &v);
        assert_eq!(
            decision,
            Decision::Advance {
                story: Some("the draft so far".to_string()),
                cause: AdvanceCause::UserStopped,
            }
        );
    }

    #[test]
    fn stopping_with_empty_draft_advances_without_record() {
        let v = verdict(false, UserIntent::Stopping, None);
        let decision = decide("", 0, 3, &v);
        assert_eq!(
            decision,
            Decision::Advance {
                story: None,
                cause: AdvanceCause::UserStopped,
            }
        );
    }

    #[test]
    fn stopping_wins_over_exhausted_budget() {
        // Precedence: a user stop persists the draft, not the merged text,
        // even when the budget has also run out.
        let v = verdict(false, UserIntent::Stopping, None);
        let decision = decide("draft", 3, 3, &v);
        assert_eq!(
            decision,
            Decision::Advance {
                story: Some("draft".to_string()),
                cause: AdvanceCause::UserStopped,
            }
        );
    }

    #[test]
    fn exhausted_budget_force_accepts_merged_text() {
        let v = verdict(false, UserIntent::Refining, Some("more?"));
        let decision = decide("draft", 3, 3, &v);
        assert_eq!(
            decision,
            Decision::Advance {
                story: Some("merged story".to_string()),
                cause: AdvanceCause::BudgetExhausted,
            }
        );
    }

    #[test]
    fn budget_fires_at_threshold_not_before() {
        let v = verdict(false, UserIntent::Refining, Some("more?"));
        assert!(matches!(decide("d", 2, 3, &v), Decision::Refine { .. }));
        assert!(matches!(decide("d", 3, 3, &v), Decision::Advance { .. }));
        assert!(matches!(decide("d", 4, 3, &v), Decision::Advance { .. }));
    }

    #[test]
    fn complete_verdict_persists_merged_text() {
        let v = verdict(true, UserIntent::Refining, None);
        let decision = decide("old draft", 1, 3, &v);
        assert_eq!(
            decision,
            Decision::Advance {
                story: Some("merged story".to_string()),
                cause: AdvanceCause::Complete,
            }
        );
    }

    #[test]
    fn incomplete_verdict_refines_with_follow_up() {
        let v = verdict(false, UserIntent::Refining, Some("What year was that?"));
        let decision = decide("old draft", 1, 3, &v);
        assert_eq!(
            decision,
            Decision::Refine {
                draft: "merged story".to_string(),
                follow_up: "What year was that?".to_string(),
            }
        );
    }

    #[test]
    fn missing_follow_up_falls_back_to_generic_reask() {
        let v = verdict(false, UserIntent::Refining, None);
        match decide("d", 0, 3, &v) {
            Decision::Refine { follow_up, .. } => assert_eq!(follow_up, FALLBACK_FOLLOW_UP),
            other => panic!("expected Refine, got {other:?}"),
        }
    }

    #[test]
    fn confused_intent_refines_like_refining() {
        // A confused turn does not reset the counter; it behaves exactly
        // like a refining one.
        let confused = verdict(false, UserIntent::Confused, Some("let me rephrase"));
        let refining = verdict(false, UserIntent::Refining, Some("let me rephrase"));
        assert_eq!(decide("d", 1, 3, &confused), decide("d", 1, 3, &refining));
    }

    #[test]
    fn fallback_verdict_never_advances_fresh_question() {
        let v = Verdict::fallback("draft");
        assert!(matches!(decide("draft", 0, 3, &v), Decision::Refine { .. }));
    }

    #[test]
    fn fallback_verdict_at_exhausted_budget_persists_draft() {
        // A failed classification at the budget edge force-accepts the
        // fallback's merged text, which is the prior draft.
        let v = Verdict::fallback("the draft");
        let decision = decide("the draft", 3, 3, &v);
        assert_eq!(
            decision,
            Decision::Advance {
                story: Some("the draft".to_string()),
                cause: AdvanceCause::BudgetExhausted,
            }
        );
    }
}
