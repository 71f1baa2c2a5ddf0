// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply text.
//!
//! All conversational copy lives here so the turn engine stays about state,
//! not wording.

use memoir_core::types::Question;

use crate::policy::AdvanceCause;

/// An ordered batch of messages to send back for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub messages: Vec<String>,
}

impl Reply {
    pub fn one(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    fn push(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }
}

/// Text received while the user is idle.
pub fn not_expecting_input() -> Reply {
    Reply::one(
        "Sorry, I'm not expecting an answer right now. \
         Send /start and we'll pick up the next question.",
    )
}

/// Text received from someone who has never run /start.
pub fn please_start() -> Reply {
    Reply::one("Please send /start to begin.")
}

/// /start while a question is already open. Must not reset any progress.
pub fn conversation_in_progress() -> Reply {
    Reply::one(
        "It looks like we were in the middle of a story. \
         Please continue where we left off.",
    )
}

/// A command the bot does not know.
pub fn unknown_command() -> Reply {
    Reply::one("I only know /start. Send /start and let's keep telling your story.")
}

/// Something went wrong mid-turn; the question stays where it was.
pub fn apology() -> Reply {
    Reply::one(
        "Oops, something went wrong while I was working on your story. \
         Send /start and we'll try that question again.",
    )
}

/// Greeting plus the opening question for a user starting (or resuming) the
/// interview.
pub fn open_question(is_new_user: bool, first_name: Option<&str>, question: &Question) -> Reply {
    let greeting = match (is_new_user, first_name) {
        (true, Some(name)) => format!(
            "Hello, {name}! Welcome. I'm here to help you tell your life story, \
             one question at a time."
        ),
        (true, None) => "Hello! Welcome. I'm here to help you tell your life story, \
             one question at a time."
            .to_string(),
        (false, Some(name)) => format!("Welcome back, {name}!"),
        (false, None) => "Welcome back!".to_string(),
    };

    Reply::one(greeting).push(format!(
        "Question #{}: {}",
        question.order, question.text
    ))
}

/// Acknowledgement plus what comes next after an accepted (or skipped) answer.
pub fn advance(cause: AdvanceCause, story: Option<&str>, next: Option<&Question>) -> Reply {
    let mut reply = match cause {
        AdvanceCause::UserStopped => {
            Reply::one("Understood, no problem. Let's move on.")
        }
        AdvanceCause::BudgetExhausted => {
            Reply::one("I think we have enough on this one. Let's keep going.")
        }
        AdvanceCause::Complete => {
            let reply = Reply::one("What a wonderful story! I've written it down:");
            match story {
                Some(text) if !text.is_empty() => reply.push(text),
                _ => reply,
            }
        }
    };

    reply = match next {
        Some(question) => reply.push(format!(
            "When you're ready, here is the next question:\n\n#{}: {}",
            question.order, question.text
        )),
        None => reply.push(all_questions_answered()),
    };

    reply
}

/// The interview is over (for now).
pub fn all_questions_answered() -> String {
    "You've answered every question for now. Congratulations, what a journey!".to_string()
}
