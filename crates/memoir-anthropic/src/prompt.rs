// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The biographer prompt and the story-analysis tool schema.
//!
//! The model is pinned to a single tool whose input schema mirrors
//! [`memoir_core::types::Verdict`], so the structured verdict falls out of
//! the tool-use block without any free-text parsing.

use crate::types::{ApiMessage, MessageRequest, ToolChoice, ToolDefinition};

/// Name of the tool the model must call with its analysis.
pub const ANALYSIS_TOOL_NAME: &str = "submit_story_analysis";

/// The biographer system prompt.
pub fn system_prompt(agent_name: &str) -> String {
    format!(
        "You are {agent_name}, a gentle, curious biographer with a memory. \
You are helping someone tell their life story, one question at a time.\n\
\n\
You receive the story so far (the draft) and the storyteller's newest message.\n\
\n\
YOUR TASKS:\n\
1. Detect intent (MOST IMPORTANT). What is the newest message doing?\n\
   - STOPPING: the storyteller says things like \"I don't remember\", \
\"I don't know\", \"that's all\", \"skip this one\".\n\
   - CONFUSED: the storyteller seems confused by *your* question \
(e.g. \"what do you mean?\").\n\
   - REFINING: the storyteller is adding information to the story.\n\
2. Integrate and edit. Combine the draft and the new text into one story, \
edited into clean first-person prose (drop the \"ums\" and \"ahs\").\n\
3. Critique the depth. If the intent is STOPPING, the story counts as \
complete as it stands. Otherwise, judge it: an answer like \"it was nice\" \
is shallow (not complete); an answer with names, places, and feelings is \
complete. The story needs CONCRETE details.\n\
4. Generate a follow-up. If the story is not complete, ask one gentle, \
specific question to draw out what is missing.\n\
   - Ask for facts, not abstractions.\n\
   - Do not keep asking about feelings, smells, or colors. You may ask \
about feelings once; if the storyteller does not elaborate, move on.\n\
   - Prefer: people (\"Was anyone with you?\"), time (\"Around what year \
was that?\"), sequence (\"What happened next?\"), motivation (\"What made \
you do that?\"), place (\"Where exactly did this happen?\").\n\
\n\
You MUST record your analysis by calling the {ANALYSIS_TOOL_NAME} tool."
    )
}

/// The story-analysis tool definition.
pub fn analysis_tool() -> ToolDefinition {
    ToolDefinition {
        name: ANALYSIS_TOOL_NAME.to_string(),
        description: "Record the structured analysis of the storyteller's latest message."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "merged_text": {
                    "type": "string",
                    "description": "The full combined story (draft + new text), edited into clean first-person prose."
                },
                "critique": {
                    "type": "string",
                    "description": "One sentence on the depth of the merged story. What is missing? Emotions? Details? Dates?"
                },
                "is_complete": {
                    "type": "boolean",
                    "description": "true when the story is substantive enough to save, false when it is too short or superficial."
                },
                "follow_up_question": {
                    "type": ["string", "null"],
                    "description": "When is_complete is false, one gentle, specific question to draw out the missing details. null when is_complete is true."
                },
                "intent": {
                    "type": "string",
                    "enum": ["REFINING", "STOPPING", "CONFUSED"],
                    "description": "The intent behind the storyteller's newest message."
                }
            },
            "required": ["merged_text", "critique", "is_complete", "intent"]
        }),
    }
}

/// Build the classification request for one refinement round.
pub fn build_classify_request(
    agent_name: &str,
    model: &str,
    max_tokens: u32,
    previous_draft: &str,
    new_text: &str,
) -> MessageRequest {
    MessageRequest {
        model: model.to_string(),
        messages: vec![ApiMessage {
            role: "user".to_string(),
            content: format!(
                "Story so far (draft):\n{previous_draft}\n\n\
                 New message from the storyteller:\n{new_text}"
            ),
        }],
        system: Some(system_prompt(agent_name)),
        max_tokens,
        tools: Some(vec![analysis_tool()]),
        tool_choice: Some(ToolChoice::tool(ANALYSIS_TOOL_NAME)),
    }
}
