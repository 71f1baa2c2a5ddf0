// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude verdict source for the Memoir biography bot.
//!
//! This crate implements [`VerdictSource`] for the Anthropic Messages API.
//! The model is forced to call a single story-analysis tool whose input
//! schema mirrors [`Verdict`], so classification results come back as
//! structured data rather than free text.

pub mod client;
pub mod prompt;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use memoir_config::MemoirConfig;
use memoir_core::types::{AdapterType, HealthStatus, Verdict};
use memoir_core::{MemoirError, PluginAdapter, VerdictSource};
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{MessageResponse, ResponseContentBlock};

/// Anthropic Claude verdict source implementing [`VerdictSource`].
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> error.
pub struct AnthropicVerdictSource {
    client: AnthropicClient,
    agent_name: String,
    model: String,
    max_tokens: u32,
    request_timeout: Duration,
}

impl AnthropicVerdictSource {
    /// Creates a new verdict source from the given configuration.
    pub fn new(config: &MemoirConfig) -> Result<Self, MemoirError> {
        let api_key = resolve_api_key(&config.anthropic.api_key)?;
        let client = AnthropicClient::new(&api_key, &config.anthropic.api_version)?;

        info!(
            model = config.anthropic.default_model,
            "Anthropic verdict source initialized"
        );

        Ok(Self {
            client,
            agent_name: config.agent.name.clone(),
            model: config.anthropic.default_model.clone(),
            max_tokens: config.anthropic.max_tokens,
            request_timeout: Duration::from_secs(config.anthropic.request_timeout_secs),
        })
    }

    /// Creates a verdict source with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: AnthropicClient, request_timeout: Duration) -> Self {
        Self {
            client,
            agent_name: "memoir".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            request_timeout,
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicVerdictSource {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MemoirError> {
        // A full check would make a lightweight API call, but we avoid
        // consuming tokens on health checks.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MemoirError> {
        debug!("Anthropic verdict source shutting down");
        Ok(())
    }
}

#[async_trait]
impl VerdictSource for AnthropicVerdictSource {
    async fn classify(
        &self,
        previous_draft: &str,
        new_text: &str,
    ) -> Result<Verdict, MemoirError> {
        let request = prompt::build_classify_request(
            &self.agent_name,
            &self.model,
            self.max_tokens,
            previous_draft,
            new_text,
        );

        let response = tokio::time::timeout(self.request_timeout, self.client.send(&request))
            .await
            .map_err(|_| MemoirError::Timeout {
                duration: self.request_timeout,
            })??;

        let verdict = extract_verdict(&response)?;

        debug!(
            is_complete = verdict.is_complete,
            intent = %verdict.intent,
            "verdict received"
        );

        Ok(verdict.normalized())
    }
}

/// Pull the verdict out of the response's tool-use block.
fn extract_verdict(response: &MessageResponse) -> Result<Verdict, MemoirError> {
    for block in &response.content {
        if let ResponseContentBlock::ToolUse { name, input, .. } = block
            && name == prompt::ANALYSIS_TOOL_NAME
        {
            return serde_json::from_value(input.clone()).map_err(|e| MemoirError::Provider {
                message: format!("malformed verdict in tool input: {e}"),
                source: Some(Box::new(e)),
            });
        }
    }

    Err(MemoirError::Provider {
        message: "response contained no story-analysis tool call".into(),
        source: None,
    })
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, MemoirError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
        MemoirError::Config(
            "Anthropic API key not found. Set anthropic.api_key in config or the ANTHROPIC_API_KEY environment variable.".into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoir_core::types::UserIntent;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn verdict_response(input: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "msg_verdict",
            "type": "message",
            "role": "assistant",
            "content": [{
                "type": "tool_use",
                "id": "toolu_1",
                "name": "submit_story_analysis",
                "input": input
            }],
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 50, "output_tokens": 30}
        })
    }

    fn test_source(base_url: &str, timeout: Duration) -> AnthropicVerdictSource {
        let client = AnthropicClient::new("test-key", "2023-06-01")
            .unwrap()
            .with_base_url(base_url.to_string());
        AnthropicVerdictSource::with_client(client, timeout)
    }

    #[test]
    fn resolve_api_key_from_config() {
        let result = resolve_api_key(&Some("sk-test-123".into()));
        assert_eq!(result.unwrap(), "sk-test-123");
    }

    #[test]
    fn resolve_api_key_none_falls_back_to_env() {
        let result = resolve_api_key(&None);
        // Will succeed if the env var is set, fail otherwise.
        if result.is_err() {
            let err = result.unwrap_err().to_string();
            assert!(err.contains("API key not found"), "got: {err}");
        }
    }

    #[test]
    fn extract_verdict_from_tool_use_block() {
        let response: MessageResponse = serde_json::from_value(verdict_response(
            serde_json::json!({
                "merged_text": "I grew up in Porto.",
                "critique": "Needs a period of time.",
                "is_complete": false,
                "follow_up_question": "Around what year was that?",
                "intent": "REFINING"
            }),
        ))
        .unwrap();

        let verdict = extract_verdict(&response).unwrap();
        assert_eq!(verdict.merged_text, "I grew up in Porto.");
        assert_eq!(verdict.intent, UserIntent::Refining);
    }

    #[test]
    fn extract_verdict_fails_without_tool_use() {
        let response: MessageResponse = serde_json::from_value(serde_json::json!({
            "id": "msg_text",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "no tool call here"}],
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 5, "output_tokens": 5}
        }))
        .unwrap();

        let err = extract_verdict(&response).unwrap_err();
        assert!(err.to_string().contains("no story-analysis tool call"));
    }

    #[test]
    fn extract_verdict_fails_on_malformed_input() {
        let response: MessageResponse = serde_json::from_value(verdict_response(
            serde_json::json!({"merged_text": 42}),
        ))
        .unwrap();

        let err = extract_verdict(&response).unwrap_err();
        assert!(err.to_string().contains("malformed verdict"), "got: {err}");
    }

    #[tokio::test]
    async fn classify_returns_structured_verdict() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_partial_json(serde_json::json!({
                "tool_choice": {"type": "tool", "name": "submit_story_analysis"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(verdict_response(
                serde_json::json!({
                    "merged_text": "My first job was at the docks.",
                    "critique": "Good concrete detail.",
                    "is_complete": true,
                    "follow_up_question": null,
                    "intent": "REFINING"
                }),
            )))
            .mount(&server)
            .await;

        let source = test_source(&server.uri(), Duration::from_secs(5));
        let verdict = source.classify("", "I worked at the docks.").await.unwrap();

        assert!(verdict.is_complete);
        assert!(verdict.follow_up_question.is_none());
        assert_eq!(verdict.merged_text, "My first job was at the docks.");
    }

    #[tokio::test]
    async fn classify_normalizes_complete_verdict_with_follow_up() {
        let server = MockServer::start().await;

        // A verdict that violates the field invariant: complete but with a
        // follow-up question attached.
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(verdict_response(
                serde_json::json!({
                    "merged_text": "Done story.",
                    "critique": "Fine.",
                    "is_complete": true,
                    "follow_up_question": "Anything else?",
                    "intent": "REFINING"
                }),
            )))
            .mount(&server)
            .await;

        let source = test_source(&server.uri(), Duration::from_secs(5));
        let verdict = source.classify("", "done").await.unwrap();

        assert!(verdict.is_complete);
        assert!(verdict.follow_up_question.is_none());
    }

    #[tokio::test]
    async fn classify_times_out_as_provider_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(verdict_response(serde_json::json!({
                        "merged_text": "late",
                        "critique": "late",
                        "is_complete": false,
                        "follow_up_question": "late?",
                        "intent": "REFINING"
                    })))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let source = test_source(&server.uri(), Duration::from_millis(100));
        let err = source.classify("", "hello").await.unwrap_err();
        assert!(matches!(err, MemoirError::Timeout { .. }), "got: {err}");
    }
}
