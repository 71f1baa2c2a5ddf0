// SPDX-FileCopyrightText: 2026 Memoir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thin reqwest wrapper around the Anthropic Messages endpoint.
//!
//! One POST per verdict. A transient failure (rate limit, server error,
//! overload) gets a single delayed second attempt before the error is
//! handed back to the turn engine, which falls back to re-asking.

use std::time::Duration;

use memoir_core::MemoirError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::warn;

use crate::types::{ApiErrorResponse, MessageRequest, MessageResponse};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// Statuses worth exactly one more attempt.
const TRANSIENT_STATUSES: &[u16] = &[429, 500, 503, 529];

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Authenticated HTTP client for the Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
}

/// One failed exchange with the API, before retry policy is applied.
struct ApiFailure {
    message: String,
    retryable: bool,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiFailure {
    fn terminal(message: String, source: Option<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            message,
            retryable: false,
            source,
        }
    }

    fn into_error(self) -> MemoirError {
        MemoirError::Provider {
            message: self.message,
            source: self.source,
        }
    }
}

impl AnthropicClient {
    pub fn new(api_key: &str, api_version: &str) -> Result<Self, MemoirError> {
        let mut headers = HeaderMap::new();

        let mut key_header = HeaderValue::from_str(api_key).map_err(|e| {
            MemoirError::Config(format!("API key is not a valid header value: {e}"))
        })?;
        key_header.set_sensitive(true);
        headers.insert("x-api-key", key_header);

        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(api_version).map_err(|e| {
                MemoirError::Config(format!("API version is not a valid header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| MemoirError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: MESSAGES_URL.to_string(),
        })
    }

    /// Overrides the endpoint, for tests against a local mock server.
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// POST the request, retrying once on a transient status.
    pub async fn send(&self, request: &MessageRequest) -> Result<MessageResponse, MemoirError> {
        match self.post(request).await {
            Ok(response) => Ok(response),
            Err(failure) if failure.retryable => {
                warn!(error = failure.message.as_str(), "transient API error, retrying once");
                tokio::time::sleep(RETRY_DELAY).await;
                self.post(request).await.map_err(ApiFailure::into_error)
            }
            Err(failure) => Err(failure.into_error()),
        }
    }

    async fn post(&self, request: &MessageRequest) -> Result<MessageResponse, ApiFailure> {
        let response = self
            .http
            .post(&self.base_url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                ApiFailure::terminal(format!("request failed: {e}"), Some(Box::new(e)))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ApiFailure::terminal(format!("failed to read response body: {e}"), Some(Box::new(e)))
        })?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                ApiFailure::terminal(format!("unparseable API response: {e}"), Some(Box::new(e)))
            });
        }

        // Prefer the structured error envelope when the body carries one.
        let detail = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|envelope| format!("{}: {}", envelope.error.type_, envelope.error.message))
            .unwrap_or(body);

        Err(ApiFailure {
            message: format!("API returned {status} ({detail})"),
            retryable: TRANSIENT_STATUSES.contains(&status.as_u16()),
            source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AnthropicClient {
        AnthropicClient::new("key-under-test", "2023-06-01")
            .unwrap()
            .with_base_url(server.uri())
    }

    fn request() -> MessageRequest {
        MessageRequest {
            model: "claude-sonnet-4-20250514".into(),
            messages: vec![ApiMessage {
                role: "user".into(),
                content: "Story so far: ...".into(),
            }],
            system: None,
            max_tokens: 512,
            tools: None,
            tool_choice: None,
        }
    }

    fn message_body(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "noted"}],
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 40, "output_tokens": 12}
        })
    }

    fn api_error(type_: &str, message: &str) -> serde_json::Value {
        serde_json::json!({"error": {"type": type_, "message": message}})
    }

    #[tokio::test]
    async fn posts_with_auth_headers_and_parses_the_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-api-key", "key-under-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_body("msg_01")))
            .mount(&server)
            .await;

        let reply = client_for(&server).send(&request()).await.unwrap();
        assert_eq!(reply.id, "msg_01");
        assert_eq!(reply.usage.input_tokens, 40);
        assert_eq!(reply.content.len(), 1);
    }

    #[tokio::test]
    async fn one_rate_limit_is_absorbed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(api_error("rate_limit_error", "slow down")),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_body("msg_02")))
            .mount(&server)
            .await;

        let reply = client_for(&server).send(&request()).await.unwrap();
        assert_eq!(reply.id, "msg_02");
    }

    #[tokio::test]
    async fn second_transient_failure_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(api_error("overloaded_error", "try later")),
            )
            .expect(2)
            .mount(&server)
            .await;

        let err = client_for(&server).send(&request()).await.unwrap_err();
        assert!(err.to_string().contains("overloaded_error"), "got: {err}");
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(api_error("invalid_request_error", "no such model")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).send(&request()).await.unwrap_err();
        assert!(err.to_string().contains("no such model"), "got: {err}");
    }
}
