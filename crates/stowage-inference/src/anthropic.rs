//! Anthropic Messages API backend

use async_trait::async_trait;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::messages::{decode_reply, MessagesRequest};
use crate::service::{InferenceError, InferenceResult, InferenceService};

const API_BASE: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API backend
pub struct AnthropicInferenceService {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

// Never print the API key
impl Debug for AnthropicInferenceService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AnthropicInferenceService")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AnthropicInferenceService {
    pub fn new(api_key: String, model: String, max_tokens: u32) -> InferenceResult<Self> {
        if api_key.trim().is_empty() {
            return Err(InferenceError::Config(
                "Anthropic API key is required but not provided".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            InferenceError::Config(format!("Failed to create HTTP client for Anthropic: {}", e))
        })?;

        Ok(Self {
            http_client,
            api_key,
            model,
            max_tokens,
            base_url: API_BASE.to_string(),
        })
    }

    /// Point the client at another Messages API base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl InferenceService for AnthropicInferenceService {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn invoke(&self, prompt: &str) -> InferenceResult<String> {
        let start = std::time::Instant::now();
        let body = MessagesRequest::anthropic(&self.model, prompt, self.max_tokens);

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    model = %self.model,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Anthropic request failed"
                );
                InferenceError::Invocation(format!("Failed to send request to Anthropic: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = %status,
                model = %self.model,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Anthropic request rejected"
            );
            return Err(InferenceError::Invocation(format!(
                "Anthropic API request failed: {} - {}",
                status, error_text
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            InferenceError::Invocation(format!("Failed to read Anthropic response: {}", e))
        })?;

        let (text, usage) = decode_reply(&bytes)?;

        tracing::info!(
            model = %self.model,
            input_tokens = usage.map(|u| u.input_tokens),
            output_tokens = usage.map(|u| u.output_tokens),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Anthropic request successful"
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn service(base_url: &str) -> AnthropicInferenceService {
        AnthropicInferenceService::new(
            "sk-ant-test-key-123".to_string(),
            "claude-test".to_string(),
            300,
        )
        .unwrap()
        .with_base_url(format!("{}/v1", base_url))
    }

    #[test]
    fn rejects_empty_api_key() {
        let err =
            AnthropicInferenceService::new(" ".to_string(), "m".to_string(), 300).unwrap_err();
        assert!(matches!(err, InferenceError::Config(_)));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let svc = AnthropicInferenceService::new(
            "sk-ant-secret-value".to_string(),
            "claude-test".to_string(),
            300,
        )
        .unwrap();
        assert!(!format!("{:?}", svc).contains("secret"));
    }

    #[tokio::test]
    async fn invoke_returns_first_text_block() {
        let mut server = mockito::Server::new_async().await;
        let reply = json!({
            "content": [{"type": "text", "text": "{\"storage_class\": \"STANDARD\"}"}],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        });
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "sk-ant-test-key-123")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(Matcher::PartialJson(json!({
                "model": "claude-test",
                "max_tokens": 300,
                "messages": [{"role": "user", "content": "classify this"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply.to_string())
            .create_async()
            .await;

        let text = service(&server.url()).invoke("classify this").await.unwrap();

        assert_eq!(text, "{\"storage_class\": \"STANDARD\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_error_is_invocation_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body(r#"{"type": "error", "error": {"type": "overloaded_error"}}"#)
            .create_async()
            .await;

        let err = service(&server.url()).invoke("prompt").await.unwrap_err();
        assert!(matches!(err, InferenceError::Invocation(_)));
    }

    #[tokio::test]
    async fn garbage_body_is_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body("invalid json")
            .create_async()
            .await;

        let err = service(&server.url()).invoke("prompt").await.unwrap_err();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn with_base_url_trims_trailing_slash() {
        let svc = AnthropicInferenceService::new("key-123456789".to_string(), "m".to_string(), 1)
            .unwrap()
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(svc.base_url, "http://localhost:8080/v1");
    }
}
