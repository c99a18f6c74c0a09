//! Anthropic Messages wire format
//!
//! Both backends speak it: Bedrock wraps it in `InvokeModel` with an
//! `anthropic_version` field, the Messages API takes it with a `model` field.

use serde::{Deserialize, Serialize};

use crate::service::{InferenceError, InferenceResult};

/// Version string Bedrock expects for Anthropic models
pub const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

#[derive(Debug, Serialize)]
pub struct MessagesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub max_tokens: u32,
    pub messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
pub struct MessageParam {
    pub role: String,
    pub content: String,
}

impl MessagesRequest {
    /// Request body for Bedrock `InvokeModel`
    pub fn bedrock(prompt: &str, max_tokens: u32) -> Self {
        Self {
            anthropic_version: Some(BEDROCK_ANTHROPIC_VERSION.to_string()),
            model: None,
            max_tokens,
            messages: vec![MessageParam::user(prompt)],
        }
    }

    /// Request body for the Anthropic Messages API
    pub fn anthropic(model: &str, prompt: &str, max_tokens: u32) -> Self {
        Self {
            anthropic_version: None,
            model: Some(model.to_string()),
            max_tokens,
            messages: vec![MessageParam::user(prompt)],
        }
    }
}

impl MessageParam {
    fn user(prompt: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: prompt.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlockResponse>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlockResponse {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    /// First text block of the reply
    pub fn first_text(self) -> Option<String> {
        self.content.into_iter().find_map(|block| match block {
            ContentBlockResponse::Text { text } => Some(text),
            ContentBlockResponse::Other => None,
        })
    }
}

/// Decode a Messages envelope and extract its first text block.
pub fn decode_reply(body: &[u8]) -> InferenceResult<(String, Option<Usage>)> {
    let response: MessagesResponse = serde_json::from_slice(body).map_err(|e| {
        InferenceError::MalformedResponse(format!("response body is not a Messages envelope: {}", e))
    })?;

    let usage = response.usage;

    let text = response
        .first_text()
        .ok_or_else(|| InferenceError::MalformedResponse("reply has no text block".to_string()))?;

    Ok((text, usage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bedrock_body_has_version_and_no_model() {
        let body = serde_json::to_value(MessagesRequest::bedrock("hello", 300)).unwrap();
        assert_eq!(
            body,
            json!({
                "anthropic_version": "bedrock-2023-05-31",
                "max_tokens": 300,
                "messages": [{"role": "user", "content": "hello"}]
            })
        );
    }

    #[test]
    fn anthropic_body_has_model_and_no_version() {
        let body =
            serde_json::to_value(MessagesRequest::anthropic("claude-x", "hello", 64)).unwrap();
        assert_eq!(body["model"], "claude-x");
        assert!(body.get("anthropic_version").is_none());
        assert_eq!(body["max_tokens"], 64);
    }

    #[test]
    fn decode_reply_takes_first_text_block() {
        let body = json!({
            "id": "msg_01",
            "type": "message",
            "content": [
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "{\"storage_class\": \"GLACIER\"}"},
                {"type": "text", "text": "second"}
            ],
            "usage": {"input_tokens": 120, "output_tokens": 40}
        });
        let (text, usage) = decode_reply(body.to_string().as_bytes()).unwrap();
        assert_eq!(text, "{\"storage_class\": \"GLACIER\"}");
        let usage = usage.unwrap();
        assert_eq!(usage.input_tokens, 120);
        assert_eq!(usage.output_tokens, 40);
    }

    #[test]
    fn decode_reply_rejects_non_json_body() {
        let err = decode_reply(b"invalid json").unwrap_err();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn decode_reply_rejects_empty_content() {
        let err = decode_reply(br#"{"content": []}"#).unwrap_err();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }
}
