//! Amazon Bedrock backend (Anthropic models through `InvokeModel`)

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::messages::{decode_reply, MessagesRequest};
use crate::service::{InferenceError, InferenceResult, InferenceService};

/// Bedrock runtime backend
pub struct BedrockInferenceService {
    client: BedrockClient,
    model_id: String,
    max_tokens: u32,
}

impl Debug for BedrockInferenceService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("BedrockInferenceService")
            .field("model_id", &self.model_id)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl BedrockInferenceService {
    /// Create a Bedrock runtime client for the given region
    pub async fn new(region: &str, model_id: String, max_tokens: u32) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self::from_client(BedrockClient::new(&config), model_id, max_tokens)
    }

    pub fn from_client(client: BedrockClient, model_id: String, max_tokens: u32) -> Self {
        Self {
            client,
            model_id,
            max_tokens,
        }
    }
}

#[async_trait]
impl InferenceService for BedrockInferenceService {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn invoke(&self, prompt: &str) -> InferenceResult<String> {
        let start = std::time::Instant::now();

        let body = serde_json::to_vec(&MessagesRequest::bedrock(prompt, self.max_tokens))
            .map_err(|e| InferenceError::Config(format!("Failed to encode request: {}", e)))?;

        let output = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    model_id = %self.model_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Bedrock invoke_model failed"
                );
                InferenceError::Invocation(DisplayErrorContext(&e).to_string())
            })?;

        let (text, usage) = decode_reply(output.body().as_ref())?;

        tracing::info!(
            model_id = %self.model_id,
            input_tokens = usage.map(|u| u.input_tokens),
            output_tokens = usage.map(|u| u.output_tokens),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Bedrock invoke_model successful"
        );

        Ok(text)
    }
}
