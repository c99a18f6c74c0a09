//! Backend selection from configuration

use anyhow::Result;
use std::sync::Arc;
use stowage_core::{Config, InferenceProvider};

use crate::service::InferenceService;

/// Create the inference backend named by `INFERENCE_PROVIDER`
pub async fn create_inference_service(config: &Config) -> Result<Arc<dyn InferenceService>> {
    match config.inference_provider {
        #[cfg(feature = "inference-bedrock")]
        InferenceProvider::Bedrock => {
            let service = crate::bedrock::BedrockInferenceService::new(
                &config.bedrock_region,
                config.bedrock_model_id.clone(),
                config.max_tokens,
            )
            .await;
            tracing::debug!(
                region = %config.bedrock_region,
                model_id = %config.bedrock_model_id,
                "Bedrock inference backend created"
            );
            Ok(Arc::new(service))
        }

        #[cfg(not(feature = "inference-bedrock"))]
        InferenceProvider::Bedrock => Err(anyhow::anyhow!(
            "Bedrock backend not available (inference-bedrock feature not enabled)"
        )),

        #[cfg(feature = "inference-anthropic")]
        InferenceProvider::Anthropic => {
            let api_key = config.anthropic_api_key.clone().ok_or_else(|| {
                anyhow::anyhow!("ANTHROPIC_API_KEY is required for the anthropic backend")
            })?;
            let service = crate::anthropic::AnthropicInferenceService::new(
                api_key,
                config.anthropic_model.clone(),
                config.max_tokens,
            )?;
            tracing::debug!(model = %config.anthropic_model, "Anthropic inference backend created");
            Ok(Arc::new(service))
        }

        #[cfg(not(feature = "inference-anthropic"))]
        InferenceProvider::Anthropic => Err(anyhow::anyhow!(
            "Anthropic backend not available (inference-anthropic feature not enabled)"
        )),
    }
}

#[cfg(all(test, feature = "inference-anthropic"))]
mod tests {
    use super::*;

    #[test]
    fn builds_anthropic_backend_from_config() {
        let config = Config::from_lookup(|name| match name {
            "INFERENCE_PROVIDER" => Some("anthropic".to_string()),
            "ANTHROPIC_API_KEY" => Some("sk-ant-test-key-123".to_string()),
            _ => None,
        })
        .unwrap();

        let service = tokio_test::block_on(create_inference_service(&config)).unwrap();
        assert_eq!(service.name(), "anthropic");
    }
}
