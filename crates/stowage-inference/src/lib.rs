//! Stowage Inference
//!
//! This crate provides the text-generation abstraction used by the tier
//! recommender and its backends: Amazon Bedrock (Anthropic models through
//! `InvokeModel`) and the Anthropic Messages API.

pub mod factory;
pub mod messages;
pub mod service;

#[cfg(feature = "inference-anthropic")]
pub mod anthropic;
#[cfg(feature = "inference-bedrock")]
pub mod bedrock;

// Re-export commonly used types
pub use factory::create_inference_service;
pub use service::{InferenceError, InferenceResult, InferenceService};

#[cfg(feature = "inference-anthropic")]
pub use anthropic::AnthropicInferenceService;
#[cfg(feature = "inference-bedrock")]
pub use bedrock::BedrockInferenceService;
