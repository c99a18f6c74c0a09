//! Inference service abstraction
//!
//! The recommender only needs "send a prompt, get text back". Backends decode
//! their own response envelopes and hand over the first text block.

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

/// Inference operation errors
#[derive(Debug, Error)]
pub enum InferenceError {
    /// The request never produced a usable HTTP exchange: network failure,
    /// throttling, access denied, model not found.
    #[error("Inference invocation failed: {0}")]
    Invocation(String),

    /// The service answered but the envelope carried no readable text.
    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("Inference configuration error: {0}")]
    Config(String),
}

/// Result type for inference operations
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Trait implemented by every text-generation backend
#[async_trait]
pub trait InferenceService: Send + Sync + Debug {
    /// Backend identifier used in logs
    fn name(&self) -> &str;

    /// Submit a prompt and return the raw text of the reply
    async fn invoke(&self, prompt: &str) -> InferenceResult<String>;
}
