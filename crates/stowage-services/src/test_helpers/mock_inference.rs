//! Mock inference service returning a canned reply

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use stowage_inference::{InferenceError, InferenceResult, InferenceService};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Malformed(String),
    Failure(String),
}

/// Inference fake that answers every prompt the same way and keeps the prompts
#[derive(Debug, Clone)]
pub struct MockInference {
    reply: Reply,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockInference {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replies with the given model text
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    /// Fails as if the response envelope were unreadable
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Malformed(message.into()))
    }

    /// Fails as if the call itself were rejected
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Failure(message.into()))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceService for MockInference {
    fn name(&self) -> &str {
        "mock"
    }

    async fn invoke(&self, prompt: &str) -> InferenceResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Malformed(message) => Err(InferenceError::MalformedResponse(message.clone())),
            Reply::Failure(message) => Err(InferenceError::Invocation(message.clone())),
        }
    }
}
