//! Tier recommendation through a text-generation service
//!
//! The reply is free text expected to hold a JSON object. Anything that does
//! not parse into a [`TierRecommendation`] is replaced by the fixed fallback,
//! so the pipeline never stalls on an unusable answer. Transport failures are
//! not recovered here and reach the dispatcher.

use serde_json::Value;
use std::sync::Arc;
use stowage_core::constants::IA_MIN_OBJECT_BYTES;
use stowage_core::{FileMetadata, TierRecommendation};
use stowage_inference::{InferenceError, InferenceResult, InferenceService};

/// What came out of the reply, before collapsing into one recommendation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationOutcome {
    Parsed(TierRecommendation),
    Fallback { reason: String },
}

impl RecommendationOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RecommendationOutcome::Fallback { .. })
    }

    pub fn into_recommendation(self) -> TierRecommendation {
        match self {
            RecommendationOutcome::Parsed(recommendation) => recommendation,
            RecommendationOutcome::Fallback { .. } => TierRecommendation::fallback(),
        }
    }
}

#[derive(Clone)]
pub struct TierRecommender {
    inference: Arc<dyn InferenceService>,
}

impl TierRecommender {
    pub fn new(inference: Arc<dyn InferenceService>) -> Self {
        Self { inference }
    }

    /// Ask the inference service for a tier; falls back on unparseable replies.
    pub async fn recommend(&self, metadata: &FileMetadata) -> InferenceResult<TierRecommendation> {
        let prompt = build_prompt(metadata);

        let outcome = match self.inference.invoke(&prompt).await {
            Ok(reply) => parse_reply(&reply),
            Err(InferenceError::MalformedResponse(reason)) => {
                RecommendationOutcome::Fallback { reason }
            }
            Err(e) => return Err(e),
        };

        if let RecommendationOutcome::Fallback { ref reason } = outcome {
            tracing::warn!(
                key = %metadata.name,
                backend = %self.inference.name(),
                reason = %reason,
                "Inference reply unusable, applying default recommendation"
            );
        }

        let recommendation = outcome.into_recommendation();

        tracing::debug!(
            key = %metadata.name,
            tier = %recommendation.tier,
            confidence = %recommendation.confidence,
            "Tier recommendation ready"
        );

        Ok(recommendation)
    }
}

/// Human-readable size for the prompt: GB from 1 GiB up, MB below.
pub fn size_display(size: u64) -> String {
    let size_mb = size as f64 / (1024.0 * 1024.0);
    let size_gb = size_mb / 1024.0;

    if size_gb >= 1.0 {
        format!("{:.2} GB", size_gb)
    } else {
        format!("{:.2} MB", size_mb)
    }
}

pub fn build_prompt(metadata: &FileMetadata) -> String {
    format!(
        r#"Analyze this S3 object and recommend the ideal storage class:

File: {name}
Size: {size} bytes ({display})
Type: {file_type}
Content-Type: {content_type}

Available classes:
- STANDARD: frequent access, highest cost per GB
- STANDARD_IA: infrequent access, medium cost, {ia_min_kb}KB minimum billable size
- GLACIER: archival, low cost, retrieval in minutes to hours
- DEEP_ARCHIVE: long-term archival, lowest cost, retrieval within 12 hours

Consider especially:
- File size (files under {ia_min_kb}KB gain nothing from infrequent-access classes)
- File type (logs, backups = GLACIER; documents = STANDARD_IA; active images = STANDARD)
- Expected access pattern based on the type
- Cost-benefit by size

Reply ONLY with JSON:
{{
    "storage_class": "RECOMMENDED_CLASS",
    "reasoning": "why this class fits",
    "confidence": "low/medium/high"
}}"#,
        name = metadata.name,
        size = metadata.size,
        display = size_display(metadata.size),
        file_type = metadata.file_type,
        content_type = metadata.content_type,
        ia_min_kb = IA_MIN_OBJECT_BYTES / 1024,
    )
}

/// Strip a Markdown code fence around the JSON, if any
fn extract_json(text: &str) -> &str {
    if text.contains("```json") {
        text.split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(text)
            .trim()
    } else if text.contains("```") {
        text.split("```").nth(1).unwrap_or(text).trim()
    } else {
        text.trim()
    }
}

/// Decode a reply that must be a JSON object with exactly the three fields.
///
/// Serde's derived struct visitor also accepts a sequence, so the object shape
/// is checked on the untyped value first.
fn decode_recommendation(text: &str) -> Result<TierRecommendation, String> {
    match serde_json::from_str::<Value>(text).map_err(|e| e.to_string())? {
        Value::Object(map) => {
            serde_json::from_value(Value::Object(map)).map_err(|e| e.to_string())
        }
        other => Err(format!("reply is not a JSON object: {}", kind(&other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn parse_reply(reply: &str) -> RecommendationOutcome {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return RecommendationOutcome::Fallback {
            reason: "empty reply".to_string(),
        };
    }

    // The whole reply first: fence markers may appear inside the reasoning text
    let error = match decode_recommendation(trimmed) {
        Ok(recommendation) => return RecommendationOutcome::Parsed(recommendation),
        Err(e) => e,
    };

    let fenced = extract_json(trimmed);
    if fenced.is_empty() || fenced == trimmed {
        return RecommendationOutcome::Fallback { reason: error };
    }

    match decode_recommendation(fenced) {
        Ok(recommendation) => RecommendationOutcome::Parsed(recommendation),
        Err(e) => RecommendationOutcome::Fallback { reason: e },
    }
}
