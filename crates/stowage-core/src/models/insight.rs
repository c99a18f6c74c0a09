//! Persisted insight: observed metadata paired with the recommendation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::INSIGHT_TTL_DAYS;
use crate::models::{FileMetadata, TierRecommendation};
use crate::storage_types::{Confidence, StorageTier};

/// Write-once audit record keyed by `<bucket>/<key>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightRecord {
    pub id: String,
    pub bucket: String,
    pub key: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub file_type: String,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
    pub current_tier: String,
    pub tier: StorageTier,
    pub reasoning: String,
    pub confidence: Confidence,
    pub analyzed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl InsightRecord {
    pub fn id_for(bucket: &str, key: &str) -> String {
        format!("{}/{}", bucket, key)
    }

    pub fn new(
        bucket: &str,
        key: &str,
        metadata: &FileMetadata,
        recommendation: &TierRecommendation,
        analyzed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Self::id_for(bucket, key),
            bucket: bucket.to_string(),
            key: key.to_string(),
            name: metadata.name.clone(),
            size: metadata.size,
            file_type: metadata.file_type.clone(),
            content_type: metadata.content_type.clone(),
            last_modified: metadata.last_modified,
            current_tier: metadata.current_tier.clone(),
            tier: recommendation.tier,
            reasoning: recommendation.reasoning.clone(),
            confidence: recommendation.confidence,
            analyzed_at,
            expires_at: analyzed_at + Duration::days(INSIGHT_TTL_DAYS),
        }
    }
}
