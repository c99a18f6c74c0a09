//! Tier recommendation returned by the recommender.

use serde::{Deserialize, Serialize};

use crate::constants::{FALLBACK_CONFIDENCE, FALLBACK_REASONING, FALLBACK_TIER};
use crate::storage_types::{Confidence, StorageTier};

/// A storage tier recommendation with its justification.
///
/// The wire shape is the JSON object the inference service is asked to
/// produce: `storage_class`, `reasoning` and `confidence`, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierRecommendation {
    #[serde(rename = "storage_class", alias = "tier")]
    pub tier: StorageTier,
    pub reasoning: String,
    pub confidence: Confidence,
}

impl TierRecommendation {
    /// The fixed recommendation used when the inference reply cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            tier: FALLBACK_TIER,
            reasoning: FALLBACK_REASONING.to_string(),
            confidence: FALLBACK_CONFIDENCE,
        }
    }
}
