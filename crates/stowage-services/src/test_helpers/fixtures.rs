//! Shared test fixtures

use chrono::{TimeZone, Utc};
use stowage_core::FileMetadata;

/// The 2,048,000-byte PDF used across the pipeline tests
pub fn pdf_metadata() -> FileMetadata {
    FileMetadata {
        name: "documento.pdf".to_string(),
        size: 2_048_000,
        file_type: "pdf".to_string(),
        content_type: "application/pdf".to_string(),
        last_modified: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        current_tier: "STANDARD".to_string(),
    }
}

/// A model reply in the requested JSON shape
pub fn recommendation_json(tier: &str, reasoning: &str, confidence: &str) -> String {
    serde_json::json!({
        "storage_class": tier,
        "reasoning": reasoning,
        "confidence": confidence,
    })
    .to_string()
}
