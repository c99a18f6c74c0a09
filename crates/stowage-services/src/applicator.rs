//! Applies a recommendation to the object: storage class, metadata, tags

use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use stowage_core::constants::OPTIMIZED_BY;
use stowage_core::TierRecommendation;
use stowage_storage::{ObjectStore, ObjectTag, StorageResult};

#[derive(Clone)]
pub struct TierApplicator {
    store: Arc<dyn ObjectStore>,
}

impl TierApplicator {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Copy the object onto itself in the recommended tier, then replace its tags.
    ///
    /// `size` is the size seen by the metadata read. If the object was
    /// overwritten since, the recorded size is stale; nothing re-reads it.
    pub async fn apply(
        &self,
        bucket: &str,
        key: &str,
        recommendation: &TierRecommendation,
        size: u64,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let optimized_at = Utc::now();

        self.store
            .copy_in_place(
                bucket,
                key,
                recommendation.tier,
                build_metadata(recommendation, size, optimized_at),
            )
            .await?;

        self.store
            .replace_tags(bucket, key, build_tags(recommendation, size, optimized_at))
            .await?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            tier = %recommendation.tier,
            confidence = %recommendation.confidence,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage class applied"
        );

        Ok(())
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// User metadata written with the copy; replaces whatever the object had.
pub fn build_metadata(
    recommendation: &TierRecommendation,
    size: u64,
    optimized_at: DateTime<Utc>,
) -> HashMap<String, String> {
    HashMap::from([
        ("file-size-bytes".to_string(), size.to_string()),
        ("optimized-by".to_string(), OPTIMIZED_BY.to_string()),
        (
            "recommended-class".to_string(),
            recommendation.tier.as_str().to_string(),
        ),
        (
            "confidence".to_string(),
            recommendation.confidence.as_str().to_string(),
        ),
        ("optimized-at".to_string(), timestamp(optimized_at)),
    ])
}

pub fn build_tags(
    recommendation: &TierRecommendation,
    size: u64,
    optimized_at: DateTime<Utc>,
) -> Vec<ObjectTag> {
    vec![
        ObjectTag::new("OptimizedBy", OPTIMIZED_BY),
        ObjectTag::new("RecommendedClass", recommendation.tier.as_str()),
        ObjectTag::new("Confidence", recommendation.confidence.as_str()),
        ObjectTag::new("OptimizedAt", timestamp(optimized_at)),
        ObjectTag::new("FileSizeBytes", size.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockObjectStore;
    use chrono::TimeZone;
    use stowage_core::{Confidence, StorageTier};
    use stowage_storage::ObjectAccessError;

    fn glacier() -> TierRecommendation {
        TierRecommendation {
            tier: StorageTier::Glacier,
            reasoning: "backup archive".to_string(),
            confidence: Confidence::Medium,
        }
    }

    fn tag<'a>(tags: &'a [ObjectTag], key: &str) -> Option<&'a str> {
        tags.iter().find(|t| t.key == key).map(|t| t.value.as_str())
    }

    #[test]
    fn metadata_and_tags_share_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let metadata = build_metadata(&glacier(), 5_000, at);
        let tags = build_tags(&glacier(), 5_000, at);

        assert_eq!(metadata.len(), 5);
        assert_eq!(metadata["optimized-by"], "Stowage");
        assert_eq!(metadata["recommended-class"], "GLACIER");
        assert_eq!(metadata["confidence"], "medium");
        assert_eq!(metadata["file-size-bytes"], "5000");
        assert_eq!(metadata["optimized-at"], "2024-05-01T09:30:00Z");

        assert_eq!(tags.len(), 5);
        assert_eq!(tag(&tags, "OptimizedAt"), Some("2024-05-01T09:30:00Z"));
        assert_eq!(tag(&tags, "OptimizedBy"), Some("Stowage"));
    }

    #[tokio::test]
    async fn apply_copies_once_and_tags_once() {
        let store = Arc::new(MockObjectStore::new());
        store.add_object("ops", "backup.zip", 5_000, Some("application/zip"));
        let applicator = TierApplicator::new(store.clone());

        applicator
            .apply("ops", "backup.zip", &glacier(), 5_000)
            .await
            .unwrap();

        let copies = store.copies();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].tier, StorageTier::Glacier);
        assert_eq!(copies[0].metadata["file-size-bytes"], "5000");

        let tag_calls = store.tag_calls();
        assert_eq!(tag_calls.len(), 1);
        assert_eq!(tag(&tag_calls[0].tags, "FileSizeBytes"), Some("5000"));
        assert_eq!(tag(&tag_calls[0].tags, "RecommendedClass"), Some("GLACIER"));
        assert_eq!(tag(&tag_calls[0].tags, "Confidence"), Some("medium"));

        assert_eq!(store.storage_class("ops", "backup.zip").as_deref(), Some("GLACIER"));
    }

    #[tokio::test]
    async fn stale_size_is_written_as_given() {
        let store = Arc::new(MockObjectStore::new());
        store.add_object("ops", "log.txt", 1_000, None);
        let applicator = TierApplicator::new(store.clone());

        // Object overwritten between the metadata read and the apply step
        store.set_size("ops", "log.txt", 9_999);
        applicator.apply("ops", "log.txt", &glacier(), 1_000).await.unwrap();

        let metadata = store.user_metadata("ops", "log.txt").unwrap();
        assert_eq!(metadata["file-size-bytes"], "1000");
        let tags = store.tags("ops", "log.txt").unwrap();
        assert_eq!(tag(&tags, "FileSizeBytes"), Some("1000"));
    }

    #[tokio::test]
    async fn failed_copy_skips_tagging() {
        let store = Arc::new(MockObjectStore::new());
        store.add_object("ops", "backup.zip", 5_000, None);
        store.fail_copy("ops", "backup.zip");
        let applicator = TierApplicator::new(store.clone());

        let err = applicator
            .apply("ops", "backup.zip", &glacier(), 5_000)
            .await
            .unwrap_err();

        assert!(matches!(err, ObjectAccessError::CopyFailed(_)));
        assert!(store.tag_calls().is_empty());
    }

    #[tokio::test]
    async fn failed_tagging_keeps_new_class() {
        let store = Arc::new(MockObjectStore::new());
        store.add_object("ops", "backup.zip", 5_000, None);
        store.fail_tagging("ops", "backup.zip");
        let applicator = TierApplicator::new(store.clone());

        let err = applicator
            .apply("ops", "backup.zip", &glacier(), 5_000)
            .await
            .unwrap_err();

        assert!(matches!(err, ObjectAccessError::TaggingFailed(_)));
        assert_eq!(store.storage_class("ops", "backup.zip").as_deref(), Some("GLACIER"));
    }
}
