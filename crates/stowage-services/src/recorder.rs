//! Insight persistence

use chrono::Utc;
use std::sync::Arc;
use stowage_core::{FileMetadata, InsightRecord, TierRecommendation};
use stowage_db::{RecordStore, RecordStoreResult};

/// Writes one insight record per analyzed object
///
/// Without a configured record store every call is a logged no-op and the
/// pipeline carries on.
#[derive(Clone)]
pub struct InsightRecorder {
    store: Option<Arc<dyn RecordStore>>,
}

impl InsightRecorder {
    pub fn new(store: Option<Arc<dyn RecordStore>>) -> Self {
        Self { store }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    /// Returns the written record, or `None` when no store is configured.
    pub async fn record(
        &self,
        bucket: &str,
        key: &str,
        metadata: &FileMetadata,
        recommendation: &TierRecommendation,
    ) -> RecordStoreResult<Option<InsightRecord>> {
        let Some(store) = &self.store else {
            tracing::warn!(
                bucket = %bucket,
                key = %key,
                "DYNAMODB_TABLE not set, skipping insight record"
            );
            return Ok(None);
        };

        let record = InsightRecord::new(bucket, key, metadata, recommendation, Utc::now());
        store.upsert(&record).await?;

        tracing::info!(
            table = %store.target(),
            id = %record.id,
            tier = %record.tier,
            "Insight recorded"
        );

        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{pdf_metadata, MockRecordStore};
    use stowage_core::{Confidence, StorageTier};
    use stowage_db::RecordStoreError;

    fn recommendation() -> TierRecommendation {
        TierRecommendation {
            tier: StorageTier::StandardIa,
            reasoning: "2MB PDF document".to_string(),
            confidence: Confidence::High,
        }
    }

    #[tokio::test]
    async fn writes_record_keyed_by_bucket_and_key() {
        let store = Arc::new(MockRecordStore::new());
        let recorder = InsightRecorder::new(Some(store.clone()));

        let before = Utc::now();
        let record = recorder
            .record("test-bucket", "documento.pdf", &pdf_metadata(), &recommendation())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.id, "test-bucket/documento.pdf");
        assert!(record.analyzed_at >= before);
        assert_eq!(store.writes(), 1);
        let stored = store.get("test-bucket/documento.pdf").unwrap();
        assert_eq!(stored.size, 2_048_000);
        assert_eq!(stored.current_tier, "STANDARD");
        assert_eq!(stored.tier, StorageTier::StandardIa);
        assert_eq!(stored.reasoning, "2MB PDF document");
    }

    #[tokio::test]
    async fn second_analysis_replaces_first() {
        let store = Arc::new(MockRecordStore::new());
        let recorder = InsightRecorder::new(Some(store.clone()));

        recorder
            .record("b", "k.pdf", &pdf_metadata(), &recommendation())
            .await
            .unwrap();
        recorder
            .record("b", "k.pdf", &pdf_metadata(), &TierRecommendation::fallback())
            .await
            .unwrap();

        assert_eq!(store.writes(), 2);
        assert_eq!(store.scan().await.unwrap().len(), 1);
        assert_eq!(store.get("b/k.pdf").unwrap().confidence, Confidence::Low);
    }

    #[tokio::test]
    async fn unconfigured_store_writes_nothing() {
        let recorder = InsightRecorder::new(None);
        assert!(!recorder.is_configured());

        let written = recorder
            .record("b", "k.pdf", &pdf_metadata(), &recommendation())
            .await
            .unwrap();
        assert!(written.is_none());
    }

    #[tokio::test]
    async fn write_failure_propagates() {
        let store = Arc::new(MockRecordStore::new());
        store.fail_writes();
        let recorder = InsightRecorder::new(Some(store));

        let err = recorder
            .record("b", "k.pdf", &pdf_metadata(), &recommendation())
            .await
            .unwrap_err();
        assert!(matches!(err, RecordStoreError::WriteFailed { .. }));
    }
}
