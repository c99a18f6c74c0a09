//! Per-record pipeline over an S3 notification batch
//!
//! Each record runs decode, extract, recommend, record, apply strictly in
//! sequence. A failing record is logged with its key and the stage that
//! failed; the rest of the batch still runs and the acknowledgment is always
//! success.

use std::sync::Arc;
use stowage_core::{decode_event_key, BatchAck, NotificationRecord, S3Notification, TierRecommendation};
use stowage_db::RecordStore;
use stowage_inference::InferenceService;
use stowage_storage::ObjectStore;

use crate::applicator::TierApplicator;
use crate::error::PipelineError;
use crate::extractor::MetadataExtractor;
use crate::recommender::TierRecommender;
use crate::recorder::InsightRecorder;

/// What one successfully processed record produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub bucket: String,
    pub key: String,
    pub size: u64,
    pub recommendation: TierRecommendation,
    /// False when no record store is configured
    pub recorded: bool,
}

/// Per-record results in notification order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<Result<RecordOutcome, PipelineError>>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

#[derive(Clone)]
pub struct EventDispatcher {
    extractor: MetadataExtractor,
    recommender: TierRecommender,
    recorder: InsightRecorder,
    applicator: TierApplicator,
}

impl EventDispatcher {
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        inference: Arc<dyn InferenceService>,
        record_store: Option<Arc<dyn RecordStore>>,
    ) -> Self {
        Self {
            extractor: MetadataExtractor::new(object_store.clone()),
            recommender: TierRecommender::new(inference),
            recorder: InsightRecorder::new(record_store),
            applicator: TierApplicator::new(object_store),
        }
    }

    /// Run the whole pipeline for one object. `raw_key` is still form-urlencoded.
    pub async fn process_record(
        &self,
        bucket: &str,
        raw_key: &str,
    ) -> Result<RecordOutcome, PipelineError> {
        let key = decode_event_key(raw_key)?;
        self.process_key(bucket, key).await
    }

    /// Run the pipeline for a key taken literally, with no form decoding.
    pub async fn process_key(
        &self,
        bucket: &str,
        key: String,
    ) -> Result<RecordOutcome, PipelineError> {
        let metadata = self.extractor.extract(bucket, &key).await?;
        let recommendation = self.recommender.recommend(&metadata).await?;
        let recorded = self
            .recorder
            .record(bucket, &key, &metadata, &recommendation)
            .await?
            .is_some();
        self.applicator
            .apply(bucket, &key, &recommendation, metadata.size)
            .await?;

        Ok(RecordOutcome {
            bucket: bucket.to_string(),
            key,
            size: metadata.size,
            recommendation,
            recorded,
        })
    }

    /// Process every record in order, collecting one result per record.
    pub async fn dispatch(&self, notification: &S3Notification) -> BatchReport {
        let start = std::time::Instant::now();
        let mut report = BatchReport::default();

        for record in &notification.records {
            let result = self.process_one(record).await;
            report.results.push(result);
        }

        tracing::info!(
            records = report.results.len(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Batch processed"
        );

        report
    }

    /// Entry point for the trigger: always acknowledges the batch.
    pub async fn handle(&self, notification: &S3Notification) -> BatchAck {
        self.dispatch(notification).await;
        BatchAck::ok()
    }

    async fn process_one(
        &self,
        record: &NotificationRecord,
    ) -> Result<RecordOutcome, PipelineError> {
        let bucket = record.bucket();
        let raw_key = record.raw_key();

        match self.process_record(bucket, raw_key).await {
            Ok(outcome) => {
                tracing::info!(
                    bucket = %bucket,
                    key = %outcome.key,
                    tier = %outcome.recommendation.tier,
                    recorded = outcome.recorded,
                    "Object analyzed"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    stage = e.stage(),
                    bucket = %bucket,
                    key = %raw_key,
                    "Failed to process object"
                );
                Err(e)
            }
        }
    }
}
