//! Record store abstraction

use async_trait::async_trait;
use stowage_core::InsightRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("Record write failed for {id}: {message}")]
    WriteFailed { id: String, message: String },

    #[error("Record scan failed: {0}")]
    ScanFailed(String),

    #[error("Stored item could not be decoded: {0}")]
    Decode(String),
}

pub type RecordStoreResult<T> = Result<T, RecordStoreError>;

/// Durable key-value store for insight records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Name of the backing table, for logs
    fn target(&self) -> &str;

    /// Unconditional write by `record.id`; an existing record is replaced.
    async fn upsert(&self, record: &InsightRecord) -> RecordStoreResult<()>;

    /// Every stored record, in store order.
    async fn scan(&self) -> RecordStoreResult<Vec<InsightRecord>>;
}
