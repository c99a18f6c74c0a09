//! Metadata extraction from the object store

use chrono::{DateTime, Utc};
use std::sync::Arc;
use stowage_core::constants::{DEFAULT_CURRENT_TIER, UNKNOWN_CONTENT_TYPE};
use stowage_core::{file_type_from_key, FileMetadata};
use stowage_storage::{ObjectStore, StorageResult};

/// Reads an object's size, content type, tier and modification time
#[derive(Clone)]
pub struct MetadataExtractor {
    store: Arc<dyn ObjectStore>,
}

impl MetadataExtractor {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// `key` must already be percent-decoded.
    pub async fn extract(&self, bucket: &str, key: &str) -> StorageResult<FileMetadata> {
        let head = self.store.head_metadata(bucket, key).await?;

        let metadata = FileMetadata {
            name: key.to_string(),
            size: head.size,
            file_type: file_type_from_key(key),
            content_type: head
                .content_type
                .unwrap_or_else(|| UNKNOWN_CONTENT_TYPE.to_string()),
            last_modified: head.last_modified.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            current_tier: head
                .storage_class
                .unwrap_or_else(|| DEFAULT_CURRENT_TIER.to_string()),
        };

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size_bytes = metadata.size,
            file_type = %metadata.file_type,
            current_tier = %metadata.current_tier,
            "Extracted file metadata"
        );

        Ok(metadata)
    }
}
