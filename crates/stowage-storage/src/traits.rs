//! Object store abstraction trait
//!
//! This module defines the ObjectStore trait the pipeline stages use to read
//! object metadata and rewrite storage class, metadata and tags.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use stowage_core::StorageTier;
use thiserror::Error;

/// Object store operation errors
#[derive(Debug, Error)]
pub enum ObjectAccessError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Access denied to {bucket}/{key}: {message}")]
    PermissionDenied {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("Copy failed: {0}")]
    CopyFailed(String),

    #[error("Tagging failed: {0}")]
    TaggingFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Result type for object store operations
pub type StorageResult<T> = Result<T, ObjectAccessError>;

/// What a HEAD request reports about an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHead {
    pub size: u64,
    pub content_type: Option<String>,
    /// Absent for STANDARD objects on S3
    pub storage_class: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// One entry of an object's tag set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTag {
    pub key: String,
    pub value: String,
}

impl ObjectTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Object store abstraction trait
///
/// Implemented by the S3 client and by in-memory fakes in tests. Every write is
/// an unconditional overwrite; no operation checks the object's current ETag.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read size, content type, storage class and last-modified time.
    ///
    /// Fails with `ObjectAccessError::NotFound` when the object does not exist.
    async fn head_metadata(&self, bucket: &str, key: &str) -> StorageResult<ObjectHead>;

    /// Copy the object onto itself with a new storage class, replacing all
    /// user metadata with `metadata`.
    async fn copy_in_place(
        &self,
        bucket: &str,
        key: &str,
        tier: StorageTier,
        metadata: HashMap<String, String>,
    ) -> StorageResult<()>;

    /// Replace the object's whole tag set.
    async fn replace_tags(&self, bucket: &str, key: &str, tags: Vec<ObjectTag>)
        -> StorageResult<()>;

    /// Upload an object (used by the operator CLI to seed sample files).
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        metadata: HashMap<String, String>,
    ) -> StorageResult<()>;
}
