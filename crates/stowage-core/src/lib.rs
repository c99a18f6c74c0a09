//! Stowage Core Library
//!
//! This crate provides the domain models, storage tier types, configuration and
//! key handling shared by every Stowage component: the pipeline services, the
//! Lambda entry point and the operator CLI.

pub mod config;
pub mod constants;
pub mod keys;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, InferenceProvider, LogFormat};
pub use keys::{decode_event_key, encode_copy_source, file_type_from_key, KeyDecodeError};
pub use models::{
    BatchAck, FileMetadata, InsightRecord, NotificationRecord, S3Notification, TierRecommendation,
};
pub use storage_types::{Confidence, StorageTier};
