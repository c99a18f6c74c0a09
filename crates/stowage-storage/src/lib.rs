//! Stowage Storage Library
//!
//! This crate provides the object store abstraction the tier pipeline talks to
//! and its S3 implementation. Every operation addresses an object by explicit
//! bucket and key; there is no implicit default bucket.

#[cfg(feature = "storage-s3")]
pub mod factory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-s3")]
pub use factory::create_object_store;
#[cfg(feature = "storage-s3")]
pub use s3::S3ObjectStore;
pub use traits::{ObjectAccessError, ObjectHead, ObjectStore, ObjectTag, StorageResult};
