//! Record store for insight records
//!
//! The tier pipeline writes one insight per analyzed object, keyed by
//! `<bucket>/<key>`, with an unconditional upsert. The operator CLI reads them
//! back with a full scan. There is no update or delete path; expiry is left to
//! the table's TTL attribute.

pub mod traits;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub use traits::{RecordStore, RecordStoreError, RecordStoreResult};

#[cfg(feature = "dynamodb")]
pub use dynamodb::{create_record_store, DynamoRecordStore};
