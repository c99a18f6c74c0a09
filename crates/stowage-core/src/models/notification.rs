//! S3 event notification payload and the handler's acknowledgment.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! notification is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Batch of object-created notifications delivered to the handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Notification {
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3BucketEntity,
    pub object: S3ObjectEntity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3ObjectEntity {
    /// Key as transported: form-urlencoded (`+` for spaces, `%XX` escapes)
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl NotificationRecord {
    pub fn new(bucket: impl Into<String>, raw_key: impl Into<String>) -> Self {
        Self {
            event_name: Some("ObjectCreated:Put".to_string()),
            s3: S3Entity {
                bucket: S3BucketEntity { name: bucket.into() },
                object: S3ObjectEntity {
                    key: raw_key.into(),
                    size: None,
                },
            },
        }
    }

    pub fn bucket(&self) -> &str {
        &self.s3.bucket.name
    }

    pub fn raw_key(&self) -> &str {
        &self.s3.object.key
    }
}

/// Fixed acknowledgment returned for every batch, whatever happened per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAck {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl BatchAck {
    pub fn ok() -> Self {
        Self { status_code: 200 }
    }
}
