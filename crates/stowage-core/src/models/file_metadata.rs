//! File characteristics observed for one uploaded object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata extracted for one object, built fresh per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Object key, already percent-decoded
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Lower-cased extension, or `unknown`
    #[serde(rename = "type")]
    pub file_type: String,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
    /// Storage class reported by the object store (may be outside the four recommendable tiers)
    pub current_tier: String,
}
