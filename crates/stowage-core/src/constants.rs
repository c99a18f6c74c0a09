//! Fixed values shared by the pipeline, the record store and the CLI.

use crate::storage_types::{Confidence, StorageTier};

/// Marker written to object metadata and tags by the tier applicator.
pub const OPTIMIZED_BY: &str = "Stowage";

/// File type used when a key has no `.` suffix.
pub const UNKNOWN_FILE_TYPE: &str = "unknown";

/// Content type used when the object store reports none.
pub const UNKNOWN_CONTENT_TYPE: &str = "unknown";

/// S3 omits the storage class header for STANDARD objects.
pub const DEFAULT_CURRENT_TIER: &str = "STANDARD";

/// Insight records expire one year after analysis.
pub const INSIGHT_TTL_DAYS: i64 = 365;

/// Objects under this size gain nothing from infrequent-access tiers.
pub const IA_MIN_OBJECT_BYTES: u64 = 128 * 1024;

pub const FALLBACK_TIER: StorageTier = StorageTier::StandardIa;
pub const FALLBACK_REASONING: &str = "default analysis applied";
pub const FALLBACK_CONFIDENCE: Confidence = Confidence::Low;

pub const DEFAULT_BEDROCK_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
pub const DEFAULT_BEDROCK_REGION: &str = "us-east-1";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
