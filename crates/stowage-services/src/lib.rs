//! Stowage Services Layer
//!
//! This crate hosts the analysis pipeline: metadata extraction, tier
//! recommendation, insight recording and tier application, orchestrated per
//! notification record by the [`EventDispatcher`]. Clients are injected as
//! trait objects so the Lambda entry point, the CLI and the tests share one
//! pipeline.

pub mod applicator;
#[cfg(feature = "aws")]
pub mod bootstrap;
pub mod dispatcher;
pub mod error;
pub mod extractor;
pub mod recommender;
pub mod recorder;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use applicator::TierApplicator;
#[cfg(feature = "aws")]
pub use bootstrap::build_dispatcher;
pub use dispatcher::{BatchReport, EventDispatcher, RecordOutcome};
pub use error::PipelineError;
pub use extractor::MetadataExtractor;
pub use recommender::{RecommendationOutcome, TierRecommender};
pub use recorder::InsightRecorder;
