//! Data models for the tier pipeline
//!
//! Each sub-module represents one stage's data: the inbound notification,
//! the extracted metadata, the recommendation and the persisted insight.

mod file_metadata;
mod insight;
mod notification;
mod recommendation;

pub use file_metadata::*;
pub use insight::*;
pub use notification::*;
pub use recommendation::*;
