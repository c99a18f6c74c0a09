//! Per-record pipeline errors
//!
//! Anything that aborts one record's processing. The dispatcher logs these and
//! moves on; none of them fails a batch.

use stowage_core::KeyDecodeError;
use stowage_db::RecordStoreError;
use stowage_inference::InferenceError;
use stowage_storage::ObjectAccessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidKey(#[from] KeyDecodeError),

    #[error(transparent)]
    ObjectAccess(#[from] ObjectAccessError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    RecordStore(#[from] RecordStoreError),
}

impl PipelineError {
    /// Stage label used in log lines
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::InvalidKey(_) => "decode",
            PipelineError::ObjectAccess(_) => "object_store",
            PipelineError::Inference(_) => "inference",
            PipelineError::RecordStore(_) => "record_store",
        }
    }
}
