//! Test helpers for pipeline unit and integration tests
//!
//! In-memory fakes of the object store, inference service and record store,
//! plus fixtures shared by the stage tests. No AWS account is needed.

pub mod fixtures;
pub mod mock_inference;
pub mod mock_object_store;
pub mod mock_record_store;

pub use fixtures::*;
pub use mock_inference::MockInference;
pub use mock_object_store::{CopyCall, MockObjectStore, TagCall};
pub use mock_record_store::MockRecordStore;
