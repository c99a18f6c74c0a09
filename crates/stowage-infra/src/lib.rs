//! Stowage Infrastructure Library
//!
//! Process-level setup shared by the Lambda entry point and the CLI. For now
//! that is tracing initialization only.

pub mod telemetry;

pub use telemetry::{init_telemetry, DEFAULT_FILTER};
