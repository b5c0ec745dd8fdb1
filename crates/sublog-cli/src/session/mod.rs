//! Persisted login state and the backend it selects.

pub mod storage;
mod types;

pub use types::{CliBackend, CliSession};
