//! sublog-file - Filesystem-backed repository storage.
//!
//! Stores ledger repositories under a local directory with the same
//! conditional-write semantics as the GitHub backend. Used for offline
//! ledgers and for tests.

mod content;
mod store;

pub use content::FileContent;
pub use store::{FileStore, content_version};
