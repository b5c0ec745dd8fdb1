//! Remote repository types.
//!
//! This module defines the values exchanged with the content API.
//! The operations themselves are methods on [`ContentApi`](crate::ContentApi)
//! and [`CommitLog`](crate::CommitLog).

mod types;

pub use types::{CommitEntry, FileUpdate, NewRepo, RemoteFile, RepoInfo};
