//! Commit history trait.

use async_trait::async_trait;

use crate::Result;
use crate::repo::CommitEntry;
use crate::types::Owner;

/// Access to the change history of a repository file.
#[async_trait]
pub trait CommitLog: Send + Sync {
    /// List commits touching `path`, newest first.
    ///
    /// `page` is 1-based.
    async fn list_commits(
        &self,
        owner: &Owner,
        repo: &str,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CommitEntry>>;
}
