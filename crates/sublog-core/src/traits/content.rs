//! Repository content API trait.

use async_trait::async_trait;

use crate::Result;
use crate::repo::{FileUpdate, NewRepo, RemoteFile, RepoInfo};
use crate::types::{Owner, VersionMarker};

/// A remote file store addressed by owner, repository, and path.
///
/// Implementations report an absent repository or file as
/// [`Error::Protocol`](crate::Error::Protocol) with status 404, and a stale
/// version marker on write as status 409. Interpreting those statuses is
/// left to [`RecordStore`](crate::store::RecordStore).
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Fetch a file and its version marker.
    async fn get_file(&self, owner: &Owner, repo: &str, path: &str) -> Result<RemoteFile>;

    /// Conditionally create or replace a file.
    ///
    /// Returns the version marker of the newly written content.
    async fn put_file(
        &self,
        owner: &Owner,
        repo: &str,
        path: &str,
        update: FileUpdate<'_>,
    ) -> Result<VersionMarker>;

    /// Look up a repository.
    async fn get_repo(&self, owner: &Owner, repo: &str) -> Result<RepoInfo>;

    /// Create a repository for the owner.
    async fn create_repo(&self, owner: &Owner, repo: NewRepo<'_>) -> Result<RepoInfo>;
}
