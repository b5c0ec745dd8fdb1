//! File-backed content API.

use std::path::Path;

use async_trait::async_trait;

use sublog_core::error::{Error, InvalidInputError, TransportError};
use sublog_core::{
    ApiUrl, CommitEntry, CommitLog, ContentApi, FileUpdate, NewRepo, Owner, RemoteFile, RepoInfo,
    Result, VersionMarker,
};

use crate::store::FileStore;

/// Local repository storage, addressed by a `file://` API URL.
#[derive(Debug, Clone)]
pub struct FileContent {
    store: FileStore,
}

impl FileContent {
    /// Create a backend rooted at the given directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            store: FileStore::new(root),
        }
    }

    /// Create a backend from a `file://` API URL.
    pub fn from_url(api: &ApiUrl) -> Result<Self> {
        let root = api.to_file_path().ok_or_else(|| InvalidInputError::ApiUrl {
            value: api.to_string(),
            reason: "expected a file:// URL".to_string(),
        })?;
        Ok(Self::new(root))
    }

    /// Access the underlying store.
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Run a store operation off the async runtime.
    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(FileStore) -> Result<T> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(store))
            .await
            .map_err(|e| {
                Error::Transport(TransportError::Io {
                    message: format!("storage task failed: {}", e),
                })
            })?
    }
}

#[async_trait]
impl ContentApi for FileContent {
    async fn get_file(&self, owner: &Owner, repo: &str, path: &str) -> Result<RemoteFile> {
        let (owner, repo, path) = (owner.clone(), repo.to_string(), path.to_string());
        self.blocking(move |store| store.read_file(&owner, &repo, &path))
            .await
    }

    async fn put_file(
        &self,
        owner: &Owner,
        repo: &str,
        path: &str,
        update: FileUpdate<'_>,
    ) -> Result<VersionMarker> {
        let (owner, repo, path) = (owner.clone(), repo.to_string(), path.to_string());
        let content = update.content.to_vec();
        let message = update.message.to_string();
        let expected = update.version.cloned();

        self.blocking(move |store| {
            store.write_file(&owner, &repo, &path, &content, &message, expected.as_ref())
        })
        .await
    }

    async fn get_repo(&self, owner: &Owner, repo: &str) -> Result<RepoInfo> {
        let (owner, repo) = (owner.clone(), repo.to_string());
        self.blocking(move |store| store.get_repo(&owner, &repo))
            .await
    }

    async fn create_repo(&self, owner: &Owner, repo: NewRepo<'_>) -> Result<RepoInfo> {
        let owner = owner.clone();
        let name = repo.name.to_string();
        let description = repo.description.to_string();
        let (private, auto_init) = (repo.private, repo.auto_init);

        self.blocking(move |store| {
            store.create_repo(
                &owner,
                NewRepo {
                    name: &name,
                    private,
                    auto_init,
                    description: &description,
                },
            )
        })
        .await
    }
}

#[async_trait]
impl CommitLog for FileContent {
    async fn list_commits(
        &self,
        owner: &Owner,
        repo: &str,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CommitEntry>> {
        let (owner, repo, path) = (owner.clone(), repo.to_string(), path.to_string());
        self.blocking(move |store| store.list_commits(&owner, &repo, &path, page, per_page))
            .await
    }
}
