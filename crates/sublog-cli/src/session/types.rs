//! CLI session and backend wrappers.

use async_trait::async_trait;

use sublog_core::{
    AccessToken, ApiUrl, CommitEntry, CommitLog, ContentApi, FileUpdate, NewRepo, Owner,
    RemoteFile, RepoInfo, Result, VersionMarker,
};
use sublog_file::FileContent;
use sublog_github::GithubContent;

/// A logged-in owner and the API they use.
#[derive(Debug, Clone)]
pub struct CliSession {
    pub owner: Owner,
    pub api: ApiUrl,
    pub token: AccessToken,
}

impl CliSession {
    /// Build the backend selected by the API URL.
    pub fn backend(&self) -> Result<CliBackend> {
        CliBackend::connect(&self.api, &self.token)
    }
}

/// Backend wrapper for CLI use.
#[derive(Debug, Clone)]
pub enum CliBackend {
    File(FileContent),
    Github(GithubContent),
}

impl CliBackend {
    /// `file://` URLs select the filesystem backend, anything else GitHub.
    pub fn connect(api: &ApiUrl, token: &AccessToken) -> Result<Self> {
        if api.is_local() {
            Ok(CliBackend::File(FileContent::from_url(api)?))
        } else {
            Ok(CliBackend::Github(GithubContent::new(
                api.clone(),
                token.clone(),
            )?))
        }
    }

    pub fn as_github(&self) -> Option<&GithubContent> {
        match self {
            CliBackend::Github(backend) => Some(backend),
            CliBackend::File(_) => None,
        }
    }
}

#[async_trait]
impl ContentApi for CliBackend {
    async fn get_file(&self, owner: &Owner, repo: &str, path: &str) -> Result<RemoteFile> {
        match self {
            CliBackend::File(backend) => backend.get_file(owner, repo, path).await,
            CliBackend::Github(backend) => backend.get_file(owner, repo, path).await,
        }
    }

    async fn put_file(
        &self,
        owner: &Owner,
        repo: &str,
        path: &str,
        update: FileUpdate<'_>,
    ) -> Result<VersionMarker> {
        match self {
            CliBackend::File(backend) => backend.put_file(owner, repo, path, update).await,
            CliBackend::Github(backend) => backend.put_file(owner, repo, path, update).await,
        }
    }

    async fn get_repo(&self, owner: &Owner, repo: &str) -> Result<RepoInfo> {
        match self {
            CliBackend::File(backend) => backend.get_repo(owner, repo).await,
            CliBackend::Github(backend) => backend.get_repo(owner, repo).await,
        }
    }

    async fn create_repo(&self, owner: &Owner, repo: NewRepo<'_>) -> Result<RepoInfo> {
        match self {
            CliBackend::File(backend) => backend.create_repo(owner, repo).await,
            CliBackend::Github(backend) => backend.create_repo(owner, repo).await,
        }
    }
}

#[async_trait]
impl CommitLog for CliBackend {
    async fn list_commits(
        &self,
        owner: &Owner,
        repo: &str,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CommitEntry>> {
        match self {
            CliBackend::File(backend) => {
                backend
                    .list_commits(owner, repo, path, page, per_page)
                    .await
            }
            CliBackend::Github(backend) => {
                backend
                    .list_commits(owner, repo, path, page, per_page)
                    .await
            }
        }
    }
}
