//! GitHub-backed content API and commit log.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::{debug, instrument};

use sublog_core::error::InvalidInputError;
use sublog_core::{
    AccessToken, ApiUrl, CommitEntry, CommitLog, ContentApi, FileUpdate, NewRepo, Owner,
    RemoteFile, RepoInfo, Result, VersionMarker,
};

use crate::client::GithubClient;
use crate::endpoints::{
    self, AuthenticatedUser, CommitResponse, CreateRepoRequest, FileContentResponse,
    ListCommitsQuery, PutFileRequest, PutFileResponse,
};

/// Repository storage on GitHub, authenticated with a personal access token.
#[derive(Debug, Clone)]
pub struct GithubContent {
    client: GithubClient,
}

impl GithubContent {
    /// Create a backend for `api` using `token`.
    pub fn new(api: ApiUrl, token: AccessToken) -> Result<Self> {
        Ok(Self {
            client: GithubClient::new(api, token)?,
        })
    }

    /// Wrap an existing client.
    pub fn from_client(client: GithubClient) -> Self {
        Self { client }
    }

    /// Returns the API base URL.
    pub fn api(&self) -> &ApiUrl {
        self.client.api()
    }

    /// The account the token belongs to.
    #[instrument(skip(self))]
    pub async fn authenticated_user(&self) -> Result<AuthenticatedUser> {
        self.client.get(endpoints::USER).await
    }
}

fn invalid_document(path: &str, reason: String) -> sublog_core::Error {
    InvalidInputError::Document {
        path: path.to_string(),
        reason,
    }
    .into()
}

/// Interpret a contents response that must describe a single file.
///
/// GitHub answers with an array for a directory and with other `type`
/// values for symlinks and submodules.
fn file_entry(path: &str, response: Value) -> Result<FileContentResponse> {
    if response.is_array() {
        return Err(invalid_document(
            path,
            "path is a directory, not a file".to_string(),
        ));
    }

    let entry: FileContentResponse = serde_json::from_value(response)
        .map_err(|e| invalid_document(path, format!("unexpected contents response: {}", e)))?;

    match entry.kind.as_deref() {
        None | Some("file") => Ok(entry),
        Some(other) => Err(invalid_document(
            path,
            format!("path is a {}, not a file", other),
        )),
    }
}

/// Decode the base64 payload of a contents response.
///
/// GitHub wraps the encoded content at 60 columns, so whitespace is removed
/// before decoding.
fn decode_content(path: &str, response: &FileContentResponse) -> Result<Vec<u8>> {
    match response.encoding.as_deref() {
        Some("base64") => {}
        Some(other) => {
            return Err(invalid_document(
                path,
                format!("unsupported content encoding '{}'", other),
            ));
        }
        None => {
            return Err(invalid_document(
                path,
                "response carried no content encoding".to_string(),
            ));
        }
    }

    let encoded: String = response
        .content
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    STANDARD
        .decode(encoded)
        .map_err(|e| invalid_document(path, format!("invalid base64 content: {}", e)))
}

#[async_trait]
impl ContentApi for GithubContent {
    #[instrument(skip(self), fields(%owner))]
    async fn get_file(&self, owner: &Owner, repo: &str, path: &str) -> Result<RemoteFile> {
        let response: Value = self
            .client
            .get(&endpoints::contents(owner.as_str(), repo, path))
            .await?;
        let response = file_entry(path, response)?;

        let content = decode_content(path, &response)?;
        debug!(bytes = content.len(), sha = %response.sha, "Fetched file");

        Ok(RemoteFile {
            content,
            version: VersionMarker::new(response.sha),
        })
    }

    #[instrument(skip(self, update), fields(%owner))]
    async fn put_file(
        &self,
        owner: &Owner,
        repo: &str,
        path: &str,
        update: FileUpdate<'_>,
    ) -> Result<VersionMarker> {
        let request = PutFileRequest {
            message: update.message,
            content: STANDARD.encode(update.content),
            sha: update.version.map(VersionMarker::as_str),
        };

        let response: PutFileResponse = self
            .client
            .put(&endpoints::contents(owner.as_str(), repo, path), &request)
            .await?;

        debug!(sha = %response.content.sha, "Wrote file");
        Ok(VersionMarker::new(response.content.sha))
    }

    #[instrument(skip(self), fields(%owner))]
    async fn get_repo(&self, owner: &Owner, repo: &str) -> Result<RepoInfo> {
        self.client
            .get(&endpoints::repo(owner.as_str(), repo))
            .await
    }

    #[instrument(skip(self, repo), fields(%owner, repo = repo.name))]
    async fn create_repo(&self, owner: &Owner, repo: NewRepo<'_>) -> Result<RepoInfo> {
        let request = CreateRepoRequest {
            name: repo.name,
            private: repo.private,
            auto_init: repo.auto_init,
            description: repo.description,
        };

        let info: RepoInfo = self.client.post(endpoints::USER_REPOS, &request).await?;
        debug!(full_name = %info.full_name, "Created repository");
        Ok(info)
    }
}

#[async_trait]
impl CommitLog for GithubContent {
    #[instrument(skip(self), fields(%owner))]
    async fn list_commits(
        &self,
        owner: &Owner,
        repo: &str,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CommitEntry>> {
        let query = ListCommitsQuery {
            path,
            page,
            per_page,
        };

        let response: Vec<CommitResponse> = self
            .client
            .get_with_query(&endpoints::commits(owner.as_str(), repo), &query)
            .await?;

        Ok(response
            .into_iter()
            .map(|c| CommitEntry {
                sha: c.sha,
                message: c.commit.message,
                date: c
                    .commit
                    .author
                    .and_then(|a| a.date)
                    .unwrap_or_default(),
                url: c.html_url,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(content: &str, encoding: Option<&str>) -> FileContentResponse {
        FileContentResponse {
            kind: Some("file".into()),
            sha: "abc".into(),
            content: Some(content.into()),
            encoding: encoding.map(String::from),
        }
    }

    #[test]
    fn decodes_wrapped_base64() {
        let wrapped = "W3sibmFtZSI6\nICJTcG90aWZ5In1d\n";
        let decoded = decode_content("subscriptions.json", &response(wrapped, Some("base64")));
        assert_eq!(decoded.unwrap(), br#"[{"name": "Spotify"}]"#);
    }

    #[test]
    fn rejects_unknown_encoding() {
        let err = decode_content("subscriptions.json", &response("", Some("none"))).unwrap_err();
        assert!(err.to_string().contains("unsupported content encoding"));
    }

    #[test]
    fn rejects_corrupt_base64() {
        assert!(decode_content("subscriptions.json", &response("@@@", Some("base64"))).is_err());
    }

    #[test]
    fn non_file_entries_are_document_errors() {
        let listing = serde_json::json!([{ "type": "file", "name": "a.json", "sha": "1" }]);
        let err = file_entry("subscriptions.json", listing).unwrap_err();
        assert!(err.to_string().contains("directory"));

        let link = serde_json::json!({ "type": "symlink", "sha": "1", "target": "x" });
        let err = file_entry("subscriptions.json", link).unwrap_err();
        assert!(err.to_string().contains("symlink"));

        let file = serde_json::json!({ "type": "file", "sha": "1", "content": "", "encoding": "base64" });
        assert_eq!(file_entry("subscriptions.json", file).unwrap().sha, "1");
    }
}
