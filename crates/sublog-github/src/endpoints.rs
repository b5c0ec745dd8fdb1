//! GitHub REST request/response types.

use serde::{Deserialize, Serialize};

/// API version pinned on every request.
pub const API_VERSION: &str = "2022-11-28";

/// Media type for JSON responses.
pub const MEDIA_TYPE: &str = "application/vnd.github+json";

pub fn contents(owner: &str, repo: &str, path: &str) -> String {
    format!("/repos/{}/{}/contents/{}", owner, repo, path.trim_start_matches('/'))
}

pub fn repo(owner: &str, repo: &str) -> String {
    format!("/repos/{}/{}", owner, repo)
}

pub fn commits(owner: &str, repo: &str) -> String {
    format!("/repos/{}/{}/commits", owner, repo)
}

pub const USER_REPOS: &str = "/user/repos";

pub const USER: &str = "/user";

/// Error body returned by GitHub.
#[derive(Debug, Deserialize)]
pub struct GithubErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub documentation_url: Option<String>,
}

/// GET /repos/{owner}/{repo}/contents/{path}
#[derive(Debug, Deserialize)]
pub struct FileContentResponse {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub sha: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// PUT /repos/{owner}/{repo}/contents/{path}
#[derive(Debug, Serialize)]
pub struct PutFileRequest<'a> {
    pub message: &'a str,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct PutFileResponse {
    pub content: PutFileContent,
}

#[derive(Debug, Deserialize)]
pub struct PutFileContent {
    pub sha: String,
}

/// POST /user/repos
#[derive(Debug, Serialize)]
pub struct CreateRepoRequest<'a> {
    pub name: &'a str,
    pub private: bool,
    pub auto_init: bool,
    pub description: &'a str,
}

/// GET /repos/{owner}/{repo}/commits query.
#[derive(Debug, Serialize)]
pub struct ListCommitsQuery<'a> {
    pub path: &'a str,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Deserialize)]
pub struct CommitResponse {
    pub sha: String,
    #[serde(default)]
    pub html_url: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    #[serde(default)]
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub date: Option<String>,
}

/// The account a token belongs to (GET /user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Account login, used as the ledger owner.
    pub login: String,

    /// Display name, if set.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub html_url: Option<String>,
}
