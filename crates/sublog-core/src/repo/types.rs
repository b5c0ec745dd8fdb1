//! Repository operation types.

use serde::{Deserialize, Serialize};

use crate::types::VersionMarker;

/// A file fetched from a repository.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    /// Decoded file content.
    pub content: Vec<u8>,

    /// Version marker of this exact content.
    pub version: VersionMarker,
}

/// A conditional create-or-update of one file.
#[derive(Debug, Clone, Copy)]
pub struct FileUpdate<'a> {
    /// New file content, unencoded.
    pub content: &'a [u8],

    /// Commit message recorded with the change.
    pub message: &'a str,

    /// Version the caller last read.
    ///
    /// `Some` makes the remote reject the write if the file has changed;
    /// `None` asserts that the file does not exist yet.
    pub version: Option<&'a VersionMarker>,
}

/// Repository metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    /// Repository name.
    pub name: String,

    /// `owner/name`.
    pub full_name: String,

    /// Whether the repository is private.
    pub private: bool,

    /// Repository description.
    #[serde(default)]
    pub description: Option<String>,

    /// Browser URL, if the backend has one.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Parameters for creating a repository.
#[derive(Debug, Clone, Copy)]
pub struct NewRepo<'a> {
    pub name: &'a str,
    pub private: bool,
    pub auto_init: bool,
    pub description: &'a str,
}

/// One commit touching the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEntry {
    /// Revision id.
    pub sha: String,

    /// Commit message.
    pub message: String,

    /// Author timestamp (RFC 3339), empty if unknown.
    pub date: String,

    /// Browser URL for the commit.
    pub url: String,
}
