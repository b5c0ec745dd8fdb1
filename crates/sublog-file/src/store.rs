//! Filesystem storage for local ledger repositories.
//!
//! Layout under the root directory:
//!
//! ```text
//! repos/<owner>/<repo>/repo.json      repository metadata
//! repos/<owner>/<repo>/files/<path>   file content
//! repos/<owner>/<repo>/commits.jsonl  append-only change log
//! repos/<owner>/<repo>/repo.lock      write lock
//! ```
//!
//! Status codes mirror the GitHub contents API so that callers cannot tell
//! the backends apart: 404 for a missing repository or file, 409 for a stale
//! version, 422 for creating a file or repository that already exists.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use sublog_core::error::{Error, InvalidInputError, ProtocolError, TransportError};
use sublog_core::{CommitEntry, NewRepo, Owner, RemoteFile, RepoInfo, Result, VersionMarker};

pub(crate) fn map_io(err: std::io::Error) -> Error {
    Error::Transport(TransportError::Io {
        message: err.to_string(),
    })
}

fn map_json(err: serde_json::Error) -> Error {
    Error::InvalidInput(InvalidInputError::Other {
        message: err.to_string(),
    })
}

fn not_found(message: String) -> Error {
    Error::Protocol(ProtocolError::new(404, Some(message)))
}

/// One line of `commits.jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CommitLogLine {
    sha: String,
    path: Option<String>,
    message: String,
    date: String,
}

/// Version marker for a piece of content.
pub fn content_version(content: &[u8]) -> VersionMarker {
    VersionMarker::new(hex::encode(Sha256::digest(content)))
}

/// Filesystem-backed repositories.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn repo_dir(&self, owner: &Owner, repo: &str) -> Result<PathBuf> {
        if repo.is_empty() || repo.contains(['/', '\\']) || repo.starts_with('.') {
            return Err(InvalidInputError::Other {
                message: format!("invalid repository name '{}'", repo),
            }
            .into());
        }
        Ok(self.root.join("repos").join(owner.as_str()).join(repo))
    }

    fn meta_path(dir: &Path) -> PathBuf {
        dir.join("repo.json")
    }

    fn commits_path(dir: &Path) -> PathBuf {
        dir.join("commits.jsonl")
    }

    fn lock_path(dir: &Path) -> PathBuf {
        dir.join("repo.lock")
    }

    /// Resolve a repository-relative path, refusing anything that escapes it.
    fn file_path(dir: &Path, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let safe = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(InvalidInputError::Other {
                message: format!("invalid file path '{}'", path),
            }
            .into());
        }
        Ok(dir.join("files").join(relative))
    }

    fn existing_repo_dir(&self, owner: &Owner, repo: &str) -> Result<PathBuf> {
        let dir = self.repo_dir(owner, repo)?;
        if !Self::meta_path(&dir).exists() {
            return Err(not_found(format!("repository {}/{} not found", owner, repo)));
        }
        Ok(dir)
    }

    fn lock(dir: &Path) -> Result<File> {
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(Self::lock_path(dir))
            .map_err(map_io)?;
        lock_file.lock_exclusive().map_err(map_io)?;
        Ok(lock_file)
    }

    fn append_commit(dir: &Path, path: Option<&str>, message: &str) -> Result<String> {
        let line = CommitLogLine {
            sha: Uuid::new_v4().simple().to_string(),
            path: path.map(String::from),
            message: message.to_string(),
            date: Utc::now().to_rfc3339(),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(Self::commits_path(dir))
            .map_err(map_io)?;

        writeln!(file, "{}", serde_json::to_string(&line).map_err(map_json)?).map_err(map_io)?;
        file.sync_data().map_err(map_io)?;

        Ok(line.sha)
    }

    // ========================================================================
    // Repositories
    // ========================================================================

    #[instrument(skip(self))]
    pub fn get_repo(&self, owner: &Owner, repo: &str) -> Result<RepoInfo> {
        let dir = self.existing_repo_dir(owner, repo)?;
        let content = fs::read_to_string(Self::meta_path(&dir)).map_err(map_io)?;
        serde_json::from_str(&content).map_err(map_json)
    }

    #[instrument(skip(self, new), fields(repo = new.name))]
    pub fn create_repo(&self, owner: &Owner, new: NewRepo<'_>) -> Result<RepoInfo> {
        let dir = self.repo_dir(owner, new.name)?;
        fs::create_dir_all(&dir).map_err(map_io)?;
        let lock = Self::lock(&dir)?;

        let meta_path = Self::meta_path(&dir);
        if meta_path.exists() {
            return Err(Error::Protocol(ProtocolError::new(
                422,
                Some("name already exists on this account".to_string()),
            )));
        }

        let info = RepoInfo {
            name: new.name.to_string(),
            full_name: format!("{}/{}", owner, new.name),
            private: new.private,
            description: Some(new.description.to_string()),
            html_url: None,
        };

        let content = serde_json::to_string_pretty(&info).map_err(map_json)?;
        fs::write(&meta_path, content).map_err(map_io)?;

        if new.auto_init {
            Self::append_commit(&dir, None, "Initial commit")?;
        }

        lock.unlock().map_err(map_io)?;
        debug!(full_name = %info.full_name, "Created local repository");
        Ok(info)
    }

    // ========================================================================
    // Files
    // ========================================================================

    #[instrument(skip(self))]
    pub fn read_file(&self, owner: &Owner, repo: &str, path: &str) -> Result<RemoteFile> {
        let dir = self.existing_repo_dir(owner, repo)?;
        let file_path = Self::file_path(&dir, path)?;

        let content = match fs::read(&file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(not_found(format!("{} not found", path)));
            }
            Err(e) => return Err(map_io(e)),
        };

        let version = content_version(&content);
        Ok(RemoteFile { content, version })
    }

    /// Compare-and-swap write of one file.
    ///
    /// The whole check-then-write runs under the repository lock.
    #[instrument(skip(self, content, message, expected))]
    pub fn write_file(
        &self,
        owner: &Owner,
        repo: &str,
        path: &str,
        content: &[u8],
        message: &str,
        expected: Option<&VersionMarker>,
    ) -> Result<VersionMarker> {
        let dir = self.existing_repo_dir(owner, repo)?;
        let file_path = Self::file_path(&dir, path)?;
        let lock = Self::lock(&dir)?;

        let current = match fs::read(&file_path) {
            Ok(existing) => Some(content_version(&existing)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(map_io(e)),
        };

        match (current.as_ref(), expected) {
            (Some(current), Some(expected)) if current != expected => {
                return Err(Error::Protocol(ProtocolError::new(
                    409,
                    Some(format!("{} does not match {}", path, expected)),
                )));
            }
            (Some(_), None) => {
                return Err(Error::Protocol(ProtocolError::new(
                    422,
                    Some("\"sha\" wasn't supplied".to_string()),
                )));
            }
            (None, Some(expected)) => {
                return Err(Error::Protocol(ProtocolError::new(
                    409,
                    Some(format!("{} does not match {}", path, expected)),
                )));
            }
            _ => {}
        }

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let temp_path = file_path.with_extension("tmp");
        fs::write(&temp_path, content).map_err(map_io)?;
        fs::rename(&temp_path, &file_path).map_err(map_io)?;

        let sha = Self::append_commit(&dir, Some(path), message)?;
        lock.unlock().map_err(map_io)?;

        let version = content_version(content);
        debug!(%sha, %version, "Wrote local file");
        Ok(version)
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Commits that touched `path`, newest first. `page` is 1-based.
    #[instrument(skip(self))]
    pub fn list_commits(
        &self,
        owner: &Owner,
        repo: &str,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CommitEntry>> {
        let dir = self.existing_repo_dir(owner, repo)?;

        let file = match File::open(Self::commits_path(&dir)) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(map_io(e)),
        };

        let mut commits = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(map_io)?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<CommitLogLine>(&line) {
                Ok(entry) if entry.path.as_deref() == Some(path) => commits.push(entry),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Skipping malformed commit log line"),
            }
        }

        let skip = (page.max(1) as usize - 1) * per_page as usize;
        Ok(commits
            .into_iter()
            .rev()
            .skip(skip)
            .take(per_page as usize)
            .map(|c| CommitEntry {
                sha: c.sha,
                message: c.message,
                date: c.date,
                url: String::new(),
            })
            .collect())
    }
}
