//! The GitHub-file-backed record store.
//!
//! The whole subscription collection lives in one JSON document in a
//! per-owner repository. Reads return the parsed collection together with
//! the file's version marker; writes replace the entire document and pass
//! the marker back so the remote rejects the write if anyone else wrote in
//! between. There is no in-process locking and no caching: every call
//! round-trips to the remote.

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::error::{Error, InvalidInputError};
use crate::repo::{CommitEntry, FileUpdate, NewRepo, RepoInfo};
use crate::subscription::{Subscription, repair_missing_ids};
use crate::traits::{CommitLog, ContentApi};
use crate::types::{Owner, VersionMarker};

/// Default repository name holding the ledger.
pub const DEFAULT_REPO: &str = "subscription-ledger";

/// Default path of the ledger document inside the repository.
pub const DEFAULT_PATH: &str = "subscriptions.json";

/// Default description for auto-created repositories.
pub const DEFAULT_DESCRIPTION: &str = "Subscription ledger - managed by subscription-ledger app";

/// Where the ledger lives in each owner's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    /// Repository name.
    pub repo: String,
    /// File path inside the repository.
    pub path: String,
    /// Description used when the repository is created.
    pub description: String,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            repo: DEFAULT_REPO.to_string(),
            path: DEFAULT_PATH.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl StoreLayout {
    /// The default layout with a different repository name.
    pub fn with_repo(repo: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            ..Self::default()
        }
    }
}

/// The store's view of the backing file.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Validated records, in document order.
    pub subscriptions: Vec<Subscription>,

    /// Version of the file read, `None` if the file does not exist yet.
    pub version: Option<VersionMarker>,
}

impl Snapshot {
    /// The state of an owner with no ledger file.
    pub fn empty() -> Self {
        Self {
            subscriptions: Vec::new(),
            version: None,
        }
    }
}

/// Reads and writes the subscription collection through a [`ContentApi`].
#[derive(Debug, Clone)]
pub struct RecordStore<C> {
    api: C,
    layout: StoreLayout,
}

impl<C: ContentApi> RecordStore<C> {
    /// Create a store with the default layout.
    pub fn new(api: C) -> Self {
        Self::with_layout(api, StoreLayout::default())
    }

    /// Create a store with a custom layout.
    pub fn with_layout(api: C, layout: StoreLayout) -> Self {
        Self { api, layout }
    }

    /// Returns the layout in use.
    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Returns the underlying content API.
    pub fn api(&self) -> &C {
        &self.api
    }

    /// Get the owner's ledger repository, creating it if absent.
    ///
    /// Created repositories are private, auto-initialized, and carry the
    /// layout's description. Any lookup failure other than "not found" is
    /// returned unchanged.
    #[instrument(skip(self), fields(%owner, repo = %self.layout.repo))]
    pub async fn ensure_container(&self, owner: &Owner) -> Result<RepoInfo> {
        match self.api.get_repo(owner, &self.layout.repo).await {
            Ok(info) => Ok(info),
            Err(e) if e.is_remote_not_found() => {
                info!("Ledger repository missing, creating it");
                self.api
                    .create_repo(
                        owner,
                        NewRepo {
                            name: &self.layout.repo,
                            private: true,
                            auto_init: true,
                            description: &self.layout.description,
                        },
                    )
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// Read the collection.
    ///
    /// A missing file is an empty collection with no version. Elements that
    /// fail the record schema are dropped with a warning. Records without an
    /// id get one derived from their name; that repair is not written back.
    #[instrument(skip(self), fields(%owner, repo = %self.layout.repo, path = %self.layout.path))]
    pub async fn read(&self, owner: &Owner) -> Result<Snapshot> {
        let file = match self
            .api
            .get_file(owner, &self.layout.repo, &self.layout.path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.is_remote_not_found() => {
                debug!("Ledger file missing, returning empty collection");
                return Ok(Snapshot::empty());
            }
            Err(e) => return Err(e),
        };

        let mut subscriptions = parse_collection(&self.layout.path, &file.content)?;

        let repaired = repair_missing_ids(&mut subscriptions);
        if repaired > 0 {
            debug!(repaired, "Assigned ids to legacy records");
        }

        debug!(count = subscriptions.len(), version = %file.version, "Read ledger");

        Ok(Snapshot {
            subscriptions,
            version: Some(file.version),
        })
    }

    /// Replace the whole collection.
    ///
    /// `version` must be the marker from the most recent read. If the file
    /// changed since then the write is rejected with [`Error::Conflict`];
    /// nothing is retried.
    #[instrument(skip(self, subscriptions, message, version), fields(%owner, repo = %self.layout.repo, path = %self.layout.path))]
    pub async fn write(
        &self,
        owner: &Owner,
        subscriptions: &[Subscription],
        message: &str,
        version: Option<&VersionMarker>,
    ) -> Result<VersionMarker> {
        let content = serde_json::to_string_pretty(subscriptions).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: format!("failed to serialize ledger: {}", e),
            })
        })?;

        debug!(count = subscriptions.len(), commit_message = message, "Writing ledger");

        let update = FileUpdate {
            content: content.as_bytes(),
            message,
            version,
        };

        match self
            .api
            .put_file(owner, &self.layout.repo, &self.layout.path, update)
            .await
        {
            Ok(version) => Ok(version),
            Err(Error::Protocol(e))
                if e.is_conflict() || (version.is_none() && e.is_unprocessable()) =>
            {
                warn!(status = e.status, "Ledger changed since it was read");
                Err(Error::Conflict {
                    path: self.layout.path.clone(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

impl<C: ContentApi + CommitLog> RecordStore<C> {
    /// List commits that touched the ledger file, newest first.
    ///
    /// Best-effort: any failure yields an empty list.
    #[instrument(skip(self), fields(%owner, repo = %self.layout.repo))]
    pub async fn history(&self, owner: &Owner, page: u32, per_page: u32) -> Vec<CommitEntry> {
        match self
            .api
            .list_commits(owner, &self.layout.repo, &self.layout.path, page.max(1), per_page)
            .await
        {
            Ok(commits) => commits,
            Err(e) => {
                warn!(error = %e, "Failed to list ledger history");
                Vec::new()
            }
        }
    }
}

/// Parse the stored document, keeping only elements that pass the schema.
fn parse_collection(path: &str, content: &[u8]) -> Result<Vec<Subscription>> {
    let invalid = |reason: String| -> Error {
        InvalidInputError::Document {
            path: path.to_string(),
            reason,
        }
        .into()
    };

    let document: Value = serde_json::from_slice(content).map_err(|e| invalid(e.to_string()))?;
    let Value::Array(elements) = document else {
        return Err(invalid("expected a JSON array of subscriptions".to_string()));
    };

    let subscriptions = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| {
            let sub = match serde_json::from_value::<Subscription>(element) {
                Ok(sub) => sub,
                Err(e) => {
                    warn!(index, error = %e, "Dropping malformed ledger record");
                    return None;
                }
            };
            match sub.validate() {
                Ok(()) => Some(sub),
                Err(e) => {
                    warn!(index, error = %e, "Dropping invalid ledger record");
                    None
                }
            }
        })
        .collect();

    Ok(subscriptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::Status;

    #[test]
    fn parse_drops_invalid_elements() {
        let doc = br#"[
            {"id": "ok", "name": "Ok", "price": 1000, "cycle": "monthly", "billing_day": 1, "status": "active"},
            {"id": "neg", "name": "Neg", "price": -5, "cycle": "monthly", "billing_day": 1, "status": "active"},
            {"id": "day", "name": "Day", "price": 5, "cycle": "monthly", "billing_day": 40, "status": "active"},
            {"id": "cyc", "name": "Cyc", "price": 5, "cycle": "weekly", "billing_day": 1, "status": "active"},
            {"id": "stat", "name": "Stat", "price": 5, "cycle": "monthly", "billing_day": 1, "status": "gone"},
            "not an object",
            42
        ]"#;
        let subs = parse_collection(DEFAULT_PATH, doc).unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].id, "ok");
        assert_eq!(subs[0].status, Status::Active);
    }

    #[test]
    fn parse_rejects_non_array_document() {
        let err = parse_collection(DEFAULT_PATH, br#"{"subscriptions": []}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(InvalidInputError::Document { .. })));

        let err = parse_collection(DEFAULT_PATH, b"not json").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(InvalidInputError::Document { .. })));
    }

    #[test]
    fn parse_accepts_empty_array() {
        assert!(parse_collection(DEFAULT_PATH, b"[]").unwrap().is_empty());
    }

    #[test]
    fn default_layout() {
        let layout = StoreLayout::default();
        assert_eq!(layout.repo, "subscription-ledger");
        assert_eq!(layout.path, "subscriptions.json");

        let custom = StoreLayout::with_repo("my-ledger");
        assert_eq!(custom.repo, "my-ledger");
        assert_eq!(custom.path, "subscriptions.json");
    }
}
