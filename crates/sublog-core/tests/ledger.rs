//! Ledger and record store tests against an in-memory content API.
//!
//! The in-memory API enforces the same conditional-write rules as the real
//! remote: a stale version marker is rejected with 409, and a write without
//! a marker to an existing file is rejected with 422.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;

use sublog_core::error::{Error, ProtocolError, ValidationError};
use sublog_core::{
    CommitEntry, CommitLog, ContentApi, FileUpdate, Ledger, NewRepo, NewSubscription, Owner,
    RecordStore, RemoteFile, RepoInfo, Result, Status, SubscriptionPatch, VersionMarker,
};

#[derive(Default)]
struct MemoryApi {
    files: Mutex<HashMap<String, (Vec<u8>, u64)>>,
    repos: Mutex<HashSet<String>>,
    commits: Mutex<Vec<CommitEntry>>,
    calls: AtomicUsize,
    fail_repo_lookup: bool,
    fail_commits: bool,
}

impl MemoryApi {
    fn key(owner: &Owner, repo: &str, path: &str) -> String {
        format!("{}/{}/{}", owner, repo, path)
    }

    fn seed(&self, owner: &Owner, value: serde_json::Value) {
        let key = Self::key(owner, "subscription-ledger", "subscriptions.json");
        let content = serde_json::to_vec(&value).unwrap();
        self.files.lock().unwrap().insert(key, (content, 1));
    }

    fn stored(&self, owner: &Owner) -> serde_json::Value {
        let key = Self::key(owner, "subscription-ledger", "subscriptions.json");
        let files = self.files.lock().unwrap();
        serde_json::from_slice(&files[&key].0).unwrap()
    }

    fn messages(&self) -> Vec<String> {
        self.commits
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.message.clone())
            .collect()
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentApi for MemoryApi {
    async fn get_file(&self, owner: &Owner, repo: &str, path: &str) -> Result<RemoteFile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let files = self.files.lock().unwrap();
        match files.get(&Self::key(owner, repo, path)) {
            Some((content, version)) => Ok(RemoteFile {
                content: content.clone(),
                version: VersionMarker::new(format!("v{}", version)),
            }),
            None => Err(ProtocolError::new(404, Some("Not Found".into())).into()),
        }
    }

    async fn put_file(
        &self,
        owner: &Owner,
        repo: &str,
        path: &str,
        update: FileUpdate<'_>,
    ) -> Result<VersionMarker> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut files = self.files.lock().unwrap();
        let key = Self::key(owner, repo, path);
        let current = files.get(&key).map(|(_, v)| *v);

        match (current, update.version) {
            (Some(v), Some(expected)) if expected.as_str() != format!("v{}", v) => {
                return Err(ProtocolError::new(409, Some("sha mismatch".into())).into());
            }
            (Some(_), None) => {
                return Err(ProtocolError::new(422, Some("sha wasn't supplied".into())).into());
            }
            (None, Some(_)) => {
                return Err(ProtocolError::new(409, Some("file gone".into())).into());
            }
            _ => {}
        }

        let next = current.unwrap_or(0) + 1;
        files.insert(key, (update.content.to_vec(), next));
        self.commits.lock().unwrap().insert(
            0,
            CommitEntry {
                sha: format!("c{}", next),
                message: update.message.to_string(),
                date: String::new(),
                url: String::new(),
            },
        );
        Ok(VersionMarker::new(format!("v{}", next)))
    }

    async fn get_repo(&self, owner: &Owner, repo: &str) -> Result<RepoInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_repo_lookup {
            return Err(ProtocolError::new(500, Some("boom".into())).into());
        }
        let name = format!("{}/{}", owner, repo);
        if self.repos.lock().unwrap().contains(&name) {
            Ok(repo_info(&name, repo))
        } else {
            Err(ProtocolError::new(404, None).into())
        }
    }

    async fn create_repo(&self, owner: &Owner, repo: NewRepo<'_>) -> Result<RepoInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(repo.private);
        assert!(repo.auto_init);
        let name = format!("{}/{}", owner, repo.name);
        self.repos.lock().unwrap().insert(name.clone());
        Ok(repo_info(&name, repo.name))
    }
}

#[async_trait]
impl CommitLog for MemoryApi {
    async fn list_commits(
        &self,
        _owner: &Owner,
        _repo: &str,
        _path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CommitEntry>> {
        if self.fail_commits {
            return Err(ProtocolError::new(403, Some("rate limited".into())).into());
        }
        let commits = self.commits.lock().unwrap();
        let start = ((page - 1) * per_page) as usize;
        Ok(commits.iter().skip(start).take(per_page as usize).cloned().collect())
    }
}

fn repo_info(full_name: &str, name: &str) -> RepoInfo {
    RepoInfo {
        name: name.to_string(),
        full_name: full_name.to_string(),
        private: true,
        description: None,
        html_url: None,
    }
}

fn owner() -> Owner {
    Owner::new("octocat").unwrap()
}

fn ledger(api: MemoryApi) -> Ledger<MemoryApi> {
    Ledger::new(RecordStore::new(api), owner())
}

fn spotify() -> NewSubscription {
    serde_json::from_value(json!({
        "name": "Spotify",
        "price": 11900,
        "currency": "KRW",
        "cycle": "monthly",
        "billing_day": 5
    }))
    .unwrap()
}

#[tokio::test]
async fn list_on_fresh_owner_creates_repo_and_is_empty() {
    let ledger = ledger(MemoryApi::default());
    assert!(ledger.list().await.unwrap().is_empty());
    assert!(
        ledger
            .store()
            .api()
            .repos
            .lock()
            .unwrap()
            .contains("octocat/subscription-ledger")
    );
}

#[tokio::test]
async fn add_creates_active_record_with_feat_message() {
    let ledger = ledger(MemoryApi::default());
    let created = ledger.add(spotify()).await.unwrap();

    assert_eq!(created.id, "spotify");
    assert_eq!(created.status, Status::Active);

    let api = ledger.store().api();
    assert_eq!(api.messages(), vec!["feat: add Spotify subscription"]);
    assert_eq!(api.stored(&owner())[0]["status"], "active");
    assert_eq!(api.stored(&owner())[0]["billing_day"], 5);
}

#[tokio::test]
async fn cancel_retains_record() {
    let ledger = ledger(MemoryApi::default());
    let created = ledger.add(spotify()).await.unwrap();
    let cancelled = ledger.cancel(&created.id).await.unwrap();

    assert_eq!(cancelled.status, Status::Cancelled);

    let all = ledger.list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, Status::Cancelled);
    assert_eq!(
        ledger.store().api().messages()[0],
        "chore: cancel Spotify subscription"
    );
}

#[tokio::test]
async fn cancel_from_paused_is_allowed() {
    let ledger = ledger(MemoryApi::default());
    let created = ledger.add(spotify()).await.unwrap();
    ledger.pause(&created.id, None).await.unwrap();
    let cancelled = ledger.cancel(&created.id).await.unwrap();
    assert_eq!(cancelled.status, Status::Cancelled);
}

#[tokio::test]
async fn pause_then_resume_clears_paused_until() {
    let ledger = ledger(MemoryApi::default());
    let created = ledger.add(spotify()).await.unwrap();

    let until = Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap();
    let paused = ledger.pause(&created.id, Some(until)).await.unwrap();
    assert_eq!(paused.status, Status::Paused);
    assert_eq!(paused.paused_until, Some(until));

    let resumed = ledger.resume(&created.id).await.unwrap();
    assert_eq!(resumed.status, Status::Active);
    assert!(resumed.paused_until.is_none());

    let api = ledger.store().api();
    assert!(api.stored(&owner())[0].get("pausedUntil").is_none());
    assert_eq!(
        api.messages(),
        vec![
            "chore: resume Spotify subscription",
            "chore: pause Spotify subscription",
            "feat: add Spotify subscription",
        ]
    );
}

#[tokio::test]
async fn disallowed_transitions_are_rejected_before_write() {
    let ledger = ledger(MemoryApi::default());
    let created = ledger.add(spotify()).await.unwrap();
    let commits_before = ledger.store().api().messages().len();

    let err = ledger
        .update(&created.id, SubscriptionPatch::resume())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::Transition {
            from: Status::Active,
            to: Status::Active
        })
    ));

    ledger.pause(&created.id, None).await.unwrap();
    let err = ledger.pause(&created.id, None).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::Transition {
            from: Status::Paused,
            to: Status::Paused
        })
    ));

    let cancel_patch = SubscriptionPatch {
        status: Some(Status::Cancelled),
        ..Default::default()
    };
    let err = ledger.update(&created.id, cancel_patch).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::Fields(_))));

    assert_eq!(ledger.store().api().messages().len(), commits_before + 1);
}

#[tokio::test]
async fn cancelled_record_cannot_be_resumed() {
    let ledger = ledger(MemoryApi::default());
    let created = ledger.add(spotify()).await.unwrap();
    ledger.cancel(&created.id).await.unwrap();

    let err = ledger.resume(&created.id).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::Transition {
            from: Status::Cancelled,
            ..
        })
    ));
}

#[tokio::test]
async fn generic_update_uses_update_message() {
    let ledger = ledger(MemoryApi::default());
    let created = ledger.add(spotify()).await.unwrap();

    let patch: SubscriptionPatch = serde_json::from_value(json!({ "price": 13900 })).unwrap();
    let updated = ledger.update(&created.id, patch).await.unwrap();

    assert_eq!(updated.price, 13900.0);
    assert_eq!(updated.id, "spotify");
    assert_eq!(
        ledger.store().api().messages()[0],
        "chore: update Spotify subscription"
    );
}

#[tokio::test]
async fn update_keeps_keys_written_by_other_clients() {
    let api = MemoryApi::default();
    let owner = owner();
    api.seed(
        &owner,
        json!([{
            "id": "spotify",
            "name": "Spotify",
            "price": 11900,
            "currency": "KRW",
            "cycle": "monthly",
            "billing_day": 5,
            "status": "active",
            "memo": "family plan"
        }]),
    );
    let ledger = ledger(api);

    ledger.pause("spotify", None).await.unwrap();

    let stored = ledger.store().api().stored(&owner);
    assert_eq!(stored[0]["memo"], "family plan");
    assert_eq!(stored[0]["status"], "paused");
    assert!(stored[0]["price"].is_u64());
}

#[tokio::test]
async fn invalid_input_makes_no_remote_calls() {
    let ledger = ledger(MemoryApi::default());
    let mut input = spotify();
    input.price = -1.0;

    let err = ledger.add(input).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(ledger.store().api().calls(), 0);

    let patch = SubscriptionPatch {
        billing_day: Some(0),
        ..Default::default()
    };
    assert!(ledger.update("spotify", patch).await.is_err());
    assert_eq!(ledger.store().api().calls(), 0);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let ledger = ledger(MemoryApi::default());
    let err = ledger.cancel("missing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { ref id } if id == "missing"));
}

#[tokio::test]
async fn stale_version_is_a_conflict() {
    let store = RecordStore::new(MemoryApi::default());
    let owner = owner();
    store.ensure_container(&owner).await.unwrap();
    store.write(&owner, &[], "init", None).await.unwrap();

    let snapshot = store.read(&owner).await.unwrap();
    let stale = snapshot.version.clone();

    store
        .write(&owner, &[], "first", stale.as_ref())
        .await
        .unwrap();
    let err = store
        .write(&owner, &[], "second", stale.as_ref())
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(store.api().messages(), vec!["first", "init"]);
}

#[tokio::test]
async fn creating_over_existing_file_is_a_conflict() {
    let store = RecordStore::new(MemoryApi::default());
    let owner = owner();
    store.write(&owner, &[], "one", None).await.unwrap();
    let err = store.write(&owner, &[], "two", None).await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn read_repairs_ids_and_drops_malformed_records() {
    let api = MemoryApi::default();
    let owner = owner();
    api.seed(
        &owner,
        json!([
            { "name": "Netflix", "price": 17000, "cycle": "monthly", "billing_day": 12, "status": "active" },
            { "id": "", "name": "Netflix", "price": 17000, "cycle": "monthly", "billing_day": 12, "status": "active" },
            { "id": "bad", "name": "Bad", "price": -3, "cycle": "monthly", "billing_day": 12, "status": "active" },
            { "id": "bad2", "name": "Bad", "price": 3, "cycle": "daily", "billing_day": 12, "status": "active" },
            { "id": "netflix", "name": "Netflix", "price": 17000, "currency": "KRW", "cycle": "monthly", "billing_day": 12, "status": "active" }
        ]),
    );
    let store = RecordStore::new(api);

    let first = store.read(&owner).await.unwrap();
    let ids: Vec<_> = first.subscriptions.iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec!["netflix-2", "netflix-3", "netflix"]);

    let second = store.read(&owner).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn write_then_read_round_trips() {
    let ledger = ledger(MemoryApi::default());
    ledger.add(spotify()).await.unwrap();
    let mut yearly = spotify();
    yearly.name = "Domain".into();
    yearly.cycle = sublog_core::Cycle::Yearly;
    yearly.billing_month = Some(3);
    ledger.add(yearly).await.unwrap();

    let written = ledger.list().await.unwrap();
    let snapshot = ledger.store().read(ledger.owner()).await.unwrap();
    assert_eq!(snapshot.subscriptions, written);
    assert_eq!(written[1].billing_month, Some(3));
}

#[tokio::test]
async fn repo_lookup_failure_is_fatal() {
    let api = MemoryApi {
        fail_repo_lookup: true,
        ..Default::default()
    };
    let ledger = ledger(api);
    let err = ledger.list().await.unwrap_err();
    assert!(matches!(err, Error::Protocol(ref e) if e.status == 500));
}

#[tokio::test]
async fn history_lists_newest_first() {
    let ledger = ledger(MemoryApi::default());
    let created = ledger.add(spotify()).await.unwrap();
    ledger.cancel(&created.id).await.unwrap();

    let history = ledger.history(1).await;
    let messages: Vec<_> = history.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["chore: cancel Spotify subscription", "feat: add Spotify subscription"]
    );
}

#[tokio::test]
async fn history_failure_degrades_to_empty() {
    let api = MemoryApi {
        fail_commits: true,
        ..Default::default()
    };
    let ledger = ledger(api);
    assert!(ledger.history(1).await.is_empty());
}
