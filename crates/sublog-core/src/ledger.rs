//! Subscription operations for one owner.
//!
//! Every mutating operation runs the same sequence: ensure the repository
//! exists, read the collection and its version, validate, change the
//! collection in memory, then write it back conditionally. Validation
//! failures are reported before anything is written. A stale version comes
//! back as [`Error::Conflict`] and is never retried here.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::Result;
use crate::error::{Error, ValidationError};
use crate::repo::CommitEntry;
use crate::store::{RecordStore, Snapshot};
use crate::subscription::{
    ChangeKind, NewSubscription, Status, Subscription, SubscriptionPatch, new_subscription_id,
};
use crate::traits::{CommitLog, ContentApi};
use crate::types::Owner;

/// Default page size for commit history.
pub const HISTORY_PAGE_SIZE: u32 = 20;

/// The subscription ledger of a single owner.
#[derive(Debug, Clone)]
pub struct Ledger<C> {
    store: RecordStore<C>,
    owner: Owner,
}

impl<C: ContentApi> Ledger<C> {
    /// Bind a store to an owner.
    pub fn new(store: RecordStore<C>, owner: Owner) -> Self {
        Self { store, owner }
    }

    /// Returns the owner this ledger belongs to.
    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &RecordStore<C> {
        &self.store
    }

    async fn load(&self) -> Result<Snapshot> {
        self.store.ensure_container(&self.owner).await?;
        self.store.read(&self.owner).await
    }

    /// All subscriptions, including cancelled ones.
    #[instrument(skip(self), fields(owner = %self.owner))]
    pub async fn list(&self) -> Result<Vec<Subscription>> {
        Ok(self.load().await?.subscriptions)
    }

    /// Add a subscription. It starts out active.
    #[instrument(skip(self, input), fields(owner = %self.owner, name = %input.name))]
    pub async fn add(&self, input: NewSubscription) -> Result<Subscription> {
        input.validate()?;

        let Snapshot {
            mut subscriptions,
            version,
        } = self.load().await?;

        let id = new_subscription_id(&input.name);
        let created = input.into_subscription(id);
        let message = ChangeKind::Add.message(&created.name);
        subscriptions.push(created.clone());

        self.store
            .write(&self.owner, &subscriptions, &message, version.as_ref())
            .await?;

        info!(id = %created.id, "Added subscription");
        Ok(created)
    }

    /// Apply a partial update to a subscription.
    ///
    /// A status in the patch must be an allowed transition from the current
    /// status (active to paused, or paused to active).
    #[instrument(skip(self, patch), fields(owner = %self.owner))]
    pub async fn update(&self, id: &str, patch: SubscriptionPatch) -> Result<Subscription> {
        patch.validate()?;

        let Snapshot {
            mut subscriptions,
            version,
        } = self.load().await?;

        let index = find(&subscriptions, id)?;
        let current = &subscriptions[index];

        if let Some(next) = patch.status {
            if !current.status.can_transition_to(next) {
                return Err(ValidationError::Transition {
                    from: current.status,
                    to: next,
                }
                .into());
            }
        }

        let updated = current.apply(&patch);
        let kind = ChangeKind::for_update(current.status, updated.status);
        let message = kind.message(&updated.name);
        debug!(%kind, "Applying update");

        subscriptions[index] = updated.clone();

        self.store
            .write(&self.owner, &subscriptions, &message, version.as_ref())
            .await?;

        info!(%id, %kind, "Updated subscription");
        Ok(updated)
    }

    /// Pause an active subscription, optionally until a given time.
    pub async fn pause(&self, id: &str, until: Option<DateTime<Utc>>) -> Result<Subscription> {
        self.update(id, SubscriptionPatch::pause(until)).await
    }

    /// Resume a paused subscription.
    pub async fn resume(&self, id: &str) -> Result<Subscription> {
        self.update(id, SubscriptionPatch::resume()).await
    }

    /// Cancel a subscription.
    ///
    /// The record stays in the collection with status `cancelled`, whatever
    /// its previous status was.
    #[instrument(skip(self), fields(owner = %self.owner))]
    pub async fn cancel(&self, id: &str) -> Result<Subscription> {
        let Snapshot {
            mut subscriptions,
            version,
        } = self.load().await?;

        let index = find(&subscriptions, id)?;
        subscriptions[index].status = Status::Cancelled;
        let cancelled = subscriptions[index].clone();
        let message = ChangeKind::Cancel.message(&cancelled.name);

        self.store
            .write(&self.owner, &subscriptions, &message, version.as_ref())
            .await?;

        info!(%id, "Cancelled subscription");
        Ok(cancelled)
    }
}

impl<C: ContentApi + CommitLog> Ledger<C> {
    /// One page of ledger history, newest first. Never fails.
    pub async fn history(&self, page: u32) -> Vec<CommitEntry> {
        self.store
            .history(&self.owner, page, HISTORY_PAGE_SIZE)
            .await
    }
}

fn find(subscriptions: &[Subscription], id: &str) -> Result<usize> {
    subscriptions
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| Error::NotFound { id: id.to_string() })
}
