//! Caller input for creating and updating subscriptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

use super::model::{Category, Cycle, Status, Subscription};
use super::validate::Issues;
use super::Currency;

/// Input for a new subscription.
///
/// The id, status, and `pausedUntil` are assigned by the ledger and are not
/// accepted from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubscription {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub currency: Currency,
    pub cycle: Cycle,
    pub billing_day: u8,
    #[serde(default)]
    pub billing_month: Option<u8>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl NewSubscription {
    /// Check every field, collecting all failures.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::default();
        issues.name(&self.name);
        issues.price(self.price);
        issues.billing_day(self.billing_day);
        if let Some(month) = self.billing_month {
            issues.billing_month(month);
        }
        issues.finish()
    }

    /// Build the stored record. New records always start active.
    pub fn into_subscription(self, id: String) -> Subscription {
        let billing_month = match self.cycle {
            Cycle::Yearly => self.billing_month,
            Cycle::Monthly => None,
        };

        Subscription {
            id,
            name: self.name,
            price: self.price,
            currency: self.currency,
            cycle: self.cycle,
            billing_day: self.billing_day,
            billing_month,
            status: Status::Active,
            paused_until: None,
            category: self.category,
            extra: Default::default(),
        }
    }
}

/// A partial update to an existing subscription.
///
/// Absent fields are left untouched. `billing_month` and `pausedUntil` are
/// tri-state: absent leaves the field alone, `null` removes it, and a value
/// replaces it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubscriptionPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub cycle: Option<Cycle>,
    #[serde(default)]
    pub billing_day: Option<u8>,
    #[serde(default, deserialize_with = "present")]
    pub billing_month: Option<Option<u8>>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(rename = "pausedUntil", default, deserialize_with = "present")]
    pub paused_until: Option<Option<DateTime<Utc>>>,
}

/// Marks a field as present, so that an explicit `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl SubscriptionPatch {
    /// A patch that pauses a subscription, optionally until a given time.
    pub fn pause(until: Option<DateTime<Utc>>) -> Self {
        Self {
            status: Some(Status::Paused),
            paused_until: until.map(Some),
            ..Default::default()
        }
    }

    /// A patch that resumes a paused subscription.
    pub fn resume() -> Self {
        Self {
            status: Some(Status::Active),
            ..Default::default()
        }
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check every present field, collecting all failures.
    ///
    /// A `cancelled` status is refused here: cancellation has its own
    /// operation and is never reachable through an update.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Issues::default();
        if let Some(name) = &self.name {
            issues.name(name);
        }
        if let Some(price) = self.price {
            issues.price(price);
        }
        if let Some(day) = self.billing_day {
            issues.billing_day(day);
        }
        if let Some(Some(month)) = self.billing_month {
            issues.billing_month(month);
        }
        if self.status == Some(Status::Cancelled) {
            issues.other("status", "must be active or paused");
        }
        issues.finish()
    }
}
