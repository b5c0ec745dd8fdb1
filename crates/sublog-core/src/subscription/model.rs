//! The subscription record and its enumerations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError, ValidationError};

use super::Currency;
use super::input::SubscriptionPatch;
use super::validate::Issues;

/// Billing cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cycle {
    Monthly,
    Yearly,
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cycle::Monthly => "monthly",
            Cycle::Yearly => "yearly",
        })
    }
}

impl FromStr for Cycle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Cycle::Monthly),
            "yearly" => Ok(Cycle::Yearly),
            _ => Err(InvalidInputError::Other {
                message: format!("unknown cycle '{}'; expected monthly or yearly", s),
            }
            .into()),
        }
    }
}

/// Lifecycle status of a subscription.
///
/// `Cancelled` is terminal: the record stays in the collection as an audit
/// trail and no further transitions are issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Paused,
    Cancelled,
}

impl Status {
    /// Returns true if an update may move a record from `self` to `next`.
    ///
    /// Only active→paused and paused→active are allowed; cancellation has
    /// its own operation.
    pub fn can_transition_to(self, next: Status) -> bool {
        matches!(
            (self, next),
            (Status::Active, Status::Paused) | (Status::Paused, Status::Active)
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Active => "active",
            Status::Paused => "paused",
            Status::Cancelled => "cancelled",
        })
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Status::Active),
            "paused" => Ok(Status::Paused),
            "cancelled" => Ok(Status::Cancelled),
            _ => Err(InvalidInputError::Other {
                message: format!("unknown status '{}'", s),
            }
            .into()),
        }
    }
}

/// Spending category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Entertainment,
    Development,
    Cloud,
    Productivity,
    Music,
    Shopping,
    News,
    #[default]
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 8] = [
        Category::Entertainment,
        Category::Development,
        Category::Cloud,
        Category::Productivity,
        Category::Music,
        Category::Shopping,
        Category::News,
        Category::Other,
    ];

    /// Lowercase tag as stored.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Entertainment => "entertainment",
            Category::Development => "development",
            Category::Cloud => "cloud",
            Category::Productivity => "productivity",
            Category::Music => "music",
            Category::Shopping => "shopping",
            Category::News => "news",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                InvalidInputError::Other {
                    message: format!("unknown category '{}'", s),
                }
                .into()
            })
    }
}

/// One subscription entry in the persisted collection.
///
/// Field names match the stored JSON document, including the camel-cased
/// `pausedUntil`. Keys this type does not know are kept in `extra` and
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Stable identifier. Empty only for legacy records awaiting repair.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    pub name: String,
    #[serde(serialize_with = "whole_as_integer")]
    pub price: f64,
    #[serde(default)]
    pub currency: Currency,
    pub cycle: Cycle,
    pub billing_day: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_month: Option<u8>,
    pub status: Status,
    #[serde(
        rename = "pausedUntil",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub paused_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Writes whole prices as integers (`11900`, not `11900.0`).
fn whole_as_integer<S>(price: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const LIMIT: f64 = 9_007_199_254_740_992.0;
    if price.is_finite() && price.fract() == 0.0 && price.abs() < LIMIT {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

impl Subscription {
    /// Check the record's range constraints.
    ///
    /// The id is not checked here; missing ids are repaired on read.
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

    /// The category, with absent treated as [`Category::Other`].
    pub fn category_or_default(&self) -> Category {
        self.category.unwrap_or_default()
    }

    /// Returns true if the subscription is currently being charged.
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Merge a partial update into a copy of this record.
    ///
    /// Only fields present in the patch are replaced. Resuming (paused to
    /// active) always removes `pausedUntil`, whatever the patch says, and a
    /// monthly cycle never keeps a `billing_month`.
    pub fn apply(&self, patch: &SubscriptionPatch) -> Subscription {
        let mut next = self.clone();

        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(price) = patch.price {
            next.price = price;
        }
        if let Some(currency) = patch.currency {
            next.currency = currency;
        }
        if let Some(cycle) = patch.cycle {
            next.cycle = cycle;
        }
        if let Some(day) = patch.billing_day {
            next.billing_day = day;
        }
        if let Some(month) = patch.billing_month {
            next.billing_month = month;
        }
        if let Some(category) = patch.category {
            next.category = Some(category);
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(until) = patch.paused_until {
            next.paused_until = until;
        }

        if self.status == Status::Paused && next.status == Status::Active {
            next.paused_until = None;
        }
        if next.cycle == Cycle::Monthly {
            next.billing_month = None;
        }

        next
    }
}
