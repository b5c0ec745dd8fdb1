//! Subscription records and the rules around them.
//!
//! This module defines the persisted record, caller input types, id
//! derivation, and commit-message selection. Reading and writing the
//! collection is done by [`RecordStore`](crate::store::RecordStore).

mod commit_message;
mod currency;
mod id;
mod input;
mod model;
mod validate;

pub use commit_message::ChangeKind;
pub use currency::Currency;
pub use id::{generate_id, new_subscription_id, repair_missing_ids};
pub use input::{NewSubscription, SubscriptionPatch};
pub use model::{Category, Cycle, Status, Subscription};
