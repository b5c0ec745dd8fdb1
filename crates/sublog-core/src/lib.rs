//! sublog-core - Core types and traits for the sublog subscription ledger.
//!
//! The ledger keeps a user's subscriptions as one JSON document in a
//! repository they own. [`RecordStore`] reads and conditionally writes that
//! document through any [`ContentApi`]; [`Ledger`] layers the add, update,
//! pause, resume, and cancel operations on top.
//!
//! # Example
//!
//! ```no_run
//! use sublog_core::{ContentApi, Ledger, NewSubscription, Owner, RecordStore};
//!
//! # async fn example<C: ContentApi>(api: C) -> Result<(), sublog_core::Error> {
//! let ledger = Ledger::new(RecordStore::new(api), Owner::new("octocat")?);
//!
//! let input: NewSubscription = serde_json::from_str(
//!     r#"{"name": "Spotify", "price": 11900, "currency": "KRW", "cycle": "monthly", "billing_day": 5}"#,
//! ).unwrap();
//! let created = ledger.add(input).await?;
//! ledger.cancel(&created.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ledger;
pub mod rates;
pub mod repo;
pub mod store;
pub mod subscription;
pub mod summary;
pub mod token;
pub mod traits;
pub mod types;

pub use error::Error;
pub use ledger::Ledger;
pub use rates::ExchangeRates;
pub use repo::{CommitEntry, FileUpdate, NewRepo, RemoteFile, RepoInfo};
pub use store::{RecordStore, Snapshot, StoreLayout};
pub use subscription::{
    Category, ChangeKind, Currency, Cycle, NewSubscription, Status, Subscription,
    SubscriptionPatch,
};
pub use token::AccessToken;
pub use traits::{CommitLog, ContentApi, RateSource};
pub use types::{ApiUrl, Owner, VersionMarker};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
