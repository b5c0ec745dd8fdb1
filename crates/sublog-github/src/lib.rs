//! sublog-github - GitHub REST backend for the sublog ledger.
//!
//! [`GithubContent`] implements [`ContentApi`](sublog_core::ContentApi) and
//! [`CommitLog`](sublog_core::CommitLog) against the GitHub contents, repos,
//! and commits endpoints. [`ExchangeRateClient`] implements
//! [`RateSource`](sublog_core::RateSource) against a public rates endpoint.

mod client;
mod content;
mod endpoints;
mod error;
mod rates;

pub use client::GithubClient;
pub use content::GithubContent;
pub use endpoints::AuthenticatedUser;
pub use error::map_reqwest;
pub use rates::{ExchangeRateClient, DEFAULT_RATES_URL, RATES_TTL};
