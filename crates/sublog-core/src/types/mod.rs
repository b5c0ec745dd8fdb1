//! Validated identifier types.
//!
//! These types enforce their invariants at construction time,
//! ensuring invalid states are unrepresentable.

mod api_url;
mod owner;
mod version;

pub use api_url::{ApiUrl, GITHUB_API};
pub use owner::Owner;
pub use version::VersionMarker;
