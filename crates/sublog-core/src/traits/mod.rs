//! Collaborator traits for remote storage and exchange rates.

mod commits;
mod content;
mod rates;

pub use commits::CommitLog;
pub use content::ContentApi;
pub use rates::RateSource;
