//! Version marker type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque token identifying one exact state of the backing file.
///
/// Supplied back to the remote on write so the write is rejected if the
/// file has changed since it was read.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionMarker(String);

impl VersionMarker {
    /// Wrap a version string returned by the remote.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the marker as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
