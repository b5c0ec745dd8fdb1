//! Content API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// The public GitHub REST API.
pub const GITHUB_API: &str = "https://api.github.com";

/// A validated base URL for the repository content API.
///
/// This type supports both network URLs (HTTPS/HTTP) and local filesystem
/// URLs (`file://`).
///
/// # Network URLs
///
/// Network URLs must use HTTPS (or HTTP for localhost) and point at a
/// GitHub-compatible REST API, e.g. `https://api.github.com` or an
/// enterprise `https://git.example.com/api/v3`.
///
/// # File URLs
///
/// File URLs (`file:///path/to/ledger`) keep repositories on the local
/// filesystem for offline use and testing.
///
/// # Example
///
/// ```
/// use sublog_core::ApiUrl;
///
/// let api = ApiUrl::new("https://api.github.com").unwrap();
/// assert_eq!(api.endpoint("/repos/octocat/subscription-ledger"),
///            "https://api.github.com/repos/octocat/subscription-ledger");
///
/// let local = ApiUrl::new("file:///tmp/ledger").unwrap();
/// assert!(local.is_local());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Create a new API URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::ApiUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        Ok(Self(url))
    }

    /// The public GitHub API.
    pub fn github() -> Self {
        Self(Url::parse(GITHUB_API).expect("GITHUB_API is a valid URL"))
    }

    /// Returns the URL for an API path such as `/repos/{owner}/{repo}`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns true if this is a local filesystem API (file:// URL).
    pub fn is_local(&self) -> bool {
        self.0.scheme() == "file"
    }

    /// Returns true if this is a network API (http:// or https:// URL).
    pub fn is_network(&self) -> bool {
        let scheme = self.0.scheme();
        scheme == "http" || scheme == "https"
    }

    /// Returns the filesystem path for file:// URLs.
    ///
    /// Returns `None` for non-file URLs.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.is_local() {
            self.0.to_file_path().ok()
        } else {
            None
        }
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let invalid = |reason: &str| -> Error {
            InvalidInputError::ApiUrl {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if url.cannot_be_a_base() {
            return Err(invalid("must be an absolute URL"));
        }

        let scheme = url.scheme();

        if scheme == "file" {
            if url.path().is_empty() {
                return Err(invalid("file:// URL must have a path"));
            }
            return Ok(());
        }

        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(invalid("must use HTTPS (HTTP allowed only for localhost)"));
        }

        if url.host_str().is_none() {
            return Err(invalid("must have a host"));
        }

        Ok(())
    }
}

impl Default for ApiUrl {
    fn default() -> Self {
        Self::github()
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for ApiUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let api = ApiUrl::new("https://api.github.com").unwrap();
        assert_eq!(api.host(), Some("api.github.com"));
        assert!(api.is_network());
    }

    #[test]
    fn valid_localhost_http() {
        let api = ApiUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(api.host(), Some("127.0.0.1"));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let api = ApiUrl::new("https://api.github.com/").unwrap();
        assert_eq!(api.endpoint("/user"), "https://api.github.com/user");
        assert_eq!(api.endpoint("user"), "https://api.github.com/user");
    }

    #[test]
    fn endpoint_keeps_enterprise_prefix() {
        let api = ApiUrl::new("https://git.example.com/api/v3").unwrap();
        assert_eq!(
            api.endpoint("/repos/octocat/ledger"),
            "https://git.example.com/api/v3/repos/octocat/ledger"
        );
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(ApiUrl::new("http://api.github.com").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(ApiUrl::new("/repos/octocat").is_err());
    }

    #[test]
    fn default_is_public_github() {
        assert_eq!(ApiUrl::default().endpoint("/user"), "https://api.github.com/user");
    }

    #[test]
    fn file_url_to_path() {
        #[cfg(unix)]
        {
            let api = ApiUrl::new("file:///tmp/ledger").unwrap();
            assert!(api.is_local());
            assert!(!api.is_network());
            assert_eq!(
                api.to_file_path().unwrap(),
                std::path::PathBuf::from("/tmp/ledger")
            );
        }
    }

    #[test]
    fn network_url_has_no_file_path() {
        let api = ApiUrl::new("https://api.github.com").unwrap();
        assert!(api.to_file_path().is_none());
    }
}
