//! Repository owner type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

const MAX_OWNER_LEN: usize = 39;

/// A validated repository owner login.
///
/// Owner logins consist of ASCII letters, digits, and single hyphens, may
/// not begin or end with a hyphen, and are at most 39 characters long.
///
/// # Example
///
/// ```
/// use sublog_core::Owner;
///
/// let owner = Owner::new("octo-cat").unwrap();
/// assert_eq!(owner.as_str(), "octo-cat");
/// assert!(Owner::new("-octocat").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Owner(String);

impl Owner {
    /// Create a new owner from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid owner login.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the login as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let invalid = |reason: &str| -> Error {
            InvalidInputError::Owner {
                value: s.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if s.is_empty() {
            return Err(invalid("must not be empty"));
        }

        if s.len() > MAX_OWNER_LEN {
            return Err(invalid("must be at most 39 characters"));
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid("may only contain ASCII letters, digits, and hyphens"));
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(invalid("must not begin or end with a hyphen"));
        }

        if s.contains("--") {
            return Err(invalid("must not contain consecutive hyphens"));
        }

        Ok(())
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Owner {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Owner {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Owner> for String {
    fn from(owner: Owner) -> Self {
        owner.0
    }
}

impl AsRef<str> for Owner {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
