//! Error types for sublog.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, remote protocol, conflict, and validation
//! failures. Callers match on [`Error::Conflict`] to offer a "refresh and
//! retry" path; every other remote failure is surfaced as-is.

use std::fmt;

use thiserror::Error;

use crate::subscription::Status;

/// The unified error type for sublog operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout, IO).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (missing or rejected token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Errors reported by the remote content API.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The backing file changed since it was read.
    #[error("conflict: {path} was modified since it was read; refresh and try again")]
    Conflict { path: String },

    /// No subscription with the given id exists in the collection.
    #[error("subscription not found: {id}")]
    NotFound { id: String },

    /// Subscription input failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Malformed identifiers, URLs, or documents.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if this is a write conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Returns true if the remote reported that the addressed resource is absent.
    pub fn is_remote_not_found(&self) -> bool {
        matches!(self, Error::Protocol(e) if e.is_not_found())
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Local filesystem error.
    #[error("IO error: {message}")]
    Io { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token was supplied.
    #[error("missing access token")]
    MissingToken,

    /// The remote rejected the token.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}

/// Errors reported by the remote API.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code (or its filesystem-backend equivalent).
    pub status: u16,
    /// Message from the remote, if any.
    pub message: Option<String>,
    /// Documentation link from the remote, if any.
    pub documentation_url: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self {
            status,
            message,
            documentation_url: None,
        }
    }

    /// Attach a documentation link.
    pub fn with_documentation_url(mut self, url: Option<String>) -> Self {
        self.documentation_url = url;
        self
    }

    /// The addressed repository or file does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// The supplied version marker no longer matches the file.
    pub fn is_conflict(&self) -> bool {
        self.status == 409
    }

    /// The remote refused the request as unprocessable.
    pub fn is_unprocessable(&self) -> bool {
        self.status == 422
    }
}

/// One failing field in a validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Field name as it appears in the stored JSON.
    pub field: &'static str,
    /// Human-readable constraint that failed.
    pub reason: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Subscription input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more fields violate their constraints.
    #[error("{}", join_issues(.0))]
    Fields(Vec<FieldIssue>),

    /// The requested status change is not an allowed transition.
    #[error("cannot transition from {from} to {to}")]
    Transition { from: Status, to: Status },
}

impl ValidationError {
    /// Returns the failing fields, if this is a field error.
    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            ValidationError::Fields(issues) => issues,
            ValidationError::Transition { .. } => &[],
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid owner login.
    #[error("invalid owner '{value}': {reason}")]
    Owner { value: String, reason: String },

    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// The backing document could not be decoded.
    #[error("invalid document at {path}: {reason}")]
    Document { path: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
