//! Mapping of HTTP client errors into sublog errors.

use sublog_core::Error;
use sublog_core::error::TransportError;

/// Convert a reqwest error into a transport error.
pub fn map_reqwest(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}
