//! Error types.
//!
//! Almost every failure mode of checkpoint evaluation is reported as data
//! on the `CheckpointResponse` so automated callers can pattern-match on
//! it. The exceptions below are the only conditions surfaced as `Err`:
//! malformed input, bad configuration, and transport failures from the
//! fire-and-forget event path.

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Error, Debug)]
pub enum DodgeballError {
    /// A required input was absent. Fails fast before any network call and
    /// is never retried.
    #[error("Missing required parameter: {name} with value: {value}")]
    MissingParameter { name: &'static str, value: String },

    #[error("Invalid API URL {url}: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl DodgeballError {
    pub(crate) fn missing(name: &'static str, value: impl Into<String>) -> Self {
        DodgeballError::MissingParameter {
            name,
            value: value.into(),
        }
    }
}
