//! Error types for the assertion client.
//!
//! # Design
//! Only call-shape problems, encoding problems and transport failures are
//! errors. A body that fails to decode as JSON is not: it leaves
//! `parsed_data` empty and the assertion phase still runs. Assertion
//! mismatches are reported through the caller's [`Assertions`] value and
//! never show up here.
//!
//! [`Assertions`]: crate::assert::Assertions

use thiserror::Error;

/// Errors returned by `Client` calls.
#[derive(Debug, Error)]
pub enum Error {
    /// The positional arguments did not match any accepted call shape.
    #[error("invalid call shape: {0}")]
    CallShape(String),

    /// An options object could not be read as request or response options.
    #[error("invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// The request body or query string could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The transport failed before a complete response arrived.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failures raised by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be turned into a wire request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Connection, DNS, TLS or socket failure.
    #[error("transport failure: {0}")]
    Io(String),

    /// The blocking worker running the request was cancelled or panicked.
    #[error("transport worker failed: {0}")]
    Join(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
