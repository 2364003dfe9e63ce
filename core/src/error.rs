//! Error types for the todo API client.
//!
//! # Design
//! The server answers validation failures with 400 and a plain-text message
//! such as "Invalid Todo Status"; `Rejected` carries that message so callers
//! can show it as is. 404 gets its own variant. Every other unexpected status
//! lands in `HttpError` with the raw status and body.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned 400 with the given message.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The server returned some other non-200 status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload or query could not be serialized.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
