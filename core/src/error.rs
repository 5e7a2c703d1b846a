//! Error types for the posts API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging. `Transport` covers everything that
//! prevented a response from arriving at all.

use thiserror::Error;

/// Errors returned by `PostApi` parse methods, transports and `PostClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// No response: connection refused, malformed URL, unreadable body.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The post was rejected before any request was made.
    #[error("invalid post: {0}")]
    InvalidPost(&'static str),

    #[error("post is missing required field `{0}`")]
    MissingField(&'static str),
}
