//! Error types for the Files / Media Vault client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Http` with the raw status
//! code and body for debugging. Transport failures never reach this enum —
//! they stay with the host HTTP client that executed the request.

use thiserror::Error;

/// Errors returned by `FilesClient` / `MediaVaultClient` methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 — the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A hypermedia-driven operation needed a link the resource does not
    /// carry (or carries with an empty href).
    #[error("resource has no '{rel}' link")]
    MissingLink { rel: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}
