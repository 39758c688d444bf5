//! Error types for the autocomplete widget.
//!
//! Almost nothing in the widget can fail from the caller's point of view:
//! source failures degrade to "no suggestions" and vetoes are ordinary
//! control flow. The errors here cover construction and explicit misuse.

use thiserror::Error;

/// Errors returned by the autocomplete widget API.
#[derive(Error, Debug)]
pub enum AutocompleteError {
    /// The remote endpoint could not be parsed as a URL.
    #[error("invalid remote endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// A remote source was requested outside of a tokio runtime.
    #[error("remote sources need a running tokio runtime")]
    NoRuntime,

    /// A remote source was requested but the `remote` feature is disabled.
    #[error("remote sources require the `remote` feature")]
    RemoteDisabled,

    /// Options could not be deserialized.
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),

    /// A selection was committed while no candidate was active.
    #[error("no active candidate to select")]
    NoActiveCandidate,
}

/// Reasons a remote source failed to produce candidates.
///
/// These never reach the widget's caller: the source logs them and delivers
/// an empty candidate sequence instead.
#[cfg(feature = "remote")]
#[derive(Error, Debug)]
pub enum SourceError {
    /// The request could not be sent or the body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The body was not a JSON array of suggestions.
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for autocomplete operations.
pub type Result<T> = std::result::Result<T, AutocompleteError>;
