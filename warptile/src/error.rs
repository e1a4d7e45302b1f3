//! Error types for tile fetching.
//!
//! Every failure on the fetch path is surfaced to the caller unchanged:
//! nothing is retried and nothing is cached when an error occurs.

use thiserror::Error;

/// Errors that can occur while configuring or using a [`TileFetcher`].
///
/// The type is `Clone` so that a single failure can be broadcast to every
/// caller waiting on a coalesced request.
///
/// [`TileFetcher`]: crate::fetcher::TileFetcher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// Invalid or missing configuration, raised at construction time
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The endpoint answered with a non-success HTTP status
    #[error("HTTP {status} {status_text} from {url}")]
    Fetch {
        status: u16,
        status_text: String,
        url: String,
    },

    /// The request never produced a response (connect, TLS, body read)
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The response body could not be decoded as an image
    #[error("image decode failed: {0}")]
    Decode(String),

    /// Internal failure (decode task panicked, coalesced leader dropped)
    #[error("internal error: {0}")]
    Internal(String),
}

impl TileError {
    /// Returns the HTTP status carried by a [`TileError::Fetch`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for errors raised while validating configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
