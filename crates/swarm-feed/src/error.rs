//! Error types for the event feed.
//!
//! A [`FeedError`] aborts a single refresh. The poller logs it and keeps
//! the previous snapshot; it never tears the refresh task down.

use std::path::PathBuf;

/// Errors that can occur while fetching or decoding a catalog.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The feed URL could not be parsed.
    #[error("invalid feed URL {url}: {message}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// The HTTP request failed or timed out.
    #[error("request to {url} failed: {message}")]
    Http {
        /// The requested URL.
        url: String,
        /// Description of the transport failure.
        message: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// Reading a catalog file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not a `GeoJSON` feature collection.
    #[error("catalog parse error: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },
}
