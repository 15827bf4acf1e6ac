//! Catalog sources.
//!
//! Uses enum dispatch instead of trait objects because async methods are
//! not dyn-compatible. Every source returns a [`ParsedCatalog`]; fetching
//! and decoding failures surface as [`FeedError`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::FeedError;
use crate::geojson::{ParsedCatalog, parse_catalog};

// ---------------------------------------------------------------------------
// Unified feed enum
// ---------------------------------------------------------------------------

/// A source of seismic event catalogs.
#[derive(Debug, Clone)]
pub enum EventFeed {
    /// A remote `GeoJSON` endpoint.
    Http(HttpFeed),
    /// A `GeoJSON` file on disk.
    File(FileFeed),
}

impl EventFeed {
    /// Fetch and decode the current catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] if the catalog cannot be retrieved or is not
    /// a feature collection.
    pub async fn fetch(&self) -> Result<ParsedCatalog, FeedError> {
        match self {
            Self::Http(feed) => feed.fetch().await,
            Self::File(feed) => feed.fetch().await,
        }
    }

    /// Where the catalog comes from, for logging.
    pub fn describe(&self) -> String {
        match self {
            Self::Http(feed) => feed.url.to_string(),
            Self::File(feed) => feed.path.display().to_string(),
        }
    }
}

impl From<HttpFeed> for EventFeed {
    fn from(feed: HttpFeed) -> Self {
        Self::Http(feed)
    }
}

impl From<FileFeed> for EventFeed {
    fn from(feed: FileFeed) -> Self {
        Self::File(feed)
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// A catalog served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFeed {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl HttpFeed {
    /// Create a feed for `url`, bounding each request by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidUrl`] if `url` does not parse or is not
    /// `http`/`https`, and [`FeedError::Http`] if the client cannot be built.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FeedError::InvalidUrl {
            url: url.to_owned(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FeedError::InvalidUrl {
                url: url.to_owned(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Http {
                url: url.to_owned(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: parsed,
        })
    }

    /// The endpoint this feed polls.
    pub const fn url(&self) -> &reqwest::Url {
        &self.url
    }

    async fn fetch(&self) -> Result<ParsedCatalog, FeedError> {
        let response = self
            .client
            .get(self.url.clone())
            .header("Accept", "application/geo+json, application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;
        debug!(url = %self.url, bytes = body.len(), "catalog downloaded");

        parse_catalog(&body)
    }

    fn transport_error(&self, error: &reqwest::Error) -> FeedError {
        FeedError::Http {
            url: self.url.to_string(),
            message: error.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// A catalog stored in a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    /// Create a feed reading `path` on every fetch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this feed reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn fetch(&self) -> Result<ParsedCatalog, FeedError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_catalog(&body)
    }
}
