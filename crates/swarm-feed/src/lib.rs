//! Remote event feed for the Swarm hypocenter map.
//!
//! The feed fetches a seismic event catalog on a fixed interval and hands
//! every successful snapshot to a [`FeedObserver`]. Failed refreshes are
//! logged and leave the previous snapshot in place.
//!
//! # Architecture
//!
//! ```text
//! EventFeed (HTTP / file) --> GeoJSON parser --> FeedPoller --> FeedObserver
//! ```
//!
//! # Modules
//!
//! - [`client`] -- [`EventFeed`] sources (HTTP endpoint, local file).
//! - [`error`] -- [`FeedError`].
//! - [`geojson`] -- Catalog decoding with per-feature partial success.
//! - [`poller`] -- [`FeedPoller`], the cancellable refresh task.
//!
//! [`EventFeed`]: client::EventFeed
//! [`FeedError`]: error::FeedError
//! [`FeedObserver`]: poller::FeedObserver
//! [`FeedPoller`]: poller::FeedPoller

pub mod client;
pub mod error;
pub mod geojson;
pub mod poller;
