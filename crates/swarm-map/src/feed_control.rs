//! Feed lifecycle for the host.
//!
//! [`FeedController`] owns the refresh task and reacts to source changes
//! and visibility toggles. Hiding the layer stops the task and clears every
//! event; showing it starts a fresh task, which fetches at once. A source
//! that is disabled or has an unusable URL leaves the layer empty and is
//! only logged.

use std::sync::Arc;
use std::time::Duration;

use swarm_feed::client::{EventFeed, HttpFeed};
use swarm_feed::poller::FeedPoller;
use swarm_hypocenters::config::HypocenterConfig;
use swarm_hypocenters::layer::FeedSink;
use tracing::info;

use crate::feed_bridge::FeedBridge;

/// Starts, stops, and swaps the feed refresh task.
#[derive(Debug)]
pub struct FeedController {
    sink: FeedSink,
    feed: Option<EventFeed>,
    interval: Duration,
    visible: bool,
    poller: Option<FeedPoller>,
}

impl FeedController {
    /// Create a controller for a visible layer with no source yet.
    pub const fn new(sink: FeedSink, interval: Duration) -> Self {
        Self {
            sink,
            feed: None,
            interval,
            visible: true,
            poller: None,
        }
    }

    /// The feed to poll for `config`, or `None` when the source is
    /// disabled or its URL cannot be used.
    pub fn resolve(config: &HypocenterConfig) -> Option<EventFeed> {
        let Some(url) = config.feed_url() else {
            info!(source = ?config.source, "Hypocenter source disabled");
            return None;
        };
        match HttpFeed::new(&url, config.request_timeout()) {
            Ok(feed) => Some(EventFeed::from(feed)),
            Err(e) => {
                info!(url = %url, error = %e, "Hypocenter feed URL unusable, source disabled");
                None
            }
        }
    }

    /// Switch to the source described by `config`.
    pub async fn apply_config(&mut self, config: &HypocenterConfig) {
        let feed = Self::resolve(config);
        self.switch_source(feed, config.refresh_interval()).await;
    }

    /// Stop the current task and poll `feed` instead. `None` clears the
    /// layer. While hidden, the new source is remembered but not started.
    pub async fn switch_source(&mut self, feed: Option<EventFeed>, interval: Duration) {
        self.stop_poller().await;
        self.feed = feed;
        self.interval = interval;

        if self.feed.is_none() {
            self.sink.clear();
            info!("No hypocenter source, layer cleared");
        } else if self.visible {
            self.start_poller();
        }
    }

    /// Show or hide the layer. Hiding stops the task and clears every
    /// event, imported ones included.
    pub async fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if visible {
            info!("Hypocenter layer shown");
            self.start_poller();
        } else {
            self.stop_poller().await;
            self.sink.clear();
            info!("Hypocenter layer hidden, feed stopped and events cleared");
        }
    }

    /// Suspend or resume fetching without touching the displayed events.
    pub fn set_refresh_enabled(&self, enabled: bool) {
        if let Some(poller) = self.poller.as_ref() {
            poller.set_refresh_enabled(enabled);
        }
    }

    /// Whether the layer is shown.
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// The running refresh task, if any.
    pub const fn poller(&self) -> Option<&FeedPoller> {
        self.poller.as_ref()
    }

    /// Stop the refresh task for good.
    pub async fn shutdown(&mut self) {
        self.stop_poller().await;
    }

    fn start_poller(&mut self) {
        let Some(feed) = self.feed.clone() else {
            return;
        };
        let bridge = Arc::new(FeedBridge::new(self.sink.clone()));
        self.poller = Some(FeedPoller::start(feed, self.interval, bridge));
    }

    async fn stop_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use swarm_feed::client::FileFeed;
    use swarm_hypocenters::cache::EventCache;
    use swarm_hypocenters::config::HypocenterSource;
    use swarm_hypocenters::draw::RenderOptions;
    use swarm_hypocenters::layer::{HypocenterLayer, NoOpObserver};
    use swarm_types::{Event, EventId, EventSet};

    use super::*;

    const INTERVAL: Duration = Duration::from_millis(40);

    const TWO_QUAKES: &str = r#"{"features": [
      {"id": "nc1", "properties": {"mag": 2.0, "time": 1700000000000},
       "geometry": {"coordinates": [-122.8, 38.8, 1.6]}},
      {"id": "nc2", "properties": {"mag": 1.2, "time": 1700000100000},
       "geometry": {"coordinates": [-122.7, 38.9, 2.4]}}
    ]}"#;

    const ONE_QUAKE: &str = r#"{"features": [
      {"id": "hv1", "properties": {"mag": 3.1, "time": 1700000200000},
       "geometry": {"coordinates": [-155.3, 19.4, 30.0]}}
    ]}"#;

    fn controller() -> (FeedController, Arc<EventCache>) {
        let cache = Arc::new(EventCache::new());
        let layer = HypocenterLayer::new(
            Arc::clone(&cache),
            RenderOptions::default(),
            Arc::new(NoOpObserver),
        );
        (FeedController::new(layer.feed_sink(), INTERVAL), cache)
    }

    fn catalog_file(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "swarm-map-{name}-{}.geojson",
            std::process::id()
        ));
        let written = std::fs::write(&path, body);
        assert!(written.is_ok(), "{written:?}");
        path
    }

    fn file_feed(path: &Path) -> Option<EventFeed> {
        Some(EventFeed::from(FileFeed::new(path)))
    }

    async fn wait_for(cache: &EventCache, id: &str) -> bool {
        let id = EventId::from(id);
        tokio::time::timeout(Duration::from_secs(5), async {
            while cache.get(&id).is_none() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .is_ok()
    }

    fn seeded(cache: &EventCache) {
        let mut imported = EventSet::new();
        imported.insert(EventId::from("mine"), Event::new("mine"));
        cache.import_events(imported);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn unusable_url_clears_instead_of_failing() {
        let (mut controller, cache) = controller();
        seeded(&cache);

        let config = HypocenterConfig {
            source: HypocenterSource::Custom,
            url: Some("not a url".to_owned()),
            ..HypocenterConfig::default()
        };
        controller.apply_config(&config).await;

        assert!(controller.poller().is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.imported_len(), 0);
    }

    #[tokio::test]
    async fn disabled_source_clears_the_layer() {
        let (mut controller, cache) = controller();
        seeded(&cache);

        let config = HypocenterConfig {
            source: HypocenterSource::None,
            ..HypocenterConfig::default()
        };
        controller.apply_config(&config).await;

        assert!(controller.poller().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn hiding_stops_the_feed_and_showing_restarts_it() {
        let path = catalog_file("toggle", TWO_QUAKES);
        let (mut controller, cache) = controller();
        controller.switch_source(file_feed(&path), INTERVAL).await;
        assert!(wait_for(&cache, "nc1").await);

        controller.set_visible(false).await;
        assert!(!controller.is_visible());
        assert!(controller.poller().is_none());
        assert!(cache.is_empty());

        // Nothing refills the cache while hidden.
        tokio::time::sleep(INTERVAL.saturating_mul(3)).await;
        assert!(cache.is_empty());

        controller.set_visible(true).await;
        assert!(controller.poller().is_some());
        assert!(wait_for(&cache, "nc2").await);

        controller.shutdown().await;
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn switching_source_replaces_the_feed() {
        let first = catalog_file("first", TWO_QUAKES);
        let second = catalog_file("second", ONE_QUAKE);
        let (mut controller, cache) = controller();

        controller.switch_source(file_feed(&first), INTERVAL).await;
        assert!(wait_for(&cache, "nc1").await);

        controller.switch_source(file_feed(&second), INTERVAL).await;
        assert!(wait_for(&cache, "hv1").await);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&EventId::from("nc1")).is_none());

        controller.shutdown().await;
        let _ = std::fs::remove_file(&first);
        let _ = std::fs::remove_file(&second);
    }

    #[tokio::test]
    async fn source_chosen_while_hidden_starts_on_show() {
        let path = catalog_file("hidden", ONE_QUAKE);
        let (mut controller, cache) = controller();

        controller.set_visible(false).await;
        controller.switch_source(file_feed(&path), INTERVAL).await;
        assert!(controller.poller().is_none());

        controller.set_visible(true).await;
        assert!(wait_for(&cache, "hv1").await);

        controller.shutdown().await;
        let _ = std::fs::remove_file(&path);
    }
}
