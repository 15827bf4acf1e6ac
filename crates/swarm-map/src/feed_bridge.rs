//! Feed observer that writes snapshots into the layer's cache.

use swarm_feed::poller::FeedObserver;
use swarm_hypocenters::layer::FeedSink;
use swarm_types::EventSet;
use tracing::debug;

/// Bridges the refresh task to the hypocenter layer.
#[derive(Debug, Clone)]
pub struct FeedBridge {
    sink: FeedSink,
}

impl FeedBridge {
    /// Create a bridge writing through `sink`.
    pub const fn new(sink: FeedSink) -> Self {
        Self { sink }
    }
}

impl FeedObserver for FeedBridge {
    fn on_snapshot(&self, events: &EventSet) {
        debug!(events = events.len(), "applying feed snapshot to layer");
        self.sink.apply(events);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use swarm_hypocenters::cache::EventCache;
    use swarm_hypocenters::draw::RenderOptions;
    use swarm_hypocenters::layer::{HypocenterLayer, NoOpObserver};
    use swarm_types::{Event, EventId};

    use super::*;

    #[test]
    fn snapshot_lands_in_the_cache() {
        let cache = Arc::new(EventCache::new());
        let layer = HypocenterLayer::new(
            Arc::clone(&cache),
            RenderOptions::default(),
            Arc::new(NoOpObserver),
        );
        let bridge = FeedBridge::new(layer.feed_sink());

        let mut events = EventSet::new();
        events.insert(EventId::from("a"), Event::new("a"));
        bridge.on_snapshot(&events);

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&EventId::from("a")).is_some());
    }
}
