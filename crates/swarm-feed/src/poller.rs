//! Periodic catalog refresh.
//!
//! [`FeedPoller`] owns one background task that fetches the catalog on a
//! fixed interval. The first fetch happens immediately. A successful fetch
//! replaces the poller's snapshot and is handed to the [`FeedObserver`]; a
//! failed one is logged and the previous snapshot stays in place until the
//! next tick. There are no retries between ticks.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use swarm_types::EventSet;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::client::EventFeed;

/// Receives every successfully fetched catalog.
pub trait FeedObserver: Send + Sync {
    /// Called on the refresh task after each successful fetch.
    fn on_snapshot(&self, events: &EventSet);
}

/// State shared between the handle and the refresh task.
#[derive(Debug)]
struct PollerShared {
    /// The last successfully fetched catalog.
    latest: RwLock<Arc<EventSet>>,
    /// Whether ticks should fetch. Cleared while refreshes are paused.
    refresh_enabled: AtomicBool,
    /// Number of successful fetches.
    refresh_count: AtomicU64,
}

impl PollerShared {
    fn store(&self, events: Arc<EventSet>) {
        let mut guard = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        *guard = events;
    }
}

/// Handle to a running refresh task.
///
/// Dropping the handle without calling [`stop`](Self::stop) also ends the
/// task once any in-flight fetch completes.
#[derive(Debug)]
pub struct FeedPoller {
    shared: Arc<PollerShared>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
    source: String,
}

impl FeedPoller {
    /// Spawn the refresh task on the current tokio runtime.
    ///
    /// The first fetch is issued immediately, then once per `interval`.
    /// A zero interval is raised to one millisecond.
    pub fn start(feed: EventFeed, interval: Duration, observer: Arc<dyn FeedObserver>) -> Self {
        let shared = Arc::new(PollerShared {
            latest: RwLock::new(Arc::new(EventSet::new())),
            refresh_enabled: AtomicBool::new(true),
            refresh_count: AtomicU64::new(0),
        });
        let (shutdown, shutdown_rx) = watch::channel(false);
        let source = feed.describe();
        let interval = interval.max(Duration::from_millis(1));

        info!(
            source = %source,
            interval_secs = interval.as_secs_f64(),
            "starting event feed"
        );

        let task = tokio::spawn(run(
            feed,
            interval,
            Arc::clone(&shared),
            observer,
            shutdown_rx,
        ));

        Self {
            shared,
            shutdown,
            task,
            source,
        }
    }

    /// The last successfully fetched catalog (empty until the first
    /// success).
    pub fn snapshot(&self) -> Arc<EventSet> {
        let guard = self
            .shared
            .latest
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Enable or suspend fetching. Suspended ticks are skipped; resuming
    /// waits for the next tick rather than fetching at once.
    pub fn set_refresh_enabled(&self, enabled: bool) {
        let previous = self.shared.refresh_enabled.swap(enabled, Ordering::AcqRel);
        if previous != enabled {
            debug!(source = %self.source, enabled, "event feed refresh toggled");
        }
    }

    /// Whether ticks currently fetch.
    pub fn is_refresh_enabled(&self) -> bool {
        self.shared.refresh_enabled.load(Ordering::Acquire)
    }

    /// Number of successful fetches so far.
    pub fn refresh_count(&self) -> u64 {
        self.shared.refresh_count.load(Ordering::Acquire)
    }

    /// Where this poller fetches from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Signal the task to stop and wait for it to exit.
    ///
    /// A fetch already in flight runs to completion, but its result is
    /// dropped.
    pub async fn stop(self) {
        // The receiver is gone only if the task already exited.
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!(source = %self.source, error = %e, "event feed task ended abnormally");
        }
        info!(source = %self.source, "event feed stopped");
    }
}

async fn run(
    feed: EventFeed,
    interval: Duration,
    shared: Arc<PollerShared>,
    observer: Arc<dyn FeedObserver>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        if !shared.refresh_enabled.load(Ordering::Acquire) {
            debug!("event feed refresh suspended, skipping tick");
            continue;
        }

        let result = feed.fetch().await;
        if *shutdown.borrow() {
            debug!("stop requested during fetch, discarding result");
            break;
        }

        match result {
            Ok(catalog) => {
                let count = shared.refresh_count.fetch_add(1, Ordering::AcqRel);
                info!(
                    events = catalog.events.len(),
                    skipped = catalog.skipped,
                    refresh = count.saturating_add(1),
                    "event feed refreshed"
                );
                let events = Arc::new(catalog.events);
                shared.store(Arc::clone(&events));
                observer.on_snapshot(&events);
            }
            Err(e) => {
                warn!(source = %feed.describe(), error = %e, "event feed refresh failed, keeping previous snapshot");
            }
        }
    }
}
