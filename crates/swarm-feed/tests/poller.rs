//! Integration tests for the refresh task, driven by a file-backed feed.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use swarm_feed::client::{EventFeed, FileFeed};
use swarm_feed::geojson::parse_catalog;
use swarm_feed::poller::{FeedObserver, FeedPoller};
use swarm_types::{EventId, EventSet};
use tokio::sync::mpsc;

const SAMPLE: &str = include_str!("fixtures/usgs_sample.geojson");
const INTERVAL: Duration = Duration::from_millis(40);
const WAIT: Duration = Duration::from_secs(5);

/// Forwards the size of every snapshot to the test.
struct ChannelObserver(mpsc::UnboundedSender<usize>);

impl FeedObserver for ChannelObserver {
    fn on_snapshot(&self, events: &EventSet) {
        let _ = self.0.send(events.len());
    }
}

fn observer() -> (Arc<dyn FeedObserver>, mpsc::UnboundedReceiver<usize>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelObserver(tx)), rx)
}

fn temp_catalog(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "swarm-feed-{name}-{}.geojson",
        std::process::id()
    ))
}

async fn next_snapshot(rx: &mut mpsc::UnboundedReceiver<usize>) -> usize {
    tokio::time::timeout(WAIT, rx.recv()).await.unwrap().unwrap()
}

#[test]
fn fixture_parses_with_one_skip() {
    let catalog = parse_catalog(SAMPLE).unwrap();
    assert_eq!(catalog.events.len(), 3);
    assert_eq!(catalog.skipped, 1);
    assert!(catalog.events.contains_key(&EventId::from("us7000ab03")));
}

#[tokio::test]
async fn first_fetch_is_immediate() {
    let path = temp_catalog("immediate");
    std::fs::write(&path, SAMPLE).unwrap();

    let (observer, mut rx) = observer();
    // Long interval: only the immediate first tick can deliver.
    let poller = FeedPoller::start(
        EventFeed::from(FileFeed::new(&path)),
        Duration::from_secs(3600),
        observer,
    );

    assert_eq!(next_snapshot(&mut rx).await, 3);
    assert_eq!(poller.snapshot().len(), 3);
    assert_eq!(poller.refresh_count(), 1);

    poller.stop().await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let path = temp_catalog("retain");
    std::fs::write(&path, SAMPLE).unwrap();

    let (observer, mut rx) = observer();
    let poller = FeedPoller::start(EventFeed::from(FileFeed::new(&path)), INTERVAL, observer);
    assert_eq!(next_snapshot(&mut rx).await, 3);

    std::fs::write(&path, "<quakeml>not json</quakeml>").unwrap();
    tokio::time::sleep(INTERVAL.saturating_mul(3)).await;
    // Drain anything delivered before the corrupt file was seen.
    while rx.try_recv().is_ok() {}

    tokio::time::sleep(INTERVAL.saturating_mul(4)).await;
    assert!(rx.try_recv().is_err(), "observer must not see failed refreshes");
    let snapshot = poller.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.contains_key(&EventId::from("ci40600001")));

    poller.stop().await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn missing_file_recovers_when_it_appears() {
    let path = temp_catalog("late");
    let _ = std::fs::remove_file(&path);

    let (observer, mut rx) = observer();
    let poller = FeedPoller::start(EventFeed::from(FileFeed::new(&path)), INTERVAL, observer);

    tokio::time::sleep(INTERVAL.saturating_mul(2)).await;
    assert!(poller.snapshot().is_empty());
    assert_eq!(poller.refresh_count(), 0);

    std::fs::write(&path, SAMPLE).unwrap();
    assert_eq!(next_snapshot(&mut rx).await, 3);

    poller.stop().await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn suspended_refresh_skips_fetches() {
    let path = temp_catalog("suspended");
    std::fs::write(&path, SAMPLE).unwrap();

    let (observer, mut rx) = observer();
    let poller = FeedPoller::start(EventFeed::from(FileFeed::new(&path)), INTERVAL, observer);
    // The single-threaded test runtime has not polled the task yet.
    poller.set_refresh_enabled(false);
    assert!(!poller.is_refresh_enabled());

    tokio::time::sleep(INTERVAL.saturating_mul(4)).await;
    assert_eq!(poller.refresh_count(), 0);
    assert!(rx.try_recv().is_err());

    poller.set_refresh_enabled(true);
    assert_eq!(next_snapshot(&mut rx).await, 3);
    assert!(poller.refresh_count() >= 1);

    poller.stop().await;
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn stop_ends_refreshes() {
    let path = temp_catalog("stop");
    std::fs::write(&path, SAMPLE).unwrap();

    let (observer, mut rx) = observer();
    let poller = FeedPoller::start(EventFeed::from(FileFeed::new(&path)), INTERVAL, observer);
    assert_eq!(next_snapshot(&mut rx).await, 3);

    tokio::time::timeout(WAIT, poller.stop()).await.unwrap();
    while rx.try_recv().is_ok() {}

    tokio::time::sleep(INTERVAL.saturating_mul(3)).await;
    // The observer was dropped with the task, so the channel is closed and empty.
    assert!(rx.recv().await.is_none());
    let _ = std::fs::remove_file(&path);
}
