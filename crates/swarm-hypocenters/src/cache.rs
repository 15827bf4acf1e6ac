//! Event cache and merge engine.
//!
//! The cache holds two sets keyed by event identifier: the events currently
//! displayed, and the events the user imported from files. Imported events
//! survive every feed refresh; a refresh always rebuilds
//! `displayed = snapshot ∪ imported` with the imported entry winning on a
//! key collision.
//!
//! # Concurrency
//!
//! The displayed set is copy-on-write. Writers build a fresh
//! [`EventSet`] off to the side and swap the `Arc` in under a write lock
//! held only for the pointer swap. Readers clone the current `Arc` and keep
//! a consistent view for as long as they need it, so a draw pass running
//! during a refresh sees the previous frame's events, never a half-merged
//! map. Writers are serialized by the imported-set mutex.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use swarm_types::{Event, EventId, EventSet, GeoRange};
use tracing::debug;

/// Minimum extent in degrees of the region computed for an import.
const IMPORT_MIN_EXTENT_DEG: f64 = 0.1;

/// Fraction of the import region's span added on each side.
const IMPORT_PAD_FRACTION: f64 = 0.5;

/// The authoritative in-memory set of events to display.
#[derive(Debug, Default)]
pub struct EventCache {
    /// Events currently displayed, swapped wholesale on every write.
    displayed: RwLock<Arc<EventSet>>,
    /// Events imported by the user. Locking it also serializes writers.
    imported: Mutex<EventSet>,
}

impl EventCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current displayed set.
    ///
    /// The returned snapshot is immutable; later writes swap in a new set
    /// and leave this one untouched.
    pub fn snapshot(&self) -> Arc<EventSet> {
        let guard = self.displayed.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Number of displayed events.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether no events are displayed.
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Number of imported events.
    pub fn imported_len(&self) -> usize {
        self.lock_imported().len()
    }

    /// Look up a displayed event by identifier.
    pub fn get(&self, id: &EventId) -> Option<Event> {
        self.snapshot().get(id).cloned()
    }

    /// Replace the displayed set with `snapshot ∪ imported`.
    ///
    /// Imported events override same-keyed feed events. Applying the same
    /// snapshot twice yields the same displayed set.
    pub fn apply_feed_snapshot(&self, snapshot: &EventSet) {
        let imported = self.lock_imported();
        let mut merged = snapshot.clone();
        merged.extend(imported.iter().map(|(id, event)| (id.clone(), event.clone())));
        debug!(
            feed_events = snapshot.len(),
            imported_events = imported.len(),
            displayed_events = merged.len(),
            "feed snapshot merged"
        );
        self.swap(merged);
    }

    /// Add user-imported events to both the imported and displayed sets,
    /// overriding existing keys.
    ///
    /// Returns the region the viewport should recenter on: the bounding box
    /// of the imported events that have an origin, padded on every side.
    /// Returns `None` when none of them has an origin.
    pub fn import_events(&self, events: EventSet) -> Option<GeoRange> {
        let region = import_region(events.values());

        let mut imported = self.lock_imported();
        let mut displayed = EventSet::clone(&self.snapshot());
        let count = events.len();
        for (id, event) in events {
            imported.insert(id.clone(), event.clone());
            displayed.insert(id, event);
        }
        debug!(
            imported_now = count,
            imported_total = imported.len(),
            displayed_events = displayed.len(),
            "events imported"
        );
        self.swap(displayed);
        region
    }

    /// Remove an event from both the imported and displayed sets.
    ///
    /// Returns whether anything was removed. Removing an unknown
    /// identifier is not an error.
    pub fn remove(&self, id: &EventId) -> bool {
        let mut imported = self.lock_imported();
        let was_imported = imported.remove(id).is_some();

        let current = self.snapshot();
        if !current.contains_key(id) {
            return was_imported;
        }
        let mut displayed = EventSet::clone(&current);
        displayed.remove(id);
        debug!(event_id = %id, was_imported, "event removed");
        self.swap(displayed);
        true
    }

    /// Drop every displayed and imported event.
    pub fn clear(&self) {
        let mut imported = self.lock_imported();
        imported.clear();
        self.swap(EventSet::new());
        debug!("event cache cleared");
    }

    fn swap(&self, events: EventSet) {
        let mut guard = self.displayed.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(events);
    }

    fn lock_imported(&self) -> MutexGuard<'_, EventSet> {
        self.imported.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bounding region of the events that have an origin, padded for display.
pub fn import_region<'a>(events: impl IntoIterator<Item = &'a Event>) -> Option<GeoRange> {
    let mut region: Option<GeoRange> = None;
    for origin in events.into_iter().filter_map(|e| e.preferred_origin.as_ref()) {
        region = Some(match region {
            Some(mut range) => {
                range.include_point(origin.longitude, origin.latitude, 0.0);
                range
            }
            None => GeoRange::new(
                origin.longitude,
                origin.longitude,
                origin.latitude,
                origin.latitude,
            ),
        });
    }
    region.map(|mut range| {
        range.ensure_min_extent(IMPORT_MIN_EXTENT_DEG);
        range.pad_percent(IMPORT_PAD_FRACTION, IMPORT_PAD_FRACTION);
        range
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use swarm_types::{Magnitude, Origin};

    use super::*;

    fn event_at(id: &str, lon: f64, lat: f64, depth_m: f64) -> Event {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default();
        Event::new(id).with_origin(Origin::new(lon, lat, depth_m, t0))
    }

    fn set_of(events: impl IntoIterator<Item = Event>) -> EventSet {
        events.into_iter().map(|e| (e.id.clone(), e)).collect()
    }

    #[test]
    fn applying_the_same_snapshot_twice_is_idempotent() {
        let cache = EventCache::new();
        let feed = set_of([event_at("a", 1.0, 1.0, 0.0), event_at("b", 2.0, 2.0, 0.0)]);

        cache.apply_feed_snapshot(&feed);
        let once = cache.snapshot();
        cache.apply_feed_snapshot(&feed);
        let twice = cache.snapshot();

        assert_eq!(*once, *twice);
        assert_eq!(twice.len(), 2);
    }

    #[test]
    fn imported_event_wins_over_feed_event() {
        let cache = EventCache::new();
        let imported = event_at("a", 5.0, 5.0, 1000.0).with_magnitude(Magnitude::new(3.0, "ml"));
        cache.import_events(set_of([imported.clone()]));

        let feed = set_of([event_at("a", 9.0, 9.0, 0.0), event_at("b", 1.0, 1.0, 0.0)]);
        cache.apply_feed_snapshot(&feed);

        assert_eq!(cache.get(&EventId::from("a")), Some(imported));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.imported_len(), 1);
    }

    #[test]
    fn refresh_replaces_previous_feed_events() {
        let cache = EventCache::new();
        cache.apply_feed_snapshot(&set_of([event_at("old", 0.0, 0.0, 0.0)]));
        cache.apply_feed_snapshot(&set_of([event_at("new", 0.0, 0.0, 0.0)]));

        let snapshot = cache.snapshot();
        assert!(!snapshot.contains_key(&EventId::from("old")));
        assert!(snapshot.contains_key(&EventId::from("new")));
    }

    #[test]
    fn removed_import_stays_gone_after_refresh() {
        let cache = EventCache::new();
        cache.import_events(set_of([event_at("x", 0.0, 0.0, 0.0)]));
        assert!(cache.remove(&EventId::from("x")));

        cache.apply_feed_snapshot(&set_of([event_at("y", 0.0, 0.0, 0.0)]));
        assert!(cache.get(&EventId::from("x")).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let cache = EventCache::new();
        cache.apply_feed_snapshot(&set_of([event_at("a", 0.0, 0.0, 0.0)]));
        assert!(!cache.remove(&EventId::from("missing")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_drops_feed_event_until_next_refresh() {
        let cache = EventCache::new();
        let feed = set_of([event_at("a", 0.0, 0.0, 0.0)]);
        cache.apply_feed_snapshot(&feed);
        assert!(cache.remove(&EventId::from("a")));
        assert!(cache.is_empty());

        cache.apply_feed_snapshot(&feed);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_drops_imported_events_too() {
        let cache = EventCache::new();
        cache.import_events(set_of([event_at("a", 0.0, 0.0, 0.0)]));
        cache.apply_feed_snapshot(&set_of([event_at("b", 0.0, 0.0, 0.0)]));
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.imported_len(), 0);

        cache.apply_feed_snapshot(&EventSet::new());
        assert!(cache.is_empty());
    }

    #[test]
    fn snapshot_taken_before_a_write_is_unchanged() {
        let cache = EventCache::new();
        cache.apply_feed_snapshot(&set_of([event_at("a", 0.0, 0.0, 0.0)]));
        let before = cache.snapshot();

        cache.apply_feed_snapshot(&set_of([event_at("b", 0.0, 0.0, 0.0)]));

        assert!(before.contains_key(&EventId::from("a")));
        assert!(!before.contains_key(&EventId::from("b")));
    }

    #[test]
    fn import_region_covers_origins_and_is_padded() {
        let events = [event_at("a", 10.0, 20.0, 0.0), event_at("b", 12.0, 22.0, 0.0)];
        let region = import_region(events.iter());
        assert!(region.is_some());
        let region = region.unwrap_or_default();

        // 2 degree span on each axis, padded by 1 degree per side.
        assert!((region.west - 9.0).abs() < 1e-9);
        assert!((region.east - 13.0).abs() < 1e-9);
        assert!((region.south - 19.0).abs() < 1e-9);
        assert!((region.north - 23.0).abs() < 1e-9);
    }

    #[test]
    fn import_region_straddling_the_antimeridian_stays_narrow() {
        let events = [event_at("a", 179.0, -20.0, 0.0), event_at("b", -179.0, -18.0, 0.0)];
        let region = import_region(events.iter()).unwrap_or_default();
        assert!(region.wraps(), "{region:?}");
        assert!((region.width() - 4.0).abs() < 1e-9);
        assert!(region.contains(179.0, -20.0));
        assert!(region.contains(-179.0, -18.0));
        assert!(!region.contains(0.0, -19.0));
    }

    #[test]
    fn import_region_ignores_events_without_origin() {
        let events = [Event::new("no-origin")];
        assert!(import_region(events.iter()).is_none());

        let cache = EventCache::new();
        let region = cache.import_events(set_of([Event::new("no-origin")]));
        assert!(region.is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn concurrent_readers_see_whole_snapshots() {
        let cache = Arc::new(EventCache::new());
        let small = set_of([event_at("a", 0.0, 0.0, 0.0)]);
        let large = set_of((0..50).map(|i| event_at(&format!("e{i}"), 0.0, 0.0, 0.0)));

        let writer = {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    cache.apply_feed_snapshot(&small);
                    cache.apply_feed_snapshot(&large);
                }
            })
        };

        for _ in 0..200 {
            let len = cache.snapshot().len();
            assert!(len == 0 || len == 1 || len == 50, "torn snapshot of {len}");
        }
        assert!(writer.join().is_ok());
    }
}
