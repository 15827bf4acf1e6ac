//! The hypocenter map layer.
//!
//! [`HypocenterLayer`] ties the cache, hover state, and draw-command
//! generation together and reports back to the host through an injected
//! [`LayerObserver`]. It lives on the UI thread. The feed refresh task
//! writes to the shared cache through a [`FeedSink`] instead, so it never
//! needs the layer itself.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use swarm_types::{ColorMode, EventId, EventSet, GeoRange};
use tracing::{debug, info};

use crate::cache::EventCache;
use crate::draw::{DrawCommand, RenderOptions, build_draw_commands};
use crate::hover::HoverState;
use crate::viewport::{ScreenPoint, Viewport};

/// Host callbacks the layer drives.
///
/// Implementations must be cheap and non-blocking: they are called from the
/// UI thread and from the feed refresh task.
pub trait LayerObserver: Send + Sync {
    /// The layer's contents changed and should be redrawn.
    fn repaint_requested(&self);

    /// Recenter and rescale the map on `region` and make it visible.
    fn recenter(&self, region: &GeoRange);

    /// Open the detail view for an event.
    fn open_event(&self, id: &EventId);
}

/// An observer that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl LayerObserver for NoOpObserver {
    fn repaint_requested(&self) {}
    fn recenter(&self, _region: &GeoRange) {}
    fn open_event(&self, _id: &EventId) {}
}

/// Write handle for the feed refresh task.
#[derive(Clone)]
pub struct FeedSink {
    cache: Arc<EventCache>,
    observer: Arc<dyn LayerObserver>,
}

impl FeedSink {
    /// Merge a fresh feed snapshot into the cache and request a repaint.
    pub fn apply(&self, snapshot: &EventSet) {
        self.cache.apply_feed_snapshot(snapshot);
        self.observer.repaint_requested();
    }

    /// Drop every event (the feed was switched off) and request a repaint.
    pub fn clear(&self) {
        self.cache.clear();
        self.observer.repaint_requested();
    }
}

impl core::fmt::Debug for FeedSink {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FeedSink")
            .field("displayed", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Map layer plotting seismic events.
pub struct HypocenterLayer {
    cache: Arc<EventCache>,
    hover: HoverState,
    options: RenderOptions,
    observer: Arc<dyn LayerObserver>,
}

impl HypocenterLayer {
    /// Create a layer over `cache` reporting to `observer`.
    pub fn new(
        cache: Arc<EventCache>,
        options: RenderOptions,
        observer: Arc<dyn LayerObserver>,
    ) -> Self {
        Self {
            cache,
            hover: HoverState::new(),
            options,
            observer,
        }
    }

    /// The shared event cache.
    pub const fn cache(&self) -> &Arc<EventCache> {
        &self.cache
    }

    /// A write handle for the feed refresh task.
    pub fn feed_sink(&self) -> FeedSink {
        FeedSink {
            cache: Arc::clone(&self.cache),
            observer: Arc::clone(&self.observer),
        }
    }

    /// Current hover state.
    pub const fn hover(&self) -> &HoverState {
        &self.hover
    }

    /// Current render options.
    pub const fn options(&self) -> RenderOptions {
        self.options
    }

    /// Switch what marker color encodes.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        if self.options.color_mode != mode {
            self.options.color_mode = mode;
            self.observer.repaint_requested();
        }
    }

    /// Show or hide the legend.
    pub fn set_legend_enabled(&mut self, enabled: bool) {
        if self.options.legend_enabled != enabled {
            self.options.legend_enabled = enabled;
            self.observer.repaint_requested();
        }
    }

    /// Draw commands for one render pass. `now` ages every marker in the
    /// pass against the same instant.
    pub fn draw<V: Viewport + ?Sized>(&self, viewport: &V, now: DateTime<Utc>) -> Vec<DrawCommand> {
        let events = self.cache.snapshot();
        build_draw_commands(&events, self.hover.target(), self.options, viewport, now)
    }

    /// Handle pointer movement. Requests a repaint and returns `true` when
    /// the hover target changed.
    pub fn pointer_moved<V: Viewport + ?Sized>(&mut self, viewport: &V, point: ScreenPoint) -> bool {
        let events = self.cache.snapshot();
        if events.is_empty() {
            return false;
        }
        let changed = self.hover.pointer_moved(&events, viewport, point);
        if changed {
            self.observer.repaint_requested();
        }
        changed
    }

    /// Handle a click. Opens the hovered event, if any, and returns whether
    /// the click was handled.
    pub fn clicked(&mut self) -> bool {
        let Some(id) = self.hover.clicked() else {
            return false;
        };
        debug!(event_id = %id, "opening event");
        self.observer.open_event(&id);
        true
    }

    /// Import events from a file. The map recenters on them when any has an
    /// origin.
    pub fn import_events(&mut self, events: EventSet) -> Option<GeoRange> {
        let count = events.len();
        let region = self.cache.import_events(events);
        info!(count, recenter = region.is_some(), "imported events added to map");
        if let Some(region) = region.as_ref() {
            self.observer.recenter(region);
        }
        self.observer.repaint_requested();
        region
    }

    /// Remove an event by identifier. Returns whether anything was removed.
    pub fn remove(&mut self, id: &EventId) -> bool {
        if self.hover.target_id() == Some(id) {
            self.hover.clear();
        }
        let removed = self.cache.remove(id);
        if removed {
            self.observer.repaint_requested();
        }
        removed
    }
}

impl core::fmt::Debug for HypocenterLayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HypocenterLayer")
            .field("displayed", &self.cache.len())
            .field("hover", &self.hover.target_id())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
