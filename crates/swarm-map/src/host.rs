//! Layer observer for the headless host.
//!
//! The layer calls back from both the main task and the feed refresh task.
//! Callbacks only record what happened; the main loop picks the work up
//! on its next render pass.

use std::sync::{Mutex, PoisonError};

use swarm_hypocenters::layer::LayerObserver;
use swarm_types::{EventId, GeoRange};
use tokio::sync::Notify;
use tracing::info;

/// Records repaint and recenter requests for the render loop.
#[derive(Debug, Default)]
pub struct HostObserver {
    /// Wakes the render loop.
    repaint: Notify,
    /// Region requested by the most recent import, not yet applied.
    pending_recenter: Mutex<Option<GeoRange>>,
}

impl HostObserver {
    /// Create an observer with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until a repaint has been requested. A request made while
    /// nobody was waiting is not lost.
    pub async fn repaint_requested_wait(&self) {
        self.repaint.notified().await;
    }

    /// Take the pending recenter region, if any.
    pub fn take_recenter(&self) -> Option<GeoRange> {
        self.pending_recenter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl LayerObserver for HostObserver {
    fn repaint_requested(&self) {
        self.repaint.notify_one();
    }

    fn recenter(&self, region: &GeoRange) {
        info!(
            west = region.west,
            east = region.east,
            south = region.south,
            north = region.north,
            "recentering map on imported events"
        );
        *self
            .pending_recenter
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(*region);
    }

    fn open_event(&self, id: &EventId) {
        info!(event_id = %id, "event detail requested");
    }
}
