//! Pointer hit-testing and hover state.
//!
//! At most one event is hovered at a time. Only pointer movement sets or
//! clears the hover target; a click consumes it.

use swarm_types::{Event, EventId, EventSet};
use tracing::debug;

use crate::style::marker_diameter;
use crate::viewport::{ScreenPoint, Viewport, marker_position};

/// Square screen-space box a marker occupies.
///
/// The top-left corner sits at the marker's truncated screen coordinate.
/// Containment is half-open: the left and top edges are inside, the right
/// and bottom edges are not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerBox {
    /// Left edge in pixels.
    pub left: f64,
    /// Top edge in pixels.
    pub top: f64,
    /// Side length in pixels.
    pub side: f64,
}

impl MarkerBox {
    /// Box for a marker placed at `position` with the given diameter.
    pub fn new(position: ScreenPoint, diameter: u32) -> Self {
        Self {
            left: position.x.trunc(),
            top: position.y.trunc(),
            side: f64::from(diameter),
        }
    }

    /// Whether the point lies inside the box.
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.left
            && point.x < self.left + self.side
            && point.y >= self.top
            && point.y < self.top + self.side
    }
}

/// Find the first marker, in `events` order, whose box contains `point`.
///
/// Events without an origin or outside the visible range are skipped.
/// Returns `None` when the viewport has no visible range yet.
pub fn marker_at<'a, V: Viewport + ?Sized>(
    events: &'a EventSet,
    viewport: &V,
    point: ScreenPoint,
) -> Option<&'a Event> {
    let range = viewport.visible_range()?;
    events.values().find(|event| {
        marker_position(viewport, &range, event).is_some_and(|(_, position)| {
            MarkerBox::new(position, marker_diameter(event.magnitude_value())).contains(point)
        })
    })
}

/// The event currently under the pointer, if any.
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    target: Option<Event>,
}

impl HoverState {
    /// Create an empty hover state.
    pub const fn new() -> Self {
        Self { target: None }
    }

    /// The hovered event.
    pub const fn target(&self) -> Option<&Event> {
        self.target.as_ref()
    }

    /// Identifier of the hovered event.
    pub fn target_id(&self) -> Option<&EventId> {
        self.target.as_ref().map(|e| &e.id)
    }

    /// Update the hover target for a pointer at `point`.
    ///
    /// The first marker containing the point becomes the target; if none
    /// does, any previous target is cleared. Returns whether the target
    /// changed, so the caller knows whether to repaint.
    pub fn pointer_moved<V: Viewport + ?Sized>(
        &mut self,
        events: &EventSet,
        viewport: &V,
        point: ScreenPoint,
    ) -> bool {
        let hit = marker_at(events, viewport, point);
        let previous = self.target_id().cloned();

        match hit {
            Some(event) => {
                if previous.as_ref() == Some(&event.id) {
                    // Keep the freshest copy in case a refresh replaced it.
                    self.target = Some(event.clone());
                    return false;
                }
                debug!(event_id = %event.id, "set hover event");
                self.target = Some(event.clone());
                true
            }
            None => {
                let Some(previous) = previous else {
                    return false;
                };
                debug!(event_id = %previous, "unset hover event");
                self.target = None;
                true
            }
        }
    }

    /// Consume the hover target on a click.
    ///
    /// Returns the identifier of the event to open, or `None` when nothing
    /// was hovered (the click was not handled).
    pub fn clicked(&mut self) -> Option<EventId> {
        self.target.take().map(|event| event.id)
    }

    /// Drop the hover target. Returns whether one was set.
    pub fn clear(&mut self) -> bool {
        self.target.take().is_some()
    }
}
