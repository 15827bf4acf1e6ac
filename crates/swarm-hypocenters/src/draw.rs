//! Draw-command generation.
//!
//! Rendering is split in two: this module turns the cache, hover state,
//! and viewport into a flat list of [`DrawCommand`]s, and a
//! toolkit-specific renderer paints them. Nothing here touches a graphics
//! context, so everything is unit-testable.

use chrono::{DateTime, Utc};
use swarm_types::{AgeBand, ColorMode, DepthBand, Event, EventId, EventSet, Rgba};

use crate::style::{age_color, depth_color, marker_diameter, marker_style};
use crate::viewport::{ScreenPoint, Viewport, marker_position};

/// Padding inside the hover popup, in pixels.
pub const POPUP_PADDING: f64 = 2.0;

/// Estimated text line height used to keep the popup on screen. The
/// renderer measures real text; this only decides which side of the marker
/// the popup opens on.
const POPUP_LINE_HEIGHT: f64 = 12.0;

/// Gap between popup lines, in pixels.
const POPUP_LINE_GAP: f64 = 2.0;

/// Estimated glyph advance, used like [`POPUP_LINE_HEIGHT`] to keep the
/// popup from running off the right edge.
const POPUP_CHAR_WIDTH: f64 = 7.0;

/// Magnitude whose diameter is used for legend color swatches.
const LEGEND_SWATCH_MAGNITUDE: f64 = 3.0;

/// Magnitudes shown in the legend's size key.
const LEGEND_MAGNITUDES: std::ops::RangeInclusive<u32> = 1..=7;

/// Settings the host supplies for each render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// What marker color encodes.
    pub color_mode: ColorMode,
    /// Whether to emit a legend.
    pub legend_enabled: bool,
}

/// A single thing for the renderer to paint.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A filled circle for one event.
    Marker {
        /// Event the marker belongs to.
        id: EventId,
        /// Top-left corner of the circle's bounding square.
        top_left: ScreenPoint,
        /// Circle diameter in pixels.
        diameter: u32,
        /// Fill color.
        color: Rgba,
    },
    /// Text box describing the hovered event.
    Popup(Popup),
    /// Color and size key in the bottom-left corner of the plot.
    Legend(Legend),
}

/// Hover popup contents and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    /// Bottom-left corner of the popup box.
    pub anchor: ScreenPoint,
    /// Text lines, top to bottom.
    pub lines: Vec<String>,
    /// Box fill.
    pub background: Rgba,
}

/// A labelled color swatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    /// Label drawn next to the swatch.
    pub label: &'static str,
    /// Swatch color.
    pub color: Rgba,
}

/// A magnitude and the marker diameter it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagnitudeEntry {
    /// Whole magnitude.
    pub magnitude: u32,
    /// Marker diameter in pixels.
    pub diameter: u32,
}

/// Legend for the active color mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    /// Mode the color entries describe.
    pub mode: ColorMode,
    /// Title above the color entries.
    pub title: &'static str,
    /// Diameter of each color swatch.
    pub swatch_diameter: u32,
    /// Color key.
    pub entries: Vec<LegendEntry>,
    /// Size key.
    pub magnitudes: Vec<MagnitudeEntry>,
    /// Box fill.
    pub background: Rgba,
}

/// Build the legend for a color mode.
pub fn legend(mode: ColorMode) -> Legend {
    let (title, entries) = match mode {
        ColorMode::Depth => (
            "Depth (km):",
            DepthBand::LEGEND
                .iter()
                .map(|band| LegendEntry {
                    label: band.label(),
                    color: depth_color(*band),
                })
                .collect(),
        ),
        ColorMode::Age => (
            "Age:",
            AgeBand::LEGEND
                .iter()
                .map(|band| LegendEntry {
                    label: band.label(),
                    color: age_color(*band),
                })
                .collect(),
        ),
    };
    Legend {
        mode,
        title,
        swatch_diameter: marker_diameter(Some(LEGEND_SWATCH_MAGNITUDE)),
        entries,
        magnitudes: LEGEND_MAGNITUDES
            .map(|magnitude| MagnitudeEntry {
                magnitude,
                diameter: marker_diameter(Some(f64::from(magnitude))),
            })
            .collect(),
        background: Rgba::WHITE,
    }
}

/// Text lines describing an event: magnitude and depth, origin time, and
/// description.
pub fn popup_lines(event: &Event) -> Vec<String> {
    let mut lines = Vec::with_capacity(3);
    let origin = event.preferred_origin.as_ref();

    if let Some(magnitude) = event.preferred_magnitude.as_ref() {
        let depth_km = origin.map_or(f64::NAN, swarm_types::Origin::depth_km);
        lines.push(format!(
            "{:.2} {} at {:.2} km depth",
            magnitude.value, magnitude.magnitude_type, depth_km
        ));
    }
    if let Some(origin) = origin {
        lines.push(format!("{} UTC", origin.time.format("%Y-%m-%d %H:%M:%S")));
    }
    if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(description.to_owned());
    }
    lines
}

/// Estimated popup height for a number of lines.
fn popup_height(line_count: usize) -> f64 {
    let lines = f64::from(u32::try_from(line_count).unwrap_or(u32::MAX));
    lines * (POPUP_LINE_HEIGHT + POPUP_LINE_GAP) + 2.0 * POPUP_PADDING
}

/// Estimated popup width for the longest of `lines`.
fn popup_width(lines: &[String]) -> f64 {
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let chars = f64::from(u32::try_from(longest).unwrap_or(u32::MAX));
    chars * POPUP_CHAR_WIDTH + 2.0 * POPUP_PADDING
}

/// Popup for the hovered event, or `None` if it cannot be placed.
///
/// Opens below the marker near the top edge and shifts left near the right
/// edge, but never past the left inset.
fn popup<V: Viewport + ?Sized>(viewport: &V, event: &Event) -> Option<Popup> {
    let range = viewport.visible_range()?;
    let (_, position) = marker_position(viewport, &range, event)?;
    let lines = popup_lines(event);
    let height = popup_height(lines.len());
    let width = popup_width(&lines);
    let px = viewport.pixel_extents();

    let mut anchor = position;
    if anchor.y < px.inset + height {
        anchor.y += height;
    }
    let right_limit = px.inset + px.width - width + POPUP_PADDING;
    if anchor.x > right_limit {
        anchor.x = right_limit.max(px.inset);
    }
    Some(Popup {
        anchor,
        lines,
        background: Rgba::POPUP_BACKGROUND,
    })
}

/// Build every draw command for one render pass.
///
/// Markers come first in `events` order, then the popup for `hover` (if
/// it is still displayed), then the legend. An empty event set produces no commands at all.
pub fn build_draw_commands<V: Viewport + ?Sized>(
    events: &EventSet,
    hover: Option<&Event>,
    options: RenderOptions,
    viewport: &V,
    now: DateTime<Utc>,
) -> Vec<DrawCommand> {
    if events.is_empty() {
        return Vec::new();
    }
    let Some(range) = viewport.visible_range() else {
        return Vec::new();
    };

    let hover_id = hover.map(|e| &e.id);
    let mut commands: Vec<DrawCommand> = events
        .values()
        .filter_map(|event| {
            let (_, top_left) = marker_position(viewport, &range, event)?;
            let style = marker_style(event, hover_id, options.color_mode, now);
            Some(DrawCommand::Marker {
                id: event.id.clone(),
                top_left,
                diameter: style.diameter,
                color: style.color,
            })
        })
        .collect();

    // A hover target that a refresh dropped gets no popup.
    if let Some(hovered) = hover.and_then(|h| events.get(&h.id)) {
        if let Some(popup) = popup(viewport, hovered) {
            commands.push(DrawCommand::Popup(popup));
        }
    }
    if options.legend_enabled {
        commands.push(DrawCommand::Legend(legend(options.color_mode)));
    }
    commands
}
