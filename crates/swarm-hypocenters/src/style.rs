//! Marker styling policy.
//!
//! A pure function of the event, the current hover target, the color mode,
//! and "now" decides each marker's diameter and color. Callers read the
//! wall clock once per render pass and pass it in, so every marker in a
//! pass is aged against the same instant and tests are reproducible.

use chrono::{DateTime, Utc};
use swarm_types::{AgeBand, ColorMode, DepthBand, Event, EventId, Rgba};

/// Marker diameters in pixels, indexed by whole magnitude units.
pub const MARKER_DIAMETERS: [u32; 11] = [5, 7, 9, 11, 13, 17, 21, 25, 29, 33, 37];

/// Diameter used when an event has no usable magnitude.
pub const DEFAULT_DIAMETER: u32 = 5;

/// Highest magnitude bucket; larger magnitudes clamp to it.
const LAST_BUCKET: u32 = 10;

/// Color of the marker under the pointer.
pub const HOVER_COLOR: Rgba = Rgba::GREEN;

/// Color for markers whose band carries no information.
pub const NEUTRAL_COLOR: Rgba = Rgba::WHITE;

/// How a single marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Diameter in pixels.
    pub diameter: u32,
    /// Fill color.
    pub color: Rgba,
}

/// Marker diameter for a magnitude.
///
/// The bucket is `floor(max(magnitude, 0))`, clamped to the last bucket.
/// Missing or NaN magnitudes get [`DEFAULT_DIAMETER`].
pub fn marker_diameter(magnitude: Option<f64>) -> u32 {
    let Some(value) = magnitude.filter(|m| !m.is_nan()) else {
        return DEFAULT_DIAMETER;
    };
    let bucket = (1..=LAST_BUCKET)
        .take_while(|threshold| value >= f64::from(*threshold))
        .count();
    MARKER_DIAMETERS
        .get(bucket)
        .copied()
        .unwrap_or(DEFAULT_DIAMETER)
}

/// Palette color for a depth band.
pub const fn depth_color(band: DepthBand) -> Rgba {
    match band {
        DepthBand::Unknown => NEUTRAL_COLOR,
        DepthBand::AboveSeaLevel => Rgba::RED,
        DepthBand::Shallow => Rgba::ORANGE,
        DepthBand::UpperCrust => Rgba::YELLOW,
        DepthBand::MidCrust => Rgba::GREEN,
        DepthBand::LowerCrust => Rgba::BLUE,
        DepthBand::Deep => Rgba::PURPLE,
    }
}

/// Palette color for an age band.
pub const fn age_color(band: AgeBand) -> Rgba {
    match band {
        AgeBand::LastHour => Rgba::RED,
        AgeBand::LastDay => Rgba::ORANGE,
        AgeBand::LastWeek => Rgba::YELLOW,
        AgeBand::Older => NEUTRAL_COLOR,
    }
}

/// Marker color for an event. The hover target always gets
/// [`HOVER_COLOR`]; events without an origin are neutral.
pub fn marker_color(
    event: &Event,
    hover: Option<&EventId>,
    mode: ColorMode,
    now: DateTime<Utc>,
) -> Rgba {
    if hover == Some(&event.id) {
        return HOVER_COLOR;
    }
    let Some(origin) = event.preferred_origin.as_ref() else {
        return NEUTRAL_COLOR;
    };
    match mode {
        ColorMode::Depth => depth_color(DepthBand::from_depth_km(origin.depth_km())),
        ColorMode::Age => age_color(AgeBand::from_age(now.signed_duration_since(origin.time))),
    }
}

/// Full marker style for an event.
pub fn marker_style(
    event: &Event,
    hover: Option<&EventId>,
    mode: ColorMode,
    now: DateTime<Utc>,
) -> MarkerStyle {
    MarkerStyle {
        diameter: marker_diameter(event.magnitude_value()),
        color: marker_color(event, hover, mode, now),
    }
}
