//! RGBA colors and the marker palette.

use serde::{Deserialize, Serialize};

/// Alpha shared by every marker color so overlapping markers stay visible.
const MARKER_ALPHA: u8 = 200;

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Marker red.
    pub const RED: Self = Self::new(200, 0, 0, MARKER_ALPHA);
    /// Marker orange.
    pub const ORANGE: Self = Self::new(225, 175, 0, MARKER_ALPHA);
    /// Marker yellow.
    pub const YELLOW: Self = Self::new(225, 225, 0, MARKER_ALPHA);
    /// Marker green, also the hover highlight.
    pub const GREEN: Self = Self::new(0, 200, 0, MARKER_ALPHA);
    /// Marker blue.
    pub const BLUE: Self = Self::new(0, 0, 200, MARKER_ALPHA);
    /// Marker purple.
    pub const PURPLE: Self = Self::new(200, 0, 200, MARKER_ALPHA);
    /// Neutral light grey, used for unknown depth, old events, and legend
    /// backgrounds.
    pub const WHITE: Self = Self::new(200, 200, 200, MARKER_ALPHA);
    /// Legend text.
    pub const BLACK: Self = Self::new(0, 0, 0, MARKER_ALPHA);
    /// Translucent popup background.
    pub const POPUP_BACKGROUND: Self = Self::new(0, 0, 0, 128);

    /// Hex notation, `#rrggbbaa`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}
