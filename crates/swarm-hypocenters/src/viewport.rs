//! Viewport abstraction and screen placement.
//!
//! The host map owns the projection and the visible region; this crate
//! only consumes them through [`Viewport`]. [`screen_position`] converts a
//! geographic point to pixel coordinates, and is used by both drawing and
//! hit-testing so a marker is always tested where it is drawn.

use swarm_types::{Event, GeoRange, Origin};

/// A point in the projected plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    /// Projected x.
    pub x: f64,
    /// Projected y.
    pub y: f64,
}

/// A point in screen pixels, origin at the top-left of the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Pixels from the left edge.
    pub x: f64,
    /// Pixels from the top edge.
    pub y: f64,
}

impl ScreenPoint {
    /// Create a screen point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the plot area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelExtents {
    /// Plot width.
    pub width: f64,
    /// Plot height.
    pub height: f64,
    /// Offset of the plot from the panel's top-left corner.
    pub inset: f64,
}

/// Bounds of the visible region in the projected plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedExtents {
    /// Smallest projected x.
    pub min_x: f64,
    /// Largest projected x.
    pub max_x: f64,
    /// Smallest projected y.
    pub min_y: f64,
    /// Largest projected y.
    pub max_y: f64,
}

/// The map surface markers are placed on.
pub trait Viewport {
    /// Project a geographic point.
    fn forward(&self, lon: f64, lat: f64) -> ProjectedPoint;

    /// The visible geographic region, or `None` before the map is laid out.
    fn visible_range(&self) -> Option<GeoRange>;

    /// Plot size in pixels.
    fn pixel_extents(&self) -> PixelExtents;

    /// Projected bounds of the visible region.
    fn projected_extents(&self) -> ProjectedExtents;
}

/// Convert a geographic point to screen pixels.
///
/// Returns `None` when the projected extents are degenerate.
pub fn screen_position<V: Viewport + ?Sized>(viewport: &V, lon: f64, lat: f64) -> Option<ScreenPoint> {
    let projected = viewport.forward(lon, lat);
    let ext = viewport.projected_extents();
    let px = viewport.pixel_extents();

    let dx = ext.max_x - ext.min_x;
    let dy = ext.max_y - ext.min_y;
    if dx.abs() < f64::EPSILON || dy.abs() < f64::EPSILON {
        return None;
    }
    Some(ScreenPoint {
        x: (projected.x - ext.min_x) / dx * px.width + px.inset,
        y: (1.0 - (projected.y - ext.min_y) / dy) * px.height + px.inset,
    })
}

/// Screen position of an event's marker, if it has an origin inside
/// `range`.
pub fn marker_position<'e, V: Viewport + ?Sized>(
    viewport: &V,
    range: &GeoRange,
    event: &'e Event,
) -> Option<(&'e Origin, ScreenPoint)> {
    let origin = event.preferred_origin.as_ref()?;
    if !range.contains(origin.longitude, origin.latitude) {
        return None;
    }
    screen_position(viewport, origin.longitude, origin.latitude).map(|p| (origin, p))
}

/// Equirectangular viewport over a geographic range.
///
/// Longitude and latitude map linearly to the plane. With latitude scaling
/// enabled, longitudes are multiplied by the cosine of the range's center
/// latitude so regional maps keep a sensible aspect.
#[derive(Debug, Clone, PartialEq)]
pub struct EquirectangularViewport {
    range: GeoRange,
    pixels: PixelExtents,
    scale_by_latitude: bool,
    lon_scale: f64,
}

impl EquirectangularViewport {
    /// Create a viewport showing `range` in a plot of the given pixel size.
    pub const fn new(range: GeoRange, pixels: PixelExtents) -> Self {
        Self {
            range,
            pixels,
            scale_by_latitude: false,
            lon_scale: 1.0,
        }
    }

    /// Scale longitudes by `cos(center latitude)`.
    #[must_use]
    pub fn with_latitude_scaling(mut self) -> Self {
        self.scale_by_latitude = true;
        self.lon_scale = self.range.center().1.to_radians().cos();
        self
    }

    /// Show a different region, keeping the pixel size.
    pub fn set_range(&mut self, range: GeoRange) {
        self.range = range;
        if self.scale_by_latitude {
            self.lon_scale = range.center().1.to_radians().cos();
        }
    }

    /// The region currently shown.
    pub const fn range(&self) -> GeoRange {
        self.range
    }

    /// Longitude unwrapped past the antimeridian so it is monotonic across
    /// a wrapping range.
    fn unwrap_lon(&self, lon: f64) -> f64 {
        if self.range.wraps() && lon < self.range.west {
            lon + 360.0
        } else {
            lon
        }
    }
}

impl Viewport for EquirectangularViewport {
    fn forward(&self, lon: f64, lat: f64) -> ProjectedPoint {
        ProjectedPoint {
            x: self.unwrap_lon(lon) * self.lon_scale,
            y: lat,
        }
    }

    fn visible_range(&self) -> Option<GeoRange> {
        Some(self.range)
    }

    fn pixel_extents(&self) -> PixelExtents {
        self.pixels
    }

    fn projected_extents(&self) -> ProjectedExtents {
        ProjectedExtents {
            min_x: self.range.west * self.lon_scale,
            max_x: (self.range.west + self.range.width()) * self.lon_scale,
            min_y: self.range.south,
            max_y: self.range.north,
        }
    }
}
