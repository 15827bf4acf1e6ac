//! Geographic bounding boxes.
//!
//! A [`GeoRange`] is the unit the host viewport works in: the visible
//! region of the map, and the region the map recenters on after an
//! import. Longitudes may wrap the antimeridian (`west > east`).

use serde::{Deserialize, Serialize};

/// Latitude limit used when padding a range.
const MAX_LATITUDE: f64 = 90.0;

/// Longitude limit used when padding a range.
const MAX_LONGITUDE: f64 = 180.0;

/// Degrees in a full turn of longitude.
const FULL_TURN: f64 = 360.0;

/// A longitude/latitude bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoRange {
    /// Western bound (longitude).
    pub west: f64,
    /// Eastern bound (longitude).
    pub east: f64,
    /// Southern bound (latitude).
    pub south: f64,
    /// Northern bound (latitude).
    pub north: f64,
}

impl GeoRange {
    /// Create a range from its bounds.
    pub const fn new(west: f64, east: f64, south: f64, north: f64) -> Self {
        Self {
            west,
            east,
            south,
            north,
        }
    }

    /// The whole globe.
    pub const fn world() -> Self {
        Self::new(-MAX_LONGITUDE, MAX_LONGITUDE, -MAX_LATITUDE, MAX_LATITUDE)
    }

    /// A range of at least `min_extent` degrees on each axis centered on
    /// a single point.
    pub fn from_point(lon: f64, lat: f64, min_extent: f64) -> Self {
        let half = min_extent / 2.0;
        Self::new(lon - half, lon + half, lat - half, lat + half)
    }

    /// Whether the range crosses the antimeridian.
    pub fn wraps(&self) -> bool {
        self.west > self.east
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        if self.wraps() {
            self.east + FULL_TURN - self.west
        } else {
            self.east - self.west
        }
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Center point as `(lon, lat)`.
    pub fn center(&self) -> (f64, f64) {
        let mut lon = self.west + self.width() / 2.0;
        if lon > MAX_LONGITUDE {
            lon -= FULL_TURN;
        }
        (lon, self.south + self.height() / 2.0)
    }

    /// Whether a point lies inside the range (bounds inclusive).
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if lat < self.south || lat > self.north {
            return false;
        }
        self.contains_lon(lon)
    }

    /// Grow the range to include a point, keeping each axis at least
    /// `min_extent` degrees wide.
    ///
    /// A point outside the longitude span extends whichever side reaches it
    /// sooner, so points on both sides of the antimeridian produce a
    /// narrow wrapping range rather than one spanning the globe.
    pub fn include_point(&mut self, lon: f64, lat: f64, min_extent: f64) {
        if !self.contains_lon(lon) {
            let eastward = (lon - self.east).rem_euclid(FULL_TURN);
            let westward = (self.west - lon).rem_euclid(FULL_TURN);
            if eastward <= westward {
                self.east = lon;
            } else {
                self.west = lon;
            }
        }
        self.south = self.south.min(lat);
        self.north = self.north.max(lat);

        self.ensure_min_extent(min_extent);
    }

    /// Grow each axis symmetrically until it spans at least `min_extent`
    /// degrees.
    pub fn ensure_min_extent(&mut self, min_extent: f64) {
        let width = self.width();
        if width < min_extent {
            let grow = (min_extent - width) / 2.0;
            self.set_lon_bounds(self.west - grow, self.east + grow, min_extent);
        }
        let height = self.height();
        if height < min_extent {
            let grow = (min_extent - height) / 2.0;
            self.south -= grow;
            self.north += grow;
        }
    }

    /// Move each bound outward by a fraction of the span on its axis.
    ///
    /// Longitudes wrap across the antimeridian; once the padded span
    /// reaches a full turn the range becomes the whole globe in longitude.
    /// Latitudes are clamped to the poles.
    pub fn pad_percent(&mut self, lon_fraction: f64, lat_fraction: f64) {
        let width = self.width();
        let dx = width * lon_fraction;
        let dy = self.height() * lat_fraction;
        self.set_lon_bounds(self.west - dx, self.east + dx, width + 2.0 * dx);
        self.south = (self.south - dy).max(-MAX_LATITUDE);
        self.north = (self.north + dy).min(MAX_LATITUDE);
    }

    fn contains_lon(&self, lon: f64) -> bool {
        if self.wraps() {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        }
    }

    /// Store longitude bounds spanning `span` degrees, normalized into
    /// `[-180, 180]`.
    fn set_lon_bounds(&mut self, west: f64, east: f64, span: f64) {
        if span >= FULL_TURN {
            self.west = -MAX_LONGITUDE;
            self.east = MAX_LONGITUDE;
        } else {
            self.west = normalize_lon(west);
            self.east = normalize_lon(east);
        }
    }
}

/// Bring a longitude into `[-180, 180]`.
fn normalize_lon(lon: f64) -> f64 {
    if lon > MAX_LONGITUDE {
        lon - FULL_TURN
    } else if lon < -MAX_LONGITUDE {
        lon + FULL_TURN
    } else {
        lon
    }
}

impl Default for GeoRange {
    fn default() -> Self {
        Self::world()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn contains_is_inclusive() {
        let range = GeoRange::new(-10.0, 10.0, -5.0, 5.0);
        assert!(range.contains(10.0, 5.0));
        assert!(range.contains(0.0, 0.0));
        assert!(!range.contains(10.1, 0.0));
        assert!(!range.contains(0.0, -5.1));
    }

    #[test]
    fn contains_across_antimeridian() {
        let range = GeoRange::new(170.0, -170.0, -10.0, 10.0);
        assert!(range.wraps());
        assert!(range.contains(175.0, 0.0));
        assert!(range.contains(-175.0, 0.0));
        assert!(!range.contains(0.0, 0.0));
        assert!(approx(range.width(), 20.0));
    }

    #[test]
    fn include_point_enforces_min_extent() {
        let mut range = GeoRange::from_point(10.0, 20.0, 0.1);
        assert!(approx(range.width(), 0.1));
        range.include_point(10.0, 20.0, 0.1);
        assert!(approx(range.width(), 0.1));
        range.include_point(12.0, 21.0, 0.1);
        assert!(approx(range.east, 12.0));
        assert!(approx(range.north, 21.0));
        assert!(range.contains(10.0, 20.0));
    }

    #[test]
    fn single_point_range_reaches_min_extent() {
        let mut range = GeoRange::new(5.0, 5.0, 5.0, 5.0);
        range.ensure_min_extent(1.0);
        assert!(approx(range.west, 4.5));
        assert!(approx(range.north, 5.5));
    }

    #[test]
    fn pad_percent_grows_each_side() {
        let mut range = GeoRange::new(0.0, 10.0, 0.0, 4.0);
        range.pad_percent(0.5, 0.5);
        assert!(approx(range.west, -5.0));
        assert!(approx(range.east, 15.0));
        assert!(approx(range.south, -2.0));
        assert!(approx(range.north, 6.0));
    }

    #[test]
    fn pad_percent_clamps_to_globe() {
        let mut range = GeoRange::new(-170.0, 170.0, -80.0, 80.0);
        range.pad_percent(0.5, 0.5);
        assert_eq!(range, GeoRange::world());
    }

    #[test]
    fn include_point_takes_the_short_way_across_the_antimeridian() {
        let mut range = GeoRange::new(179.0, 179.0, 10.0, 10.0);
        range.include_point(-179.0, 11.0, 0.0);
        assert!(range.wraps());
        assert!(approx(range.west, 179.0));
        assert!(approx(range.east, -179.0));
        assert!(approx(range.width(), 2.0));

        range.pad_percent(0.5, 0.5);
        assert!(approx(range.west, 178.0));
        assert!(approx(range.east, -178.0));
        assert!(range.contains(180.0, 10.5));
    }

    #[test]
    fn include_point_extends_the_nearer_side() {
        let mut range = GeoRange::new(10.0, 12.0, 0.0, 1.0);
        range.include_point(8.0, 0.5, 0.0);
        assert!(approx(range.west, 8.0));
        assert!(approx(range.east, 12.0));
        range.include_point(11.0, 0.5, 0.0);
        assert!(approx(range.width(), 4.0));
    }

    #[test]
    fn pad_percent_wraps_past_the_antimeridian() {
        let mut range = GeoRange::new(175.0, 179.0, 0.0, 1.0);
        range.pad_percent(0.5, 0.0);
        assert!(range.wraps());
        assert!(approx(range.west, 173.0));
        assert!(approx(range.east, -179.0));
    }

    #[test]
    fn center_of_simple_range() {
        let (lon, lat) = GeoRange::new(0.0, 10.0, -4.0, 4.0).center();
        assert!(approx(lon, 5.0));
        assert!(approx(lat, 0.0));
    }
}
