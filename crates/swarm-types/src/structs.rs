//! Core event records.
//!
//! An [`Event`] is a cataloged seismic event. Catalogs may carry several
//! candidate origins and magnitudes per event; only the *preferred* one of
//! each is kept here because that is the one the map displays.
//!
//! Events are immutable once built from feed data. A refresh replaces them
//! wholesale rather than patching fields.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EventId;

/// Events keyed by their catalog identifier.
pub type EventSet = BTreeMap<EventId, Event>;

/// Meters per kilometer, used when converting origin depths.
const METERS_PER_KM: f64 = 1000.0;

/// A hypothesized location and time solution for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Depth below sea level in meters. Negative above sea level, NaN when
    /// the catalog does not report one.
    pub depth_m: f64,
    /// Origin time.
    pub time: DateTime<Utc>,
}

impl Origin {
    /// Create an origin.
    pub const fn new(longitude: f64, latitude: f64, depth_m: f64, time: DateTime<Utc>) -> Self {
        Self {
            longitude,
            latitude,
            depth_m,
            time,
        }
    }

    /// Depth in kilometers (NaN propagates).
    pub fn depth_km(&self) -> f64 {
        self.depth_m / METERS_PER_KM
    }
}

/// A magnitude estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Magnitude {
    /// Magnitude value.
    pub value: f64,
    /// Magnitude type label, e.g. `Mw` or `ml`.
    pub magnitude_type: String,
    /// Uncertainty text (e.g. `±0.2`), when reported.
    #[serde(default)]
    pub uncertainty: Option<String>,
}

impl Magnitude {
    /// Create a magnitude without an uncertainty.
    pub fn new(value: f64, magnitude_type: impl Into<String>) -> Self {
        Self {
            value,
            magnitude_type: magnitude_type.into(),
            uncertainty: None,
        }
    }
}

/// A cataloged seismic event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Catalog identifier (`publicId`).
    pub id: EventId,
    /// The preferred origin, if the catalog designates one.
    #[serde(default)]
    pub preferred_origin: Option<Origin>,
    /// The preferred magnitude, if the catalog designates one.
    #[serde(default)]
    pub preferred_magnitude: Option<Magnitude>,
    /// Free-form description, typically a place name.
    #[serde(default)]
    pub description: Option<String>,
}

impl Event {
    /// Create an event with no origin, magnitude, or description.
    pub fn new(id: impl Into<EventId>) -> Self {
        Self {
            id: id.into(),
            preferred_origin: None,
            preferred_magnitude: None,
            description: None,
        }
    }

    /// Attach a preferred origin.
    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.preferred_origin = Some(origin);
        self
    }

    /// Attach a preferred magnitude.
    #[must_use]
    pub fn with_magnitude(mut self, magnitude: Magnitude) -> Self {
        self.preferred_magnitude = Some(magnitude);
        self
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Preferred magnitude value, if any.
    pub fn magnitude_value(&self) -> Option<f64> {
        self.preferred_magnitude.as_ref().map(|m| m.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_converts_to_km() {
        let origin = Origin::new(10.0, 20.0, 3000.0, Utc::now());
        assert!((origin.depth_km() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_depth_stays_nan() {
        let origin = Origin::new(10.0, 20.0, f64::NAN, Utc::now());
        assert!(origin.depth_km().is_nan());
    }

    #[test]
    fn builder_sets_fields() {
        let event = Event::new("a")
            .with_magnitude(Magnitude::new(4.2, "Mw"))
            .with_description("Near Somewhere");
        assert_eq!(event.id.as_str(), "a");
        assert_eq!(event.description.as_deref(), Some("Near Somewhere"));
        assert!(event.preferred_origin.is_none());
        assert!(event.magnitude_value().is_some_and(|m| (m - 4.2).abs() < 1e-9));
    }
}
