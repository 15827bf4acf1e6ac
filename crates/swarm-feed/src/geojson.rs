//! `GeoJSON` catalog decoding.
//!
//! Decodes the feature-collection format served by the USGS real-time
//! feeds (and written by most catalog exporters):
//!
//! ```json
//! {"type": "FeatureCollection", "features": [
//!   {"id": "us7000abcd",
//!    "properties": {"mag": 4.6, "magType": "mb", "time": 1700000000000, "place": "..."},
//!    "geometry": {"type": "Point", "coordinates": [lon, lat, depth_km]}}
//! ]}
//! ```
//!
//! A document that is not a feature collection fails as a whole. A single
//! malformed feature is skipped and counted; the rest of the catalog is
//! still returned.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use swarm_types::{Event, EventId, EventSet, Magnitude, Origin};
use tracing::debug;

use crate::error::FeedError;

/// Meters per kilometer; `GeoJSON` depths are in kilometers.
const METERS_PER_KM: f64 = 1000.0;

/// Magnitude type used when a feature does not report one.
const UNKNOWN_MAGNITUDE_TYPE: &str = "M";

/// A decoded catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCatalog {
    /// Well-formed events keyed by identifier.
    pub events: EventSet,
    /// Number of features that were skipped as malformed.
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    features: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    properties: RawProperties,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProperties {
    #[serde(default)]
    mag: Option<f64>,
    #[serde(default, rename = "magType")]
    mag_type: Option<String>,
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    place: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    coordinates: Vec<Option<f64>>,
}

/// Decode a `GeoJSON` feature collection.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] if the document is not JSON or has no
/// `features` array.
pub fn parse_catalog(body: &str) -> Result<ParsedCatalog, FeedError> {
    let collection: RawCollection =
        serde_json::from_str(body).map_err(|e| FeedError::Parse {
            message: e.to_string(),
        })?;

    let mut catalog = ParsedCatalog::default();
    for value in collection.features {
        match decode_feature(value) {
            Ok(event) => {
                catalog.events.insert(event.id.clone(), event);
            }
            Err(reason) => {
                debug!(reason, "skipping malformed catalog feature");
                catalog.skipped = catalog.skipped.saturating_add(1);
            }
        }
    }
    Ok(catalog)
}

/// Decode one feature, or say why it is malformed.
fn decode_feature(value: serde_json::Value) -> Result<Event, &'static str> {
    let raw: RawFeature = serde_json::from_value(value)
        .ok()
        .ok_or("unexpected shape")?;

    let id = raw
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or("missing id")?;

    let origin = raw
        .geometry
        .map(|geometry| decode_origin(&geometry, raw.properties.time))
        .transpose()?;

    let magnitude = raw.properties.mag.filter(|m| m.is_finite()).map(|value| Magnitude {
        value,
        magnitude_type: raw
            .properties
            .mag_type
            .unwrap_or_else(|| UNKNOWN_MAGNITUDE_TYPE.to_owned()),
        uncertainty: None,
    });

    Ok(Event {
        id: EventId::new(id),
        preferred_origin: origin,
        preferred_magnitude: magnitude,
        description: raw.properties.place.or(raw.properties.title),
    })
}

fn decode_origin(geometry: &RawGeometry, time_ms: Option<i64>) -> Result<Origin, &'static str> {
    let mut coords = geometry.coordinates.iter().copied();
    let lon = coords.next().flatten().ok_or("missing longitude")?;
    let lat = coords.next().flatten().ok_or("missing latitude")?;
    let depth_km = coords.next().flatten().unwrap_or(f64::NAN);

    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err("coordinates out of range");
    }
    let time: DateTime<Utc> = time_ms
        .and_then(DateTime::from_timestamp_millis)
        .ok_or("missing or invalid origin time")?;

    Ok(Origin::new(lon, lat, depth_km * METERS_PER_KM, time))
}
