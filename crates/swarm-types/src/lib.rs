//! Shared type definitions for the Swarm hypocenter map.
//!
//! This crate is the single source of truth for the event model used across
//! the workspace: the feed client produces these values, the hypocenter
//! layer caches and styles them.
//!
//! # Modules
//!
//! - [`ids`] -- Catalog identifier wrapper (`publicId`)
//! - [`structs`] -- Event, origin, and magnitude records
//! - [`enums`] -- Color mode and depth/age band classifications
//! - [`geo`] -- Geographic bounding boxes
//! - [`color`] -- RGBA colors and the marker palette

pub mod color;
pub mod enums;
pub mod geo;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use color::Rgba;
pub use enums::{AgeBand, ColorMode, DepthBand};
pub use geo::GeoRange;
pub use ids::EventId;
pub use structs::{Event, EventSet, Magnitude, Origin};
