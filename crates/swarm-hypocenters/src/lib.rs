//! Core of the Swarm hypocenter map layer.
//!
//! This crate owns everything between the remote event feed and the
//! renderer: it keeps the set of events to display, decides how each marker
//! looks, tracks which marker is under the pointer, and turns all of that
//! into toolkit-agnostic draw commands.
//!
//! # Modules
//!
//! - [`cache`] -- Copy-on-write event cache merging feed snapshots with
//!   imported events.
//! - [`config`] -- Configuration loading from `swarm-config.yaml` into
//!   strongly-typed structs.
//! - [`draw`] -- Pure draw-command generation (markers, popup, legend).
//! - [`hover`] -- Pointer hit-testing and single-selection hover state.
//! - [`layer`] -- [`HypocenterLayer`] wiring and the [`LayerObserver`] trait.
//! - [`style`] -- Marker diameter and color policy.
//! - [`viewport`] -- [`Viewport`] trait and screen placement.
//!
//! [`HypocenterLayer`]: layer::HypocenterLayer
//! [`LayerObserver`]: layer::LayerObserver
//! [`Viewport`]: viewport::Viewport

pub mod cache;
pub mod config;
pub mod draw;
pub mod hover;
pub mod layer;
pub mod style;
pub mod viewport;
