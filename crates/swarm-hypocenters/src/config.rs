//! Configuration loading and typed config structures for the hypocenter map.
//!
//! The configuration lives in `swarm-config.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure, and provides a
//! loader that reads and validates the file.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use swarm_types::{ColorMode, GeoRange};

/// Base URL of the USGS real-time `GeoJSON` summary feeds.
const USGS_FEED_BASE: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SwarmConfig {
    /// Hypocenter layer and feed settings.
    #[serde(default)]
    pub hypocenters: HypocenterConfig,

    /// Initial map viewport.
    #[serde(default)]
    pub map: MapConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SwarmConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `SWARM_HYPOCENTER_SOURCE` overrides `hypocenters.source`
    /// - `SWARM_HYPOCENTER_URL` sets `hypocenters.url` and switches the
    ///   source to `custom`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides and validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.hypocenters.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without consulting the
    /// environment. Validation still runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] or [`ConfigError::Invalid`].
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hypocenters.source == HypocenterSource::Custom && self.hypocenters.url.is_none() {
            return Err(ConfigError::Invalid {
                reason: "hypocenters.url is required when source is custom".to_owned(),
            });
        }
        if self.hypocenters.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                reason: "hypocenters.refresh_interval_secs must be at least 1".to_owned(),
            });
        }
        if self.map.width_px == 0 || self.map.height_px == 0 {
            return Err(ConfigError::Invalid {
                reason: "map.width_px and map.height_px must be non-zero".to_owned(),
            });
        }
        if self.map.south >= self.map.north {
            return Err(ConfigError::Invalid {
                reason: "map.south must be below map.north".to_owned(),
            });
        }
        Ok(())
    }
}

/// Which remote catalog feeds the hypocenter layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HypocenterSource {
    /// No remote feed; the layer only shows imported events.
    None,
    /// USGS, all magnitudes, past hour.
    UsgsHourAll,
    /// USGS, all magnitudes, past day.
    UsgsDayAll,
    /// USGS, M1.0+, past day.
    #[default]
    UsgsDayM1,
    /// USGS, M2.5+, past week.
    #[serde(rename = "usgs_week_m2_5")]
    UsgsWeekM25,
    /// USGS, M4.5+, past month.
    #[serde(rename = "usgs_month_m4_5")]
    UsgsMonthM45,
    /// A user-supplied `GeoJSON` endpoint (`hypocenters.url`).
    Custom,
}

impl HypocenterSource {
    /// Feed URL for the built-in sources. `None` and `Custom` have no
    /// built-in URL.
    pub fn builtin_url(self) -> Option<String> {
        let file = match self {
            Self::None | Self::Custom => return None,
            Self::UsgsHourAll => "all_hour.geojson",
            Self::UsgsDayAll => "all_day.geojson",
            Self::UsgsDayM1 => "1.0_day.geojson",
            Self::UsgsWeekM25 => "2.5_week.geojson",
            Self::UsgsMonthM45 => "4.5_month.geojson",
        };
        Some(format!("{USGS_FEED_BASE}/{file}"))
    }

    /// Parse a source name as written in the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "none" => Some(Self::None),
            "usgs_hour_all" => Some(Self::UsgsHourAll),
            "usgs_day_all" => Some(Self::UsgsDayAll),
            "usgs_day_m1" => Some(Self::UsgsDayM1),
            "usgs_week_m2_5" => Some(Self::UsgsWeekM25),
            "usgs_month_m4_5" => Some(Self::UsgsMonthM45),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Hypocenter layer and feed settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HypocenterConfig {
    /// Catalog feed to poll.
    #[serde(default)]
    pub source: HypocenterSource,

    /// Endpoint for the `custom` source.
    #[serde(default)]
    pub url: Option<String>,

    /// Seconds between feed refreshes.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Initial marker color mode.
    #[serde(default)]
    pub color_mode: ColorMode,

    /// Whether the legend is drawn.
    #[serde(default = "default_true")]
    pub legend_enabled: bool,
}

impl HypocenterConfig {
    /// Resolve the URL the feed should poll, or `None` when the feed is
    /// disabled.
    pub fn feed_url(&self) -> Option<String> {
        match self.source {
            HypocenterSource::None => None,
            HypocenterSource::Custom => self.url.clone(),
            builtin => builtin.builtin_url(),
        }
    }

    /// Refresh interval as a [`Duration`].
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Request timeout as a [`Duration`].
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Override the source with environment variables when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `SWARM_HYPOCENTER_SOURCE` names
    /// an unknown source.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(name) = std::env::var("SWARM_HYPOCENTER_SOURCE") {
            self.source =
                HypocenterSource::from_name(&name).ok_or_else(|| ConfigError::Invalid {
                    reason: format!("unknown SWARM_HYPOCENTER_SOURCE: {name}"),
                })?;
        }
        if let Ok(url) = std::env::var("SWARM_HYPOCENTER_URL") {
            self.source = HypocenterSource::Custom;
            self.url = Some(url);
        }
        Ok(())
    }
}

impl Default for HypocenterConfig {
    fn default() -> Self {
        Self {
            source: HypocenterSource::default(),
            url: None,
            refresh_interval_secs: default_refresh_interval_secs(),
            request_timeout_ms: default_request_timeout_ms(),
            color_mode: ColorMode::default(),
            legend_enabled: true,
        }
    }
}

/// Initial map viewport.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapConfig {
    /// Western bound in degrees.
    #[serde(default = "default_west")]
    pub west: f64,
    /// Eastern bound in degrees.
    #[serde(default = "default_east")]
    pub east: f64,
    /// Southern bound in degrees.
    #[serde(default = "default_south")]
    pub south: f64,
    /// Northern bound in degrees.
    #[serde(default = "default_north")]
    pub north: f64,
    /// Plot width in pixels.
    #[serde(default = "default_width_px")]
    pub width_px: u32,
    /// Plot height in pixels.
    #[serde(default = "default_height_px")]
    pub height_px: u32,
    /// Inset from the panel edge to the plot, in pixels.
    #[serde(default = "default_inset_px")]
    pub inset_px: u32,
}

impl MapConfig {
    /// The configured bounds as a [`GeoRange`].
    pub const fn range(&self) -> GeoRange {
        GeoRange::new(self.west, self.east, self.south, self.north)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            west: default_west(),
            east: default_east(),
            south: default_south(),
            north: default_north(),
            width_px: default_width_px(),
            height_px: default_height_px(),
            inset_px: default_inset_px(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_refresh_interval_secs() -> u64 {
    300
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

const fn default_west() -> f64 {
    -180.0
}

const fn default_east() -> f64 {
    180.0
}

const fn default_south() -> f64 {
    -90.0
}

const fn default_north() -> f64 {
    90.0
}

const fn default_width_px() -> u32 {
    1024
}

const fn default_height_px() -> u32 {
    768
}

const fn default_inset_px() -> u32 {
    20
}

fn default_log_level() -> String {
    "info".to_owned()
}
