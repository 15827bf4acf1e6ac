//! Enumeration types for marker styling.
//!
//! Bands are half-open intervals that include their lower boundary, so
//! every depth or age maps to exactly one band.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// What a marker's color encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Color by hypocenter depth.
    #[default]
    Depth,
    /// Color by time elapsed since the origin time.
    Age,
}

/// Depth classification of an origin, in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthBand {
    /// Depth not reported (NaN).
    Unknown,
    /// Above sea level (`< 0`).
    AboveSeaLevel,
    /// `[0, 5)` km.
    Shallow,
    /// `[5, 13)` km.
    UpperCrust,
    /// `[13, 20)` km.
    MidCrust,
    /// `[20, 40)` km.
    LowerCrust,
    /// `>= 40` km.
    Deep,
}

impl DepthBand {
    /// Bands that appear in the depth legend, shallowest first.
    pub const LEGEND: [Self; 6] = [
        Self::AboveSeaLevel,
        Self::Shallow,
        Self::UpperCrust,
        Self::MidCrust,
        Self::LowerCrust,
        Self::Deep,
    ];

    /// Classify a depth given in kilometers.
    pub fn from_depth_km(depth_km: f64) -> Self {
        if depth_km.is_nan() {
            Self::Unknown
        } else if depth_km < 0.0 {
            Self::AboveSeaLevel
        } else if depth_km < 5.0 {
            Self::Shallow
        } else if depth_km < 13.0 {
            Self::UpperCrust
        } else if depth_km < 20.0 {
            Self::MidCrust
        } else if depth_km < 40.0 {
            Self::LowerCrust
        } else {
            Self::Deep
        }
    }

    /// Legend label for the band.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "?",
            Self::AboveSeaLevel => "< 0",
            Self::Shallow => "0-5",
            Self::UpperCrust => "5-13",
            Self::MidCrust => "13-20",
            Self::LowerCrust => "20-40",
            Self::Deep => "40+",
        }
    }
}

/// Age classification of an origin relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    /// Less than one hour old (future origin times land here too).
    LastHour,
    /// Less than one day old.
    LastDay,
    /// Less than one week old.
    LastWeek,
    /// A week or older.
    Older,
}

impl AgeBand {
    /// Bands that appear in the age legend, newest first.
    pub const LEGEND: [Self; 3] = [Self::LastHour, Self::LastDay, Self::LastWeek];

    /// Classify an elapsed time.
    pub fn from_age(age: TimeDelta) -> Self {
        if age < TimeDelta::hours(1) {
            Self::LastHour
        } else if age < TimeDelta::days(1) {
            Self::LastDay
        } else if age < TimeDelta::weeks(1) {
            Self::LastWeek
        } else {
            Self::Older
        }
    }

    /// Legend label for the band.
    pub const fn label(self) -> &'static str {
        match self {
            Self::LastHour => "< 1 Hour",
            Self::LastDay => "< 1 Day",
            Self::LastWeek => "< 1 Week",
            Self::Older => "Older",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_boundaries_are_lower_inclusive() {
        let cases = [
            (-1.0, DepthBand::AboveSeaLevel),
            (0.0, DepthBand::Shallow),
            (4.9, DepthBand::Shallow),
            (5.0, DepthBand::UpperCrust),
            (12.9, DepthBand::UpperCrust),
            (13.0, DepthBand::MidCrust),
            (20.0, DepthBand::LowerCrust),
            (39.9, DepthBand::LowerCrust),
            (40.0, DepthBand::Deep),
            (100.0, DepthBand::Deep),
        ];
        for (depth, expected) in cases {
            assert_eq!(DepthBand::from_depth_km(depth), expected, "depth {depth}");
        }
        assert_eq!(DepthBand::from_depth_km(f64::NAN), DepthBand::Unknown);
    }

    #[test]
    fn age_boundaries() {
        assert_eq!(AgeBand::from_age(TimeDelta::minutes(59)), AgeBand::LastHour);
        assert_eq!(AgeBand::from_age(TimeDelta::hours(1)), AgeBand::LastDay);
        assert_eq!(AgeBand::from_age(TimeDelta::hours(23)), AgeBand::LastDay);
        assert_eq!(AgeBand::from_age(TimeDelta::days(1)), AgeBand::LastWeek);
        assert_eq!(AgeBand::from_age(TimeDelta::days(7)), AgeBand::Older);
        assert_eq!(AgeBand::from_age(TimeDelta::minutes(-5)), AgeBand::LastHour);
    }

    #[test]
    fn color_mode_parses_snake_case() {
        let mode: ColorMode = serde_json::from_str("\"age\"").unwrap_or_default();
        assert_eq!(mode, ColorMode::Age);
    }
}
