use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

pub const APP_ID: &str = "com.quakescope.Quakescope";
pub const USGS_FEED_BASE_URL: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary";

/// The one user-visible failure message; every fetch failure collapses to it.
pub const FEED_ERROR_MESSAGE: &str = "Failed to load earthquake data.";

/// Minimum-magnitude choices offered in the header dropdown.
pub const MIN_MAGNITUDE_CHOICES: [(&str, f64); 4] = [
    ("All", 0.0),
    ("≥ 2.5", 2.5),
    ("≥ 4.5", 4.5),
    ("≥ 6.0", 6.0),
];

/// Summary feed windows offered by the USGS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    PastHour,
    #[default]
    PastDay,
    PastWeek,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [Self::PastHour, Self::PastDay, Self::PastWeek];

    /// URL path segment of the summary feed for this window.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PastHour => "all_hour",
            Self::PastDay => "all_day",
            Self::PastWeek => "all_week",
        }
    }

    /// Human-readable dropdown label.
    pub fn label(self) -> &'static str {
        match self {
            Self::PastHour => "Past Hour",
            Self::PastDay => "Past Day",
            Self::PastWeek => "Past Week",
        }
    }
}

/// Top-level GeoJSON document returned by the USGS summary feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub type_: String,
    pub metadata: Metadata,
    pub features: Vec<Feature>,
}

/// Feed-level metadata; `title` and `count` feed the header subtitle.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub generated: i64,
    pub title: String,
    pub count: usize,
}

/// One seismic event.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub id: String,
    pub geometry: Geometry,
    pub properties: Properties,
}

/// Event location as `[longitude, latitude, depth_km]`.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub coordinates: Vec<f64>,
}

/// Event attributes. The upstream feed can omit `mag` and `place`; such
/// records still render, with empty popup fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Properties {
    pub mag: Option<f64>,
    pub place: Option<String>,
    #[serde(default)]
    pub time: i64,
}

impl Feature {
    pub fn longitude(&self) -> f64 {
        self.geometry.coordinates.first().copied().unwrap_or(0.0)
    }

    pub fn latitude(&self) -> f64 {
        self.geometry.coordinates.get(1).copied().unwrap_or(0.0)
    }

    /// Depth in kilometers, positive down. May be negative for events above
    /// the reference ellipsoid.
    pub fn depth_km(&self) -> f64 {
        self.geometry.coordinates.get(2).copied().unwrap_or(0.0)
    }

    /// Event time, if the epoch-millisecond value is representable.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.properties.time).single()
    }
}
