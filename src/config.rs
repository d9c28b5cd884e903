//! Optional settings file, read once at startup.
//!
//! Lives at `<config-dir>/quakescope/config.toml`. Every field has a
//! default; a missing file is fine and a malformed one logs a warning and
//! falls back to defaults. Nothing is ever written back.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::data::TimeRange;

const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Raster tile URL template for the map source.
    pub tile_url: String,
    /// Time range selected at startup.
    pub time_range: TimeRange,
    /// Magnitude threshold selected at startup.
    pub min_magnitude: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_url: DEFAULT_TILE_URL.to_string(),
            time_range: TimeRange::default(),
            min_magnitude: 0.0,
        }
    }
}

/// Load settings, falling back to defaults on any problem.
pub fn load() -> Settings {
    let Some(path) = config_path() else {
        return Settings::default();
    };
    if !path.exists() {
        return Settings::default();
    }
    match load_from(&path) {
        Ok(settings) => {
            debug!("loaded settings from {}", path.display());
            settings
        }
        Err(e) => {
            warn!("ignoring config file {}: {e:#}", path.display());
            Settings::default()
        }
    }
}

fn load_from(path: &Path) -> anyhow::Result<Settings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&text).context("failed to parse config file")
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quakescope").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tile_url, DEFAULT_TILE_URL);
        assert_eq!(settings.time_range, TimeRange::PastDay);
        assert!((settings.min_magnitude - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_a_full_file() {
        let settings: Settings = toml::from_str(
            r#"
            tile_url = "https://tiles.example.org/{z}/{x}/{y}.png"
            time_range = "past_week"
            min_magnitude = 2.5
            "#,
        )
        .unwrap();
        assert_eq!(settings.tile_url, "https://tiles.example.org/{z}/{x}/{y}.png");
        assert_eq!(settings.time_range, TimeRange::PastWeek);
        assert!((settings.min_magnitude - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = toml::from_str(r#"time_range = "past_hour""#).unwrap();
        assert_eq!(settings.time_range, TimeRange::PastHour);
        assert_eq!(settings.tile_url, DEFAULT_TILE_URL);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(toml::from_str::<Settings>(r#"time_range = "yesterday""#).is_err());
    }
}
