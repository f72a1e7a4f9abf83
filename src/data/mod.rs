//! Core data models for the weather dashboard
//!
//! Typed snapshots decoded from the upstream weather API. Each one lives only
//! for a single render of a single coordinate and is fully replaced by the next.

pub mod openweather;

pub use openweather::{OpenWeatherClient, WeatherError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Northern/southern latitude limit of the map and of selectable coordinates
pub const MAX_LATITUDE: f64 = 85.0;
/// Eastern/western longitude limit (no horizontal wrap)
pub const MAX_LONGITUDE: f64 = 180.0;

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude, positive north
    pub latitude: f64,
    /// Longitude, positive east
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns this coordinate clamped into the selectable world bounds
    pub fn clamped(self) -> Self {
        Self {
            latitude: self.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            longitude: self.longitude.clamp(-MAX_LONGITUDE, MAX_LONGITUDE),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Description and icon code of a weather condition (e.g. "light rain", "10d")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

/// Current conditions at a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Observation time (Unix seconds)
    pub observed_at: i64,
    pub condition: Condition,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// Sea-level pressure in hPa
    pub pressure: u32,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Visibility in meters
    pub visibility: u32,
    /// Sunrise time (Unix seconds)
    pub sunrise: i64,
    /// Sunset time (Unix seconds)
    pub sunset: i64,
    /// Shift from UTC in seconds
    pub timezone_offset: i32,
}

/// Error for an air quality ordinal outside 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("air quality index {0} is outside 1..=5")]
pub struct InvalidAqi(pub u8);

/// Air quality category on the upstream 1 (best) to 5 (worst) scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AqiLevel {
    Good = 1,
    Fair = 2,
    Moderate = 3,
    Poor = 4,
    VeryPoor = 5,
}

impl AqiLevel {
    /// All levels from best to worst
    pub const ALL: [AqiLevel; 5] = [
        AqiLevel::Good,
        AqiLevel::Fair,
        AqiLevel::Moderate,
        AqiLevel::Poor,
        AqiLevel::VeryPoor,
    ];

    /// Ordinal on the 1-5 scale
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Short label shown on the badge
    pub fn label(self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
        }
    }

    /// Health advisory shown with the badge
    pub fn message(self) -> &'static str {
        match self {
            AqiLevel::Good => {
                "Air quality is considered satisfactory, and air pollution poses little or no risk."
            }
            AqiLevel::Fair => {
                "Air quality is acceptable; however, for some pollutants there may be a moderate health concern for a very small number of people who are unusually sensitive to air pollution."
            }
            AqiLevel::Moderate => {
                "Members of sensitive groups may experience health effects. The general public is not likely to be affected."
            }
            AqiLevel::Poor => "Health alert: The risk of health effects is increased for everyone.",
            AqiLevel::VeryPoor => {
                "Health warnings of emergency conditions. The entire population is more likely to be affected."
            }
        }
    }
}

impl TryFrom<u8> for AqiLevel {
    type Error = InvalidAqi;

    fn try_from(ordinal: u8) -> Result<Self, Self::Error> {
        match ordinal {
            1 => Ok(AqiLevel::Good),
            2 => Ok(AqiLevel::Fair),
            3 => Ok(AqiLevel::Moderate),
            4 => Ok(AqiLevel::Poor),
            5 => Ok(AqiLevel::VeryPoor),
            other => Err(InvalidAqi(other)),
        }
    }
}

/// Air quality category plus pollutant concentrations (µg/m³)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualitySample {
    pub aqi: AqiLevel,
    pub pm2_5: f64,
    pub so2: f64,
    pub no2: f64,
    pub o3: f64,
}

/// One 3-hour forecast step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Forecast time (Unix seconds)
    pub timestamp: i64,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    pub condition: Condition,
    /// Direction the wind blows from, in degrees
    pub wind_direction: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
}

/// A forecast series (typically 40 points over 5 days) and its UTC offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Shift from UTC in seconds
    pub timezone_offset: i32,
    pub points: Vec<ForecastPoint>,
}

/// A geocoding hit for a place-name query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub state: Option<String>,
}

impl SearchResult {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Reverse-geocoded name of a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceName {
    pub name: String,
    pub country: String,
}

impl std::fmt::Display for PlaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_aqi_lookup_yields_unique_pairs() {
        let mut labels = HashSet::new();
        let mut messages = HashSet::new();
        for ordinal in 1..=5u8 {
            let level = AqiLevel::try_from(ordinal).expect("1..=5 should be valid");
            assert_eq!(level.ordinal(), ordinal);
            assert!(labels.insert(level.label()));
            assert!(messages.insert(level.message()));
        }
        assert_eq!(labels.len(), 5);
    }

    #[test]
    fn test_aqi_rejects_out_of_range() {
        assert_eq!(AqiLevel::try_from(0), Err(InvalidAqi(0)));
        assert_eq!(AqiLevel::try_from(6), Err(InvalidAqi(6)));
        assert_eq!(AqiLevel::try_from(255), Err(InvalidAqi(255)));
    }

    #[test]
    fn test_aqi_labels() {
        assert_eq!(AqiLevel::Good.label(), "Good");
        assert_eq!(AqiLevel::VeryPoor.label(), "Very Poor");
        assert!(AqiLevel::Poor.message().starts_with("Health alert"));
    }

    #[test]
    fn test_coordinate_clamped_to_world_bounds() {
        let c = Coordinate::new(89.9, -200.0).clamped();
        assert_eq!(c.latitude, MAX_LATITUDE);
        assert_eq!(c.longitude, -MAX_LONGITUDE);

        let inside = Coordinate::new(12.97, 77.59);
        assert_eq!(inside.clamped(), inside);
    }

    #[test]
    fn test_place_name_display() {
        let place = PlaceName {
            name: "London".to_string(),
            country: "GB".to_string(),
        };
        assert_eq!(place.to_string(), "London, GB");
    }

    #[test]
    fn test_search_result_coordinate() {
        let result = SearchResult {
            name: "Paris".to_string(),
            latitude: 48.8589,
            longitude: 2.32,
            country: "FR".to_string(),
            state: Some("Ile-de-France".to_string()),
        };
        assert_eq!(result.coordinate(), Coordinate::new(48.8589, 2.32));
    }
}
