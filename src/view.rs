//! View models for each dashboard region
//!
//! Every region is described by a plain struct built from a typed snapshot.
//! Renderers in [`crate::ui`] only read these, so fetch timing and drawing stay
//! independent and the same coordinate plus the same upstream data always
//! yields the same view.

use chrono::{DateTime, Datelike, Utc};

use crate::data::{AirQualitySample, AqiLevel, Forecast, ForecastPoint, SearchResult, WeatherSnapshot};
use crate::format::{
    format_date, format_hour_label, format_time, meters_per_second_to_km_per_hour, month_name,
    shifted, to_precision, truncate, weekday_name,
};

/// Number of forecast points shown in the hourly strip
pub const HOURLY_POINTS: usize = 8;
/// Index of the first daily sample (roughly 24 hours ahead)
pub const DAILY_OFFSET: usize = 7;
/// Stride between daily samples (8 x 3 hours)
pub const DAILY_STRIDE: usize = 8;

/// Humidity (percent) above which the humidity tile is flagged
const HUMIDITY_ALERT_PERCENT: u8 = 80;
/// Visibility (meters) from which the visibility tile is flagged as good
const GOOD_VISIBILITY_METERS: u32 = 10_000;

/// Visual emphasis of a highlight tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileStyle {
    Normal,
    Alert,
    Good,
}

/// The "Now" card
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeatherCard {
    pub temperature: i64,
    pub icon: String,
    pub description: String,
    pub date: String,
}

impl CurrentWeatherCard {
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        Self {
            temperature: truncate(snapshot.temperature),
            icon: snapshot.condition.icon.clone(),
            description: snapshot.condition.description.clone(),
            date: format_date(snapshot.observed_at, snapshot.timezone_offset),
        }
    }
}

/// Air quality badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AqiBadge {
    pub level: AqiLevel,
    pub label: &'static str,
    pub message: &'static str,
}

impl From<AqiLevel> for AqiBadge {
    fn from(level: AqiLevel) -> Self {
        Self {
            level,
            label: level.label(),
            message: level.message(),
        }
    }
}

/// Health band of a single pollutant concentration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollutantBand {
    Good,
    Moderate,
    /// Unhealthy for sensitive groups (PM2.5 only)
    Sensitive,
    Unhealthy,
}

impl PollutantBand {
    pub fn label(self) -> &'static str {
        match self {
            PollutantBand::Good => "good",
            PollutantBand::Moderate => "moderate",
            PollutantBand::Sensitive => "sensitive",
            PollutantBand::Unhealthy => "unhealthy",
        }
    }
}

/// Concentration bands for one pollutant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollutantGuide {
    pub name: &'static str,
    pub unit: &'static str,
    /// Values below this are good
    pub good_below: f64,
    /// Values up to and including this are moderate
    pub moderate_up_to: f64,
    /// Upper bound of the sensitive-groups band, where one exists
    pub sensitive_up_to: Option<f64>,
}

impl PollutantGuide {
    pub fn band(&self, value: f64) -> PollutantBand {
        if value < self.good_below {
            PollutantBand::Good
        } else if value <= self.moderate_up_to {
            PollutantBand::Moderate
        } else if self.sensitive_up_to.is_some_and(|limit| value <= limit) {
            PollutantBand::Sensitive
        } else {
            PollutantBand::Unhealthy
        }
    }

    /// One-line description of the bands, e.g. `good <35  moderate <=75`
    pub fn summary(&self) -> String {
        let mut text = format!("good <{}  moderate <={}", self.good_below, self.moderate_up_to);
        if let Some(limit) = self.sensitive_up_to {
            text.push_str(&format!("  sensitive <={}", limit));
        }
        text
    }
}

/// Bands for PM2.5, SO2, NO2 and O3, in tile order
pub const POLLUTANT_GUIDES: [PollutantGuide; 4] = [
    PollutantGuide {
        name: "PM2.5",
        unit: "µg/m³",
        good_below: 12.0,
        moderate_up_to: 35.4,
        sensitive_up_to: Some(55.4),
    },
    PollutantGuide {
        name: "SO2",
        unit: "ppb",
        good_below: 35.0,
        moderate_up_to: 75.0,
        sensitive_up_to: None,
    },
    PollutantGuide {
        name: "NO2",
        unit: "ppb",
        good_below: 53.0,
        moderate_up_to: 100.0,
        sensitive_up_to: None,
    },
    PollutantGuide {
        name: "O3",
        unit: "ppb",
        good_below: 54.0,
        moderate_up_to: 70.0,
        sensitive_up_to: None,
    },
];

/// One pollutant concentration tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollutantTile {
    pub name: &'static str,
    pub value: String,
    pub band: PollutantBand,
}

impl PollutantTile {
    fn new(guide: &PollutantGuide, concentration: f64, value: String) -> Self {
        Self {
            name: guide.name,
            value,
            band: guide.band(concentration),
        }
    }
}

/// The "Today Highlights" card
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightsCard {
    pub aqi: AqiBadge,
    pub pollutants: [PollutantTile; 4],
    pub sunrise: String,
    pub sunset: String,
    pub humidity: u8,
    pub humidity_style: TileStyle,
    pub pressure: u32,
    /// Visibility in kilometers
    pub visibility_km: f64,
    pub visibility_style: TileStyle,
    pub feels_like: i64,
}

impl HighlightsCard {
    pub fn build(snapshot: &WeatherSnapshot, air: &AirQualitySample) -> Self {
        let tz = snapshot.timezone_offset;
        Self {
            aqi: AqiBadge::from(air.aqi),
            pollutants: [
                PollutantTile::new(&POLLUTANT_GUIDES[0], air.pm2_5, to_precision(air.pm2_5, 3)),
                PollutantTile::new(&POLLUTANT_GUIDES[1], air.so2, to_precision(air.so2, 3)),
                PollutantTile::new(&POLLUTANT_GUIDES[2], air.no2, to_precision(air.no2, 3)),
                PollutantTile::new(&POLLUTANT_GUIDES[3], air.o3, air.o3.to_string()),
            ],
            sunrise: format_time(snapshot.sunrise, tz),
            sunset: format_time(snapshot.sunset, tz),
            humidity: snapshot.humidity,
            humidity_style: if snapshot.humidity > HUMIDITY_ALERT_PERCENT {
                TileStyle::Alert
            } else {
                TileStyle::Normal
            },
            pressure: snapshot.pressure,
            visibility_km: f64::from(snapshot.visibility) / 1000.0,
            visibility_style: if snapshot.visibility >= GOOD_VISIBILITY_METERS {
                TileStyle::Good
            } else {
                TileStyle::Normal
            },
            feels_like: truncate(snapshot.feels_like),
        }
    }
}

/// Temperature cell of the hourly strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyTemperature {
    pub label: String,
    pub icon: String,
    pub description: String,
    pub temperature: i64,
}

/// Wind cell of the hourly strip
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyWind {
    pub label: String,
    /// Arrow rotation in degrees (wind direction minus 180)
    pub rotation: f64,
    pub direction: f64,
    pub speed_kmh: i64,
}

/// The "Today at" strip: two parallel rows over the same points
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyForecastView {
    pub temperatures: Vec<HourlyTemperature>,
    pub winds: Vec<HourlyWind>,
}

impl HourlyForecastView {
    pub fn from_forecast(forecast: &Forecast) -> Self {
        let tz = forecast.timezone_offset;
        let window = hourly_window(&forecast.points);

        let temperatures = window
            .iter()
            .map(|p| HourlyTemperature {
                label: format_hour_label(p.timestamp, tz),
                icon: p.condition.icon.clone(),
                description: p.condition.description.clone(),
                temperature: truncate(p.temperature),
            })
            .collect();

        let winds = window
            .iter()
            .map(|p| HourlyWind {
                label: format_hour_label(p.timestamp, tz),
                rotation: p.wind_direction - 180.0,
                direction: p.wind_direction,
                speed_kmh: truncate(meters_per_second_to_km_per_hour(p.wind_speed)),
            })
            .collect();

        Self {
            temperatures,
            winds,
        }
    }
}

/// One row of the 5-day list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyForecastEntry {
    pub temp_max: i64,
    pub icon: String,
    pub description: String,
    pub day_of_month: u32,
    pub month: &'static str,
    pub weekday: &'static str,
}

impl DailyForecastEntry {
    fn from_point(point: &ForecastPoint, timezone_offset: i32) -> Self {
        let at: DateTime<Utc> = shifted(point.timestamp, timezone_offset);
        Self {
            temp_max: truncate(point.temp_max),
            icon: point.condition.icon.clone(),
            description: point.condition.description.clone(),
            day_of_month: at.day(),
            month: month_name(&at),
            weekday: weekday_name(&at),
        }
    }
}

/// Builds the 5-day list from a forecast series
pub fn daily_forecast(forecast: &Forecast) -> Vec<DailyForecastEntry> {
    daily_samples(&forecast.points)
        .map(|p| DailyForecastEntry::from_point(p, forecast.timezone_offset))
        .collect()
}

/// The first [`HOURLY_POINTS`] points of a series (fewer if the series is short)
pub fn hourly_window(points: &[ForecastPoint]) -> &[ForecastPoint] {
    &points[..points.len().min(HOURLY_POINTS)]
}

/// Every eighth point starting at index 7: 7, 15, 23, ... until the series ends
pub fn daily_samples(points: &[ForecastPoint]) -> impl Iterator<Item = &ForecastPoint> {
    points.iter().skip(DAILY_OFFSET).step_by(DAILY_STRIDE)
}

/// One row of the search result list
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultItem {
    pub title: String,
    pub subtitle: String,
}

impl From<&SearchResult> for SearchResultItem {
    fn from(result: &SearchResult) -> Self {
        let subtitle = match &result.state {
            Some(state) => format!("{} {}", state, result.country),
            None => result.country.clone(),
        };
        Self {
            title: result.name.clone(),
            subtitle,
        }
    }
}
