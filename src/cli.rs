//! Command-line interface parsing for the weather dashboard
//!
//! This module handles parsing of CLI arguments using clap and validates them
//! into a [`StartupConfig`]: the API key, the location shown first, the home
//! location, and tuning knobs for the debouncer, map and HTTP client.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::openweather::{DEFAULT_TIMEOUT, OPEN_WEATHER_BASE_URL};
use crate::data::Coordinate;
use crate::map::{DEFAULT_CENTER, DEFAULT_ZOOM, MAX_ZOOM};
use crate::search::DEFAULT_DEBOUNCE;

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// No API key on the command line or in the environment
    #[error("Missing API key: pass --api-key or set OPENWEATHER_API_KEY")]
    MissingApiKey,

    #[error("Invalid latitude: {0}. Expected a value between -90 and 90")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0}. Expected a value between -180 and 180")]
    InvalidLongitude(f64),

    #[error("Invalid zoom: {0}. Expected a value between 0 and {max}", max = MAX_ZOOM)]
    InvalidZoom(u8),

    #[error("Invalid city: the name must not be empty")]
    EmptyCity,

    #[error("Invalid timeout: must be at least one second")]
    InvalidTimeout,
}

/// Weatherdash - current conditions, forecast and a world map in the terminal
#[derive(Parser, Debug)]
#[command(name = "weatherdash")]
#[command(about = "Terminal weather dashboard with place search, forecast and world map")]
#[command(version)]
pub struct Cli {
    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Latitude of the location to show first
    #[arg(long, allow_negative_numbers = true, requires = "lon", conflicts_with = "city")]
    pub lat: Option<f64>,

    /// Longitude of the location to show first
    #[arg(long, allow_negative_numbers = true, requires = "lat", conflicts_with = "city")]
    pub lon: Option<f64>,

    /// Place name to look up and show first
    ///
    /// Examples:
    ///   weatherdash --city London
    ///   weatherdash --city "Rio de Janeiro"
    #[arg(long, value_name = "NAME")]
    pub city: Option<String>,

    /// Latitude of the home location ("use current location")
    #[arg(long, allow_negative_numbers = true, default_value_t = DEFAULT_CENTER.latitude)]
    pub home_lat: f64,

    /// Longitude of the home location ("use current location")
    #[arg(long, allow_negative_numbers = true, default_value_t = DEFAULT_CENTER.longitude)]
    pub home_lon: f64,

    /// Pause in typing before a place search fires, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64)]
    pub debounce_ms: u64,

    /// Initial map zoom level
    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: u8,

    /// Timeout for each weather API request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Weather API base URL
    #[arg(long, hide = true, default_value = OPEN_WEATHER_BASE_URL)]
    pub base_url: String,

    /// Write logs to this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// The location rendered when the dashboard starts
#[derive(Debug, Clone, PartialEq)]
pub enum StartupTarget {
    /// The home location
    Home,
    /// An explicit coordinate
    Coordinate(Coordinate),
    /// The first geocode hit for a place name
    City(String),
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub api_key: String,
    pub target: StartupTarget,
    pub home: Coordinate,
    pub debounce: Duration,
    pub zoom: u8,
    pub timeout: Duration,
    pub base_url: String,
    pub log_file: Option<PathBuf>,
}

fn validate_coordinate(latitude: f64, longitude: f64) -> Result<Coordinate, CliError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(CliError::InvalidLatitude(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(CliError::InvalidLongitude(longitude));
    }
    Ok(Coordinate::new(latitude, longitude))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if a value is missing or out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(CliError::MissingApiKey)?
            .to_string();

        let target = match (&cli.city, cli.lat, cli.lon) {
            (Some(city), _, _) => {
                let city = city.trim();
                if city.is_empty() {
                    return Err(CliError::EmptyCity);
                }
                StartupTarget::City(city.to_string())
            }
            (None, Some(lat), Some(lon)) => StartupTarget::Coordinate(validate_coordinate(lat, lon)?),
            _ => StartupTarget::Home,
        };

        let home = validate_coordinate(cli.home_lat, cli.home_lon)?;

        if cli.zoom > MAX_ZOOM {
            return Err(CliError::InvalidZoom(cli.zoom));
        }
        if cli.timeout_secs == 0 {
            return Err(CliError::InvalidTimeout);
        }

        Ok(StartupConfig {
            api_key,
            target,
            home,
            debounce: Duration::from_millis(cli.debounce_ms),
            zoom: cli.zoom,
            timeout: Duration::from_secs(cli.timeout_secs),
            base_url: cli.base_url.clone(),
            log_file: cli.log_file.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["weatherdash", "--api-key", "test-key"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_cli_defaults() {
        let cli = parse(&[]);
        assert!(cli.lat.is_none());
        assert!(cli.city.is_none());
        assert_eq!(cli.debounce_ms, 500);
        assert_eq!(cli.zoom, DEFAULT_ZOOM);
        assert_eq!(cli.timeout_secs, 10);
        assert_eq!(cli.base_url, OPEN_WEATHER_BASE_URL);
    }

    #[test]
    fn test_startup_config_defaults_to_home() {
        let config = StartupConfig::from_cli(&parse(&[])).unwrap();
        assert_eq!(config.target, StartupTarget::Home);
        assert_eq!(config.home, DEFAULT_CENTER);
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_startup_config_with_coordinate() {
        let config = StartupConfig::from_cli(&parse(&["--lat", "-33.87", "--lon", "151.21"])).unwrap();
        assert_eq!(
            config.target,
            StartupTarget::Coordinate(Coordinate::new(-33.87, 151.21))
        );
    }

    #[test]
    fn test_startup_config_with_city() {
        let config = StartupConfig::from_cli(&parse(&["--city", "  London "])).unwrap();
        assert_eq!(config.target, StartupTarget::City("London".to_string()));
    }

    #[test]
    fn test_lat_requires_lon() {
        let result = Cli::try_parse_from(["weatherdash", "--api-key", "k", "--lat", "10"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_city_conflicts_with_coordinate() {
        let result = Cli::try_parse_from([
            "weatherdash",
            "--api-key",
            "k",
            "--city",
            "Paris",
            "--lat",
            "1",
            "--lon",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_latitude() {
        let result = StartupConfig::from_cli(&parse(&["--lat", "95", "--lon", "0"]));
        assert_eq!(result.unwrap_err(), CliError::InvalidLatitude(95.0));
    }

    #[test]
    fn test_invalid_longitude() {
        let result = StartupConfig::from_cli(&parse(&["--lat", "0", "--lon", "-181"]));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid longitude"));
    }

    #[test]
    fn test_invalid_home() {
        let result = StartupConfig::from_cli(&parse(&["--home-lat", "-91"]));
        assert_eq!(result.unwrap_err(), CliError::InvalidLatitude(-91.0));
    }

    #[test]
    fn test_invalid_zoom() {
        let result = StartupConfig::from_cli(&parse(&["--zoom", "12"]));
        assert_eq!(result.unwrap_err(), CliError::InvalidZoom(12));
    }

    #[test]
    fn test_empty_city() {
        let result = StartupConfig::from_cli(&parse(&["--city", "   "]));
        assert_eq!(result.unwrap_err(), CliError::EmptyCity);
    }

    #[test]
    fn test_zero_timeout() {
        let result = StartupConfig::from_cli(&parse(&["--timeout-secs", "0"]));
        assert_eq!(result.unwrap_err(), CliError::InvalidTimeout);
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let cli = Cli::parse_from(["weatherdash", "--api-key", " "]);
        assert_eq!(StartupConfig::from_cli(&cli).unwrap_err(), CliError::MissingApiKey);
    }
}
