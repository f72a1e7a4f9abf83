//! OpenWeatherMap API client
//!
//! Builds the five endpoint URLs the dashboard consumes, issues GET requests
//! and decodes the JSON bodies into the typed snapshots in [`crate::data`].

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use super::{
    AirQualitySample, AqiLevel, Condition, Coordinate, Forecast, ForecastPoint, InvalidAqi,
    PlaceName, SearchResult, WeatherSnapshot,
};

/// Base URL for the OpenWeatherMap API
pub const OPEN_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of geocoding hits requested per lookup
const GEOCODE_LIMIT: &str = "5";

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed (connection, timeout, body read)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Air quality ordinal outside the 1-5 scale
    #[error(transparent)]
    InvalidAqi(#[from] InvalidAqi),

    /// The configured base URL cannot be joined with an endpoint path
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Upstream endpoints, used for URL building and error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Geocode,
    ReverseGeocode,
    CurrentWeather,
    AirPollution,
    Forecast,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Geocode => "geo/1.0/direct",
            Endpoint::ReverseGeocode => "geo/1.0/reverse",
            Endpoint::CurrentWeather => "data/2.5/weather",
            Endpoint::AirPollution => "data/2.5/air_pollution",
            Endpoint::Forecast => "data/2.5/forecast",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Geocode => "geocode",
            Endpoint::ReverseGeocode => "reverse geocode",
            Endpoint::CurrentWeather => "current weather",
            Endpoint::AirPollution => "air pollution",
            Endpoint::Forecast => "forecast",
        }
    }
}

/// Client for the OpenWeatherMap geocoding, weather, air pollution and forecast APIs
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a new client with the given API key and request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_key))
    }

    /// Create a new client with a custom HTTP client
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: OPEN_WEATHER_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builds an endpoint URL with the given query parameters plus the API key
    fn endpoint_url(
        &self,
        endpoint: Endpoint,
        params: &[(&str, String)],
    ) -> Result<Url, WeatherError> {
        let raw = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint.path());
        let mut url = Url::parse(&raw).map_err(|e| WeatherError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("appid", &self.api_key);
        Ok(url)
    }

    fn coordinate_params(coordinate: Coordinate) -> Vec<(&'static str, String)> {
        vec![
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
        ]
    }

    /// URL for geocoding a place name
    pub fn geocode_url(&self, query: &str) -> Result<Url, WeatherError> {
        self.endpoint_url(
            Endpoint::Geocode,
            &[("q", query.to_string()), ("limit", GEOCODE_LIMIT.to_string())],
        )
    }

    /// URL for current weather at a coordinate
    pub fn current_weather_url(&self, coordinate: Coordinate) -> Result<Url, WeatherError> {
        let mut params = Self::coordinate_params(coordinate);
        params.push(("units", "metric".to_string()));
        self.endpoint_url(Endpoint::CurrentWeather, &params)
    }

    /// URL for reverse geocoding a coordinate
    pub fn reverse_geocode_url(&self, coordinate: Coordinate) -> Result<Url, WeatherError> {
        let mut params = Self::coordinate_params(coordinate);
        params.push(("limit", GEOCODE_LIMIT.to_string()));
        self.endpoint_url(Endpoint::ReverseGeocode, &params)
    }

    /// URL for air pollution at a coordinate
    pub fn air_pollution_url(&self, coordinate: Coordinate) -> Result<Url, WeatherError> {
        self.endpoint_url(Endpoint::AirPollution, &Self::coordinate_params(coordinate))
    }

    /// URL for the 5 day / 3 hour forecast at a coordinate
    pub fn forecast_url(&self, coordinate: Coordinate) -> Result<Url, WeatherError> {
        let mut params = Self::coordinate_params(coordinate);
        params.push(("units", "metric".to_string()));
        self.endpoint_url(Endpoint::Forecast, &params)
    }

    /// Issues a GET request and decodes a successful JSON body
    ///
    /// # Returns
    /// * `Ok(T)` - The decoded body
    /// * `Err(WeatherError::Status)` - On a non-success HTTP status
    /// * `Err(WeatherError)` - If the request or decoding fails
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: Url,
    ) -> Result<T, WeatherError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                endpoint: endpoint.name(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        debug!(endpoint = endpoint.name(), bytes = text.len(), "response received");
        Ok(serde_json::from_str(&text)?)
    }

    /// Look up places matching a name
    #[instrument(skip(self), level = "debug")]
    pub async fn geocode(&self, query: &str) -> Result<Vec<SearchResult>, WeatherError> {
        let url = self.geocode_url(query)?;
        let entries: Vec<GeocodeEntry> = self.fetch_json(Endpoint::Geocode, url).await?;
        Ok(entries.into_iter().map(SearchResult::from).collect())
    }

    /// Fetch current weather at a coordinate
    #[instrument(skip(self), level = "debug")]
    pub async fn current_weather(
        &self,
        coordinate: Coordinate,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = self.current_weather_url(coordinate)?;
        let response: CurrentWeatherResponse =
            self.fetch_json(Endpoint::CurrentWeather, url).await?;
        parse_current_weather(response)
    }

    /// Fetch the place name of a coordinate
    #[instrument(skip(self), level = "debug")]
    pub async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<PlaceName, WeatherError> {
        let url = self.reverse_geocode_url(coordinate)?;
        let entries: Vec<GeocodeEntry> = self.fetch_json(Endpoint::ReverseGeocode, url).await?;
        parse_place_name(entries)
    }

    /// Fetch air pollution at a coordinate
    #[instrument(skip(self), level = "debug")]
    pub async fn air_pollution(
        &self,
        coordinate: Coordinate,
    ) -> Result<AirQualitySample, WeatherError> {
        let url = self.air_pollution_url(coordinate)?;
        let response: AirPollutionResponse = self.fetch_json(Endpoint::AirPollution, url).await?;
        parse_air_pollution(response)
    }

    /// Fetch the 3-hourly forecast series at a coordinate
    #[instrument(skip(self), level = "debug")]
    pub async fn forecast(&self, coordinate: Coordinate) -> Result<Forecast, WeatherError> {
        let url = self.forecast_url(coordinate)?;
        let response: ForecastResponse = self.fetch_json(Endpoint::Forecast, url).await?;
        parse_forecast(response)
    }
}

/// Takes the first condition of an upstream `weather` array
fn first_condition(conditions: Vec<ConditionResponse>) -> Result<Condition, WeatherError> {
    conditions
        .into_iter()
        .next()
        .map(|c| Condition {
            description: c.description,
            icon: c.icon,
        })
        .ok_or_else(|| WeatherError::MissingField("weather".to_string()))
}

fn parse_current_weather(response: CurrentWeatherResponse) -> Result<WeatherSnapshot, WeatherError> {
    let condition = first_condition(response.weather)?;
    let main = response.main;

    Ok(WeatherSnapshot {
        observed_at: response.dt,
        condition,
        temperature: main.temp,
        feels_like: main.feels_like,
        pressure: main.pressure.round().max(0.0) as u32,
        humidity: main.humidity.round().clamp(0.0, 100.0) as u8,
        visibility: response.visibility,
        sunrise: response.sys.sunrise,
        sunset: response.sys.sunset,
        timezone_offset: response.timezone,
    })
}

fn parse_place_name(entries: Vec<GeocodeEntry>) -> Result<PlaceName, WeatherError> {
    let first = entries
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MissingField("reverse geocode result".to_string()))?;
    Ok(PlaceName {
        name: first.name,
        country: first.country,
    })
}

fn parse_air_pollution(response: AirPollutionResponse) -> Result<AirQualitySample, WeatherError> {
    let entry = response
        .list
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MissingField("list".to_string()))?;
    let aqi = AqiLevel::try_from(entry.main.aqi)?;
    let components = entry.components;

    Ok(AirQualitySample {
        aqi,
        pm2_5: components.pm2_5,
        so2: components.so2,
        no2: components.no2,
        o3: components.o3,
    })
}

fn parse_forecast(response: ForecastResponse) -> Result<Forecast, WeatherError> {
    let points = response
        .list
        .into_iter()
        .map(|entry| {
            Ok(ForecastPoint {
                timestamp: entry.dt,
                temperature: entry.main.temp,
                temp_max: entry.main.temp_max,
                condition: first_condition(entry.weather)?,
                wind_direction: entry.wind.deg,
                wind_speed: entry.wind.speed,
            })
        })
        .collect::<Result<Vec<_>, WeatherError>>()?;

    Ok(Forecast {
        timezone_offset: response.city.timezone,
        points,
    })
}

impl From<GeocodeEntry> for SearchResult {
    fn from(entry: GeocodeEntry) -> Self {
        SearchResult {
            name: entry.name,
            latitude: entry.lat,
            longitude: entry.lon,
            country: entry.country,
            state: entry.state.filter(|s| !s.is_empty()),
        }
    }
}

/// Geocoding hit (shared by direct and reverse lookups)
#[derive(Debug, Deserialize)]
struct GeocodeEntry {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: String,
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConditionResponse {
    description: String,
    icon: String,
}

/// Current weather response
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    weather: Vec<ConditionResponse>,
    dt: i64,
    sys: SunResponse,
    main: CurrentMain,
    #[serde(default)]
    visibility: u32,
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct SunResponse {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: f64,
}

/// Air pollution response
#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: AqiResponse,
    components: ComponentsResponse,
}

#[derive(Debug, Deserialize)]
struct AqiResponse {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct ComponentsResponse {
    pm2_5: f64,
    so2: f64,
    no2: f64,
    o3: f64,
}

/// 5 day / 3 hour forecast response
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
    city: CityResponse,
}

#[derive(Debug, Deserialize)]
struct CityResponse {
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: ForecastMain,
    weather: Vec<ConditionResponse>,
    wind: WindResponse,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct WindResponse {
    deg: f64,
    speed: f64,
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenWeatherClient {
        OpenWeatherClient::with_client(Client::new(), "test-key").with_base_url(base_url)
    }

    #[test]
    fn test_parse_current_weather() {
        let response: CurrentWeatherResponse =
            serde_json::from_value(fixtures::current_weather()).expect("fixture should decode");
        let snapshot = parse_current_weather(response).expect("snapshot should parse");

        assert_eq!(snapshot.condition.description, "light rain");
        assert_eq!(snapshot.condition.icon, "10d");
        assert!((snapshot.temperature - 14.62).abs() < 0.001);
        assert!((snapshot.feels_like - 14.18).abs() < 0.001);
        assert_eq!(snapshot.pressure, 1012);
        assert_eq!(snapshot.humidity, 82);
        assert_eq!(snapshot.visibility, 10000);
        assert_eq!(snapshot.sunrise, 1704614546);
        assert_eq!(snapshot.sunset, 1704643441);
        assert_eq!(snapshot.timezone_offset, 0);
    }

    #[test]
    fn test_parse_current_weather_requires_condition() {
        let mut body = fixtures::current_weather();
        body["weather"] = serde_json::json!([]);
        let response: CurrentWeatherResponse = serde_json::from_value(body).unwrap();

        match parse_current_weather(response) {
            Err(WeatherError::MissingField(field)) => assert_eq!(field, "weather"),
            other => panic!("Expected MissingField error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_air_pollution() {
        let response: AirPollutionResponse =
            serde_json::from_value(fixtures::air_pollution(2)).unwrap();
        let sample = parse_air_pollution(response).expect("sample should parse");

        assert_eq!(sample.aqi, AqiLevel::Fair);
        assert!((sample.pm2_5 - 2.87).abs() < 0.001);
        assert!((sample.o3 - 68.66).abs() < 0.001);
    }

    #[test]
    fn test_parse_air_pollution_rejects_unknown_aqi() {
        let response: AirPollutionResponse =
            serde_json::from_value(fixtures::air_pollution(7)).unwrap();

        match parse_air_pollution(response) {
            Err(WeatherError::InvalidAqi(InvalidAqi(7))) => {}
            other => panic!("Expected InvalidAqi error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_forecast_keeps_series_order() {
        let response: ForecastResponse = serde_json::from_value(fixtures::forecast(40)).unwrap();
        let forecast = parse_forecast(response).expect("forecast should parse");

        assert_eq!(forecast.points.len(), 40);
        assert_eq!(forecast.timezone_offset, 0);
        assert!(forecast
            .points
            .windows(2)
            .all(|w| w[1].timestamp - w[0].timestamp == 10800));
        assert!((forecast.points[7].temp_max - 14.5).abs() < 0.001);
    }

    #[test]
    fn test_parse_place_name_empty_is_missing_field() {
        assert!(matches!(
            parse_place_name(Vec::new()),
            Err(WeatherError::MissingField(_))
        ));
    }

    #[test]
    fn test_geocode_entry_blank_state_is_none() {
        let entry: GeocodeEntry = serde_json::from_value(serde_json::json!(
            {"name": "Springfield", "lat": 1.0, "lon": 2.0, "country": "US", "state": ""}
        ))
        .unwrap();
        assert_eq!(SearchResult::from(entry).state, None);
    }

    #[test]
    fn test_url_builders_carry_key_and_units() {
        let client = test_client("https://api.example.test/");
        let coordinate = Coordinate::new(51.5, -0.12);

        let url = client.current_weather_url(coordinate).unwrap();
        assert_eq!(url.path(), "/data/2.5/weather");
        let query = url.query().unwrap();
        assert!(query.contains("lat=51.5"));
        assert!(query.contains("lon=-0.12"));
        assert!(query.contains("units=metric"));
        assert!(query.ends_with("appid=test-key"));

        let url = client.air_pollution_url(coordinate).unwrap();
        assert_eq!(url.path(), "/data/2.5/air_pollution");
        assert!(!url.query().unwrap().contains("units"));

        let url = client.reverse_geocode_url(coordinate).unwrap();
        assert_eq!(url.path(), "/geo/1.0/reverse");
        assert!(url.query().unwrap().contains("limit=5"));

        let url = client.forecast_url(coordinate).unwrap();
        assert_eq!(url.path(), "/data/2.5/forecast");
    }

    #[test]
    fn test_geocode_url_encodes_query() {
        let client = test_client("https://api.example.test");
        let url = client.geocode_url("São Paulo, BR").unwrap();
        assert_eq!(url.path(), "/geo/1.0/direct");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".to_string(), "São Paulo, BR".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "5".to_string())));
    }

    #[test]
    fn test_invalid_base_url() {
        let client = test_client("not a url");
        assert!(matches!(
            client.geocode_url("x"),
            Err(WeatherError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_geocode_against_mock_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "London"))
            .and(query_param("appid", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::geocode()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let results = client.geocode("London").await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[1].country, "CA");
        assert_eq!(results[1].state.as_deref(), Some("Ontario"));
        assert_eq!(results[2].state, None);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                serde_json::json!({"cod": 401, "message": "Invalid API key"}),
            ))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let result = client.current_weather(Coordinate::new(1.0, 2.0)).await;

        match result {
            Err(WeatherError::Status { endpoint, status }) => {
                assert_eq!(endpoint, "current weather");
                assert_eq!(status, 401);
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{ invalid json }"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let result = client.forecast(Coordinate::new(1.0, 2.0)).await;

        assert!(matches!(result, Err(WeatherError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_reverse_geocode_against_mock_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/reverse"))
            .and(query_param("lat", "51.5073"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::reverse_geocode()))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let place = client
            .reverse_geocode(Coordinate::new(51.5073, -0.1276))
            .await
            .unwrap();

        assert_eq!(place.to_string(), "London, GB");
    }
}
