//! Render state of the dashboard regions
//!
//! Holds one view model per region for the active coordinate. A new render
//! clears every region; updates from any other render are ignored.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::data::{Coordinate, PlaceName, WeatherSnapshot};
use crate::events::{RenderUpdate, Stage};
use crate::view::{
    daily_forecast, CurrentWeatherCard, DailyForecastEntry, HighlightsCard, HourlyForecastView,
};

/// How long panels stay dimmed after the loading state exits
pub const FADE_IN: Duration = Duration::from_millis(400);

/// Where the active coordinate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    /// The configured home location ("use current location")
    Home,
    /// Given on the command line
    Startup,
    /// Picked from the search results
    Search,
    /// Clicked on the map
    Map,
}

/// A coordinate and how it was chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveLocation {
    pub coordinate: Coordinate,
    pub source: LocationSource,
}

/// Content of one region
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RegionState<T> {
    /// Cleared, waiting for data
    #[default]
    Loading,
    Ready(T),
    /// The stage feeding this region failed
    Failed(String),
}

impl<T> RegionState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            RegionState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RegionState::Loading)
    }
}

/// All render state for the active coordinate
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    seq: u64,
    /// Location of the render in progress (or last started)
    pending: Option<ActiveLocation>,
    /// Location whose render completed most recently
    current: Option<ActiveLocation>,
    loading: bool,
    revealed_at: Option<Instant>,
    snapshot: Option<WeatherSnapshot>,
    pub current_weather: RegionState<CurrentWeatherCard>,
    pub place_name: RegionState<PlaceName>,
    pub highlights: RegionState<HighlightsCard>,
    pub hourly: RegionState<HourlyForecastView>,
    pub daily: RegionState<Vec<DailyForecastEntry>>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters the loading state for a new render, clearing every region
    pub fn begin(&mut self, seq: u64, location: ActiveLocation) {
        self.seq = seq;
        self.pending = Some(location);
        self.loading = true;
        self.revealed_at = None;
        self.snapshot = None;
        self.current_weather = RegionState::Loading;
        self.place_name = RegionState::Loading;
        self.highlights = RegionState::Loading;
        self.hourly = RegionState::Loading;
        self.daily = RegionState::Loading;
    }

    /// Applies a stage update if it belongs to the active render
    ///
    /// # Returns
    /// `false` if the update was stale and ignored
    pub fn apply(&mut self, seq: u64, update: RenderUpdate) -> bool {
        if seq != self.seq || self.pending.is_none() {
            debug!(seq, active = self.seq, "discarding stale render update");
            return false;
        }

        match update {
            RenderUpdate::Current(snapshot) => {
                self.current_weather = RegionState::Ready(CurrentWeatherCard::from_snapshot(&snapshot));
                self.snapshot = Some(snapshot);
            }
            RenderUpdate::PlaceName(place) => {
                self.place_name = RegionState::Ready(place);
            }
            RenderUpdate::AirQuality(air) => {
                // Current weather always lands first; it creates the card this one joins
                if let Some(snapshot) = &self.snapshot {
                    self.highlights = RegionState::Ready(HighlightsCard::build(snapshot, &air));
                }
            }
            RenderUpdate::Forecast(forecast) => {
                self.hourly = RegionState::Ready(HourlyForecastView::from_forecast(&forecast));
                self.daily = RegionState::Ready(daily_forecast(&forecast));
                self.finish();
            }
            RenderUpdate::Failed { stage, message } => self.fail(stage, message),
        }
        true
    }

    fn fail(&mut self, stage: Stage, message: String) {
        match stage {
            Stage::CurrentWeather => {
                // Nothing downstream will run
                self.current_weather = RegionState::Failed(message.clone());
                self.place_name = RegionState::Failed(message.clone());
                self.highlights = RegionState::Failed(message.clone());
                self.hourly = RegionState::Failed(message.clone());
                self.daily = RegionState::Failed(message);
                self.loading = false;
            }
            Stage::PlaceName => self.place_name = RegionState::Failed(message),
            Stage::AirQuality => self.highlights = RegionState::Failed(message),
            Stage::Forecast => {
                self.hourly = RegionState::Failed(message.clone());
                self.daily = RegionState::Failed(message);
                self.loading = false;
            }
        }
    }

    /// Exits the loading state and records the coordinate as current
    fn finish(&mut self) {
        self.loading = false;
        self.revealed_at = Some(Instant::now());
        self.current = self.pending;
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The location of the latest render, finished or not
    pub fn pending_location(&self) -> Option<ActiveLocation> {
        self.pending
    }

    /// The location whose render last completed
    pub fn current_location(&self) -> Option<ActiveLocation> {
        self.current
    }

    /// Whether the "use current location" control is disabled
    pub fn home_control_disabled(&self) -> bool {
        matches!(
            self.pending,
            Some(ActiveLocation {
                source: LocationSource::Home,
                ..
            })
        )
    }

    /// Whether panels are still inside the fade-in window
    pub fn fading_in(&self, now: Instant) -> bool {
        self.revealed_at
            .is_some_and(|at| now.saturating_duration_since(at) < FADE_IN)
    }

    /// Whether any region failed, so a retry makes sense
    pub fn has_failures(&self) -> bool {
        matches!(self.current_weather, RegionState::Failed(_))
            || matches!(self.place_name, RegionState::Failed(_))
            || matches!(self.highlights, RegionState::Failed(_))
            || matches!(self.hourly, RegionState::Failed(_))
            || matches!(self.daily, RegionState::Failed(_))
    }
}
