//! Messages from background tasks to the controller
//!
//! Search lookups and render stages run as tokio tasks and report back over a
//! single mpsc channel, drained by the main loop between frames. Every message
//! carries the sequence number of the request that produced it so superseded
//! results can be dropped.

use tokio::sync::mpsc;

use crate::data::{AirQualitySample, Forecast, PlaceName, SearchResult, WeatherSnapshot};

/// Capacity of the event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Messages sent from background tasks to the main app
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A debounced geocode lookup finished
    SearchResults {
        seq: u64,
        results: Result<Vec<SearchResult>, String>,
    },
    /// A render pipeline stage finished
    Render { seq: u64, update: RenderUpdate },
    /// The startup `--city` lookup finished (`None` when nothing matched)
    StartupLocation(Result<Option<SearchResult>, String>),
}

/// Pipeline stages, one per dashboard data source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CurrentWeather,
    PlaceName,
    AirQuality,
    Forecast,
}

impl Stage {
    pub fn title(self) -> &'static str {
        match self {
            Stage::CurrentWeather => "current weather",
            Stage::PlaceName => "place name",
            Stage::AirQuality => "air quality",
            Stage::Forecast => "forecast",
        }
    }
}

/// Data delivered by one render stage
#[derive(Debug, Clone)]
pub enum RenderUpdate {
    Current(WeatherSnapshot),
    PlaceName(PlaceName),
    AirQuality(AirQualitySample),
    Forecast(Forecast),
    Failed { stage: Stage, message: String },
}

/// Creates the controller's event channel
pub fn channel() -> (mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
    mpsc::channel(EVENT_CHANNEL_CAPACITY)
}

/// Checks for pending events without blocking
///
/// # Returns
/// * `Some(AppEvent)` if an event was available
/// * `None` if no events are pending
pub fn try_recv(receiver: &mut mpsc::Receiver<AppEvent>) -> Option<AppEvent> {
    receiver.try_recv().ok()
}
