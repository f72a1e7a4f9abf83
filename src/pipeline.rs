//! Coordinate-driven weather render pipeline
//!
//! A render fetches current weather first, then reverse geocoding, air
//! pollution and the forecast concurrently. Each stage reports over the event
//! channel as soon as it resolves. Starting a new render aborts the previous
//! one and bumps the sequence number so late updates can be recognised.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::data::{Coordinate, OpenWeatherClient, WeatherError};
use crate::events::{AppEvent, RenderUpdate, Stage};

/// Spawns and supersedes render tasks
pub struct RenderPipeline {
    client: OpenWeatherClient,
    sender: mpsc::Sender<AppEvent>,
    seq: u64,
    task: Option<JoinHandle<()>>,
}

impl RenderPipeline {
    pub fn new(client: OpenWeatherClient, sender: mpsc::Sender<AppEvent>) -> Self {
        Self {
            client,
            sender,
            seq: 0,
            task: None,
        }
    }

    /// Sequence number of the most recent render
    pub fn current_seq(&self) -> u64 {
        self.seq
    }

    /// Starts rendering a coordinate, superseding any render in flight
    ///
    /// # Returns
    /// The sequence number tagging every update of this render
    pub fn render_weather_for(&mut self, coordinate: Coordinate) -> u64 {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        self.seq += 1;
        let seq = self.seq;
        info!(seq, %coordinate, "rendering weather");

        let client = self.client.clone();
        let sender = self.sender.clone();
        self.task = Some(tokio::spawn(run(client, coordinate, seq, sender)));
        seq
    }

    /// Aborts the render in flight, if any
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Converts a stage result into the update sent to the controller
fn stage_update<T>(
    seq: u64,
    stage: Stage,
    result: Result<T, WeatherError>,
    into_update: impl FnOnce(T) -> RenderUpdate,
) -> RenderUpdate {
    match result {
        Ok(value) => into_update(value),
        Err(e) => {
            warn!(seq, stage = stage.title(), error = %e, "render stage failed");
            RenderUpdate::Failed {
                stage,
                message: e.to_string(),
            }
        }
    }
}

/// Runs one render to completion, emitting an update per stage
pub async fn run(
    client: OpenWeatherClient,
    coordinate: Coordinate,
    seq: u64,
    sender: mpsc::Sender<AppEvent>,
) {
    let send = |update: RenderUpdate| {
        let sender = sender.clone();
        async move {
            let _ = sender.send(AppEvent::Render { seq, update }).await;
        }
    };

    let current = client.current_weather(coordinate).await;
    let failed = current.is_err();
    send(stage_update(seq, Stage::CurrentWeather, current, RenderUpdate::Current)).await;
    if failed {
        return;
    }

    // The current weather card exists now; the remaining stages fill their own regions
    let place = async {
        let result = client.reverse_geocode(coordinate).await;
        send(stage_update(seq, Stage::PlaceName, result, RenderUpdate::PlaceName)).await;
    };
    let air = async {
        let result = client.air_pollution(coordinate).await;
        send(stage_update(seq, Stage::AirQuality, result, RenderUpdate::AirQuality)).await;
    };
    let forecast = async {
        let result = client.forecast(coordinate).await;
        send(stage_update(seq, Stage::Forecast, result, RenderUpdate::Forecast)).await;
    };

    futures::join!(place, air, forecast);
    info!(seq, "render complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::openweather::fixtures;
    use crate::events;
    use reqwest::Client;
    use std::time::Duration;
    use tokio::time::timeout;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_all(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::current_weather()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::reverse_geocode()))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::air_pollution(1)))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::forecast(40)))
            .mount(server)
            .await;
    }

    fn client(base_url: &str) -> OpenWeatherClient {
        OpenWeatherClient::with_client(Client::new(), "test-key").with_base_url(base_url)
    }

    async fn collect(rx: &mut mpsc::Receiver<AppEvent>, count: usize) -> Vec<(u64, RenderUpdate)> {
        let mut updates = Vec::new();
        while updates.len() < count {
            match timeout(Duration::from_secs(5), rx.recv()).await {
                Ok(Some(AppEvent::Render { seq, update })) => updates.push((seq, update)),
                other => panic!("Expected render update, got {:?}", other),
            }
        }
        updates
    }

    #[tokio::test]
    async fn test_current_weather_arrives_first() {
        let mock_server = MockServer::start().await;
        mount_all(&mock_server).await;

        let (tx, mut rx) = events::channel();
        let mut pipeline = RenderPipeline::new(client(&mock_server.uri()), tx);
        let seq = pipeline.render_weather_for(Coordinate::new(51.5073, -0.1276));
        assert_eq!(seq, 1);

        let updates = collect(&mut rx, 4).await;
        assert!(updates.iter().all(|(s, _)| *s == seq));
        assert!(matches!(updates[0].1, RenderUpdate::Current(_)));

        let rest: Vec<&RenderUpdate> = updates[1..].iter().map(|(_, u)| u).collect();
        assert!(rest.iter().any(|u| matches!(u, RenderUpdate::PlaceName(_))));
        assert!(rest.iter().any(|u| matches!(u, RenderUpdate::AirQuality(_))));
        assert!(rest.iter().any(|u| matches!(u, RenderUpdate::Forecast(f) if f.points.len() == 40)));
    }

    #[tokio::test]
    async fn test_current_weather_failure_stops_render() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::forecast(40)))
            .expect(0)
            .mount(&mock_server)
            .await;

        let (tx, mut rx) = events::channel();
        let mut pipeline = RenderPipeline::new(client(&mock_server.uri()), tx);
        pipeline.render_weather_for(Coordinate::new(0.0, 0.0));

        let updates = collect(&mut rx, 1).await;
        assert!(matches!(
            updates[0].1,
            RenderUpdate::Failed {
                stage: Stage::CurrentWeather,
                ..
            }
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(events::try_recv(&mut rx).is_none());
        mock_server.verify().await;
    }

    #[tokio::test]
    async fn test_failed_side_stage_does_not_block_others() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::current_weather()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::reverse_geocode()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::air_pollution(9)))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::forecast(40)))
            .mount(&mock_server)
            .await;

        let (tx, mut rx) = events::channel();
        let mut pipeline = RenderPipeline::new(client(&mock_server.uri()), tx);
        pipeline.render_weather_for(Coordinate::new(51.5073, -0.1276));

        let updates = collect(&mut rx, 4).await;
        assert!(updates.iter().any(|(_, u)| matches!(
            u,
            RenderUpdate::Failed {
                stage: Stage::AirQuality,
                ..
            }
        )));
        assert!(updates
            .iter()
            .any(|(_, u)| matches!(u, RenderUpdate::Forecast(_))));
    }

    #[tokio::test]
    async fn test_new_render_supersedes_previous() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixtures::current_weather())
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::reverse_geocode()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::air_pollution(3)))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::forecast(40)))
            .mount(&mock_server)
            .await;

        let (tx, mut rx) = events::channel();
        let mut pipeline = RenderPipeline::new(client(&mock_server.uri()), tx);
        let first = pipeline.render_weather_for(Coordinate::new(10.0, 10.0));
        let second = pipeline.render_weather_for(Coordinate::new(20.0, 20.0));
        assert_eq!(second, first + 1);
        assert_eq!(pipeline.current_seq(), second);

        let updates = collect(&mut rx, 4).await;
        assert!(updates.iter().all(|(seq, _)| *seq == second));
    }
}
