//! Application state management for the weather dashboard
//!
//! `App` is the session object: it owns the API client, the search debouncer,
//! the render pipeline, the dashboard state and the map widget, and turns key
//! presses, mouse clicks and background task events into state transitions.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::{StartupConfig, StartupTarget};
use crate::dashboard::{ActiveLocation, Dashboard, LocationSource};
use crate::data::{Coordinate, OpenWeatherClient};
use crate::events::{self, AppEvent};
use crate::map::MapWidget;
use crate::pipeline::RenderPipeline;
use crate::search::SearchDebouncer;
use crate::ui::DashboardLayout;

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Dashboard,
    /// The search overlay is open
    Search,
    /// Arrow keys move the map crosshair
    Map,
}

/// Message shown in the error panel instead of the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The startup place name had no geocode hit
    NotFound(String),
    /// The startup lookup itself failed
    LookupFailed(String),
}

/// Main application struct managing state and data
pub struct App {
    pub focus: Focus,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    pub notice: Option<Notice>,
    /// Place name of the startup lookup in flight
    pub resolving_city: Option<String>,
    pub dashboard: Dashboard,
    pub map: MapWidget,
    pub search: SearchDebouncer,
    /// Stand-in for the device location
    pub home: Coordinate,
    pipeline: RenderPipeline,
    client: OpenWeatherClient,
    sender: mpsc::Sender<AppEvent>,
    receiver: mpsc::Receiver<AppEvent>,
    /// Size of the terminal at the last draw
    viewport: Rect,
}

impl App {
    /// Creates the app; nothing is fetched until [`App::start`]
    pub fn new(client: OpenWeatherClient, config: &StartupConfig) -> Self {
        let (sender, receiver) = events::channel();
        Self {
            focus: Focus::Dashboard,
            should_quit: false,
            show_help: false,
            notice: None,
            resolving_city: None,
            dashboard: Dashboard::new(),
            map: MapWidget::new(config.home, config.zoom),
            search: SearchDebouncer::new(client.clone(), sender.clone(), config.debounce),
            home: config.home,
            pipeline: RenderPipeline::new(client.clone(), sender.clone()),
            client,
            sender,
            receiver,
            viewport: Rect::default(),
        }
    }

    /// Routes to the startup location
    pub fn start(&mut self, target: &StartupTarget) {
        match target {
            StartupTarget::Home => self.use_home_location(),
            StartupTarget::Coordinate(coordinate) => {
                self.select_location(*coordinate, LocationSource::Startup)
            }
            StartupTarget::City(city) => self.resolve_city(city.clone()),
        }
    }

    /// Looks up a place name and renders the first hit
    fn resolve_city(&mut self, city: String) {
        info!(city = %city, "resolving startup city");
        self.resolving_city = Some(city.clone());

        let client = self.client.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = client
                .geocode(&city)
                .await
                .map(|results| results.into_iter().next())
                .map_err(|e| e.to_string());
            let _ = sender.send(AppEvent::StartupLocation(result)).await;
        });
    }

    /// Renders the weather at a coordinate and moves the map marker there
    pub fn select_location(&mut self, coordinate: Coordinate, source: LocationSource) {
        // A startup lookup still in flight must not replace this choice
        if self.resolving_city.take().is_some() {
            debug!(source = ?source, "startup city lookup superseded");
        }
        let seq = self.pipeline.render_weather_for(coordinate);
        self.dashboard.begin(seq, ActiveLocation { coordinate, source });
        self.map.place_marker(coordinate, Instant::now());
        self.notice = None;
    }

    /// Switches to the home location unless it is already shown
    pub fn use_home_location(&mut self) {
        if self.dashboard.home_control_disabled() {
            return;
        }
        self.select_location(self.home, LocationSource::Home);
    }

    /// Re-renders the active coordinate
    pub fn retry(&mut self) {
        if let Some(location) = self.dashboard.pending_location() {
            info!(coordinate = %location.coordinate, "retrying render");
            self.select_location(location.coordinate, location.source);
        }
    }

    /// Records the terminal size so clicks can be mapped onto the map
    pub fn set_viewport(&mut self, area: Rect) {
        if self.viewport != area {
            self.viewport = area;
            self.map.set_area(DashboardLayout::new(area).map_inner);
        }
    }

    /// Applies every pending background event
    pub fn drain_events(&mut self) {
        while let Some(event) = events::try_recv(&mut self.receiver) {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchResults { seq, results } => {
                self.search.accept(seq, results);
            }
            AppEvent::Render { seq, update } => {
                self.dashboard.apply(seq, update);
            }
            AppEvent::StartupLocation(result) => {
                let Some(city) = self.resolving_city.take() else {
                    return;
                };
                match result {
                    Ok(Some(place)) => self.select_location(place.coordinate(), LocationSource::Startup),
                    Ok(None) => {
                        warn!(city = %city, "startup city not found");
                        self.notice = Some(Notice::NotFound(city));
                    }
                    Err(message) => {
                        warn!(city = %city, error = %message, "startup city lookup failed");
                        self.notice = Some(Notice::LookupFailed(message));
                    }
                }
            }
        }
    }

    /// Advances time-driven state (the map fly)
    pub fn tick(&mut self, now: Instant) {
        self.map.tick(now);
    }

    /// Handles keyboard input
    ///
    /// Key bindings:
    /// - `q`: Quit (outside the search field), `Ctrl-C` anywhere
    /// - `/`: Open the place search
    /// - `m`: Focus the map (arrows move the crosshair, `Enter` selects)
    /// - `c`: Show the home location
    /// - `r`: Retry the active location
    /// - `+`/`-`: Zoom the map
    /// - `?`: Toggle help
    /// - `Esc`: Close the search, leave the map, dismiss the error panel
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key_event),
            Focus::Map => match key_event.code {
                KeyCode::Esc => self.focus = Focus::Dashboard,
                KeyCode::Up | KeyCode::Char('k') => self.map.move_crosshair(1, 0, Instant::now()),
                KeyCode::Down | KeyCode::Char('j') => self.map.move_crosshair(-1, 0, Instant::now()),
                KeyCode::Left | KeyCode::Char('h') => self.map.move_crosshair(0, -1, Instant::now()),
                KeyCode::Right | KeyCode::Char('l') => self.map.move_crosshair(0, 1, Instant::now()),
                KeyCode::Enter => {
                    if !self.dashboard.is_loading() {
                        self.select_location(self.map.crosshair(), LocationSource::Map);
                    }
                }
                _ => self.handle_global_key(key_event),
            },
            Focus::Dashboard => match key_event.code {
                KeyCode::Esc => self.notice = None,
                _ => self.handle_global_key(key_event),
            },
        }
    }

    fn handle_global_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Char('m') => {
                self.map.reset_crosshair(Instant::now());
                self.focus = Focus::Map;
            }
            KeyCode::Char('c') => self.use_home_location(),
            KeyCode::Char('r') => self.retry(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.map.zoom_in(Instant::now()),
            KeyCode::Char('-') => self.map.zoom_out(Instant::now()),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.search.dismiss();
                self.focus = Focus::Dashboard;
            }
            KeyCode::Enter => {
                if let Some(place) = self.search.selected_result().cloned() {
                    info!(place = %place.name, "search result selected");
                    self.search.dismiss();
                    self.focus = Focus::Dashboard;
                    self.select_location(place.coordinate(), LocationSource::Search);
                }
            }
            KeyCode::Up => self.search.select_previous(),
            KeyCode::Down => self.search.select_next(),
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Char(c) => self.search.push_char(c),
            _ => {}
        }
    }

    /// Handles mouse input on the map: left click selects, wheel zooms
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.show_help || self.focus == Focus::Search {
            return;
        }

        let now = Instant::now();
        let area = self.map.area();
        let on_map = mouse.column >= area.x
            && mouse.column < area.right()
            && mouse.row >= area.y
            && mouse.row < area.bottom();
        if !on_map {
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // The map is hidden behind a placeholder while loading
                if self.dashboard.is_loading() {
                    return;
                }
                if let Some(coordinate) = self.map.coordinate_at(mouse.column, mouse.row, now) {
                    self.select_location(coordinate, LocationSource::Map);
                }
            }
            MouseEventKind::ScrollUp => self.map.zoom_in(now),
            MouseEventKind::ScrollDown => self.map.zoom_out(now),
            _ => {}
        }
    }
}
