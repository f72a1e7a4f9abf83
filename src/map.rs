//! World map viewport with a single locator marker
//!
//! The map is equirectangular: a terminal cell covers a fixed number of
//! degrees in each direction at a given zoom. The view never leaves the world
//! bounds and does not wrap horizontally.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::data::{Coordinate, MAX_LATITUDE, MAX_LONGITUDE};

/// Initial view center (Bengaluru)
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(12.9767936, 77.590082);
pub const DEFAULT_ZOOM: u8 = 3;
pub const MAX_ZOOM: u8 = 8;
/// Duration of the pan to a newly placed marker
pub const FLY_DURATION: Duration = Duration::from_millis(1500);

/// Crosshair steps per visible span
const CROSSHAIR_STEPS: f64 = 20.0;

/// Visible area of the map in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl MapBounds {
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.west..=self.east).contains(&coordinate.longitude)
            && (self.south..=self.north).contains(&coordinate.latitude)
    }
}

#[derive(Debug, Clone, Copy)]
struct Flight {
    from: Coordinate,
    to: Coordinate,
    started: Instant,
}

/// Cubic ease-in-out over `t` in `0..=1`
fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Keeps a view axis inside `-limit..=limit`
fn clamp_axis(value: f64, half_span: f64, limit: f64) -> f64 {
    if half_span >= limit {
        0.0
    } else {
        value.clamp(-limit + half_span, limit - half_span)
    }
}

#[derive(Debug, Clone)]
pub struct MapWidget {
    /// Resting center of the view (the fly target while flying)
    center: Coordinate,
    zoom: u8,
    marker: Option<Coordinate>,
    flight: Option<Flight>,
    crosshair: Coordinate,
    /// Inner area the map was last laid out in
    area: Rect,
}

impl Default for MapWidget {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl MapWidget {
    pub fn new(center: Coordinate, zoom: u8) -> Self {
        let center = center.clamped();
        Self {
            center,
            zoom: zoom.min(MAX_ZOOM),
            marker: None,
            flight: None,
            crosshair: center,
            area: Rect::default(),
        }
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn marker(&self) -> Option<Coordinate> {
        self.marker
    }

    pub fn crosshair(&self) -> Coordinate {
        self.crosshair
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    /// Records where the map is drawn, for click mapping and aspect ratio
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Degrees of longitude and latitude visible at the current zoom
    fn spans(&self) -> (f64, f64) {
        let lon_span = 2.0 * MAX_LONGITUDE / f64::from(1u32 << self.zoom);
        // Terminal cells are about twice as tall as they are wide
        let lat_span = if self.area.width == 0 || self.area.height == 0 {
            lon_span / 2.0
        } else {
            lon_span * 2.0 * f64::from(self.area.height) / f64::from(self.area.width)
        };
        (lon_span, lat_span.min(2.0 * MAX_LATITUDE))
    }

    fn clamp_center(&self, center: Coordinate) -> Coordinate {
        let (lon_span, lat_span) = self.spans();
        Coordinate::new(
            clamp_axis(center.latitude, lat_span / 2.0, MAX_LATITUDE),
            clamp_axis(center.longitude, lon_span / 2.0, MAX_LONGITUDE),
        )
    }

    /// Center of the view at `now`, following any fly in progress
    pub fn view_center(&self, now: Instant) -> Coordinate {
        let center = match self.flight {
            Some(flight) => {
                let elapsed = now.saturating_duration_since(flight.started);
                let t = ease_in_out((elapsed.as_secs_f64() / FLY_DURATION.as_secs_f64()).min(1.0));
                Coordinate::new(
                    lerp(flight.from.latitude, flight.to.latitude, t),
                    lerp(flight.from.longitude, flight.to.longitude, t),
                )
            }
            None => self.center,
        };
        self.clamp_center(center)
    }

    /// Ends a finished fly
    pub fn tick(&mut self, now: Instant) {
        if let Some(flight) = self.flight {
            if now.saturating_duration_since(flight.started) >= FLY_DURATION {
                self.flight = None;
            }
        }
    }

    /// Visible bounds at `now`
    pub fn bounds(&self, now: Instant) -> MapBounds {
        let center = self.view_center(now);
        let (lon_span, lat_span) = self.spans();
        MapBounds {
            west: center.longitude - lon_span / 2.0,
            east: center.longitude + lon_span / 2.0,
            south: center.latitude - lat_span / 2.0,
            north: center.latitude + lat_span / 2.0,
        }
    }

    /// Moves the single locator marker and flies the view to it
    pub fn place_marker(&mut self, coordinate: Coordinate, now: Instant) {
        let target = coordinate.clamped();
        let from = self.view_center(now);
        self.marker = Some(target);
        self.center = target;
        self.crosshair = target;
        self.flight = Some(Flight {
            from,
            to: target,
            started: now,
        });
    }

    /// Geographic coordinate under a terminal cell, if it is on the map
    pub fn coordinate_at(&self, column: u16, row: u16, now: Instant) -> Option<Coordinate> {
        let area = self.area;
        if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
            return None;
        }

        let bounds = self.bounds(now);
        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
        Some(
            Coordinate::new(
                lerp(bounds.north, bounds.south, fy),
                lerp(bounds.west, bounds.east, fx),
            )
            .clamped(),
        )
    }

    pub fn zoom_in(&mut self, now: Instant) {
        if self.zoom < MAX_ZOOM {
            self.settle(now);
            self.zoom += 1;
        }
    }

    pub fn zoom_out(&mut self, now: Instant) {
        if self.zoom > 0 {
            self.settle(now);
            self.zoom -= 1;
            self.center = self.clamp_center(self.center);
        }
    }

    /// Stops any fly where it currently is
    fn settle(&mut self, now: Instant) {
        if self.flight.take().is_some() {
            self.center = self.view_center(now);
        }
    }

    /// Puts the crosshair back in the middle of the view
    pub fn reset_crosshair(&mut self, now: Instant) {
        self.crosshair = self.view_center(now);
    }

    /// Moves the crosshair by whole steps, panning when it leaves the view
    pub fn move_crosshair(&mut self, north_steps: i32, east_steps: i32, now: Instant) {
        let (lon_span, lat_span) = self.spans();
        self.crosshair = Coordinate::new(
            self.crosshair.latitude + f64::from(north_steps) * lat_span / CROSSHAIR_STEPS,
            self.crosshair.longitude + f64::from(east_steps) * lon_span / CROSSHAIR_STEPS,
        )
        .clamped();

        if !self.bounds(now).contains(self.crosshair) {
            self.flight = None;
            self.center = self.clamp_center(self.crosshair);
        }
    }
}
