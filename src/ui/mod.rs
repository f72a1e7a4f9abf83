//! UI rendering module for the weather dashboard
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components. Renderers read view models and
//! app state; they never change either.

pub mod dashboard;
pub mod help_overlay;
pub mod map_view;
pub mod notice;
pub mod search_overlay;

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Focus};

pub use help_overlay::render as render_help_overlay;
pub use search_overlay::render as render_search_overlay;

/// Shared color scheme
pub(crate) mod colors {
    use ratatui::style::Color;

    /// Panel titles and key hints
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Unavailable or disabled
    pub const UNKNOWN: Color = Color::DarkGray;
    /// Highlight tiles flagged as good
    pub const GOOD: Color = Color::Green;
    /// Highlight tiles flagged as alert, failures
    pub const ALERT: Color = Color::Red;
    /// Selection and keys
    pub const SELECTED: Color = Color::Yellow;
    pub const MARKER: Color = Color::LightRed;
    pub const COASTLINE: Color = Color::Gray;
}

/// Screen areas of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLayout {
    pub header: Rect,
    /// Everything between header and footer
    pub body: Rect,
    pub current: Rect,
    pub daily: Rect,
    pub highlights: Rect,
    pub hourly: Rect,
    pub map: Rect,
    /// Map area inside its border
    pub map_inner: Rect,
    pub footer: Rect,
}

impl DashboardLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
            .split(rows[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Length(6), Constraint::Min(0)])
            .split(columns[1]);

        let map = right[2];
        Self {
            header: rows[0],
            body: rows[1],
            current: left[0],
            daily: left[1],
            highlights: right[0],
            hourly: right[1],
            map,
            map_inner: Block::default().borders(Borders::ALL).inner(map),
            footer: rows[2],
        }
    }
}

/// Renders the whole screen
pub fn render(frame: &mut Frame, app: &App) {
    let now = Instant::now();
    let layout = DashboardLayout::new(frame.area());

    render_header(frame, layout.header, app);

    match &app.notice {
        Some(notice) => notice::render(frame, layout.body, notice),
        None => {
            dashboard::render(frame, &layout, &app.dashboard, now);
            map_view::render(frame, layout.map, app, now);
        }
    }

    render_footer(frame, layout.footer, app);

    if app.focus == Focus::Search {
        render_search_overlay(frame, &app.search);
    }
    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Title, loading indicator and the "use current location" control
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " weatherdash ",
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("[/] ", Style::default().fg(colors::SELECTED)),
        Span::styled("Search places  ", Style::default().fg(colors::SECONDARY)),
    ];

    if app.dashboard.home_control_disabled() {
        spans.push(Span::styled(
            "[c] Current location",
            Style::default()
                .fg(colors::UNKNOWN)
                .add_modifier(Modifier::DIM),
        ));
    } else {
        spans.push(Span::styled("[c] ", Style::default().fg(colors::SELECTED)));
        spans.push(Span::styled("Current location", Style::default().fg(colors::PRIMARY)));
    }

    if let Some(city) = &app.resolving_city {
        spans.push(Span::styled(
            format!("  Looking up {}...", city),
            Style::default().fg(colors::HEADER),
        ));
    } else if app.dashboard.is_loading() {
        spans.push(Span::styled("  Loading...", Style::default().fg(colors::HEADER)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Key hints for the focused part of the screen
fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hints: &[(&str, &str)] = match app.focus {
        Focus::Dashboard => &[("m", "Map"), ("r", "Retry"), ("?", "Help"), ("q", "Quit")],
        Focus::Map => &[
            ("arrows", "Move"),
            ("Enter", "Select"),
            ("+/-", "Zoom"),
            ("Esc", "Back"),
        ],
        Focus::Search => &[("Up/Down", "Choose"), ("Enter", "Open"), ("Esc", "Close")],
    };

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {} ", key), Style::default().fg(colors::HEADER)));
        spans.push(Span::styled(format!("{} ", label), Style::default().fg(colors::SECONDARY)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Helper function to create a centered rect
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Short text for an OpenWeatherMap icon code ("10d" -> "Rain")
pub fn weather_icon(code: &str) -> &'static str {
    let night = code.ends_with('n');
    match code.get(..2) {
        Some("01") if night => "Moon",
        Some("01") => "Sun",
        Some("02") if night => "Cloud/Moon",
        Some("02") => "Cloud/Sun",
        Some("03") | Some("04") => "Cloud",
        Some("09") => "Showers",
        Some("10") => "Rain",
        Some("11") => "Storm",
        Some("13") => "Snow",
        Some("50") => "Mist",
        _ => "?",
    }
}

/// Arrow pointing along the wind, from the rotation in degrees
pub fn wind_arrow(rotation: f64) -> char {
    const ARROWS: [char; 8] = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];
    let normalized = rotation.rem_euclid(360.0);
    ARROWS[((normalized / 45.0).round() as usize) % ARROWS.len()]
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{backend::TestBackend, buffer::Buffer, Frame, Terminal};

    /// Draws into a test terminal and returns the buffer as one string per row
    pub fn draw(width: u16, height: u16, render: impl FnOnce(&mut Frame)) -> Vec<String> {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(render).unwrap();
        rows(terminal.backend().buffer())
    }

    pub fn rows(buffer: &Buffer) -> Vec<String> {
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    pub fn contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|row| row.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_regions_do_not_overlap() {
        let layout = DashboardLayout::new(Rect::new(0, 0, 120, 40));

        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.y, 39);
        assert!(layout.current.intersection(layout.highlights).is_empty());
        assert!(layout.hourly.intersection(layout.map).is_empty());
        assert_eq!(layout.map_inner.x, layout.map.x + 1);
        assert_eq!(layout.map_inner.width, layout.map.width - 2);
        assert!(layout.map_inner.height > 0);
    }

    #[test]
    fn test_weather_icon_mapping() {
        assert_eq!(weather_icon("01d"), "Sun");
        assert_eq!(weather_icon("01n"), "Moon");
        assert_eq!(weather_icon("04n"), "Cloud");
        assert_eq!(weather_icon("10d"), "Rain");
        assert_eq!(weather_icon("50d"), "Mist");
        assert_eq!(weather_icon(""), "?");
    }

    #[test]
    fn test_wind_arrow_follows_rotation() {
        // Wind from the north blows south
        assert_eq!(wind_arrow(0.0 - 180.0), '↓');
        assert_eq!(wind_arrow(270.0 - 180.0), '→');
        assert_eq!(wind_arrow(0.0), '↑');
        assert_eq!(wind_arrow(337.0), '↖');
        assert_eq!(wind_arrow(350.0), '↑');
    }
}
