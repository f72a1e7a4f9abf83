//! Dashboard panels
//!
//! Renders the "Now" card, the highlights, the hourly strip and the 5-day
//! list from their view models. Regions without data show a loading line or
//! the failure with a retry hint.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{colors, weather_icon, wind_arrow, DashboardLayout};
use crate::dashboard::{Dashboard, RegionState};
use crate::data::PlaceName;
use crate::view::{
    CurrentWeatherCard, DailyForecastEntry, HighlightsCard, HourlyForecastView, PollutantBand,
    TileStyle,
};

/// Width of one column in the hourly strip
const HOURLY_COLUMN: usize = 9;

/// Renders all data panels; the map is drawn separately
pub fn render(frame: &mut Frame, layout: &DashboardLayout, dashboard: &Dashboard, now: Instant) {
    let style = if dashboard.fading_in(now) {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };

    render_panel(
        frame,
        layout.current,
        " Now ",
        current_lines(&dashboard.current_weather, &dashboard.place_name),
        style,
    );
    // The AQI advisory runs longer than the panel is wide
    let highlights = Paragraph::new(region_lines(&dashboard.highlights, highlight_lines))
        .block(panel_block(" Today Highlights "))
        .style(style)
        .wrap(Wrap { trim: true });
    frame.render_widget(highlights, layout.highlights);
    render_panel(
        frame,
        layout.hourly,
        " Today at ",
        region_lines(&dashboard.hourly, hourly_lines),
        style,
    );
    render_panel(
        frame,
        layout.daily,
        " 5 Days Forecast ",
        region_lines(&dashboard.daily, |days| daily_lines(days)),
        style,
    );
}

fn panel_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        ))
}

fn render_panel(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>, style: Style) {
    frame.render_widget(Paragraph::new(lines).block(panel_block(title)).style(style), area);
}

/// Lines for a region, or its loading/failure placeholder
fn region_lines<T>(state: &RegionState<T>, build: impl FnOnce(&T) -> Vec<Line<'static>>) -> Vec<Line<'static>> {
    match state {
        RegionState::Ready(value) => build(value),
        RegionState::Loading => vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(colors::UNKNOWN),
        ))],
        RegionState::Failed(message) => failure_lines(message),
    }
}

fn failure_lines(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            format!("Unavailable: {}", message),
            Style::default().fg(colors::ALERT),
        )),
        Line::from(vec![
            Span::styled("r", Style::default().fg(colors::HEADER)),
            Span::styled(" Retry", Style::default().fg(colors::SECONDARY)),
        ]),
    ]
}

fn current_lines(card: &RegionState<CurrentWeatherCard>, place: &RegionState<PlaceName>) -> Vec<Line<'static>> {
    let mut lines = region_lines(card, |card| {
        vec![
            Line::from(vec![
                Span::styled(
                    format!("{}°C", card.temperature),
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(weather_icon(&card.icon), Style::default().fg(colors::SELECTED)),
            ]),
            Line::from(Span::styled(card.description.clone(), Style::default().fg(colors::SECONDARY))),
            Line::from(""),
            Line::from(Span::styled(card.date.clone(), Style::default().fg(colors::SECONDARY))),
        ]
    });

    // The place line only joins a card that exists
    if card.ready().is_some() {
        let place_line = match place {
            RegionState::Ready(place) => {
                Line::from(Span::styled(place.to_string(), Style::default().fg(colors::PRIMARY)))
            }
            RegionState::Loading => Line::from(Span::styled("...", Style::default().fg(colors::UNKNOWN))),
            RegionState::Failed(_) => Line::from(Span::styled(
                "Unknown place",
                Style::default().fg(colors::UNKNOWN),
            )),
        };
        lines.push(place_line);
    }
    lines
}

fn tile_color(style: TileStyle) -> ratatui::style::Color {
    match style {
        TileStyle::Normal => colors::PRIMARY,
        TileStyle::Alert => colors::ALERT,
        TileStyle::Good => colors::GOOD,
    }
}

/// Color of the AQI badge, from good (1) to very poor (5)
fn aqi_color(ordinal: u8) -> ratatui::style::Color {
    use ratatui::style::Color;
    match ordinal {
        1 => Color::Green,
        2 => Color::LightGreen,
        3 => Color::Yellow,
        4 => Color::LightRed,
        _ => Color::Red,
    }
}

fn band_color(band: PollutantBand) -> ratatui::style::Color {
    match band {
        PollutantBand::Good => colors::GOOD,
        PollutantBand::Moderate => ratatui::style::Color::Yellow,
        PollutantBand::Sensitive => ratatui::style::Color::LightRed,
        PollutantBand::Unhealthy => colors::ALERT,
    }
}

fn highlight_lines(card: &HighlightsCard) -> Vec<Line<'static>> {
    let label = |text: &str| Span::styled(text.to_string(), Style::default().fg(colors::SECONDARY));
    let value = |text: String| Span::styled(text, Style::default().fg(colors::PRIMARY));

    let mut pollutants = vec![];
    for tile in &card.pollutants {
        pollutants.push(label(&format!("{} ", tile.name)));
        pollutants.push(Span::styled(
            format!("{}  ", tile.value),
            Style::default().fg(band_color(tile.band)),
        ));
    }

    vec![
        Line::from(vec![
            label("Air Quality Index "),
            Span::styled(
                format!(" {} ", card.aqi.label),
                Style::default()
                    .fg(ratatui::style::Color::Black)
                    .bg(aqi_color(card.aqi.level.ordinal())),
            ),
        ]),
        Line::from(Span::styled(card.aqi.message, Style::default().fg(colors::UNKNOWN))),
        Line::from(pollutants),
        Line::from(vec![
            label("Sunrise "),
            value(card.sunrise.clone()),
            Span::raw("   "),
            label("Sunset "),
            value(card.sunset.clone()),
        ]),
        Line::from(vec![
            label("Humidity "),
            Span::styled(
                format!("{}%", card.humidity),
                Style::default().fg(tile_color(card.humidity_style)),
            ),
            Span::raw("   "),
            label("Pressure "),
            value(format!("{} hPa", card.pressure)),
        ]),
        Line::from(vec![
            label("Visibility "),
            Span::styled(
                format!("{} km", card.visibility_km),
                Style::default().fg(tile_color(card.visibility_style)),
            ),
            Span::raw("   "),
            label("Feels like "),
            value(format!("{}°C", card.feels_like)),
        ]),
    ]
}

fn cell(text: impl Into<String>) -> String {
    let text: String = text.into();
    format!("{:<width$}", text, width = HOURLY_COLUMN)
}

fn hourly_lines(view: &HourlyForecastView) -> Vec<Line<'static>> {
    let labels: String = view.temperatures.iter().map(|t| cell(t.label.clone())).collect();
    let temperatures: String = view
        .temperatures
        .iter()
        .map(|t| cell(format!("{}° {}", t.temperature, weather_icon(&t.icon))))
        .collect();
    let winds: String = view
        .winds
        .iter()
        .map(|w| cell(format!("{} {}km/h", wind_arrow(w.rotation), w.speed_kmh)))
        .collect();

    vec![
        Line::from(Span::styled(labels, Style::default().fg(colors::SECONDARY))),
        Line::from(Span::styled(temperatures, Style::default().fg(colors::PRIMARY))),
        Line::from(Span::styled(winds, Style::default().fg(colors::HEADER))),
    ]
}

fn daily_lines(days: &[DailyForecastEntry]) -> Vec<Line<'static>> {
    days.iter()
        .map(|day| {
            Line::from(vec![
                Span::styled(format!("{:<10}", weather_icon(&day.icon)), Style::default().fg(colors::SELECTED)),
                Span::styled(
                    format!("{:>4}°", day.temp_max),
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {} {}  ", day.day_of_month, day.month),
                    Style::default().fg(colors::SECONDARY),
                ),
                Span::styled(day.weekday, Style::default().fg(colors::SECONDARY)),
            ])
        })
        .collect()
}
