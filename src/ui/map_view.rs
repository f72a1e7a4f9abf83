//! World map panel
//!
//! Draws coastlines on a canvas for the current viewport, the locator marker
//! and, while the map has focus, the selection crosshair. The map is hidden
//! behind a placeholder while a render is loading.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Block, Borders, Paragraph,
    },
    Frame,
};

use super::colors;
use crate::app::{App, Focus};

const MARKER_SYMBOL: &str = "◉";
const CROSSHAIR_SYMBOL: &str = "+";

pub fn render(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let focused = app.focus == Focus::Map;
    let title = format!(" Map  zoom {} ", app.map.zoom());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { colors::SELECTED } else { colors::HEADER }))
        .title(Span::styled(
            title,
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        ));

    if app.dashboard.is_loading() {
        let placeholder = Paragraph::new(Span::styled("Locating...", Style::default().fg(colors::UNKNOWN)))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let bounds = app.map.bounds(now);
    let marker = app.map.marker();
    let crosshair = focused.then(|| app.map.crosshair());

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(move |ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: colors::COASTLINE,
            });
            ctx.layer();
            if let Some(marker) = marker {
                ctx.print(
                    marker.longitude,
                    marker.latitude,
                    Span::styled(
                        MARKER_SYMBOL,
                        Style::default()
                            .fg(colors::MARKER)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
            if let Some(crosshair) = crosshair {
                ctx.print(
                    crosshair.longitude,
                    crosshair.latitude,
                    Span::styled(CROSSHAIR_SYMBOL, Style::default().fg(colors::SELECTED)),
                );
            }
        });

    frame.render_widget(canvas, area);
}
