//! Help overlay showing all keybindings
//!
//! Renders a centered modal overlay with keyboard and mouse shortcuts and the
//! concentration bands used to color the pollutant readings.

use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{centered_rect, colors};
use crate::view::POLLUTANT_GUIDES;

/// Renders the help overlay on top of the current view
pub fn render(frame: &mut Frame) {
    let overlay_area = centered_rect(68, 31, frame.area());

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let mut lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Location"),
        help_line("/", "Search places"),
        help_line("c", "Current (home) location"),
        help_line("r", "Retry / refresh"),
        Line::from(""),
        section("Map"),
        help_line("m", "Focus map"),
        help_line("arrows, h/j/k/l", "Move crosshair"),
        help_line("Enter", "Weather at crosshair"),
        help_line("click", "Weather at point"),
        help_line("+/-, wheel", "Zoom in/out"),
        Line::from(""),
        section("Other"),
        help_line("Esc", "Go back / Close"),
        help_line("?", "Toggle this help"),
        help_line("q", "Quit application"),
        Line::from(""),
        section("Pollutants"),
    ];
    for guide in &POLLUTANT_GUIDES {
        let key = format!("{} {}", guide.name, guide.unit);
        lines.push(help_line(&key, &guide.summary()));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Esc or ? to close",
        Style::default().fg(colors::UNKNOWN),
    )));

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, overlay_area);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)))
}

/// Creates a help line with key and description
fn help_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<18}", key), Style::default().fg(colors::SELECTED)),
        Span::raw(description.to_string()),
    ])
}
