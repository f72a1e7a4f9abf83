//! Error panel shown in place of the dashboard

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::colors;
use crate::app::Notice;

pub fn render(frame: &mut Frame, area: Rect, notice: &Notice) {
    let (title, detail) = match notice {
        Notice::NotFound(city) => (" Location not found ", format!("No place named \"{}\" was found.", city)),
        Notice::LookupFailed(message) => (" Lookup failed ", format!("The place lookup failed: {}", message)),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::ALERT))
        .title(Span::styled(
            title,
            Style::default()
                .fg(colors::ALERT)
                .add_modifier(Modifier::BOLD),
        ));

    let lines = vec![
        Line::default(),
        Line::from(Span::styled(detail, Style::default().fg(colors::PRIMARY))),
        Line::default(),
        Line::from(vec![
            Span::styled("c", Style::default().fg(colors::HEADER)),
            Span::styled(" Go home", Style::default().fg(colors::SECONDARY)),
            Span::raw("  "),
            Span::styled("/", Style::default().fg(colors::HEADER)),
            Span::styled(" Search", Style::default().fg(colors::SECONDARY)),
            Span::raw("  "),
            Span::styled("q", Style::default().fg(colors::HEADER)),
            Span::styled(" Quit", Style::default().fg(colors::SECONDARY)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
