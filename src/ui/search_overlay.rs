//! Place search overlay
//!
//! Renders the search field and its result list as a centered modal.

use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{centered_rect, colors};
use crate::search::{SearchDebouncer, SearchState};
use crate::view::SearchResultItem;

const OVERLAY_WIDTH: u16 = 60;
/// Input line, a blank line and up to five results with subtitles
const OVERLAY_HEIGHT: u16 = 15;

/// Renders the search overlay on top of the current view
pub fn render(frame: &mut Frame, search: &SearchDebouncer) {
    let overlay_area = centered_rect(OVERLAY_WIDTH, OVERLAY_HEIGHT, frame.area());
    frame.render_widget(Clear, overlay_area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(colors::SELECTED)),
            Span::styled(search.query().to_string(), Style::default().fg(colors::PRIMARY)),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::from(""),
    ];
    lines.extend(body_lines(search));

    let block = Block::default()
        .title(" Search places ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, overlay_area);
}

fn status_line(text: String, color: ratatui::style::Color) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(text, Style::default().fg(color)))]
}

fn body_lines(search: &SearchDebouncer) -> Vec<Line<'static>> {
    match search.state() {
        SearchState::Idle => status_line("Type a city or place name".to_string(), colors::UNKNOWN),
        SearchState::Pending => status_line("Searching...".to_string(), colors::HEADER),
        SearchState::Resolved => {
            if let Some(error) = search.error() {
                return status_line(format!("Search failed: {}", error), colors::ALERT);
            }
            if search.results().is_empty() {
                return status_line("No places found".to_string(), colors::UNKNOWN);
            }

            let mut lines = Vec::new();
            for (index, result) in search.results().iter().enumerate() {
                let item = SearchResultItem::from(result);
                let selected = index == search.selected_index();
                let title_style = if selected {
                    Style::default()
                        .fg(colors::SELECTED)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(colors::PRIMARY)
                };
                lines.push(Line::from(vec![
                    Span::raw(if selected { "> " } else { "  " }),
                    Span::styled(item.title, title_style),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("    {}", item.subtitle),
                    Style::default().fg(colors::SECONDARY),
                )));
            }
            lines
        }
    }
}
