//! Status bar
//!
//! Shows the last announcement, the type-ahead buffer and playing sounds.

use keybook_menu::Book;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Status;

/// Render the status bar.
pub fn render<I>(frame: &mut Frame, book: &Book<I>, status: &Status, area: Rect) {
    let mut spans = vec![Span::raw(" "), Span::raw(status.message.as_deref().unwrap_or(""))];

    if !book.search_buffer().is_empty() {
        spans.push(Span::styled(
            format!(" | Search: {}", book.search_buffer()),
            Style::default().fg(Color::Cyan),
        ));
    }

    for (_, sound) in &status.sounds {
        spans.push(Span::styled(format!(" | \u{266a} {sound}"), Style::default().fg(Color::Gray)));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
