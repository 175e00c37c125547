//! Current page
//!
//! Lists the lines of the page on top of the book, marking the focus.

use keybook_menu::Book;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const FOCUS_PREFIX: &str = "> ";
const PLAIN_PREFIX: &str = "  ";

/// Render the page on top of `book`.
pub fn render<I>(frame: &mut Frame, book: &Book<I>, area: Rect) {
    let Some(page) = book.current() else {
        let block = Block::default().borders(Borders::ALL);
        frame.render_widget(Paragraph::new(" No menu").block(block), area);
        return;
    };

    let title = match book.depth() {
        1 => format!(" {} ", page.title()),
        depth => format!(" {} ({depth}) ", page.title()),
    };

    let items: Vec<ListItem> = page
        .all_lines()
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let (prefix, style) = if page.focus() == Some(index) {
                (FOCUS_PREFIX, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                (PLAIN_PREFIX, Style::default())
            };
            ListItem::new(Line::from(vec![Span::raw(prefix), Span::styled(line.title(), style)]))
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title(title);
    let list = List::new(items).block(block);

    // Keeps the focused line scrolled into view on long pages.
    let mut state = ListState::default().with_selected(page.focus());
    frame.render_stateful_widget(list, area, &mut state);
}
