//! UI rendering
//!
//! Draws the current menu page and a status bar. Rendering is pure: it reads
//! the [`Book`] and the driver's [`Status`] and never mutates either.

mod page;
mod status;

use keybook_menu::{Book, SoundId};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

/// Output the terminal shows in place of speech and audio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    /// Last announcement.
    pub message: Option<String>,
    /// Sounds currently playing, by handle.
    pub sounds: Vec<(u64, SoundId)>,
}

/// Render the entire UI.
pub fn render<I>(frame: &mut Frame, book: &Book<I>, status: &Status) {
    const PAGE_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(PAGE_MIN_HEIGHT), Constraint::Length(STATUS_HEIGHT)])
        .split(frame.area());

    let [page_area, status_area] = chunks.as_ref() else {
        return;
    };

    page::render(frame, book, *page_area);
    status::render(frame, book, status, *status_area);
}
