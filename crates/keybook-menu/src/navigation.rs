//! Standard navigation bindings for a [`Book`].
//!
//! ```text
//! Up / Down     previous / next line (repeat while held)
//! Home / End    first / last line
//! Enter         activate
//! Escape        cancel
//! other keys    incremental search (via `search_hook`)
//! ```

use std::time::Duration;

use keybook_core::{KeyState, NamedKey, Timestamp};
use keybook_input::Hotkey;

use crate::Book;

/// Default repeat interval for the arrow keys.
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(150);

/// Navigation binding configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationConfig {
    /// Repeat interval while Up or Down is held.
    pub repeat_interval: Duration,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { repeat_interval: DEFAULT_REPEAT_INTERVAL }
    }
}

/// Hotkeys driving `Book` navigation.
pub fn hotkeys<I: Timestamp>(config: &NavigationConfig) -> Vec<Hotkey<Book<I>, I>> {
    vec![
        Hotkey::new(KeyState::plain(NamedKey::Up), |book: &mut Book<I>| {
            book.move_up();
            Ok(())
        })
        .repeating(config.repeat_interval)
        .title("Previous line"),
        Hotkey::new(KeyState::plain(NamedKey::Down), |book: &mut Book<I>| {
            book.move_down();
            Ok(())
        })
        .repeating(config.repeat_interval)
        .title("Next line"),
        Hotkey::new(KeyState::plain(NamedKey::Home), |book: &mut Book<I>| {
            book.move_first();
            Ok(())
        })
        .title("First line"),
        Hotkey::new(KeyState::plain(NamedKey::End), |book: &mut Book<I>| {
            book.move_last();
            Ok(())
        })
        .title("Last line"),
        Hotkey::new(KeyState::plain(NamedKey::Enter), |book: &mut Book<I>| book.activate())
            .title("Activate"),
        Hotkey::new(KeyState::plain(NamedKey::Escape), |book: &mut Book<I>| book.cancel())
            .title("Back"),
    ]
}

/// Unhandled-key hook feeding printable keys to [`Book::handle_search`].
///
/// Keys held with control or alt are ignored; shift is allowed so capitals
/// search too.
pub fn search_hook<I: Timestamp>() -> impl FnMut(&mut Book<I>, &KeyState, I) + 'static {
    |book, state, now| {
        if state.control() || state.alt() {
            return;
        }
        if let Some(c) = state.key().as_char() {
            book.handle_search(c.encode_utf8(&mut [0; 4]), now);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use keybook_core::Modifiers;
    use keybook_input::Keyboard;

    use super::*;
    use crate::{Line, Page};

    fn keyboard() -> Keyboard<Book> {
        let mut keyboard = Keyboard::default().with_unhandled(search_hook());
        keyboard.add_hotkeys(hotkeys(&NavigationConfig::default()));
        keyboard
    }

    #[test]
    fn arrows_move_focus() {
        let mut keyboard = keyboard();
        let mut book: Book = Book::default();
        book.push(Page::new("Main").line(Line::label("One")).line(Line::label("Two")));
        let now = Instant::now();

        for step in 0..2 {
            let at = now + DEFAULT_REPEAT_INTERVAL * 2 * step;
            keyboard.press(&mut book, NamedKey::Down.into(), Modifiers::NONE, at);
            keyboard.release(&NamedKey::Down.into());
        }
        assert_eq!(book.current().and_then(Page::focus), Some(1));

        keyboard.press(&mut book, NamedKey::Home.into(), Modifiers::NONE, now);
        assert_eq!(book.current().and_then(Page::focus), Some(0));
    }

    #[test]
    fn modified_keys_do_not_search() {
        let mut keyboard = keyboard();
        let mut book: Book = Book::default();
        book.push(Page::new("Main").line(Line::label("Quit")));
        let now = Instant::now();

        keyboard.press(&mut book, 'q'.into(), Modifiers::CONTROL, now);
        assert_eq!(book.search_buffer(), "");

        keyboard.press(&mut book, 'Q'.into(), Modifiers::SHIFT, now);
        assert_eq!(book.search_buffer(), "q");
        assert_eq!(book.current().and_then(Page::focus), Some(0));
    }
}
