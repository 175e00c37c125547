//! Operations for model-based testing.
//!
//! A [`World`] is a keyboard and book wired the way a host wires them, on a
//! virtual clock. Operations are generated randomly (by proptest or a fuzzer)
//! and applied one at a time; invariants are checked in between.

use std::{cell::Cell, rc::Rc, time::Duration};

use arbitrary::Arbitrary;
use keybook_core::{ActionError, Environment, Key, Modifiers, NamedKey};
use keybook_input::{ErrorContext, Keyboard};
use keybook_menu::{
    Book, Line, Page,
    navigation::{self, NavigationConfig},
    pages,
};

use crate::{
    SimEnv, SimInstant,
    invariants::{InvariantRegistry, SystemSnapshot, Violation},
};

/// Keys the model presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum NavKey {
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Enter.
    Enter,
    /// Escape.
    Escape,
    /// A letter, `'a' + n % 26`.
    Letter(u8),
}

impl NavKey {
    /// Key this maps to.
    pub fn key(self) -> Key {
        match self {
            Self::Up => NamedKey::Up.into(),
            Self::Down => NamedKey::Down.into(),
            Self::Home => NamedKey::Home.into(),
            Self::End => NamedKey::End.into(),
            Self::Enter => NamedKey::Enter.into(),
            Self::Escape => NamedKey::Escape.into(),
            Self::Letter(n) => char::from(b'a' + n % 26).into(),
        }
    }
}

/// Operations that can be applied to a [`World`].
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Press a key, optionally with control held.
    Press {
        /// Key pressed.
        key: NavKey,
        /// Control modifier.
        control: bool,
    },

    /// Release a key.
    Release(NavKey),

    /// Advance virtual time and fire due repeat timers.
    Advance {
        /// Milliseconds to advance.
        millis: u16,
    },

    /// Host lost focus.
    FocusLost,
}

/// Keyboard plus book on a virtual clock.
pub struct World {
    env: SimEnv,
    keyboard: Keyboard<Book<SimInstant>, SimInstant>,
    book: Book<SimInstant>,
    failures: Rc<Cell<usize>>,
    registry: InvariantRegistry,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// World showing [`sample_menu`] with the standard navigation bindings.
    pub fn new() -> Self {
        let failures = Rc::new(Cell::new(0));
        let on_error = {
            let failures = Rc::clone(&failures);
            Rc::new(move |error: &ActionError, context: &ErrorContext| {
                tracing::debug!(%error, trigger = %context.trigger, "model action failed");
                failures.set(failures.get() + 1);
            })
        };

        let mut keyboard = Keyboard::new(on_error).with_unhandled(navigation::search_hook());
        keyboard.add_hotkeys(navigation::hotkeys(&NavigationConfig::default()));

        let mut book = Book::default();
        book.push(sample_menu());

        Self { env: SimEnv::new(), keyboard, book, failures, registry: InvariantRegistry::standard() }
    }

    /// Apply one operation.
    pub fn apply(&mut self, op: &Operation) {
        let now = self.env.now();
        match *op {
            Operation::Press { key, control } => {
                let modifiers = if control { Modifiers::CONTROL } else { Modifiers::NONE };
                self.keyboard.press(&mut self.book, key.key(), modifiers, now);
            },
            Operation::Release(key) => self.keyboard.release(&key.key()),
            Operation::Advance { millis } => {
                self.env.advance(Duration::from_millis(u64::from(millis)));
                self.keyboard.tick(&mut self.book, self.env.now());
            },
            Operation::FocusLost => self.keyboard.release_all(),
        }
        self.book.take_feedback();
    }

    /// Snapshot of book and keyboard.
    pub fn snapshot(&self) -> SystemSnapshot {
        SystemSnapshot::from_book(&self.book).with_keyboard(&self.keyboard)
    }

    /// Run the standard invariants.
    ///
    /// # Errors
    ///
    /// Every violated invariant.
    pub fn check(&self) -> Result<(), Vec<Violation>> {
        self.registry.check_all(&self.snapshot())
    }

    /// The book.
    pub fn book(&self) -> &Book<SimInstant> {
        &self.book
    }

    /// The keyboard.
    pub fn keyboard(&self) -> &Keyboard<Book<SimInstant>, SimInstant> {
        &self.keyboard
    }

    /// The virtual clock.
    pub fn env(&self) -> &SimEnv {
        &self.env
    }

    /// Action failures routed to the error handler so far.
    pub fn failures(&self) -> usize {
        self.failures.get()
    }
}

/// Small menu tree exercising nested pages, confirm and picker pages, and a
/// failing line. The root page cannot be dismissed.
pub fn sample_menu() -> Page<SimInstant> {
    let settings = || {
        Page::new("Settings")
            .line(Line::new("Voice", |book: &mut Book<SimInstant>| {
                book.push(pages::picker("Voice", ["Alto", "Bass", "Tenor"], true, |_, _| Ok(())));
                Ok(())
            }))
            .line(Line::label("Speed"))
            .line(Line::new("Back", |book: &mut Book<SimInstant>| {
                book.pop();
                Ok(())
            }))
    };

    Page::new("Main")
        .line(Line::new("Settings", move |book: &mut Book<SimInstant>| {
            book.push(settings());
            Ok(())
        }))
        .line(Line::new("Reset", |book: &mut Book<SimInstant>| {
            book.push(pages::confirm("Reset everything?", |_, _| Ok(())));
            Ok(())
        }))
        .line(Line::new("Broken", |_: &mut Book<SimInstant>| Err(ActionError::msg("always fails"))))
        .line(Line::label("About"))
        .dismissible(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_on_broken_line_is_reported() {
        let mut world = World::new();
        for op in [
            Operation::Press { key: NavKey::End, control: false },
            Operation::Release(NavKey::End),
            Operation::Press { key: NavKey::Up, control: false },
            Operation::Release(NavKey::Up),
            Operation::Press { key: NavKey::Enter, control: false },
        ] {
            world.apply(&op);
        }
        assert_eq!(world.failures(), 1);
        assert!(world.check().is_ok());
    }

    #[test]
    fn root_survives_escape() {
        let mut world = World::new();
        world.apply(&Operation::Press { key: NavKey::Escape, control: false });
        assert_eq!(world.book().depth(), 1);
    }

    #[test]
    fn letter_keys_map_into_alphabet() {
        assert_eq!(NavKey::Letter(0).key().as_char(), Some('a'));
        assert_eq!(NavKey::Letter(27).key().as_char(), Some('b'));
    }
}
