//! Generic runtime for host orchestration.
//!
//! The runtime drives the event loop, coordinating between:
//! - [`Keyboard`]: held keys, hotkey dispatch and repeat timers
//! - [`Book`]: the page stack the hotkeys act on
//! - [`Driver`]: platform-specific I/O

use keybook_core::MenuError;
use keybook_input::Keyboard;
use keybook_menu::Book;

use crate::{Driver, FeedbackRouter, InputEvent, RuntimeError, SoundPlayer};

type Handle<D> = <D as SoundPlayer>::Handle;

/// Generic runtime that owns the keyboard, the book and the driver.
pub struct Runtime<D: Driver> {
    driver: D,
    keyboard: Keyboard<Book<D::Instant>, D::Instant>,
    book: Book<D::Instant>,
    router: FeedbackRouter<Handle<D>>,
}

impl<D: Driver> Runtime<D> {
    /// Create a runtime. `book` should already hold the initial page.
    pub fn new(
        driver: D,
        keyboard: Keyboard<Book<D::Instant>, D::Instant>,
        book: Book<D::Instant>,
    ) -> Self {
        Self { driver, keyboard, book, router: FeedbackRouter::new() }
    }

    /// Run until the page stack empties or the driver reports
    /// [`InputEvent::Quit`].
    ///
    /// Each cycle polls one event (waking for the next repeat deadline),
    /// dispatches it, fires due repeat timers, executes queued feedback and
    /// renders.
    ///
    /// # Errors
    ///
    /// - `RuntimeError::Menu` if the book is empty at start
    /// - `RuntimeError::Driver` if polling or rendering fails
    pub async fn run(&mut self) -> Result<(), RuntimeError<D::Error>> {
        if self.book.is_empty() {
            return Err(MenuError::InvalidState { operation: "run" }.into());
        }
        self.flush();
        self.driver.render(&self.book).map_err(RuntimeError::Driver)?;

        while !self.book.is_empty() {
            let deadline = self.keyboard.next_deadline();
            let event = self.driver.poll_event(deadline).await.map_err(RuntimeError::Driver)?;

            if let Some(event) = event
                && self.handle_event(event)
            {
                break;
            }
            self.tick();
            self.flush();
            self.driver.render(&self.book).map_err(RuntimeError::Driver)?;
        }

        tracing::debug!(depth = self.book.depth(), "runtime stopping");
        self.keyboard.release_all();
        self.router.stop_all(&mut self.driver);
        self.driver.shutdown();
        Ok(())
    }

    /// Dispatch one input event. Returns `true` if the host asked to quit.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Press { key, modifiers } => {
                let now = self.driver.now();
                self.keyboard.press(&mut self.book, key, modifiers, now);
            },
            InputEvent::Release { key } => self.keyboard.release(&key),
            InputEvent::FocusLost => {
                tracing::debug!("focus lost, releasing all keys");
                self.keyboard.release_all();
            },
            InputEvent::Tick => {},
            InputEvent::Quit => return true,
        }
        false
    }

    /// Fire repeat timers that are due.
    pub fn tick(&mut self) {
        let now = self.driver.now();
        self.keyboard.tick(&mut self.book, now);
    }

    /// Execute the book's queued feedback against the driver.
    pub fn flush(&mut self) {
        let feedback = self.book.take_feedback();
        self.router.apply(feedback, &mut self.driver);
    }

    /// The driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The driver, mutably.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// The book.
    pub fn book(&self) -> &Book<D::Instant> {
        &self.book
    }

    /// The book, mutably.
    pub fn book_mut(&mut self) -> &mut Book<D::Instant> {
        &mut self.book
    }

    /// The keyboard.
    pub fn keyboard(&self) -> &Keyboard<Book<D::Instant>, D::Instant> {
        &self.keyboard
    }

    /// The keyboard, mutably.
    pub fn keyboard_mut(&mut self) -> &mut Keyboard<Book<D::Instant>, D::Instant> {
        &mut self.keyboard
    }
}
