//! Ready-made pages.

use std::rc::Rc;

use keybook_core::{ActionError, Source, Timestamp};
use keybook_input::Keyboard;

use crate::{Book, Line, Page};

/// Title of the confirm line on [`confirm`] pages.
pub const OK: &str = "OK";
/// Title of the refuse line on [`confirm`] pages.
pub const CANCEL: &str = "Cancel";
/// Title of the none-selection line on [`picker`] pages.
pub const CLEAR: &str = "Clear";

/// Two-line page asking the user to confirm.
///
/// `OK` and `Cancel` pop the page and then call `on_answer` with `true` or
/// `false`. Cancelling the page answers `false`.
pub fn confirm<I: 'static>(
    title: impl Into<Source<String>>,
    on_answer: impl Fn(&mut Book<I>, bool) -> Result<(), ActionError> + 'static,
) -> Page<I> {
    let on_answer = Rc::new(on_answer);
    let ok = Rc::clone(&on_answer);
    let refuse = Rc::clone(&on_answer);

    Page::new(title)
        .line(Line::new(OK, move |book: &mut Book<I>| {
            book.pop();
            ok(book, true)
        }))
        .line(Line::new(CANCEL, move |book: &mut Book<I>| {
            book.pop();
            refuse(book, false)
        }))
        .on_cancel(move |book| on_answer(book, false))
}

/// Page listing every hotkey registered on `keyboard`.
///
/// Each line reads `<key>: <title>` (just `<key>` for untitled hotkeys) and is
/// recomputed on every read. Activating a line runs the hotkey's action with
/// its guard and the keyboard's error handler.
pub fn hotkeys<I: Timestamp>(keyboard: &Keyboard<Book<I>, I>) -> Page<I> {
    let on_error = keyboard.on_error();
    let lines = keyboard.hotkeys().map(|hotkey| {
        let trigger = hotkey.trigger().canonical();
        let title = hotkey.title_source().cloned();
        Line::computed(
            move || match &title {
                Some(title) => format!("{trigger}: {}", title.resolve()),
                None => trigger.clone(),
            },
            hotkey.invoker(Rc::clone(&on_error)),
        )
    });
    Page::new("Hotkeys").lines(lines)
}

/// Page listing `items` for selection.
///
/// Selecting an item pops the page and calls `on_select` with its name. With
/// `allow_clear`, a trailing `Clear` line reports `None`.
pub fn picker<I: 'static>(
    title: impl Into<Source<String>>,
    items: impl IntoIterator<Item = impl Into<String>>,
    allow_clear: bool,
    on_select: impl Fn(&mut Book<I>, Option<&str>) -> Result<(), ActionError> + 'static,
) -> Page<I> {
    let on_select = Rc::new(on_select);

    let mut lines: Vec<Line<I>> = items
        .into_iter()
        .map(|item| {
            let name: String = item.into();
            let on_select = Rc::clone(&on_select);
            Line::new(name.clone(), move |book: &mut Book<I>| {
                book.pop();
                on_select(book, Some(&name))
            })
        })
        .collect();

    if allow_clear {
        lines.push(Line::new(CLEAR, move |book: &mut Book<I>| {
            book.pop();
            on_select(book, None)
        }));
    }

    Page::new(title).lines(lines)
}
