//! Demo menu tree shown by the `keybook-tui` binary.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use keybook_core::{KeyState, Modifiers, NamedKey};
use keybook_input::Hotkey;
use keybook_menu::{Book, Line, Page, pages};

const VOICES: [&str; 3] = ["Alto", "Bass", "Tenor"];
const MAX_SPEED: u8 = 10;

/// Settings edited by the demo pages.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    voice: Option<String>,
    speed: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self { voice: None, speed: 5 }
    }
}

/// Pop every page, which ends the run loop.
fn close_all(book: &mut Book) {
    while book.pop().is_some() {}
}

/// Global hotkeys for the demo: `ctrl+q` quits from any page.
pub fn hotkeys() -> Vec<Hotkey<Book>> {
    vec![
        Hotkey::new(KeyState::new('q', Modifiers::CONTROL), |book: &mut Book| {
            close_all(book);
            Ok(())
        })
        .title("Quit"),
    ]
}

/// `F1` opens `help` on top of the current page.
pub fn help_hotkey(help: Page) -> Hotkey<Book> {
    Hotkey::new(KeyState::plain(NamedKey::F(1)), move |book: &mut Book| {
        book.push(help.clone());
        Ok(())
    })
    .title("Keyboard shortcuts")
}

/// Root page. It cannot be dismissed with Escape; `Quit` asks first.
pub fn main_menu(help: Page) -> Page {
    let settings = Rc::new(RefCell::new(Settings::default()));

    Page::new("keybook")
        .line(Line::new("Settings", move |book: &mut Book| {
            book.push(settings_page(&settings));
            Ok(())
        }))
        .line(Line::new("Keyboard shortcuts", move |book: &mut Book| {
            book.push(help.clone());
            Ok(())
        }))
        .line(Line::new("Quit", |book: &mut Book| {
            book.push(pages::confirm("Really quit?", |book, yes| {
                if yes {
                    close_all(book);
                }
                Ok(())
            }));
            Ok(())
        }))
        .dismissible(false)
}

fn settings_page(settings: &Rc<RefCell<Settings>>) -> Page {
    let voice_title = Rc::clone(settings);
    let voice_select = Rc::clone(settings);
    let speed_title = Rc::clone(settings);
    let speed_step = Rc::clone(settings);
    let presses = Rc::new(Cell::new(0_u32));
    let presses_title = Rc::clone(&presses);

    Page::new("Settings")
        .line(Line::computed(
            move || match &voice_title.borrow().voice {
                Some(voice) => format!("Voice: {voice}"),
                None => "Voice: default".to_string(),
            },
            move |book: &mut Book| {
                let settings = Rc::clone(&voice_select);
                book.push(pages::picker("Voice", VOICES, true, move |_, choice| {
                    tracing::info!(?choice, "voice selected");
                    settings.borrow_mut().voice = choice.map(str::to_string);
                    Ok(())
                }));
                Ok(())
            },
        ))
        .line(Line::computed(
            move || format!("Speed: {}", speed_title.borrow().speed),
            move |book: &mut Book| {
                {
                    let mut settings = speed_step.borrow_mut();
                    settings.speed = settings.speed % MAX_SPEED + 1;
                }
                book.show_focus()?;
                Ok(())
            },
        ))
        .line(
            Line::computed(
                move || format!("Pressed {} times", presses_title.get()),
                move |book: &mut Book| {
                    presses.set(presses.get() + 1);
                    book.show_focus()?;
                    Ok(())
                },
            )
            .sound("demo/click"),
        )
        .line(Line::new("Back", |book: &mut Book| {
            book.pop();
            Ok(())
        }))
}
