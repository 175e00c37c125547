//! keybook TUI entry point.

use std::{fs::File, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use keybook_input::Keyboard;
use keybook_menu::{
    Book, BookConfig,
    navigation::{self, NavigationConfig},
    pages,
};
use keybook_tui::{Runtime, TerminalDriver, demo};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Keyboard-driven menu demo
#[derive(Parser, Debug)]
#[command(name = "keybook-tui")]
#[command(about = "Screen-reader friendly terminal menus driven by hotkeys")]
#[command(version)]
struct Args {
    /// Pause (ms) after which type-ahead search starts over
    #[arg(long, default_value_t = 1000)]
    search_timeout_ms: u64,

    /// Repeat interval (ms) while an arrow key is held
    #[arg(long, default_value_t = 150)]
    repeat_ms: u64,

    /// Write logs to this file (the terminal is busy with the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_layer = match &args.log_file {
        Some(path) => {
            let file = File::create(path)?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        },
        None => None,
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(log_layer).with(filter).init();

    let navigation_config =
        NavigationConfig { repeat_interval: Duration::from_millis(args.repeat_ms) };
    let book_config = BookConfig {
        search_timeout: Duration::from_millis(args.search_timeout_ms),
        ..BookConfig::default()
    };
    tracing::info!(?navigation_config, ?book_config, "keybook starting");

    let mut keyboard: Keyboard<Book> =
        Keyboard::default().with_unhandled(navigation::search_hook());
    keyboard.add_hotkeys(navigation::hotkeys(&navigation_config));
    keyboard.add_hotkeys(demo::hotkeys());
    let help = pages::hotkeys(&keyboard);
    keyboard.add_hotkey(demo::help_hotkey(help.clone()));

    let mut book = Book::new(book_config);
    book.push(demo::main_menu(help));

    let driver = TerminalDriver::new()?;
    let mut runtime = Runtime::new(driver, keyboard, book);
    runtime.run().await?;

    tracing::info!("keybook stopped");
    Ok(())
}
