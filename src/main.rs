//! Tokenizing Text Entry - terminal demo host
//!
//! An interactive reference host for the tokenbox engine. It owns the
//! rendering side of the contract: key events are forwarded to the
//! engine as input notifications, emitted commands drive a repaint, and
//! committed tokens show as colored chips above the entry line.
//!
//! # Usage
//!
//! ```bash
//! # Built-in sample candidates, semicolon delimiter
//! tokenbox
//!
//! # Candidates from a JSON file, comma delimiter
//! tokenbox -f addresses.json --delimiter comma
//! ```

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, event, execute, terminal};
use nu_ansi_term::{Color, Style};
use tracing::{debug, Level};

mod cli;
mod config;
mod error;
mod input;

use cli::CliInterface;
use error::Result;
use input::events::InputEvent;
use input::source::{CandidateSource, FileSource, StaticSource};
use input::TokenBox;

/// Sample candidates used when no candidate file is given.
const SAMPLE_CANDIDATES: &[&str] = &[
    "ada@example.com",
    "alan@example.com",
    "edsger@example.org",
    "grace@example.com",
    "katherine@example.org",
    "linus@example.net",
];

/// Application entry point
#[tokio::main]
async fn main() {
    // Initialize the application and handle any errors
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Load the candidate source
/// 4. Run the interactive loop
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    let source = load_source(&cli)?;
    let engine = TokenBox::from_config(cli.config(), source)?;

    run_interactive_loop(&cli, engine).await
}

/// Initialize the tracing subscriber
///
/// Logs go to stderr so they never interleave with the raw-mode UI.
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Build the candidate source from arguments
fn load_source(cli: &CliInterface) -> Result<Arc<dyn CandidateSource>> {
    match &cli.args().candidates {
        Some(path) => Ok(Arc::new(FileSource::load(path)?)),
        None => Ok(Arc::new(StaticSource::new(
            SAMPLE_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        ))),
    }
}

/// Interactive raw-mode loop
///
/// Forwards key presses to the engine, applies completed search
/// outcomes, and repaints after every change. Ctrl+C exits.
async fn run_interactive_loop(cli: &CliInterface, mut engine: TokenBox) -> Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let color = !cli.args().no_color;
    let outcome = event_loop(&mut engine, &mut stdout, color).await;

    execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    outcome
}

async fn event_loop(engine: &mut TokenBox, stdout: &mut io::Stdout, color: bool) -> Result<()> {
    render(engine, stdout, color)?;

    loop {
        let mut dirty = false;

        // Drive the interaction thread from terminal events
        if event::poll(Duration::from_millis(30))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if is_quit(&key) {
                        return Ok(());
                    }
                    dispatch_key(engine, key);
                    dirty = true;
                }
                Event::Resize(..) => dirty = true,
                _ => {}
            }
        }

        // Apply any completed search outcome
        if engine.poll_search() {
            dirty = true;
        }

        if dirty {
            for command in engine.drain_commands() {
                debug!(?command, "host command");
            }
            render(engine, stdout, color)?;
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
}

/// Forward one key press to the engine.
///
/// Keys go through the key-down path first; an unhandled printable
/// character then arrives as a text-change, the same order a widget
/// host would deliver them.
fn dispatch_key(engine: &mut TokenBox, key: KeyEvent) {
    let handled = engine.handle_event(InputEvent::KeyDown {
        code: key.code,
        modifiers: key.modifiers,
    });

    let chorded = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER);
    if !handled && !chorded {
        if let KeyCode::Char(c) = key.code {
            engine.handle_event(InputEvent::TextInput {
                fragment: c.to_string(),
            });
        }
    }
}

/// Repaint the whole control from engine state.
fn render(engine: &TokenBox, stdout: &mut io::Stdout, color: bool) -> Result<()> {
    let chip = Style::new().fg(Color::Black).on(Color::Cyan);
    let selected_chip = Style::new().fg(Color::Black).on(Color::Yellow);
    let highlight = Style::new().fg(Color::Black).on(Color::LightGray);
    let dim = Style::new().fg(Color::DarkGray);

    execute!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;

    write!(stdout, "tokenbox {} (Ctrl+C to quit)\r\n\r\n", crate::VERSION)?;

    // Token chips
    let selected = match engine.focus() {
        input::focus::FocusState::TokenSelected(i) => Some(i),
        _ => None,
    };
    for (i, token) in engine.tokens().iter().enumerate() {
        let style = if selected == Some(i) { selected_chip } else { chip };
        if color {
            write!(stdout, "{} ", style.paint(format!(" {token} ")))?;
        } else if selected == Some(i) {
            write!(stdout, "[{token}]* ")?;
        } else {
            write!(stdout, "[{token}] ")?;
        }
    }

    // Entry line with a block caret
    write!(stdout, "{}", engine.pending_text())?;
    write!(stdout, "\u{2588}\r\n")?;

    // Suggestion popup
    if engine.popup_open() {
        for (i, suggestion) in engine.suggestions().iter().enumerate() {
            let is_highlighted = engine.highlighted() == Some(i);
            if color && is_highlighted {
                write!(stdout, "  {}\r\n", highlight.paint(suggestion.as_str()))?;
            } else if color {
                write!(stdout, "  {}\r\n", dim.paint(suggestion.as_str()))?;
            } else if is_highlighted {
                write!(stdout, "> {suggestion}\r\n")?;
            } else {
                write!(stdout, "  {suggestion}\r\n")?;
            }
        }
    }

    stdout.flush()?;
    Ok(())
}

/// Binary version string
const VERSION: &str = env!("CARGO_PKG_VERSION");
