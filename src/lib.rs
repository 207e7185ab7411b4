//! Tokenizing Text Entry Library
//!
//! This library provides the core of a tokenizing text-entry widget: a
//! delimiter-driven state machine that converts free-form keystrokes
//! into discrete tokens while offering a live, cancellable, filtered
//! suggestion list. Rendering and layout stay on the host side; the
//! engine consumes input events and emits commands.
//!
//! # Modules
//!
//! - `cli`: Command-line interface for the demo host binary
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `input`: The tokenizing input engine and its components
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokenbox::input::source::StaticSource;
//! use tokenbox::input::events::InputEvent;
//! use tokenbox::{Config, TokenBox};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = Arc::new(StaticSource::new(vec![
//!         "ada@example.com".to_string(),
//!         "grace@example.com".to_string(),
//!     ]));
//!     let mut engine = TokenBox::from_config(&Config::default(), source)?;
//!
//!     engine.handle_event(InputEvent::TextInput {
//!         fragment: "ada@example.com;".to_string(),
//!     });
//!     assert_eq!(engine.tokens().len(), 1);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod input;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TokenBoxError};
pub use input::delimiter::{DelimiterKind, DelimiterPolicy};
pub use input::events::{Command, HitTarget, InputEvent, NavigationMethod};
pub use input::filter::{CandidateFilter, MatchMode};
pub use input::focus::FocusState;
pub use input::source::{CandidateSource, FileSource, StaticSource};
pub use input::TokenBox;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
