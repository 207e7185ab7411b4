//! Error handling module for tokenbox.
//!
//! This module provides error handling for the tokenizing engine with:
//! - Fail-fast configuration errors surfaced at load time
//! - Candidate source errors kept separate from engine state errors
//! - A single crate-wide [`Result`] alias
//!
//! # Example
//!
//! ```rust
//! use tokenbox::error::{Result, ConfigError, TokenBoxError};
//!
//! fn parse_kind(name: &str) -> Result<()> {
//!     if name != "semicolon" {
//!         return Err(TokenBoxError::Config(ConfigError::InvalidValue {
//!             field: "delimiter.kind".to_string(),
//!             value: name.to_string(),
//!         }));
//!     }
//!     Ok(())
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, Result, SourceError, TokenBoxError};
