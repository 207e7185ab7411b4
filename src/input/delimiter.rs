//! Delimiter policy definitions
//!
//! This module maps a configured delimiter kind to its literal separator
//! string and, where one exists, to the keyboard key that doubles as a
//! commit trigger. A policy is immutable once constructed.

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, TokenBoxError};

/// Supported delimiter kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DelimiterKind {
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `|`
    Pipe,
    /// `//` — two characters, no dedicated key
    ForwardSlash,
    /// `\`
    BackSlash,
    /// Caller-supplied separator string
    Custom,
}

/// Immutable mapping from a delimiter kind to its separator literal and
/// optional commit key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterPolicy {
    kind: DelimiterKind,
    custom_separator: Option<String>,
}

impl DelimiterPolicy {
    /// Create a policy for a built-in delimiter kind.
    ///
    /// For [`DelimiterKind::Custom`] this produces a policy with no
    /// separator; prefer [`DelimiterPolicy::custom`] when a separator
    /// string is available.
    pub fn new(kind: DelimiterKind) -> Self {
        Self {
            kind,
            custom_separator: None,
        }
    }

    /// Create a custom policy with a caller-supplied separator string.
    pub fn custom(separator: impl Into<String>) -> Self {
        Self {
            kind: DelimiterKind::Custom,
            custom_separator: Some(separator.into()),
        }
    }

    /// The delimiter kind this policy was built from.
    pub fn kind(&self) -> DelimiterKind {
        self.kind
    }

    /// Separator literal that triggers tokenization when it appears in
    /// free text.
    ///
    /// `None` only for `Custom` policies constructed without a
    /// separator string.
    pub fn separator(&self) -> Option<&str> {
        match self.kind {
            DelimiterKind::Semicolon => Some(";"),
            DelimiterKind::Comma => Some(","),
            DelimiterKind::Pipe => Some("|"),
            DelimiterKind::ForwardSlash => Some("//"),
            DelimiterKind::BackSlash => Some("\\"),
            DelimiterKind::Custom => self.custom_separator.as_deref(),
        }
    }

    /// Keyboard key that acts as an alternate commit trigger.
    ///
    /// Only kinds whose literal is a single punctuation character with a
    /// dedicated key have one; `ForwardSlash` (two characters) and
    /// `Custom` do not.
    pub fn commit_key(&self) -> Option<KeyCode> {
        match self.kind {
            DelimiterKind::Semicolon => Some(KeyCode::Char(';')),
            DelimiterKind::Comma => Some(KeyCode::Char(',')),
            DelimiterKind::Pipe => Some(KeyCode::Char('|')),
            DelimiterKind::BackSlash => Some(KeyCode::Char('\\')),
            DelimiterKind::ForwardSlash | DelimiterKind::Custom => None,
        }
    }
}

impl std::str::FromStr for DelimiterKind {
    type Err = TokenBoxError;

    /// Parse a configuration name into a kind.
    ///
    /// Unknown names fail fast as a configuration error.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "semicolon" => Ok(DelimiterKind::Semicolon),
            "comma" => Ok(DelimiterKind::Comma),
            "pipe" => Ok(DelimiterKind::Pipe),
            "forward-slash" | "forwardslash" => Ok(DelimiterKind::ForwardSlash),
            "back-slash" | "backslash" => Ok(DelimiterKind::BackSlash),
            "custom" => Ok(DelimiterKind::Custom),
            _ => Err(ConfigError::InvalidValue {
                field: "delimiter.kind".to_string(),
                value: s.to_string(),
            }
            .into()),
        }
    }
}
