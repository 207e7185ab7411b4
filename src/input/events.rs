//! Host-facing event and command types
//!
//! The engine consumes input notifications from the rendering/host layer
//! and emits commands back. It never touches a widget tree: hit-testing,
//! chip layout, and painting stay on the host side.

use crossterm::event::{KeyCode, KeyModifiers};

/// How focus arrived at the text surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMethod {
    /// Keyboard traversal (Tab, arrows).
    Directional,
    /// Pointer press.
    Pointer,
}

/// Which visual element a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A committed token chip, by index.
    Token(usize),
    /// A row of the suggestion popup, by index.
    Suggestion(usize),
    /// Empty area of the control.
    EmptyArea,
}

/// Input notification forwarded by the host layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Raw text change: a fragment appended at the caret.
    TextInput { fragment: String },

    /// Key press with modifiers.
    KeyDown {
        code: KeyCode,
        modifiers: KeyModifiers,
    },

    /// The text surface gained focus.
    FocusGained { method: NavigationMethod },

    /// The text surface lost focus.
    FocusLost,

    /// Pointer press, already hit-tested by the host.
    PointerPress { target: HitTarget },
}

/// Command emitted for the host layer, drained in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A token was appended at `index`; re-render chips and re-run layout.
    TokenAdded { index: usize, token: String },

    /// The token at `index` was removed.
    TokenRemoved { index: usize },

    /// Replace the entry text and caret position.
    SetPendingText { text: String, caret: usize },

    /// Show or hide the suggestion surface.
    PopupVisible(bool),

    /// Replace the rendered suggestion list wholesale.
    SuggestionsReplaced(Vec<String>),

    /// Move (or clear) the suggestion highlight.
    HighlightSuggestion(Option<usize>),

    /// Move keyboard focus to the token chip at `index`.
    FocusToken(usize),

    /// Move keyboard focus back to the text surface.
    FocusText,
}
