//! Focus coordination state machine
//!
//! Decides, from a key event and the current interaction state, whether
//! focus moves between the text caret, a committed token, or the
//! suggestion popup, and whether the key is swallowed. The decision step
//! is pure; the engine executes decisions and owns the actual state.
//!
//! Dispatch is first-match-wins: popup navigation takes priority over
//! token navigation while the popup is open. Every (state, key) pair
//! without a listed transition decides [`FocusDecision::Unhandled`],
//! leaving state and model untouched so the host can apply its default
//! behavior.

use crossterm::event::{KeyCode, KeyModifiers};

/// Where keyboard focus currently lives. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    /// Caret in the text surface.
    TextEditing,
    /// One committed token is the active selection target.
    TokenSelected(usize),
    /// One suggestion is the candidate for commit.
    SuggestionHighlighted(usize),
}

/// Snapshot of the guards a transition may consult.
#[derive(Debug, Clone, Copy)]
pub struct FocusContext {
    /// Caret offset into the pending text, in characters.
    pub caret: usize,
    /// Whether the text surface has an active selection range.
    pub has_selection: bool,
    /// Number of committed tokens.
    pub token_count: usize,
    /// Whether the suggestion popup is open.
    pub popup_open: bool,
    /// Whether a suggestion is highlighted.
    pub has_highlight: bool,
    /// The delimiter's dedicated commit key, if the policy defines one.
    pub commit_key: Option<KeyCode>,
}

/// Popup highlight movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Up,
    Down,
}

/// Outcome of one key dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDecision {
    /// Select the last committed token.
    SelectLastToken,

    /// Delete the last pending character and close the popup (the
    /// single-remaining-character shortcut).
    DeleteBackClosingPopup,

    /// Forward a deletion signal to the tokenizer.
    DeleteBack,

    /// Remove the selected token and return focus to the text surface.
    RemoveToken(usize),

    /// Move focus from the last token back to the text surface.
    FocusText,

    /// Move the popup highlight cursor.
    Navigate(NavDirection),

    /// Commit the highlighted suggestion, or synthesize the separator
    /// through the tokenizer when nothing is highlighted.
    CommitOrSynthesize,

    /// Commit the highlighted suggestion (Enter).
    CommitHighlighted,

    /// Close the popup without committing (Escape).
    CancelPopup,

    /// No listed transition; do not mark the event handled.
    Unhandled,
}

/// Resolve one key event against the transition table.
///
/// Pure: consults only the given state and context snapshot.
pub fn decide(
    state: FocusState,
    code: KeyCode,
    modifiers: KeyModifiers,
    ctx: &FocusContext,
) -> FocusDecision {
    use FocusDecision::*;
    use FocusState::*;

    // Chorded keys belong to the host (shortcuts, selection extension).
    // Shift stays allowed: shifted punctuation like `|` arrives with it.
    if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER) {
        return Unhandled;
    }

    // Popup-first dispatch: navigation and commit keys win over token
    // navigation while the suggestion surface is open.
    if ctx.popup_open {
        match code {
            KeyCode::Down => return Navigate(NavDirection::Down),
            KeyCode::Up => return Navigate(NavDirection::Up),
            KeyCode::Tab => return CommitOrSynthesize,
            KeyCode::Enter if ctx.has_highlight => return CommitHighlighted,
            KeyCode::Esc => return CancelPopup,
            _ if ctx.commit_key == Some(code) => return CommitOrSynthesize,
            _ => {}
        }
    }

    match (state, code) {
        // Caret at the boundary steps back onto the token strip
        (TextEditing, KeyCode::Backspace | KeyCode::Left)
            if ctx.caret == 0 && !ctx.has_selection && ctx.token_count > 0 =>
        {
            SelectLastToken
        }

        // One character left: the deletion empties the entry, so the
        // popup closes with it
        (TextEditing, KeyCode::Backspace) if ctx.caret == 1 => DeleteBackClosingPopup,

        (TextEditing, KeyCode::Backspace) => DeleteBack,

        (TokenSelected(i), KeyCode::Backspace | KeyCode::Delete) => RemoveToken(i),

        (TokenSelected(i), KeyCode::Right | KeyCode::End)
            if ctx.token_count > 0 && i == ctx.token_count - 1 =>
        {
            FocusText
        }

        // Total function: everything else stays put and unhandled
        _ => Unhandled,
    }
}
