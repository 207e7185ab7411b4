//! Delimiter-driven text-to-token conversion
//!
//! This module implements the pure tokenize step: given the current
//! pending text and a single edit, it decides which fragments commit as
//! tokens and what remains as pending text. It never touches widget
//! state; the engine applies the outcome.

/// A single edit to the pending text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit<'a> {
    /// Newly typed fragment appended at the caret (always at the end in
    /// this engine).
    Insert(&'a str),

    /// Delete the last character. Never underflows below empty.
    DeleteBack,
}

/// Result of one tokenize step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizeOutcome {
    /// Fragments committed as tokens, in order.
    pub committed: Vec<String>,

    /// New pending text after the step.
    pub pending: String,

    /// Caret offset into `pending`, in characters. Always at the end.
    pub caret: usize,

    /// Whether the triggering event should be marked handled so the
    /// delimiter character never lands in the visible text.
    pub handled: bool,
}

impl TokenizeOutcome {
    fn passthrough(pending: String) -> Self {
        let caret = pending.chars().count();
        Self {
            committed: Vec::new(),
            pending,
            caret,
            handled: false,
        }
    }
}

/// Apply one edit to the pending text and split on the separator.
///
/// A separator of `None` or `""` means free text never tokenizes; the
/// edit only updates the pending text. Otherwise the working string is
/// split on the separator, empty fragments are discarded, and all
/// fragments but a non-trailing remainder commit as tokens.
///
/// # Arguments
/// * `pending` - Current pending text
/// * `edit` - The edit to apply
/// * `separator` - Active separator literal, if any
///
/// # Returns
/// * `TokenizeOutcome` - Committed fragments and the new pending text
pub fn tokenize(pending: &str, edit: TextEdit<'_>, separator: Option<&str>) -> TokenizeOutcome {
    let working = match edit {
        TextEdit::Insert(fragment) => {
            let mut t = String::with_capacity(pending.len() + fragment.len());
            t.push_str(pending);
            t.push_str(fragment);
            t
        }
        TextEdit::DeleteBack => {
            let mut t = pending.to_string();
            t.pop();
            t
        }
    };

    let separator = match separator {
        Some(sep) if !sep.is_empty() => sep,
        _ => return TokenizeOutcome::passthrough(working),
    };

    if !working.contains(separator) {
        return TokenizeOutcome::passthrough(working);
    }

    let trailing = working.ends_with(separator);
    let fragments: Vec<&str> = working
        .split(separator)
        .filter(|f| !f.is_empty())
        .collect();

    let commit_count = if trailing {
        fragments.len()
    } else {
        fragments.len().saturating_sub(1)
    };

    let committed: Vec<String> = fragments[..commit_count]
        .iter()
        .filter(|f| !f.trim().is_empty())
        .map(|f| f.to_string())
        .collect();

    let pending = if trailing {
        String::new()
    } else {
        // Split always yields a non-empty remainder here: the working
        // string contains the separator but does not end with it.
        fragments.last().map(|f| f.to_string()).unwrap_or_default()
    };

    let caret = pending.chars().count();
    TokenizeOutcome {
        committed,
        pending,
        caret,
        handled: true,
    }
}
