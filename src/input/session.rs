//! Suggestion session state
//!
//! Owns the suggestion list, the popup visibility, the highlight cursor,
//! and the temp-text stash used when focus leaves the entry with
//! uncommitted text. The list is replaced wholesale on every applied
//! search outcome, never patched incrementally.

use tracing::debug;

/// Popup and suggestion-list state for one engine instance.
#[derive(Debug, Default)]
pub struct SuggestionSession {
    suggestions: Vec<String>,
    open: bool,
    highlighted: Option<usize>,
    temp_text: Option<String>,
}

impl SuggestionSession {
    /// Create a session with a closed popup and no suggestions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the suggestion list with a fresh search outcome.
    ///
    /// Popup visibility follows the result count; the highlight cursor
    /// resets because indices into the old list are meaningless.
    pub fn apply_results(&mut self, matches: Vec<String>) {
        self.open = !matches.is_empty();
        self.highlighted = None;
        self.suggestions = matches;
        debug!(count = self.suggestions.len(), open = self.open, "suggestions replaced");
    }

    /// Whether the popup is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current suggestions, in source order.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Index of the highlighted suggestion, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Value of the highlighted suggestion, if any.
    pub fn highlighted_value(&self) -> Option<&str> {
        self.highlighted
            .and_then(|i| self.suggestions.get(i))
            .map(String::as_str)
    }

    /// Move the highlight cursor down, wrapping at the end.
    ///
    /// No-op while the popup is closed.
    pub fn highlight_next(&mut self) {
        if !self.open || self.suggestions.is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i + 1 < self.suggestions.len() => i + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    /// Move the highlight cursor up, wrapping at the start.
    ///
    /// No-op while the popup is closed.
    pub fn highlight_prev(&mut self) {
        if !self.open || self.suggestions.is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(0) | None => self.suggestions.len() - 1,
            Some(i) => i - 1,
        });
    }

    /// Set the highlight cursor directly (pointer hover or press).
    ///
    /// Out-of-range indices are ignored.
    pub fn highlight(&mut self, index: usize) {
        if self.open && index < self.suggestions.len() {
            self.highlighted = Some(index);
        }
    }

    /// Accept the highlighted suggestion, closing the popup.
    ///
    /// # Returns
    /// * `Option<String>` - The accepted value, or None when nothing was
    ///   highlighted
    pub fn take_commit(&mut self) -> Option<String> {
        let value = self.highlighted_value().map(str::to_string)?;
        debug!(value = %value, "suggestion committed");
        self.close();
        self.temp_text = None;
        Some(value)
    }

    /// Accept the suggestion at `index` regardless of the highlight
    /// cursor (pointer click on the popup).
    pub fn take_commit_at(&mut self, index: usize) -> Option<String> {
        let value = self.suggestions.get(index).cloned()?;
        debug!(value = %value, "suggestion committed");
        self.close();
        self.temp_text = None;
        Some(value)
    }

    /// Close the popup and drop the suggestion list without committing.
    pub fn close(&mut self) {
        self.open = false;
        self.highlighted = None;
        self.suggestions.clear();
    }

    /// Cancel the session: close the popup and stash the pending text so
    /// it can be restored when the entry regains focus.
    pub fn cancel(&mut self, pending: &str) {
        self.close();
        if !pending.is_empty() {
            self.temp_text = Some(pending.to_string());
            debug!("pending text stashed");
        }
    }

    /// Take the stashed temp text, clearing the holder.
    pub fn take_temp(&mut self) -> Option<String> {
        self.temp_text.take()
    }

    /// Whether a temp-text value is waiting to be restored.
    pub fn has_temp(&self) -> bool {
        self.temp_text.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(items: &[&str]) -> SuggestionSession {
        let mut session = SuggestionSession::new();
        session.apply_results(items.iter().map(|s| s.to_string()).collect());
        session
    }

    #[test]
    fn test_apply_results_sets_visibility() {
        let mut session = SuggestionSession::new();
        session.apply_results(vec!["a".to_string()]);
        assert!(session.is_open());

        session.apply_results(Vec::new());
        assert!(!session.is_open());
        assert!(session.suggestions().is_empty());
    }

    #[test]
    fn test_apply_results_resets_highlight() {
        let mut session = session_with(&["a", "b"]);
        session.highlight_next();
        assert_eq!(session.highlighted(), Some(0));

        session.apply_results(vec!["c".to_string()]);
        assert_eq!(session.highlighted(), None);
    }

    #[test]
    fn test_highlight_wraps_both_ways() {
        let mut session = session_with(&["a", "b", "c"]);

        session.highlight_next();
        session.highlight_next();
        session.highlight_next();
        assert_eq!(session.highlighted(), Some(2));
        session.highlight_next();
        assert_eq!(session.highlighted(), Some(0));

        session.highlight_prev();
        assert_eq!(session.highlighted(), Some(2));
    }

    #[test]
    fn test_highlight_prev_from_none_goes_last() {
        let mut session = session_with(&["a", "b"]);
        session.highlight_prev();
        assert_eq!(session.highlighted(), Some(1));
    }

    #[test]
    fn test_highlight_noop_when_closed() {
        let mut session = SuggestionSession::new();
        session.highlight_next();
        assert_eq!(session.highlighted(), None);
    }

    #[test]
    fn test_commit_requires_highlight() {
        let mut session = session_with(&["a"]);
        assert_eq!(session.take_commit(), None);

        session.highlight_next();
        assert_eq!(session.take_commit(), Some("a".to_string()));
        assert!(!session.is_open());
    }

    #[test]
    fn test_commit_at_index() {
        let mut session = session_with(&["a", "b"]);
        assert_eq!(session.take_commit_at(1), Some("b".to_string()));
        assert!(!session.is_open());
        assert_eq!(session.take_commit_at(0), None);
    }

    #[test]
    fn test_cancel_stashes_pending() {
        let mut session = session_with(&["a"]);
        session.cancel("partial");
        assert!(!session.is_open());
        assert!(session.has_temp());
        assert_eq!(session.take_temp(), Some("partial".to_string()));
        assert!(!session.has_temp());
    }

    #[test]
    fn test_cancel_with_empty_pending_stashes_nothing() {
        let mut session = session_with(&["a"]);
        session.cancel("");
        assert!(!session.has_temp());
    }

    #[test]
    fn test_commit_clears_temp() {
        let mut session = session_with(&["a"]);
        session.cancel("partial");
        session.apply_results(vec!["a".to_string()]);
        session.highlight_next();
        session.take_commit();
        assert!(!session.has_temp());
    }
}
