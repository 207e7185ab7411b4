//! Tokenizing input engine
//!
//! This module ties the tokenize step, the focus state machine, the
//! suggestion session, and the single-flight search pipeline into one
//! interaction model:
//!
//! raw keystrokes → tokenizer (commit fragments + update pending text)
//! → token collection and filter query → suggestion session (popup
//! visibility, results) → focus coordinator (navigation, deletion,
//! commit across the three focus regions)
//!
//! All state transitions run synchronously on the interaction thread in
//! event order. The only asynchronous element is the candidate search;
//! its results are handed back over a channel and applied via
//! [`TokenBox::poll_search`] (or awaited with [`TokenBox::wait_search`]),
//! so every mutation still happens on the interaction side.

pub mod delimiter;
pub mod events;
pub mod filter;
pub mod focus;
pub mod search;
pub mod session;
pub mod source;
pub mod tokenizer;
pub mod tokens;

use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::error::Result;

use delimiter::DelimiterPolicy;
use events::{Command, HitTarget, InputEvent};
use filter::CandidateFilter;
use focus::{FocusContext, FocusDecision, FocusState, NavDirection};
use search::SearchPipeline;
use session::SuggestionSession;
use source::CandidateSource;
use tokenizer::TextEdit;
use tokens::{TokenCollection, TokenEvent};

pub use delimiter::DelimiterKind;
pub use events::NavigationMethod;
pub use filter::MatchMode;

/// The tokenizing input engine.
///
/// Owns the delimiter policy, the pending text and caret, the committed
/// token collection, the suggestion session, the focus state, and the
/// search pipeline. Hosts feed [`InputEvent`]s in and drain [`Command`]s
/// out; the engine never touches a widget tree.
pub struct TokenBox {
    policy: DelimiterPolicy,
    pending: String,
    caret: usize,
    has_selection: bool,
    tokens: TokenCollection,
    session: SuggestionSession,
    focus: FocusState,
    search: SearchPipeline,
    outbox: Vec<Command>,
}

impl TokenBox {
    /// Create an engine over a candidate source.
    ///
    /// # Arguments
    /// * `policy` - Delimiter policy (immutable for the engine lifetime)
    /// * `filter` - Matching policy for suggestions
    /// * `source` - External candidate source
    pub fn new(
        policy: DelimiterPolicy,
        filter: CandidateFilter,
        source: Arc<dyn CandidateSource>,
    ) -> Self {
        Self {
            policy,
            pending: String::new(),
            caret: 0,
            has_selection: false,
            tokens: TokenCollection::new(),
            session: SuggestionSession::new(),
            focus: FocusState::TextEditing,
            search: SearchPipeline::new(source, filter),
            outbox: Vec::new(),
        }
    }

    /// Build an engine from configuration.
    ///
    /// Fails fast on configuration errors (unknown delimiter kind was
    /// already rejected at parse time; a custom kind without a separator
    /// is rejected here).
    pub fn from_config(config: &Config, source: Arc<dyn CandidateSource>) -> Result<Self> {
        let policy = config.delimiter_policy()?;
        let filter = CandidateFilter::new(config.matching.mode, config.matching.case_sensitive);
        Ok(Self::new(policy, filter, source))
    }

    /// Current pending text.
    pub fn pending_text(&self) -> &str {
        &self.pending
    }

    /// Caret offset into the pending text, in characters.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Committed tokens.
    pub fn tokens(&self) -> &TokenCollection {
        &self.tokens
    }

    /// Current focus state.
    pub fn focus(&self) -> FocusState {
        self.focus
    }

    /// Whether the suggestion popup is open.
    pub fn popup_open(&self) -> bool {
        self.session.is_open()
    }

    /// Current suggestions, in source order.
    pub fn suggestions(&self) -> &[String] {
        self.session.suggestions()
    }

    /// Index of the highlighted suggestion, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.session.highlighted()
    }

    /// Host-forwarded selection-range state of the text surface.
    ///
    /// The boundary transition (backspace onto the token strip) is
    /// guarded on "no active selection"; hosts with selectable text
    /// keep this in sync.
    pub fn set_selection(&mut self, has_selection: bool) {
        self.has_selection = has_selection;
    }

    /// Dispatch one input event.
    ///
    /// # Returns
    /// * `bool` - Whether the event was handled; unhandled events should
    ///   fall through to the host's default behavior
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::TextInput { fragment } => self.apply_edit(TextEdit::Insert(&fragment)),
            InputEvent::KeyDown { code, modifiers } => self.handle_key(code, modifiers),
            InputEvent::FocusGained { .. } => self.handle_focus_gained(),
            InputEvent::FocusLost => self.handle_focus_lost(),
            InputEvent::PointerPress { target } => self.handle_pointer(target),
        }
    }

    /// Apply any completed current-generation search outcome.
    ///
    /// Non-blocking; stale outcomes were already discarded by the
    /// pipeline.
    ///
    /// # Returns
    /// * `bool` - Whether the suggestion list changed
    pub fn poll_search(&mut self) -> bool {
        match self.search.poll() {
            Some(matches) => {
                self.apply_search_results(matches);
                true
            }
            None => false,
        }
    }

    /// Await the next current-generation search outcome and apply it.
    ///
    /// Only call while a search is outstanding.
    pub async fn wait_search(&mut self) -> bool {
        match self.search.next_result().await {
            Some(matches) => {
                self.apply_search_results(matches);
                true
            }
            None => false,
        }
    }

    /// Drain emitted commands in emission order.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.outbox)
    }

    /* ===================== event handling internals ===================== */

    fn push_command(&mut self, command: Command) {
        self.outbox.push(command);
    }

    fn handle_key(
        &mut self,
        code: crossterm::event::KeyCode,
        modifiers: crossterm::event::KeyModifiers,
    ) -> bool {
        let ctx = FocusContext {
            caret: self.caret,
            has_selection: self.has_selection,
            token_count: self.tokens.len(),
            popup_open: self.session.is_open(),
            has_highlight: self.session.highlighted().is_some(),
            commit_key: self.policy.commit_key(),
        };
        let decision = focus::decide(self.focus, code, modifiers, &ctx);
        debug!(state = ?self.focus, ?code, ?decision, "key dispatched");

        match decision {
            FocusDecision::SelectLastToken => {
                if let Some(last) = self.tokens.last_index() {
                    self.focus = FocusState::TokenSelected(last);
                    self.push_command(Command::FocusToken(last));
                }
                true
            }
            FocusDecision::DeleteBackClosingPopup => {
                self.close_popup();
                self.apply_edit(TextEdit::DeleteBack);
                true
            }
            FocusDecision::DeleteBack => {
                self.apply_edit(TextEdit::DeleteBack);
                true
            }
            FocusDecision::RemoveToken(index) => {
                if let Some(TokenEvent::Removed { index }) = self.tokens.remove(index) {
                    self.push_command(Command::TokenRemoved { index });
                }
                self.focus = FocusState::TextEditing;
                self.push_command(Command::FocusText);
                true
            }
            FocusDecision::FocusText => {
                self.focus = FocusState::TextEditing;
                self.push_command(Command::FocusText);
                true
            }
            FocusDecision::Navigate(direction) => {
                match direction {
                    NavDirection::Down => self.session.highlight_next(),
                    NavDirection::Up => self.session.highlight_prev(),
                }
                if let Some(index) = self.session.highlighted() {
                    self.focus = FocusState::SuggestionHighlighted(index);
                }
                self.push_command(Command::HighlightSuggestion(self.session.highlighted()));
                true
            }
            FocusDecision::CommitOrSynthesize => {
                if let Some(value) = self.session.take_commit() {
                    self.accept_suggestion(value);
                } else if let Some(separator) = self.policy.separator() {
                    let separator = separator.to_string();
                    self.close_popup();
                    self.apply_edit(TextEdit::Insert(&separator));
                    self.focus = FocusState::TextEditing;
                }
                true
            }
            FocusDecision::CommitHighlighted => {
                if let Some(value) = self.session.take_commit() {
                    self.accept_suggestion(value);
                }
                true
            }
            FocusDecision::CancelPopup => {
                self.close_popup();
                true
            }
            FocusDecision::Unhandled => false,
        }
    }

    /// Apply one text edit through the tokenizer and refresh the query.
    fn apply_edit(&mut self, edit: TextEdit<'_>) -> bool {
        let outcome = tokenizer::tokenize(&self.pending, edit, self.policy.separator());

        // Deletion on empty pending text is a no-op, not an error
        if outcome.committed.is_empty() && outcome.pending == self.pending {
            return outcome.handled;
        }

        for fragment in &outcome.committed {
            self.commit_token(fragment);
        }

        self.pending = outcome.pending;
        self.caret = outcome.caret;
        self.push_command(Command::SetPendingText {
            text: self.pending.clone(),
            caret: self.caret,
        });

        // Typing while a suggestion is highlighted resumes text editing
        if matches!(self.focus, FocusState::SuggestionHighlighted(_)) {
            self.focus = FocusState::TextEditing;
        }

        self.refresh_query();
        outcome.handled
    }

    /// Issue a fresh filter query for the pending text, superseding any
    /// outstanding one. An empty query clears the popup without touching
    /// the pipeline's channel.
    fn refresh_query(&mut self) {
        if self.pending.is_empty() {
            self.search.cancel_outstanding();
            self.close_popup();
        } else {
            self.search
                .submit(&self.pending, self.tokens.as_slice().to_vec());
        }
    }

    /// Append a committed token, emitting the change event.
    fn commit_token(&mut self, value: &str) {
        if let Some(TokenEvent::Added { index }) = self.tokens.push(value) {
            self.push_command(Command::TokenAdded {
                index,
                token: value.to_string(),
            });
        }
    }

    /// Accept a suggestion value: one uniform "token added" path shared
    /// with tokenizer commits.
    fn accept_suggestion(&mut self, value: String) {
        self.commit_token(&value);
        self.pending.clear();
        self.caret = 0;
        self.push_command(Command::SetPendingText {
            text: String::new(),
            caret: 0,
        });
        self.search.cancel_outstanding();
        self.push_command(Command::SuggestionsReplaced(Vec::new()));
        self.push_command(Command::PopupVisible(false));
        self.focus = FocusState::TextEditing;
        self.push_command(Command::FocusText);
    }

    /// Close the popup and clear the rendered list, if anything is
    /// showing.
    fn close_popup(&mut self) {
        if self.session.is_open() || !self.session.suggestions().is_empty() {
            self.session.close();
            self.push_command(Command::SuggestionsReplaced(Vec::new()));
            self.push_command(Command::PopupVisible(false));
        }
        if matches!(self.focus, FocusState::SuggestionHighlighted(_)) {
            self.focus = FocusState::TextEditing;
        }
    }

    fn handle_focus_gained(&mut self) -> bool {
        if let Some(temp) = self.session.take_temp() {
            self.caret = temp.chars().count();
            self.pending = temp;
            self.push_command(Command::SetPendingText {
                text: self.pending.clone(),
                caret: self.caret,
            });
            self.focus = FocusState::TextEditing;
        }
        false
    }

    fn handle_focus_lost(&mut self) -> bool {
        if !self.pending.is_empty() && self.session.highlighted().is_none() {
            let pending = std::mem::take(&mut self.pending);
            self.caret = 0;
            let was_open = self.session.is_open();
            self.session.cancel(&pending);
            self.search.cancel_outstanding();
            self.push_command(Command::SetPendingText {
                text: String::new(),
                caret: 0,
            });
            if was_open {
                self.push_command(Command::SuggestionsReplaced(Vec::new()));
                self.push_command(Command::PopupVisible(false));
            }
        }
        false
    }

    fn handle_pointer(&mut self, target: HitTarget) -> bool {
        match target {
            HitTarget::Token(index) if index < self.tokens.len() => {
                self.focus = FocusState::TokenSelected(index);
                self.push_command(Command::FocusToken(index));
                true
            }
            HitTarget::Token(_) => false,
            HitTarget::Suggestion(index) => match self.session.take_commit_at(index) {
                Some(value) => {
                    self.accept_suggestion(value);
                    true
                }
                None => false,
            },
            HitTarget::EmptyArea => {
                self.focus = FocusState::TextEditing;
                self.caret = self.pending.chars().count();
                self.push_command(Command::SetPendingText {
                    text: self.pending.clone(),
                    caret: self.caret,
                });
                self.push_command(Command::FocusText);
                true
            }
        }
    }

    fn apply_search_results(&mut self, matches: Vec<String>) {
        self.session.apply_results(matches.clone());
        self.push_command(Command::SuggestionsReplaced(matches));
        self.push_command(Command::PopupVisible(self.session.is_open()));
        self.push_command(Command::HighlightSuggestion(None));
        // Indices into the old list are gone, and so is the highlight
        if matches!(self.focus, FocusState::SuggestionHighlighted(_)) {
            self.focus = FocusState::TextEditing;
        }
    }
}

impl std::fmt::Debug for TokenBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBox")
            .field("pending", &self.pending)
            .field("caret", &self.caret)
            .field("tokens", &self.tokens.len())
            .field("focus", &self.focus)
            .field("popup_open", &self.session.is_open())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::source::StaticSource;
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn addresses() -> Vec<String> {
        vec![
            "test@gmail.com".to_string(),
            "tester@gmail.com".to_string(),
            "other@host.org".to_string(),
        ]
    }

    fn engine() -> TokenBox {
        TokenBox::new(
            DelimiterPolicy::new(DelimiterKind::Semicolon),
            CandidateFilter::new(MatchMode::Substring, true),
            Arc::new(StaticSource::new(addresses())),
        )
    }

    fn type_text(engine: &mut TokenBox, text: &str) {
        for ch in text.chars() {
            engine.handle_event(InputEvent::TextInput {
                fragment: ch.to_string(),
            });
        }
    }

    fn key(engine: &mut TokenBox, code: KeyCode) -> bool {
        engine.handle_event(InputEvent::KeyDown {
            code,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[tokio::test]
    async fn test_typing_commits_on_delimiter() {
        let mut engine = engine();
        type_text(&mut engine, "a;b;c");

        assert_eq!(engine.tokens().as_slice(), ["a", "b"]);
        assert_eq!(engine.pending_text(), "c");
        assert_eq!(engine.caret(), 1);
    }

    #[tokio::test]
    async fn test_trailing_delimiter_empties_pending() {
        let mut engine = engine();
        type_text(&mut engine, "a;b;c;");

        assert_eq!(engine.tokens().as_slice(), ["a", "b", "c"]);
        assert_eq!(engine.pending_text(), "");
    }

    #[tokio::test]
    async fn test_consecutive_delimiters_produce_no_empty_token() {
        let mut engine = engine();
        type_text(&mut engine, "a;;b;");

        assert_eq!(engine.tokens().as_slice(), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_delimiter_event_is_handled() {
        let mut engine = engine();
        type_text(&mut engine, "a");
        let handled = engine.handle_event(InputEvent::TextInput {
            fragment: ";".to_string(),
        });
        assert!(handled);
    }

    #[tokio::test]
    async fn test_commands_for_commit() {
        let mut engine = engine();
        type_text(&mut engine, "a");
        engine.drain_commands();

        engine.handle_event(InputEvent::TextInput {
            fragment: ";".to_string(),
        });
        let commands = engine.drain_commands();
        assert!(commands.contains(&Command::TokenAdded {
            index: 0,
            token: "a".to_string()
        }));
        assert!(commands.contains(&Command::SetPendingText {
            text: String::new(),
            caret: 0
        }));
    }

    #[tokio::test]
    async fn test_backspace_at_boundary_selects_last_token() {
        let mut engine = engine();
        type_text(&mut engine, "a;b;c;");
        assert_eq!(engine.tokens().len(), 3);

        assert!(key(&mut engine, KeyCode::Backspace));
        assert_eq!(engine.focus(), FocusState::TokenSelected(2));
        // Selection did not mutate the collection
        assert_eq!(engine.tokens().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_selected_token_returns_to_text() {
        let mut engine = engine();
        type_text(&mut engine, "a;b;c;");
        key(&mut engine, KeyCode::Backspace);
        engine.drain_commands();

        assert!(key(&mut engine, KeyCode::Backspace));
        assert_eq!(engine.tokens().as_slice(), ["a", "b"]);
        assert_eq!(engine.focus(), FocusState::TextEditing);

        let commands = engine.drain_commands();
        assert!(commands.contains(&Command::TokenRemoved { index: 2 }));
        assert!(commands.contains(&Command::FocusText));
    }

    #[tokio::test]
    async fn test_right_from_last_token_returns_to_text() {
        let mut engine = engine();
        type_text(&mut engine, "a;b;");
        key(&mut engine, KeyCode::Backspace);
        assert_eq!(engine.focus(), FocusState::TokenSelected(1));

        key(&mut engine, KeyCode::Right);
        assert_eq!(engine.focus(), FocusState::TextEditing);
    }

    #[tokio::test]
    async fn test_suggestions_appear_for_query() {
        let mut engine = engine();
        type_text(&mut engine, "test");

        assert!(engine.wait_search().await);
        assert!(engine.popup_open());
        assert_eq!(engine.suggestions(), ["test@gmail.com", "tester@gmail.com"]);
    }

    #[tokio::test]
    async fn test_superseded_query_never_surfaces() {
        let mut engine = engine();
        type_text(&mut engine, "te");
        type_text(&mut engine, "s");

        assert!(engine.wait_search().await);
        // Only the "tes" result is ever applied
        assert_eq!(engine.suggestions(), ["test@gmail.com", "tester@gmail.com"]);
        assert!(!engine.poll_search());
    }

    #[tokio::test]
    async fn test_commit_highlighted_suggestion_with_enter() {
        let mut engine = engine();
        type_text(&mut engine, "tester");
        engine.wait_search().await;

        key(&mut engine, KeyCode::Down);
        assert_eq!(engine.focus(), FocusState::SuggestionHighlighted(0));

        assert!(key(&mut engine, KeyCode::Enter));
        assert_eq!(engine.tokens().as_slice(), ["tester@gmail.com"]);
        assert_eq!(engine.pending_text(), "");
        assert!(!engine.popup_open());
        assert_eq!(engine.focus(), FocusState::TextEditing);
    }

    #[tokio::test]
    async fn test_commit_key_commits_highlight() {
        let mut engine = engine();
        type_text(&mut engine, "other");
        engine.wait_search().await;
        key(&mut engine, KeyCode::Down);

        assert!(key(&mut engine, KeyCode::Char(';')));
        assert_eq!(engine.tokens().as_slice(), ["other@host.org"]);
    }

    #[tokio::test]
    async fn test_commit_key_without_highlight_synthesizes_delimiter() {
        let mut engine = engine();
        type_text(&mut engine, "test");
        engine.wait_search().await;
        assert!(engine.popup_open());

        // No highlight: the raw pending text commits via the separator
        assert!(key(&mut engine, KeyCode::Char(';')));
        assert_eq!(engine.tokens().as_slice(), ["test"]);
        assert_eq!(engine.pending_text(), "");
    }

    #[tokio::test]
    async fn test_tab_commits_and_is_handled() {
        let mut engine = engine();
        type_text(&mut engine, "test");
        engine.wait_search().await;
        key(&mut engine, KeyCode::Down);

        assert!(key(&mut engine, KeyCode::Tab));
        assert_eq!(engine.tokens().as_slice(), ["test@gmail.com"]);
    }

    #[tokio::test]
    async fn test_committed_value_excluded_from_next_search() {
        let mut engine = engine();
        type_text(&mut engine, "test");
        engine.wait_search().await;
        key(&mut engine, KeyCode::Down);
        key(&mut engine, KeyCode::Enter);

        type_text(&mut engine, "gmail");
        engine.wait_search().await;
        assert_eq!(engine.suggestions(), ["tester@gmail.com"]);
    }

    #[tokio::test]
    async fn test_escape_closes_popup_without_committing() {
        let mut engine = engine();
        type_text(&mut engine, "test");
        engine.wait_search().await;
        key(&mut engine, KeyCode::Down);

        assert!(key(&mut engine, KeyCode::Esc));
        assert!(!engine.popup_open());
        assert!(engine.tokens().is_empty());
        assert_eq!(engine.pending_text(), "test");
        assert_eq!(engine.focus(), FocusState::TextEditing);
    }

    #[tokio::test]
    async fn test_focus_loss_stashes_and_restores_pending() {
        let mut engine = engine();
        type_text(&mut engine, "half");

        engine.handle_event(InputEvent::FocusLost);
        assert_eq!(engine.pending_text(), "");

        engine.handle_event(InputEvent::FocusGained {
            method: NavigationMethod::Directional,
        });
        assert_eq!(engine.pending_text(), "half");
        assert_eq!(engine.caret(), 4);
        assert_eq!(engine.focus(), FocusState::TextEditing);
    }

    #[tokio::test]
    async fn test_pointer_press_on_token_selects_it() {
        let mut engine = engine();
        type_text(&mut engine, "a;b;");

        assert!(engine.handle_event(InputEvent::PointerPress {
            target: HitTarget::Token(0)
        }));
        assert_eq!(engine.focus(), FocusState::TokenSelected(0));

        // Stale index from a racing removal is a no-op
        assert!(!engine.handle_event(InputEvent::PointerPress {
            target: HitTarget::Token(9)
        }));
    }

    #[tokio::test]
    async fn test_pointer_press_on_suggestion_commits_it() {
        let mut engine = engine();
        type_text(&mut engine, "test");
        engine.wait_search().await;

        assert!(engine.handle_event(InputEvent::PointerPress {
            target: HitTarget::Suggestion(1)
        }));
        assert_eq!(engine.tokens().as_slice(), ["tester@gmail.com"]);
        assert!(!engine.popup_open());
    }

    #[tokio::test]
    async fn test_pointer_press_on_empty_area_focuses_text() {
        let mut engine = engine();
        type_text(&mut engine, "a;b;");
        key(&mut engine, KeyCode::Backspace);
        assert_eq!(engine.focus(), FocusState::TokenSelected(1));

        assert!(engine.handle_event(InputEvent::PointerPress {
            target: HitTarget::EmptyArea
        }));
        assert_eq!(engine.focus(), FocusState::TextEditing);
    }

    #[tokio::test]
    async fn test_backspace_to_empty_closes_popup() {
        let mut engine = engine();
        type_text(&mut engine, "t");
        engine.wait_search().await;
        assert!(engine.popup_open());

        key(&mut engine, KeyCode::Backspace);
        assert_eq!(engine.pending_text(), "");
        assert!(!engine.popup_open());
    }

    #[tokio::test]
    async fn test_backspace_deletion_on_empty_is_noop() {
        let mut engine = engine();
        type_text(&mut engine, "a;");
        engine.drain_commands();

        // Caret 0, tokens exist: this selects, it does not delete
        key(&mut engine, KeyCode::Backspace);
        assert_eq!(engine.tokens().len(), 1);
        assert_eq!(engine.pending_text(), "");
    }

    #[tokio::test]
    async fn test_unhandled_key_leaves_state_unchanged() {
        let mut engine = engine();
        type_text(&mut engine, "abc");
        let focus = engine.focus();

        assert!(!key(&mut engine, KeyCode::F(5)));
        assert_eq!(engine.focus(), focus);
        assert_eq!(engine.pending_text(), "abc");
    }

    #[tokio::test]
    async fn test_from_config_defaults() {
        let config = Config::default();
        let engine =
            TokenBox::from_config(&config, Arc::new(StaticSource::new(addresses()))).unwrap();
        assert_eq!(engine.focus(), FocusState::TextEditing);
        assert!(engine.tokens().is_empty());
    }
}
