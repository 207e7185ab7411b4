//! Candidate filtering
//!
//! Deterministic, synchronous filtering of a candidate list against the
//! pending text. The matching predicate is a configuration choice, not a
//! hard-coded rule: the reference behavior is substring containment, but
//! prefix matching is selectable. Case sensitivity defaults to on.
//!
//! The async search pipeline (`search.rs`) invokes the cancellable
//! variant, which checks the cancellation token between candidate
//! evaluations so stale work is discarded promptly.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Matching predicate used to compare a candidate against the query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Candidate contains the query anywhere (reference behavior).
    Substring,
    /// Candidate starts with the query.
    Prefix,
}

impl std::str::FromStr for MatchMode {
    type Err = crate::error::TokenBoxError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s.to_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "prefix" => Ok(MatchMode::Prefix),
            _ => Err(crate::error::ConfigError::InvalidValue {
                field: "matching.mode".to_string(),
                value: s.to_string(),
            }
            .into()),
        }
    }
}

/// Filters candidates against a query under a fixed matching policy.
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter {
    mode: MatchMode,
    case_sensitive: bool,
}

impl CandidateFilter {
    /// Create a filter with the given matching policy.
    pub fn new(mode: MatchMode, case_sensitive: bool) -> Self {
        Self {
            mode,
            case_sensitive,
        }
    }

    /// The active matching mode.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Whether a single candidate matches the query.
    ///
    /// An empty query never matches; a candidate already committed as a
    /// token is excluded by [`CandidateFilter::filter`], not here.
    pub fn matches(&self, candidate: &str, query: &str) -> bool {
        if query.is_empty() {
            return false;
        }
        if self.case_sensitive {
            self.apply(candidate, query)
        } else {
            self.apply(&candidate.to_lowercase(), &query.to_lowercase())
        }
    }

    fn apply(&self, candidate: &str, query: &str) -> bool {
        match self.mode {
            MatchMode::Substring => candidate.contains(query),
            MatchMode::Prefix => candidate.starts_with(query),
        }
    }

    /// Filter candidates against the query, excluding values already
    /// committed as tokens.
    ///
    /// Deterministic and synchronous. Result order is candidate source
    /// order; matches are not re-ranked by quality.
    ///
    /// # Arguments
    /// * `candidates` - The candidate source contents, in source order
    /// * `already_tokenized` - Values excluded because they are committed
    /// * `query` - Current pending text
    ///
    /// # Returns
    /// * `Vec<String>` - Matching candidates, in source order
    pub fn filter(
        &self,
        candidates: &[String],
        already_tokenized: &[String],
        query: &str,
    ) -> Vec<String> {
        candidates
            .iter()
            .filter(|c| self.matches(c, query))
            .filter(|c| !already_tokenized.iter().any(|t| t == *c))
            .cloned()
            .collect()
    }

    /// Cancellation-aware variant of [`CandidateFilter::filter`].
    ///
    /// The token is checked between candidate evaluations (cooperative,
    /// per-candidate grain). Returns `None` when cancelled; partial
    /// results are never surfaced.
    pub fn filter_cancellable(
        &self,
        candidates: &[String],
        already_tokenized: &[String],
        query: &str,
        cancel: &CancellationToken,
    ) -> Option<Vec<String>> {
        let mut matches = Vec::new();
        for candidate in candidates {
            if cancel.is_cancelled() {
                return None;
            }
            if self.matches(candidate, query)
                && !already_tokenized.iter().any(|t| t == candidate)
            {
                matches.push(candidate.clone());
            }
        }
        Some(matches)
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::new(MatchMode::Substring, true)
    }
}
