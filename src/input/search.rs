//! Single-flight suggestion search
//!
//! At most one filter operation is in flight at a time. Each submitted
//! query cancels the previous operation's token, bumps a generation
//! counter, and spawns one background task that:
//!
//! 1. Fetches candidates from the source, racing the cancellation token
//! 2. Filters them with per-candidate cancellation checks
//! 3. Hands the outcome back over a channel, stamped with its generation
//!
//! The interaction side applies an outcome only while its generation is
//! still current, so a superseded query can never overwrite a newer one
//! regardless of completion timing. Cancellation is advisory: a stale
//! task may finish, but its outcome is discarded on arrival.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::filter::CandidateFilter;
use super::source::CandidateSource;

/// Result of one completed (non-cancelled) search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Generation of the query that produced these matches.
    pub generation: u64,

    /// Matching candidates, in source order.
    pub matches: Vec<String>,
}

/// Owns the single-flight search lifecycle.
pub struct SearchPipeline {
    source: Arc<dyn CandidateSource>,
    filter: CandidateFilter,
    generation: u64,
    cancel: Option<CancellationToken>,
    tx: mpsc::UnboundedSender<SearchOutcome>,
    rx: mpsc::UnboundedReceiver<SearchOutcome>,
}

impl SearchPipeline {
    /// Create a pipeline over a candidate source and a filter policy.
    pub fn new(source: Arc<dyn CandidateSource>, filter: CandidateFilter) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            filter,
            generation: 0,
            cancel: None,
            tx,
            rx,
        }
    }

    /// Current query generation. Only outcomes stamped with this value
    /// are applied.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancel any outstanding search without issuing a new one.
    ///
    /// Bumps the generation so an already-completed outcome still in the
    /// channel can no longer be applied.
    pub fn cancel_outstanding(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.generation += 1;
    }

    /// Submit a new query, superseding any outstanding one.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Arguments
    /// * `query` - The pending text to match against
    /// * `already_tokenized` - Committed values to exclude from results
    pub fn submit(&mut self, query: &str, already_tokenized: Vec<String>) {
        self.cancel_outstanding();

        let token = CancellationToken::new();
        self.cancel = Some(token.clone());

        let source = Arc::clone(&self.source);
        let filter = self.filter;
        let tx = self.tx.clone();
        let generation = self.generation;
        let query = query.to_string();

        debug!(generation, query = %query, "search submitted");

        tokio::spawn(async move {
            // Race the candidate fetch against cancellation
            let candidates = tokio::select! {
                _ = token.cancelled() => {
                    trace!(generation, "search cancelled during fetch");
                    return;
                }
                candidates = source.candidates() => candidates,
            };

            // Cooperative per-candidate cancellation checks
            match filter.filter_cancellable(&candidates, &already_tokenized, &query, &token) {
                Some(matches) => {
                    trace!(generation, count = matches.len(), "search completed");
                    // Receiver may be gone during shutdown
                    let _ = tx.send(SearchOutcome { generation, matches });
                }
                None => trace!(generation, "search cancelled during filter"),
            }
        });
    }

    /// Drain completed outcomes, returning the current-generation result
    /// if one arrived.
    ///
    /// Stale outcomes are discarded unconditionally and produce no state
    /// change. Non-blocking.
    pub fn poll(&mut self) -> Option<Vec<String>> {
        let mut latest = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if outcome.generation == self.generation {
                latest = Some(outcome.matches);
            } else {
                trace!(
                    stale = outcome.generation,
                    current = self.generation,
                    "stale search outcome discarded"
                );
            }
        }
        latest
    }

    /// Await the next current-generation outcome.
    ///
    /// Skips stale outcomes. Intended for hosts that drive the engine
    /// from an async loop; only call while a search is outstanding.
    pub async fn next_result(&mut self) -> Option<Vec<String>> {
        while let Some(outcome) = self.rx.recv().await {
            if outcome.generation == self.generation {
                return Some(outcome.matches);
            }
            trace!(
                stale = outcome.generation,
                current = self.generation,
                "stale search outcome discarded"
            );
        }
        None
    }
}

impl std::fmt::Debug for SearchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPipeline")
            .field("generation", &self.generation)
            .field("filter", &self.filter)
            .field("outstanding", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::filter::MatchMode;
    use crate::input::source::StaticSource;
    use async_trait::async_trait;
    use std::time::Duration;

    fn addresses() -> Vec<String> {
        vec![
            "test@gmail.com".to_string(),
            "tester@gmail.com".to_string(),
            "other@gmail.com".to_string(),
        ]
    }

    fn pipeline(source: Arc<dyn CandidateSource>) -> SearchPipeline {
        SearchPipeline::new(source, CandidateFilter::new(MatchMode::Substring, true))
    }

    /// Source that stalls before answering, long enough for a
    /// superseding query to land first.
    struct SlowSource {
        candidates: Vec<String>,
        delay: Duration,
    }

    #[async_trait]
    impl CandidateSource for SlowSource {
        async fn candidates(&self) -> Vec<String> {
            tokio::time::sleep(self.delay).await;
            self.candidates.clone()
        }
    }

    #[tokio::test]
    async fn test_completed_search_delivers_matches() {
        let mut pipeline = pipeline(Arc::new(StaticSource::new(addresses())));
        pipeline.submit("test", Vec::new());

        let matches = pipeline.next_result().await.unwrap();
        assert_eq!(matches, vec!["test@gmail.com", "tester@gmail.com"]);
    }

    #[tokio::test]
    async fn test_superseded_query_never_applies() {
        let slow = Arc::new(SlowSource {
            candidates: addresses(),
            delay: Duration::from_millis(50),
        });
        let mut pipeline = pipeline(slow);

        // "te" is superseded by "tester" before it can resolve
        pipeline.submit("te", Vec::new());
        pipeline.submit("tester", Vec::new());

        let matches = pipeline.next_result().await.unwrap();
        assert_eq!(matches, vec!["tester@gmail.com"]);

        // Nothing further arrives from the cancelled query
        assert_eq!(pipeline.poll(), None);
    }

    #[tokio::test]
    async fn test_stale_outcome_discarded_by_generation() {
        let mut pipeline = pipeline(Arc::new(StaticSource::new(addresses())));
        pipeline.submit("test", Vec::new());

        // Wait for the outcome to land in the channel, then invalidate it
        tokio::time::sleep(Duration::from_millis(20)).await;
        pipeline.cancel_outstanding();

        assert_eq!(pipeline.poll(), None);
    }

    #[tokio::test]
    async fn test_excludes_tokenized_values() {
        let mut pipeline = pipeline(Arc::new(StaticSource::new(addresses())));
        pipeline.submit("gmail", vec!["test@gmail.com".to_string()]);

        let matches = pipeline.next_result().await.unwrap();
        assert_eq!(matches, vec!["tester@gmail.com", "other@gmail.com"]);
    }

    #[tokio::test]
    async fn test_zero_results_is_an_outcome_not_a_cancellation() {
        let mut pipeline = pipeline(Arc::new(StaticSource::new(addresses())));
        pipeline.submit("nomatch", Vec::new());

        // An applied empty outcome is distinct from no outcome at all
        assert_eq!(pipeline.next_result().await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_generation_increments_per_submission() {
        let mut pipeline = pipeline(Arc::new(StaticSource::new(Vec::new())));
        let start = pipeline.generation();
        pipeline.submit("a", Vec::new());
        pipeline.submit("ab", Vec::new());
        assert_eq!(pipeline.generation(), start + 2);
    }
}
