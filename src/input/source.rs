//! Candidate sources
//!
//! The external, read-only origin of values eligible to be suggested.
//! Modeled as an async trait so candidates can live behind a database or
//! network hop; the search pipeline races the fetch against cancellation
//! either way.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{Result, SourceError};

/// Trait for providing suggestion candidates
///
/// Implementations return the full candidate list in source order; the
/// engine owns filtering and exclusion of already-committed values.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// All candidates, in source order.
    async fn candidates(&self) -> Vec<String>;
}

/// In-memory candidate source with a fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    candidates: Vec<String>,
}

impl StaticSource {
    /// Create a source over a fixed candidate list.
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }
}

#[async_trait]
impl CandidateSource for StaticSource {
    async fn candidates(&self) -> Vec<String> {
        self.candidates.clone()
    }
}

/// Candidate source backed by a JSON file containing an array of strings.
///
/// The file is read once at construction; the loaded list is served from
/// memory afterwards.
#[derive(Debug, Clone)]
pub struct FileSource {
    candidates: Vec<String>,
}

impl FileSource {
    /// Load candidates from a JSON array file.
    ///
    /// # Arguments
    /// * `path` - Path to a JSON file holding `["candidate", ...]`
    ///
    /// # Returns
    /// * `Result<Self>` - Loaded source, or a source error
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|_| SourceError::FileNotFound(path.display().to_string()))?;

        let candidates: Vec<String> = serde_json::from_str(&contents)
            .map_err(|e| SourceError::InvalidFormat(e.to_string()))?;

        Ok(Self { candidates })
    }
}

#[async_trait]
impl CandidateSource for FileSource {
    async fn candidates(&self) -> Vec<String> {
        self.candidates.clone()
    }
}
