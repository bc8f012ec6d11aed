// src/config.rs
use serde::{Deserialize, Serialize};

/// Completed sentences required before the tables are offered.
pub const DEFAULT_MIN_SENTENCES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sentences that must be tagged before `compute_tables` succeeds.
    pub min_sentences: usize,
    /// Read transition counts from the running counter instead of
    /// recounting the whole corpus.
    pub incremental_transitions: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_sentences: DEFAULT_MIN_SENTENCES,
            incremental_transitions: false,
        }
    }
}

impl SessionConfig {
    pub fn with_min_sentences(mut self, min_sentences: usize) -> Self {
        self.min_sentences = min_sentences;
        self
    }

    pub fn with_incremental_transitions(mut self, incremental: bool) -> Self {
        self.incremental_transitions = incremental;
        self
    }
}
