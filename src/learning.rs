// File: src/learning.rs
use crate::core::emission::EmissionCountTable;
use crate::core::error::InvalidInput;
use crate::core::transition::TransitionCounter;
use crate::core::types::TaggedSentence;
use tracing::debug;

/// Feeds a completed sentence into every running model.
pub struct LearningEngine;

impl LearningEngine {
    pub fn new() -> Self {
        Self
    }

    /// The sentence is validated before either table changes, so a rejected
    /// sentence leaves both untouched.
    pub fn learn(
        &self,
        emission_counts: &mut EmissionCountTable,
        transitions: &mut TransitionCounter,
        sentence: &TaggedSentence,
    ) -> Result<(), InvalidInput> {
        transitions.add_sentence(sentence)?;
        emission_counts.accumulate(sentence.words.as_slice(), &sentence.tags);

        debug!(
            words = sentence.len(),
            vocabulary = emission_counts.len(),
            sentences = transitions.sentences(),
            "learned tagged sentence"
        );
        Ok(())
    }
}

impl Default for LearningEngine {
    fn default() -> Self {
        Self::new()
    }
}
