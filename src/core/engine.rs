use crate::config::SessionConfig;
use crate::core::emission::{EmissionCountTable, EmissionProbabilityTable};
use crate::core::error::SessionError;
use crate::core::transition::{
    count_transitions, TransitionCountTable, TransitionCounter, TransitionProbabilityTable,
};
use crate::core::types::{Corpus, Tag, TaggedSentence};
use crate::learning::LearningEngine;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The four tables shown once enough sentences are tagged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HmmTables {
    pub emission_counts: EmissionCountTable,
    pub emission_probabilities: EmissionProbabilityTable,
    pub transition_counts: TransitionCountTable,
    pub transition_probabilities: TransitionProbabilityTable,
}

/// The sentence currently being tagged.
#[derive(Debug, Clone)]
struct PendingSentence {
    words: Vec<String>,
    tags: BTreeMap<usize, Tag>,
}

impl PendingSentence {
    fn untagged_positions(&self) -> Vec<usize> {
        (0..self.words.len())
            .filter(|p| !self.tags.contains_key(p))
            .collect()
    }

    fn to_tagged_sentence(&self) -> TaggedSentence {
        TaggedSentence {
            words: self.words.clone(),
            tags: self
                .tags
                .iter()
                .map(|(&position, tag)| (position, tag.name().to_string()))
                .collect(),
        }
    }
}

/// One user's tagging session: the sentence in progress, the completed
/// corpus, and the running tables built from it.
///
/// Nothing is shared between sessions; every session owns its own tables.
pub struct TaggingSession {
    config: SessionConfig,
    pending: Option<PendingSentence>,
    corpus: Corpus,
    emission_counts: EmissionCountTable,
    transitions: TransitionCounter,
    learning_engine: LearningEngine,
}

impl Default for TaggingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TaggingSession {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            pending: None,
            corpus: Corpus::new(),
            emission_counts: EmissionCountTable::new(),
            transitions: TransitionCounter::new(),
            learning_engine: LearningEngine::new(),
        }
    }

    /// Splits `text` on whitespace and starts tagging it. Returns the word count.
    pub fn begin_sentence(&mut self, text: &str) -> Result<usize, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::SentenceInProgress);
        }
        let words: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            return Err(SessionError::BlankSentence);
        }
        let len = words.len();
        self.pending = Some(PendingSentence {
            words,
            tags: BTreeMap::new(),
        });
        Ok(len)
    }

    /// Assigns (or reassigns) the tag of one word of the pending sentence.
    pub fn assign_tag(&mut self, position: usize, tag_name: &str) -> Result<Tag, SessionError> {
        let pending = self.pending.as_mut().ok_or(SessionError::NoPendingSentence)?;
        let len = pending.words.len();
        if position >= len {
            return Err(SessionError::PositionOutOfRange { position, len });
        }
        let tag = Tag::from_name(tag_name)
            .filter(|tag| tag.is_canonical())
            .ok_or_else(|| SessionError::UnsupportedTag {
                name: tag_name.to_string(),
            })?;
        pending.tags.insert(position, tag);
        Ok(tag)
    }

    pub fn pending_words(&self) -> Option<&[String]> {
        self.pending.as_ref().map(|p| p.words.as_slice())
    }

    pub fn pending_tag(&self, position: usize) -> Option<Tag> {
        self.pending
            .as_ref()
            .and_then(|p| p.tags.get(&position).copied())
    }

    pub fn untagged_positions(&self) -> Vec<usize> {
        self.pending
            .as_ref()
            .map(PendingSentence::untagged_positions)
            .unwrap_or_default()
    }

    pub fn is_fully_tagged(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| p.untagged_positions().is_empty())
    }

    /// Moves the pending sentence into the corpus and folds it into the
    /// running tables.
    pub fn submit_sentence(&mut self) -> Result<&TaggedSentence, SessionError> {
        let pending = self.pending.as_ref().ok_or(SessionError::NoPendingSentence)?;
        let positions = pending.untagged_positions();
        if !positions.is_empty() {
            return Err(SessionError::Untagged { positions });
        }
        let sentence = pending.to_tagged_sentence();
        self.learn(sentence)?;
        self.pending = None;
        Ok(&self.corpus[self.corpus.len() - 1])
    }

    pub fn discard_sentence(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Feeds already tagged sentences through the same path as `submit_sentence`.
    ///
    /// Stops at the first rejected sentence; the ones before it stay in the corpus.
    pub fn load_corpus(
        &mut self,
        sentences: impl IntoIterator<Item = TaggedSentence>,
    ) -> Result<usize, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::SentenceInProgress);
        }
        let mut loaded = 0;
        for sentence in sentences {
            self.learn(sentence)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    fn learn(&mut self, sentence: TaggedSentence) -> Result<(), SessionError> {
        self.learning_engine
            .learn(&mut self.emission_counts, &mut self.transitions, &sentence)?;
        self.corpus.push(sentence);
        debug!(corpus = self.corpus.len(), "sentence added to corpus");
        Ok(())
    }

    pub fn sentences_needed(&self) -> usize {
        self.config.min_sentences.saturating_sub(self.corpus.len())
    }

    pub fn can_compute_tables(&self) -> bool {
        self.pending.is_none() && self.sentences_needed() == 0
    }

    /// Emission probabilities from the running counts; transition counts
    /// recounted from the whole corpus unless the config asks for the
    /// running counter.
    pub fn compute_tables(&self) -> Result<HmmTables, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::SentenceInProgress);
        }
        if self.sentences_needed() > 0 {
            return Err(SessionError::NotEnoughSentences {
                have: self.corpus.len(),
                need: self.config.min_sentences,
            });
        }

        let transition_counts = if self.config.incremental_transitions {
            self.transitions.table().clone()
        } else {
            count_transitions(&self.corpus)?
        };
        let tables = HmmTables {
            emission_counts: self.emission_counts.clone(),
            emission_probabilities: self.emission_counts.probabilities(),
            transition_probabilities: transition_counts.probabilities(),
            transition_counts,
        };

        info!(
            sentences = self.corpus.len(),
            vocabulary = tables.emission_counts.len(),
            "computed HMM tables"
        );
        Ok(tables)
    }

    pub fn corpus(&self) -> &[TaggedSentence] {
        &self.corpus
    }

    pub fn emission_counts(&self) -> &EmissionCountTable {
        &self.emission_counts
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
