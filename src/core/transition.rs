// src/core/transition.rs
use crate::core::error::InvalidInput;
use crate::core::types::{ratio, Tag, TaggedSentence, TransitionCounts, TransitionProbabilities};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Source tag -> counts of the tags that followed it, including `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionCountTable {
    rows: BTreeMap<Tag, TransitionCounts>,
}

impl Default for TransitionCountTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionCountTable {
    /// A table holding only the all-zero `start` row.
    pub fn new() -> Self {
        Self::with_rows([Tag::Start])
    }

    fn with_rows(sources: impl IntoIterator<Item = Tag>) -> Self {
        let mut rows: BTreeMap<Tag, TransitionCounts> = sources
            .into_iter()
            .map(|tag| (tag, TransitionCounts::default()))
            .collect();
        rows.entry(Tag::Start).or_default();
        Self { rows }
    }

    /// Counts `start -> first`, every adjacent pair, and `last -> end`.
    /// Every tag in the sequence gets a row, even one never seen as a source.
    fn record_sequence(&mut self, sequence: &[Tag]) {
        let (Some(&first), Some(&last)) = (sequence.first(), sequence.last()) else {
            return;
        };
        for &tag in sequence {
            self.rows.entry(tag).or_default();
        }
        self.bump(Tag::Start, first);
        for pair in sequence.windows(2) {
            self.bump(pair[0], pair[1]);
        }
        self.bump(last, Tag::End);
    }

    fn bump(&mut self, from: Tag, to: Tag) {
        if let Some(count) = self.rows.entry(from).or_default().get_mut(to) {
            *count += 1;
        }
    }

    /// Count for one edge; 0 for a source with no row.
    pub fn get(&self, from: Tag, to: Tag) -> u64 {
        self.rows
            .get(&from)
            .and_then(|row| row.get(to))
            .unwrap_or(0)
    }

    pub fn row(&self, from: Tag) -> Option<&TransitionCounts> {
        self.rows.get(&from)
    }

    /// Rows in tag order: `start` first.
    pub fn rows(&self) -> impl Iterator<Item = (Tag, &TransitionCounts)> {
        self.rows.iter().map(|(&tag, row)| (tag, row))
    }

    pub fn row_total(&self, from: Tag) -> u64 {
        self.rows
            .get(&from)
            .map(|row| row.entries().iter().map(|&(_, count)| count).sum())
            .unwrap_or(0)
    }

    /// Row-normalized probabilities; a row with no outgoing counts stays all-zero.
    pub fn probabilities(&self) -> TransitionProbabilityTable {
        let rows = self
            .rows
            .iter()
            .map(|(&from, row)| {
                let total = self.row_total(from);
                let probs = TransitionProbabilities::from_fn(|to| {
                    ratio(row.get(to).unwrap_or(0), total)
                });
                (from, probs)
            })
            .collect();
        TransitionProbabilityTable { rows }
    }
}

/// Same shape as `TransitionCountTable`, values are P(next | current).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionProbabilityTable {
    rows: BTreeMap<Tag, TransitionProbabilities>,
}

impl TransitionProbabilityTable {
    pub fn get(&self, from: Tag, to: Tag) -> f64 {
        self.rows
            .get(&from)
            .and_then(|row| row.get(to))
            .unwrap_or(0.0)
    }

    pub fn row(&self, from: Tag) -> Option<&TransitionProbabilities> {
        self.rows.get(&from)
    }

    pub fn rows(&self) -> impl Iterator<Item = (Tag, &TransitionProbabilities)> {
        self.rows.iter().map(|(&tag, row)| (tag, row))
    }

    pub fn row_sum(&self, from: Tag) -> f64 {
        self.rows
            .get(&from)
            .map(|row| row.entries().iter().map(|&(_, p)| p).sum())
            .unwrap_or(0.0)
    }
}

/// Builds the transition count table from a corpus snapshot.
///
/// Every sentence must be non-empty, fully tagged, and use only Noun, Verb
/// and Modal Auxiliary; otherwise the whole call fails with `InvalidInput`
/// naming the first offending sentence. The result is not kept in sync with
/// the corpus: call again after it grows.
pub fn count_transitions(corpus: &[TaggedSentence]) -> Result<TransitionCountTable, InvalidInput> {
    let sequences = corpus
        .iter()
        .enumerate()
        .map(|(index, sentence)| sentence.canonical_tags().map_err(|e| e.in_sentence(index)))
        .collect::<Result<Vec<_>, _>>()?;

    let discovered: BTreeSet<Tag> = sequences.iter().flatten().copied().collect();
    let mut table = TransitionCountTable::with_rows(discovered);
    for sequence in &sequences {
        table.record_sequence(sequence);
    }
    Ok(table)
}

/// Recomputes the transition probability table from its counts.
pub fn derive_transition_probabilities(table: &TransitionCountTable) -> TransitionProbabilityTable {
    table.probabilities()
}

/// Running transition counts, updated one completed sentence at a time.
///
/// Counts are sums over a growing corpus, so after feeding sentences in
/// order the table equals `count_transitions` over the same sentences.
#[derive(Debug, Clone, Default)]
pub struct TransitionCounter {
    table: TransitionCountTable,
    sentences: usize,
}

impl TransitionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one sentence. A rejected sentence leaves the counts untouched.
    pub fn add_sentence(&mut self, sentence: &TaggedSentence) -> Result<(), InvalidInput> {
        let sequence = sentence
            .canonical_tags()
            .map_err(|e| e.in_sentence(self.sentences))?;
        self.table.record_sequence(&sequence);
        self.sentences += 1;
        Ok(())
    }

    pub fn table(&self) -> &TransitionCountTable {
        &self.table
    }

    pub fn into_table(self) -> TransitionCountTable {
        self.table
    }

    pub fn sentences(&self) -> usize {
        self.sentences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sentence(pairs: &[(&str, &str)]) -> TaggedSentence {
        TaggedSentence::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_deval_loves_google() {
        let corpus = vec![sentence(&[("Deval", "Noun"), ("loves", "Verb"), ("google", "Noun")])];
        let counts = count_transitions(&corpus).unwrap();

        assert_eq!(counts.get(Tag::Start, Tag::Noun), 1);
        assert_eq!(counts.get(Tag::Noun, Tag::Verb), 1);
        assert_eq!(counts.get(Tag::Verb, Tag::Noun), 1);
        assert_eq!(counts.get(Tag::Noun, Tag::End), 1);

        let total: u64 = counts.rows().map(|(from, _)| counts.row_total(from)).sum();
        assert_eq!(total, 4, "all other cells are zero");

        let probs = derive_transition_probabilities(&counts);
        assert!((probs.get(Tag::Start, Tag::Noun) - 1.0).abs() < EPS);
        assert_eq!(probs.get(Tag::Start, Tag::Verb), 0.0);
        assert!((probs.get(Tag::Noun, Tag::Verb) - 0.5).abs() < EPS);
        assert!((probs.get(Tag::Noun, Tag::End) - 0.5).abs() < EPS);
        assert!((probs.get(Tag::Verb, Tag::Noun) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_rows_only_for_discovered_tags() {
        let corpus = vec![sentence(&[("Deval", "Noun"), ("loves", "Verb")])];
        let counts = count_transitions(&corpus).unwrap();

        let sources: Vec<Tag> = counts.rows().map(|(tag, _)| tag).collect();
        assert_eq!(sources, vec![Tag::Start, Tag::Noun, Tag::Verb]);
        assert!(counts.row(Tag::ModalAuxiliary).is_none());
        assert_eq!(counts.get(Tag::ModalAuxiliary, Tag::Noun), 0);
    }

    #[test]
    fn test_empty_corpus_has_zero_start_row() {
        let counts = count_transitions(&[]).unwrap();
        assert_eq!(counts.row(Tag::Start), Some(&TransitionCounts::default()));

        let probs = counts.probabilities();
        assert_eq!(probs.row_sum(Tag::Start), 0.0);
    }

    #[test]
    fn test_rows_sum_to_one() {
        let corpus = vec![
            sentence(&[("Can", "Modal Auxiliary"), ("google", "Noun"), ("help", "Verb")]),
            sentence(&[
                ("Will", "Modal Auxiliary"),
                ("juliet", "Noun"),
                ("love", "Verb"),
                ("google", "Noun"),
            ]),
            sentence(&[("Mark", "Noun")]),
        ];
        let counts = count_transitions(&corpus).unwrap();
        let probs = counts.probabilities();

        for (from, _) in probs.rows() {
            assert!((probs.row_sum(from) - 1.0).abs() < EPS, "row {from}");
        }
        assert_eq!(counts.get(Tag::Start, Tag::ModalAuxiliary), 2);
        assert_eq!(counts.get(Tag::Noun, Tag::End), 2);
        assert!((probs.get(Tag::Noun, Tag::Verb) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_empty_sentence_is_invalid_input() {
        let corpus = vec![
            sentence(&[("Mark", "Noun")]),
            TaggedSentence {
                words: vec![],
                tags: BTreeMap::new(),
            },
        ];
        let err = count_transitions(&corpus).unwrap_err();
        assert_eq!(err, InvalidInput::EmptySentence.in_sentence(1));
    }

    #[test]
    fn test_unknown_tag_is_invalid_input() {
        let corpus = vec![sentence(&[("run", "Verb"), ("fast", "Adverb")])];
        let err = count_transitions(&corpus).unwrap_err();
        assert!(matches!(err, InvalidInput::InSentence { index: 0, .. }));
        assert!(err.to_string().contains("Adverb"));
    }

    #[test]
    fn test_counting_does_not_mutate_corpus() {
        let corpus = vec![sentence(&[("Deval", "Noun"), ("loves", "Verb")])];
        let snapshot = corpus.clone();
        let _ = count_transitions(&corpus).unwrap();
        assert_eq!(corpus, snapshot);
    }

    #[test]
    fn test_incremental_counter_matches_batch() {
        let corpus = vec![
            sentence(&[
                ("Mary", "Noun"),
                ("will", "Modal Auxiliary"),
                ("see", "Verb"),
                ("Will", "Noun"),
            ]),
            sentence(&[
                ("Spot", "Noun"),
                ("will", "Modal Auxiliary"),
                ("see", "Verb"),
                ("Mary", "Noun"),
            ]),
            sentence(&[
                ("Will", "Modal Auxiliary"),
                ("Jane", "Noun"),
                ("spot", "Verb"),
                ("Will", "Noun"),
            ]),
            sentence(&[
                ("Mary", "Noun"),
                ("will", "Modal Auxiliary"),
                ("pat", "Verb"),
                ("Spot", "Noun"),
            ]),
        ];

        let mut counter = TransitionCounter::new();
        for (seen, s) in corpus.iter().enumerate() {
            counter.add_sentence(s).unwrap();
            assert_eq!(counter.table(), &count_transitions(&corpus[..=seen]).unwrap());
        }
        assert_eq!(counter.sentences(), 4);
        assert_eq!(counter.into_table().get(Tag::Noun, Tag::ModalAuxiliary), 3);
    }

    #[test]
    fn test_rejected_sentence_leaves_counter_unchanged() {
        let mut counter = TransitionCounter::new();
        counter.add_sentence(&sentence(&[("Mark", "Noun")])).unwrap();
        let before = counter.table().clone();

        let bad = sentence(&[("Mark", "Noun"), ("runs", "end")]);
        assert!(counter.add_sentence(&bad).is_err());
        assert_eq!(counter.table(), &before);
        assert_eq!(counter.sentences(), 1);
    }

    #[test]
    fn test_serializes_with_display_names() {
        let corpus = vec![sentence(&[("can", "Modal Auxiliary")])];
        let json = serde_json::to_value(count_transitions(&corpus).unwrap()).unwrap();
        assert_eq!(json["start"]["Modal Auxiliary"], 1);
        assert_eq!(json["Modal Auxiliary"]["end"], 1);
        assert_eq!(json["start"]["end"], 0);
    }
}
