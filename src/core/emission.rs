// src/core/emission.rs
use crate::core::types::{
    map_tag_to_code, ratio, CodeColumns, EmissionCounts, EmissionProbabilities, TagCode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Case-folded word -> how often it was tagged n, v and m.
/// Grows one sentence at a time and never shrinks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmissionCountTable {
    rows: BTreeMap<String, EmissionCounts>,
}

impl EmissionCountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one count per word whose tag is recognized.
    ///
    /// Words are lowercased before lookup. A word whose position has no tag,
    /// or whose tag has no short code, is skipped without touching the table.
    pub fn accumulate<S, T>(&mut self, words: &[S], tags: &BTreeMap<usize, T>) -> &mut Self
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        for (position, word) in words.iter().enumerate() {
            let word = word.as_ref().to_lowercase();
            let Some(code) = tags.get(&position).and_then(|t| map_tag_to_code(t.as_ref())) else {
                trace!(position, word = %word, "skipping word without a recognized tag");
                continue;
            };
            *self.rows.entry(word).or_default().get_mut(code) += 1;
        }
        self
    }

    pub fn get(&self, word: &str) -> Option<&EmissionCounts> {
        self.rows.get(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmissionCounts)> {
        self.rows.iter().map(|(word, counts)| (word.as_str(), counts))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of each code's counts over the whole vocabulary.
    pub fn column_totals(&self) -> CodeColumns<u64> {
        CodeColumns::from_fn(|code| self.rows.values().map(|counts| counts.get(code)).sum())
    }

    /// Column-normalized probabilities: each word's count for a code over
    /// that code's total. A code with no occurrences yields 0 for every word.
    pub fn probabilities(&self) -> EmissionProbabilityTable {
        let totals = self.column_totals();
        let rows = self
            .rows
            .iter()
            .map(|(word, counts)| {
                let probs =
                    CodeColumns::from_fn(|code| ratio(counts.get(code), totals.get(code)));
                (word.clone(), probs)
            })
            .collect();
        EmissionProbabilityTable { rows }
    }
}

/// Word -> emission probability per tag column.
///
/// Columns are normalized independently, so a word's three values need not
/// sum to 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmissionProbabilityTable {
    rows: BTreeMap<String, EmissionProbabilities>,
}

impl EmissionProbabilityTable {
    pub fn get(&self, word: &str) -> Option<&EmissionProbabilities> {
        self.rows.get(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmissionProbabilities)> {
        self.rows.iter().map(|(word, probs)| (word.as_str(), probs))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_sum(&self, code: TagCode) -> f64 {
        self.rows.values().map(|probs| probs.get(code)).sum()
    }
}

/// Folds one tagged sentence into `table` and hands the same table back.
pub fn accumulate_emission_counts<'a, S, T>(
    table: &'a mut EmissionCountTable,
    words: &[S],
    tags: &BTreeMap<usize, T>,
) -> &'a mut EmissionCountTable
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    table.accumulate(words, tags)
}

/// Recomputes the emission probability table from scratch.
pub fn derive_emission_probabilities(table: &EmissionCountTable) -> EmissionProbabilityTable {
    table.probabilities()
}
