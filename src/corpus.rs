// File: src/corpus.rs
use crate::core::error::CorpusError;
use crate::core::types::{Corpus, TaggedSentence};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Reads a tagged corpus from a JSON file.
///
/// The format is an array of `{"words": [...], "tags": {"0": "Noun", ...}}`.
/// Every sentence is validated; the file is never written back.
pub fn load_corpus(path: &Path) -> Result<Corpus, CorpusError> {
    let file = File::open(path)?;
    let corpus = read_corpus(BufReader::new(file))?;
    debug!(path = %path.display(), sentences = corpus.len(), "loaded corpus");
    Ok(corpus)
}

pub fn read_corpus(reader: impl Read) -> Result<Corpus, CorpusError> {
    let corpus: Vec<TaggedSentence> = serde_json::from_reader(reader)?;
    validate(corpus)
}

pub fn parse_corpus(json: &str) -> Result<Corpus, CorpusError> {
    let corpus: Vec<TaggedSentence> = serde_json::from_str(json)?;
    validate(corpus)
}

fn validate(corpus: Vec<TaggedSentence>) -> Result<Corpus, CorpusError> {
    for (index, sentence) in corpus.iter().enumerate() {
        sentence.validate().map_err(|e| e.in_sentence(index))?;
    }
    Ok(corpus)
}
