// src/core/error.rs
use thiserror::Error;

/// Precondition violations of the statistics builders.
///
/// Unrecognized tags during emission counting and zero denominators are
/// not represented here: those are handled by policy, not reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("invalid input: sentence has no words")]
    EmptySentence,

    #[error("invalid input: no tag assigned to word {position}")]
    MissingTag { position: usize },

    #[error("invalid input: tag assigned to position {position} but the sentence has {len} words")]
    StrayTag { position: usize, len: usize },

    #[error("invalid input: unrecognized tag {name:?} at position {position}")]
    UnknownTag { position: usize, name: String },

    #[error("sentence {index}: {reason}")]
    InSentence {
        index: usize,
        reason: Box<InvalidInput>,
    },
}

impl InvalidInput {
    /// Attaches the corpus index of the offending sentence.
    pub fn in_sentence(self, index: usize) -> Self {
        InvalidInput::InSentence {
            index,
            reason: Box::new(self),
        }
    }
}

/// Misuse of a `TaggingSession`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no sentence is being tagged")]
    NoPendingSentence,

    #[error("a sentence is already being tagged; submit or discard it first")]
    SentenceInProgress,

    #[error("please enter a sentence")]
    BlankSentence,

    #[error("position {position} is out of range for a {len}-word sentence")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("{name:?} is not one of Noun, Verb, Modal Auxiliary")]
    UnsupportedTag { name: String },

    #[error("tag all words before submitting (untagged positions: {positions:?})")]
    Untagged { positions: Vec<usize> },

    #[error("{have} sentences tagged, at least {need} are needed to compute the tables")]
    NotEnoughSentences { have: usize, need: usize },

    #[error(transparent)]
    Invalid(#[from] InvalidInput),
}

/// Failures while importing a tagged corpus.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed corpus JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] InvalidInput),
}
