// src/lib.rs

pub mod config;
pub mod core;
pub mod corpus;
pub mod input;
pub mod learning;
pub mod report;

pub use crate::config::SessionConfig;
pub use crate::core::emission::{
    accumulate_emission_counts, derive_emission_probabilities, EmissionCountTable,
    EmissionProbabilityTable,
};
pub use crate::core::engine::{HmmTables, TaggingSession};
pub use crate::core::error::{CorpusError, InvalidInput, SessionError};
pub use crate::core::transition::{
    count_transitions, derive_transition_probabilities, TransitionCountTable, TransitionCounter,
    TransitionProbabilityTable,
};
pub use crate::core::types::{map_tag_to_code, Corpus, Tag, TagCode, TaggedSentence};
