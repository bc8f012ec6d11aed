// src/core/types.rs
use crate::core::error::InvalidInput;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A hidden state of the tagging model.
///
/// `Start` and `End` are boundary pseudo-tags that only exist in the
/// transition model; they never label a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tag {
    #[serde(rename = "start")]
    Start,
    Noun,
    Verb,
    #[serde(rename = "Modal Auxiliary")]
    ModalAuxiliary,
    #[serde(rename = "end")]
    End,
}

impl Tag {
    /// The tags a user can assign to a word.
    pub const CANONICAL: [Tag; 3] = [Tag::Noun, Tag::Verb, Tag::ModalAuxiliary];

    /// Destination columns of every transition row.
    pub const DESTINATIONS: [Tag; 4] = [Tag::Noun, Tag::Verb, Tag::ModalAuxiliary, Tag::End];

    pub fn from_name(name: &str) -> Option<Tag> {
        match name {
            "start" => Some(Tag::Start),
            "Noun" => Some(Tag::Noun),
            "Verb" => Some(Tag::Verb),
            "Modal Auxiliary" => Some(Tag::ModalAuxiliary),
            "end" => Some(Tag::End),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Start => "start",
            Tag::Noun => "Noun",
            Tag::Verb => "Verb",
            Tag::ModalAuxiliary => "Modal Auxiliary",
            Tag::End => "end",
        }
    }

    /// Short code of a canonical tag; boundary tags have none.
    pub fn code(self) -> Option<TagCode> {
        match self {
            Tag::Noun => Some(TagCode::N),
            Tag::Verb => Some(TagCode::V),
            Tag::ModalAuxiliary => Some(TagCode::M),
            Tag::Start | Tag::End => None,
        }
    }

    pub fn is_canonical(self) -> bool {
        self.code().is_some()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dense single-character key of a canonical tag in the emission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCode {
    N,
    V,
    M,
}

impl TagCode {
    pub const ALL: [TagCode; 3] = [TagCode::N, TagCode::V, TagCode::M];

    pub fn as_char(self) -> char {
        match self {
            TagCode::N => 'n',
            TagCode::V => 'v',
            TagCode::M => 'm',
        }
    }

    pub fn tag(self) -> Tag {
        match self {
            TagCode::N => Tag::Noun,
            TagCode::V => Tag::Verb,
            TagCode::M => Tag::ModalAuxiliary,
        }
    }
}

/// Maps a tag name to its short code.
///
/// Total over all strings: `None` for anything outside Noun, Verb and
/// Modal Auxiliary, including the `start`/`end` boundary names.
pub fn map_tag_to_code(name: &str) -> Option<TagCode> {
    Tag::from_name(name).and_then(Tag::code)
}

/// One value per short code: `{n, v, m}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeColumns<T> {
    pub n: T,
    pub v: T,
    pub m: T,
}

impl<T: Copy> CodeColumns<T> {
    pub fn from_fn(mut f: impl FnMut(TagCode) -> T) -> Self {
        Self {
            n: f(TagCode::N),
            v: f(TagCode::V),
            m: f(TagCode::M),
        }
    }

    pub fn get(&self, code: TagCode) -> T {
        match code {
            TagCode::N => self.n,
            TagCode::V => self.v,
            TagCode::M => self.m,
        }
    }

    pub fn get_mut(&mut self, code: TagCode) -> &mut T {
        match code {
            TagCode::N => &mut self.n,
            TagCode::V => &mut self.v,
            TagCode::M => &mut self.m,
        }
    }
}

/// Per-word tag counts.
pub type EmissionCounts = CodeColumns<u64>;

/// Per-word emission probabilities, one per tag column.
pub type EmissionProbabilities = CodeColumns<f64>;

/// Outgoing edges of one source tag: Noun, Verb, Modal Auxiliary and end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionRow<T> {
    #[serde(rename = "Noun")]
    pub noun: T,
    #[serde(rename = "Verb")]
    pub verb: T,
    #[serde(rename = "Modal Auxiliary")]
    pub modal_auxiliary: T,
    #[serde(rename = "end")]
    pub end: T,
}

impl<T: Copy> TransitionRow<T> {
    pub fn from_fn(mut f: impl FnMut(Tag) -> T) -> Self {
        Self {
            noun: f(Tag::Noun),
            verb: f(Tag::Verb),
            modal_auxiliary: f(Tag::ModalAuxiliary),
            end: f(Tag::End),
        }
    }

    /// `None` for `start`, which is never a destination.
    pub fn get(&self, to: Tag) -> Option<T> {
        match to {
            Tag::Noun => Some(self.noun),
            Tag::Verb => Some(self.verb),
            Tag::ModalAuxiliary => Some(self.modal_auxiliary),
            Tag::End => Some(self.end),
            Tag::Start => None,
        }
    }

    pub fn get_mut(&mut self, to: Tag) -> Option<&mut T> {
        match to {
            Tag::Noun => Some(&mut self.noun),
            Tag::Verb => Some(&mut self.verb),
            Tag::ModalAuxiliary => Some(&mut self.modal_auxiliary),
            Tag::End => Some(&mut self.end),
            Tag::Start => None,
        }
    }

    /// Columns in display order.
    pub fn entries(&self) -> [(Tag, T); 4] {
        [
            (Tag::Noun, self.noun),
            (Tag::Verb, self.verb),
            (Tag::ModalAuxiliary, self.modal_auxiliary),
            (Tag::End, self.end),
        ]
    }
}

pub type TransitionCounts = TransitionRow<u64>;
pub type TransitionProbabilities = TransitionRow<f64>;

/// `count / total`, or 0 when nothing was observed.
pub(crate) fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// An ordered word sequence with one tag name per position.
///
/// Tag names are kept as the user supplied them; the builders decide what
/// an unrecognized name means for their table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSentence {
    pub words: Vec<String>,
    pub tags: BTreeMap<usize, String>,
}

impl TaggedSentence {
    /// Builds a sentence, rejecting it unless every word has exactly one tag.
    pub fn new(words: Vec<String>, tags: BTreeMap<usize, String>) -> Result<Self, InvalidInput> {
        let sentence = Self { words, tags };
        sentence.validate()?;
        Ok(sentence)
    }

    /// Convenience constructor taking tags in word order.
    pub fn from_pairs<W, T>(pairs: impl IntoIterator<Item = (W, T)>) -> Result<Self, InvalidInput>
    where
        W: Into<String>,
        T: Into<String>,
    {
        let (words, tags): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(word, tag)| (word.into(), tag.into()))
            .unzip();
        Self::new(words, tags.into_iter().enumerate().collect())
    }

    /// Checks that the tag key set is exactly `0..len` and the sentence is non-empty.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        let len = self.words.len();
        if len == 0 {
            return Err(InvalidInput::EmptySentence);
        }
        if let Some(position) = (0..len).find(|p| !self.tags.contains_key(p)) {
            return Err(InvalidInput::MissingTag { position });
        }
        if let Some(&position) = self.tags.keys().find(|&&p| p >= len) {
            return Err(InvalidInput::StrayTag { position, len });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The tag sequence in word order, every entry parsed into a canonical tag.
    pub fn canonical_tags(&self) -> Result<Vec<Tag>, InvalidInput> {
        self.validate()?;
        self.tags
            .iter()
            .map(|(&position, name)| {
                Tag::from_name(name)
                    .filter(|tag| tag.is_canonical())
                    .ok_or_else(|| InvalidInput::UnknownTag {
                        position,
                        name: name.clone(),
                    })
            })
            .collect()
    }
}

/// Append-only list of completed sentences.
pub type Corpus = Vec<TaggedSentence>;
