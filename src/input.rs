// File: src/input.rs
//! Line grammar of the interactive tagger.

use crate::core::types::Tag;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    Tables,
    Discard,
    /// Empty line: store the pending sentence, or nothing when none is pending.
    Submit,
    Sentence(&'a str),
    /// One tag name per word, in order.
    TagAll(Vec<&'a str>),
    Tag { position: usize, tag: &'a str },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command {0:?} (commands: :tables, :discard, exit)")]
    UnknownCommand(String),

    #[error("no sentence is being tagged")]
    NothingToDiscard,

    #[error("expected '<word number> <tag>' or one of n/v/m per word")]
    ExpectedTag,

    #[error("'{0}' is not a word number")]
    BadWordNumber(String),

    #[error("word numbers start at 1")]
    WordNumberZero,
}

/// `n`, `v` and `m` stand for the canonical tag names; anything else is
/// passed through for the session to judge.
pub fn expand_tag(token: &str) -> &str {
    Tag::CANONICAL
        .iter()
        .find(|tag| tag.code().is_some_and(|code| token == code.as_char().to_string()))
        .map_or(token, |tag| tag.name())
}

fn is_code(token: &str) -> bool {
    expand_tag(token) != token
}

/// Reads one trimmed input line. `pending_words` is the length of the
/// sentence being tagged, if any.
pub fn parse_line(line: &str, pending_words: Option<usize>) -> Result<Command<'_>, InputError> {
    match (line, pending_words) {
        ("exit", _) => return Ok(Command::Exit),
        (":tables", _) => return Ok(Command::Tables),
        (":discard", Some(_)) => return Ok(Command::Discard),
        (":discard", None) => return Err(InputError::NothingToDiscard),
        (cmd, _) if cmd.starts_with(':') => {
            return Err(InputError::UnknownCommand(cmd.to_string()))
        }
        ("", _) => return Ok(Command::Submit),
        _ => {}
    }

    let Some(word_count) = pending_words else {
        return Ok(Command::Sentence(line));
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() == word_count && tokens.iter().all(|t| is_code(t)) {
        return Ok(Command::TagAll(tokens.into_iter().map(expand_tag).collect()));
    }

    let (number, tag) = line
        .split_once(char::is_whitespace)
        .ok_or(InputError::ExpectedTag)?;
    let number: usize = number
        .parse()
        .map_err(|_| InputError::BadWordNumber(number.to_string()))?;
    let position = number.checked_sub(1).ok_or(InputError::WordNumberZero)?;
    Ok(Command::Tag {
        position,
        tag: expand_tag(tag.trim()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tag() {
        assert_eq!(expand_tag("n"), "Noun");
        assert_eq!(expand_tag("v"), "Verb");
        assert_eq!(expand_tag("m"), "Modal Auxiliary");
        assert_eq!(expand_tag("Verb"), "Verb");
        assert_eq!(expand_tag("x"), "x");
    }

    #[test]
    fn test_discard_without_pending_sentence_is_not_a_sentence() {
        assert_eq!(parse_line(":discard", None), Err(InputError::NothingToDiscard));
        assert_eq!(parse_line(":discard", Some(2)), Ok(Command::Discard));
    }

    #[test]
    fn test_unknown_colon_command_rejected() {
        assert_eq!(
            parse_line(":tabels", None),
            Err(InputError::UnknownCommand(":tabels".into()))
        );
        assert_eq!(
            parse_line(":submit", Some(3)),
            Err(InputError::UnknownCommand(":submit".into()))
        );
    }

    #[test]
    fn test_command_routing() {
        assert_eq!(parse_line("exit", Some(1)), Ok(Command::Exit));
        assert_eq!(parse_line(":tables", None), Ok(Command::Tables));
        assert_eq!(parse_line("", None), Ok(Command::Submit));
        assert_eq!(parse_line("", Some(3)), Ok(Command::Submit));
        assert_eq!(
            parse_line("Deval loves google", None),
            Ok(Command::Sentence("Deval loves google"))
        );
    }

    #[test]
    fn test_one_code_per_word() {
        assert_eq!(
            parse_line("n v n", Some(3)),
            Ok(Command::TagAll(vec!["Noun", "Verb", "Noun"]))
        );
        // Wrong count falls back to the numbered form, which rejects it.
        assert_eq!(
            parse_line("n v", Some(3)),
            Err(InputError::BadWordNumber("n".into()))
        );
    }

    #[test]
    fn test_numbered_tag() {
        assert_eq!(
            parse_line("2 v", Some(3)),
            Ok(Command::Tag { position: 1, tag: "Verb" })
        );
        assert_eq!(
            parse_line("1 Modal Auxiliary", Some(3)),
            Ok(Command::Tag { position: 0, tag: "Modal Auxiliary" })
        );
        assert_eq!(parse_line("0 n", Some(3)), Err(InputError::WordNumberZero));
        assert_eq!(
            parse_line("two n", Some(3)),
            Err(InputError::BadWordNumber("two".into()))
        );
        assert_eq!(parse_line("Noun", Some(3)), Err(InputError::ExpectedTag));
    }
}
