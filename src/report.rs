// File: src/report.rs
//! Plain row renderings of the HMM tables for terminal front-ends.

use crate::core::emission::{EmissionCountTable, EmissionProbabilityTable};
use crate::core::engine::HmmTables;
use crate::core::transition::{TransitionCountTable, TransitionProbabilityTable};
use crate::core::types::{Tag, TagCode};
use crossterm::style::Color;

const PROBABILITY_DECIMALS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Label,
    Zero,
    NonZero,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub kind: CellKind,
}

impl Cell {
    fn label(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CellKind::Label,
        }
    }

    fn count(value: u64) -> Self {
        Self {
            text: value.to_string(),
            kind: if value == 0 { CellKind::Zero } else { CellKind::NonZero },
        }
    }

    fn probability(value: f64) -> Self {
        Self {
            text: format!("{:.*}", PROBABILITY_DECIMALS, value),
            kind: if value == 0.0 { CellKind::Zero } else { CellKind::NonZero },
        }
    }
}

/// A titled grid: one header row and any number of data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: &'static str,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Report {
    /// Width of each column, measured in chars.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.text.chars().count());
            }
        }
        widths
    }

    /// Left-aligned labels, right-aligned numbers, columns separated by two spaces.
    pub fn render_plain(&self) -> String {
        let widths = self.column_widths();
        let mut out = format!("{}\n", self.title);

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| format!("{h:<w$}"))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        for row in &self.rows {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| match cell.kind {
                    CellKind::Label => format!("{:<w$}", cell.text),
                    CellKind::Zero | CellKind::NonZero => format!("{:>w$}", cell.text),
                })
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

fn code_header(code: TagCode) -> String {
    format!("{} ({})", code.tag(), code.as_char())
}

fn destination_header(to: Tag) -> String {
    match to {
        Tag::ModalAuxiliary => "-> Modal Aux".to_string(),
        Tag::End => "-> End".to_string(),
        other => format!("-> {other}"),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn emission_headers() -> Vec<String> {
    std::iter::once("Word".to_string())
        .chain(TagCode::ALL.into_iter().map(code_header))
        .collect()
}

fn transition_headers() -> Vec<String> {
    std::iter::once("Current POS".to_string())
        .chain(Tag::DESTINATIONS.into_iter().map(destination_header))
        .collect()
}

pub fn emission_counts_report(table: &EmissionCountTable) -> Report {
    let rows = table
        .iter()
        .map(|(word, counts)| {
            std::iter::once(Cell::label(capitalize(word)))
                .chain(TagCode::ALL.into_iter().map(|code| Cell::count(counts.get(code))))
                .collect::<Vec<_>>()
        })
        .collect();
    Report {
        title: "POS Count Table",
        headers: emission_headers(),
        rows,
    }
}

pub fn emission_probabilities_report(table: &EmissionProbabilityTable) -> Report {
    let rows = table
        .iter()
        .map(|(word, probs)| {
            std::iter::once(Cell::label(capitalize(word)))
                .chain(TagCode::ALL.into_iter().map(|code| Cell::probability(probs.get(code))))
                .collect::<Vec<_>>()
        })
        .collect();
    Report {
        title: "Emission Probability Table",
        headers: emission_headers(),
        rows,
    }
}

pub fn transition_counts_report(table: &TransitionCountTable) -> Report {
    let rows = table
        .rows()
        .map(|(from, row)| {
            std::iter::once(Cell::label(from.name()))
                .chain(row.entries().into_iter().map(|(_, count)| Cell::count(count)))
                .collect::<Vec<_>>()
        })
        .collect();
    Report {
        title: "Transition Count Table",
        headers: transition_headers(),
        rows,
    }
}

pub fn transition_probabilities_report(table: &TransitionProbabilityTable) -> Report {
    let rows = table
        .rows()
        .map(|(from, row)| {
            std::iter::once(Cell::label(from.name()))
                .chain(row.entries().into_iter().map(|(_, p)| Cell::probability(p)))
                .collect::<Vec<_>>()
        })
        .collect();
    Report {
        title: "Transition Probability Table",
        headers: transition_headers(),
        rows,
    }
}

/// All four tables in the order the dashboard showed them.
pub fn reports(tables: &HmmTables) -> Vec<Report> {
    vec![
        emission_counts_report(&tables.emission_counts),
        emission_probabilities_report(&tables.emission_probabilities),
        transition_counts_report(&tables.transition_counts),
        transition_probabilities_report(&tables.transition_probabilities),
    ]
}

/// Noun green, Verb orange, Modal Auxiliary red, as on the tagging page.
/// Untagged or unrecognized names are greyed out.
pub fn tag_color(tag: Option<Tag>) -> Color {
    match tag {
        Some(Tag::Noun) => Color::Green,
        Some(Tag::Verb) => Color::Rgb { r: 255, g: 165, b: 0 },
        Some(Tag::ModalAuxiliary) => Color::Red,
        Some(Tag::Start | Tag::End) | None => Color::DarkGrey,
    }
}

pub fn to_json(tables: &HmmTables) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transition::count_transitions;
    use crate::core::types::TaggedSentence;
    use std::collections::BTreeMap;

    fn deval_tables() -> HmmTables {
        let sentence =
            TaggedSentence::from_pairs([("Deval", "Noun"), ("loves", "Verb"), ("google", "Noun")])
                .unwrap();
        let mut emission_counts = EmissionCountTable::new();
        emission_counts.accumulate(sentence.words.as_slice(), &sentence.tags);
        let transition_counts = count_transitions(&[sentence]).unwrap();
        HmmTables {
            emission_probabilities: emission_counts.probabilities(),
            emission_counts,
            transition_probabilities: transition_counts.probabilities(),
            transition_counts,
        }
    }

    #[test]
    fn test_emission_rows_sorted_and_capitalized() {
        let report = emission_probabilities_report(&deval_tables().emission_probabilities);
        assert_eq!(report.headers, vec!["Word", "Noun (n)", "Verb (v)", "Modal Auxiliary (m)"]);

        let words: Vec<&str> = report.rows.iter().map(|r| r[0].text.as_str()).collect();
        assert_eq!(words, vec!["Deval", "Google", "Loves"]);
        assert_eq!(report.rows[0][1].text, "0.5000");
        assert_eq!(report.rows[0][3].kind, CellKind::Zero);
    }

    #[test]
    fn test_transition_rows() {
        let report = transition_counts_report(&deval_tables().transition_counts);
        assert_eq!(
            report.headers,
            vec!["Current POS", "-> Noun", "-> Verb", "-> Modal Aux", "-> End"]
        );
        let labels: Vec<&str> = report.rows.iter().map(|r| r[0].text.as_str()).collect();
        assert_eq!(labels, vec!["start", "Noun", "Verb"]);
        assert_eq!(report.rows[1][2], Cell::count(1));
        assert_eq!(report.rows[1][4].kind, CellKind::NonZero);
    }

    #[test]
    fn test_render_plain_aligns_columns() {
        let report = Report {
            title: "T",
            headers: vec!["Word".into(), "n".into()],
            rows: vec![
                vec![Cell::label("a"), Cell::count(10)],
                vec![Cell::label("longer"), Cell::count(2)],
            ],
        };
        assert_eq!(report.render_plain(), "T\nWord    n\na       10\nlonger   2\n");
    }

    #[test]
    fn test_json_contains_all_tables() {
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&deval_tables()).unwrap()).unwrap();
        assert_eq!(json["emission_counts"]["google"]["n"], 1);
        assert_eq!(json["transition_probabilities"]["Noun"]["end"], 0.5);
        assert_eq!(json["transition_counts"]["start"]["Noun"], 1);
        assert!(json["transition_counts"].get("Modal Auxiliary").is_none());
        let _: BTreeMap<String, serde_json::Value> =
            serde_json::from_value(json["emission_probabilities"].clone()).unwrap();
    }

    #[test]
    fn test_each_tag_has_its_own_color() {
        assert_eq!(tag_color(Some(Tag::Noun)), Color::Green);
        assert_eq!(tag_color(Some(Tag::Verb)), Color::Rgb { r: 255, g: 165, b: 0 });
        assert_eq!(tag_color(Some(Tag::ModalAuxiliary)), Color::Red);
        assert_eq!(tag_color(Tag::from_name("Adverb")), Color::DarkGrey);
        assert_eq!(tag_color(Some(Tag::End)), Color::DarkGrey);
    }

    #[test]
    fn test_reports_in_dashboard_order() {
        let titles: Vec<&str> = reports(&deval_tables()).iter().map(|r| r.title).collect();
        assert_eq!(
            titles,
            vec![
                "POS Count Table",
                "Emission Probability Table",
                "Transition Count Table",
                "Transition Probability Table"
            ]
        );
    }
}
