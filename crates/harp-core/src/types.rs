//! Record types for the contest-math corpus.
//!
//! A [`RawPage`] is the immutable input fetched by an external collaborator.
//! The extraction pipeline turns one page into one [`ProblemRecord`]; the
//! corpus-wide dedup stages replace records wholesale (never field-by-field)
//! when folding duplicates together.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The five answer-choice letters, in order.
pub const CHOICE_LETTERS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

/// Build the unique id `"{year}/{contest}/{number}"` used as the join key
/// between extraction output and the manual override tables.
#[must_use]
pub fn make_uid(year: &str, contest: &str, number: u32) -> String {
    format!("{year}/{contest}/{number}")
}

/// One raw wiki page, keyed by (year, contest, problem number).
///
/// Read-only to the core; created by the external fetch collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPage {
    /// Contest year, e.g. `"2004"` or `"2021_Fall"`.
    pub year: String,
    /// Contest name, e.g. `"AMC_12B"`.
    pub contest: String,
    /// 1-based problem number within the contest.
    pub number: u32,
    /// Source URL, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Raw page markup.
    pub text: String,
}

impl RawPage {
    /// Unique id of this page.
    #[must_use]
    pub fn uid(&self) -> String {
        make_uid(&self.year, &self.contest, self.number)
    }
}

/// The five lettered multiple-choice options attached to a problem.
///
/// Maps letter A–E to a LaTeX-wrapped expression string. Present only for
/// contests flagged as multiple choice; when present it holds exactly five
/// non-empty, brace-balanced entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceSet(BTreeMap<char, String>);

impl ChoiceSet {
    /// Create an empty choice set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert the value for one letter.
    pub fn insert(&mut self, letter: char, value: String) {
        self.0.insert(letter, value);
    }

    /// Value for a letter, if present.
    #[must_use]
    pub fn get(&self, letter: char) -> Option<&str> {
        self.0.get(&letter).map(String::as_str)
    }

    /// Iterate entries in letter order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.0.iter().map(|(c, v)| (*c, v.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no entries are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when exactly the letters A–E are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.len() == 5 && CHOICE_LETTERS.iter().all(|c| self.0.contains_key(c))
    }
}

impl fmt::Display for ChoiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (letter, value) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{letter}. {value}")?;
            first = false;
        }
        Ok(())
    }
}

/// One solution section of a problem page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// 1-based index in page order (after skipped solutions are removed).
    pub number: usize,
    /// Free-text annotation from the section heading, e.g.
    /// `"Recursive Formula"`. Empty when the heading carried none.
    pub label: String,
    /// Cleaned solution body.
    pub text: String,
}

/// A contest appearance folded into a canonical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub year: String,
    pub contest: String,
    pub number: u32,
}

impl Appearance {
    /// Parse an `"{year}/{contest}/{number}"` uid.
    #[must_use]
    pub fn from_uid(uid: &str) -> Option<Self> {
        let mut parts = uid.splitn(3, '/');
        let year = parts.next()?.to_string();
        let contest = parts.next()?.to_string();
        let number = parts.next()?.parse().ok()?;
        Some(Self {
            year,
            contest,
            number,
        })
    }

    /// Unique id of this appearance.
    #[must_use]
    pub fn uid(&self) -> String {
        make_uid(&self.year, &self.contest, self.number)
    }
}

/// One fully extracted problem: the output unit of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemRecord {
    /// Contest year, e.g. `"2004"` or `"2021_Fall"`.
    pub year: String,
    /// Contest name, e.g. `"AMC_12B"`.
    pub contest: String,
    /// 1-based problem number within the contest.
    pub number: u32,
    /// Source URL, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Difficulty tier (1-9).
    pub level: u8,
    /// Cleaned problem statement, whitespace-collapsed.
    pub problem: String,
    /// Answer choices for multiple-choice contests, `None` otherwise.
    pub choices: Option<ChoiceSet>,
    /// Canonical letter A-E for multiple-choice problems, `None` otherwise.
    pub answer_choice: Option<char>,
    /// Final answer value: the chosen option's text for multiple choice,
    /// a normalized integer expression like `"$17$"` for numeric contests,
    /// `None` for proof-style contests.
    pub answer: Option<String>,
    /// Surviving solutions, in page order.
    pub solutions: Vec<Solution>,
    /// Other contests where this exact problem appeared; empty unless this
    /// record is the canonical member of a duplicate group.
    #[serde(default)]
    pub other_appearances: Vec<Appearance>,
}

impl ProblemRecord {
    /// Unique id of this record.
    #[must_use]
    pub fn uid(&self) -> String {
        make_uid(&self.year, &self.contest, self.number)
    }
}
