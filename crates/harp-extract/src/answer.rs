//! Boxed-answer extraction from solution text and standardization against
//! the problem's choices.

use harp_core::ChoiceSet;
use log::warn;

use crate::latex::{clean_choice, find_closing_brace, remove_boxes_keep_content};

/// An extracted final answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// One of the five choice letters.
    Letter(char),
    /// A standalone value for contests without choices, e.g. `$17$`.
    Value(String),
}

/// Content of the last `\boxed{...}` in a solution, or `None` when the
/// solution boxes nothing.
#[must_use]
pub fn extract_last_boxed(text: &str) -> Option<String> {
    const PREFIX: &str = "\\boxed{";
    let start = text.rfind(PREFIX)?;
    let inner = &text[start + PREFIX.len()..];
    match find_closing_brace(inner) {
        Some(close) => Some(inner[..close].to_string()),
        None => {
            warn!("unbalanced braces in final boxed answer");
            None
        }
    }
}

/// Resolve a boxed answer to a choice letter (multiple-choice contests) or
/// a bare integer value (answer contests). `context` names the page for
/// log lines.
#[must_use]
pub fn standardize_answer(
    boxed: &str,
    choices: Option<&ChoiceSet>,
    context: &str,
) -> Option<Answer> {
    match choices {
        Some(choices) => standardize_letter(boxed, choices, context).map(Answer::Letter),
        None => standardize_value(boxed, context).map(Answer::Value),
    }
}

/// A boxed answer on a multiple-choice problem should repeat its letter,
/// e.g. `\boxed{\textbf{(C) } 7}`. Failing that, match a bare letter or
/// the choice's value.
fn standardize_letter(boxed: &str, choices: &ChoiceSet, context: &str) -> Option<char> {
    let mut matches: Vec<char> = choices
        .iter()
        .filter(|(letter, _)| boxed.contains(&format!("({letter})")))
        .map(|(letter, _)| letter)
        .collect();

    if matches.is_empty() {
        matches = choices
            .iter()
            .filter(|(letter, _)| boxed.contains(*letter))
            .map(|(letter, _)| letter)
            .collect();
        if !matches.is_empty() {
            warn!("{context}: boxed answer only names a bare letter: {boxed}");
        }
    }
    if matches.is_empty() {
        let cleaned = clean_choice(boxed);
        matches = choices
            .iter()
            .filter(|(_, value)| *value == cleaned || *value == format!("${cleaned}$"))
            .map(|(letter, _)| letter)
            .collect();
        if !matches.is_empty() {
            warn!("{context}: matched boxed answer to a choice by value: {boxed}");
        }
    }

    match matches.as_slice() {
        [letter] => Some(*letter),
        [] => {
            warn!("{context}: boxed answer matches no choice: {boxed}");
            None
        }
        _ => {
            warn!("{context}: boxed answer matches several choices: {boxed}");
            None
        }
    }
}

/// On answer contests the boxed content must reduce to a bare integer.
fn standardize_value(boxed: &str, context: &str) -> Option<String> {
    let cleaned = clean_choice(boxed);
    let cleaned = remove_boxes_keep_content(&cleaned);
    let cleaned = cleaned
        .trim_matches(|ch: char| ch.is_whitespace() || matches!(ch, '(' | ')' | '[' | ']' | '{' | '}'));
    match cleaned.parse::<i64>() {
        Ok(n) => Some(format!("${n}$")),
        Err(_) => {
            warn!("{context}: boxed answer is not an integer: {boxed}");
            None
        }
    }
}
