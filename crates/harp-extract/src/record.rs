//! Builds one [`ProblemRecord`] from a raw wiki page.
//!
//! This is the per-page pipeline: normalize the markup, segment into
//! sections, pull the choice row out of the statement, then extract and
//! cross-check the boxed answer of every solution. Pages whose solutions
//! disagree on the answer are rejected whole; individually broken
//! solutions are merely skipped.

use harp_core::{
    contest, difficulty, ChoiceSet, HarpError, ProblemRecord, RawPage, Result, Solution,
};
use log::{info, warn};
use regex::Regex;
use std::sync::LazyLock;

use crate::answer::{extract_last_boxed, standardize_answer, Answer};
use crate::attribution::{filter_attribution, LineFilterSet};
use crate::choices::{clean_choice_format, extract_choices};
use crate::normalize::normalize_page;
use crate::segment::{segment, SectionKind};

/// Leading `$*$` marks a statement whose diagram was dropped.
static RE_DIAGRAM_INDICATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\$\*\$\s*").expect("valid diagram indicator regex"));
/// A solution that is nothing but its boxed answer.
static RE_BOXED_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A\$\\boxed\{(?:[^{}]*|\{[^{}]*\})*\}\$\z").expect("valid boxed-only regex")
});
/// Solutions deferring to an earlier one instead of standing alone.
static RE_REFERS_TO_OTHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Solution \d").expect("valid reference regex"));
static RE_WS_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static RE_SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +").expect("valid space regex"));

/// Run the whole per-page pipeline on one raw page.
pub fn build_record(page: &RawPage, filters: &LineFilterSet) -> Result<ProblemRecord> {
    let blob = normalize_page(&page.text);
    from_normalized(page, &blob, filters)
}

/// Build a record from an already-normalized page blob.
pub fn from_normalized(
    page: &RawPage,
    blob: &str,
    filters: &LineFilterSet,
) -> Result<ProblemRecord> {
    let uid = page.uid();
    let sections = segment(blob)?;

    let statement = filter_attribution(&sections[0].body, filters);
    let statement = RE_DIAGRAM_INDICATOR.replace(statement.trim(), "");

    let multiple_choice = contest::has_choices(&page.contest);
    let (problem, choices) = if multiple_choice {
        let statement = clean_choice_format(&statement);
        let extracted = extract_choices(&statement)
            .map_err(|e| HarpError::Structural(format!("{uid}: {e}")))?;
        if statement[extracted.end..].trim().len() > 1 {
            info!("{uid}: text after the choice row kept in statement");
        }
        let remainder = format!(
            "{}{}",
            &statement[..extracted.start],
            &statement[extracted.end..]
        );
        (remainder, Some(extracted.choices))
    } else {
        (statement.into_owned(), None)
    };
    let problem = RE_WS_RUN.replace_all(&problem, " ").trim().to_string();

    let has_answer = contest::has_answer(&page.contest);
    let mut solutions: Vec<Solution> = Vec::new();
    let mut first_answer: Option<Answer> = None;

    for section in sections.iter().filter(|s| s.kind == SectionKind::Solution) {
        let body = filter_attribution(&section.body, filters);
        let body = body.trim();

        if has_answer {
            // Answer-only solutions are dropped whole: their box never
            // feeds the cross-solution consistency check.
            if RE_BOXED_ONLY.is_match(body) {
                warn!("{uid}: skipping solution that only states the answer");
                continue;
            }
            let Some(boxed) = extract_last_boxed(body) else {
                warn!("{uid}: skipping solution with no boxed answer");
                continue;
            };
            let Some(answer) = standardize_answer(&boxed, choices.as_ref(), &uid) else {
                warn!("{uid}: skipping solution with unusable boxed answer");
                continue;
            };
            match &first_answer {
                None => first_answer = Some(answer),
                Some(first) if *first != answer => {
                    return Err(HarpError::Inconsistent(format!(
                        "{uid}: solutions disagree on the answer ({first:?} vs {answer:?})"
                    )));
                }
                Some(_) => {}
            }
        } else if body.is_empty() {
            warn!("{uid}: skipping empty solution");
            continue;
        }

        if !solutions.is_empty()
            && (body.contains("as above")
                || body.contains("see above solution")
                || RE_REFERS_TO_OTHER.is_match(body))
        {
            warn!("{uid}: skipping solution that defers to another");
            continue;
        }

        let text = RE_SPACE_RUN.replace_all(body, " ").trim().to_string();
        solutions.push(Solution {
            number: solutions.len() + 1,
            label: section.annotation.clone(),
            text,
        });
    }

    if solutions.is_empty() {
        return Err(HarpError::Structural(format!(
            "{uid}: no usable solutions on page"
        )));
    }
    if has_answer && first_answer.is_none() {
        return Err(HarpError::Structural(format!(
            "{uid}: no solution produced an answer"
        )));
    }

    let (answer_choice, answer) = resolve_answer(first_answer, choices.as_ref());
    let level = difficulty::map_difficulty(&page.year, &page.contest, page.number)?;

    Ok(ProblemRecord {
        year: page.year.clone(),
        contest: page.contest.clone(),
        number: page.number,
        url: page.url.clone(),
        level,
        problem,
        choices,
        answer_choice,
        answer,
        solutions,
        other_appearances: Vec::new(),
    })
}

fn resolve_answer(
    first_answer: Option<Answer>,
    choices: Option<&ChoiceSet>,
) -> (Option<char>, Option<String>) {
    match first_answer {
        Some(Answer::Letter(letter)) => {
            let value = choices.and_then(|c| c.get(letter)).map(str::to_string);
            (Some(letter), value)
        }
        Some(Answer::Value(value)) => (None, Some(value)),
        None => (None, None),
    }
}
