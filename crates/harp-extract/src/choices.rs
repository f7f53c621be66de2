//! Answer-choice extraction from multiple-choice problem statements.
//!
//! The wiki writes choice rows in three formats, e.g.
//! `$\textbf{(A) } 5 \qquad \textbf{(B) } 6 ...$`, with `\text` and
//! `\mathrm` variants. Extraction locates the `(A)` marker, then walks the
//! letters in order, slicing each value between its marker's closing brace
//! and the next marker.

use harp_core::{ChoiceSet, HarpError, Result, CHOICE_LETTERS};
use log::warn;
use regex::Regex;
use std::sync::LazyLock;

use crate::latex::{clean_choice, find_closing_brace};

/// Marker commands in the order we probe for them.
const CHOICE_FORMATS: [&str; 3] = ["\\textbf{", "\\text{", "\\mathrm{"];

/// Text allowed between a value's early newline cutoff and the next
/// marker: whitespace, an odd `$`, a spacing macro.
static RE_SKIPPABLE_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\s*\$?\s*(?:\\q?quad)?\s*\z").expect("valid gap regex"));

/// Choices plus the byte range of the choice row in the problem text, so
/// the caller can excise it.
#[derive(Debug, Clone)]
pub struct ExtractedChoices {
    pub choices: ChoiceSet,
    pub start: usize,
    pub end: usize,
}

/// Rewrite marker spellings that defeat the scanner, e.g.
/// `(\mathrm{A})` for `\mathrm{(A)}` and `\textbf {(A)` for `\textbf{(A)`.
#[must_use]
pub fn clean_choice_format(text: &str) -> String {
    let mut text = text.to_string();
    for letter in CHOICE_LETTERS {
        for (bad, good) in [
            (format!("(\\mathrm{{{letter}}})"), format!("\\mathrm{{({letter})}}")),
            (format!("(\\mathrm {{{letter}}})"), format!("\\mathrm{{({letter})}}")),
            (format!("\\textbf {{({letter})"), format!("\\textbf{{({letter})")),
            (format!("\\text {{({letter})"), format!("\\text{{({letter})")),
        ] {
            if text.contains(&bad) {
                text = text.replace(&bad, &good);
            }
        }
    }
    text
}

/// Extract the five answer choices from a problem statement.
pub fn extract_choices(text: &str) -> Result<ExtractedChoices> {
    let (format, start) = CHOICE_FORMATS
        .iter()
        .find_map(|fmt| {
            let marker = format!("${fmt}(A)");
            text.find(&marker).map(|i| (*fmt, i))
        })
        .ok_or_else(|| HarpError::Structural("no (A) choice marker found".to_string()))?;

    let last_marker = format!("{format}(E)");
    let end = match text.find(&last_marker) {
        Some(i) => match text[i..].find('\n') {
            Some(nl) => i + nl + 1,
            None => text.len(),
        },
        None => {
            return Err(HarpError::Structural(
                "choice row has no (E) marker".to_string(),
            ));
        }
    };

    let mut choices = ChoiceSet::new();
    for (c, letter) in CHOICE_LETTERS.iter().enumerate() {
        let marker = format!("{format}({letter})");
        let index = text.find(&marker).ok_or_else(|| {
            HarpError::Structural(format!("choice row has no ({letter}) marker"))
        })?;
        let after = &text[index + marker.len()..];
        let brace = find_closing_brace(after).ok_or_else(|| {
            HarpError::Structural(format!("unbalanced braces in ({letter}) marker"))
        })?;

        // Part of the value can sit inside the marker's own braces,
        // e.g. \textbf{(A) 5}
        let mut before = clean_choice(&after[..brace]).trim_start().to_string();
        if !before.is_empty() && format.starts_with("\\text") {
            before = format!("\\text{{{before}}}");
        }

        let value_end = if c < 4 {
            let next_marker = format!("{format}({})", CHOICE_LETTERS[c + 1]);
            let mut value_end = after.find(&next_marker).unwrap_or(after.len());
            // A newline before the next marker usually ends the row early
            // (the rest is a stray continuation); accept it only when the
            // gap up to the marker is blank filler.
            let scan_from = (brace + 3).min(after.len());
            if let Some(nl) = after[scan_from..].find('\n') {
                let alt_end = scan_from + nl;
                if alt_end < value_end {
                    if !RE_SKIPPABLE_GAP.is_match(&after[alt_end..value_end]) {
                        return Err(HarpError::Structural(format!(
                            "unexpected text between newline and ({}) marker",
                            CHOICE_LETTERS[c + 1]
                        )));
                    }
                    value_end = alt_end;
                }
            }
            value_end
        } else {
            let scan_from = (brace + 3).min(after.len());
            match after[scan_from..].find('\n') {
                Some(nl) => scan_from + nl,
                None => after.len(),
            }
        };

        let raw = format!("{} {}", before, after[brace + 1..value_end].trim());
        let choice = clean_choice(&raw);
        let choice = finish_choice(&choice, *letter)?;
        choices.insert(*letter, choice);
    }

    Ok(ExtractedChoices {
        choices,
        start,
        end,
    })
}

/// Balance the `$` delimiters around one cleaned value and reject values
/// that are empty or swallowed a diagram.
fn finish_choice(choice: &str, letter: char) -> Result<String> {
    let choice = choice
        .trim_end_matches(|ch: char| ch.is_whitespace() || ch == '$')
        .trim();
    let choice = if let Some(stripped) = choice.strip_prefix('$') {
        // Value opened its own math mode; rebalance after trimming.
        warn!("rebalancing math delimiters in choice ({letter})");
        let mut choice = stripped.trim_end_matches('$').trim().to_string();
        if choice.matches('$').count() % 2 == 1 {
            choice.push('$');
        }
        if choice.contains("[asy]") {
            return Err(HarpError::Structural(format!(
                "choice ({letter}) swallowed a diagram"
            )));
        }
        if choice.is_empty() {
            return Err(HarpError::Structural(format!("choice ({letter}) is empty")));
        }
        format!("${choice}$")
    } else {
        let mut choice = format!("${choice}$");
        if choice[1..choice.len() - 1].contains('$') {
            warn!("dropping interior math delimiters in choice ({letter})");
            choice = choice[1..choice.len() - 1].replace('$', "");
            choice = format!("${choice}$");
        }
        if choice.contains("[asy]") {
            return Err(HarpError::Structural(format!(
                "choice ({letter}) swallowed a diagram"
            )));
        }
        if choice.len() <= 2 {
            return Err(HarpError::Structural(format!("choice ({letter}) is empty")));
        }
        choice
    };
    Ok(choice)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = "What is $1+4$?\n$\\textbf{(A) } 5 \\qquad \\textbf{(B) } 6 \\qquad \\textbf{(C) } 7 \\qquad \\textbf{(D) } 8 \\qquad \\textbf{(E) } 9$\n";

    #[test]
    fn test_extracts_all_five_choices() {
        let extracted = extract_choices(ROW).unwrap();
        assert_eq!(extracted.choices.get('A'), Some("$5$"));
        assert_eq!(extracted.choices.get('C'), Some("$7$"));
        assert_eq!(extracted.choices.get('E'), Some("$9$"));
        assert!(extracted.choices.is_complete());
    }

    #[test]
    fn test_reported_range_covers_the_row() {
        let extracted = extract_choices(ROW).unwrap();
        assert_eq!(extracted.start, ROW.find("$\\textbf{(A)").unwrap());
        assert_eq!(extracted.end, ROW.len());
        let remainder = format!("{}{}", &ROW[..extracted.start], &ROW[extracted.end..]);
        assert!(!remainder.contains("(A)"));
    }

    #[test]
    fn test_value_inside_marker_braces() {
        let row = "$\\textbf{(A) 5}\\qquad\\textbf{(B) 6}\\qquad\\textbf{(C) 7}\\qquad\\textbf{(D) 8}\\qquad\\textbf{(E) 9}$";
        let extracted = extract_choices(row).unwrap();
        assert_eq!(extracted.choices.get('A'), Some("$\\text{5}$"));
    }

    #[test]
    fn test_mathrm_format() {
        let row = "$\\mathrm{(A)} 1 \\quad \\mathrm{(B)} 2 \\quad \\mathrm{(C)} 3 \\quad \\mathrm{(D)} 4 \\quad \\mathrm{(E)} 5$";
        let extracted = extract_choices(row).unwrap();
        assert_eq!(extracted.choices.get('B'), Some("$2$"));
    }

    #[test]
    fn test_clean_choice_format_repairs_spellings() {
        assert_eq!(clean_choice_format("(\\mathrm{A}) 1"), "\\mathrm{(A)} 1");
        assert_eq!(clean_choice_format("\\textbf {(C) 3"), "\\textbf{(C) 3");
        assert_eq!(clean_choice_format("\\textbf{(A)} 1"), "\\textbf{(A)} 1");
    }

    #[test]
    fn test_missing_marker_is_structural() {
        assert!(matches!(
            extract_choices("No choices at all"),
            Err(HarpError::Structural(_))
        ));
        let no_e = "$\\textbf{(A) } 1 \\qquad \\textbf{(B) } 2 \\qquad \\textbf{(C) } 3 \\qquad \\textbf{(D) } 4$";
        assert!(matches!(
            extract_choices(no_e),
            Err(HarpError::Structural(_))
        ));
    }

    #[test]
    fn test_newline_split_row_with_blank_gap() {
        let row = "$\\textbf{(A) } 1 \\qquad \\textbf{(B) } 2$\n$\\textbf{(C) } 3 \\qquad \\textbf{(D) } 4 \\qquad \\textbf{(E) } 5$";
        let extracted = extract_choices(row).unwrap();
        assert_eq!(extracted.choices.get('B'), Some("$2$"));
        assert_eq!(extracted.choices.get('C'), Some("$3$"));
    }

    #[test]
    fn test_diagram_in_choice_rejected() {
        let row = "$\\textbf{(A) } [asy]draw();[/asy] \\qquad \\textbf{(B) } 2 \\qquad \\textbf{(C) } 3 \\qquad \\textbf{(D) } 4 \\qquad \\textbf{(E) } 5$";
        assert!(matches!(
            extract_choices(row),
            Err(HarpError::Structural(_))
        ));
    }
}
