//! Splits a normalized page into its problem statement and solution
//! sections.

use harp_core::{HarpError, Result};
use log::warn;
use regex::Regex;
use std::sync::LazyLock;

static RE_SOLUTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Solution ?\d? ?").expect("valid solution prefix regex"));
static RE_NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("valid non-alpha regex"));

/// What a section contributes to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Problem,
    Solution,
}

/// One `# `-headed section of a normalized page.
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    /// Heading text as it appeared on the page, e.g. "Solution 2 (Casework)".
    pub heading: String,
    /// Heading with the "Solution N" prefix and punctuation stripped,
    /// e.g. "Casework". Empty for bare headings.
    pub annotation: String,
    pub body: String,
}

/// Split a normalized page at its `# ` headings. The first section must be
/// the problem statement; later sections are solutions. An extra problem
/// section is skipped with a warning and processing continues.
pub fn segment(blob: &str) -> Result<Vec<Section>> {
    fn flush(heading: Option<String>, body: &mut Vec<&str>, out: &mut Vec<Section>) {
        if let Some(heading) = heading {
            let text = body.join("\n").trim().to_string();
            body.clear();
            out.push(make_section(heading, text));
        }
    }

    let mut sections = Vec::new();
    let mut heading: Option<String> = None;
    let mut body: Vec<&str> = Vec::new();
    for line in blob.split('\n') {
        if let Some(rest) = line.strip_prefix("# ") {
            flush(heading.take(), &mut body, &mut sections);
            heading = Some(rest.trim().to_string());
        } else if heading.is_some() {
            body.push(line);
        }
    }
    flush(heading, &mut body, &mut sections);

    let mut out: Vec<Section> = Vec::new();
    for section in sections {
        match section.kind {
            SectionKind::Problem if out.is_empty() => out.push(section),
            SectionKind::Problem => {
                warn!("skipping extra problem section: {}", section.heading);
            }
            SectionKind::Solution if out.is_empty() => {
                return Err(HarpError::Structural(format!(
                    "page does not open with a problem heading: {}",
                    section.heading
                )));
            }
            SectionKind::Solution => out.push(section),
        }
    }
    if out.is_empty() {
        return Err(HarpError::Structural(
            "no recognized sections on page".to_string(),
        ));
    }
    Ok(out)
}

fn make_section(heading: String, body: String) -> Section {
    if heading.starts_with("Problem") {
        return Section {
            kind: SectionKind::Problem,
            heading,
            annotation: String::new(),
            body,
        };
    }
    let annotation = RE_SOLUTION_PREFIX.replace(&heading, "");
    let annotation = RE_NON_ALPHA.replace_all(&annotation, "").trim().to_string();
    Section {
        kind: SectionKind::Solution,
        heading,
        annotation,
        body,
    }
}
