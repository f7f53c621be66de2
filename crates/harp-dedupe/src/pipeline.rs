//! The corpus-wide pipeline: parallel per-page extraction, then the
//! serial dedup, canonicalization, and finalization passes.

use anyhow::Context;
use harp_core::{HarpError, ProblemRecord, RawPage};
use harp_extract::{build_record, LineFilterSet};
use log::{info, warn};
use rayon::prelude::*;

use crate::canonical::{self, OverrideTable};
use crate::finalize::finalize;
use crate::trie::{find_duplicates, PrefixTrie};

/// A page the pipeline dropped, and why.
#[derive(Debug, Clone)]
pub struct DroppedPage {
    pub uid: String,
    pub reason: String,
}

/// Counters and drop list for one full run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Pages fed in.
    pub pages: usize,
    /// Records surviving extraction.
    pub extracted: usize,
    /// Pages dropped during extraction, with reasons.
    pub dropped: Vec<DroppedPage>,
    /// Records folded away as duplicates.
    pub duplicates_removed: usize,
}

/// Run the whole pipeline over a corpus of raw pages.
///
/// Extraction runs in parallel and keeps input order; a page that fails
/// structurally or inconsistently is dropped and reported, never fatal.
/// Configuration errors (broken static tables, unorderable duplicate
/// pairs) abort the run.
pub fn process_corpus(
    pages: &[RawPage],
    filters: &LineFilterSet,
    overrides: &OverrideTable,
) -> anyhow::Result<(Vec<ProblemRecord>, PrefixTrie, RunReport)> {
    let mut report = RunReport {
        pages: pages.len(),
        ..RunReport::default()
    };

    let results: Vec<(String, Result<ProblemRecord, HarpError>)> = pages
        .par_iter()
        .map(|page| (page.uid(), build_record(page, filters)))
        .collect();

    let mut records = Vec::with_capacity(results.len());
    for (uid, result) in results {
        match result {
            Ok(record) => records.push(record),
            Err(e @ HarpError::Config(_)) => {
                return Err(e).with_context(|| format!("extracting {uid}"));
            }
            Err(e) => {
                warn!("dropping {uid}: {e}");
                report.dropped.push(DroppedPage {
                    uid,
                    reason: e.to_string(),
                });
            }
        }
    }
    report.extracted = records.len();
    info!(
        "extracted {} records from {} pages ({} dropped)",
        report.extracted,
        report.pages,
        report.dropped.len()
    );

    let (_, groups) = find_duplicates(&records);
    let overrides = restrict_to_corpus(overrides, &records);
    let plan = canonical::resolve(&groups, &overrides).context("resolving duplicate groups")?;
    report.duplicates_removed = plan.removed_to_canonical.len();
    let mut records =
        canonical::apply(records, &plan, &overrides).context("applying canonical plan")?;

    finalize(&mut records);

    // Rebuild the trie over the canonical records so overlap queries see
    // final statements only.
    let (trie, _) = find_duplicates(&records);
    Ok((records, trie, report))
}

/// Keep only the override entries whose uids are all present, so a partial
/// corpus (or a test fixture) does not trip the plan validation.
fn restrict_to_corpus(overrides: &OverrideTable, records: &[ProblemRecord]) -> OverrideTable {
    let present: std::collections::HashSet<String> =
        records.iter().map(ProblemRecord::uid).collect();
    let extra_pairs = overrides
        .extra_pairs
        .iter()
        .filter(|(a, b)| present.contains(a) && present.contains(b))
        .cloned()
        .collect();
    let solution_remaps = overrides
        .solution_remaps
        .iter()
        .filter(|(c, s)| present.contains(c.as_str()) && present.contains(s.as_str()))
        .map(|(c, s)| (c.clone(), s.clone()))
        .collect();
    OverrideTable {
        extra_pairs,
        solution_remaps,
    }
}
