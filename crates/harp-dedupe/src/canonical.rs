//! Resolves duplicate groups to canonical records.
//!
//! Of each pair the problem stays under the harder contest (ties broken by
//! the older year), the other appearance is removed, and the removed uid is
//! recorded on the canonical record. A handful of pairs the trie cannot see
//! (restated rather than copied verbatim) are maintained by hand, as is one
//! solution remap where the removed page had the better write-ups.

use harp_core::{contest, Appearance, HarpError, ProblemRecord, Result};
use log::info;
use std::collections::{BTreeMap, HashMap};

use crate::trie::DuplicateGroups;

/// Duplicate pairs the scan cannot find, plus solution remaps. Keyed by
/// uid on both sides.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    /// Known duplicate pairs, each entered as (uid, uid).
    pub extra_pairs: Vec<(String, String)>,
    /// canonical uid -> removed uid whose solutions replace the
    /// canonical record's own.
    pub solution_remaps: HashMap<String, String>,
}

impl OverrideTable {
    /// The pairs found by eye while auditing the corpus: problems restated
    /// with small wording changes between the two contests.
    #[must_use]
    pub fn curated() -> Self {
        let extra_pairs = [
            ("1965/AHSME/24", "1971/AHSME/29"),
            ("2004/AMC_12B/1", "2004/AMC_10B/3"),
            ("2013/AMC_12A/18", "2013/AMC_10A/22"),
            ("2017/AMC_12A/3", "2017/AMC_10A/6"),
            ("2017/AMC_12B/10", "2017/AMC_10B/11"),
            ("2018/AMC_12B/5", "2018/AMC_10B/5"),
            ("2022/USAMO/4", "2022/USAJMO/5"),
            ("2022/USAMO/1", "2022/USAJMO/2"),
            ("2020/USAMO/4", "2020/USAJMO/5"),
            ("2020/USAMO/2", "2020/USAJMO/3"),
            ("2019/USAMO/2", "2019/USAJMO/3"),
            ("2015/USAMO/4", "2015/USAJMO/6"),
        ]
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
        let solution_remaps = HashMap::from([(
            "2022/USAMO/1".to_string(),
            "2022/USAJMO/2".to_string(),
        )]);
        Self {
            extra_pairs,
            solution_remaps,
        }
    }
}

/// The resolved plan: which records disappear and where they reattach.
#[derive(Debug, Default)]
pub struct CanonicalPlan {
    /// removed uid -> canonical uid.
    pub removed_to_canonical: BTreeMap<String, String>,
    /// canonical uid -> removed uids, for `other_appearances`.
    pub canonical_to_removed: BTreeMap<String, Vec<String>>,
}

/// Decide, for every duplicate pair, which side is canonical.
///
/// # Errors
///
/// [`HarpError::Config`] when a group holds more than one copy, when the
/// two sides compare equal in hardness, or when a uid appears on both the
/// removed and canonical side of the plan. All three mean the override
/// table or the corpus changed in a way that needs a human look.
pub fn resolve(groups: &DuplicateGroups, overrides: &OverrideTable) -> Result<CanonicalPlan> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (uid, copies) in groups {
        let [copy] = copies.as_slice() else {
            return Err(HarpError::Config(format!(
                "{uid} appears in more than two contests: {copies:?}"
            )));
        };
        pairs.push((uid.clone(), copy.clone()));
    }
    pairs.extend(overrides.extra_pairs.iter().cloned());

    let mut plan = CanonicalPlan::default();
    for (a, b) in &pairs {
        let key_a = hardness_of(a)?;
        let key_b = hardness_of(b)?;
        let (canonical, removed) = match key_a.cmp(&key_b) {
            std::cmp::Ordering::Less => (a, b),
            std::cmp::Ordering::Greater => (b, a),
            std::cmp::Ordering::Equal => {
                return Err(HarpError::Config(format!(
                    "cannot order duplicate pair {a} / {b}"
                )));
            }
        };
        info!("{removed} folds into {canonical}");
        plan.removed_to_canonical
            .insert(removed.clone(), canonical.clone());
        plan.canonical_to_removed
            .entry(canonical.clone())
            .or_default()
            .push(removed.clone());
    }

    for canonical in plan.canonical_to_removed.keys() {
        if plan.removed_to_canonical.contains_key(canonical) {
            return Err(HarpError::Config(format!(
                "{canonical} is both canonical and removed"
            )));
        }
    }
    Ok(plan)
}

fn hardness_of(uid: &str) -> Result<(usize, String)> {
    let app = Appearance::from_uid(uid)
        .ok_or_else(|| HarpError::Config(format!("malformed uid {uid:?}")))?;
    contest::hardness_key(&app.contest, &app.year)
}

/// Apply a resolved plan: drop removed records, attach `other_appearances`,
/// and perform solution remaps.
pub fn apply(
    records: Vec<ProblemRecord>,
    plan: &CanonicalPlan,
    overrides: &OverrideTable,
) -> Result<Vec<ProblemRecord>> {
    let mut removed_solutions: HashMap<&str, &ProblemRecord> = HashMap::new();
    for (canonical, source) in &overrides.solution_remaps {
        if plan.removed_to_canonical.get(source.as_str()) != Some(canonical) {
            return Err(HarpError::Config(format!(
                "solution remap source {source} is not removed into {canonical}"
            )));
        }
        let record = records
            .iter()
            .find(|r| r.uid() == *source)
            .ok_or_else(|| {
                HarpError::Config(format!("solution remap source {source} not in corpus"))
            })?;
        removed_solutions.insert(canonical.as_str(), record);
    }

    let mut out = Vec::with_capacity(records.len());
    for record in &records {
        let uid = record.uid();
        if plan.removed_to_canonical.contains_key(&uid) {
            continue;
        }
        let mut record = record.clone();
        if let Some(source) = removed_solutions.get(uid.as_str()) {
            info!("{uid}: replacing solutions with those of {}", source.uid());
            record.solutions = source.solutions.clone();
        }
        if let Some(removed) = plan.canonical_to_removed.get(&uid) {
            record.other_appearances = removed
                .iter()
                .filter_map(|r| Appearance::from_uid(r))
                .collect();
        }
        out.push(record);
    }
    Ok(out)
}
