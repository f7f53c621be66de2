//! Static contest tables: answer-format predicates, the hardness ordering
//! used to break duplicate ties, and the full year/contest/problem schedule.
//!
//! All tables here are process-wide, read-only configuration built once at
//! startup. Components receive them explicitly; nothing in this module is
//! mutable after construction.

use crate::error::{HarpError, Result};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Contest families from hardest to easiest. Used only to decide which
/// member of a duplicate pair is canonical; ties broken by earlier year.
pub const CONTEST_ORDER: [&str; 8] = [
    "USAMO", "USAJMO", "AIME", "AMC_12", "AHSME", "AMC_10", "AJHSME", "AMC_8",
];

/// True for contests whose problems carry a five-way answer-choice block.
#[must_use]
pub fn has_choices(contest: &str) -> bool {
    contest.starts_with("AMC") || contest.ends_with("SME")
}

/// True for contests whose problems have a singular final answer.
/// Olympiad (proof-based) contests do not.
#[must_use]
pub fn has_answer(contest: &str) -> bool {
    !contest.ends_with("MO")
}

/// Rank of a contest in [`CONTEST_ORDER`] by family prefix; 0 is hardest.
#[must_use]
pub fn contest_rank(contest: &str) -> Option<usize> {
    CONTEST_ORDER
        .iter()
        .position(|family| contest.starts_with(family))
}

/// Sort key for duplicate resolution: (family rank, year). The smaller key
/// wins the canonical slot, so harder contests beat easier ones and earlier
/// years beat later ones within a family.
///
/// # Errors
///
/// Returns [`HarpError::Config`] for a contest outside every known family;
/// that indicates a broken static table, not a bad record.
pub fn hardness_key(contest: &str, year: &str) -> Result<(usize, String)> {
    let rank = contest_rank(contest).ok_or_else(|| {
        HarpError::Config(format!("contest {contest} is not in the contest order table"))
    })?;
    Ok((rank, year.to_string()))
}

/// Year -> contest -> problem numbers, for every page the corpus covers.
///
/// Some listed pages are missing from the wiki or are duplicates; those are
/// handled downstream. This table is just the exhaustive enumeration.
pub type Schedule = BTreeMap<String, BTreeMap<String, Vec<u32>>>;

/// The full corpus schedule.
pub static SCHEDULE: Lazy<Schedule> = Lazy::new(build_schedule);

fn add(schedule: &mut Schedule, year: &str, contest: &str, numbers: std::ops::RangeInclusive<u32>) {
    schedule
        .entry(year.to_string())
        .or_default()
        .insert(contest.to_string(), numbers.collect());
}

fn build_schedule() -> Schedule {
    let mut schedule = Schedule::new();

    // AMC 8. There was no 2021 exam: in the 2021-2022 school year the
    // AMC 8 moved to after the new year.
    for year in (1999..=2020).chain(2022..=2024) {
        add(&mut schedule, &year.to_string(), "AMC_8", 1..=25);
    }

    // AMC 10/12. A/B versions start in 2002; the 2021-2022 school year had
    // both a spring ("2021") and a fall ("2021_Fall") exam.
    for level in ["10", "12"] {
        for sub in ["A", "B"] {
            for year in 2002..=2023 {
                add(
                    &mut schedule,
                    &year.to_string(),
                    &format!("AMC_{level}{sub}"),
                    1..=25,
                );
            }
            add(&mut schedule, "2021_Fall", &format!("AMC_{level}{sub}"), 1..=25);
        }
        for year in [2000, 2001] {
            add(
                &mut schedule,
                &year.to_string(),
                &format!("AMC_{level}"),
                1..=25,
            );
        }
    }

    // AJHSME
    for year in 1985..=1998 {
        add(&mut schedule, &year.to_string(), "AJHSME", 1..=25);
    }

    // AHSME, whose length shrank over the decades. Some early years are
    // incomplete on the wiki.
    for year in 1950..=1999 {
        let last = match year {
            1950..=1959 => 50,
            1960..=1967 => 40,
            1968..=1973 => 35,
            _ => 30,
        };
        add(&mut schedule, &year.to_string(), "AHSME", 1..=last);
    }

    // AIME, split into I/II from 2000 on.
    for year in 1983..=1999 {
        add(&mut schedule, &year.to_string(), "AIME", 1..=15);
    }
    for version in ["I", "II"] {
        for year in 2000..=2024 {
            add(
                &mut schedule,
                &year.to_string(),
                &format!("AIME_{version}"),
                1..=15,
            );
        }
    }

    // USAMO, 5 problems through 1995, 6 after.
    for year in 1972..=1995 {
        add(&mut schedule, &year.to_string(), "USAMO", 1..=5);
    }
    for year in 1996..=2024 {
        add(&mut schedule, &year.to_string(), "USAMO", 1..=6);
    }

    // USAJMO
    for year in 2010..=2024 {
        add(&mut schedule, &year.to_string(), "USAJMO", 1..=6);
    }

    schedule
}

/// Total number of scheduled pages across all years and contests.
#[must_use]
pub fn total_problems() -> usize {
    SCHEDULE
        .values()
        .flat_map(BTreeMap::values)
        .map(Vec::len)
        .sum()
}
