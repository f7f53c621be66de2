//! Difficulty tiers, following the AoPS competition ratings.
//!
//! Pure lookup from (year, contest, number) to an integer tier. Problems
//! that appear in multiple contests get the tier of the harder (and older)
//! contest during canonicalization.

use crate::error::{HarpError, Result};

/// Map a problem to its difficulty tier (1-9).
///
/// AHSME is scaled proportionally to AMC 12 by era, since the contest
/// shrank from 50 to 30 problems over its lifetime.
///
/// # Errors
///
/// Returns [`HarpError::Config`] for a contest with no defined mapping or
/// an unparseable year; both indicate a broken static table and are fatal
/// to the run.
pub fn map_difficulty(year: &str, contest: &str, number: u32) -> Result<u8> {
    let year_num: i32 = year
        .split('_')
        .next()
        .unwrap_or(year)
        .parse()
        .map_err(|_| HarpError::Config(format!("unparseable year {year:?}")))?;

    let tier = if contest.starts_with("AMC_8") || contest.starts_with("AJHSME") {
        if number <= 20 {
            1
        } else {
            2
        }
    } else if contest.starts_with("AMC_10") {
        match number {
            0..=5 => 1,
            6..=20 => 2,
            _ => 3,
        }
    } else if contest.starts_with("AMC_12") {
        match number {
            0..=10 => 2,
            11..=20 => 3,
            _ => 4,
        }
    } else if contest.starts_with("AIME") {
        match number {
            0..=5 => 3,
            6..=9 => 4,
            10..=12 => 5,
            _ => 6,
        }
    } else if contest.starts_with("AHSME") {
        // Thresholds at 40% and 80% of the era's contest length.
        let (mid, high) = if year_num < 1960 {
            (20, 40)
        } else if year_num < 1967 {
            (16, 32)
        } else if year_num < 1973 {
            (14, 28)
        } else {
            (12, 24)
        };
        if number <= mid {
            2
        } else if number <= high {
            3
        } else {
            4
        }
    } else if contest.starts_with("USAJMO") {
        if number == 1 || number == 4 {
            6
        } else {
            7
        }
    } else if contest.starts_with("USAMO") {
        match number {
            1 | 4 => 7,
            2 | 5 => 8,
            _ => 9,
        }
    } else {
        return Err(HarpError::Config(format!(
            "no difficulty mapping for contest {contest}"
        )));
    };
    Ok(tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amc_tiers() {
        assert_eq!(map_difficulty("2019", "AMC_8", 5).unwrap(), 1);
        assert_eq!(map_difficulty("2019", "AMC_8", 23).unwrap(), 2);
        assert_eq!(map_difficulty("2019", "AMC_10A", 3).unwrap(), 1);
        assert_eq!(map_difficulty("2019", "AMC_10A", 15).unwrap(), 2);
        assert_eq!(map_difficulty("2019", "AMC_12B", 9).unwrap(), 2);
        assert_eq!(map_difficulty("2019", "AMC_12B", 25).unwrap(), 4);
    }

    #[test]
    fn test_aime_and_olympiad_tiers() {
        assert_eq!(map_difficulty("1995", "AIME", 1).unwrap(), 3);
        assert_eq!(map_difficulty("2010", "AIME_II", 11).unwrap(), 5);
        assert_eq!(map_difficulty("2010", "AIME_II", 15).unwrap(), 6);
        assert_eq!(map_difficulty("2015", "USAJMO", 4).unwrap(), 6);
        assert_eq!(map_difficulty("2015", "USAMO", 3).unwrap(), 9);
        assert_eq!(map_difficulty("2015", "USAMO", 5).unwrap(), 8);
    }

    #[test]
    fn test_ahsme_scales_by_era() {
        assert_eq!(map_difficulty("1955", "AHSME", 45).unwrap(), 4);
        assert_eq!(map_difficulty("1965", "AHSME", 20).unwrap(), 3);
        assert_eq!(map_difficulty("1980", "AHSME", 12).unwrap(), 2);
        assert_eq!(map_difficulty("1980", "AHSME", 30).unwrap(), 4);
    }

    #[test]
    fn test_fall_year_parses() {
        assert_eq!(map_difficulty("2021_Fall", "AMC_12A", 25).unwrap(), 4);
    }

    #[test]
    fn test_unknown_contest_is_config_error() {
        match map_difficulty("2020", "IMO", 1) {
            Err(HarpError::Config(msg)) => assert!(msg.contains("IMO")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }
}
