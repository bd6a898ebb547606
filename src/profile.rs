//! Player profiles and candidate selection.

use crate::error::{Result, StatsError};
use crate::fields::{RenameMap, StatField};
use crate::html::Candidate;
use crate::normalize::{normalize, SeasonRecord, StatValue};
use crate::table::RawTable;

/// Identity plus the ordered season records of one selected player.
///
/// Records keep source order. A profile is immutable once built; every
/// accessor is a pure read.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProfile {
    name: String,
    source: String,
    records: Vec<SeasonRecord>,
    skipped_rows: usize,
}

impl PlayerProfile {
    /// Build a profile from already-normalized records.
    pub fn new(name: impl Into<String>, source: impl Into<String>, records: Vec<SeasonRecord>) -> Self {
        PlayerProfile {
            name: name.into(),
            source: source.into(),
            records,
            skipped_rows: 0,
        }
    }

    /// Normalize a raw table into a profile.
    pub fn from_table(
        name: impl Into<String>,
        source: impl Into<String>,
        table: &RawTable,
        renames: &RenameMap,
    ) -> Result<Self> {
        let name = name.into();
        let normalized = normalize(table, renames, &name)?;
        if normalized.skipped > 0 {
            log::warn!(
                "{}: {} rows with unparseable seasons were dropped",
                name,
                normalized.skipped
            );
        }
        Ok(PlayerProfile {
            name,
            source: source.into(),
            records: normalized.records,
            skipped_rows: normalized.skipped,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL or file path the records came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn records(&self) -> &[SeasonRecord] {
        &self.records
    }

    /// Rows dropped during normalization because the season did not parse.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// `(season, value)` pairs for one field in stored order.
    pub fn column(&self, field: StatField) -> Vec<(i32, StatValue)> {
        self.records
            .iter()
            .map(|r| (r.season, r.get(field)))
            .collect()
    }

    /// Same as [`PlayerProfile::column`], resolving a user-typed stat name.
    pub fn column_by_name(&self, name: &str) -> Result<Vec<(i32, StatValue)>> {
        Ok(self.column(StatField::resolve(name)?))
    }

    /// Records sorted by season. Ties keep their stored order.
    pub fn chronological(&self) -> Vec<&SeasonRecord> {
        let mut sorted: Vec<&SeasonRecord> = self.records.iter().collect();
        sorted.sort_by_key(|r| r.season);
        sorted
    }

    /// Distinct seasons in ascending order.
    pub fn seasons(&self) -> Vec<i32> {
        let mut seasons: Vec<i32> = self.records.iter().map(|r| r.season).collect();
        seasons.sort_unstable();
        seasons.dedup();
        seasons
    }
}

/// How a selection prompt numbers its candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    Zero,
    #[default]
    One,
}

/// Validate a prompt-supplied index against the candidate list.
pub fn select<T>(candidates: &[T], index: usize, base: IndexBase) -> Result<&T> {
    let out_of_range = || StatsError::SelectionOutOfRange {
        index,
        count: candidates.len(),
    };
    let position = match base {
        IndexBase::Zero => index,
        IndexBase::One => index.checked_sub(1).ok_or_else(out_of_range)?,
    };
    candidates.get(position).ok_or_else(out_of_range)
}

/// Pick one search candidate.
pub fn select_candidate(candidates: &[Candidate], index: usize, base: IndexBase) -> Result<&Candidate> {
    select(candidates, index, base)
}

/// Parse a comma-separated list of indices such as "1, 3,4".
///
/// Entries that are not numbers or fall outside `0..count` (after applying
/// `base`) are skipped with a warning. Duplicates are dropped; first
/// occurrence wins. Returns zero-based positions.
pub fn parse_selection_list(input: &str, count: usize, base: IndexBase) -> Vec<usize> {
    let all: Vec<usize> = (0..count).collect();
    let mut positions = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let parsed = match part.parse::<usize>() {
            Ok(n) => n,
            Err(_) => {
                log::warn!("Invalid selection '{}', skipping", part);
                continue;
            }
        };
        match select(&all, parsed, base) {
            Ok(&pos) => {
                if !positions.contains(&pos) {
                    positions.push(pos);
                }
            }
            Err(e) => log::warn!("{}, skipping", e),
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate> {
        ["Anthony Davis", "Anthony Edwards", "Anthony Black"]
            .iter()
            .map(|n| Candidate {
                name: n.to_string(),
                url: format!("https://example.test/{}", n.replace(' ', "")),
            })
            .collect()
    }

    #[test]
    fn test_select_one_based() {
        let list = candidates();
        assert_eq!(select_candidate(&list, 1, IndexBase::One).unwrap().name, "Anthony Davis");
        assert_eq!(select_candidate(&list, 3, IndexBase::One).unwrap().name, "Anthony Black");
        assert!(matches!(
            select_candidate(&list, 0, IndexBase::One),
            Err(StatsError::SelectionOutOfRange { index: 0, count: 3 })
        ));
        assert!(matches!(
            select_candidate(&list, 4, IndexBase::One),
            Err(StatsError::SelectionOutOfRange { index: 4, count: 3 })
        ));
    }

    #[test]
    fn test_select_zero_based() {
        let list = candidates();
        assert_eq!(select_candidate(&list, 0, IndexBase::Zero).unwrap().name, "Anthony Davis");
        assert!(select_candidate(&list, 3, IndexBase::Zero).is_err());
        assert!(select_candidate(&[], 0, IndexBase::Zero).is_err());
    }

    #[test]
    fn test_parse_selection_list() {
        assert_eq!(parse_selection_list("1,3", 3, IndexBase::One), vec![0, 2]);
        assert_eq!(parse_selection_list(" 2 , x, 9, 2,1", 3, IndexBase::One), vec![1, 0]);
        assert_eq!(parse_selection_list("0", 3, IndexBase::One), Vec::<usize>::new());
        assert_eq!(parse_selection_list("0,2", 3, IndexBase::Zero), vec![0, 2]);
        assert!(parse_selection_list("", 3, IndexBase::One).is_empty());
    }

    #[test]
    fn test_profile_accessors() {
        let profile = PlayerProfile::new(
            "Test",
            "memory",
            vec![
                SeasonRecord::new(2020, "2020-21").with(StatField::Points, 10.0),
                SeasonRecord::new(2018, "2018-19"),
                SeasonRecord::new(2020, "2020-21").with(StatField::Points, 12.0),
            ],
        );
        assert_eq!(profile.seasons(), vec![2018, 2020]);
        assert_eq!(
            profile.column(StatField::Points),
            vec![(2020, Some(10.0)), (2018, None), (2020, Some(12.0))]
        );
        let chrono: Vec<i32> = profile.chronological().iter().map(|r| r.season).collect();
        assert_eq!(chrono, vec![2018, 2020, 2020]);
        assert_eq!(profile.chronological()[2].get(StatField::Points), Some(12.0));
        assert!(profile.column_by_name("WS/48").is_err());
        assert_eq!(profile.column(StatField::Points), profile.column(StatField::Points));
    }
}
