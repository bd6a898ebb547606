//! Season-aligned multi-player comparison.
//!
//! Players have different career spans, so pairing rows by position would
//! line up unrelated seasons. The aligner instead builds the union of all
//! seasons and gives every player exactly one entry per season on that axis,
//! synthesizing an [`AlignedValue::Absent`] entry where the player has no
//! record at all.
//!
//! Synthesized entries carry only the season and the compared stat; no
//! other column is invented for them.

use crate::error::{Result, StatsError};
use crate::fields::StatField;
use crate::profile::PlayerProfile;
use std::collections::{BTreeSet, HashMap};

/// One cell of a comparison frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignedValue {
    /// The player's record for the season has a value
    Value(f64),
    /// The player has a record for the season but the stat is missing in it
    Missing,
    /// The player has no record for the season
    Absent,
}

impl AlignedValue {
    pub fn value(self) -> Option<f64> {
        match self {
            AlignedValue::Value(v) => Some(v),
            AlignedValue::Missing | AlignedValue::Absent => None,
        }
    }

    pub fn is_synthesized(self) -> bool {
        self == AlignedValue::Absent
    }
}

/// One player's series on the shared axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    pub player: String,
    pub source: String,
    /// `(season, value)`, ascending by season, one entry per axis season
    pub points: Vec<(i32, AlignedValue)>,
}

impl AlignedSeries {
    pub fn get(&self, season: i32) -> Option<AlignedValue> {
        self.points
            .binary_search_by_key(&season, |(s, _)| *s)
            .ok()
            .map(|i| self.points[i].1)
    }
}

/// Season × player view of one stat. Built per comparison and not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonFrame {
    pub field: StatField,
    /// Strictly increasing, no duplicates
    pub seasons: Vec<i32>,
    pub series: Vec<AlignedSeries>,
}

impl ComparisonFrame {
    pub fn series_for(&self, player: &str) -> Option<&AlignedSeries> {
        self.series.iter().find(|s| s.player == player)
    }

    /// Values of every player for one season, in series order.
    pub fn row(&self, season: i32) -> Option<Vec<AlignedValue>> {
        let idx = self.seasons.binary_search(&season).ok()?;
        Some(self.series.iter().map(|s| s.points[idx].1).collect())
    }
}

/// Align `profiles` on the union of their seasons for `field`.
///
/// Fails with [`StatsError::InsufficientPlayers`] before doing any work when
/// fewer than two profiles are given.
///
/// When a player has several records for one season (split seasons list a
/// combined row first, then one row per team) the first record is used.
pub fn align(profiles: &[&PlayerProfile], field: StatField) -> Result<ComparisonFrame> {
    if profiles.len() < 2 {
        return Err(StatsError::InsufficientPlayers(profiles.len()));
    }

    let seasons: Vec<i32> = profiles
        .iter()
        .flat_map(|p| p.records().iter().map(|r| r.season))
        .collect::<BTreeSet<i32>>()
        .into_iter()
        .collect();

    let series = profiles
        .iter()
        .map(|profile| {
            let mut by_season: HashMap<i32, AlignedValue> = HashMap::new();
            for record in profile.records() {
                by_season.entry(record.season).or_insert(match record.get(field) {
                    Some(v) => AlignedValue::Value(v),
                    None => AlignedValue::Missing,
                });
            }

            let points: Vec<(i32, AlignedValue)> = seasons
                .iter()
                .map(|season| {
                    let value = by_season.get(season).copied().unwrap_or(AlignedValue::Absent);
                    (*season, value)
                })
                .collect();

            AlignedSeries {
                player: profile.name().to_string(),
                source: profile.source().to_string(),
                points,
            }
        })
        .collect();

    log::debug!(
        "Aligned {} players on {} seasons for {}",
        profiles.len(),
        seasons.len(),
        field
    );

    Ok(ComparisonFrame {
        field,
        seasons,
        series,
    })
}

/// [`align`] for a user-typed stat name.
pub fn align_by_name(profiles: &[&PlayerProfile], stat: &str) -> Result<ComparisonFrame> {
    if profiles.len() < 2 {
        return Err(StatsError::InsufficientPlayers(profiles.len()));
    }
    align(profiles, StatField::resolve(stat)?)
}

/// Pick the profiles named by a comma-separated one-based index list and
/// align them. Invalid entries are skipped with a warning.
pub fn compare_selection<'a>(
    profiles: &'a [PlayerProfile],
    selection: &str,
    field: StatField,
) -> Result<ComparisonFrame> {
    let chosen: Vec<&'a PlayerProfile> = crate::profile::parse_selection_list(
        selection,
        profiles.len(),
        crate::profile::IndexBase::One,
    )
    .into_iter()
    .map(|i| &profiles[i])
    .collect();
    align(&chosen, field)
}
