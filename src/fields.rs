//! Canonical stat fields.
//!
//! The per-game table carries a fixed box-score schema. Every numeric column
//! the toolkit understands is a [`StatField`]; user-typed stat names are
//! resolved here once and rejected with [`StatsError::UnknownField`] before
//! they reach any aggregation.

use crate::error::{Result, StatsError};
use std::fmt;
use std::str::FromStr;

/// Source label of the season column.
pub const SEASON_COLUMN: &str = "Season";
/// Source label of the team column.
pub const TEAM_COLUMN: &str = "Team";
/// Older pages label the team column "Tm".
pub const TEAM_COLUMN_LEGACY: &str = "Tm";
/// Source label of the position column.
pub const POSITION_COLUMN: &str = "Pos";

/// One of the 23 numeric per-game box-score fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatField {
    Age,
    GamesPlayed,
    GamesStarted,
    Minutes,
    FieldGoals,
    FieldGoalAttempts,
    FieldGoalPct,
    ThreePointers,
    ThreePointAttempts,
    ThreePointPct,
    EffectiveFieldGoalPct,
    FreeThrows,
    FreeThrowAttempts,
    FreeThrowPct,
    OffensiveRebounds,
    DefensiveRebounds,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    PersonalFouls,
    Points,
}

impl StatField {
    pub const COUNT: usize = 23;

    /// All fields in per-game table column order.
    pub const ALL: [StatField; StatField::COUNT] = [
        StatField::Age,
        StatField::GamesPlayed,
        StatField::GamesStarted,
        StatField::Minutes,
        StatField::FieldGoals,
        StatField::FieldGoalAttempts,
        StatField::FieldGoalPct,
        StatField::ThreePointers,
        StatField::ThreePointAttempts,
        StatField::ThreePointPct,
        StatField::EffectiveFieldGoalPct,
        StatField::FreeThrows,
        StatField::FreeThrowAttempts,
        StatField::FreeThrowPct,
        StatField::OffensiveRebounds,
        StatField::DefensiveRebounds,
        StatField::Rebounds,
        StatField::Assists,
        StatField::Steals,
        StatField::Blocks,
        StatField::Turnovers,
        StatField::PersonalFouls,
        StatField::Points,
    ];

    /// Position of this field in [`StatField::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column label as emitted by the source table.
    pub fn source_label(self) -> &'static str {
        match self {
            StatField::Age => "Age",
            StatField::GamesPlayed => "G",
            StatField::GamesStarted => "GS",
            StatField::Minutes => "MP",
            StatField::FieldGoals => "FG",
            StatField::FieldGoalAttempts => "FGA",
            StatField::FieldGoalPct => "FG%",
            StatField::ThreePointers => "3P",
            StatField::ThreePointAttempts => "3PA",
            StatField::ThreePointPct => "3P%",
            StatField::EffectiveFieldGoalPct => "eFG%",
            StatField::FreeThrows => "FT",
            StatField::FreeThrowAttempts => "FTA",
            StatField::FreeThrowPct => "FT%",
            StatField::OffensiveRebounds => "ORB",
            StatField::DefensiveRebounds => "DRB",
            StatField::Rebounds => "TRB",
            StatField::Assists => "AST",
            StatField::Steals => "STL",
            StatField::Blocks => "BLK",
            StatField::Turnovers => "TOV",
            StatField::PersonalFouls => "PF",
            StatField::Points => "PTS",
        }
    }

    /// Column label after renaming. Only the four headline stats are renamed;
    /// everything else keeps its source label.
    pub fn canonical_name(self) -> &'static str {
        match self {
            StatField::Points => "Points",
            StatField::Rebounds => "Rebounds",
            StatField::Assists => "Assists",
            StatField::FieldGoalPct => "Field Goal %",
            other => other.source_label(),
        }
    }

    /// Resolve a user-supplied stat name. Accepts canonical names and source
    /// labels, case-insensitively.
    pub fn resolve(name: &str) -> Result<StatField> {
        let wanted = name.trim();
        StatField::ALL
            .iter()
            .copied()
            .find(|f| {
                f.canonical_name().eq_ignore_ascii_case(wanted)
                    || f.source_label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| StatField::unknown(wanted))
    }

    /// Match a table column label, renamed or not. Unlike
    /// [`StatField::resolve`] this is exact-match.
    pub fn from_column_label(label: &str) -> Option<StatField> {
        StatField::ALL
            .iter()
            .copied()
            .find(|f| f.canonical_name() == label || f.source_label() == label)
    }

    fn unknown(name: &str) -> StatsError {
        StatsError::UnknownField(name.to_string())
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl FromStr for StatField {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        StatField::resolve(s)
    }
}

/// Source label → canonical label mapping applied to table headers.
#[derive(Debug, Clone)]
pub struct RenameMap {
    pairs: Vec<(String, String)>,
}

impl Default for RenameMap {
    fn default() -> Self {
        Self::new(
            [
                StatField::Points,
                StatField::Rebounds,
                StatField::Assists,
                StatField::FieldGoalPct,
            ]
            .iter()
            .map(|f| (f.source_label(), f.canonical_name())),
        )
    }
}

impl RenameMap {
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    /// Renamed label, or the label itself when no rule applies.
    pub fn apply<'a>(&'a self, label: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(from, _)| from == label)
            .map(|(_, to)| to.as_str())
            .unwrap_or(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, field) in StatField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn test_resolve_accepts_both_labels() {
        assert_eq!(StatField::resolve("PTS").unwrap(), StatField::Points);
        assert_eq!(StatField::resolve("points").unwrap(), StatField::Points);
        assert_eq!(
            StatField::resolve("field goal %").unwrap(),
            StatField::FieldGoalPct
        );
        assert_eq!(StatField::resolve(" 3P% ").unwrap(), StatField::ThreePointPct);
        assert_eq!("efg%".parse::<StatField>().unwrap(), StatField::EffectiveFieldGoalPct);
    }

    #[test]
    fn test_resolve_rejects_unknown() {
        match StatField::resolve("PER") {
            Err(StatsError::UnknownField(name)) => assert_eq!(name, "PER"),
            other => panic!("expected UnknownField, got {:?}", other),
        }
        assert!(StatField::resolve("").is_err());
    }

    #[test]
    fn test_default_rename_map() {
        let map = RenameMap::default();
        assert_eq!(map.apply("PTS"), "Points");
        assert_eq!(map.apply("TRB"), "Rebounds");
        assert_eq!(map.apply("AST"), "Assists");
        assert_eq!(map.apply("FG%"), "Field Goal %");
        assert_eq!(map.apply("STL"), "STL");
        assert_eq!(map.apply("Awards"), "Awards");
    }

    #[test]
    fn test_from_column_label_is_exact() {
        assert_eq!(StatField::from_column_label("Points"), Some(StatField::Points));
        assert_eq!(StatField::from_column_label("PTS"), Some(StatField::Points));
        assert_eq!(StatField::from_column_label("points"), None);
        assert_eq!(StatField::from_column_label("2PA"), None);
        assert_eq!(
            StatField::from_column_label("3PA"),
            Some(StatField::ThreePointAttempts)
        );
    }
}
