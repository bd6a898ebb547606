//! Season record normalization.
//!
//! Turns a [`RawTable`] into typed [`SeasonRecord`]s:
//! - rows without a season cell (career totals, per-team summaries) are dropped
//! - header labels go through the [`RenameMap`]
//! - the season label "YYYY-YY" is reduced to its start year
//! - every recognized numeric cell is coerced to `f64`, or marked missing
//!
//! The raw table is never modified.

use crate::error::{Result, StatsError};
use crate::fields::{
    RenameMap, StatField, POSITION_COLUMN, SEASON_COLUMN, TEAM_COLUMN, TEAM_COLUMN_LEGACY,
};
use crate::table::RawTable;
use std::collections::BTreeMap;

/// A stat value. `None` is the explicit missing marker, distinct from zero.
pub type StatValue = Option<f64>;

/// One player-season observation.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonRecord {
    /// Start year of the season ("2019-20" → 2019)
    pub season: i32,
    /// Season label as it appeared in the source
    pub season_label: String,
    /// Team abbreviation, or a placeholder such as "TOT"/"2TM" for split seasons
    pub team: String,
    pub position: String,
    stats: [StatValue; StatField::COUNT],
    /// Columns outside the fixed schema, passed through as text
    pub extras: BTreeMap<String, String>,
}

impl SeasonRecord {
    /// Build a record with every stat missing.
    pub fn new(season: i32, season_label: impl Into<String>) -> Self {
        SeasonRecord {
            season,
            season_label: season_label.into(),
            team: String::new(),
            position: String::new(),
            stats: [None; StatField::COUNT],
            extras: BTreeMap::new(),
        }
    }

    pub fn get(&self, field: StatField) -> StatValue {
        self.stats[field.index()]
    }

    pub fn set(&mut self, field: StatField, value: StatValue) {
        self.stats[field.index()] = value;
    }

    /// Builder-style [`SeasonRecord::set`].
    pub fn with(mut self, field: StatField, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }
}

/// Normalized records plus bookkeeping about dropped rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub records: Vec<SeasonRecord>,
    /// Rows with an empty or absent season cell
    pub summary_rows: usize,
    /// Rows whose season label did not start with a year
    pub skipped: usize,
}

/// Normalize a raw per-game table.
///
/// Fails with [`StatsError::Schema`] when the season column is absent, and
/// with [`StatsError::EmptyResult`] when no row survives filtering. `player`
/// is only used for the error message.
pub fn normalize(table: &RawTable, renames: &RenameMap, player: &str) -> Result<Normalized> {
    let season_label = table
        .headers
        .iter()
        .find(|h| renames.apply(h) == SEASON_COLUMN)
        .ok_or_else(|| StatsError::Schema(SEASON_COLUMN.to_string()))?;

    // Resolve every header once; rows are looked up by source label.
    let columns: Vec<(&str, Column)> = table
        .headers
        .iter()
        .map(|h| (h.as_str(), Column::classify(renames.apply(h))))
        .collect();

    let mut records = Vec::with_capacity(table.len());
    let mut summary_rows = 0usize;
    let mut skipped = 0usize;

    for (row_num, row) in table.rows.iter().enumerate() {
        let raw_season = row.get(season_label).map(|s| s.trim()).unwrap_or("");
        if raw_season.is_empty() {
            summary_rows += 1;
            continue;
        }

        let season = match parse_season_year(raw_season) {
            Some(year) => year,
            None => {
                log::warn!(
                    "{}: row {}: unparseable season '{}', skipping",
                    player,
                    row_num + 1,
                    raw_season
                );
                skipped += 1;
                continue;
            }
        };

        let mut record = SeasonRecord::new(season, raw_season);
        for (source, column) in &columns {
            let Some(raw) = row.get(*source) else {
                continue;
            };
            match column {
                Column::Season => {}
                Column::Team => {
                    if record.team.is_empty() {
                        record.team = raw.trim().to_string();
                    }
                }
                Column::Position => record.position = raw.trim().to_string(),
                Column::Stat(field) => record.set(*field, coerce_number(raw)),
                Column::Extra(label) => {
                    record.extras.insert(label.clone(), raw.clone());
                }
            }
        }
        records.push(record);
    }

    log::debug!(
        "{}: normalized {} seasons ({} summary rows, {} skipped)",
        player,
        records.len(),
        summary_rows,
        skipped
    );

    if records.is_empty() {
        return Err(StatsError::EmptyResult {
            player: player.to_string(),
            skipped,
        });
    }

    Ok(Normalized {
        records,
        summary_rows,
        skipped,
    })
}

/// Extract the start year from a season label.
///
/// Takes the token before the first separator ("2019-20", "2019–20",
/// "2019/20") and requires it to be a four-digit year.
pub fn parse_season_year(label: &str) -> Option<i32> {
    let token = label
        .trim()
        .split(|c: char| c == '-' || c == '–' || c == '/' || c.is_whitespace())
        .next()?;
    if token.len() != 4 || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Lenient numeric coercion. Blank, placeholder or otherwise non-numeric
/// cells become missing; nothing is ever substituted with zero.
///
/// Percentages are kept on the fraction scale the table uses: ".456" parses
/// as 0.456, and a cell written as "45.6%" is divided by 100 to match.
pub fn coerce_number(raw: &str) -> StatValue {
    let s = raw.trim();
    let (s, scale) = match s.strip_suffix('%') {
        Some(pct) => (pct.trim_end(), 100.0),
        None => (s, 1.0),
    };
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v / scale)
}

enum Column {
    Season,
    Team,
    Position,
    Stat(StatField),
    Extra(String),
}

impl Column {
    fn classify(label: &str) -> Column {
        if label == SEASON_COLUMN {
            Column::Season
        } else if label == TEAM_COLUMN || label == TEAM_COLUMN_LEGACY {
            Column::Team
        } else if label == POSITION_COLUMN {
            Column::Position
        } else if let Some(field) = StatField::from_column_label(label) {
            Column::Stat(field)
        } else {
            Column::Extra(label.to_string())
        }
    }
}
