//! Plain-text presentation of profiles, summaries and comparison frames.
//!
//! Nothing here touches global state: column limits, precision and the
//! placeholders for missing data all come from the [`DisplayConfig`] passed
//! in by the caller.

use crate::aggregate::StatSummary;
use crate::compare::{AlignedValue, ComparisonFrame};
use crate::fields::StatField;
use crate::metrics::legacy_efficiency;
use crate::normalize::StatValue;
use crate::profile::PlayerProfile;
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Presentation settings for the text sink.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Stat columns to show; `None` shows all of them
    pub columns: Option<Vec<StatField>>,
    /// Digits after the decimal point
    pub precision: usize,
    /// Width of each value column
    pub column_width: usize,
    /// Text for a value missing in a real record
    pub missing: String,
    /// Text for a season the player has no record for
    pub absent: String,
    /// Append the legacy efficiency column to profile tables
    pub show_legacy_efficiency: bool,
    /// Stamp shown in comparison headers; `None` leaves it out
    pub generated_at: Option<DateTime<Local>>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            columns: None,
            precision: 1,
            column_width: 10,
            missing: "-".to_string(),
            absent: "n/a".to_string(),
            show_legacy_efficiency: false,
            generated_at: None,
        }
    }
}

impl DisplayConfig {
    /// Only show the given stat columns
    pub fn with_columns(mut self, columns: Vec<StatField>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_legacy_efficiency(mut self) -> Self {
        self.show_legacy_efficiency = true;
        self
    }

    pub fn with_timestamp(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = Some(at);
        self
    }

    fn stat_columns(&self) -> Vec<StatField> {
        self.columns
            .clone()
            .unwrap_or_else(|| StatField::ALL.to_vec())
    }

    fn value(&self, v: StatValue) -> String {
        match v {
            Some(v) => format!("{:.*}", self.precision, v),
            None => self.missing.clone(),
        }
    }
}

/// Season-by-season table for one player, in stored order.
pub fn render_profile(profile: &PlayerProfile, config: &DisplayConfig) -> String {
    let columns = config.stat_columns();
    let w = config.column_width;
    let mut out = String::new();

    writeln!(out, "{} ({})", profile.name(), profile.source()).ok();
    write!(out, "{:<8} {:<5} {:<5}", "Season", "Team", "Pos").ok();
    for field in &columns {
        write!(out, " {:>w$}", truncate(field.canonical_name(), w)).ok();
    }
    if config.show_legacy_efficiency {
        write!(out, " {:>w$}", "LegacyEff").ok();
    }
    out.push('\n');

    for record in profile.records() {
        write!(
            out,
            "{:<8} {:<5} {:<5}",
            record.season_label,
            truncate(&record.team, 5),
            truncate(&record.position, 5)
        )
        .ok();
        for field in &columns {
            write!(out, " {:>w$}", config.value(record.get(*field))).ok();
        }
        if config.show_legacy_efficiency {
            write!(out, " {:>w$}", config.value(legacy_efficiency(record))).ok();
        }
        out.push('\n');
    }
    out
}

/// One-block summary of a stat.
pub fn render_summary(player: &str, summary: &StatSummary, config: &DisplayConfig) -> String {
    let mut out = String::new();
    writeln!(out, "{} - {}", player, summary.field).ok();
    writeln!(
        out,
        "  Career average: {}",
        summary
            .career_average
            .map(|v| format!("{:.*}", config.precision, v))
            .unwrap_or_else(|| "no data".to_string())
    )
    .ok();
    writeln!(
        out,
        "  Latest season:  {}",
        summary
            .latest
            .map(|v| format!("{:.*}", config.precision, v))
            .unwrap_or_else(|| "not available".to_string())
    )
    .ok();
    if let Some((season, v)) = summary.best_season {
        writeln!(out, "  Best season:    {} ({:.*})", season, config.precision, v).ok();
    }
    writeln!(
        out,
        "  Seasons with data: {} of {}",
        summary.seasons_with_data, summary.seasons_total
    )
    .ok();
    out
}

/// Seasons as rows, players as columns.
pub fn render_frame(frame: &ComparisonFrame, config: &DisplayConfig) -> String {
    let w = config.column_width.max(6);
    let mut out = String::new();

    write!(out, "{} by season", frame.field).ok();
    if let Some(at) = config.generated_at {
        write!(out, " (generated {})", at.format("%Y-%m-%d %H:%M")).ok();
    }
    out.push('\n');
    write!(out, "{:<8}", "Season").ok();
    for series in &frame.series {
        write!(out, " {:>w$}", truncate(&series.player, w)).ok();
    }
    out.push('\n');

    for (idx, season) in frame.seasons.iter().enumerate() {
        write!(out, "{:<8}", season).ok();
        for series in &frame.series {
            let cell = match series.points[idx].1 {
                AlignedValue::Value(v) => format!("{:.*}", config.precision, v),
                AlignedValue::Missing => config.missing.clone(),
                AlignedValue::Absent => config.absent.clone(),
            };
            write!(out, " {:>w$}", cell).ok();
        }
        out.push('\n');
    }
    out
}

/// Truncate a name to fit in a column.
fn truncate(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else if max_len <= 3 {
        name.chars().take(max_len).collect()
    } else {
        let head: String = name.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
