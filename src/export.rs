//! CSV export of profiles and comparison frames.
//!
//! Profile export writes canonical field names as the header row, followed by
//! the pass-through columns, and one line per season in the profile's stored
//! order. Missing values are written as empty cells.

use crate::compare::{AlignedValue, ComparisonFrame};
use crate::error::Result;
use crate::fields::{StatField, POSITION_COLUMN, SEASON_COLUMN, TEAM_COLUMN};
use crate::normalize::SeasonRecord;
use crate::profile::PlayerProfile;
use crate::table::RawTable;
use std::io::Write;
use std::path::Path;

/// Header row used for profile export: the fixed columns, then every
/// pass-through column seen in the profile.
pub fn profile_headers(profile: &PlayerProfile) -> Vec<String> {
    [SEASON_COLUMN, TEAM_COLUMN, POSITION_COLUMN]
        .iter()
        .map(|s| s.to_string())
        .chain(StatField::ALL.iter().map(|f| f.canonical_name().to_string()))
        .chain(extra_columns(profile))
        .collect()
}

/// Union of the records' extra column labels, in first-seen order.
fn extra_columns(profile: &PlayerProfile) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for record in profile.records() {
        for label in record.extras.keys() {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
    }
    labels
}

/// One export line. The season cell keeps the source label ("2019-20") so a
/// re-import yields the same season numbers. Extras the record lacks are
/// written as empty cells.
fn profile_row(record: &SeasonRecord, extras: &[String]) -> Vec<String> {
    let mut row = vec![
        record.season_label.clone(),
        record.team.clone(),
        record.position.clone(),
    ];
    row.extend(
        StatField::ALL
            .iter()
            .map(|f| record.get(*f).map(format_value).unwrap_or_default()),
    );
    row.extend(
        extras
            .iter()
            .map(|label| record.extras.get(label).cloned().unwrap_or_default()),
    );
    row
}

/// Row-oriented view of a profile, the inverse of normalization.
pub fn profile_to_table(profile: &PlayerProfile) -> RawTable {
    let extras = extra_columns(profile);
    RawTable::from_cells(
        profile_headers(profile),
        profile
            .records()
            .iter()
            .map(|r| profile_row(r, &extras))
            .collect(),
    )
}

pub fn write_profile_csv<W: Write>(profile: &PlayerProfile, out: W) -> Result<()> {
    let extras = extra_columns(profile);
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(profile_headers(profile))?;
    for record in profile.records() {
        writer.write_record(profile_row(record, &extras))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_profile_csv(profile: &PlayerProfile, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_profile_csv(profile, file)?;
    log::info!(
        "Exported {} seasons for {} to {}",
        profile.records().len(),
        profile.name(),
        path.display()
    );
    Ok(())
}

/// One line of the long-format comparison export.
#[derive(Debug, serde::Serialize)]
struct FrameRow<'a> {
    season: i32,
    player: &'a str,
    stat: &'a str,
    value: Option<f64>,
    status: &'static str,
}

/// Write a comparison frame in long format: one line per season × player,
/// seasons ascending, players in frame order.
pub fn write_frame_csv<W: Write>(frame: &ComparisonFrame, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for (idx, season) in frame.seasons.iter().enumerate() {
        for series in &frame.series {
            let value = series.points[idx].1;
            writer.serialize(FrameRow {
                season: *season,
                player: &series.player,
                stat: frame.field.canonical_name(),
                value: value.value(),
                status: status_label(value),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn export_frame_csv(frame: &ComparisonFrame, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_frame_csv(frame, file)
}

fn status_label(value: AlignedValue) -> &'static str {
    match value {
        AlignedValue::Value(_) => "ok",
        AlignedValue::Missing => "missing",
        AlignedValue::Absent => "absent",
    }
}

/// Shortest text that parses back to the same `f64`.
fn format_value(v: f64) -> String {
    v.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::align;

    fn sample() -> PlayerProfile {
        let mut a = SeasonRecord::new(2019, "2019-20")
            .with(StatField::Points, 25.25)
            .with(StatField::FieldGoalPct, 0.483);
        a.team = "DAL".to_string();
        a.position = "PG".to_string();
        let b = SeasonRecord::new(2018, "2018-19").with(StatField::Points, 21.2);
        PlayerProfile::new("Luka Doncic", "memory", vec![a, b])
    }

    #[test]
    fn test_profile_csv_layout() {
        let mut buf = Vec::new();
        write_profile_csv(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Season,Team,Pos,Age,G,GS,MP,FG,FGA,Field Goal %,"));
        assert!(lines[0].ends_with(",Rebounds,Assists,STL,BLK,TOV,PF,Points"));
        assert!(lines[1].starts_with("2019-20,DAL,PG,"));
        assert!(lines[1].ends_with(",25.25"));
        assert!(lines[2].starts_with("2018-19,,,"));
    }

    #[test]
    fn test_profile_to_table_headers() {
        let table = profile_to_table(&sample());
        assert_eq!(table.headers.len(), 3 + StatField::COUNT);
        assert_eq!(table.rows[0].get("Points").map(String::as_str), Some("25.25"));
        assert_eq!(table.rows[1].get("Field Goal %").map(String::as_str), Some(""));
    }

    #[test]
    fn test_profile_csv_keeps_extra_columns() {
        let mut a = SeasonRecord::new(2019, "2019-20").with(StatField::Points, 28.8);
        a.extras.insert("Lg".to_string(), "NBA".to_string());
        a.extras.insert("Awards".to_string(), "MVP-4".to_string());
        let mut b = SeasonRecord::new(2020, "2020-21");
        b.extras.insert("Lg".to_string(), "NBA".to_string());
        let profile = PlayerProfile::new("Luka Doncic", "memory", vec![a, b]);

        let headers = profile_headers(&profile);
        assert_eq!(headers.len(), 3 + StatField::COUNT + 2);
        assert_eq!(headers[3 + StatField::COUNT..].to_vec(), vec!["Awards", "Lg"]);

        let table = profile_to_table(&profile);
        assert_eq!(table.rows[0].get("Awards").map(String::as_str), Some("MVP-4"));
        assert_eq!(table.rows[1].get("Awards").map(String::as_str), Some(""));
        assert_eq!(table.rows[1].get("Lg").map(String::as_str), Some("NBA"));
    }

    #[test]
    fn test_frame_csv() {
        let a = sample();
        let b = PlayerProfile::new(
            "Trae Young",
            "memory",
            vec![SeasonRecord::new(2020, "2020-21").with(StatField::Points, 25.3)],
        );
        let frame = align(&[&a, &b], StatField::Points).unwrap();
        let mut buf = Vec::new();
        write_frame_csv(&frame, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "season,player,stat,value,status");
        assert_eq!(lines.len(), 1 + 3 * 2);
        assert_eq!(lines[1], "2018,Luka Doncic,Points,21.2,ok");
        assert_eq!(lines[2], "2018,Trae Young,Points,,absent");
        assert_eq!(lines[6], "2020,Trae Young,Points,25.3,ok");
    }
}
