//! Offline analysis of CSV snapshots: normalization, summaries and export
//! round trips through temporary files.

use nba_stats_toolkit::aggregate::{career_average, latest_value, summarize};
use nba_stats_toolkit::compare::{compare_selection, AlignedValue};
use nba_stats_toolkit::export::{export_frame_csv, export_profile_csv};
use nba_stats_toolkit::metrics::legacy_efficiency_series;
use nba_stats_toolkit::pipeline::{load_profile_from_csv, player_report, NormalizeOptions};
use nba_stats_toolkit::render::DisplayConfig;
use nba_stats_toolkit::{PlayerProfile, SeasonRecord, StatField, StatsError};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn curry() -> PlayerProfile {
    load_profile_from_csv(
        &fixture_path("stephen_curry.csv"),
        "Stephen Curry",
        &NormalizeOptions::default(),
    )
    .unwrap()
}

#[test]
fn test_snapshot_normalization() {
    let profile = curry();
    // "Career" is skipped as unparseable; the blank-season row is a summary row.
    assert_eq!(profile.seasons(), vec![2009, 2010, 2011]);
    assert_eq!(profile.skipped_rows(), 1);

    let r = &profile.records()[0];
    assert_eq!(r.get(StatField::Points), Some(17.5));
    assert_eq!(r.get(StatField::ThreePointPct), Some(0.437));
    assert_eq!(r.get(StatField::Steals), None);
    assert_eq!(r.extras.get("2P").map(String::as_str), Some("4.5"));
    assert_eq!(profile.records()[2].get(StatField::Rebounds), None);
}

#[test]
fn test_snapshot_aggregates() {
    let profile = curry();
    let avg = career_average(&profile, StatField::Points).unwrap();
    assert!((avg - (17.5 + 18.6 + 14.7) / 3.0).abs() < 1e-9);

    // Latest season has no rebounds, so there is no latest value.
    assert_eq!(latest_value(&profile, StatField::Rebounds), None);
    assert_eq!(latest_value(&profile, StatField::Assists), Some(5.3));

    let summary = summarize(&profile, StatField::Rebounds);
    assert_eq!(summary.best_season, Some((2009, 4.5)));
    assert_eq!(summary.seasons_with_data, 2);
    assert_eq!(summary.seasons_total, 3);
}

#[test]
fn test_snapshot_legacy_efficiency() {
    let series = legacy_efficiency_series(&curry());
    assert_eq!(series.len(), 3);
    let (season, value) = series[0];
    assert_eq!(season, 2009);
    assert!((value.unwrap() - (17.5 + 4.5 + 5.9) / 2009.0 * 100.0).abs() < 1e-9);
    assert_eq!(series[2].1, None);
}

#[test]
fn test_player_report_text() {
    let display = DisplayConfig::default().with_columns(vec![StatField::Points, StatField::Rebounds]);
    let text = player_report(&curry(), &[StatField::Points], &display);
    assert!(text.starts_with("Stephen Curry"));
    assert!(text.contains("2010-11"));
    assert!(text.contains("Stephen Curry - Points"));
    assert!(text.contains("Best season:    2010 (18.6)"));
    assert!(text.contains("1 rows with unparseable seasons were skipped"));
}

#[test]
fn test_profile_export_round_trip() {
    let profile = curry();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curry.csv");
    export_profile_csv(&profile, &path).unwrap();

    let reloaded = load_profile_from_csv(&path, "Stephen Curry", &NormalizeOptions::default()).unwrap();
    assert_eq!(reloaded.seasons(), profile.seasons());
    assert_eq!(reloaded.skipped_rows(), 0);
    assert_eq!(reloaded.records()[0].extras.get("Lg").map(String::as_str), Some("NBA"));
    assert_eq!(reloaded.records()[0].extras.get("2P").map(String::as_str), Some("4.5"));
    for (a, b) in profile.records().iter().zip(reloaded.records()) {
        assert_eq!(a.season_label, b.season_label);
        assert_eq!(a.team, b.team);
        assert_eq!(a.position, b.position);
        assert_eq!(a.extras, b.extras, "{} pass-through columns", a.season_label);
        for field in StatField::ALL {
            assert_eq!(a.get(field), b.get(field), "{} {}", a.season_label, field);
        }
    }
}

#[test]
fn test_frame_export_long_format() {
    let rookie = PlayerProfile::new(
        "Rookie",
        "memory",
        vec![
            SeasonRecord::new(2011, "2011-12").with(StatField::Points, 8.0),
            SeasonRecord::new(2012, "2012-13").with(StatField::Points, 12.5),
        ],
    );
    let profiles = vec![curry(), rookie];
    let frame = compare_selection(&profiles, "2, x, 1, 9", StatField::Points).unwrap();
    assert_eq!(frame.series[0].player, "Rookie");
    assert_eq!(frame.seasons, vec![2009, 2010, 2011, 2012]);
    assert_eq!(frame.series[1].get(2012), Some(AlignedValue::Absent));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.csv");
    export_frame_csv(&frame, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["season", "player", "stat", "value", "status"]);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 8);
    assert_eq!(&rows[0][1], "Rookie");
    assert_eq!(&rows[0][4], "absent");
    assert_eq!(&rows[0][3], "");
    assert_eq!(&rows[1][1], "Stephen Curry");
    assert_eq!(&rows[1][3], "17.5");
    assert_eq!(&rows[7][4], "absent");
}

#[test]
fn test_selection_with_one_valid_entry_is_insufficient() {
    let profiles = vec![curry()];
    let err = compare_selection(&profiles, "1, 2, 3", StatField::Points).unwrap_err();
    assert!(matches!(err, StatsError::InsufficientPlayers(1)));
}

#[test]
fn test_snapshot_without_season_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "Year,PTS\n2019,20.1\n").unwrap();
    let err = load_profile_from_csv(&path, "X", &NormalizeOptions::default()).unwrap_err();
    assert!(matches!(err, StatsError::Schema(_)));
}
