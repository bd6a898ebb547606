//! Derived per-season metrics.

use crate::fields::StatField;
use crate::normalize::{SeasonRecord, StatValue};
use crate::profile::PlayerProfile;

/// Legacy efficiency score:
///
/// ```text
/// (points + rebounds + assists) / season_year * 100
/// ```
///
/// The divisor is the season's *start year*, not games played. This is not a
/// recognized basketball metric; the formula is kept exactly as earlier releases
/// computed it so historical outputs stay comparable. Do not use it to
/// rank players.
///
/// Missing when any of points, rebounds or assists is missing, or when the
/// season year is zero.
pub fn legacy_efficiency(record: &SeasonRecord) -> StatValue {
    let points = record.get(StatField::Points)?;
    let rebounds = record.get(StatField::Rebounds)?;
    let assists = record.get(StatField::Assists)?;
    if record.season == 0 {
        return None;
    }
    Some((points + rebounds + assists) / f64::from(record.season) * 100.0)
}

/// [`legacy_efficiency`] for every record, in stored order. Recomputed on
/// each call.
pub fn legacy_efficiency_series(profile: &PlayerProfile) -> Vec<(i32, StatValue)> {
    profile
        .records()
        .iter()
        .map(|r| (r.season, legacy_efficiency(r)))
        .collect()
}
