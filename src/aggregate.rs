//! Scalar summaries over a player's season records.
//!
//! Missing values are excluded from both numerator and denominator; an
//! all-missing column yields `None` ("no data"), never zero.

use crate::error::Result;
use crate::fields::StatField;
use crate::normalize::StatValue;
use crate::profile::PlayerProfile;

/// Mean of the present values of `field`, or `None` when every season is
/// missing.
pub fn career_average(profile: &PlayerProfile, field: StatField) -> StatValue {
    mean(profile.records().iter().map(|r| r.get(field)))
}

/// Value of `field` in the chronologically last season.
///
/// Highest season number wins; among rows sharing that season the last one
/// in stored order wins. `None` when that value is missing or the profile
/// has no records.
pub fn latest_value(profile: &PlayerProfile, field: StatField) -> StatValue {
    profile
        .records()
        .iter()
        .enumerate()
        .max_by_key(|(pos, r)| (r.season, *pos))
        .and_then(|(_, r)| r.get(field))
}

/// [`career_average`] for a user-typed stat name.
pub fn career_average_by_name(profile: &PlayerProfile, name: &str) -> Result<StatValue> {
    Ok(career_average(profile, StatField::resolve(name)?))
}

/// [`latest_value`] for a user-typed stat name.
pub fn latest_value_by_name(profile: &PlayerProfile, name: &str) -> Result<StatValue> {
    Ok(latest_value(profile, StatField::resolve(name)?))
}

/// Headline numbers for one stat, as shown in reports.
#[derive(Debug, Clone, PartialEq)]
pub struct StatSummary {
    pub field: StatField,
    pub career_average: StatValue,
    pub latest: StatValue,
    /// Season with the highest present value (earliest on ties)
    pub best_season: Option<(i32, f64)>,
    /// Seasons where the stat is present
    pub seasons_with_data: usize,
    pub seasons_total: usize,
}

pub fn summarize(profile: &PlayerProfile, field: StatField) -> StatSummary {
    let column = profile.column(field);
    let best_season = column
        .iter()
        .filter_map(|(season, v)| v.map(|v| (*season, v)))
        .fold(None, |best: Option<(i32, f64)>, (season, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((season, v)),
        });

    StatSummary {
        field,
        career_average: career_average(profile, field),
        latest: latest_value(profile, field),
        best_season,
        seasons_with_data: column.iter().filter(|(_, v)| v.is_some()).count(),
        seasons_total: column.len(),
    }
}

fn mean(values: impl Iterator<Item = StatValue>) -> StatValue {
    let (sum, count) = values
        .flatten()
        .fold((0.0f64, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
