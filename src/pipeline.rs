//! Pipeline functions for programmatic use by the CLI.
//!
//! Each function wires the boundary collaborators (fetcher, table parser,
//! snapshot reader) to the core transforms and returns structured data or a
//! finished report string instead of printing.

use crate::aggregate::summarize;
use crate::compare::{align, ComparisonFrame};
use crate::error::{Result, StatsError};
use crate::fetch::{DocumentFetcher, FetchConfig};
use crate::fields::{RenameMap, StatField};
use crate::html::{self, Candidate};
use crate::profile::{select_candidate, IndexBase, PlayerProfile};
use crate::render::{render_frame, render_profile, render_summary, DisplayConfig};
use crate::table::RawTable;
use std::fmt::Write;
use std::path::Path;

// ============================================================================
// Loading
// ============================================================================

/// How a raw document is turned into season records.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Id of the stats table on a player page
    pub table_id: String,
    /// Header renames applied before typing
    pub renames: RenameMap,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            table_id: html::PER_GAME_TABLE_ID.to_string(),
            renames: RenameMap::default(),
        }
    }
}

/// Search players by (partial) name.
///
/// An exact match makes the site answer with the player page itself; that
/// page is returned as the single candidate.
pub fn search_players(
    fetcher: &dyn DocumentFetcher,
    config: &FetchConfig,
    query: &str,
) -> Result<Vec<Candidate>> {
    let document = fetcher.fetch(&config.search_url(query)?)?;
    let mut candidates = html::parse_search_results(&document, &config.base_url);
    if candidates.is_empty() {
        if let Some(direct) = html::parse_player_page_identity(&document) {
            let name = if direct.name.is_empty() {
                query.trim().to_string()
            } else {
                direct.name
            };
            candidates.push(Candidate {
                name,
                url: direct.url,
            });
        }
    }
    log::info!("Search '{}': {} candidates", query, candidates.len());
    Ok(candidates)
}

/// Fetch and normalize one candidate's stats page.
pub fn load_profile(
    fetcher: &dyn DocumentFetcher,
    candidate: &Candidate,
    options: &NormalizeOptions,
) -> Result<PlayerProfile> {
    let document = fetcher.fetch(&candidate.url)?;
    let table = html::parse_table(&document, &options.table_id)?;
    PlayerProfile::from_table(&candidate.name, &candidate.url, &table, &options.renames)
}

/// Normalize a table snapshot stored as CSV.
pub fn load_profile_from_csv(
    path: &Path,
    name: &str,
    options: &NormalizeOptions,
) -> Result<PlayerProfile> {
    let table = RawTable::from_csv_path(path)?;
    PlayerProfile::from_table(name, path.display().to_string(), &table, &options.renames)
}

/// Normalize a saved HTML page.
pub fn load_profile_from_html(
    path: &Path,
    name: &str,
    options: &NormalizeOptions,
) -> Result<PlayerProfile> {
    let document = std::fs::read_to_string(path)?;
    let table = html::parse_table(&document, &options.table_id)?;
    PlayerProfile::from_table(name, path.display().to_string(), &table, &options.renames)
}

// ============================================================================
// Batch
// ============================================================================

/// One player to look up: a search query plus the candidate to pick.
#[derive(Debug, Clone)]
pub struct PlayerRequest {
    pub query: String,
    /// One-based index into the search results
    pub pick: usize,
}

impl PlayerRequest {
    pub fn new(query: impl Into<String>, pick: usize) -> Self {
        Self {
            query: query.into(),
            pick,
        }
    }

    /// Parse "name" or "name#pick" (pick defaults to 1).
    pub fn parse(arg: &str) -> Self {
        match arg.rsplit_once('#') {
            Some((query, pick)) => match pick.trim().parse() {
                Ok(pick) => PlayerRequest::new(query.trim(), pick),
                Err(_) => PlayerRequest::new(arg.trim(), 1),
            },
            None => PlayerRequest::new(arg.trim(), 1),
        }
    }
}

/// Progress information for a batch run.
pub struct BatchProgress<'a> {
    /// Number of players processed so far
    pub completed: usize,
    pub total: usize,
    /// Number of players that failed
    pub errors: usize,
    /// Query currently being processed
    pub current: &'a str,
}

/// A player whose pipeline failed.
#[derive(Debug)]
pub struct PlayerFailure {
    pub query: String,
    pub error: StatsError,
}

/// Result of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub profiles: Vec<PlayerProfile>,
    pub failures: Vec<PlayerFailure>,
    pub cancelled: bool,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        let mut out = String::new();
        if self.cancelled {
            write!(out, "Cancelled: ").ok();
        } else {
            write!(out, "Done! ").ok();
        }
        write!(
            out,
            "Loaded {} players ({} errors)",
            self.profiles.len(),
            self.failures.len()
        )
        .ok();
        for failure in &self.failures {
            write!(out, "\n  {}: {}", failure.query, failure.error).ok();
        }
        out
    }
}

/// Search, select and load several players.
///
/// Errors local to one player (fetch, parse, schema, empty result, bad
/// selection) are logged and recorded in the report; the remaining players
/// are still processed. Calls `on_progress` before each player; return
/// `false` from the callback to cancel.
pub fn load_batch(
    fetcher: &dyn DocumentFetcher,
    config: &FetchConfig,
    requests: &[PlayerRequest],
    options: &NormalizeOptions,
    mut on_progress: impl FnMut(&BatchProgress) -> bool,
) -> BatchReport {
    let mut report = BatchReport::default();

    for (i, request) in requests.iter().enumerate() {
        let keep_going = on_progress(&BatchProgress {
            completed: i,
            total: requests.len(),
            errors: report.failures.len(),
            current: &request.query,
        });
        if !keep_going {
            report.cancelled = true;
            break;
        }

        match load_one(fetcher, config, request, options) {
            Ok(profile) => report.profiles.push(profile),
            Err(error) => {
                log::warn!("Player '{}': {}", request.query, error);
                report.failures.push(PlayerFailure {
                    query: request.query.clone(),
                    error,
                });
            }
        }
    }

    report
}

fn load_one(
    fetcher: &dyn DocumentFetcher,
    config: &FetchConfig,
    request: &PlayerRequest,
    options: &NormalizeOptions,
) -> Result<PlayerProfile> {
    let candidates = search_players(fetcher, config, &request.query)?;
    if candidates.is_empty() {
        return Err(StatsError::NoMatches(request.query.clone()));
    }
    let chosen = select_candidate(&candidates, request.pick, IndexBase::One)?;
    load_profile(fetcher, chosen, options)
}

// ============================================================================
// Reports
// ============================================================================

/// Full text report for one player: season table plus a summary per stat.
pub fn player_report(profile: &PlayerProfile, fields: &[StatField], display: &DisplayConfig) -> String {
    let mut out = render_profile(profile, display);
    for field in fields {
        out.push('\n');
        out.push_str(&render_summary(profile.name(), &summarize(profile, *field), display));
    }
    if profile.skipped_rows() > 0 {
        write!(
            out,
            "\n({} rows with unparseable seasons were skipped)\n",
            profile.skipped_rows()
        )
        .ok();
    }
    out
}

/// Align the given profiles and render the comparison.
pub fn comparison_report(
    profiles: &[PlayerProfile],
    field: StatField,
    display: &DisplayConfig,
) -> Result<(ComparisonFrame, String)> {
    let refs: Vec<&PlayerProfile> = profiles.iter().collect();
    let frame = align(&refs, field)?;
    let text = render_frame(&frame, display);
    Ok((frame, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_request_parse() {
        let r = PlayerRequest::parse("Anthony Davis#2");
        assert_eq!(r.query, "Anthony Davis");
        assert_eq!(r.pick, 2);

        let r = PlayerRequest::parse(" Tim Duncan ");
        assert_eq!(r.query, "Tim Duncan");
        assert_eq!(r.pick, 1);

        let r = PlayerRequest::parse("Weird#Name");
        assert_eq!(r.query, "Weird#Name");
        assert_eq!(r.pick, 1);
    }

    #[test]
    fn test_batch_summary() {
        let report = BatchReport {
            profiles: vec![],
            failures: vec![PlayerFailure {
                query: "Nobody".to_string(),
                error: StatsError::SelectionOutOfRange { index: 3, count: 1 },
            }],
            cancelled: false,
        };
        let text = report.summary();
        assert!(text.starts_with("Done! Loaded 0 players (1 errors)"));
        assert!(text.contains("Nobody: selection 3 out of range"));
    }
}
