//! NBA Stats CLI - search players, show per-game profiles, compare seasons
//!
//! Player data is fetched from the stats site (or read from a saved CSV/HTML
//! snapshot), normalized into typed season records and printed as text
//! reports. Comparisons and profiles can be exported as CSV.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use nba_stats_toolkit::aggregate::career_average;
use nba_stats_toolkit::compare::compare_selection;
use nba_stats_toolkit::export::{export_frame_csv, export_profile_csv};
use nba_stats_toolkit::fetch::{FetchConfig, HttpFetcher, DEFAULT_BASE_URL};
use nba_stats_toolkit::html::PER_GAME_TABLE_ID;
use nba_stats_toolkit::pipeline::{
    comparison_report, load_batch, load_profile, load_profile_from_csv, load_profile_from_html,
    player_report, search_players, NormalizeOptions, PlayerRequest,
};
use nba_stats_toolkit::profile::{select_candidate, IndexBase};
use nba_stats_toolkit::render::{render_frame, DisplayConfig};
use nba_stats_toolkit::{PlayerProfile, StatField};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "nba-stats")]
#[command(about = "Per-game NBA player stats: search, summarize, compare and export")]
struct Cli {
    /// Site root for search and player pages
    #[arg(long, env = "NBA_STATS_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "15", global = true)]
    timeout_secs: u64,

    /// Id of the stats table on a player page
    #[arg(long, default_value = PER_GAME_TABLE_ID, global = true)]
    table_id: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List players matching a (partial) name
    Search {
        /// Name to search for
        query: String,
    },

    /// Print a player's season table and stat summaries
    Show {
        #[command(flatten)]
        source: SourceArgs,

        /// Stats to summarize (canonical name or column label, repeatable)
        #[arg(short, long = "stat", default_value = "Points")]
        stats: Vec<String>,

        /// Comma-separated stat columns to show in the season table
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Digits after the decimal point
        #[arg(long, default_value = "1")]
        precision: usize,

        /// Add the legacy efficiency column
        #[arg(long)]
        legacy_efficiency: bool,
    },

    /// Compare one stat across several players, season by season
    Compare {
        /// Player to look up as "name" or "name#pick" (repeatable)
        #[arg(short, long = "player")]
        players: Vec<String>,

        /// Offline player as "name=path.csv" (repeatable)
        #[arg(long = "snapshot")]
        snapshots: Vec<String>,

        /// Stat to compare
        #[arg(short, long, default_value = "Points")]
        stat: String,

        /// Comma-separated one-based indices of the loaded players to compare
        #[arg(long)]
        select: Option<String>,

        /// Digits after the decimal point
        #[arg(long, default_value = "1")]
        precision: usize,

        /// Write the comparison as long-format CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Export a player's normalized seasons to CSV
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Where a single player's table comes from.
#[derive(Args)]
struct SourceArgs {
    /// Player name to search for
    player: Option<String>,

    /// One-based index into the search results
    #[arg(long, default_value = "1")]
    pick: usize,

    /// Read the stats table from a CSV snapshot instead of fetching
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Read the stats table from a saved HTML page instead of fetching
    #[arg(long)]
    html: Option<PathBuf>,

    /// Display name for snapshot or HTML input
    #[arg(long)]
    name: Option<String>,
}

struct App {
    fetch: FetchConfig,
    options: NormalizeOptions,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let app = App {
        fetch: FetchConfig::default()
            .with_base_url(cli.base_url.clone())
            .with_timeout(Duration::from_secs(cli.timeout_secs)),
        options: NormalizeOptions {
            table_id: cli.table_id.clone(),
            ..NormalizeOptions::default()
        },
    };

    match cli.command {
        Commands::Search { query } => search(&app, &query)?,
        Commands::Show {
            source,
            stats,
            columns,
            precision,
            legacy_efficiency,
        } => show(&app, &source, &stats, &columns, precision, legacy_efficiency)?,
        Commands::Compare {
            players,
            snapshots,
            stat,
            select,
            precision,
            export,
        } => compare(
            &app,
            &players,
            &snapshots,
            &stat,
            select.as_deref(),
            precision,
            export.as_ref(),
        )?,
        Commands::Export { source, output } => {
            let profile = load_source(&app, &source)?;
            export_profile_csv(&profile, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Wrote {} seasons for {} to {}",
                profile.records().len(),
                profile.name(),
                output.display()
            );
        }
    }

    Ok(())
}

// ============================================================================
// Subcommands
// ============================================================================

fn search(app: &App, query: &str) -> Result<()> {
    let fetcher = HttpFetcher::new(&app.fetch)?;
    let candidates = search_players(&fetcher, &app.fetch, query)?;
    if candidates.is_empty() {
        println!("No players found matching '{}'", query);
        return Ok(());
    }
    for (i, c) in candidates.iter().enumerate() {
        println!("{:>3}. {}  ({})", i + 1, c.name, c.url);
    }
    Ok(())
}

fn show(
    app: &App,
    source: &SourceArgs,
    stats: &[String],
    columns: &[String],
    precision: usize,
    legacy_efficiency: bool,
) -> Result<()> {
    let fields = resolve_fields(stats)?;
    let mut display = DisplayConfig::default().with_precision(precision);
    if !columns.is_empty() {
        display = display.with_columns(resolve_fields(columns)?);
    }
    if legacy_efficiency {
        display = display.with_legacy_efficiency();
    }

    let profile = load_source(app, source)?;
    print!("{}", player_report(&profile, &fields, &display));
    Ok(())
}

fn compare(
    app: &App,
    players: &[String],
    snapshots: &[String],
    stat: &str,
    select: Option<&str>,
    precision: usize,
    export: Option<&PathBuf>,
) -> Result<()> {
    let field = StatField::resolve(stat)?;
    let display = DisplayConfig::default()
        .with_precision(precision)
        .with_timestamp(chrono::Local::now());

    let mut profiles: Vec<PlayerProfile> = Vec::new();
    let mut failures = 0usize;

    for entry in snapshots {
        let (name, path) = parse_snapshot_arg(entry)?;
        match load_profile_from_csv(&path, &name, &app.options) {
            Ok(p) => profiles.push(p),
            Err(e) => {
                log::warn!("Snapshot '{}': {}", entry, e);
                eprintln!("  {}: {}", name, e);
                failures += 1;
            }
        }
    }

    if !players.is_empty() {
        let fetcher = HttpFetcher::new(&app.fetch)?;
        let requests: Vec<PlayerRequest> = players.iter().map(|s| PlayerRequest::parse(s)).collect();
        let report = load_batch(&fetcher, &app.fetch, &requests, &app.options, |p| {
            eprint!("\r[{}/{}] {}...", p.completed + 1, p.total, p.current);
            true
        });
        eprintln!();
        eprintln!("{}", report.summary());
        failures += report.failures.len();
        profiles.extend(report.profiles);
    }

    if failures > 0 {
        log::warn!("{} players could not be loaded", failures);
    }

    let (frame, text) = match select {
        Some(selection) => {
            let frame = compare_selection(&profiles, selection, field)?;
            let text = render_frame(&frame, &display);
            (frame, text)
        }
        None => comparison_report(&profiles, field, &display)?,
    };
    print!("{}", text);

    for series in &frame.series {
        if let Some(profile) = profiles.iter().find(|p| p.name() == series.player) {
            match career_average(profile, field) {
                Some(avg) => println!("{}: career {} {:.*}", series.player, field, precision, avg),
                None => println!("{}: career {} no data", series.player, field),
            }
        }
    }

    if let Some(path) = export {
        export_frame_csv(&frame, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote comparison to {}", path.display());
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn load_source(app: &App, source: &SourceArgs) -> Result<PlayerProfile> {
    if let Some(path) = &source.snapshot {
        let name = display_name(source, path);
        return load_profile_from_csv(path, &name, &app.options)
            .with_context(|| format!("Failed to load snapshot {}", path.display()));
    }
    if let Some(path) = &source.html {
        let name = display_name(source, path);
        return load_profile_from_html(path, &name, &app.options)
            .with_context(|| format!("Failed to load page {}", path.display()));
    }
    let Some(query) = &source.player else {
        bail!("Give a player name, --snapshot or --html");
    };

    let fetcher = HttpFetcher::new(&app.fetch)?;
    let candidates = search_players(&fetcher, &app.fetch, query)?;
    if candidates.is_empty() {
        bail!("No players found matching '{}'", query);
    }
    if candidates.len() > 1 {
        log::info!(
            "{} matches for '{}', using #{}",
            candidates.len(),
            query,
            source.pick
        );
    }
    let chosen = select_candidate(&candidates, source.pick, IndexBase::One)?;
    Ok(load_profile(&fetcher, chosen, &app.options)?)
}

fn display_name(source: &SourceArgs, path: &std::path::Path) -> String {
    source.name.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    })
}

fn resolve_fields(names: &[String]) -> Result<Vec<StatField>> {
    names
        .iter()
        .map(|n| StatField::resolve(n).map_err(anyhow::Error::from))
        .collect()
}

/// Parse "name=path". A bare path uses its file stem as the name.
fn parse_snapshot_arg(arg: &str) -> Result<(String, PathBuf)> {
    match arg.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        Some(_) => bail!("Invalid snapshot '{}', expected name=path", arg),
        None => {
            let path = PathBuf::from(arg.trim());
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .context("Snapshot path has no file name")?;
            Ok((name, path))
        }
    }
}
