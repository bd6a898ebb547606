//! NBA Stats Toolkit
//!
//! Normalizes a player's per-game stats table into typed season records,
//! summarizes it, and aligns several players on a shared season axis for
//! comparison.
//!
//! This library provides:
//! - `normalize`: raw table → season records (renames, season keys, coercion)
//! - `aggregate`: career averages, latest-season values, stat summaries
//! - `metrics`: the legacy efficiency score
//! - `compare`: season-aligned multi-player comparison frames
//! - `html` / `fetch` / `pipeline`: the fetch-and-parse boundary
//! - `export` / `render`: CSV export and text reports
//!
//! Binaries:
//! - `nba-stats`: search, show, compare and export from the command line

pub mod aggregate;
pub mod compare;
pub mod error;
pub mod export;
pub mod fetch;
pub mod fields;
pub mod html;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod render;
pub mod table;

pub use compare::{align, AlignedValue, ComparisonFrame};
pub use error::{Result, StatsError};
pub use fields::StatField;
pub use normalize::{SeasonRecord, StatValue};
pub use profile::PlayerProfile;
pub use table::RawTable;
