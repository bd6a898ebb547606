//! Error taxonomy shared by every stage of the pipeline.

/// Errors raised while fetching, normalizing, summarizing or comparing stats.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// The document fetcher could not deliver a page. Never retried.
    #[error("upstream unavailable for {url}: {reason}")]
    UpstreamUnavailable { url: String, reason: String },

    /// A configured base URL that cannot be turned into a request URL.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The document did not contain the expected markup.
    #[error("parse error: {0}")]
    Parse(String),

    /// The raw table lacks a column the normalizer cannot do without.
    #[error("schema error: required column '{0}' not found")]
    Schema(String),

    /// A name search returned no candidates.
    #[error("no players found matching '{0}'")]
    NoMatches(String),

    /// Nothing usable survived filtering.
    #[error("no usable seasons for {player} ({skipped} rows skipped)")]
    EmptyResult { player: String, skipped: usize },

    /// A stat name that does not resolve to a canonical field.
    #[error("unknown stat field '{0}'")]
    UnknownField(String),

    /// A selection index outside the candidate list.
    #[error("selection {index} out of range ({count} candidates)")]
    SelectionOutOfRange { index: usize, count: usize },

    /// A comparison needs at least two players.
    #[error("comparison needs at least 2 players, got {0}")]
    InsufficientPlayers(usize),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatsError>;
