//! Markup extraction for the stats site.
//!
//! These helpers are intentionally narrow: they know how the per-game table
//! and the search result list are laid out and nothing else. Matching is
//! case-insensitive on tag and attribute names.

use crate::error::{Result, StatsError};
use crate::table::RawTable;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Mutex;

/// Table id of the per-game stats table on a player page.
pub const PER_GAME_TABLE_ID: &str = "per_game";

lazy_static::lazy_static! {
    static ref THEAD: Regex = Regex::new(r"(?is)<thead\b[^>]*>(.*?)</thead>").unwrap();
    static ref TBODY: Regex = Regex::new(r"(?is)<tbody\b[^>]*>(.*?)</tbody>").unwrap();
    static ref ROW: Regex = Regex::new(r"(?is)<tr\b([^>]*)>(.*?)</tr>").unwrap();
    static ref CELL: Regex = Regex::new(r"(?is)<t[hd]\b[^>]*>(.*?)</t[hd]>").unwrap();
    static ref HEADER_CELL: Regex = Regex::new(r"(?is)<th\b[^>]*>(.*?)</th>").unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref SEARCH_ITEM: Regex = Regex::new(
        r#"(?is)<div\b[^>]*class="[^"]*\bsearch-item-name\b[^"]*"[^>]*>.*?<a\b[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#
    )
    .unwrap();
    static ref CANONICAL_LINK: Regex =
        Regex::new(r#"(?is)<link\b[^>]*rel="canonical"[^>]*href="([^"]+)""#).unwrap();
    static ref PAGE_TITLE: Regex = Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1>").unwrap();
    static ref TABLE_PATTERNS: Mutex<HashMap<String, Regex>> = Mutex::new(HashMap::new());
}

/// A player returned by a name search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub url: String,
}

/// Extract the table with the given `id` as a [`RawTable`].
///
/// Header labels come from the last `thead` row (over-header rows are
/// skipped). Each body row contributes its `th` and `td` cells in order.
/// Rows flagged as repeated headers (`class="thead"`) are dropped. The site
/// sometimes ships secondary tables inside HTML comments; those are found
/// too.
pub fn parse_table(document: &str, table_id: &str) -> Result<RawTable> {
    let table = find_table(document, table_id)
        .ok_or_else(|| StatsError::Parse(format!("table '{}' not found", table_id)))?;

    let thead = THEAD
        .captures(table)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .ok_or_else(|| StatsError::Parse(format!("table '{}' has no header", table_id)))?;

    let headers: Vec<String> = ROW
        .captures_iter(thead)
        .map(|row| {
            HEADER_CELL
                .captures_iter(row.get(2).map_or("", |m| m.as_str()))
                .map(|c| cell_text(c.get(1).map_or("", |m| m.as_str())))
                .collect::<Vec<String>>()
        })
        .filter(|labels| !labels.is_empty())
        .last()
        .ok_or_else(|| StatsError::Parse(format!("table '{}' has no header labels", table_id)))?;

    let body = TBODY
        .captures(table)
        .and_then(|c| c.get(1))
        .map_or("", |m| m.as_str());

    let mut cells = Vec::new();
    for row in ROW.captures_iter(body) {
        let attrs = row.get(1).map_or("", |m| m.as_str());
        if is_repeated_header(attrs) {
            continue;
        }
        let inner = row.get(2).map_or("", |m| m.as_str());
        let values: Vec<String> = CELL
            .captures_iter(inner)
            .map(|c| cell_text(c.get(1).map_or("", |m| m.as_str())))
            .collect();
        if !values.is_empty() {
            cells.push(values);
        }
    }

    log::debug!(
        "Parsed table '{}': {} columns, {} rows",
        table_id,
        headers.len(),
        cells.len()
    );
    Ok(RawTable::from_cells(headers, cells))
}

/// Extract search candidates from a search results page.
///
/// Relative links are resolved against `base_url`.
pub fn parse_search_results(document: &str, base_url: &str) -> Vec<Candidate> {
    SEARCH_ITEM
        .captures_iter(document)
        .map(|c| Candidate {
            name: cell_text(&c[2]),
            url: absolute_url(base_url, &decode_entities(&c[1])),
        })
        .filter(|c| !c.name.is_empty())
        .collect()
}

/// When a search matches exactly one player the site answers with that
/// player's page instead of a result list. Recover it as a single candidate.
pub fn parse_player_page_identity(document: &str) -> Option<Candidate> {
    if find_table(document, PER_GAME_TABLE_ID).is_none() {
        return None;
    }
    let url = CANONICAL_LINK.captures(document)?.get(1)?.as_str().to_string();
    let name = PAGE_TITLE
        .captures(document)
        .map(|c| cell_text(&c[1]))
        .unwrap_or_default();
    Some(Candidate { name, url })
}

/// Join a possibly-relative link onto the site base.
pub fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

/// Locate the `<table id="...">...</table>` block, looking inside HTML
/// comments when the table is not part of the live markup. Only a bare `id`
/// attribute counts; `data-id` and friends do not.
fn find_table<'a>(document: &'a str, table_id: &str) -> Option<&'a str> {
    table_pattern(table_id)?
        .captures(document)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Compiled table pattern for `table_id`, built once per id.
fn table_pattern(table_id: &str) -> Option<Regex> {
    let mut cache = TABLE_PATTERNS.lock().ok()?;
    if let Some(re) = cache.get(table_id) {
        return Some(re.clone());
    }
    let pattern = format!(
        r#"(?is)<table\b[^>]*\sid\s*=\s*(?:"{0}"|'{0}'|{0}\b)[^>]*>(.*?)</table>"#,
        regex::escape(table_id)
    );
    let re = Regex::new(&pattern).ok()?;
    cache.insert(table_id.to_string(), re.clone());
    Some(re)
}

fn is_repeated_header(attrs: &str) -> bool {
    let lower = attrs.to_ascii_lowercase();
    lower.contains("class=\"thead") || lower.contains("class=\"over_header")
}

/// Strip tags, decode the handful of entities the site uses and collapse
/// whitespace.
fn cell_text(html: &str) -> String {
    let stripped = TAG.replace_all(html, "");
    normalize_ws(&decode_entities(&stripped))
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
