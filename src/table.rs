//! Raw row/column tables as produced by the markup parser.
//!
//! A [`RawTable`] is deliberately untyped: header labels plus rows of raw
//! cell text. Normalization into typed season records happens in
//! [`crate::normalize`].

use crate::error::Result;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// One body row: column label → raw cell text.
pub type RawRow = HashMap<String, String>;

/// Ordered header labels and body rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Build a table from header labels and positional cell rows.
    ///
    /// Rows shorter than the header leave the trailing columns absent; extra
    /// cells beyond the header are ignored. When a label repeats, the first
    /// occurrence wins.
    pub fn from_cells(headers: Vec<String>, cells: Vec<Vec<String>>) -> Self {
        let rows = cells
            .into_iter()
            .map(|row| {
                let mut map = RawRow::new();
                for (label, value) in headers.iter().zip(row) {
                    map.entry(label.clone()).or_insert(value);
                }
                map
            })
            .collect();
        RawTable { headers, rows }
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.headers.iter().any(|h| h == label)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Read a table snapshot from CSV. The first record is the header row.
    pub fn from_csv_reader<R: Read>(rdr: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(rdr);
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut cells = Vec::new();
        for result in reader.records() {
            let record = result?;
            cells.push(record.iter().map(|s| s.to_string()).collect());
        }

        log::debug!("Read CSV snapshot: {} columns, {} rows", headers.len(), cells.len());
        Ok(RawTable::from_cells(headers, cells))
    }

    /// Read a table snapshot from a CSV file on disk.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        RawTable::from_csv_reader(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_cells_short_and_long_rows() {
        let table = RawTable::from_cells(
            labels(&["Season", "Team", "PTS"]),
            vec![
                labels(&["2019-20", "LAL"]),
                labels(&["2020-21", "LAL", "25.0", "extra"]),
            ],
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("Team").map(String::as_str), Some("LAL"));
        assert!(table.rows[0].get("PTS").is_none());
        assert_eq!(table.rows[1].get("PTS").map(String::as_str), Some("25.0"));
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn test_duplicate_label_keeps_first() {
        let table = RawTable::from_cells(
            labels(&["Season", "Awards", "Awards"]),
            vec![labels(&["2019-20", "MVP-1", "AS"])],
        );
        assert_eq!(table.rows[0].get("Awards").map(String::as_str), Some("MVP-1"));
    }

    #[test]
    fn test_from_csv_reader() {
        let data = "Season, Team ,PTS\n2019-20,LAL,25.3\nCareer,,27.1\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.headers, labels(&["Season", "Team", "PTS"]));
        assert_eq!(table.len(), 2);
        assert!(table.has_column("PTS"));
        assert!(!table.has_column("AST"));
        assert_eq!(table.rows[1].get("Season").map(String::as_str), Some("Career"));
    }
}
