//! CSV loading for reference datasets
//!
//! Reference tables use the historical-database dump conventions: a header row, `\N` for
//! null, and the occasional hand-edited row that no longer matches its columns. Malformed rows
//! are skipped with a warning so a single bad entry never hides the rest of the table.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use std::fmt::Display;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::{PaddockError, Result};

/// Deserialize every well-formed row of a CSV document.
pub(crate) fn read_rows<T, R>(reader: R, context: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    csv_reader.headers()?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (index, record) in csv_reader.deserialize::<T>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                // +2: one for the header, one for 1-based line numbers
                warn!(context, line = index + 2, error = %e, "Skipping malformed CSV row");
            }
        }
    }

    debug!(context, rows = rows.len(), skipped, "Loaded CSV table");
    Ok(rows)
}

/// Deserialize a CSV file.
pub(crate) fn read_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| PaddockError::file_error(path.to_path_buf(), e))?;
    read_rows(file, &path.display().to_string())
}

/// Deserialize a CSV file, treating a missing file as an empty table.
pub(crate) fn read_optional_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        debug!(path = %path.display(), "Reference table not present");
        return Ok(Vec::new());
    }
    read_file(path)
}

/// Field deserializer mapping empty cells and `\N` to `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("\\N") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
        #[serde(default, deserialize_with = "nullable")]
        value: Option<f64>,
    }

    #[test]
    fn null_markers_become_none() {
        let rows: Vec<Row> = read_rows("id,value\n1,2.5\n2,\\N\n3,\n".as_bytes(), "test").unwrap();
        assert_eq!(
            rows,
            vec![
                Row { id: 1, value: Some(2.5) },
                Row { id: 2, value: None },
                Row { id: 3, value: None },
            ]
        );
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let rows: Vec<Row> = read_rows("id,value\nx,1\n2,fast\n3,4\n".as_bytes(), "test").unwrap();
        assert_eq!(rows, vec![Row { id: 3, value: Some(4.0) }]);
    }

    #[test]
    fn missing_optional_file_is_empty() {
        let rows: Vec<Row> = read_optional_file(Path::new("/nonexistent/table.csv")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn missing_required_file_is_a_file_error() {
        let err = read_file::<Row>(Path::new("/nonexistent/table.csv")).unwrap_err();
        assert!(matches!(err, PaddockError::File { .. }));
    }
}
