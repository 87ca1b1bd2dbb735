//! Circuit table loading and the process-wide bundled copy

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{error, info, warn};

use super::CircuitRecord;
use crate::Result;
use crate::csv_utils::{read_file, read_rows};

const BUNDLED_CIRCUITS: &str = include_str!("../../data/circuits.csv");

static BUNDLED: OnceLock<Arc<CircuitTable>> = OnceLock::new();

/// Immutable, ordered set of circuit records with unique refs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircuitTable {
    records: Vec<CircuitRecord>,
}

impl CircuitTable {
    /// Build a table from records, dropping repeated refs (first row wins).
    pub fn from_records(records: impl IntoIterator<Item = CircuitRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();

        for record in records {
            let record = record.with_keys();
            if !seen.insert(record.circuit_ref.to_ascii_lowercase()) {
                warn!(
                    circuit_ref = %record.circuit_ref,
                    circuit_id = record.circuit_id,
                    "Duplicate circuitRef in circuit table, keeping first row"
                );
                continue;
            }
            unique.push(record);
        }

        Self { records: unique }
    }

    /// Parse a circuits CSV document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows: Vec<CircuitRecord> = read_rows(reader, "circuits")?;
        Ok(Self::from_records(rows))
    }

    /// Load a circuits CSV file.
    pub fn load(path: &Path) -> Result<Self> {
        let rows: Vec<CircuitRecord> = read_file(path)?;
        let table = Self::from_records(rows);
        info!(path = %path.display(), circuits = table.len(), "Loaded circuit table");
        Ok(table)
    }

    /// The table compiled into the crate, parsed on first use.
    pub fn bundled() -> Arc<CircuitTable> {
        BUNDLED
            .get_or_init(|| match Self::from_reader(BUNDLED_CIRCUITS.as_bytes()) {
                Ok(table) => {
                    info!(circuits = table.len(), "Loaded bundled circuit table");
                    Arc::new(table)
                }
                Err(e) => {
                    error!(error = %e, "Bundled circuit table failed to parse");
                    Arc::new(CircuitTable::default())
                }
            })
            .clone()
    }

    /// Case-insensitive lookup by `circuitRef`.
    pub fn by_ref(&self, circuit_ref: &str) -> Option<&CircuitRecord> {
        let wanted = circuit_ref.trim();
        self.records.iter().find(|record| record.circuit_ref.eq_ignore_ascii_case(wanted))
    }

    pub fn by_id(&self, circuit_id: u32) -> Option<&CircuitRecord> {
        self.records.iter().find(|record| record.circuit_id == circuit_id)
    }

    /// Records in load order.
    pub fn records(&self) -> &[CircuitRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CircuitRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a CircuitTable {
    type Item = &'a CircuitRecord;
    type IntoIter = std::slice::Iter<'a, CircuitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "circuitId,circuitRef,name,location,country,lat,lng,alt,url";

    #[test]
    fn bundled_table_has_modern_calendar() {
        let table = CircuitTable::bundled();
        assert!(!table.is_empty());

        for circuit_ref in ["bahrain", "jeddah", "monaco", "silverstone", "interlagos", "vegas"] {
            assert!(table.by_ref(circuit_ref).is_some(), "missing {circuit_ref}");
        }

        let monza = table.by_ref("MONZA").expect("case-insensitive ref lookup");
        assert_eq!(monza.circuit_id, 14);
        assert_eq!(monza.turns, Some(11));
        assert!(monza.latitude.is_some());
    }

    #[test]
    fn bundled_table_is_shared() {
        let first = CircuitTable::bundled();
        let second = CircuitTable::bundled();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn duplicate_refs_keep_first_row() {
        let csv = format!(
            "{HEADER}\n1,monza,Monza One,Monza,Italy,1,2,3,u\n2,monza,Monza Two,Monza,Italy,1,2,3,u\n"
        );
        let table = CircuitTable::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.by_ref("monza").map(|r| r.name.as_str()), Some("Monza One"));
    }

    #[test]
    fn null_altitude_and_missing_optional_columns() {
        let csv = format!("{HEADER}\n78,losail,Losail International Circuit,Al Daayen,Qatar,25.49,51.45,\\N,u\n");
        let table = CircuitTable::from_reader(csv.as_bytes()).unwrap();

        let losail = table.by_id(78).unwrap();
        assert_eq!(losail.altitude, None);
        assert_eq!(losail.length_km, None);
        assert_eq!(losail.turns, None);
        assert_eq!(losail.normalized_location_country(), "al daayen qatar");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER},length_km,turns").unwrap();
        writeln!(file, "9,silverstone,Silverstone Circuit,Silverstone,UK,52.07,-1.01,153,u,5.891,18").unwrap();

        let table = CircuitTable::load(file.path()).unwrap();
        let record = table.by_ref("silverstone").unwrap();
        assert_eq!(record.length_km, Some(5.891));
        assert_eq!(record.turns, Some(18));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(CircuitTable::load(Path::new("/nonexistent/circuits.csv")).is_err());
    }
}
