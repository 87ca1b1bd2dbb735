//! Configuration for data locations and logging
//!
//! Loaded from a YAML file or from `PADDOCK_*` environment variables:
//!
//! | variable                 | field           | default          |
//! |--------------------------|-----------------|------------------|
//! | `PADDOCK_FIXTURES_DIR`   | `fixtures_dir`  | `./fixtures`     |
//! | `PADDOCK_REFERENCE_DIR`  | `reference_dir` | unset            |
//! | `PADDOCK_CIRCUITS_FILE`  | `circuits_file` | bundled table    |
//! | `PADDOCK_LOG_FILTER`     | `log_filter`    | `paddock=info`   |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::circuit::CircuitTable;
use crate::reference::ReferenceData;
use crate::{PaddockError, Result};

pub const DEFAULT_LOG_FILTER: &str = "paddock=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddockConfig {
    /// Root of the YAML session fixtures
    pub fixtures_dir: PathBuf,
    /// Directory of historical reference CSVs
    pub reference_dir: Option<PathBuf>,
    /// Circuit table replacing the bundled one
    pub circuits_file: Option<PathBuf>,
    /// `tracing` filter directive, see [`PaddockConfig::env_filter`]
    pub log_filter: String,
}

impl Default for PaddockConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: PathBuf::from("./fixtures"),
            reference_dir: None,
            circuits_file: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl PaddockConfig {
    /// Read and validate a YAML configuration file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PaddockError::file_error(path.to_path_buf(), e))?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml).map_err(|e| PaddockError::parse("configuration", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `PADDOCK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(dir) = var("PADDOCK_FIXTURES_DIR") {
            config.fixtures_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("PADDOCK_REFERENCE_DIR") {
            config.reference_dir = Some(PathBuf::from(dir));
        }
        if let Some(file) = var("PADDOCK_CIRCUITS_FILE") {
            config.circuits_file = Some(PathBuf::from(file));
        }
        if let Some(filter) = var("PADDOCK_LOG_FILTER") {
            config.log_filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot work. Paths are checked for shape only; a reference
    /// directory that does not exist yet loads as empty tables.
    pub fn validate(&self) -> Result<()> {
        if self.fixtures_dir.as_os_str().is_empty() {
            return Err(PaddockError::Config { reason: "fixtures_dir must not be empty".into() });
        }
        if self.log_filter.trim().is_empty() {
            return Err(PaddockError::Config { reason: "log_filter must not be empty".into() });
        }
        self.env_filter()?;
        if let Some(file) = &self.circuits_file {
            if file.extension().and_then(|ext| ext.to_str()) != Some("csv") {
                return Err(PaddockError::Config {
                    reason: format!("circuits_file must be a .csv file: {}", file.display()),
                });
            }
        }
        Ok(())
    }

    /// Filter for the embedding application's subscriber.
    ///
    /// ```rust,no_run
    /// # fn main() -> paddock::Result<()> {
    /// let config = paddock::PaddockConfig::from_env()?;
    /// tracing_subscriber::fmt().with_env_filter(config.env_filter()?).init();
    /// # Ok(())
    /// # }
    /// ```
    pub fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(&self.log_filter).map_err(|e| PaddockError::Config {
            reason: format!("invalid log_filter '{}': {e}", self.log_filter),
        })
    }

    /// Configured circuit table, or the bundled one.
    pub fn circuit_table(&self) -> Result<Arc<CircuitTable>> {
        match &self.circuits_file {
            Some(path) => Ok(Arc::new(CircuitTable::load(path)?)),
            None => Ok(CircuitTable::bundled()),
        }
    }

    /// Configured reference tables, or none.
    pub fn reference_data(&self) -> Result<Option<Arc<ReferenceData>>> {
        self.reference_dir.as_deref().map(|dir| ReferenceData::load(dir).map(Arc::new)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = PaddockConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PaddockConfig::default());
        assert_eq!(config.log_filter, "paddock=info");
    }

    #[test]
    fn environment_overrides() {
        let config = PaddockConfig::from_lookup(lookup(&[
            ("PADDOCK_FIXTURES_DIR", "/data/sessions"),
            ("PADDOCK_REFERENCE_DIR", "/data/ergast"),
            ("PADDOCK_LOG_FILTER", "paddock=debug"),
            ("PADDOCK_CIRCUITS_FILE", "  "),
        ]))
        .unwrap();

        assert_eq!(config.fixtures_dir, PathBuf::from("/data/sessions"));
        assert_eq!(config.reference_dir, Some(PathBuf::from("/data/ergast")));
        assert_eq!(config.circuits_file, None);
        assert_eq!(config.log_filter, "paddock=debug");
    }

    #[test]
    fn yaml_with_partial_fields() {
        let config = PaddockConfig::from_yaml_str("reference_dir: /srv/reference\n").unwrap();
        assert_eq!(config.reference_dir, Some(PathBuf::from("/srv/reference")));
        assert_eq!(config.fixtures_dir, PathBuf::from("./fixtures"));
    }

    #[test]
    fn invalid_settings_are_config_errors() {
        let err = PaddockConfig::from_yaml_str("circuits_file: circuits.json\n").unwrap_err();
        assert!(matches!(err, PaddockError::Config { .. }));

        let err = PaddockConfig::from_yaml_str("log_filter: ''\n").unwrap_err();
        assert!(matches!(err, PaddockError::Config { .. }));

        let err = PaddockConfig::from_yaml_str("fixtures_dir: [1, 2]\n").unwrap_err();
        assert!(matches!(err, PaddockError::Parse { .. }));
    }

    #[test]
    fn log_filter_builds_env_filter() {
        let config = PaddockConfig::from_yaml_str("log_filter: paddock=debug,warn\n").unwrap();
        let filter = config.env_filter().unwrap();
        assert!(filter.to_string().contains("paddock=debug"));

        let err = PaddockConfig::from_yaml_str("log_filter: paddock=verbose\n").unwrap_err();
        assert!(matches!(err, PaddockError::Config { ref reason } if reason.contains("log_filter")));
    }

    #[test]
    fn bundled_circuits_when_unset() {
        let config = PaddockConfig::default();
        let table = config.circuit_table().unwrap();
        assert!(table.by_ref("monza").is_some());
        assert!(config.reference_data().unwrap().is_none());
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paddock.yaml");
        std::fs::write(&path, "fixtures_dir: /tmp/fixtures\nlog_filter: paddock=trace\n").unwrap();

        let config = PaddockConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.log_filter, "paddock=trace");
        assert!(PaddockConfig::from_yaml_file(&dir.path().join("missing.yaml")).is_err());
    }
}
