//! Configuration data structures for mma-math.
//!
//! Defines the YAML config format: search behavior and which record backend
//! to open. Every field has a default so partial files are valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration.
///
/// Loaded from a YAML file, then patched by `MMA_MATH_*` environment
/// variables (see [`crate::config::loader`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MmaMathConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub records: RecordsConfig,

    /// Optional roster TSV used for name resolution and for canonicalizing
    /// opponent names in TSV records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster: Option<PathBuf>,
}

impl Default for MmaMathConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            search: SearchConfig::default(),
            records: RecordsConfig::default(),
            roster: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SearchConfig
// ---------------------------------------------------------------------------

/// Knobs for one path search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Report "no path" without searching when the opponent has zero
    /// recorded losses. Only fires when the source knows the loss count.
    #[serde(default = "default_true")]
    pub loss_precheck: bool,

    /// Fetch each BFS level's records on the rayon pool.
    #[serde(default)]
    pub parallel_fetch: bool,

    /// Abort the search with `TimedOut` after this many milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            loss_precheck: true,
            parallel_fetch: false,
            deadline_ms: None,
        }
    }
}

// ---------------------------------------------------------------------------
// RecordsConfig
// ---------------------------------------------------------------------------

/// Which record backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordBackend {
    /// Directory of `<initial>-fighters/<slug>.tsv` files.
    Tsv,
    /// SQLite database file.
    Sqlite,
    /// Empty in-memory store. Every search against it ends in `NotFound`;
    /// useful for dry runs of the config and resolution pipeline.
    Memory,
}

impl RecordBackend {
    /// Parse from a loose string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tsv" | "files" => Some(Self::Tsv),
            "sqlite" | "db" => Some(Self::Sqlite),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

impl std::fmt::Display for RecordBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsConfig {
    #[serde(default = "default_backend")]
    pub backend: RecordBackend,

    /// TSV root directory or SQLite file, depending on `backend`.
    #[serde(default = "default_records_path")]
    pub path: PathBuf,

    /// Memoize fetches across searches.
    #[serde(default = "default_true")]
    pub cache: bool,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_records_path(),
            cache: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

fn default_true() -> bool {
    true
}

fn default_backend() -> RecordBackend {
    RecordBackend::Tsv
}

fn default_records_path() -> PathBuf {
    PathBuf::from("data/fighters")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MmaMathConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.search.loss_precheck);
        assert!(!config.search.parallel_fetch);
        assert_eq!(config.search.deadline_ms, None);
        assert_eq!(config.records.backend, RecordBackend::Tsv);
        assert!(config.records.cache);
        assert!(config.roster.is_none());
    }

    #[test]
    fn test_backend_loose_parsing() {
        assert_eq!(RecordBackend::from_str_loose("SQLITE"), Some(RecordBackend::Sqlite));
        assert_eq!(RecordBackend::from_str_loose(" tsv "), Some(RecordBackend::Tsv));
        assert_eq!(RecordBackend::from_str_loose("mem"), Some(RecordBackend::Memory));
        assert_eq!(RecordBackend::from_str_loose("postgres"), None);
    }

    #[test]
    fn test_backend_display_roundtrip() {
        for backend in [RecordBackend::Tsv, RecordBackend::Sqlite, RecordBackend::Memory] {
            assert_eq!(RecordBackend::from_str_loose(&backend.to_string()), Some(backend));
        }
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "search:\n  parallel_fetch: true\n  deadline_ms: 2500\n";
        let config: MmaMathConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.search.parallel_fetch);
        assert!(config.search.loss_precheck);
        assert_eq!(config.search.deadline_ms, Some(2500));
        assert_eq!(config.records, RecordsConfig::default());
    }

    #[test]
    fn test_serde_yaml_roundtrip() {
        let config = MmaMathConfig {
            search: SearchConfig {
                loss_precheck: false,
                parallel_fetch: true,
                deadline_ms: Some(100),
            },
            records: RecordsConfig {
                backend: RecordBackend::Sqlite,
                path: PathBuf::from("records.db"),
                cache: false,
            },
            roster: Some(PathBuf::from("name_url.tsv")),
            ..MmaMathConfig::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: MmaMathConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let yaml = "records:\n  backend: postgres\n";
        assert!(serde_yaml::from_str::<MmaMathConfig>(yaml).is_err());
    }
}
