//! Config loading: YAML file, then environment overrides, then wiring the
//! configured record backend.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::schema::{MmaMathConfig, RecordBackend, RecordsConfig};
use crate::error::{MmaMathError, Result};
use crate::record::{CachedSource, InMemoryRecords, RecordSource, TsvRecordStore};
use crate::resolve::Roster;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const CONFIG_FILE: &str = "config.yaml";

const ENV_LOSS_PRECHECK: &str = "MMA_MATH_LOSS_PRECHECK";
const ENV_PARALLEL_FETCH: &str = "MMA_MATH_PARALLEL_FETCH";
const ENV_DEADLINE_MS: &str = "MMA_MATH_DEADLINE_MS";
const ENV_RECORDS_PATH: &str = "MMA_MATH_RECORDS_PATH";

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Per-user config location, e.g. `~/.config/mma-math/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "mma-math").map(|d| d.config_dir().join(CONFIG_FILE))
}

/// Read the YAML config at `path`. A missing or empty file yields defaults.
pub fn load(path: &Path) -> Result<MmaMathConfig> {
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(MmaMathConfig::default());
    }
    let text = std::fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Ok(MmaMathConfig::default());
    }
    Ok(serde_yaml::from_str(&text)?)
}

/// [`load`] followed by [`apply_env_overrides`] from the process environment.
pub fn load_with_env(path: &Path) -> Result<MmaMathConfig> {
    let mut config = load(path)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Patch `config` from `MMA_MATH_*` variables looked up through `lookup`.
pub fn apply_env_overrides<F>(config: &mut MmaMathConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_LOSS_PRECHECK) {
        config.search.loss_precheck = parse_bool(ENV_LOSS_PRECHECK, &v)?;
    }
    if let Some(v) = lookup(ENV_PARALLEL_FETCH) {
        config.search.parallel_fetch = parse_bool(ENV_PARALLEL_FETCH, &v)?;
    }
    if let Some(v) = lookup(ENV_DEADLINE_MS) {
        config.search.deadline_ms = match v.trim() {
            "" | "0" | "none" => None,
            ms => Some(ms.parse().map_err(|_| {
                MmaMathError::Config(format!(
                    "{ENV_DEADLINE_MS}: `{ms}` is not a millisecond count"
                ))
            })?),
        };
    }
    if let Some(v) = lookup(ENV_RECORDS_PATH) {
        config.records.path = PathBuf::from(v);
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(MmaMathError::Config(format!(
            "{key}: expected a boolean, got `{other}`"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Load the configured roster, if any.
pub fn load_roster(config: &MmaMathConfig) -> Result<Option<Arc<Roster>>> {
    config
        .roster
        .as_deref()
        .map(|path| Roster::load(path).map(Arc::new))
        .transpose()
}

/// Open the configured record backend, wrapped in a cache when enabled.
pub fn open_record_source(
    records: &RecordsConfig,
    roster: Option<Arc<Roster>>,
) -> Result<Box<dyn RecordSource>> {
    let source: Box<dyn RecordSource> = match records.backend {
        RecordBackend::Tsv => {
            if !records.path.is_dir() {
                return Err(MmaMathError::Config(format!(
                    "TSV record directory {} does not exist",
                    records.path.display()
                )));
            }
            let store = TsvRecordStore::new(&records.path);
            Box::new(match roster {
                Some(roster) => store.with_roster(roster),
                None => store,
            })
        }
        RecordBackend::Sqlite => open_sqlite(&records.path)?,
        RecordBackend::Memory => Box::new(InMemoryRecords::new()),
    };
    tracing::info!(
        backend = %records.backend,
        path = %records.path.display(),
        cache = records.cache,
        "opened record source"
    );

    if records.cache {
        Ok(Box::new(CachedSource::new(source)))
    } else {
        Ok(source)
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(path: &Path) -> Result<Box<dyn RecordSource>> {
    let path = path
        .to_str()
        .ok_or_else(|| {
            MmaMathError::Config(format!("non UTF-8 database path {}", path.display()))
        })?;
    Ok(Box::new(crate::record::SqliteRecordStore::open(path)?))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_path: &Path) -> Result<Box<dyn RecordSource>> {
    Err(MmaMathError::Config(
        "sqlite backend requested but the `sqlite` feature is disabled".into(),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FightOutcome, FighterId, FighterRecord};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config, MmaMathConfig::default());
    }

    #[test]
    fn empty_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(load(&path).unwrap(), MmaMathConfig::default());
    }

    #[test]
    fn yaml_file_is_parsed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "search:\n  loss_precheck: false\nrecords:\n  backend: memory\n")
            .unwrap();
        let config = load(&path).unwrap();
        assert!(!config.search.loss_precheck);
        assert_eq!(config.records.backend, RecordBackend::Memory);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "search: [unclosed").unwrap();
        assert!(matches!(load(&path), Err(MmaMathError::Yaml(_))));
    }

    #[test]
    fn env_overrides_patch_search_and_records() {
        let mut config = MmaMathConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                (ENV_LOSS_PRECHECK, "off"),
                (ENV_PARALLEL_FETCH, "TRUE"),
                (ENV_DEADLINE_MS, "1500"),
                (ENV_RECORDS_PATH, "/srv/fighters"),
            ]),
        )
        .unwrap();

        assert!(!config.search.loss_precheck);
        assert!(config.search.parallel_fetch);
        assert_eq!(config.search.deadline_ms, Some(1500));
        assert_eq!(config.records.path, PathBuf::from("/srv/fighters"));
    }

    #[test]
    fn zero_deadline_clears_it() {
        let mut config = MmaMathConfig::default();
        config.search.deadline_ms = Some(10);
        apply_env_overrides(&mut config, env(&[(ENV_DEADLINE_MS, "0")])).unwrap();
        assert_eq!(config.search.deadline_ms, None);
    }

    #[test]
    fn bad_env_values_are_config_errors() {
        let mut config = MmaMathConfig::default();
        let err = apply_env_overrides(&mut config, env(&[(ENV_PARALLEL_FETCH, "maybe")]));
        assert!(matches!(err, Err(MmaMathError::Config(_))));
        let err = apply_env_overrides(&mut config, env(&[(ENV_DEADLINE_MS, "soon")]));
        assert!(matches!(err, Err(MmaMathError::Config(_))));
    }

    #[test]
    fn default_config_path_ends_with_file_name() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(CONFIG_FILE));
        }
    }

    #[test]
    fn open_tsv_source_requires_directory() {
        let records = RecordsConfig {
            backend: RecordBackend::Tsv,
            path: PathBuf::from("/definitely/not/a/dir"),
            cache: false,
        };
        assert!(matches!(
            open_record_source(&records, None),
            Err(MmaMathError::Config(_))
        ));
    }

    #[test]
    fn open_tsv_source_reads_records() {
        let dir = TempDir::new().unwrap();
        let mut rec = FighterRecord::new("a");
        rec.push("b", FightOutcome::Win);
        TsvRecordStore::new(dir.path()).write_record(&rec).unwrap();

        let records = RecordsConfig {
            backend: RecordBackend::Tsv,
            path: dir.path().to_path_buf(),
            cache: true,
        };
        let source = open_record_source(&records, None).unwrap();
        assert_eq!(source.fetch_wins(&FighterId::new("a")).map(|w| w.len()), Some(1));
    }

    #[test]
    fn memory_backend_is_an_empty_dry_run_source() {
        let records = RecordsConfig {
            backend: RecordBackend::Memory,
            path: PathBuf::from("ignored"),
            cache: false,
        };
        let source = open_record_source(&records, None).unwrap();
        assert_eq!(source.fetch_wins(&FighterId::new("nate-diaz")), None);
        assert_eq!(source.loss_count(&FighterId::new("nate-diaz")), None);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn open_sqlite_source_creates_database() {
        let dir = TempDir::new().unwrap();
        let records = RecordsConfig {
            backend: RecordBackend::Sqlite,
            path: dir.path().join("records.db"),
            cache: false,
        };
        let source = open_record_source(&records, None).unwrap();
        assert_eq!(source.fetch_wins(&FighterId::new("anyone")), None);
    }

    #[test]
    fn load_roster_is_optional() {
        assert!(load_roster(&MmaMathConfig::default()).unwrap().is_none());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("name_url.tsv");
        std::fs::write(&path, "Nate Diaz\thttps://x/id/1/nate-diaz\n").unwrap();
        let config = MmaMathConfig {
            roster: Some(path),
            ..MmaMathConfig::default()
        };
        assert_eq!(load_roster(&config).unwrap().unwrap().len(), 1);
    }
}
