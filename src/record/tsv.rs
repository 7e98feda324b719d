//! Directory of per-fighter TSV record files.
//!
//! Layout: `<root>/<initial>-fighters/<slug>.tsv`, where `<initial>` is the
//! first character of the slug. Each non-blank line is
//! `opponent display name<TAB>result code`; extra columns are ignored and an
//! optional `Opponent<TAB>Res.` header line is skipped.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{MmaMathError, Result};
use crate::record::{translate_loaded, RecordSource};
use crate::resolve::{slugify, Roster};
use crate::types::{FightOutcome, FighterId, FighterRecord, WinSet};

const BACKEND: &str = "tsv";

/// File-backed record store.
#[derive(Debug, Clone)]
pub struct TsvRecordStore {
    root: PathBuf,
    roster: Option<Arc<Roster>>,
}

impl TsvRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            roster: None,
        }
    }

    /// Canonicalize opponent names through `roster` instead of plain slugs.
    ///
    /// Only exact name or slug matches are used; an opponent missing from the
    /// roster keeps its own slug.
    pub fn with_roster(mut self, roster: Arc<Roster>) -> Self {
        self.roster = Some(roster);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the record for `fighter` lives (whether or not it exists).
    pub fn record_path(&self, fighter: &FighterId) -> PathBuf {
        let initial = fighter.initial().unwrap_or('_');
        self.root
            .join(format!("{initial}-fighters"))
            .join(format!("{fighter}.tsv"))
    }

    /// Load and parse a record. `Ok(None)` when the file does not exist.
    pub fn load_record(&self, fighter: &FighterId) -> Result<Option<FighterRecord>> {
        let path = self.record_path(fighter);
        if !path.is_file() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        self.parse_record(fighter, &text, &path).map(Some)
    }

    /// Write `record` in the on-disk layout, creating the shard directory.
    ///
    /// Opponents are written by id; ids re-slug to themselves on load.
    pub fn write_record(&self, record: &FighterRecord) -> Result<PathBuf> {
        let path = self.record_path(&record.id);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let out: String = record
            .bouts
            .iter()
            .map(|bout| format!("{}\t{}\n", bout.opponent, bout.outcome.as_code()))
            .collect();
        std::fs::write(&path, out)?;
        Ok(path)
    }

    fn parse_record(
        &self,
        fighter: &FighterId,
        text: &str,
        path: &Path,
    ) -> Result<FighterRecord> {
        let mut record = FighterRecord::new(fighter.clone());
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let malformed = |reason: String| MmaMathError::MalformedRecord {
                path: path.to_path_buf(),
                line: idx + 1,
                reason,
            };
            let mut cols = line.split('\t');
            let opponent = cols.next().unwrap_or_default().trim();
            let code = cols
                .next()
                .ok_or_else(|| malformed("missing result column".into()))?
                .trim();
            if idx == 0 && opponent.eq_ignore_ascii_case("opponent") {
                continue;
            }
            if opponent.is_empty() {
                return Err(malformed("empty opponent".into()));
            }
            let outcome = FightOutcome::from_code(code)
                .ok_or_else(|| malformed(format!("unknown result code `{code}`")))?;
            record.push(self.opponent_id(opponent), outcome);
        }
        Ok(record)
    }

    fn opponent_id(&self, name: &str) -> FighterId {
        self.roster
            .as_ref()
            .and_then(|r| r.resolve_exact(name))
            .unwrap_or_else(|| FighterId::new(slugify(name)))
    }
}

impl RecordSource for TsvRecordStore {
    fn fetch_wins(&self, fighter: &FighterId) -> Option<WinSet> {
        translate_loaded(BACKEND, fighter, self.load_record(fighter)).map(|r| r.wins())
    }

    fn loss_count(&self, fighter: &FighterId) -> Option<usize> {
        translate_loaded(BACKEND, fighter, self.load_record(fighter)).map(|r| r.loss_count())
    }
}
