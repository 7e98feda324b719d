//! SQLite-backed record store.

use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::schema::initialize_database;
use crate::error::{MmaMathError, Result};
use crate::record::{translate_loaded, RecordSource};
use crate::types::{FightOutcome, FighterId, FighterRecord, WinSet};

const BACKEND: &str = "sqlite";

const SELECT_FIGHTER_SQL: &str = "SELECT name FROM fighters WHERE id = ?1";

const SELECT_BOUTS_SQL: &str = "\
SELECT opponent_id, outcome FROM bouts
WHERE fighter_id = ?1
ORDER BY seq ASC";

const COUNT_LOSSES_SQL: &str = "\
SELECT COUNT(*) FROM bouts WHERE fighter_id = ?1 AND outcome = 'L'";

/// Fight records in a SQLite database.
///
/// The connection sits behind a `Mutex` so the store can be shared with
/// parallel fetches.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRecordStore").finish_non_exhaustive()
    }
}

impl SqliteRecordStore {
    /// Open (or create) the database at `db_path`.
    pub fn open(db_path: &str) -> Result<Self> {
        Ok(Self::from_connection(initialize_database(db_path)?))
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Wrap a connection that already has the schema applied.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or fully replace one fighter's record.
    pub fn upsert_record(&self, record: &FighterRecord) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO fighters (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            params![record.id.as_str(), record.name],
        )?;
        tx.execute(
            "DELETE FROM bouts WHERE fighter_id = ?1",
            params![record.id.as_str()],
        )?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO bouts (fighter_id, seq, opponent_id, outcome) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (seq, bout) in record.bouts.iter().enumerate() {
                stmt.execute(params![
                    record.id.as_str(),
                    seq as i64,
                    bout.opponent.as_str(),
                    bout.outcome.as_code()
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Bulk import, one transaction per record.
    pub fn import<'r>(
        &self,
        records: impl IntoIterator<Item = &'r FighterRecord>,
    ) -> Result<usize> {
        let mut count = 0;
        for record in records {
            self.upsert_record(record)?;
            count += 1;
        }
        tracing::info!(records = count, "imported fight records into sqlite");
        Ok(count)
    }

    /// Load a record. `Ok(None)` when the fighter is unknown.
    pub fn load_record(&self, fighter: &FighterId) -> Result<Option<FighterRecord>> {
        let conn = self.conn();
        let name: Option<Option<String>> = conn
            .prepare_cached(SELECT_FIGHTER_SQL)?
            .query_row(params![fighter.as_str()], |row| row.get(0))
            .optional()?;
        let Some(name) = name else {
            return Ok(None);
        };

        let mut record = FighterRecord::new(fighter.clone());
        record.name = name;

        let mut stmt = conn.prepare_cached(SELECT_BOUTS_SQL)?;
        let rows = stmt.query_map(params![fighter.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (opponent, code) = row?;
            let outcome = FightOutcome::from_code(&code).ok_or_else(|| {
                MmaMathError::Other(format!(
                    "fighter {fighter}: unknown outcome code `{code}` in bouts table"
                ))
            })?;
            record.push(opponent, outcome);
        }
        Ok(Some(record))
    }

    pub fn fighter_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM fighters", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn count_losses(&self, fighter: &FighterId) -> Result<Option<usize>> {
        let conn = self.conn();
        let known: Option<i64> = conn
            .prepare_cached("SELECT 1 FROM fighters WHERE id = ?1")?
            .query_row(params![fighter.as_str()], |row| row.get(0))
            .optional()?;
        if known.is_none() {
            return Ok(None);
        }
        let losses: i64 =
            conn.query_row(COUNT_LOSSES_SQL, params![fighter.as_str()], |row| row.get(0))?;
        Ok(Some(losses as usize))
    }
}

impl RecordSource for SqliteRecordStore {
    fn fetch_wins(&self, fighter: &FighterId) -> Option<WinSet> {
        translate_loaded(BACKEND, fighter, self.load_record(fighter)).map(|r| r.wins())
    }

    fn loss_count(&self, fighter: &FighterId) -> Option<usize> {
        match self.count_losses(fighter) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(backend = BACKEND, %fighter, "loss count unavailable: {e}");
                None
            }
        }
    }
}
