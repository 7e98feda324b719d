//! SQLite schema for the fight-record database.
//!
//! One row per fighter plus one row per bout, ordered by `seq` so the record
//! order (and therefore win order) survives a round trip.

use rusqlite::Connection;

// ---------------------------------------------------------------------------
// DDL constants
// ---------------------------------------------------------------------------

const CREATE_FIGHTERS: &str = "\
CREATE TABLE IF NOT EXISTS fighters (
  id TEXT PRIMARY KEY,
  name TEXT
)";

const CREATE_BOUTS: &str = "\
CREATE TABLE IF NOT EXISTS bouts (
  fighter_id TEXT NOT NULL,
  seq INTEGER NOT NULL,
  opponent_id TEXT NOT NULL,
  outcome TEXT NOT NULL,
  PRIMARY KEY (fighter_id, seq)
)";

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_bouts_opponent ON bouts(opponent_id)",
    "CREATE INDEX IF NOT EXISTS idx_bouts_outcome ON bouts(fighter_id, outcome)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (or create) the record database at `db_path` and apply the schema.
///
/// Pass `":memory:"` for a throwaway database.
pub fn initialize_database(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;

    // -- Pragmas ----------------------------------------------------------
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    // -- Tables -----------------------------------------------------------
    conn.execute_batch(CREATE_FIGHTERS)?;
    conn.execute_batch(CREATE_BOUTS)?;

    for ddl in CREATE_INDEXES {
        conn.execute_batch(ddl)?;
    }

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_both_tables() {
        let conn = initialize_database(":memory:").unwrap();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(tables, ["bouts", "fighters"]);
    }

    #[test]
    fn schema_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("records.db");
        let path = path.to_str().unwrap();
        drop(initialize_database(path).unwrap());
        assert!(initialize_database(path).is_ok());
    }
}
