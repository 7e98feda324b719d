//! Record sources: where a fighter's wins come from.
//!
//! The search core only sees [`RecordSource`]. Concrete backends hold full
//! [`FighterRecord`]s behind a fallible loader and funnel every failure
//! through [`translate_loaded`], so a missing file, a malformed line or a
//! database error all look like the same thing to the search: a fighter
//! with no known wins.

pub mod cache;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod tsv;

use std::sync::Arc;

use crate::error::Result;
use crate::types::{FighterId, FighterRecord, WinSet};

pub use cache::CachedSource;
pub use memory::InMemoryRecords;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRecordStore;
pub use tsv::TsvRecordStore;

/// Lazy per-fighter access to win data.
///
/// Implementations may do I/O and may be slow. `fetch_wins` must be
/// deterministic for a fixed dataset and must answer `None` instead of
/// failing when no usable record exists.
pub trait RecordSource: Send + Sync {
    /// Opponents `fighter` has beaten, in record order, or `None` when there
    /// is no record.
    fn fetch_wins(&self, fighter: &FighterId) -> Option<WinSet>;

    /// Number of recorded losses, when the backend knows it.
    fn loss_count(&self, _fighter: &FighterId) -> Option<usize> {
        None
    }
}

impl<T: RecordSource + ?Sized> RecordSource for &T {
    fn fetch_wins(&self, fighter: &FighterId) -> Option<WinSet> {
        (**self).fetch_wins(fighter)
    }

    fn loss_count(&self, fighter: &FighterId) -> Option<usize> {
        (**self).loss_count(fighter)
    }
}

impl<T: RecordSource + ?Sized> RecordSource for Box<T> {
    fn fetch_wins(&self, fighter: &FighterId) -> Option<WinSet> {
        (**self).fetch_wins(fighter)
    }

    fn loss_count(&self, fighter: &FighterId) -> Option<usize> {
        (**self).loss_count(fighter)
    }
}

impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    fn fetch_wins(&self, fighter: &FighterId) -> Option<WinSet> {
        (**self).fetch_wins(fighter)
    }

    fn loss_count(&self, fighter: &FighterId) -> Option<usize> {
        (**self).loss_count(fighter)
    }
}

/// Collapse a backend load result into "record or nothing".
///
/// Errors are logged and dropped here; they never propagate into a search.
pub(crate) fn translate_loaded(
    backend: &str,
    fighter: &FighterId,
    loaded: Result<Option<FighterRecord>>,
) -> Option<FighterRecord> {
    match loaded {
        Ok(Some(record)) => Some(record),
        Ok(None) => {
            tracing::debug!(backend, %fighter, "no record");
            None
        }
        Err(e) => {
            tracing::warn!(backend, %fighter, "unusable record treated as missing: {e}");
            None
        }
    }
}
