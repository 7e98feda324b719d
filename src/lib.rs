//! mma-math: shortest transitive win chains between fighters.
//!
//! Given two fighters, [`PathFinder`] finds the shortest chain
//! `challenger beat X, X beat Y, .., Z beat opponent`, fetching fighter
//! records lazily from any [`RecordSource`] (TSV files, SQLite or memory).

pub mod config;
#[cfg(feature = "sqlite")]
pub mod db;
pub mod error;
pub mod graph;
pub mod observability;
pub mod record;
pub mod resolve;
pub mod types;

pub use config::{MmaMathConfig, SearchConfig};
pub use error::{MmaMathError, Result};
pub use graph::{
    CancelToken, PathFinder, PathResult, SearchControl, SearchReport, SearchStats, WinChain,
};
pub use record::{CachedSource, InMemoryRecords, RecordSource, TsvRecordStore};
#[cfg(feature = "sqlite")]
pub use record::SqliteRecordStore;
pub use resolve::{resolve_pair, slugify, IdentityResolver, Roster, SlugResolver};
pub use types::{Bout, FightOutcome, FighterId, FighterRecord, WinSet};
