//! Crate-wide error type.
//!
//! Only failures that the caller can act on surface here. A missing or
//! malformed fighter record is *not* an error from the search's point of
//! view: record backends translate those into a dead end before the
//! path finder ever sees them.

use std::path::PathBuf;

/// Errors produced by mma-math.
#[derive(Debug, thiserror::Error)]
pub enum MmaMathError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A record file exists but a line could not be turned into a bout.
    #[error("malformed record {}:{line}: {reason}", path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A human-entered name did not resolve to any known fighter.
    #[error("unknown fighter: {0}")]
    UnknownFighter(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Internal bookkeeping is inconsistent. Always a bug.
    #[error("broken search invariant: {0}")]
    BrokenInvariant(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MmaMathError>;
