//! Structured logging and search metrics.
//!
//! This module provides:
//! - [`init_logging`]: One-time structured logging setup with `RUST_LOG` support
//! - [`Metrics`]: Lightweight counters aggregated over many searches

use tracing_subscriber::EnvFilter;

use crate::graph::SearchStats;

/// Initialize structured logging with `RUST_LOG` environment variable support.
///
/// Defaults to `mma_math=info` when `RUST_LOG` is not set. Call once at
/// program startup; later calls are ignored.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mma_math=info"));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Counters collected across searches.
///
/// Feed it each [`SearchStats`] via [`Metrics::record_search`] and cache
/// counters via [`Metrics::record_cache`]. Serializable to JSON via
/// [`Metrics::to_json`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Metrics {
    pub searches: u64,
    pub fetches: u64,
    pub fighters_expanded: u64,
    pub last_search_ms: Option<u64>,
    pub total_search_ms: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_search(&mut self, stats: &SearchStats) {
        let ms = stats.elapsed.as_millis() as u64;
        self.searches += 1;
        self.fetches += stats.fetches as u64;
        self.fighters_expanded += stats.expanded as u64;
        self.last_search_ms = Some(ms);
        self.total_search_ms += ms;
    }

    /// Overwrite cache counters with a snapshot, e.g. from a `CachedSource`.
    pub fn record_cache(&mut self, hits: u64, misses: u64) {
        self.cache_hits = hits;
        self.cache_misses = misses;
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "searches": self.searches,
            "fetches": self.fetches,
            "fighters_expanded": self.fighters_expanded,
            "last_search_ms": self.last_search_ms,
            "total_search_ms": self.total_search_ms,
            "cache_hits": self.cache_hits,
            "cache_misses": self.cache_misses,
        })
    }

    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / total as f64
    }

    /// Mean `fetch_wins` calls per search.
    pub fn fetches_per_search(&self) -> f64 {
        if self.searches == 0 {
            return 0.0;
        }
        self.fetches as f64 / self.searches as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
