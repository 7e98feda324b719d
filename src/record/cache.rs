//! Caller-side memoization of `fetch_wins`.
//!
//! A search already fetches each fighter at most once. The cache is for
//! callers that run many searches against the same slow source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::record::RecordSource;
use crate::types::{FighterId, WinSet};

/// Wraps a source and remembers every answer, including "no record".
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    wins: RwLock<HashMap<FighterId, Option<WinSet>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: RecordSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            wins: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of fighters currently cached.
    pub fn len(&self) -> usize {
        self.wins.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached answer (counters are kept).
    pub fn clear(&self) {
        self.wins.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl<S: RecordSource> RecordSource for CachedSource<S> {
    fn fetch_wins(&self, fighter: &FighterId) -> Option<WinSet> {
        if let Some(cached) = self
            .wins
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(fighter)
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        // Fetch outside the lock; a concurrent miss on the same fighter just
        // stores the same value twice.
        let fetched = self.inner.fetch_wins(fighter);
        self.wins
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(fighter.clone(), fetched.clone());
        fetched
    }

    fn loss_count(&self, fighter: &FighterId) -> Option<usize> {
        self.inner.loss_count(fighter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::InMemoryRecords;

    #[test]
    fn second_fetch_is_served_from_cache() {
        let cached = CachedSource::new(InMemoryRecords::from_wins([("a", vec!["b"])]));
        let a = FighterId::new("a");

        let first = cached.fetch_wins(&a);
        let second = cached.fetch_wins(&a);

        assert_eq!(first, second);
        assert_eq!(cached.inner().fetch_count(), 1);
        assert_eq!((cached.hits(), cached.misses()), (1, 1));
    }

    #[test]
    fn missing_records_are_cached_too() {
        let cached = CachedSource::new(InMemoryRecords::new());
        let ghost = FighterId::new("ghost");
        assert_eq!(cached.fetch_wins(&ghost), None);
        assert_eq!(cached.fetch_wins(&ghost), None);
        assert_eq!(cached.inner().fetch_count(), 1);
        assert_eq!(cached.len(), 1);
    }

    #[test]
    fn clear_forces_refetch() {
        let cached = CachedSource::new(InMemoryRecords::from_wins([("a", vec!["b"])]));
        let a = FighterId::new("a");
        cached.fetch_wins(&a);
        cached.clear();
        assert!(cached.is_empty());
        cached.fetch_wins(&a);
        assert_eq!(cached.inner().fetch_count(), 2);
    }
}
