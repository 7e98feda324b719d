//! In-memory record source.
//!
//! Used for tests, benchmarks and callers that already hold a full dataset.
//! An optional per-fetch latency simulates a remote store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::record::RecordSource;
use crate::types::{FightOutcome, FighterId, FighterRecord, WinSet};

/// Records held in a `HashMap`, keyed by fighter.
#[derive(Debug, Default)]
pub struct InMemoryRecords {
    records: HashMap<FighterId, FighterRecord>,
    latency: Option<Duration>,
    fetches: AtomicUsize,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a consistent dataset from win lists.
    ///
    /// Each `(winner, [losers..])` entry adds `Win` bouts to the winner's
    /// record and the matching `Loss` bout to every loser's record, so loss
    /// counts agree with the win graph.
    pub fn from_wins<I, A, W, B>(wins: I) -> Self
    where
        I: IntoIterator<Item = (A, W)>,
        A: Into<FighterId>,
        W: IntoIterator<Item = B>,
        B: Into<FighterId>,
    {
        let mut store = Self::new();
        for (winner, losers) in wins {
            let winner = winner.into();
            store
                .records
                .entry(winner.clone())
                .or_insert_with(|| FighterRecord::new(winner.clone()));
            for loser in losers {
                let loser = loser.into();
                store.record_bout(&winner, &loser, FightOutcome::Win);
                store.record_bout(&loser, &winner, FightOutcome::Loss);
            }
        }
        store
    }

    /// Sleep for `latency` on every `fetch_wins` call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Insert or replace a full record.
    pub fn insert(&mut self, record: FighterRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn record(&self, fighter: &FighterId) -> Option<&FighterRecord> {
        self.records.get(fighter)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of `fetch_wins` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    fn record_bout(&mut self, owner: &FighterId, opponent: &FighterId, outcome: FightOutcome) {
        self.records
            .entry(owner.clone())
            .or_insert_with(|| FighterRecord::new(owner.clone()))
            .push(opponent.clone(), outcome);
    }
}

impl RecordSource for InMemoryRecords {
    fn fetch_wins(&self, fighter: &FighterId) -> Option<WinSet> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        self.records.get(fighter).map(FighterRecord::wins)
    }

    fn loss_count(&self, fighter: &FighterId) -> Option<usize> {
        self.records.get(fighter).map(FighterRecord::loss_count)
    }
}
