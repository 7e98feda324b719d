//! Shortest win-chain search over a lazily fetched win graph.
//!
//! The graph is never materialized: each fighter's outgoing edges (the
//! fighters they beat) are pulled from a [`RecordSource`] the first time the
//! fighter is expanded. The traversal is a FIFO breadth-first search with
//! distance relaxation and best-distance pruning.
//!
//! Tie-break: among equally short chains the first one discovered wins,
//! i.e. fighters are expanded level by level in the order their WinSets
//! listed them.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::graph::control::{Interruption, SearchControl};
use crate::graph::state::SearchState;
use crate::record::RecordSource;
use crate::types::{FighterId, WinSet};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A win-chain `[challenger, .., opponent]`; each fighter beat the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinChain {
    fighters: Vec<FighterId>,
}

impl WinChain {
    /// Chains always hold at least the two endpoints.
    fn new(fighters: Vec<FighterId>) -> Self {
        debug_assert!(fighters.len() >= 2);
        Self { fighters }
    }

    pub fn fighters(&self) -> &[FighterId] {
        &self.fighters
    }

    pub fn challenger(&self) -> &FighterId {
        &self.fighters[0]
    }

    pub fn opponent(&self) -> &FighterId {
        &self.fighters[self.fighters.len() - 1]
    }

    /// Number of wins in the chain.
    pub fn hops(&self) -> usize {
        self.fighters.len() - 1
    }

    /// Fighters strictly between challenger and opponent.
    pub fn intermediates(&self) -> &[FighterId] {
        &self.fighters[1..self.fighters.len() - 1]
    }

    pub fn into_vec(self) -> Vec<FighterId> {
        self.fighters
    }
}

/// Outcome of one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "chain", rename_all = "snake_case")]
pub enum PathResult {
    Found(WinChain),
    /// The search finished and no chain exists in the known records.
    NotFound,
    /// Challenger and opponent are the same fighter.
    SameFighter,
    TimedOut,
    Cancelled,
}

impl PathResult {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn chain(&self) -> Option<&WinChain> {
        match self {
            Self::Found(chain) => Some(chain),
            _ => None,
        }
    }
}

impl From<Interruption> for PathResult {
    fn from(reason: Interruption) -> Self {
        match reason {
            Interruption::TimedOut => Self::TimedOut,
            Interruption::Cancelled => Self::Cancelled,
        }
    }
}

/// Counters describing how much work a search did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// `fetch_wins` calls made.
    pub fetches: usize,
    /// Fighters popped from the frontier and fetched.
    pub expanded: usize,
    /// Fighters popped but not fetched because they could not beat the best
    /// known chain.
    pub skipped: usize,
    /// Newly seen fighters not enqueued because of pruning.
    pub pruned: usize,
    pub relaxations: usize,
    /// Fighters visited, challenger included.
    pub visited: usize,
    pub elapsed: Duration,
}

/// A result plus the work it took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    pub result: PathResult,
    pub stats: SearchStats,
}

// ---------------------------------------------------------------------------
// PathFinder
// ---------------------------------------------------------------------------

/// Breadth-first shortest win-chain search bound to a record source.
///
/// Holds no per-search state, so one finder can serve any number of
/// queries, sequentially or from several threads.
pub struct PathFinder<'a, S: RecordSource + ?Sized> {
    source: &'a S,
    config: SearchConfig,
    control: SearchControl,
}

impl<'a, S: RecordSource + ?Sized> PathFinder<'a, S> {
    /// Create a finder with default settings.
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            config: SearchConfig::default(),
            control: SearchControl::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_control(mut self, control: SearchControl) -> Self {
        self.control = control;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    // -------------------------------------------------------------------
    // find_shortest_win_chain
    // -------------------------------------------------------------------

    /// Shortest chain of wins from `challenger` to `opponent`.
    ///
    /// Returns `Err` only on a broken internal invariant; every expected
    /// outcome, including "no chain", is a [`PathResult`] variant.
    pub fn find_shortest_win_chain(
        &self,
        challenger: &FighterId,
        opponent: &FighterId,
    ) -> Result<PathResult> {
        self.search(challenger, opponent).map(|report| report.result)
    }

    /// Like [`Self::find_shortest_win_chain`], also returning [`SearchStats`].
    pub fn search(&self, challenger: &FighterId, opponent: &FighterId) -> Result<SearchReport> {
        let started = Instant::now();
        let deadline = self.control.tightest_deadline(
            self.config
                .deadline_ms
                .map(|ms| started + Duration::from_millis(ms)),
        );
        let mut stats = SearchStats::default();

        let result = self.run(challenger, opponent, deadline, &mut stats)?;
        stats.elapsed = started.elapsed();

        match &result {
            PathResult::Found(chain) => info!(
                %challenger, %opponent, hops = chain.hops(), fetches = stats.fetches,
                "win chain found"
            ),
            other => info!(
                %challenger, %opponent, fetches = stats.fetches, outcome = ?other,
                "no win chain"
            ),
        }
        Ok(SearchReport { result, stats })
    }

    fn run(
        &self,
        challenger: &FighterId,
        opponent: &FighterId,
        deadline: Option<Instant>,
        stats: &mut SearchStats,
    ) -> Result<PathResult> {
        if challenger == opponent {
            return Ok(PathResult::SameFighter);
        }
        if self.config.loss_precheck && self.source.loss_count(opponent) == Some(0) {
            debug!(%opponent, "opponent has never lost; skipping search");
            return Ok(PathResult::NotFound);
        }

        let mut state = SearchState::new(challenger.clone(), opponent.clone());
        let mut prefetched: HashMap<FighterId, Option<WinSet>> = HashMap::new();
        let mut level = None;

        while let Some(curr) = state.pop_front() {
            if let Some(stop) = self.control.check(deadline) {
                stats.visited = state.visited_len();
                return Ok(stop.into());
            }

            let curr_distance = state.expect_distance(&curr)?;
            if !state.can_improve(curr_distance) {
                stats.skipped += 1;
                continue;
            }
            if level != Some(curr_distance) {
                level = Some(curr_distance);
                debug!(
                    level = curr_distance,
                    frontier = state.frontier_len() + 1,
                    "expanding level"
                );
            }

            let wins = match prefetched.remove(&curr) {
                Some(wins) => wins,
                None if self.config.parallel_fetch => {
                    prefetched = self.prefetch_level(&curr, &state, deadline, stats);
                    match prefetched.remove(&curr) {
                        Some(wins) => wins,
                        // Interrupted before `curr` was fetched.
                        None => {
                            let stop = self
                                .control
                                .check(deadline)
                                .unwrap_or(Interruption::TimedOut);
                            stats.visited = state.visited_len();
                            return Ok(stop.into());
                        }
                    }
                }
                None => {
                    stats.fetches += 1;
                    self.source.fetch_wins(&curr)
                }
            };
            stats.expanded += 1;

            let Some(wins) = wins.filter(|w| !w.is_empty()) else {
                continue;
            };
            let next = curr_distance + 1;

            if wins.contains(opponent) {
                if state.reach_target(&curr, next) {
                    debug!(via = %curr, hops = next, "reached opponent");
                }
                continue;
            }

            for w in &wins {
                match state.distance(w) {
                    None if !state.is_visited(w) => {
                        if state.can_improve(next) {
                            state.discover(w, &curr, next);
                        } else {
                            stats.pruned += 1;
                        }
                    }
                    Some(known) if next < known => {
                        state.relax(w, &curr, next);
                        stats.relaxations += 1;
                    }
                    _ => {}
                }
            }
        }

        stats.visited = state.visited_len();
        if !state.target_found() {
            return Ok(PathResult::NotFound);
        }
        Ok(PathResult::Found(WinChain::new(state.reconstruct()?)))
    }

    /// Fetch `curr` and every frontier fighter that can still improve on the
    /// best chain, in parallel. Fighters not fetched because the search was
    /// interrupted are absent from the map.
    fn prefetch_level(
        &self,
        curr: &FighterId,
        state: &SearchState,
        deadline: Option<Instant>,
        stats: &mut SearchStats,
    ) -> HashMap<FighterId, Option<WinSet>> {
        let batch: Vec<&FighterId> = std::iter::once(curr)
            .chain(
                state
                    .frontier()
                    .filter(|id| state.distance(id).is_some_and(|d| state.can_improve(d))),
            )
            .collect();
        debug!(batch = batch.len(), "prefetching level");

        let fetched: HashMap<FighterId, Option<WinSet>> = batch
            .par_iter()
            .filter_map(|id| {
                if self.control.check(deadline).is_some() {
                    return None;
                }
                Some(((*id).clone(), self.source.fetch_wins(id)))
            })
            .collect();
        stats.fetches += fetched.len();
        fetched
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
