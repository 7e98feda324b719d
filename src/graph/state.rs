//! Bookkeeping for one breadth-first win-chain search.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{MmaMathError, Result};
use crate::types::FighterId;

/// Mutable state owned by a single search.
///
/// `distance` is defined for every visited fighter and, once reached, the
/// opponent. The opponent is never visited or enqueued.
#[derive(Debug)]
pub struct SearchState {
    challenger: FighterId,
    opponent: FighterId,
    visited: HashSet<FighterId>,
    distance: HashMap<FighterId, u32>,
    predecessor: HashMap<FighterId, FighterId>,
    frontier: VecDeque<FighterId>,
    best_target_distance: Option<u32>,
    target_found: bool,
}

impl SearchState {
    pub fn new(challenger: FighterId, opponent: FighterId) -> Self {
        let mut state = Self {
            challenger: challenger.clone(),
            opponent,
            visited: HashSet::new(),
            distance: HashMap::new(),
            predecessor: HashMap::new(),
            frontier: VecDeque::new(),
            best_target_distance: None,
            target_found: false,
        };
        state.visited.insert(challenger.clone());
        state.distance.insert(challenger.clone(), 0);
        state.frontier.push_back(challenger);
        state
    }

    pub fn challenger(&self) -> &FighterId {
        &self.challenger
    }

    pub fn opponent(&self) -> &FighterId {
        &self.opponent
    }

    pub fn pop_front(&mut self) -> Option<FighterId> {
        self.frontier.pop_front()
    }

    /// Fighters still waiting for expansion, in FIFO order.
    pub fn frontier(&self) -> impl Iterator<Item = &FighterId> {
        self.frontier.iter()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_visited(&self, fighter: &FighterId) -> bool {
        self.visited.contains(fighter)
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn distance(&self, fighter: &FighterId) -> Option<u32> {
        self.distance.get(fighter).copied()
    }

    /// Distance of a fighter that must have one (anything popped from the
    /// frontier).
    pub fn expect_distance(&self, fighter: &FighterId) -> Result<u32> {
        self.distance(fighter).ok_or_else(|| {
            MmaMathError::BrokenInvariant(format!("{fighter} left the frontier without a distance"))
        })
    }

    pub fn best_target_distance(&self) -> Option<u32> {
        self.best_target_distance
    }

    pub fn target_found(&self) -> bool {
        self.target_found
    }

    /// Could a fighter at `distance` still reach the opponent in strictly
    /// fewer hops than the best known chain? It needs at least one more hop.
    ///
    /// Gates both fetching a popped fighter and enqueueing a new one.
    pub fn can_improve(&self, distance: u32) -> bool {
        self.best_target_distance.map_or(true, |best| distance + 1 < best)
    }

    /// First sighting of `fighter`, reached from `from`.
    pub fn discover(&mut self, fighter: &FighterId, from: &FighterId, distance: u32) {
        self.visited.insert(fighter.clone());
        self.distance.insert(fighter.clone(), distance);
        self.predecessor.insert(fighter.clone(), from.clone());
        self.frontier.push_back(fighter.clone());
    }

    /// Shorter route to an already visited fighter. Not re-enqueued, so its
    /// already expanded descendants keep their old distances.
    pub fn relax(&mut self, fighter: &FighterId, from: &FighterId, distance: u32) {
        self.distance.insert(fighter.clone(), distance);
        self.predecessor.insert(fighter.clone(), from.clone());
    }

    /// `from` beats the opponent directly. Returns whether this improved the
    /// best known chain.
    pub fn reach_target(&mut self, from: &FighterId, distance: u32) -> bool {
        if self.best_target_distance.is_some_and(|best| distance >= best) {
            return false;
        }
        self.predecessor.insert(self.opponent.clone(), from.clone());
        self.distance.insert(self.opponent.clone(), distance);
        self.best_target_distance = Some(distance);
        self.target_found = true;
        true
    }

    /// Walk predecessors back from the opponent and return the forward chain
    /// `[challenger, .., opponent]`.
    pub fn reconstruct(&self) -> Result<Vec<FighterId>> {
        if !self.target_found {
            return Err(MmaMathError::BrokenInvariant(
                "reconstruct called before the opponent was reached".into(),
            ));
        }
        // A valid chain visits each fighter once, plus the opponent.
        let limit = self.visited.len() + 1;
        let mut chain = vec![self.opponent.clone()];
        let mut cursor = &self.opponent;
        while cursor != &self.challenger {
            let prev = self.predecessor.get(cursor).ok_or_else(|| {
                MmaMathError::BrokenInvariant(format!(
                    "predecessor chain from {} stops at {cursor}",
                    self.opponent
                ))
            })?;
            chain.push(prev.clone());
            if chain.len() > limit {
                return Err(MmaMathError::BrokenInvariant(format!(
                    "predecessor chain from {} does not reach {} within {limit} steps",
                    self.opponent, self.challenger
                )));
            }
            cursor = prev;
        }
        chain.reverse();
        Ok(chain)
    }
}
