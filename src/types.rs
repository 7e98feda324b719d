//! Core domain types for mma-math.
//!
//! Fighters are identified by canonical slugs; a fighter's record is an
//! ordered list of bouts. The search only ever consumes the win side of a
//! record, as a [`WinSet`].

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// FighterId
// ---------------------------------------------------------------------------

/// Canonical, comparable identity of a fighter (e.g. `"nate-diaz"`).
///
/// Never a display name. Turning free text into a `FighterId` is the job of
/// [`crate::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FighterId(String);

impl FighterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First character of the slug, used to shard on-disk record stores.
    pub fn initial(&self) -> Option<char> {
        self.0.chars().next()
    }
}

impl std::fmt::Display for FighterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FighterId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for FighterId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for FighterId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// FightOutcome
// ---------------------------------------------------------------------------

/// Result of a single bout from the record owner's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FightOutcome {
    Win,
    Loss,
    Draw,
    NoContest,
}

impl FightOutcome {
    /// Parse a results-table code (`W`, `L`, `D`, `NC`), case-insensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "W" => Some(Self::Win),
            "L" => Some(Self::Loss),
            "D" => Some(Self::Draw),
            "NC" => Some(Self::NoContest),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Win => "W",
            Self::Loss => "L",
            Self::Draw => "D",
            Self::NoContest => "NC",
        }
    }
}

impl std::fmt::Display for FightOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

// ---------------------------------------------------------------------------
// Bout / FighterRecord
// ---------------------------------------------------------------------------

/// One line of a fighter's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bout {
    pub opponent: FighterId,
    pub outcome: FightOutcome,
}

impl Bout {
    pub fn new(opponent: impl Into<FighterId>, outcome: FightOutcome) -> Self {
        Self {
            opponent: opponent.into(),
            outcome,
        }
    }
}

/// Win/loss/draw/no-contest counts for a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub no_contests: usize,
}

/// A fighter's full record, in the order the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FighterRecord {
    pub id: FighterId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub bouts: Vec<Bout>,
}

impl FighterRecord {
    pub fn new(id: impl Into<FighterId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            bouts: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn push(&mut self, opponent: impl Into<FighterId>, outcome: FightOutcome) {
        self.bouts.push(Bout::new(opponent, outcome));
    }

    /// Opponents this fighter beat, in record order, rematches collapsed.
    pub fn wins(&self) -> WinSet {
        self.bouts
            .iter()
            .filter(|b| b.outcome == FightOutcome::Win)
            .map(|b| b.opponent.clone())
            .collect()
    }

    pub fn loss_count(&self) -> usize {
        self.tally().losses
    }

    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();
        for bout in &self.bouts {
            match bout.outcome {
                FightOutcome::Win => tally.wins += 1,
                FightOutcome::Loss => tally.losses += 1,
                FightOutcome::Draw => tally.draws += 1,
                FightOutcome::NoContest => tally.no_contests += 1,
            }
        }
        tally
    }
}

// ---------------------------------------------------------------------------
// WinSet
// ---------------------------------------------------------------------------

/// Ordered, duplicate-free list of fighters beaten by one fighter.
///
/// Order is the record order and drives the search tie-break, so it must be
/// preserved exactly as the backend produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinSet(Vec<FighterId>);

impl WinSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &FighterId) -> bool {
        self.0.contains(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FighterId> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[FighterId] {
        &self.0
    }
}

impl FromIterator<FighterId> for WinSet {
    fn from_iter<I: IntoIterator<Item = FighterId>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let ids = iter
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Self(ids)
    }
}

impl<'a> IntoIterator for &'a WinSet {
    type Item = &'a FighterId;
    type IntoIter = std::slice::Iter<'a, FighterId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
