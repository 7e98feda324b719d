//! Roster-backed name resolution.
//!
//! A roster file has one fighter per line: `display name<TAB>profile url`.
//! The fighter id is the last path segment of the URL, e.g.
//! `https://www.espn.com/mma/fighter/_/id/2335679/nate-diaz` → `nate-diaz`.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{MmaMathError, Result};
use crate::resolve::{slugify, IdentityResolver};
use crate::types::FighterId;

/// One roster line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub id: FighterId,
}

/// Known fighters, in file order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<FighterId, usize>,
}

impl Roster {
    /// Load a roster TSV from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let roster = Self::parse(&text, path)?;
        tracing::debug!(entries = roster.len(), "loaded roster from {}", path.display());
        Ok(roster)
    }

    /// Parse roster text. `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let malformed = |reason: &str| MmaMathError::MalformedRecord {
                path: origin.to_path_buf(),
                line: idx + 1,
                reason: reason.to_string(),
            };
            let (name, url) = line
                .split_once('\t')
                .ok_or_else(|| malformed("expected `name<TAB>url`"))?;
            let id = id_from_url(url).ok_or_else(|| malformed("url has no fighter segment"))?;
            entries.push(RosterEntry {
                name: name.trim().to_string(),
                id,
            });
        }
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<RosterEntry>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_id = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_name.entry(entry.name.to_lowercase()).or_insert(idx);
            by_id.entry(entry.id.clone()).or_insert(idx);
        }
        Self {
            entries,
            by_name,
            by_id,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Display name for a known id.
    pub fn display_name(&self, id: &FighterId) -> Option<&str> {
        self.by_id.get(id).map(|&idx| self.entries[idx].name.as_str())
    }

    /// Exact display name (case-insensitive), then exact slug. No partial
    /// matching, so names found inside records never attach to a different
    /// fighter.
    pub fn resolve_exact(&self, name: &str) -> Option<FighterId> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(&idx) = self.by_name.get(&trimmed.to_lowercase()) {
            return Some(self.entries[idx].id.clone());
        }
        let slug = slugify(trimmed);
        self.by_id
            .get_key_value(slug.as_str())
            .map(|(id, _)| id.clone())
    }
}

impl IdentityResolver for Roster {
    /// [`Roster::resolve_exact`], then the first roster entry whose id
    /// contains the slug. Meant for human-entered names.
    fn resolve(&self, name: &str) -> Option<FighterId> {
        if let Some(id) = self.resolve_exact(name) {
            return Some(id);
        }
        let slug = slugify(name.trim());
        if slug.is_empty() {
            return None;
        }
        let found = self
            .entries
            .iter()
            .find(|e| e.id.as_str().contains(&slug))
            .map(|e| e.id.clone());
        if let Some(id) = &found {
            tracing::debug!(name = name.trim(), %id, "resolved by partial slug match");
        }
        found
    }
}

/// Last non-empty path segment of a profile URL.
pub fn id_from_url(url: &str) -> Option<FighterId> {
    url.trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .map(str::trim)
        .filter(|seg| !seg.is_empty() && !seg.contains(':'))
        .map(FighterId::from)
}
