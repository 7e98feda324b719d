//! Property-based tests for the win-chain search using proptest.
//!
//! Random win graphs are searched and compared against a plain exhaustive
//! breadth-first search over the same edges.

use std::collections::{HashMap, HashSet, VecDeque};

use proptest::prelude::*;

use mma_math::{FighterId, InMemoryRecords, PathFinder, PathResult, RecordSource, SearchConfig};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn name(i: usize) -> String {
    format!("f{i}")
}

/// A random win graph: `(fighter count, win lists, challenger, opponent)`.
///
/// Win lists are indices into the fighter range; self-wins are dropped.
fn arb_graph() -> impl Strategy<Value = (usize, Vec<Vec<usize>>, usize, usize)> {
    (2usize..12).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec(prop::collection::vec(0..n, 0..4), n),
            0..n,
            0..n,
        )
    })
}

fn build_store(wins: &[Vec<usize>]) -> InMemoryRecords {
    InMemoryRecords::from_wins(wins.iter().enumerate().map(|(winner, losers)| {
        let losers: Vec<String> = losers
            .iter()
            .filter(|&&l| l != winner)
            .map(|&l| name(l))
            .collect();
        (name(winner), losers)
    }))
}

/// Exhaustive BFS distance in hops, ignoring every optimization.
fn reference_distance(source: &InMemoryRecords, from: &FighterId, to: &FighterId) -> Option<usize> {
    let mut dist: HashMap<FighterId, usize> = HashMap::new();
    let mut queue = VecDeque::new();
    dist.insert(from.clone(), 0);
    queue.push_back(from.clone());
    while let Some(curr) = queue.pop_front() {
        let d = dist[&curr];
        let wins = source.fetch_wins(&curr).unwrap_or_default();
        for w in &wins {
            if !dist.contains_key(w) {
                dist.insert(w.clone(), d + 1);
                queue.push_back(w.clone());
            }
        }
    }
    dist.get(to).copied()
}

fn config(loss_precheck: bool, parallel_fetch: bool) -> SearchConfig {
    SearchConfig {
        loss_precheck,
        parallel_fetch,
        deadline_ms: None,
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A chain is found exactly when one exists, and it is the shortest.
    #[test]
    fn found_chains_are_minimal((_n, wins, c, o) in arb_graph()) {
        let store = build_store(&wins);
        let (challenger, opponent) = (FighterId::new(name(c)), FighterId::new(name(o)));
        let result = PathFinder::new(&store)
            .find_shortest_win_chain(&challenger, &opponent)
            .unwrap();

        if c == o {
            prop_assert_eq!(result, PathResult::SameFighter);
            return Ok(());
        }
        match (reference_distance(&store, &challenger, &opponent), &result) {
            (Some(hops), PathResult::Found(chain)) => prop_assert_eq!(chain.hops(), hops),
            (None, PathResult::NotFound) => {}
            (expected, got) => prop_assert!(false, "reference {:?}, search {:?}", expected, got),
        }
    }

    /// Every link in a chain is a recorded win and no fighter repeats.
    #[test]
    fn found_chains_are_sound((_n, wins, c, o) in arb_graph()) {
        let store = build_store(&wins);
        let (challenger, opponent) = (FighterId::new(name(c)), FighterId::new(name(o)));
        let result = PathFinder::new(&store)
            .find_shortest_win_chain(&challenger, &opponent)
            .unwrap();

        if let PathResult::Found(chain) = result {
            prop_assert_eq!(chain.challenger(), &challenger);
            prop_assert_eq!(chain.opponent(), &opponent);
            for pair in chain.fighters().windows(2) {
                let beaten = store.fetch_wins(&pair[0]).unwrap_or_default();
                prop_assert!(beaten.contains(&pair[1]), "{} never beat {}", pair[0], pair[1]);
            }
            let distinct: HashSet<_> = chain.fighters().iter().collect();
            prop_assert_eq!(distinct.len(), chain.fighters().len());
        }
    }

    /// Each fighter is fetched at most once per search.
    #[test]
    fn fetches_are_bounded_by_visited((_n, wins, c, o) in arb_graph()) {
        let store = build_store(&wins);
        let report = PathFinder::new(&store)
            .search(&FighterId::new(name(c)), &FighterId::new(name(o)))
            .unwrap();

        prop_assert_eq!(report.stats.fetches, report.stats.expanded);
        prop_assert!(report.stats.fetches <= report.stats.visited.max(1));
        prop_assert_eq!(store.fetch_count(), report.stats.fetches);
    }

    /// Same inputs, same answer.
    #[test]
    fn search_is_deterministic((_n, wins, c, o) in arb_graph()) {
        let store = build_store(&wins);
        let (challenger, opponent) = (FighterId::new(name(c)), FighterId::new(name(o)));
        let finder = PathFinder::new(&store);
        let first = finder.find_shortest_win_chain(&challenger, &opponent).unwrap();
        let second = finder.find_shortest_win_chain(&challenger, &opponent).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Parallel level fetching returns exactly the sequential answer.
    #[test]
    fn parallel_fetch_matches_sequential((_n, wins, c, o) in arb_graph()) {
        let store = build_store(&wins);
        let (challenger, opponent) = (FighterId::new(name(c)), FighterId::new(name(o)));

        let sequential = PathFinder::new(&store)
            .with_config(config(true, false))
            .search(&challenger, &opponent)
            .unwrap();
        let parallel = PathFinder::new(&store)
            .with_config(config(true, true))
            .search(&challenger, &opponent)
            .unwrap();

        prop_assert_eq!(&parallel.result, &sequential.result);
        prop_assert_eq!(parallel.stats.visited, sequential.stats.visited);
    }

    /// On consistent records the loss pre-check never changes the answer.
    #[test]
    fn loss_precheck_is_transparent_on_consistent_records((_n, wins, c, o) in arb_graph()) {
        let store = build_store(&wins);
        let (challenger, opponent) = (FighterId::new(name(c)), FighterId::new(name(o)));

        let with = PathFinder::new(&store)
            .with_config(config(true, false))
            .find_shortest_win_chain(&challenger, &opponent)
            .unwrap();
        let without = PathFinder::new(&store)
            .with_config(config(false, false))
            .find_shortest_win_chain(&challenger, &opponent)
            .unwrap();
        prop_assert_eq!(with, without);
    }
}
