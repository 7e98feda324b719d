//! Win graph search: lazy BFS over record sources.

pub mod control;
pub mod search;
pub mod state;

pub use control::{CancelToken, Interruption, SearchControl};
pub use search::{PathFinder, PathResult, SearchReport, SearchStats, WinChain};
