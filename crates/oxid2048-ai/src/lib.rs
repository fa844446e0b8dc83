//! Expectimax player for 2048-style games.
//!
//! - [`search`] - [`Searcher`]: depth-limited expectimax with sampled chance nodes
//! - [`auto_player`] - [`AutoPlayer`]: plays whole sessions with a searcher
//!
//! The heuristic used at the search horizon comes from `oxid2048-evaluator`; any
//! [`GridEvaluator`](oxid2048_evaluator::GridEvaluator) can be plugged in.

pub use self::{auto_player::*, search::*};

pub mod auto_player;
pub mod search;
