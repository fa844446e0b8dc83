//! Heuristic evaluation of 2048-style grids.
//!
//! The search in `oxid2048-ai` stops at a fixed horizon and substitutes a static score for the
//! rest of the game tree. This crate provides that score.
//!
//! # Architecture
//!
//! ```text
//! GridEvaluator (score a grid)
//!     ↓ weighted sum over
//! GridFeatureSource (one raw measurement each)
//!     ↓ reads
//! GridAnalysis (lazily computed shared metrics)
//! ```
//!
//! - [`grid_analysis`] - Lazy-evaluated grid metrics (tile exponents, max tile, empty count)
//! - [`grid_feature`] - The seven features: monotonicity, smoothness, max value, empty tiles,
//!   corner max, snake pattern and merge potential
//! - [`weights`] - [`HeuristicWeights`], loadable from JSON
//! - [`grid_evaluator`] - The [`GridEvaluator`] trait and the weighted-sum [`HeuristicEvaluator`]
//!
//! # Example
//!
//! ```
//! use oxid2048_engine::Grid;
//! use oxid2048_evaluator::{GridEvaluator, HeuristicEvaluator, HeuristicWeights};
//!
//! let evaluator = HeuristicEvaluator::new(HeuristicWeights::default());
//! let grid: Grid = "2,0,0,0/0,0,0,0/0,0,0,0/0,0,0,0".parse().unwrap();
//! assert!(evaluator.evaluate(&grid).is_finite());
//! ```

pub use self::{grid_evaluator::*, grid_feature::*, weights::*};

pub mod grid_analysis;
pub mod grid_evaluator;
pub mod grid_feature;
pub mod weights;
