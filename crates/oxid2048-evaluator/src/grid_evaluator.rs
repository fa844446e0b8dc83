//! Grid evaluation: the static score used at the search horizon.
//!
//! [`HeuristicEvaluator`] computes a linear combination of the raw feature values:
//!
//! ```text
//! score = w₁·f₁ + w₂·f₂ + ... + w₇·f₇
//! ```
//!
//! Feature values are not normalized; the reference weights were tuned against the raw values.

use std::{fmt, iter};

use oxid2048_engine::Grid;
use serde::Serialize;

use crate::{
    grid_analysis::GridAnalysis,
    grid_feature::ALL_GRID_FEATURES,
    weights::HeuristicWeights,
};

/// Scores grids (higher is better).
///
/// Implementations must be pure: the same grid always yields the same score.
pub trait GridEvaluator: fmt::Debug + Send + Sync {
    fn evaluate(&self, grid: &Grid) -> f64;
}

/// One feature's share of a heuristic score.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureContribution {
    pub id: &'static str,
    pub name: &'static str,
    pub raw: f64,
    pub weight: f64,
    pub weighted: f64,
}

/// Weighted sum of the seven grid features.
///
/// # Example
///
/// ```
/// use oxid2048_engine::Grid;
/// use oxid2048_evaluator::{GridEvaluator, HeuristicEvaluator};
///
/// let evaluator = HeuristicEvaluator::default();
/// let corner: Grid = "64,8,0,0/8,0,0,0/0,0,0,0/0,0,0,0".parse().unwrap();
/// let center: Grid = "0,0,0,0/0,8,64,0/0,8,0,0/0,0,0,0".parse().unwrap();
/// assert!(evaluator.evaluate(&corner) > evaluator.evaluate(&center));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeuristicEvaluator {
    weights: HeuristicWeights,
}

impl HeuristicEvaluator {
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Per-feature raw and weighted values; their `weighted` fields sum to [`Self::evaluate`].
    #[must_use]
    pub fn breakdown(&self, grid: &Grid) -> Vec<FeatureContribution> {
        let analysis = GridAnalysis::from_grid(grid);
        iter::zip(ALL_GRID_FEATURES, self.weights.as_array())
            .map(|(feature, weight)| {
                let raw = feature.extract(&analysis);
                FeatureContribution {
                    id: feature.id(),
                    name: feature.name(),
                    raw,
                    weight,
                    weighted: raw * weight,
                }
            })
            .collect()
    }
}

impl GridEvaluator for HeuristicEvaluator {
    #[inline]
    fn evaluate(&self, grid: &Grid) -> f64 {
        let analysis = GridAnalysis::from_grid(grid);
        iter::zip(ALL_GRID_FEATURES, self.weights.as_array())
            .map(|(feature, weight)| feature.extract(&analysis) * weight)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_is_finite_on_degenerate_grids() {
        let evaluator = HeuristicEvaluator::default();
        for text in ["0,0,0,0/0,0,0,0/0,0,0,0/0,0,0,0", "0,0,0,0/0,0,0,0/0,0,0,0/0,0,0,2"] {
            let grid: Grid = text.parse().unwrap();
            assert!(evaluator.evaluate(&grid).is_finite(), "{text}");
        }
        assert!(evaluator.evaluate(&Grid::empty(8)).is_finite());
    }

    #[test]
    fn test_breakdown_sums_to_evaluation() {
        let evaluator = HeuristicEvaluator::default();
        let grid: Grid = "128,64,8,2/32,16,4,0/8,4,2,0/2,0,0,0".parse().unwrap();
        let breakdown = evaluator.breakdown(&grid);
        assert_eq!(breakdown.len(), ALL_GRID_FEATURES.len());
        let total: f64 = breakdown.iter().map(|c| c.weighted).sum();
        assert!((total - evaluator.evaluate(&grid)).abs() < 1e-9);
    }

    #[test]
    fn test_single_tile_score() {
        // One 2 in the top-left corner of an otherwise empty 4×4 grid:
        // monotonicity 2·4 = 8, max_value 1, empty 15^1.5, corner_max 1,
        // snake: row 0 pairs 2≥0 → 1, rest 0.
        let grid: Grid = "2,0,0,0/0,0,0,0/0,0,0,0/0,0,0,0".parse().unwrap();
        let expected = 4.0 * 8.0 + 2.0 * 1.0 + 2.7 * 15.0_f64.powf(1.5) + 2.8 * 1.0 + 1.6 * 1.0;
        let actual = HeuristicEvaluator::default().evaluate(&grid);
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn test_zero_weights_score_zero() {
        let weights = HeuristicWeights {
            monotonicity: 0.0,
            smoothness: 0.0,
            max_value: 0.0,
            empty_tiles: 0.0,
            corner_max: 0.0,
            snake_pattern: 0.0,
            merge_potential: 0.0,
        };
        let grid: Grid = "2,4/8,16".parse().unwrap();
        assert!(HeuristicEvaluator::new(weights).evaluate(&grid).abs() < f64::EPSILON);
    }
}
