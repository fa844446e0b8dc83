//! Heuristic features for 2048-style grids.
//!
//! Each feature extracts one raw measurement from a [`GridAnalysis`]. The evaluator combines them
//! as a weighted sum, so a feature only has to say "how much" of a property the grid has; whether
//! that property is desirable is expressed by the sign and size of its weight.
//!
//! | Feature | Raw value |
//! |---|---|
//! | [`Monotonicity`] | Σ tile × positional weight (larger tiles toward the top-left) |
//! | [`Smoothness`] | −Σ \|log2 a − log2 b\| over adjacent nonzero pairs |
//! | [`MaxValue`] | log2 of the largest tile |
//! | [`EmptyTiles`] | (empty cells)^1.5 |
//! | [`CornerMax`] | log2 of the largest tile when it sits in a corner |
//! | [`SnakePattern`] | Σ log2 a over non-increasing pairs along a boustrophedon path |
//! | [`MergePotential`] | Σ log2 a over equal adjacent pairs |
//!
//! No feature ever takes the logarithm of an empty cell.

use std::fmt;

use oxid2048_engine::{Direction, Position};

use crate::grid_analysis::GridAnalysis;

/// All features in the order of [`HeuristicWeights::as_array`](crate::HeuristicWeights::as_array).
pub const ALL_GRID_FEATURES: [&dyn GridFeatureSource; 7] = [
    &Monotonicity,
    &Smoothness,
    &MaxValue,
    &EmptyTiles,
    &CornerMax,
    &SnakePattern,
    &MergePotential,
];

pub trait GridFeatureSource: fmt::Debug + Send + Sync {
    #[must_use]
    fn id(&self) -> &str;
    #[must_use]
    fn name(&self) -> &str;
    #[must_use]
    fn extract(&self, analysis: &GridAnalysis) -> f64;
}

/// Positional weights anchored at the top-left corner.
const POSITION_WEIGHTS: [[f64; 4]; 4] = [
    [4.0, 3.0, 2.0, 1.0],
    [3.0, 2.0, 1.0, 0.5],
    [2.0, 1.0, 0.5, 0.25],
    [1.0, 0.5, 0.25, 0.1],
];

/// Weight for cells outside [`POSITION_WEIGHTS`] on grids larger than 4×4.
const OUTER_POSITION_WEIGHT: f64 = 0.1;

fn position_weight(pos: Position) -> f64 {
    POSITION_WEIGHTS
        .get(pos.row)
        .and_then(|row| row.get(pos.col))
        .copied()
        .unwrap_or(OUTER_POSITION_WEIGHT)
}

/// Corner-weighted tile mass.
///
/// # Raw measurement
///
/// `raw = Σ tile × w(row, col)` over nonzero tiles, where `w` is a fixed table that decreases
/// away from the top-left corner. Cells beyond the 4×4 table weigh 0.1.
#[derive(Debug, Clone)]
pub struct Monotonicity;

impl GridFeatureSource for Monotonicity {
    fn id(&self) -> &'static str {
        "monotonicity"
    }
    fn name(&self) -> &'static str {
        "Monotonicity"
    }
    fn extract(&self, analysis: &GridAnalysis) -> f64 {
        analysis
            .grid()
            .positions()
            .map(|pos| f64::from(analysis.tile(pos)) * position_weight(pos))
            .sum()
    }
}

/// Penalty for value jumps between neighbours.
///
/// # Raw measurement
///
/// `raw = −Σ |log2 a − log2 b|` over right and down neighbour pairs where both cells are
/// nonzero. Always ≤ 0.
#[derive(Debug, Clone)]
pub struct Smoothness;

impl GridFeatureSource for Smoothness {
    fn id(&self) -> &'static str {
        "smoothness"
    }
    fn name(&self) -> &'static str {
        "Smoothness"
    }
    fn extract(&self, analysis: &GridAnalysis) -> f64 {
        -analysis
            .grid()
            .adjacent_pairs()
            .filter(|&(a, b)| analysis.tile(a) != 0 && analysis.tile(b) != 0)
            .map(|(a, b)| (analysis.log2_tile(a) - analysis.log2_tile(b)).abs())
            .sum::<f64>()
    }
}

/// log2 of the largest tile, 0 for an empty grid.
#[derive(Debug, Clone)]
pub struct MaxValue;

impl GridFeatureSource for MaxValue {
    fn id(&self) -> &'static str {
        "max_value"
    }
    fn name(&self) -> &'static str {
        "Max Value"
    }
    fn extract(&self, analysis: &GridAnalysis) -> f64 {
        analysis.log2_max_tile()
    }
}

/// Free space, rewarded super-linearly.
///
/// # Raw measurement
///
/// `raw = empty^1.5`
#[derive(Debug, Clone)]
pub struct EmptyTiles;

impl GridFeatureSource for EmptyTiles {
    fn id(&self) -> &'static str {
        "empty_tiles"
    }
    fn name(&self) -> &'static str {
        "Empty Tiles"
    }
    fn extract(&self, analysis: &GridAnalysis) -> f64 {
        #[expect(clippy::cast_precision_loss)]
        let empty = analysis.empty_count() as f64;
        empty.powf(1.5)
    }
}

/// log2 of the largest tile when any corner holds it, else 0.
#[derive(Debug, Clone)]
pub struct CornerMax;

impl GridFeatureSource for CornerMax {
    fn id(&self) -> &'static str {
        "corner_max"
    }
    fn name(&self) -> &'static str {
        "Corner Max"
    }
    fn extract(&self, analysis: &GridAnalysis) -> f64 {
        let max = analysis.max_tile();
        let in_corner = analysis
            .grid()
            .corners()
            .into_iter()
            .any(|pos| analysis.tile(pos) == max);
        if max != 0 && in_corner {
            analysis.log2_max_tile()
        } else {
            0.0
        }
    }
}

/// Ordering along a zig-zag path.
///
/// # Raw measurement
///
/// Rows are walked boustrophedon: even rows left to right, odd rows right to left. For each
/// consecutive pair `(a, b)` along a row with `a ≥ b`, add `log2 a` (0 when `a` is empty).
#[derive(Debug, Clone)]
pub struct SnakePattern;

impl GridFeatureSource for SnakePattern {
    fn id(&self) -> &'static str {
        "snake_pattern"
    }
    fn name(&self) -> &'static str {
        "Snake Pattern"
    }
    fn extract(&self, analysis: &GridAnalysis) -> f64 {
        let size = analysis.size();
        let mut score = 0.0;
        for row in 0..size {
            let along = if row % 2 == 0 {
                Direction::Right
            } else {
                Direction::Left
            };
            let start_col = if row % 2 == 0 { 0 } else { size - 1 };
            let mut current = Position::new(row, start_col);
            while let Some(next) = analysis.grid().neighbor(current, along) {
                if analysis.tile(current) >= analysis.tile(next) {
                    score += analysis.log2_tile(current);
                }
                current = next;
            }
        }
        score
    }
}

/// Value of merges available right now.
///
/// # Raw measurement
///
/// `raw = Σ log2 a` over right and down neighbour pairs holding the same nonzero value `a`.
#[derive(Debug, Clone)]
pub struct MergePotential;

impl GridFeatureSource for MergePotential {
    fn id(&self) -> &'static str {
        "merge_potential"
    }
    fn name(&self) -> &'static str {
        "Merge Potential"
    }
    fn extract(&self, analysis: &GridAnalysis) -> f64 {
        analysis
            .grid()
            .adjacent_pairs()
            .filter(|&(a, b)| analysis.tile(a) != 0 && analysis.tile(a) == analysis.tile(b))
            .map(|(a, _)| analysis.log2_tile(a))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use oxid2048_engine::Grid;

    use super::*;

    fn extract(feature: &dyn GridFeatureSource, text: &str) -> f64 {
        let grid: Grid = text.parse().unwrap();
        feature.extract(&GridAnalysis::from_grid(&grid))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_feature_ids_are_unique() {
        let mut ids: Vec<_> = ALL_GRID_FEATURES.into_iter().map(|f| f.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ALL_GRID_FEATURES.len());
    }

    #[test]
    fn test_all_features_finite_on_empty_and_single_tile_grids() {
        for text in ["0,0,0,0/0,0,0,0/0,0,0,0/0,0,0,0", "0,0,0,0/0,0,0,0/0,2,0,0/0,0,0,0"] {
            for feature in ALL_GRID_FEATURES {
                assert!(extract(feature, text).is_finite(), "{}", feature.id());
            }
        }
    }

    #[test]
    fn test_monotonicity_uses_position_table() {
        assert_close(extract(&Monotonicity, "8,0,0,0/0,0,0,0/0,0,0,0/0,0,0,2"), 32.2);
        // 8×8 cells beyond the table weigh 0.1.
        let mut grid = Grid::empty(8);
        grid.set(Position::new(7, 7), 16);
        grid.set(Position::new(0, 1), 2);
        assert_close(Monotonicity.extract(&GridAnalysis::from_grid(&grid)), 7.6);
    }

    #[test]
    fn test_smoothness_skips_empty_neighbours() {
        // Pairs: (2,8) right -> 2, (2,2) down -> 0. The 8 has only empty neighbours otherwise.
        assert_close(extract(&Smoothness, "2,8,0,0/2,0,0,0/0,0,0,0/0,0,0,0"), -2.0);
        assert_close(extract(&Smoothness, "2,0,0,0/0,0,0,0/0,0,0,0/0,0,0,0"), 0.0);
    }

    #[test]
    fn test_max_value_and_empty_tiles() {
        assert_close(extract(&MaxValue, "0,0/0,0"), 0.0);
        assert_close(extract(&MaxValue, "2,0/0,256"), 8.0);
        assert_close(extract(&EmptyTiles, "2,0/0,256"), 2.0_f64.powf(1.5));
        assert_close(extract(&EmptyTiles, "0,0/0,0"), 8.0);
    }

    #[test]
    fn test_corner_max() {
        assert_close(extract(&CornerMax, "0,0,0,64/0,0,0,0/0,2,0,0/0,0,0,0"), 6.0);
        assert_close(extract(&CornerMax, "0,0,0,0/0,64,0,0/0,0,0,0/0,0,0,2"), 0.0);
        assert_close(extract(&CornerMax, "0,0/0,0"), 0.0);
    }

    #[test]
    fn test_snake_pattern_reverses_odd_rows() {
        // Row 0 left to right: 8>=4, 4>=2, 2>=0 -> 3 + 2 + 1.
        // Row 1 right to left, walked as [16, 0, 0, 0] -> 4.
        assert_close(
            extract(&SnakePattern, "8,4,2,0/0,0,0,16/0,0,0,0/0,0,0,0"),
            10.0,
        );
        // Increasing rows score nothing; equal empty pairs add log2 of nothing.
        assert_close(extract(&SnakePattern, "2,4/0,0"), 0.0);
    }

    #[test]
    fn test_merge_potential_counts_right_and_down() {
        assert_close(extract(&MergePotential, "4,4,0,0/4,0,0,0/0,0,0,0/0,0,0,0"), 4.0);
        assert_close(extract(&MergePotential, "0,0/0,0"), 0.0);
    }
}
