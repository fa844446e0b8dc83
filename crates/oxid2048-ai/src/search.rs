//! Expectimax search over slides and random spawns.
//!
//! The game tree alternates two kinds of nodes:
//!
//! - **Agent nodes** pick the best of the four slides. Slides that do not move are skipped.
//! - **Chance nodes** average over random spawns. Only a sample of at most
//!   [`SearchConfig::sample_cells`] empty cells is expanded; each sampled cell contributes a 2
//!   (weight 0.9) and a 4 (weight 0.1).
//!
//! At depth 0, or when a node has no children, the grid's heuristic value is used instead.
//!
//! Each root slide is scored by an agent node at the full horizon, so the tree below a
//! candidate direction is one agent level deeper than the horizon alone suggests.
//!
//! # Design: Sampled Chance Nodes
//!
//! Expanding every empty cell makes the tree explode early in a game, when most cells are
//! empty. Sampling a fixed number of cells bounds the branching factor of chance nodes to
//! `2 × sample_cells`, so the node count for a given depth is bounded regardless of the grid.
//! The sample is drawn from the searcher's own seeded generator, so decisions are reproducible.

use arrayvec::ArrayVec;
use oxid2048_engine::{Direction, Grid, SPAWN_TWO_PROBABILITY, TileSeed, slide};
use oxid2048_evaluator::GridEvaluator;
use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Tile values a chance node spawns, with their probabilities.
const SPAWN_OUTCOMES: [(u32, f64); 2] = [
    (2, SPAWN_TWO_PROBABILITY),
    (4, 1.0 - SPAWN_TWO_PROBABILITY),
];

/// Search tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search horizon, counting agent and chance levels.
    pub depth: usize,
    /// Maximum number of empty cells expanded by a chance node.
    pub sample_cells: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            sample_cells: 3,
        }
    }
}

/// Counters accumulated across searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Number of root searches run.
    pub searches: u64,
    /// Number of nodes visited, the roots included.
    pub nodes: u64,
}

/// Expectimax player.
///
/// Owns the evaluator used at the horizon, the configuration and the generator for chance-node
/// sampling.
///
/// # Example
///
/// ```
/// use oxid2048_ai::{SearchConfig, Searcher};
/// use oxid2048_engine::{Direction, Grid, TileSeed};
/// use oxid2048_evaluator::HeuristicEvaluator;
///
/// let mut searcher = Searcher::with_seed(
///     Box::new(HeuristicEvaluator::default()),
///     SearchConfig::default(),
///     TileSeed::from_bytes([0; 16]),
/// );
/// // Only a slide to the right changes this grid.
/// let grid: Grid = "2,4,8,0/4,8,16,0/8,16,32,0/16,32,64,0".parse().unwrap();
/// assert_eq!(searcher.choose_direction(&grid), Some(Direction::Right));
/// ```
#[derive(Debug)]
pub struct Searcher<'a> {
    evaluator: Box<dyn GridEvaluator + 'a>,
    config: SearchConfig,
    rng: Pcg32,
    stats: SearchStats,
}

impl<'a> Searcher<'a> {
    /// Creates a searcher with a random sampling seed.
    #[must_use]
    pub fn new(evaluator: Box<dyn GridEvaluator + 'a>, config: SearchConfig) -> Self {
        Self::with_seed(evaluator, config, rand::random())
    }

    /// # Panics
    ///
    /// Panics if `config.sample_cells` is 0.
    #[must_use]
    pub fn with_seed(
        evaluator: Box<dyn GridEvaluator + 'a>,
        config: SearchConfig,
        seed: TileSeed,
    ) -> Self {
        assert!(config.sample_cells > 0, "sample_cells must be positive");
        Self {
            evaluator,
            config,
            rng: Pcg32::from_seed(seed.to_bytes()),
            stats: SearchStats::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Picks the physical slide direction with the best expected value at the configured depth.
    ///
    /// Returns `None` when no direction moves the grid.
    pub fn choose_direction(&mut self, grid: &Grid) -> Option<Direction> {
        self.choose_direction_with_depth(grid, self.config.depth)
    }

    /// Like [`Self::choose_direction`] with an explicit horizon.
    pub fn choose_direction_with_depth(
        &mut self,
        grid: &Grid,
        max_depth: usize,
    ) -> Option<Direction> {
        best_direction(&self.evaluate_directions_with_depth(grid, max_depth))
    }

    /// Expected value of every direction that moves the grid, in [`Direction::ALL`] order.
    pub fn evaluate_directions(&mut self, grid: &Grid) -> ArrayVec<(Direction, f64), 4> {
        self.evaluate_directions_with_depth(grid, self.config.depth)
    }

    fn evaluate_directions_with_depth(
        &mut self,
        grid: &Grid,
        max_depth: usize,
    ) -> ArrayVec<(Direction, f64), 4> {
        self.stats.searches += 1;
        self.stats.nodes += 1;
        let mut scores = ArrayVec::new();
        for direction in Direction::ALL {
            let outcome = slide(grid, direction);
            if !outcome.moved {
                continue;
            }
            // The slid grid is searched at the full horizon, starting with another slide.
            let score = self.agent_node(&outcome.grid, max_depth);
            scores.push((direction, score));
        }
        scores
    }

    fn agent_node(&mut self, grid: &Grid, depth: usize) -> f64 {
        self.stats.nodes += 1;
        if depth == 0 {
            return self.evaluator.evaluate(grid);
        }

        let mut best = None;
        for direction in Direction::ALL {
            let outcome = slide(grid, direction);
            if !outcome.moved {
                continue;
            }
            let score = self.chance_node(&outcome.grid, depth - 1);
            best = Some(best.map_or(score, |best: f64| best.max(score)));
        }
        best.unwrap_or_else(|| self.evaluator.evaluate(grid))
    }

    fn chance_node(&mut self, grid: &Grid, depth: usize) -> f64 {
        self.stats.nodes += 1;
        if depth == 0 {
            return self.evaluator.evaluate(grid);
        }

        let mut empty = grid.empty_cells();
        if empty.is_empty() {
            return self.evaluator.evaluate(grid);
        }
        let amount = self.config.sample_cells.min(empty.len());
        let (sampled, _) = empty.partial_shuffle(&mut self.rng, amount);

        let mut total = 0.0;
        for &pos in &*sampled {
            for (value, probability) in SPAWN_OUTCOMES {
                let mut child = *grid;
                child.set(pos, value);
                total += probability * self.agent_node(&child, depth - 1);
            }
        }
        #[expect(clippy::cast_precision_loss)]
        let count = sampled.len() as f64;
        total / count
    }
}

/// Direction with the strictly highest score; the earliest entry wins ties.
#[must_use]
pub fn best_direction(scores: &[(Direction, f64)]) -> Option<Direction> {
    let mut best: Option<(Direction, f64)> = None;
    for &(direction, score) in scores {
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((direction, score));
        }
    }
    best.map(|(direction, _)| direction)
}

#[cfg(test)]
mod tests {
    use oxid2048_engine::Position;
    use oxid2048_evaluator::{HeuristicEvaluator, HeuristicWeights};

    use super::*;

    fn searcher(config: SearchConfig, seed: u8) -> Searcher<'static> {
        Searcher::with_seed(
            Box::new(HeuristicEvaluator::default()),
            config,
            TileSeed::from_bytes([seed; 16]),
        )
    }

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    /// Evaluator that counts nothing but empty cells.
    #[derive(Debug)]
    struct EmptyCells;

    impl GridEvaluator for EmptyCells {
        fn evaluate(&self, grid: &Grid) -> f64 {
            #[expect(clippy::cast_precision_loss)]
            let empty = grid.count_empty() as f64;
            empty
        }
    }

    #[test]
    fn test_only_moving_direction_is_chosen() {
        // Column 0 is empty and no two neighbours match, so only Left changes the grid.
        let g = grid("0,2,4,8/0,4,8,16/0,8,16,32/0,16,32,64");
        for weights in [
            HeuristicWeights::default(),
            HeuristicWeights {
                monotonicity: -10.0,
                empty_tiles: -5.0,
                ..HeuristicWeights::default()
            },
        ] {
            let mut s = Searcher::with_seed(
                Box::new(HeuristicEvaluator::new(weights)),
                SearchConfig::default(),
                TileSeed::from_bytes([1; 16]),
            );
            assert_eq!(s.choose_direction(&g), Some(Direction::Left));
        }
    }

    #[test]
    fn test_terminal_grid_has_no_direction() {
        let mut s = searcher(SearchConfig::default(), 0);
        let g = grid("2,4,2,4/4,2,4,2/2,4,2,4/4,2,4,2");
        assert_eq!(s.choose_direction(&g), None);
        assert!(s.evaluate_directions(&g).is_empty());
    }

    #[test]
    fn test_same_seed_same_decision() {
        let g = grid("2,0,0,2/4,4,0,0/0,8,0,0/2,0,0,16");
        let mut a = searcher(SearchConfig::default(), 5);
        let mut b = searcher(SearchConfig::default(), 5);
        for _ in 0..5 {
            assert_eq!(a.choose_direction(&g), b.choose_direction(&g));
        }
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_node_count_is_bounded() {
        let config = SearchConfig::default();
        // root + 4 × agent(4), agent(d) = 1 + 4·chance(d-1), chance(d) = 1 + 6·agent(d-1)
        let bound = 1 + 4 * (1 + 4 * (1 + 6 * (1 + 4 * (1 + 6))));
        for text in [
            "0,0,0,0/0,0,0,0/0,0,0,0/0,0,0,2",
            "2,0,0,2/4,4,0,0/0,8,0,0/2,0,0,16",
            "2,4,8,16/0,0,0,0/0,0,0,0/0,0,0,0",
        ] {
            let mut s = searcher(config, 9);
            s.choose_direction(&grid(text));
            assert!(s.stats().nodes <= bound, "{} nodes for {text}", s.stats().nodes);
            assert_eq!(s.stats().searches, 1);
        }
    }

    #[test]
    fn test_best_direction_keeps_first_of_ties() {
        assert_eq!(best_direction(&[]), None);
        let scores = [
            (Direction::Right, 1.0),
            (Direction::Down, 3.0),
            (Direction::Left, 3.0),
        ];
        assert_eq!(best_direction(&scores), Some(Direction::Down));
    }

    #[test]
    fn test_search_leaves_grid_untouched() {
        let g = grid("2,0,0,2/4,4,0,0/0,8,0,0/2,0,0,16");
        let copy = g;
        searcher(SearchConfig::default(), 3).choose_direction(&g);
        assert_eq!(g, copy);
    }

    #[test]
    fn test_depth_one_looks_one_slide_past_the_root() {
        // At depth 1 each root slide is followed by the best second slide, without a spawn.
        // Left/Right leave two 4s in one column that a vertical slide merges: 15 empty cells.
        // Up/Down leave "2,2,0,4" in one row; the best follow-up merges the 2s: 14 empty cells.
        let mut s = Searcher::with_seed(
            Box::new(EmptyCells),
            SearchConfig::default(),
            TileSeed::from_bytes([2; 16]),
        );
        let g = grid("2,2,0,0/0,0,0,0/0,0,0,0/0,0,0,4");
        let scores = s.evaluate_directions_with_depth(&g, 1);
        assert_eq!(scores.len(), 4);
        for &(direction, score) in &scores {
            let expected = match direction {
                Direction::Left | Direction::Right => 15.0,
                Direction::Up | Direction::Down => 14.0,
            };
            assert!((score - expected).abs() < 1e-9, "{direction}: {score}");
        }
        // Right and Left tie; Right comes first in enumeration order.
        assert_eq!(s.choose_direction_with_depth(&g, 1), Some(Direction::Right));
    }

    #[test]
    fn test_root_children_search_the_full_horizon() {
        let evaluator = HeuristicEvaluator::default();
        let mut s = searcher(SearchConfig::default(), 6);
        let g = grid("2,0,0,2/4,4,0,0/0,8,0,0/2,0,0,16");
        for (direction, score) in s.evaluate_directions_with_depth(&g, 1) {
            let slid = slide(&g, direction).grid;
            let expected = Direction::ALL
                .into_iter()
                .map(|next| slide(&slid, next))
                .filter(|outcome| outcome.moved)
                .map(|outcome| evaluator.evaluate(&outcome.grid))
                .fold(f64::NEG_INFINITY, f64::max);
            assert!(
                (score - expected).abs() < 1e-9,
                "{direction}: {score} != {expected}"
            );
        }
    }

    #[test]
    fn test_chance_node_weights_spawns() {
        // With a single empty cell the chance node is exactly 0.9·V(2) + 0.1·V(4).
        let mut s = searcher(SearchConfig::default(), 4);
        let g = grid("2,4,8,16/32,64,128,256/512,1024,2,4/8,16,32,0");
        let evaluator = HeuristicEvaluator::default();
        let mut with_two = g;
        with_two.set(Position::new(3, 3), 2);
        let mut with_four = g;
        with_four.set(Position::new(3, 3), 4);
        let expected = 0.9 * evaluator.evaluate(&with_two) + 0.1 * evaluator.evaluate(&with_four);

        // depth 1: chance node -> agent leaves.
        let actual = s.chance_node(&g, 1);
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    #[should_panic(expected = "sample_cells must be positive")]
    fn test_zero_sample_cells_panics() {
        let _ = searcher(
            SearchConfig {
                depth: 2,
                sample_cells: 0,
            },
            0,
        );
    }
}
