use serde::{Deserialize, Serialize};

use crate::core::Grid;

/// Per-game statistics.
///
/// Tracks:
///
/// - **Score**: sum of the values of all tiles created by merges (slides and gravity)
/// - **Moves**: inputs that changed the grid
/// - **Merges**: number of merges performed
/// - **Max tile**: largest tile seen so far
///
/// # Example
///
/// ```
/// use oxid2048_engine::{GameStats, Grid};
///
/// let grid: Grid = "8,0/0,2".parse().unwrap();
/// let mut stats = GameStats::new();
/// stats.complete_turn(8, 1, &grid);
///
/// assert_eq!(stats.score(), 8);
/// assert_eq!(stats.moves(), 1);
/// assert_eq!(stats.max_tile(), 8);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: u64,
    moves: usize,
    merges: usize,
    max_tile: u32,
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            moves: 0,
            merges: 0,
            max_tile: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn moves(&self) -> usize {
        self.moves
    }

    #[must_use]
    pub const fn merges(&self) -> usize {
        self.merges
    }

    #[must_use]
    pub const fn max_tile(&self) -> u32 {
        self.max_tile
    }

    /// Records the initial grid so the max tile reflects the starting spawns.
    pub fn observe(&mut self, grid: &Grid) {
        self.max_tile = self.max_tile.max(grid.max_tile());
    }

    /// Updates statistics after an input that changed the grid.
    pub fn complete_turn(&mut self, score_gain: u64, merges: usize, grid: &Grid) {
        self.moves += 1;
        self.merges += merges;
        self.score += score_gain;
        self.observe(grid);
    }
}
