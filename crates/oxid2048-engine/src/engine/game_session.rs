use crate::core::{Direction, Grid, Position, is_terminal, slide};

use super::{
    GameStats,
    ruleset::{GameMode, apply_gravity},
    spawner::{TileSeed, TileSpawner},
};

/// Tile value that wins the game when first created by a merge.
pub const WINNING_TILE: u32 = 2048;

/// Number of tiles placed on an empty grid when a game starts.
const INITIAL_TILES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{actual}x{actual} grid does not fit {mode} mode (expected {expected}x{expected})")]
pub struct GridModeMismatchError {
    mode: GameMode,
    actual: usize,
    expected: usize,
}

/// What a single input did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Direction tiles actually slid after the mode's input mapping.
    pub physical: Direction,
    /// Whether the slide or gravity changed the grid.
    pub moved: bool,
    pub score_gain: u64,
    pub merges: usize,
    /// Cell filled after a moving slide.
    pub spawned: Option<Position>,
    /// Set on the turn that first creates a [`WINNING_TILE`].
    pub reached_win: bool,
}

impl TurnOutcome {
    const fn unchanged(physical: Direction) -> Self {
        Self {
            physical,
            moved: false,
            score_gain: 0,
            merges: 0,
            spawned: None,
            reached_win: false,
        }
    }
}

/// Authoritative game: owns the grid, the spawner and the score.
///
/// Every turn maps the input through the [`GameMode`], slides, spawns one tile when the slide
/// moved, lets tiles fall in gravity mode and finally checks for game over.
///
/// # Example
///
/// ```
/// use oxid2048_engine::{Direction, GameMode, GameSession, TileSeed};
///
/// let mut session = GameSession::with_seed(GameMode::Classic, TileSeed::from_bytes([1; 16]));
/// assert_eq!(session.grid().count_empty(), 14);
///
/// for dir in Direction::ALL {
///     session.play(dir);
/// }
/// assert!(session.stats().moves() >= 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    mode: GameMode,
    seed: TileSeed,
    grid: Grid,
    spawner: TileSpawner,
    stats: GameStats,
    state: SessionState,
    won: bool,
}

impl GameSession {
    /// Starts a game with a random seed.
    #[must_use]
    pub fn new(mode: GameMode) -> Self {
        Self::with_seed(mode, rand::random())
    }

    /// Starts a game on an empty grid of the mode's size with two spawned tiles.
    #[must_use]
    pub fn with_seed(mode: GameMode, seed: TileSeed) -> Self {
        let mut spawner = TileSpawner::with_seed(seed);
        let mut grid = Grid::empty(mode.grid_size());
        for _ in 0..INITIAL_TILES {
            spawner.spawn(&mut grid);
        }
        Self::start(mode, seed, grid, spawner)
    }

    /// Resumes a game from an existing grid.
    pub fn from_grid(
        mode: GameMode,
        grid: Grid,
        seed: TileSeed,
    ) -> Result<Self, GridModeMismatchError> {
        let expected = mode.grid_size();
        if grid.size() != expected {
            return Err(GridModeMismatchError {
                mode,
                actual: grid.size(),
                expected,
            });
        }
        Ok(Self::start(mode, seed, grid, TileSpawner::with_seed(seed)))
    }

    fn start(mode: GameMode, seed: TileSeed, grid: Grid, spawner: TileSpawner) -> Self {
        let mut stats = GameStats::new();
        stats.observe(&grid);
        let state = if is_terminal(&grid) {
            SessionState::GameOver
        } else {
            SessionState::Playing
        };
        Self {
            mode,
            seed,
            grid,
            spawner,
            stats,
            state,
            won: false,
        }
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn seed(&self) -> TileSeed {
        self.seed
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn won(&self) -> bool {
        self.won
    }

    /// Applies one player input.
    ///
    /// Does nothing once the game is over.
    pub fn play(&mut self, input: Direction) -> TurnOutcome {
        let physical = self.mode.physical_direction(input);
        if self.state.is_game_over() {
            return TurnOutcome::unchanged(physical);
        }

        let slid = slide(&self.grid, physical);
        let mut outcome = TurnOutcome {
            moved: slid.moved,
            score_gain: slid.score_gain,
            merges: slid.merged.len(),
            ..TurnOutcome::unchanged(physical)
        };
        let mut highest_merge = slid
            .merged
            .iter()
            .map(|pos| slid.grid.get(pos))
            .max()
            .unwrap_or(0);
        let mut merged = slid.merged;
        self.grid = slid.grid;

        if slid.moved {
            outcome.spawned = self.spawner.spawn(&mut self.grid);
        }

        // Tiles fall even when the slide itself was blocked.
        if self.mode.applies_gravity(physical) {
            let gravity = apply_gravity(&mut self.grid, &mut merged);
            outcome.moved |= gravity.moved;
            outcome.score_gain += gravity.score_gain;
            outcome.merges += gravity.merges;
            highest_merge = highest_merge.max(gravity.highest_merge);
        }

        if outcome.moved {
            self.stats
                .complete_turn(outcome.score_gain, outcome.merges, &self.grid);
        }
        if !self.won && highest_merge >= WINNING_TILE {
            self.won = true;
            outcome.reached_win = true;
        }
        if is_terminal(&self.grid) {
            self.state = SessionState::GameOver;
        }
        outcome
    }
}
