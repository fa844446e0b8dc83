//! Game engine logic and state management.
//!
//! This module builds a playable game on top of the pure [`slide`](crate::slide) operation:
//!
//! - [`spawn`] / [`TileSpawner`] - Random tile insertion (2 with probability 0.9, else 4)
//! - [`TileSeed`] - Seed for deterministic tile spawning
//! - [`GameMode`] - Grid size, control mapping and gravity for each variant
//! - [`GameSession`] - Multi-turn game with score, win flag and game-over detection
//! - [`GameStats`] - Game statistics (score, moves, merges, max tile)
//!
//! # Game Flow
//!
//! 1. Start a [`GameSession`] from a seed: an empty grid receives two tiles
//! 2. Each input is mapped to a physical direction and the grid slides
//! 3. A moving slide spawns one tile; gravity mode then lets tiles fall
//! 4. The game ends once no slide can change the grid
//!
//! # Example
//!
//! ```
//! use oxid2048_engine::{Direction, GameMode, GameSession};
//!
//! let mut session = GameSession::new(GameMode::Classic);
//! while session.session_state().is_playing() {
//!     let moved = Direction::ALL
//!         .into_iter()
//!         .any(|dir| session.play(dir).moved);
//!     if !moved {
//!         break;
//!     }
//! }
//! println!("score: {}", session.score());
//! ```

pub use self::{game_session::*, game_stats::*, ruleset::*, spawner::*};

mod game_session;
mod game_stats;
mod ruleset;
mod spawner;
