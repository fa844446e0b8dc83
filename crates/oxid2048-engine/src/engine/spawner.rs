use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::IndexedRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{Grid, Position};

/// Probability that a spawned tile is a 2 (otherwise it is a 4).
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Inserts one tile into a uniformly chosen empty cell of `grid`.
///
/// The new tile is 2 with probability [`SPAWN_TWO_PROBABILITY`], else 4. Returns the filled
/// position, or `None` (leaving the grid untouched) when the grid is full.
///
/// # Example
///
/// ```
/// use oxid2048_engine::{Grid, Position, spawn};
///
/// let mut grid: Grid = "2,4/8,0".parse().unwrap();
/// let pos = spawn(&mut grid, &mut rand::rng());
/// assert_eq!(pos, Some(Position::new(1, 1)));
/// assert!(matches!(grid.get(Position::new(1, 1)), 2 | 4));
/// assert_eq!(spawn(&mut grid, &mut rand::rng()), None);
/// ```
pub fn spawn<R>(grid: &mut Grid, rng: &mut R) -> Option<Position>
where
    R: Rng + ?Sized,
{
    let empty = grid.empty_cells();
    let &pos = empty.choose(rng)?;
    let value = if rng.random_bool(SPAWN_TWO_PROBABILITY) {
        2
    } else {
        4
    };
    grid.set(pos, value);
    Some(pos)
}

/// Seed for deterministic tile spawning.
///
/// A 128-bit seed for the [`Pcg32`] generator behind [`TileSpawner`]. The same seed yields the
/// same sequence of spawns for the same sequence of moves, which makes games reproducible.
/// Serialized and parsed as a 32-character hex string.
///
/// # Example
///
/// ```
/// use oxid2048_engine::TileSeed;
/// use rand::Rng as _;
///
/// let seed: TileSeed = rand::rng().random();
/// let parsed: TileSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex: {reason}")]
pub struct ParseTileSeedError {
    reason: String,
}

impl TileSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for TileSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for TileSeed {
    type Err = ParseTileSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseTileSeedError {
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseTileSeedError {
            reason: format!("{s} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for TileSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TileSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `TileSeed` values with `rng.random()`.
impl Distribution<TileSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TileSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        TileSeed(seed)
    }
}

/// Seeded source of spawned tiles for an authoritative game.
#[derive(Debug, Clone)]
pub struct TileSpawner {
    rng: Pcg32,
}

impl Default for TileSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSpawner {
    /// Creates a spawner seeded from the thread-local generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: TileSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// See [`spawn`].
    pub fn spawn(&mut self, grid: &mut Grid) -> Option<Position> {
        spawn(grid, &mut self.rng)
    }
}
