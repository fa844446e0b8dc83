use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Direction, Grid, MergeSet, Position, can_merge};

/// Game variant.
///
/// All variants share the same slide and spawn rules; they differ only in grid size, in how
/// player input maps to a physical slide direction, and in whether tiles fall after a move.
///
/// | Mode | Grid | Controls | Gravity |
/// |---|---|---|---|
/// | `classic` | 4×4 | normal | no |
/// | `expanded` | 8×8 | normal | no |
/// | `reverse` | 4×4 | inverted | no |
/// | `gravity` | 4×4 | normal | after every non-`Down` input |
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    #[display("classic")]
    Classic,
    #[display("expanded")]
    Expanded,
    #[display("reverse")]
    Reverse,
    #[display("gravity")]
    Gravity,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown game mode {name:?} (expected classic, expanded, reverse or gravity)")]
pub struct ParseGameModeError {
    name: String,
}

impl GameMode {
    pub const ALL: [Self; 4] = [Self::Classic, Self::Expanded, Self::Reverse, Self::Gravity];

    #[must_use]
    pub const fn grid_size(self) -> usize {
        match self {
            Self::Expanded => 8,
            Self::Classic | Self::Reverse | Self::Gravity => 4,
        }
    }

    /// Maps a player input to the direction tiles actually slide.
    #[must_use]
    pub const fn physical_direction(self, input: Direction) -> Direction {
        match self {
            Self::Reverse => input.opposite(),
            Self::Classic | Self::Expanded | Self::Gravity => input,
        }
    }

    /// Maps a desired physical slide back to the input that produces it.
    #[must_use]
    pub const fn input_for(self, physical: Direction) -> Direction {
        // Inversion is its own inverse.
        self.physical_direction(physical)
    }

    /// Whether tiles fall toward the bottom edge after a slide in `physical` direction.
    #[must_use]
    pub fn applies_gravity(self, physical: Direction) -> bool {
        self == Self::Gravity && physical != Direction::Down
    }
}

impl FromStr for GameMode {
    type Err = ParseGameModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseGameModeError { name: s.to_owned() })
    }
}

/// Result of letting tiles fall in gravity mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GravityOutcome {
    pub moved: bool,
    pub score_gain: u64,
    pub merges: usize,
    /// Largest tile created by a gravity merge, 0 when nothing merged.
    pub highest_merge: u32,
}

/// Lets every tile fall toward the bottom row until the grid settles.
///
/// Rows are scanned bottom-up. A falling tile stops on the first occupied cell and merges into
/// it when the values are equal and that cell has not merged yet this turn (`merged` carries the
/// slide's merges in and collects the gravity merges). Scanning repeats until a full pass changes
/// nothing.
pub fn apply_gravity(grid: &mut Grid, merged: &mut MergeSet) -> GravityOutcome {
    let size = grid.size();
    let mut outcome = GravityOutcome::default();

    loop {
        let mut settled = true;
        for row in (0..size - 1).rev() {
            for col in 0..size {
                let tile = grid.get(Position::new(row, col));
                if tile == 0 {
                    continue;
                }

                let mut current = Position::new(row, col);
                while let Some(below) = grid
                    .neighbor(current, Direction::Down)
                    .filter(|below| grid.get(*below) == 0)
                {
                    grid.set(below, tile);
                    grid.set(current, 0);
                    current = below;
                    outcome.moved = true;
                    settled = false;
                }

                let Some(below) = grid.neighbor(current, Direction::Down) else {
                    continue;
                };
                if can_merge(tile) && grid.get(below) == tile && !merged.contains(below) {
                    let value = tile * 2;
                    grid.set(below, value);
                    grid.set(current, 0);
                    merged.insert(below);
                    outcome.score_gain += u64::from(value);
                    outcome.merges += 1;
                    outcome.highest_merge = outcome.highest_merge.max(value);
                    outcome.moved = true;
                    settled = false;
                }
            }
        }
        if settled {
            return outcome;
        }
    }
}
