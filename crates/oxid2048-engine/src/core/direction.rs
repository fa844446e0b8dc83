use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four slide directions.
///
/// Each direction maps to a unit vector `(dx, dy)` where `dx` moves along rows and `dy` along
/// columns: `Up = (-1, 0)`, `Down = (1, 0)`, `Left = (0, -1)`, `Right = (0, 1)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[display("up")]
    Up,
    #[display("right")]
    Right,
    #[display("down")]
    Down,
    #[display("left")]
    Left,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid direction {token:?} (expected up, down, left or right)")]
pub struct ParseDirectionError {
    token: String,
}

impl Direction {
    /// All directions in search enumeration order.
    ///
    /// Ties between equally scored directions are resolved in this order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    #[inline]
    #[must_use]
    pub const fn vector(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Accepts `up`/`down`/`left`/`right` (any case), the initials `u`/`d`/`l`/`r`, and arrow key
/// names such as `ArrowUp`. Unknown tokens are rejected rather than mapped to a no-op.
impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let name = token.strip_prefix("arrow").unwrap_or(&token);
        match name {
            "up" | "u" => Ok(Self::Up),
            "down" | "d" => Ok(Self::Down),
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            _ => Err(ParseDirectionError {
                token: s.to_owned(),
            }),
        }
    }
}
