use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::direction::Direction;

/// Smallest accepted grid side length.
pub const MIN_GRID_SIZE: usize = 2;
/// Largest accepted grid side length (the expanded mode uses 8×8).
pub const MAX_GRID_SIZE: usize = 8;
/// Number of cells in the backing storage.
///
/// Cells are stored row-major with a fixed stride of [`MAX_GRID_SIZE`], so a position maps to
/// the same linear index regardless of the grid size.
pub const MAX_CELLS: usize = MAX_GRID_SIZE * MAX_GRID_SIZE;

/// Error returned when a grid cannot be built from the given rows or text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridError {
    #[display("grid size {size} is out of range (2..=8)")]
    InvalidSize { size: usize },
    #[display("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("invalid tile value {value} at ({row}, {col}): must be 0 or a power of two >= 2")]
    InvalidTile { row: usize, col: usize, value: u32 },
    #[display("invalid cell {token:?} in grid text")]
    InvalidToken { token: String },
}

/// Largest tile a cell can hold. Tiles of this value never merge, since their sum would not fit.
pub const MAX_TILE: u32 = 1 << 31;

/// Returns whether `value` may be stored in a cell (0 for empty, otherwise a power of two ≥ 2).
#[inline]
#[must_use]
pub const fn is_valid_tile(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Returns whether two tiles of `value` merge when they meet.
#[inline]
#[must_use]
pub const fn can_merge(value: u32) -> bool {
    value != 0 && value < MAX_TILE
}

/// Cell coordinates inside a [`Grid`].
///
/// `row` is the x axis of a [`Direction`] vector and `col` the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Linear index in the fixed-stride cell storage.
    #[inline]
    #[must_use]
    pub const fn linear_index(self) -> usize {
        self.row * MAX_GRID_SIZE + self.col
    }

    /// Inverse of [`Self::linear_index`].
    #[inline]
    #[must_use]
    pub const fn from_linear_index(index: usize) -> Self {
        Self {
            row: index / MAX_GRID_SIZE,
            col: index % MAX_GRID_SIZE,
        }
    }

    /// Steps one cell along `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant; the upper bound is
    /// checked by [`Grid::neighbor`].
    #[inline]
    #[must_use]
    pub const fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.vector();
        let Some(row) = self.row.checked_add_signed(dx) else {
            return None;
        };
        let Some(col) = self.col.checked_add_signed(dy) else {
            return None;
        };
        Some(Self { row, col })
    }
}

/// Square grid of power-of-two tiles, `0` meaning empty.
///
/// `Grid` is a plain `Copy` value: every operation that produces a new state works on its own
/// copy, so search branches can never observe each other's edits.
///
/// # Example
///
/// ```
/// use oxid2048_engine::{Grid, Position};
///
/// let mut grid = Grid::empty(4);
/// grid.set(Position::new(0, 0), 2);
/// assert_eq!(grid.get(Position::new(0, 0)), 2);
/// assert_eq!(grid.count_empty(), 15);
///
/// let parsed: Grid = "2,0,0,0/0,0,0,0/0,0,0,0/0,0,0,0".parse().unwrap();
/// assert_eq!(parsed, grid);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    size: u8,
    cells: [u32; MAX_CELLS],
}

impl Grid {
    /// Creates an all-empty grid with side length `size`.
    ///
    /// # Panics
    ///
    /// Panics if `size` is outside `MIN_GRID_SIZE..=MAX_GRID_SIZE`.
    #[must_use]
    pub fn empty(size: usize) -> Self {
        assert!(
            (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size),
            "grid size {size} is out of range"
        );
        Self {
            size: u8::try_from(size).unwrap(),
            cells: [0; MAX_CELLS],
        }
    }

    /// Builds a grid from a square list of rows, validating every tile.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[u32]>,
    {
        let size = rows.len();
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(GridError::InvalidSize { size });
        }
        let mut grid = Self::empty(size);
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != size {
                return Err(GridError::RaggedRow {
                    row,
                    len: cells.len(),
                    expected: size,
                });
            }
            for (col, &value) in cells.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(GridError::InvalidTile { row, col, value });
                }
                grid.cells[Position::new(row, col).linear_index()] = value;
            }
        }
        Ok(grid)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        usize::from(self.size)
    }

    /// Bounds predicate used before every cell access.
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size() && pos.col < self.size()
    }

    /// Returns the tile at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid. Out-of-bounds access is a logic error.
    #[inline]
    #[must_use]
    pub fn get(&self, pos: Position) -> u32 {
        assert!(self.contains(pos), "position {pos} is outside the grid");
        self.cells[pos.linear_index()]
    }

    /// Like [`Self::get`], but returns `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn try_get(&self, pos: Position) -> Option<u32> {
        self.contains(pos).then(|| self.cells[pos.linear_index()])
    }

    /// Stores `value` at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid or `value` is neither 0 nor a power of two ≥ 2.
    #[inline]
    pub fn set(&mut self, pos: Position, value: u32) {
        assert!(self.contains(pos), "position {pos} is outside the grid");
        assert!(is_valid_tile(value), "invalid tile value {value} at {pos}");
        self.cells[pos.linear_index()] = value;
    }

    /// Returns the in-bounds neighbour of `pos` along `direction`.
    #[inline]
    #[must_use]
    pub fn neighbor(&self, pos: Position, direction: Direction) -> Option<Position> {
        pos.step(direction).filter(|next| self.contains(*next))
    }

    /// Iterates over all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let size = self.size();
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    /// Returns row `row` as a slice of `size` cells.
    #[must_use]
    pub fn row(&self, row: usize) -> &[u32] {
        assert!(row < self.size(), "row {row} is outside the grid");
        let start = row * MAX_GRID_SIZE;
        &self.cells[start..start + self.size()]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        (0..self.size()).map(|row| self.row(row))
    }

    pub fn tiles(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows().flatten().copied()
    }

    /// Positions of all empty cells, in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> ArrayVec<Position, MAX_CELLS> {
        self.positions().filter(|pos| self.get(*pos) == 0).collect()
    }

    #[must_use]
    pub fn count_empty(&self) -> usize {
        self.tiles().filter(|&v| v == 0).count()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.tiles().all(|v| v != 0)
    }

    /// Largest tile on the grid, 0 when the grid is empty.
    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.tiles().max().unwrap_or(0)
    }

    #[must_use]
    pub fn tile_sum(&self) -> u64 {
        self.tiles().map(u64::from).sum()
    }

    /// The four corner positions: top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub fn corners(&self) -> [Position; 4] {
        let last = self.size() - 1;
        [
            Position::new(0, 0),
            Position::new(0, last),
            Position::new(last, 0),
            Position::new(last, last),
        ]
    }

    /// Iterates over every horizontally (right) and vertically (down) adjacent pair once.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.positions().flat_map(move |pos| {
            [Direction::Right, Direction::Down]
                .into_iter()
                .filter_map(move |dir| self.neighbor(pos, dir).map(|next| (pos, next)))
        })
    }

    /// Whether any two adjacent cells hold the same value and would merge.
    #[must_use]
    pub fn has_adjacent_equal(&self) -> bool {
        self.adjacent_pairs().any(|(a, b)| {
            let value = self.get(a);
            can_merge(value) && value == self.get(b)
        })
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

/// Renders the grid as right-aligned columns with `.` for empty cells.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_tile().max(1).to_string().len();
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, &value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                if value == 0 {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{value:>width$}")?;
                }
            }
        }
        Ok(())
    }
}

/// Parses rows separated by `/`, `;` or newlines, and cells separated by commas or whitespace.
///
/// `.` and `0` denote empty cells.
impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .split(['/', ';', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .map(|token| match token {
                        "." => Ok(0),
                        _ => token.parse::<u32>().map_err(|_| GridError::InvalidToken {
                            token: token.to_owned(),
                        }),
                    })
                    .collect::<Result<Vec<u32>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(&rows)
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.rows())
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<u32>>::deserialize(deserializer)?;
        Self::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid() {
        for size in [4, 8] {
            let grid = Grid::empty(size);
            assert_eq!(grid.size(), size);
            assert_eq!(grid.count_empty(), size * size);
            assert_eq!(grid.max_tile(), 0);
            assert!(!grid.is_full());
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_empty_grid_rejects_oversized() {
        let _ = Grid::empty(MAX_GRID_SIZE + 1);
    }

    #[test]
    fn test_from_rows_validates_tiles() {
        let err = Grid::from_rows(&[[2_u32, 3], [0, 0]]).unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidTile {
                row: 0,
                col: 1,
                value: 3
            }
        );

        let err = Grid::from_rows(&[[1_u32, 0], [0, 0]]).unwrap_err();
        assert!(matches!(err, GridError::InvalidTile { value: 1, .. }));
    }

    #[test]
    fn test_from_rows_rejects_ragged_and_bad_sizes() {
        let err = Grid::from_rows(&[vec![0_u32, 0], vec![0]]).unwrap_err();
        assert!(matches!(err, GridError::RaggedRow { row: 1, len: 1, .. }));

        let err = Grid::from_rows(&[[0_u32]]).unwrap_err();
        assert_eq!(err, GridError::InvalidSize { size: 1 });
    }

    #[test]
    #[should_panic(expected = "outside the grid")]
    fn test_get_out_of_bounds_panics() {
        let grid = Grid::empty(4);
        let _ = grid.get(Position::new(4, 0));
    }

    #[test]
    #[should_panic(expected = "invalid tile value")]
    fn test_set_rejects_non_power_of_two() {
        let mut grid = Grid::empty(4);
        grid.set(Position::new(0, 0), 6);
    }

    #[test]
    fn test_try_get_and_neighbor() {
        let grid: Grid = "2 4 / 8 16".parse().unwrap();
        assert_eq!(grid.try_get(Position::new(1, 1)), Some(16));
        assert_eq!(grid.try_get(Position::new(2, 0)), None);

        let origin = Position::new(0, 0);
        assert_eq!(grid.neighbor(origin, Direction::Up), None);
        assert_eq!(grid.neighbor(origin, Direction::Left), None);
        assert_eq!(
            grid.neighbor(origin, Direction::Down),
            Some(Position::new(1, 0))
        );
        assert_eq!(grid.neighbor(Position::new(1, 1), Direction::Right), None);
    }

    #[test]
    fn test_parse_and_display() {
        let grid: Grid = "2,0,0,4\n0,0,.,0\n0,0,0,0\n1024,0,0,2".parse().unwrap();
        assert_eq!(grid.get(Position::new(0, 3)), 4);
        assert_eq!(grid.get(Position::new(3, 0)), 1024);
        assert_eq!(
            grid.to_string(),
            "   2    .    .    4\n   .    .    .    .\n   .    .    .    .\n1024    .    .    2"
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = "2,x/0,0".parse::<Grid>().unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidToken {
                token: "x".to_owned()
            }
        );
    }

    #[test]
    fn test_empty_cells_and_corners() {
        let grid: Grid = "2,2,2/2,0,2/2,2,0".parse().unwrap();
        assert_eq!(
            grid.empty_cells().as_slice(),
            &[Position::new(1, 1), Position::new(2, 2)]
        );
        assert_eq!(
            grid.corners(),
            [
                Position::new(0, 0),
                Position::new(0, 2),
                Position::new(2, 0),
                Position::new(2, 2)
            ]
        );
    }

    #[test]
    fn test_has_adjacent_equal_ignores_empty_pairs() {
        let grid: Grid = "2,4/0,0".parse().unwrap();
        assert!(!grid.has_adjacent_equal());
        let grid: Grid = "2,4/8,4".parse().unwrap();
        assert!(grid.has_adjacent_equal());
    }

    #[test]
    fn test_linear_index_roundtrip_covers_bitset_range() {
        let last = Position::new(MAX_GRID_SIZE - 1, MAX_GRID_SIZE - 1);
        assert_eq!(last.linear_index(), 63);
        assert_eq!(Position::from_linear_index(last.linear_index()), last);
    }

    #[test]
    fn test_grid_serialization() {
        let grid: Grid = "2,0/0,4".parse().unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[2,0],[0,4]]");
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);

        let result: Result<Grid, _> = serde_json::from_str("[[3,0],[0,0]]");
        assert!(result.unwrap_err().to_string().contains("invalid tile value"));
    }
}
