use arrayvec::ArrayVec;

use super::{
    direction::Direction,
    grid::{Grid, MAX_GRID_SIZE, Position, can_merge},
};

/// Set of cells that already received a merge during one slide.
///
/// Stored as a bitset over [`Position::linear_index`]; the fixed-stride layout keeps every
/// position of an 8×8 grid within 64 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSet {
    bits: u64,
}

impl MergeSet {
    #[inline]
    #[must_use]
    pub fn contains(self, pos: Position) -> bool {
        self.bits & (1 << pos.linear_index()) != 0
    }

    #[inline]
    pub fn insert(&mut self, pos: Position) {
        self.bits |= 1 << pos.linear_index();
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Iterates over the merged positions in row-major order.
    pub fn iter(self) -> impl Iterator<Item = Position> {
        let mut bits = self.bits;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Position::from_linear_index(index))
        })
    }
}

/// Result of sliding a grid in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideOutcome {
    /// Grid after translation and merges.
    pub grid: Grid,
    /// Whether any tile changed position or value.
    pub moved: bool,
    /// Sum of the values of all tiles created by merges.
    pub score_gain: u64,
    /// Destination cells of this slide's merges.
    pub merged: MergeSet,
}

/// Slides every tile of `grid` toward `direction`, merging equal neighbours.
///
/// Cells are scanned starting from the edge tiles move toward, so a chain of tiles resolves in a
/// single pass. A tile merges into the first occupied cell in its path when that cell holds the
/// same value and has not merged yet during this slide; otherwise it moves to the farthest empty
/// cell. The input grid is never modified.
///
/// # Example
///
/// ```
/// use oxid2048_engine::{Direction, Grid, slide};
///
/// let grid: Grid = "2,2,2,2/0,0,0,0/0,0,0,0/0,0,0,0".parse().unwrap();
/// let outcome = slide(&grid, Direction::Left);
/// assert!(outcome.moved);
/// assert_eq!(outcome.grid.row(0), &[4, 4, 0, 0]);
/// assert_eq!(outcome.score_gain, 8);
/// ```
#[must_use]
pub fn slide(grid: &Grid, direction: Direction) -> SlideOutcome {
    let mut grid = *grid;
    let (dx, dy) = direction.vector();
    let rows = traversal(grid.size(), dx);
    let cols = traversal(grid.size(), dy);

    let mut merged = MergeSet::default();
    let mut moved = false;
    let mut score_gain = 0;

    for &row in &rows {
        for &col in &cols {
            let source = Position::new(row, col);
            let tile = grid.get(source);
            if tile == 0 {
                continue;
            }

            let (farthest, next) = find_farthest_position(&grid, source, direction);
            let merge_target = next.filter(|next| {
                can_merge(tile) && grid.get(*next) == tile && !merged.contains(*next)
            });

            if let Some(target) = merge_target {
                let value = tile * 2;
                grid.set(target, value);
                grid.set(source, 0);
                merged.insert(target);
                score_gain += u64::from(value);
                moved = true;
            } else if farthest != source {
                grid.set(farthest, tile);
                grid.set(source, 0);
                moved = true;
            }
        }
    }

    SlideOutcome {
        grid,
        moved,
        score_gain,
        merged,
    }
}

/// Returns whether no slide can change `grid`: it has no empty cell and no two adjacent cells
/// hold equal values.
#[must_use]
pub fn is_terminal(grid: &Grid) -> bool {
    grid.is_full() && !grid.has_adjacent_equal()
}

/// Scan order along one axis: ascending, or descending when tiles travel toward the high end.
fn traversal(size: usize, component: isize) -> ArrayVec<usize, MAX_GRID_SIZE> {
    let mut order: ArrayVec<usize, MAX_GRID_SIZE> = (0..size).collect();
    if component == 1 {
        order.reverse();
    }
    order
}

/// Walks from `from` along `direction` over empty cells.
///
/// Returns the last empty cell reached (`from` itself when the first step is blocked) and the
/// first in-bounds cell beyond it, if any.
fn find_farthest_position(
    grid: &Grid,
    from: Position,
    direction: Direction,
) -> (Position, Option<Position>) {
    let mut farthest = from;
    loop {
        match grid.neighbor(farthest, direction) {
            Some(next) if grid.get(next) == 0 => farthest = next,
            next => return (farthest, next),
        }
    }
}
