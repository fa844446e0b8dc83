//! Lazily computed grid metrics shared by the heuristic features.
//!
//! Several features need the same derived values (tile exponents, the maximum tile, the number
//! of empty cells). [`GridAnalysis`] computes each of them at most once per grid, so evaluating
//! all features costs a single pass per metric.

use std::cell::OnceCell;

use oxid2048_engine::{Grid, MAX_CELLS, Position};

#[derive(Debug)]
pub struct GridAnalysis {
    grid: Grid,
    exponents: OnceCell<[u8; MAX_CELLS]>,
    max_tile: OnceCell<u32>,
    empty_count: OnceCell<usize>,
}

impl GridAnalysis {
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            grid: *grid,
            exponents: OnceCell::new(),
            max_tile: OnceCell::new(),
            empty_count: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    #[must_use]
    pub fn tile(&self, pos: Position) -> u32 {
        self.grid.get(pos)
    }

    /// Base-2 logarithm of the tile at `pos`, 0 for an empty cell.
    ///
    /// Tiles are powers of two, so the logarithm is exact.
    #[must_use]
    pub fn log2_tile(&self, pos: Position) -> f64 {
        let exponents = self.exponents.get_or_init(|| {
            let mut exponents = [0; MAX_CELLS];
            for pos in self.grid.positions() {
                let tile = self.grid.get(pos);
                if tile != 0 {
                    #[expect(clippy::cast_possible_truncation)]
                    let exponent = tile.trailing_zeros() as u8;
                    exponents[pos.linear_index()] = exponent;
                }
            }
            exponents
        });
        f64::from(exponents[pos.linear_index()])
    }

    #[must_use]
    pub fn max_tile(&self) -> u32 {
        *self.max_tile.get_or_init(|| self.grid.max_tile())
    }

    /// Base-2 logarithm of the largest tile, 0 for an empty grid.
    #[must_use]
    pub fn log2_max_tile(&self) -> f64 {
        match self.max_tile() {
            0 => 0.0,
            max => f64::from(max.trailing_zeros()),
        }
    }

    #[must_use]
    pub fn empty_count(&self) -> usize {
        *self.empty_count.get_or_init(|| self.grid.count_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log2_of_empty_cell_is_zero() {
        let analysis = GridAnalysis::from_grid(&Grid::empty(4));
        assert!(analysis.log2_tile(Position::new(0, 0)).abs() < f64::EPSILON);
        assert!(analysis.log2_max_tile().abs() < f64::EPSILON);
        assert_eq!(analysis.empty_count(), 16);
    }

    #[test]
    fn test_log2_is_exact_exponent() {
        let grid: Grid = "2,1024/0,65536".parse().unwrap();
        let analysis = GridAnalysis::from_grid(&grid);
        assert!((analysis.log2_tile(Position::new(0, 0)) - 1.0).abs() < f64::EPSILON);
        assert!((analysis.log2_tile(Position::new(0, 1)) - 10.0).abs() < f64::EPSILON);
        assert!((analysis.log2_max_tile() - 16.0).abs() < f64::EPSILON);
        assert_eq!(analysis.max_tile(), 65536);
        assert_eq!(analysis.empty_count(), 1);
    }
}
