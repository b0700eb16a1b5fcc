use thiserror::Error;

use super::grid::Grid;

pub const PATTERN_SIDE: usize = 3;
pub const PATTERN_COUNT: u16 = 512;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("pattern id {0} out of range (must be < 512)")]
    IdOutOfRange(u16),
    #[error("grid {rows}x{cols} cannot hold a 3x3 seed pattern")]
    GridTooSmall { rows: usize, cols: usize },
}

/// One of the 512 possible 3x3 binary seed patterns, identified by its
/// flattened row-major bits read as a 9-bit integer (first cell is the most
/// significant bit, so id 255 is `011111111`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPattern {
    id: u16,
}

impl SeedPattern {
    pub fn from_id(id: u16) -> Result<Self, SeedError> {
        if id >= PATTERN_COUNT {
            return Err(SeedError::IdOutOfRange(id));
        }
        Ok(Self { id })
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    /// Cell value at (row, col) within the 3x3 pattern.
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        let bit = row * PATTERN_SIDE + col;
        ((self.id >> (8 - bit)) & 1) as u8
    }

    /// All 512 patterns in id order.
    pub fn all() -> impl Iterator<Item = SeedPattern> {
        (0..PATTERN_COUNT).map(|id| SeedPattern { id })
    }

    /// Write the pattern into the geometric center of an all-dead grid.
    pub fn place_centered(&self, rows: usize, cols: usize) -> Result<Grid, SeedError> {
        if rows < PATTERN_SIDE || cols < PATTERN_SIDE {
            return Err(SeedError::GridTooSmall { rows, cols });
        }
        let mut grid = Grid::new_dead(rows, cols);
        let start_row = (rows - PATTERN_SIDE) / 2;
        let start_col = (cols - PATTERN_SIDE) / 2;
        for row in 0..PATTERN_SIDE {
            for col in 0..PATTERN_SIDE {
                grid.set(start_row + row, start_col + col, self.cell(row, col));
            }
        }
        Ok(grid)
    }
}
