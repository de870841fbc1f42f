use crate::error::{MapError, Result};

/// Dense boolean walkability grid.
///
/// `x` grows east and `y` grows north, so `(0, 0)` is the south-west cell.
/// Cells are stored column-major, bottom-to-top: the cell at `(x, y)` lives
/// at index `x * height + y`, the order the run-length codec serializes in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkabilityGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl WalkabilityGrid {
    /// Grid of the given size with every cell set to `walkable`.
    pub fn filled(width: usize, height: usize, walkable: bool) -> Self {
        Self { width, height, cells: vec![walkable; width * height] }
    }

    /// Wrap a flat column-major, bottom-to-top buffer.
    pub fn from_column_major(width: usize, height: usize, cells: Vec<bool>) -> Result<Self> {
        let expected = width * height;
        if cells.len() != expected {
            return Err(MapError::LengthMismatch { expected, actual: cells.len() });
        }
        Ok(Self { width, height, cells })
    }

    /// Build from rows listed north to south, the way a text layout reads.
    pub fn from_rows_north_first(rows: &[Vec<bool>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MapError::IrregularLayout { line: i + 1, length: row.len(), expected: width });
            }
        }
        let mut grid = Self::filled(width, height, false);
        for (i, row) in rows.iter().enumerate() {
            let y = height - 1 - i;
            for (x, &walkable) in row.iter().enumerate() {
                grid.set(x, y, walkable);
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn len(&self) -> usize { self.cells.len() }
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) outside {}x{}", self.width, self.height);
        x * self.height + y
    }

    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x < self.width && y < self.height {
            Some(self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Panics when `(x, y)` is out of bounds.
    pub fn is_walkable(&self, x: usize, y: usize) -> bool {
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, walkable: bool) {
        let i = self.index(x, y);
        self.cells[i] = walkable;
    }

    /// Flat view in serialization order.
    pub fn as_column_major(&self) -> &[bool] {
        &self.cells
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Rows from the north edge down, for display.
    pub fn rows_north_first(&self) -> impl Iterator<Item = Vec<bool>> + '_ {
        (0..self.height).rev().map(move |y| (0..self.width).map(|x| self.is_walkable(x, y)).collect())
    }
}
