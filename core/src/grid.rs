//! Nibble-packed 2D cell storage.
//!
//! Tile games (maze fog-of-war, falling-block boards, territory fills) keep
//! one small state per cell. Packing two 4-bit cells per byte halves their
//! footprint, which matters on the microcontroller target.
//!
//! Cell (r, c) lives at linear index `r * cols + c`, in byte `index / 2`.
//! Even indices use the low nibble, odd indices the high nibble.

use std::fmt;

/// Largest value a cell can hold.
pub const MAX_CELL: u8 = 0x0F;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// (row, col) lies outside the grid.
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Value does not fit in 4 bits.
    ValueOutOfRange(u8),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                row,
                col,
                rows,
                cols,
            } => write!(f, "cell ({row}, {col}) outside {rows}x{cols} grid"),
            Self::ValueOutOfRange(v) => write!(f, "cell value {v} exceeds {MAX_CELL}"),
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Clone, PartialEq, Eq)]
pub struct PackedGrid {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl PackedGrid {
    /// Create a grid with every cell zero. Dimensions are fixed for life.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0u8; (rows * cols).div_ceil(2)],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells (rows × cols).
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Backing bytes, two cells per byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Read a cell.
    pub fn get(&self, row: usize, col: usize) -> Result<u8, GridError> {
        let i = self.index(row, col)?;
        let byte = self.data[i / 2];
        Ok(if i & 1 == 0 { byte & 0x0F } else { byte >> 4 })
    }

    /// Write a cell, leaving the other nibble of its byte untouched.
    ///
    /// Fails without modifying the grid if the cell is out of bounds or
    /// `value` exceeds [`MAX_CELL`].
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<(), GridError> {
        if value > MAX_CELL {
            return Err(GridError::ValueOutOfRange(value));
        }
        let i = self.index(row, col)?;
        let byte = &mut self.data[i / 2];
        *byte = if i & 1 == 0 {
            (*byte & 0xF0) | value
        } else {
            (*byte & 0x0F) | (value << 4)
        };
        Ok(())
    }

    /// Set every cell to `value` in one pass over the bytes.
    pub fn fill(&mut self, value: u8) -> Result<(), GridError> {
        if value > MAX_CELL {
            return Err(GridError::ValueOutOfRange(value));
        }
        self.data.fill(value | (value << 4));
        Ok(())
    }

    /// Number of cells currently holding `value`.
    pub fn count(&self, value: u8) -> usize {
        if value > MAX_CELL {
            return 0;
        }
        let cells = self.len();
        let mut n = 0;
        for (b, &byte) in self.data.iter().enumerate() {
            if byte & 0x0F == value {
                n += 1;
            }
            // An odd cell count leaves the last high nibble unused.
            if b * 2 + 1 < cells && byte >> 4 == value {
                n += 1;
            }
        }
        n
    }
}

impl fmt::Debug for PackedGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PackedGrid {}x{}", self.rows, self.cols)?;
        for r in 0..self.rows {
            for c in 0..self.cols {
                let v = self.get(r, c).map_err(|_| fmt::Error)?;
                write!(f, "{v:X}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
