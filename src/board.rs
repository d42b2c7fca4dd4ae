//! Board and piece data model: cells, grids, rigid pieces and positions.

use thiserror::Error;

/// Single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Cell {
    /// Outside the target silhouette.
    #[default]
    Empty,
    /// Part of the silhouette, not yet covered.
    Playable,
    /// Covered by a committed piece.
    Filled,
}

/// Board coordinate of a piece's local origin (row 0, col 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Spawn origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("piece has no occupied cells")]
    NoOccupiedCells,
}

/// Checks that `rows` is a non-empty rectangle and returns (width, height).
fn rectangle_dims<T>(rows: &[Vec<T>]) -> Result<(usize, usize), ShapeError> {
    let width = rows.first().map(Vec::len).ok_or(ShapeError::Empty)?;
    if width == 0 {
        return Err(ShapeError::Empty);
    }
    for (row, cells) in rows.iter().enumerate() {
        if cells.len() != width {
            return Err(ShapeError::RaggedRow {
                row,
                expected: width,
                found: cells.len(),
            });
        }
    }
    Ok((width, rows.len()))
}

/// Board: rows of cells, y=0 on top. Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// rows[y][x] = cell.
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, ShapeError> {
        let (width, height) = rectangle_dims(&rows)?;
        Ok(Self {
            width,
            height,
            rows,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at signed board coordinates; `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(slot) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Number of cells holding `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == cell)
            .count()
    }
}

/// Rigid piece in local coordinates (row 0 = top). Immutable: rotation builds a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    width: usize,
    height: usize,
    /// Row-major occupancy.
    cells: Vec<bool>,
}

impl Piece {
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, ShapeError> {
        let (width, height) = rectangle_dims(&rows)?;
        let cells: Vec<bool> = rows.into_iter().flatten().collect();
        if !cells.iter().any(|&c| c) {
            return Err(ShapeError::NoOccupiedCells);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }

    /// Occupied cells as (row, col).
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Quarter turn: an R×C piece becomes C×R with `out[c][R-1-r] = in[r][c]`.
    pub fn rotated(&self) -> Self {
        let (rows, cols) = (self.height, self.width);
        let mut cells = vec![false; rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                // Output is `rows` wide.
                cells[c * rows + (rows - 1 - r)] = self.cells[r * cols + c];
            }
        }
        Self {
            width: rows,
            height: cols,
            cells,
        }
    }
}

#[cfg(test)]
pub(crate) fn piece(rows: &[&str]) -> Piece {
    Piece::from_rows(
        rows.iter()
            .map(|r| r.chars().map(|c| c == '1').collect())
            .collect(),
    )
    .unwrap()
}

#[cfg(test)]
pub(crate) fn grid(rows: &[&str]) -> Grid {
    Grid::from_rows(
        rows.iter()
            .map(|r| {
                r.chars()
                    .map(|c| match c {
                        '1' => Cell::Playable,
                        'x' => Cell::Filled,
                        _ => Cell::Empty,
                    })
                    .collect()
            })
            .collect(),
    )
    .unwrap()
}
