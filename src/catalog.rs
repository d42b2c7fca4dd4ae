//! Board file parsing and the piece catalog.
//!
//! A board file holds the target shape as rows of `0`/`1`, a blank line, then
//! the piece variants, each a block of `0`/`1` rows separated by blank lines:
//!
//! ```text
//! 01110
//! 01010
//! 01110
//!
//! 11
//! 10
//!
//! 111
//! 010
//! ```

use crate::board::{Cell, Grid, Piece, ShapeError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use thiserror::Error;

/// Built-in ring board used when no file is given.
pub const DEFAULT_BOARD: &str = include_str!("../boards/ring.txt");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: unexpected character {ch:?} (expected '0' or '1')")]
    InvalidChar { line: usize, ch: char },
    #[error("board file has no shape")]
    MissingShape,
    #[error("board file defines no pieces")]
    NoPieces,
    #[error("invalid shape: {0}")]
    Shape(#[source] ShapeError),
    #[error("invalid piece #{index}: {source}")]
    Piece {
        index: usize,
        #[source]
        source: ShapeError,
    },
}

/// Immutable target shape plus the non-empty list of piece variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    shape: Grid,
    variants: Vec<Piece>,
}

impl Catalog {
    pub fn new(shape: Grid, variants: Vec<Piece>) -> Result<Self, CatalogError> {
        if variants.is_empty() {
            return Err(CatalogError::NoPieces);
        }
        Ok(Self { shape, variants })
    }

    /// Parse board text. With `merge`, every 2×2 block of raw cells collapses into one
    /// logical cell that is set if any of the four is set.
    pub fn parse(text: &str, merge: bool) -> Result<Self, CatalogError> {
        let mut blocks = split_blocks(text)?.into_iter();
        let shape_rows = blocks.next().ok_or(CatalogError::MissingShape)?;
        let shape_rows = if merge {
            merge_blocks(&shape_rows)
        } else {
            shape_rows
        };
        let shape = Grid::from_rows(
            shape_rows
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|set| if set { Cell::Playable } else { Cell::Empty })
                        .collect()
                })
                .collect(),
        )
        .map_err(CatalogError::Shape)?;

        let variants = blocks
            .enumerate()
            .map(|(index, rows)| {
                let rows = if merge { merge_blocks(&rows) } else { rows };
                Piece::from_rows(rows).map_err(|source| CatalogError::Piece { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(shape, variants)
    }

    pub fn load(path: &Path, merge: bool) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, merge)
    }

    #[inline]
    pub fn shape(&self) -> &Grid {
        &self.shape
    }

    #[inline]
    pub fn variants(&self) -> &[Piece] {
        &self.variants
    }
}

/// Split into blank-line separated blocks of binary rows. Runs of blank lines count once.
fn split_blocks(text: &str) -> Result<Vec<Vec<Vec<bool>>>, CatalogError> {
    let mut blocks = Vec::new();
    let mut current: Vec<Vec<bool>> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        let row = line
            .chars()
            .map(|ch| match ch {
                '1' => Ok(true),
                '0' => Ok(false),
                _ => Err(CatalogError::InvalidChar { line: i + 1, ch }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        current.push(row);
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    Ok(blocks)
}

/// OR-reduce each 2×2 block; odd trailing rows/columns are padded with unset cells.
fn merge_blocks(rows: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let raw = |y: usize, x: usize| rows.get(y).and_then(|r| r.get(x)).copied().unwrap_or(false);
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..rows.len().div_ceil(2))
        .map(|y| {
            (0..width.div_ceil(2))
                .map(|x| {
                    let (ry, rx) = (y * 2, x * 2);
                    raw(ry, rx) || raw(ry, rx + 1) || raw(ry + 1, rx) || raw(ry + 1, rx + 1)
                })
                .collect()
        })
        .collect()
}

/// Chooses which catalog variant to offer next.
pub trait PiecePicker: std::fmt::Debug {
    /// Index into a catalog of `len` variants; `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random choice over the catalog.
#[derive(Debug, Clone)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PiecePicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Offers variants in catalog order, wrapping around.
#[derive(Debug, Clone, Default)]
pub struct CyclePicker {
    next: usize,
}

impl PiecePicker for CyclePicker {
    fn pick(&mut self, len: usize) -> usize {
        let i = self.next % len;
        self.next = i + 1;
        i
    }
}
