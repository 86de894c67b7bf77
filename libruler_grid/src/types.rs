// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid cell coordinates and the shared cell mapping.

/// Discrete position on a grid.
///
/// Rows grow downwards (with `y`), columns grow rightwards (with `x`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCell {
    /// Row index.
    pub row: i32,
    /// Column index.
    pub col: i32,
}

impl GridCell {
    /// Create a cell from its row and column.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Chebyshev (king-move) distance between two cells.
    #[inline]
    pub fn chebyshev(self, other: Self) -> u32 {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr.max(dc)
    }
}

impl From<(i32, i32)> for GridCell {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// Shape of the grid laid over the measurement surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GridKind {
    /// No visible grid; positions are free-form.
    Gridless,
    /// Square cells.
    Square,
}

impl GridKind {
    /// Sampling spacer used when walking a ray over the grid.
    ///
    /// Square grids sample at `1.41` cell widths so a diagonal crossing of a
    /// single cell still produces one sample per cell.
    #[inline]
    pub const fn spacer(self) -> f64 {
        match self {
            Self::Square => 1.41,
            Self::Gridless => 1.0,
        }
    }
}

/// Map a coordinate to a cell coordinate along one axis.
///
/// Rounds towards -∞, so negative coordinates land in negative cells.
/// Values outside the `i32` range saturate.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
pub fn cell_coord(value: f64, origin: f64, cell_size: f64) -> i32 {
    debug_assert!(cell_size > 0.0, "grid cell_size must be strictly positive");
    let t = (value - origin) / cell_size;
    let coord = t as i32;

    // Round towards -∞ (the cast above has already truncated).
    if t < 0.0 && f64::from(coord) > t {
        coord.saturating_sub(1)
    } else {
        coord
    }
}
