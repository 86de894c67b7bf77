// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection between surface coordinates and grid cells.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Size, Vec2};

use crate::types::{GridCell, GridKind, cell_coord};

/// Coordinate projection between the measurement surface and its grid.
///
/// Implementations must be deterministic: the same point always maps to the
/// same cell, and [`grid_to_pixels`](Self::grid_to_pixels) followed by
/// [`pixels_to_grid`](Self::pixels_to_grid) returns the original cell.
pub trait GridProjection {
    /// Shape of the grid.
    fn kind(&self) -> GridKind;

    /// Pixel size of one grid cell.
    fn cell_size(&self) -> Size;

    /// Cell containing `point`.
    fn pixels_to_grid(&self, point: Point) -> GridCell;

    /// Top-left pixel corner of `cell`.
    fn grid_to_pixels(&self, cell: GridCell) -> Point;

    /// Canonical snapped position for `point`: the centre of its cell on
    /// gridded surfaces.
    fn center(&self, point: Point) -> Point;

    /// Nearest grid vertex to `point`.
    ///
    /// Gridless surfaces return `point` unchanged.
    fn nearest_vertex(&self, point: Point) -> Point {
        point
    }

    /// Top-left corner of the cell containing `point`.
    fn top_left(&self, point: Point) -> Point {
        self.grid_to_pixels(self.pixels_to_grid(point))
    }

    /// Whether two cells touch, including diagonally.
    fn is_neighbor(&self, a: GridCell, b: GridCell) -> bool {
        a.chebyshev(b) <= 1
    }
}

/// A square grid with a uniform cell size and an origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SquareGrid {
    size: f64,
    origin: Point,
}

impl SquareGrid {
    /// Create a square grid with the given cell size and origin at (0, 0).
    pub fn new(size: f64) -> Self {
        debug_assert!(size > 0.0, "cell size must be strictly positive");
        Self {
            size,
            origin: Point::ZERO,
        }
    }

    /// Create a square grid with the given cell size and origin.
    pub fn with_origin(size: f64, origin: Point) -> Self {
        debug_assert!(size > 0.0, "cell size must be strictly positive");
        Self { size, origin }
    }

    /// Pixel size of one cell edge.
    pub fn size(&self) -> f64 {
        self.size
    }
}

impl GridProjection for SquareGrid {
    fn kind(&self) -> GridKind {
        GridKind::Square
    }

    fn cell_size(&self) -> Size {
        Size::new(self.size, self.size)
    }

    fn pixels_to_grid(&self, point: Point) -> GridCell {
        GridCell::new(
            cell_coord(point.y, self.origin.y, self.size),
            cell_coord(point.x, self.origin.x, self.size),
        )
    }

    fn grid_to_pixels(&self, cell: GridCell) -> Point {
        Point::new(
            self.origin.x + f64::from(cell.col) * self.size,
            self.origin.y + f64::from(cell.row) * self.size,
        )
    }

    fn center(&self, point: Point) -> Point {
        let half = self.size / 2.0;
        self.top_left(point) + Vec2::new(half, half)
    }

    fn nearest_vertex(&self, point: Point) -> Point {
        let snap = |v: f64, o: f64| o + ((v - o) / self.size).round() * self.size;
        Point::new(snap(point.x, self.origin.x), snap(point.y, self.origin.y))
    }
}

/// A surface without a visible grid.
///
/// Points are never snapped. Cells of `size` are still defined so that rays
/// can be sampled for highlighting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gridless {
    size: f64,
}

impl Gridless {
    /// Create a gridless surface with the given nominal cell size.
    pub fn new(size: f64) -> Self {
        debug_assert!(size > 0.0, "cell size must be strictly positive");
        Self { size }
    }
}

impl GridProjection for Gridless {
    fn kind(&self) -> GridKind {
        GridKind::Gridless
    }

    fn cell_size(&self) -> Size {
        Size::new(self.size, self.size)
    }

    fn pixels_to_grid(&self, point: Point) -> GridCell {
        GridCell::new(
            cell_coord(point.y, 0.0, self.size),
            cell_coord(point.x, 0.0, self.size),
        )
    }

    fn grid_to_pixels(&self, cell: GridCell) -> Point {
        Point::new(
            f64::from(cell.col) * self.size,
            f64::from(cell.row) * self.size,
        )
    }

    fn center(&self, point: Point) -> Point {
        point
    }

    fn top_left(&self, point: Point) -> Point {
        point
    }
}
