// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! libRuler Grid: the grid side of ruler measurement.
//!
//! - [`GridProjection`] maps surface points to [`GridCell`]s and back, and
//!   snaps points to cell centres. [`SquareGrid`] and [`Gridless`] are
//!   provided; hosts with other grid shapes implement the trait themselves.
//! - [`GridTraversal`] walks a ray and yields, lazily and in travel order,
//!   every cell it enters, filling in corner cuts so the highlighted path is
//!   connected.
//! - [`HighlightSink`] receives highlighted positions; [`HighlightLayers`]
//!   is an in-memory sink with per-layer de-duplication.
//! - [`MeasureDistances`] is the surface distance rule consumed by segment
//!   measurement; [`GridDistance`] counts grid spaces with a configurable
//!   [`DiagonalRule`] or measures straight lines.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Line;
//! use libruler_grid::{GridCell, SquareGrid, traverse};
//!
//! let grid = SquareGrid::new(50.0);
//! let cells: Vec<GridCell> = traverse(&grid, Line::new((0.0, 0.0), (100.0, 0.0))).collect();
//! assert_eq!(cells, [GridCell::new(0, 1), GridCell::new(0, 2)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod distance;
mod highlight;
mod projection;
mod traversal;
mod types;

pub use distance::{DiagonalRule, GridDistance, MeasureDistances};
pub use highlight::{Color, HighlightLayer, HighlightLayers, HighlightSink};
pub use projection::{GridProjection, Gridless, SquareGrid};
pub use traversal::{GridTraversal, sample_count, traverse};
pub use types::{GridCell, GridKind, cell_coord};
