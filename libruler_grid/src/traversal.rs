// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walking a ray across the grid, one entered cell at a time.

use core::iter::FusedIterator;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Line;
use libruler_geometry::{line_length, ray};
use smallvec::SmallVec;

use crate::projection::GridProjection;
use crate::types::GridCell;

/// Lazy, single-pass sequence of the grid cells a ray crosses.
///
/// The ray is sampled at `n + 1` evenly spaced parameters
/// `t = 0, 1/n, …, 1`, where
/// `n = max(floor(length / (spacer * min(cell_width, cell_height))), 1)`
/// and `spacer` comes from [`GridKind::spacer`](crate::GridKind::spacer).
///
/// - The origin cell (`t = 0`) is never yielded.
/// - A sample landing in the same cell as the previous sample is skipped.
/// - When a sample lands in a cell that does not touch the previous one,
///   the cell under the midpoint `t_prev + 0.5 / n` is yielded first so the
///   highlighted path stays connected across corner cuts. If that still
///   leaves a gap (an origin off the cell centre can skip several cells in
///   one interval), the halves are split again until every yielded cell
///   touches the one before it.
///
/// Start a fresh traversal for every ray.
#[derive(Debug)]
pub struct GridTraversal<'a, G: GridProjection + ?Sized> {
    grid: &'a G,
    ray: Line,
    steps: u32,
    next_step: u32,
    prior: GridCell,
    /// Bridging cells still to yield, last entry first.
    pending: SmallVec<[GridCell; 4]>,
}

/// Bisection depth cap for [`GridTraversal::bridge`].
const MAX_BRIDGE_DEPTH: u32 = 24;

impl<'a, G: GridProjection + ?Sized> GridTraversal<'a, G> {
    /// Begin a traversal of `ray` over `grid`.
    pub fn new(grid: &'a G, ray: Line) -> Self {
        let steps = sample_count(grid, ray);
        Self {
            grid,
            ray,
            steps,
            next_step: 1,
            prior: grid.pixels_to_grid(ray.p0),
            pending: SmallVec::new(),
        }
    }

    /// Number of sample intervals along the ray.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    fn cell_at(&self, t: f64) -> GridCell {
        self.grid.pixels_to_grid(ray::project(self.ray, t))
    }

    /// Push, in travel order, the cells strictly between `from` (at `t0`)
    /// and `to` (at `t1`) needed to connect them.
    fn bridge(
        &self,
        (t0, from): (f64, GridCell),
        (t1, to): (f64, GridCell),
        depth: u32,
        out: &mut SmallVec<[GridCell; 4]>,
    ) {
        if depth == 0 || self.grid.is_neighbor(from, to) {
            return;
        }
        let tm = 0.5 * (t0 + t1);
        let mid = self.cell_at(tm);
        if mid == from {
            self.bridge((tm, from), (t1, to), depth - 1, out);
        } else if mid == to {
            self.bridge((t0, from), (tm, to), depth - 1, out);
        } else {
            self.bridge((t0, from), (tm, mid), depth - 1, out);
            out.push(mid);
            self.bridge((tm, mid), (t1, to), depth - 1, out);
        }
    }
}

/// Number of sample intervals used for `ray` on `grid`; always at least one.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The floored sample count is non-negative and far below u32::MAX for on-screen rays."
)]
pub fn sample_count<G: GridProjection + ?Sized>(grid: &G, ray: Line) -> u32 {
    let cell = grid.cell_size();
    let spacing = grid.kind().spacer() * cell.width.min(cell.height);
    let n = (line_length(ray) / spacing).floor();
    if n.is_finite() && n >= 1.0 {
        n as u32
    } else {
        1
    }
}

impl<G: GridProjection + ?Sized> Iterator for GridTraversal<'_, G> {
    type Item = GridCell;

    fn next(&mut self) -> Option<GridCell> {
        if let Some(cell) = self.pending.pop() {
            return Some(cell);
        }
        let n = f64::from(self.steps);
        while self.next_step <= self.steps {
            let step = self.next_step;
            self.next_step += 1;

            let cell = self.cell_at(f64::from(step) / n);
            if cell == self.prior {
                continue;
            }
            let previous = core::mem::replace(&mut self.prior, cell);

            if !self.grid.is_neighbor(previous, cell) {
                let mut between = SmallVec::<[GridCell; 4]>::new();
                self.bridge(
                    (f64::from(step - 1) / n, previous),
                    (f64::from(step) / n, cell),
                    MAX_BRIDGE_DEPTH,
                    &mut between,
                );
                if !between.is_empty() {
                    self.pending.push(cell);
                    self.pending.extend(between.drain(1..).rev());
                    return Some(between[0]);
                }
            }
            return Some(cell);
        }
        None
    }
}

impl<G: GridProjection + ?Sized> FusedIterator for GridTraversal<'_, G> {}

/// Traverse `ray` over `grid`. See [`GridTraversal`].
pub fn traverse<G: GridProjection + ?Sized>(grid: &G, ray: Line) -> GridTraversal<'_, G> {
    GridTraversal::new(grid, ray)
}
