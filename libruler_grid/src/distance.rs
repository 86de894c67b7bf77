// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface distance rules.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Line;
use libruler_geometry::line_length;

use crate::types::GridKind;

/// A rule converting on-surface rays into game distances.
///
/// `grid_spaces` asks the rule to count whole grid spaces instead of
/// measuring the straight line; rules without a notion of spaces may ignore
/// it. The returned vector has one entry per ray, in order.
pub trait MeasureDistances {
    /// Measure each ray.
    fn measure_distances(&self, rays: &[Line], grid_spaces: bool) -> Vec<f64>;
}

/// How diagonal steps are charged when counting grid spaces.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DiagonalRule {
    /// Every step costs one space (5-5-5).
    #[default]
    Equidistant,
    /// Every second diagonal costs two spaces (5-10-5).
    Alternating,
    /// Straight-line distance between cell centres.
    Euclidean,
}

/// Grid-aware distance rule.
///
/// Rays are converted from pixels to game units using the pixel size of a
/// cell and the game distance one cell represents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridDistance {
    kind: GridKind,
    cell_size: f64,
    distance_per_cell: f64,
    rule: DiagonalRule,
}

impl GridDistance {
    /// Create a rule for a grid whose cells are `cell_size` pixels wide and
    /// represent `distance_per_cell` game units.
    pub fn new(kind: GridKind, cell_size: f64, distance_per_cell: f64) -> Self {
        debug_assert!(cell_size > 0.0, "cell size must be strictly positive");
        Self {
            kind,
            cell_size,
            distance_per_cell,
            rule: DiagonalRule::default(),
        }
    }

    /// Use `rule` for diagonal steps.
    pub fn with_rule(mut self, rule: DiagonalRule) -> Self {
        self.rule = rule;
        self
    }

    /// Distance of a single ray.
    pub fn measure(&self, ray: Line, grid_spaces: bool) -> f64 {
        if !grid_spaces || self.kind == GridKind::Gridless {
            return line_length(ray) / self.cell_size * self.distance_per_cell;
        }
        let d = ray.p1 - ray.p0;
        let nx = (d.x.abs() / self.cell_size).round();
        let ny = (d.y.abs() / self.cell_size).round();
        let nd = nx.min(ny);
        let ns = (nx - ny).abs();
        let spaces = match self.rule {
            DiagonalRule::Equidistant => nd + ns,
            DiagonalRule::Alternating => ns + nd + (nd / 2.0).floor(),
            DiagonalRule::Euclidean => nx.hypot(ny),
        };
        spaces * self.distance_per_cell
    }
}

impl MeasureDistances for GridDistance {
    fn measure_distances(&self, rays: &[Line], grid_spaces: bool) -> Vec<f64> {
        rays.iter().map(|r| self.measure(*r, grid_spaces)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn straight_line_without_spaces() {
        let rule = GridDistance::new(GridKind::Square, 100.0, 5.0);
        let d = rule.measure(Line::new((0.0, 0.0), (300.0, 400.0)), false);
        assert!((d - 25.0).abs() < 1e-9);
    }

    #[test]
    fn diagonal_rules() {
        let ray = Line::new((50.0, 50.0), (350.0, 450.0));
        let base = GridDistance::new(GridKind::Square, 100.0, 5.0);
        // 3 columns, 4 rows: 3 diagonals and 1 straight step.
        assert_eq!(base.measure(ray, true), 20.0);
        assert_eq!(
            base.with_rule(DiagonalRule::Alternating).measure(ray, true),
            25.0
        );
        assert_eq!(
            base.with_rule(DiagonalRule::Euclidean).measure(ray, true),
            25.0
        );
    }

    #[test]
    fn gridless_ignores_spaces() {
        let rule = GridDistance::new(GridKind::Gridless, 50.0, 50.0);
        let d = rule.measure(Line::new((0.0, 0.0), (30.0, 40.0)), true);
        assert!((d - 50.0).abs() < 1e-9);
    }

    #[test]
    fn measures_every_ray() {
        let rule = GridDistance::new(GridKind::Square, 50.0, 50.0);
        let rays = [
            Line::new((0.0, 0.0), (100.0, 0.0)),
            Line::new((100.0, 0.0), (100.0, 50.0)),
        ];
        assert_eq!(rule.measure_distances(&rays, true), vec![100.0, 50.0]);
    }
}
