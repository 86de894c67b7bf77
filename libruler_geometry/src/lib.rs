// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry primitives for ruler measurement.
//!
//! This crate provides the small set of planar helpers that the ruler's
//! segment measurement builds on, expressed over [`kurbo`] points and lines.
//! It does not know about grids, segments, or rendering.
//!
//! # Key items
//!
//! - [`distance`] – Euclidean distance with an epsilon-tolerant fast path for
//!   axis-aligned and coincident points.
//! - [`almost_equal`] / [`points_almost_equal`] – tolerance comparisons.
//! - [`ElevatedPoint`] and [`project_elevated_point`] – fold an elevation
//!   change back onto the measurement plane so that a planar distance
//!   measures the true 3D hop.
//! - The [`ray`] module – parametric helpers over [`Line`] used for label
//!   placement and grid sampling.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use libruler_geometry::{ElevatedPoint, distance, project_elevated_point};
//!
//! let a = ElevatedPoint::new(Point::new(0.0, 0.0), 0.0);
//! let b = ElevatedPoint::new(Point::new(10.0, 0.0), 5.0);
//! let c = project_elevated_point(a, b).unwrap();
//! assert!((distance(a.point, c) - 125.0_f64.sqrt()).abs() < 1e-9);
//! ```
//!
//! ### Float semantics
//!
//! Inputs are assumed to be finite. Coordinates are in surface units
//! (typically canvas pixels); elevation uses the same units.
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point};

pub mod ray;

/// Default tolerance used by the comparison helpers.
pub const EPSILON: f64 = 1e-6;

/// Distance between two points in the plane, using [`EPSILON`].
///
/// See [`distance_eps`].
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    distance_eps(a, b, EPSILON)
}

/// Distance between two points in the plane.
///
/// Axis-aligned pairs skip the `hypot` call: when one delta is within
/// `epsilon` of zero the other delta is returned directly, and when both are
/// the result is exactly `0.0`. This keeps horizontal and vertical
/// measurements free of floating-point noise.
pub fn distance_eps(a: Point, b: Point, epsilon: f64) -> f64 {
    let dx = (b.x - a.x).abs();
    let dy = (b.y - a.y).abs();
    match (dx < epsilon, dy < epsilon) {
        (true, true) => 0.0,
        (false, true) => dx,
        (true, false) => dy,
        (false, false) => dx.hypot(dy),
    }
}

/// Length of a line, with the same fast path as [`distance`].
#[inline]
pub fn line_length(line: Line) -> f64 {
    distance(line.p0, line.p1)
}

/// Whether two numbers are within `epsilon` of each other.
#[inline]
pub fn almost_equal(x: f64, y: f64, epsilon: f64) -> bool {
    (x - y).abs() < epsilon
}

/// Whether two points are within `epsilon` of each other on both axes.
#[inline]
pub fn points_almost_equal(p1: Point, p2: Point, epsilon: f64) -> bool {
    almost_equal(p1.x, p2.x, epsilon) && almost_equal(p1.y, p2.y, epsilon)
}

/// A point on the measurement plane with an elevation above it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElevatedPoint {
    /// Position on the plane.
    pub point: Point,
    /// Height above the plane, in the same units as `point`.
    pub elevation: f64,
}

impl ElevatedPoint {
    /// Create an elevated point.
    #[inline]
    pub const fn new(point: Point, elevation: f64) -> Self {
        Self { point, elevation }
    }

    /// A point lying on the plane.
    #[inline]
    pub const fn planar(point: Point) -> Self {
        Self {
            point,
            elevation: 0.0,
        }
    }

    /// Whether `other` sits at a different height, beyond `epsilon`.
    #[inline]
    pub fn has_elevation_delta(&self, other: &Self, epsilon: f64) -> bool {
        !almost_equal(self.elevation, other.elevation, epsilon)
    }
}

impl From<Point> for ElevatedPoint {
    fn from(point: Point) -> Self {
        Self::planar(point)
    }
}

/// Project the elevated destination `b` back onto the plane as seen from `a`.
///
/// The vertical triangle formed by the planar move and the height change is
/// rotated onto the plane, so the returned point `c` satisfies
/// `distance(a, c) == hypot(distance(a, b), b.z - a.z)`.
///
/// With `h = b.z - a.z` and `d` the planar distance from `a` to `b`:
///
/// - `c.x = b.x + (h / d) * (a.y - b.y)`
/// - `c.y = b.y - (h / d) * (a.x - b.x)`
///
/// Returns `None` when `a` and `b` coincide in the plane, where the rotation
/// is undefined.
pub fn project_elevated_point(a: ElevatedPoint, b: ElevatedPoint) -> Option<Point> {
    let d = distance(a.point, b.point);
    if d < EPSILON {
        return None;
    }
    let k = (b.elevation - a.elevation) / d;
    Some(Point::new(
        b.point.x + k * (a.point.y - b.point.y),
        b.point.y - k * (a.point.x - b.point.x),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_distance_is_exact() {
        let a = Point::new(3.0, 7.0);
        assert_eq!(distance(a, Point::new(13.0, 7.0)), 10.0);
        assert_eq!(distance(a, Point::new(3.0, -2.0)), 9.0);
        assert_eq!(distance(a, Point::new(3.0 + 1e-9, 7.0 - 1e-9)), 0.0);
    }

    #[test]
    fn diagonal_distance_uses_hypot() {
        let d = distance(Point::ZERO, Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn near_equality() {
        assert!(almost_equal(1.0, 1.0 + 1e-7, EPSILON));
        assert!(!almost_equal(1.0, 1.001, EPSILON));
        assert!(points_almost_equal(
            Point::new(1.0, 2.0),
            Point::new(1.0 + 1e-8, 2.0 - 1e-8),
            EPSILON
        ));
        assert!(!points_almost_equal(
            Point::new(1.0, 2.0),
            Point::new(1.0, 2.1),
            EPSILON
        ));
    }

    #[test]
    fn elevated_projection_preserves_hypotenuse() {
        let a = ElevatedPoint::new(Point::new(0.0, 0.0), 0.0);
        let b = ElevatedPoint::new(Point::new(10.0, 0.0), 5.0);
        let c = project_elevated_point(a, b).expect("non-degenerate projection");
        assert_eq!(c, Point::new(10.0, 5.0));
        assert!((distance(a.point, c) - 10.0_f64.hypot(5.0)).abs() < 1e-9);
    }

    #[test]
    fn elevated_projection_off_axis() {
        let a = ElevatedPoint::new(Point::new(5.0, 5.0), 10.0);
        let b = ElevatedPoint::new(Point::new(35.0, 45.0), -20.0);
        let c = project_elevated_point(a, b).expect("non-degenerate projection");
        let expected = 50.0_f64.hypot(30.0);
        assert!((distance(a.point, c) - expected).abs() < 1e-9);
    }

    #[test]
    fn coincident_projection_is_none() {
        let a = ElevatedPoint::new(Point::new(4.0, 4.0), 0.0);
        let b = ElevatedPoint::new(Point::new(4.0, 4.0), 30.0);
        assert!(project_elevated_point(a, b).is_none());
    }
}
