// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parametric helpers over a straight ray.
//!
//! A ray here is a [`Line`] from `p0` (origin) to `p1` (destination);
//! parameter `t = 0` is the origin and `t = 1` the destination. Values
//! outside `0..=1` extrapolate along the same direction.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point, Size};

use crate::line_length;

/// Point at parameter `t` along the ray.
#[inline]
pub fn project(ray: Line, t: f64) -> Point {
    ray.p0.lerp(ray.p1, t)
}

/// Angle of the ray in radians, measured from the positive x axis.
#[inline]
pub fn angle(ray: Line) -> f64 {
    (ray.p1 - ray.p0).atan2()
}

/// Point lying `extra` units beyond the ray's destination, along the ray.
///
/// Degenerate rays return their destination unchanged.
pub fn extend_beyond(ray: Line, extra: f64) -> Point {
    let len = line_length(ray);
    if len == 0.0 {
        return ray.p1;
    }
    project(ray, (len + extra) / len)
}

/// Distance from the centre of a box of `size` to its edge, along the ray.
///
/// A box centred on the ray is crossed either through its top/bottom or its
/// left/right side depending on how steep the ray is; this returns the
/// half-extent along the ray for whichever side is hit. Used to push a label
/// far enough along the ray that it clears the endpoint.
pub fn center_to_edge(ray: Line, size: Size) -> f64 {
    let d = ray.p1 - ray.p0;
    let half_w = size.width / 2.0;
    let half_h = size.height / 2.0;
    let theta = d.atan2();
    // Vertical rays, and rays steeper than the box diagonal, leave through
    // the top or bottom edge.
    if d.x == 0.0 || (d.y / d.x).abs() * size.width > size.height {
        (half_h / theta.sin()).abs()
    } else {
        (half_w / theta.cos()).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_interpolates_and_extrapolates() {
        let ray = Line::new((0.0, 0.0), (10.0, 20.0));
        assert_eq!(project(ray, 0.0), Point::new(0.0, 0.0));
        assert_eq!(project(ray, 0.5), Point::new(5.0, 10.0));
        assert_eq!(project(ray, 1.5), Point::new(15.0, 30.0));
    }

    #[test]
    fn extend_beyond_adds_length() {
        let ray = Line::new((0.0, 0.0), (100.0, 0.0));
        assert_eq!(extend_beyond(ray, 50.0), Point::new(150.0, 0.0));
        let stub = Line::new((3.0, 3.0), (3.0, 3.0));
        assert_eq!(extend_beyond(stub, 50.0), Point::new(3.0, 3.0));
    }

    #[test]
    fn edge_distance_depends_on_steepness() {
        let label = Size::new(40.0, 10.0);
        let horizontal = Line::new((0.0, 0.0), (100.0, 0.0));
        assert!((center_to_edge(horizontal, label) - 20.0).abs() < 1e-9);
        let vertical = Line::new((0.0, 0.0), (0.0, 100.0));
        assert!((center_to_edge(vertical, label) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn angle_follows_direction() {
        let up = Line::new((0.0, 0.0), (0.0, 10.0));
        assert!((angle(up) - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
