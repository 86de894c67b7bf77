// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waypoints anchoring a measured path.

use kurbo::Point;
use libruler_geometry::ElevatedPoint;
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Provenance flags for a waypoint.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct WaypointFlags: u8 {
        /// Inserted by the pathfinder rather than placed by the user.
        const PATHFINDING = 0b0000_0001;
    }
}

/// A point on the measured path, with an optional elevation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Surface position.
    pub point: Point,
    /// Height above the surface, in surface units.
    #[serde(default)]
    pub elevation: f64,
    /// Provenance.
    #[serde(default)]
    pub flags: WaypointFlags,
}

impl Waypoint {
    /// A user-placed waypoint on the surface.
    pub fn new(point: Point) -> Self {
        Self {
            point,
            elevation: 0.0,
            flags: WaypointFlags::empty(),
        }
    }

    /// A user-placed waypoint at `elevation`.
    pub fn elevated(point: Point, elevation: f64) -> Self {
        Self {
            elevation,
            ..Self::new(point)
        }
    }

    /// A waypoint inserted by the pathfinder.
    pub fn pathfinding(point: Point) -> Self {
        Self {
            flags: WaypointFlags::PATHFINDING,
            ..Self::new(point)
        }
    }

    /// Whether this waypoint came from the pathfinder.
    pub fn is_pathfinding(&self) -> bool {
        self.flags.contains(WaypointFlags::PATHFINDING)
    }

    /// Position and elevation as an [`ElevatedPoint`].
    pub fn position(&self) -> ElevatedPoint {
        ElevatedPoint::new(self.point, self.elevation)
    }
}

impl From<ElevatedPoint> for Waypoint {
    fn from(p: ElevatedPoint) -> Self {
        Self::elevated(p.point, p.elevation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let wp: Waypoint = serde_json::from_str(r#"{ "point": { "x": 5.0, "y": 7.0 } }"#).unwrap();
        assert_eq!(wp, Waypoint::new(Point::new(5.0, 7.0)));
        assert!(!wp.is_pathfinding());
    }

    #[test]
    fn pathfinding_flag_survives_json() {
        let wp = Waypoint::pathfinding(Point::new(75.0, 25.0));
        let back: Waypoint = serde_json::from_str(&serde_json::to_string(&wp).unwrap()).unwrap();
        assert!(back.is_pathfinding());
        assert_eq!(back.position(), ElevatedPoint::planar(Point::new(75.0, 25.0)));
    }
}
