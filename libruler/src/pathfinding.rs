// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splicing an external pathfinder's route into the waypoint list.

use kurbo::Point;
use libruler_geometry::{ElevatedPoint, points_almost_equal};
use libruler_grid::{GridCell, GridProjection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::registry::RulerRegistry;
use crate::waypoint::Waypoint;

/// Route search between two grid cells.
pub trait Pathfinder {
    /// Whether routes should be looked up for `subject` right now.
    fn is_enabled(&self, _subject: &MovementSubject) -> bool {
        true
    }

    /// Cells from `from` to `to`, both included, or `None` when `to` cannot
    /// be reached.
    fn find_path(
        &self,
        from: GridCell,
        to: GridCell,
        subject: &MovementSubject,
        waypoints: &[Waypoint],
    ) -> Option<Vec<GridCell>>;
}

/// The token a ruler measures for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementSubject {
    /// Host identifier of the token.
    pub id: String,
    /// Width in grid cells.
    pub width: u32,
    /// Height in grid cells.
    pub height: u32,
}

impl MovementSubject {
    /// A subject of `width` by `height` cells.
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    /// Where the subject's centre rests when placed at `point`.
    ///
    /// Along each axis an odd extent centres on a cell and an even extent
    /// sits on a grid line.
    pub fn snap_point(&self, grid: &dyn GridProjection, point: Point) -> Point {
        let center = grid.center(point);
        let vertex = grid.nearest_vertex(point);
        Point::new(
            if self.width % 2 == 1 { center.x } else { vertex.x },
            if self.height % 2 == 1 { center.y } else { vertex.y },
        )
    }

    /// Cells the subject covers when placed on the cell containing
    /// `position`, row by row.
    ///
    /// The subject is snapped from the cell's top-left corner, so an even
    /// extent straddles that corner.
    pub fn footprint(&self, grid: &dyn GridProjection, position: Point) -> Vec<GridCell> {
        let cell = grid.cell_size();
        let (width, height) = (self.width.max(1), self.height.max(1));
        let centre = self.snap_point(grid, grid.top_left(position));
        // A quarter cell inside the footprint's top-left corner.
        let corner = Point::new(
            centre.x - f64::from(width) * cell.width / 2.0 + cell.width / 4.0,
            centre.y - f64::from(height) * cell.height / 2.0 + cell.height / 4.0,
        );
        let anchor = grid.pixels_to_grid(corner);
        let mut cells = Vec::new();
        for (_, row) in (0..height).zip(anchor.row..) {
            for (_, col) in (0..width).zip(anchor.col..) {
                cells.push(GridCell::new(row, col));
            }
        }
        cells
    }
}

/// Drop every waypoint the pathfinder inserted. Returns how many went.
pub fn remove_pathfinding_waypoints(waypoints: &mut Vec<Waypoint>) -> usize {
    let before = waypoints.len();
    waypoints.retain(|w| !w.is_pathfinding());
    before - waypoints.len()
}

/// Ask `pathfinder` for a route from the last waypoint to `destination` and
/// append its intermediate points to `waypoints`.
///
/// The first route cell (the start) is dropped, as is a first point that
/// lands on the last waypoint after snapping. With `snap` the final point is
/// dropped too, since snapping the destination produces it. Inserted
/// waypoints carry [`WaypointFlags::PATHFINDING`](crate::WaypointFlags::PATHFINDING).
///
/// Returns the destination to measure to: `destination` itself, or the last
/// waypoint when no route exists.
pub fn splice_route(
    registry: &RulerRegistry,
    pathfinder: &dyn Pathfinder,
    subject: &MovementSubject,
    waypoints: &mut Vec<Waypoint>,
    destination: ElevatedPoint,
    snap: bool,
) -> ElevatedPoint {
    let Some(last) = waypoints.last().copied() else {
        return destination;
    };
    let grid = registry.grid();
    let from = grid.pixels_to_grid(last.point);
    let to = grid.pixels_to_grid(destination.point);

    let route = pathfinder
        .find_path(from, to, subject, waypoints)
        .unwrap_or_default();
    let Some((_, cells)) = route.split_first().filter(|(_, rest)| !rest.is_empty()) else {
        debug!(?from, ?to, "no route, destination collapses to last waypoint");
        return last.position();
    };

    let mut points: Vec<Point> = cells
        .iter()
        .map(|c| subject.snap_point(grid, grid.grid_to_pixels(*c)))
        .collect();
    let epsilon = registry.config().epsilon;
    if points
        .first()
        .is_some_and(|p| points_almost_equal(*p, last.point, epsilon))
    {
        points.remove(0);
    }
    if snap {
        points.pop();
    }
    debug!(?from, ?to, inserted = points.len(), "route spliced");
    waypoints.extend(points.into_iter().map(|p| Waypoint {
        elevation: last.elevation,
        ..Waypoint::pathfinding(p)
    }));
    destination
}

#[cfg(test)]
mod tests {
    use super::*;
    use libruler_grid::SquareGrid;

    struct FixedRoute(Option<Vec<GridCell>>);

    impl Pathfinder for FixedRoute {
        fn find_path(
            &self,
            _from: GridCell,
            _to: GridCell,
            _subject: &MovementSubject,
            _waypoints: &[Waypoint],
        ) -> Option<Vec<GridCell>> {
            self.0.clone()
        }
    }

    #[test]
    fn footprint_covers_subject_size() {
        let grid = SquareGrid::new(50.0);
        let at = Point::new(60.0, 70.0);
        assert_eq!(
            MovementSubject::new("t", 1, 1).footprint(&grid, at),
            cells(&[(1, 1)])
        );
        assert_eq!(
            MovementSubject::new("t", 2, 2).footprint(&grid, at),
            cells(&[(0, 0), (0, 1), (1, 0), (1, 1)])
        );
        assert_eq!(
            MovementSubject::new("t", 3, 1).footprint(&grid, at),
            cells(&[(1, 0), (1, 1), (1, 2)])
        );
    }

    fn cells(list: &[(i32, i32)]) -> Vec<GridCell> {
        list.iter().copied().map(GridCell::from).collect()
    }

    #[test]
    fn odd_subjects_center_even_subjects_vertex() {
        let grid = SquareGrid::new(50.0);
        let p = Point::new(60.0, 60.0);
        assert_eq!(
            MovementSubject::new("a", 1, 1).snap_point(&grid, p),
            Point::new(75.0, 75.0)
        );
        assert_eq!(
            MovementSubject::new("b", 2, 2).snap_point(&grid, p),
            Point::new(50.0, 50.0)
        );
        assert_eq!(
            MovementSubject::new("c", 2, 3).snap_point(&grid, p),
            Point::new(50.0, 75.0)
        );
    }

    #[test]
    fn route_is_spliced_and_flagged() {
        let reg = RulerRegistry::square(50.0, 5.0);
        let finder = FixedRoute(Some(cells(&[(0, 0), (0, 1), (1, 2), (2, 2)])));
        let subject = MovementSubject::new("t", 1, 1);
        let mut wps = vec![Waypoint::new(Point::new(25.0, 25.0))];
        let dest = ElevatedPoint::planar(Point::new(125.0, 125.0));

        let resolved = splice_route(&reg, &finder, &subject, &mut wps, dest, true);
        assert_eq!(resolved, dest);
        let inserted: Vec<Point> = wps.iter().skip(1).map(|w| w.point).collect();
        assert_eq!(inserted, [Point::new(75.0, 25.0), Point::new(125.0, 75.0)]);
        assert!(wps[1..].iter().all(Waypoint::is_pathfinding));
        assert!(!wps[0].is_pathfinding());

        assert_eq!(remove_pathfinding_waypoints(&mut wps), 2);
        assert_eq!(wps.len(), 1);
    }

    #[test]
    fn unsnapped_route_keeps_final_point() {
        let reg = RulerRegistry::square(50.0, 5.0);
        let finder = FixedRoute(Some(cells(&[(0, 0), (0, 1), (0, 2)])));
        let subject = MovementSubject::new("t", 1, 1);
        let mut wps = vec![Waypoint::new(Point::new(25.0, 25.0))];
        let dest = ElevatedPoint::planar(Point::new(130.0, 20.0));
        splice_route(&reg, &finder, &subject, &mut wps, dest, false);
        assert_eq!(wps.len(), 3);
        assert_eq!(wps[2].point, Point::new(125.0, 25.0));
    }

    #[test]
    fn leading_duplicate_is_dropped() {
        let reg = RulerRegistry::square(50.0, 5.0);
        // The route restarts at the origin cell after its first entry.
        let finder = FixedRoute(Some(cells(&[(0, 0), (0, 0), (0, 1)])));
        let subject = MovementSubject::new("t", 1, 1);
        let mut wps = vec![Waypoint::new(Point::new(25.0, 25.0))];
        let dest = ElevatedPoint::planar(Point::new(75.0, 25.0));
        splice_route(&reg, &finder, &subject, &mut wps, dest, false);
        let points: Vec<Point> = wps.iter().map(|w| w.point).collect();
        assert_eq!(points, [Point::new(25.0, 25.0), Point::new(75.0, 25.0)]);
    }

    #[test]
    fn missing_route_collapses_destination() {
        let reg = RulerRegistry::square(50.0, 5.0);
        let subject = MovementSubject::new("t", 1, 1);
        let origin = Waypoint::elevated(Point::new(25.0, 25.0), 10.0);
        let dest = ElevatedPoint::planar(Point::new(500.0, 500.0));
        for finder in [FixedRoute(None), FixedRoute(Some(cells(&[(0, 0)])))] {
            let mut wps = vec![origin];
            let resolved = splice_route(&reg, &finder, &subject, &mut wps, dest, true);
            assert_eq!(resolved, origin.position());
            assert_eq!(wps.len(), 1);
        }
    }
}
