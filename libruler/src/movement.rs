// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving a token along a measured path.

use kurbo::{Line, Point, Vec2};
use libruler_geometry::ElevatedPoint;
use tracing::{debug, warn};

use crate::error::{Result, RulerError};
use crate::registry::RulerRegistry;
use crate::waypoint::Waypoint;

/// Wall collision test for movement rays.
pub trait CollisionTest {
    /// Whether moving along `ray` hits something.
    fn check_collision(&self, ray: Line) -> bool;
}

/// The host side of a token move.
pub trait TokenMover {
    /// Current top-left position of the token.
    fn position(&self) -> Point;

    /// Move the token to `destination` (its new top-left corner) and return
    /// once the move has finished animating. `segment` counts from 1.
    fn animate_to(&mut self, segment: usize, destination: Point);

    /// Whether the game is paused.
    fn is_paused(&self) -> bool;

    /// Whether the acting user may move tokens while paused.
    fn user_is_gm(&self) -> bool;
}

/// How a token move ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// There was no path to move along.
    NothingToMove,
    /// Every segment was travelled.
    Completed {
        /// Segments travelled.
        segments: usize,
    },
    /// The move stopped early because the game was paused or the token was
    /// moved by someone else.
    Interrupted {
        /// Segments travelled before stopping.
        segments: usize,
    },
}

/// One ray per consecutive pair of `waypoints` followed by `destination`.
pub fn rays_from_waypoints(waypoints: &[Waypoint], destination: Option<ElevatedPoint>) -> Vec<Line> {
    let points: Vec<Point> = waypoints
        .iter()
        .map(|w| w.point)
        .chain(destination.map(|d| d.point))
        .collect();
    points.windows(2).map(|w| Line::new(w[0], w[1])).collect()
}

/// Index of the first colliding ray.
pub fn first_collision(registry: &RulerRegistry, rays: &[Line]) -> Option<usize> {
    let test = registry.collisions()?;
    rays.iter().position(|r| test.check_collision(*r))
}

/// Walk `mover` along `waypoints` to `destination`.
///
/// Refuses to start while paused unless the user is a GM, and refuses the
/// whole move when any ray collides. The token keeps its offset from the
/// origin cell, rounded to half cells. Between segments the move stops if
/// the game became paused or the token is not where the previous segment
/// left it.
pub(crate) fn travel<M: TokenMover + ?Sized>(
    registry: &RulerRegistry,
    waypoints: &[Waypoint],
    destination: Option<ElevatedPoint>,
    mover: &mut M,
) -> Result<MoveOutcome> {
    let was_paused = mover.is_paused();
    if was_paused && !mover.user_is_gm() {
        warn!("token movement refused while the game is paused");
        return Err(RulerError::Paused);
    }
    let (Some(first), Some(_)) = (waypoints.first(), destination) else {
        return Ok(MoveOutcome::NothingToMove);
    };

    let rays = rays_from_waypoints(waypoints, destination);
    if let Some(segment) = first_collision(registry, &rays) {
        warn!(segment, "token movement collides, refused");
        return Err(RulerError::Collision { segment });
    }

    let grid = registry.grid();
    let origin = grid.top_left(first.point);
    let offset = half_cell_offset(mover.position() - origin, grid.cell_size().width / 2.0);

    let mut prior: Option<Point> = None;
    let mut moved = 0;
    for (i, ray) in rays.iter().enumerate() {
        let interrupted = (!was_paused && mover.is_paused())
            || prior.is_some_and(|p| mover.position() != p);
        if interrupted {
            debug!(segment = i + 1, "token movement interrupted");
            return Ok(MoveOutcome::Interrupted { segments: moved });
        }
        let target = grid.top_left(ray.p1) + offset;
        mover.animate_to(i + 1, target);
        prior = Some(target);
        moved += 1;
    }
    debug!(segments = moved, "token movement finished");
    Ok(MoveOutcome::Completed { segments: moved })
}

fn half_cell_offset(delta: Vec2, half: f64) -> Vec2 {
    if half <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (delta.x / half).round() * half,
        (delta.y / half).round() * half,
    )
}
