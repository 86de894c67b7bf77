// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ruler: waypoints, lifecycle and the entry points hosts call.

use kurbo::Point;
use libruler_geometry::{ElevatedPoint, distance};
use libruler_grid::Color;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, RulerError};
use crate::flags::Flags;
use crate::measure::{MeasureOptions, Measurement, RulerStyle, measure_path};
use crate::movement::{MoveOutcome, TokenMover, travel};
use crate::pathfinding::{MovementSubject, remove_pathfinding_waypoints, splice_route};
use crate::registry::RulerRegistry;
use crate::render::RulerCanvas;
use crate::schedule::{MeasureRequest, MeasurementScheduler};
use crate::waypoint::{Waypoint, WaypointFlags};

/// Interaction state of a [`Ruler`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulerState {
    /// Not in use.
    #[default]
    Inactive,
    /// Origin placed, nothing measured yet.
    Starting,
    /// Following the pointer.
    Measuring,
    /// A token is travelling the path; measurement requests are ignored.
    Moving,
}

/// Options for [`Ruler::remove_waypoint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Measure in grid spaces and snap the destination when re-measuring.
    pub snap: bool,
    /// Re-measure to the pointer afterwards.
    pub remeasure: bool,
}

impl Default for RemoveOptions {
    fn default() -> Self {
        Self {
            snap: true,
            remeasure: true,
        }
    }
}

/// Serializable ruler state, as shared with other clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RulerSnapshot {
    /// Ruler name.
    pub name: String,
    /// Waypoints, origin first.
    pub waypoints: Vec<Waypoint>,
    /// Last measured destination.
    pub destination: Option<Waypoint>,
    /// Interaction state.
    pub state: RulerState,
    /// Extension data.
    #[serde(default, skip_serializing_if = "Flags::is_empty")]
    pub flags: Flags,
}

/// A measuring ruler owned by one user.
#[derive(Clone, Debug)]
pub struct Ruler {
    name: String,
    color: Color,
    waypoints: Vec<Waypoint>,
    destination: Option<ElevatedPoint>,
    state: RulerState,
    flags: Flags,
    subject: Option<MovementSubject>,
    scheduler: MeasurementScheduler,
}

impl Ruler {
    /// Create an inactive ruler drawing on highlight layer `name`.
    pub fn new(name: impl Into<String>, color: Color, registry: &RulerRegistry) -> Self {
        Self {
            name: name.into(),
            color,
            waypoints: Vec::new(),
            destination: None,
            state: RulerState::Inactive,
            flags: Flags::new(),
            subject: None,
            scheduler: MeasurementScheduler::new(registry.config().measurement_interval_ms),
        }
    }

    /// Name, also used as the highlight layer.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base colour.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Interaction state.
    pub fn state(&self) -> RulerState {
        self.state
    }

    /// Waypoints, origin first.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Destination of the last measurement.
    pub fn destination(&self) -> Option<ElevatedPoint> {
        self.destination
    }

    /// The token being measured for, if any.
    pub fn subject(&self) -> Option<&MovementSubject> {
        self.subject.as_ref()
    }

    /// Measure for `subject`; enables pathfinding for it.
    pub fn set_subject(&mut self, subject: Option<MovementSubject>) {
        self.subject = subject;
    }

    fn style(&self) -> RulerStyle<'_> {
        RulerStyle {
            name: &self.name,
            color: self.color,
        }
    }

    /// Elevation given to pointer destinations: that of the last waypoint.
    fn pointer_elevation(&self) -> f64 {
        self.waypoints.last().map_or(0.0, |w| w.elevation)
    }

    /// Reset and place the origin at `origin`, centred on its cell.
    pub fn start(&mut self, registry: &RulerRegistry, origin: Point) {
        self.clear();
        self.state = RulerState::Starting;
        self.add_waypoint(registry, origin, true);
        debug!(ruler = %self.name, x = origin.x, y = origin.y, "ruler started");
    }

    /// Drop all waypoints and return to [`RulerState::Inactive`].
    ///
    /// Flags are kept.
    pub fn clear(&mut self) {
        self.state = RulerState::Inactive;
        self.waypoints.clear();
        self.destination = None;
        self.scheduler.reset();
    }

    /// Finish the current measurement.
    pub fn end_measurement(&mut self) {
        debug!(ruler = %self.name, "measurement ended");
        self.clear();
    }

    /// Append a user waypoint at `point`, centred on its cell if `center`.
    ///
    /// Waypoints inserted by the pathfinder become user waypoints.
    pub fn add_waypoint(&mut self, registry: &RulerRegistry, point: Point, center: bool) {
        let point = if center {
            registry.grid().center(point)
        } else {
            point
        };
        self.push_waypoint(Waypoint::new(point));
    }

    /// Append `waypoint` as is. Pathfinding waypoints become user waypoints.
    pub fn push_waypoint(&mut self, waypoint: Waypoint) {
        for w in &mut self.waypoints {
            w.flags.remove(WaypointFlags::PATHFINDING);
        }
        self.waypoints.push(waypoint);
    }

    /// Remove the last waypoint and, unless told otherwise, re-measure to
    /// `point`.
    ///
    /// Removing the origin ends the measurement.
    pub fn remove_waypoint<C: RulerCanvas>(
        &mut self,
        registry: &RulerRegistry,
        point: Point,
        options: RemoveOptions,
        canvas: &mut C,
    ) -> Result<Option<Measurement>> {
        self.waypoints.pop();
        if self.waypoints.is_empty() {
            self.end_measurement();
            return Ok(None);
        }
        if !options.remeasure {
            return Ok(None);
        }
        let opts = MeasureOptions {
            grid_spaces: options.snap,
            snap: options.snap,
        };
        self.measure(registry, point, opts, canvas).map(Some)
    }

    /// Measure to `destination` at the height of the last waypoint.
    pub fn measure<C: RulerCanvas>(
        &mut self,
        registry: &RulerRegistry,
        destination: Point,
        options: MeasureOptions,
        canvas: &mut C,
    ) -> Result<Measurement> {
        let destination = ElevatedPoint::new(destination, self.pointer_elevation());
        self.measure_elevated(registry, destination, options, canvas)
    }

    /// Measure and draw the path to `destination`.
    ///
    /// Earlier pathfinding waypoints are discarded first. With a subject
    /// set and a pathfinder installed, a fresh route is spliced in before
    /// measuring.
    pub fn measure_elevated<C: RulerCanvas>(
        &mut self,
        registry: &RulerRegistry,
        destination: ElevatedPoint,
        options: MeasureOptions,
        canvas: &mut C,
    ) -> Result<Measurement> {
        remove_pathfinding_waypoints(&mut self.waypoints);
        if self.waypoints.is_empty() {
            return Err(RulerError::NoOrigin);
        }
        let mut destination = destination;
        if let Some(pathfinder) = registry.pathfinder() {
            if let Some(subject) = self.subject.as_ref().filter(|s| pathfinder.is_enabled(s)) {
                destination = splice_route(
                    registry,
                    pathfinder,
                    subject,
                    &mut self.waypoints,
                    destination,
                    options.snap,
                );
            }
        }
        let measurement = measure_path(
            registry,
            self.style(),
            &self.waypoints,
            destination,
            options,
            canvas,
        )?;
        self.destination = Some(measurement.destination);
        Ok(measurement)
    }

    /// Pointer moved from `drag_origin` to `pointer` at time `now` (ms).
    ///
    /// Ignored while a token is moving, and on a fresh ruler until the
    /// pointer has travelled [`min_drag_fraction`] of a cell. Otherwise the
    /// measurement runs now if the interval has elapsed, or is deferred.
    ///
    /// [`min_drag_fraction`]: crate::RulerConfig::min_drag_fraction
    pub fn on_pointer_move<C: RulerCanvas>(
        &mut self,
        registry: &RulerRegistry,
        drag_origin: Point,
        pointer: Point,
        snap: bool,
        now: u64,
        canvas: &mut C,
    ) -> Result<Option<Measurement>> {
        match self.state {
            RulerState::Inactive | RulerState::Moving => return Ok(None),
            RulerState::Starting => {
                let min = registry.grid().cell_size().width * registry.config().min_drag_fraction;
                if distance(drag_origin, pointer) < min {
                    return Ok(None);
                }
            }
            RulerState::Measuring => {}
        }
        let request = MeasureRequest::new(
            pointer,
            MeasureOptions {
                grid_spaces: true,
                snap,
            },
        );
        match self.scheduler.schedule(request, now) {
            Some(request) => self.run(registry, request, canvas).map(Some),
            None => Ok(None),
        }
    }

    /// Run the deferred measurement if its interval has passed.
    pub fn flush_deferred<C: RulerCanvas>(
        &mut self,
        registry: &RulerRegistry,
        now: u64,
        canvas: &mut C,
    ) -> Result<Option<Measurement>> {
        if self.state == RulerState::Moving {
            return Ok(None);
        }
        match self.scheduler.flush(now) {
            Some(request) => self.run(registry, request, canvas).map(Some),
            None => Ok(None),
        }
    }

    /// Drop the deferred measurement, if any.
    pub fn cancel_scheduled_measurement(&mut self) {
        self.scheduler.cancel();
    }

    /// The deferred measurement, if any.
    pub fn scheduled_measurement(&self) -> Option<&MeasureRequest> {
        self.scheduler.pending()
    }

    fn run<C: RulerCanvas>(
        &mut self,
        registry: &RulerRegistry,
        request: MeasureRequest,
        canvas: &mut C,
    ) -> Result<Measurement> {
        let m = self.measure(registry, request.destination, request.options, canvas)?;
        self.state = RulerState::Measuring;
        Ok(m)
    }

    /// Move a token along the measured path, then end the measurement.
    ///
    /// A refused move ([`RulerError::Paused`], [`RulerError::Collision`])
    /// leaves the ruler untouched so the user can adjust and retry.
    pub fn move_token<M: TokenMover + ?Sized>(
        &mut self,
        registry: &RulerRegistry,
        mover: &mut M,
    ) -> Result<MoveOutcome> {
        let previous = core::mem::replace(&mut self.state, RulerState::Moving);
        match travel(registry, &self.waypoints, self.destination, mover) {
            Ok(MoveOutcome::NothingToMove) => {
                self.state = previous;
                Ok(MoveOutcome::NothingToMove)
            }
            Ok(outcome) => {
                self.end_measurement();
                Ok(outcome)
            }
            Err(e) => {
                self.state = previous;
                Err(e)
            }
        }
    }

    /// Extension data attached to the ruler.
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// See [`Flags::get_flag`].
    pub fn get_flag(&self, scope: &str, key: &str) -> Option<&Value> {
        self.flags.get_flag(scope, key)
    }

    /// See [`Flags::set_flag`].
    pub fn set_flag(&mut self, scope: &str, key: &str, value: Value) -> Result<()> {
        self.flags.set_flag(scope, key, value)
    }

    /// See [`Flags::unset_flag`].
    pub fn unset_flag(&mut self, scope: &str, key: &str) -> Result<Option<Value>> {
        self.flags.unset_flag(scope, key)
    }

    /// Current state as a snapshot.
    pub fn to_snapshot(&self) -> RulerSnapshot {
        RulerSnapshot {
            name: self.name.clone(),
            waypoints: self.waypoints.clone(),
            destination: self.destination.map(Waypoint::from),
            state: self.state,
            flags: self.flags.clone(),
        }
    }

    /// Current state as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_snapshot()).map_err(RulerError::Snapshot)
    }

    /// Replace the ruler's state with `snapshot`.
    ///
    /// Any deferred measurement is dropped. Call [`measure`](Self::measure)
    /// afterwards to redraw.
    pub fn update(&mut self, snapshot: RulerSnapshot) {
        self.name = snapshot.name;
        self.waypoints = snapshot.waypoints;
        self.destination = snapshot.destination.map(|w| w.position());
        self.state = snapshot.state;
        self.flags = snapshot.flags;
        self.scheduler.cancel();
    }

    /// Replace the ruler's state from JSON produced by [`to_json`](Self::to_json).
    pub fn update_from_json(&mut self, json: &str) -> Result<()> {
        let snapshot = serde_json::from_str(json).map_err(RulerError::Snapshot)?;
        self.update(snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingCanvas;
    use serde_json::json;

    fn registry() -> RulerRegistry {
        RulerRegistry::square(50.0, 5.0)
    }

    #[test]
    fn start_centres_origin() {
        let reg = registry();
        let mut ruler = Ruler::new("r", Color::WHITE, &reg);
        ruler.start(&reg, Point::new(10.0, 40.0));
        assert_eq!(ruler.state(), RulerState::Starting);
        assert_eq!(ruler.waypoints()[0].point, Point::new(25.0, 25.0));
    }

    #[test]
    fn fresh_ruler_waits_for_a_real_drag() {
        let reg = registry();
        let mut canvas = RecordingCanvas::new();
        let mut ruler = Ruler::new("r", Color::WHITE, &reg);
        ruler.start(&reg, Point::new(25.0, 25.0));
        let origin = Point::new(25.0, 25.0);
        // A quarter of a 50px cell is 12.5px.
        let m = ruler
            .on_pointer_move(&reg, origin, Point::new(35.0, 25.0), true, 0, &mut canvas)
            .unwrap();
        assert!(m.is_none());
        assert_eq!(ruler.state(), RulerState::Starting);
        let m = ruler
            .on_pointer_move(&reg, origin, Point::new(125.0, 25.0), true, 10, &mut canvas)
            .unwrap();
        assert!(m.is_some());
        assert_eq!(ruler.state(), RulerState::Measuring);
    }

    #[test]
    fn deferred_measurement_runs_on_flush() {
        let reg = registry();
        let mut canvas = RecordingCanvas::new();
        let mut ruler = Ruler::new("r", Color::WHITE, &reg);
        ruler.start(&reg, Point::new(25.0, 25.0));
        let o = Point::new(25.0, 25.0);
        assert!(
            ruler
                .on_pointer_move(&reg, o, Point::new(125.0, 25.0), true, 100, &mut canvas)
                .unwrap()
                .is_some()
        );
        assert!(
            ruler
                .on_pointer_move(&reg, o, Point::new(175.0, 25.0), true, 120, &mut canvas)
                .unwrap()
                .is_none()
        );
        assert!(ruler.scheduled_measurement().is_some());
        let m = ruler.flush_deferred(&reg, 200, &mut canvas).unwrap().unwrap();
        assert_eq!(m.destination.point, Point::new(175.0, 25.0));
        assert_eq!(ruler.destination().map(|d| d.point), Some(Point::new(175.0, 25.0)));
    }

    #[test]
    fn moving_ruler_ignores_measurement_requests() {
        let reg = registry();
        let mut canvas = RecordingCanvas::new();
        let mut ruler = Ruler::new("r", Color::WHITE, &reg);
        ruler.start(&reg, Point::new(25.0, 25.0));
        let o = Point::new(25.0, 25.0);
        ruler
            .on_pointer_move(&reg, o, Point::new(125.0, 25.0), true, 100, &mut canvas)
            .unwrap()
            .unwrap();
        ruler
            .on_pointer_move(&reg, o, Point::new(175.0, 25.0), true, 120, &mut canvas)
            .unwrap();
        assert!(ruler.scheduled_measurement().is_some());

        ruler.state = RulerState::Moving;
        let drawn = canvas.commands.len();
        assert!(ruler.flush_deferred(&reg, 500, &mut canvas).unwrap().is_none());

        let mut snapshot = ruler.to_snapshot();
        snapshot.state = RulerState::Moving;
        ruler.update(snapshot);
        let m = ruler
            .on_pointer_move(&reg, o, Point::new(225.0, 25.0), true, 1_000, &mut canvas)
            .unwrap();
        assert!(m.is_none());
        assert!(ruler.scheduled_measurement().is_none());
        assert_eq!(canvas.commands.len(), drawn);
        assert_eq!(ruler.state(), RulerState::Moving);
        assert_eq!(ruler.destination().map(|d| d.point), Some(Point::new(125.0, 25.0)));
    }

    #[test]
    fn add_waypoint_adopts_pathfinding_points() {
        let reg = registry();
        let mut ruler = Ruler::new("r", Color::WHITE, &reg);
        ruler.start(&reg, Point::ZERO);
        ruler.push_waypoint(Waypoint::pathfinding(Point::new(75.0, 25.0)));
        ruler.add_waypoint(&reg, Point::new(130.0, 30.0), false);
        assert!(ruler.waypoints().iter().all(|w| !w.is_pathfinding()));
        assert_eq!(ruler.waypoints()[2].point, Point::new(130.0, 30.0));
    }

    #[test]
    fn removing_waypoints() {
        let reg = registry();
        let mut canvas = RecordingCanvas::new();
        let mut ruler = Ruler::new("r", Color::WHITE, &reg);
        ruler.start(&reg, Point::ZERO);
        ruler.add_waypoint(&reg, Point::new(100.0, 0.0), true);
        let m = ruler
            .remove_waypoint(&reg, Point::new(200.0, 0.0), RemoveOptions::default(), &mut canvas)
            .unwrap()
            .unwrap();
        assert_eq!(ruler.waypoints().len(), 1);
        assert_eq!(m.chain.len(), 1);

        let quiet = RemoveOptions {
            remeasure: false,
            ..RemoveOptions::default()
        };
        ruler.add_waypoint(&reg, Point::new(100.0, 0.0), true);
        assert!(
            ruler
                .remove_waypoint(&reg, Point::ZERO, quiet, &mut canvas)
                .unwrap()
                .is_none()
        );
        assert_eq!(ruler.waypoints().len(), 1);

        ruler
            .remove_waypoint(&reg, Point::ZERO, RemoveOptions::default(), &mut canvas)
            .unwrap();
        assert_eq!(ruler.state(), RulerState::Inactive);
    }

    #[test]
    fn snapshot_round_trip() {
        let reg = registry();
        let mut canvas = RecordingCanvas::new();
        let mut ruler = Ruler::new("alice", Color::WHITE, &reg);
        ruler.start(&reg, Point::ZERO);
        ruler.add_waypoint(&reg, Point::new(100.0, 0.0), true);
        ruler
            .measure(&reg, Point::new(200.0, 100.0), MeasureOptions::default(), &mut canvas)
            .unwrap();
        ruler.set_flag("speed", "walk", json!(30)).unwrap();

        let json = ruler.to_json().unwrap();
        let mut copy = Ruler::new("other", Color::BLACK, &reg);
        copy.update_from_json(&json).unwrap();
        assert_eq!(copy.to_snapshot(), ruler.to_snapshot());
        assert_eq!(copy.name(), "alice");
        assert_eq!(copy.get_flag("speed", "walk"), Some(&json!(30)));

        let err = copy.update_from_json("{ not json").unwrap_err();
        assert!(matches!(err, RulerError::Snapshot(_)));
    }

    #[test]
    fn measuring_without_origin_fails() {
        let reg = registry();
        let mut ruler = Ruler::new("r", Color::WHITE, &reg);
        let err = ruler
            .measure(
                &reg,
                Point::new(100.0, 0.0),
                MeasureOptions::default(),
                &mut RecordingCanvas::new(),
            )
            .unwrap_err();
        assert!(matches!(err, RulerError::NoOrigin));
    }
}
