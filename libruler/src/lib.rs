// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! libRuler: incremental, extensible path measurement for tabletop rulers.
//!
//! A [`Ruler`] holds an ordered list of [`Waypoint`]s. Each measurement pass
//! turns the waypoints plus the pointer destination into a [`SegmentChain`]:
//!
//! - every consecutive waypoint pair becomes a [`Segment`];
//! - segments shorter than [`RulerConfig::min_segment_length`] on screen are
//!   skipped, which keeps a dragged ruler from flickering;
//! - accepted segments measure their distance lazily through the
//!   [`SegmentHooks`] pipeline (physical path, distance function, result
//!   modification, then [`DistanceModifier`]s), and chain to their
//!   predecessor for the running total;
//! - each accepted segment draws its line, label, grid highlight and
//!   endpoint markers on a [`RulerCanvas`].
//!
//! The host supplies its collaborators once, in a [`RulerRegistry`]: grid
//! projection and surface distance rule (from [`libruler_grid`]), hooks,
//! label formatter, and optionally a [`Pathfinder`] and a [`CollisionTest`].
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use libruler::{Color, MeasureOptions, RecordingCanvas, Ruler, RulerRegistry};
//!
//! let registry = RulerRegistry::square(50.0, 5.0);
//! let mut canvas = RecordingCanvas::new();
//! let mut ruler = Ruler::new("ruler", Color::WHITE, &registry);
//!
//! ruler.start(&registry, Point::new(25.0, 25.0));
//! let m = ruler
//!     .measure(&registry, Point::new(175.0, 125.0), MeasureOptions::default(), &mut canvas)
//!     .unwrap();
//! assert_eq!(m.total_distance(&registry).unwrap(), 15.0);
//! assert_eq!(canvas.labels().next().map(|l| l.text.as_str()), Some("15 ft [15 ft]"));
//! ```
//!
//! Logging goes through `tracing`; the library never installs a subscriber.

mod config;
mod error;
mod flags;
mod hooks;
mod label;
mod measure;
mod modifier;
mod movement;
mod pathfinding;
mod registry;
mod render;
mod ruler;
mod schedule;
mod segment;
mod waypoint;

pub use config::RulerConfig;
pub use error::{Result, RulerError};
pub use flags::Flags;
pub use hooks::{DefaultHooks, FootprintHooks, SegmentHooks, default_highlight_position};
pub use label::{DefaultLabelFormatter, LabelFormatter, SegmentLabel};
pub use measure::{MeasureOptions, Measurement, RulerStyle, highlight_segment, measure_path};
pub use modifier::{DistanceModifier, DistanceOp, apply_modifiers};
pub use movement::{CollisionTest, MoveOutcome, TokenMover, first_collision, rays_from_waypoints};
pub use pathfinding::{MovementSubject, Pathfinder, remove_pathfinding_waypoints, splice_route};
pub use registry::RulerRegistry;
pub use render::{DrawCommand, RecordingCanvas, RulerCanvas};
pub use ruler::{RemoveOptions, Ruler, RulerSnapshot, RulerState};
pub use schedule::{MeasureRequest, MeasurementScheduler};
pub use segment::{
    Ancestors, DistanceCache, PhysicalPath, Segment, SegmentChain, SegmentId, default_distance,
    default_physical_path,
};
pub use waypoint::{Waypoint, WaypointFlags};

pub use libruler_geometry::ElevatedPoint;
pub use libruler_grid::{Color, GridCell, GridProjection, HighlightSink, MeasureDistances};
