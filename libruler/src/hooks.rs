// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extension points for segment construction, measurement and highlighting.
//!
//! Every method of [`SegmentHooks`] has a default, so an extension overrides
//! only what it changes. Defaults are also available as free functions
//! ([`default_physical_path`], [`default_distance`],
//! [`default_highlight_position`]) for overrides that want to wrap rather
//! than replace the stock behaviour.
//!
//! Methods are called in this order for each segment of a measurement pass:
//!
//! 1. [`add_properties`](SegmentHooks::add_properties), once, right after
//!    construction.
//! 2. [`construct_physical_path`](SegmentHooks::construct_physical_path),
//!    [`distance_function`](SegmentHooks::distance_function) and
//!    [`modify_distance_result`](SegmentHooks::modify_distance_result),
//!    whenever the segment is measured.
//! 3. [`highlight_position`](SegmentHooks::highlight_position) and, through
//!    it, [`color_for_position`](SegmentHooks::color_for_position) for each
//!    grid cell the segment crosses.

use kurbo::Point;
use libruler_geometry::ElevatedPoint;
use libruler_grid::{Color, HighlightSink};
use tracing::trace;

use crate::error::Result;
use crate::pathfinding::MovementSubject;
use crate::registry::RulerRegistry;
use crate::segment::{
    PhysicalPath, Segment, SegmentChain, SegmentId, default_distance, default_physical_path,
};

/// Overridable segment behaviour.
pub trait SegmentHooks {
    /// Attach flags or distance modifiers to a freshly built segment.
    fn add_properties(&self, _segment: &mut Segment) {}

    /// Points the subject actually travels from the segment origin to
    /// `destination`. Must contain at least the origin and the destination.
    fn construct_physical_path(
        &self,
        segment: &Segment,
        destination: ElevatedPoint,
    ) -> PhysicalPath {
        default_physical_path(segment, destination)
    }

    /// Raw distance of a physical path.
    fn distance_function(
        &self,
        registry: &RulerRegistry,
        segment: &Segment,
        path: &[ElevatedPoint],
    ) -> Result<f64> {
        default_distance(registry, segment, path)
    }

    /// Adjust the raw distance before the segment's modifiers are applied.
    fn modify_distance_result(
        &self,
        _segment: &Segment,
        measured: f64,
        _path: &[ElevatedPoint],
    ) -> f64 {
        measured
    }

    /// Highlight colour for the cell whose top-left corner is `position`.
    fn color_for_position(
        &self,
        _registry: &RulerRegistry,
        chain: &SegmentChain,
        id: SegmentId,
        _position: Point,
    ) -> Color {
        chain[id].color()
    }

    /// Highlight one grid cell of segment `id` on `layer`.
    fn highlight_position(
        &self,
        registry: &RulerRegistry,
        chain: &SegmentChain,
        id: SegmentId,
        position: Point,
        layer: &str,
        sink: &mut dyn HighlightSink,
    ) -> bool {
        default_highlight_position(self, registry, chain, id, position, layer, sink)
    }
}

/// Colour `position` with `hooks` and forward it to `sink`.
pub fn default_highlight_position<H: SegmentHooks + ?Sized>(
    hooks: &H,
    registry: &RulerRegistry,
    chain: &SegmentChain,
    id: SegmentId,
    position: Point,
    layer: &str,
    sink: &mut dyn HighlightSink,
) -> bool {
    let color = hooks.color_for_position(registry, chain, id, position);
    trace!(x = position.x, y = position.y, color = color.0, layer, "highlight");
    sink.highlight_position(layer, position, color)
}

/// Stock behaviour for every hook.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultHooks;

impl SegmentHooks for DefaultHooks {}

/// Highlights every cell a sized token covers instead of one cell per step.
///
/// All other hooks go to `inner`, which also colours and records each
/// covered cell.
#[derive(Clone, Debug)]
pub struct FootprintHooks<H = DefaultHooks> {
    subject: MovementSubject,
    inner: H,
}

impl FootprintHooks {
    /// Footprint highlighting for `subject` over the stock hooks.
    pub fn new(subject: MovementSubject) -> Self {
        Self::wrap(subject, DefaultHooks)
    }
}

impl<H> FootprintHooks<H> {
    /// Footprint highlighting for `subject` over `inner`.
    pub fn wrap(subject: MovementSubject, inner: H) -> Self {
        Self { subject, inner }
    }

    /// The token whose footprint is highlighted.
    pub fn subject(&self) -> &MovementSubject {
        &self.subject
    }

    /// The wrapped hooks.
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H: SegmentHooks> SegmentHooks for FootprintHooks<H> {
    fn add_properties(&self, segment: &mut Segment) {
        self.inner.add_properties(segment);
    }

    fn construct_physical_path(
        &self,
        segment: &Segment,
        destination: ElevatedPoint,
    ) -> PhysicalPath {
        self.inner.construct_physical_path(segment, destination)
    }

    fn distance_function(
        &self,
        registry: &RulerRegistry,
        segment: &Segment,
        path: &[ElevatedPoint],
    ) -> Result<f64> {
        self.inner.distance_function(registry, segment, path)
    }

    fn modify_distance_result(
        &self,
        segment: &Segment,
        measured: f64,
        path: &[ElevatedPoint],
    ) -> f64 {
        self.inner.modify_distance_result(segment, measured, path)
    }

    fn color_for_position(
        &self,
        registry: &RulerRegistry,
        chain: &SegmentChain,
        id: SegmentId,
        position: Point,
    ) -> Color {
        self.inner.color_for_position(registry, chain, id, position)
    }

    fn highlight_position(
        &self,
        registry: &RulerRegistry,
        chain: &SegmentChain,
        id: SegmentId,
        position: Point,
        layer: &str,
        sink: &mut dyn HighlightSink,
    ) -> bool {
        let grid = registry.grid();
        let mut added = false;
        for cell in self.subject.footprint(grid, position) {
            let at = grid.grid_to_pixels(cell);
            added |= self
                .inner
                .highlight_position(registry, chain, id, at, layer, sink);
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::MeasureOptions;
    use crate::modifier::{DistanceModifier, DistanceOp};
    use libruler_grid::{GridProjection, HighlightLayers};

    /// Doubles the cost of every segment and reports the raw value it saw.
    struct DifficultTerrain;

    impl SegmentHooks for DifficultTerrain {
        fn add_properties(&self, segment: &mut Segment) {
            segment.add_distance_modifier(DistanceModifier::new(DistanceOp::Mul, 2.0));
        }

        fn modify_distance_result(
            &self,
            _segment: &Segment,
            measured: f64,
            path: &[ElevatedPoint],
        ) -> f64 {
            assert_eq!(path.len(), 2, "default path has two points");
            measured + 1.0
        }
    }

    /// Colours cells reachable within `speed` green, the rest red.
    struct SpeedColors {
        speed: f64,
    }

    impl SegmentHooks for SpeedColors {
        fn color_for_position(
            &self,
            registry: &RulerRegistry,
            chain: &SegmentChain,
            id: SegmentId,
            position: Point,
        ) -> Color {
            let center = registry.grid().center(position);
            let so_far = chain.total_prior_distance(id, registry).unwrap_or(0.0);
            let here = chain[id]
                .measure_distance_to(registry, center.into())
                .unwrap_or(f64::INFINITY);
            if so_far + here <= self.speed {
                Color(0x00_FF_00)
            } else {
                Color(0xFF_00_00)
            }
        }
    }

    fn segment(a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment::new(
            Point::from(a).into(),
            Point::from(b).into(),
            0,
            MeasureOptions::default(),
            Color::WHITE,
        )
    }

    #[test]
    fn hook_result_precedes_modifiers() {
        let reg = RulerRegistry::square(50.0, 5.0).with_hooks(DifficultTerrain);
        let mut s = segment((25.0, 25.0), (125.0, 25.0));
        reg.hooks().add_properties(&mut s);
        // (10 + 1) * 2
        assert_eq!(s.distance(&reg).unwrap(), 22.0);
    }

    #[test]
    fn speed_colors_split_the_highlight() {
        let reg = RulerRegistry::square(50.0, 5.0).with_hooks(SpeedColors { speed: 10.0 });
        let mut chain = SegmentChain::new();
        let id = chain.push(segment((25.0, 25.0), (225.0, 25.0)));
        let mut layers = HighlightLayers::new();
        for col in 1..=4 {
            let pos = Point::new(f64::from(col) * 50.0, 0.0);
            reg.hooks()
                .highlight_position(&reg, &chain, id, pos, "ruler", &mut layers);
        }
        let colors: Vec<u32> = layers
            .layer("ruler")
            .map(|l| l.positions().iter().map(|(_, c)| c.0).collect())
            .unwrap_or_default();
        assert_eq!(colors, [0x00_FF_00, 0x00_FF_00, 0xFF_00_00, 0xFF_00_00]);
    }

    #[test]
    fn footprint_lights_every_covered_cell() {
        let subject = MovementSubject::new("ogre", 2, 2);
        let reg = RulerRegistry::square(50.0, 5.0).with_hooks(FootprintHooks::new(subject));
        let mut chain = SegmentChain::new();
        let id = chain.push(segment((75.0, 75.0), (175.0, 75.0)));
        let mut layers = HighlightLayers::new();
        let hooks = reg.hooks();
        assert!(hooks.highlight_position(
            &reg,
            &chain,
            id,
            Point::new(50.0, 50.0),
            "ruler",
            &mut layers
        ));
        let lit: Vec<Point> = layers
            .layer("ruler")
            .map(|l| l.positions().iter().map(|(p, _)| *p).collect())
            .unwrap_or_default();
        assert_eq!(
            lit,
            [
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(0.0, 50.0),
                Point::new(50.0, 50.0),
            ]
        );
        // The next cell shares a column with the first footprint.
        assert!(hooks.highlight_position(
            &reg,
            &chain,
            id,
            Point::new(100.0, 50.0),
            "ruler",
            &mut layers
        ));
        assert_eq!(layers.layer("ruler").map(|l| l.len()), Some(6));
        assert!(!hooks.highlight_position(
            &reg,
            &chain,
            id,
            Point::new(100.0, 50.0),
            "ruler",
            &mut layers
        ));
    }

    #[test]
    fn footprint_keeps_inner_colors() {
        let subject = MovementSubject::new("t", 1, 1);
        let hooks = FootprintHooks::wrap(subject, SpeedColors { speed: 10.0 });
        let reg = RulerRegistry::square(50.0, 5.0).with_hooks(hooks);
        let mut chain = SegmentChain::new();
        let id = chain.push(segment((25.0, 25.0), (225.0, 25.0)));
        let mut layers = HighlightLayers::new();
        for col in [1, 4] {
            let pos = Point::new(f64::from(col) * 50.0, 0.0);
            reg.hooks()
                .highlight_position(&reg, &chain, id, pos, "ruler", &mut layers);
        }
        let colors: Vec<u32> = layers
            .layer("ruler")
            .map(|l| l.positions().iter().map(|(_, c)| c.0).collect())
            .unwrap_or_default();
        assert_eq!(colors, [0x00_FF_00, 0xFF_00_00]);
    }

    #[test]
    fn default_color_is_segment_color() {
        let reg = RulerRegistry::square(50.0, 5.0);
        let mut chain = SegmentChain::new();
        let mut s = segment((0.0, 0.0), (100.0, 0.0));
        s.set_color(Color(0x12_34_56));
        let id = chain.push(s);
        let c = DefaultHooks.color_for_position(&reg, &chain, id, Point::ZERO);
        assert_eq!(c, Color(0x12_34_56));
    }
}
