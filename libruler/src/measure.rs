// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One measurement pass over a waypoint path.

use libruler_geometry::{ElevatedPoint, line_length};
use libruler_grid::{Color, traverse};
use tracing::debug;

use crate::error::{Result, RulerError};
use crate::label::SegmentLabel;
use crate::registry::RulerRegistry;
use crate::render::RulerCanvas;
use crate::segment::{Segment, SegmentChain, SegmentId};
use crate::waypoint::Waypoint;

/// Options for a measurement pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureOptions {
    /// Count whole grid spaces instead of measuring straight lines.
    pub grid_spaces: bool,
    /// Snap the destination to the centre of its grid cell.
    pub snap: bool,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            grid_spaces: true,
            snap: true,
        }
    }
}

/// Identity of the ruler being drawn.
#[derive(Clone, Copy, Debug)]
pub struct RulerStyle<'a> {
    /// Highlight layer name.
    pub name: &'a str,
    /// Base colour.
    pub color: Color,
}

/// Result of a measurement pass.
#[derive(Clone, Debug)]
pub struct Measurement {
    /// Accepted segments in path order.
    pub chain: SegmentChain,
    /// Destination after snapping.
    pub destination: ElevatedPoint,
}

impl Measurement {
    /// The final accepted segment.
    pub fn last_segment(&self) -> Option<&Segment> {
        self.chain.last()
    }

    /// Cumulative distance of the whole path.
    pub fn total_distance(&self, registry: &RulerRegistry) -> Result<f64> {
        self.chain.path_distance(registry)
    }
}

/// Measure the path through `waypoints` to `destination` and draw it.
///
/// The canvas and the ruler's highlight layer are cleared first, so calling
/// this again with the same inputs redraws the same picture. Segments whose
/// ray is shorter than [`min_segment_length`] are left out of the chain;
/// only their label is hidden and their origin marker drawn.
///
/// [`min_segment_length`]: crate::RulerConfig::min_segment_length
pub fn measure_path<C: RulerCanvas>(
    registry: &RulerRegistry,
    style: RulerStyle<'_>,
    waypoints: &[Waypoint],
    destination: ElevatedPoint,
    options: MeasureOptions,
    canvas: &mut C,
) -> Result<Measurement> {
    if waypoints.is_empty() {
        return Err(RulerError::NoOrigin);
    }
    let destination = if options.snap {
        ElevatedPoint::new(registry.grid().center(destination.point), destination.elevation)
    } else {
        destination
    };

    let points: Vec<ElevatedPoint> = waypoints
        .iter()
        .map(Waypoint::position)
        .chain(core::iter::once(destination))
        .collect();

    canvas.clear_layer(style.name);
    canvas.clear();

    let config = registry.config();
    let hooks = registry.hooks();
    let last_index = points.len() - 2;
    let mut chain = SegmentChain::new();

    for (index, pair) in points.windows(2).enumerate() {
        let mut segment = Segment::new(pair[0], pair[1], index, options, style.color);
        hooks.add_properties(&mut segment);
        segment.set_last(index == last_index);

        let length = line_length(segment.ray());
        if length < config.min_segment_length {
            debug!(segment = index, length, "segment too short, skipped");
            canvas.hide_label(index);
            draw_endpoints(canvas, &segment, config.endpoint_radius);
            continue;
        }

        let id = chain.push(segment);
        let distance = chain.distance(id, registry)?;
        let total = chain.total_distance(id, registry)?;
        debug!(
            segment = index,
            distance,
            total,
            last = chain[id].is_last(),
            "segment measured"
        );

        let segment = &chain[id];
        canvas.draw_line(segment.ray(), segment.color());
        let text = registry.labels().format(distance, total, segment.is_last());
        let size = canvas.label_size(&text);
        let label = SegmentLabel::place(
            index,
            text,
            segment.ray(),
            segment.is_last(),
            size,
            config.label_buffer,
        );
        canvas.draw_label(&label);
        highlight_segment(registry, &chain, id, style.name, canvas);
        draw_endpoints(canvas, &chain[id], config.endpoint_radius);
        chain.set_label(id, label);
    }

    Ok(Measurement { chain, destination })
}

/// Highlight every grid cell segment `id` enters.
pub fn highlight_segment<C: RulerCanvas>(
    registry: &RulerRegistry,
    chain: &SegmentChain,
    id: SegmentId,
    layer: &str,
    canvas: &mut C,
) {
    let grid = registry.grid();
    let hooks = registry.hooks();
    for cell in traverse(grid, chain[id].ray()) {
        let position = grid.grid_to_pixels(cell);
        hooks.highlight_position(registry, chain, id, position, layer, canvas);
    }
}

/// Marker at the segment origin, and at its destination on the last segment.
fn draw_endpoints<C: RulerCanvas>(canvas: &mut C, segment: &Segment, radius: f64) {
    let ray = segment.ray();
    canvas.draw_endpoint(ray.p0, radius, segment.color());
    if segment.is_last() {
        canvas.draw_endpoint(ray.p1, radius, segment.color());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingCanvas};
    use kurbo::Point;

    const STYLE: RulerStyle<'static> = RulerStyle {
        name: "ruler",
        color: Color(0xFF_99_00),
    };

    fn planar(x: f64, y: f64) -> ElevatedPoint {
        ElevatedPoint::planar(Point::new(x, y))
    }

    #[test]
    fn snapping_moves_destination_to_cell_center() {
        let reg = RulerRegistry::square(50.0, 5.0);
        let mut canvas = RecordingCanvas::new();
        let wps = [Waypoint::new(Point::new(25.0, 25.0))];
        let m = measure_path(
            &reg,
            STYLE,
            &wps,
            planar(160.0, 10.0),
            MeasureOptions::default(),
            &mut canvas,
        )
        .unwrap();
        assert_eq!(m.destination.point, Point::new(175.0, 25.0));
        assert_eq!(m.total_distance(&reg).unwrap(), 15.0);
        let points: Vec<Point> = m.chain.points().collect();
        assert_eq!(points, [Point::new(25.0, 25.0), Point::new(175.0, 25.0)]);
    }

    #[test]
    fn short_middle_segment_is_skipped() {
        let reg = RulerRegistry::square(50.0, 5.0);
        let mut canvas = RecordingCanvas::new();
        let wps = [
            Waypoint::new(Point::new(25.0, 25.0)),
            Waypoint::new(Point::new(125.0, 25.0)),
            Waypoint::new(Point::new(130.0, 25.0)),
        ];
        let opts = MeasureOptions {
            grid_spaces: true,
            snap: false,
        };
        let m = measure_path(&reg, STYLE, &wps, planar(130.0, 125.0), opts, &mut canvas).unwrap();
        let indices: Vec<usize> = m.chain.iter().map(Segment::index).collect();
        assert_eq!(indices, [0, 2]);
        assert!(canvas.commands.contains(&DrawCommand::HideLabel(1)));
        // The skipped segment still marks its origin.
        assert!(canvas.endpoints().any(|p| p == Point::new(125.0, 25.0)));
        assert_eq!(m.chain[SegmentId(1)].prior(), Some(SegmentId(0)));
    }

    #[test]
    fn no_waypoints_is_an_error() {
        let reg = RulerRegistry::square(50.0, 5.0);
        let err = measure_path(
            &reg,
            STYLE,
            &[],
            planar(0.0, 0.0),
            MeasureOptions::default(),
            &mut RecordingCanvas::new(),
        )
        .unwrap_err();
        assert!(matches!(err, RulerError::NoOrigin));
    }

    #[test]
    fn labels_carry_running_total_on_last_segment() {
        let reg = RulerRegistry::square(50.0, 5.0);
        let mut canvas = RecordingCanvas::new();
        let wps = [
            Waypoint::new(Point::new(25.0, 25.0)),
            Waypoint::new(Point::new(125.0, 25.0)),
        ];
        measure_path(
            &reg,
            STYLE,
            &wps,
            planar(125.0, 175.0),
            MeasureOptions::default(),
            &mut canvas,
        )
        .unwrap();
        let texts: Vec<&str> = canvas.labels().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["10 ft", "15 ft [25 ft]"]);
        let alphas: Vec<f64> = canvas.labels().map(|l| l.alpha).collect();
        assert_eq!(alphas, [0.5, 1.0]);
    }
}
