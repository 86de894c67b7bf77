// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing surface used by a measurement pass.

use kurbo::{Line, Point, Size};
use libruler_grid::{Color, HighlightLayers, HighlightSink};

use crate::label::SegmentLabel;

/// Where a measurement pass draws.
///
/// Grid highlights go through the [`HighlightSink`] supertrait; everything
/// else (the path line, endpoint markers, labels) through the methods here.
pub trait RulerCanvas: HighlightSink {
    /// Erase lines, endpoints and labels drawn so far.
    fn clear(&mut self);

    /// Draw the line of one segment.
    fn draw_line(&mut self, ray: Line, color: Color);

    /// Draw a waypoint marker.
    fn draw_endpoint(&mut self, center: Point, radius: f64, color: Color);

    /// Show or update a segment label.
    fn draw_label(&mut self, label: &SegmentLabel);

    /// Hide the label of waypoint pair `index`.
    fn hide_label(&mut self, index: usize);

    /// Rendered size of `text`.
    ///
    /// The default assumes a fixed-width font.
    #[allow(
        clippy::cast_precision_loss,
        reason = "Label text is a handful of characters."
    )]
    fn label_size(&self, text: &str) -> Size {
        Size::new(text.chars().count() as f64 * 9.0 + 8.0, 24.0)
    }
}

/// One recorded call on a [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`RulerCanvas::draw_line`].
    Line {
        /// Segment ray.
        ray: Line,
        /// Line colour.
        color: Color,
    },
    /// [`RulerCanvas::draw_endpoint`].
    Endpoint {
        /// Marker centre.
        center: Point,
        /// Marker radius.
        radius: f64,
        /// Fill colour.
        color: Color,
    },
    /// [`RulerCanvas::draw_label`].
    Label(SegmentLabel),
    /// [`RulerCanvas::hide_label`].
    HideLabel(usize),
}

/// A canvas that remembers what it was asked to draw.
///
/// `clear` forgets earlier commands, so after a measurement pass the
/// command list holds exactly what that pass drew.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    /// Draw commands since the last clear.
    pub commands: Vec<DrawCommand>,
    /// Grid highlights.
    pub highlights: HighlightLayers,
}

impl RecordingCanvas {
    /// Create an empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoint markers drawn since the last clear.
    pub fn endpoints(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Endpoint { center, .. } => Some(*center),
            _ => None,
        })
    }

    /// Labels drawn since the last clear.
    pub fn labels(&self) -> impl Iterator<Item = &SegmentLabel> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Label(l) => Some(l),
            _ => None,
        })
    }

    /// Number of cells highlighted on `layer`.
    pub fn highlighted(&self, layer: &str) -> usize {
        self.highlights.layer(layer).map_or(0, |l| l.len())
    }
}

impl HighlightSink for RecordingCanvas {
    fn highlight_position(&mut self, layer: &str, position: Point, color: Color) -> bool {
        self.highlights.highlight_position(layer, position, color)
    }

    fn clear_layer(&mut self, layer: &str) {
        self.highlights.clear_layer(layer);
    }
}

impl RulerCanvas for RecordingCanvas {
    fn clear(&mut self) {
        self.commands.clear();
    }

    fn draw_line(&mut self, ray: Line, color: Color) {
        self.commands.push(DrawCommand::Line { ray, color });
    }

    fn draw_endpoint(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Endpoint {
            center,
            radius,
            color,
        });
    }

    fn draw_label(&mut self, label: &SegmentLabel) {
        self.commands.push(DrawCommand::Label(label.clone()));
    }

    fn hide_label(&mut self, index: usize) {
        self.commands.push(DrawCommand::HideLabel(index));
    }
}
