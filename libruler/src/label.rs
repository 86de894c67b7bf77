// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segment distance labels.

use kurbo::{Line, Point, Size, Vec2};
use libruler_geometry::ray;

/// Formats the text shown next to a segment.
pub trait LabelFormatter {
    /// Text for a segment measuring `segment_distance`, with
    /// `total_distance` accumulated through it.
    fn format(&self, segment_distance: f64, total_distance: f64, is_last: bool) -> String;
}

/// `"<distance> <units>"`, with the running total in brackets on the last
/// segment: `"15 ft [30 ft]"`.
///
/// Distances are rounded to two decimals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultLabelFormatter {
    units: String,
}

impl DefaultLabelFormatter {
    /// Formatter appending `units` to every number.
    pub fn new(units: impl Into<String>) -> Self {
        Self {
            units: units.into(),
        }
    }

    /// Unit suffix.
    pub fn units(&self) -> &str {
        &self.units
    }

    fn amount(&self, d: f64) -> String {
        // Adding zero folds -0 into 0.
        let rounded = (d * 100.0).round() / 100.0 + 0.0;
        if self.units.is_empty() {
            format!("{rounded}")
        } else {
            format!("{rounded} {}", self.units)
        }
    }
}

impl Default for DefaultLabelFormatter {
    fn default() -> Self {
        Self::new("ft")
    }
}

impl LabelFormatter for DefaultLabelFormatter {
    fn format(&self, segment_distance: f64, total_distance: f64, is_last: bool) -> String {
        let mut text = self.amount(segment_distance);
        if is_last {
            text.push_str(" [");
            text.push_str(&self.amount(total_distance));
            text.push(']');
        }
        text
    }
}

/// A placed, rendered segment label.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentLabel {
    /// Waypoint-pair index of the labelled segment.
    pub index: usize,
    /// Label text.
    pub text: String,
    /// Centre of the label box.
    pub center: Point,
    /// Size of the label box.
    pub size: Size,
    /// Opacity: 1 on the last segment, 0.5 elsewhere.
    pub alpha: f64,
    /// Whether the label is shown.
    pub visible: bool,
}

impl SegmentLabel {
    /// Place a label of `size` past the far end of `ray`.
    ///
    /// The box centre sits `buffer` beyond the endpoint plus however far the
    /// box extends along the ray, so the box never covers the endpoint.
    pub fn place(
        index: usize,
        text: String,
        ray: Line,
        is_last: bool,
        size: Size,
        buffer: f64,
    ) -> Self {
        let center = ray::extend_beyond(ray, buffer + ray::center_to_edge(ray, size));
        Self {
            index,
            text,
            center,
            size,
            alpha: if is_last { 1.0 } else { 0.5 },
            visible: true,
        }
    }

    /// Top-left corner of the label box.
    pub fn origin(&self) -> Point {
        self.center - Vec2::new(self.size.width / 2.0, self.size.height / 2.0)
    }
}
