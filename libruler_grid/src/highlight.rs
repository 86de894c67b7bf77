// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named highlight layers for grid positions.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::{HashMap, HashSet};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

/// A packed `0xRRGGBB` colour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self(0x00_00_00);
    /// Opaque white.
    pub const WHITE: Self = Self(0xFF_FF_FF);
}

/// Receiver for highlighted grid positions.
///
/// Positions are top-left pixel corners of grid cells.
pub trait HighlightSink {
    /// Highlight `position` on `layer`.
    ///
    /// Returns `false` if the position was already highlighted on that layer.
    fn highlight_position(&mut self, layer: &str, position: Point, color: Color) -> bool;

    /// Remove every highlight on `layer`.
    fn clear_layer(&mut self, layer: &str);
}

/// One layer of highlighted positions, in insertion order, without duplicates.
#[derive(Clone, Default)]
pub struct HighlightLayer {
    positions: Vec<(Point, Color)>,
    seen: HashSet<(i64, i64)>,
}

impl Debug for HighlightLayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HighlightLayer")
            .field("positions", &self.positions.len())
            .finish_non_exhaustive()
    }
}

impl HighlightLayer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight `position`, unless it is already highlighted.
    pub fn highlight(&mut self, position: Point, color: Color) -> bool {
        if !self.seen.insert(position_key(position)) {
            return false;
        }
        self.positions.push((position, color));
        true
    }

    /// Whether `position` is highlighted.
    pub fn contains(&self, position: Point) -> bool {
        self.seen.contains(&position_key(position))
    }

    /// Highlighted positions with their colours, in insertion order.
    pub fn positions(&self) -> &[(Point, Color)] {
        &self.positions
    }

    /// Number of highlighted positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing is highlighted.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Remove every highlight.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.seen.clear();
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Positions are pixel coordinates; rounding to the nearest pixel is the identity we want."
)]
fn position_key(p: Point) -> (i64, i64) {
    (p.x.round() as i64, p.y.round() as i64)
}

/// A set of named highlight layers.
#[derive(Clone, Debug, Default)]
pub struct HighlightLayers {
    layers: HashMap<String, HighlightLayer>,
}

impl HighlightLayers {
    /// Create an empty set of layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// The named layer, if it has ever been highlighted.
    pub fn layer(&self, name: &str) -> Option<&HighlightLayer> {
        self.layers.get(name)
    }
}

impl HighlightSink for HighlightLayers {
    fn highlight_position(&mut self, layer: &str, position: Point, color: Color) -> bool {
        if let Some(l) = self.layers.get_mut(layer) {
            return l.highlight(position, color);
        }
        let mut l = HighlightLayer::new();
        l.highlight(position, color);
        self.layers.insert(String::from(layer), l);
        true
    }

    fn clear_layer(&mut self, layer: &str) {
        if let Some(l) = self.layers.get_mut(layer) {
            l.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_rejected() {
        let mut layer = HighlightLayer::new();
        assert!(layer.highlight(Point::new(50.0, 0.0), Color(0xFF0000)));
        assert!(!layer.highlight(Point::new(50.0, 0.0), Color(0x00FF00)));
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.positions()[0].1, Color(0xFF0000));
    }

    #[test]
    fn layers_are_independent() {
        let mut layers = HighlightLayers::new();
        let p = Point::new(100.0, 100.0);
        assert!(layers.highlight_position("a", p, Color::WHITE));
        assert!(layers.highlight_position("b", p, Color::WHITE));
        layers.clear_layer("a");
        assert!(layers.layer("a").is_some_and(HighlightLayer::is_empty));
        assert!(layers.layer("b").is_some_and(|l| l.contains(p)));
        assert!(layers.layer("c").is_none());
    }
}
