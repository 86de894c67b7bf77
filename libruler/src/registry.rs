// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The collaborators a ruler measures with.

use core::fmt::Debug;

use libruler_grid::{GridDistance, GridKind, GridProjection, MeasureDistances, SquareGrid};

use crate::config::RulerConfig;
use crate::hooks::{DefaultHooks, SegmentHooks};
use crate::label::{DefaultLabelFormatter, LabelFormatter};
use crate::movement::CollisionTest;
use crate::pathfinding::Pathfinder;

/// Grid, distance rule, hooks and settings shared by the rulers of one
/// surface.
///
/// Build one at start-up and pass it by reference to every ruler call.
///
/// ```
/// use libruler::RulerRegistry;
///
/// let registry = RulerRegistry::square(100.0, 5.0);
/// assert_eq!(registry.config().min_segment_length, 10.0);
/// assert!(registry.pathfinder().is_none());
/// ```
pub struct RulerRegistry {
    config: RulerConfig,
    grid: Box<dyn GridProjection>,
    distances: Box<dyn MeasureDistances>,
    hooks: Box<dyn SegmentHooks>,
    labels: Box<dyn LabelFormatter>,
    pathfinder: Option<Box<dyn Pathfinder>>,
    collisions: Option<Box<dyn CollisionTest>>,
}

impl Debug for RulerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RulerRegistry")
            .field("config", &self.config)
            .field("grid", &self.grid.kind())
            .field("pathfinder", &self.pathfinder.is_some())
            .field("collisions", &self.collisions.is_some())
            .finish_non_exhaustive()
    }
}

impl RulerRegistry {
    /// Registry with default hooks, labels and settings.
    pub fn new(
        grid: impl GridProjection + 'static,
        distances: impl MeasureDistances + 'static,
    ) -> Self {
        Self {
            config: RulerConfig::default(),
            grid: Box::new(grid),
            distances: Box::new(distances),
            hooks: Box::new(DefaultHooks),
            labels: Box::new(DefaultLabelFormatter::default()),
            pathfinder: None,
            collisions: None,
        }
    }

    /// Registry for a square grid of `cell_size` pixels, each cell worth
    /// `distance_per_cell`, counted with the equidistant diagonal rule.
    pub fn square(cell_size: f64, distance_per_cell: f64) -> Self {
        Self::new(
            SquareGrid::new(cell_size),
            GridDistance::new(GridKind::Square, cell_size, distance_per_cell),
        )
    }

    /// Replace the settings.
    pub fn with_config(mut self, config: RulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the segment hooks.
    pub fn with_hooks(mut self, hooks: impl SegmentHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Replace the label formatter.
    pub fn with_label_formatter(mut self, labels: impl LabelFormatter + 'static) -> Self {
        self.labels = Box::new(labels);
        self
    }

    /// Install a pathfinder.
    pub fn with_pathfinder(mut self, pathfinder: impl Pathfinder + 'static) -> Self {
        self.pathfinder = Some(Box::new(pathfinder));
        self
    }

    /// Install a collision test for token movement.
    pub fn with_collision_test(mut self, collisions: impl CollisionTest + 'static) -> Self {
        self.collisions = Some(Box::new(collisions));
        self
    }

    /// Settings.
    pub fn config(&self) -> &RulerConfig {
        &self.config
    }

    /// Grid projection.
    pub fn grid(&self) -> &dyn GridProjection {
        &*self.grid
    }

    /// Surface distance rule.
    pub fn distances(&self) -> &dyn MeasureDistances {
        &*self.distances
    }

    /// Segment hooks.
    pub fn hooks(&self) -> &dyn SegmentHooks {
        &*self.hooks
    }

    /// Label formatter.
    pub fn labels(&self) -> &dyn LabelFormatter {
        &*self.labels
    }

    /// The pathfinder, when one is installed and enabled in the settings.
    pub fn pathfinder(&self) -> Option<&dyn Pathfinder> {
        self.pathfinder
            .as_deref()
            .filter(|_| self.config.pathfinding)
    }

    /// The collision test, if any.
    pub fn collisions(&self) -> Option<&dyn CollisionTest> {
        self.collisions.as_deref()
    }
}
