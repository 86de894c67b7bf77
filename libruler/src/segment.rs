// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segments and the chain they form.
//!
//! A [`Segment`] covers the path between two consecutive waypoints. Segments
//! accepted by a measurement pass live in a [`SegmentChain`], an arena in
//! which each segment names its predecessor by [`SegmentId`]. Cumulative
//! distance is the sum over that predecessor chain.
//!
//! Segment distances are computed on first read and cached. The cache is
//! only refreshed by [`Segment::recalculate_distance`]; adding a modifier
//! after the first read does not change the cached value.

use core::cell::Cell;
use core::ops::Index;

use kurbo::{Line, Point};
use libruler_geometry::{ElevatedPoint, project_elevated_point};
use libruler_grid::Color;
use serde_json::Value;
use smallvec::SmallVec;
use tracing::{error, trace};

use crate::error::{Result, RulerError};
use crate::flags::Flags;
use crate::label::SegmentLabel;
use crate::measure::MeasureOptions;
use crate::modifier::{DistanceModifier, apply_modifiers};
use crate::registry::RulerRegistry;

/// Points describing how the subject actually travels a segment.
///
/// Always at least two points: origin first, destination last.
pub type PhysicalPath = SmallVec<[ElevatedPoint; 2]>;

/// Position of a segment inside a [`SegmentChain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub(crate) usize);

impl SegmentId {
    /// Position in the chain, counting accepted segments only.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Memoized segment distance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DistanceCache {
    /// Not measured yet.
    #[default]
    Uncomputed,
    /// Measured value; zero is a valid measurement.
    Cached(f64),
}

/// The measured sub-path between two consecutive waypoints.
#[derive(Clone, Debug)]
pub struct Segment {
    ray: Line,
    origin: ElevatedPoint,
    destination: ElevatedPoint,
    index: usize,
    last: bool,
    prior: Option<SegmentId>,
    distance: Cell<DistanceCache>,
    modifiers: SmallVec<[DistanceModifier; 2]>,
    flags: Flags,
    color: Color,
    options: MeasureOptions,
    label: Option<SegmentLabel>,
}

impl Segment {
    /// Create the segment for waypoint pair `index`.
    pub fn new(
        origin: ElevatedPoint,
        destination: ElevatedPoint,
        index: usize,
        options: MeasureOptions,
        color: Color,
    ) -> Self {
        Self {
            ray: Line::new(origin.point, destination.point),
            origin,
            destination,
            index,
            last: false,
            prior: None,
            distance: Cell::new(DistanceCache::Uncomputed),
            modifiers: SmallVec::new(),
            flags: Flags::new(),
            color,
            options,
            label: None,
        }
    }

    /// On-screen ray from origin to destination.
    pub fn ray(&self) -> Line {
        self.ray
    }

    /// Start of the segment.
    pub fn origin(&self) -> ElevatedPoint {
        self.origin
    }

    /// End of the segment.
    pub fn destination(&self) -> ElevatedPoint {
        self.destination
    }

    /// Index of the waypoint pair this segment covers.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether this segment ends at the ruler's destination.
    pub fn is_last(&self) -> bool {
        self.last
    }

    pub(crate) fn set_last(&mut self, last: bool) {
        self.last = last;
    }

    /// The previous accepted segment, if any.
    pub fn prior(&self) -> Option<SegmentId> {
        self.prior
    }

    /// Measurement options this segment was built with.
    pub fn options(&self) -> MeasureOptions {
        self.options
    }

    /// Base colour for the segment's line and highlight.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Override the segment colour.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// The rendered label, once the segment has been drawn.
    pub fn label(&self) -> Option<&SegmentLabel> {
        self.label.as_ref()
    }

    /// Distance modifiers in application order.
    pub fn distance_modifiers(&self) -> &[DistanceModifier] {
        &self.modifiers
    }

    /// Append a distance modifier.
    ///
    /// Modifiers are normally added from
    /// [`SegmentHooks::add_properties`](crate::SegmentHooks::add_properties),
    /// before anything reads the distance.
    pub fn add_distance_modifier(&mut self, modifier: DistanceModifier) {
        self.modifiers.push(modifier);
    }

    /// Extension data attached to this segment.
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

    /// State of the distance cache.
    pub fn cached_distance(&self) -> DistanceCache {
        self.distance.get()
    }

    /// Chargeable distance of this segment, measured on first use.
    pub fn distance(&self, registry: &RulerRegistry) -> Result<f64> {
        match self.distance.get() {
            DistanceCache::Cached(d) => Ok(d),
            DistanceCache::Uncomputed => self.recalculate_distance(registry),
        }
    }

    /// Measure again and replace the cached distance.
    pub fn recalculate_distance(&self, registry: &RulerRegistry) -> Result<f64> {
        let d = self.measure_distance(registry)?;
        self.distance.set(DistanceCache::Cached(d));
        Ok(d)
    }

    /// Measure to the segment's own destination without touching the cache.
    pub fn measure_distance(&self, registry: &RulerRegistry) -> Result<f64> {
        self.measure_distance_to(registry, self.destination)
    }

    /// Measure from this segment's origin to `destination`.
    ///
    /// Goes through the full hook pipeline: physical path, distance
    /// function, result modification, then the distance modifiers.
    pub fn measure_distance_to(
        &self,
        registry: &RulerRegistry,
        destination: ElevatedPoint,
    ) -> Result<f64> {
        let hooks = registry.hooks();
        let path = hooks.construct_physical_path(self, destination);
        if path.len() < 2 {
            error!(
                segment = self.index,
                points = path.len(),
                "physical path lacks an origin or destination"
            );
            return Err(RulerError::MalformedPhysicalPath {
                segment: self.index,
                points: path.len(),
            });
        }
        let measured = hooks.distance_function(registry, self, &path)?;
        let modified = hooks.modify_distance_result(self, measured, &path);
        let d = apply_modifiers(modified, &self.modifiers);
        trace!(
            segment = self.index,
            measured,
            distance = d,
            "measured physical path"
        );
        Ok(d)
    }
}

/// Physical path straight from `segment`'s origin to `destination`.
pub fn default_physical_path(segment: &Segment, destination: ElevatedPoint) -> PhysicalPath {
    smallvec::smallvec![segment.origin, destination]
}

/// Sum of the surface distances along `path`.
///
/// Each hop with an elevation change is first rotated onto the plane with
/// [`project_elevated_point`]; when the segment measures grid spaces the
/// projected point is re-centred on its cell so diagonal and cardinal climbs
/// are counted alike. Hops whose ends coincide in the plane contribute their
/// planar distance.
pub fn default_distance(
    registry: &RulerRegistry,
    segment: &Segment,
    path: &[ElevatedPoint],
) -> Result<f64> {
    let epsilon = registry.config().epsilon;
    let grid_spaces = segment.options.grid_spaces;
    let rays: SmallVec<[Line; 2]> = path
        .windows(2)
        .map(|hop| {
            let (a, b) = (hop[0], hop[1]);
            let end = if b.has_elevation_delta(&a, epsilon) {
                match project_elevated_point(a, b) {
                    Some(c) if grid_spaces => registry.grid().center(c),
                    Some(c) => c,
                    None => b.point,
                }
            } else {
                b.point
            };
            Line::new(a.point, end)
        })
        .collect();
    let distances = registry.distances().measure_distances(&rays, grid_spaces);
    Ok(distances.iter().sum())
}

/// Accepted segments of one measurement pass, in path order.
#[derive(Clone, Debug, Default)]
pub struct SegmentChain {
    segments: Vec<Segment>,
}

impl SegmentChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `segment`, linking it to the current last segment.
    pub fn push(&mut self, mut segment: Segment) -> SegmentId {
        segment.prior = self.last_id();
        let id = SegmentId(self.segments.len());
        self.segments.push(segment);
        id
    }

    /// Number of accepted segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether no segment was accepted.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment by id.
    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.0)
    }

    /// Id of the final accepted segment.
    pub fn last_id(&self) -> Option<SegmentId> {
        self.segments.len().checked_sub(1).map(SegmentId)
    }

    /// The final accepted segment.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Segments in path order.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter()
    }

    /// Ids in path order.
    pub fn ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        (0..self.segments.len()).map(SegmentId)
    }

    /// Predecessors of `id`, nearest first.
    pub fn ancestors(&self, id: SegmentId) -> Ancestors<'_> {
        Ancestors {
            chain: self,
            next: self.get(id).and_then(Segment::prior),
        }
    }

    /// Distance of one segment. See [`Segment::distance`].
    pub fn distance(&self, id: SegmentId, registry: &RulerRegistry) -> Result<f64> {
        self[id].distance(registry)
    }

    /// Remeasure one segment. See [`Segment::recalculate_distance`].
    pub fn recalculate_distance(&self, id: SegmentId, registry: &RulerRegistry) -> Result<f64> {
        self[id].recalculate_distance(registry)
    }

    /// Cumulative distance of every predecessor of `id`; zero for the first.
    pub fn total_prior_distance(&self, id: SegmentId, registry: &RulerRegistry) -> Result<f64> {
        let lineage: SmallVec<[SegmentId; 8]> = self.ancestors(id).collect();
        let mut total = 0.0;
        // Sum from the first segment forward.
        for &p in lineage.iter().rev() {
            total += self[p].distance(registry)?;
        }
        Ok(total)
    }

    /// Cumulative distance from the start of the path through `id`.
    pub fn total_distance(&self, id: SegmentId, registry: &RulerRegistry) -> Result<f64> {
        Ok(self.total_prior_distance(id, registry)? + self[id].distance(registry)?)
    }

    /// Cumulative distance through the final segment; zero for an empty chain.
    pub fn path_distance(&self, registry: &RulerRegistry) -> Result<f64> {
        match self.last_id() {
            Some(id) => self.total_distance(id, registry),
            None => Ok(0.0),
        }
    }

    pub(crate) fn set_label(&mut self, id: SegmentId, label: SegmentLabel) {
        if let Some(s) = self.segments.get_mut(id.0) {
            s.label = Some(label);
        }
    }

    /// Surface points of every segment boundary, origin first.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.segments
            .first()
            .map(|s| s.ray.p0)
            .into_iter()
            .chain(self.segments.iter().map(|s| s.ray.p1))
    }
}

/// Direct access to a segment of this chain.
///
/// # Panics
///
/// This panics if `id` was not issued by this chain. Use
/// [`SegmentChain::get`] for ids of unknown origin.
impl Index<SegmentId> for SegmentChain {
    type Output = Segment;

    fn index(&self, id: SegmentId) -> &Segment {
        &self.segments[id.0]
    }
}

/// Iterator over the predecessors of a segment. See [`SegmentChain::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    chain: &'a SegmentChain,
    next: Option<SegmentId>,
}

impl Iterator for Ancestors<'_> {
    type Item = SegmentId;

    fn next(&mut self) -> Option<SegmentId> {
        let id = self.next?;
        self.next = self.chain.get(id).and_then(Segment::prior);
        Some(id)
    }
}
