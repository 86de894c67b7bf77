// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Throttling of measurements while the pointer moves.
//!
//! At most one measurement runs per interval. A request arriving too soon is
//! parked; a newer one replaces it, and the parked request runs once the
//! interval has passed and the host calls [`MeasurementScheduler::flush`].
//! Timestamps are caller-supplied milliseconds.
//!
//! ```
//! use kurbo::Point;
//! use libruler::{MeasureOptions, MeasureRequest, MeasurementScheduler};
//!
//! let mut scheduler = MeasurementScheduler::new(50);
//! let request = |x| MeasureRequest::new(Point::new(x, 0.0), MeasureOptions::default());
//!
//! assert!(scheduler.schedule(request(10.0), 1000).is_some());
//! assert!(scheduler.schedule(request(20.0), 1020).is_none());
//! assert!(scheduler.schedule(request(30.0), 1040).is_none());
//! assert!(scheduler.flush(1045).is_none());
//! assert_eq!(scheduler.flush(1060).map(|r| r.destination.x), Some(30.0));
//! ```

use kurbo::Point;

use crate::measure::MeasureOptions;

/// A measurement the pointer asked for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasureRequest {
    /// Pointer position to measure to.
    pub destination: Point,
    /// Options for the pass.
    pub options: MeasureOptions,
}

impl MeasureRequest {
    /// Create a request.
    pub const fn new(destination: Point, options: MeasureOptions) -> Self {
        Self {
            destination,
            options,
        }
    }
}

/// Last-write-wins measurement throttle.
#[derive(Clone, Debug)]
pub struct MeasurementScheduler {
    /// Minimum time between two measurements, in milliseconds.
    pub interval: u64,
    last_measured: Option<u64>,
    deferred: Option<MeasureRequest>,
}

impl MeasurementScheduler {
    /// Create a scheduler with the given interval in milliseconds.
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            last_measured: None,
            deferred: None,
        }
    }

    fn due(&self, now: u64) -> bool {
        self.last_measured
            .is_none_or(|t| now.saturating_sub(t) > self.interval)
    }

    /// Offer `request` at time `now`.
    ///
    /// Returns the request when it should run immediately; any parked
    /// request is dropped in that case. Otherwise the request is parked,
    /// replacing an older one, and `None` is returned.
    pub fn schedule(&mut self, request: MeasureRequest, now: u64) -> Option<MeasureRequest> {
        if self.due(now) {
            self.last_measured = Some(now);
            self.deferred = None;
            Some(request)
        } else {
            self.deferred = Some(request);
            None
        }
    }

    /// Take the parked request if the interval has passed.
    pub fn flush(&mut self, now: u64) -> Option<MeasureRequest> {
        if self.deferred.is_none() || !self.due(now) {
            return None;
        }
        self.last_measured = Some(now);
        self.deferred.take()
    }

    /// The parked request, if any.
    pub fn pending(&self) -> Option<&MeasureRequest> {
        self.deferred.as_ref()
    }

    /// Drop the parked request.
    pub fn cancel(&mut self) {
        self.deferred = None;
    }

    /// Forget all timing and drop the parked request.
    pub fn reset(&mut self) {
        self.last_measured = None;
        self.deferred = None;
    }
}

impl Default for MeasurementScheduler {
    fn default() -> Self {
        Self::new(50)
    }
}
