// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for ruler measurement and movement.
//!
//! Pathfinding that finds no route is not an error; the measurement falls
//! back to the last fixed waypoint instead.

use thiserror::Error;

/// Errors raised by the ruler.
#[derive(Error, Debug)]
pub enum RulerError {
    /// A physical path did not provide both an origin and a destination.
    ///
    /// This aborts the measurement pass it occurred in.
    #[error("segment {segment}: physical path has {points} point(s), needs at least 2")]
    MalformedPhysicalPath {
        /// Index of the offending segment.
        segment: usize,
        /// Number of points the path had.
        points: usize,
    },

    /// Measurement was requested on a ruler with no origin waypoint.
    #[error("ruler has no origin waypoint")]
    NoOrigin,

    /// A movement ray would pass through a wall.
    #[error("movement along segment {segment} collides with the scene")]
    Collision {
        /// Index of the first colliding ray.
        segment: usize,
    },

    /// The game is paused and the user may not move tokens.
    #[error("game is paused")]
    Paused,

    /// A flag scope or key was empty or addressed a non-object value.
    #[error("invalid flag path {scope:?}.{key:?}")]
    InvalidFlagPath {
        /// Flag scope.
        scope: String,
        /// Flag key.
        key: String,
    },

    /// A ruler snapshot could not be serialized or parsed.
    #[error("ruler snapshot: {0}")]
    Snapshot(#[source] serde_json::Error),

    /// The ruler configuration could not be parsed.
    #[error("ruler config: {0}")]
    Config(#[source] serde_json::Error),
}

/// Result alias for ruler operations.
pub type Result<T, E = RulerError> = core::result::Result<T, E>;
