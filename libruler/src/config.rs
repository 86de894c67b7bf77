// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ruler settings.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulerError};

/// Tunable ruler settings.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```
/// use libruler::RulerConfig;
///
/// let config = RulerConfig::from_json(r#"{ "label_buffer": 30.0 }"#).unwrap();
/// assert_eq!(config.label_buffer, 30.0);
/// assert_eq!(config.min_segment_length, 10.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerConfig {
    /// Segments whose on-screen ray is shorter than this are not measured.
    pub min_segment_length: f64,
    /// Gap in pixels between a segment's far endpoint and its label box.
    pub label_buffer: f64,
    /// Radius of the endpoint markers.
    pub endpoint_radius: f64,
    /// Minimum time between two measurements while the pointer moves.
    pub measurement_interval_ms: u64,
    /// Tolerance for point and elevation comparisons.
    pub epsilon: f64,
    /// Fraction of a grid cell the pointer must travel before a freshly
    /// started ruler begins measuring.
    pub min_drag_fraction: f64,
    /// Whether an installed pathfinder is consulted at all.
    pub pathfinding: bool,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            min_segment_length: 10.0,
            label_buffer: 50.0,
            endpoint_radius: 8.0,
            measurement_interval_ms: 50,
            epsilon: libruler_geometry::EPSILON,
            min_drag_fraction: 0.25,
            pathfinding: true,
        }
    }
}

impl RulerConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(RulerError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(RulerConfig::from_json("{}").unwrap(), RulerConfig::default());
    }

    #[test]
    fn malformed_document_is_config_error() {
        let err = RulerConfig::from_json(r#"{ "pathfinding": "yes" }"#).unwrap_err();
        assert!(matches!(err, RulerError::Config(_)));
    }
}
