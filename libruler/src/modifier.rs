// Copyright 2025 the libRuler Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cost adjustments applied to a measured segment distance.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Arithmetic operator of a [`DistanceModifier`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceOp {
    /// `d + operand`
    #[serde(rename = "+")]
    Add,
    /// `d - operand`
    #[serde(rename = "-")]
    Sub,
    /// `d * operand`
    #[serde(rename = "*")]
    Mul,
    /// `d / operand`
    #[serde(rename = "/")]
    Div,
}

impl DistanceOp {
    /// Apply the operator to `lhs`.
    pub fn apply(self, lhs: f64, operand: f64) -> f64 {
        match self {
            Self::Add => lhs + operand,
            Self::Sub => lhs - operand,
            Self::Mul => lhs * operand,
            Self::Div => lhs / operand,
        }
    }

    fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }
}

/// An operator and operand applied to a running distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistanceModifier {
    /// Operator.
    pub op: DistanceOp,
    /// Right-hand side.
    pub operand: f64,
}

impl DistanceModifier {
    /// Create a modifier.
    pub const fn new(op: DistanceOp, operand: f64) -> Self {
        Self { op, operand }
    }
}

impl fmt::Display for DistanceModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op.symbol(), self.operand)
    }
}

/// Fold `modifiers` over `distance`, strictly left to right.
///
/// `[+2, *3]` on `10` gives `(10 + 2) * 3`.
pub fn apply_modifiers(distance: f64, modifiers: &[DistanceModifier]) -> f64 {
    modifiers
        .iter()
        .fold(distance, |acc, m| m.op.apply(acc, m.operand))
}
