#![forbid(unsafe_code)]

//! Balance engine: two pans and everything derived from them.
//!
//! The engine stores only the pans. Weights, difference, status and tilt
//! are recomputed from the pans on every read, so they can never drift from
//! what is actually placed.
//!
//! # Invariants
//!
//! 1. A pan only holds factors of the category it accepts.
//! 2. `difference() == left.total_weight() - right.total_weight()` at all times.
//! 3. Instance ids are unique for the lifetime of the engine, across resets.

use serde::Serialize;

use crate::catalog::{Category, Factor};
use crate::pan::{InstanceId, Pan, PlacedFactor, Side};
use crate::status::Status;

/// Degrees of beam rotation per point of (floored) difference.
pub const TILT_DEGREES_PER_POINT: f32 = 0.4;
/// Maximum beam rotation either way.
pub const TILT_LIMIT_DEGREES: f32 = 25.0;

/// Outcome of a drop onto a pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Placement {
    Accepted { instance: InstanceId },
    /// Wrong category for the pan. Not an error: the pan simply ignores it.
    Rejected { expected: Category, got: Category },
}

impl Placement {
    #[inline]
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    #[must_use]
    pub const fn instance(&self) -> Option<InstanceId> {
        match self {
            Self::Accepted { instance } => Some(*instance),
            Self::Rejected { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BalanceEngine {
    left: Pan,
    right: Pan,
    last_instance: u64,
}

impl BalanceEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a copy of `factor` on `side`.
    ///
    /// Forces only go left, relations only go right; anything else is
    /// rejected without touching either pan.
    pub fn place(&mut self, factor: &'static Factor, side: Side) -> Placement {
        let expected = side.accepts();
        if factor.category != expected {
            tracing::debug!(
                target: "scalelab.engine",
                factor = factor.id,
                side = %side,
                "placement rejected: category does not match pan"
            );
            return Placement::Rejected {
                expected,
                got: factor.category,
            };
        }

        self.last_instance += 1;
        let instance = InstanceId::from_raw(self.last_instance);
        self.pan_mut(side).push(PlacedFactor { instance, factor });

        tracing::debug!(
            target: "scalelab.engine",
            factor = factor.id,
            side = %side,
            instance = instance.get(),
            difference = self.difference(),
            "factor placed"
        );
        Placement::Accepted { instance }
    }

    /// Remove a placement from `side`. Unknown ids are a no-op.
    pub fn remove(&mut self, instance: InstanceId, side: Side) -> Option<PlacedFactor> {
        let removed = self.pan_mut(side).remove(instance);
        match &removed {
            Some(p) => tracing::debug!(
                target: "scalelab.engine",
                factor = p.factor.id,
                side = %side,
                instance = instance.get(),
                difference = self.difference(),
                "factor removed"
            ),
            None => tracing::trace!(
                target: "scalelab.engine",
                side = %side,
                instance = instance.get(),
                "remove ignored: unknown instance"
            ),
        }
        removed
    }

    /// Empty both pans. Instance numbering continues where it left off.
    pub fn reset(&mut self) {
        self.left.clear();
        self.right.clear();
        tracing::debug!(target: "scalelab.engine", "pans cleared");
    }

    #[inline]
    #[must_use]
    pub fn pan(&self, side: Side) -> &Pan {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn pan_mut(&mut self, side: Side) -> &mut Pan {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[inline]
    #[must_use]
    pub fn left(&self) -> &Pan {
        &self.left
    }

    #[inline]
    #[must_use]
    pub fn right(&self) -> &Pan {
        &self.right
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    #[must_use]
    pub fn left_weight(&self) -> i32 {
        self.left.total_weight()
    }

    #[must_use]
    pub fn right_weight(&self) -> i32 {
        self.right.total_weight()
    }

    /// Left aggregate minus right aggregate, from the raw sums.
    #[must_use]
    pub fn difference(&self) -> i32 {
        self.left_weight() - self.right_weight()
    }

    #[must_use]
    pub fn status(&self) -> Status {
        Status::classify(self.difference())
    }

    /// Pan totals floored at zero, as the beam drawing uses them.
    #[must_use]
    pub fn visual_weights(&self) -> (i32, i32) {
        (self.left_weight().max(0), self.right_weight().max(0))
    }

    /// Beam rotation in degrees; positive means the left pan is lower.
    #[must_use]
    pub fn tilt_degrees(&self) -> f32 {
        let (left, right) = self.visual_weights();
        ((left - right) as f32 * TILT_DEGREES_PER_POINT)
            .clamp(-TILT_LIMIT_DEGREES, TILT_LIMIT_DEGREES)
    }
}
