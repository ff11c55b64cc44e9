//! # Autopilot target
//!
//! The goal end state of an autopilot action. A target needs a reference
//! pose, but can optionally have an entry angle, a rotation radius and a
//! desired end velocity.
//!
//! Targets are immutable, every builder returns a new target. This lets a
//! command swap in a new target mid-approach without disturbing a copy held
//! anywhere else.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::UnitComplex;

// Internal
use crate::geometry::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An autopilot target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Target {
    /// The pose to drive to
    reference: Pose,

    /// Heading along which the target should be approached, if any
    entry_angle: Option<UnitComplex<f64>>,

    /// Desired speed on arrival
    ///
    /// Units: meters/second
    end_velocity_ms: f64,

    /// Distance from the target inside which the reference heading is
    /// commanded, if any
    rotation_radius_m: Option<f64>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Target {
    /// Create a new target with the given reference pose, no entry angle, no
    /// rotation radius and zero end velocity.
    pub fn new(reference: Pose) -> Self {
        Self {
            reference,
            entry_angle: None,
            end_velocity_ms: 0.0,
            rotation_radius_m: None
        }
    }

    /// Returns a copy of this target with the given reference.
    #[must_use]
    pub fn with_reference(&self, reference: Pose) -> Self {
        Self { reference, ..*self }
    }

    /// Returns a copy of this target with the given entry angle.
    #[must_use]
    pub fn with_entry_angle(&self, entry_angle: UnitComplex<f64>) -> Self {
        Self { entry_angle: Some(entry_angle), ..*self }
    }

    /// Returns a copy of this target with the given end velocity.
    ///
    /// The end velocity is only something to aim for, nothing is flagged if
    /// the vehicle does not reach it.
    #[must_use]
    pub fn with_velocity(&self, end_velocity_ms: f64) -> Self {
        Self { end_velocity_ms, ..*self }
    }

    /// Returns a copy of this target with the given rotation radius.
    ///
    /// By default the reference heading is always commanded. With a rotation
    /// radius the vehicle holds its current heading until it is within the
    /// radius of the target.
    #[must_use]
    pub fn with_rotation_radius(&self, rotation_radius_m: f64) -> Self {
        Self { rotation_radius_m: Some(rotation_radius_m), ..*self }
    }

    /// Returns a copy of this target without an entry angle.
    #[must_use]
    pub fn without_entry_angle(&self) -> Self {
        Self { entry_angle: None, ..*self }
    }

    pub fn reference(&self) -> &Pose {
        &self.reference
    }

    pub fn entry_angle(&self) -> Option<UnitComplex<f64>> {
        self.entry_angle
    }

    pub fn end_velocity_ms(&self) -> f64 {
        self.end_velocity_ms
    }

    pub fn rotation_radius_m(&self) -> Option<f64> {
        self.rotation_radius_m
    }
}
