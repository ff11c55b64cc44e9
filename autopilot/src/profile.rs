//! # Autopilot profile
//!
//! A profile determines how the autopilot approaches a target. Its
//! constraints limit the vehicle's motion, and it holds the acceptable error
//! (both translational and rotational) for the target to be considered
//! reached.
//!
//! The "beeline radius" is the distance under which the vehicle drives
//! directly at the target and no longer respects the entry angle. A small
//! overshoot then gets corrected directly instead of the vehicle circling all
//! the way back around.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::Constraints;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Approach profile for the autopilot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Profile {
    constraints: Constraints,

    /// Tolerated position error
    error_xy_m: f64,

    /// Tolerated heading error
    error_theta_rad: f64,

    /// Distance from the target inside which the entry angle is ignored
    beeline_radius_m: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Profile {
    /// Build a profile with the given constraints. Tolerated errors and
    /// beeline radius are all set to zero.
    pub fn new(constraints: Constraints) -> Self {
        Self {
            constraints,
            error_xy_m: 0.0,
            error_theta_rad: 0.0,
            beeline_radius_m: 0.0
        }
    }

    #[must_use]
    pub fn with_error_xy(self, error_xy_m: f64) -> Self {
        Self { error_xy_m, ..self }
    }

    #[must_use]
    pub fn with_error_theta(self, error_theta_rad: f64) -> Self {
        Self { error_theta_rad, ..self }
    }

    #[must_use]
    pub fn with_constraints(self, constraints: Constraints) -> Self {
        Self { constraints, ..self }
    }

    #[must_use]
    pub fn with_beeline_radius(self, beeline_radius_m: f64) -> Self {
        Self { beeline_radius_m, ..self }
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn error_xy_m(&self) -> f64 {
        self.error_xy_m
    }

    pub fn error_theta_rad(&self) -> f64 {
        self.error_theta_rad
    }

    pub fn beeline_radius_m(&self) -> f64 {
        self.beeline_radius_m
    }
}
