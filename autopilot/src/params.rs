//! Autopilot parameters
//!
//! The controller maths performs no validation of its inputs, so anything
//! loaded from a parameter file goes through these structures first.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::UnitComplex;
use serde::Deserialize;

// Internal
use crate::{Constraints, Controller, Pose, Profile, Target, DEFAULT_PERIOD_S};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters describing an autopilot profile.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ProfileParams {
    /// Maximum velocity. Leave unset for no limit.
    #[serde(default)]
    pub max_velocity_ms: Option<f64>,

    /// Maximum acceleration
    pub max_accel_mss: f64,

    /// Maximum jerk
    pub max_jerk_msss: f64,

    /// Tolerated position error at the target
    #[serde(default)]
    pub error_xy_m: f64,

    /// Tolerated heading error at the target
    #[serde(default)]
    pub error_theta_rad: f64,

    /// Distance under which the entry angle is no longer respected
    #[serde(default)]
    pub beeline_radius_m: f64,

    /// Period at which the controller is called
    #[serde(default = "default_period_s")]
    pub period_s: f64
}

/// Parameters describing an autopilot target.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TargetParams {
    pub x_m: f64,

    pub y_m: f64,

    pub heading_rad: f64,

    /// Heading to approach the target along, if any
    #[serde(default)]
    pub entry_angle_rad: Option<f64>,

    /// Desired speed on arrival
    #[serde(default)]
    pub end_velocity_ms: f64,

    /// Distance inside which the reference heading is commanded, if any
    #[serde(default)]
    pub rotation_radius_m: Option<f64>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An invalid parameter value.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParamsError {
    #[error("Parameter {0} must be finite (found {1})")]
    NotFinite(&'static str, f64),

    #[error("Parameter {0} must not be negative (found {1})")]
    Negative(&'static str, f64),

    #[error("Parameter {0} must be greater than zero (found {1})")]
    NotPositive(&'static str, f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ProfileParams {
    /// Check that every value is usable by the controller.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if let Some(v) = self.max_velocity_ms {
            check_non_negative("max_velocity_ms", v)?;
        }
        check_non_negative("max_accel_mss", self.max_accel_mss)?;
        check_non_negative("max_jerk_msss", self.max_jerk_msss)?;
        check_non_negative("error_xy_m", self.error_xy_m)?;
        check_non_negative("error_theta_rad", self.error_theta_rad)?;
        check_non_negative("beeline_radius_m", self.beeline_radius_m)?;

        check_finite("period_s", self.period_s)?;
        if self.period_s <= 0.0 {
            return Err(ParamsError::NotPositive("period_s", self.period_s));
        }

        Ok(())
    }

    /// Build the profile described by these parameters.
    pub fn to_profile(&self) -> Result<Profile, ParamsError> {
        self.validate()?;

        let mut constraints = Constraints::unlimited_velocity(
            self.max_accel_mss,
            self.max_jerk_msss
        );
        if let Some(v) = self.max_velocity_ms {
            constraints = constraints.with_velocity(v);
        }

        Ok(Profile::new(constraints)
            .with_error_xy(self.error_xy_m)
            .with_error_theta(self.error_theta_rad)
            .with_beeline_radius(self.beeline_radius_m))
    }

    /// Build a controller using this profile and period.
    pub fn to_controller(&self) -> Result<Controller, ParamsError> {
        Ok(Controller::with_period(self.to_profile()?, self.period_s))
    }
}

impl TargetParams {
    /// Build the target described by these parameters.
    pub fn to_target(&self) -> Result<Target, ParamsError> {
        check_finite("x_m", self.x_m)?;
        check_finite("y_m", self.y_m)?;
        check_finite("heading_rad", self.heading_rad)?;
        check_non_negative("end_velocity_ms", self.end_velocity_ms)?;

        let mut target = Target::new(Pose::new(self.x_m, self.y_m, self.heading_rad))
            .with_velocity(self.end_velocity_ms);

        if let Some(a) = self.entry_angle_rad {
            check_finite("entry_angle_rad", a)?;
            target = target.with_entry_angle(UnitComplex::new(a));
        }
        if let Some(r) = self.rotation_radius_m {
            check_non_negative("rotation_radius_m", r)?;
            target = target.with_rotation_radius(r);
        }

        Ok(target)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn default_period_s() -> f64 {
    DEFAULT_PERIOD_S
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ParamsError> {
    if value.is_finite() {
        Ok(())
    }
    else {
        Err(ParamsError::NotFinite(name, value))
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ParamsError> {
    check_finite(name, value)?;
    if value < 0.0 {
        Err(ParamsError::Negative(name, value))
    }
    else {
        Ok(())
    }
}
