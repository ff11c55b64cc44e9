//! # Autopilot library
//!
//! A motion control law which drives a ground vehicle from its current pose
//! and field-relative velocity toward a target pose, within velocity,
//! acceleration and jerk limits and optionally along a desired entry angle.
//!
//! The controller is called once per fixed-period tick and holds no state
//! between calls beyond its profile, see [`Controller`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Motion constraints (velocity, acceleration, jerk)
pub mod constraints;

/// The control law itself
pub mod controller;

/// Pose and rotation helpers
pub mod geometry;

/// Parameter file structures and validation
pub mod params;

/// Approach profile (constraints, tolerances, beeline radius)
pub mod profile;

/// Goal specification
pub mod target;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use constraints::Constraints;
pub use controller::{ControlResult, Controller, Route, DEFAULT_PERIOD_S};
pub use geometry::Pose;
pub use profile::Profile;
pub use target::Target;
