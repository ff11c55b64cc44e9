//! # Drivetrain
//!
//! The drivetrain is the autopilot's view of the vehicle: it supplies the
//! current pose and field-relative velocity each cycle and accepts the
//! resulting demands. How demands are turned into wheel speeds is up to the
//! implementation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{UnitComplex, Vector2};
use serde::Deserialize;

// Internal
use autopilot::Pose;
use util::maths::{get_ang_dist, step_toward};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A pose and velocity source which also accepts velocity demands.
pub trait Drivetrain {
    /// Current field-relative pose.
    fn get_pose(&self) -> Pose;

    /// Current field-relative velocity.
    fn get_field_relative_speeds(&self) -> Vector2<f64>;

    /// Demand a field-relative velocity and a heading.
    fn set_field_relative_speeds(&mut self, vx_ms: f64, vy_ms: f64, heading: UnitComplex<f64>);

    /// Bring the vehicle to a stop, holding the current heading.
    fn stop(&mut self);
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the simulated drivetrain.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SimDriveParams {
    pub start_x_m: f64,

    pub start_y_m: f64,

    pub start_heading_rad: f64,

    /// Maximum rate at which the heading can change
    pub max_turn_rate_rads: f64
}

/// A kinematic drivetrain simulation.
///
/// The velocity demand is achieved immediately and integrated over each
/// period, while the heading slews toward the demanded heading at a bounded
/// rate. There is no wheel or motor model.
#[derive(Debug, Clone)]
pub struct SimDrive {
    pose: Pose,

    velocity_ms: Vector2<f64>,

    heading_dem: UnitComplex<f64>,

    max_turn_rate_rads: f64,

    period_s: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimDriveParams {
    pub fn start_pose(&self) -> Pose {
        Pose::new(self.start_x_m, self.start_y_m, self.start_heading_rad)
    }
}

impl SimDrive {
    /// Create a stationary simulation at the given pose.
    pub fn new(pose: Pose, max_turn_rate_rads: f64, period_s: f64) -> Self {
        Self {
            pose,
            velocity_ms: Vector2::zeros(),
            heading_dem: pose.heading,
            max_turn_rate_rads,
            period_s
        }
    }

    /// Create a simulation from its parameters.
    pub fn from_params(params: &SimDriveParams, period_s: f64) -> Self {
        Self::new(params.start_pose(), params.max_turn_rate_rads, period_s)
    }

    /// Advance the simulation by one period.
    pub fn step(&mut self) {
        self.pose.position_m += self.velocity_ms * self.period_s;

        let heading_rad = self.pose.get_heading();
        let heading_err_rad = get_ang_dist(heading_rad, self.heading_dem.angle());
        let turn_rad = step_toward(
            0.0,
            heading_err_rad,
            self.max_turn_rate_rads * self.period_s
        );
        self.pose.heading = UnitComplex::new(heading_rad + turn_rad);

        trace!(
            "SimDrive pose: ({:.4}, {:.4}) m, {:.4} rad",
            self.pose.position_m.x, self.pose.position_m.y, self.pose.get_heading()
        );
    }
}

impl Drivetrain for SimDrive {
    fn get_pose(&self) -> Pose {
        self.pose
    }

    fn get_field_relative_speeds(&self) -> Vector2<f64> {
        self.velocity_ms
    }

    fn set_field_relative_speeds(&mut self, vx_ms: f64, vy_ms: f64, heading: UnitComplex<f64>) {
        self.velocity_ms = Vector2::new(vx_ms, vy_ms);
        self.heading_dem = heading;
    }

    fn stop(&mut self) {
        self.velocity_ms = Vector2::zeros();
        self.heading_dem = self.pose.heading;
    }
}
