//! # Autopilot controller
//!
//! The controller drives the vehicle from its current pose and field-relative
//! velocity toward a target. It plans nothing ahead of time: every tick the
//! command is recomputed from scratch from the instantaneous state, so a
//! moving or re-specified target is followed naturally.
//!
//! All calculations happen in the target's frame, which is the field frame
//! rotated by the target's entry angle (or the field frame itself if there is
//! no entry angle). In that frame the controller picks one of two routes:
//!
//! - Beeline: drive straight at the target. Used when there is no entry angle
//!   or when the vehicle is inside the profile's beeline radius.
//! - Swirl: follow the polar spiral `r = theta` into the target, so that the
//!   vehicle arrives travelling along the entry angle.
//!
//! The desired speed along the route is capped by a closed-form jerk-limited
//! profile of the remaining distance, then the command is moved toward it by
//! at most one tick's worth of acceleration.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{UnitComplex, Vector2};
use serde::Serialize;

// Internal
use crate::{
    geometry::{ang_dist, heading_of, Pose},
    Profile, Target
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default control period.
pub const DEFAULT_PERIOD_S: f64 = 0.02;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The autopilot controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Controller {
    profile: Profile,

    /// Period between calls to `calculate`
    period_s: f64
}

/// The command for one control tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControlResult {
    /// Field-relative X velocity demand
    pub vx_ms: f64,

    /// Field-relative Y velocity demand
    pub vy_ms: f64,

    /// Heading demand
    pub target_heading: UnitComplex<f64>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The route taken toward the target on a particular tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Route {
    /// The vehicle is exactly on the target position.
    Arrived,

    /// Straight line to the target.
    Beeline,

    /// Curved approach respecting the entry angle.
    Swirl
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ControlResult {
    /// A zero velocity command holding the given heading.
    pub fn stopped(target_heading: UnitComplex<f64>) -> Self {
        Self {
            vx_ms: 0.0,
            vy_ms: 0.0,
            target_heading
        }
    }

    /// The velocity demand as a vector.
    pub fn velocity_ms(&self) -> Vector2<f64> {
        Vector2::new(self.vx_ms, self.vy_ms)
    }
}

impl Controller {
    /// Create a new controller running at the default period.
    pub fn new(profile: Profile) -> Self {
        Self::with_period(profile, DEFAULT_PERIOD_S)
    }

    /// Create a new controller which will be called every `period_s`.
    pub fn with_period(profile: Profile, period_s: f64) -> Self {
        Self {
            profile,
            period_s
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn period_s(&self) -> f64 {
        self.period_s
    }

    /// Calculate the velocity and heading demands for this tick.
    ///
    /// # Inputs
    /// - `pose`: current field-relative pose of the vehicle
    /// - `velocity_ms`: current field-relative velocity of the vehicle
    /// - `target`: the target to drive to
    pub fn calculate(
        &self,
        pose: &Pose,
        velocity_ms: &Vector2<f64>,
        target: &Target
    ) -> ControlResult {
        let offset = to_target_frame(
            &(target.reference().position_m - pose.position_m),
            target
        );

        // Already there, also guards the divisions below
        if offset == Vector2::zeros() {
            return ControlResult::stopped(target.reference().heading);
        }

        let initial = to_target_frame(velocity_ms, target);
        let disp_m = offset.norm();

        let route = self.select_route(disp_m, target);
        let goal = match route {
            Route::Swirl => self.calc_swirly_velocity(&offset, target),
            _ => {
                let towards_target = offset / disp_m;
                towards_target * self.calc_max_velocity(disp_m, target.end_velocity_ms())
            }
        };

        let out = self.correct(&initial, &goal);
        let velo = to_global_frame(&out, target);
        let rot = self.get_rotation_target(&pose.heading, target, disp_m);

        trace!(
            "Autopilot {:?}: disp {:.4} m, demand ({:.4}, {:.4}) m/s, heading {:.4} rad",
            route, disp_m, velo.x, velo.y, rot.angle()
        );

        ControlResult {
            vx_ms: velo.x,
            vy_ms: velo.y,
            target_heading: rot
        }
    }

    /// Returns true if the pose is within the profile's position and heading
    /// tolerances of the target's reference.
    pub fn at_target(&self, pose: &Pose, target: &Target) -> bool {
        let goal = target.reference();

        let ok_xy = pose.distance_to(goal) <= self.profile.error_xy_m();
        let ok_theta = ang_dist(&goal.heading, &pose.heading).abs()
            <= self.profile.error_theta_rad();

        ok_xy && ok_theta
    }

    /// The route that `calculate` takes for the given pose and target.
    pub fn route(&self, pose: &Pose, target: &Target) -> Route {
        let offset = target.reference().position_m - pose.position_m;

        if offset == Vector2::zeros() {
            Route::Arrived
        }
        else {
            self.select_route(offset.norm(), target)
        }
    }

    fn select_route(&self, disp_m: f64, target: &Target) -> Route {
        if target.entry_angle().is_none() || disp_m < self.profile.beeline_radius_m() {
            Route::Beeline
        }
        else {
            Route::Swirl
        }
    }

    /// Maximum speed at which the vehicle can still slow to `end_velo_ms`
    /// within `dist_m` under the jerk limit.
    fn calc_max_velocity(&self, dist_m: f64, end_velo_ms: f64) -> f64 {
        (4.5 * dist_m.powi(2) * self.profile.constraints().max_jerk_msss()).cbrt()
            + end_velo_ms
    }

    /// Move the velocity from `initial` toward `goal`.
    ///
    /// Only the speed along the goal direction is commanded, the lateral
    /// component of `initial` is dropped.
    fn correct(&self, initial: &Vector2<f64>, goal: &Vector2<f64>) -> Vector2<f64> {
        let constraints = self.profile.constraints();

        let angle_offset = heading_of(goal);
        let adjusted_goal = angle_offset.inverse() * goal;
        let adjusted_initial = angle_offset.inverse() * initial;

        let initial_i = adjusted_initial.x;
        let goal_i = adjusted_goal.x.min(constraints.max_velocity_ms());

        let adjusted_i = goal_i.min(
            self.push(initial_i, goal_i, constraints.max_accel_mss())
        );

        angle_offset * Vector2::new(adjusted_i, 0.0)
    }

    /// Step `start` toward `end` by at most one period of `accel_mss`.
    fn push(&self, start: f64, end: f64, accel_mss: f64) -> f64 {
        let max_change = accel_mss * self.period_s;

        if (start - end).abs() < max_change {
            end
        }
        else if start > end {
            start - max_change
        }
        else {
            start + max_change
        }
    }

    /// Desired velocity in the target frame when following the swirl.
    fn calc_swirly_velocity(&self, offset: &Vector2<f64>, target: &Target) -> Vector2<f64> {
        let disp_m = offset.norm();
        let theta = heading_of(offset);
        let rads = theta.angle();
        let dist_m = calc_swirly_length(rads, disp_m);

        // Tangent of r = theta at theta
        let direction = Vector2::new(
            theta.cos_angle() - rads * theta.sin_angle(),
            rads * theta.cos_angle() + theta.sin_angle()
        );

        let norm = direction.norm();
        if norm == 0.0 {
            return Vector2::zeros();
        }

        direction / norm * self.calc_max_velocity(dist_m, target.end_velocity_ms())
    }

    /// The heading to command.
    ///
    /// With a rotation radius the current heading is held until the vehicle
    /// is within the radius.
    fn get_rotation_target(
        &self,
        current: &UnitComplex<f64>,
        target: &Target,
        dist_m: f64
    ) -> UnitComplex<f64> {
        match target.rotation_radius_m() {
            Some(radius_m) if dist_m > radius_m => *current,
            _ => target.reference().heading
        }
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Length of the spiral `r = theta` from `theta_rad` down to zero, scaled so
/// that the spiral passes through `radius_m` at `theta_rad`.
pub fn calc_swirly_length(theta_rad: f64, radius_m: f64) -> f64 {
    if theta_rad == 0.0 {
        return radius_m;
    }

    let theta = theta_rad.abs();
    let hypot = theta.hypot(1.0);
    let log_term = (theta + hypot).ln();

    0.5 * (radius_m * hypot + radius_m * (log_term / theta))
}

fn entry_angle_or_identity(target: &Target) -> UnitComplex<f64> {
    target.entry_angle().unwrap_or_else(UnitComplex::identity)
}

fn to_target_frame(coords: &Vector2<f64>, target: &Target) -> Vector2<f64> {
    entry_angle_or_identity(target).inverse() * coords
}

fn to_global_frame(coords: &Vector2<f64>, target: &Target) -> Vector2<f64> {
    entry_angle_or_identity(target) * coords
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Constraints;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn test_profile() -> Profile {
        Profile::new(Constraints::new(2.0, 1.0, 1.0))
            .with_error_xy(0.05)
            .with_error_theta(0.05)
            .with_beeline_radius(0.5)
    }

    #[test]
    fn test_zero_offset() {
        let ctrl = Controller::new(test_profile());
        let target = Target::new(Pose::new(1.0, 2.0, 0.7));

        for t in [target, target.with_entry_angle(UnitComplex::new(FRAC_PI_2))].iter() {
            let out = ctrl.calculate(
                &Pose::new(1.0, 2.0, -1.0),
                &Vector2::new(0.5, 0.5),
                t
            );

            assert_eq!(out.velocity_ms(), Vector2::zeros());
            assert_eq!(out.target_heading, UnitComplex::new(0.7));
        }

        assert_eq!(ctrl.route(&Pose::new(1.0, 2.0, 0.7), &target), Route::Arrived);
    }

    #[test]
    fn test_beeline_first_tick() {
        let ctrl = Controller::new(test_profile());
        let target = Target::new(Pose::new(5.0, 0.0, 0.0));
        let pose = Pose::default();

        let out = ctrl.calculate(&pose, &Vector2::zeros(), &target);

        // One tick of acceleration along +x
        assert_relative_eq!(out.vx_ms, 0.02, epsilon = 1e-12);
        assert_eq!(out.vy_ms, 0.0);
        assert_eq!(out.target_heading.angle(), 0.0);
        assert!(out.velocity_ms().norm() <= ctrl.calc_max_velocity(5.0, 0.0));

        assert_eq!(ctrl.route(&pose, &target), Route::Beeline);
        assert!(!ctrl.at_target(&pose, &target));
    }

    #[test]
    fn test_swirl_first_tick() {
        let ctrl = Controller::new(test_profile());
        let target = Target::new(Pose::new(5.0, 0.0, 0.0))
            .with_entry_angle(UnitComplex::new(FRAC_PI_2));
        let pose = Pose::default();

        assert_eq!(ctrl.route(&pose, &target), Route::Swirl);

        let out = ctrl.calculate(&pose, &Vector2::zeros(), &target);

        // In the target frame the offset points along -y, so theta = -pi/2 and
        // the spiral tangent is (-pi/2, -1). Rotated back into the field frame
        // that is (1, -pi/2).
        let dir = Vector2::new(1.0, -FRAC_PI_2).normalize();
        assert_relative_eq!(out.vx_ms, 0.02 * dir.x, epsilon = 1e-9);
        assert_relative_eq!(out.vy_ms, 0.02 * dir.y, epsilon = 1e-9);

        // Not the beeline direction
        let beeline = ctrl.calculate(&pose, &Vector2::zeros(), &target.without_entry_angle());
        assert!(out.velocity_ms().normalize().dot(&beeline.velocity_ms().normalize()) < 0.99);

        assert!(!ctrl.at_target(&pose, &target));
    }

    #[test]
    fn test_beeline_inside_radius_ignores_entry_angle() {
        let ctrl = Controller::new(test_profile());
        let target = Target::new(Pose::new(0.3, 0.0, 0.0))
            .with_entry_angle(UnitComplex::new(FRAC_PI_2));
        let pose = Pose::default();

        assert_eq!(ctrl.route(&pose, &target), Route::Beeline);

        let out = ctrl.calculate(&pose, &Vector2::zeros(), &target);
        assert_relative_eq!(out.vx_ms, 0.02, epsilon = 1e-12);
        assert!(out.vy_ms.abs() < 1e-12);
    }

    #[test]
    fn test_decelerates_to_goal_speed() {
        let ctrl = Controller::new(test_profile());
        let target = Target::new(Pose::new(0.1, 0.0, 0.0));

        let out = ctrl.calculate(&Pose::default(), &Vector2::new(2.0, 0.0), &target);

        // Slowing down is not rate limited, the goal speed is taken directly
        assert_relative_eq!(out.vx_ms, (4.5f64 * 0.01).cbrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_clamped() {
        let ctrl = Controller::new(test_profile());
        let target = Target::new(Pose::new(100.0, 0.0, 0.0)).with_velocity(1.0);

        let out = ctrl.calculate(&Pose::default(), &Vector2::new(1.99, 0.0), &target);
        assert_relative_eq!(out.vx_ms, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lateral_velocity_dropped() {
        let ctrl = Controller::new(test_profile());
        let target = Target::new(Pose::new(5.0, 0.0, 0.0));

        let out = ctrl.calculate(&Pose::default(), &Vector2::new(0.0, 1.0), &target);
        assert_relative_eq!(out.vx_ms, 0.02, epsilon = 1e-12);
        assert_eq!(out.vy_ms, 0.0);
    }

    #[test]
    fn test_max_velocity() {
        let ctrl = Controller::new(test_profile());

        assert_relative_eq!(ctrl.calc_max_velocity(5.0, 0.0), 112.5f64.cbrt());
        assert_relative_eq!(ctrl.calc_max_velocity(0.0, 0.5), 0.5);
    }

    #[test]
    fn test_rotation_radius() {
        let ctrl = Controller::new(test_profile());
        let target = Target::new(Pose::new(5.0, 0.0, 1.0)).with_rotation_radius(2.0);
        let current = UnitComplex::new(-0.5);

        assert_eq!(ctrl.get_rotation_target(&current, &target, 5.0), current);
        assert_eq!(ctrl.get_rotation_target(&current, &target, 2.0), UnitComplex::new(1.0));
        assert_eq!(ctrl.get_rotation_target(&current, &target, 1.0), UnitComplex::new(1.0));

        // Without a radius the reference is always used
        let target = Target::new(Pose::new(5.0, 0.0, 1.0));
        assert_eq!(ctrl.get_rotation_target(&current, &target, 100.0), UnitComplex::new(1.0));

        // And through calculate
        let far = ctrl.calculate(
            &Pose::new(0.0, 0.0, -0.5),
            &Vector2::zeros(),
            &target.with_rotation_radius(2.0)
        );
        assert_eq!(far.target_heading, UnitComplex::new(-0.5));
    }

    #[test]
    fn test_at_target() {
        let ctrl = Controller::new(test_profile());
        let target = Target::new(Pose::new(1.0, 1.0, PI));

        assert!(ctrl.at_target(&Pose::new(1.0, 1.0, PI), &target));
        assert!(ctrl.at_target(&Pose::new(1.03, 0.97, PI), &target));

        // Wraps around +-pi
        assert!(ctrl.at_target(&Pose::new(1.0, 1.0, -PI + 0.01), &target));

        // Either bound violated
        assert!(!ctrl.at_target(&Pose::new(1.1, 1.0, PI), &target));
        assert!(!ctrl.at_target(&Pose::new(1.0, 1.0, PI - 0.1), &target));
    }

    #[test]
    fn test_swirly_length() {
        assert_eq!(calc_swirly_length(0.0, 3.0), 3.0);

        // Symmetric in theta
        assert_relative_eq!(calc_swirly_length(1.0, 2.0), calc_swirly_length(-1.0, 2.0));

        // Always at least the straight line distance
        assert!(calc_swirly_length(FRAC_PI_2, 5.0) > 5.0);
    }

    #[test]
    fn test_push_custom_period() {
        let ctrl = Controller::with_period(test_profile(), 0.1);

        assert_relative_eq!(ctrl.push(0.0, 1.0, 2.0), 0.2);
        assert_relative_eq!(ctrl.push(1.0, 0.0, 2.0), 0.8);
        assert_eq!(ctrl.push(0.9, 1.0, 2.0), 1.0);
    }

    proptest! {
        #[test]
        fn prop_push_never_overshoots(
            start in -10.0..10.0f64,
            end in -10.0..10.0f64,
            accel in 0.0..50.0f64
        ) {
            let ctrl = Controller::new(test_profile());
            let max_change = accel * ctrl.period_s();
            let out = ctrl.push(start, end, accel);

            if (start - end).abs() < max_change {
                prop_assert_eq!(out, end);
            }
            else {
                prop_assert!(((out - start).abs() - max_change).abs() < 1e-9);
                prop_assert!((out - end).abs() <= (start - end).abs());
            }
        }

        #[test]
        fn prop_swirly_length_increasing(
            theta in 0.001..PI,
            delta in 0.001..1.0f64,
            radius in 0.01..10.0f64
        ) {
            let lower = calc_swirly_length(theta, radius);
            let upper = calc_swirly_length(theta + delta, radius);

            prop_assert!(upper > lower);
            prop_assert!(lower > radius);
        }

        #[test]
        fn prop_speed_never_exceeds_limit(
            x in -10.0..10.0f64,
            y in -10.0..10.0f64,
            heading in -PI..PI,
            speed in 0.0..2.0f64,
            vel_dir in -PI..PI,
            entry in proptest::option::of(-PI..PI),
            end_velo in 0.0..3.0f64
        ) {
            let ctrl = Controller::new(test_profile());
            let mut target = Target::new(Pose::new(1.0, -1.0, 0.0)).with_velocity(end_velo);
            if let Some(e) = entry {
                target = target.with_entry_angle(UnitComplex::new(e));
            }

            let velocity = UnitComplex::new(vel_dir) * Vector2::new(speed, 0.0);
            let out = ctrl.calculate(&Pose::new(x, y, heading), &velocity, &target);

            prop_assert!(out.vx_ms.is_finite() && out.vy_ms.is_finite());
            prop_assert!(out.velocity_ms().norm() <= 2.0 + 1e-9);
        }
    }
}
