//! # Geometry
//!
//! Planar pose and the small amount of rotation glue the controller needs on
//! top of nalgebra. Translations are `Vector2<f64>` and rotations are
//! `UnitComplex<f64>`, whose angle is always wrapped into (-pi, pi].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{UnitComplex, Vector2};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pose (position and heading in the field frame) of the vehicle or of a
/// target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    /// The position in the field frame
    pub position_m: Vector2<f64>,

    /// The heading, as the rotation from the field X axis to the vehicle's
    /// forward axis.
    pub heading: UnitComplex<f64>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Pose {
    fn default() -> Self {
        Self {
            position_m: Vector2::zeros(),
            heading: UnitComplex::identity()
        }
    }
}

impl Pose {
    /// Create a new pose from its components.
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading: UnitComplex::new(heading_rad)
        }
    }

    /// Return the heading (angle to the positive X axis) in radians.
    ///
    /// Heading is given in the range (-pi, pi].
    pub fn get_heading(&self) -> f64 {
        self.heading.angle()
    }

    /// Euclidean distance between the positions of the two poses.
    pub fn distance_to(&self, other: &Pose) -> f64 {
        (other.position_m - self.position_m).norm()
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the rotation which points along the given vector.
///
/// The zero vector has no direction, in which case the identity is returned.
pub fn heading_of(vector: &Vector2<f64>) -> UnitComplex<f64> {
    if vector.x == 0.0 && vector.y == 0.0 {
        UnitComplex::identity()
    }
    else {
        UnitComplex::new(vector.y.atan2(vector.x))
    }
}

/// Signed angle from `from` to `to`, wrapped into (-pi, pi].
pub fn ang_dist(from: &UnitComplex<f64>, to: &UnitComplex<f64>) -> f64 {
    from.angle_to(to)
}
