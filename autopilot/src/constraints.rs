//! Motion constraints for an autopilot action

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Holds the constraint information for an autopilot action: maximum
/// velocity, acceleration and jerk.
///
/// Acceleration and jerk are magnitudes, the controller applies the sign.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Constraints {
    /// Maximum velocity, infinite if unlimited.
    ///
    /// Units: meters/second
    max_velocity_ms: f64,

    /// Maximum acceleration
    ///
    /// Units: meters/second^2
    max_accel_mss: f64,

    /// Maximum jerk
    ///
    /// Units: meters/second^3
    max_jerk_msss: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

/// A blank set of constraints with no limit on velocity and zero acceleration
/// and jerk.
impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_velocity_ms: f64::INFINITY,
            max_accel_mss: 0.0,
            max_jerk_msss: 0.0
        }
    }
}

impl Constraints {
    /// Create a new set of constraints with the given max velocity,
    /// acceleration and jerk.
    pub fn new(max_velocity_ms: f64, max_accel_mss: f64, max_jerk_msss: f64) -> Self {
        Self {
            max_velocity_ms,
            max_accel_mss,
            max_jerk_msss
        }
    }

    /// Create a new set of constraints with the given max acceleration and
    /// jerk, leaving velocity unlimited.
    pub fn unlimited_velocity(max_accel_mss: f64, max_jerk_msss: f64) -> Self {
        Self {
            max_accel_mss,
            max_jerk_msss,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_velocity(self, max_velocity_ms: f64) -> Self {
        Self { max_velocity_ms, ..self }
    }

    #[must_use]
    pub fn with_acceleration(self, max_accel_mss: f64) -> Self {
        Self { max_accel_mss, ..self }
    }

    #[must_use]
    pub fn with_jerk(self, max_jerk_msss: f64) -> Self {
        Self { max_jerk_msss, ..self }
    }

    pub fn max_velocity_ms(&self) -> f64 {
        self.max_velocity_ms
    }

    pub fn max_accel_mss(&self) -> f64 {
        self.max_accel_mss
    }

    pub fn max_jerk_msss(&self) -> f64 {
        self.max_jerk_msss
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_constraints_builders() {
        let base = Constraints::unlimited_velocity(1.0, 2.0);
        assert!(base.max_velocity_ms().is_infinite());

        let limited = base.with_velocity(3.0).with_jerk(4.0);
        assert_eq!(limited, Constraints::new(3.0, 1.0, 4.0));

        // The source value is untouched
        assert!(base.max_velocity_ms().is_infinite());
        assert_eq!(base.max_jerk_msss(), 2.0);

        assert_eq!(
            Constraints::default().with_acceleration(1.5).max_accel_mss(),
            1.5
        );
    }
}
