//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle into the range (-pi, pi].
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let tau_t: T = pi_t + pi_t;

    let wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    // rem_euclid gives [-pi, pi), move the lower bound over to pi
    if wrapped <= -pi_t {
        wrapped + tau_t
    }
    else {
        wrapped
    }
}

/// Get the shortest signed angular distance from `a` to `b`, in the range
/// (-pi, pi].
pub fn get_ang_dist<T>(a: T, b: T) -> T
where
    T: Float
{
    wrap_pi(b - a)
}

/// Move `value` toward `target` by at most `max_step`.
pub fn step_toward<T>(value: T, target: T, max_step: T) -> T
where
    T: Float
{
    if (target - value).abs() <= max_step {
        target
    }
    else if target > value {
        value + max_step
    }
    else {
        value - max_step
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;
    const TAU: f64 = std::f64::consts::TAU;

    #[test]
    fn test_wrap_pi() {
        assert_eq!(wrap_pi(0f64), 0f64);
        assert_eq!(wrap_pi(PI), PI);
        assert_eq!(wrap_pi(-PI), PI);
        assert!((wrap_pi(TAU + 1f64) - 1f64).abs() < 1e-12);
        assert!((wrap_pi(-TAU - 1f64) + 1f64).abs() < 1e-12);
        assert!((wrap_pi(3f64 * PI / 2f64) + PI / 2f64).abs() < 1e-12);
    }

    #[test]
    fn test_get_ang_dist() {
        assert!((get_ang_dist(1f64, 2f64) - 1f64).abs() < 1e-12);
        assert!((get_ang_dist(2f64, 1f64) + 1f64).abs() < 1e-12);
        assert!(get_ang_dist(0f64, TAU).abs() < 1e-12);
        assert!((get_ang_dist(TAU - 0.5, 0.5) - 1f64).abs() < 1e-12);
        assert!((get_ang_dist(0.5, TAU - 0.5) + 1f64).abs() < 1e-12);
    }

    #[test]
    fn test_step_toward() {
        assert_eq!(step_toward(0f64, 1f64, 0.25), 0.25);
        assert_eq!(step_toward(0f64, -1f64, 0.25), -0.25);
        assert_eq!(step_toward(0.9f64, 1f64, 0.25), 1f64);
        assert_eq!(step_toward(1f64, 1f64, 0.25), 1f64);
    }
}
