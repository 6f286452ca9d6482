#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use fastecef::{
    constants::{Kilometer, Seconds},
    estimator::InertialState,
    rotation::{rotmt, Axis},
};
use hifitime::Epoch;
use nalgebra::{Rotation3, Vector3};

/// Earth gravitational parameter (km³/s²).
pub const GM_EARTH: f64 = 398_600.4418;

pub fn assert_rotation_close(actual: &Rotation3<f64>, expected: &Rotation3<f64>, epsilon: f64) {
    assert_abs_diff_eq!(actual.matrix(), expected.matrix(), epsilon = epsilon);
}

/// Anchor epoch shared by the reference-model tests.
pub fn test_anchor() -> Epoch {
    Epoch::from_gregorian_utc_hms(2024, 3, 1, 6, 30, 0)
}

/// Tilted rotation standing in for a frozen precession-nutation matrix.
pub fn tilted_base() -> Rotation3<f64> {
    rotmt(0.7, Axis::Z) * rotmt(2e-3, Axis::X) * rotmt(-1e-3, Axis::Y)
}

/// Inertial state on a circular orbit of radius `radius` inclined by `inclination`.
pub fn circular_orbit(radius: Kilometer, inclination: f64) -> impl Fn(Seconds) -> InertialState {
    let n = (GM_EARTH / radius.powi(3)).sqrt();
    let tilt = rotmt(inclination, Axis::X);
    move |t| {
        let (s, c) = (n * t).sin_cos();
        InertialState {
            position: tilt * Vector3::new(radius * c, radius * s, 0.0),
            velocity: tilt * Vector3::new(-radius * n * s, radius * n * c, 0.0),
        }
    }
}
