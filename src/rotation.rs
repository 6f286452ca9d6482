//! # Rotation helpers
//!
//! Elementary rotations about the coordinate axes, the frame-transform
//! z-rotation used by the estimator, angle wrapping, and the
//! *angle between two orientations* metric used by the evaluator.
//!
//! ## Convention
//!
//! Every rotation in this crate maps **inertial coordinates to fixed
//! coordinates**: `x_fixed = R · x_inertial`. A frame that spins by an angle
//! `θ` about +z relative to the inertial frame is therefore described by the
//! *passive* matrix [`frame_rotation_z`]`(θ)`, which equals the active rotation
//! [`rotmt`]`(−θ, Axis::Z)`.
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Radian, DPI};

/// Coordinate axis selector for [`rotmt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Build the active rotation by `alpha` radians about a coordinate axis.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians (counter-clockwise when looking down the axis).
/// * `axis`: the coordinate axis to rotate about.
///
/// Returns
/// --------
/// * A [`Rotation3`] such that `v' = R · v` is `v` rotated by `alpha` about `axis`.
///
/// # See also
/// * [`frame_rotation`] – passive counterpart
pub fn rotmt(alpha: Radian, axis: Axis) -> Rotation3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha)
}

/// Passive (frame) rotation by `alpha` about a coordinate axis, the classical
/// `R1/R2/R3`: coordinates in a frame turned by `alpha` about `axis`.
pub fn frame_rotation(alpha: Radian, axis: Axis) -> Rotation3<f64> {
    rotmt(-alpha, axis)
}

/// Frame transformation into a frame turned by `theta` about the shared z-axis.
///
/// Equivalent to the classical `R3(θ)` matrix
///
/// ```text
/// | cos θ   sin θ   0 |
/// | -sin θ  cos θ   0 |
/// |   0       0     1 |
/// ```
pub fn frame_rotation_z(theta: Radian) -> Rotation3<f64> {
    frame_rotation(theta, Axis::Z)
}

/// Reduce an angle to the principal range `(−π, π]`.
///
/// Large inputs (e.g. a rate multiplied by years of elapsed seconds) are
/// reduced with `rem_euclid` first so that the trigonometric functions only
/// ever see a small argument.
pub fn wrap_angle(angle: Radian) -> Radian {
    let reduced = angle.rem_euclid(DPI);
    if reduced > std::f64::consts::PI {
        reduced - DPI
    } else {
        reduced
    }
}

/// Rotation angle of the relative rotation `aᵀ · b`, in `[0, π]`.
///
/// The angle is computed as `atan2(sin θ, cos θ)` from the skew-symmetric part
/// and the trace of the relative rotation, which stays accurate for tiny
/// deviations where a plain `acos` of the trace would round to zero.
///
/// # See also
/// * [`crate::evaluator::evaluate`] – applies this metric per sample
pub fn angle_between(a: &Rotation3<f64>, b: &Rotation3<f64>) -> Radian {
    let rel = a.matrix().transpose() * b.matrix();

    let cos_theta = (rel.trace() - 1.0) / 2.0;
    let skew = Vector3::new(
        rel[(2, 1)] - rel[(1, 2)],
        rel[(0, 2)] - rel[(2, 0)],
        rel[(1, 0)] - rel[(0, 1)],
    );
    let sin_theta = skew.norm() / 2.0;

    sin_theta.atan2(cos_theta)
}

/// Frobenius norm of `MᵀM − I`; zero for an exactly orthonormal matrix.
pub fn orthonormality_residual(m: &Matrix3<f64>) -> f64 {
    (m.transpose() * m - Matrix3::identity()).norm()
}

/// Frame angle `θ` of a rotation assumed to be a pure [`frame_rotation_z`]`(θ)`.
///
/// Returns a value in `(−π, π]`. Off-axis components are ignored.
pub fn frame_angle_z(rot: &Rotation3<f64>) -> Radian {
    let m = rot.matrix();
    wrap_angle((m[(0, 1)] - m[(1, 0)]).atan2(m[(0, 0)] + m[(1, 1)]))
}
