//! # Fast rotation estimator
//!
//! Approximates the inertial → fixed rotation at any epoch from **one** known
//! rotation (the [`BaseState`]) and a constant spin rate about the shared
//! z-axis ([`AngularRate`]):
//!
//! ```text
//! elapsed  = t − t0
//! Δθ       = wrap(ω · elapsed)          ∈ (−π, π]
//! R_est(t) = R3(Δθ) · R(t0)
//! ```
//!
//! The incremental rotation is applied on the **fixed** side of the base
//! rotation (left multiplication), using the frame-transform convention
//! `R3(θ)` of [`frame_rotation_z`]. This matches
//! [`IauEarthRotation`](crate::reference::IauEarthRotation), where sidereal
//! time enters as `R3(GAST)` on the left of precession-nutation, so a rate equal
//! to the sidereal rate makes both sides agree to first order.
//!
//! Each estimate costs one 3×3 rotation product, independent of how far the
//! query lies from the base epoch.
use nalgebra::{Rotation3, Vector3};

use crate::{
    constants::{
        Kilometer, RadPerSec, Radian, Seconds, NOMINAL_EARTH_ANGULAR_VELOCITY,
        WGS84_EARTH_ANGULAR_VELOCITY,
    },
    fastecef_errors::FastEcefError,
    reference::ReferenceTransform,
    rotation::{frame_angle_z, frame_rotation_z, wrap_angle},
};

/// Constant spin rate about the shared z-axis, in rad/s.
///
/// Positive rates describe a fixed frame turning counter-clockwise about +z,
/// as the Earth does.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AngularRate(RadPerSec);

impl AngularRate {
    /// WGS84 Earth angular velocity, 7.292115e-5 rad/s.
    pub const EARTH_WGS84: AngularRate = AngularRate(WGS84_EARTH_ANGULAR_VELOCITY);

    /// IERS nominal mean Earth angular velocity, 7.2921159e-5 rad/s.
    pub const EARTH_NOMINAL: AngularRate = AngularRate(NOMINAL_EARTH_ANGULAR_VELOCITY);

    /// Validate and wrap a rate in rad/s.
    ///
    /// Errors
    /// ------
    /// * [`FastEcefError::InvalidInput`] if `rate` is NaN or infinite.
    pub fn new(rate: RadPerSec) -> Result<Self, FastEcefError> {
        FastEcefError::ensure_finite("rate", rate).map(AngularRate)
    }

    /// Derive the rate from two known rotations.
    ///
    /// The relative rotation `second · firstᵀ` is read as a pure z-rotation
    /// `R3(Δθ)` and the rate is `Δθ / (t2 − t1)`.
    ///
    /// Notes
    /// -----
    /// * The two states must be less than half a revolution apart
    ///   (`|Δθ| < π`), otherwise whole turns are lost. For the Earth this means
    ///   less than ~11.9 h.
    /// * Any off-axis part of the relative rotation (precession, nutation) is ignored.
    ///
    /// Errors
    /// ------
    /// * [`FastEcefError::DegenerateRateDerivation`] if both epochs coincide.
    pub fn derive(first: &BaseState, second: &BaseState) -> Result<Self, FastEcefError> {
        let dt = second.epoch - first.epoch;
        if dt == 0.0 {
            return Err(FastEcefError::DegenerateRateDerivation(format!(
                "both states share epoch {} s",
                first.epoch
            )));
        }

        let relative = second.rotation * first.rotation.inverse();
        AngularRate::new(frame_angle_z(&relative) / dt)
    }

    pub fn value(&self) -> RadPerSec {
        self.0
    }

    /// The opposite rate, same magnitude.
    pub fn reversed(&self) -> Self {
        AngularRate(-self.0)
    }

    /// Spin angle accumulated over `elapsed` seconds, reduced to `(−π, π]`.
    pub fn angle_over(&self, elapsed: Seconds) -> Radian {
        wrap_angle(self.0 * elapsed)
    }
}

/// The one precisely known transform the estimator anchors to.
///
/// Fields are public for convenience; [`estimate`] checks them again, so a
/// state built with a struct literal is held to the same rules as
/// [`BaseState::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseState {
    pub epoch: Seconds,
    pub rotation: Rotation3<f64>,
}

impl BaseState {
    /// Errors
    /// ------
    /// * [`FastEcefError::InvalidInput`] if `epoch` or any entry of `rotation`
    ///   is not finite.
    pub fn new(epoch: Seconds, rotation: Rotation3<f64>) -> Result<Self, FastEcefError> {
        let base = BaseState { epoch, rotation };
        base.check()?;
        Ok(base)
    }

    /// Anchor on the reference rotation at `epoch`.
    ///
    /// Errors
    /// ------
    /// * Whatever the provider returns for `epoch`, typically [`FastEcefError::Domain`].
    /// * [`FastEcefError::InvalidInput`] if the provider returns a non-finite rotation.
    pub fn from_reference(
        provider: &impl ReferenceTransform,
        epoch: Seconds,
    ) -> Result<Self, FastEcefError> {
        let rotation = provider.reference_rotation(epoch)?;
        BaseState::new(epoch, rotation)
    }

    fn check(&self) -> Result<(), FastEcefError> {
        FastEcefError::ensure_finite("base epoch", self.epoch)?;
        match self.rotation.matrix().iter().find(|v| !v.is_finite()) {
            Some(&value) => Err(FastEcefError::InvalidInput {
                what: "base rotation",
                value,
            }),
            None => Ok(()),
        }
    }
}

/// Incremental frame rotation accumulated by `rate` over `elapsed` seconds.
pub fn incremental_rotation(rate: AngularRate, elapsed: Seconds) -> Rotation3<f64> {
    frame_rotation_z(rate.angle_over(elapsed))
}

/// Estimate the inertial → fixed rotation at `query_epoch`.
///
/// Arguments
/// ---------
/// * `base`: the known rotation and its epoch.
/// * `rate`: spin rate about z.
/// * `query_epoch`: epoch of the estimate, before or after `base.epoch`.
///
/// Returns
/// --------
/// * `R3(wrap(ω·(t − t0))) · R(t0)`, renormalized to stay orthonormal.
///
/// Errors
/// ------
/// * [`FastEcefError::InvalidInput`] if `query_epoch`, the base epoch or the
///   base rotation is not finite, or if the elapsed time or the spin angle
///   `ω · (t − t0)` overflows.
pub fn estimate(
    base: &BaseState,
    rate: AngularRate,
    query_epoch: Seconds,
) -> Result<Rotation3<f64>, FastEcefError> {
    FastEcefError::ensure_finite("query epoch", query_epoch)?;
    base.check()?;

    let elapsed = FastEcefError::ensure_finite("elapsed time", query_epoch - base.epoch)?;
    FastEcefError::ensure_finite("spin angle", rate.value() * elapsed)?;

    // all inputs finite here, so renormalization converges
    let mut rot = incremental_rotation(rate, elapsed) * base.rotation;
    rot.renormalize();

    Ok(rot)
}

/// Owns the immutable state of one estimation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FastRotationEstimator {
    base: BaseState,
    rate: AngularRate,
}

impl FastRotationEstimator {
    pub fn new(base: BaseState, rate: AngularRate) -> Self {
        Self { base, rate }
    }

    /// Anchor a new estimator on a reference provider at `base_epoch`.
    pub fn from_reference(
        provider: &impl ReferenceTransform,
        base_epoch: Seconds,
        rate: AngularRate,
    ) -> Result<Self, FastEcefError> {
        Ok(Self::new(BaseState::from_reference(provider, base_epoch)?, rate))
    }

    pub fn base(&self) -> &BaseState {
        &self.base
    }

    pub fn rate(&self) -> AngularRate {
        self.rate
    }

    /// See [`estimate`].
    pub fn estimate(&self, query_epoch: Seconds) -> Result<Rotation3<f64>, FastEcefError> {
        estimate(&self.base, self.rate, query_epoch)
    }
}

/// Position and velocity of an object, in km and km/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertialState {
    pub position: Vector3<Kilometer>,
    pub velocity: Vector3<f64>,
}

/// Express an inertial state in a frame spinning at `rate` about z.
///
/// ```text
/// r_f = R · r
/// v_f = R · v − ω ẑ × r_f
/// ```
///
/// `rotation` is the inertial → fixed rotation at the state epoch, typically
/// the output of [`estimate`].
pub fn transform_state(
    rotation: &Rotation3<f64>,
    rate: AngularRate,
    state: &InertialState,
) -> InertialState {
    let position = rotation * state.position;
    let omega = Vector3::new(0.0, 0.0, rate.value());
    let velocity = rotation * state.velocity - omega.cross(&position);

    InertialState { position, velocity }
}

#[cfg(test)]
mod estimator_test {
    use super::*;
    use crate::{
        reference::UniformSpinReference,
        rotation::{angle_between, orthonormality_residual, rotmt, Axis},
    };
    use approx::assert_relative_eq;
    use nalgebra::Matrix3;

    fn tilted_base(epoch: Seconds) -> BaseState {
        let rotation = rotmt(0.3, Axis::Z) * rotmt(2e-3, Axis::X) * rotmt(-1e-3, Axis::Y);
        BaseState::new(epoch, rotation).unwrap()
    }

    #[test]
    fn test_identity_at_base() {
        let base = tilted_base(120.0);
        let rot = estimate(&base, AngularRate::EARTH_NOMINAL, 120.0).unwrap();
        assert_relative_eq!(angle_between(&rot, &base.rotation), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_earth_rate_one_hour() {
        let base = BaseState::new(0.0, Rotation3::identity()).unwrap();
        let rot = estimate(&base, AngularRate::EARTH_NOMINAL, 3600.0).unwrap();

        assert_relative_eq!(frame_angle_z(&rot), 0.26251617, epsilon = 1e-8);
        assert_relative_eq!(
            angle_between(&Rotation3::identity(), &rot),
            0.26251617,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_rate_sign_symmetry() {
        let base = tilted_base(50.0);
        let rate = AngularRate::new(1.3e-3).unwrap();
        let forward = estimate(&base, rate, 50.0 + 777.0).unwrap();
        let backward = estimate(&base, rate.reversed(), 50.0 - 777.0).unwrap();
        assert_relative_eq!(angle_between(&forward, &backward), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_elapsed() {
        let base = BaseState::new(0.0, Rotation3::identity()).unwrap();
        let rot = estimate(&base, AngularRate::new(1e-2).unwrap(), -10.0).unwrap();
        assert_relative_eq!(frame_angle_z(&rot), -0.1, epsilon = 1e-14);
    }

    #[test]
    fn test_long_span_stays_orthonormal() {
        let base = tilted_base(0.0);
        // ~30 years
        let rot = estimate(&base, AngularRate::EARTH_NOMINAL, 9.5e8).unwrap();
        assert!(orthonormality_residual(rot.matrix()) < 1e-12);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            AngularRate::new(f64::INFINITY),
            Err(FastEcefError::InvalidInput {
                what: "rate",
                value: f64::INFINITY
            })
        );
        assert!(BaseState::new(f64::NAN, Rotation3::identity()).is_err());

        let base = tilted_base(0.0);
        let err = estimate(&base, AngularRate::EARTH_NOMINAL, f64::NAN).unwrap_err();
        assert!(matches!(
            err,
            FastEcefError::InvalidInput {
                what: "query epoch",
                ..
            }
        ));
    }

    #[test]
    fn test_overflowing_spin_angle() {
        let base = BaseState::new(0.0, Rotation3::identity()).unwrap();
        let rate = AngularRate::new(1e300).unwrap();
        assert_eq!(
            estimate(&base, rate, 1e10),
            Err(FastEcefError::InvalidInput {
                what: "spin angle",
                value: f64::INFINITY
            })
        );

        let base = BaseState::new(-1e308, Rotation3::identity()).unwrap();
        let err = estimate(&base, AngularRate::EARTH_NOMINAL, 1e308).unwrap_err();
        assert!(matches!(
            err,
            FastEcefError::InvalidInput {
                what: "elapsed time",
                ..
            }
        ));
    }

    #[test]
    fn test_literal_base_state_is_checked() {
        let base = BaseState {
            epoch: f64::NAN,
            rotation: Rotation3::identity(),
        };
        assert_eq!(
            estimate(&base, AngularRate::EARTH_NOMINAL, 10.0),
            Err(FastEcefError::InvalidInput {
                what: "base epoch",
                value: f64::NAN
            })
        );

        let nan_rotation = Rotation3::from_matrix_unchecked(Matrix3::from_element(f64::NAN));
        assert!(matches!(
            BaseState::new(0.0, nan_rotation),
            Err(FastEcefError::InvalidInput {
                what: "base rotation",
                ..
            })
        ));

        let base = BaseState {
            epoch: 0.0,
            rotation: nan_rotation,
        };
        let err = estimate(&base, AngularRate::EARTH_NOMINAL, 10.0).unwrap_err();
        assert!(matches!(
            err,
            FastEcefError::InvalidInput {
                what: "base rotation",
                ..
            }
        ));
    }

    #[test]
    fn test_non_finite_reference_rotation_rejected() {
        struct BrokenReference;

        impl ReferenceTransform for BrokenReference {
            fn reference_rotation(&self, _epoch: Seconds) -> Result<Rotation3<f64>, FastEcefError> {
                let mut m = Matrix3::identity();
                m[(1, 2)] = f64::INFINITY;
                Ok(Rotation3::from_matrix_unchecked(m))
            }
        }

        assert_eq!(
            BaseState::from_reference(&BrokenReference, 0.0),
            Err(FastEcefError::InvalidInput {
                what: "base rotation",
                value: f64::INFINITY
            })
        );
    }

    #[test]
    fn test_derive_rate() {
        let reference = UniformSpinReference::new(1.0, 7.2921159e-5)
            .with_inner_rotation(rotmt(1e-3, Axis::X));
        let first = BaseState::from_reference(&reference, 0.0).unwrap();
        let second = BaseState::from_reference(&reference, 600.0).unwrap();

        let rate = AngularRate::derive(&first, &second).unwrap();
        assert_relative_eq!(rate.value(), 7.2921159e-5, max_relative = 1e-9);

        // order does not matter
        let rate = AngularRate::derive(&second, &first).unwrap();
        assert_relative_eq!(rate.value(), 7.2921159e-5, max_relative = 1e-9);
    }

    #[test]
    fn test_derive_rate_same_epoch() {
        let base = tilted_base(10.0);
        assert!(matches!(
            AngularRate::derive(&base, &base),
            Err(FastEcefError::DegenerateRateDerivation(_))
        ));
    }

    #[test]
    fn test_estimator_matches_uniform_spin() {
        let reference = UniformSpinReference::new(0.4, 7.2921159e-5);
        let estimator =
            FastRotationEstimator::from_reference(&reference, 100.0, AngularRate::EARTH_NOMINAL)
                .unwrap();

        for t in [100.0, 160.0, -3000.0, 86_400.0] {
            let est = estimator.estimate(t).unwrap();
            let truth = reference.reference_rotation(t).unwrap();
            assert!(angle_between(&est, &truth) < 1e-12, "t = {t}");
        }
    }

    #[test]
    fn test_transform_state_ground_point_at_rest() {
        // A point co-rotating with the fixed frame has zero fixed velocity
        let rate = AngularRate::EARTH_NOMINAL;
        let rot = frame_rotation_z(0.7);
        let r = Vector3::new(6378.137, 0.0, 0.0);
        let v = Vector3::new(0.0, 0.0, rate.value()).cross(&r);

        let fixed = transform_state(
            &rot,
            rate,
            &InertialState {
                position: r,
                velocity: v,
            },
        );
        assert_relative_eq!(fixed.position.norm(), 6378.137, epsilon = 1e-9);
        assert_relative_eq!(fixed.velocity.norm(), 0.0, epsilon = 1e-12);
    }
}
