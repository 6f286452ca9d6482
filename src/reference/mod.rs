//! # Reference transform providers
//!
//! A reference provider supplies the **ground-truth** ECI → Earth-fixed
//! rotation at an arbitrary epoch. The estimator never calls it per query; the
//! evaluator uses it to measure how far the fast estimate drifts.
//!
//! ## Contract
//!
//! * Side-effect free and deterministic: repeated calls at the same epoch
//!   return the same rotation.
//! * Epochs outside the supported range fail with [`FastEcefError::Domain`].
//! * The returned rotation follows the crate convention `x_fixed = R · x_inertial`
//!   (see [`crate::rotation`]).
//!
//! ## Providers
//!
//! * [`UniformSpinReference`] – constant-rate spin about z, an exact stub for tests.
//! * [`IauEarthRotation`] – IAU 1976/1980 precession, nutation and sidereal time.
use nalgebra::Rotation3;

use crate::{constants::Seconds, fastecef_errors::FastEcefError};

mod iau_model;
mod uniform_spin;

pub use iau_model::{IauEarthRotation, InertialFrame};
pub use uniform_spin::UniformSpinReference;

/// Source of ground-truth inertial → fixed rotations.
pub trait ReferenceTransform {
    /// Rotation mapping inertial coordinates to fixed coordinates at `epoch`.
    ///
    /// Errors
    /// ------
    /// * [`FastEcefError::Domain`] when `epoch` lies outside the supported range.
    /// * [`FastEcefError::InvalidInput`] when `epoch` is not finite.
    fn reference_rotation(&self, epoch: Seconds) -> Result<Rotation3<f64>, FastEcefError>;
}

impl<T: ReferenceTransform + ?Sized> ReferenceTransform for &T {
    fn reference_rotation(&self, epoch: Seconds) -> Result<Rotation3<f64>, FastEcefError> {
        (**self).reference_rotation(epoch)
    }
}

impl<T: ReferenceTransform + ?Sized> ReferenceTransform for Box<T> {
    fn reference_rotation(&self, epoch: Seconds) -> Result<Rotation3<f64>, FastEcefError> {
        (**self).reference_rotation(epoch)
    }
}
