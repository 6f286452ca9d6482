use nalgebra::Rotation3;

use crate::{
    constants::{RadPerSec, Radian, Seconds},
    fastecef_errors::FastEcefError,
    reference::ReferenceTransform,
    rotation::{frame_rotation_z, wrap_angle},
};

/// Exact constant-rate spin about the shared z-axis.
///
/// ```text
/// R(t) = R3(θ0 + ω·t) · inner
/// ```
///
/// With `ω` equal to the estimator rate, the fast estimate reproduces this
/// provider exactly, which makes it the natural stub for deterministic tests.
/// An optional validity window turns epochs outside `[start, end]` into
/// [`FastEcefError::Domain`] errors.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformSpinReference {
    initial_angle: Radian,
    rate: RadPerSec,
    inner: Rotation3<f64>,
    validity: Option<(Seconds, Seconds)>,
}

impl UniformSpinReference {
    /// Spin starting at frame angle `initial_angle` at epoch 0, turning at `rate`.
    pub fn new(initial_angle: Radian, rate: RadPerSec) -> Self {
        Self {
            initial_angle,
            rate,
            inner: Rotation3::identity(),
            validity: None,
        }
    }

    /// Apply a constant rotation before the spin (e.g. a frozen precession-nutation).
    pub fn with_inner_rotation(mut self, inner: Rotation3<f64>) -> Self {
        self.inner = inner;
        self
    }

    /// Restrict the provider to epochs in `[start, end]`.
    pub fn with_validity(mut self, start: Seconds, end: Seconds) -> Self {
        self.validity = Some((start, end));
        self
    }

    pub fn rate(&self) -> RadPerSec {
        self.rate
    }
}

impl ReferenceTransform for UniformSpinReference {
    fn reference_rotation(&self, epoch: Seconds) -> Result<Rotation3<f64>, FastEcefError> {
        FastEcefError::ensure_finite("epoch", epoch)?;

        if let Some((start, end)) = self.validity {
            if !(start..=end).contains(&epoch) {
                return Err(FastEcefError::Domain {
                    epoch,
                    reason: format!("outside validity window [{start}, {end}] s"),
                });
            }
        }

        let angle = wrap_angle(self.initial_angle + self.rate * epoch);
        Ok(frame_rotation_z(angle) * self.inner)
    }
}
