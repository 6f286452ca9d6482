//! # Error evaluator
//!
//! Pairs the fast estimate with the reference rotation at every query epoch and
//! reduces each pair to the angle between the two orientations.
//!
//! ## Behaviour
//!
//! * Query epochs are processed independently and in input order; the output
//!   has exactly one [`ErrorSample`] per input epoch.
//! * The first provider failure aborts the whole evaluation. No partial
//!   sequence is returned, since a gap would misrepresent the drift trend.
//! * With a state probe ([`evaluate_with_probe`]), each sample also carries the
//!   position and velocity errors of an object expressed in the estimated frame
//!   versus the reference frame.
//!
//! ## Example
//!
//! ```rust
//! use fastecef::estimator::{AngularRate, BaseState};
//! use fastecef::evaluator::evaluate;
//! use fastecef::reference::UniformSpinReference;
//!
//! let reference = UniformSpinReference::new(0.0, 7.2921159e-5);
//! let base = BaseState::from_reference(&reference, 0.0).unwrap();
//! let samples = evaluate(&base, AngularRate::EARTH_NOMINAL, &[0.0, 60.0, 3600.0], &reference).unwrap();
//! assert!(samples.iter().all(|s| s.deviation < 1e-12));
//! ```
use nalgebra::Rotation3;

use crate::{
    constants::{Kilometer, Radian, Seconds},
    estimator::{estimate, transform_state, AngularRate, BaseState, InertialState},
    fastecef_errors::FastEcefError,
    reference::ReferenceTransform,
    rotation::angle_between,
};

/// Default finite-difference step used to differentiate the reference rotation.
pub const DEFAULT_VELOCITY_STEP: Seconds = 1.0;

/// Comparison of the estimate and the reference at one query epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSample {
    pub epoch: Seconds,
    /// `epoch − base.epoch`
    pub elapsed: Seconds,
    pub estimated: Rotation3<f64>,
    pub reference: Rotation3<f64>,
    /// Angle of `estimatedᵀ · reference`, in `[0, π]`.
    pub deviation: Radian,
    pub probe: Option<ProbeError>,
}

/// State errors of a probe object expressed in the estimated fixed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeError {
    /// km
    pub position_error: Kilometer,
    /// km/s
    pub velocity_error: f64,
    /// Angle between the two fixed-frame velocity vectors.
    pub velocity_angle_error: Radian,
}

/// Supplies the inertial state of a probe object (e.g. a propagated satellite).
pub trait InertialStateSource {
    fn inertial_state(&self, epoch: Seconds) -> InertialState;
}

impl<F> InertialStateSource for F
where
    F: Fn(Seconds) -> InertialState,
{
    fn inertial_state(&self, epoch: Seconds) -> InertialState {
        self(epoch)
    }
}

/// Compare the fast estimate with the reference at every query epoch.
///
/// Arguments
/// ---------
/// * `base`: anchor of the estimate.
/// * `rate`: spin rate used by the estimator.
/// * `query_epochs`: epochs to evaluate, in the order they should be reported.
/// * `provider`: ground-truth rotations.
///
/// Returns
/// --------
/// * One [`ErrorSample`] per query epoch, in input order.
///
/// Errors
/// ------
/// * The first error from the estimator ([`FastEcefError::InvalidInput`]) or
///   the provider ([`FastEcefError::Domain`]), unchanged.
pub fn evaluate(
    base: &BaseState,
    rate: AngularRate,
    query_epochs: &[Seconds],
    provider: &impl ReferenceTransform,
) -> Result<Vec<ErrorSample>, FastEcefError> {
    query_epochs
        .iter()
        .map(|&epoch| evaluate_epoch(base, rate, epoch, provider))
        .collect()
}

/// Same as [`evaluate`], with position/velocity errors of a probe object.
///
/// The reference fixed-frame velocity is `R · v + Ṙ · r`, where `Ṙ` is the
/// central difference of the reference rotation over `±velocity_step`. Those two
/// extra provider calls can fail at the edge of the provider's range.
///
/// Errors
/// ------
/// * As [`evaluate`].
/// * [`FastEcefError::InvalidInput`] when `velocity_step` is not finite.
/// * [`FastEcefError::OutOfRange`] when `velocity_step` is not strictly positive.
pub fn evaluate_with_probe(
    base: &BaseState,
    rate: AngularRate,
    query_epochs: &[Seconds],
    provider: &impl ReferenceTransform,
    probe: &impl InertialStateSource,
    velocity_step: Seconds,
) -> Result<Vec<ErrorSample>, FastEcefError> {
    FastEcefError::ensure_finite("velocity step", velocity_step)?;
    if velocity_step <= 0.0 {
        return Err(FastEcefError::OutOfRange {
            what: "velocity step",
            value: velocity_step,
            expected: "> 0 s",
        });
    }

    query_epochs
        .iter()
        .map(|&epoch| -> Result<ErrorSample, FastEcefError> {
            let mut sample = evaluate_epoch(base, rate, epoch, provider)?;
            let state = probe.inertial_state(epoch);

            let estimated = transform_state(&sample.estimated, rate, &state);
            let reference =
                reference_state(provider, &sample.reference, epoch, velocity_step, &state)?;

            sample.probe = Some(ProbeError {
                position_error: (estimated.position - reference.position).norm(),
                velocity_error: (estimated.velocity - reference.velocity).norm(),
                velocity_angle_error: estimated.velocity.angle(&reference.velocity),
            });
            Ok(sample)
        })
        .collect()
}

fn evaluate_epoch(
    base: &BaseState,
    rate: AngularRate,
    epoch: Seconds,
    provider: &impl ReferenceTransform,
) -> Result<ErrorSample, FastEcefError> {
    let estimated = estimate(base, rate, epoch)?;
    let reference = provider.reference_rotation(epoch).inspect_err(|err| {
        log::debug!("reference rotation unavailable at {epoch} s: {err}");
    })?;
    let deviation = angle_between(&estimated, &reference);

    log::debug!(
        "epoch {epoch} s (elapsed {} s): deviation {deviation:.3e} rad",
        epoch - base.epoch
    );

    Ok(ErrorSample {
        epoch,
        elapsed: epoch - base.epoch,
        estimated,
        reference,
        deviation,
        probe: None,
    })
}

/// Fixed-frame state under the reference rotation, velocity by central difference.
fn reference_state(
    provider: &impl ReferenceTransform,
    rotation: &Rotation3<f64>,
    epoch: Seconds,
    step: Seconds,
    state: &InertialState,
) -> Result<InertialState, FastEcefError> {
    let before = provider.reference_rotation(epoch - step)?;
    let after = provider.reference_rotation(epoch + step)?;
    let rate_matrix = (after.matrix() - before.matrix()) / (2.0 * step);

    Ok(InertialState {
        position: rotation * state.position,
        velocity: rotation * state.velocity + rate_matrix * state.position,
    })
}

/// Streaming count, mean, standard deviation and extrema (Welford's algorithm).
///
/// The standard deviation is the bias-corrected sample estimate (divides by
/// `n − 1`) and is `0.0` for fewer than two values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ErrorStatistics {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl ErrorStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// `NaN` when empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    pub fn std_dev(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }

    /// `NaN` when empty.
    pub fn min(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.min
        }
    }

    /// `NaN` when empty.
    pub fn max(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.max
        }
    }
}

impl Extend<f64> for ErrorStatistics {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        iter.into_iter().for_each(|v| self.push(v));
    }
}

impl FromIterator<f64> for ErrorStatistics {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = ErrorStatistics::new();
        stats.extend(iter);
        stats
    }
}

/// Deviation statistics over a sequence of samples.
pub fn summarize(samples: &[ErrorSample]) -> ErrorStatistics {
    samples.iter().map(|s| s.deviation).collect()
}
