use hifitime::Epoch;
use nalgebra::Rotation3;

use crate::{
    constants::{Seconds, MODEL_MJD_MAX, MODEL_MJD_MIN},
    earth_orientation::{equequ, frame_bias, prec, rnut80},
    fastecef_errors::FastEcefError,
    reference::ReferenceTransform,
    rotation::frame_rotation_z,
    time::{gmst, mjd_utc_after, shifted},
};

/// Inertial frame the reference rotation starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InertialFrame {
    /// J2000 mean equator and equinox.
    #[default]
    Eme2000,
    /// Geocentric celestial reference frame, offset from EME2000 by the
    /// constant frame bias (~23 mas).
    Gcrf,
}

impl InertialFrame {
    /// Rotation from this frame to EME2000.
    pub fn to_eme2000(&self) -> Rotation3<f64> {
        match self {
            InertialFrame::Eme2000 => Rotation3::identity(),
            InertialFrame::Gcrf => frame_bias(),
        }
    }
}

/// Reference Earth rotation from the classical IAU 1976/1980 chain.
///
/// Maps inertial coordinates to true-of-date Earth-fixed coordinates:
///
/// ```text
/// R(t) = R3(GAST) · N(t) · P(t) · B
/// GAST = GMST(UT1) + Δψ·cos ε
/// ```
///
/// `B` is the identity for [`InertialFrame::Eme2000`] (the default) and the
/// frame bias for [`InertialFrame::Gcrf`].
///
/// The run time axis is expressed in seconds relative to `anchor`.
///
/// Notes
/// -----
/// * UT1 is approximated by UTC (|UT1 − UTC| < 0.9 s); Earth orientation
///   parameters are not downloaded.
/// * Polar motion is ignored, so the fixed frame is the pseudo Earth-fixed
///   frame whose pole is the true celestial pole of date.
/// * Accepted dates span 1900-01-01 to 2100-01-01 (UTC).
///
/// # See also
/// * [`prec`] – IAU 1976 precession
/// * [`rnut80`] – IAU 1980 nutation
/// * [`gmst`] – mean sidereal time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IauEarthRotation {
    anchor: Epoch,
    frame: InertialFrame,
}

impl IauEarthRotation {
    /// Reference model whose epoch `0.0` is `anchor`, starting from EME2000.
    pub fn new(anchor: Epoch) -> Self {
        Self {
            anchor,
            frame: InertialFrame::default(),
        }
    }

    pub fn with_inertial_frame(mut self, frame: InertialFrame) -> Self {
        self.frame = frame;
        self
    }

    pub fn anchor(&self) -> Epoch {
        self.anchor
    }

    pub fn inertial_frame(&self) -> InertialFrame {
        self.frame
    }

    /// Calendar epoch of an offset on the run time axis.
    pub fn epoch_at(&self, offset: Seconds) -> Epoch {
        shifted(self.anchor, offset)
    }

    /// EME2000 → Earth-fixed rotation at a calendar epoch, without range checks.
    pub fn rotation_at(epoch: Epoch) -> Rotation3<f64> {
        let tt = epoch.to_mjd_tt_days();
        let ut1 = epoch.to_mjd_utc_days();

        let gast = gmst(ut1) + equequ(tt);

        frame_rotation_z(gast) * rnut80(tt) * prec(tt)
    }
}

impl ReferenceTransform for IauEarthRotation {
    fn reference_rotation(&self, epoch: Seconds) -> Result<Rotation3<f64>, FastEcefError> {
        FastEcefError::ensure_finite("epoch", epoch)?;

        let mjd = mjd_utc_after(self.anchor, epoch);
        if !(MODEL_MJD_MIN..=MODEL_MJD_MAX).contains(&mjd) {
            return Err(FastEcefError::Domain {
                epoch,
                reason: format!(
                    "MJD {mjd:.3} (UTC) outside the model range [{MODEL_MJD_MIN}, {MODEL_MJD_MAX}]"
                ),
            });
        }

        Ok(Self::rotation_at(self.epoch_at(epoch)) * self.frame.to_eme2000())
    }
}
