//! # Precession and nutation of the Earth's axis
//!
//! Classical IAU 1976 precession and IAU 1980 nutation, used by the reference
//! Earth rotation model ([`crate::reference::IauEarthRotation`]). Every matrix
//! returned here is a **frame transformation** (`x_new = M · x_old`), built from
//! [`frame_rotation`] elementary rotations.
//!
//! The nutation series is truncated to its leading terms (amplitudes down to
//! 0.0016″), which keeps the model within a few milliarcseconds of the full
//! 106-term theory.
use nalgebra::Rotation3;

use crate::{
    constants::{ArcSec, Radian, DAYS_PER_CENTURY, DPI, MJD, RADEG, RADSEC, T2000},
    rotation::{frame_rotation, Axis},
};

/// Julian centuries elapsed since J2000.0.
#[inline]
fn centuries_since_j2000(tjm: MJD) -> f64 {
    (tjm - T2000) / DAYS_PER_CENTURY
}

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// The polynomial is evaluated with Horner's scheme:
///
/// ```text
/// ε = ((ob3 * t + ob2) * t + ob1) * t + ob0
/// ```
pub fn obleq(tjm: MJD) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = centuries_since_j2000(tjm);

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// One periodic term of the IAU 1980 nutation series.
///
/// `args` multiplies the fundamental arguments `(l, l', F, D, Ω)`;
/// amplitudes are in units of 0.0001″ with a linear time term per century.
struct NutationTerm {
    args: [i8; 5],
    psi: (f64, f64),
    eps: (f64, f64),
}

const fn term(args: [i8; 5], psi: (f64, f64), eps: (f64, f64)) -> NutationTerm {
    NutationTerm { args, psi, eps }
}

#[rustfmt::skip]
const NUTATION_1980: [NutationTerm; 30] = [
    term([ 0,  0, 0,  0, 1], (-171996.0, -174.2), (92025.0,  8.9)),
    term([ 0,  0, 2, -2, 2], ( -13187.0,   -1.6), ( 5736.0, -3.1)),
    term([ 0,  0, 2,  0, 2], (  -2274.0,   -0.2), (  977.0, -0.5)),
    term([ 0,  0, 0,  0, 2], (   2062.0,    0.2), ( -895.0,  0.5)),
    term([ 0,  1, 0,  0, 0], (   1426.0,   -3.4), (   54.0, -0.1)),
    term([ 1,  0, 0,  0, 0], (    712.0,    0.1), (   -7.0,  0.0)),
    term([ 0,  1, 2, -2, 2], (   -517.0,    1.2), (  224.0, -0.6)),
    term([ 0,  0, 2,  0, 1], (   -386.0,   -0.4), (  200.0,  0.0)),
    term([ 1,  0, 2,  0, 2], (   -301.0,    0.0), (  129.0, -0.1)),
    term([ 0, -1, 2, -2, 2], (    217.0,   -0.5), (  -95.0,  0.3)),
    term([ 1,  0, 0, -2, 0], (   -158.0,    0.0), (    0.0,  0.0)),
    term([ 0,  0, 2, -2, 1], (    129.0,    0.1), (  -70.0,  0.0)),
    term([-1,  0, 2,  0, 2], (    123.0,    0.0), (  -53.0,  0.0)),
    term([ 0,  0, 0,  2, 0], (     63.0,    0.0), (    0.0,  0.0)),
    term([ 1,  0, 0,  0, 1], (     63.0,    0.1), (  -33.0,  0.0)),
    term([-1,  0, 2,  2, 2], (    -59.0,    0.0), (   26.0,  0.0)),
    term([-1,  0, 0,  0, 1], (    -58.0,   -0.1), (   32.0,  0.0)),
    term([ 1,  0, 2,  0, 1], (    -51.0,    0.0), (   27.0,  0.0)),
    term([ 2,  0, 0, -2, 0], (     48.0,    0.0), (    0.0,  0.0)),
    term([-2,  0, 2,  0, 1], (     46.0,    0.0), (  -24.0,  0.0)),
    term([ 0,  0, 2,  2, 2], (    -38.0,    0.0), (   16.0,  0.0)),
    term([ 2,  0, 2,  0, 2], (    -31.0,    0.0), (   13.0,  0.0)),
    term([ 2,  0, 0,  0, 0], (     29.0,    0.0), (    0.0,  0.0)),
    term([ 1,  0, 2, -2, 2], (     29.0,    0.0), (  -12.0,  0.0)),
    term([ 0,  0, 2,  0, 0], (     26.0,    0.0), (    0.0,  0.0)),
    term([ 0,  0, 2, -2, 0], (    -22.0,    0.0), (    0.0,  0.0)),
    term([-1,  0, 2,  0, 1], (     21.0,    0.0), (  -10.0,  0.0)),
    term([ 0,  2, 0,  0, 0], (     17.0,   -0.1), (    0.0,  0.0)),
    term([-1,  0, 0,  2, 1], (     16.0,    0.0), (   -8.0,  0.0)),
    term([ 0,  2, 2, -2, 2], (    -16.0,    0.1), (    7.0,  0.0)),
];

/// Fundamental lunisolar arguments `(l, l', F, D, Ω)` in radians, reduced to `[0, 2π)`.
fn fundamental_arguments(t: f64) -> [Radian; 5] {
    let t2 = t * t;
    let t3 = t2 * t;

    let l = (485866.733 + 1717915922.633 * t + 31.310 * t2 + 0.064 * t3) * RADSEC;
    let lp = (1287099.804 + 129596581.224 * t - 0.577 * t2 - 0.012 * t3) * RADSEC;
    let f = (335778.877 + 1739527263.137 * t - 13.257 * t2 + 0.011 * t3) * RADSEC;
    let d = (1072261.307 + 1602961601.328 * t - 6.891 * t2 + 0.019 * t3) * RADSEC;
    let n = (450160.280 - 6962890.539 * t + 7.455 * t2 + 0.008 * t3) * RADSEC;

    [l, lp, f, d, n].map(|a| a.rem_euclid(DPI))
}

/// Compute the nutation angles in longitude and obliquity (IAU 1980, leading terms).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * A tuple `(Δψ, Δε)` in arcseconds.
pub fn nutn80(tjm: MJD) -> (ArcSec, ArcSec) {
    let t = centuries_since_j2000(tjm);
    let fa = fundamental_arguments(t);

    let (dpsi, deps) = NUTATION_1980.iter().fold((0.0, 0.0), |(dpsi, deps), term| {
        let arg: f64 = term
            .args
            .iter()
            .zip(fa.iter())
            .map(|(&k, &a)| f64::from(k) * a)
            .sum();
        (
            dpsi + (term.psi.0 + term.psi.1 * t) * arg.sin(),
            deps + (term.eps.0 + term.eps.1 * t) * arg.cos(),
        )
    });

    // 0.0001″ → ″
    (dpsi * 1e-4, deps * 1e-4)
}

/// Nutation matrix from the mean equator and equinox of date to the true
/// equator and equinox of date.
///
/// ```text
/// N = R1(−ε − Δε) · R3(−Δψ) · R1(ε)
/// ```
///
/// # See also
/// * [`nutn80`] – nutation angles
/// * [`obleq`] – mean obliquity
pub fn rnut80(tjm: MJD) -> Rotation3<f64> {
    let epsm = obleq(tjm);
    let (dpsi, deps) = nutn80(tjm);
    let epst = epsm + deps * RADSEC;

    frame_rotation(-epst, Axis::X)
        * frame_rotation(-dpsi * RADSEC, Axis::Z)
        * frame_rotation(epsm, Axis::X)
}

/// Equation of the equinoxes `Δψ · cos ε`, in radians.
///
/// Difference between apparent and mean sidereal time.
pub fn equequ(tjm: MJD) -> Radian {
    let (dpsi, _deps) = nutn80(tjm);
    RADSEC * dpsi * obleq(tjm).cos()
}

/// Precession matrix from the J2000 mean equator and equinox to the mean
/// equator and equinox of date (IAU 1976).
///
/// ```text
/// P = R3(−z) · R2(θ) · R3(−ζ)
/// ζ(T) = (0.6406161 + 0.0000839·T + 0.0000050·T²) · T  [deg]
/// θ(T) = (0.5567530 − 0.0001185·T − 0.0000116·T²) · T  [deg]
/// z(T) = (0.6406161 + 0.0003041·T + 0.0000051·T²) · T  [deg]
/// ```
pub fn prec(tjm: MJD) -> Rotation3<f64> {
    let t = centuries_since_j2000(tjm);

    let zeta = ((0.0000050 * t + 0.0000839) * t + 0.6406161) * t * RADEG;
    let z = ((0.0000051 * t + 0.0003041) * t + 0.6406161) * t * RADEG;
    let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;

    frame_rotation(-z, Axis::Z) * frame_rotation(theta, Axis::Y) * frame_rotation(-zeta, Axis::Z)
}

/// Frame bias from the GCRS to the J2000 mean equator and equinox
/// (IERS Conventions 2003, eq. 5.21).
///
/// ```text
/// B = R1(−η0) · R2(ξ0) · R3(dα0)
/// dα0 = −14.6 mas,  ξ0 = −16.6170 mas,  η0 = −6.8192 mas
/// ```
pub fn frame_bias() -> Rotation3<f64> {
    const DALPHA0: ArcSec = -0.0146;
    const XI0: ArcSec = -0.016617;
    const ETA0: ArcSec = -0.0068192;

    frame_rotation(-ETA0 * RADSEC, Axis::X)
        * frame_rotation(XI0 * RADSEC, Axis::Y)
        * frame_rotation(DALPHA0 * RADSEC, Axis::Z)
}
