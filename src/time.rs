use hifitime::{Duration, Epoch};

use crate::constants::{Radian, Seconds, DAYS_PER_CENTURY, DPI, MJD, SECONDS_PER_DAY, T2000};

/// Epoch located `offset` seconds after `anchor` (before it when negative).
pub fn shifted(anchor: Epoch, offset: Seconds) -> Epoch {
    anchor + Duration::from_seconds(offset)
}

/// Signed number of seconds from `from` to `to`.
pub fn seconds_between(from: Epoch, to: Epoch) -> Seconds {
    (to - from).to_seconds()
}

/// Modified Julian Date of `anchor + offset` in the UTC scale, computed without
/// building the shifted epoch.
///
/// Used to range-check an offset before handing it to hifitime.
pub fn mjd_utc_after(anchor: Epoch, offset: Seconds) -> MJD {
    anchor.to_mjd_utc_days() + offset / SECONDS_PER_DAY
}

/// Greenwich mean sidereal time (IAU 1982) at `tjm`, an MJD in UT1.
///
/// ```text
/// GMST = GMST(0h UT1 of the day) + 1.00273790934 · 2π · (day fraction)
/// ```
///
/// The 0h term is the cubic in Julian centuries since J2000 from Aoki et al.
/// (1982). The result lies in `[0, 2π)`.
pub fn gmst(tjm: MJD) -> Radian {
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // sidereal seconds per solar second
    const SIDEREAL_RATIO: f64 = 1.00273790934;

    let day = tjm.floor();
    let t = (day - T2000) / DAYS_PER_CENTURY;

    let at_midnight = (((C3 * t + C2) * t + C1) * t + C0) * DPI / SECONDS_PER_DAY;
    let day_angle = (tjm - day) * DPI;

    (at_midnight + day_angle * SIDEREAL_RATIO).rem_euclid(DPI)
}
