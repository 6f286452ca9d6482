use std::{env, error::Error, str::FromStr};

use fastecef::campaign::{run_campaign_with_probe, CampaignParams};
use fastecef::constants::Seconds;
use fastecef::estimator::{AngularRate, InertialState};
use fastecef::reference::{IauEarthRotation, InertialFrame};
use hifitime::Epoch;
use nalgebra::Vector3;

const GM_EARTH: f64 = 398_600.4418;

/// Circular orbit of radius `radius` (km) at inclination `inclination` (rad),
/// ascending node on the x-axis.
fn circular_orbit(radius: f64, inclination: f64) -> impl Fn(Seconds) -> InertialState {
    let n = (GM_EARTH / radius.powi(3)).sqrt();
    let (si, ci) = inclination.sin_cos();
    move |t| {
        let (s, c) = (n * t).sin_cos();
        InertialState {
            position: Vector3::new(radius * c, radius * s * ci, radius * s * si),
            velocity: Vector3::new(-radius * n * s, radius * n * c * ci, radius * n * c * si),
        }
    }
}

/// Compare the fast z-rotation estimate with the IAU 1976/1980 reference over a
/// few base epochs, for an ISS-like probe.
///
/// Usage:
///   eci_fixed_check [EPOCH] [--nominal] [-i gcrf|j2000]
/// Example:
///   RUST_LOG=debug eci_fixed_check "2024-03-01T06:30:00 UTC" --nominal -i j2000
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1).collect::<Vec<_>>();
    let rate = if let Some(pos) = args.iter().position(|a| a == "--nominal") {
        args.remove(pos);
        AngularRate::EARTH_NOMINAL
    } else {
        AngularRate::EARTH_WGS84
    };

    let frame = match args.iter().position(|a| a == "-i") {
        Some(pos) => {
            let name = args.get(pos + 1).cloned().unwrap_or_default();
            args.drain(pos..(pos + 2).min(args.len()));
            match name.as_str() {
                "gcrf" => InertialFrame::Gcrf,
                "j2000" => InertialFrame::Eme2000,
                other => return Err(format!("unknown inertial frame '{other}'").into()),
            }
        }
        None => InertialFrame::Gcrf,
    };

    let anchor = match args.first() {
        Some(s) => Epoch::from_str(s)?,
        None => Epoch::from_gregorian_utc_at_midnight(2024, 3, 1),
    };

    let provider = IauEarthRotation::new(anchor).with_inertial_frame(frame);
    let probe = circular_orbit(6778.0, 51.6_f64.to_radians());

    let params = CampaignParams::builder()
        .sample_points(6)
        .step(15.0 * 60.0)
        .tests_per_sample(10)
        .test_step(10.0)
        .rate(rate)
        .build()?;

    let report = run_campaign_with_probe(&params, &provider, &probe)?;

    println!("Anchor epoch: {anchor}, inertial frame: {frame:?}");
    println!("{report}");
    println!(
        "Overall deviation: mean {:.3e} rad, max {:.3e} rad",
        report.overall().mean(),
        report.overall().max()
    );

    Ok(())
}
