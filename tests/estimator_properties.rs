use std::f64::consts::{PI, TAU};

use approx::assert_relative_eq;
use fastecef::{
    estimator::{estimate, AngularRate, BaseState},
    evaluator::evaluate,
    reference::UniformSpinReference,
    rotation::{angle_between, frame_angle_z, orthonormality_residual, wrap_angle},
};
use nalgebra::Rotation3;
use proptest::prelude::*;

mod common;
use common::{assert_rotation_close, tilted_base};

prop_compose! {
    fn rotation_strategy()(
        roll in 0.0..TAU,
        pitch in -PI / 2.0..PI / 2.0,
        yaw in 0.0..TAU,
    ) -> Rotation3<f64> {
        Rotation3::from_euler_angles(roll, pitch, yaw)
    }
}

prop_compose! {
    fn base_strategy()(
        epoch in -1e6..1e6,
        rotation in rotation_strategy(),
    ) -> BaseState {
        BaseState { epoch, rotation }
    }
}

#[test]
fn test_earth_rate_over_one_hour() {
    let base = BaseState::new(0.0, Rotation3::identity()).unwrap();
    let rate = AngularRate::new(7.2921159e-5).unwrap();

    let est = estimate(&base, rate, 3600.0).unwrap();
    assert_relative_eq!(frame_angle_z(&est), 0.26251617, epsilon = 1e-8);

    // z is shared by both frames
    assert_relative_eq!(est[(2, 2)], 1.0, epsilon = 1e-15);
    assert_relative_eq!(est[(0, 2)], 0.0, epsilon = 1e-15);
}

#[test]
fn test_matching_stub_gives_zero_deviation() {
    let reference = UniformSpinReference::new(0.0, 7.2921159e-5);
    let base = BaseState::from_reference(&reference, 0.0).unwrap();

    let samples = evaluate(&base, AngularRate::EARTH_NOMINAL, &[3600.0], &reference).unwrap();
    assert_eq!(samples.len(), 1);
    assert!(samples[0].deviation < 1e-14);
    assert_rotation_close(&samples[0].estimated, &samples[0].reference, 1e-14);
}

#[test]
fn test_full_turn_returns_to_base() {
    let base = BaseState::new(100.0, tilted_base()).unwrap();
    let rate = AngularRate::EARTH_WGS84;
    let day = TAU / rate.value();

    let est = estimate(&base, rate, 100.0 + 3.0 * day).unwrap();
    assert!(angle_between(&est, &base.rotation) < 1e-12);
}

proptest! {
    #[test]
    fn estimate_is_orthonormal(
        base in base_strategy(),
        rate in -1e-3..1e-3,
        elapsed in -1e8..1e8,
    ) {
        let rate = AngularRate::new(rate).unwrap();
        let est = estimate(&base, rate, base.epoch + elapsed).unwrap();
        prop_assert!(orthonormality_residual(est.matrix()) < 1e-12);
        prop_assert!((est.matrix().determinant() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn estimate_at_base_epoch_is_base_rotation(
        base in base_strategy(),
        rate in -1e-3..1e-3,
    ) {
        let est = estimate(&base, AngularRate::new(rate).unwrap(), base.epoch).unwrap();
        prop_assert!(angle_between(&est, &base.rotation) < 1e-14);
    }

    #[test]
    fn negated_rate_mirrors_elapsed_time(
        base in base_strategy(),
        rate in -1e-3..1e-3,
        elapsed in 0.0..1e5,
    ) {
        let rate = AngularRate::new(rate).unwrap();
        let forward = estimate(&base, rate, base.epoch + elapsed).unwrap();
        let mirrored = estimate(&base, rate.reversed(), base.epoch - elapsed).unwrap();
        prop_assert!(angle_between(&forward, &mirrored) < 1e-10);
    }

    #[test]
    fn whole_revolutions_leave_estimate_unchanged(
        base in base_strategy(),
        rate in 1e-5..1e-3,
        elapsed in -1e5..1e5,
        turns in 1u32..1000,
    ) {
        let rate = AngularRate::new(rate).unwrap();
        let period = TAU / rate.value();
        let t = base.epoch + elapsed;

        let near = estimate(&base, rate, t).unwrap();
        let far = estimate(&base, rate, t + f64::from(turns) * period).unwrap();
        prop_assert!(angle_between(&near, &far) < 1e-9);
    }

    #[test]
    fn wrapped_angle_stays_in_half_open_interval(angle in -1e9..1e9) {
        let w = wrap_angle(angle);
        prop_assert!(w > -PI && w <= PI);
        prop_assert!(((angle - w) / TAU - ((angle - w) / TAU).round()).abs() < 1e-6);
    }

    #[test]
    fn deviation_lies_in_zero_pi(
        base_epoch in -1e5..1e5,
        true_rate in -1e-3..1e-3,
        assumed_rate in -1e-3..1e-3,
        initial_angle in -PI..PI,
        elapsed in -1e5..1e5,
    ) {
        let reference = UniformSpinReference::new(initial_angle, true_rate)
            .with_inner_rotation(tilted_base());
        let base = BaseState::from_reference(&reference, base_epoch).unwrap();
        let samples = evaluate(
            &base,
            AngularRate::new(assumed_rate).unwrap(),
            &[base_epoch + elapsed],
            &reference,
        )
        .unwrap();

        let d = samples[0].deviation;
        prop_assert!((0.0..=PI).contains(&d));
    }

    #[test]
    fn exact_rate_tracks_uniform_spin(
        base_epoch in -1e5..1e5,
        rate in -1e-3..1e-3,
        initial_angle in -PI..PI,
        elapsed in -1e5..1e5,
    ) {
        let reference = UniformSpinReference::new(initial_angle, rate)
            .with_inner_rotation(tilted_base());
        let base = BaseState::from_reference(&reference, base_epoch).unwrap();
        let samples = evaluate(
            &base,
            AngularRate::new(rate).unwrap(),
            &[base_epoch + elapsed],
            &reference,
        )
        .unwrap();
        prop_assert!(samples[0].deviation < 1e-9);
    }
}
