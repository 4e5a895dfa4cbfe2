// Host-side tests for constants and their mathematical relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod core_constants {
    include!("../src/core/constants.rs");
}

use constants::*;
use core_constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn spawn_batch_stays_between_three_and_ten() {
    assert_eq!(SPAWN_COUNT_BASE, 3.0);
    assert_eq!(SPAWN_COUNT_BASE + SPAWN_COUNT_SPAN, 10.0);
    assert!(SIZE_JITTER_MIN > 0.0);
    assert!((SIZE_JITTER_MIN + SIZE_JITTER_SPAN - 1.2).abs() < 1e-6);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn lifetimes_and_physics_are_positive() {
    assert!(LIFE_MIN_SEC > 0.0 && LIFE_MAX_SEC > LIFE_MIN_SEC);
    assert!(GRAVITY > 0.0 && GRAVITY_SCALE > 0.0);
    assert!(DRAG_PER_REFERENCE_TICK > 0.0 && DRAG_PER_REFERENCE_TICK < 1.0);
    assert!(DRAG_REFERENCE_DT > 0.0);
    assert!(DEFAULT_WIND_STRENGTH >= 0.0);
    assert!(LAUNCH_SPEED_MIN > 0.0);
    // lift keeps the launch leaning upward
    assert!(DIRECTION_LIFT_MIN > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn breath_defaults_are_unit_range() {
    for v in [DEFAULT_SENSITIVITY, DEFAULT_THRESHOLD, DEFAULT_SMOOTHING, LOW_BAND_FRACTION] {
        assert!((0.0..=1.0).contains(&v));
    }
    assert!(LOW_BAND_FRACTION > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn look_constants_are_unit_range() {
    for v in [MATERIAL_OPACITY, BUBBLE_SATURATION, BUBBLE_LIGHTNESS, HUE_MIN, HUE_MIN + HUE_SPAN] {
        assert!((0.0..=1.0).contains(&v));
    }
    assert!(GROWTH_WITH_AGE >= 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn host_constants_have_logical_relationships() {
    // fft size must be a power of two for the analyser
    assert!(ANALYSER_FFT_SIZE.is_power_of_two());
    assert!((0.0..1.0).contains(&ANALYSER_SMOOTHING));
    assert!(CAMERA_ZFAR > CAMERA_ZNEAR && CAMERA_ZNEAR > 0.0);
    assert!(WAND_DISTANCE > CAMERA_ZNEAR);
    assert!((0.0..=1.0).contains(&WAND_INTENSITY));
    assert!(SENSITIVITY_STEP > 0.0 && THRESHOLD_STEP > 0.0);
    assert!(MAX_INSTANCES > 0);
    for c in CLEAR_BASE {
        assert!((0.0..=1.0).contains(&(c + CLEAR_BREATH_BOOST)));
    }
}
