// Host-side integration tests for the bubble simulation.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod core {
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod scene {
        include!("../src/core/scene.rs");
    }
    pub mod bubbles {
        include!("../src/core/bubbles.rs");
    }
}

use crate::core::bubbles::*;
use crate::core::constants::*;
use crate::core::scene::*;
use glam::Vec3;

const DT: f32 = 1.0 / 60.0;

fn system() -> (BubbleSystem, SceneGraph) {
    (BubbleSystem::new(7), SceneGraph::new())
}

fn assert_all_alive(system: &BubbleSystem) {
    for b in system.bubbles() {
        assert!(b.life > 0.0, "live set holds a dead bubble: life={}", b.life);
        assert!((0.0..=1.0).contains(&b.opacity), "opacity out of range: {}", b.opacity);
    }
}

#[test]
fn spawn_count_follows_floor_formula_and_is_monotonic() {
    let mut prev = 0;
    for k in 0..=100 {
        let i = k as f32 / 100.0;
        let n = spawn_count(i);
        assert_eq!(n, (3.0 + i * 7.0).floor() as usize);
        assert!((3..=10).contains(&n), "count {n} out of range at intensity {i}");
        assert!(n >= prev, "count decreased at intensity {i}");
        prev = n;
    }
    assert_eq!(spawn_count(0.0), 3);
    assert_eq!(spawn_count(1.0), 10);
}

#[test]
fn breath_spawns_exactly_the_counted_bubbles_into_the_scene() {
    let (mut bubbles, mut scene) = system();
    let mut expected = 0;
    for k in 0..=10 {
        let i = k as f32 / 10.0;
        let ids = bubbles.create_bubbles_from_breath(&mut scene, Vec3::ZERO, i, Vec3::NEG_Z);
        assert_eq!(ids.len(), spawn_count(i));
        expected += ids.len();
        for id in &ids {
            assert!(scene.contains(*id));
        }
    }
    assert_eq!(bubbles.bubble_count(), expected);
    assert_eq!(scene.len(), expected);
}

#[test]
fn out_of_range_intensity_scales_without_clamping() {
    let (mut bubbles, mut scene) = system();
    let ids = bubbles.create_bubbles_from_breath(&mut scene, Vec3::ZERO, 2.0, Vec3::NEG_Z);
    assert_eq!(ids.len(), 17);
    let ids = bubbles.create_bubbles_from_breath(&mut scene, Vec3::ZERO, -1.0, Vec3::NEG_Z);
    assert!(ids.is_empty());
    let ids = bubbles.create_bubbles_from_breath(&mut scene, Vec3::ZERO, f32::NAN, Vec3::NEG_Z);
    assert!(ids.is_empty());
    assert_eq!(bubbles.bubble_count(), 17);
}

#[test]
fn non_finite_intensity_spawns_nothing() {
    assert_eq!(spawn_count(f32::INFINITY), 0);
    assert_eq!(spawn_count(f32::NEG_INFINITY), 0);
    assert_eq!(spawn_count(f32::NAN), 0);

    let (mut bubbles, mut scene) = system();
    let ids = bubbles.create_bubbles_from_breath(&mut scene, Vec3::ZERO, f32::INFINITY, Vec3::NEG_Z);
    assert!(ids.is_empty());
    assert_eq!(bubbles.bubble_count(), 0);
    assert!(scene.is_empty());
}

#[test]
fn spawned_bubbles_have_valid_life_size_and_launch() {
    let (mut bubbles, mut scene) = system();
    let origin = Vec3::new(1.0, 1.5, -2.0);
    for k in 0..=4 {
        let intensity = k as f32 / 4.0;
        let before = bubbles.bubble_count();
        bubbles.create_bubbles_from_breath(&mut scene, origin, intensity, Vec3::NEG_Z);
        let base = BASE_SIZE_MIN + intensity * BASE_SIZE_SPAN;
        let speed = LAUNCH_SPEED_MIN + intensity * LAUNCH_SPEED_SPAN;
        for b in &bubbles.bubbles()[before..] {
            assert!(b.max_life >= LIFE_MIN_SEC && b.max_life < LIFE_MAX_SEC);
            assert!(b.life > 0.0 && b.life <= b.max_life);
            assert_eq!(b.opacity, 1.0);
            assert!(b.size >= base * 0.8 - 1e-6 && b.size < base * 1.2 + 1e-6);

            let d = b.position - origin;
            assert!(d.x.abs() <= 0.05 + 1e-6 && d.z.abs() <= 0.05 + 1e-6);
            assert!(d.y.abs() <= 0.025 + 1e-6);

            assert!((b.velocity.length() - speed).abs() < 1e-3);
            assert!(b.velocity.y > 0.0, "launch should lean upward");
            assert!(b.velocity.z < 0.0, "launch should follow the breath direction");
            assert!(b.hue >= HUE_MIN && b.hue < HUE_MIN + HUE_SPAN);
        }
    }
}

#[test]
fn near_cancelling_direction_still_gives_finite_launch() {
    let (mut bubbles, mut scene) = system();
    // Lift jitter lands in [0.2, 0.5), so this heading can come out tiny.
    bubbles.create_bubbles_from_breath(&mut scene, Vec3::ZERO, 0.5, Vec3::new(0.0, -0.35, 0.0));
    for b in bubbles.bubbles() {
        assert!(b.velocity.is_finite());
        assert!((b.velocity.length() - 3.5).abs() < 1e-3);
    }
}

#[test]
fn wand_spawns_from_a_tip_ahead_of_the_wand() {
    let mut wand_sys = BubbleSystem::new(99);
    let mut breath_sys = BubbleSystem::new(99);
    let mut scene_a = SceneGraph::new();
    let mut scene_b = SceneGraph::new();
    let pos = Vec3::new(0.2, 1.0, 0.0);
    let dir = Vec3::new(0.0, 0.0, -1.0);

    wand_sys.create_bubbles_from_wand(&mut scene_a, pos, dir, 0.4);
    breath_sys.create_bubbles_from_breath(&mut scene_b, pos + dir * 0.1, 0.4, dir);

    assert_eq!(wand_sys.bubble_count(), breath_sys.bubble_count());
    for (a, b) in wand_sys.bubbles().iter().zip(breath_sys.bubbles()) {
        assert!((a.position - b.position).length() < 1e-6);
        assert!((a.velocity - b.velocity).length() < 1e-6);
    }
}

#[test]
fn no_dead_bubble_survives_an_update() {
    let (mut bubbles, mut scene) = system();
    for _ in 0..5 {
        bubbles.create_bubbles_from_breath(&mut scene, Vec3::ZERO, 0.7, Vec3::NEG_Z);
    }
    // Uneven steps, including some large ones
    let steps = [DT, 0.2, DT, 0.7, 0.05, 1.3, DT, 0.9, 2.0];
    for dt in steps {
        bubbles.step(&mut scene, dt);
        assert_all_alive(&bubbles);
        assert_eq!(scene.len(), bubbles.bubble_count());
    }
}

#[test]
fn every_bubble_expires_once_its_lifetime_has_elapsed() {
    let (mut bubbles, mut scene) = system();
    bubbles.create_bubbles_from_breath(&mut scene, Vec3::ZERO, 1.0, Vec3::NEG_Z);
    let lives: Vec<(RenderableId, f32)> = bubbles
        .bubbles()
        .iter()
        .map(|b| (b.handle().expect("attached"), b.max_life))
        .collect();

    let mut elapsed = 0.0_f32;
    while elapsed < LIFE_MAX_SEC + 0.1 {
        bubbles.step(&mut scene, DT);
        elapsed += DT;
        for (id, max_life) in &lives {
            if elapsed >= *max_life + 1e-3 {
                assert!(!scene.contains(*id), "bubble outlived its max_life");
            }
        }
    }
    assert_eq!(bubbles.bubble_count(), 0);
    assert!(scene.is_empty());
}

#[test]
fn bubble_update_reports_death() {
    let params = BubbleParams::default();
    let mut b = Bubble::new(Vec3::ZERO, 0.03, Vec3::ZERO, 0.1);
    assert!(b.update(0.05, &params));
    assert!(!b.update(0.05 + 1e-4, &params));
    assert!(!b.is_alive());
    assert_eq!(b.opacity, 0.0);
}

#[test]
fn opacity_and_scale_track_remaining_life() {
    let (mut bubbles, mut scene) = system();
    bubbles.set_wind(0.0, None);
    let id = bubbles.add_bubble(&mut scene, Bubble::new(Vec3::ZERO, 0.04, Vec3::ZERO, 4.0));
    bubbles.step(&mut scene, 1.0);

    let b = &bubbles.bubbles()[0];
    assert!((b.life - 3.0).abs() < 1e-5);
    assert!((b.opacity - 0.75).abs() < 1e-5);
    assert!((b.scale(GROWTH_WITH_AGE) - 1.05).abs() < 1e-5);

    let r = scene.get(id).expect("scene entry");
    assert!((r.opacity - 0.75 * MATERIAL_OPACITY).abs() < 1e-5);
    assert!((r.scale - 1.05).abs() < 1e-5);
    assert_eq!(r.radius, 0.04);
    assert!((r.position - b.position).length() < 1e-6);
    assert!((r.rotation.x - SPIN_X_PER_SEC).abs() < 1e-5);
    assert!((r.rotation.y - SPIN_Y_PER_SEC).abs() < 1e-5);
}

#[test]
fn without_wind_a_still_bubble_only_falls() {
    let (mut bubbles, mut scene) = system();
    bubbles.set_wind(0.0, None);
    let start = Vec3::new(0.0, 1.0, 0.0);
    bubbles.add_bubble(&mut scene, Bubble::new(start, 0.03, Vec3::new(0.0, 0.5, 0.0), 4.5));

    let mut prev_vy = bubbles.bubbles()[0].velocity.y;
    for _ in 0..100 {
        bubbles.step(&mut scene, DT);
        let b = &bubbles.bubbles()[0];
        assert!(b.velocity.y < prev_vy, "vertical velocity must keep dropping");
        prev_vy = b.velocity.y;
        let horizontal = Vec3::new(b.position.x - start.x, 0.0, b.position.z - start.z);
        assert!(horizontal.length() < 1e-6, "drifted sideways: {horizontal:?}");
    }
    assert_eq!(bubbles.wind(), Vec3::ZERO);
}

#[test]
fn wind_rotates_with_simulation_time() {
    let (mut bubbles, mut scene) = system();
    assert_eq!(bubbles.wind_strength(), DEFAULT_WIND_STRENGTH);
    for _ in 0..90 {
        bubbles.step(&mut scene, DT);
    }
    let t = bubbles.sim_time() as f32;
    let w = bubbles.wind();
    let s = DEFAULT_WIND_STRENGTH;
    assert!((w.x - t.sin() * s).abs() < 1e-4);
    assert_eq!(w.y, 0.0);
    assert!((w.z - t.cos() * s).abs() < 1e-4);
}

#[test]
fn wind_pushes_bubbles_sideways() {
    let (mut bubbles, mut scene) = system();
    bubbles.set_wind(1.0, Some(Vec3::X));
    bubbles.add_bubble(&mut scene, Bubble::new(Vec3::ZERO, 0.03, Vec3::ZERO, 4.0));
    for _ in 0..30 {
        bubbles.step(&mut scene, DT);
    }
    let b = &bubbles.bubbles()[0];
    assert!(b.velocity.x > 0.0 && b.position.x > 0.0);
    assert!(b.velocity.z.abs() < 1e-6);
}

#[test]
fn wind_direction_override_persists_until_cleared() {
    let (mut bubbles, mut scene) = system();
    bubbles.set_wind(0.5, Some(Vec3::new(2.0, 0.0, 0.0)));
    assert!((bubbles.wind() - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
    for _ in 0..10 {
        bubbles.step(&mut scene, DT);
    }
    assert!((bubbles.wind() - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);

    bubbles.set_wind(0.5, None);
    bubbles.step(&mut scene, DT);
    let t = bubbles.sim_time() as f32;
    assert!((bubbles.wind().x - t.sin() * 0.5).abs() < 1e-4);

    bubbles.set_wind(-3.0, None);
    assert_eq!(bubbles.wind_strength(), 0.0);
}

#[test]
fn drag_is_independent_of_frame_rate() {
    let params = BubbleParams {
        gravity: 0.0,
        ..BubbleParams::default()
    };
    let mut fast = Bubble::new(Vec3::ZERO, 0.03, Vec3::new(0.0, 0.0, -3.0), 4.0);
    let mut slow = fast.clone();
    for _ in 0..60 {
        fast.update(1.0 / 60.0, &params);
    }
    for _ in 0..20 {
        slow.update(1.0 / 20.0, &params);
    }
    assert!((fast.velocity.z - slow.velocity.z).abs() < 1e-4);
    // one second at the reference rate applies the per-tick factor sixty times
    let expected = -3.0 * DRAG_PER_REFERENCE_TICK.powi(60);
    assert!((fast.velocity.z - expected).abs() < 1e-3);
}

#[test]
fn drag_factor_matches_reference_tick() {
    let params = BubbleParams::default();
    assert!((params.drag_factor(DRAG_REFERENCE_DT) - DRAG_PER_REFERENCE_TICK).abs() < 1e-6);
    assert_eq!(params.drag_factor(0.0), 1.0);
}

#[test]
fn clear_all_on_empty_system_is_a_no_op() {
    let (mut bubbles, mut scene) = system();
    bubbles.clear_all(&mut scene);
    bubbles.clear_all(&mut scene);
    assert_eq!(bubbles.bubble_count(), 0);
    assert!(scene.is_empty());
}

#[test]
fn clear_all_detaches_every_scene_entry() {
    let (mut bubbles, mut scene) = system();
    let ids = bubbles.create_bubbles_from_breath(&mut scene, Vec3::ZERO, 1.0, Vec3::NEG_Z);
    assert_eq!(ids.len(), 10);
    assert_eq!(scene.len(), 10);

    bubbles.clear_all(&mut scene);
    assert_eq!(bubbles.bubble_count(), 0);
    for id in &ids {
        assert!(!scene.contains(*id));
    }
    assert!(scene.is_empty());

    // The system keeps working afterwards
    bubbles.step(&mut scene, DT);
    bubbles.create_bubbles_from_breath(&mut scene, Vec3::ZERO, 0.0, Vec3::NEG_Z);
    assert_eq!(scene.len(), 3);
}

#[test]
fn clear_all_leaves_foreign_scene_entries_alone() {
    let (mut bubbles, mut scene) = system();
    let foreign = scene.add(Renderable {
        position: Vec3::ZERO,
        radius: 1.0,
        scale: 1.0,
        opacity: 1.0,
        rotation: Vec3::ZERO,
        hue: 0.5,
    });
    bubbles.create_bubbles_from_breath(&mut scene, Vec3::ZERO, 0.5, Vec3::NEG_Z);
    bubbles.clear_all(&mut scene);
    assert_eq!(scene.len(), 1);
    assert!(scene.contains(foreign));
}

#[test]
fn first_wall_clock_update_does_not_advance_life() {
    let (mut bubbles, mut scene) = system();
    bubbles.add_bubble(&mut scene, Bubble::new(Vec3::ZERO, 0.03, Vec3::ZERO, 3.5));
    bubbles.update(&mut scene);
    let b = &bubbles.bubbles()[0];
    assert_eq!(b.life, 3.5);
    assert_eq!(bubbles.sim_time(), 0.0);
}

#[test]
fn same_seed_gives_the_same_batch() {
    let mut a = BubbleSystem::new(1234);
    let mut b = BubbleSystem::new(1234);
    let mut sa = SceneGraph::new();
    let mut sb = SceneGraph::new();
    a.create_bubbles_from_breath(&mut sa, Vec3::ZERO, 0.8, Vec3::NEG_Z);
    b.create_bubbles_from_breath(&mut sb, Vec3::ZERO, 0.8, Vec3::NEG_Z);
    for (x, y) in a.bubbles().iter().zip(b.bubbles()) {
        assert_eq!(x.position, y.position);
        assert_eq!(x.max_life, y.max_life);
        assert_eq!(x.size, y.size);
    }
}
