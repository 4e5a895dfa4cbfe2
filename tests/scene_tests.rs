// Host-side tests for the in-memory render scene.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod scene {
    include!("../src/core/scene.rs");
}

use glam::Vec3;
use scene::*;

fn renderable(x: f32) -> Renderable {
    Renderable {
        position: Vec3::new(x, 0.0, 0.0),
        radius: 0.03,
        scale: 1.0,
        opacity: 0.7,
        rotation: Vec3::ZERO,
        hue: 0.15,
    }
}

#[test]
fn add_assigns_distinct_ids() {
    let mut scene = SceneGraph::new();
    assert!(scene.is_empty());
    let a = scene.add(renderable(0.0));
    let b = scene.add(renderable(1.0));
    assert_ne!(a, b);
    assert_eq!(scene.len(), 2);
    assert_eq!(scene.get(a).map(|r| r.position.x), Some(0.0));
    assert_eq!(scene.get(b).map(|r| r.position.x), Some(1.0));
}

#[test]
fn update_overwrites_known_entries_only() {
    let mut scene = SceneGraph::new();
    let a = scene.add(renderable(0.0));
    scene.update(a, &renderable(5.0));
    assert_eq!(scene.get(a), Some(&renderable(5.0)));

    scene.update(RenderableId(999), &renderable(9.0));
    assert_eq!(scene.len(), 1);
    assert!(!scene.contains(RenderableId(999)));
}

#[test]
fn remove_reports_presence() {
    let mut scene = SceneGraph::new();
    let a = scene.add(renderable(0.0));
    assert!(scene.remove(a));
    assert!(!scene.remove(a));
    assert!(scene.is_empty());
    // ids are not reused after removal
    let b = scene.add(renderable(0.0));
    assert_ne!(a, b);
}

#[test]
fn iter_visits_every_entry() {
    let mut scene = SceneGraph::new();
    let ids: Vec<_> = (0..5).map(|i| scene.add(renderable(i as f32))).collect();
    let mut seen: Vec<_> = scene.iter().map(|(id, _)| id).collect();
    seen.sort();
    assert_eq!(seen, ids);
}

#[test]
fn hsl_primary_hues() {
    let close = |a: [f32; 3], b: [f32; 3]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5);
    assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
    assert!(close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
    assert!(close(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
    // hue wraps
    assert!(close(hsl_to_rgb(1.0, 1.0, 0.5), hsl_to_rgb(0.0, 1.0, 0.5)));
    assert!(close(hsl_to_rgb(-1.0 / 3.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
}

#[test]
fn hsl_without_saturation_is_grey() {
    assert_eq!(hsl_to_rgb(0.4, 0.0, 0.3), [0.3, 0.3, 0.3]);
}

#[test]
fn bubble_tint_is_a_pale_warm_colour() {
    // hue 0.1..0.2 at s=0.8, l=0.9
    for hue in [0.1_f32, 0.15, 0.199] {
        let [r, g, b] = hsl_to_rgb(hue, 0.8, 0.9);
        for c in [r, g, b] {
            assert!((0.0..=1.0).contains(&c));
            assert!(c > 0.75, "tint should stay pale: {c}");
        }
        assert!(r >= b && g >= b, "warm hues keep blue lowest");
    }
}
