/// Breath detection from a live frequency spectrum.
///
/// Breath and voice energy sit in the low end of the spectrum, so the
/// detector averages the lowest bins into a raw level, smooths it into an
/// envelope and reports a breath whenever the envelope is above the
/// threshold. There is no cooldown: a sustained breath fires every tick,
/// which keeps the spawn rate proportional to how long the user blows.
pub mod breath;
pub mod bubbles;
pub mod constants;
/// Render-side view of the simulation.
///
/// The bubble simulation never talks to a graphics API. It pushes one
/// [`Renderable`] per live particle into a [`RenderScene`] and removes it
/// when the particle dies. [`SceneGraph`] is the in-memory scene the web
/// renderer draws from.
pub mod scene;

pub use breath::*;
pub use bubbles::*;
pub use constants::*;
pub use scene::*;

pub static BUBBLES_WGSL: &str = include_str!("../../shaders/bubbles.wgsl");
