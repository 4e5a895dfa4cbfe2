use super::constants::*;
use super::scene::{RenderScene, Renderable, RenderableId};
use glam::Vec3;
use instant::Instant;
use rand::prelude::*;
use smallvec::SmallVec;
use std::f32::consts::TAU;

/// Ids of one spawn batch; a batch never exceeds ten bubbles for intensities
/// in \[0, 1\].
pub type SpawnedBubbles = SmallVec<[RenderableId; 10]>;

#[derive(Clone, Debug)]
pub struct BubbleParams {
    pub gravity: f32,
    pub gravity_scale: f32,
    pub drag_per_reference_tick: f32,
    pub drag_reference_dt: f32,
    pub wind_strength: f32,
    pub growth_with_age: f32,
    pub spin_per_sec: Vec3,
}

impl Default for BubbleParams {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            gravity_scale: GRAVITY_SCALE,
            drag_per_reference_tick: DRAG_PER_REFERENCE_TICK,
            drag_reference_dt: DRAG_REFERENCE_DT,
            wind_strength: DEFAULT_WIND_STRENGTH,
            growth_with_age: GROWTH_WITH_AGE,
            spin_per_sec: Vec3::new(SPIN_X_PER_SEC, SPIN_Y_PER_SEC, 0.0),
        }
    }
}

impl BubbleParams {
    /// Velocity multiplier for a step of `dt` seconds. Equals
    /// `drag_per_reference_tick` when `dt == drag_reference_dt`.
    pub fn drag_factor(&self, dt: f32) -> f32 {
        if self.drag_reference_dt <= 0.0 {
            return self.drag_per_reference_tick;
        }
        self.drag_per_reference_tick
            .powf(dt.max(0.0) / self.drag_reference_dt)
    }
}

#[derive(Clone, Debug)]
pub struct Bubble {
    pub position: Vec3,
    pub velocity: Vec3,
    pub size: f32,
    pub life: f32,
    pub max_life: f32,
    pub opacity: f32,
    pub rotation: Vec3,
    pub hue: f32,
    handle: Option<RenderableId>,
}

impl Bubble {
    pub fn new(position: Vec3, size: f32, velocity: Vec3, max_life: f32) -> Self {
        Self {
            position,
            velocity,
            size,
            life: max_life,
            max_life,
            opacity: 1.0,
            rotation: Vec3::ZERO,
            hue: HUE_MIN,
            handle: None,
        }
    }

    #[allow(dead_code)]
    pub fn handle(&self) -> Option<RenderableId> {
        self.handle
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Visual inflation as the film thins out.
    pub fn scale(&self, growth_with_age: f32) -> f32 {
        1.0 + (1.0 - self.opacity) * growth_with_age
    }

    /// Advance one step. Wind is applied by the owning system beforehand.
    /// Returns whether the bubble is still alive.
    pub fn update(&mut self, dt: f32, params: &BubbleParams) -> bool {
        self.velocity.y -= params.gravity * dt * params.gravity_scale;
        self.velocity *= params.drag_factor(dt);
        self.position += self.velocity * dt;

        self.life -= dt;
        self.opacity = if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        };

        self.rotation += params.spin_per_sec * dt;
        self.is_alive()
    }

    pub fn renderable(&self, params: &BubbleParams) -> Renderable {
        Renderable {
            position: self.position,
            radius: self.size,
            scale: self.scale(params.growth_with_age),
            opacity: self.opacity * MATERIAL_OPACITY,
            rotation: self.rotation,
            hue: self.hue,
        }
    }
}

/// Owns every live bubble and the ambient wind.
pub struct BubbleSystem {
    bubbles: Vec<Bubble>,
    params: BubbleParams,
    rng: StdRng,
    wind: Vec3,
    wind_override: Option<Vec3>,
    sim_time: f64,
    last_instant: Option<Instant>,
}

impl BubbleSystem {
    pub fn new(seed: u64) -> Self {
        Self::with_params(BubbleParams::default(), seed)
    }

    pub fn with_params(params: BubbleParams, seed: u64) -> Self {
        Self {
            bubbles: Vec::new(),
            params,
            rng: StdRng::seed_from_u64(seed),
            wind: Vec3::ZERO,
            wind_override: None,
            sim_time: 0.0,
            last_instant: None,
        }
    }

    #[allow(dead_code)]
    pub fn params(&self) -> &BubbleParams {
        &self.params
    }

    #[allow(dead_code)]
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn bubble_count(&self) -> usize {
        self.bubbles.len()
    }

    #[allow(dead_code)]
    pub fn wind(&self) -> Vec3 {
        self.wind
    }

    pub fn wind_strength(&self) -> f32 {
        self.params.wind_strength
    }

    #[allow(dead_code)]
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Set wind strength and optionally pin its direction. `None` returns to
    /// the slowly rotating wind.
    pub fn set_wind(&mut self, strength: f32, direction: Option<Vec3>) {
        self.params.wind_strength = if strength.is_finite() {
            strength.max(0.0)
        } else {
            0.0
        };
        self.wind_override = direction.map(|d| d.normalize_or_zero());
        self.wind = self.wind_at(self.sim_time);
    }

    /// Spawn `floor(3 + 7 * intensity)` bubbles around `position`, launched
    /// along `direction` with an upward bias.
    pub fn create_bubbles_from_breath<S: RenderScene>(
        &mut self,
        scene: &mut S,
        position: Vec3,
        intensity: f32,
        direction: Vec3,
    ) -> SpawnedBubbles {
        let count = spawn_count(intensity);
        let base_size = BASE_SIZE_MIN + intensity * BASE_SIZE_SPAN;
        let speed = LAUNCH_SPEED_MIN + intensity * LAUNCH_SPEED_SPAN;

        let mut spawned = SpawnedBubbles::new();
        for _ in 0..count {
            let offset = Vec3::new(
                (self.rng.gen::<f32>() - 0.5) * SPAWN_JITTER_XZ,
                (self.rng.gen::<f32>() - 0.5) * SPAWN_JITTER_Y,
                (self.rng.gen::<f32>() - 0.5) * SPAWN_JITTER_XZ,
            );
            let size = base_size * (SIZE_JITTER_MIN + self.rng.gen::<f32>() * SIZE_JITTER_SPAN);
            let heading = direction
                + Vec3::new(
                    (self.rng.gen::<f32>() - 0.5) * DIRECTION_JITTER_XZ,
                    self.rng.gen::<f32>() * DIRECTION_LIFT_SPAN + DIRECTION_LIFT_MIN,
                    (self.rng.gen::<f32>() - 0.5) * DIRECTION_JITTER_XZ,
                );
            let heading = if heading.length_squared() > f32::EPSILON {
                heading.normalize()
            } else {
                Vec3::Y
            };
            let max_life = self.rng.gen_range(LIFE_MIN_SEC..LIFE_MAX_SEC);

            let mut bubble = Bubble::new(position + offset, size, heading * speed, max_life);
            bubble.rotation = Vec3::new(
                self.rng.gen::<f32>() * TAU,
                self.rng.gen::<f32>() * TAU,
                self.rng.gen::<f32>() * TAU,
            );
            bubble.hue = HUE_MIN + self.rng.gen::<f32>() * HUE_SPAN;
            spawned.push(self.add_bubble(scene, bubble));
        }
        log::debug!(
            "[bubbles] spawned {} at intensity {:.2} (live={})",
            spawned.len(),
            intensity,
            self.bubbles.len()
        );
        spawned
    }

    /// Spawn from the tip of a wand held at `wand_position`.
    pub fn create_bubbles_from_wand<S: RenderScene>(
        &mut self,
        scene: &mut S,
        wand_position: Vec3,
        wand_direction: Vec3,
        intensity: f32,
    ) -> SpawnedBubbles {
        let tip = wand_position + wand_direction * WAND_TIP_OFFSET;
        self.create_bubbles_from_breath(scene, tip, intensity, wand_direction)
    }

    /// Take ownership of an already built bubble and attach it to `scene`.
    pub fn add_bubble<S: RenderScene>(&mut self, scene: &mut S, mut bubble: Bubble) -> RenderableId {
        let id = scene.add(bubble.renderable(&self.params));
        bubble.handle = Some(id);
        self.bubbles.push(bubble);
        id
    }

    /// Advance by the wall-clock time since the previous call. The first call
    /// advances by zero.
    pub fn update<S: RenderScene>(&mut self, scene: &mut S) {
        let now = Instant::now();
        let dt = match self.last_instant {
            Some(prev) => (now - prev).as_secs_f32(),
            None => 0.0,
        };
        self.last_instant = Some(now);
        self.step(scene, dt);
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step<S: RenderScene>(&mut self, scene: &mut S, dt: f32) {
        let dt = dt.max(0.0);
        self.sim_time += dt as f64;
        self.wind = self.wind_at(self.sim_time);

        let wind_dv = self.wind * dt;
        let params = &self.params;
        self.bubbles.retain_mut(|bubble| {
            bubble.velocity += wind_dv;
            let alive = bubble.update(dt, params);
            if let Some(id) = bubble.handle {
                if alive {
                    scene.update(id, &bubble.renderable(params));
                } else {
                    scene.remove(id);
                }
            }
            alive
        });
    }

    /// Remove every bubble and its scene entry regardless of remaining life.
    pub fn clear_all<S: RenderScene>(&mut self, scene: &mut S) {
        if self.bubbles.is_empty() {
            return;
        }
        let n = self.bubbles.len();
        for bubble in self.bubbles.drain(..) {
            if let Some(id) = bubble.handle {
                scene.remove(id);
            }
        }
        log::debug!("[bubbles] cleared {}", n);
    }

    fn wind_at(&self, t: f64) -> Vec3 {
        let strength = self.params.wind_strength;
        match self.wind_override {
            Some(dir) => dir * strength,
            None => {
                let phase = (t * WIND_ANGULAR_SPEED as f64) as f32;
                Vec3::new(phase.sin() * strength, 0.0, phase.cos() * strength)
            }
        }
    }
}

/// Batch size for a breath of the given intensity. Not clamped: values above
/// one spawn more, negative or non-finite values spawn nothing.
pub fn spawn_count(intensity: f32) -> usize {
    if !intensity.is_finite() {
        return 0;
    }
    (SPAWN_COUNT_BASE + intensity * SPAWN_COUNT_SPAN).floor() as usize
}
