// Simulation and breath-analysis tuning shared by the core and the web host.

// Spawn batch
pub const SPAWN_COUNT_BASE: f32 = 3.0; // bubbles at zero intensity
pub const SPAWN_COUNT_SPAN: f32 = 7.0; // extra bubbles at full intensity
pub const BASE_SIZE_MIN: f32 = 0.02; // meters
pub const BASE_SIZE_SPAN: f32 = 0.03; // meters added at full intensity
pub const SIZE_JITTER_MIN: f32 = 0.8;
pub const SIZE_JITTER_SPAN: f32 = 0.4;
pub const SPAWN_JITTER_XZ: f32 = 0.1; // full width, so ±0.05 m
pub const SPAWN_JITTER_Y: f32 = 0.05; // full width, so ±0.025 m
pub const DIRECTION_JITTER_XZ: f32 = 0.5;
pub const DIRECTION_LIFT_MIN: f32 = 0.2; // upward bias on launch direction
pub const DIRECTION_LIFT_SPAN: f32 = 0.3;
pub const LAUNCH_SPEED_MIN: f32 = 2.0; // m/s
pub const LAUNCH_SPEED_SPAN: f32 = 3.0;
pub const WAND_TIP_OFFSET: f32 = 0.1; // meters ahead of the wand origin

// Lifetime
pub const LIFE_MIN_SEC: f32 = 3.0;
pub const LIFE_MAX_SEC: f32 = 5.0; // exclusive

// Physics
pub const GRAVITY: f32 = 9.8;
pub const GRAVITY_SCALE: f32 = 0.1; // floaty, not physical
pub const DRAG_PER_REFERENCE_TICK: f32 = 0.98;
pub const DRAG_REFERENCE_DT: f32 = 1.0 / 60.0;
pub const DEFAULT_WIND_STRENGTH: f32 = 0.1;
pub const WIND_ANGULAR_SPEED: f32 = 1.0; // rad per simulated second

// Look
pub const GROWTH_WITH_AGE: f32 = 0.2; // scale gain as opacity drops to zero
pub const SPIN_X_PER_SEC: f32 = 0.5;
pub const SPIN_Y_PER_SEC: f32 = 0.3;
pub const HUE_MIN: f32 = 0.1;
pub const HUE_SPAN: f32 = 0.1;
pub const BUBBLE_SATURATION: f32 = 0.8;
pub const BUBBLE_LIGHTNESS: f32 = 0.9;
pub const MATERIAL_OPACITY: f32 = 0.7; // film opacity at full life

// Breath analysis
pub const LOW_BAND_FRACTION: f32 = 0.3; // share of bins treated as breath band
pub const DEFAULT_SENSITIVITY: f32 = 0.5;
pub const DEFAULT_THRESHOLD: f32 = 0.15;
pub const DEFAULT_SMOOTHING: f32 = 0.7;
