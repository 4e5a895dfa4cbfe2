// Host-side tuning: capture, camera, input and look.
//
// Simulation constants live in `core/constants.rs`; these only affect how
// the web front-end feeds and draws it.

// Analyser setup (256-point transform -> 128 bins)
pub const ANALYSER_FFT_SIZE: u32 = 256;
pub const ANALYSER_SMOOTHING: f64 = 0.3;

// Camera
pub const CAMERA_Z: f32 = 3.0;
pub const CAMERA_HEIGHT: f32 = 1.6; // standing eye height
pub const CAMERA_FOVY_DEG: f32 = 60.0;
pub const CAMERA_ZNEAR: f32 = 0.01;
pub const CAMERA_ZFAR: f32 = 50.0;

// Where a breath leaves the viewer, relative to the eye
pub const MOUTH_FORWARD: f32 = 0.15;
pub const MOUTH_DROP: f32 = 0.12;

// Wand puffs from pointer/keyboard
pub const WAND_INTENSITY: f32 = 0.6;
pub const WAND_DISTANCE: f32 = 0.5; // meters from the eye along the pointer ray

// Runtime adjustment steps
pub const SENSITIVITY_STEP: f32 = 0.05;
pub const THRESHOLD_STEP: f32 = 0.02;

// Renderer
pub const MAX_INSTANCES: usize = 4096;
pub const CLEAR_BASE: [f32; 3] = [0.05, 0.07, 0.12];
pub const CLEAR_BREATH_BOOST: f32 = 0.08; // clear color gain at full envelope

pub const RNG_SEED: u64 = 0x5EED_B0BB;
