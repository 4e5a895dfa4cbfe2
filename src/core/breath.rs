use super::constants::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BreathError {
    /// Microphone capture was refused or is not available on this device.
    #[error("microphone access denied: {0}")]
    AcquisitionDenied(String),
}

/// A live audio input that can be polled for a byte-valued magnitude
/// spectrum once per analysis tick.
pub trait AudioSource {
    fn frequency_bin_count(&self) -> usize;
    /// Fill `out` with the current spectrum (0..=255 per bin).
    fn read_frequency_data(&mut self, out: &mut [u8]);
    /// Release the underlying capture. Must tolerate repeated calls.
    fn close(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreathConfig {
    pub sensitivity: f32,
    pub threshold: f32,
    pub smoothing: f32,
}

impl Default for BreathConfig {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            threshold: DEFAULT_THRESHOLD,
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

impl BreathConfig {
    fn clamped(self) -> Self {
        Self {
            sensitivity: clamp01(self.sensitivity),
            threshold: clamp01(self.threshold),
            smoothing: clamp01(self.smoothing),
        }
    }
}

type Handler = Box<dyn FnMut(f32)>;

pub struct BreathDetector<A: AudioSource> {
    source: Option<A>,
    buffer: Vec<u8>,
    config: BreathConfig,
    smoothed_volume: f32,
    listening: bool,
    acquiring: bool,
    on_breath: Option<Handler>,
    on_volume: Option<Handler>,
}

impl<A: AudioSource> Default for BreathDetector<A> {
    fn default() -> Self {
        Self::with_config(BreathConfig::default())
    }
}

impl<A: AudioSource> BreathDetector<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BreathConfig) -> Self {
        Self {
            source: None,
            buffer: Vec::new(),
            config: config.clamped(),
            smoothed_volume: 0.0,
            listening: false,
            acquiring: false,
            on_breath: None,
            on_volume: None,
        }
    }

    /// Begin listening on an opened source. When already listening the new
    /// source is closed and dropped.
    pub fn start(&mut self, mut source: A) {
        if self.listening {
            log::debug!("[breath] start ignored, already listening");
            source.close();
            return;
        }
        self.buffer.clear();
        self.buffer.resize(source.frequency_bin_count(), 0);
        self.source = Some(source);
        self.listening = true;
        log::info!("[breath] listening ({} bins)", self.buffer.len());
    }

    /// Reserve the right to open a source. Returns false while listening or
    /// while another acquisition is in flight, in which case the caller must
    /// not open anything.
    pub fn begin_acquire(&mut self) -> bool {
        if self.listening || self.acquiring {
            return false;
        }
        self.acquiring = true;
        true
    }

    /// Hand over the source opened after [`begin_acquire`](Self::begin_acquire).
    /// If a `stop` cancelled the acquisition meanwhile the source is closed
    /// and false is returned.
    pub fn finish_acquire(&mut self, mut source: A) -> bool {
        if !self.acquiring {
            log::debug!("[breath] acquisition cancelled, closing source");
            source.close();
            return false;
        }
        self.acquiring = false;
        self.start(source);
        true
    }

    /// Give up an acquisition that failed to open a source.
    pub fn abort_acquire(&mut self) {
        self.acquiring = false;
    }

    pub fn is_acquiring(&self) -> bool {
        self.acquiring
    }

    /// Stop listening and release the source. Also cancels an acquisition in
    /// flight. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.acquiring = false;
        if !self.listening {
            return;
        }
        self.listening = false;
        if let Some(mut source) = self.source.take() {
            source.close();
        }
        self.buffer = Vec::new();
        log::info!("[breath] stopped");
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Replace the breath handler. It receives an intensity in (0, 1].
    pub fn on_breath(&mut self, callback: impl FnMut(f32) + 'static) {
        self.on_breath = Some(Box::new(callback));
    }

    /// Replace the envelope handler. It is called every analysis tick.
    pub fn on_volume(&mut self, callback: impl FnMut(f32) + 'static) {
        self.on_volume = Some(Box::new(callback));
    }

    pub fn set_sensitivity(&mut self, value: f32) {
        self.config.sensitivity = clamp01(value);
    }

    pub fn set_threshold(&mut self, value: f32) {
        self.config.threshold = clamp01(value);
    }

    #[allow(dead_code)]
    pub fn set_smoothing(&mut self, value: f32) {
        self.config.smoothing = clamp01(value);
    }

    pub fn sensitivity(&self) -> f32 {
        self.config.sensitivity
    }

    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }

    #[allow(dead_code)]
    pub fn smoothing(&self) -> f32 {
        self.config.smoothing
    }

    #[allow(dead_code)]
    pub fn config(&self) -> BreathConfig {
        self.config
    }

    #[allow(dead_code)]
    pub fn smoothed_volume(&self) -> f32 {
        self.smoothed_volume
    }

    /// Run one analysis tick. Returns whether the caller should schedule
    /// another one.
    pub fn analyze(&mut self) -> bool {
        if !self.listening {
            return false;
        }
        let Some(source) = self.source.as_mut() else {
            return false;
        };
        let bins = source.frequency_bin_count();
        if self.buffer.len() != bins {
            self.buffer.resize(bins, 0);
        }
        source.read_frequency_data(&mut self.buffer);

        let raw = low_band_volume(&self.buffer);
        self.smoothed_volume = smooth_volume(self.smoothed_volume, raw, self.config.smoothing);

        if let Some(cb) = self.on_volume.as_mut() {
            cb(self.smoothed_volume);
        }

        if self.smoothed_volume > self.config.threshold {
            let intensity = breath_intensity(self.smoothed_volume, self.config.sensitivity);
            if intensity > 0.0 {
                if let Some(cb) = self.on_breath.as_mut() {
                    cb(intensity);
                }
            }
        }

        self.listening
    }
}

/// Mean level of the lowest 30% of bins, normalized to \[0, 1\].
pub fn low_band_volume(bins: &[u8]) -> f32 {
    let low = (bins.len() as f32 * LOW_BAND_FRACTION).floor() as usize;
    if low == 0 {
        return 0.0;
    }
    let sum: u32 = bins[..low].iter().map(|&b| b as u32).sum();
    sum as f32 / (low as f32 * 255.0)
}

/// One step of the exponential envelope.
#[inline]
pub fn smooth_volume(previous: f32, raw: f32, smoothing: f32) -> f32 {
    previous * smoothing + raw * (1.0 - smoothing)
}

#[inline]
pub fn breath_intensity(smoothed: f32, sensitivity: f32) -> f32 {
    (smoothed * sensitivity).min(1.0)
}

#[inline]
fn clamp01(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
