use crate::constants::{ANALYSER_FFT_SIZE, ANALYSER_SMOOTHING};
use crate::core::{AudioSource, BreathDetector, BreathError};
use crate::frame;
use crate::overlay;
use crate::tick::TickLoop;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Microphone capture routed into an analyser. Nothing is connected to the
/// speakers.
pub struct MicSource {
    audio_ctx: web::AudioContext,
    stream: web::MediaStream,
    input: web::MediaStreamAudioSourceNode,
    analyser: web::AnalyserNode,
    closed: bool,
}

fn denied(e: JsValue) -> BreathError {
    BreathError::AcquisitionDenied(format!("{:?}", e))
}

// Raw amplitude matters more than call quality here, so every voice
// processing stage is switched off.
fn capture_constraints() -> Result<web::MediaStreamConstraints, BreathError> {
    let audio = js_sys::Object::new();
    for key in ["echoCancellation", "noiseSuppression", "autoGainControl"] {
        js_sys::Reflect::set(&audio, &JsValue::from_str(key), &JsValue::FALSE).map_err(denied)?;
    }
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_audio(&audio.into());
    constraints.set_video(&JsValue::FALSE);
    Ok(constraints)
}

impl MicSource {
    pub async fn open() -> Result<Self, BreathError> {
        let window = web::window()
            .ok_or_else(|| BreathError::AcquisitionDenied("no window".to_string()))?;
        let devices = window.navigator().media_devices().map_err(denied)?;
        let promise = devices
            .get_user_media_with_constraints(&capture_constraints()?)
            .map_err(denied)?;
        let stream: web::MediaStream = JsFuture::from(promise)
            .await
            .map_err(denied)?
            .dyn_into()
            .map_err(denied)?;

        let audio_ctx = match web::AudioContext::new() {
            Ok(ctx) => ctx,
            Err(e) => {
                stop_tracks(&stream);
                return Err(denied(e));
            }
        };
        _ = audio_ctx.resume();

        let nodes = audio_ctx.create_media_stream_source(&stream).and_then(|input| {
            let analyser = web::AnalyserNode::new(&audio_ctx)?;
            analyser.set_fft_size(ANALYSER_FFT_SIZE);
            analyser.set_smoothing_time_constant(ANALYSER_SMOOTHING);
            input.connect_with_audio_node(&analyser)?;
            Ok((input, analyser))
        });
        let (input, analyser) = match nodes {
            Ok(n) => n,
            Err(e) => {
                stop_tracks(&stream);
                _ = audio_ctx.close();
                return Err(denied(e));
            }
        };

        log::info!(
            "[mic] opened: sample_rate={} bins={}",
            audio_ctx.sample_rate(),
            analyser.frequency_bin_count()
        );
        Ok(Self {
            audio_ctx,
            stream,
            input,
            analyser,
            closed: false,
        })
    }
}

impl AudioSource for MicSource {
    fn frequency_bin_count(&self) -> usize {
        self.analyser.frequency_bin_count() as usize
    }

    fn read_frequency_data(&mut self, out: &mut [u8]) {
        if !self.closed {
            self.analyser.get_byte_frequency_data(out);
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        _ = self.input.disconnect();
        stop_tracks(&self.stream);
        _ = self.audio_ctx.close();
        log::info!("[mic] released");
    }
}

fn stop_tracks(stream: &web::MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<web::MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// Breath detector plus the animation-frame loop that drives it.
pub struct BreathSession {
    pub detector: Rc<RefCell<BreathDetector<MicSource>>>,
    analysis: TickLoop<Closure<dyn FnMut()>>,
}

impl BreathSession {
    pub fn new(detector: BreathDetector<MicSource>) -> Self {
        Self {
            detector: Rc::new(RefCell::new(detector)),
            analysis: TickLoop::new(),
        }
    }

    /// Listening, or waiting for the microphone to open.
    pub fn is_active(&self) -> bool {
        let det = self.detector.borrow();
        det.is_listening() || det.is_acquiring()
    }

    /// Open the microphone and start analysing. A no-op while listening or
    /// while another start is still waiting for the microphone.
    pub async fn start(&self) -> Result<(), BreathError> {
        if !self.detector.borrow_mut().begin_acquire() {
            return Ok(());
        }
        let source = match MicSource::open().await {
            Ok(source) => source,
            Err(e) => {
                self.detector.borrow_mut().abort_acquire();
                return Err(e);
            }
        };
        if self.detector.borrow_mut().finish_acquire(source) {
            frame::start_breath_loop(self.detector.clone(), &self.analysis);
        }
        Ok(())
    }

    /// Stop analysing and release the microphone and the analysis callback.
    /// No tick runs afterwards.
    pub fn stop(&self) {
        self.analysis.release(|id| {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        });
        self.detector.borrow_mut().stop();
    }
}

/// Start listening in the background and report the outcome in the overlay.
/// A refused microphone only disables breath; everything else keeps running.
pub fn begin_listening(session: Rc<BreathSession>, document: web::Document) {
    wasm_bindgen_futures::spawn_local(async move {
        overlay::set_status(&document, "Requesting microphone…");
        match session.start().await {
            Ok(()) => overlay::set_status(&document, "Listening: blow gently toward the screen"),
            Err(e) => {
                log::warn!("[mic] {}", e);
                overlay::set_status(
                    &document,
                    "Microphone unavailable: click or press space to blow bubbles",
                );
            }
        }
    });
}
