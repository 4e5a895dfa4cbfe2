use super::keymap::{action_for_key, consumes_default, KeyAction};
use super::InputWiring;
use crate::audio;
use crate::constants::{MOUTH_DROP, MOUTH_FORWARD, SENSITIVITY_STEP, THRESHOLD_STEP, WAND_INTENSITY};
use crate::core::DEFAULT_WIND_STRENGTH;
use crate::overlay;
use wasm_bindgen::JsCast;
use web_sys as web;

fn show_tuning(w: &InputWiring) {
    let (sensitivity, threshold) = {
        let det = w.session.detector.borrow();
        (det.sensitivity(), det.threshold())
    };
    let wind = w.bubbles.borrow().wind_strength();
    overlay::show_tuning(&w.document, sensitivity, threshold, wind);
}

/// Blow a puff from the viewer's mouth without using the microphone.
pub fn puff_from_viewer(w: &InputWiring) {
    let pose = w.camera.borrow().pose();
    let origin = pose.breath_origin(MOUTH_FORWARD, MOUTH_DROP);
    let mut scene = w.scene.borrow_mut();
    w.bubbles
        .borrow_mut()
        .create_bubbles_from_wand(&mut *scene, origin, pose.forward, WAND_INTENSITY);
}

pub fn handle_action(action: KeyAction, w: &InputWiring) {
    match action {
        KeyAction::ToggleBreath => {
            if w.session.is_active() {
                w.session.stop();
                overlay::set_meter(&w.document, 0.0);
                overlay::set_status(&w.document, "Microphone off");
            } else {
                audio::begin_listening(w.session.clone(), w.document.clone());
            }
        }
        KeyAction::ClearBubbles => {
            let mut scene = w.scene.borrow_mut();
            let mut bubbles = w.bubbles.borrow_mut();
            let n = bubbles.bubble_count();
            bubbles.clear_all(&mut *scene);
            log::info!("[keys] cleared {} bubbles", n);
        }
        KeyAction::ToggleWind => {
            let mut bubbles = w.bubbles.borrow_mut();
            let strength = if bubbles.wind_strength() > 0.0 {
                0.0
            } else {
                DEFAULT_WIND_STRENGTH
            };
            bubbles.set_wind(strength, None);
            drop(bubbles);
            show_tuning(w);
        }
        KeyAction::Puff => puff_from_viewer(w),
        KeyAction::SensitivityUp | KeyAction::SensitivityDown => {
            let mut det = w.session.detector.borrow_mut();
            let step = if action == KeyAction::SensitivityUp {
                SENSITIVITY_STEP
            } else {
                -SENSITIVITY_STEP
            };
            let next = det.sensitivity() + step;
            det.set_sensitivity(next);
            drop(det);
            show_tuning(w);
        }
        KeyAction::ThresholdUp | KeyAction::ThresholdDown => {
            let mut det = w.session.detector.borrow_mut();
            let step = if action == KeyAction::ThresholdUp {
                THRESHOLD_STEP
            } else {
                -THRESHOLD_STEP
            };
            let next = det.threshold() + step;
            det.set_threshold(next);
            drop(det);
            show_tuning(w);
        }
        KeyAction::ToggleOverlay => overlay::toggle(&w.document),
    }
}

pub fn wire_global_keydown(w: InputWiring) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                if let Some(action) = action_for_key(&ev.key()) {
                    if consumes_default(action) {
                        ev.prevent_default();
                    }
                    handle_action(action, &w);
                }
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
