#![cfg(target_arch = "wasm32")]
use crate::audio::BreathSession;
use crate::camera::Camera;
use crate::constants::*;
use crate::core::{BreathDetector, BubbleSystem, SceneGraph};
use glam::Vec3;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod camera;
mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod overlay;
mod render;
mod tick;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn default_camera(canvas: &web::HtmlCanvasElement) -> Camera {
    let mut camera = Camera {
        eye: Vec3::new(0.0, CAMERA_HEIGHT, CAMERA_Z),
        target: Vec3::new(0.0, CAMERA_HEIGHT, 0.0),
        up: Vec3::Y,
        aspect: 1.0,
        fovy_radians: CAMERA_FOVY_DEG.to_radians(),
        znear: CAMERA_ZNEAR,
        zfar: CAMERA_ZFAR,
    };
    camera.set_viewport(canvas.width(), canvas.height());
    camera
}

// Breath events spawn from the viewer's mouth along the view direction; the
// envelope drives the meter and the backdrop.
fn wire_breath_handlers(
    session: &BreathSession,
    bubbles: &Rc<RefCell<BubbleSystem>>,
    scene: &Rc<RefCell<SceneGraph>>,
    camera: &Rc<RefCell<Camera>>,
    breath_level: &Rc<Cell<f32>>,
    document: &web::Document,
) {
    let mut det = session.detector.borrow_mut();

    let bubbles = bubbles.clone();
    let scene = scene.clone();
    let camera = camera.clone();
    det.on_breath(move |intensity| {
        let pose = camera.borrow().pose();
        let origin = pose.breath_origin(MOUTH_FORWARD, MOUTH_DROP);
        let mut scene = scene.borrow_mut();
        bubbles
            .borrow_mut()
            .create_bubbles_from_breath(&mut *scene, origin, intensity, pose.forward);
    });

    let level = breath_level.clone();
    let doc = document.clone();
    det.on_volume(move |volume| {
        level.set(volume);
        overlay::set_meter(&doc, volume);
    });
}

fn wire_overlay_buttons(document: &web::Document, session: &Rc<BreathSession>) {
    let session_ok = session.clone();
    let doc_ok = document.clone();
    dom::add_click_listener(document, "overlay-ok", move || {
        overlay::hide(&doc_ok);
        audio::begin_listening(session_ok.clone(), doc_ok.clone());
    });

    let doc_close = document.clone();
    dom::add_click_listener(document, "overlay-close", move || {
        overlay::hide(&doc_close);
        overlay::set_status(&doc_close, "Click or press space to blow bubbles, B to use the microphone");
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("bubble-breath starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    wire_canvas_resize(&canvas);

    let bubbles = Rc::new(RefCell::new(BubbleSystem::new(RNG_SEED)));
    let scene = Rc::new(RefCell::new(SceneGraph::new()));
    let camera = Rc::new(RefCell::new(default_camera(&canvas)));
    let breath_level = Rc::new(Cell::new(0.0_f32));

    let session = Rc::new(BreathSession::new(BreathDetector::new()));
    wire_breath_handlers(&session, &bubbles, &scene, &camera, &breath_level, &document);
    wire_overlay_buttons(&document, &session);

    let wiring = events::InputWiring {
        document: document.clone(),
        canvas: canvas.clone(),
        bubbles: bubbles.clone(),
        scene: scene.clone(),
        camera: camera.clone(),
        session: session.clone(),
    };
    events::wire_global_keydown(wiring.clone());
    events::wire_pointer_wand(wiring);

    // The simulation runs even when WebGPU is unavailable.
    let gpu = frame::init_gpu(&canvas).await;
    if gpu.is_none() {
        overlay::set_status(&document, "WebGPU unavailable: bubbles are simulated but not drawn");
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        bubbles,
        scene,
        camera,
        canvas,
        breath_level,
        gpu,
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
