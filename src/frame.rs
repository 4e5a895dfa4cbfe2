use crate::audio::MicSource;
use crate::camera::Camera;
use crate::core::{BreathDetector, BubbleSystem, SceneGraph};
use crate::render;
use crate::tick::TickLoop;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub bubbles: Rc<RefCell<BubbleSystem>>,
    pub scene: Rc<RefCell<SceneGraph>>,
    pub camera: Rc<RefCell<Camera>>,
    pub canvas: web::HtmlCanvasElement,
    /// Latest breath envelope, written by the analysis loop.
    pub breath_level: Rc<Cell<f32>>,
    pub gpu: Option<render::GpuState<'a>>,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        {
            let mut scene = self.scene.borrow_mut();
            self.bubbles.borrow_mut().update(&mut *scene);
        }

        let w = self.canvas.width();
        let h = self.canvas.height();
        self.camera.borrow_mut().set_viewport(w, h);

        if let Some(g) = &mut self.gpu {
            g.set_ambient_clear(self.breath_level.get());
            g.resize_if_needed(w, h);
            let camera = self.camera.borrow();
            let scene = self.scene.borrow();
            if let Err(e) = g.render(dt_sec, &camera, &scene) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

/// Drive `detector` once per animation frame until it stops listening. The
/// callback and the pending request id live in `analysis`, so a stop can
/// cancel the request and drop the callback.
pub fn start_breath_loop(
    detector: Rc<RefCell<BreathDetector<MicSource>>>,
    analysis: &TickLoop<Closure<dyn FnMut()>>,
) {
    let handle = analysis.clone();
    analysis.install(Closure::wrap(Box::new(move || {
        handle.set_pending(None);
        if detector.borrow_mut().analyze() {
            handle.set_pending(request_frame(handle.callback()));
        }
    }) as Box<dyn FnMut()>));
    analysis.set_pending(request_frame(analysis.callback()));
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) -> Option<i32> {
    let w = web::window()?;
    let tick = tick.borrow();
    let cb = tick.as_ref()?;
    w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()
}
