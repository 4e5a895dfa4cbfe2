use super::InputWiring;
use crate::constants::{WAND_DISTANCE, WAND_INTENSITY};
use crate::dom;
use wasm_bindgen::JsCast;
use web_sys as web;

/// A tap or click blows a wand puff aimed through the pointer.
pub fn wire_pointer_wand(w: InputWiring) {
    let canvas = w.canvas.clone();
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let (sx, sy) = dom::pointer_canvas_px(&ev, &w.canvas);
        let (ro, rd) = w.camera.borrow().screen_ray(
            w.canvas.width() as f32,
            w.canvas.height() as f32,
            sx,
            sy,
        );
        if rd.length_squared() == 0.0 {
            return;
        }
        let wand = ro + rd * WAND_DISTANCE;
        let spawned = {
            let mut scene = w.scene.borrow_mut();
            w.bubbles
                .borrow_mut()
                .create_bubbles_from_wand(&mut *scene, wand, rd, WAND_INTENSITY)
        };
        log::debug!("[pointer] wand puff of {} at ({:.0},{:.0})", spawned.len(), sx, sy);
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}
