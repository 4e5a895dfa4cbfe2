use crate::audio::BreathSession;
use crate::camera::Camera;
use crate::core::{BubbleSystem, SceneGraph};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

pub mod keyboard;
pub mod keymap;
pub mod pointer;

pub use keyboard::wire_global_keydown;
pub use pointer::wire_pointer_wand;

/// Shared handles every input handler needs.
#[derive(Clone)]
pub struct InputWiring {
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub bubbles: Rc<RefCell<BubbleSystem>>,
    pub scene: Rc<RefCell<SceneGraph>>,
    pub camera: Rc<RefCell<Camera>>,
    pub session: Rc<BreathSession>,
}
