use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A self-rescheduling frame callback and the id of its pending request.
///
/// The callback usually captures a clone of its own `TickLoop` so it can
/// request the next frame, which makes a reference cycle. [`TickLoop::release`]
/// breaks it.
pub struct TickLoop<C> {
    callback: Rc<RefCell<Option<C>>>,
    pending: Rc<Cell<Option<i32>>>,
}

impl<C> Clone for TickLoop<C> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
            pending: self.pending.clone(),
        }
    }
}

impl<C> Default for TickLoop<C> {
    fn default() -> Self {
        Self {
            callback: Rc::new(RefCell::new(None)),
            pending: Rc::new(Cell::new(None)),
        }
    }
}

impl<C> TickLoop<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the callback. A previous one is dropped.
    pub fn install(&self, callback: C) {
        let previous = self.callback.borrow_mut().replace(callback);
        drop(previous);
    }

    pub fn callback(&self) -> &Rc<RefCell<Option<C>>> {
        &self.callback
    }

    #[allow(dead_code)]
    pub fn is_installed(&self) -> bool {
        self.callback.borrow().is_some()
    }

    pub fn set_pending(&self, id: Option<i32>) {
        self.pending.set(id);
    }

    #[allow(dead_code)]
    pub fn pending(&self) -> Option<i32> {
        self.pending.get()
    }

    /// Cancel the pending request through `cancel` and drop the callback.
    /// Must not be called from inside the callback itself.
    pub fn release(&self, cancel: impl FnOnce(i32)) {
        if let Some(id) = self.pending.take() {
            cancel(id);
        }
        let callback = self.callback.borrow_mut().take();
        drop(callback);
    }
}
