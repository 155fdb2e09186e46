//! Scoped pointer capture.
//!
//! While a pan, drag, or resize is active the host tracks the pointer on the
//! window rather than the board element, so the gesture keeps following the
//! cursor outside the board. Registration hands back a `Disposer` that
//! removes the listeners exactly once, either explicitly or on drop.

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

use js_sys::Function;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{MouseEvent, Window};

/// Runs a cleanup callback at most once.
#[derive(Default)]
pub struct Disposer {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl Disposer {
    #[must_use]
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self { cleanup: Some(Box::new(cleanup)) }
    }

    /// Run the cleanup if it hasn't run yet.
    pub fn dispose(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cleanup.is_some()
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposer").field("active", &self.is_active()).finish()
    }
}

type PointerCallback = Closure<dyn FnMut(MouseEvent)>;

/// Attach `pointermove` / `pointerup` / `pointercancel` listeners to the window.
///
/// `on_end` handles both `pointerup` and `pointercancel`.
///
/// # Errors
///
/// Returns `Err` if there is no window or a listener cannot be attached.
pub fn capture_window_pointer(
    on_move: impl FnMut(MouseEvent) + 'static,
    on_end: impl FnMut(MouseEvent) + 'static,
) -> Result<Disposer, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let on_move: PointerCallback = Closure::new(on_move);
    let on_end: PointerCallback = Closure::new(on_end);
    let move_fn: Function = on_move.as_ref().unchecked_ref::<Function>().clone();
    let end_fn: Function = on_end.as_ref().unchecked_ref::<Function>().clone();

    // Armed before attaching: an early return detaches whatever made it on.
    let target = window.clone();
    let disposer = Disposer::new(move || {
        detach(&target, "pointermove", &on_move);
        detach(&target, "pointerup", &on_end);
        detach(&target, "pointercancel", &on_end);
    });

    window.add_event_listener_with_callback("pointermove", &move_fn)?;
    window.add_event_listener_with_callback("pointerup", &end_fn)?;
    window.add_event_listener_with_callback("pointercancel", &end_fn)?;
    Ok(disposer)
}

fn detach(window: &Window, event: &str, callback: &PointerCallback) {
    if let Err(err) = window.remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
        warn!(event, error = ?err, "failed to detach window listener");
    }
}
