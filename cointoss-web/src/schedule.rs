//! Browser timers wired to the core debounce and throttle gates.
use std::cell::RefCell;
use std::rc::Rc;

use cointoss_core::{Debouncer, Throttler};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::dom;

/// Runs its callback once the triggers stop for `wait_ms`.
#[derive(Clone)]
pub struct Debounced {
    gate: Rc<RefCell<Debouncer>>,
    callback: Rc<dyn Fn()>,
}

impl Debounced {
    pub fn new(wait_ms: u32, callback: impl Fn() + 'static) -> Self {
        Self {
            gate: Rc::new(RefCell::new(Debouncer::new(wait_ms))),
            callback: Rc::new(callback),
        }
    }

    /// # Errors
    /// Returns an error if the browser refuses the timer.
    pub fn trigger(&self) -> Result<(), JsValue> {
        let (ticket, wait_ms) = {
            let mut gate = self.gate.borrow_mut();
            (gate.call(), gate.wait_ms())
        };
        let gate = Rc::clone(&self.gate);
        let callback = Rc::clone(&self.callback);
        dom::set_timeout(
            move || {
                let fire = gate.borrow_mut().should_fire(ticket);
                if fire {
                    callback();
                }
            },
            wait_ms,
        )?;
        Ok(())
    }

    pub fn cancel(&self) {
        self.gate.borrow_mut().cancel();
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.gate.borrow().is_pending()
    }
}

/// Runs its callback at most once per `limit_ms`.
pub struct Throttled {
    gate: RefCell<Throttler>,
    callback: Box<dyn Fn()>,
}

impl Throttled {
    pub fn new(limit_ms: u32, callback: impl Fn() + 'static) -> Self {
        Self {
            gate: RefCell::new(Throttler::new(limit_ms)),
            callback: Box::new(callback),
        }
    }

    /// Returns whether the callback ran.
    pub fn trigger(&self) -> bool {
        let acquired = self.gate.borrow_mut().try_acquire(dom::now_ms());
        if acquired {
            (self.callback)();
        }
        acquired
    }
}

/// Listen for `resize` on the window, handing each event to `handler`.
///
/// The listener lives for the rest of the page.
///
/// # Errors
/// Returns an error if the window is unavailable or rejects the listener.
pub fn on_window_resize(handler: Debounced) -> Result<(), JsValue> {
    let listener = Closure::<dyn FnMut()>::new(move || {
        if let Err(err) = handler.trigger() {
            dom::console_error(&dom::js_error_message(&err));
        }
    });
    dom::window()?
        .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;
    listener.forget();
    Ok(())
}
