// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `setTimeout` / `setInterval` timers.
//!
//! Both timers own one JS closure for their whole lifetime and are re-armed
//! by id, so a callback may safely re-arm (or clear) the very timer that
//! invoked it. Dropping a timer clears any pending registration and frees
//! the closure.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::Cell;

use segue_core::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(handler: &JsValue, delay_ms: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);

    #[wasm_bindgen(js_name = "setInterval")]
    fn set_interval(handler: &JsValue, delay_ms: i32) -> i32;

    #[wasm_bindgen(js_name = "clearInterval")]
    fn clear_interval(id: i32);
}

type TimerClosure = Closure<dyn FnMut()>;

/// Converts a duration to a timer delay, rounding up and saturating.
#[must_use]
pub fn delay_millis(duration: Duration) -> i32 {
    i32::try_from(duration.as_millis_ceil()).unwrap_or(i32::MAX)
}

/// A re-armable one-shot timer.
pub struct Timeout {
    closure: TimerClosure,
    id: Rc<Cell<Option<i32>>>,
}

impl Timeout {
    /// Creates a disarmed timer that runs `callback` each time it fires.
    pub fn new(mut callback: impl FnMut() + 'static) -> Self {
        let id = Rc::new(Cell::new(None));
        let fired = Rc::clone(&id);
        let closure = Closure::wrap(Box::new(move || {
            fired.set(None);
            callback();
        }) as Box<dyn FnMut()>);
        Self { closure, id }
    }

    /// Arms the timer to fire once after `delay`, replacing any earlier
    /// registration.
    pub fn set(&self, delay: Duration) {
        self.clear();
        let id = set_timeout(self.closure.as_ref().unchecked_ref(), delay_millis(delay));
        self.id.set(Some(id));
    }

    /// Disarms the timer.
    pub fn clear(&self) {
        if let Some(id) = self.id.take() {
            clear_timeout(id);
        }
    }

    /// Returns `true` if the timer is armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.id.get().is_some()
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.clear();
    }
}

impl core::fmt::Debug for Timeout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Timeout")
            .field("id", &self.id.get())
            .finish_non_exhaustive()
    }
}

/// A re-armable recurring timer.
pub struct Interval {
    closure: TimerClosure,
    id: Cell<Option<i32>>,
}

impl Interval {
    /// Creates a disarmed timer that runs `callback` on every tick.
    pub fn new(callback: impl FnMut() + 'static) -> Self {
        Self {
            closure: Closure::wrap(Box::new(callback) as Box<dyn FnMut()>),
            id: Cell::new(None),
        }
    }

    /// Starts ticking every `period`, replacing any earlier registration.
    pub fn set(&self, period: Duration) {
        self.clear();
        let id = set_interval(self.closure.as_ref().unchecked_ref(), delay_millis(period));
        self.id.set(Some(id));
    }

    /// Stops ticking.
    pub fn clear(&self) {
        if let Some(id) = self.id.take() {
            clear_interval(id);
        }
    }

    /// Returns `true` if the timer is ticking.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.id.get().is_some()
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.clear();
    }
}

impl core::fmt::Debug for Interval {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Interval")
            .field("id", &self.id.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_round_up_and_saturate() {
        assert_eq!(delay_millis(Duration::ZERO), 0);
        assert_eq!(delay_millis(Duration(1)), 1);
        assert_eq!(delay_millis(Duration::from_millis(3_000)), 3_000);
        assert_eq!(delay_millis(Duration(u64::MAX)), i32::MAX);
    }
}
