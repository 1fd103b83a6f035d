// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for segue.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`DomSurface`]: the [`Surface`] over `data-segue-slide` markup
//! - [`Timeout`] / [`Interval`]: `setTimeout` / `setInterval` wrappers
//! - [`WebPresentation`]: a presentation wired to both timers

#![no_std]

extern crate alloc;

mod dom;
mod player;
mod timer;

pub use dom::{
    DomSurface, MATCHABLE_SELECTOR, SLIDE_ATTRIBUTE, STEP_ATTRIBUTE, dataset_key, is_revealed,
    transform_css, transition_css,
};
pub use player::WebPresentation;
pub use segue_core::backend::Surface;
pub use timer::{Interval, Timeout, delay_millis};

use segue_core::time::HostTime;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    fn performance_now() -> f64;
}

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks.
#[must_use]
pub fn now() -> HostTime {
    HostTime::from_millis_f64(performance_now())
}
