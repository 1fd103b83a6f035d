// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal navigation and cross-slide element morphing for presentations.
//!
//! `segue_core` decides, each time a presentation advances one reveal step or
//! crosses into another slide, what the navigation state now is and which
//! on-screen elements persist across the change. Persisting elements morph
//! from their old geometry to their new one (FLIP); the rest fade in or out.
//! It is `no_std` compatible (with `alloc`) and knows nothing about the DOM:
//! hosts implement the [`Surface`](backend::Surface) trait.
//!
//! # Architecture
//!
//! ```text
//!   host input / autoplay tick
//!       │
//!       ▼
//!   RevealMachine ──► RevealState ──► Surface::show()
//!                                          │
//!                 ┌────────────────────────┘
//!                 ▼
//!   capture() ──► Snapshot ──► MatchStrategy::assign() ──► Assignment
//!                                                              │
//!                 ┌────────────────────────────────────────────┘
//!                 ▼
//!   plan() ──► TransitionPlan ──► TransitionExecutor ──► Timeline
//!                                                          │
//!                                   host timer ◄───────────┘
//! ```
//!
//! **[`deck`]**: Slides, elements, and their reveal steps.
//!
//! **[`reveal`]**: The navigation state machine, including autoplay arming
//! with generation tokens so stale timer callbacks are ignored.
//!
//! **[`registry`]**: Generational handles for live host nodes, with a
//! per-element transition generation that makes superseded cleanup a no-op.
//!
//! **[`descriptor`]** and **[`capture`]**: Per-element descriptors measured
//! from the active slide.
//!
//! **[`matcher`]**: Fuzzy greedy correspondence between two snapshots.
//!
//! **[`plan`]**: Motion classification and FLIP transforms.
//!
//! **[`execute`]** and **[`timeline`]**: Style writes plus deferred cleanup,
//! reveal, and hide tasks.
//!
//! **[`presentation`]**: Ties everything together behind one navigable
//! value.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-pair
//!   correspondence events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod capture;
pub mod deck;
pub mod descriptor;
pub mod execute;
pub mod matcher;
pub mod plan;
pub mod presentation;
pub mod registry;
pub mod reveal;
pub mod time;
pub mod timeline;
pub mod trace;

#[cfg(test)]
mod testing;
