// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for navigation and transitions.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Presentation`](crate::presentation::Presentation) calls at each stage of
//! a transition. All method bodies default to no-ops, so implementing only
//! the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates per-pair [`CorrespondenceEvent`]s
//!   and the corresponding `TraceSink` method.

use crate::execute::{TaskKind, TaskOutcome};
#[cfg(feature = "trace-rich")]
use crate::plan::Motion;
use crate::reveal::RevealState;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What triggered a navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavigateCause {
    /// `next`, `prev`, `jump`, or `reset` from the host UI.
    Manual,
    /// An autoplay tick.
    Autoplay,
    /// The slide list was replaced.
    Replace,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the reveal state changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigateEvent {
    /// Host time of the navigation.
    pub at: HostTime,
    /// State before.
    pub from: RevealState,
    /// State after.
    pub to: RevealState,
    /// Trigger.
    pub cause: NavigateCause,
}

/// Emitted after the active slide was captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureEvent {
    /// Host time of the capture.
    pub at: HostTime,
    /// State that was captured.
    pub state: RevealState,
    /// Number of descriptors.
    pub descriptors: usize,
}

/// Emitted after matching the previous snapshot against the current one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchEvent {
    /// Host time of the match.
    pub at: HostTime,
    /// Accepted pairs.
    pub matched: usize,
    /// Unmatched current descriptors.
    pub new: usize,
    /// Unmatched previous descriptors.
    pub removed: usize,
}

/// One planned morph.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrespondenceEvent {
    /// Slot index of the source element.
    pub from: u32,
    /// Slot index of the destination element.
    pub to: u32,
    /// Similarity of the pair.
    pub similarity: f64,
    /// Motion classification.
    pub motion: Motion,
}

/// Emitted when a deferred element task comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskEvent {
    /// Host time the task ran.
    pub at: HostTime,
    /// Task kind.
    pub kind: TaskKind,
    /// Slot index of the element.
    pub element: u32,
    /// Whether the task ran or was stale.
    pub outcome: TaskOutcome,
}

/// Per-transition summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionSummary {
    /// Host time the transition was executed.
    pub at: HostTime,
    /// Reveal state transitioned into.
    pub state: RevealState,
    /// Morphs started.
    pub morphs: usize,
    /// Fade-ins started.
    pub fade_in: usize,
    /// Fade-outs started.
    pub fade_out: usize,
    /// Deferred tasks queued after execution.
    pub pending: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a presentation.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when the reveal state changes.
    fn on_navigate(&mut self, e: &NavigateEvent) {
        _ = e;
    }

    /// Called after a capture.
    fn on_capture(&mut self, e: &CaptureEvent) {
        _ = e;
    }

    /// Called after matching.
    fn on_match(&mut self, e: &MatchEvent) {
        _ = e;
    }

    /// Called per planned morph (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_correspondence(&mut self, e: &CorrespondenceEvent) {
        _ = e;
    }

    /// Called when a deferred task comes due.
    fn on_task(&mut self, e: &TaskEvent) {
        _ = e;
    }

    /// Called after a transition was executed.
    fn on_transition(&mut self, s: &TransitionSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        Self::from_option(Some(sink))
    }

    /// Creates a tracer that dispatches to `sink` if present.
    #[inline]
    #[must_use]
    pub fn from_option(sink: Option<&'a mut dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::from_option(None)
    }

    /// Emits a [`NavigateEvent`].
    #[inline]
    pub fn navigate(&mut self, e: &NavigateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_navigate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CaptureEvent`].
    #[inline]
    pub fn capture(&mut self, e: &CaptureEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_capture(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MatchEvent`].
    #[inline]
    pub fn matched(&mut self, e: &MatchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_match(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CorrespondenceEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn correspondence(&mut self, e: &CorrespondenceEvent) {
        if let Some(s) = &mut self.sink {
            s.on_correspondence(e);
        }
    }

    /// Emits a [`TaskEvent`].
    #[inline]
    pub fn task(&mut self, e: &TaskEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_task(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionSummary`].
    #[inline]
    pub fn transition(&mut self, s: &TransitionSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_transition(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_navigate() -> NavigateEvent {
        NavigateEvent {
            at: HostTime(1_000),
            from: RevealState::new(0, 2),
            to: RevealState::new(1, 0),
            cause: NavigateCause::Manual,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_navigate(&sample_navigate());
        sink.on_match(&MatchEvent {
            at: HostTime(0),
            matched: 1,
            new: 2,
            removed: 3,
        });
        sink.on_transition(&TransitionSummary {
            at: HostTime(0),
            state: RevealState::START,
            morphs: 0,
            fade_in: 0,
            fade_out: 0,
            pending: 0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.navigate(&sample_navigate());
        tracer.task(&TaskEvent {
            at: HostTime(0),
            kind: TaskKind::Cleanup,
            element: 0,
            outcome: TaskOutcome::Ran,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            navigations: Vec<RevealState>,
        }
        impl TraceSink for RecordingSink {
            fn on_navigate(&mut self, e: &NavigateEvent) {
                self.navigations.push(e.to);
            }
        }

        let mut sink = RecordingSink {
            navigations: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.navigate(&sample_navigate());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.navigations, &[RevealState::new(1, 0)]);
    }
}
