// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in milliseconds.

use std::io::Write;

use segue_core::reveal::RevealState;
use segue_core::time::HostTime;
use segue_core::trace::{
    CaptureEvent, CorrespondenceEvent, MatchEvent, NavigateEvent, TaskEvent, TraceSink,
    TransitionSummary,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.ticks() as f64 / 1000.0
}

fn state(s: RevealState) -> String {
    format!("{}.{}", s.slide, s.step)
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_navigate(&mut self, e: &NavigateEvent) {
        let _ = writeln!(
            self.writer,
            "[navigate] {} -> {} cause={:?} at {:.1}ms",
            state(e.from),
            state(e.to),
            e.cause,
            ms(e.at),
        );
    }

    fn on_capture(&mut self, e: &CaptureEvent) {
        let _ = writeln!(
            self.writer,
            "[capture] state={} descriptors={} at {:.1}ms",
            state(e.state),
            e.descriptors,
            ms(e.at),
        );
    }

    fn on_match(&mut self, e: &MatchEvent) {
        let _ = writeln!(
            self.writer,
            "[match] matched={} new={} removed={}",
            e.matched, e.new, e.removed,
        );
    }

    fn on_correspondence(&mut self, e: &CorrespondenceEvent) {
        let _ = writeln!(
            self.writer,
            "[pair] #{} -> #{} similarity={:.3} motion={:?}",
            e.from, e.to, e.similarity, e.motion,
        );
    }

    fn on_task(&mut self, e: &TaskEvent) {
        let _ = writeln!(
            self.writer,
            "[task] {:?} #{} {:?} at {:.1}ms",
            e.kind,
            e.element,
            e.outcome,
            ms(e.at),
        );
    }

    fn on_transition(&mut self, s: &TransitionSummary) {
        let _ = writeln!(
            self.writer,
            "[transition] state={} morphs={} fade_in={} fade_out={} pending={}",
            state(s.state),
            s.morphs,
            s.fade_in,
            s.fade_out,
            s.pending,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segue_core::execute::{TaskKind, TaskOutcome};
    use segue_core::trace::NavigateCause;

    #[test]
    fn pretty_print_navigate() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_navigate(&NavigateEvent {
            at: HostTime(1_500),
            from: RevealState::new(0, 2),
            to: RevealState::new(1, 0),
            cause: NavigateCause::Manual,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[navigate] 0.2 -> 1.0 cause=Manual at 1.5ms\n");
    }

    #[test]
    fn pretty_print_stale_task() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_task(&TaskEvent {
            at: HostTime(500_000),
            kind: TaskKind::Cleanup,
            element: 3,
            outcome: TaskOutcome::Stale,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[task] Cleanup #3 Stale"), "got: {output}");
    }
}
