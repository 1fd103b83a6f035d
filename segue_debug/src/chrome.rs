// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use segue_core::reveal::RevealState;
use segue_core::time::HostTime;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Navigation and transition events go on thread 0, deferred element tasks
/// on thread 1, and each transition also updates a `pending` counter.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Navigate(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Navigate",
                    "cat": "Reveal",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "from": state(e.from),
                        "to": state(e.to),
                        "cause": format!("{:?}", e.cause),
                    }
                }));
            }
            RecordedEvent::Capture(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Capture",
                    "cat": "Transition",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "state": state(e.state),
                        "descriptors": e.descriptors,
                    }
                }));
            }
            RecordedEvent::Match(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Match",
                    "cat": "Transition",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "matched": e.matched,
                        "new": e.new,
                        "removed": e.removed,
                    }
                }));
            }
            RecordedEvent::Correspondence(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Correspondence",
                    "cat": "Rich",
                    "ts": 0,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "from": e.from,
                        "to": e.to,
                        "similarity": e.similarity,
                        "motion": format!("{:?}", e.motion),
                    }
                }));
            }
            RecordedEvent::Task(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.kind),
                    "cat": "Task",
                    "ts": us(e.at),
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "element": e.element,
                        "outcome": format!("{:?}", e.outcome),
                    }
                }));
            }
            RecordedEvent::Transition(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Transition",
                    "cat": "Summary",
                    "ts": us(s.at),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "state": state(s.state),
                        "morphs": s.morphs,
                        "fade_in": s.fade_in,
                        "fade_out": s.fade_out,
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "pending",
                    "ts": us(s.at),
                    "pid": 0,
                    "args": { "tasks": s.pending }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn us(t: HostTime) -> u64 {
    // Host ticks are already microseconds.
    t.ticks()
}

fn state(s: RevealState) -> String {
    format!("{}.{}", s.slide, s.step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use segue_core::execute::{TaskKind, TaskOutcome};
    use segue_core::trace::{NavigateCause, NavigateEvent, TaskEvent, TraceSink, TransitionSummary};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_navigate(&NavigateEvent {
            at: HostTime(1_000_000),
            from: RevealState::START,
            to: RevealState::new(0, 1),
            cause: NavigateCause::Manual,
        });
        rec.on_transition(&TransitionSummary {
            at: HostTime(1_000_100),
            state: RevealState::new(0, 1),
            morphs: 1,
            fade_in: 1,
            fade_out: 0,
            pending: 2,
        });
        rec.on_task(&TaskEvent {
            at: HostTime(1_016_100),
            kind: TaskKind::Reveal,
            element: 1,
            outcome: TaskOutcome::Ran,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["name"], "Navigate");
        assert_eq!(parsed[0]["args"]["to"], "0.1");
        assert_eq!(parsed[0]["ts"], 1_000_000);

        assert_eq!(parsed[1]["name"], "Transition");
        assert_eq!(parsed[2]["ph"], "C");
        assert_eq!(parsed[2]["args"]["tasks"], 2);

        assert_eq!(parsed[3]["name"], "Reveal");
        assert_eq!(parsed[3]["tid"], 1);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
