// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Counts are stored as `u32` and saturate.

use segue_core::execute::{TaskKind, TaskOutcome};
use segue_core::plan::Motion;
use segue_core::reveal::RevealState;
use segue_core::time::HostTime;
use segue_core::trace::{
    CaptureEvent, CorrespondenceEvent, MatchEvent, NavigateCause, NavigateEvent, TaskEvent,
    TraceSink, TransitionSummary,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_NAVIGATE: u8 = 1;
const TAG_CAPTURE: u8 = 2;
const TAG_MATCH: u8 = 3;
const TAG_CORRESPONDENCE: u8 = 4;
const TAG_TASK: u8 = 5;
const TAG_TRANSITION: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, n: usize) {
        self.write_u32(u32::try_from(n).unwrap_or(u32::MAX));
    }

    fn write_state(&mut self, s: RevealState) {
        self.write_u64(u64::try_from(s.slide).unwrap_or(u64::MAX));
        self.write_u32(s.step);
    }

    fn write_cause(&mut self, c: NavigateCause) {
        self.write_u8(match c {
            NavigateCause::Manual => 0,
            NavigateCause::Autoplay => 1,
            NavigateCause::Replace => 2,
        });
    }

    fn write_motion(&mut self, m: Motion) {
        self.write_u8(match m {
            Motion::Scale => 0,
            Motion::Move => 1,
            Motion::Transform => 2,
            Motion::FadeIn => 3,
            Motion::FadeOut => 4,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_navigate(&mut self, e: &NavigateEvent) {
        self.write_u8(TAG_NAVIGATE);
        self.write_u64(e.at.ticks());
        self.write_state(e.from);
        self.write_state(e.to);
        self.write_cause(e.cause);
    }

    fn on_capture(&mut self, e: &CaptureEvent) {
        self.write_u8(TAG_CAPTURE);
        self.write_u64(e.at.ticks());
        self.write_state(e.state);
        self.write_count(e.descriptors);
    }

    fn on_match(&mut self, e: &MatchEvent) {
        self.write_u8(TAG_MATCH);
        self.write_u64(e.at.ticks());
        self.write_count(e.matched);
        self.write_count(e.new);
        self.write_count(e.removed);
    }

    fn on_correspondence(&mut self, e: &CorrespondenceEvent) {
        self.write_u8(TAG_CORRESPONDENCE);
        self.write_u32(e.from);
        self.write_u32(e.to);
        self.write_u64(e.similarity.to_bits());
        self.write_motion(e.motion);
    }

    fn on_task(&mut self, e: &TaskEvent) {
        self.write_u8(TAG_TASK);
        self.write_u64(e.at.ticks());
        self.write_u8(match e.kind {
            TaskKind::Cleanup => 0,
            TaskKind::Reveal => 1,
            TaskKind::Hide => 2,
        });
        self.write_u32(e.element);
        self.write_u8(match e.outcome {
            TaskOutcome::Ran => 0,
            TaskOutcome::Stale => 1,
        });
    }

    fn on_transition(&mut self, s: &TransitionSummary) {
        self.write_u8(TAG_TRANSITION);
        self.write_u64(s.at.ticks());
        self.write_state(s.state);
        self.write_count(s.morphs);
        self.write_count(s.fade_in);
        self.write_count(s.fade_out);
        self.write_count(s.pending);
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// A decoded trace event.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// Navigation.
    Navigate(NavigateEvent),
    /// Capture.
    Capture(CaptureEvent),
    /// Matching pass.
    Match(MatchEvent),
    /// One planned morph.
    Correspondence(CorrespondenceEvent),
    /// Deferred task.
    Task(TaskEvent),
    /// Per-transition summary.
    Transition(TransitionSummary),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes: [u8; N] = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_count(&mut self) -> Option<usize> {
        usize::try_from(self.read_u32()?).ok()
    }

    fn read_state(&mut self) -> Option<RevealState> {
        let slide = usize::try_from(self.read_u64()?).ok()?;
        Some(RevealState::new(slide, self.read_u32()?))
    }

    fn read_cause(&mut self) -> Option<NavigateCause> {
        Some(match self.read_u8()? {
            0 => NavigateCause::Manual,
            1 => NavigateCause::Autoplay,
            _ => NavigateCause::Replace,
        })
    }

    fn read_motion(&mut self) -> Option<Motion> {
        Some(match self.read_u8()? {
            0 => Motion::Scale,
            1 => Motion::Move,
            2 => Motion::Transform,
            3 => Motion::FadeIn,
            _ => Motion::FadeOut,
        })
    }

    fn decode_navigate(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Navigate(NavigateEvent {
            at: self.read_time()?,
            from: self.read_state()?,
            to: self.read_state()?,
            cause: self.read_cause()?,
        }))
    }

    fn decode_capture(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Capture(CaptureEvent {
            at: self.read_time()?,
            state: self.read_state()?,
            descriptors: self.read_count()?,
        }))
    }

    fn decode_match(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Match(MatchEvent {
            at: self.read_time()?,
            matched: self.read_count()?,
            new: self.read_count()?,
            removed: self.read_count()?,
        }))
    }

    fn decode_correspondence(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Correspondence(CorrespondenceEvent {
            from: self.read_u32()?,
            to: self.read_u32()?,
            similarity: f64::from_bits(self.read_u64()?),
            motion: self.read_motion()?,
        }))
    }

    fn decode_task(&mut self) -> Option<RecordedEvent> {
        let at = self.read_time()?;
        let kind = match self.read_u8()? {
            0 => TaskKind::Cleanup,
            1 => TaskKind::Reveal,
            _ => TaskKind::Hide,
        };
        let element = self.read_u32()?;
        let outcome = if self.read_u8()? == 0 {
            TaskOutcome::Ran
        } else {
            TaskOutcome::Stale
        };
        Some(RecordedEvent::Task(TaskEvent {
            at,
            kind,
            element,
            outcome,
        }))
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transition(TransitionSummary {
            at: self.read_time()?,
            state: self.read_state()?,
            morphs: self.read_count()?,
            fade_in: self.read_count()?,
            fade_out: self.read_count()?,
            pending: self.read_count()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_NAVIGATE => self.decode_navigate(),
            TAG_CAPTURE => self.decode_capture(),
            TAG_MATCH => self.decode_match(),
            TAG_CORRESPONDENCE => self.decode_correspondence(),
            TAG_TASK => self.decode_task(),
            TAG_TRANSITION => self.decode_transition(),
            _ => None, // unknown tag → stop iteration
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
            at: HostTime(1_000_000),
            from: RevealState::new(0, 2),
            to: RevealState::new(1, 0),
            cause: NavigateCause::Autoplay,
        }
    }

    fn sample_summary() -> TransitionSummary {
        TransitionSummary {
            at: HostTime(1_000_000),
            state: RevealState::new(1, 0),
            morphs: 3,
            fade_in: 1,
            fade_out: 2,
            pending: 6,
        }
    }

    #[test]
    fn one_transition_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_navigate(&sample_navigate());
        rec.on_correspondence(&CorrespondenceEvent {
            from: 4,
            to: 9,
            similarity: 0.575,
            motion: Motion::Move,
        });
        rec.on_transition(&sample_summary());
        rec.on_task(&TaskEvent {
            at: HostTime(1_500_000),
            kind: TaskKind::Hide,
            element: 7,
            outcome: TaskOutcome::Stale,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], RecordedEvent::Navigate(sample_navigate()));
        match &events[1] {
            RecordedEvent::Correspondence(e) => {
                assert_eq!((e.from, e.to), (4, 9));
                assert!((e.similarity - 0.575).abs() < f64::EPSILON);
                assert_eq!(e.motion, Motion::Move);
            }
            other => panic!("expected Correspondence, got {other:?}"),
        }
        assert_eq!(events[2], RecordedEvent::Transition(sample_summary()));
        match &events[3] {
            RecordedEvent::Task(e) => {
                assert_eq!(e.kind, TaskKind::Hide);
                assert_eq!(e.outcome, TaskOutcome::Stale);
            }
            other => panic!("expected Task, got {other:?}"),
        }
    }

    #[test]
    fn oversized_counts_saturate() {
        let mut rec = RecorderSink::new();
        rec.on_match(&MatchEvent {
            at: HostTime(0),
            matched: usize::MAX,
            new: 0,
            removed: 1,
        });
        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::Match(e)) => {
                assert_eq!(e.matched, u32::MAX as usize);
                assert_eq!(e.removed, 1);
            }
            other => panic!("expected Match, got {other:?}"),
        }
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        assert_eq!(decode(&[]).count(), 0);
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_navigate(&sample_navigate());
        rec.on_navigate(&sample_navigate());
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];
        assert_eq!(decode(cut).count(), 1);
    }
}
