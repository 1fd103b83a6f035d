// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition orchestration.
//!
//! [`Presentation`] wires the pieces together. Every navigation that changes
//! the [`RevealState`] runs one transition:
//!
//! ```text
//!   RevealMachine ──► Surface::show ──► capture ──► MatchStrategy::assign
//!                                                          │
//!        previous snapshot ◄── replace ◄── execute ◄── plan ┘
//! ```
//!
//! The previous snapshot is a field of the presentation, overwritten
//! wholesale after each transition; nothing is global. Deferred element tasks
//! are run by [`run_due`](Presentation::run_due), which the host calls from a
//! single timer armed for [`next_due`](Presentation::next_due).

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::backend::Surface;
use crate::capture::capture;
use crate::deck::{Deck, DeckError};
use crate::descriptor::Snapshot;
use crate::execute::{TaskReport, TransitionConfig, TransitionExecutor};
use crate::matcher::{GreedyMatcher, MatchStrategy};
use crate::plan::{PlannerConfig, plan};
use crate::registry::ElementRegistry;
use crate::reveal::{AutoplayArm, AutoplayConfig, AutoplayFire, AutoplayToken, RevealMachine, RevealState};
use crate::time::{Duration, HostTime};
#[cfg(feature = "trace-rich")]
use crate::trace::CorrespondenceEvent;
use crate::trace::{
    CaptureEvent, MatchEvent, NavigateCause, NavigateEvent, TaskEvent, TraceSink, Tracer,
    TransitionSummary,
};

/// Configuration of a [`Presentation`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresentationConfig {
    /// Autoplay settings.
    pub autoplay: AutoplayConfig,
    /// Motion classification thresholds.
    pub planner: PlannerConfig,
    /// Animation timing.
    pub transition: TransitionConfig,
}

impl PresentationConfig {
    /// Default configuration for browser hosts.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            autoplay: AutoplayConfig::default_web(),
            planner: PlannerConfig::new(),
            transition: TransitionConfig::default_web(),
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self::web()
    }
}

/// A navigable deck bound to a live surface.
pub struct Presentation<S: Surface, C> {
    deck: Deck<C>,
    surface: S,
    reveal: RevealMachine,
    registry: ElementRegistry<S::Node>,
    previous: Snapshot,
    strategy: Box<dyn MatchStrategy>,
    planner: PlannerConfig,
    executor: TransitionExecutor,
    sink: Option<Box<dyn TraceSink>>,
}

impl<S: Surface, C> fmt::Debug for Presentation<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presentation")
            .field("state", &self.reveal.state())
            .field("slides", &self.deck.len())
            .field("registry", &self.registry)
            .field("previous", &self.previous.len())
            .field("planner", &self.planner)
            .field("executor", &self.executor)
            .field("tracing", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: Surface, C> Presentation<S, C> {
    /// Binds `deck` to `surface`, shows the first step, and captures it as the
    /// baseline snapshot without animating.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Empty`] if the deck has no slides (unreachable
    /// for a validated [`Deck`]).
    pub fn new(deck: Deck<C>, surface: S, config: PresentationConfig) -> Result<Self, DeckError> {
        let reveal = RevealMachine::new(deck.step_totals(), config.autoplay)?;
        let mut this = Self {
            deck,
            surface,
            reveal,
            registry: ElementRegistry::new(),
            previous: Snapshot::empty(),
            strategy: Box::new(GreedyMatcher::default()),
            planner: config.planner,
            executor: TransitionExecutor::new(config.transition),
            sink: None,
        };
        this.rebase();
        Ok(this)
    }

    /// Returns the current reveal state.
    #[must_use]
    pub fn state(&self) -> RevealState {
        self.reveal.state()
    }

    /// Returns the navigation state machine.
    #[must_use]
    pub fn reveal(&self) -> &RevealMachine {
        &self.reveal
    }

    /// Returns the deck.
    #[must_use]
    pub fn deck(&self) -> &Deck<C> {
        &self.deck
    }

    /// Returns the surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Returns the surface mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Returns the snapshot the next transition will match against.
    #[must_use]
    pub fn previous_snapshot(&self) -> &Snapshot {
        &self.previous
    }

    /// Returns when [`run_due`](Self::run_due) should next be called.
    #[must_use]
    pub fn next_due(&self) -> Option<HostTime> {
        self.executor.next_due()
    }

    /// Replaces the matching strategy.
    pub fn set_strategy(&mut self, strategy: Box<dyn MatchStrategy>) {
        self.strategy = strategy;
    }

    /// Installs (or removes) a trace sink.
    ///
    /// Events are only delivered when the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Option<Box<dyn TraceSink>>) {
        self.sink = sink;
    }

    /// Takes the installed trace sink back out.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.sink.take()
    }

    /// Advances one step. Stops autoplay.
    pub fn next(&mut self, now: HostTime) -> RevealState {
        let from = self.reveal.state();
        let to = self.reveal.next();
        self.navigated(from, to, NavigateCause::Manual, now);
        to
    }

    /// Goes back one step. Stops autoplay.
    pub fn prev(&mut self, now: HostTime) -> RevealState {
        let from = self.reveal.state();
        let to = self.reveal.prev();
        self.navigated(from, to, NavigateCause::Manual, now);
        to
    }

    /// Jumps to step 0 of `slide`, clamped into range. Stops autoplay.
    pub fn jump(&mut self, slide: usize, now: HostTime) -> RevealState {
        let from = self.reveal.state();
        let to = self.reveal.jump(slide);
        self.navigated(from, to, NavigateCause::Manual, now);
        to
    }

    /// Returns to the first step of the first slide. Stops autoplay.
    pub fn reset(&mut self, now: HostTime) -> RevealState {
        let from = self.reveal.state();
        let to = self.reveal.reset();
        self.navigated(from, to, NavigateCause::Manual, now);
        to
    }

    /// Returns `true` if autoplay is armed.
    #[must_use]
    pub fn is_autoplaying(&self) -> bool {
        self.reveal.is_autoplaying()
    }

    /// Toggles autoplay; see [`RevealMachine::toggle_autoplay`].
    pub fn toggle_autoplay(&mut self) -> Option<AutoplayArm> {
        self.reveal.toggle_autoplay()
    }

    /// Stops autoplay.
    pub fn stop_autoplay(&mut self) {
        self.reveal.stop_autoplay();
    }

    /// Changes the autoplay interval; see
    /// [`RevealMachine::set_autoplay_interval`].
    pub fn set_autoplay_interval(&mut self, interval: Duration) -> Option<AutoplayArm> {
        self.reveal.set_autoplay_interval(interval)
    }

    /// Handles one autoplay tick.
    pub fn autoplay_fire(&mut self, token: AutoplayToken, now: HostTime) -> AutoplayFire {
        let from = self.reveal.state();
        let outcome = self.reveal.autoplay_fire(token);
        if let AutoplayFire::Advanced(to) = outcome {
            self.navigated(from, to, NavigateCause::Autoplay, now);
        }
        outcome
    }

    /// Replaces the deck.
    ///
    /// The slide index is clamped, the step returns to 0, and the new state is
    /// captured as a fresh baseline without animating: snapshots of the old
    /// content are not matched against the new one.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Empty`] if the new deck has no slides.
    pub fn replace_slides(&mut self, deck: Deck<C>, now: HostTime) -> Result<RevealState, DeckError> {
        let from = self.reveal.state();
        let to = self.reveal.replace_slides(deck.step_totals())?;
        self.deck = deck;
        tracer(&mut self.sink).navigate(&NavigateEvent {
            at: now,
            from,
            to,
            cause: NavigateCause::Replace,
        });
        self.rebase();
        Ok(to)
    }

    /// Runs every deferred element task due at or before `now`.
    pub fn run_due(&mut self, now: HostTime) -> Vec<TaskReport> {
        let reports = self
            .executor
            .run_due(&mut self.surface, &mut self.registry, now);
        let mut tracer = tracer(&mut self.sink);
        for r in &reports {
            tracer.task(&TaskEvent {
                at: now,
                kind: r.task.kind,
                element: r.task.token.handle.index(),
                outcome: r.outcome,
            });
        }
        reports
    }

    fn navigated(&mut self, from: RevealState, to: RevealState, cause: NavigateCause, now: HostTime) {
        if from == to {
            return;
        }
        tracer(&mut self.sink).navigate(&NavigateEvent { at: now, from, to, cause });
        self.transition(now);
    }

    /// Shows the current state and captures it without animating.
    fn rebase(&mut self) {
        self.surface.show(self.reveal.state());
        self.previous = capture(&self.surface, &mut self.registry);
        let previous = &self.previous;
        self.registry.retain(|h| previous.contains(h));
    }

    fn transition(&mut self, now: HostTime) {
        let state = self.reveal.state();
        let mut tracer = tracer(&mut self.sink);

        self.surface.show(state);
        let current = capture(&self.surface, &mut self.registry);
        tracer.capture(&CaptureEvent {
            at: now,
            state,
            descriptors: current.len(),
        });

        let previous = self.previous.descriptors();
        let assignment = self.strategy.assign(previous, current.descriptors());
        tracer.matched(&MatchEvent {
            at: now,
            matched: assignment.matched.len(),
            new: assignment.new.len(),
            removed: assignment.removed.len(),
        });

        let registry = &self.registry;
        let surface = &self.surface;
        let plan = plan(
            &assignment,
            previous,
            current.descriptors(),
            &self.planner,
            |h| registry.resolve(h).and_then(|node| surface.bounds(node)),
        );
        #[cfg(feature = "trace-rich")]
        {
            for c in &plan.morphs {
                tracer.correspondence(&CorrespondenceEvent {
                    from: c.from.index(),
                    to: c.to.index(),
                    similarity: c.similarity,
                    motion: c.motion,
                });
            }
        }

        self.executor
            .execute(&plan, &mut self.surface, &mut self.registry, now);
        self.registry.retain(|h| current.contains(h));
        tracer.transition(&TransitionSummary {
            at: now,
            state,
            morphs: plan.morphs.len(),
            fade_in: plan.fade_in.len(),
            fade_out: plan.fade_out.len(),
            pending: self.executor.pending(),
        });

        self.previous = current;
    }
}

fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink {
        Some(sink) => Tracer::new(sink.as_mut()),
        None => Tracer::none(),
    }
}
