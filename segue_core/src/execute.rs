// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition execution.
//!
//! [`TransitionExecutor`] applies a [`TransitionPlan`] to a [`Surface`]:
//!
//! - **Morphs** write a transition declaration and the FLIP transform onto
//!   the source element right away and queue a [`TaskKind::Cleanup`] that
//!   clears the inline styles after the configured duration.
//! - **Fade-ins** force opacity 0 and flush layout, then queue a
//!   [`TaskKind::Reveal`] a short delay later. The reveal runs as a separate
//!   timer task, so the host paints the transparent state before opacity
//!   returns to 1 under a transition.
//! - **Fade-outs** transition opacity to 0 and queue a [`TaskKind::Hide`]
//!   that removes the element from layout once the fade has finished.
//!
//! Every task carries the [`TransitionToken`] of the transition that queued
//! it. If the element has started a newer transition (or was released) by
//! the time the task runs, the task is stale and does nothing.
//!
//! Destination elements of a morph that are distinct from the source are
//! *settled*: a transition generation is started and immediately finished
//! while their inline styles are cleared. That cancels any stale fade-out
//! still queued for them.

use alloc::vec::Vec;

use crate::backend::{Animated, Easing, Surface, Transition};
use crate::plan::TransitionPlan;
use crate::registry::{ElementHandle, ElementRegistry, TransitionToken};
use crate::time::{Duration, HostTime};
use crate::timeline::Timeline;

/// Shared timing for every animation of one transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionConfig {
    /// Length of morphs and fades.
    pub duration: Duration,
    /// Timing function.
    pub easing: Easing,
    /// Delay between forcing opacity 0 and starting a fade-in.
    pub reveal_delay: Duration,
}

impl TransitionConfig {
    /// Default configuration for browser hosts: 500 ms ease-in-out, with a
    /// one-frame reveal delay.
    #[must_use]
    pub const fn default_web() -> Self {
        Self {
            duration: Duration::from_millis(500),
            easing: Easing::EaseInOut,
            reveal_delay: Duration::from_millis(16),
        }
    }

    const fn transition(&self, property: Animated) -> Transition {
        Transition {
            property,
            duration: self.duration,
            easing: self.easing,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self::default_web()
    }
}

/// Kind of deferred element task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Clear inline transition, transform, and opacity.
    Cleanup,
    /// Start the opacity transition of a fade-in.
    Reveal,
    /// Remove a faded-out element from layout.
    Hide,
}

/// A deferred task bound to one element transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementTask {
    /// What to do.
    pub kind: TaskKind,
    /// Transition the task belongs to.
    pub token: TransitionToken,
}

/// What happened when a task came due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskOutcome {
    /// The task applied its style writes.
    Ran,
    /// The element had moved on to a newer transition or was released.
    Stale,
}

/// Report of one task run by [`TransitionExecutor::run_due`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskReport {
    /// The task.
    pub task: ElementTask,
    /// Its outcome.
    pub outcome: TaskOutcome,
}

/// Applies transition plans and runs their deferred tasks.
#[derive(Debug, Default)]
pub struct TransitionExecutor {
    config: TransitionConfig,
    timeline: Timeline<ElementTask>,
}

impl TransitionExecutor {
    /// Creates an executor.
    #[must_use]
    pub const fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            timeline: Timeline::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> TransitionConfig {
        self.config
    }

    /// Replaces the configuration for subsequent transitions.
    pub fn set_config(&mut self, config: TransitionConfig) {
        self.config = config;
    }

    /// Returns when the host should next call [`run_due`](Self::run_due).
    #[must_use]
    pub fn next_due(&self) -> Option<HostTime> {
        self.timeline.next_due()
    }

    /// Returns the number of queued tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timeline.len()
    }

    /// Applies `plan` at time `now`.
    ///
    /// All style writes that must precede a paint happen synchronously here;
    /// everything else is queued.
    pub fn execute<S: Surface>(
        &mut self,
        plan: &TransitionPlan,
        surface: &mut S,
        registry: &mut ElementRegistry<S::Node>,
        now: HostTime,
    ) {
        let done = now + self.config.duration;

        for c in &plan.morphs {
            if c.to != c.from {
                settle(c.to, surface, registry);
            }
            let Some((token, node)) = begin(c.from, registry) else {
                continue;
            };
            surface.set_transition(&node, Some(&self.config.transition(Animated::Transform)));
            // A fade-in this morph supersedes never gets its reveal.
            surface.set_opacity(&node, None);
            surface.set_transform(&node, Some(&c.flip()));
            self.timeline.schedule(done, ElementTask { kind: TaskKind::Cleanup, token });
        }

        for &handle in &plan.fade_in {
            let Some((token, node)) = begin(handle, registry) else {
                continue;
            };
            surface.set_hidden(&node, false);
            surface.set_transition(&node, None);
            surface.set_opacity(&node, Some(0.0));
            surface.flush_layout(&node);
            self.timeline.schedule(
                now + self.config.reveal_delay,
                ElementTask { kind: TaskKind::Reveal, token },
            );
        }

        for &handle in &plan.fade_out {
            let Some((token, node)) = begin(handle, registry) else {
                continue;
            };
            surface.set_transition(&node, Some(&self.config.transition(Animated::Opacity)));
            surface.set_opacity(&node, Some(0.0));
            self.timeline.schedule(done, ElementTask { kind: TaskKind::Hide, token });
        }
    }

    /// Runs every task due at or before `now`.
    pub fn run_due<S: Surface>(
        &mut self,
        surface: &mut S,
        registry: &mut ElementRegistry<S::Node>,
        now: HostTime,
    ) -> Vec<TaskReport> {
        let due = self.timeline.drain_due(now);
        let mut reports = Vec::with_capacity(due.len());
        for task in due {
            let outcome = self.run(task, surface, registry, now);
            reports.push(TaskReport { task, outcome });
        }
        reports
    }

    /// Drops every queued task without running it.
    pub fn cancel_all(&mut self) {
        self.timeline.clear();
    }

    fn run<S: Surface>(
        &mut self,
        task: ElementTask,
        surface: &mut S,
        registry: &mut ElementRegistry<S::Node>,
        now: HostTime,
    ) -> TaskOutcome {
        if !registry.is_current(task.token) {
            return TaskOutcome::Stale;
        }
        let Some(node) = registry.resolve(task.token.handle).cloned() else {
            return TaskOutcome::Stale;
        };
        match task.kind {
            TaskKind::Cleanup => {
                clear_inline(surface, &node);
                registry.finish(task.token);
            }
            TaskKind::Reveal => {
                surface.set_transition(&node, Some(&self.config.transition(Animated::Opacity)));
                surface.set_opacity(&node, Some(1.0));
                self.timeline.schedule(
                    now + self.config.duration,
                    ElementTask {
                        kind: TaskKind::Cleanup,
                        token: task.token,
                    },
                );
            }
            TaskKind::Hide => {
                surface.set_hidden(&node, true);
                surface.set_transition(&node, None);
                registry.finish(task.token);
            }
        }
        TaskOutcome::Ran
    }
}

fn begin<N: Clone>(handle: ElementHandle, registry: &mut ElementRegistry<N>) -> Option<(TransitionToken, N)> {
    let token = registry.begin_transition(handle)?;
    let node = registry.resolve(handle)?.clone();
    Some((token, node))
}

fn settle<S: Surface>(handle: ElementHandle, surface: &mut S, registry: &mut ElementRegistry<S::Node>) {
    if let Some((token, node)) = begin(handle, registry) {
        clear_inline(surface, &node);
        registry.finish(token);
    }
}

fn clear_inline<S: Surface>(surface: &mut S, node: &S::Node) {
    surface.set_transition(node, None);
    surface.set_transform(node, None);
    surface.set_opacity(node, None);
}
