// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser glue around [`Presentation`].
//!
//! [`WebPresentation`] shares one [`Presentation`] between the host's event
//! handlers and two timers:
//!
//! - a [`Timeout`] kept armed for the presentation's next due element task;
//! - an [`Interval`] ticking while autoplay is armed.
//!
//! Timer callbacks hold a weak reference, so dropping the `WebPresentation`
//! tears everything down.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};

use segue_core::deck::{Deck, DeckError};
use segue_core::presentation::{Presentation, PresentationConfig};
use segue_core::reveal::{AutoplayArm, AutoplayFire, AutoplayToken, RevealState};
use segue_core::time::{Duration, HostTime};
use segue_core::trace::TraceSink;
use web_sys::HtmlElement;

use crate::dom::DomSurface;
use crate::now;
use crate::timer::{Interval, Timeout};

/// A [`Presentation`] over the DOM, driven by browser timers.
pub struct WebPresentation {
    inner: Rc<Inner>,
}

struct Inner {
    presentation: RefCell<Presentation<DomSurface, ()>>,
    tasks: Timeout,
    autoplay: Interval,
    /// Token of the arm the interval was started for.
    armed: Cell<Option<AutoplayToken>>,
}

impl WebPresentation {
    /// Binds the slides under `root` and shows the first step.
    ///
    /// The deck is read from the markup with [`DomSurface::scan_deck`].
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Empty`] if `root` holds no slides.
    pub fn new(root: HtmlElement, config: PresentationConfig) -> Result<Self, DeckError> {
        let surface = DomSurface::new(root);
        let deck = surface.scan_deck()?;
        let presentation = Presentation::new(deck, surface, config)?;

        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let on_tasks = weak.clone();
            let on_autoplay = weak.clone();
            Inner {
                presentation: RefCell::new(presentation),
                tasks: Timeout::new(move || {
                    if let Some(inner) = on_tasks.upgrade() {
                        inner.run_due();
                    }
                }),
                autoplay: Interval::new(move || {
                    if let Some(inner) = on_autoplay.upgrade() {
                        inner.autoplay_tick();
                    }
                }),
                armed: Cell::new(None),
            }
        });
        Ok(Self { inner })
    }

    /// Returns the current reveal state.
    #[must_use]
    pub fn state(&self) -> RevealState {
        self.inner.presentation.borrow().state()
    }

    /// Returns `(position, total)` across all steps of the deck.
    #[must_use]
    pub fn progress(&self) -> (u64, u64) {
        self.inner.presentation.borrow().reveal().progress()
    }

    /// Advances one step.
    pub fn next(&self) -> RevealState {
        self.inner.navigate(|p, now| p.next(now))
    }

    /// Goes back one step.
    pub fn prev(&self) -> RevealState {
        self.inner.navigate(|p, now| p.prev(now))
    }

    /// Jumps to the first step of `slide`.
    pub fn jump(&self, slide: usize) -> RevealState {
        self.inner.navigate(|p, now| p.jump(slide, now))
    }

    /// Returns to the start of the deck.
    pub fn reset(&self) -> RevealState {
        self.inner.navigate(|p, now| p.reset(now))
    }

    /// Toggles autoplay. Returns `true` if autoplay is now on.
    pub fn toggle_autoplay(&self) -> bool {
        let arm = self.inner.presentation.borrow_mut().toggle_autoplay();
        self.inner.apply_arm(arm);
        arm.is_some()
    }

    /// Returns `true` if autoplay is on.
    #[must_use]
    pub fn is_autoplaying(&self) -> bool {
        self.inner.presentation.borrow().is_autoplaying()
    }

    /// Changes the autoplay interval, restarting the ticker if it runs.
    pub fn set_autoplay_interval(&self, interval: Duration) {
        let arm = self
            .inner
            .presentation
            .borrow_mut()
            .set_autoplay_interval(interval);
        if arm.is_some() {
            self.inner.apply_arm(arm);
        }
    }

    /// Re-reads the deck from the markup after the host re-rendered it.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Empty`] if the root no longer holds slides; the
    /// presentation is left unchanged.
    pub fn refresh_slides(&self) -> Result<RevealState, DeckError> {
        let mut p = self.inner.presentation.borrow_mut();
        let deck: Deck<()> = p.surface().scan_deck()?;
        p.replace_slides(deck, now())
    }

    /// Installs (or removes) a trace sink.
    pub fn set_trace_sink(&self, sink: Option<Box<dyn TraceSink>>) {
        self.inner.presentation.borrow_mut().set_trace_sink(sink);
    }
}

impl core::fmt::Debug for WebPresentation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebPresentation")
            .field("state", &self.state())
            .field("tasks", &self.inner.tasks)
            .field("autoplay", &self.inner.autoplay)
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn navigate(
        &self,
        step: impl FnOnce(&mut Presentation<DomSurface, ()>, HostTime) -> RevealState,
    ) -> RevealState {
        let now = now();
        let (state, next_due, autoplaying) = {
            let mut p = self.presentation.borrow_mut();
            let state = step(&mut p, now);
            (state, p.next_due(), p.is_autoplaying())
        };
        if !autoplaying {
            self.apply_arm(None);
        }
        self.rearm_tasks(next_due, now);
        state
    }

    fn run_due(&self) {
        let now = now();
        let next_due = {
            let mut p = self.presentation.borrow_mut();
            p.run_due(now);
            p.next_due()
        };
        self.rearm_tasks(next_due, now);
    }

    fn autoplay_tick(&self) {
        let Some(token) = self.armed.get() else {
            self.autoplay.clear();
            return;
        };
        let now = now();
        let (outcome, next_due) = {
            let mut p = self.presentation.borrow_mut();
            (p.autoplay_fire(token, now), p.next_due())
        };
        match outcome {
            AutoplayFire::Advanced(_) => self.rearm_tasks(next_due, now),
            AutoplayFire::Finished(_) | AutoplayFire::Stale => self.apply_arm(None),
        }
    }

    fn apply_arm(&self, arm: Option<AutoplayArm>) {
        match arm {
            Some(arm) => {
                self.armed.set(Some(arm.token));
                self.autoplay.set(arm.interval);
            }
            None => {
                self.armed.set(None);
                self.autoplay.clear();
            }
        }
    }

    fn rearm_tasks(&self, next_due: Option<HostTime>, now: HostTime) {
        match next_due {
            Some(at) => self.tasks.set(at.saturating_duration_since(now)),
            None => self.tasks.clear(),
        }
    }
}
