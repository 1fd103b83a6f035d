// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal-step and slide navigation.
//!
//! [`RevealMachine`] tracks a [`RevealState`] (slide index and reveal step)
//! over a list of per-slide step totals and implements the four navigation
//! operations plus autoplay arming.
//!
//! # Autoplay
//!
//! The machine does not own a timer. [`start_autoplay`](RevealMachine::start_autoplay)
//! returns an [`AutoplayArm`] describing the recurring timer the host should
//! install; the host calls [`autoplay_fire`](RevealMachine::autoplay_fire)
//! with the arm's token on every tick. Each arm gets a fresh token, so a timer
//! that was replaced (interval change) or stopped (manual navigation) can still
//! fire once more without advancing the deck twice.
//!
//! Manual navigation ([`next`](RevealMachine::next), [`prev`](RevealMachine::prev),
//! [`jump`](RevealMachine::jump), [`reset`](RevealMachine::reset)) always
//! disarms autoplay.

use alloc::vec::Vec;

use crate::deck::DeckError;
use crate::time::Duration;

/// Current navigation position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevealState {
    /// Index of the active slide.
    pub slide: usize,
    /// Reveal step within the active slide.
    pub step: u32,
}

impl RevealState {
    /// The initial state: first slide, first step.
    pub const START: Self = Self { slide: 0, step: 0 };

    /// Creates a state.
    #[inline]
    #[must_use]
    pub const fn new(slide: usize, step: u32) -> Self {
        Self { slide, step }
    }
}

/// Autoplay settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoplayConfig {
    /// Time between automatic advances.
    pub interval: Duration,
    /// Disarm once the last step of the last slide has been shown for one
    /// interval. When `false`, playback loops back to the first slide.
    pub stop_at_end: bool,
}

impl AutoplayConfig {
    /// Default configuration for browser hosts: 3 s per step, stop at the end.
    #[must_use]
    pub const fn default_web() -> Self {
        Self {
            interval: Duration::from_millis(3_000),
            stop_at_end: true,
        }
    }
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self::default_web()
    }
}

/// Identifies one arming of the autoplay timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AutoplayToken(u64);

/// Instructions for the host: install a recurring timer with `interval` and
/// pass `token` back on each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutoplayArm {
    /// Token to hand back to [`RevealMachine::autoplay_fire`].
    pub token: AutoplayToken,
    /// Recurrence interval.
    pub interval: Duration,
}

/// Outcome of an autoplay tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoplayFire {
    /// The token no longer matches the armed timer; nothing happened and the
    /// host should drop that timer.
    Stale,
    /// The deck advanced (or looped) to the given state.
    Advanced(RevealState),
    /// Playback reached the end and autoplay disarmed itself.
    Finished(RevealState),
}

#[derive(Clone, Copy, Debug)]
struct Autoplay {
    config: AutoplayConfig,
    armed: Option<AutoplayToken>,
    next_token: u64,
}

impl Autoplay {
    fn arm(&mut self) -> AutoplayArm {
        let token = AutoplayToken(self.next_token);
        self.next_token += 1;
        self.armed = Some(token);
        AutoplayArm {
            token,
            interval: self.config.interval,
        }
    }
}

/// Navigation state machine over a list of per-slide step totals.
#[derive(Clone, Debug)]
pub struct RevealMachine {
    totals: Vec<u32>,
    state: RevealState,
    autoplay: Autoplay,
}

impl RevealMachine {
    /// Creates a machine at [`RevealState::START`].
    ///
    /// Totals of 0 are treated as 1.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Empty`] if `totals` is empty.
    pub fn new(totals: Vec<u32>, autoplay: AutoplayConfig) -> Result<Self, DeckError> {
        let totals = normalize(totals)?;
        Ok(Self {
            totals,
            state: RevealState::START,
            autoplay: Autoplay {
                config: autoplay,
                armed: None,
                next_token: 0,
            },
        })
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Returns the number of slides.
    #[inline]
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.totals.len()
    }

    /// Returns the number of steps of slide `index`, or 1 if out of range.
    #[must_use]
    pub fn total_steps(&self, index: usize) -> u32 {
        self.totals.get(index).copied().unwrap_or(1)
    }

    /// Returns `true` at the initial state.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.state == RevealState::START
    }

    /// Returns `true` at the terminal state (last step of the last slide).
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.state.slide + 1 == self.slide_count()
            && self.state.step + 1 >= self.total_steps(self.state.slide)
    }

    /// Returns `(position, total)` with every step of every slide flattened
    /// into one sequence.
    #[must_use]
    pub fn progress(&self) -> (u64, u64) {
        let before: u64 = self.totals[..self.state.slide]
            .iter()
            .map(|&t| u64::from(t))
            .sum();
        let total: u64 = self.totals.iter().map(|&t| u64::from(t)).sum();
        (before + u64::from(self.state.step), total)
    }

    /// Advances one step, crossing into the next slide when the current one
    /// is fully revealed. No-op at the terminal state. Disarms autoplay.
    pub fn next(&mut self) -> RevealState {
        self.stop_autoplay();
        self.advance()
    }

    /// Goes back one step, landing on the last step of the previous slide when
    /// at step 0. No-op at the initial state. Disarms autoplay.
    pub fn prev(&mut self) -> RevealState {
        self.stop_autoplay();
        let RevealState { slide, step } = self.state;
        if step > 0 {
            self.state.step = step - 1;
        } else if slide > 0 {
            self.state = RevealState::new(slide - 1, self.total_steps(slide - 1) - 1);
        }
        self.state
    }

    /// Moves to step 0 of `target`, clamped into range. Disarms autoplay.
    pub fn jump(&mut self, target: usize) -> RevealState {
        self.stop_autoplay();
        let last = self.slide_count() - 1;
        self.state = RevealState::new(target.min(last), 0);
        self.state
    }

    /// Returns to the initial state. Disarms autoplay.
    pub fn reset(&mut self) -> RevealState {
        self.stop_autoplay();
        self.state = RevealState::START;
        self.state
    }

    /// Replaces the step totals after the slide list changed.
    ///
    /// The slide index is clamped to the new count and the step returns to 0.
    /// Autoplay stays armed.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Empty`] and leaves the machine untouched if
    /// `totals` is empty.
    pub fn replace_slides(&mut self, totals: Vec<u32>) -> Result<RevealState, DeckError> {
        self.totals = normalize(totals)?;
        self.state = RevealState::new(self.state.slide.min(self.totals.len() - 1), 0);
        Ok(self.state)
    }

    /// Returns `true` if autoplay is armed.
    #[must_use]
    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.armed.is_some()
    }

    /// Returns the autoplay configuration.
    #[must_use]
    pub fn autoplay_config(&self) -> AutoplayConfig {
        self.autoplay.config
    }

    /// Arms autoplay, invalidating any previous arm.
    pub fn start_autoplay(&mut self) -> AutoplayArm {
        self.autoplay.arm()
    }

    /// Disarms autoplay.
    pub fn stop_autoplay(&mut self) {
        self.autoplay.armed = None;
    }

    /// Toggles autoplay, returning the new arm when it was switched on.
    pub fn toggle_autoplay(&mut self) -> Option<AutoplayArm> {
        if self.is_autoplaying() {
            self.stop_autoplay();
            None
        } else {
            Some(self.start_autoplay())
        }
    }

    /// Changes the autoplay interval.
    ///
    /// If autoplay is armed, it is re-armed with a fresh token and the new arm
    /// is returned; the host must replace its timer. The old timer's token is
    /// stale from this point on.
    pub fn set_autoplay_interval(&mut self, interval: Duration) -> Option<AutoplayArm> {
        self.autoplay.config.interval = interval;
        self.is_autoplaying().then(|| self.autoplay.arm())
    }

    /// Handles one autoplay tick.
    pub fn autoplay_fire(&mut self, token: AutoplayToken) -> AutoplayFire {
        if self.autoplay.armed != Some(token) {
            return AutoplayFire::Stale;
        }
        if self.is_last() {
            if self.autoplay.config.stop_at_end {
                self.stop_autoplay();
                return AutoplayFire::Finished(self.state);
            }
            self.state = RevealState::START;
            return AutoplayFire::Advanced(self.state);
        }
        AutoplayFire::Advanced(self.advance())
    }

    fn advance(&mut self) -> RevealState {
        let RevealState { slide, step } = self.state;
        if step + 1 < self.total_steps(slide) {
            self.state.step = step + 1;
        } else if slide + 1 < self.slide_count() {
            self.state = RevealState::new(slide + 1, 0);
        }
        self.state
    }
}

fn normalize(mut totals: Vec<u32>) -> Result<Vec<u32>, DeckError> {
    if totals.is_empty() {
        return Err(DeckError::Empty);
    }
    for t in &mut totals {
        *t = (*t).max(1);
    }
    Ok(totals)
}
