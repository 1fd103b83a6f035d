// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for host integrations.
//!
//! Segue splits host-specific work into *backend* crates. Each backend
//! provides:
//!
//! - **Surface**: Implements the [`Surface`] trait over the host's live tree
//!   (e.g. DOM elements): it activates a reveal state, lists matchable nodes,
//!   reads their facts and geometry, and applies inline style writes.
//!
//! - **Time**: a `now() -> HostTime` free function reading the host's
//!   monotonic clock.
//!
//! - **Timers**: a one-shot timer to drive
//!   [`Presentation::run_due`](crate::presentation::Presentation::run_due)
//!   and a recurring timer for autoplay arms. These are backend-specific and
//!   not abstracted by a trait because their lifecycle differs across hosts.
//!
//! # Crate boundaries
//!
//! `segue_core` owns the data model, navigation, matching, planning, and
//! execution logic. Backend crates depend on `segue_core` and provide host
//! glue.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::descriptor::NodeFacts;
use crate::plan::FlipTransform;
use crate::reveal::RevealState;
use crate::time::Duration;

/// Timing function of an inline transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Slow start and end.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Returns the CSS keyword for this easing.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }
}

/// Which style property a transition animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Animated {
    /// The transform.
    Transform,
    /// The opacity.
    Opacity,
}

impl Animated {
    /// Returns the CSS property name.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Transform => "transform",
            Self::Opacity => "opacity",
        }
    }
}

/// An inline transition declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Transition {
    /// Property being animated.
    pub property: Animated,
    /// Animation length.
    pub duration: Duration,
    /// Timing function.
    pub easing: Easing,
}

/// A host tree the engine can read and restyle.
///
/// All reads are synchronous: geometry is measured at call time and never
/// cached by the engine. Write failures are the backend's to swallow; the
/// engine never expects an error mid-transition.
pub trait Surface {
    /// Host node type. Equality must mean "same live node".
    type Node: Clone + PartialEq;

    /// Renders or activates the given reveal state.
    ///
    /// Every matchable node of the active slide whose reveal step is at or
    /// before `state.step` must be in layout afterwards, including nodes an
    /// earlier [`set_hidden`](Self::set_hidden) removed. Nodes whose step is
    /// ahead are taken out of layout.
    fn show(&mut self, state: RevealState);

    /// Returns the matchable nodes of the active slide in document order.
    ///
    /// A missing or not-yet-rendered slide container yields an empty list.
    fn matchable_nodes(&self) -> Vec<Self::Node>;

    /// Reads the non-geometric facts of a node.
    fn facts(&self, node: &Self::Node) -> NodeFacts;

    /// Measures a node now, or `None` if it is detached or not rendered.
    ///
    /// A rendered node with an empty box measures as a zero-size rect.
    fn bounds(&self, node: &Self::Node) -> Option<Rect>;

    /// Sets (or, with `None`, clears) the inline transition declaration.
    fn set_transition(&mut self, node: &Self::Node, transition: Option<&Transition>);

    /// Sets (or, with `None`, clears) the inline transform.
    fn set_transform(&mut self, node: &Self::Node, transform: Option<&FlipTransform>);

    /// Sets (or, with `None`, clears) the inline opacity.
    fn set_opacity(&mut self, node: &Self::Node, opacity: Option<f64>);

    /// Removes a node from layout (or restores it) without detaching it.
    fn set_hidden(&mut self, node: &Self::Node, hidden: bool);

    /// Forces the host to commit pending style writes for `node`, so the next
    /// write is observed as a distinct state.
    fn flush_layout(&mut self, node: &Self::Node);
}
