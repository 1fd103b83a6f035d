// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracked-element registry with generational handles.
//!
//! Matching and planning never hold live nodes. They work with
//! [`ElementHandle`]s, and only capture and the executor resolve a handle back
//! to the host node through [`ElementRegistry`].
//!
//! Each slot also carries a *transition generation*. Starting a transition on
//! an element bumps it and returns a [`TransitionToken`]; deferred tasks hold
//! that token and do nothing once the element has moved on to a newer
//! transition or been released.

use alloc::vec::Vec;
use core::fmt;

/// A handle to a tracked element.
///
/// Contains a slot index and a generation counter so stale handles are
/// detected after the slot is released and reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ElementHandle {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementHandle({}@gen{})", self.idx, self.generation)
    }
}

/// Proof that a transition was started on an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionToken {
    /// Element the transition runs on.
    pub handle: ElementHandle,
    /// Transition generation at the time the transition started.
    pub generation: u32,
}

/// Animation phase of a tracked element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    /// No transition in flight.
    #[default]
    Idle,
    /// A transition was started and its final task has not run yet.
    Animating,
}

/// Slot storage mapping [`ElementHandle`]s to host nodes.
#[derive(Clone)]
pub struct ElementRegistry<N> {
    nodes: Vec<Option<N>>,
    generation: Vec<u32>,
    transition: Vec<u32>,
    phase: Vec<AnimationPhase>,
    free_list: Vec<u32>,
}

impl<N> fmt::Debug for ElementRegistry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("slots", &self.nodes.len())
            .field("live", &self.len())
            .field("free", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<N> Default for ElementRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> ElementRegistry<N> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generation: Vec::new(),
            transition: Vec::new(),
            phase: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Returns the number of live handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Returns `true` if no handle is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers `node` under a fresh handle.
    pub fn insert(&mut self, node: N) -> ElementHandle {
        if let Some(idx) = self.free_list.pop() {
            let slot = idx as usize;
            self.nodes[slot] = Some(node);
            self.phase[slot] = AnimationPhase::Idle;
            ElementHandle {
                idx,
                generation: self.generation[slot],
            }
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "a slide never tracks anywhere near u32::MAX elements"
            )]
            let idx = self.nodes.len() as u32;
            self.nodes.push(Some(node));
            self.generation.push(0);
            self.transition.push(0);
            self.phase.push(AnimationPhase::Idle);
            ElementHandle { idx, generation: 0 }
        }
    }

    /// Returns `true` if `handle` refers to a live slot.
    #[must_use]
    pub fn is_alive(&self, handle: ElementHandle) -> bool {
        let slot = handle.idx as usize;
        slot < self.nodes.len()
            && self.generation[slot] == handle.generation
            && self.nodes[slot].is_some()
    }

    /// Resolves a handle to its node.
    #[must_use]
    pub fn resolve(&self, handle: ElementHandle) -> Option<&N> {
        if !self.is_alive(handle) {
            return None;
        }
        self.nodes[handle.idx as usize].as_ref()
    }

    /// Releases a handle. Pending tasks holding a token for it become no-ops.
    pub fn release(&mut self, handle: ElementHandle) {
        if !self.is_alive(handle) {
            return;
        }
        let slot = handle.idx as usize;
        self.nodes[slot] = None;
        // Bump generation so old handles immediately fail validation.
        self.generation[slot] += 1;
        self.phase[slot] = AnimationPhase::Idle;
        self.free_list.push(handle.idx);
    }

    /// Releases every idle handle for which `keep` returns `false`.
    ///
    /// Animating elements are always kept so their final task can still run.
    pub fn retain(&mut self, mut keep: impl FnMut(ElementHandle) -> bool) {
        for slot in 0..self.nodes.len() {
            if self.nodes[slot].is_none() || self.phase[slot] == AnimationPhase::Animating {
                continue;
            }
            #[expect(
                clippy::cast_possible_truncation,
                reason = "slot count is bounded by insert()"
            )]
            let handle = ElementHandle {
                idx: slot as u32,
                generation: self.generation[slot],
            };
            if !keep(handle) {
                self.release(handle);
            }
        }
    }

    /// Starts a new transition on `handle`, superseding any in flight.
    ///
    /// Returns `None` if the handle is stale.
    pub fn begin_transition(&mut self, handle: ElementHandle) -> Option<TransitionToken> {
        if !self.is_alive(handle) {
            return None;
        }
        let slot = handle.idx as usize;
        self.transition[slot] = self.transition[slot].wrapping_add(1);
        self.phase[slot] = AnimationPhase::Animating;
        Some(TransitionToken {
            handle,
            generation: self.transition[slot],
        })
    }

    /// Returns `true` if `token` belongs to the element's latest transition.
    #[must_use]
    pub fn is_current(&self, token: TransitionToken) -> bool {
        self.is_alive(token.handle) && self.transition[token.handle.idx as usize] == token.generation
    }

    /// Marks the transition identified by `token` as finished.
    ///
    /// Returns `false` (and changes nothing) if the token is stale.
    pub fn finish(&mut self, token: TransitionToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.phase[token.handle.idx as usize] = AnimationPhase::Idle;
        true
    }

    /// Returns the animation phase of a live handle.
    #[must_use]
    pub fn phase(&self, handle: ElementHandle) -> Option<AnimationPhase> {
        self.is_alive(handle).then(|| self.phase[handle.idx as usize])
    }
}

impl<N: PartialEq> ElementRegistry<N> {
    /// Returns the handle of `node`, registering it if it is not tracked yet.
    ///
    /// The lookup scans live slots; a node that stays in the tree keeps its
    /// handle (and with it its transition generation) across captures.
    pub fn track(&mut self, node: N) -> ElementHandle {
        if let Some(handle) = self.find(&node) {
            return handle;
        }
        self.insert(node)
    }

    /// Returns the handle of an already tracked node.
    #[must_use]
    pub fn find(&self, node: &N) -> Option<ElementHandle> {
        self.nodes.iter().enumerate().find_map(|(slot, n)| {
            if n.as_ref() == Some(node) {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "slot count is bounded by insert()"
                )]
                let idx = slot as u32;
                Some(ElementHandle {
                    idx,
                    generation: self.generation[slot],
                })
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_reuses_handle_for_same_node() {
        let mut reg = ElementRegistry::new();
        let a = reg.track("a");
        let b = reg.track("b");
        assert_ne!(a, b);
        assert_eq!(reg.track("a"), a);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.resolve(b), Some(&"b"));
    }

    #[test]
    fn released_handles_go_stale() {
        let mut reg = ElementRegistry::new();
        let a = reg.track("a");
        reg.release(a);
        assert!(!reg.is_alive(a));
        assert_eq!(reg.resolve(a), None);

        let c = reg.track("c");
        assert_eq!(c.index(), a.index(), "slot is recycled");
        assert_ne!(c.generation(), a.generation());
        assert_eq!(reg.resolve(a), None, "old handle stays stale after reuse");
    }

    #[test]
    fn newer_transition_supersedes_older_token() {
        let mut reg = ElementRegistry::new();
        let a = reg.track("a");
        let first = reg.begin_transition(a).unwrap();
        assert_eq!(reg.phase(a), Some(AnimationPhase::Animating));
        let second = reg.begin_transition(a).unwrap();

        assert!(!reg.is_current(first));
        assert!(!reg.finish(first), "stale finish is ignored");
        assert_eq!(reg.phase(a), Some(AnimationPhase::Animating));
        assert!(reg.finish(second));
        assert_eq!(reg.phase(a), Some(AnimationPhase::Idle));
    }

    #[test]
    fn release_invalidates_tokens() {
        let mut reg = ElementRegistry::new();
        let a = reg.track("a");
        let token = reg.begin_transition(a).unwrap();
        reg.release(a);
        assert!(!reg.is_current(token));
        assert_eq!(reg.begin_transition(a), None);
    }

    #[test]
    fn retain_keeps_animating_elements() {
        let mut reg = ElementRegistry::new();
        let a = reg.track("a");
        let b = reg.track("b");
        let c = reg.track("c");
        reg.begin_transition(b);

        reg.retain(|h| h == c);
        assert!(!reg.is_alive(a));
        assert!(reg.is_alive(b), "animating element survives the sweep");
        assert!(reg.is_alive(c));
    }
}
