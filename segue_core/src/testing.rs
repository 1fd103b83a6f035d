// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`Surface`] double and descriptor helpers for unit tests.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::backend::{Surface, Transition};
use crate::descriptor::{ElementDescriptor, NodeFacts};
use crate::plan::FlipTransform;
use crate::registry::ElementHandle;
use crate::reveal::RevealState;

/// A style write observed by [`FakeSurface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Write {
    /// `true` when a declaration was set, `false` when cleared.
    Transition(bool),
    Transform(Option<FlipTransform>),
    Opacity(Option<f64>),
    Hidden(bool),
    Flush,
}

#[derive(Clone, Debug)]
pub(crate) struct FakeNode {
    pub(crate) slide: usize,
    pub(crate) step: u32,
    pub(crate) facts: NodeFacts,
    pub(crate) rect: Rect,
    pub(crate) attached: bool,
    pub(crate) transition: Option<Transition>,
    pub(crate) transform: Option<FlipTransform>,
    pub(crate) opacity: Option<f64>,
    pub(crate) hidden: bool,
    pub(crate) writes: Vec<Write>,
}

/// Nodes are addressed by their index in the surface.
#[derive(Debug, Default)]
pub(crate) struct FakeSurface {
    nodes: Vec<FakeNode>,
    state: RevealState,
    container_missing: bool,
    pub(crate) shown: Vec<RevealState>,
}

impl FakeSurface {
    pub(crate) fn add(&mut self, slide: usize, facts: NodeFacts, rect: Rect) -> usize {
        self.add_at_step(slide, 0, facts, rect)
    }

    pub(crate) fn add_at_step(&mut self, slide: usize, step: u32, facts: NodeFacts, rect: Rect) -> usize {
        self.nodes.push(FakeNode {
            slide,
            step,
            facts,
            rect,
            attached: true,
            transition: None,
            transform: None,
            opacity: None,
            hidden: false,
            writes: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub(crate) fn node(&self, n: usize) -> &FakeNode {
        &self.nodes[n]
    }

    pub(crate) fn writes_for(&self, n: usize) -> &[Write] {
        &self.nodes[n].writes
    }

    pub(crate) fn is_attached(&self, n: usize) -> bool {
        self.nodes[n].attached
    }

    pub(crate) fn detach(&mut self, n: usize) {
        self.nodes[n].attached = false;
    }

    pub(crate) fn move_to(&mut self, n: usize, rect: Rect) {
        self.nodes[n].rect = rect;
    }

    pub(crate) fn set_container_missing(&mut self, missing: bool) {
        self.container_missing = missing;
    }

    fn record(&mut self, n: usize, write: Write) {
        self.nodes[n].writes.push(write);
    }
}

impl Surface for FakeSurface {
    type Node = usize;

    fn show(&mut self, state: RevealState) {
        self.state = state;
        self.shown.push(state);
        for node in self.nodes.iter_mut().filter(|n| n.slide == state.slide) {
            node.hidden = node.step > state.step;
        }
    }

    fn matchable_nodes(&self) -> Vec<usize> {
        if self.container_missing {
            return Vec::new();
        }
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.slide == self.state.slide && n.step <= self.state.step)
            .map(|(i, _)| i)
            .collect()
    }

    fn facts(&self, node: &usize) -> NodeFacts {
        self.nodes[*node].facts.clone()
    }

    fn bounds(&self, node: &usize) -> Option<Rect> {
        let n = &self.nodes[*node];
        (n.attached && !n.hidden).then_some(n.rect)
    }

    fn set_transition(&mut self, node: &usize, transition: Option<&Transition>) {
        self.nodes[*node].transition = transition.copied();
        self.record(*node, Write::Transition(transition.is_some()));
    }

    fn set_transform(&mut self, node: &usize, transform: Option<&FlipTransform>) {
        self.nodes[*node].transform = transform.copied();
        self.record(*node, Write::Transform(transform.copied()));
    }

    fn set_opacity(&mut self, node: &usize, opacity: Option<f64>) {
        self.nodes[*node].opacity = opacity;
        self.record(*node, Write::Opacity(opacity));
    }

    fn set_hidden(&mut self, node: &usize, hidden: bool) {
        self.nodes[*node].hidden = hidden;
        self.record(*node, Write::Hidden(hidden));
    }

    fn flush_layout(&mut self, node: &usize) {
        self.record(*node, Write::Flush);
    }
}

pub(crate) fn handle(idx: u32) -> ElementHandle {
    ElementHandle { idx, generation: 0 }
}

pub(crate) fn descriptor(idx: u32, facts: NodeFacts, rect: Rect) -> ElementDescriptor {
    ElementDescriptor::from_facts(handle(idx), facts, rect)
}
