// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slide snapshot capture.

use alloc::vec::Vec;

use crate::backend::Surface;
use crate::descriptor::{ElementDescriptor, Snapshot};
use crate::registry::ElementRegistry;

/// Captures the matchable elements of the active slide.
///
/// Nodes come from [`Surface::matchable_nodes`] in document order. Each one is
/// measured synchronously, so the snapshot reflects layout as of this call.
/// Nodes whose facts do not qualify them (no identity, no marker) and nodes
/// that are detached or not rendered are skipped. A rendered node with an
/// empty box is kept with its zero-size rect. A surface without an active slide
/// produces an empty snapshot.
pub fn capture<S: Surface>(surface: &S, registry: &mut ElementRegistry<S::Node>) -> Snapshot {
    let nodes = surface.matchable_nodes();
    let mut descriptors = Vec::with_capacity(nodes.len());
    for node in nodes {
        let facts = surface.facts(&node);
        if !facts.is_matchable() {
            continue;
        }
        let Some(rect) = surface.bounds(&node) else {
            continue;
        };
        let handle = registry.track(node);
        descriptors.push(ElementDescriptor::from_facts(handle, facts, rect));
    }
    Snapshot::new(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::NodeFacts;
    use crate::testing::FakeSurface;
    use kurbo::Rect;

    #[test]
    fn captures_in_document_order() {
        let mut surface = FakeSurface::default();
        surface.add(0, NodeFacts::new("H1", "Title").with_identity("t"), Rect::new(0.0, 0.0, 100.0, 20.0));
        surface.add(0, NodeFacts::new("P", "Body").with_marker(), Rect::new(0.0, 40.0, 100.0, 80.0));
        let mut registry = ElementRegistry::new();

        let snap = capture(&surface, &mut registry);
        let tags: Vec<_> = snap.descriptors().iter().map(|d| d.tag.as_str()).collect();
        assert_eq!(tags, ["H1", "P"]);
        assert_eq!(snap.descriptors()[1].rect, Rect::new(0.0, 40.0, 100.0, 80.0));
    }

    #[test]
    fn skips_unqualified_and_detached_nodes() {
        let mut surface = FakeSurface::default();
        surface.add(0, NodeFacts::new("P", "plain"), Rect::new(0.0, 0.0, 1.0, 1.0));
        let detached = surface.add(0, NodeFacts::new("P", "gone").with_marker(), Rect::ZERO);
        surface.detach(detached);
        let mut registry = ElementRegistry::new();

        assert!(capture(&surface, &mut registry).is_empty());
        assert!(registry.is_empty(), "skipped nodes are not tracked");
    }

    #[test]
    fn empty_rendered_nodes_are_kept() {
        let mut surface = FakeSurface::default();
        let empty = surface.add(0, NodeFacts::new("SPAN", "").with_identity("slot"), Rect::new(30.0, 40.0, 30.0, 40.0));
        let hidden = surface.add(0, NodeFacts::new("P", "faded").with_marker(), Rect::new(0.0, 0.0, 10.0, 10.0));
        surface.set_hidden(&hidden, true);
        let mut registry = ElementRegistry::new();

        let snap = capture(&surface, &mut registry);
        assert_eq!(snap.len(), 1, "hidden node is not rendered");
        assert_eq!(snap.descriptors()[0].rect, Rect::new(30.0, 40.0, 30.0, 40.0));
        assert_eq!(registry.resolve(snap.descriptors()[0].handle), Some(&empty));
    }

    #[test]
    fn missing_container_yields_empty_snapshot() {
        let mut surface = FakeSurface::default();
        surface.add(0, NodeFacts::new("P", "x").with_marker(), Rect::ZERO);
        surface.set_container_missing(true);
        let mut registry = ElementRegistry::new();
        assert!(capture(&surface, &mut registry).is_empty());
    }

    #[test]
    fn geometry_is_read_at_call_time() {
        let mut surface = FakeSurface::default();
        let node = surface.add(0, NodeFacts::new("P", "x").with_marker(), Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut registry = ElementRegistry::new();
        let first = capture(&surface, &mut registry);

        surface.move_to(node, Rect::new(5.0, 5.0, 15.0, 15.0));
        let second = capture(&surface, &mut registry);

        assert_eq!(first.descriptors()[0].handle, second.descriptors()[0].handle);
        assert_eq!(second.descriptors()[0].rect, Rect::new(5.0, 5.0, 15.0, 15.0));
    }
}
