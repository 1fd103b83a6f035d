// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-capture element correspondence.
//!
//! A [`MatchStrategy`] pairs descriptors of the previous snapshot with
//! descriptors of the current one. The shipped strategy, [`GreedyMatcher`],
//! is a best-effort heuristic: it walks the previous snapshot in capture
//! order and gives each descriptor its best still-unclaimed partner. Earlier
//! descriptors win contested partners, so the result depends on capture order
//! and is not globally optimal.
//!
//! # Similarity
//!
//! [`similarity`] scores a pair in `[0, 1]`. Equal explicit identities score
//! 1.0 outright. Otherwise the weighted signals below are summed and divided
//! by a fixed [`NORMALIZATION`] of 4:
//!
//! | signal | weight |
//! |---|---|
//! | equal tag | 0.8 |
//! | class overlap (intersection / larger set) | up to 0.5 |
//! | common text prefix (trimmed, case-insensitive, / shorter text) | up to 0.7 |
//! | either side carries the opt-in marker | 0.6 |

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::descriptor::ElementDescriptor;

/// Weight of an exact tag match.
pub const TAG_WEIGHT: f64 = 0.8;
/// Maximum weight of class-token overlap.
pub const CLASS_WEIGHT: f64 = 0.5;
/// Maximum weight of the common text prefix.
pub const TEXT_WEIGHT: f64 = 0.7;
/// Weight of the opt-in marker.
pub const MARKER_WEIGHT: f64 = 0.6;
/// Fixed divisor applied to the raw score.
pub const NORMALIZATION: f64 = 4.0;
/// Default acceptance threshold; a pair must score strictly above it.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// A matched pair, as indices into the previous and current slices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pairing {
    /// Index into the previous descriptors.
    pub previous: usize,
    /// Index into the current descriptors.
    pub current: usize,
    /// Similarity of the pair.
    pub similarity: f64,
}

/// Result of a matching pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Assignment {
    /// Accepted pairs, in the order they were accepted.
    pub matched: Vec<Pairing>,
    /// Current descriptors without a partner, ascending.
    pub new: Vec<usize>,
    /// Previous descriptors without a partner, ascending.
    pub removed: Vec<usize>,
}

/// Pairs previous descriptors with current ones.
///
/// Implementations must report every index exactly once: each previous index
/// either in a pairing or in `removed`, each current index either in a
/// pairing or in `new`.
pub trait MatchStrategy {
    /// Computes an assignment.
    fn assign(&self, previous: &[ElementDescriptor], current: &[ElementDescriptor]) -> Assignment;
}

impl fmt::Debug for dyn MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn MatchStrategy")
    }
}

/// Greedy, order-dependent matcher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GreedyMatcher {
    /// A candidate is accepted only if its similarity exceeds this.
    pub threshold: f64,
}

impl GreedyMatcher {
    /// Creates a matcher with a custom threshold.
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for GreedyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl MatchStrategy for GreedyMatcher {
    fn assign(&self, previous: &[ElementDescriptor], current: &[ElementDescriptor]) -> Assignment {
        let mut consumed = vec![false; current.len()];
        let mut out = Assignment::default();

        for (pi, prev) in previous.iter().enumerate() {
            let mut best: Option<(usize, f64)> = None;
            for (ci, cur) in current.iter().enumerate() {
                if consumed[ci] {
                    continue;
                }
                let score = similarity(prev, cur);
                // Strict comparison: the earliest candidate wins ties.
                if best.is_none_or(|(_, s)| score > s) {
                    best = Some((ci, score));
                }
            }
            match best {
                Some((ci, score)) if score > self.threshold => {
                    consumed[ci] = true;
                    out.matched.push(Pairing {
                        previous: pi,
                        current: ci,
                        similarity: score,
                    });
                }
                _ => out.removed.push(pi),
            }
        }

        out.new = consumed
            .iter()
            .enumerate()
            .filter_map(|(ci, &taken)| (!taken).then_some(ci))
            .collect();
        out
    }
}

/// Scores how likely two descriptors are the same visual element.
#[must_use]
pub fn similarity(a: &ElementDescriptor, b: &ElementDescriptor) -> f64 {
    if let (Some(x), Some(y)) = (&a.identity, &b.identity)
        && x == y
    {
        return 1.0;
    }

    let mut raw = 0.0;
    if a.tag == b.tag {
        raw += TAG_WEIGHT;
    }
    raw += CLASS_WEIGHT * class_overlap(a, b);
    raw += TEXT_WEIGHT * prefix_ratio(&a.text, &b.text);
    if a.has_marker() || b.has_marker() {
        raw += MARKER_WEIGHT;
    }
    (raw / NORMALIZATION).clamp(0.0, 1.0)
}

/// `|A ∩ B| / max(|A|, |B|)`, or 0 when both sets are empty.
fn class_overlap(a: &ElementDescriptor, b: &ElementDescriptor) -> f64 {
    let larger = a.classes.len().max(b.classes.len());
    if larger == 0 {
        return 0.0;
    }
    let shared = a.classes.intersection(&b.classes).count();
    shared as f64 / larger as f64
}

/// Common prefix length over the shorter text, comparing trimmed lowercase
/// characters. 0 when either text is empty after trimming.
fn prefix_ratio(a: &str, b: &str) -> f64 {
    let a = normalize_text(a);
    let b = normalize_text(b);
    let shorter = a.chars().count().min(b.chars().count());
    if shorter == 0 {
        return 0.0;
    }
    let common = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count();
    common as f64 / shorter as f64
}

fn normalize_text(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::NodeFacts;
    use crate::testing::descriptor;
    use kurbo::Rect;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn equal_identity_short_circuits() {
        let a = descriptor(0, NodeFacts::new("H1", "Intro").with_identity("x"), Rect::ZERO);
        let b = descriptor(
            1,
            NodeFacts::new("DIV", "Different").with_identity("x"),
            Rect::new(500.0, 500.0, 900.0, 900.0),
        );
        assert_eq!(similarity(&a, &b), 1.0);
    }

    #[test]
    fn identity_is_case_sensitive() {
        let a = descriptor(0, NodeFacts::new("H1", "").with_identity("x"), Rect::ZERO);
        let b = descriptor(1, NodeFacts::new("H1", "").with_identity("X"), Rect::ZERO);
        assert!(approx(similarity(&a, &b), TAG_WEIGHT / NORMALIZATION));
    }

    #[test]
    fn marked_text_siblings_clear_the_threshold() {
        let a = descriptor(
            0,
            NodeFacts::new("P", "Hello World").with_classes(["a"]).with_marker(),
            Rect::ZERO,
        );
        let b = descriptor(
            1,
            NodeFacts::new("P", "Hello Planet").with_classes(["a"]).with_marker(),
            Rect::ZERO,
        );
        // "hello " is 6 of the 11 characters of the shorter text.
        let expected = (0.8 + 0.5 + 0.7 * 6.0 / 11.0 + 0.6) / 4.0;
        let s = similarity(&a, &b);
        assert!(approx(s, expected), "got {s}, expected {expected}");
        assert!(s > DEFAULT_THRESHOLD);
    }

    #[test]
    fn unmarked_signals_alone_stay_below_threshold() {
        let a = descriptor(0, NodeFacts::new("P", "Hello World").with_classes(["a"]), Rect::ZERO);
        let b = descriptor(1, NodeFacts::new("P", "Hello Planet").with_classes(["a"]), Rect::ZERO);
        assert!(similarity(&a, &b) < DEFAULT_THRESHOLD);
    }

    #[test]
    fn empty_inputs_contribute_zero() {
        let a = descriptor(0, NodeFacts::new("", "   "), Rect::ZERO);
        let b = descriptor(1, NodeFacts::new("X", ""), Rect::ZERO);
        let s = similarity(&a, &b);
        assert!(!s.is_nan());
        assert_eq!(s, 0.0);
    }

    #[test]
    fn text_prefix_ignores_case_and_padding() {
        assert!(approx(prefix_ratio("  HELLO", "hello there"), 1.0));
        assert!(approx(prefix_ratio("abc", "xbc"), 0.0));
    }

    #[test]
    fn empty_previous_reports_everything_new() {
        let current = [
            descriptor(0, NodeFacts::new("P", "a").with_marker(), Rect::ZERO),
            descriptor(1, NodeFacts::new("P", "b").with_marker(), Rect::ZERO),
        ];
        let out = GreedyMatcher::default().assign(&[], &current);
        assert!(out.matched.is_empty());
        assert_eq!(out.new, [0, 1]);
        assert!(out.removed.is_empty());
    }

    #[test]
    fn leftovers_are_new_and_removed() {
        let previous = [
            descriptor(0, NodeFacts::new("H1", "A").with_identity("title"), Rect::ZERO),
            descriptor(1, NodeFacts::new("IMG", "").with_identity("logo"), Rect::ZERO),
        ];
        let current = [
            descriptor(2, NodeFacts::new("P", "note").with_identity("note"), Rect::ZERO),
            descriptor(3, NodeFacts::new("H2", "B").with_identity("title"), Rect::ZERO),
        ];
        let out = GreedyMatcher::default().assign(&previous, &current);
        assert_eq!(out.matched.len(), 1);
        assert_eq!((out.matched[0].previous, out.matched[0].current), (0, 1));
        assert_eq!(out.new, [0]);
        assert_eq!(out.removed, [1]);
    }

    #[test]
    fn earlier_previous_claims_contested_partner() {
        // Both previous descriptors score the same against the single current
        // one; the first in capture order takes it.
        let marked = |tag: &str, text: &str| NodeFacts::new(tag, text).with_classes(["c"]).with_marker();
        let previous = [
            descriptor(0, marked("P", "Hello"), Rect::ZERO),
            descriptor(1, marked("P", "Hello World"), Rect::ZERO),
        ];
        let current = [descriptor(2, marked("P", "Hello World"), Rect::ZERO)];
        let out = GreedyMatcher::default().assign(&previous, &current);
        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.matched[0].previous, 0);
        assert_eq!(out.removed, [1]);
    }

    #[test]
    fn threshold_is_exclusive() {
        let a = descriptor(0, NodeFacts::new("H1", "").with_identity("x"), Rect::ZERO);
        let b = descriptor(1, NodeFacts::new("H1", "").with_identity("x"), Rect::ZERO);
        let out = GreedyMatcher::new(1.0).assign(&[a], &[b]);
        assert!(out.matched.is_empty(), "score 1.0 does not exceed threshold 1.0");
    }
}
