// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition planning: motion classification for matched pairs.
//!
//! [`plan`] turns an [`Assignment`] into a [`TransitionPlan`]. Geometry is
//! re-measured through the caller's `measure` function at plan time because
//! layout may have settled differently since capture; the captured rect is
//! only a fallback for nodes that can no longer be measured.
//!
//! Matched pairs are classified by the first rule that applies:
//!
//! 1. area change ratio above [`PlannerConfig::scale_ratio`] → [`Motion::Scale`]
//! 2. displacement above [`PlannerConfig::move_distance`] → [`Motion::Move`]
//! 3. otherwise → [`Motion::Transform`]
//!
//! Unmatched current descriptors fade in; unmatched previous ones fade out.

use alloc::vec::Vec;

use kurbo::{Affine, Rect, Vec2};

use crate::descriptor::ElementDescriptor;
use crate::matcher::Assignment;
use crate::registry::ElementHandle;

/// How an element animates across a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Motion {
    /// Size changed noticeably.
    Scale,
    /// Position changed noticeably.
    Move,
    /// Small or ambiguous change.
    Transform,
    /// Element appears.
    FadeIn,
    /// Element disappears.
    FadeOut,
}

/// Classification thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannerConfig {
    /// Area change ratio above which a pair scales.
    pub scale_ratio: f64,
    /// Displacement in pixels above which a pair moves.
    pub move_distance: f64,
}

impl PlannerConfig {
    /// Default thresholds: 20 % area change, 50 px displacement.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scale_ratio: 0.2,
            move_distance: 50.0,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Translate-then-scale transform applied to the source element, with the
/// origin at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlipTransform {
    /// Translation in pixels.
    pub translate: Vec2,
    /// Horizontal and vertical scale factors.
    pub scale: Vec2,
}

impl FlipTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Returns the equivalent affine transform.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translate) * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }
}

/// A matched pair with its motion classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correspondence {
    /// Element in the previous snapshot.
    pub from: ElementHandle,
    /// Element in the current snapshot.
    pub to: ElementHandle,
    /// Similarity reported by the matcher.
    pub similarity: f64,
    /// Motion classification.
    pub motion: Motion,
    /// Source geometry measured at plan time.
    pub from_rect: Rect,
    /// Destination geometry measured at plan time.
    pub to_rect: Rect,
}

impl Correspondence {
    /// Returns the displacement of the top-left corner.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.to_rect.origin() - self.from_rect.origin()
    }

    /// Returns the transform that carries the source onto the destination.
    ///
    /// [`Motion::Move`] only translates; other motions also scale.
    #[must_use]
    pub fn flip(&self) -> FlipTransform {
        let scale = match self.motion {
            Motion::Move | Motion::FadeIn | Motion::FadeOut => Vec2::new(1.0, 1.0),
            Motion::Scale | Motion::Transform => Vec2::new(
                ratio_or_one(self.to_rect.width(), self.from_rect.width()),
                ratio_or_one(self.to_rect.height(), self.from_rect.height()),
            ),
        };
        FlipTransform {
            translate: self.delta(),
            scale,
        }
    }
}

/// Everything one transition will animate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionPlan {
    /// Matched pairs, in matcher order.
    pub morphs: Vec<Correspondence>,
    /// Elements that appear.
    pub fade_in: Vec<ElementHandle>,
    /// Elements that disappear.
    pub fade_out: Vec<ElementHandle>,
}

impl TransitionPlan {
    /// Returns `true` if nothing will animate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.morphs.is_empty() && self.fade_in.is_empty() && self.fade_out.is_empty()
    }
}

/// Classifies the motion between two rectangles.
#[must_use]
pub fn classify(from: Rect, to: Rect, config: &PlannerConfig) -> Motion {
    let from = from.abs();
    let to = to.abs();
    let area_from = from.area();
    let area_ratio = if area_from == 0.0 {
        0.0
    } else {
        (to.area() - area_from).abs() / area_from
    };
    if area_ratio > config.scale_ratio {
        return Motion::Scale;
    }
    if (to.origin() - from.origin()).hypot() > config.move_distance {
        return Motion::Move;
    }
    Motion::Transform
}

/// Builds a transition plan from a matching result.
///
/// `measure` reads live geometry for a handle; `None` falls back to the
/// rect captured in the descriptor. Indices in `assignment` that fall outside
/// the descriptor slices are ignored.
pub fn plan(
    assignment: &Assignment,
    previous: &[ElementDescriptor],
    current: &[ElementDescriptor],
    config: &PlannerConfig,
    mut measure: impl FnMut(ElementHandle) -> Option<Rect>,
) -> TransitionPlan {
    let mut out = TransitionPlan::default();
    for pairing in &assignment.matched {
        let (Some(from), Some(to)) = (previous.get(pairing.previous), current.get(pairing.current))
        else {
            continue;
        };
        let from_rect = measure(from.handle).unwrap_or(from.rect);
        let to_rect = measure(to.handle).unwrap_or(to.rect);
        out.morphs.push(Correspondence {
            from: from.handle,
            to: to.handle,
            similarity: pairing.similarity,
            motion: classify(from_rect, to_rect, config),
            from_rect,
            to_rect,
        });
    }
    out.fade_in = assignment
        .new
        .iter()
        .filter_map(|&i| current.get(i).map(|d| d.handle))
        .collect();
    out.fade_out = assignment
        .removed
        .iter()
        .filter_map(|&i| previous.get(i).map(|d| d.handle))
        .collect();
    out
}

fn ratio_or_one(num: f64, den: f64) -> f64 {
    if den == 0.0 { 1.0 } else { num / den }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::NodeFacts;
    use crate::matcher::Pairing;
    use crate::testing::descriptor;
    use alloc::vec;

    const CONFIG: PlannerConfig = PlannerConfig::new();

    #[test]
    fn scale_wins_over_move() {
        // Area grows by 30 % and the origin moves 100 px.
        let from = Rect::new(0.0, 0.0, 100.0, 100.0);
        let to = Rect::from_origin_size((100.0, 0.0), (130.0, 100.0));
        assert_eq!(classify(from, to, &CONFIG), Motion::Scale);
    }

    #[test]
    fn large_displacement_moves() {
        let from = Rect::new(0.0, 0.0, 10.0, 10.0);
        let to = Rect::new(40.0, 40.0, 50.0, 50.0);
        // hypot(40, 40) ≈ 56.6
        assert_eq!(classify(from, to, &CONFIG), Motion::Move);
    }

    #[test]
    fn small_change_transforms() {
        let from = Rect::new(0.0, 0.0, 10.0, 10.0);
        let to = Rect::new(30.0, 40.0, 40.0, 50.0);
        // Exactly 50 px is not above the threshold.
        assert_eq!(classify(from, to, &CONFIG), Motion::Transform);
    }

    #[test]
    fn zero_area_source_does_not_scale() {
        let from = Rect::new(0.0, 0.0, 0.0, 10.0);
        let to = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(classify(from, to, &CONFIG), Motion::Transform);
    }

    #[test]
    fn flip_translates_and_scales() {
        let c = Correspondence {
            from: crate::testing::handle(0),
            to: crate::testing::handle(1),
            similarity: 1.0,
            motion: Motion::Scale,
            from_rect: Rect::new(10.0, 10.0, 60.0, 30.0),
            to_rect: Rect::new(20.0, 50.0, 120.0, 90.0),
        };
        let flip = c.flip();
        assert_eq!(flip.translate, Vec2::new(10.0, 40.0));
        assert_eq!(flip.scale, Vec2::new(2.0, 2.0));

        let moved = Correspondence { motion: Motion::Move, ..c };
        assert_eq!(moved.flip().scale, Vec2::new(1.0, 1.0));
        assert_eq!(FlipTransform::IDENTITY.to_affine(), Affine::IDENTITY);
    }

    #[test]
    fn plan_remeasures_and_classifies_leftovers() {
        let previous = vec![
            descriptor(0, NodeFacts::new("H1", "").with_identity("t"), Rect::new(0.0, 0.0, 10.0, 10.0)),
            descriptor(1, NodeFacts::new("P", "").with_marker(), Rect::ZERO),
        ];
        let current = vec![
            descriptor(2, NodeFacts::new("H1", "").with_identity("t"), Rect::new(0.0, 0.0, 10.0, 10.0)),
            descriptor(3, NodeFacts::new("IMG", "").with_marker(), Rect::ZERO),
        ];
        let assignment = Assignment {
            matched: vec![Pairing {
                previous: 0,
                current: 0,
                similarity: 1.0,
            }],
            new: vec![1],
            removed: vec![1],
        };
        // Live layout has the destination 200 px further right.
        let out = plan(&assignment, &previous, &current, &CONFIG, |h| {
            (h == current[0].handle).then(|| Rect::new(200.0, 0.0, 210.0, 10.0))
        });

        assert_eq!(out.morphs.len(), 1);
        assert_eq!(out.morphs[0].motion, Motion::Move);
        assert_eq!(out.morphs[0].from_rect, previous[0].rect, "fallback to captured rect");
        assert_eq!(out.fade_in, [current[1].handle]);
        assert_eq!(out.fade_out, [previous[1].handle]);
    }
}
