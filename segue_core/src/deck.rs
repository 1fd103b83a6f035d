// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slide and element data model.
//!
//! A [`Deck`] is the ordered, non-empty list of [`Slide`]s produced by the
//! content collaborator. Each slide owns its [`Element`]s exclusively. The
//! element payload `C` is opaque here; only the reveal step matters for
//! navigation.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Identifier of a [`Slide`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlideId(pub String);

/// Identifier of an [`Element`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub String);

/// One renderable element of a slide.
#[derive(Clone, Debug, PartialEq)]
pub struct Element<C> {
    /// Stable identifier, also used by renderers as the identity attribute.
    pub id: ElementId,
    /// Type tag (`"text"`, `"code"`, `"image"`, ...).
    pub kind: String,
    /// Content payload, interpreted only by the renderer.
    pub content: C,
    /// Navigation step at which the element becomes visible.
    pub reveal_step: u32,
}

impl<C> Element<C> {
    /// Creates an element.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, content: C, reveal_step: u32) -> Self {
        Self {
            id: ElementId(id.into()),
            kind: kind.into(),
            content,
            reveal_step,
        }
    }

    /// Returns `true` if the element is visible once `step` has been reached.
    #[inline]
    #[must_use]
    pub const fn is_visible_at(&self, step: u32) -> bool {
        self.reveal_step <= step
    }
}

/// An ordered sequence of elements with optional headings.
#[derive(Clone, Debug, PartialEq)]
pub struct Slide<C> {
    /// Stable identifier.
    pub id: SlideId,
    /// Optional title.
    pub title: Option<String>,
    /// Optional subtitle.
    pub subtitle: Option<String>,
    /// Elements in render order.
    pub elements: Vec<Element<C>>,
}

impl<C> Slide<C> {
    /// Creates a slide with no headings.
    pub fn new(id: impl Into<String>, elements: Vec<Element<C>>) -> Self {
        Self {
            id: SlideId(id.into()),
            title: None,
            subtitle: None,
            elements,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the subtitle.
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Returns the number of navigation steps in this slide.
    ///
    /// This is the largest reveal step plus one, and at least 1 even for a
    /// slide without elements. Gaps between reveal steps still count.
    #[must_use]
    pub fn total_steps(&self) -> u32 {
        self.elements
            .iter()
            .map(|e| e.reveal_step)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    /// Iterates the elements visible once `step` has been reached.
    pub fn visible_elements(&self, step: u32) -> impl Iterator<Item = &Element<C>> {
        self.elements.iter().filter(move |e| e.is_visible_at(step))
    }
}

/// Errors from deck construction and replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeckError {
    /// The slide list was empty; no valid navigation state exists.
    Empty,
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("a deck needs at least one slide"),
        }
    }
}

impl core::error::Error for DeckError {}

/// A validated, non-empty list of slides.
#[derive(Clone, Debug, PartialEq)]
pub struct Deck<C> {
    slides: Vec<Slide<C>>,
}

impl<C> Deck<C> {
    /// Wraps a slide list.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Empty`] if `slides` is empty.
    pub fn new(slides: Vec<Slide<C>>) -> Result<Self, DeckError> {
        if slides.is_empty() {
            return Err(DeckError::Empty);
        }
        Ok(Self { slides })
    }

    /// Returns the slides.
    #[must_use]
    pub fn slides(&self) -> &[Slide<C>] {
        &self.slides
    }

    /// Returns the slide at `index`, if any.
    #[must_use]
    pub fn slide(&self, index: usize) -> Option<&Slide<C>> {
        self.slides.get(index)
    }

    /// Returns the number of slides (always at least 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always `false`; present for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the step total of every slide, in order.
    #[must_use]
    pub fn step_totals(&self) -> Vec<u32> {
        self.slides.iter().map(Slide::total_steps).collect()
    }

    /// Consumes the deck and returns the slides.
    #[must_use]
    pub fn into_slides(self) -> Vec<Slide<C>> {
        self.slides
    }
}

#[cfg(test)]
pub(crate) fn slide_with_steps(id: &str, steps: &[u32]) -> Slide<()> {
    use alloc::format;
    Slide::new(
        id,
        steps
            .iter()
            .enumerate()
            .map(|(i, &s)| Element::new(format!("{id}-{i}"), "text", (), s))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn empty_slide_has_one_step() {
        let slide: Slide<()> = Slide::new("s", Vec::new());
        assert_eq!(slide.total_steps(), 1);
    }

    #[test]
    fn gaps_in_reveal_steps_still_count() {
        let slide = slide_with_steps("s", &[0, 4, 2]);
        assert_eq!(slide.total_steps(), 5, "max reveal step 4 plus one");
    }

    #[test]
    fn every_slide_has_at_least_one_step() {
        let deck = Deck::new(vec![
            slide_with_steps("a", &[]),
            slide_with_steps("b", &[0]),
            slide_with_steps("c", &[3, 1]),
        ])
        .unwrap();
        assert_eq!(deck.step_totals(), vec![1, 1, 4]);
        assert!(deck.step_totals().iter().all(|&t| t >= 1));
    }

    #[test]
    fn empty_deck_is_rejected() {
        assert_eq!(Deck::<()>::new(Vec::new()), Err(DeckError::Empty));
    }

    #[test]
    fn visible_elements_filters_by_step() {
        let slide = slide_with_steps("s", &[0, 1, 2, 1]).with_title("Intro");
        let ids: Vec<_> = slide.visible_elements(1).map(|e| e.id.0.as_str()).collect();
        assert_eq!(ids, ["s-0", "s-1", "s-3"]);
        assert_eq!(slide.title.as_deref(), Some("Intro"));
    }
}
