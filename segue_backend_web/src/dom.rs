// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM surface.
//!
//! [`DomSurface`] implements [`Surface`] over server- or client-rendered
//! markup of this shape:
//!
//! ```html
//! <div id="deck">
//!   <section data-segue-slide="0">
//!     <h1 data-segue-id="title">Intro</h1>
//!     <p data-segue data-segue-step="1">First point</p>
//!   </section>
//!   <section data-segue-slide="1">…</section>
//! </div>
//! ```
//!
//! Slides that are not active and elements whose `data-segue-step` is ahead
//! of the current step get `display: none`. Every other style write is an
//! inline `CssStyleDeclaration` property that is removed again on cleanup, so
//! the stylesheet takes over once an animation is done.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use segue_core::backend::{Surface, Transition};
use segue_core::deck::{Deck, DeckError, Element, Slide};
use segue_core::descriptor::{IDENTITY_ATTRIBUTE, NodeFacts};
use segue_core::plan::FlipTransform;
use segue_core::reveal::RevealState;
use wasm_bindgen::JsCast as _;
use web_sys::{HtmlElement, NodeList};

/// Attribute holding a slide's index.
pub const SLIDE_ATTRIBUTE: &str = "data-segue-slide";

/// Attribute holding the reveal step at which an element appears.
pub const STEP_ATTRIBUTE: &str = "data-segue-step";

/// Selector for elements that may take part in matching.
pub const MATCHABLE_SELECTOR: &str = "[data-segue-id], [data-segue]";

/// A [`Surface`] over a root `HtmlElement` holding `data-segue-slide`
/// sections.
pub struct DomSurface {
    root: HtmlElement,
    state: RevealState,
}

impl core::fmt::Debug for DomSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomSurface")
            .field("root", &"HtmlElement")
            .field("state", &self.state)
            .finish()
    }
}

impl DomSurface {
    /// Creates a surface over `root`. Nothing is shown until
    /// [`show`](Surface::show) is called.
    #[must_use]
    pub fn new(root: HtmlElement) -> Self {
        Self {
            root,
            state: RevealState::START,
        }
    }

    /// Returns the root element.
    #[must_use]
    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    /// Builds a [`Deck`] from the markup under the root.
    ///
    /// Slides are ordered by their `data-segue-slide` index. Each matchable
    /// element becomes an [`Element`] whose id is its `data-segue-id` (or
    /// empty), whose kind is its tag name as [`facts`](Surface::facts)
    /// reports it, and whose reveal step is its `data-segue-step` (or 0).
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Empty`] if the root holds no slides.
    pub fn scan_deck(&self) -> Result<Deck<()>, DeckError> {
        let mut sections: Vec<(usize, HtmlElement)> = self
            .slides()
            .into_iter()
            .filter_map(|el| slide_index(&el).map(|i| (i, el)))
            .collect();
        sections.sort_by_key(|(i, _)| *i);

        let slides = sections
            .into_iter()
            .map(|(i, section)| {
                let elements = select_all(&section, MATCHABLE_SELECTOR)
                    .into_iter()
                    .map(|el| {
                        let id = el.get_attribute(IDENTITY_ATTRIBUTE).unwrap_or_default();
                        Element::new(id, el.tag_name(), (), reveal_step(&el))
                    })
                    .collect();
                let mut slide = Slide::new(format!("{i}"), elements);
                if let Some(title) = section.get_attribute("data-segue-title") {
                    slide = slide.with_title(title);
                }
                slide
            })
            .collect();
        Deck::new(slides)
    }

    fn slides(&self) -> Vec<HtmlElement> {
        select_all(&self.root, &format!("[{SLIDE_ATTRIBUTE}]"))
    }

    fn active_slide(&self) -> Option<HtmlElement> {
        self.slides()
            .into_iter()
            .find(|el| slide_index(el) == Some(self.state.slide))
    }
}

impl Surface for DomSurface {
    type Node = HtmlElement;

    fn show(&mut self, state: RevealState) {
        self.state = state;
        for section in self.slides() {
            set_displayed(&section, slide_index(&section) == Some(state.slide));
        }
        let Some(active) = self.active_slide() else {
            return;
        };
        // Matchable nodes without a step may still carry the `display: none`
        // of an earlier fade-out.
        let selector = format!("[{STEP_ATTRIBUTE}], {MATCHABLE_SELECTOR}");
        for el in select_all(&active, &selector) {
            set_displayed(&el, is_revealed(reveal_step(&el), state));
        }
    }

    fn matchable_nodes(&self) -> Vec<HtmlElement> {
        let Some(active) = self.active_slide() else {
            return Vec::new();
        };
        select_all(&active, MATCHABLE_SELECTOR)
            .into_iter()
            .filter(|el| is_revealed(reveal_step(el), self.state))
            .collect()
    }

    fn facts(&self, node: &HtmlElement) -> NodeFacts {
        let class_list = node.class_list();
        let classes = (0..class_list.length()).filter_map(|i| class_list.item(i));
        let mut facts = NodeFacts::new(node.tag_name(), node.text_content().unwrap_or_default())
            .with_classes(classes);
        facts.identity = node.get_attribute(IDENTITY_ATTRIBUTE);

        let attributes = node.attributes();
        for i in 0..attributes.length() {
            if let Some(attr) = attributes.item(i)
                && let Some(key) = dataset_key(&attr.name())
            {
                facts.dataset.insert(key, attr.value());
            }
        }
        facts
    }

    fn bounds(&self, node: &HtmlElement) -> Option<Rect> {
        // Nodes without a layout box (e.g. on a hidden slide) have no client
        // rects. An empty but rendered node still has one, of zero size.
        if !node.is_connected() || node.get_client_rects().length() == 0 {
            return None;
        }
        let r = node.get_bounding_client_rect();
        Some(Rect::from_origin_size((r.left(), r.top()), (r.width(), r.height())))
    }

    fn set_transition(&mut self, node: &HtmlElement, transition: Option<&Transition>) {
        let style = node.style();
        match transition {
            Some(t) => {
                let _ = style.set_property("transition", &transition_css(t));
            }
            None => {
                let _ = style.remove_property("transition");
            }
        }
    }

    fn set_transform(&mut self, node: &HtmlElement, transform: Option<&FlipTransform>) {
        let style = node.style();
        match transform {
            Some(xf) => {
                let _ = style.set_property("transform-origin", "0 0");
                let _ = style.set_property("transform", &transform_css(xf));
            }
            None => {
                let _ = style.remove_property("transform");
                let _ = style.remove_property("transform-origin");
            }
        }
    }

    fn set_opacity(&mut self, node: &HtmlElement, opacity: Option<f64>) {
        let style = node.style();
        match opacity {
            Some(o) => {
                let _ = style.set_property("opacity", &format!("{o}"));
            }
            None => {
                let _ = style.remove_property("opacity");
            }
        }
    }

    fn set_hidden(&mut self, node: &HtmlElement, hidden: bool) {
        set_displayed(node, !hidden);
    }

    fn flush_layout(&mut self, node: &HtmlElement) {
        // Reading layout forces pending style writes to be committed.
        let _ = node.offset_height();
    }
}

/// Formats a CSS `transition` shorthand, e.g. `transform 500ms ease-in-out`.
#[must_use]
pub fn transition_css(t: &Transition) -> String {
    format!(
        "{} {}ms {}",
        t.property.as_css(),
        t.duration.as_millis_ceil(),
        t.easing.as_css()
    )
}

/// Formats a FLIP transform as CSS, translating before scaling.
#[must_use]
pub fn transform_css(xf: &FlipTransform) -> String {
    format!(
        "translate({}px, {}px) scale({}, {})",
        xf.translate.x, xf.translate.y, xf.scale.x, xf.scale.y
    )
}

/// Maps a `data-*` attribute name to its dataset key (`data-foo-bar` →
/// `fooBar`). Other attribute names yield `None`.
#[must_use]
pub fn dataset_key(attribute: &str) -> Option<String> {
    let rest = attribute.strip_prefix("data-")?;
    let mut key = String::with_capacity(rest.len());
    let mut upper = false;
    for c in rest.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            key.extend(c.to_uppercase());
            upper = false;
        } else {
            key.push(c);
        }
    }
    Some(key)
}

fn select_all(scope: &web_sys::Element, selector: &str) -> Vec<HtmlElement> {
    scope
        .query_selector_all(selector)
        .map(|list| html_elements(&list))
        .unwrap_or_default()
}

fn html_elements(list: &NodeList) -> Vec<HtmlElement> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// Returns `true` if an element revealed at `step` is in layout at `state`.
///
/// Step-less elements reveal at step 0, so they are always shown on the
/// active slide.
#[must_use]
pub fn is_revealed(step: u32, state: RevealState) -> bool {
    step <= state.step
}

fn set_displayed(el: &HtmlElement, displayed: bool) {
    let style = el.style();
    if displayed {
        let _ = style.remove_property("display");
    } else {
        let _ = style.set_property("display", "none");
    }
}

fn slide_index(el: &HtmlElement) -> Option<usize> {
    el.get_attribute(SLIDE_ATTRIBUTE)?.trim().parse().ok()
}

fn reveal_step(el: &HtmlElement) -> u32 {
    el.get_attribute(STEP_ATTRIBUTE)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use segue_core::backend::{Animated, Easing};
    use segue_core::time::Duration;

    #[test]
    fn transition_shorthand() {
        let t = Transition {
            property: Animated::Transform,
            duration: Duration::from_millis(500),
            easing: Easing::EaseInOut,
        };
        assert_eq!(transition_css(&t), "transform 500ms ease-in-out");

        let t = Transition {
            property: Animated::Opacity,
            duration: Duration(1_500),
            easing: Easing::Linear,
        };
        assert_eq!(transition_css(&t), "opacity 2ms linear", "rounded up");
    }

    #[test]
    fn transform_translates_then_scales() {
        let xf = FlipTransform {
            translate: Vec2::new(12.5, -40.0),
            scale: Vec2::new(2.0, 0.5),
        };
        assert_eq!(transform_css(&xf), "translate(12.5px, -40px) scale(2, 0.5)");
        assert_eq!(
            transform_css(&FlipTransform::IDENTITY),
            "translate(0px, 0px) scale(1, 1)"
        );
    }

    #[test]
    fn elements_up_to_the_current_step_are_revealed() {
        let state = RevealState { slide: 0, step: 1 };
        assert!(is_revealed(0, state), "step-less elements always show");
        assert!(is_revealed(1, state));
        assert!(!is_revealed(2, state));
        assert!(is_revealed(0, RevealState::START));
        assert!(!is_revealed(1, RevealState::START));
    }

    #[test]
    fn dataset_keys_are_camel_cased() {
        assert_eq!(dataset_key("data-segue").as_deref(), Some("segue"));
        assert_eq!(dataset_key("data-segue-step").as_deref(), Some("segueStep"));
        assert_eq!(dataset_key("class"), None);
        assert_eq!(dataset_key("aria-label"), None);
    }
}
