// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element descriptors and slide snapshots.
//!
//! An [`ElementDescriptor`] is a point-in-time reading of one matchable
//! element. A [`Snapshot`] is the ordered descriptor list of one capture.
//! Both are replaced wholesale on every capture.
//!
//! # Markup contract
//!
//! Renderers opt elements into cross-slide matching with either
//! [`IDENTITY_ATTRIBUTE`] (a stable explicit identity) or [`MARKER_ATTRIBUTE`]
//! (a bare opt-in marker, surfaced in the dataset as [`MARKER_KEY`]).
//! Anything else is invisible to the matcher.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::registry::ElementHandle;

/// Attribute carrying an explicit element identity.
pub const IDENTITY_ATTRIBUTE: &str = "data-segue-id";

/// Attribute marking an element as matchable without an explicit identity.
pub const MARKER_ATTRIBUTE: &str = "data-segue";

/// Dataset key under which [`MARKER_ATTRIBUTE`] appears.
pub const MARKER_KEY: &str = "segue";

/// Non-geometric facts read from a live node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeFacts {
    /// Explicit identity, if the node carries [`IDENTITY_ATTRIBUTE`].
    pub identity: Option<String>,
    /// Tag or type name (e.g. `"H1"`).
    pub tag: String,
    /// Text content.
    pub text: String,
    /// Class tokens.
    pub classes: BTreeSet<String>,
    /// Dataset (`data-*` attributes without the prefix).
    pub dataset: BTreeMap<String, String>,
}

impl NodeFacts {
    /// Creates facts with the given tag and text and nothing else.
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the explicit identity.
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Adds class tokens.
    #[must_use]
    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(classes.into_iter().map(Into::into));
        self
    }

    /// Adds the opt-in marker to the dataset.
    #[must_use]
    pub fn with_marker(mut self) -> Self {
        self.dataset.insert(String::from(MARKER_KEY), String::new());
        self
    }

    /// Returns `true` if these facts qualify the node for matching.
    #[must_use]
    pub fn is_matchable(&self) -> bool {
        self.identity.is_some() || self.has_marker()
    }

    /// Returns `true` if the dataset carries the opt-in marker.
    #[must_use]
    pub fn has_marker(&self) -> bool {
        self.dataset.contains_key(MARKER_KEY)
    }
}

/// A point-in-time snapshot of one matchable element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementDescriptor {
    /// Registry handle of the live node.
    pub handle: ElementHandle,
    /// Explicit identity, if any.
    pub identity: Option<String>,
    /// Tag or type name.
    pub tag: String,
    /// Text content.
    pub text: String,
    /// Class tokens.
    pub classes: BTreeSet<String>,
    /// Geometry at capture time, in viewport pixels.
    pub rect: Rect,
    /// Dataset map.
    pub dataset: BTreeMap<String, String>,
}

impl ElementDescriptor {
    /// Builds a descriptor from node facts and a geometry reading.
    #[must_use]
    pub fn from_facts(handle: ElementHandle, facts: NodeFacts, rect: Rect) -> Self {
        let NodeFacts {
            identity,
            tag,
            text,
            classes,
            dataset,
        } = facts;
        Self {
            handle,
            identity,
            tag,
            text,
            classes,
            rect,
            dataset,
        }
    }

    /// Returns `true` if the dataset carries the opt-in marker.
    #[must_use]
    pub fn has_marker(&self) -> bool {
        self.dataset.contains_key(MARKER_KEY)
    }
}

/// Ordered descriptors from one capture, in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    descriptors: Vec<ElementDescriptor>,
}

impl Snapshot {
    /// An empty snapshot.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    /// Wraps descriptors that are already in document order.
    #[must_use]
    pub fn new(descriptors: Vec<ElementDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Returns the descriptors.
    #[must_use]
    pub fn descriptors(&self) -> &[ElementDescriptor] {
        &self.descriptors
    }

    /// Returns the number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Returns `true` if some descriptor refers to `handle`.
    #[must_use]
    pub fn contains(&self, handle: ElementHandle) -> bool {
        self.descriptors.iter().any(|d| d.handle == handle)
    }
}
