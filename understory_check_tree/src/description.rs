// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Externally supplied tree descriptions.
//!
//! A description is the nested, loosely validated input a host hands to
//! [`Tree::build`](crate::Tree::build). Fields the builder requires (`id` and
//! `label`) are optional here so that a missing field is reported as
//! [`Error::MalformedDescription`](crate::Error::MalformedDescription) instead
//! of failing earlier with a less useful message.

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::NodeKey;

/// Description of a single node and, recursively, its children.
///
/// With the `serde` feature, the JSON shape is:
///
/// ```json
/// { "id": 1, "label": "Fruits", "checked": false, "children": [ ... ] }
/// ```
///
/// `name` is accepted in place of `label`, and `isFolder` is accepted but
/// never consulted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(bound(deserialize = "K: Deserialize<'de>"))
)]
pub struct NodeDescription<K = NodeKey> {
    /// Identifier, unique across the whole description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<K>,
    /// Display text.
    #[cfg_attr(feature = "serde", serde(default, alias = "name"))]
    pub label: Option<String>,
    /// Ordered children. Absent and empty both mean the node is a leaf.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<NodeDescription<K>>,
    /// Initial selection flag; see [`Selection::seeded`](crate::Selection::seeded).
    #[cfg_attr(feature = "serde", serde(default))]
    pub checked: bool,
    /// Explicit folder flag found in some inputs.
    ///
    /// Whether a node is internal is always derived from `children`; this
    /// flag is kept only so such inputs parse, and is dropped by the builder.
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "isFolder", skip_serializing_if = "Option::is_none")
    )]
    pub is_folder: Option<bool>,
}

impl<K> NodeDescription<K> {
    /// Describe a node with the given id and label and no children.
    pub fn new(id: impl Into<K>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            label: Some(label.into()),
            children: Vec::new(),
            checked: false,
            is_folder: None,
        }
    }

    /// Append one child.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children, in order.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Set the initial selection flag.
    #[must_use]
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Returns `true` if this descriptor has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl<K> Default for NodeDescription<K> {
    fn default() -> Self {
        Self {
            id: None,
            label: None,
            children: Vec::new(),
            checked: false,
            is_folder: None,
        }
    }
}

/// A whole tree description: either a single root object or a forest.
///
/// Both shapes build identical trees; a single root is simply a forest of
/// one. With the `serde` feature, a JSON array parses as [`Self::Forest`] and
/// a JSON object as [`Self::Single`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum TreeDescription<K = NodeKey> {
    /// Ordered top-level roots.
    Forest(Vec<NodeDescription<K>>),
    /// One root.
    Single(NodeDescription<K>),
}

impl<K> TreeDescription<K> {
    /// The top-level descriptors, in order.
    pub fn into_roots(self) -> Vec<NodeDescription<K>> {
        match self {
            Self::Forest(roots) => roots,
            Self::Single(root) => alloc::vec![root],
        }
    }
}

impl<K> From<NodeDescription<K>> for TreeDescription<K> {
    fn from(root: NodeDescription<K>) -> Self {
        Self::Single(root)
    }
}

impl<K> From<Vec<NodeDescription<K>>> for TreeDescription<K> {
    fn from(roots: Vec<NodeDescription<K>>) -> Self {
        Self::Forest(roots)
    }
}
