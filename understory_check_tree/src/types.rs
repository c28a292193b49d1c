// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the check tree: node handles, keys, and the tri-state value.

use alloc::string::String;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle of a node inside a [`Tree`](crate::Tree).
///
/// Handles are dense pre-order positions: a node's handle is smaller than the
/// handle of every one of its descendants, and a subtree occupies a
/// contiguous run of handles. Handles are only meaningful for the tree that
/// produced them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Selection value of a single node.
///
/// `Indeterminate` is never set directly; it is derived for internal nodes
/// whose children disagree and is never stored for a leaf.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum CheckState {
    /// Not selected.
    #[default]
    Unchecked,
    /// Selected; for an internal node, every descendant is selected.
    Checked,
    /// Some, but not all, descendants are selected.
    Indeterminate,
}

impl CheckState {
    /// Map a plain checkbox flag onto the tri-state domain.
    #[must_use]
    pub const fn from_bool(checked: bool) -> Self {
        if checked { Self::Checked } else { Self::Unchecked }
    }

    /// Returns `true` only for [`CheckState::Checked`].
    #[must_use]
    pub const fn is_checked(self) -> bool {
        matches!(self, Self::Checked)
    }

    /// The explicit state a click produces from this state.
    ///
    /// `Checked` and `Indeterminate` both count as "on" and flip to
    /// `Unchecked`; `Unchecked` flips to `Checked`.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Checked | Self::Indeterminate => Self::Unchecked,
            Self::Unchecked => Self::Checked,
        }
    }

    /// Derive a parent's state from its children's states.
    ///
    /// All `Checked` yields `Checked`, all `Unchecked` yields `Unchecked`, and
    /// any mix (or any `Indeterminate` child) yields `Indeterminate`. Child
    /// order is irrelevant. Returns `None` when there are no children, since a
    /// leaf's state is not derived.
    pub fn aggregate<I>(children: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let mut children = children.into_iter();
        let first = children.next()?;
        if first == Self::Indeterminate {
            return Some(Self::Indeterminate);
        }
        for state in children {
            if state != first {
                return Some(Self::Indeterminate);
            }
        }
        Some(first)
    }
}

/// Ready-made node identifier for descriptions whose ids are either integers
/// or strings.
///
/// With the `serde` feature this deserializes from a JSON number or a JSON
/// string. Any `Clone + Eq + Hash` type can be used as a key instead.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum NodeKey {
    /// Numeric identifier.
    Int(i64),
    /// Textual identifier.
    Str(String),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NodeKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for NodeKey {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for NodeKey {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<String> for NodeKey {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}
