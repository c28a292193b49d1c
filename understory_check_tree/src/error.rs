// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by tree construction and selection updates.
//!
//! Every error is local and recoverable: a call that fails leaves the tree
//! and the selection exactly as they were.

use alloc::vec::Vec;
use core::fmt;

/// Required descriptor field that was absent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MissingField {
    /// The node had no `id`.
    Id,
    /// The node had no `label`.
    Label,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Id => "id",
            Self::Label => "label",
        })
    }
}

/// Error type for [`Tree`](crate::Tree) and [`Selection`](crate::Selection).
///
/// `K` is the node key type, so a caller can see exactly which id was
/// rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error<K> {
    /// A descriptor lacks a required field.
    ///
    /// `path` lists child indices from the root list down to the offending
    /// descriptor, so `[1, 0]` is the first child of the second root.
    #[error("node description at {path:?} is missing its {field}")]
    MalformedDescription {
        /// Child-index path of the descriptor.
        path: Vec<usize>,
        /// Which field is missing.
        field: MissingField,
    },
    /// The same id appears more than once anywhere in the description.
    #[error("node id {0:?} appears more than once")]
    DuplicateId(K),
    /// The id is not part of the bound tree.
    #[error("node {0:?} is not part of this tree")]
    NodeNotFound(K),
    /// `Indeterminate` was passed where only `Checked`/`Unchecked` are allowed.
    #[error("indeterminate is derived from children and cannot be set directly")]
    InvalidState,
}
