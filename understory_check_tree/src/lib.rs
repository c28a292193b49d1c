// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_check_tree --heading-base-level=0

//! Understory Check Tree: hierarchical tri-state selection.
//!
//! This crate is the state engine behind nested checkbox trees such as category
//! pickers or permission editors. It owns no widgets and draws nothing; a
//! host builds a tree once, forwards clicks to the engine, and re-renders the
//! nodes the engine reports as changed.
//!
//! - [`Tree`]: an immutable forest of labelled nodes, built once from a
//!   [`TreeDescription`] and queried by [`NodeId`] handle.
//! - [`Selection`]: a [`CheckState`] per node, with propagation:
//!   - **cascade**: setting a node to `Checked`/`Unchecked` writes that state
//!     over its whole subtree;
//!   - **recompute**: each ancestor is then re-derived from its children, which
//!     produces `Indeterminate` for mixed subtrees.
//! - [`Changes`]: the keys whose state changed in one call.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_check_tree::{CheckState, NodeDescription, Selection};
//!
//! type Desc = NodeDescription<&'static str>;
//!
//! let fruits = Desc::new("fruits", "Fruits")
//!     .with_child(
//!         Desc::new("citrus", "Citrus")
//!             .with_child(Desc::new("orange", "Orange"))
//!             .with_child(Desc::new("lemon", "Lemon")),
//!     )
//!     .with_child(
//!         Desc::new("berries", "Berries")
//!             .with_child(Desc::new("strawberry", "Strawberry"))
//!             .with_child(Desc::new("blueberry", "Blueberry")),
//!     );
//!
//! let mut selection = Selection::from_description(fruits).unwrap();
//!
//! // Checking one leaf makes every ancestor partially selected.
//! selection.toggle(&"orange").unwrap();
//! assert_eq!(selection.state_of(&"citrus"), Ok(CheckState::Indeterminate));
//! assert_eq!(selection.state_of(&"fruits"), Ok(CheckState::Indeterminate));
//!
//! // Checking a group checks all of its descendants.
//! selection.toggle(&"berries").unwrap();
//! assert_eq!(selection.state_of(&"blueberry"), Ok(CheckState::Checked));
//!
//! // Leaves are the canonical selection.
//! let picked: Vec<_> = selection.checked_leaf_ids().copied().collect();
//! assert_eq!(picked, ["orange", "strawberry", "blueberry"]);
//!
//! // An indeterminate node toggles off first.
//! selection.toggle(&"fruits").unwrap();
//! assert_eq!(selection.checked_leaf_ids().count(), 0);
//! ```
//!
//! ## Ids and descriptions
//!
//! Nodes are addressed by caller-chosen keys (any `Clone + Eq + Hash` type).
//! [`NodeKey`] is provided for inputs whose ids may be integers or strings.
//! Whether a node is internal is always derived from its children; explicit
//! folder flags in the input are accepted and ignored.
//!
//! ## Features
//!
//! - `serde`: `Deserialize`/`Serialize` for [`TreeDescription`], [`NodeDescription`],
//!   [`NodeKey`], and [`CheckState`]. A JSON array parses as a forest, a JSON
//!   object as a single root.
//! - `tracing`: debug events when a tree is built and on every selection update.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod description;
mod error;
mod selection;
mod tree;
mod types;

pub use description::{NodeDescription, TreeDescription};
pub use error::{Error, MissingField};
pub use selection::{Changes, RecomputePolicy, Selection};
pub use tree::Tree;
pub use types::{CheckState, NodeId, NodeKey};
