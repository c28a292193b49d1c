// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tri-state selection over a [`Tree`]: cascade down, recompute up.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::hash::Hash;

use crate::description::TreeDescription;
use crate::error::Error;
use crate::tree::Tree;
use crate::types::{CheckState, NodeId, NodeKey};

/// How far an update walks up the tree when recomputing ancestors.
///
/// Both policies produce identical states; they only differ in how many
/// ancestors are inspected.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecomputePolicy {
    /// Stop at the first ancestor whose recomputed state is unchanged.
    ///
    /// Nothing above that ancestor can change, since none of its siblings did.
    #[default]
    StopWhenStable,
    /// Always recompute every ancestor up to the root.
    WalkToRoot,
}

/// Keys whose stored state changed during one update, in the order they were
/// written: the cascaded subtree in pre-order, then ancestors nearest first.
///
/// Hosts use this to limit re-rendering to the affected checkboxes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Changes<K> {
    /// Changed keys.
    pub ids: Vec<K>,
}

impl<K> Default for Changes<K> {
    fn default() -> Self {
        Self { ids: Vec::new() }
    }
}

impl<K> Changes<K> {
    /// Returns `true` if the update changed nothing.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of nodes whose state changed.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if `key` changed.
    pub fn contains(&self, key: &K) -> bool
    where
        K: PartialEq,
    {
        self.ids.contains(key)
    }

    /// Iterate the changed keys.
    pub fn iter(&self) -> core::slice::Iter<'_, K> {
        self.ids.iter()
    }

    fn extend(&mut self, other: Self) {
        self.ids.extend(other.ids);
    }
}

impl<K> IntoIterator for Changes<K> {
    type Item = K;
    type IntoIter = vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a Changes<K> {
    type Item = &'a K;
    type IntoIter = core::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Selection engine bound to one [`Tree`].
///
/// Holds a [`CheckState`] for every node and keeps two invariants after every
/// call returns:
///
/// - every internal node's state is derived from its children
///   (all `Checked` → `Checked`, all `Unchecked` → `Unchecked`, otherwise
///   `Indeterminate`);
/// - a node set explicitly to `Checked`/`Unchecked` has every descendant in
///   that same state.
///
/// Failed calls change nothing. All mutation goes through `&mut self`, so a
/// host that shares one selection across threads puts it behind a single
/// lock and each update is observed atomically. The tree itself is
/// read-only and is shared through an [`Arc`].
///
/// ## Example
///
/// ```rust
/// use understory_check_tree::{CheckState, NodeDescription, Selection};
///
/// let citrus = NodeDescription::<&str>::new("citrus", "Citrus")
///     .with_child(NodeDescription::new("orange", "Orange"))
///     .with_child(NodeDescription::new("lemon", "Lemon"));
/// let mut selection = Selection::from_description(citrus).unwrap();
///
/// let changed = selection.toggle(&"orange").unwrap();
/// assert!(changed.contains(&"citrus"));
/// assert_eq!(selection.state_of(&"citrus"), Ok(CheckState::Indeterminate));
///
/// selection.toggle(&"lemon").unwrap();
/// assert_eq!(selection.state_of(&"citrus"), Ok(CheckState::Checked));
/// assert_eq!(selection.checked_leaf_ids().count(), 2);
/// ```
#[derive(Clone)]
pub struct Selection<K = NodeKey> {
    tree: Arc<Tree<K>>,
    /// Indexed by pre-order position; always one entry per node.
    states: Vec<CheckState>,
    policy: RecomputePolicy,
}

impl<K> core::fmt::Debug for Selection<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let checked = self.states.iter().filter(|s| s.is_checked()).count();
        f.debug_struct("Selection")
            .field("tree", &self.tree)
            .field("checked", &checked)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<K: Clone + Eq + Hash> Selection<K> {
    /// Bind a selection to `tree` with every node `Unchecked`.
    pub fn new(tree: impl Into<Arc<Tree<K>>>) -> Self {
        let tree = tree.into();
        let states = vec![CheckState::Unchecked; tree.len()];
        Self {
            tree,
            states,
            policy: RecomputePolicy::default(),
        }
    }

    /// Bind a selection to `tree`, seeded from the `checked` flags its
    /// description carried.
    ///
    /// Internal nodes whose flag disagrees with their children are corrected
    /// before this returns.
    pub fn seeded(tree: impl Into<Arc<Tree<K>>>) -> Self {
        let tree = tree.into();
        let states = tree
            .all_node_ids()
            .map(|id| CheckState::from_bool(tree.initially_checked(id)))
            .collect();
        Self::normalized(tree, states)
    }

    /// Bind a selection to `tree`, seeded from explicit `(key, checked)`
    /// pairs. Nodes not mentioned start `Unchecked`.
    ///
    /// Seeds apply to leaves and internal nodes alike; internal nodes are then
    /// recomputed from their children. Fails with [`Error::NodeNotFound`] if a
    /// seed names a key outside the tree.
    pub fn with_seed<I>(tree: impl Into<Arc<Tree<K>>>, seed: I) -> Result<Self, Error<K>>
    where
        I: IntoIterator<Item = (K, bool)>,
    {
        let tree = tree.into();
        let mut states = vec![CheckState::Unchecked; tree.len()];
        for (key, checked) in seed {
            let Some(id) = tree.id_of(&key) else {
                return Err(Error::NodeNotFound(key));
            };
            states[id.idx()] = CheckState::from_bool(checked);
        }
        Ok(Self::normalized(tree, states))
    }

    /// Build a tree from `description` and bind a selection seeded from its
    /// `checked` flags.
    pub fn from_description(description: impl Into<TreeDescription<K>>) -> Result<Self, Error<K>> {
        Ok(Self::seeded(Tree::build(description)?))
    }

    fn normalized(tree: Arc<Tree<K>>, states: Vec<CheckState>) -> Self {
        let mut selection = Self {
            tree,
            states,
            policy: RecomputePolicy::default(),
        };
        selection.recompute_all();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = selection.states.len(),
            checked_leaves = selection.checked_leaf_count(),
            "selection initialized"
        );

        selection
    }

    /// Use `policy` for ancestor recomputation.
    #[must_use]
    pub fn with_policy(mut self, policy: RecomputePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active ancestor recomputation policy.
    pub fn policy(&self) -> RecomputePolicy {
        self.policy
    }

    /// The bound tree.
    pub fn tree(&self) -> &Tree<K> {
        &self.tree
    }

    /// A shared handle to the bound tree.
    pub fn shared_tree(&self) -> Arc<Tree<K>> {
        Arc::clone(&self.tree)
    }

    /// State of the node with `key`.
    pub fn state_of(&self, key: &K) -> Result<CheckState, Error<K>> {
        let id = self.resolve(key)?;
        Ok(self.states[id.idx()])
    }

    /// State of a node by handle, or `None` for foreign handles.
    ///
    /// Convenient for render loops that already walk the tree by [`NodeId`].
    pub fn state(&self, id: NodeId) -> Option<CheckState> {
        self.states.get(id.idx()).copied()
    }

    /// Flip a node the way a click does.
    ///
    /// `Checked` and `Indeterminate` become `Unchecked`; `Unchecked` becomes
    /// `Checked`. The new state then cascades exactly as in
    /// [`Selection::set_state`]. An `Indeterminate` node can therefore never
    /// be restored by toggling twice.
    pub fn toggle(&mut self, key: &K) -> Result<Changes<K>, Error<K>> {
        let id = self.resolve(key)?;
        let next = self.states[id.idx()].toggled();
        Ok(self.apply(id, next))
    }

    /// Explicitly set a node to `Checked` or `Unchecked`.
    ///
    /// The state is written to the node and all of its descendants, then the
    /// node's ancestors are recomputed from their children. Returns the keys
    /// whose state actually changed.
    ///
    /// Fails with [`Error::NodeNotFound`] for unknown keys and with
    /// [`Error::InvalidState`] for `Indeterminate`, which is derived only.
    pub fn set_state(&mut self, key: &K, state: CheckState) -> Result<Changes<K>, Error<K>> {
        let id = self.resolve(key)?;
        if state == CheckState::Indeterminate {
            return Err(Error::InvalidState);
        }
        Ok(self.apply(id, state))
    }

    /// Uncheck every node in the forest.
    pub fn clear(&mut self) -> Changes<K> {
        self.apply_to_roots(CheckState::Unchecked)
    }

    /// Check every node in the forest.
    pub fn select_all(&mut self) -> Changes<K> {
        self.apply_to_roots(CheckState::Checked)
    }

    /// Behave like a "Select all" checkbox: clear when everything is checked,
    /// otherwise check everything.
    pub fn toggle_all(&mut self) -> Changes<K> {
        if self.forest_state() == CheckState::Checked {
            self.clear()
        } else {
            self.select_all()
        }
    }

    /// Aggregate state over the roots, as a "Select all" checkbox would show
    /// it. An empty forest is `Unchecked`.
    pub fn forest_state(&self) -> CheckState {
        CheckState::aggregate(self.tree.roots().iter().map(|r| self.states[r.idx()]))
            .unwrap_or(CheckState::Unchecked)
    }

    /// Keys of the checked leaves, in tree order.
    ///
    /// This is the canonical current selection. Internal nodes are never
    /// listed since their state is implied by their leaves.
    pub fn checked_leaf_ids(&self) -> impl Iterator<Item = &K> + '_ {
        self.tree
            .all_node_ids()
            .filter(|&id| self.tree.is_leaf(id) && self.states[id.idx()].is_checked())
            .map(|id| self.tree.key_at(id.idx()))
    }

    /// Number of checked leaves.
    pub fn checked_leaf_count(&self) -> usize {
        self.checked_leaf_ids().count()
    }

    /// Every `(key, state)` pair in tree order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, CheckState)> + '_ {
        self.tree.keys().zip(self.states.iter().copied())
    }

    /// Returns `true` if every internal node's state matches its children and
    /// no leaf is `Indeterminate`.
    pub fn is_consistent(&self) -> bool {
        self.tree.all_node_ids().all(|id| {
            let state = self.states[id.idx()];
            match self.derived(id) {
                Some(derived) => derived == state,
                None => state != CheckState::Indeterminate,
            }
        })
    }

    fn resolve(&self, key: &K) -> Result<NodeId, Error<K>> {
        self.tree
            .id_of(key)
            .ok_or_else(|| Error::NodeNotFound(key.clone()))
    }

    fn apply(&mut self, id: NodeId, state: CheckState) -> Changes<K> {
        let mut changes = Changes::default();
        self.cascade(id, state, &mut changes);
        self.recompute_ancestors(id, &mut changes);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            node = id.idx(),
            ?state,
            changed = changes.len(),
            "selection updated"
        );

        changes
    }

    fn apply_to_roots(&mut self, state: CheckState) -> Changes<K> {
        let tree = Arc::clone(&self.tree);
        let mut changes = Changes::default();
        for &root in tree.roots() {
            changes.extend(self.apply(root, state));
        }
        changes
    }

    /// Write `state` over the whole subtree rooted at `id`.
    fn cascade(&mut self, id: NodeId, state: CheckState, changes: &mut Changes<K>) {
        for idx in self.tree.subtree_range(id) {
            if self.states[idx] != state {
                self.states[idx] = state;
                changes.ids.push(self.tree.key_at(idx).clone());
            }
        }
    }

    fn recompute_ancestors(&mut self, id: NodeId, changes: &mut Changes<K>) {
        let mut current = self.tree.parent_of(id);
        while let Some(parent) = current {
            // Ancestors always have children.
            let derived = self.derived(parent).unwrap_or(self.states[parent.idx()]);
            if self.states[parent.idx()] == derived {
                if self.policy == RecomputePolicy::StopWhenStable {
                    break;
                }
            } else {
                self.states[parent.idx()] = derived;
                changes.ids.push(self.tree.key_at(parent.idx()).clone());
            }
            current = self.tree.parent_of(parent);
        }
    }

    /// Recompute every internal node from the leaves up.
    fn recompute_all(&mut self) {
        // Children sit after their parent in pre-order, so a reverse sweep
        // always sees final child states.
        for id in self.tree.all_node_ids().rev() {
            if let Some(derived) = self.derived(id) {
                self.states[id.idx()] = derived;
            }
        }
    }

    /// State implied by `id`'s children, or `None` for leaves.
    fn derived(&self, id: NodeId) -> Option<CheckState> {
        CheckState::aggregate(
            self.tree
                .children_of(id)
                .iter()
                .map(|c| self.states[c.idx()]),
        )
    }
}
