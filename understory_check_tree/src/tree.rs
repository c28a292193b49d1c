// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-shape node hierarchy: construction and read-only queries.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::hash::Hash;
use core::ops::Range;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::description::{NodeDescription, TreeDescription};
use crate::error::{Error, MissingField};
use crate::types::{NodeId, NodeKey};

/// An immutable forest of labelled nodes.
///
/// Nodes are stored flat, in depth-first pre-order, so a node's [`NodeId`] is
/// its pre-order position and every subtree is a contiguous run of ids. A
/// key → id index is built once by [`Tree::build`]; after that the shape
/// never changes, which makes a tree safe to share (for example behind an
/// [`Arc`](alloc::sync::Arc)) without locking.
///
/// ## Example
///
/// ```rust
/// use understory_check_tree::{NodeDescription, Tree};
///
/// let tree = Tree::build(
///     NodeDescription::<&str>::new("citrus", "Citrus")
///         .with_child(NodeDescription::new("orange", "Orange"))
///         .with_child(NodeDescription::new("lemon", "Lemon")),
/// )
/// .unwrap();
///
/// let citrus = tree.id_of(&"citrus").unwrap();
/// let lemon = tree.id_of(&"lemon").unwrap();
/// assert_eq!(tree.children_of(citrus).len(), 2);
/// assert_eq!(tree.parent_of(lemon), Some(citrus));
/// assert!(tree.is_leaf(lemon));
/// ```
#[derive(Clone)]
pub struct Tree<K = NodeKey> {
    /// Pre-order node storage.
    nodes: Vec<Node<K>>,
    roots: Vec<NodeId>,
    index: HashMap<K, NodeId>,
}

impl<K> core::fmt::Debug for Tree<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let leaves = self.nodes.iter().filter(|n| n.children.is_empty()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &self.nodes.len())
            .field("roots", &self.roots.len())
            .field("leaves", &leaves)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node<K> {
    key: K,
    label: String,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    /// One past the last pre-order position inside this node's subtree.
    subtree_end: usize,
    depth: usize,
    /// `checked` flag from the description, kept for seeding.
    checked: bool,
}

impl<K: Clone + Eq + Hash> Tree<K> {
    /// Build a tree from a single-root or forest description.
    ///
    /// Fails with [`Error::MalformedDescription`] if any descriptor lacks an
    /// id or a label, and with [`Error::DuplicateId`] if an id occurs more
    /// than once anywhere in the description.
    pub fn build(description: impl Into<TreeDescription<K>>) -> Result<Self, Error<K>> {
        let roots = description.into().into_roots();
        let mut tree = Self {
            nodes: Vec::new(),
            roots: Vec::with_capacity(roots.len()),
            index: HashMap::new(),
        };
        let mut path = Vec::new();
        for (i, root) in roots.into_iter().enumerate() {
            path.push(i);
            let id = tree.push_subtree(root, &mut path)?;
            path.pop();
            tree.roots.push(id);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = tree.nodes.len(),
            roots = tree.roots.len(),
            "check tree built"
        );

        Ok(tree)
    }

    /// Append `root` and all of its descendants in pre-order.
    ///
    /// The walk keeps its own stack of open nodes, so description depth is
    /// bounded by memory rather than by the call stack. `path` holds the
    /// child-index path of the node being pushed.
    fn push_subtree(
        &mut self,
        root: NodeDescription<K>,
        path: &mut Vec<usize>,
    ) -> Result<NodeId, Error<K>> {
        let (root_id, children) = self.push_node(root, None, 0, path)?;
        let mut open = vec![(root_id, children.into_iter().enumerate())];

        while let Some((parent, children)) = open.last_mut() {
            let parent = *parent;
            if let Some((i, child)) = children.next() {
                path.push(i);
                let depth = self.nodes[parent.idx()].depth + 1;
                let (id, grandchildren) = self.push_node(child, Some(parent), depth, path)?;
                self.nodes[parent.idx()].children.push(id);
                open.push((id, grandchildren.into_iter().enumerate()));
            } else {
                // Every descendant of `parent` is now in place.
                self.nodes[parent.idx()].subtree_end = self.nodes.len();
                open.pop();
                if !open.is_empty() {
                    path.pop();
                }
            }
        }
        Ok(root_id)
    }

    /// Validate one descriptor and append it as a node with no children yet.
    ///
    /// Returns the new handle and the descriptor's children, still to be
    /// pushed.
    fn push_node(
        &mut self,
        desc: NodeDescription<K>,
        parent: Option<NodeId>,
        depth: usize,
        path: &[usize],
    ) -> Result<(NodeId, Vec<NodeDescription<K>>), Error<K>> {
        let NodeDescription {
            id: key,
            label,
            children,
            checked,
            is_folder,
        } = desc;
        let Some(key) = key else {
            return Err(Error::MalformedDescription {
                path: path.to_vec(),
                field: MissingField::Id,
            });
        };
        let Some(label) = label else {
            return Err(Error::MalformedDescription {
                path: path.to_vec(),
                field: MissingField::Label,
            });
        };
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateId(key));
        }
        normalize_folder_flag(is_folder, !children.is_empty());

        let id = id_at(self.nodes.len());
        self.index.insert(key.clone(), id);
        self.nodes.push(Node {
            key,
            label,
            parent,
            children: SmallVec::with_capacity(children.len()),
            subtree_end: id.idx() + 1,
            depth,
            checked,
        });
        Ok((id, children))
    }

    /// Look up the handle of the node with the given key.
    pub fn id_of(&self, key: &K) -> Option<NodeId> {
        self.index.get(key).copied()
    }
}

impl<K> Tree<K> {
    /// Total number of nodes in the forest.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the forest has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes, in description order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns `true` if `id` belongs to this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        id.idx() < self.nodes.len()
    }

    /// Key of a node, or `None` if `id` is not from this tree.
    pub fn key_of(&self, id: NodeId) -> Option<&K> {
        self.nodes.get(id.idx()).map(|n| &n.key)
    }

    /// Display label of a node, or `None` if `id` is not from this tree.
    pub fn label_of(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.idx()).map(|n| n.label.as_str())
    }

    /// Children of a node in description order, or an empty slice if `id` is
    /// a leaf or not from this tree.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.idx())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parent of a node, or `None` for roots and foreign ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.idx()).and_then(|n| n.parent)
    }

    /// Returns `true` if `id` is a node of this tree without children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .is_some_and(|n| n.children.is_empty())
    }

    /// Nesting level of a node (roots are at depth 0).
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id.idx()).map(|n| n.depth)
    }

    /// The `checked` flag the node's descriptor carried.
    ///
    /// Returns `false` for foreign ids.
    pub fn initially_checked(&self, id: NodeId) -> bool {
        self.nodes.get(id.idx()).is_some_and(|n| n.checked)
    }

    /// Every node handle in depth-first pre-order.
    pub fn all_node_ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator {
        (0..self.nodes.len()).map(id_at)
    }

    /// Every node key in depth-first pre-order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.nodes.iter().map(|n| &n.key)
    }

    /// All descendants of `id` (excluding `id` itself) in pre-order.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let range = self.subtree_range(id);
        (range.start.saturating_add(1)..range.end).map(id_at)
    }

    /// Ancestors of `id`, nearest first, ending at its root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.parent_of(id), move |&p| self.parent_of(p))
    }

    /// Next node in depth-first order, crossing from one root's subtree into
    /// the next. Does not wrap.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        let next = current.idx() + 1;
        (next < self.nodes.len()).then(|| id_at(next))
    }

    /// Previous node in depth-first order. Does not wrap.
    pub fn prev_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.contains(current) || current.idx() == 0 {
            return None;
        }
        Some(id_at(current.idx() - 1))
    }

    /// Pre-order positions covered by the subtree rooted at `id` (including
    /// `id`). Empty for foreign ids.
    pub(crate) fn subtree_range(&self, id: NodeId) -> Range<usize> {
        match self.nodes.get(id.idx()) {
            Some(node) => id.idx()..node.subtree_end,
            None => 0..0,
        }
    }

    /// Key at a pre-order position known to be in range.
    pub(crate) fn key_at(&self, idx: usize) -> &K {
        &self.nodes[idx].key
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "NodeId uses 32-bit indices by design."
)]
fn id_at(idx: usize) -> NodeId {
    NodeId::new(idx as u32)
}

/// Folder-ness is structural; an explicit flag is only reconciled here.
#[cfg_attr(
    not(feature = "tracing"),
    expect(unused_variables, reason = "Only reported through tracing.")
)]
fn normalize_folder_flag(is_folder: Option<bool>, has_children: bool) {
    #[cfg(feature = "tracing")]
    if let Some(flag) = is_folder
        && flag != has_children
    {
        tracing::debug!(
            is_folder = flag,
            has_children,
            "folder flag disagrees with children; children decide"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Desc = NodeDescription<&'static str>;

    fn fruits() -> Desc {
        Desc::new("fruits", "Fruits")
            .with_child(
                Desc::new("citrus", "Citrus")
                    .with_child(Desc::new("orange", "Orange"))
                    .with_child(Desc::new("lemon", "Lemon")),
            )
            .with_child(
                Desc::new("berries", "Berries")
                    .with_child(Desc::new("strawberry", "Strawberry"))
                    .with_child(Desc::new("blueberry", "Blueberry")),
            )
    }

    fn id(tree: &Tree<&'static str>, key: &'static str) -> NodeId {
        tree.id_of(&key).unwrap()
    }

    #[test]
    fn build_lays_nodes_out_in_pre_order() {
        let tree = Tree::build(fruits()).unwrap();
        let keys: Vec<_> = tree.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                "fruits",
                "citrus",
                "orange",
                "lemon",
                "berries",
                "strawberry",
                "blueberry"
            ]
        );
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.roots(), &[id(&tree, "fruits")]);
    }

    #[test]
    fn structural_queries() {
        let tree = Tree::build(fruits()).unwrap();
        let fruits = id(&tree, "fruits");
        let citrus = id(&tree, "citrus");
        let berries = id(&tree, "berries");
        let lemon = id(&tree, "lemon");

        assert_eq!(tree.children_of(fruits), &[citrus, berries]);
        assert_eq!(tree.parent_of(lemon), Some(citrus));
        assert_eq!(tree.parent_of(fruits), None);
        assert!(tree.is_leaf(lemon));
        assert!(!tree.is_leaf(citrus));
        assert_eq!(tree.depth_of(fruits), Some(0));
        assert_eq!(tree.depth_of(lemon), Some(2));
        assert_eq!(tree.label_of(berries), Some("Berries"));
        assert_eq!(tree.key_of(berries), Some(&"berries"));
    }

    #[test]
    fn descendants_and_ancestors() {
        let tree = Tree::build(fruits()).unwrap();
        let citrus = id(&tree, "citrus");
        let orange = id(&tree, "orange");
        let lemon = id(&tree, "lemon");

        let below: Vec<_> = tree.descendants(citrus).collect();
        assert_eq!(below, vec![orange, lemon]);
        assert_eq!(tree.descendants(lemon).count(), 0);

        let above: Vec<_> = tree.ancestors(lemon).collect();
        assert_eq!(above, vec![citrus, id(&tree, "fruits")]);
        assert_eq!(tree.ancestors(id(&tree, "fruits")).count(), 0);
    }

    #[test]
    fn depth_first_traversal_crosses_roots() {
        let tree = Tree::build(vec![
            Desc::new("a", "A").with_child(Desc::new("a1", "A1")),
            Desc::new("b", "B"),
        ])
        .unwrap();
        let a1 = id(&tree, "a1");
        let b = id(&tree, "b");

        assert_eq!(tree.next_depth_first(id(&tree, "a")), Some(a1));
        assert_eq!(tree.next_depth_first(a1), Some(b));
        assert_eq!(tree.next_depth_first(b), None);
        assert_eq!(tree.prev_depth_first(b), Some(a1));
        assert_eq!(tree.prev_depth_first(id(&tree, "a")), None);
    }

    #[test]
    fn single_root_and_forest_of_one_build_the_same_tree() {
        let single = Tree::build(fruits()).unwrap();
        let forest = Tree::build(vec![fruits()]).unwrap();
        assert!(single.keys().eq(forest.keys()));
        assert_eq!(single.roots(), forest.roots());
    }

    #[test]
    fn duplicate_ids_are_rejected_across_subtrees() {
        let err = Tree::build(vec![
            Desc::new("a", "A").with_child(Desc::new("shared", "Shared")),
            Desc::new("b", "B").with_child(Desc::new("shared", "Shared again")),
        ])
        .unwrap_err();
        assert_eq!(err, Error::DuplicateId("shared"));
    }

    #[test]
    fn missing_fields_report_their_path() {
        let nameless = Desc {
            label: None,
            ..Desc::new("x", "")
        };
        let err = Tree::build(vec![
            Desc::new("a", "A"),
            Desc::new("b", "B").with_child(nameless),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            Error::MalformedDescription {
                path: vec![1, 0],
                field: MissingField::Label,
            }
        );

        let anonymous = Desc {
            id: None,
            ..Desc::new("y", "Y")
        };
        let err = Tree::build(anonymous).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedDescription {
                path: vec![0],
                field: MissingField::Id,
            }
        );
    }

    #[test]
    fn folder_flag_never_decides_structure() {
        let empty_folder = Desc {
            is_folder: Some(true),
            ..Desc::new("docs", "Docs")
        };
        let flagged_file = Desc {
            is_folder: Some(false),
            ..Desc::new("src", "src").with_child(Desc::new("main", "main.rs"))
        };
        let tree = Tree::build(vec![empty_folder, flagged_file]).unwrap();
        assert!(tree.is_leaf(id(&tree, "docs")));
        assert!(!tree.is_leaf(id(&tree, "src")));
    }

    #[test]
    fn foreign_ids_are_answered_conservatively() {
        let tree = Tree::build(Desc::new("only", "Only")).unwrap();
        let foreign = NodeId::new(99);
        assert!(!tree.contains(foreign));
        assert!(tree.children_of(foreign).is_empty());
        assert_eq!(tree.parent_of(foreign), None);
        assert!(!tree.is_leaf(foreign));
        assert_eq!(tree.depth_of(foreign), None);
        assert_eq!(tree.descendants(foreign).count(), 0);
        assert_eq!(tree.next_depth_first(foreign), None);
        assert_eq!(tree.prev_depth_first(foreign), None);
    }

    #[test]
    fn empty_forest_is_valid() {
        let tree = Tree::build(Vec::<NodeDescription<u32>>::new()).unwrap();
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
        assert_eq!(tree.all_node_ids().len(), 0);
    }

    /// A single chain `0 -> 1 -> ... -> depth - 1`.
    fn chain(depth: u32) -> NodeDescription<u32> {
        let mut desc = NodeDescription::new(depth - 1, "leaf");
        for k in (0..depth - 1).rev() {
            desc = NodeDescription::new(k, "link").with_child(desc);
        }
        desc
    }

    #[test]
    fn very_deep_chains_build_in_pre_order() {
        let depth = 5_000;
        let tree = Tree::build(chain(depth)).unwrap();
        assert_eq!(tree.len(), 5_000);
        let ids: Vec<_> = tree.all_node_ids().collect();
        for (k, id) in ids.iter().enumerate() {
            assert_eq!(tree.key_of(*id), Some(&u32::try_from(k).unwrap()));
            assert_eq!(tree.depth_of(*id), Some(k));
            assert_eq!(tree.descendants(*id).count(), ids.len() - k - 1);
        }
        let leaf = tree.id_of(&(depth - 1)).unwrap();
        assert!(tree.is_leaf(leaf));
        assert_eq!(tree.ancestors(leaf).count(), 4_999);
    }

    #[test]
    fn deep_errors_report_the_full_path() {
        let mut desc: NodeDescription<u32> = NodeDescription {
            label: None,
            ..NodeDescription::new(9_999_u32, "")
        };
        for k in (0..3_000_u32).rev() {
            desc = NodeDescription::new(k, "link").with_child(desc);
        }
        let Err(Error::MalformedDescription { path, field }) =
            Tree::build(vec![NodeDescription::new(10_000_u32, "first"), desc])
        else {
            panic!("a nameless descriptor should be rejected");
        };
        assert_eq!(field, MissingField::Label);
        assert_eq!(path.len(), 3_001);
        assert_eq!(path[0], 1);
        assert!(path[1..].iter().all(|&i| i == 0));
    }

    #[test]
    fn seed_flags_are_kept_per_node() {
        let tree = Tree::build(
            Desc::new("p", "P")
                .with_checked(true)
                .with_child(Desc::new("c", "C")),
        )
        .unwrap();
        assert!(tree.initially_checked(id(&tree, "p")));
        assert!(!tree.initially_checked(id(&tree, "c")));
    }
}
