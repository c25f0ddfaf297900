// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breadth-first snapshot of the visible part of a tree.

use alloc::vec::Vec;
use core::ops::Range;

use crate::tree::Tree;
use crate::types::NodeId;

/// One entry of a [`Hierarchy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HierarchyNode {
    /// Tree node this entry stands for.
    pub id: NodeId,
    /// Depth below the hierarchy root.
    pub depth: u32,
    /// Position of the parent entry, `None` for the root.
    pub parent: Option<usize>,
    /// Positions of the child entries; always contiguous.
    pub children: Range<usize>,
    /// Index of the node among its parent's children in the tree.
    pub index: u32,
}

impl HierarchyNode {
    /// Whether the entry has no visible children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Visible nodes below a root, in breadth-first order.
///
/// Folded nodes appear as leaves. Because children of each entry are stored
/// contiguously and after their parent, iterating the entries backwards visits
/// every child before its parent, which is all a bottom-up pass needs.
#[derive(Clone, Debug, Default)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    max_depth: u32,
}

impl Hierarchy {
    /// Snapshot the visible subtree of `root`.
    ///
    /// Returns `None` when `root` is stale.
    pub fn build<T>(tree: &Tree<T>, root: NodeId) -> Option<Self> {
        let children = tree.get(root)?.effective_children();
        Self::build_with_children(tree, root, children.iter().copied().enumerate())
    }

    /// Snapshot the subtree of `root` using `children` in place of its own visible children.
    ///
    /// Each child comes with its sibling index in the tree, which ends up in
    /// [`HierarchyNode::index`]. Stale children are skipped. Below the root the
    /// tree's own visible children are used.
    pub fn build_with_children<T>(
        tree: &Tree<T>,
        root: NodeId,
        children: impl IntoIterator<Item = (usize, NodeId)>,
    ) -> Option<Self> {
        if !tree.is_alive(root) {
            return None;
        }
        let mut nodes = Vec::new();
        nodes.push(HierarchyNode {
            id: root,
            depth: 0,
            parent: None,
            children: 0..0,
            index: 0,
        });
        let start = nodes.len();
        for (index, child) in children {
            if tree.is_alive(child) {
                nodes.push(Self::entry(child, 1, 0, index));
            }
        }
        nodes[0].children = start..nodes.len();

        let mut max_depth = u32::from(nodes.len() > 1);
        let mut cursor = 1;
        while cursor < nodes.len() {
            let id = nodes[cursor].id;
            let depth = nodes[cursor].depth + 1;
            let start = nodes.len();
            for (index, child) in tree.effective_children(id).iter().copied().enumerate() {
                nodes.push(Self::entry(child, depth, cursor, index));
            }
            if nodes.len() > start {
                max_depth = max_depth.max(depth);
            }
            nodes[cursor].children = start..nodes.len();
            cursor += 1;
        }
        Some(Self { nodes, max_depth })
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Sibling counts are bounded by the 32-bit node index space."
    )]
    fn entry(id: NodeId, depth: u32, parent: usize, index: usize) -> HierarchyNode {
        HierarchyNode {
            id,
            depth,
            parent: Some(parent),
            children: 0..0,
            index: index as u32,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the hierarchy is empty (only for a default-constructed value).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All entries in breadth-first order.
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    /// Root entry.
    pub fn root(&self) -> Option<&HierarchyNode> {
        self.nodes.first()
    }

    /// Deepest depth present.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Node ids in breadth-first order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn breadth_first_with_contiguous_children() {
        let mut tree = Tree::new();
        let root = tree.insert(None, ());
        let a = tree.insert(Some(root), ());
        let b = tree.insert(Some(root), ());
        let a1 = tree.insert(Some(a), ());
        let b1 = tree.insert(Some(b), ());
        let b2 = tree.insert(Some(b), ());

        let h = Hierarchy::build(&tree, root).unwrap();
        assert_eq!(h.ids().collect::<Vec<_>>(), vec![root, a, b, a1, b1, b2]);
        assert_eq!(h.nodes()[0].children, 1..3);
        assert_eq!(h.nodes()[2].children, 4..6);
        assert_eq!(h.nodes()[5].parent, Some(2));
        assert_eq!(h.nodes()[5].index, 1);
        assert_eq!(h.nodes()[5].depth, 2);
        assert_eq!(h.max_depth(), 2);
        for (i, n) in h.nodes().iter().enumerate() {
            if let Some(p) = n.parent {
                assert!(p < i, "parents precede children");
            }
        }
    }

    #[test]
    fn folded_nodes_are_leaves() {
        let mut tree = Tree::new();
        let root = tree.insert(None, ());
        let a = tree.insert(Some(root), ());
        tree.insert(Some(a), ());
        tree.set_folded(a, true);
        let h = Hierarchy::build(&tree, root).unwrap();
        assert_eq!(h.len(), 2);
        assert!(h.nodes()[1].is_leaf());
        assert_eq!(h.max_depth(), 1);
    }

    #[test]
    fn missing_root_and_overridden_children() {
        let mut tree = Tree::new();
        let root = tree.insert(None, ());
        let kids: Vec<_> = (0..4).map(|_| tree.insert(Some(root), ())).collect();
        let odd = [(1, kids[1]), (3, kids[3])];
        let h = Hierarchy::build_with_children(&tree, root, odd).unwrap();
        assert_eq!(h.len(), 3);
        assert_eq!(h.nodes()[2].index, 3);

        let lone = Hierarchy::build_with_children(&tree, root, core::iter::empty()).unwrap();
        assert_eq!(lone.len(), 1);
        assert_eq!(lone.max_depth(), 0);

        tree.remove(root);
        assert!(Hierarchy::build(&tree, root).is_none());
    }
}
