// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node arena: structure, folding, and traversal helpers.

use alloc::vec;
use alloc::vec::Vec;
use kurbo::Size;

use crate::direction::Direction;
use crate::types::{Node, NodeFlags, NodeId};

/// Arena holding the nodes of one or more trees.
///
/// The tree owns node lifetimes. Layout only decorates nodes with depth, path,
/// resolved direction, and rectangles.
pub struct Tree<T> {
    nodes: Vec<Option<Node<T>>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .finish_non_exhaustive()
    }
}

impl<T> Tree<T> {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Whether the tree has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    pub fn insert(&mut self, parent: Option<NodeId>, content: T) -> NodeId {
        let id = self.alloc(content);
        if let Some(p) = parent.filter(|p| self.is_alive(*p)) {
            self.node_mut(p).children.push(id);
            self.node_mut(id).parent = Some(p);
        }
        id
    }

    /// Insert a new node under `parent` at sibling `position`.
    ///
    /// Positions past the end append.
    pub fn insert_at(&mut self, parent: NodeId, position: usize, content: T) -> Option<NodeId> {
        if !self.is_alive(parent) {
            return None;
        }
        let id = self.alloc(content);
        let siblings = &mut self.node_mut(parent).children;
        let position = position.min(siblings.len());
        siblings.insert(position, id);
        self.node_mut(id).parent = Some(parent);
        Some(id)
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes[cur.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(cur.idx());
            }
        }
    }

    /// Move `id` to the end of `new_parent`'s children (or detach it when `None`).
    ///
    /// Returns `false` and leaves the tree untouched when either handle is stale or
    /// when `new_parent` lies inside the subtree of `id`.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || p == id || self.is_ancestor(id, p))
        {
            return false;
        }
        if let Some(old) = self.node(id).parent {
            self.node_mut(old).children.retain(|c| *c != id);
        }
        self.node_mut(id).parent = new_parent;
        if let Some(p) = new_parent {
            self.node_mut(p).children.push(id);
        }
        true
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Access a live node.
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    /// Access a live node's content mutably.
    pub fn content_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_opt_mut(id).map(|n| &mut n.content)
    }

    /// Parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Children of `id` in sibling order (empty for stale ids).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Children of `id` that participate in layout (empty when folded).
    pub fn effective_children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.effective_children()).unwrap_or(&[])
    }

    /// Record a measured size for `id`.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        if let Some(n) = self.node_opt_mut(id) {
            n.state.size = Some(size);
        }
    }

    /// Request a layout direction for `id`. Only honored when `id` is the layout root.
    pub fn set_preferred_direction(&mut self, id: NodeId, direction: Option<Direction>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.preferred_direction = direction;
        }
    }

    /// Direction resolved for `id` by the last layout pass.
    pub fn resolved_direction(&self, id: NodeId) -> Option<Direction> {
        self.get(id)?.direction
    }

    /// Whether `id` is folded.
    pub fn is_folded(&self, id: NodeId) -> bool {
        self.get(id).map(|n| n.is_folded()).unwrap_or(false)
    }

    /// Fold or unfold a node. Children are kept; only their participation in layout changes.
    pub fn set_folded(&mut self, id: NodeId, folded: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags.set(NodeFlags::FOLDED, folded);
        }
    }

    /// Toggle the fold state of `id`.
    ///
    /// With `recursive`, the new state is applied to every node of the subtree that has children.
    pub fn toggle_fold(&mut self, id: NodeId, recursive: bool) {
        let Some(node) = self.get(id) else {
            return;
        };
        let folded = !node.is_folded();
        if !recursive {
            self.set_folded(id, folded);
            return;
        }
        for d in self.descendants(id) {
            let n = self.node_mut(d);
            if d == id || !n.children.is_empty() {
                n.flags.set(NodeFlags::FOLDED, folded);
            }
        }
    }

    /// Fold every node of the subtree at depth `level` or deeper that has children,
    /// and unfold everything above.
    ///
    /// This is the "initially expanded levels" knob: `level == 0` shows only the root.
    pub fn fold_below(&mut self, root: NodeId, level: u32) {
        if !self.is_alive(root) {
            return;
        }
        let mut stack = vec![(root, 0_u32)];
        while let Some((id, depth)) = stack.pop() {
            let n = self.node_mut(id);
            n.flags.set(NodeFlags::FOLDED, depth >= level && !n.children.is_empty());
            stack.extend(n.children.iter().map(|c| (*c, depth + 1)));
        }
    }

    /// All nodes of the subtree rooted at `root` in pre-order, folded subtrees included.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    /// First node of the subtree in pre-order matching `predicate`.
    pub fn find(&self, root: NodeId, mut predicate: impl FnMut(&Node<T>) -> bool) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|id| predicate(self.node(*id)))
    }

    /// Parent→child edges that participate in layout below `root`.
    pub fn edges(&self, root: NodeId) -> Vec<(NodeId, NodeId)> {
        let mut out = Vec::new();
        if !self.is_alive(root) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            for child in self.node(id).effective_children().iter().copied() {
                out.push((id, child));
                stack.push(child);
            }
        }
        out
    }

    /// Path from the tree root down to `id` (inclusive).
    pub fn path_to_root(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        loop {
            out.push(id);
            match self.node(id).parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent(p);
        }
        false
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn alloc(&mut self, content: T) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, content));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, content)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        NodeId::new(idx as u32, generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree<&'static str>, NodeId, [NodeId; 4]) {
        let mut tree = Tree::new();
        let root = tree.insert(None, "root");
        let a = tree.insert(Some(root), "a");
        let b = tree.insert(Some(root), "b");
        let a1 = tree.insert(Some(a), "a1");
        let a2 = tree.insert(Some(a), "a2");
        (tree, root, [a, b, a1, a2])
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let (mut tree, root, [a, _, a1, a2]) = sample();
        assert_eq!(tree.len(), 5);
        tree.remove(a);
        assert!(!tree.is_alive(a));
        assert!(!tree.is_alive(a1), "subtree goes with its root");
        assert!(!tree.is_alive(a2));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.children(root).len(), 1);

        let c = tree.insert(Some(root), "c");
        assert!(tree.is_alive(c));
        assert!(!tree.is_alive(a));
        if a.0 == c.0 || a1.0 == c.0 || a2.0 == c.0 {
            assert!(c.1 > 1, "generation must increase on reuse");
        }
    }

    #[test]
    fn insert_at_respects_position() {
        let (mut tree, root, [a, b, ..]) = sample();
        let first = tree.insert_at(root, 0, "first").unwrap();
        let last = tree.insert_at(root, 99, "last").unwrap();
        assert_eq!(tree.children(root), &[first, a, b, last]);
        assert_eq!(tree.parent(first), Some(root));
    }

    #[test]
    fn reparent_refuses_cycles() {
        let (mut tree, root, [a, b, a1, _]) = sample();
        assert!(!tree.reparent(a, Some(a1)), "cannot move under own descendant");
        assert!(!tree.reparent(a, Some(a)));
        assert!(tree.reparent(b, Some(a1)));
        assert_eq!(tree.path_to_root(b), vec![root, a, a1, b]);
        assert!(tree.is_ancestor(a, b));
    }

    #[test]
    fn fold_hides_children_but_keeps_them() {
        let (mut tree, root, [a, _, a1, a2]) = sample();
        tree.set_folded(a, true);
        assert!(tree.effective_children(a).is_empty());
        assert_eq!(tree.children(a), &[a1, a2]);
        assert_eq!(tree.edges(root).len(), 2);
        tree.toggle_fold(a, false);
        assert_eq!(tree.edges(root).len(), 4);
    }

    #[test]
    fn recursive_toggle_skips_leaves() {
        let (mut tree, root, [a, b, a1, _]) = sample();
        tree.toggle_fold(root, true);
        assert!(tree.is_folded(root));
        assert!(tree.is_folded(a));
        assert!(!tree.is_folded(b), "leaves are never folded recursively");
        assert!(!tree.is_folded(a1));
        tree.toggle_fold(root, true);
        assert!(!tree.is_folded(root));
        assert!(!tree.is_folded(a));
    }

    #[test]
    fn fold_below_level() {
        let (mut tree, root, [a, ..]) = sample();
        tree.fold_below(root, 1);
        assert!(!tree.is_folded(root));
        assert!(tree.is_folded(a));
        tree.fold_below(root, 0);
        assert!(tree.is_folded(root));
        assert_eq!(tree.edges(root).len(), 0);
    }

    #[test]
    fn descendants_are_preorder_and_find_works() {
        let (tree, root, [a, b, a1, a2]) = sample();
        assert_eq!(tree.descendants(root), vec![root, a, a1, a2, b]);
        assert_eq!(tree.find(root, |n| n.content == "a2"), Some(a2));
        assert_eq!(tree.find(root, |n| n.content == "zzz"), None);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let (mut tree, root, [a, ..]) = sample();
        tree.remove(a);
        tree.set_folded(a, true);
        tree.set_size(a, Size::new(1.0, 1.0));
        assert!(tree.get(a).is_none());
        assert!(tree.children(a).is_empty());
        assert!(tree.insert_at(a, 0, "x").is_none());
        assert!(tree.descendants(a).is_empty());
        assert_eq!(tree.edges(root).len(), 1);
    }
}
