// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport culling over the rectangles of the last layout pass.

use alloc::vec::Vec;
use hashbrown::HashSet;
use kurbo::Rect;
use understory_tree_layout::{NodeId, Tree};

use crate::index::PackedRTree;

/// Culling margins.
#[derive(Clone, Debug, PartialEq)]
pub struct CullOptions {
    /// Each node rectangle is grown by this much on every side before testing.
    pub node_margin: f64,
    /// Amount [`ViewportCuller::viewport_with_padding`] grows a camera viewport by.
    pub viewport_padding: f64,
}

impl Default for CullOptions {
    fn default() -> Self {
        Self {
            node_margin: 20.0,
            viewport_padding: 100.0,
        }
    }
}

/// Answers "which nodes and edges touch this viewport" for one layout pass.
///
/// Rebuilt wholesale after each pass. Results come back in the order the nodes
/// were laid out (breadth-first, parents before children).
#[derive(Clone, Debug, Default)]
pub struct ViewportCuller {
    options: CullOptions,
    index: PackedRTree<u32>,
    order: Vec<NodeId>,
    members: HashSet<NodeId>,
}

impl ViewportCuller {
    /// Create an empty culler.
    pub fn new(options: CullOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Culling options.
    pub fn options(&self) -> &CullOptions {
        &self.options
    }

    /// Rebuild the index from the rectangles of `laid_out`, in that order.
    ///
    /// Stale ids are skipped.
    pub fn rebuild<T>(&mut self, tree: &Tree<T>, laid_out: &[NodeId]) {
        let margin = self.options.node_margin;
        self.order.clear();
        self.members.clear();
        let mut items = Vec::with_capacity(laid_out.len());
        for id in laid_out {
            let Some(node) = tree.get(*id) else {
                continue;
            };
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Node counts are bounded by the 32-bit NodeId index space."
            )]
            let slot = self.order.len() as u32;
            items.push((node.rect().inflate(margin, margin), slot));
            self.order.push(*id);
            self.members.insert(*id);
        }
        self.index = PackedRTree::bulk_load(items);
        log::trace!("culler rebuilt with {} nodes", self.order.len());
    }

    /// Drop nodes that are no longer alive in `tree`, keeping the rest in order.
    pub fn prune<T>(&mut self, tree: &Tree<T>) {
        if self.order.iter().all(|id| tree.is_alive(*id)) {
            return;
        }
        let order = core::mem::take(&mut self.order);
        self.rebuild(tree, &order);
    }

    /// Forget every node.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
        self.index = PackedRTree::default();
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `id` took part in the last pass.
    pub fn contains(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }

    /// `viewport` grown by [`CullOptions::viewport_padding`].
    pub fn viewport_with_padding(&self, viewport: Rect) -> Rect {
        let pad = self.options.viewport_padding;
        viewport.inflate(pad, pad)
    }

    /// Nodes whose margin-expanded rectangle intersects `viewport`.
    pub fn find_visible(&self, viewport: Rect) -> Vec<NodeId> {
        let mut slots = self.index.query_rect(viewport);
        slots.sort_unstable();
        slots.into_iter().map(|s| self.order[s as usize]).collect()
    }

    /// Parent→child edges with at least one visible end.
    ///
    /// Only edges between two nodes of the last pass are reported, so the layout
    /// root's link to its own parent never shows up.
    pub fn find_visible_edges<T>(&self, tree: &Tree<T>, viewport: Rect) -> Vec<(NodeId, NodeId)> {
        let visible: HashSet<NodeId> = self.find_visible(viewport).into_iter().collect();
        self.order
            .iter()
            .filter_map(|id| {
                let parent = tree.parent(*id)?;
                let edge = self.members.contains(&parent)
                    && (visible.contains(id) || visible.contains(&parent));
                edge.then_some((parent, *id))
            })
            .collect()
    }
}
