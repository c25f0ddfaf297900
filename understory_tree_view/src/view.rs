// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`TreeView`]: a tree together with its layout engine, culler, and scheduler.

use alloc::vec::Vec;
use core::time::Duration;
use hashbrown::HashSet;
use kurbo::{Rect, Size};
use understory_tree_layout::{LayoutEngine, LayoutOptions, LayoutSummary, NodeId, Tree};

use crate::cull::{CullOptions, ViewportCuller};
use crate::scheduler::{Flush, RelayoutScheduler, SchedulerConfig};

/// Configuration for a [`TreeView`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewOptions {
    /// Layout options.
    pub layout: LayoutOptions,
    /// Culling margins.
    pub cull: CullOptions,
    /// Re-layout scheduling.
    pub scheduler: SchedulerConfig,
}

/// Work list produced by a partial flush.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialUpdate {
    /// Summary of the pass.
    pub summary: LayoutSummary,
    /// Nodes whose rectangles were rewritten.
    pub nodes: Vec<NodeId>,
    /// Edges touching those nodes.
    pub edges: Vec<(NodeId, NodeId)>,
}

/// Outcome of applying a flush.
#[derive(Clone, Debug, PartialEq)]
pub enum Update {
    /// Every rectangle was rewritten.
    Full(LayoutSummary),
    /// Only the listed nodes were rewritten.
    Partial(PartialUpdate),
}

/// A tree plus everything needed to keep its layout current.
///
/// Size reports and fold toggles are queued and applied on [`TreeView::poll`];
/// [`TreeView::layout`] runs a full pass immediately.
#[derive(Debug)]
pub struct TreeView<T> {
    tree: Tree<T>,
    root: Option<NodeId>,
    engine: LayoutEngine,
    culler: ViewportCuller,
    scheduler: RelayoutScheduler,
}

impl<T> TreeView<T> {
    /// Wrap `tree`. No root is set yet.
    pub fn new(tree: Tree<T>, options: ViewOptions) -> Self {
        Self {
            tree,
            root: None,
            engine: LayoutEngine::new(options.layout),
            culler: ViewportCuller::new(options.cull),
            scheduler: RelayoutScheduler::new(options.scheduler),
        }
    }

    /// The tree.
    pub fn tree(&self) -> &Tree<T> {
        &self.tree
    }

    /// The tree, mutably. Structural edits made here should be followed by
    /// [`TreeView::note_structure`] or [`TreeView::layout`].
    pub fn tree_mut(&mut self) -> &mut Tree<T> {
        &mut self.tree
    }

    /// Layout root.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Set the layout root. The next flush is full.
    pub fn set_root(&mut self, root: NodeId, now: Duration) {
        self.root = Some(root);
        self.scheduler.note_structure(root, now);
    }

    /// Replace the layout options. The next flush is full.
    pub fn set_layout_options(&mut self, options: LayoutOptions, now: Duration) {
        self.engine.set_options(options);
        if let Some(root) = self.root {
            self.scheduler.note_structure(root, now);
        }
    }

    /// Insert a node under `parent` and queue a full pass.
    pub fn insert(&mut self, parent: NodeId, content: T, now: Duration) -> NodeId {
        let id = self.tree.insert(Some(parent), content);
        self.scheduler.note_structure(id, now);
        id
    }

    /// Remove `id` and its subtree.
    ///
    /// When the subtree held the layout root, the view is left without a root and
    /// its culler is emptied; otherwise a full pass is queued.
    pub fn remove(&mut self, id: NodeId, now: Duration) {
        if !self.tree.is_alive(id) {
            return;
        }
        let parent = self.tree.parent(id);
        for gone in self.tree.descendants(id) {
            self.scheduler.forget(gone);
        }
        self.tree.remove(id);
        if let Some(root) = self.root
            && !self.tree.is_alive(root)
        {
            self.root = None;
            self.scheduler.cancel();
            self.culler.clear();
            return;
        }
        self.culler.prune(&self.tree);
        if let Some(parent) = parent {
            self.scheduler.note_structure(parent, now);
        }
    }

    /// Record an arbitrary structural edit made through [`TreeView::tree_mut`].
    pub fn note_structure(&mut self, id: NodeId, now: Duration) {
        self.scheduler.note_structure(id, now);
    }

    /// Report a measured size for `id`.
    ///
    /// Returns `false` for stale ids, non-finite sizes, and changes within the
    /// scheduler's epsilon.
    pub fn on_size_change(&mut self, id: NodeId, width: f64, height: f64, now: Duration) -> bool {
        let size = Size::new(width, height);
        if !self.tree.is_alive(id) || !size.is_finite() {
            return false;
        }
        if !self.scheduler.note_size(id, size, now) {
            return false;
        }
        self.tree.set_size(id, size);
        true
    }

    /// Fold or unfold `id`.
    pub fn set_folded(&mut self, id: NodeId, folded: bool, now: Duration) {
        if self.tree.is_alive(id) && self.tree.is_folded(id) != folded {
            self.tree.set_folded(id, folded);
            self.scheduler.note_fold(id, now);
        }
    }

    /// Toggle the fold state of `id` (and its subtree when `recursive`).
    pub fn toggle_fold(&mut self, id: NodeId, recursive: bool, now: Duration) {
        if self.tree.is_alive(id) {
            self.tree.toggle_fold(id, recursive);
            self.scheduler.note_fold(id, now);
        }
    }

    /// Run a full pass now and drop any queued work.
    ///
    /// Recorded sizes of nodes that no longer exist are dropped as well, which
    /// covers removals made through [`TreeView::tree_mut`].
    /// Returns `None` when there is no live root.
    pub fn layout(&mut self) -> Option<LayoutSummary> {
        let root = self.root?;
        let summary = self.engine.layout(&mut self.tree, root)?;
        self.culler.rebuild(&self.tree, self.engine.visited());
        self.scheduler.cancel();
        let tree = &self.tree;
        self.scheduler.retain(|id| tree.is_alive(id));
        Some(summary)
    }

    /// Apply queued work if it is due.
    pub fn poll(&mut self, now: Duration) -> Option<Update> {
        let flush = self.scheduler.poll(now, self.culler.len())?;
        self.apply(flush)
    }

    /// Apply queued work now.
    pub fn flush(&mut self) -> Option<Update> {
        let flush = self.scheduler.flush(self.culler.len())?;
        self.apply(flush)
    }

    fn apply(&mut self, flush: Flush) -> Option<Update> {
        match flush {
            Flush::Full => self.layout().map(Update::Full),
            Flush::Partial(changed) => {
                let root = self.root?;
                let nodes: Vec<NodeId> = changed
                    .into_iter()
                    .filter(|id| self.culler.contains(*id))
                    .collect();
                let summary = self.engine.relayout(&mut self.tree, root, &nodes)?;
                self.culler.rebuild(&self.tree, self.engine.visited());
                let edges = self.edges_touching(&nodes);
                Some(Update::Partial(PartialUpdate {
                    summary,
                    nodes,
                    edges,
                }))
            }
        }
    }

    fn edges_touching(&self, nodes: &[NodeId]) -> Vec<(NodeId, NodeId)> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        let mut push = |edge: (NodeId, NodeId)| {
            if seen.insert(edge) {
                edges.push(edge);
            }
        };
        for id in nodes {
            if let Some(parent) = self.tree.parent(*id)
                && self.culler.contains(parent)
            {
                push((parent, *id));
            }
            for child in self.tree.effective_children(*id) {
                push((*id, *child));
            }
        }
        edges
    }

    /// Nodes of the last pass near `viewport`.
    pub fn find_visible(&self, viewport: Rect) -> Vec<NodeId> {
        self.culler.find_visible(viewport)
    }

    /// Edges of the last pass with at least one end near `viewport`.
    pub fn find_visible_edges(&self, viewport: Rect) -> Vec<(NodeId, NodeId)> {
        self.culler.find_visible_edges(&self.tree, viewport)
    }

    /// Layout engine.
    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    /// Viewport culler.
    pub fn culler(&self) -> &ViewportCuller {
        &self.culler
    }

    /// Re-layout scheduler.
    pub fn scheduler(&self) -> &RelayoutScheduler {
        &self.scheduler
    }
}
