// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout engine: measure, arrange, and write rectangles back onto the tree.
//!
//! A pass runs on a [`Hierarchy`] snapshot in two sweeps. The bottom-up sweep
//! (entries in reverse breadth-first order) computes each subtree's extent along
//! the cross axis. The top-down sweep hands every child a slot inside its parent's
//! extent and centers each node on its slot. Depth levels are aligned along the
//! primary axis, so every node at depth `d` shares the same leading edge.

use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashSet;
use kurbo::{Rect, Size, Vec2};

use crate::cache::RectCache;
use crate::direction::{AxisSizes, Direction};
use crate::hierarchy::Hierarchy;
use crate::options::{LayoutOptions, SIZE_PROPORTIONAL_GAP};
use crate::tree::Tree;
use crate::types::{Node, NodeId};

/// Result of a layout pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayoutSummary {
    /// Union of every rectangle computed by the pass.
    pub bounds: Rect,
    /// Number of nodes laid out.
    pub visited: usize,
    /// Direction the pass ran in.
    pub direction: Direction,
}

/// Positions the visible nodes of a tree.
///
/// The engine owns the [`RectCache`] and the list of nodes reached by the last
/// pass. It never adds or removes nodes; it only writes depth, path, resolved
/// direction and rectangle.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
    options: LayoutOptions,
    cache: RectCache,
    visited: Vec<NodeId>,
}

impl LayoutEngine {
    /// Create an engine; `options` are sanitized first.
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options: options.sanitized(),
            cache: RectCache::new(),
            visited: Vec::new(),
        }
    }

    /// Sanitized options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Replace the options. Cached extents are dropped.
    pub fn set_options(&mut self, options: LayoutOptions) {
        self.options = options.sanitized();
        self.cache.clear();
    }

    /// Extents memoized by the last pass.
    pub fn cache(&self) -> &RectCache {
        &self.cache
    }

    /// Nodes reached by the last pass, in hierarchy order.
    pub fn visited(&self) -> &[NodeId] {
        &self.visited
    }

    /// Direction a pass from `root` would use: the root's preferred direction,
    /// else the configured one.
    pub fn direction_for<T>(&self, tree: &Tree<T>, root: NodeId) -> Direction {
        tree.get(root)
            .and_then(Node::preferred_direction)
            .unwrap_or(self.options.direction)
    }

    /// Full pass sizing nodes by their measured size, else [`LayoutOptions::default_node_size`].
    ///
    /// Returns `None` and leaves the tree untouched when `root` is stale.
    pub fn layout<T>(&mut self, tree: &mut Tree<T>, root: NodeId) -> Option<LayoutSummary> {
        let fallback = self.options.default_node_size;
        self.layout_with(tree, root, |_, node| node.state().size.or(fallback))
    }

    /// Full pass with a caller-supplied size accessor.
    ///
    /// The cache is cleared first, so `sizer` is called once per visible node.
    pub fn layout_with<T>(
        &mut self,
        tree: &mut Tree<T>,
        root: NodeId,
        sizer: impl FnMut(NodeId, &Node<T>) -> Option<Size>,
    ) -> Option<LayoutSummary> {
        if !tree.is_alive(root) {
            return None;
        }
        self.cache.clear();
        self.run(tree, root, None, sizer)
    }

    /// Partial pass: recompute the layout, but write back only the nodes in `changed`.
    ///
    /// Cached extents of `changed` are invalidated; every other node keeps its
    /// cached extent and its previous rectangle.
    pub fn relayout<T>(
        &mut self,
        tree: &mut Tree<T>,
        root: NodeId,
        changed: &[NodeId],
    ) -> Option<LayoutSummary> {
        let fallback = self.options.default_node_size;
        self.relayout_with(tree, root, changed, |_, node| node.state().size.or(fallback))
    }

    /// Partial pass with a caller-supplied size accessor.
    pub fn relayout_with<T>(
        &mut self,
        tree: &mut Tree<T>,
        root: NodeId,
        changed: &[NodeId],
        sizer: impl FnMut(NodeId, &Node<T>) -> Option<Size>,
    ) -> Option<LayoutSummary> {
        if !tree.is_alive(root) {
            return None;
        }
        let scope: HashSet<NodeId> = changed.iter().copied().collect();
        for id in &scope {
            self.cache.invalidate(*id);
        }
        self.run(tree, root, Some(&scope), sizer)
    }

    fn run<T>(
        &mut self,
        tree: &mut Tree<T>,
        root: NodeId,
        scope: Option<&HashSet<NodeId>>,
        sizer: impl FnMut(NodeId, &Node<T>) -> Option<Size>,
    ) -> Option<LayoutSummary> {
        let direction = self.direction_for(tree, root);
        self.visited.clear();
        let mut pass = Pass {
            options: &self.options,
            cache: &mut self.cache,
            visited: &mut self.visited,
            scope,
            sizer,
        };
        let bounds = match direction {
            Direction::Centered => pass.centered(tree, root)?,
            linear => pass.linear(tree, root, linear)?,
        };
        let summary = LayoutSummary {
            bounds,
            visited: self.visited.len(),
            direction,
        };
        log::debug!(
            "layout pass: direction={:?} nodes={} partial={} bounds={:?}",
            direction,
            summary.visited,
            scope.map_or(0, HashSet::len),
            bounds
        );
        Some(summary)
    }
}

/// Leading edges of every hierarchy entry in the abstract frame.
pub(crate) struct Arrangement {
    pub(crate) primary: Vec<f64>,
    pub(crate) cross: Vec<f64>,
}

/// How an arrangement maps to world space.
pub(crate) struct Placement {
    /// Direction whose transform is applied.
    pub(crate) frame: Direction,
    /// Direction recorded on the nodes.
    pub(crate) resolved: Direction,
    pub(crate) offset: Vec2,
    /// Leave the hierarchy root alone (it was placed separately).
    pub(crate) skip_root: bool,
}

/// State shared by the sweeps of one pass.
pub(crate) struct Pass<'a, S> {
    pub(crate) options: &'a LayoutOptions,
    pub(crate) cache: &'a mut RectCache,
    pub(crate) visited: &'a mut Vec<NodeId>,
    pub(crate) scope: Option<&'a HashSet<NodeId>>,
    pub(crate) sizer: S,
}

impl<S> Pass<'_, S> {
    fn linear<T>(&mut self, tree: &mut Tree<T>, root: NodeId, direction: Direction) -> Option<Rect>
    where
        S: FnMut(NodeId, &Node<T>) -> Option<Size>,
    {
        let h = Hierarchy::build(tree, root)?;
        let sizes = self.measure(tree, &h);
        let spacing = direction.axis_sizes(self.options.level_spacing, self.options.sibling_spacing);
        let arrangement = arrange(&h, &sizes, direction, spacing);
        Some(self.commit(
            tree,
            &h,
            &sizes,
            &arrangement,
            &Placement {
                frame: direction,
                resolved: direction,
                offset: Vec2::ZERO,
                skip_root: false,
            },
        ))
    }

    /// Natural extent of every entry, memoized in the cache.
    pub(crate) fn measure<T>(&mut self, tree: &Tree<T>, h: &Hierarchy) -> Vec<Size>
    where
        S: FnMut(NodeId, &Node<T>) -> Option<Size>,
    {
        let options = self.options;
        let mut sizes = Vec::with_capacity(h.len());
        for entry in h.nodes() {
            let node = tree.node(entry.id);
            let sizer = &mut self.sizer;
            let size = self
                .cache
                .get_or_insert_with(entry.id, || options.natural_size(sizer(entry.id, node)));
            sizes.push(size);
        }
        sizes
    }

    /// Whether this pass may write to `id`.
    pub(crate) fn in_scope(&self, id: NodeId) -> bool {
        self.scope.is_none_or(|s| s.contains(&id))
    }

    /// Transform, record, and write back an arrangement. Returns its bounds.
    pub(crate) fn commit<T>(
        &mut self,
        tree: &mut Tree<T>,
        h: &Hierarchy,
        sizes: &[Size],
        arrangement: &Arrangement,
        placement: &Placement,
    ) -> Rect {
        let mut paths: Vec<Vec<u32>> = Vec::with_capacity(h.len());
        let mut bounds: Option<Rect> = None;
        for (i, entry) in h.nodes().iter().enumerate() {
            let path = match entry.parent {
                Some(p) => {
                    let mut path = paths[p].clone();
                    path.push(entry.index);
                    path
                }
                None => Vec::new(),
            };
            let rect = placement.frame.transform(
                arrangement.primary[i],
                arrangement.cross[i],
                sizes[i],
                Some(placement.resolved),
            ) + placement.offset;
            bounds = Some(bounds.map_or(rect, |b| b.union(rect)));

            if !(placement.skip_root && i == 0) {
                self.visited.push(entry.id);
                if self.in_scope(entry.id) {
                    let node = tree.node_mut(entry.id);
                    node.state.rect = rect;
                    node.state.depth = entry.depth;
                    node.state.path.clone_from(&path);
                    node.direction = Some(placement.resolved);
                }
            }
            paths.push(path);
        }
        bounds.unwrap_or(Rect::ZERO)
    }
}

/// Compute leading edges for every entry of `h`.
///
/// `axis` selects which size component runs along the primary axis; only its
/// orientation matters here.
pub(crate) fn arrange(
    h: &Hierarchy,
    sizes: &[Size],
    axis: Direction,
    spacing: AxisSizes,
) -> Arrangement {
    let n = h.len();
    let nodes = h.nodes();

    // Depth levels share a leading edge on the primary axis.
    let mut spans = vec![0.0_f64; h.max_depth() as usize + 1];
    for (entry, size) in nodes.iter().zip(sizes) {
        let d = entry.depth as usize;
        spans[d] = spans[d].max(axis.primary_len(*size));
    }
    let mut starts = Vec::with_capacity(spans.len());
    let mut acc = 0.0;
    for span in &spans {
        starts.push(acc);
        acc += span + spacing.primary;
    }

    let gap = |a: usize, b: usize| {
        let larger = axis.cross_len(sizes[a]).max(axis.cross_len(sizes[b]));
        spacing.cross.max(SIZE_PROPORTIONAL_GAP * larger)
    };

    // Bottom-up: subtree extents along the cross axis.
    let mut extent = vec![0.0_f64; n];
    let mut inner = vec![0.0_f64; n];
    for i in (0..n).rev() {
        let children = nodes[i].children.clone();
        let mut span = 0.0;
        for c in children.clone() {
            if c > children.start {
                span += gap(c - 1, c);
            }
            span += extent[c];
        }
        inner[i] = span;
        extent[i] = axis.cross_len(sizes[i]).max(span);
    }

    // Top-down: slots, then centers.
    let mut slot = vec![0.0_f64; n];
    let mut primary = vec![0.0_f64; n];
    let mut cross = vec![0.0_f64; n];
    for i in 0..n {
        let entry = &nodes[i];
        primary[i] = starts[entry.depth as usize];
        cross[i] = slot[i] + (extent[i] - axis.cross_len(sizes[i])) / 2.0;
        let mut cursor = slot[i] + (extent[i] - inner[i]) / 2.0;
        for c in entry.children.clone() {
            if c > entry.children.start {
                cursor += gap(c - 1, c);
            }
            slot[c] = cursor;
            cursor += extent[c];
        }
    }

    Arrangement { primary, cross }
}
