// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static packed R-tree built with Sort-Tile-Recursive (STR) bulk loading.
//!
//! The tree is rebuilt from scratch after every layout pass and only queried in
//! between, so it has no insert or remove. Items are reordered so that every leaf
//! owns a contiguous run of them, and every branch a contiguous run of nodes.

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::ops::Range;
use kurbo::{Point, Rect};

/// Maximum fan-out of leaves and branches.
pub const MAX_CHILDREN: usize = 8;

#[derive(Clone, Debug)]
enum Children {
    Items(Range<usize>),
    Nodes(Range<usize>),
}

#[derive(Clone, Debug)]
struct PackedNode {
    bbox: Rect,
    children: Children,
}

/// Read-only spatial index over rectangles with `Copy` payloads.
#[derive(Clone, Debug)]
pub struct PackedRTree<P> {
    nodes: Vec<PackedNode>,
    items: Vec<(Rect, P)>,
    root: Option<usize>,
}

impl<P> Default for PackedRTree<P> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            items: Vec::new(),
            root: None,
        }
    }
}

/// Closed-interval overlap: touching rectangles count as intersecting.
fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

fn union_all(mut rects: impl Iterator<Item = Rect>) -> Rect {
    let first = rects.next().unwrap_or(Rect::ZERO);
    rects.fold(first, |acc, r| acc.union(r))
}

fn by_center_x(a: &Rect, b: &Rect) -> Ordering {
    a.center()
        .x
        .partial_cmp(&b.center().x)
        .unwrap_or(Ordering::Equal)
}

fn by_center_y(a: &Rect, b: &Rect) -> Ordering {
    a.center()
        .y
        .partial_cmp(&b.center().y)
        .unwrap_or(Ordering::Equal)
}

/// Reorder `entries` into STR order: vertical slices by x-centroid, then y-centroid
/// within each slice. Slice sizes are multiples of [`MAX_CHILDREN`], so consecutive
/// chunks of `MAX_CHILDREN` never straddle two slices.
fn str_sort<T>(entries: &mut [T], bbox: impl Fn(&T) -> Rect) {
    let n = entries.len();
    let groups = n.div_ceil(MAX_CHILDREN);
    let mut slices = 1_usize;
    while slices * slices < groups {
        slices += 1;
    }
    let slice_size = n.div_ceil(slices).div_ceil(MAX_CHILDREN) * MAX_CHILDREN;
    entries.sort_by(|a, b| by_center_x(&bbox(a), &bbox(b)));
    for slice in entries.chunks_mut(slice_size.max(1)) {
        slice.sort_by(|a, b| by_center_y(&bbox(a), &bbox(b)));
    }
}

impl<P: Copy> PackedRTree<P> {
    /// Build an index over `items`.
    pub fn bulk_load(items: impl IntoIterator<Item = (Rect, P)>) -> Self {
        let mut items: Vec<(Rect, P)> = items.into_iter().collect();
        if items.is_empty() {
            return Self::default();
        }
        str_sort(&mut items, |(r, _)| *r);

        let mut nodes = Vec::with_capacity(items.len().div_ceil(MAX_CHILDREN) * 2);
        for (i, chunk) in items.chunks(MAX_CHILDREN).enumerate() {
            let start = i * MAX_CHILDREN;
            nodes.push(PackedNode {
                bbox: union_all(chunk.iter().map(|(r, _)| *r)),
                children: Children::Items(start..start + chunk.len()),
            });
        }

        // Promote until a single root remains.
        let mut level = 0..nodes.len();
        while level.len() > 1 {
            str_sort(&mut nodes[level.clone()], |n| n.bbox);
            let next_start = nodes.len();
            let mut start = level.start;
            while start < level.end {
                let end = (start + MAX_CHILDREN).min(level.end);
                let bbox = union_all(nodes[start..end].iter().map(|n| n.bbox));
                nodes.push(PackedNode {
                    bbox,
                    children: Children::Nodes(start..end),
                });
                start = end;
            }
            level = next_start..nodes.len();
        }

        Self {
            root: Some(level.start),
            nodes,
            items,
        }
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the index holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bounding box of all items.
    pub fn bounds(&self) -> Option<Rect> {
        self.root.map(|r| self.nodes[r].bbox)
    }

    /// Items in storage (STR) order.
    pub fn items(&self) -> &[(Rect, P)] {
        &self.items
    }

    /// Payloads of items intersecting `query` (boundaries inclusive), in no particular order.
    pub fn query_rect(&self, query: Rect) -> Vec<P> {
        let mut out = Vec::new();
        self.visit(&query, |_, p| out.push(p));
        out
    }

    /// Payloads of items containing `pt` (boundaries inclusive).
    pub fn query_point(&self, pt: Point) -> Vec<P> {
        self.query_rect(Rect::from_points(pt, pt))
    }

    /// Call `f` for every item intersecting `query`.
    pub fn visit(&self, query: &Rect, mut f: impl FnMut(&Rect, P)) {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            let node = &self.nodes[i];
            if !overlaps(&node.bbox, query) {
                continue;
            }
            match &node.children {
                Children::Items(range) => {
                    for (rect, payload) in &self.items[range.clone()] {
                        if overlaps(rect, query) {
                            f(rect, *payload);
                        }
                    }
                }
                Children::Nodes(range) => stack.extend(range.clone()),
            }
        }
    }
}
