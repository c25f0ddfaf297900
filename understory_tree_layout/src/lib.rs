// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tree_layout --heading-base-level=0

//! Understory Tree Layout: collision-free placement of hierarchical trees.
//!
//! This crate positions the nodes of a mind-map style tree in 2D:
//!
//! - A node arena ([`Tree`]) with generational [`NodeId`]s, folding, and editing helpers.
//! - Four linear directions and one [`Direction::Centered`] mode that fans the root's
//!   children out to both sides.
//! - A [`LayoutEngine`] that measures nodes through a caller-supplied size accessor,
//!   memoizes extents in a [`RectCache`], and writes a [`kurbo::Rect`] onto every visible node.
//!
//! Nodes may report their sizes late (after their content renders). Unmeasured nodes
//! are treated as zero-width and `max_node_height` tall until a size arrives.
//! Partial passes ([`LayoutEngine::relayout`]) recompute the layout but copy out only
//! the rectangles of nodes that changed.
//!
//! Folded nodes keep their children in the tree; layout simply treats them as leaves.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Size;
//! use understory_tree_layout::{Direction, LayoutEngine, LayoutOptions, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, "root");
//! let a = tree.insert(Some(root), "a");
//! let b = tree.insert(Some(root), "b");
//! for id in [root, a, b] {
//!     tree.set_size(id, Size::new(100.0, 30.0));
//! }
//!
//! let mut engine = LayoutEngine::new(LayoutOptions {
//!     direction: Direction::TopToBottom,
//!     level_spacing: 20.0,
//!     sibling_spacing: 10.0,
//!     ..Default::default()
//! });
//! let summary = engine.layout(&mut tree, root).unwrap();
//! assert_eq!(summary.visited, 3);
//!
//! // Children sit one level below the root, ten units apart.
//! let (ra, rb) = (tree.get(a).unwrap().rect(), tree.get(b).unwrap().rect());
//! assert_eq!(ra.y0, 50.0);
//! assert_eq!(rb.x0 - ra.x1, 10.0);
//! // The root is centered over them.
//! assert_eq!(tree.get(root).unwrap().rect().center().x, (ra.x0 + rb.x1) / 2.0);
//! ```
//!
//! Folding hides a subtree without touching it:
//!
//! ```rust
//! use understory_tree_layout::{LayoutEngine, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, ());
//! let child = tree.insert(Some(root), ());
//! tree.insert(Some(child), ());
//!
//! let mut engine = LayoutEngine::default();
//! assert_eq!(engine.layout(&mut tree, root).unwrap().visited, 3);
//! tree.set_folded(child, true);
//! assert_eq!(engine.layout(&mut tree, root).unwrap().visited, 2);
//! assert_eq!(tree.children(child).len(), 1);
//! ```
//!
//! ## Coordinates
//!
//! Left-to-right and top-to-bottom layouts grow towards positive coordinates from
//! the origin. Their reversed counterparts mirror the whole layout across the origin.
//! Centered layouts pin the root at `(0, 0)`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cache;
mod centered;
mod direction;
mod engine;
mod hierarchy;
mod options;
mod tree;
mod types;

pub use cache::RectCache;
pub use direction::{AxisSizes, Direction};
pub use engine::{LayoutEngine, LayoutSummary};
pub use hierarchy::{Hierarchy, HierarchyNode};
pub use options::{DEFAULT_MAX_NODE_HEIGHT, DEFAULT_MIN_SPACING, LayoutOptions, SIZE_PROPORTIONAL_GAP};
pub use tree::Tree;
pub use types::{LayoutState, Node, NodeFlags, NodeId};
