// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tree_view --heading-base-level=0

//! Understory Tree View: viewport culling and incremental re-layout for laid-out trees.
//!
//! This crate sits between [`understory_tree_layout`] and a renderer:
//!
//! - [`PackedRTree`]: a static R-tree bulk-loaded with Sort-Tile-Recursive packing.
//! - [`ViewportCuller`]: indexes the rectangles of the last layout pass and reports
//!   the nodes and edges near a viewport.
//! - [`RelayoutScheduler`]: debounces size and fold notifications and decides between
//!   full and partial passes.
//! - [`TreeView`]: owns a tree, an engine, a culler, and a scheduler, and wires them together.
//!
//! Nothing here touches a clock. Callers pass `now` as a [`core::time::Duration`]
//! since an epoch of their choosing and call [`TreeView::poll`] once per frame.
//!
//! # Example
//!
//! ```rust
//! use core::time::Duration;
//! use kurbo::Rect;
//! use understory_tree_layout::Tree;
//! use understory_tree_view::{TreeView, Update, ViewOptions};
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, "root");
//! let child = tree.insert(Some(root), "child");
//!
//! let mut view = TreeView::new(tree, ViewOptions::default());
//! view.set_root(root, Duration::ZERO);
//! view.on_size_change(root, 80.0, 24.0, Duration::from_millis(1));
//! view.on_size_change(child, 60.0, 24.0, Duration::from_millis(2));
//!
//! // Still inside the debounce window.
//! assert!(view.poll(Duration::from_millis(10)).is_none());
//! // Quiet long enough: the first flush is always full.
//! assert!(matches!(view.poll(Duration::from_millis(60)), Some(Update::Full(_))));
//!
//! let visible = view.find_visible(Rect::new(0.0, 0.0, 200.0, 100.0));
//! assert_eq!(visible, vec![root, child]);
//! ```

#![no_std]

extern crate alloc;

mod cull;
mod index;
mod scheduler;
mod view;

pub use cull::{CullOptions, ViewportCuller};
pub use index::{MAX_CHILDREN, PackedRTree};
pub use scheduler::{ChangeKind, Flush, RelayoutScheduler, SchedulerConfig, plan};
pub use view::{PartialUpdate, TreeView, Update, ViewOptions};
