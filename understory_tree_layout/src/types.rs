// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the layout tree: node identifiers, flags, and per-node layout state.

use alloc::vec::Vec;
use kurbo::{Rect, Size};

use crate::direction::Direction;

/// Identifier for a node in the tree.
///
/// This is a small, copyable handle that stays stable across layout passes and
/// doubles as the node's layout key (the rectangle cache and the re-layout
/// scheduler are keyed by it).
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Tree::is_alive`](crate::Tree::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-node flags that influence layout.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is folded: its children stay in the tree but are excluded from layout.
        const FOLDED = 0b0000_0001;
    }
}

/// Layout state stored on every node.
///
/// `size` is an input supplied by the host (usually a measured size).
/// Everything else is written by the layout engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutState {
    /// Depth below the layout root (root = 0).
    pub depth: u32,
    /// Sibling indices from the layout root down to this node.
    ///
    /// An ancestor's path is always a strict prefix of its descendants' paths.
    pub path: Vec<u32>,
    /// Measured size, if the host has reported one.
    pub size: Option<Size>,
    /// Computed rectangle; the output of a layout pass.
    pub rect: Rect,
}

impl LayoutState {
    /// Whether `self` is an ancestor of `other` according to their paths.
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.path.len() < other.path.len() && other.path.starts_with(&self.path)
    }
}

/// A node of the layout tree.
#[derive(Clone, Debug)]
pub struct Node<T> {
    pub(crate) generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) flags: NodeFlags,
    pub(crate) preferred_direction: Option<Direction>,
    pub(crate) direction: Option<Direction>,
    pub(crate) state: LayoutState,
    /// Host-owned content; opaque to layout.
    pub content: T,
}

impl<T> Node<T> {
    pub(crate) fn new(generation: u32, content: T) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            flags: NodeFlags::default(),
            preferred_direction: None,
            direction: None,
            state: LayoutState::default(),
            content,
        }
    }

    /// Parent of this node, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in sibling order, including those hidden by folding.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Children that participate in layout: none when folded.
    pub fn effective_children(&self) -> &[NodeId] {
        if self.is_folded() {
            &[]
        } else {
            &self.children
        }
    }

    /// Node flags.
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Whether the node is folded.
    pub fn is_folded(&self) -> bool {
        self.flags.contains(NodeFlags::FOLDED)
    }

    /// Direction resolved by the last layout pass that reached this node.
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Direction requested by the host. Only honored on the layout root.
    pub fn preferred_direction(&self) -> Option<Direction> {
        self.preferred_direction
    }

    /// Layout state (depth, path, measured size, computed rect).
    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    /// Computed rectangle from the last layout pass that reached this node.
    pub fn rect(&self) -> Rect {
        self.state.rect
    }
}
