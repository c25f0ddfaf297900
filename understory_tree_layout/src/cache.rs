// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Memoized node extents.

use hashbrown::HashMap;
use kurbo::Size;

use crate::types::NodeId;

/// Natural extents of nodes, keyed by [`NodeId`].
///
/// Owned by a [`LayoutEngine`](crate::LayoutEngine). A full pass clears it; a partial
/// pass invalidates only the nodes that changed, so the sizer is consulted again for
/// those and nothing else.
#[derive(Clone, Debug, Default)]
pub struct RectCache {
    sizes: HashMap<NodeId, Size>,
}

impl RectCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached extent of `id`, if any.
    pub fn get(&self, id: NodeId) -> Option<Size> {
        self.sizes.get(&id).copied()
    }

    /// Return the cached extent of `id`, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, id: NodeId, f: impl FnOnce() -> Size) -> Size {
        *self.sizes.entry(id).or_insert_with(f)
    }

    /// Whether `id` has a cached extent.
    pub fn contains(&self, id: NodeId) -> bool {
        self.sizes.contains_key(&id)
    }

    /// Drop the cached extent of `id`.
    pub fn invalidate(&mut self, id: NodeId) {
        self.sizes.remove(&id);
    }

    /// Drop every cached extent.
    pub fn clear(&mut self) {
        self.sizes.clear();
    }

    /// Number of cached extents.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
