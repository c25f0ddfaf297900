// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounced re-layout scheduling.
//!
//! Size reports tend to arrive in bursts (for example while many nodes mount at
//! once). The scheduler coalesces them: every accepted change pushes a deadline
//! `debounce` into the future, and [`RelayoutScheduler::poll`] hands out a
//! [`Flush`] once that deadline has passed. Time is supplied by the caller as a
//! [`Duration`] since any fixed epoch.

use alloc::vec::Vec;
use core::time::Duration;
use hashbrown::HashMap;
use kurbo::Size;
use understory_tree_layout::NodeId;

bitflags::bitflags! {
    /// What changed about a queued node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ChangeKind: u8 {
        /// Measured size changed.
        const SIZE = 0b0000_0001;
        /// Fold state changed.
        const FOLD = 0b0000_0010;
        /// Nodes were added, removed, or moved.
        const STRUCTURE = 0b0000_0100;
    }
}

/// Scheduler tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Quiet period after the last accepted change before a flush is due.
    pub debounce: Duration,
    /// A flush is full when more than this fraction of the laid-out nodes changed.
    pub full_relayout_ratio: f64,
    /// Flush as soon as more than this many distinct nodes are queued.
    pub max_pending: usize,
    /// Size changes no larger than this in both dimensions are ignored.
    pub size_epsilon: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(50),
            full_relayout_ratio: 0.3,
            max_pending: 256,
            size_epsilon: 1.0,
        }
    }
}

/// What a flush should do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flush {
    /// Lay out the whole tree and publish every rectangle.
    Full,
    /// Lay out the whole tree, but publish only these nodes (in the order they were queued).
    Partial(Vec<NodeId>),
}

/// Pure flush decision.
///
/// Full when forced, when there is nothing laid out yet, or when `changed`
/// exceeds `ratio` of `total`.
pub fn plan(changed: Vec<NodeId>, total: usize, ratio: f64, force_full: bool) -> Flush {
    let over = changed.len() as f64 > ratio * total as f64;
    if force_full || total == 0 || over {
        Flush::Full
    } else {
        Flush::Partial(changed)
    }
}

/// NaN on either side counts as a change.
fn differs(a: f64, b: f64, epsilon: f64) -> bool {
    let d = a - b;
    !(d <= epsilon && d >= -epsilon)
}

/// Queue of pending layout changes with a debounce deadline.
#[derive(Clone, Debug, Default)]
pub struct RelayoutScheduler {
    config: SchedulerConfig,
    pending: HashMap<NodeId, ChangeKind>,
    order: Vec<NodeId>,
    sizes: HashMap<NodeId, Size>,
    deadline: Option<Duration>,
    force_full: bool,
}

impl RelayoutScheduler {
    /// Create an idle scheduler.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Record a measured size for `id`.
    ///
    /// Non-finite sizes are rejected. The first finite report for a node is always
    /// accepted; later reports are accepted only when they move by more than
    /// `size_epsilon` in either dimension. Returns whether the change was queued.
    pub fn note_size(&mut self, id: NodeId, size: Size, now: Duration) -> bool {
        if !size.is_finite() {
            return false;
        }
        let eps = self.config.size_epsilon;
        if let Some(prev) = self.sizes.get(&id)
            && !differs(prev.width, size.width, eps)
            && !differs(prev.height, size.height, eps)
        {
            return false;
        }
        self.sizes.insert(id, size);
        self.enqueue(id, ChangeKind::SIZE, now);
        true
    }

    /// Record a fold toggle on `id`. Folding changes which nodes exist in the
    /// layout, so the next flush is full.
    pub fn note_fold(&mut self, id: NodeId, now: Duration) {
        self.force_full = true;
        self.enqueue(id, ChangeKind::FOLD, now);
    }

    /// Record a structural edit at `id` (insert, remove, reparent, new root).
    pub fn note_structure(&mut self, id: NodeId, now: Duration) {
        self.force_full = true;
        self.enqueue(id, ChangeKind::STRUCTURE, now);
    }

    /// Forget everything known about `id` (for removed nodes).
    pub fn forget(&mut self, id: NodeId) {
        self.sizes.remove(&id);
        if self.pending.remove(&id).is_some() {
            self.order.retain(|p| *p != id);
        }
    }

    /// Drop recorded sizes and queued changes of every node `keep` rejects.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.sizes.retain(|id, _| keep(*id));
        self.pending.retain(|id, _| keep(*id));
        let pending = &self.pending;
        self.order.retain(|id| pending.contains_key(id));
    }

    /// Number of nodes with a recorded size.
    pub fn tracked_len(&self) -> usize {
        self.sizes.len()
    }

    fn enqueue(&mut self, id: NodeId, kind: ChangeKind, now: Duration) {
        let entry = self.pending.entry(id).or_insert_with(|| {
            self.order.push(id);
            ChangeKind::empty()
        });
        *entry |= kind;
        self.deadline = Some(now.saturating_add(self.config.debounce));
    }

    /// Hand out a flush if the deadline has passed or the queue overflowed.
    ///
    /// `total` is the number of nodes in the current layout.
    pub fn poll(&mut self, now: Duration, total: usize) -> Option<Flush> {
        let due = self.deadline.is_some_and(|d| now >= d);
        let overflow = self.pending.len() > self.config.max_pending;
        if due || overflow {
            self.flush(total)
        } else {
            None
        }
    }

    /// Hand out a flush now, regardless of the deadline. `None` when idle.
    pub fn flush(&mut self, total: usize) -> Option<Flush> {
        if !self.force_full && self.pending.is_empty() {
            self.deadline = None;
            return None;
        }
        let changed = core::mem::take(&mut self.order);
        self.pending.clear();
        self.deadline = None;
        let force = core::mem::take(&mut self.force_full);
        let count = changed.len();
        let flush = plan(changed, total, self.config.full_relayout_ratio, force);
        log::trace!(
            "flush: {} changed of {}, forced={}, full={}",
            count,
            total,
            force,
            flush == Flush::Full
        );
        Some(flush)
    }

    /// Drop the pending flush and its queue, for when the caller lays out eagerly.
    ///
    /// Recorded sizes are kept so later reports are still compared against them.
    pub fn cancel(&mut self) {
        self.pending.clear();
        self.order.clear();
        self.deadline = None;
        self.force_full = false;
    }

    /// Changes queued for `id`, if any.
    pub fn pending(&self, id: NodeId) -> Option<ChangeKind> {
        self.pending.get(&id).copied()
    }

    /// Number of distinct queued nodes.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// When the next flush is due.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Last accepted size for `id`.
    pub fn last_size(&self, id: NodeId) -> Option<Size> {
        self.sizes.get(&id).copied()
    }
}
