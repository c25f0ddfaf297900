// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Centered layout: the root sits at the origin with two fans of children.
//!
//! The root's visible children are split by sibling index. Even indices form the
//! left fan (laid out right-to-left), odd indices the right fan (left-to-right).
//! Each fan is arranged as its own tree rooted at the real root and then shifted
//! so that its copy of the root lands on the pinned root rectangle.

use alloc::vec::Vec;
use kurbo::{Rect, Size};

use crate::direction::Direction;
use crate::engine::{Pass, Placement, arrange};
use crate::hierarchy::Hierarchy;
use crate::tree::Tree;
use crate::types::{Node, NodeId};

impl<S> Pass<'_, S> {
    /// Lay out `root` and both fans. Returns the union of all rectangles.
    pub(crate) fn centered<T>(&mut self, tree: &mut Tree<T>, root: NodeId) -> Option<Rect>
    where
        S: FnMut(NodeId, &Node<T>) -> Option<Size>,
    {
        let children: Vec<(usize, NodeId)> = tree
            .get(root)?
            .effective_children()
            .iter()
            .copied()
            .enumerate()
            .collect();

        let lone = Hierarchy::build_with_children(tree, root, core::iter::empty())?;
        let root_size = self.measure(tree, &lone)[0];
        let pinned = Direction::Centered.transform(0.0, 0.0, root_size, Some(Direction::Centered));

        self.visited.push(root);
        if self.in_scope(root) {
            let node = tree.node_mut(root);
            node.state.rect = pinned;
            node.state.depth = 0;
            node.state.path.clear();
            node.direction = Some(Direction::Centered);
        }

        let spacing = Direction::Centered
            .axis_sizes(self.options.level_spacing, self.options.sibling_spacing);
        let mut bounds = pinned;
        for side in [Direction::centered_side(0), Direction::centered_side(1)] {
            let group = children
                .iter()
                .copied()
                .filter(|(index, _)| Direction::centered_side(*index) == side);
            let h = Hierarchy::build_with_children(tree, root, group)?;
            if h.len() == 1 {
                continue;
            }
            let sizes = self.measure(tree, &h);
            let arrangement = arrange(&h, &sizes, side, spacing);
            let fan_root = Direction::Centered.transform(
                arrangement.primary[0],
                arrangement.cross[0],
                sizes[0],
                Some(side),
            );
            let fan = self.commit(
                tree,
                &h,
                &sizes,
                &arrangement,
                &Placement {
                    frame: Direction::Centered,
                    resolved: side,
                    offset: pinned.origin() - fan_root.origin(),
                    skip_root: true,
                },
            );
            log::trace!("centered fan {side:?}: {} nodes, bounds={fan:?}", h.len() - 1);
            bounds = bounds.union(fan);
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Direction, LayoutEngine, LayoutOptions, Tree};
    use alloc::vec::Vec;
    use kurbo::{Rect, Size};

    fn engine() -> LayoutEngine {
        LayoutEngine::new(LayoutOptions {
            direction: Direction::Centered,
            level_spacing: 20.0,
            sibling_spacing: 10.0,
            ..Default::default()
        })
    }

    #[test]
    fn root_only_is_pinned_at_origin() {
        let mut tree = Tree::new();
        let root = tree.insert(None, ());
        tree.set_size(root, Size::new(80.0, 40.0));
        let summary = engine().layout(&mut tree, root).unwrap();
        assert_eq!(summary.bounds, Rect::new(0.0, 0.0, 80.0, 40.0));
        assert_eq!(summary.visited, 1);
        assert_eq!(tree.resolved_direction(root), Some(Direction::Centered));
    }

    #[test]
    fn fans_sit_one_level_away_from_the_root() {
        let mut tree = Tree::new();
        let root = tree.insert(None, ());
        let left = tree.insert(Some(root), ());
        let right = tree.insert(Some(root), ());
        for id in [root, left, right] {
            tree.set_size(id, Size::new(100.0, 30.0));
        }
        engine().layout(&mut tree, root).unwrap();

        let r = tree.get(root).unwrap().rect();
        let l = tree.get(left).unwrap().rect();
        let rr = tree.get(right).unwrap().rect();
        assert_eq!(r, Rect::new(0.0, 0.0, 100.0, 30.0));
        assert_eq!(l.x1, -20.0);
        assert_eq!(rr.x0, 120.0);
        assert_eq!(l.center().y, r.center().y);
        assert_eq!(rr.center().y, r.center().y);
    }

    #[test]
    fn one_sided_bounds_follow_the_fan() {
        let mut tree = Tree::new();
        let root = tree.insert(None, ());
        let only = tree.insert(Some(root), ());
        let kids: Vec<_> = (0..3).map(|_| tree.insert(Some(only), ())).collect();
        for id in [root, only].iter().chain(&kids) {
            tree.set_size(*id, Size::new(50.0, 20.0));
        }
        let summary = engine().layout(&mut tree, root).unwrap();
        // three leaves of 20 with 15-unit gaps
        assert_eq!(summary.bounds.height(), 90.0);
        assert!(summary.bounds.x1 <= 50.0, "nothing to the right of the root");
        for id in kids {
            assert_eq!(tree.resolved_direction(id), Some(Direction::RightToLeft));
            assert!(tree.get(id).unwrap().rect().x1 < 0.0);
        }
    }
}
