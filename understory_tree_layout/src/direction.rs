// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout directions and the coordinate transforms they imply.
//!
//! The engine works in an abstract frame: the *primary* axis is the one along which
//! depth advances, the *cross* axis is the one along which siblings are distributed.
//! [`Direction::transform`] maps a node box from that frame to world coordinates.

use kurbo::{Rect, Size};

/// Direction in which the tree grows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Root on the left, depth grows towards +x.
    #[default]
    LeftToRight,
    /// Root on the right, depth grows towards −x.
    RightToLeft,
    /// Root at the top, depth grows towards +y.
    TopToBottom,
    /// Root at the bottom, depth grows towards −y.
    BottomToTop,
    /// Root pinned at the origin; its children fan out to both sides.
    ///
    /// Even-indexed children go left ([`Direction::RightToLeft`]),
    /// odd-indexed children go right ([`Direction::LeftToRight`]).
    Centered,
}

/// Spacing along the primary and cross axes for a direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AxisSizes {
    /// Gap between consecutive depth levels.
    pub primary: f64,
    /// Minimum gap between adjacent sibling subtrees.
    pub cross: f64,
}

impl Direction {
    /// All directions, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::LeftToRight,
        Self::RightToLeft,
        Self::TopToBottom,
        Self::BottomToTop,
        Self::Centered,
    ];

    /// Whether depth advances along the x axis.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft | Self::Centered)
    }

    /// Whether depth advances towards negative coordinates.
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::RightToLeft | Self::BottomToTop)
    }

    /// The same axis, growing the other way. `Centered` is its own mirror.
    pub const fn flipped(self) -> Self {
        match self {
            Self::LeftToRight => Self::RightToLeft,
            Self::RightToLeft => Self::LeftToRight,
            Self::TopToBottom => Self::BottomToTop,
            Self::BottomToTop => Self::TopToBottom,
            Self::Centered => Self::Centered,
        }
    }

    /// Side assigned to the root's child at `index` in a centered layout.
    pub const fn centered_side(index: usize) -> Self {
        if index % 2 == 0 {
            Self::RightToLeft
        } else {
            Self::LeftToRight
        }
    }

    /// Extent of `size` along the primary axis.
    pub fn primary_len(self, size: Size) -> f64 {
        if self.is_horizontal() {
            size.width
        } else {
            size.height
        }
    }

    /// Extent of `size` along the cross axis.
    pub fn cross_len(self, size: Size) -> f64 {
        if self.is_horizontal() {
            size.height
        } else {
            size.width
        }
    }

    /// Map a node box from the abstract frame to world coordinates.
    ///
    /// `primary` and `cross` are the box's leading edges. Reversed directions mirror
    /// the whole box, so the leading edge ends up on the far side of the origin.
    ///
    /// `Centered` pins the node whose resolved direction is `Centered` (the root) at
    /// the origin and delegates every other node to its resolved direction,
    /// defaulting to [`Direction::LeftToRight`].
    pub fn transform(
        self,
        primary: f64,
        cross: f64,
        size: Size,
        node_direction: Option<Self>,
    ) -> Rect {
        let (w, h) = (size.width, size.height);
        match self {
            Self::LeftToRight => Rect::new(primary, cross, primary + w, cross + h),
            Self::RightToLeft => Rect::new(-primary - w, cross, -primary, cross + h),
            Self::TopToBottom => Rect::new(cross, primary, cross + w, primary + h),
            Self::BottomToTop => Rect::new(cross, -primary - h, cross + w, -primary),
            Self::Centered => match node_direction {
                Some(Self::Centered) => Rect::new(0.0, 0.0, w, h),
                Some(resolved) => resolved.transform(primary, cross, size, None),
                None => Self::LeftToRight.transform(primary, cross, size, None),
            },
        }
    }

    /// Primary/cross spacing for this direction.
    ///
    /// The centered fans get half again the sibling spacing, since two fans share
    /// the root's neighborhood.
    pub fn axis_sizes(self, level_spacing: f64, sibling_spacing: f64) -> AxisSizes {
        match self {
            Self::Centered => AxisSizes {
                primary: level_spacing,
                cross: sibling_spacing * 1.5,
            },
            _ => AxisSizes {
                primary: level_spacing,
                cross: sibling_spacing,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Size = Size::new(100.0, 30.0);

    #[test]
    fn forward_transforms() {
        assert_eq!(
            Direction::LeftToRight.transform(10.0, 5.0, SIZE, None),
            Rect::new(10.0, 5.0, 110.0, 35.0)
        );
        assert_eq!(
            Direction::TopToBottom.transform(10.0, 5.0, SIZE, None),
            Rect::new(5.0, 10.0, 105.0, 40.0)
        );
    }

    #[test]
    fn reverse_transforms_mirror_the_box() {
        let lr = Direction::LeftToRight.transform(10.0, 5.0, SIZE, None);
        let rl = Direction::RightToLeft.transform(10.0, 5.0, SIZE, None);
        assert_eq!(rl.x0, -lr.x1);
        assert_eq!(rl.x1, -lr.x0);
        assert_eq!((rl.y0, rl.y1), (lr.y0, lr.y1));

        let tb = Direction::TopToBottom.transform(10.0, 5.0, SIZE, None);
        let bt = Direction::BottomToTop.transform(10.0, 5.0, SIZE, None);
        assert_eq!(bt.y0, -tb.y1);
        assert_eq!(bt.y1, -tb.y0);
        assert_eq!((bt.x0, bt.x1), (tb.x0, tb.x1));
    }

    #[test]
    fn centered_pins_root_and_delegates() {
        let c = Direction::Centered;
        assert_eq!(
            c.transform(50.0, 50.0, SIZE, Some(Direction::Centered)),
            Rect::new(0.0, 0.0, 100.0, 30.0)
        );
        assert_eq!(
            c.transform(10.0, 5.0, SIZE, Some(Direction::RightToLeft)),
            Direction::RightToLeft.transform(10.0, 5.0, SIZE, None)
        );
        assert_eq!(
            c.transform(10.0, 5.0, SIZE, None),
            Direction::LeftToRight.transform(10.0, 5.0, SIZE, None)
        );
    }

    #[test]
    fn axis_lengths_follow_orientation() {
        assert_eq!(Direction::LeftToRight.primary_len(SIZE), 100.0);
        assert_eq!(Direction::LeftToRight.cross_len(SIZE), 30.0);
        assert_eq!(Direction::BottomToTop.primary_len(SIZE), 30.0);
        assert_eq!(Direction::BottomToTop.cross_len(SIZE), 100.0);
        for d in Direction::ALL {
            assert_eq!(d.flipped().flipped(), d);
            assert_eq!(d.flipped().is_horizontal(), d.is_horizontal());
        }
    }

    #[test]
    fn axis_sizes_and_sides() {
        let lin = Direction::TopToBottom.axis_sizes(20.0, 10.0);
        assert_eq!(lin, AxisSizes { primary: 20.0, cross: 10.0 });
        let cen = Direction::Centered.axis_sizes(20.0, 10.0);
        assert_eq!(cen, AxisSizes { primary: 20.0, cross: 15.0 });
        assert_eq!(Direction::centered_side(0), Direction::RightToLeft);
        assert_eq!(Direction::centered_side(1), Direction::LeftToRight);
        assert_eq!(Direction::centered_side(4), Direction::RightToLeft);
    }
}
