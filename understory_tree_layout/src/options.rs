// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout configuration.

use kurbo::Size;

use crate::direction::Direction;

/// Floor for [`LayoutOptions::min_spacing`] when the configured value is unusable.
pub const DEFAULT_MIN_SPACING: f64 = 4.0;

/// Height used for nodes that have not been measured yet, and the clamp applied
/// to measured heights.
pub const DEFAULT_MAX_NODE_HEIGHT: f64 = 360.0;

/// Fraction of the larger neighbor's cross length used as a sibling gap when that
/// exceeds the configured sibling spacing.
pub const SIZE_PROPORTIONAL_GAP: f64 = 0.05;

/// Options for a layout pass.
///
/// Values are sanitized once when handed to the engine, see [`LayoutOptions::sanitized`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Direction used unless the layout root carries a preferred direction.
    pub direction: Direction,
    /// Gap between consecutive depth levels along the primary axis.
    pub level_spacing: f64,
    /// Minimum gap between adjacent sibling subtrees along the cross axis.
    pub sibling_spacing: f64,
    /// Lower bound for `sibling_spacing`.
    pub min_spacing: f64,
    /// Clamp for measured node heights; also the height of unmeasured nodes.
    pub max_node_height: f64,
    /// Size used by [`LayoutEngine::layout`](crate::LayoutEngine::layout) for nodes
    /// without a measured size.
    pub default_node_size: Option<Size>,
    /// Added to both dimensions of every sized node.
    pub node_padding: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            level_spacing: 40.0,
            sibling_spacing: 16.0,
            min_spacing: DEFAULT_MIN_SPACING,
            max_node_height: DEFAULT_MAX_NODE_HEIGHT,
            default_node_size: None,
            node_padding: 0.0,
        }
    }
}

fn usable(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

impl LayoutOptions {
    /// Return a copy with unusable values replaced.
    ///
    /// - `min_spacing` falls back to [`DEFAULT_MIN_SPACING`] when negative or non-finite.
    /// - `sibling_spacing` is floored at `min_spacing`.
    /// - `level_spacing` falls back to `min_spacing`.
    /// - `max_node_height` falls back to [`DEFAULT_MAX_NODE_HEIGHT`] unless positive and finite.
    /// - `node_padding` falls back to `0`.
    /// - `default_node_size` is dropped when either component is unusable.
    pub fn sanitized(&self) -> Self {
        let min_spacing = if usable(self.min_spacing) {
            self.min_spacing
        } else {
            DEFAULT_MIN_SPACING
        };
        let sibling_spacing = if usable(self.sibling_spacing) {
            self.sibling_spacing.max(min_spacing)
        } else {
            min_spacing
        };
        let level_spacing = if usable(self.level_spacing) {
            self.level_spacing
        } else {
            min_spacing
        };
        let max_node_height = if self.max_node_height.is_finite() && self.max_node_height > 0.0 {
            self.max_node_height
        } else {
            DEFAULT_MAX_NODE_HEIGHT
        };
        let node_padding = if usable(self.node_padding) {
            self.node_padding
        } else {
            0.0
        };
        let default_node_size = self
            .default_node_size
            .filter(|s| usable(s.width) && usable(s.height));
        Self {
            direction: self.direction,
            level_spacing,
            sibling_spacing,
            min_spacing,
            max_node_height,
            default_node_size,
            node_padding,
        }
    }

    /// Natural extent of a node given its (possibly missing) measured size.
    ///
    /// Sizes with a negative or non-finite component count as missing. A missing
    /// size yields width `0` and height `max_node_height`; measured heights are
    /// clamped to `max_node_height`. Padding applies to measured sizes only.
    pub fn natural_size(&self, size: Option<Size>) -> Size {
        match size.filter(|s| usable(s.width) && usable(s.height)) {
            Some(s) => {
                let height = if s.height > 0.0 {
                    s.height.min(self.max_node_height)
                } else {
                    self.max_node_height
                };
                Size::new(s.width + self.node_padding, height + self.node_padding)
            }
            None => Size::new(0.0, self.max_node_height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_bad_values() {
        let opts = LayoutOptions {
            level_spacing: f64::NAN,
            sibling_spacing: -3.0,
            min_spacing: f64::INFINITY,
            max_node_height: 0.0,
            node_padding: -1.0,
            default_node_size: Some(Size::new(f64::NAN, 10.0)),
            ..Default::default()
        }
        .sanitized();
        assert_eq!(opts.min_spacing, DEFAULT_MIN_SPACING);
        assert_eq!(opts.sibling_spacing, DEFAULT_MIN_SPACING);
        assert_eq!(opts.level_spacing, DEFAULT_MIN_SPACING);
        assert_eq!(opts.max_node_height, DEFAULT_MAX_NODE_HEIGHT);
        assert_eq!(opts.node_padding, 0.0);
        assert_eq!(opts.default_node_size, None);
    }

    #[test]
    fn sibling_spacing_floors_at_min() {
        let opts = LayoutOptions {
            sibling_spacing: 1.0,
            min_spacing: 6.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(opts.sibling_spacing, 6.0);
        let untouched = LayoutOptions::default();
        assert_eq!(untouched.sanitized(), untouched);
    }

    #[test]
    fn natural_size_clamps_and_defaults() {
        let opts = LayoutOptions {
            max_node_height: 100.0,
            ..Default::default()
        };
        assert_eq!(
            opts.natural_size(Some(Size::new(50.0, 500.0))),
            Size::new(50.0, 100.0)
        );
        assert_eq!(opts.natural_size(None), Size::new(0.0, 100.0));
        assert_eq!(
            opts.natural_size(Some(Size::new(50.0, 0.0))),
            Size::new(50.0, 100.0)
        );
        assert_eq!(
            opts.natural_size(Some(Size::new(f64::NAN, 5.0))),
            Size::new(0.0, 100.0)
        );
    }

    #[test]
    fn padding_applies_to_measured_sizes() {
        let opts = LayoutOptions {
            node_padding: 8.0,
            ..Default::default()
        };
        assert_eq!(
            opts.natural_size(Some(Size::new(40.0, 20.0))),
            Size::new(48.0, 28.0)
        );
        assert_eq!(
            opts.natural_size(None),
            Size::new(0.0, DEFAULT_MAX_NODE_HEIGHT)
        );
    }
}
