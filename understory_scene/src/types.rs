// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, and local node data.

use kurbo::{Affine, Rect, Size, Vec2};

use crate::hit_area::HitArea;

/// Identifier for a node in the scene (generational).
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
    /// Node flags controlling visibility and interactivity.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible (its subtree takes part in the transform pass).
        const VISIBLE     = 0b0000_0001;
        /// Node opts into receiving pointer and touch dispatch.
        const INTERACTIVE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Visual extent of a node, used to derive its default hit rectangle.
///
/// `anchor` is a fraction of `size`: `(0, 0)` puts the local origin at the top-left corner,
/// `(0.5, 0.5)` at the center. `trim` describes where the visible sub-region sits inside an
/// untrimmed source frame of `size`; when present the anchor is re-expressed relative to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    /// Frame width and height in local units.
    pub size: Size,
    /// Anchor as a fraction of `size`.
    pub anchor: Vec2,
    /// Optional trimmed sub-region (offset and size within the original frame).
    pub trim: Option<Rect>,
}

impl Extent {
    /// An extent of `size` anchored at its top-left corner.
    pub const fn new(size: Size) -> Self {
        Self {
            size,
            anchor: Vec2::ZERO,
            trim: None,
        }
    }

    /// Set the anchor fraction.
    #[must_use]
    pub const fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the trimmed sub-region.
    #[must_use]
    pub const fn with_trim(mut self, trim: Rect) -> Self {
        self.trim = Some(trim);
        self
    }

    /// The local-space rectangle covered by this extent.
    ///
    /// Spans `[-ax * w, (1 - ax) * w] × [-ay * h, (1 - ay) * h]` where `(ax, ay)` is the
    /// effective anchor after applying `trim`.
    pub fn hit_rect(&self) -> Rect {
        let Size { width, height } = self.size;
        let mut ax = self.anchor.x;
        let mut ay = self.anchor.y;
        if let Some(trim) = self.trim {
            ax = (trim.width() * ax + trim.x0) / width;
            ay = (trim.height() * ay + trim.y0) / height;
        }
        let x0 = -width * ax;
        let y0 = -height * ay;
        Rect::new(x0, y0, x0 + width, y0 + height)
    }
}

/// Local data for a node.
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// Local transform relative to the parent.
    pub local_transform: Affine,
    /// Visibility and interactivity flags.
    pub flags: NodeFlags,
    /// Explicit hit area in local coordinates. Overrides `extent` and children for hit testing.
    pub hit_area: Option<HitArea>,
    /// Visual extent; when set, the node has a default rectangular hit region.
    pub extent: Option<Extent>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            local_transform: Affine::IDENTITY,
            flags: NodeFlags::default(),
            hit_area: None,
            extent: None,
        }
    }
}

impl SceneNode {
    /// A visible, interactive node with default geometry.
    pub fn interactive() -> Self {
        Self {
            flags: NodeFlags::VISIBLE | NodeFlags::INTERACTIVE,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_anchor_spans_both_sides() {
        let extent = Extent::new(Size::new(100.0, 40.0)).with_anchor(Vec2::new(0.5, 0.5));
        assert_eq!(extent.hit_rect(), Rect::new(-50.0, -20.0, 50.0, 20.0));
    }

    #[test]
    fn top_left_anchor_starts_at_origin() {
        let extent = Extent::new(Size::new(10.0, 20.0));
        assert_eq!(extent.hit_rect(), Rect::new(0.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn trim_shifts_effective_anchor() {
        // A 50x50 visible region sitting at (10, 20) inside a 100x100 source frame.
        let extent = Extent::new(Size::new(100.0, 100.0))
            .with_anchor(Vec2::new(0.5, 0.5))
            .with_trim(Rect::new(10.0, 20.0, 60.0, 70.0));
        // ax = (50 * 0.5 + 10) / 100 = 0.35, ay = (50 * 0.5 + 20) / 100 = 0.45
        let r = extent.hit_rect();
        assert!((r.x0 + 35.0).abs() < 1e-9, "x0 was {}", r.x0);
        assert!((r.y0 + 45.0).abs() < 1e-9, "y0 was {}", r.y0);
        assert!((r.width() - 100.0).abs() < 1e-9, "width was {}", r.width());
    }

    #[test]
    fn interactive_constructor_sets_both_flags() {
        let node = SceneNode::interactive();
        assert!(node.flags.contains(NodeFlags::VISIBLE | NodeFlags::INTERACTIVE));
        assert!(SceneNode::default().flags == NodeFlags::VISIBLE);
    }
}
