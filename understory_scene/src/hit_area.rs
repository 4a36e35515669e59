// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit hit areas in local coordinates.

use kurbo::{BezPath, Circle, Ellipse, Point, Rect, RoundedRect, Shape};

/// A shape attached to a node for point-containment testing.
///
/// When a node carries a hit area, it replaces the node's default rectangular bounds and the node's
/// children are not consulted. Containment follows [`kurbo::Shape::contains`] for each variant;
/// paths use the non-zero fill rule.
///
/// Points that are not finite (for example, the result of mapping through a degenerate transform)
/// never hit.
#[derive(Clone, Debug)]
pub enum HitArea {
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Filled disk.
    Circle(Circle),
    /// Filled ellipse.
    Ellipse(Ellipse),
    /// Filled rounded rectangle.
    RoundedRect(RoundedRect),
    /// Filled path, typically a closed polygon built with [`HitArea::polygon`].
    Path(BezPath),
}

impl HitArea {
    /// Build a closed polygon from its vertices.
    ///
    /// An empty iterator yields an empty path, which contains no points.
    pub fn polygon(points: impl IntoIterator<Item = Point>) -> Self {
        let mut path = BezPath::new();
        let mut points = points.into_iter();
        if let Some(first) = points.next() {
            path.move_to(first);
            for pt in points {
                path.line_to(pt);
            }
            path.close_path();
        }
        Self::Path(path)
    }

    /// Returns `true` if the local-space point falls inside the area.
    pub fn contains(&self, pt: Point) -> bool {
        if !pt.is_finite() {
            return false;
        }
        match self {
            Self::Rect(r) => r.contains(pt),
            Self::Circle(c) => c.contains(pt),
            Self::Ellipse(e) => e.contains(pt),
            Self::RoundedRect(rr) => rr.contains(pt),
            Self::Path(p) => p.contains(pt),
        }
    }

    /// Conservative local-space bounding box of the area.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Rect(r) => *r,
            Self::Circle(c) => c.bounding_box(),
            Self::Ellipse(e) => e.bounding_box(),
            Self::RoundedRect(rr) => rr.rect(),
            Self::Path(p) => p.bounding_box(),
        }
    }
}

impl From<Rect> for HitArea {
    fn from(r: Rect) -> Self {
        Self::Rect(r)
    }
}

impl From<Circle> for HitArea {
    fn from(c: Circle) -> Self {
        Self::Circle(c)
    }
}

impl From<Ellipse> for HitArea {
    fn from(e: Ellipse) -> Self {
        Self::Ellipse(e)
    }
}

impl From<RoundedRect> for HitArea {
    fn from(rr: RoundedRect) -> Self {
        Self::RoundedRect(rr)
    }
}
