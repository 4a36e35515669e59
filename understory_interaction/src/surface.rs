// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host surface binding and raw input records.

use alloc::boxed::Box;

use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

use crate::types::TouchId;

/// Host input surface the manager is bound to.
///
/// The surface reports its on-screen rectangle (used to map device coordinates to scene
/// coordinates) and accepts cursor style strings.
pub trait Surface {
    /// Current bounding rectangle of the surface in device coordinates.
    fn bounding_rect(&self) -> Rect;

    /// Show the given cursor style while the pointer is over the surface.
    fn set_cursor(&mut self, style: &str);

    /// Called when the manager starts listening to this surface.
    fn attach(&mut self) {}

    /// Called when the manager stops listening to this surface.
    fn detach(&mut self) {}
}

/// A bound surface together with the scene resolution it renders at.
pub struct SurfaceBinding {
    pub(crate) surface: Box<dyn Surface>,
    pub(crate) scene_size: Size,
}

impl core::fmt::Debug for SurfaceBinding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SurfaceBinding")
            .field("bounding_rect", &self.surface.bounding_rect())
            .field("scene_size", &self.scene_size)
            .finish_non_exhaustive()
    }
}

impl SurfaceBinding {
    /// Bind `surface` rendering a scene of `scene_size`.
    pub fn new(surface: Box<dyn Surface>, scene_size: Size) -> Self {
        Self {
            surface,
            scene_size,
        }
    }

    /// Scene resolution.
    pub fn scene_size(&self) -> Size {
        self.scene_size
    }

    /// Map a device-space point into scene space.
    pub fn map(&self, device: Point) -> Point {
        map_to_scene(self.surface.bounding_rect(), self.scene_size, device)
    }

    pub(crate) fn into_surface(self) -> Box<dyn Surface> {
        self.surface
    }
}

/// Map `device` into a scene of `scene_size` displayed in `rect`.
///
/// The offset from the rect origin is scaled by the ratio of scene size to displayed size. An
/// empty rect yields non-finite coordinates, which never hit anything.
pub fn map_to_scene(rect: Rect, scene_size: Size, device: Point) -> Point {
    Point::new(
        (device.x - rect.x0) * (scene_size.width / rect.width()),
        (device.y - rect.y0) * (scene_size.height / rect.height()),
    )
}

/// A mouse/primary pointer event in device coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerInput<E> {
    /// Device-space position.
    pub position: Point,
    /// Raw host event, kept on the primary session.
    pub event: E,
}

impl<E> PointerInput<E> {
    /// New pointer input.
    pub fn new(position: impl Into<Point>, event: E) -> Self {
        Self {
            position: position.into(),
            event,
        }
    }
}

/// One changed contact of a touch event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchPoint {
    /// Host touch identifier.
    pub id: TouchId,
    /// Device-space position.
    pub position: Point,
}

impl TouchPoint {
    /// New touch point.
    pub fn new(id: u64, position: impl Into<Point>) -> Self {
        Self {
            id: TouchId(id),
            position: position.into(),
        }
    }
}

/// A touch event listing the contacts that changed.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchInput<E> {
    /// Contacts that started, moved or ended.
    pub changed: SmallVec<[TouchPoint; 4]>,
    /// Raw host event, copied onto each affected touch session.
    pub event: E,
}

impl<E> TouchInput<E> {
    /// New touch input.
    pub fn new(changed: impl IntoIterator<Item = TouchPoint>, event: E) -> Self {
        Self {
            changed: changed.into_iter().collect(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_offset_and_scale() {
        // Surface shown at (10, 20), 200x100 on screen, rendering a 400x400 scene.
        let rect = Rect::new(10.0, 20.0, 210.0, 120.0);
        let p = map_to_scene(rect, Size::new(400.0, 400.0), Point::new(60.0, 45.0));
        assert_eq!(p, Point::new(100.0, 100.0));
    }

    #[test]
    fn identity_when_sizes_match() {
        let rect = Rect::new(0.0, 0.0, 300.0, 200.0);
        let p = map_to_scene(rect, Size::new(300.0, 200.0), Point::new(12.5, 7.0));
        assert_eq!(p, Point::new(12.5, 7.0));
    }

    #[test]
    fn empty_rect_is_not_finite() {
        let rect = Rect::new(5.0, 5.0, 5.0, 5.0);
        let p = map_to_scene(rect, Size::new(100.0, 100.0), Point::new(7.0, 7.0));
        assert!(!p.x.is_finite());
    }
}
