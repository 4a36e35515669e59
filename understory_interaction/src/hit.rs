// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recursive hit testing against transformed node subtrees.
//!
//! A node is hit when, after mapping the world point into the node's local space:
//!
//! 1. its explicit hit area contains the point (children are then never consulted), or
//! 2. it has no hit area and its default rectangle contains the point (open interval), or
//! 3. it has no hit area and any of its children is hit, tested top-most child first.
//!
//! Nodes whose world-visible generation differs from the expected generation are rejected
//! outright, together with their subtree, since their transforms are not current.
//!
//! The reported target is the deepest node whose own geometry matched.

use kurbo::{Affine, Point, Rect};

use crate::types::InteractionScene;

/// Map a world-space point into the local space of a node with the given node-to-world transform.
///
/// Uses the closed-form affine inverse. Degenerate transforms are not special-cased: the
/// determinant's reciprocal becomes infinite and the resulting point is not finite, so it never
/// falls inside a finite region.
pub fn world_to_local(world_transform: Affine, point: Point) -> Point {
    world_transform.inverse() * point
}

/// Open-interval containment: points on the boundary are outside.
pub fn contains_open(rect: Rect, pt: Point) -> bool {
    pt.x > rect.x0 && pt.x < rect.x1 && pt.y > rect.y0 && pt.y < rect.y1
}

/// Hit test `point` (world space) against `node` and its subtree.
///
/// Returns the deepest node whose geometry contains the point, or `None` on a miss.
/// `generation` is the transform-pass generation the caller expects nodes to carry.
pub fn hit_test<S>(scene: &S, node: S::NodeId, point: Point, generation: u64) -> Option<S::NodeId>
where
    S: InteractionScene + ?Sized,
{
    if scene.world_visible_generation(node) != Some(generation) {
        return None;
    }
    let world_transform = scene.world_transform(node)?;
    let local = world_to_local(world_transform, point);

    if let Some(hit) = scene.hit_area_contains(node, local) {
        return hit.then_some(node);
    }

    if let Some(rect) = scene.default_hit_rect(node)
        && contains_open(rect, local)
    {
        return Some(node);
    }

    scene
        .children(node)
        .iter()
        .rev()
        .find_map(|&child| hit_test(scene, child, point, generation))
}
