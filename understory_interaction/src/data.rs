// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction data handed to node handlers.

use kurbo::Point;

use crate::hit::world_to_local;
use crate::types::{InteractionScene, PointerId};

/// Everything a handler learns about the pointer that triggered it.
///
/// One value exists per pointer session and is reused across events: `global` and
/// `original_event` are overwritten by each event for that pointer, and `target` is overwritten by
/// each hit test.
#[derive(Clone, Debug)]
pub struct InteractionData<K, E> {
    /// Pointer position in world (scene) coordinates.
    pub global: Point,
    /// Deepest node matched by the most recent hit test, if any.
    pub target: Option<K>,
    /// Raw host event that last updated this session.
    pub original_event: Option<E>,
    /// Which pointer this session tracks.
    pub pointer: PointerId,
}

impl<K, E> InteractionData<K, E> {
    /// Fresh data for `pointer` at the world origin.
    pub const fn new(pointer: PointerId) -> Self {
        Self {
            global: Point::ZERO,
            target: None,
            original_event: None,
            pointer,
        }
    }

    /// The pointer position in `node`'s local space.
    ///
    /// Returns `None` if the node is stale.
    pub fn local_position<S>(&self, scene: &S, node: K) -> Option<Point>
    where
        S: InteractionScene<NodeId = K> + ?Sized,
    {
        scene
            .world_transform(node)
            .map(|tf| world_to_local(tf, self.global))
    }

    /// Like [`local_position`](Self::local_position), but writes into `out`.
    ///
    /// Returns `false` and leaves `out` untouched if the node is stale.
    pub fn write_local_position<S>(&self, scene: &S, node: K, out: &mut Point) -> bool
    where
        S: InteractionScene<NodeId = K> + ?Sized,
    {
        match self.local_position(scene, node) {
            Some(pt) => {
                *out = pt;
                true
            }
            None => false,
        }
    }
}

#[cfg(all(test, feature = "scene_adapter"))]
mod tests {
    use super::*;
    use kurbo::{Affine, Vec2};
    use understory_scene::{Scene, SceneNode};

    #[test]
    fn local_position_uses_inverse_world_transform() {
        let mut scene = Scene::new();
        let n = scene.insert(
            scene.root(),
            SceneNode {
                local_transform: Affine::translate(Vec2::new(10.0, 20.0)) * Affine::scale(2.0),
                ..SceneNode::default()
            },
        );
        scene.commit();

        let mut data: InteractionData<_, ()> = InteractionData::new(PointerId::Primary);
        data.global = Point::new(30.0, 40.0);
        assert_eq!(data.local_position(&scene, n), Some(Point::new(10.0, 10.0)));

        let mut out = Point::ZERO;
        assert!(data.write_local_position(&scene, n, &mut out));
        assert_eq!(out, Point::new(10.0, 10.0));

        scene.remove(n);
        let mut untouched = Point::new(-1.0, -1.0);
        assert!(!data.write_local_position(&scene, n, &mut untouched));
        assert_eq!(untouched, Point::new(-1.0, -1.0));
    }
}
