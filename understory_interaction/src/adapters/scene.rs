// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`InteractionScene`] for [`understory_scene::Scene`].
//!
//! The scene's frame counter doubles as the transform generation: [`Scene::commit`] stamps every
//! reachable visible node with it, and [`InteractionScene::frame_generation`] reports the latest
//! one. Explicit [`HitArea`](understory_scene::HitArea)s answer `hit_area_contains`, and a node's
//! [`Extent`](understory_scene::Extent) provides its default hit rectangle.

use kurbo::{Affine, Point, Rect};
use understory_scene::{NodeFlags, NodeId, Scene};

use crate::types::InteractionScene;

impl InteractionScene for Scene {
    type NodeId = NodeId;

    fn root(&self) -> NodeId {
        Self::root(self)
    }

    fn contains(&self, node: NodeId) -> bool {
        self.is_alive(node)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.children_of(node)
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.flags(node)
            .is_some_and(|f| f.contains(NodeFlags::VISIBLE))
    }

    fn is_interactive(&self, node: NodeId) -> bool {
        self.flags(node)
            .is_some_and(|f| f.contains(NodeFlags::INTERACTIVE))
    }

    fn world_transform(&self, node: NodeId) -> Option<Affine> {
        Self::world_transform(self, node)
    }

    fn world_visible_generation(&self, node: NodeId) -> Option<u64> {
        self.world_visible_frame(node)
    }

    fn frame_generation(&self) -> u64 {
        self.frame()
    }

    fn hit_area_contains(&self, node: NodeId, local: Point) -> Option<bool> {
        self.hit_area(node).map(|area| area.contains(local))
    }

    fn default_hit_rect(&self, node: NodeId) -> Option<Rect> {
        self.extent(node).map(|extent| extent.hit_rect())
    }

    fn interactivity_revision(&self) -> u64 {
        Self::interactivity_revision(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Size, Vec2};
    use understory_scene::{Extent, HitArea, SceneNode};

    #[test]
    fn forwards_scene_data() {
        let mut scene = Scene::new();
        let n = scene.insert(
            scene.root(),
            SceneNode {
                local_transform: Affine::translate(Vec2::new(3.0, 4.0)),
                extent: Some(Extent::new(Size::new(10.0, 20.0))),
                ..SceneNode::interactive()
            },
        );
        let g = scene.commit();

        let view: &dyn InteractionScene<NodeId = NodeId> = &scene;
        assert!(view.contains(n));
        assert!(view.is_visible(n));
        assert!(view.is_interactive(n));
        assert!(!view.is_interactive(view.root()));
        assert_eq!(view.children(view.root()), &[n]);
        assert_eq!(view.frame_generation(), g);
        assert_eq!(view.world_visible_generation(n), Some(g));
        assert_eq!(
            view.world_transform(n),
            Some(Affine::translate(Vec2::new(3.0, 4.0)))
        );
        assert_eq!(
            view.default_hit_rect(n),
            Some(Rect::new(0.0, 0.0, 10.0, 20.0))
        );
        assert_eq!(view.hit_area_contains(n, Point::new(1.0, 1.0)), None);

        scene.set_hit_area(n, Some(HitArea::Rect(Rect::new(0.0, 0.0, 2.0, 2.0))));
        assert_eq!(
            InteractionScene::hit_area_contains(&scene, n, Point::new(1.0, 1.0)),
            Some(true)
        );
    }

    #[test]
    fn stale_ids_answer_nothing() {
        let mut scene = Scene::new();
        let n = scene.insert(scene.root(), SceneNode::interactive());
        scene.commit();
        scene.remove(n);

        assert!(!InteractionScene::contains(&scene, n));
        assert!(!InteractionScene::is_visible(&scene, n));
        assert!(InteractionScene::children(&scene, n).is_empty());
        assert_eq!(InteractionScene::world_transform(&scene, n), None);
        assert_eq!(InteractionScene::world_visible_generation(&scene, n), None);
    }
}
