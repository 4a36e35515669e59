// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for default hit rectangles.

use kurbo::{Affine, Point, Size, Vec2};
use proptest::prelude::*;
use understory_interaction::hit::hit_test;
use understory_scene::{Extent, Scene, SceneNode};

fn sprite_scene(pos: Vec2, size: Size, anchor: Vec2) -> (Scene, understory_scene::NodeId, u64) {
    let mut scene = Scene::new();
    let node = scene.insert(
        scene.root(),
        SceneNode {
            local_transform: Affine::translate(pos),
            extent: Some(Extent::new(size).with_anchor(anchor)),
            ..SceneNode::interactive()
        },
    );
    let generation = scene.commit();
    (scene, node, generation)
}

proptest! {
    #[test]
    fn interior_points_hit_and_edges_miss(
        x in -500.0_f64..500.0,
        y in -500.0_f64..500.0,
        w in 1.0_f64..300.0,
        h in 1.0_f64..300.0,
        ax in 0.0_f64..=1.0,
        ay in 0.0_f64..=1.0,
        fx in 0.01_f64..0.99,
        fy in 0.01_f64..0.99,
    ) {
        let (scene, node, g) = sprite_scene(Vec2::new(x, y), Size::new(w, h), Vec2::new(ax, ay));
        let left = x - ax * w;
        let top = y - ay * h;

        let inside = Point::new(left + fx * w, top + fy * h);
        prop_assert_eq!(hit_test(&scene, node, inside, g), Some(node));

        let outside = Point::new(left - 1.0, top + fy * h);
        prop_assert_eq!(hit_test(&scene, node, outside, g), None);
        let below = Point::new(left + fx * w, top + h + 1.0);
        prop_assert_eq!(hit_test(&scene, node, below, g), None);
    }

    #[test]
    fn stale_generations_never_hit(
        w in 1.0_f64..300.0,
        h in 1.0_f64..300.0,
        offset in 1_u64..1000,
    ) {
        let (scene, node, g) = sprite_scene(Vec2::ZERO, Size::new(w, h), Vec2::ZERO);
        let center = Point::new(w / 2.0, h / 2.0);
        prop_assert_eq!(hit_test(&scene, node, center, g), Some(node));
        prop_assert_eq!(hit_test(&scene, node, center, g + offset), None);
    }
}
