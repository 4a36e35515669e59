// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two fingers on two pads: taps and releases outside are tracked per touch.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example multitouch`

use kurbo::{Affine, Size, Vec2};
use understory_interaction::{InteractionManager, TouchInput, TouchPoint};
use understory_scene::{Extent, Scene, SceneNode};

fn pad(x: f64) -> SceneNode {
    SceneNode {
        local_transform: Affine::translate(Vec2::new(x, 0.0)),
        extent: Some(Extent::new(Size::new(100.0, 100.0))),
        ..SceneNode::interactive()
    }
}

fn main() {
    env_logger::init();

    let mut scene = Scene::with_root(SceneNode::interactive());
    let left = scene.insert(scene.root(), pad(0.0));
    let right = scene.insert(scene.root(), pad(200.0));
    scene.commit();

    let mut manager = InteractionManager::<Scene, u32>::new();
    for (node, name) in [(left, "left"), (right, "right")] {
        manager
            .handlers_mut(node)
            .on_touch_start(move |_, data| println!("  {name}: start by {:?}", data.pointer))
            .on_tap(move |_, data| println!("  {name}: tap by {:?}", data.pointer))
            .on_touch_end_outside(move |_, data| {
                println!("  {name}: released outside at {:?}", data.global);
            });
    }
    manager.force_update(&mut scene);

    let frames = [
        ("start", vec![TouchPoint::new(1, (50.0, 50.0)), TouchPoint::new(2, (250.0, 50.0))]),
        ("end", vec![TouchPoint::new(1, (60.0, 40.0))]),
        ("end", vec![TouchPoint::new(2, (150.0, 50.0))]),
        ("start", vec![TouchPoint::new(3, (20.0, 20.0))]),
        ("end", vec![TouchPoint::new(3, (20.0, 20.0))]),
    ];
    for (seq, (kind, touches)) in (0_u32..).zip(frames) {
        println!("{kind} {touches:?}");
        let input = TouchInput::new(touches, seq);
        if kind == "start" {
            manager.on_touch_start(&mut scene, input);
        } else {
            manager.on_touch_end(&mut scene, input);
        }
        let sessions = manager.sessions();
        println!(
            "  sessions: {} active, {} pooled, {} allocated",
            sessions.active_len(),
            sessions.pooled_len(),
            sessions.allocated()
        );
    }
}
