// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover, press and click on a small panel of buttons.
//!
//! A panel holds two buttons; one of them is round and uses an explicit hit area. A scripted
//! sequence of mouse events is fed through a surface that is displayed at half the scene's
//! resolution, so device coordinates are scaled by two.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example buttons`

use kurbo::{Affine, Circle, Rect, Size, Vec2};
use understory_interaction::{InteractionManager, PointerInput, Surface};
use understory_scene::{Extent, HitArea, NodeId, Scene, SceneNode};

/// Surface that prints cursor changes.
struct Window {
    rect: Rect,
}

impl Surface for Window {
    fn bounding_rect(&self) -> Rect {
        self.rect
    }

    fn set_cursor(&mut self, style: &str) {
        println!("  cursor: {style}");
    }

    fn attach(&mut self) {
        println!("window attached");
    }

    fn detach(&mut self) {
        println!("window detached");
    }
}

fn button(x: f64, y: f64) -> SceneNode {
    SceneNode {
        local_transform: Affine::translate(Vec2::new(x, y)),
        extent: Some(Extent::new(Size::new(120.0, 40.0)).with_anchor(Vec2::new(0.5, 0.5))),
        ..SceneNode::interactive()
    }
}

fn main() {
    env_logger::init();

    let mut scene = Scene::with_root(SceneNode::interactive());
    let panel = scene.insert(
        scene.root(),
        SceneNode {
            local_transform: Affine::translate(Vec2::new(100.0, 100.0)),
            extent: Some(Extent::new(Size::new(400.0, 200.0))),
            ..SceneNode::interactive()
        },
    );
    let ok = scene.insert(panel, button(100.0, 100.0));
    let round = scene.insert(
        panel,
        SceneNode {
            hit_area: Some(HitArea::from(Circle::new((0.0, 0.0), 30.0))),
            ..button(300.0, 100.0)
        },
    );
    scene.commit();

    let names: Vec<(NodeId, &'static str)> = vec![(panel, "panel"), (ok, "ok"), (round, "round")];
    let name_of = move |node: NodeId| {
        names
            .iter()
            .find(|(n, _)| *n == node)
            .map_or("?", |&(_, name)| name)
    };

    let mut manager = InteractionManager::<Scene, &'static str>::new();
    for node in [ok, round] {
        let over = name_of.clone();
        let out = name_of.clone();
        let click = name_of.clone();
        manager
            .handlers_mut(node)
            .set_pointer_affordant(true)
            .on_pointer_over(move |_, data| {
                println!("  over {} (target {:?})", over(node), data.target);
            })
            .on_pointer_out(move |_, _| println!("  out {}", out(node)))
            .on_click(move |scene, data| {
                let local = data.local_position(&*scene, node);
                println!("  click {} at local {local:?}", click(node));
            });
    }
    let panel_name = name_of.clone();
    manager
        .handlers_mut(panel)
        .on_pointer_down(move |_, data| {
            println!(
                "  down reached {} (target {:?})",
                panel_name(panel),
                data.target
            );
        });
    manager.set_release_hook(|event| println!("  released after {event}"));

    // The window shows the 800x600 scene at 400x300.
    manager.bind_surface(
        Box::new(Window {
            rect: Rect::new(0.0, 0.0, 400.0, 300.0),
        }),
        Size::new(800.0, 600.0),
    );

    let mut now = 0;
    manager.update(&mut scene, now);

    let script = [
        ("move", (10.0, 10.0)),
        ("move", (100.0, 100.0)),
        ("down", (100.0, 100.0)),
        ("up", (100.0, 100.0)),
        ("move", (200.0, 100.0)),
        ("down", (200.0, 100.0)),
        ("up", (20.0, 20.0)),
    ];
    for (kind, position) in script {
        println!("{kind} at {position:?}");
        let input = PointerInput::new(position, kind);
        match kind {
            "move" => manager.on_pointer_move(&mut scene, input),
            "down" => manager.on_pointer_down(&mut scene, input),
            _ => manager.on_pointer_up(&mut scene, input),
        }
        now += 50;
        manager.update(&mut scene, now);
    }

    manager.on_pointer_leave_surface(&mut scene, "leave");
    manager.unbind_surface();
}
