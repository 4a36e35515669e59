// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Scene: a small, Kurbo-native retained-mode scene graph.
//!
//! This crate models the part of a display tree that pointer interaction needs to know about:
//!
//! - A single root node ("stage") with ordered children. Later children draw on top of earlier ones.
//! - Per-node local transforms, composed into node-to-world transforms on [`Scene::commit`].
//! - Visibility and interactivity flags ([`NodeFlags`]).
//! - An optional explicit [`HitArea`] in local coordinates.
//! - An optional visual [`Extent`] (frame size, anchor fraction, trim) from which a default
//!   rectangular hit region is derived.
//!
//! ## Frames and world-visible generations
//!
//! [`Scene::commit`] is the transform pass. Each call increments the scene's frame counter and
//! stamps every node reachable from the root through visible ancestors with that frame. A node
//! whose stamp does not match the current frame was either hidden or detached during the last
//! pass, so its world transform must not be trusted. Hit testers compare
//! [`Scene::world_visible_frame`] against the frame they expect instead of reading a global.
//!
//! ## Interactivity revision
//!
//! Structural changes and flag changes that can alter the set of interactive nodes bump
//! [`Scene::interactivity_revision`]. Consumers that flatten interactive nodes into a list compare
//! revisions to know when to rebuild.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Affine, Size, Vec2};
//! use understory_scene::{Extent, NodeFlags, Scene, SceneNode};
//!
//! let mut scene = Scene::new();
//! let button = scene.insert(
//!     scene.root(),
//!     SceneNode {
//!         local_transform: Affine::translate(Vec2::new(50.0, 50.0)),
//!         flags: NodeFlags::VISIBLE | NodeFlags::INTERACTIVE,
//!         extent: Some(Extent::new(Size::new(100.0, 100.0)).with_anchor(Vec2::new(0.5, 0.5))),
//!         ..SceneNode::default()
//!     },
//! );
//!
//! let frame = scene.commit();
//! assert_eq!(scene.world_visible_frame(button), Some(frame));
//! assert_eq!(
//!     scene.world_transform(button),
//!     Some(Affine::translate(Vec2::new(50.0, 50.0)))
//! );
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hit_area;
mod scene;
mod types;

pub use hit_area::HitArea;
pub use scene::Scene;
pub use types::{Extent, NodeFlags, NodeId, SceneNode};
